// Register numbers
pub const REG_ZERO: usize = 0;
pub const REG_AT: usize = 1;
pub const REG_V0: usize = 2;
pub const REG_A0: usize = 4;
pub const REG_A1: usize = 5;
pub const REG_GP: usize = 28;
/// The stack pointer register
pub const REG_SP: usize = 29;
pub const REG_RA: usize = 31;
/// Holds the quotient after `div`
pub const REG_HI: usize = 32;
/// Holds the remainder after `div` and the product after `mult`
pub const REG_LO: usize = 33;

/// General purpose registers plus HI and LO
pub const REGISTER_COUNT: usize = 34;

pub static REGISTER_NAMES: [&str; REGISTER_COUNT] = [
    "$zero", "$at", "$v0", "$v1", "$a0", "$a1", "$a2", "$a3", "$t0", "$t1", "$t2", "$t3",
    "$t4", "$t5", "$t6", "$t7", "$s0", "$s1", "$s2", "$s3", "$s4", "$s5", "$s6", "$s7",
    "$t8", "$t9", "$k0", "$k1", "$gp", "$sp", "$fp", "$ra", "hi", "lo",
];

// Syscall codes
pub const SYSCALL_PRINT_INT: i32 = 1;
pub const SYSCALL_PRINT_STR: i32 = 4;
pub const SYSCALL_READ_INT: i32 = 5;
pub const SYSCALL_READ_STRING: i32 = 8;
pub const SYSCALL_EXIT: i32 = 10;
pub const SYSCALL_PRINT_CHAR: i32 = 11;

/// Bytes per storage word
pub const WORD_SIZE: i32 = 4;
