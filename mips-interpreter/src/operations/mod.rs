mod control;
mod memory;
mod syscall;
