use crate::errors::{Fault, Malformed, StepError};
use crate::registers::Registers;
use crate::value::Value;
use mips_types::constants::{REG_HI, REG_LO};

/// How an instruction's operand tokens are resolved
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Format {
    /// Registers only, or a memory operand, or a two register branch
    R,
    /// A register with an immediate or label
    I,
    /// A single text label
    J,
}

/// Every supported instruction
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Mnemonic {
    Noop,
    Move,
    Add,
    Addu,
    Sub,
    Subu,
    And,
    Or,
    Xor,
    Nor,
    Slt,
    Sltu,
    Sllv,
    Srlv,
    Srav,
    Mfhi,
    Mflo,
    Mthi,
    Mtlo,
    Mult,
    Multu,
    Div,
    Divu,
    Beq,
    Bne,
    Lw,
    Lb,
    Sw,
    Sb,
    Jr,
    Sll,
    Srl,
    Sra,
    Addi,
    Addiu,
    Slti,
    Sltiu,
    Andi,
    Ori,
    Xori,
    Li,
    La,
    Lui,
    Beqz,
    Bnez,
    Bgez,
    Bgtz,
    Blez,
    Bltz,
    J,
    Jal,
}

/// Resolved operands. Which fields are filled depends on the format and
/// the operand count:
///
/// - R, 1 operand: `rd`
/// - R, 2 operands: `rs, rt`
/// - R, 3 operands: `rd, rs, rt` (`rt` may be replaced by `immediate`)
/// - I, 2 operands: `rd` and `immediate` or `label`
/// - I, 3 operands: `rd, rs, immediate`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Operands {
    pub rd: Option<usize>,
    pub rs: Option<usize>,
    pub rt: Option<usize>,
    pub immediate: Option<i32>,
    pub label: Option<String>,
}

impl Operands {
    pub fn rd(&self) -> Result<usize, Malformed> {
        self.rd.ok_or(Malformed::MissingOperand("destination"))
    }

    pub fn rs(&self) -> Result<usize, Malformed> {
        self.rs.ok_or(Malformed::MissingOperand("first source"))
    }

    pub fn rt(&self) -> Result<usize, Malformed> {
        self.rt.ok_or(Malformed::MissingOperand("second source"))
    }

    pub fn immediate(&self) -> Result<i32, Malformed> {
        self.immediate.ok_or(Malformed::MissingOperand("immediate"))
    }
}

impl Mnemonic {
    /// Look up a mnemonic, ignoring case
    pub fn parse(name: &str) -> Option<Self> {
        use Mnemonic::*;

        Some(match name.to_ascii_lowercase().as_str() {
            "noop" => Noop,
            "move" => Move,
            "add" => Add,
            "addu" => Addu,
            "sub" => Sub,
            "subu" => Subu,
            "and" => And,
            "or" => Or,
            "xor" => Xor,
            "nor" => Nor,
            "slt" => Slt,
            "sltu" => Sltu,
            "sllv" => Sllv,
            "srlv" => Srlv,
            "srav" => Srav,
            "mfhi" => Mfhi,
            "mflo" => Mflo,
            "mthi" => Mthi,
            "mtlo" => Mtlo,
            "mult" => Mult,
            "multu" => Multu,
            "div" => Div,
            "divu" => Divu,
            "beq" => Beq,
            "bne" => Bne,
            "lw" => Lw,
            "lb" => Lb,
            "sw" => Sw,
            "sb" => Sb,
            "jr" => Jr,
            "sll" => Sll,
            "srl" => Srl,
            "sra" => Sra,
            "addi" => Addi,
            "addiu" => Addiu,
            "slti" => Slti,
            "sltiu" => Sltiu,
            "andi" => Andi,
            "ori" => Ori,
            "xori" => Xori,
            "li" => Li,
            "la" => La,
            "lui" => Lui,
            "beqz" => Beqz,
            "bnez" => Bnez,
            "bgez" => Bgez,
            "bgtz" => Bgtz,
            "blez" => Blez,
            "bltz" => Bltz,
            "j" => J,
            "jal" => Jal,
            _ => return None,
        })
    }

    pub fn format(self) -> Format {
        use Mnemonic::*;

        match self {
            Sll | Srl | Sra | Addi | Addiu | Slti | Sltiu | Andi | Ori | Xori | Li | La | Lui
            | Beqz | Bnez | Bgez | Bgtz | Blez | Bltz => Format::I,
            J | Jal => Format::J,
            _ => Format::R,
        }
    }

    pub fn is_load(self) -> bool {
        matches!(self, Mnemonic::Lw | Mnemonic::Lb)
    }

    pub fn is_store(self) -> bool {
        matches!(self, Mnemonic::Sw | Mnemonic::Sb)
    }

    /// Compare a register against zero for the single register branches.
    /// Returns None if this isn't one of them.
    pub fn zero_branch_taken(self, value: i32) -> Option<bool> {
        use Mnemonic::*;

        Some(match self {
            Beqz => value == 0,
            Bnez => value != 0,
            Bgez => value >= 0,
            Bgtz => value > 0,
            Blez => value <= 0,
            Bltz => value < 0,
            _ => return None,
        })
    }

    /// Compare two values for `beq` and `bne`.
    /// Returns None if this isn't one of them.
    pub fn pair_branch_taken(self, a: i32, b: i32) -> Option<bool> {
        match self {
            Mnemonic::Beq => Some(a == b),
            Mnemonic::Bne => Some(a != b),
            _ => None,
        }
    }

    /// Run the instruction's effect on the registers. Branches, jumps and
    /// memory accesses do nothing here; the interpreter applies them while
    /// resolving operands.
    pub(crate) fn execute(
        self,
        operands: &Operands,
        registers: &mut Registers,
    ) -> Result<(), StepError> {
        use Mnemonic::*;

        // Shorthand for `rd = rs <op> rt`
        let binary = |registers: &mut Registers,
                      f: fn(i32, i32) -> i32|
         -> Result<(), StepError> {
            let a = registers.get_int(operands.rs()?)?;
            let b = registers.get_int(operands.rt()?)?;
            registers.set_int(operands.rd()?, f(a, b));
            Ok(())
        };
        // Shorthand for `rd = rs <op> immediate`
        let immediate = |registers: &mut Registers,
                         f: fn(i32, i32) -> i32|
         -> Result<(), StepError> {
            let a = registers.get_int(operands.rs()?)?;
            registers.set_int(operands.rd()?, f(a, operands.immediate()?));
            Ok(())
        };

        match self {
            Noop | Beq | Bne | Lw | Lb | Sw | Sb | Jr | Beqz | Bnez | Bgez | Bgtz | Blez
            | Bltz | J | Jal => {}
            Move => {
                let value = registers.get(operands.rt()?).clone();
                registers.set(operands.rs()?, value);
            }
            Add | Addu => binary(registers, i32::wrapping_add)?,
            Sub | Subu => binary(registers, i32::wrapping_sub)?,
            And => binary(registers, |a, b| a & b)?,
            Or => binary(registers, |a, b| a | b)?,
            Xor => binary(registers, |a, b| a ^ b)?,
            Nor => binary(registers, |a, b| !(a | b))?,
            Slt => binary(registers, |a, b| (a < b) as i32)?,
            Sltu => binary(registers, |a, b| ((a as u32) < (b as u32)) as i32)?,
            Sllv => binary(registers, |a, b| a.wrapping_shl(b as u32))?,
            Srlv => binary(registers, |a, b| (a as u32).wrapping_shr(b as u32) as i32)?,
            Srav => binary(registers, |a, b| a.wrapping_shr(b as u32))?,
            Mfhi => {
                let value = registers.get_int(REG_HI)?;
                registers.set_int(operands.rd()?, value);
            }
            Mflo => {
                let value = registers.get_int(REG_LO)?;
                registers.set_int(operands.rd()?, value);
            }
            Mthi => {
                let value = registers.get_int(operands.rd()?)?;
                registers.set_int(REG_HI, value);
            }
            Mtlo => {
                let value = registers.get_int(operands.rd()?)?;
                registers.set_int(REG_LO, value);
            }
            Mult | Multu => {
                let a = registers.get_int(operands.rs()?)?;
                let b = registers.get_int(operands.rt()?)?;
                registers.set_int(REG_HI, 0);
                registers.set_int(REG_LO, a.wrapping_mul(b));
            }
            Div | Divu => {
                let a = registers.get_int(operands.rs()?)?;
                let b = registers.get_int(operands.rt()?)?;
                let (quotient, remainder) = divide(a, b, self == Divu)?;

                // Quotient in HI, remainder in LO
                registers.set_int(REG_HI, quotient);
                registers.set_int(REG_LO, remainder);
            }
            Sll => immediate(registers, |a, b| a.wrapping_shl(b as u32))?,
            Srl => immediate(registers, |a, b| (a as u32).wrapping_shr(b as u32) as i32)?,
            Sra => immediate(registers, |a, b| a.wrapping_shr(b as u32))?,
            Addi | Addiu => immediate(registers, i32::wrapping_add)?,
            Slti => immediate(registers, |a, b| (a < b) as i32)?,
            Sltiu => immediate(registers, |a, b| ((a as u32) < (b as u32)) as i32)?,
            Andi => immediate(registers, |a, b| a & b)?,
            Ori => immediate(registers, |a, b| a | b)?,
            Xori => immediate(registers, |a, b| a ^ b)?,
            Li => registers.set_int(operands.rd()?, operands.immediate()?),
            La => {
                let label = operands
                    .label
                    .clone()
                    .ok_or(Malformed::MissingOperand("label"))?;
                registers.set(operands.rd()?, Value::Reference(label));
            }
            Lui => registers.set_int(operands.rd()?, operands.immediate()?.wrapping_shl(16)),
        }

        Ok(())
    }
}

/// Divide, returning the quotient and remainder
fn divide(a: i32, b: i32, unsigned: bool) -> Result<(i32, i32), Fault> {
    if b == 0 {
        return Err(Fault::DivisionByZero);
    }

    Ok(if unsigned {
        let (a, b) = (a as u32, b as u32);
        ((a / b) as i32, (a % b) as i32)
    } else {
        (a.wrapping_div(b), a.wrapping_rem(b))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rrr(rd: usize, rs: usize, rt: usize) -> Operands {
        Operands {
            rd: Some(rd),
            rs: Some(rs),
            rt: Some(rt),
            ..Operands::default()
        }
    }

    fn rri(rd: usize, rs: usize, immediate: i32) -> Operands {
        Operands {
            rd: Some(rd),
            rs: Some(rs),
            immediate: Some(immediate),
            ..Operands::default()
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(Mnemonic::parse("ADD"), Some(Mnemonic::Add));
        assert_eq!(Mnemonic::parse("Beqz"), Some(Mnemonic::Beqz));
        assert_eq!(Mnemonic::parse("frob"), None);
    }

    #[test]
    fn formats() {
        assert_eq!(Mnemonic::Add.format(), Format::R);
        assert_eq!(Mnemonic::Lw.format(), Format::R);
        assert_eq!(Mnemonic::Sll.format(), Format::I);
        assert_eq!(Mnemonic::La.format(), Format::I);
        assert_eq!(Mnemonic::Jal.format(), Format::J);
    }

    #[test]
    fn arithmetic_wraps() {
        let mut registers = Registers::default();
        registers.set_int(9, i32::MAX);
        registers.set_int(10, 1);
        Mnemonic::Add.execute(&rrr(8, 9, 10), &mut registers).unwrap();
        assert_eq!(registers.get_int(8).unwrap(), i32::MIN);
    }

    #[test]
    fn shifts() {
        let mut registers = Registers::default();
        registers.set_int(9, -8);
        Mnemonic::Sra.execute(&rri(8, 9, 1), &mut registers).unwrap();
        assert_eq!(registers.get_int(8).unwrap(), -4);
        Mnemonic::Srl.execute(&rri(8, 9, 28), &mut registers).unwrap();
        assert_eq!(registers.get_int(8).unwrap(), 0xF);
        Mnemonic::Sll.execute(&rri(8, 9, 2), &mut registers).unwrap();
        assert_eq!(registers.get_int(8).unwrap(), -32);
    }

    #[test]
    fn unsigned_compare() {
        let mut registers = Registers::default();
        registers.set_int(9, -1);
        registers.set_int(10, 1);
        Mnemonic::Slt.execute(&rrr(8, 9, 10), &mut registers).unwrap();
        assert_eq!(registers.get_int(8).unwrap(), 1);
        Mnemonic::Sltu.execute(&rrr(8, 9, 10), &mut registers).unwrap();
        assert_eq!(registers.get_int(8).unwrap(), 0);
    }

    #[test]
    fn mult_clears_hi() {
        let mut registers = Registers::default();
        registers.set_int(REG_HI, 99);
        registers.set_int(9, 6);
        registers.set_int(10, 7);
        let operands = Operands {
            rs: Some(9),
            rt: Some(10),
            ..Operands::default()
        };
        Mnemonic::Mult.execute(&operands, &mut registers).unwrap();
        assert_eq!(registers.get_int(REG_HI).unwrap(), 0);
        assert_eq!(registers.get_int(REG_LO).unwrap(), 42);
    }

    #[test]
    fn div_puts_quotient_in_hi() {
        let mut registers = Registers::default();
        registers.set_int(8, 17);
        registers.set_int(9, 5);
        let operands = Operands {
            rs: Some(8),
            rt: Some(9),
            ..Operands::default()
        };
        Mnemonic::Div.execute(&operands, &mut registers).unwrap();
        assert_eq!(registers.get_int(REG_HI).unwrap(), 3);
        assert_eq!(registers.get_int(REG_LO).unwrap(), 2);
    }

    #[test]
    fn div_by_zero_faults() {
        let mut registers = Registers::default();
        let operands = Operands {
            rs: Some(8),
            rt: Some(9),
            ..Operands::default()
        };
        let result = Mnemonic::Divu.execute(&operands, &mut registers);
        assert!(matches!(
            result,
            Err(StepError::Fault(Fault::DivisionByZero))
        ));
    }

    #[test]
    fn move_copies_reference() {
        let mut registers = Registers::default();
        registers.set(9, Value::Reference("arr".to_string()));
        let operands = Operands {
            rs: Some(8),
            rt: Some(9),
            ..Operands::default()
        };
        Mnemonic::Move.execute(&operands, &mut registers).unwrap();
        assert_eq!(registers.get(8), &Value::Reference("arr".to_string()));
    }

    #[test]
    fn missing_operand_is_malformed() {
        let mut registers = Registers::default();
        let operands = Operands {
            rd: Some(8),
            rs: Some(9),
            immediate: Some(5),
            ..Operands::default()
        };
        let result = Mnemonic::Add.execute(&operands, &mut registers);
        assert!(matches!(
            result,
            Err(StepError::Malformed(Malformed::MissingOperand(_)))
        ));
    }

    #[test]
    fn arithmetic_on_reference_faults() {
        let mut registers = Registers::default();
        registers.set(9, Value::Reference("arr".to_string()));
        let result = Mnemonic::Addi.execute(&rri(8, 9, 1), &mut registers);
        assert!(matches!(result, Err(StepError::Fault(_))));
    }
}
