//! Resolve operand tokens against the registers and labels

use crate::errors::{Malformed, StepError};
use crate::instruction::{Format, Mnemonic, Operands};
use crate::labels::Labels;
use crate::registers::{register_index, Registers};
use either::Either;
use mips_types::constants::{REGISTER_NAMES, REG_RA};

/// What the interpreter should do with a resolved instruction
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Run the mnemonic's action
    Execute(Operands),
    /// Continue at a line, optionally saving the current line in `$ra`
    Jump { target: usize, link: bool },
    /// Return through `$ra`
    Return,
    /// Load a word from a label's storage into a register
    Load {
        register: usize,
        label: String,
        offset: i32,
    },
    /// Store a register into a label's storage
    Store {
        register: usize,
        label: String,
        offset: i32,
    },
    /// Untaken branch, or `jr` through a register other than `$ra`
    Nothing,
}

/// Resolve the operand tokens of an instruction
pub(crate) fn resolve(
    mnemonic: Mnemonic,
    tokens: &[&str],
    registers: &Registers,
    labels: &Labels,
) -> Result<Effect, StepError> {
    match mnemonic.format() {
        Format::R => resolve_r_type(mnemonic, tokens, registers, labels),
        Format::I => resolve_i_type(mnemonic, tokens, registers, labels),
        Format::J => resolve_j_type(mnemonic, tokens, labels),
    }
}

fn resolve_r_type(
    mnemonic: Mnemonic,
    tokens: &[&str],
    registers: &Registers,
    labels: &Labels,
) -> Result<Effect, StepError> {
    match *tokens {
        [target] if mnemonic == Mnemonic::Jr => {
            // There is no general indirect jump
            if register_index(target) == Some(REG_RA) {
                Ok(Effect::Return)
            } else {
                Ok(Effect::Nothing)
            }
        }
        [rd] => Ok(Effect::Execute(Operands {
            rd: Some(register(rd)?),
            ..Operands::default()
        })),
        [rs, rt] => {
            let rs = register(rs)?;

            if is_register(rt) {
                return Ok(Effect::Execute(Operands {
                    rs: Some(rs),
                    rt: Some(register(rt)?),
                    ..Operands::default()
                }));
            }

            if !mnemonic.is_load() && !mnemonic.is_store() {
                return Err(Malformed::InvalidRegister(rt.to_string()).into());
            }

            let (offset, base) = memory_operand(rt)?;
            let label = registers
                .get(base)
                .as_reference()
                .ok_or_else(|| Malformed::BaseNotReference(REGISTER_NAMES[base].to_string()))?
                .to_string();

            if mnemonic.is_load() {
                Ok(Effect::Load {
                    register: rs,
                    label,
                    offset,
                })
            } else {
                Ok(Effect::Store {
                    register: rs,
                    label,
                    offset,
                })
            }
        }
        [rd, rs, rt] => {
            let rd = register(rd)?;

            if is_register(rt) {
                return Ok(Effect::Execute(Operands {
                    rd: Some(rd),
                    rs: Some(register(rs)?),
                    rt: Some(register(rt)?),
                    ..Operands::default()
                }));
            }

            let is_branch = matches!(mnemonic, Mnemonic::Beq | Mnemonic::Bne);
            match labels.text_label(rt) {
                Some(target) if is_branch => {
                    let a = registers.get_int(rd)?;
                    let b = match register_or_immediate(rs)? {
                        Either::Left(rs) => registers.get_int(rs)?,
                        Either::Right(value) => value,
                    };

                    Ok(branch(mnemonic.pair_branch_taken(a, b), target))
                }
                None if is_branch => Err(Malformed::UnknownLabel(rt.to_string()).into()),
                _ => Ok(Effect::Execute(Operands {
                    rd: Some(rd),
                    rs: Some(register(rs)?),
                    immediate: Some(immediate(rt)?),
                    ..Operands::default()
                })),
            }
        }
        _ => Err(Malformed::OperandCount(tokens.len()).into()),
    }
}

fn resolve_i_type(
    mnemonic: Mnemonic,
    tokens: &[&str],
    registers: &Registers,
    labels: &Labels,
) -> Result<Effect, StepError> {
    let is_branch = mnemonic.zero_branch_taken(0).is_some();

    match *tokens {
        [rd, target] if is_branch => {
            let value = registers.get_int(register(rd)?)?;
            let target = labels
                .text_label(target)
                .ok_or_else(|| Malformed::UnknownLabel(target.to_string()))?;

            Ok(branch(mnemonic.zero_branch_taken(value), target))
        }
        _ if is_branch => Err(Malformed::OperandCount(tokens.len()).into()),
        [rd, operand] => {
            let rd = Some(register(rd)?);

            if is_register(operand) {
                return Err(Malformed::InvalidImmediate(operand.to_string()).into());
            }

            // Anything that isn't a number names a label
            Ok(Effect::Execute(match parse_immediate(operand) {
                Some(value) => Operands {
                    rd,
                    immediate: Some(value),
                    ..Operands::default()
                },
                None => Operands {
                    rd,
                    label: Some(operand.to_string()),
                    ..Operands::default()
                },
            }))
        }
        [rd, rs, value] => Ok(Effect::Execute(Operands {
            rd: Some(register(rd)?),
            rs: Some(register(rs)?),
            immediate: Some(immediate(value)?),
            ..Operands::default()
        })),
        _ => Err(Malformed::OperandCount(tokens.len()).into()),
    }
}

fn resolve_j_type(
    mnemonic: Mnemonic,
    tokens: &[&str],
    labels: &Labels,
) -> Result<Effect, StepError> {
    match *tokens {
        [label] => {
            let target = labels
                .text_label(label)
                .ok_or_else(|| Malformed::UnknownLabel(label.to_string()))?;

            Ok(Effect::Jump {
                target,
                link: mnemonic == Mnemonic::Jal,
            })
        }
        _ => Err(Malformed::OperandCount(tokens.len()).into()),
    }
}

fn branch(taken: Option<bool>, target: usize) -> Effect {
    if taken == Some(true) {
        Effect::Jump {
            target,
            link: false,
        }
    } else {
        Effect::Nothing
    }
}

fn is_register(token: &str) -> bool {
    token.starts_with('$')
}

fn register(token: &str) -> Result<usize, Malformed> {
    register_index(token).ok_or_else(|| Malformed::InvalidRegister(token.to_string()))
}

fn immediate(token: &str) -> Result<i32, Malformed> {
    parse_immediate(token).ok_or_else(|| Malformed::InvalidImmediate(token.to_string()))
}

fn register_or_immediate(token: &str) -> Result<Either<usize, i32>, Malformed> {
    if is_register(token) {
        register(token).map(Either::Left)
    } else {
        immediate(token).map(Either::Right)
    }
}

/// Parse `offset(base)` into the byte offset and base register.
/// The offset may be left out.
fn memory_operand(token: &str) -> Result<(i32, usize), Malformed> {
    let invalid = || Malformed::InvalidMemoryOperand(token.to_string());
    let (offset, rest) = token.split_once('(').ok_or_else(invalid)?;
    let base = rest.strip_suffix(')').ok_or_else(invalid)?;
    let offset = match offset.trim() {
        "" => 0,
        offset => parse_immediate(offset).ok_or_else(invalid)?,
    };

    Ok((offset, register(base.trim())?))
}

/// Parse a decimal or `0x` hexadecimal integer
pub fn parse_immediate(token: &str) -> Option<i32> {
    let (negative, digits) = match token.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };

    let hex = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => hex,
        None => return token.parse().ok(),
    };

    if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let value = u32::from_str_radix(hex, 16).ok()? as i32;
    Some(if negative { value.wrapping_neg() } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn labels() -> Labels {
        let mut labels = Labels::new();
        labels.text.insert("END".to_string(), 9);
        labels.words.insert("arr".to_string(), vec![0; 4]);
        labels
    }

    fn resolve_line(
        mnemonic: Mnemonic,
        tokens: &[&str],
        registers: &Registers,
    ) -> Result<Effect, StepError> {
        resolve(mnemonic, tokens, registers, &labels())
    }

    fn malformed(result: Result<Effect, StepError>) -> Malformed {
        match result {
            Err(StepError::Malformed(m)) => m,
            other => panic!("expected a malformed operand, got {:?}", other),
        }
    }

    #[test]
    fn immediates() {
        assert_eq!(parse_immediate("42"), Some(42));
        assert_eq!(parse_immediate("-7"), Some(-7));
        assert_eq!(parse_immediate("+3"), Some(3));
        assert_eq!(parse_immediate("0x1F"), Some(31));
        assert_eq!(parse_immediate("-0x10"), Some(-16));
        assert_eq!(parse_immediate("0xFFFFFFFF"), Some(-1));
        assert_eq!(parse_immediate("0x"), None);
        assert_eq!(parse_immediate("END"), None);
        assert_eq!(parse_immediate("99999999999"), None);
    }

    #[test]
    fn three_registers() {
        let effect = resolve_line(Mnemonic::Add, &["$t0", "$t1", "$t2"], &Registers::default());
        assert_eq!(
            effect.unwrap(),
            Effect::Execute(Operands {
                rd: Some(8),
                rs: Some(9),
                rt: Some(10),
                ..Operands::default()
            })
        );
    }

    #[test]
    fn two_registers() {
        let effect = resolve_line(Mnemonic::Move, &["$t0", "$t1"], &Registers::default());
        assert_eq!(
            effect.unwrap(),
            Effect::Execute(Operands {
                rs: Some(8),
                rt: Some(9),
                ..Operands::default()
            })
        );
    }

    #[test]
    fn pair_branch() {
        let mut registers = Registers::default();
        registers.set_int(8, 3);
        registers.set_int(9, 3);

        assert_eq!(
            resolve_line(Mnemonic::Beq, &["$t0", "$t1", "END"], &registers).unwrap(),
            Effect::Jump {
                target: 9,
                link: false
            }
        );
        assert_eq!(
            resolve_line(Mnemonic::Bne, &["$t0", "$t1", "END"], &registers).unwrap(),
            Effect::Nothing
        );
        assert_eq!(
            resolve_line(Mnemonic::Bne, &["$t0", "4", "END"], &registers).unwrap(),
            Effect::Jump {
                target: 9,
                link: false
            }
        );
        assert_eq!(
            malformed(resolve_line(Mnemonic::Beq, &["$t0", "$t1", "NOWHERE"], &registers)),
            Malformed::UnknownLabel("NOWHERE".to_string())
        );
    }

    #[test]
    fn zero_branch() {
        let mut registers = Registers::default();
        registers.set_int(8, -1);

        let jump = Effect::Jump {
            target: 9,
            link: false,
        };
        let resolve_branch = |mnemonic| resolve_line(mnemonic, &["$t0", "END"], &registers);
        assert_eq!(resolve_branch(Mnemonic::Beqz).unwrap(), Effect::Nothing);
        assert_eq!(resolve_branch(Mnemonic::Bnez).unwrap(), jump);
        assert_eq!(resolve_branch(Mnemonic::Bltz).unwrap(), jump);
        assert_eq!(resolve_branch(Mnemonic::Blez).unwrap(), jump);
        assert_eq!(resolve_branch(Mnemonic::Bgtz).unwrap(), Effect::Nothing);
        assert_eq!(resolve_branch(Mnemonic::Bgez).unwrap(), Effect::Nothing);
    }

    #[test]
    fn immediate_or_label() {
        let registers = Registers::default();
        assert_eq!(
            resolve_line(Mnemonic::Li, &["$t0", "-5"], &registers).unwrap(),
            Effect::Execute(Operands {
                rd: Some(8),
                immediate: Some(-5),
                ..Operands::default()
            })
        );
        assert_eq!(
            resolve_line(Mnemonic::La, &["$a0", "arr"], &registers).unwrap(),
            Effect::Execute(Operands {
                rd: Some(4),
                label: Some("arr".to_string()),
                ..Operands::default()
            })
        );
        assert_eq!(
            resolve_line(Mnemonic::La, &["$t0", "END"], &registers).unwrap(),
            Effect::Execute(Operands {
                rd: Some(8),
                label: Some("END".to_string()),
                ..Operands::default()
            })
        );
        assert_eq!(
            resolve_line(Mnemonic::Sll, &["$t0", "$t1", "2"], &registers).unwrap(),
            Effect::Execute(Operands {
                rd: Some(8),
                rs: Some(9),
                immediate: Some(2),
                ..Operands::default()
            })
        );
    }

    #[test]
    fn memory_operands() {
        let mut registers = Registers::default();
        registers.set(4, Value::Reference("arr".to_string()));

        assert_eq!(
            resolve_line(Mnemonic::Lw, &["$t1", "8($a0)"], &registers).unwrap(),
            Effect::Load {
                register: 9,
                label: "arr".to_string(),
                offset: 8
            }
        );
        assert_eq!(
            resolve_line(Mnemonic::Sw, &["$t1", "($a0)"], &registers).unwrap(),
            Effect::Store {
                register: 9,
                label: "arr".to_string(),
                offset: 0
            }
        );
        assert_eq!(
            malformed(resolve_line(Mnemonic::Lw, &["$t1", "8($t5)"], &registers)),
            Malformed::BaseNotReference("$t5".to_string())
        );
        assert_eq!(
            malformed(resolve_line(Mnemonic::Lw, &["$t1", "arr"], &registers)),
            Malformed::InvalidMemoryOperand("arr".to_string())
        );
    }

    #[test]
    fn jumps() {
        let registers = Registers::default();
        assert_eq!(
            resolve_line(Mnemonic::Jal, &["END"], &registers).unwrap(),
            Effect::Jump {
                target: 9,
                link: true
            }
        );
        assert_eq!(
            resolve_line(Mnemonic::Jr, &["$ra"], &registers).unwrap(),
            Effect::Return
        );
        assert_eq!(
            resolve_line(Mnemonic::Jr, &["$t0"], &registers).unwrap(),
            Effect::Nothing
        );
        assert_eq!(
            resolve_line(Mnemonic::Jr, &["END"], &registers).unwrap(),
            Effect::Nothing
        );
        assert_eq!(
            resolve_line(Mnemonic::Jr, &["3"], &registers).unwrap(),
            Effect::Nothing
        );
        assert_eq!(
            malformed(resolve_line(Mnemonic::J, &["NOWHERE"], &registers)),
            Malformed::UnknownLabel("NOWHERE".to_string())
        );
    }

    #[test]
    fn bad_tokens() {
        let registers = Registers::default();
        assert_eq!(
            malformed(resolve_line(Mnemonic::Add, &["$t0", "$t1", "$x9"], &registers)),
            Malformed::InvalidRegister("$x9".to_string())
        );
        assert_eq!(
            malformed(resolve_line(Mnemonic::Addi, &["$t0", "$t1", "ten"], &registers)),
            Malformed::InvalidImmediate("ten".to_string())
        );
        assert_eq!(
            malformed(resolve_line(Mnemonic::Li, &["$t0"], &registers)),
            Malformed::OperandCount(1)
        );
        assert_eq!(
            malformed(resolve_line(Mnemonic::Beqz, &["$t0", "$t1", "END"], &registers)),
            Malformed::OperandCount(3)
        );
    }
}
