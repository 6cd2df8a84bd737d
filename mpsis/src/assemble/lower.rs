//! Lowers one source line into micro-instruction words.

use crate::{
    assemble::{
        JumpTarget, LineError,
        loader::load_constant,
        operand::Operand,
        syntax::{AsmLine, BinaryOp, Mnemonic, ShiftDirection},
    },
    profile::{JumpAddressing, Profile},
    word::{Alu, ShiftCtrl, Word, value},
};

/// The result of lowering a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lowered {
    Words(Vec<Word>),
    /// A jump word whose target is filled in once every label is known.
    Jump(Word, JumpTarget),
    /// A label definition. It takes one position but emits no word.
    Label(String),
}

impl Lowered {
    /// The number of positions this line advances the position counter by.
    pub fn positions(&self) -> usize {
        match self {
            Lowered::Words(words) => words.len(),
            Lowered::Jump(..) | Lowered::Label(_) => 1,
        }
    }
}

pub fn lower(line: &AsmLine, profile: Profile) -> Result<Lowered, LineError> {
    let mnemonic = line
        .mnemonic
        .parse::<Mnemonic>()
        .map_err(|()| LineError::UnknownMnemonic(line.mnemonic.clone()))?;

    match (mnemonic, line.args.as_slice()) {
        (Mnemonic::Mov, [src, dst]) => mov(profile, src, dst).map(Lowered::Words),
        (Mnemonic::Binary(op), [lhs, rhs, dst]) => {
            binary(profile, op, lhs, rhs, dst).map(Lowered::Words)
        }
        (Mnemonic::Shift(direction), [src, amount, dst]) => {
            shift(direction, src, amount, dst).map(Lowered::Words)
        }
        (Mnemonic::Not, [src, dst]) => not(profile, src, dst).map(Lowered::Words),
        (Mnemonic::Out, [src, port]) => out(profile, src, port).map(Lowered::Words),
        (Mnemonic::Jump(kind), [target]) => Ok(Lowered::Jump(
            Word::jump(kind),
            jump_target(profile, target),
        )),
        (Mnemonic::Lbl, [name]) => Ok(Lowered::Label(name.to_owned())),
        (Mnemonic::Nop, []) => Ok(Lowered::Words(vec![Word::default()])),
        (mnemonic, args) => Err(LineError::WrongArgumentCount {
            mnemonic,
            expected: mnemonic.arity(),
            found: args.len(),
        }),
    }
}

/// A jump operand is always a label name, except that layouts with relative
/// jumps also take a raw signed offset.
fn jump_target(profile: Profile, token: &str) -> JumpTarget {
    match profile.jump_addressing() {
        JumpAddressing::Relative => match token.parse() {
            Ok(offset) => JumpTarget::Offset(offset),
            Err(_) => JumpTarget::Label(token.to_owned()),
        },
        JumpAddressing::Absolute => JumpTarget::Label(token.to_owned()),
    }
}

/// A memory address the instruction reads from or writes to.
/// Address 0 is reserved.
fn address(token: &str) -> Result<u8, LineError> {
    match Operand::classify(token)? {
        operand @ Operand::Memory(_) => read(operand, token),
        _ => Err(LineError::ExpectedAddress(token.to_owned())),
    }
}

/// The address of a memory operand that has already been classified.
fn read(operand: Operand, token: &str) -> Result<u8, LineError> {
    match operand.nibble() {
        0 => Err(LineError::ZeroAddress(token.to_owned())),
        address => Ok(address),
    }
}

/// An output port selector. Unlike memory addresses, port 0 is valid.
fn port(token: &str) -> Result<u8, LineError> {
    match Operand::classify(token)? {
        operand @ Operand::Memory(_) => Ok(operand.nibble() & 0b11),
        _ => Err(LineError::ExpectedAddress(token.to_owned())),
    }
}

/// Latch a memory address into the accumulator, operand A of the next ALU word.
fn load_accumulator(address: u8) -> Word {
    Word {
        value: value::ALU,
        read_address: address,
        ..Word::default()
    }
}

/// Latch a memory address into the secondary register, which feeds operand B
/// and the shifter.
fn load_secondary(address: u8) -> Word {
    Word {
        value: value::ALU_SECONDARY,
        read_address: address,
        ..Word::default()
    }
}

/// Copy the input port into the scratch address 0.
fn stage_input() -> Word {
    Word {
        input: true,
        write_enable: true,
        value: value::ALU,
        ..Word::default()
    }
}

fn mov(profile: Profile, src: &str, dst: &str) -> Result<Vec<Word>, LineError> {
    let src_operand = Operand::classify(src)?;
    let word = Word {
        write_enable: true,
        write_address: address(dst)?,
        ..Word::default()
    };
    Ok(match src_operand {
        Operand::Immediate(_) => load_constant(
            profile,
            src_operand.nibble(),
            Word {
                alu: Alu::PASS_B,
                ..word
            },
        ),
        Operand::Input => vec![Word {
            input: true,
            value: value::ALU,
            ..word
        }],
        Operand::Memory(_) => vec![Word {
            value: value::ALU,
            read_address: read(src_operand, src)?,
            ..word
        }],
    })
}

fn binary(
    profile: Profile,
    op: BinaryOp,
    lhs: &str,
    rhs: &str,
    dst: &str,
) -> Result<Vec<Word>, LineError> {
    let a = Operand::classify(lhs)?;
    let b = Operand::classify(rhs)?;
    let word = Word {
        alu: op.alu(),
        write_enable: true,
        write_address: address(dst)?,
        ..Word::default()
    };
    let unsupported = || LineError::UnsupportedOperands {
        mnemonic: Mnemonic::Binary(op),
        lhs: a.kind(),
        rhs: b.kind(),
    };

    match (a, b) {
        (Operand::Immediate(_), Operand::Immediate(_)) => Err(unsupported()),
        (Operand::Immediate(_), _) if !op.is_commutative() => Err(unsupported()),
        (Operand::Immediate(_), Operand::Input) | (Operand::Input, Operand::Immediate(_)) => {
            let constant = if let Operand::Immediate(_) = a { a } else { b };
            Ok(load_constant(
                profile,
                constant.nibble(),
                Word {
                    input: true,
                    value: value::ALU,
                    ..word
                },
            ))
        }
        (Operand::Immediate(_), Operand::Memory(_)) => Ok(load_constant(
            profile,
            a.nibble(),
            Word {
                value: value::ALU,
                read_address: read(b, rhs)?,
                ..word
            },
        )),
        (Operand::Memory(_), Operand::Immediate(_)) => Ok(load_constant(
            profile,
            b.nibble(),
            Word {
                value: value::ALU,
                read_address: read(a, lhs)?,
                ..word
            },
        )),
        (Operand::Input, Operand::Input) => Ok(vec![
            stage_input(),
            Word {
                input: true,
                value: value::ALU,
                ..word
            },
        ]),
        // The input port only reaches operand B, so it cannot be the minuend.
        (Operand::Input, Operand::Memory(_)) if !op.is_commutative() => Err(unsupported()),
        (Operand::Input, Operand::Memory(_)) => Ok(vec![Word {
            input: true,
            value: value::ALU_INPUT,
            read_address: read(b, rhs)?,
            ..word
        }]),
        (Operand::Memory(_), Operand::Input) if op.is_commutative() => Ok(vec![Word {
            input: true,
            value: value::ALU_INPUT,
            read_address: read(a, lhs)?,
            ..word
        }]),
        // The minuend has to reach operand A, so it goes through the accumulator.
        (Operand::Memory(_), Operand::Input) => Ok(vec![
            load_accumulator(read(a, lhs)?),
            Word {
                input: true,
                value: value::ALU_SECONDARY,
                ..word
            },
        ]),
        (Operand::Memory(_), Operand::Memory(_)) => Ok(vec![
            load_accumulator(read(a, lhs)?),
            Word {
                value: value::ALU_SECONDARY,
                read_address: read(b, rhs)?,
                ..word
            },
        ]),
    }
}

fn shift(
    direction: ShiftDirection,
    src: &str,
    amount: &str,
    dst: &str,
) -> Result<Vec<Word>, LineError> {
    let src = address(src)?;
    let bit = match amount {
        "0" => false,
        "1" => true,
        _ => return Err(LineError::InvalidShiftAmount(amount.to_owned())),
    };
    let (shift, value) = match direction {
        ShiftDirection::Right => (
            ShiftCtrl {
                right_in: bit,
                left_in: false,
            },
            value::SHIFT_RIGHT,
        ),
        ShiftDirection::Left => (
            ShiftCtrl {
                right_in: false,
                left_in: bit,
            },
            value::SHIFT_LEFT,
        ),
    };
    Ok(vec![
        load_secondary(src),
        Word {
            alu: Alu::PASS_B,
            shift,
            write_enable: true,
            value,
            write_address: address(dst)?,
            ..Word::default()
        },
    ])
}

fn not(profile: Profile, src: &str, dst: &str) -> Result<Vec<Word>, LineError> {
    let src_operand = Operand::classify(src)?;
    let word = Word {
        write_enable: true,
        write_address: address(dst)?,
        ..Word::default()
    };
    Ok(match src_operand {
        Operand::Immediate(_) => load_constant(
            profile,
            src_operand.nibble(),
            Word {
                alu: Alu::NOT_B,
                value: value::NONE,
                ..word
            },
        ),
        Operand::Input => vec![Word {
            alu: Alu::NOT_A,
            input: true,
            value: value::ALU,
            ..word
        }],
        Operand::Memory(_) => vec![Word {
            alu: Alu::NOT_A,
            value: value::ALU,
            read_address: read(src_operand, src)?,
            ..word
        }],
    })
}

fn out(profile: Profile, src: &str, port_token: &str) -> Result<Vec<Word>, LineError> {
    let src_operand = Operand::classify(src)?;
    let word = Word {
        write_address: port(port_token)?,
        ..Word::default()
    };
    Ok(match src_operand {
        Operand::Immediate(_) => load_constant(
            profile,
            src_operand.nibble(),
            Word {
                alu: Alu::PASS_B,
                value: value::OUT_ALU,
                ..word
            },
        ),
        Operand::Input => vec![Word {
            input: true,
            value: value::OUT_DIRECT,
            ..word
        }],
        Operand::Memory(_) => vec![Word {
            value: value::OUT_DIRECT,
            read_address: read(src_operand, src)?,
            ..word
        }],
    })
}
