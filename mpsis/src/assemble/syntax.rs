//! Abstract syntax for MPSIS assembly.

use std::{fmt::Display, str::FromStr};

use crate::word::{Alu, JumpKind};

/// One source line holding an instruction or directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsmLine {
    pub line_number: usize,
    pub mnemonic: String,
    /// The argument tokens, unclassified.
    /// Whether a token is an operand or a label depends on the mnemonic.
    pub args: Vec<String>,
}

impl AsmLine {
    /// Build a line from whitespace-separated text without going through the parser.
    pub fn from_tokens(line_number: usize, text: &str) -> Option<AsmLine> {
        let mut tokens = text.split_whitespace();
        Some(AsmLine {
            line_number,
            mnemonic: tokens.next()?.to_owned(),
            args: tokens.map(str::to_owned).collect(),
        })
    }
}

/// The leading token of a line, naming the lowering rule to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Mov,
    Binary(BinaryOp),
    Shift(ShiftDirection),
    Not,
    Out,
    Jump(JumpKind),
    Lbl,
    Nop,
}

/// The two-source ALU operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    And,
    Or,
    Xor,
}

impl BinaryOp {
    pub fn alu(self) -> Alu {
        match self {
            BinaryOp::Add => Alu::ADD,
            BinaryOp::Sub => Alu::SUB,
            BinaryOp::And => Alu::AND,
            BinaryOp::Or => Alu::OR,
            BinaryOp::Xor => Alu::XOR,
        }
    }

    /// Subtraction cannot take a constant as its left-hand operand,
    /// and needs the operand order preserved.
    pub fn is_commutative(self) -> bool {
        !matches!(self, BinaryOp::Sub)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftDirection {
    Right,
    Left,
}

impl Mnemonic {
    /// The number of arguments this mnemonic takes.
    pub fn arity(self) -> usize {
        match self {
            Mnemonic::Nop => 0,
            Mnemonic::Jump(_) | Mnemonic::Lbl => 1,
            Mnemonic::Mov | Mnemonic::Not | Mnemonic::Out => 2,
            Mnemonic::Binary(_) | Mnemonic::Shift(_) => 3,
        }
    }
}

impl Display for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mnemonic::Mov => write!(f, "mov"),
            Mnemonic::Binary(BinaryOp::Add) => write!(f, "add"),
            Mnemonic::Binary(BinaryOp::Sub) => write!(f, "sub"),
            Mnemonic::Binary(BinaryOp::And) => write!(f, "and"),
            Mnemonic::Binary(BinaryOp::Or) => write!(f, "or"),
            Mnemonic::Binary(BinaryOp::Xor) => write!(f, "xor"),
            Mnemonic::Shift(ShiftDirection::Right) => write!(f, "shr"),
            Mnemonic::Shift(ShiftDirection::Left) => write!(f, "shl"),
            Mnemonic::Not => write!(f, "not"),
            Mnemonic::Out => write!(f, "out"),
            Mnemonic::Jump(kind) => write!(f, "{kind}"),
            Mnemonic::Lbl => write!(f, "lbl"),
            Mnemonic::Nop => write!(f, "nop"),
        }
    }
}

impl FromStr for Mnemonic {
    type Err = ();

    /// Mnemonics are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mov" => Ok(Mnemonic::Mov),
            "add" => Ok(Mnemonic::Binary(BinaryOp::Add)),
            "sub" => Ok(Mnemonic::Binary(BinaryOp::Sub)),
            "and" => Ok(Mnemonic::Binary(BinaryOp::And)),
            "or" => Ok(Mnemonic::Binary(BinaryOp::Or)),
            "xor" => Ok(Mnemonic::Binary(BinaryOp::Xor)),
            "shr" => Ok(Mnemonic::Shift(ShiftDirection::Right)),
            "shl" => Ok(Mnemonic::Shift(ShiftDirection::Left)),
            "not" => Ok(Mnemonic::Not),
            "out" => Ok(Mnemonic::Out),
            "jne" => Ok(Mnemonic::Jump(JumpKind::Jne)),
            "jg" => Ok(Mnemonic::Jump(JumpKind::Jg)),
            "jl" => Ok(Mnemonic::Jump(JumpKind::Jl)),
            "je" => Ok(Mnemonic::Jump(JumpKind::Je)),
            "jge" => Ok(Mnemonic::Jump(JumpKind::Jge)),
            "jle" => Ok(Mnemonic::Jump(JumpKind::Jle)),
            "jmp" => Ok(Mnemonic::Jump(JumpKind::Jmp)),
            "lbl" => Ok(Mnemonic::Lbl),
            "nop" => Ok(Mnemonic::Nop),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonic_names_round_trip() {
        for name in [
            "mov", "add", "sub", "and", "or", "xor", "shr", "shl", "not", "out", "jne", "jg",
            "jl", "je", "jge", "jle", "jmp", "lbl", "nop",
        ] {
            let mnemonic: Mnemonic = name.parse().unwrap();
            assert_eq!(mnemonic.to_string(), name);
        }
        assert!("MOV".parse::<Mnemonic>().is_err());
        assert!("inc".parse::<Mnemonic>().is_err());
    }

    #[test]
    fn from_tokens() {
        let line = AsmLine::from_tokens(4, "add  3 !4\t5").unwrap();
        assert_eq!(line.mnemonic, "add");
        assert_eq!(line.args, ["3", "!4", "5"]);
        assert_eq!(line.line_number, 4);
        assert_eq!(AsmLine::from_tokens(1, "   "), None);
    }
}
