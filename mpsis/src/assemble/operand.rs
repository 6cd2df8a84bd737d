//! Classifies argument tokens into operands.

use std::fmt::Display;

use serde::Serialize;

use crate::assemble::LineError;

/// An instruction argument.
///
/// Magnitudes are kept as parsed; they are truncated to four bits
/// when they are placed into a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// A constant, written `!n`.
    Immediate(u32),
    /// A memory address, written as a bare number.
    Memory(u32),
    /// The external input port, written `in`.
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperandKind {
    Immediate,
    Memory,
    Input,
}

impl Operand {
    /// Classify a token. No range checks are made here:
    /// which magnitudes are valid depends on how the mnemonic uses the operand.
    pub fn classify(token: &str) -> Result<Operand, LineError> {
        let invalid = || LineError::InvalidOperand(token.to_owned());
        if let Some(constant) = token.strip_prefix('!') {
            magnitude(constant).map(Operand::Immediate).ok_or_else(invalid)
        } else if token == "in" {
            Ok(Operand::Input)
        } else {
            magnitude(token).map(Operand::Memory).ok_or_else(invalid)
        }
    }

    pub fn kind(self) -> OperandKind {
        match self {
            Operand::Immediate(_) => OperandKind::Immediate,
            Operand::Memory(_) => OperandKind::Memory,
            Operand::Input => OperandKind::Input,
        }
    }

    /// The magnitude truncated to four bits. The input port has none.
    pub fn nibble(self) -> u8 {
        match self {
            Operand::Immediate(n) | Operand::Memory(n) => (n & 0xF) as u8,
            Operand::Input => 0,
        }
    }
}

/// Read a run of decimal digits. Magnitudes of any length are accepted;
/// the value wraps, which keeps its low bits intact.
fn magnitude(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.bytes().fold(0u32, |n, digit| {
        n.wrapping_mul(10).wrapping_add(u32::from(digit - b'0'))
    }))
}

impl Display for OperandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperandKind::Immediate => write!(f, "constant"),
            OperandKind::Memory => write!(f, "address"),
            OperandKind::Input => write!(f, "input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify() {
        assert_eq!(Operand::classify("!5"), Ok(Operand::Immediate(5)));
        assert_eq!(Operand::classify("in"), Ok(Operand::Input));
        assert_eq!(Operand::classify("12"), Ok(Operand::Memory(12)));
        assert_eq!(Operand::classify("0"), Ok(Operand::Memory(0)));
    }

    #[test]
    fn out_of_range_is_not_rejected() {
        let operand = Operand::classify("!21").unwrap();
        assert_eq!(operand, Operand::Immediate(21));
        assert_eq!(operand.nibble(), 5);
        assert_eq!(Operand::classify("16").unwrap().nibble(), 0);
    }

    #[test]
    fn huge_magnitudes_keep_their_low_bits() {
        assert_eq!(Operand::classify("4294967297").unwrap().nibble(), 1);
        assert_eq!(Operand::classify("!99999999999").unwrap().nibble(), 15);
        assert_eq!(
            Operand::classify("!340282366920938463463374607431768211457")
                .unwrap()
                .nibble(),
            1
        );
    }

    #[test]
    fn invalid_tokens() {
        for token in ["!", "!x", "x", "IN", "-3", "!-1", "+5", "!+5", "1st", ""] {
            assert_eq!(
                Operand::classify(token),
                Err(LineError::InvalidOperand(token.to_owned())),
                "{token}"
            );
        }
    }
}
