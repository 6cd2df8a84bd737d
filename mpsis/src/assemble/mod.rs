use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    profile::Profile,
    word::{Word, info::LineInfo},
};

mod assembler;
mod loader;
mod lower;
mod operand;
mod parser;
mod syntax;

pub use assembler::{Assembler, JumpTarget};
pub use loader::{load_constant, shift_load, shift_step};
pub use lower::{Lowered, lower};
pub use operand::{Operand, OperandKind};
pub use parser::{parse, parse_line};
pub use syntax::{AsmLine, BinaryOp, Mnemonic, ShiftDirection};

/// One position of the assembled program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Slot {
    Word(Word),
    /// The line left by a `lbl` directive. It decodes to nothing.
    Placeholder(String),
}

#[derive(Debug)]
pub struct AssemblerOutput {
    pub profile: Profile,
    /// Each label's recorded position: the position following its `lbl` directive.
    pub labels: BTreeMap<String, usize>,
    pub slots: Vec<Slot>,
}

impl AssemblerOutput {
    /// The final value of the position counter.
    pub fn position(&self) -> usize {
        self.slots.len()
    }

    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Word(word) => Some(word),
            Slot::Placeholder(_) => None,
        })
    }

    /// The output lines: one bit string per position, with an empty line
    /// standing in for each label placeholder.
    pub fn lines(&self) -> Vec<String> {
        let layout = self.profile.layout();
        self.slots
            .iter()
            .map(|slot| match slot {
                Slot::Word(word) => word.encode(layout),
                Slot::Placeholder(_) => String::new(),
            })
            .collect()
    }

    pub fn info(&self) -> Vec<LineInfo> {
        self.slots
            .iter()
            .enumerate()
            .map(|(position, slot)| LineInfo::new(position, slot, self))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line_number}: {error}")]
pub struct AssemblerError {
    pub line_number: usize,
    pub error: LineError,
}

impl AssemblerError {
    /// The lines written to the output sink in place of the program.
    /// An unresolved label is named on a line before the terminal marker.
    pub fn marker_lines(&self) -> Vec<String> {
        match &self.error {
            LineError::LabelNotFound(label) => {
                vec![format!("Label '{label}' not found"), "Error".to_owned()]
            }
            _ => vec!["Error".to_owned()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error("{0}")]
    ParseError(String),
    #[error("unknown mnemonic `{0}`")]
    UnknownMnemonic(String),
    #[error("`{mnemonic}` takes {expected} argument(s), found {found}")]
    WrongArgumentCount {
        mnemonic: Mnemonic,
        expected: usize,
        found: usize,
    },
    #[error("`{mnemonic}` does not support {lhs} and {rhs} operands")]
    UnsupportedOperands {
        mnemonic: Mnemonic,
        lhs: OperandKind,
        rhs: OperandKind,
    },
    #[error("invalid operand `{0}`")]
    InvalidOperand(String),
    #[error("expected a memory address, found `{0}`")]
    ExpectedAddress(String),
    #[error("address 0 is reserved, found `{0}`")]
    ZeroAddress(String),
    #[error("shift amount must be 0 or 1, found `{0}`")]
    InvalidShiftAmount(String),
    #[error("label `{0}` not found")]
    LabelNotFound(String),
    #[error("jump target {0} does not fit in the target field")]
    TargetOutOfRange(i64),
}

/// Assemble a complete source text.
/// Lines are parsed and lowered in order, so the error reported is always
/// the one on the earliest failing line.
pub fn assemble(src: &str, profile: Profile) -> Result<AssemblerOutput, AssemblerError> {
    let mut assembler = Assembler::new(profile);
    for (index, text) in src.split('\n').enumerate() {
        if let Some(line) = parse_line(index + 1, text)? {
            assembler.add_line(&line)?;
        }
    }
    assembler.finish()
}
