use serde::Serialize;

use crate::{
    assemble::{AssemblerOutput, Slot},
    word::Word,
};

/// Information about one line of assembled output.
#[derive(Debug, Serialize)]
pub struct LineInfo {
    /// The position of this line in the program.
    pub position: usize,
    /// The encoded bit string; empty for a label placeholder.
    pub bits: String,
    /// The decoded word, if this line holds one.
    pub word: Option<Word>,
    /// A human-readable summary of the word.
    pub summary: String,
}

impl LineInfo {
    pub fn new(position: usize, slot: &Slot, assembled: &AssemblerOutput) -> Self {
        match slot {
            Slot::Word(word) => LineInfo {
                position,
                bits: word.encode(assembled.profile.layout()),
                word: Some(*word),
                summary: word.to_string(),
            },
            Slot::Placeholder(label) => LineInfo {
                position,
                bits: String::new(),
                word: None,
                summary: format!("{label}:"),
            },
        }
    }
}
