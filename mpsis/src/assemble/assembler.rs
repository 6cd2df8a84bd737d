//! Assembles parsed lines into a program of micro-instruction words.
//!
//! The first pass lowers every line in order, recording label positions and
//! the jumps that reference them. Once the whole source has been read, the
//! second pass fills in the target of each recorded jump.

use std::collections::BTreeMap;

use log::{debug, trace};

use crate::{
    assemble::{
        AssemblerError, AssemblerOutput, LineError, Slot,
        lower::{Lowered, lower},
        syntax::AsmLine,
    },
    profile::{JumpAddressing, Profile},
};

/// The operand of a jump instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JumpTarget {
    Label(String),
    /// A raw offset from the jump word. Only layouts with relative jumps accept one.
    Offset(i32),
}

#[derive(Debug)]
struct PendingJump {
    line_number: usize,
    target: JumpTarget,
}

/// One assembly session: the program buffer, the symbol table,
/// and the jumps waiting for the backpatch pass.
#[derive(Debug)]
pub struct Assembler {
    profile: Profile,
    slots: Vec<Slot>,
    labels: BTreeMap<String, usize>,
    /// Keyed by the position of the jump word.
    pending: BTreeMap<usize, PendingJump>,
}

impl Assembler {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            slots: Vec::new(),
            labels: BTreeMap::new(),
            pending: BTreeMap::new(),
        }
    }

    /// The position the next emitted word will take.
    pub fn position(&self) -> usize {
        self.slots.len()
    }

    /// Lower one line and append its words to the program.
    pub fn add_line(&mut self, line: &AsmLine) -> Result<(), AssemblerError> {
        let lowered = lower(line, self.profile).map_err(|error| AssemblerError {
            line_number: line.line_number,
            error,
        })?;
        debug!(
            "line {}: `{} {}` at {} takes {} position(s)",
            line.line_number,
            line.mnemonic,
            line.args.join(" "),
            self.position(),
            lowered.positions()
        );

        match lowered {
            Lowered::Words(words) => {
                for word in words {
                    trace!("{}: {word}", self.position());
                    self.slots.push(Slot::Word(word));
                }
            }
            Lowered::Jump(word, target) => {
                trace!("{}: {word} -> {target:?}", self.position());
                self.pending.insert(
                    self.position(),
                    PendingJump {
                        line_number: line.line_number,
                        target,
                    },
                );
                self.slots.push(Slot::Word(word));
            }
            Lowered::Label(label) => {
                // The label names the instruction after its own placeholder.
                let position = self.position() + 1;
                if let Some(previous) = self.labels.insert(label.clone(), position) {
                    debug!("label {label} moved from {previous} to {position}");
                } else {
                    debug!("label {label} = {position}");
                }
                self.slots.push(Slot::Placeholder(label));
            }
        }
        Ok(())
    }

    /// Run the backpatch pass, resolving every pending jump.
    pub fn finish(mut self) -> Result<AssemblerOutput, AssemblerError> {
        debug!(
            "first pass done: {} position(s), {} label(s), {} jump(s)",
            self.position(),
            self.labels.len(),
            self.pending.len()
        );
        for (position, jump) in std::mem::take(&mut self.pending) {
            let target = self
                .resolve(position, &jump.target)
                .map_err(|error| AssemblerError {
                    line_number: jump.line_number,
                    error,
                })?;
            debug!("jump at {position} ({:?}) patched to {target}", jump.target);
            if let Some(Slot::Word(word)) = self.slots.get_mut(position) {
                word.target = Some(target);
            }
        }

        Ok(AssemblerOutput {
            profile: self.profile,
            labels: self.labels,
            slots: self.slots,
        })
    }

    /// Compute the raw bits of the target field for the jump at `position`.
    fn resolve(&self, position: usize, target: &JumpTarget) -> Result<u16, LineError> {
        let width = self.profile.layout().target_width();
        match self.profile.jump_addressing() {
            JumpAddressing::Absolute => {
                let resolved = match target {
                    JumpTarget::Label(label) => self.label(label)?,
                    // Absolute layouts never produce raw offsets; treat one as a position.
                    JumpTarget::Offset(offset) => *offset as i64,
                };
                let address = resolved - 1;
                if (0..1 << width).contains(&address) {
                    Ok(address as u16)
                } else {
                    Err(LineError::TargetOutOfRange(address))
                }
            }
            JumpAddressing::Relative => {
                let offset = match target {
                    JumpTarget::Label(label) => self.label(label)? - position as i64,
                    JumpTarget::Offset(offset) => *offset as i64,
                };
                let bound = 1 << (width - 1);
                if (-bound..bound).contains(&offset) {
                    Ok((offset & ((1 << width) - 1)) as u16)
                } else {
                    Err(LineError::TargetOutOfRange(offset))
                }
            }
        }
    }

    fn label(&self, label: &str) -> Result<i64, LineError> {
        self.labels
            .get(label)
            .map(|&position| position as i64)
            .ok_or_else(|| LineError::LabelNotFound(label.to_owned()))
    }
}
