//! Bit layouts of a micro-instruction word.
//!
//! The processor exists in two revisions with different word formats.
//! A [Profile] names one of them and decides how the assembler lowers
//! constants and jump targets for it.

use std::{fmt::Display, str::FromStr};

use serde::Serialize;

/// A single bitfield of a micro-instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    /// Branch condition.
    Jump,
    /// ALU operation selector `S`.
    Select,
    /// ALU mode bit `M`.
    Mode,
    /// Operand polarity bit `P0`.
    Polarity,
    /// Shift register serial inputs `ISR`, `ISL`.
    Shift,
    /// Read the external input port (`A`).
    Input,
    /// Commit a result to memory.
    WriteEnable,
    /// Which functional unit output feeds the write.
    Value,
    /// Parallel constant bus. Only present in [Profile::Wide29].
    Immediate,
    ReadAddress,
    WriteAddress,
}

impl Field {
    pub const fn width(self) -> usize {
        match self {
            Field::Jump => 3,
            Field::Select => 4,
            Field::Mode => 1,
            Field::Polarity => 1,
            Field::Shift => 2,
            Field::Input => 1,
            Field::WriteEnable => 1,
            Field::Value => 4,
            Field::Immediate => 4,
            Field::ReadAddress => 4,
            Field::WriteAddress => 4,
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Jump => write!(f, "jump"),
            Field::Select => write!(f, "S"),
            Field::Mode => write!(f, "M"),
            Field::Polarity => write!(f, "P0"),
            Field::Shift => write!(f, "shift"),
            Field::Input => write!(f, "A"),
            Field::WriteEnable => write!(f, "wr"),
            Field::Value => write!(f, "v"),
            Field::Immediate => write!(f, "imm"),
            Field::ReadAddress => write!(f, "rd"),
            Field::WriteAddress => write!(f, "wa"),
        }
    }
}

/// The order of fields in a serialized word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// All fields, most significant first.
    pub fields: &'static [Field],
    /// The trailing fields whose bits carry the branch target of a jump word.
    /// Must be a suffix of `fields`.
    pub target_fields: &'static [Field],
}

impl Layout {
    /// Total width of a fully encoded word.
    pub fn width(&self) -> usize {
        self.fields.iter().map(|field| field.width()).sum()
    }

    pub fn target_width(&self) -> usize {
        self.target_fields.iter().map(|field| field.width()).sum()
    }

    /// The fields a jump word carries before its branch target.
    pub fn head_fields(&self) -> &'static [Field] {
        &self.fields[..self.fields.len() - self.target_fields.len()]
    }
}

const LABEL25: Layout = Layout {
    fields: &[
        Field::Jump,
        Field::Select,
        Field::Mode,
        Field::Polarity,
        Field::Shift,
        Field::Input,
        Field::WriteEnable,
        Field::Value,
        Field::ReadAddress,
        Field::WriteAddress,
    ],
    target_fields: &[Field::ReadAddress, Field::WriteAddress],
};

const WIDE29: Layout = Layout {
    fields: &[
        Field::Jump,
        Field::Select,
        Field::Mode,
        Field::Polarity,
        Field::Shift,
        Field::Input,
        Field::WriteEnable,
        Field::Value,
        Field::Immediate,
        Field::ReadAddress,
        Field::WriteAddress,
    ],
    target_fields: &[Field::Immediate, Field::ReadAddress, Field::WriteAddress],
};

/// How a 4-bit constant reaches the datapath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantLoading {
    /// One bit per cycle through the shift register; four words per constant.
    Serial,
    /// Through the immediate field of the word that uses it.
    Parallel,
}

/// How a jump word's target field is interpreted by the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpAddressing {
    /// The target field holds an unsigned word position.
    Absolute,
    /// The target field holds a two's-complement offset from the jump word.
    /// Numeric jump operands are taken as raw offsets.
    Relative,
}

/// A supported word format.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// The 25-bit format with symbolic labels and serial constants.
    #[default]
    Label25,
    /// The 29-bit format with a parallel immediate bus and relative jumps.
    Wide29,
}

impl Profile {
    pub fn layout(self) -> &'static Layout {
        match self {
            Profile::Label25 => &LABEL25,
            Profile::Wide29 => &WIDE29,
        }
    }

    pub fn constant_loading(self) -> ConstantLoading {
        match self {
            Profile::Label25 => ConstantLoading::Serial,
            Profile::Wide29 => ConstantLoading::Parallel,
        }
    }

    pub fn jump_addressing(self) -> JumpAddressing {
        match self {
            Profile::Label25 => JumpAddressing::Absolute,
            Profile::Wide29 => JumpAddressing::Relative,
        }
    }

    pub fn width(self) -> usize {
        self.layout().width()
    }
}

impl Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Profile::Label25 => write!(f, "label25"),
            Profile::Wide29 => write!(f, "wide29"),
        }
    }
}

impl FromStr for Profile {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "label25" | "LABEL25" | "" => Ok(Profile::Label25),
            "wide29" | "WIDE29" => Ok(Profile::Wide29),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(Profile::Label25.width(), 25);
        assert_eq!(Profile::Wide29.width(), 29);
        assert_eq!(Profile::Label25.layout().target_width(), 8);
        assert_eq!(Profile::Wide29.layout().target_width(), 12);
    }

    #[test]
    fn target_fields_are_a_suffix() {
        for profile in [Profile::Label25, Profile::Wide29] {
            let layout = profile.layout();
            assert!(layout.fields.ends_with(layout.target_fields));
            assert_eq!(
                layout.head_fields().len() + layout.target_fields.len(),
                layout.fields.len()
            );
        }
    }

    #[test]
    fn parse_names() {
        assert_eq!("wide29".parse(), Ok(Profile::Wide29));
        assert_eq!("label25".parse(), Ok(Profile::Label25));
        assert_eq!("bogus".parse::<Profile>(), Err(()));
        assert_eq!(Profile::Wide29.to_string(), "wide29");
    }
}
