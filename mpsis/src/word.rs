//! Defines the micro-instruction word emitted by the assembler.

use std::fmt::Display;

use num_derive::FromPrimitive;
use serde::Serialize;
use serde_repr::Serialize_repr;

mod decode;
mod display;
mod encode;
pub mod info;

/// The branch condition of a micro-instruction.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, FromPrimitive, Serialize_repr,
)]
#[repr(u8)]
pub enum JumpKind {
    /// No jump; the sequencer falls through to the next word.
    #[default]
    None,
    /// Jump if not equal.
    Jne,
    /// Jump if greater.
    Jg,
    /// Jump if less.
    Jl,
    /// Jump if equal.
    Je,
    /// Jump if greater or equal.
    Jge,
    /// Jump if less or equal.
    Jle,
    /// Jump unconditionally.
    Jmp,
}

impl JumpKind {
    pub const ALL: [JumpKind; 7] = [
        JumpKind::Jne,
        JumpKind::Jg,
        JumpKind::Jl,
        JumpKind::Je,
        JumpKind::Jge,
        JumpKind::Jle,
        JumpKind::Jmp,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            JumpKind::None => "",
            JumpKind::Jne => "jne",
            JumpKind::Jg => "jg",
            JumpKind::Jl => "jl",
            JumpKind::Je => "je",
            JumpKind::Jge => "jge",
            JumpKind::Jle => "jle",
            JumpKind::Jmp => "jmp",
        }
    }
}

impl Display for JumpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// Serial inputs of the constant shift register.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ShiftCtrl {
    /// `ISR`: the bit shifted in on a right shift. Encoded as the high bit.
    pub right_in: bool,
    /// `ISL`: the bit shifted in on a left shift. Encoded as the low bit.
    pub left_in: bool,
}

impl ShiftCtrl {
    pub fn bits(self) -> u32 {
        (self.right_in as u32) << 1 | self.left_in as u32
    }

    pub fn from_bits(bits: u32) -> ShiftCtrl {
        ShiftCtrl {
            right_in: bits & 0b10 != 0,
            left_in: bits & 0b01 != 0,
        }
    }
}

/// The ALU control lines of a word.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Alu {
    /// `S`, four bits.
    pub select: u8,
    /// `M`.
    pub mode: bool,
    /// `P0`, used by subtraction.
    pub polarity: bool,
}

impl Alu {
    pub const ADD: Alu = Alu::new(0b1001, true, false);
    pub const SUB: Alu = Alu::new(0b0110, true, true);
    pub const AND: Alu = Alu::new(0b0100, false, false);
    pub const OR: Alu = Alu::new(0b0001, false, false);
    pub const XOR: Alu = Alu::new(0b1001, false, false);
    /// Pass operand B (the shift register) through unchanged.
    pub const PASS_B: Alu = Alu::new(0b0101, false, false);
    /// Complement of operand B.
    pub const NOT_B: Alu = Alu::new(0b1010, false, false);
    /// Complement of operand A.
    pub const NOT_A: Alu = Alu::new(0b1111, false, false);

    pub const fn new(select: u8, mode: bool, polarity: bool) -> Alu {
        Alu {
            select,
            mode,
            polarity,
        }
    }
}

/// Codes of the value-select field.
pub mod value {
    pub const NONE: u8 = 0b0000;
    /// Commit the ALU result. Without a write, latches the read address into the accumulator.
    pub const ALU: u8 = 0b0001;
    /// Shift register, shifting left. Also clocks one bit of a serial constant load.
    pub const SHIFT_LEFT: u8 = 0b0010;
    pub const SHIFT_RIGHT: u8 = 0b0100;
    /// ALU result with operand B from the secondary register.
    /// Without a write, latches the read address into the secondary register.
    pub const ALU_SECONDARY: u8 = 0b0110;
    /// ALU result with operand B from the input port.
    pub const ALU_INPUT: u8 = 0b0111;
    /// Drive an output port from the ALU.
    pub const OUT_ALU: u8 = 0b1000;
    /// Drive an output port directly from the input port or memory.
    pub const OUT_DIRECT: u8 = 0b1001;

    /// The bits of the value select owned by the shift register
    /// while a constant is being loaded.
    pub const SHIFT_MODE_MASK: u8 = 0b0110;
    /// The value select of a constant-loading cycle.
    pub const CONSTANT_LOAD: u8 = SHIFT_LEFT;
}

/// One micro-instruction.
///
/// The default word is a pure no-op: no jump, no write, no ALU effect.
/// Field values wider than their field are truncated on encoding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Word {
    pub jump: JumpKind,
    pub alu: Alu,
    pub shift: ShiftCtrl,
    /// Read the external input port this cycle.
    pub input: bool,
    pub write_enable: bool,
    /// See [value].
    pub value: u8,
    /// Parallel constant. Ignored by layouts without an immediate field.
    pub immediate: u8,
    /// Memory address read this cycle (0 = unused).
    pub read_address: u8,
    /// Memory address (or output port) written this cycle (0 = unused).
    pub write_address: u8,
    /// The branch target of a jump word, already encoded as the raw bits
    /// of the layout's target field. `None` until the backpatch pass.
    pub target: Option<u16>,
}

impl Word {
    /// A jump word with an unresolved target.
    /// Its address fields stay unset since their bits will carry the target.
    pub fn jump(kind: JumpKind) -> Word {
        Word {
            jump: kind,
            ..Word::default()
        }
    }

    pub fn is_jump(&self) -> bool {
        self.jump != JumpKind::None
    }
}
