use std::fmt::Display;

use crate::word::{Word, value};

impl Display for Word {
    /// A terse description listing only the fields that differ from a no-op.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_jump() {
            write!(f, "{}", self.jump)?;
            return match self.target {
                Some(target) => write!(f, " @{target}"),
                None => write!(f, " @?"),
            };
        }
        if *self == Word::default() {
            return write!(f, "nop");
        }

        let mut parts = Vec::new();
        if self.alu != Default::default() {
            let mut alu = format!("S={:04b}", self.alu.select & 0xF);
            if self.alu.mode {
                alu.push_str(" M");
            }
            if self.alu.polarity {
                alu.push_str(" P0");
            }
            parts.push(alu);
        }
        if self.shift != Default::default() {
            parts.push(format!("shift={:02b}", self.shift.bits()));
        }
        if self.input {
            parts.push("in".to_owned());
        }
        if self.value != value::NONE {
            parts.push(format!("v={:04b}", self.value & 0xF));
        }
        if self.immediate != 0 {
            parts.push(format!("#{}", self.immediate & 0xF));
        }
        if self.read_address != 0 {
            parts.push(format!("rd={}", self.read_address & 0xF));
        }
        if self.write_enable {
            parts.push(format!("wr={}", self.write_address & 0xF));
        } else if self.write_address != 0 {
            parts.push(format!("port={}", self.write_address & 0xF));
        }
        write!(f, "{}", parts.join(" "))
    }
}
