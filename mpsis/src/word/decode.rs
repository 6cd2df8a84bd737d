use num_traits::FromPrimitive;

use crate::{
    profile::{Field, Layout},
    word::{JumpKind, ShiftCtrl, Word},
};

impl Word {
    /// Attempt to decode a bit string produced by [Word::encode] with the same layout.
    /// Unresolved jump words (without their target bits) are accepted.
    /// If the string has the wrong length or contains anything but `0` and `1`, return `None`.
    pub fn decode(bits: &str, layout: &Layout) -> Option<Word> {
        if !bits.bytes().all(|b| b == b'0' || b == b'1') {
            return None;
        }

        let mut word = Word::default();
        let mut offset = 0;
        for &field in layout.head_fields() {
            word.set_field(field, read_bits(bits, &mut offset, field.width())?)?;
        }

        if word.is_jump() {
            // The address bits of a jump word carry its target, if it has one yet.
            match bits.len() - offset {
                0 => {}
                width if width == layout.target_width() => {
                    word.target = Some(read_bits(bits, &mut offset, width)? as u16);
                }
                _ => return None,
            }
        } else {
            for &field in layout.target_fields {
                word.set_field(field, read_bits(bits, &mut offset, field.width())?)?;
            }
            if offset != bits.len() {
                return None;
            }
        }
        Some(word)
    }

    /// Set one field from its raw value.
    /// Returns `None` if the value does not name a valid jump kind.
    pub fn set_field(&mut self, field: Field, value: u32) -> Option<()> {
        match field {
            Field::Jump => self.jump = JumpKind::from_u32(value)?,
            Field::Select => self.alu.select = value as u8,
            Field::Mode => self.alu.mode = value != 0,
            Field::Polarity => self.alu.polarity = value != 0,
            Field::Shift => self.shift = ShiftCtrl::from_bits(value),
            Field::Input => self.input = value != 0,
            Field::WriteEnable => self.write_enable = value != 0,
            Field::Value => self.value = value as u8,
            Field::Immediate => self.immediate = value as u8,
            Field::ReadAddress => self.read_address = value as u8,
            Field::WriteAddress => self.write_address = value as u8,
        }
        Some(())
    }
}

fn read_bits(bits: &str, offset: &mut usize, width: usize) -> Option<u32> {
    let slice = bits.get(*offset..*offset + width)?;
    *offset += width;
    u32::from_str_radix(slice, 2).ok()
}

#[cfg(test)]
mod tests {
    use crate::{
        profile::Profile,
        word::{Alu, JumpKind, ShiftCtrl, Word, value},
    };

    #[test]
    fn round_trip() {
        let word = Word {
            alu: Alu::SUB,
            shift: ShiftCtrl {
                right_in: false,
                left_in: true,
            },
            write_enable: true,
            value: value::ALU_SECONDARY,
            read_address: 7,
            write_address: 9,
            ..Word::default()
        };
        for profile in [Profile::Label25, Profile::Wide29] {
            let layout = profile.layout();
            assert_eq!(Word::decode(&word.encode(layout), layout), Some(word));
        }
    }

    #[test]
    fn immediate_only_in_wide_layout() {
        let word = Word {
            immediate: 0b1011,
            ..Word::default()
        };
        let wide = Profile::Wide29.layout();
        assert_eq!(Word::decode(&word.encode(wide), wide), Some(word));
        let narrow = Profile::Label25.layout();
        assert_eq!(
            Word::decode(&word.encode(narrow), narrow),
            Some(Word::default())
        );
    }

    #[test]
    fn jump_words() {
        let layout = Profile::Label25.layout();
        let mut word = Word::jump(JumpKind::Jl);
        assert_eq!(Word::decode(&word.encode(layout), layout), Some(word));
        word.target = Some(200);
        assert_eq!(Word::decode(&word.encode(layout), layout), Some(word));
    }

    #[test]
    fn rejects_malformed() {
        let layout = Profile::Label25.layout();
        assert_eq!(Word::decode("", layout), None);
        assert_eq!(Word::decode("0000", layout), None);
        assert_eq!(Word::decode(&"0".repeat(26), layout), None);
        assert_eq!(Word::decode(&"2".repeat(25), layout), None);
        assert_eq!(Word::decode(&format!("111{}", "0".repeat(15)), layout), None);
    }
}
