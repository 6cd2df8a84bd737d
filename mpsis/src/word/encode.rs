use crate::{
    profile::{Field, Layout},
    word::Word,
};

impl Word {
    /// The raw value of one field, not yet truncated to the field's width.
    pub fn field(&self, field: Field) -> u32 {
        match field {
            Field::Jump => self.jump as u32,
            Field::Select => self.alu.select as u32,
            Field::Mode => self.alu.mode as u32,
            Field::Polarity => self.alu.polarity as u32,
            Field::Shift => self.shift.bits(),
            Field::Input => self.input as u32,
            Field::WriteEnable => self.write_enable as u32,
            Field::Value => self.value as u32,
            Field::Immediate => self.immediate as u32,
            Field::ReadAddress => self.read_address as u32,
            Field::WriteAddress => self.write_address as u32,
        }
    }

    /// Serialize this word as a string of `0` and `1` characters,
    /// concatenating the fields of the layout in order.
    ///
    /// A jump word omits its address fields; once its target is resolved
    /// the target takes their place, so a resolved jump word has the full width
    /// of the layout and an unresolved one is shorter.
    pub fn encode(&self, layout: &Layout) -> String {
        let mut bits = String::with_capacity(layout.width());
        if self.is_jump() {
            for &field in layout.head_fields() {
                push_bits(&mut bits, self.field(field), field.width());
            }
            if let Some(target) = self.target {
                push_bits(&mut bits, target as u32, layout.target_width());
            }
        } else {
            for &field in layout.fields {
                push_bits(&mut bits, self.field(field), field.width());
            }
        }
        bits
    }
}

/// Append the low `width` bits of `value`, most significant first.
fn push_bits(bits: &mut String, value: u32, width: usize) {
    for i in (0..width).rev() {
        bits.push(if value >> i & 1 == 1 { '1' } else { '0' });
    }
}
