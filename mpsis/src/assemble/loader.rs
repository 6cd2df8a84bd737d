//! Loads 4-bit constants into the datapath.
//!
//! There is no parallel immediate bus in the 25-bit processor, so a constant
//! enters one bit per cycle through the shift register. The last of the four
//! cycles also performs the operation that consumes the constant.

use crate::{
    profile::{ConstantLoading, Profile},
    word::{ShiftCtrl, Word, value},
};

/// Emit the words that bring `constant` into the datapath for `word`,
/// in the way the profile's hardware accepts constants.
pub fn load_constant(profile: Profile, constant: u8, word: Word) -> Vec<Word> {
    match profile.constant_loading() {
        ConstantLoading::Serial => shift_load(constant, word),
        ConstantLoading::Parallel => vec![Word {
            immediate: constant & 0xF,
            value: with_shift_mode(word.value, value::CONSTANT_LOAD),
            ..word
        }],
    }
}

/// Shift `constant` in most significant bit first, replacing the fourth
/// shift step with `word`. Always four words.
pub fn shift_load(constant: u8, word: Word) -> Vec<Word> {
    let mut words = (0..4)
        .rev()
        .map(|bit| shift_step((constant >> bit) & 1 == 1))
        .collect::<Vec<_>>();
    if let Some(last) = words.last_mut() {
        *last = Word {
            shift: last.shift,
            value: with_shift_mode(word.value, last.value),
            ..word
        };
    }
    words
}

/// One cycle of a serial constant load, shifting `bit` in from the right.
/// The value select `0010` is what clocks the shift register on that cycle.
pub fn shift_step(bit: bool) -> Word {
    Word {
        shift: ShiftCtrl {
            right_in: bit,
            left_in: false,
        },
        value: value::CONSTANT_LOAD,
        ..Word::default()
    }
}

/// Replace the shift-register bits of a value select.
fn with_shift_mode(value: u8, mode: u8) -> u8 {
    (value & !value::SHIFT_MODE_MASK) | (mode & value::SHIFT_MODE_MASK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::Alu;

    fn bits(words: &[Word]) -> Vec<bool> {
        words.iter().map(|word| word.shift.right_in).collect()
    }

    #[test]
    fn most_significant_bit_first() {
        let words = shift_load(0b0101, Word::default());
        assert_eq!(bits(&words), [false, true, false, true]);
        let words = shift_load(0b1100, Word::default());
        assert_eq!(bits(&words), [true, true, false, false]);
    }

    #[test]
    fn only_the_last_step_is_fused() {
        let word = Word {
            alu: Alu::ADD,
            write_enable: true,
            value: value::ALU,
            read_address: 2,
            write_address: 7,
            ..Word::default()
        };
        let words = shift_load(9, word);
        assert_eq!(words.len(), 4);
        assert_eq!(&words[..3], &[shift_step(true), shift_step(false), shift_step(false)]);
        assert_eq!(
            words[3],
            Word {
                shift: ShiftCtrl {
                    right_in: true,
                    left_in: false
                },
                value: 0b0011,
                ..word
            }
        );
    }

    #[test]
    fn step_words_only_clock_the_shift_register() {
        for bit in [false, true] {
            let step = shift_step(bit);
            assert_eq!(step.value, 0b0010);
            assert_eq!(step.shift.right_in, bit);
            assert_eq!(
                step,
                Word {
                    shift: step.shift,
                    value: step.value,
                    ..Word::default()
                }
            );
        }
    }

    #[test]
    fn fused_word_keeps_outer_value_bits() {
        let word = Word {
            value: value::OUT_ALU,
            ..Word::default()
        };
        assert_eq!(shift_load(0, word)[3].value, 0b1010);
        assert_eq!(shift_load(0, Word::default())[3].value, value::CONSTANT_LOAD);
    }

    #[test]
    fn same_constant_same_prefix() {
        for constant in 0..16 {
            let a = shift_load(constant, Word::default());
            let b = shift_load(
                constant,
                Word {
                    alu: Alu::NOT_B,
                    write_enable: true,
                    write_address: 4,
                    ..Word::default()
                },
            );
            assert_eq!(a[..3], b[..3]);
            assert_eq!(a[3].shift, b[3].shift);
        }
    }

    #[test]
    fn high_bits_are_ignored() {
        assert_eq!(shift_load(0x15, Word::default()), shift_load(5, Word::default()));
    }

    #[test]
    fn parallel_load() {
        let word = Word {
            alu: Alu::PASS_B,
            write_enable: true,
            write_address: 3,
            ..Word::default()
        };
        let words = load_constant(Profile::Wide29, 0x1B, word);
        assert_eq!(
            words,
            [Word {
                immediate: 0xB,
                value: value::CONSTANT_LOAD,
                ..word
            }]
        );
        assert_eq!(load_constant(Profile::Label25, 0xB, word).len(), 4);
    }
}
