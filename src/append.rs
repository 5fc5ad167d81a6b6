//! Append Engine (spec §4.2): the only code path that pushes words onto a
//! set's word array. Every other mutator — `add`, `remove`, the binary
//! operation engine, range fill/clear — goes through these two methods, which
//! is what keeps the canonicalization invariants (spec §3) true without
//! every caller having to re-derive them.

use tracing::trace;

use crate::constants::*;
use crate::set::ConciseSet;
use crate::word::*;

const BLOCK_MASK: u32 = 0x7FFF_FFFF;

impl ConciseSet {
    /// Append a literal word (high bit set). Merges it into the previous
    /// word when doing so keeps the array canonical, otherwise pushes a new
    /// word.
    pub(crate) fn append_literal(&mut self, literal: u32) {
        debug_assert!(is_literal(literal));
        trace!(target: "concise", literal, "append_literal");
        self.mod_count += 1;

        let Some(&prev) = self.words.last() else {
            self.words.push(literal);
            return;
        };

        if literal == ALL_ZEROS_LITERAL {
            if prev == ALL_ZEROS_LITERAL {
                *self.words.last_mut().unwrap() = make_sequence(false, 0, 1);
                return;
            }
            if is_zero_sequence(prev) && sequence_has_no_flip(prev) {
                if let Some(bumped) = bump_count(prev) {
                    *self.words.last_mut().unwrap() = bumped;
                    return;
                }
            } else if !self.simulate_wah && is_literal(prev) && literal_popcount(prev) == 1 {
                let bit = literal_bits(prev).trailing_zeros();
                *self.words.last_mut().unwrap() =
                    make_sequence(false, make_flip_field(bit), 1);
                return;
            }
        } else if literal == ALL_ONES_LITERAL {
            if prev == ALL_ONES_LITERAL {
                *self.words.last_mut().unwrap() = make_sequence(true, 0, 1);
                return;
            }
            if is_one_sequence(prev) && sequence_has_no_flip(prev) {
                if let Some(bumped) = bump_count(prev) {
                    *self.words.last_mut().unwrap() = bumped;
                    return;
                }
            } else if !self.simulate_wah && is_literal(prev) {
                let missing = (!literal_bits(prev)) & BLOCK_MASK;
                if missing.count_ones() == 1 {
                    let bit = missing.trailing_zeros();
                    *self.words.last_mut().unwrap() =
                        make_sequence(true, make_flip_field(bit), 1);
                    return;
                }
            }
        }

        self.words.push(literal);
    }

    /// Append a run of `length` identical blocks, all zero (`one_fill =
    /// false`) or all one (`one_fill = true`). `length` must be at least 1.
    pub(crate) fn append_fill(&mut self, length: u32, one_fill: bool) {
        debug_assert!(length >= 1);
        trace!(target: "concise", length, one_fill, "append_fill");
        if length == 1 {
            self.append_literal(saturating_literal(one_fill));
            return;
        }

        self.mod_count += 1;

        let Some(&prev) = self.words.last() else {
            self.push_fill_word(one_fill, 0, length - 1);
            return;
        };

        if prev == saturating_literal(one_fill) {
            // prev already contributes one uniform block; the merged run
            // spans `length` more, so its count field is `length`, not
            // `length - 1` (that would undercount prev's own block).
            self.set_last_as_merged_run(one_fill, 0, length);
            return;
        }

        if !self.simulate_wah && is_literal(prev) {
            let promoted = if one_fill {
                let missing = (!literal_bits(prev)) & BLOCK_MASK;
                (missing.count_ones() == 1).then(|| missing.trailing_zeros())
            } else {
                (literal_popcount(prev) == 1).then(|| literal_bits(prev).trailing_zeros())
            };
            if let Some(bit) = promoted {
                self.set_last_as_merged_run(one_fill, make_flip_field(bit), length);
                return;
            }
        }

        let same_type = if one_fill {
            is_one_sequence(prev)
        } else {
            is_zero_sequence(prev)
        };
        if same_type && sequence_has_no_flip(prev) {
            let remaining = self.bump_sequence_by(length);
            if remaining > 0 {
                self.push_fill_word(one_fill, 0, remaining - 1);
            }
            return;
        }

        self.push_fill_word(one_fill, 0, length - 1);
    }

    /// Replace the trailing word (already absorbed as the run's first
    /// block) with a sequence whose count covers `length` further blocks,
    /// splitting into extra plain-fill words if `length` overflows the
    /// 25-bit count field.
    fn set_last_as_merged_run(&mut self, one_fill: bool, flip_field: u32, length: u32) {
        if length <= MAX_SEQUENCE_COUNT {
            *self.words.last_mut().unwrap() = make_sequence(one_fill, flip_field, length);
        } else {
            *self.words.last_mut().unwrap() =
                make_sequence(one_fill, flip_field, MAX_SEQUENCE_COUNT);
            let remaining = length - MAX_SEQUENCE_COUNT;
            self.push_fill_word(one_fill, 0, remaining - 1);
        }
    }

    /// Push additional whole sequence words for an over-long run, splitting
    /// at the 25-bit count boundary as many times as needed.
    fn push_fill_word(&mut self, one_fill: bool, flip_field: u32, mut count: u32) {
        while count > MAX_SEQUENCE_COUNT {
            self.words
                .push(make_sequence(one_fill, flip_field, MAX_SEQUENCE_COUNT));
            count -= MAX_SEQUENCE_COUNT + 1;
        }
        self.words.push(make_sequence(one_fill, flip_field, count));
    }

    /// Add `length` blocks to the count of the trailing no-flip sequence,
    /// returning however many blocks didn't fit and still need a fresh word.
    fn bump_sequence_by(&mut self, length: u32) -> u32 {
        let prev = *self.words.last().unwrap();
        let one_fill = is_one_sequence(prev);
        let room = MAX_SEQUENCE_COUNT - sequence_count(prev);
        if length <= room {
            *self.words.last_mut().unwrap() = make_sequence(
                one_fill,
                0,
                sequence_count(prev) + length,
            );
            0
        } else {
            *self.words.last_mut().unwrap() = make_sequence(one_fill, 0, MAX_SEQUENCE_COUNT);
            length - room
        }
    }
}

/// Increment a no-flip sequence's count by one, returning `None` if the
/// 25-bit count field would overflow (the caller then falls through to
/// pushing a fresh word).
fn bump_count(word: u32) -> Option<u32> {
    let count = sequence_count(word);
    if count >= MAX_SEQUENCE_COUNT {
        return None;
    }
    Some(word + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::{sequence_count, sequence_popcount};

    fn words_of(build: impl FnOnce(&mut ConciseSet)) -> Vec<u32> {
        let mut set = ConciseSet::new();
        build(&mut set);
        set.words
    }

    #[test]
    fn two_zero_literals_merge_into_sequence() {
        let words = words_of(|s| {
            s.append_literal(ALL_ZEROS_LITERAL);
            s.append_literal(ALL_ZEROS_LITERAL);
        });
        assert_eq!(words, vec![make_sequence(false, 0, 1)]);
    }

    #[test]
    fn single_bit_literal_then_zero_literal_promotes_to_flip_sequence() {
        let words = words_of(|s| {
            s.append_literal(ALL_ZEROS_LITERAL | (1 << 9));
            s.append_literal(ALL_ZEROS_LITERAL);
        });
        assert_eq!(words, vec![make_sequence(false, make_flip_field(9), 1)]);
    }

    #[test]
    fn wah_mode_never_promotes_single_bit_literal() {
        let mut set = ConciseSet::new_wah();
        set.append_literal(ALL_ZEROS_LITERAL | (1 << 9));
        set.append_literal(ALL_ZEROS_LITERAL);
        assert_eq!(set.words, vec![ALL_ZEROS_LITERAL | (1 << 9), ALL_ZEROS_LITERAL]);
    }

    #[test]
    fn append_fill_merges_into_matching_sequence() {
        let words = words_of(|s| {
            s.append_fill(5, false);
            s.append_fill(3, false);
        });
        assert_eq!(words, vec![make_sequence(false, 0, 7)]);
    }

    #[test]
    fn saturating_literal_then_fill_counts_the_literal_block() {
        let words = words_of(|s| {
            s.append_literal(ALL_ZEROS_LITERAL);
            s.append_fill(3, false);
        });
        // 1 block from the literal + 3 new blocks = 4 blocks total, count = 3.
        assert_eq!(words, vec![make_sequence(false, 0, 3)]);
    }

    #[test]
    fn single_bit_literal_then_fill_promotes_and_counts_the_literal_block() {
        let words = words_of(|s| {
            s.append_literal(ALL_ZEROS_LITERAL | (1 << 4));
            s.append_fill(3, false);
        });
        assert_eq!(words, vec![make_sequence(false, make_flip_field(4), 3)]);
    }

    #[test]
    fn append_fill_splits_when_count_overflows() {
        let words = words_of(|s| {
            s.append_fill(MAX_SEQUENCE_COUNT + 5, false);
        });
        assert_eq!(words.len(), 2);
        assert_eq!(sequence_count(words[0]), MAX_SEQUENCE_COUNT);
        assert_eq!(sequence_count(words[1]), 3);
    }

    #[test]
    fn sequence_popcount_consistent_with_appended_run() {
        let words = words_of(|s| s.append_fill(40, true));
        assert_eq!(words.len(), 1);
        assert_eq!(sequence_popcount(words[0]), 40 * BLOCK_BITS as u64);
    }
}
