//! The CONCISE set itself (spec §3, §4.5, §6): a word array plus the cached
//! bookkeeping (`last`, `size`, `mod_count`) that makes membership, sizing
//! and iteration cheap without re-decoding the whole array on every call.

use std::cell::Cell;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::constants::*;
use crate::cursor::{CursorEvent, ReverseWordCursor};
use crate::error::{ConciseError, Result};
use crate::iter::{Iter, RevIter};
use crate::ops::{self, Operator};
use crate::word::*;

/// A CONCISE compressed set of non-negative integers in `[0, MAX_ELEMENT]`.
///
/// Every public method that can observe an invalid element (out of range, out
/// of bounds) returns a [`crate::error::ConciseError`] rather than panicking;
/// everything else is infallible.
#[derive(Clone)]
pub struct ConciseSet {
    pub(crate) words: Vec<u32>,
    /// Highest element present, or `-1` when empty. Eagerly maintained by
    /// every mutator so that `last()` never needs to decode anything.
    pub(crate) last: i32,
    /// Lazily-computed cardinality; `-1` means "needs recomputing". A `Cell`
    /// because `len()` is a non-structural read (spec §5) and must stay
    /// callable through `&self`.
    pub(crate) size_cache: Cell<i64>,
    pub(crate) simulate_wah: bool,
    /// Bumped on every structural mutation; iterators capture it at creation
    /// and compare on every step to fail fast (spec §4.6).
    pub(crate) mod_count: u64,
}

impl ConciseSet {
    pub fn new() -> Self {
        Self::new_with_mode(false)
    }

    /// A set that never produces flip-carrying sequences, trading a little
    /// compression for WAH wire compatibility.
    pub fn new_wah() -> Self {
        Self::new_with_mode(true)
    }

    fn new_with_mode(simulate_wah: bool) -> Self {
        ConciseSet {
            words: Vec::new(),
            last: -1,
            size_cache: Cell::new(0),
            simulate_wah,
            mod_count: 0,
        }
    }

    pub(crate) fn empty_like(other: &ConciseSet) -> ConciseSet {
        Self::new_with_mode(other.simulate_wah)
    }

    #[inline]
    pub fn is_wah(&self) -> bool {
        self.simulate_wah
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of elements. Cached after the first call; invalidated by every
    /// mutator.
    pub fn len(&self) -> usize {
        let cached = self.size_cache.get();
        if cached >= 0 {
            return cached as usize;
        }
        let computed = self.compute_len();
        self.size_cache.set(computed as i64);
        computed
    }

    fn compute_len(&self) -> usize {
        self.words
            .iter()
            .map(|&w| {
                if is_literal(w) {
                    literal_popcount(w) as u64
                } else {
                    sequence_popcount(w)
                }
            })
            .sum::<u64>() as usize
    }

    pub fn first(&self) -> Result<i32> {
        if self.is_empty() {
            return Err(ConciseError::no_such_element());
        }
        match self.iter().next() {
            Some(Ok(v)) => Ok(v),
            Some(Err(e)) => Err(e),
            None => unreachable!("a non-empty set always has a first element"),
        }
    }

    pub fn last(&self) -> Result<i32> {
        if self.is_empty() {
            Err(ConciseError::no_such_element())
        } else {
            Ok(self.last)
        }
    }

    fn validate_domain(&self, e: i32) -> Result<()> {
        if e < 0 || e > MAX_ELEMENT {
            return Err(ConciseError::out_of_range(e as i64, MAX_ELEMENT));
        }
        Ok(())
    }

    /// Does this set contain `e`? A plain forward scan summing block widths,
    /// mirroring `contains` in spec §4.5.
    pub fn contains(&self, e: i32) -> Result<bool> {
        self.validate_domain(e)?;
        if self.is_empty() || e > self.last {
            return Ok(false);
        }
        let mut block = e as u32 / BLOCK_BITS;
        let bit = e as u32 % BLOCK_BITS;
        for &w in &self.words {
            if is_literal(w) {
                if block == 0 {
                    return Ok(literal_bits(w) & (1 << bit) != 0);
                }
                block -= 1;
            } else {
                let blocks = sequence_blocks(w);
                if block == 0 {
                    let first = first_block_as_literal(w);
                    return Ok(literal_bits(first) & (1 << bit) != 0);
                } else if block < blocks {
                    return Ok(is_one_sequence(w));
                } else {
                    block -= blocks;
                }
            }
        }
        Ok(false)
    }

    /// The `index`-th smallest element (0-based).
    pub fn get(&self, index: usize) -> Result<i32> {
        let n = self.len();
        if index >= n {
            return Err(ConciseError::index_out_of_range(index, n));
        }
        let mut remaining = index as u64;
        let mut block_base: i64 = 0;
        for &w in &self.words {
            if is_literal(w) {
                let bits = literal_bits(w);
                let pc = bits.count_ones() as u64;
                if remaining < pc {
                    return Ok((block_base + nth_set_bit(bits, remaining as u32) as i64) as i32);
                }
                remaining -= pc;
                block_base += BLOCK_BITS as i64;
            } else {
                let blocks = sequence_blocks(w);
                let first = first_block_as_literal(w);
                let first_bits = literal_bits(first);
                let first_pc = first_bits.count_ones() as u64;
                if remaining < first_pc {
                    return Ok((block_base + nth_set_bit(first_bits, remaining as u32) as i64) as i32);
                }
                remaining -= first_pc;
                block_base += BLOCK_BITS as i64;
                let interior_blocks = (blocks - 1) as u64;
                if is_one_sequence(w) {
                    let interior_total = interior_blocks * BLOCK_BITS as u64;
                    if remaining < interior_total {
                        return Ok((block_base + remaining as i64) as i32);
                    }
                    remaining -= interior_total;
                }
                block_base += interior_blocks as i64 * BLOCK_BITS as i64;
            }
        }
        unreachable!("index < len() but no block accounted for it")
    }

    /// The position of `e` among this set's elements, or `None` if absent.
    pub fn index_of(&self, e: i32) -> Result<Option<usize>> {
        self.validate_domain(e)?;
        if self.is_empty() || e > self.last {
            return Ok(None);
        }
        let target_block = e as u32 / BLOCK_BITS;
        let bit = e as u32 % BLOCK_BITS;
        let mut block = target_block;
        let mut count: u64 = 0;
        for &w in &self.words {
            if is_literal(w) {
                if block == 0 {
                    let bits = literal_bits(w);
                    if bits & (1 << bit) == 0 {
                        return Ok(None);
                    }
                    let before = (bits & ((1u32 << bit) - 1)).count_ones() as u64;
                    return Ok(Some((count + before) as usize));
                }
                count += literal_popcount(w) as u64;
                block -= 1;
            } else {
                let blocks = sequence_blocks(w);
                if block == 0 {
                    let first = first_block_as_literal(w);
                    let bits = literal_bits(first);
                    if bits & (1 << bit) == 0 {
                        return Ok(None);
                    }
                    let before = (bits & ((1u32 << bit) - 1)).count_ones() as u64;
                    return Ok(Some((count + before) as usize));
                } else if block < blocks {
                    if !is_one_sequence(w) {
                        return Ok(None);
                    }
                    let first = first_block_as_literal(w);
                    count += literal_popcount(first) as u64
                        + (block as u64 - 1) * BLOCK_BITS as u64
                        + bit as u64;
                    return Ok(Some(count as usize));
                } else {
                    count += sequence_popcount(w);
                    block -= blocks;
                }
            }
        }
        Ok(None)
    }

    /// Locate the word holding `e` and its block offset within that word's
    /// run. Precondition: `e <= self.last` and `!self.is_empty()`.
    fn locate(&self, e: i32) -> (usize, u32) {
        let mut block = e as u32 / BLOCK_BITS;
        for (idx, &w) in self.words.iter().enumerate() {
            if is_literal(w) {
                if block == 0 {
                    return (idx, 0);
                }
                block -= 1;
            } else {
                let blocks = sequence_blocks(w);
                if block < blocks {
                    return (idx, block);
                }
                block -= blocks;
            }
        }
        unreachable!("e <= last but not located in words")
    }

    fn do_append(&mut self, e: i32) {
        let bit = e as u32 % BLOCK_BITS;
        let target_block = e as u32 / BLOCK_BITS;
        if self.words.is_empty() {
            self.append_literal(ALL_ZEROS_LITERAL | (1 << bit));
        } else {
            let last_block = self.last as u32 / BLOCK_BITS;
            let next_free_block = last_block + 1;
            if target_block < next_free_block {
                // Same block as `last`: extend the trailing word in place
                // instead of treating it as a new block (target_block -
                // next_free_block would underflow as a u32 subtraction).
                let idx = self.words.len() - 1;
                self.words[idx] |= 1 << bit;
                self.mod_count += 1;
            } else {
                let gap = target_block - next_free_block;
                if gap >= 1 {
                    self.append_fill(gap, false);
                }
                self.append_literal(ALL_ZEROS_LITERAL | (1 << bit));
            }
        }
        self.last = e;
        self.size_cache.set(-1);
    }

    /// Add `e`, returning whether it was newly inserted.
    pub fn insert(&mut self, e: i32) -> Result<bool> {
        self.validate_domain(e)?;
        if self.contains(e)? {
            return Ok(false);
        }
        if self.is_empty() || e > self.last {
            self.do_append(e);
            return Ok(true);
        }
        let (idx, block_offset) = self.locate(e);
        let word = self.words[idx];
        if block_offset == 0 && is_literal(word) && literal_popcount(word) < 29 {
            let bit = e as u32 % BLOCK_BITS;
            self.words[idx] = word | (1 << bit);
            self.mod_count += 1;
            self.size_cache.set(-1);
            return Ok(true);
        }
        let singleton = Self::singleton(e, self.simulate_wah);
        *self = ops::apply(self, &singleton, Operator::Or);
        Ok(true)
    }

    /// Remove `e`, returning whether it was present.
    pub fn remove(&mut self, e: i32) -> Result<bool> {
        self.validate_domain(e)?;
        if !self.contains(e)? {
            return Ok(false);
        }
        let (idx, block_offset) = self.locate(e);
        let word = self.words[idx];
        if block_offset == 0 && is_literal(word) && literal_popcount(word) > 2 {
            let bit = e as u32 % BLOCK_BITS;
            self.words[idx] = word & !(1 << bit);
            self.mod_count += 1;
            self.size_cache.set(-1);
            if idx == self.words.len() - 1 {
                self.last = self.recompute_last();
            }
            return Ok(true);
        }
        let singleton = Self::singleton(e, self.simulate_wah);
        *self = ops::apply(self, &singleton, Operator::AndNot);
        Ok(true)
    }

    /// Toggle `e`'s membership, returning whether it is present afterward.
    pub fn flip(&mut self, e: i32) -> Result<bool> {
        if self.contains(e)? {
            self.remove(e)?;
            Ok(false)
        } else {
            self.insert(e)?;
            Ok(true)
        }
    }

    fn singleton(e: i32, wah: bool) -> ConciseSet {
        let mut s = Self::new_with_mode(wah);
        s.do_append(e);
        s
    }

    pub fn clear(&mut self) {
        self.words.clear();
        self.last = -1;
        self.size_cache.set(0);
        self.mod_count += 1;
    }

    /// All elements in `[0, last]`, used as the universe for `complement`
    /// and the range ops below.
    fn full_range(last: i32, wah: bool) -> ConciseSet {
        let mut s = Self::new_with_mode(wah);
        let last_block = last as u32 / BLOCK_BITS;
        let bit_in_last = last as u32 % BLOCK_BITS;
        if last_block > 0 {
            s.append_fill(last_block, true);
        }
        let mask = if bit_in_last == BLOCK_BITS - 1 {
            0x7FFF_FFFF
        } else {
            (1u32 << (bit_in_last + 1)) - 1
        };
        s.append_literal(ALL_ZEROS_LITERAL | mask);
        s.last = last;
        s.size_cache.set(last as i64 + 1);
        s
    }

    fn range_set(&self, from: i32, to: i32) -> ConciseSet {
        let upper = Self::full_range(to, self.simulate_wah);
        if from > 0 {
            let lower = Self::full_range(from - 1, self.simulate_wah);
            ops::apply(&upper, &lower, Operator::AndNot)
        } else {
            upper
        }
    }

    /// Complement this set within `[0, last]` (spec §4.5): built as
    /// `full_range(last) \ self` rather than flipping words in place, so the
    /// already-tested Binary Operation Engine owns re-trimming and
    /// `last`-recomputation instead of a second hand-rolled masking path.
    pub fn complement(&mut self) {
        if self.is_empty() {
            return;
        }
        if self.last == 0 {
            self.clear();
            return;
        }
        let universe = Self::full_range(self.last, self.simulate_wah);
        *self = ops::apply(&universe, self, Operator::AndNot);
    }

    pub fn complemented(&self) -> ConciseSet {
        let mut c = self.clone();
        c.complement();
        c
    }

    pub fn fill_range(&mut self, from: i32, to: i32) -> Result<()> {
        self.validate_domain(from)?;
        self.validate_domain(to)?;
        if from > to {
            return Ok(());
        }
        let range = self.range_set(from, to);
        self.union_with(&range);
        Ok(())
    }

    pub fn clear_range(&mut self, from: i32, to: i32) -> Result<()> {
        self.validate_domain(from)?;
        self.validate_domain(to)?;
        if from > to {
            return Ok(());
        }
        let range = self.range_set(from, to);
        self.difference_with(&range);
        Ok(())
    }

    pub fn union(&self, other: &ConciseSet) -> ConciseSet {
        ops::apply(self, other, Operator::Or)
    }

    pub fn intersection(&self, other: &ConciseSet) -> ConciseSet {
        ops::apply(self, other, Operator::And)
    }

    pub fn difference(&self, other: &ConciseSet) -> ConciseSet {
        ops::apply(self, other, Operator::AndNot)
    }

    pub fn symmetric_difference(&self, other: &ConciseSet) -> ConciseSet {
        ops::apply(self, other, Operator::Xor)
    }

    pub fn union_with(&mut self, other: &ConciseSet) {
        *self = self.union(other);
    }

    pub fn intersect_with(&mut self, other: &ConciseSet) {
        *self = self.intersection(other);
    }

    pub fn difference_with(&mut self, other: &ConciseSet) {
        *self = self.difference(other);
    }

    pub fn intersection_len(&self, other: &ConciseSet) -> usize {
        ops::intersection_count_at_least(self, other, u64::MAX) as usize
    }

    pub fn union_len(&self, other: &ConciseSet) -> usize {
        self.len() + other.len() - self.intersection_len(other)
    }

    pub fn difference_len(&self, other: &ConciseSet) -> usize {
        self.len() - self.intersection_len(other)
    }

    pub fn symmetric_difference_len(&self, other: &ConciseSet) -> usize {
        self.len() + other.len() - 2 * self.intersection_len(other)
    }

    pub fn complement_len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.last as i64 + 1) as usize - self.len()
        }
    }

    pub fn contains_all(&self, other: &ConciseSet) -> bool {
        if other.is_empty() {
            return true;
        }
        if other.last > self.last {
            return false;
        }
        ops::intersection_count_at_least(self, other, other.len() as u64) >= other.len() as u64
    }

    pub fn contains_any(&self, other: &ConciseSet) -> bool {
        ops::intersection_count_at_least(self, other, 1) >= 1
    }

    pub fn contains_at_least(&self, other: &ConciseSet, min_elements: usize) -> Result<bool> {
        if min_elements == 0 {
            return Err(ConciseError::invalid_argument("min_elements must be at least 1"));
        }
        Ok(ops::intersection_count_at_least(self, other, min_elements as u64) >= min_elements as u64)
    }

    /// Copy every element, in ascending order, into `buf`. Errors if `buf` is
    /// too small to hold `len()` elements rather than silently truncating.
    pub fn to_array(&self, buf: &mut [i32]) -> Result<usize> {
        let n = self.len();
        if buf.len() < n {
            return Err(ConciseError::invalid_argument("buffer smaller than set size"));
        }
        for (slot, v) in buf.iter_mut().zip(self.iter()) {
            *slot = v?;
        }
        Ok(n)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    pub fn iter_rev(&self) -> RevIter<'_> {
        RevIter::new(self)
    }

    /// Build a set from already strictly-ascending, in-range elements.
    pub fn from_sorted(values: &[i32]) -> Result<Self> {
        let mut set = Self::new();
        let mut prev: Option<i32> = None;
        for &v in values {
            set.validate_domain(v)?;
            if let Some(p) = prev {
                if v <= p {
                    return Err(ConciseError::invalid_argument(
                        "values must be strictly ascending with no duplicates",
                    ));
                }
            }
            set.do_append(v);
            prev = Some(v);
        }
        Ok(set)
    }

    /// Build a set from an arbitrary, possibly unsorted and duplicate-laden,
    /// sequence of elements.
    pub fn from_unsorted(values: impl IntoIterator<Item = i32>) -> Result<Self> {
        let mut sorted: Vec<i32> = values.into_iter().collect();
        for &v in &sorted {
            if v < 0 || v > MAX_ELEMENT {
                return Err(ConciseError::out_of_range(v as i64, MAX_ELEMENT));
            }
        }
        sorted.sort_unstable();
        sorted.dedup();
        Self::from_sorted(&sorted)
    }

    /// Ratio of this set's compressed size to an equivalent plain bitmap's
    /// size (words of 32 bits covering `[0, last]`).
    pub fn bitmap_compression_ratio(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        (self.words.len() as f64 * 32.0) / (self.last as f64 + 1.0)
    }

    /// Ratio of this set's compressed size to a plain sorted array of its
    /// elements (one word per element).
    pub fn collection_compression_ratio(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.words.len() as f64 / self.len() as f64
    }

    /// Strip trailing zero-literals / zero-sequences; a trailing flip-only
    /// zero-sequence becomes a single-bit literal instead of vanishing,
    /// since its flip bit is a real element (spec §4.4 "trim zeros").
    pub(crate) fn trim_zeros(&mut self) {
        while let Some(&last) = self.words.last() {
            if is_literal(last) {
                if literal_bits(last) == 0 {
                    self.words.pop();
                    continue;
                }
                break;
            } else if is_zero_sequence(last) {
                match flip_position(last) {
                    Some(bit) => {
                        self.words.pop();
                        self.words.push(ALL_ZEROS_LITERAL | (1 << bit));
                        break;
                    }
                    None => {
                        self.words.pop();
                        continue;
                    }
                }
            } else {
                break;
            }
        }
    }

    /// Recompute `last` from scratch: sum block widths up to the final word,
    /// then read that word's own highest set bit.
    pub(crate) fn recompute_last(&self) -> i32 {
        if self.words.is_empty() {
            return -1;
        }
        let mut blocks_before: u64 = 0;
        for &w in &self.words[..self.words.len() - 1] {
            blocks_before += if is_literal(w) { 1 } else { sequence_blocks(w) as u64 };
        }
        let last_word = *self.words.last().unwrap();
        if is_literal(last_word) {
            let bits = literal_bits(last_word);
            let highest = 31 - bits.leading_zeros();
            (blocks_before * BLOCK_BITS as u64 + highest as u64) as i32
        } else {
            // Invariant: a sequence can only be the trailing word if it is a
            // one-sequence (a trailing zero-sequence is trimmed away).
            let total_blocks = blocks_before + sequence_blocks(last_word) as u64;
            (total_blocks * BLOCK_BITS as u64 - 1) as i32
        }
    }
}

impl Default for ConciseSet {
    fn default() -> Self {
        Self::new()
    }
}

fn nth_set_bit(mut bits: u32, mut n: u32) -> u32 {
    loop {
        let tz = bits.trailing_zeros();
        if n == 0 {
            return tz;
        }
        bits &= bits - 1;
        n -= 1;
    }
}

impl PartialEq for ConciseSet {
    fn eq(&self, other: &Self) -> bool {
        self.last == other.last && self.words == other.words
    }
}

impl Eq for ConciseSet {}

impl Hash for ConciseSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut h: i64 = 1;
        for &w in &self.words {
            h = h.wrapping_mul(31).wrapping_add(w as i64);
        }
        state.write_i64(h);
    }
}

impl PartialOrd for ConciseSet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ConciseSet {
    /// Lexicographic comparison from the most significant decoded block
    /// down, i.e. as if both sets were compared as big-endian bitstrings.
    fn cmp(&self, other: &Self) -> Ordering {
        if self.last != other.last {
            return self.last.cmp(&other.last);
        }
        if self.is_empty() {
            return Ordering::Equal;
        }
        let mut ca = ReverseWordCursor::new(&self.words, self.simulate_wah);
        let mut cb = ReverseWordCursor::new(&other.words, other.simulate_wah);
        loop {
            let (ea, eb) = match (ca.current(), cb.current()) {
                (Some(a), Some(b)) => (a, b),
                _ => return Ordering::Equal,
            };
            match (ea, eb) {
                (
                    CursorEvent::Fill { one_fill: ao, remaining: ra },
                    CursorEvent::Fill { one_fill: bo, remaining: rb },
                ) => {
                    if ao != bo {
                        return if ao { Ordering::Greater } else { Ordering::Less };
                    }
                    let k = ra.min(rb);
                    let a_more = ca.advance_by(k);
                    let b_more = cb.advance_by(k);
                    if !a_more || !b_more {
                        return Ordering::Equal;
                    }
                }
                _ => {
                    let a_img = literal_bits(ea.as_literal());
                    let b_img = literal_bits(eb.as_literal());
                    if a_img != b_img {
                        return a_img.cmp(&b_img);
                    }
                    let a_more = if ea.is_fill() { ca.advance_by(1) } else { ca.advance() };
                    let b_more = if eb.is_fill() { cb.advance_by(1) } else { cb.advance() };
                    if !a_more || !b_more {
                        return Ordering::Equal;
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for ConciseSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter().map(|r| r.unwrap_or(-1))).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_across_literals_and_sequences() {
        let set = ConciseSet::from_sorted(&[0, 31, 62, 1_000_000]).unwrap();
        assert!(set.contains(0).unwrap());
        assert!(set.contains(31).unwrap());
        assert!(set.contains(62).unwrap());
        assert!(set.contains(1_000_000).unwrap());
        assert!(!set.contains(1).unwrap());
        assert!(!set.contains(999_999).unwrap());
    }

    #[test]
    fn get_and_index_of_are_inverse() {
        let values = [0, 5, 31, 100, 1_000_000];
        let set = ConciseSet::from_sorted(&values).unwrap();
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(set.get(i).unwrap(), v);
            assert_eq!(set.index_of(v).unwrap(), Some(i));
        }
        assert_eq!(set.index_of(6).unwrap(), None);
    }

    #[test]
    fn insert_and_remove_round_trip() {
        let mut set = ConciseSet::new();
        assert!(set.insert(5).unwrap());
        assert!(!set.insert(5).unwrap());
        assert!(set.contains(5).unwrap());
        assert!(set.remove(5).unwrap());
        assert!(!set.contains(5).unwrap());
        assert!(set.is_empty());
    }

    #[test]
    fn insert_falls_back_to_general_path_inside_a_sequence() {
        let mut set = ConciseSet::new();
        set.fill_range(0, 1000).unwrap();
        assert!(set.insert(2000).unwrap());
        assert!(set.contains(2000).unwrap());
        assert_eq!(set.len(), 1002);
    }

    #[test]
    fn complement_of_a_small_set() {
        let mut set = ConciseSet::from_sorted(&[1, 3]).unwrap();
        set.complement();
        let got: Vec<i32> = set.iter().map(|r| r.unwrap()).collect();
        assert_eq!(got, vec![0, 2]); // complement within [0, last=3]
    }

    #[test]
    fn fill_and_clear_range() {
        let mut set = ConciseSet::new();
        set.fill_range(10, 20).unwrap();
        assert_eq!(set.len(), 11);
        assert!(set.contains(15).unwrap());
        set.clear_range(12, 14).unwrap();
        assert_eq!(set.len(), 8);
        assert!(!set.contains(13).unwrap());
    }

    #[test]
    fn equality_ignores_nothing_but_representation() {
        let a = ConciseSet::from_sorted(&[1, 2, 3]).unwrap();
        let b = ConciseSet::from_sorted(&[1, 2, 3]).unwrap();
        assert_eq!(a, b);
        let c = ConciseSet::from_sorted(&[1, 2, 4]).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn ordering_follows_the_highest_differing_element() {
        let a = ConciseSet::from_sorted(&[1, 2]).unwrap();
        let b = ConciseSet::from_sorted(&[1, 3]).unwrap();
        assert!(a < b);
        let c = ConciseSet::from_sorted(&[5]).unwrap();
        assert!(b < c);
    }

    #[test]
    fn contains_all_any_and_at_least() {
        let a = ConciseSet::from_sorted(&[1, 2, 3, 4, 5]).unwrap();
        let b = ConciseSet::from_sorted(&[2, 4]).unwrap();
        let c = ConciseSet::from_sorted(&[2, 9]).unwrap();
        assert!(a.contains_all(&b));
        assert!(!a.contains_all(&c));
        assert!(a.contains_any(&c));
        assert!(a.contains_at_least(&c, 1).unwrap());
        assert!(!a.contains_at_least(&c, 2).unwrap());
    }

    #[test]
    fn from_unsorted_dedupes_and_sorts() {
        let set = ConciseSet::from_unsorted([5, 1, 5, 3, 1]).unwrap();
        let got: Vec<i32> = set.iter().map(|r| r.unwrap()).collect();
        assert_eq!(got, vec![1, 3, 5]);
    }

    #[test]
    fn to_array_fills_buffer_or_rejects_it() {
        let set = ConciseSet::from_sorted(&[1, 2, 3]).unwrap();
        let mut buf = [0i32; 3];
        assert_eq!(set.to_array(&mut buf).unwrap(), 3);
        assert_eq!(buf, [1, 2, 3]);

        let mut small = [0i32; 2];
        assert!(matches!(
            set.to_array(&mut small),
            Err(ConciseError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn out_of_range_element_is_rejected() {
        let set = ConciseSet::new();
        assert!(matches!(set.contains(-1), Err(ConciseError::OutOfRange { .. })));
        assert!(matches!(
            set.contains(MAX_ELEMENT + 1),
            Err(ConciseError::OutOfRange { .. })
        ));
    }
}
