//! Binary Operation Engine (spec §4.4): AND, OR, XOR and ANDNOT computed
//! directly over compressed words via a dual-cursor merge, never by
//! decompressing either operand.
//!
//! The disjoint-run fast path from the spec is deliberately not special-cased
//! here: the general merge loop below already processes a uniform fill in
//! O(1) per matching step (the fill/fill branch advances both cursors by
//! `min(remaining)` blocks at once, and the tail flush appends a whole
//! remaining run with a single `append_fill`), so the fast path would only
//! save a constant-factor setup cost, not asymptotic work. Noted in
//! DESIGN.md.

use tracing::debug;

use crate::constants::*;
use crate::cursor::{CursorEvent, ForwardWordCursor};
use crate::set::ConciseSet;
use crate::word::*;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Operator {
    And,
    Or,
    Xor,
    AndNot,
}

impl Operator {
    /// Combine two literal-shaped words (bit 31 set, spec §4.4 formulas).
    fn combine(self, a: u32, b: u32) -> u32 {
        match self {
            Operator::And => a & b,
            Operator::Or => a | b,
            Operator::Xor => LITERAL_FLAG | (a ^ b),
            Operator::AndNot => LITERAL_FLAG | (a & !b),
        }
    }

    /// Combine two uniform fills by treating each as its saturating literal;
    /// the result is a one-fill iff the combined literal is all-ones.
    fn combine_fill(self, a_one: bool, b_one: bool) -> bool {
        let a_lit = saturating_literal(a_one);
        let b_lit = saturating_literal(b_one);
        self.combine(a_lit, b_lit) == ALL_ONES_LITERAL
    }
}

/// `a OP b`, both already-canonical sets assumed to share a WAH mode.
pub(crate) fn apply(a: &ConciseSet, b: &ConciseSet, op: Operator) -> ConciseSet {
    if a.is_empty() {
        debug!(target: "concise", ?op, "empty-operand fast path (a empty)");
        return match op {
            Operator::And => ConciseSet::empty_like(a),
            Operator::Or | Operator::Xor => b.clone(),
            Operator::AndNot => a.clone(),
        };
    }
    if b.is_empty() {
        debug!(target: "concise", ?op, "empty-operand fast path (b empty)");
        return match op {
            Operator::And => ConciseSet::empty_like(a),
            Operator::Or | Operator::Xor | Operator::AndNot => a.clone(),
        };
    }
    debug!(target: "concise", ?op, a_words = a.words.len(), b_words = b.words.len(), "general merge");
    general_merge(a, b, op)
}

fn general_merge(a: &ConciseSet, b: &ConciseSet, op: Operator) -> ConciseSet {
    let wah = a.is_wah();
    let mut result = ConciseSet::empty_like(a);
    result.words.reserve(a.words.len() + b.words.len());

    let mut ca = ForwardWordCursor::new(&a.words, wah);
    let mut cb = ForwardWordCursor::new(&b.words, wah);

    loop {
        let (ea, eb) = match (ca.current(), cb.current()) {
            (Some(ea), Some(eb)) => (ea, eb),
            _ => break,
        };

        match (ea, eb) {
            (
                CursorEvent::Fill { one_fill: a_one, remaining: ra },
                CursorEvent::Fill { one_fill: b_one, remaining: rb },
            ) => {
                let k = ra.min(rb);
                let one = op.combine_fill(a_one, b_one);
                result.append_fill(k, one);
                let a_more = ca.advance_by(k);
                let b_more = cb.advance_by(k);
                if !a_more || !b_more {
                    break;
                }
            }
            (CursorEvent::Fill { .. }, _) => {
                result.append_literal(op.combine(ea.as_literal(), eb.as_literal()));
                let a_more = ca.advance_by(1);
                let b_more = cb.advance();
                if !a_more || !b_more {
                    break;
                }
            }
            (_, CursorEvent::Fill { .. }) => {
                result.append_literal(op.combine(ea.as_literal(), eb.as_literal()));
                let a_more = ca.advance();
                let b_more = cb.advance_by(1);
                if !a_more || !b_more {
                    break;
                }
            }
            (CursorEvent::Literal(_), CursorEvent::Literal(_)) => {
                result.append_literal(op.combine(ea.as_literal(), eb.as_literal()));
                let a_more = ca.advance();
                let b_more = cb.advance();
                if !a_more || !b_more {
                    break;
                }
            }
        }
    }

    let a_exhausted = ca.is_exhausted();
    let b_exhausted = cb.is_exhausted();

    let last_hint: Option<i32> = match op {
        Operator::And => None,
        Operator::Or => {
            if !a_exhausted {
                flush_remaining(&mut result, &mut ca);
            }
            if !b_exhausted {
                flush_remaining(&mut result, &mut cb);
            }
            Some(a.last.max(b.last))
        }
        Operator::Xor => {
            if !a_exhausted {
                flush_remaining(&mut result, &mut ca);
            }
            if !b_exhausted {
                flush_remaining(&mut result, &mut cb);
            }
            if a.last == b.last {
                None
            } else {
                Some(a.last.max(b.last))
            }
        }
        Operator::AndNot => {
            if !a_exhausted {
                flush_remaining(&mut result, &mut ca);
            }
            if a.last > b.last {
                Some(a.last)
            } else {
                None
            }
        }
    };

    finalize(result, last_hint)
}

fn flush_remaining(result: &mut ConciseSet, cursor: &mut ForwardWordCursor) {
    while let Some(event) = cursor.current() {
        match event {
            CursorEvent::Literal(w) => result.append_literal(w),
            CursorEvent::Fill { one_fill, remaining } => result.append_fill(remaining, one_fill),
        }
        cursor.advance();
    }
}

fn finalize(mut result: ConciseSet, last_hint: Option<i32>) -> ConciseSet {
    result.trim_zeros();
    if result.words.is_empty() {
        result.last = -1;
        result.size_cache.set(0);
        return result;
    }
    result.last = match last_hint {
        Some(l) => l,
        None => result.recompute_last(),
    };
    result.size_cache.set(-1);
    result.mod_count = result.mod_count.wrapping_add(1);
    result.words.shrink_to_fit();
    result
}

/// Count elements in `a ∩ b`, stopping as soon as the count reaches `limit`
/// without materializing the intersection. Backs `contains_any`,
/// `contains_at_least` and `intersection_len`.
pub(crate) fn intersection_count_at_least(a: &ConciseSet, b: &ConciseSet, limit: u64) -> u64 {
    if a.is_empty() || b.is_empty() || limit == 0 {
        return 0;
    }
    let wah = a.is_wah();
    let mut ca = ForwardWordCursor::new(&a.words, wah);
    let mut cb = ForwardWordCursor::new(&b.words, wah);
    let mut total: u64 = 0;

    loop {
        let (ea, eb) = match (ca.current(), cb.current()) {
            (Some(ea), Some(eb)) => (ea, eb),
            _ => break,
        };

        match (ea, eb) {
            (
                CursorEvent::Fill { one_fill: a_one, remaining: ra },
                CursorEvent::Fill { one_fill: b_one, remaining: rb },
            ) => {
                let k = ra.min(rb);
                if a_one && b_one {
                    total += k as u64 * BLOCK_BITS as u64;
                }
                if total >= limit {
                    return total;
                }
                if !ca.advance_by(k) || !cb.advance_by(k) {
                    break;
                }
            }
            _ => {
                let bits = literal_bits(ea.as_literal()) & literal_bits(eb.as_literal());
                total += bits.count_ones() as u64;
                if total >= limit {
                    return total;
                }
                let a_more = if ea.is_fill() { ca.advance_by(1) } else { ca.advance() };
                let b_more = if eb.is_fill() { cb.advance_by(1) } else { cb.advance() };
                if !a_more || !b_more {
                    break;
                }
            }
        }
    }

    total
}
