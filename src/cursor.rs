//! Word Cursor (spec §4.3): a stateful walk over a word array that yields a
//! stream of literal/fill "events" rather than raw words. This is what lets
//! the Binary Operation Engine (`ops.rs`) and the Bit Iterator (`iter.rs`)
//! share one decoding path instead of each re-deriving flip-bit handling.

use tracing::trace;

use crate::word::*;

/// One step of decoded content: either a single literal block, or a run of
/// `remaining` identical blocks of a uniform fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CursorEvent {
    Literal(u32),
    Fill { one_fill: bool, remaining: u32 },
}

impl CursorEvent {
    /// This event's leading block, rendered as a literal-shaped word.
    #[inline]
    pub(crate) fn as_literal(&self) -> u32 {
        match *self {
            CursorEvent::Literal(w) => w,
            CursorEvent::Fill { one_fill, .. } => saturating_literal(one_fill),
        }
    }

    /// Number of 31-bit blocks still represented by this event.
    #[inline]
    pub(crate) fn remaining(&self) -> u32 {
        match *self {
            CursorEvent::Literal(_) => 1,
            CursorEvent::Fill { remaining, .. } => remaining,
        }
    }

    #[inline]
    pub(crate) fn is_fill(&self) -> bool {
        matches!(self, CursorEvent::Fill { .. })
    }
}

/// Decode one word into its leading event plus an optional second event
/// queued from the same word (a flip-carrying sequence splits into its
/// first block, as a literal, followed by its uniform tail).
fn decode_word(word: u32, simulate_wah: bool) -> (CursorEvent, Option<CursorEvent>) {
    if is_literal(word) {
        return (CursorEvent::Literal(word), None);
    }
    let one_fill = is_one_sequence(word);
    let total_blocks = sequence_blocks(word);
    if !simulate_wah && flip_position(word).is_some() {
        trace!(target: "concise", total_blocks, "splitting flip-carrying sequence");
        let head = CursorEvent::Literal(first_block_as_literal(word));
        let tail_remaining = total_blocks - 1;
        let tail = (tail_remaining > 0)
            .then_some(CursorEvent::Fill { one_fill, remaining: tail_remaining });
        (head, tail)
    } else {
        (CursorEvent::Fill { one_fill, remaining: total_blocks }, None)
    }
}

/// Forward cursor: walks the word array from index 0 upward.
pub(crate) struct ForwardWordCursor<'a> {
    words: &'a [u32],
    next_word: usize,
    event: Option<CursorEvent>,
    pending: Option<CursorEvent>,
    simulate_wah: bool,
}

impl<'a> ForwardWordCursor<'a> {
    pub(crate) fn new(words: &'a [u32], simulate_wah: bool) -> Self {
        let mut cursor = Self { words, next_word: 0, event: None, pending: None, simulate_wah };
        cursor.advance();
        cursor
    }

    #[inline]
    pub(crate) fn current(&self) -> Option<CursorEvent> {
        self.event
    }

    #[inline]
    pub(crate) fn is_exhausted(&self) -> bool {
        self.event.is_none()
    }

    /// Force the cursor into the exhausted state, discarding any pending
    /// event. Used by `skipAllBefore` when the target lies past `last`.
    pub(crate) fn exhaust(&mut self) {
        self.next_word = self.words.len();
        self.event = None;
        self.pending = None;
    }

    /// Discard whatever remains of the current event and load the next one.
    pub(crate) fn advance(&mut self) -> bool {
        if let Some(pending) = self.pending.take() {
            self.event = Some(pending);
            return true;
        }
        if self.next_word >= self.words.len() {
            self.event = None;
            return false;
        }
        let word = self.words[self.next_word];
        self.next_word += 1;
        let (head, tail) = decode_word(word, self.simulate_wah);
        self.event = Some(head);
        self.pending = tail;
        true
    }

    /// Consume `count` blocks from the current fill event without leaving
    /// it, unless `count` exhausts it, in which case the next event loads.
    pub(crate) fn advance_by(&mut self, count: u32) -> bool {
        match self.event {
            Some(CursorEvent::Fill { one_fill, remaining }) => {
                debug_assert!(count <= remaining);
                if count < remaining {
                    self.event = Some(CursorEvent::Fill { one_fill, remaining: remaining - count });
                    true
                } else {
                    self.advance()
                }
            }
            Some(CursorEvent::Literal(_)) => {
                debug_assert_eq!(count, 1);
                self.advance()
            }
            None => false,
        }
    }
}

/// Reverse cursor: walks the word array from the last index downward. A
/// flip-carrying sequence's uniform tail is emitted before its first block,
/// the mirror image of the forward cursor's ordering.
pub(crate) struct ReverseWordCursor<'a> {
    words: &'a [u32],
    next_word: isize,
    event: Option<CursorEvent>,
    pending: Option<CursorEvent>,
    simulate_wah: bool,
}

impl<'a> ReverseWordCursor<'a> {
    pub(crate) fn new(words: &'a [u32], simulate_wah: bool) -> Self {
        let next_word = words.len() as isize - 1;
        let mut cursor = Self { words, next_word, event: None, pending: None, simulate_wah };
        cursor.advance();
        cursor
    }

    #[inline]
    pub(crate) fn current(&self) -> Option<CursorEvent> {
        self.event
    }

    #[inline]
    pub(crate) fn is_exhausted(&self) -> bool {
        self.event.is_none()
    }

    /// Force the cursor into the exhausted state, discarding any pending
    /// event. Used by `skipAllAfter` when the target lies before index 0.
    pub(crate) fn exhaust(&mut self) {
        self.next_word = -1;
        self.event = None;
        self.pending = None;
    }

    pub(crate) fn advance(&mut self) -> bool {
        if let Some(pending) = self.pending.take() {
            self.event = Some(pending);
            return true;
        }
        if self.next_word < 0 {
            self.event = None;
            return false;
        }
        let word = self.words[self.next_word as usize];
        self.next_word -= 1;
        let (head, tail) = decode_word(word, self.simulate_wah);
        // Reverse order: the uniform tail comes first, the (possibly
        // flipped) first block comes last.
        match tail {
            Some(tail_event) => {
                self.event = Some(tail_event);
                self.pending = Some(head);
            }
            None => {
                self.event = Some(head);
                self.pending = None;
            }
        }
        true
    }

    pub(crate) fn advance_by(&mut self, count: u32) -> bool {
        match self.event {
            Some(CursorEvent::Fill { one_fill, remaining }) => {
                debug_assert!(count <= remaining);
                if count < remaining {
                    self.event = Some(CursorEvent::Fill { one_fill, remaining: remaining - count });
                    true
                } else {
                    self.advance()
                }
            }
            Some(CursorEvent::Literal(_)) => {
                debug_assert_eq!(count, 1);
                self.advance()
            }
            None => false,
        }
    }
}
