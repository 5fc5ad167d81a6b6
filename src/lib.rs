//! CONCISE: a compressed set of non-negative integers that supports full set
//! algebra (union, intersection, difference, symmetric difference,
//! complement) directly on its run-length-encoded word array, never falling
//! back to a decompressed bitmap.
//!
//! The word array and its canonicalization rules live in [`word`] and
//! [`append`]; [`cursor`] turns a word array into a stream of literal/fill
//! events so [`ops`] (set algebra) and [`iter`] (bit iteration) don't each
//! re-derive flip-bit handling. [`set::ConciseSet`] is the public surface.

mod append;
mod constants;
mod cursor;
mod error;
mod iter;
mod ops;
mod set;
mod word;

#[cfg(test)]
mod proptests;

#[macro_use]
extern crate static_assertions;

pub use constants::MAX_ELEMENT;
pub use error::{ConciseError, Result};
pub use iter::{Iter, RevIter};
pub use set::ConciseSet;

const_assert!(MAX_ELEMENT > 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readme_example_round_trips() {
        let mut a = ConciseSet::from_sorted(&[1, 2, 3, 100]).unwrap();
        let b = ConciseSet::from_sorted(&[2, 3, 4]).unwrap();

        let union: Vec<i32> = a.union(&b).iter().map(|r| r.unwrap()).collect();
        assert_eq!(union, vec![1, 2, 3, 4, 100]);

        a.intersect_with(&b);
        let got: Vec<i32> = a.iter().map(|r| r.unwrap()).collect();
        assert_eq!(got, vec![2, 3]);
    }
}
