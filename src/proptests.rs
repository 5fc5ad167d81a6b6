//! Property tests (spec §8 / SPEC_FULL §10.4): the quantified invariants
//! cross-checked against a dense `BTreeSet<i32>` oracle built from the same
//! inputs, rather than a mechanical encode/decode round-trip grid.

use std::collections::BTreeSet;

use proptest::collection::vec;
use proptest::prelude::*;

use crate::ConciseSet;

const MAX_TEST_ELEMENT: i32 = 5_000;

fn small_elements() -> impl Strategy<Value = Vec<i32>> {
    vec(0..MAX_TEST_ELEMENT, 0..200)
}

fn oracle(values: &[i32]) -> BTreeSet<i32> {
    values.iter().copied().collect()
}

fn decode(set: &ConciseSet) -> BTreeSet<i32> {
    set.iter().map(|r| r.unwrap()).collect()
}

proptest! {
    #[test]
    fn round_trip_preserves_membership(values in small_elements()) {
        let set = ConciseSet::from_unsorted(values.clone()).unwrap();
        let expect = oracle(&values);
        prop_assert_eq!(decode(&set), expect.clone());
        prop_assert_eq!(set.len(), expect.len());
        for v in 0..MAX_TEST_ELEMENT {
            prop_assert_eq!(set.contains(v).unwrap(), expect.contains(&v));
        }
    }

    #[test]
    fn union_matches_oracle(a in small_elements(), b in small_elements()) {
        let sa = ConciseSet::from_unsorted(a.clone()).unwrap();
        let sb = ConciseSet::from_unsorted(b.clone()).unwrap();
        let expect: BTreeSet<i32> = oracle(&a).union(&oracle(&b)).copied().collect();
        prop_assert_eq!(decode(&sa.union(&sb)), expect);
    }

    #[test]
    fn intersection_matches_oracle(a in small_elements(), b in small_elements()) {
        let sa = ConciseSet::from_unsorted(a.clone()).unwrap();
        let sb = ConciseSet::from_unsorted(b.clone()).unwrap();
        let expect: BTreeSet<i32> = oracle(&a).intersection(&oracle(&b)).copied().collect();
        prop_assert_eq!(decode(&sa.intersection(&sb)), expect);
    }

    #[test]
    fn difference_matches_oracle(a in small_elements(), b in small_elements()) {
        let sa = ConciseSet::from_unsorted(a.clone()).unwrap();
        let sb = ConciseSet::from_unsorted(b.clone()).unwrap();
        let expect: BTreeSet<i32> = oracle(&a).difference(&oracle(&b)).copied().collect();
        prop_assert_eq!(decode(&sa.difference(&sb)), expect);
    }

    #[test]
    fn symmetric_difference_matches_oracle(a in small_elements(), b in small_elements()) {
        let sa = ConciseSet::from_unsorted(a.clone()).unwrap();
        let sb = ConciseSet::from_unsorted(b.clone()).unwrap();
        let expect: BTreeSet<i32> = oracle(&a).symmetric_difference(&oracle(&b)).copied().collect();
        prop_assert_eq!(decode(&sa.symmetric_difference(&sb)), expect);
    }

    #[test]
    fn complement_is_involutive_within_last(values in small_elements().prop_filter("non-empty", |v| !v.is_empty())) {
        let set = ConciseSet::from_unsorted(values).unwrap();
        let complemented_twice = set.complemented().complemented();
        prop_assert_eq!(decode(&complemented_twice), decode(&set));
    }

    #[test]
    fn insert_then_remove_is_identity(values in small_elements(), extra in 0..MAX_TEST_ELEMENT) {
        let mut set = ConciseSet::from_unsorted(values.clone()).unwrap();
        let was_present = set.contains(extra).unwrap();
        set.insert(extra).unwrap();
        prop_assert!(set.contains(extra).unwrap());
        if !was_present {
            set.remove(extra).unwrap();
            prop_assert_eq!(decode(&set), oracle(&values));
        }
    }

    #[test]
    fn wah_mode_never_produces_a_flip_carrying_sequence(values in small_elements()) {
        let set = ConciseSet::from_unsorted(values).unwrap();
        let mut wah = ConciseSet::new_wah();
        for v in decode(&set) {
            wah.insert(v).unwrap();
        }
        prop_assert_eq!(decode(&wah), decode(&set));
    }

    #[test]
    fn get_and_index_of_agree_with_sorted_order(values in small_elements().prop_filter("non-empty", |v| !v.is_empty())) {
        let set = ConciseSet::from_unsorted(values.clone()).unwrap();
        let sorted: Vec<i32> = oracle(&values).into_iter().collect();
        for (i, &v) in sorted.iter().enumerate() {
            prop_assert_eq!(set.get(i).unwrap(), v);
            prop_assert_eq!(set.index_of(v).unwrap(), Some(i));
        }
    }
}
