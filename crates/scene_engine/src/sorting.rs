//! Explicit submission order for cameras and drawables.
//!
//! Objects carry a `u32` sort index. The sentinel [`UNSORTED`] marks objects
//! without an explicit position; they always come after indexed objects and
//! keep their relative order under a stable sort.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Sentinel index for objects that have no explicit order
pub const UNSORTED: u32 = u32::MAX;

/// Object with an explicit sort position
pub trait SortedObject {
    /// Sort index, [`UNSORTED`] when none was assigned
    fn sort_index(&self) -> u32;

    /// Whether an explicit index was assigned
    fn is_sorted(&self) -> bool {
        self.sort_index() != UNSORTED
    }
}

/// Plain sort index, unsorted by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortIndex(pub u32);

impl Default for SortIndex {
    fn default() -> Self {
        Self(UNSORTED)
    }
}

impl SortedObject for SortIndex {
    fn sort_index(&self) -> u32 {
        self.0
    }
}

impl<T: SortedObject + ?Sized> SortedObject for &T {
    fn sort_index(&self) -> u32 {
        (**self).sort_index()
    }
}

/// Ascending order with unsorted objects last
pub struct Comparator;

impl Comparator {
    /// Strict "sorts before". False in both directions for two unsorted objects.
    pub fn less<A, B>(a: &A, b: &B) -> bool
    where
        A: SortedObject + ?Sized,
        B: SortedObject + ?Sized,
    {
        Self::compare(a, b) == Ordering::Less
    }

    /// Total order usable with `sort_by`
    pub fn compare<A, B>(a: &A, b: &B) -> Ordering
    where
        A: SortedObject + ?Sized,
        B: SortedObject + ?Sized,
    {
        match (a.is_sorted(), b.is_sorted()) {
            (true, true) => a.sort_index().cmp(&b.sort_index()),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
        }
    }
}

/// Stable in-place sort by [`Comparator`]
pub fn sort_objects<T: SortedObject>(objects: &mut [T]) {
    objects.sort_by(|a, b| Comparator::compare(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Tagged {
        index: SortIndex,
        tag: &'static str,
    }

    impl SortedObject for Tagged {
        fn sort_index(&self) -> u32 {
            self.index.sort_index()
        }
    }

    fn tagged(index: Option<u32>, tag: &'static str) -> Tagged {
        Tagged {
            index: index.map_or_else(SortIndex::default, SortIndex),
            tag,
        }
    }

    #[test]
    fn test_unsorted_last_and_stable() {
        let mut objects = vec![
            tagged(Some(3), "three"),
            tagged(None, "first-unsorted"),
            tagged(Some(1), "one"),
            tagged(None, "second-unsorted"),
            tagged(Some(0), "zero"),
        ];
        sort_objects(&mut objects);

        let tags: Vec<_> = objects.iter().map(|o| o.tag).collect();
        assert_eq!(tags, ["zero", "one", "three", "first-unsorted", "second-unsorted"]);
    }

    #[test]
    fn test_comparator_relations() {
        let unsorted = SortIndex::default();
        let zero = SortIndex(0);
        let big = SortIndex(UNSORTED - 1);

        assert!(Comparator::less(&zero, &big));
        assert!(Comparator::less(&big, &unsorted));
        assert!(!Comparator::less(&unsorted, &zero));
        assert!(!Comparator::less(&unsorted, &unsorted));
        assert!(!Comparator::less(&zero, &zero));
        assert_eq!(Comparator::compare(&unsorted, &unsorted), Ordering::Equal);
    }
}
