use std::collections::HashSet;
use std::ops::{BitAnd, BitOr};

use smallvec::SmallVec;

use crate::term::HpoTermId;

/// A sorted set of [`HpoTermId`]s
///
/// Each id can occur only once and the ids are kept in ascending order,
/// so iteration is deterministic and set algebra is cheap. This type backs
/// parent/child relations, ancestor closures and [`crate::HpoSet`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HpoGroup {
    ids: SmallVec<[HpoTermId; 8]>,
}

impl HpoGroup {
    /// Constructs a new, empty `HpoGroup`
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new, empty `HpoGroup` with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: SmallVec::with_capacity(capacity),
        }
    }

    /// Returns `true` if the group contains no ids
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of ids in the group
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Adds an [`HpoTermId`] to the group
    ///
    /// Returns whether the id was newly inserted
    pub fn insert<I: Into<HpoTermId>>(&mut self, id: I) -> bool {
        let id = id.into();
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(idx) => {
                self.ids.insert(idx, id);
                true
            }
        }
    }

    /// Appends an id without checking order or uniqueness
    ///
    /// Callers must guarantee that `id` is larger than every id already
    /// in the group
    fn push_unchecked(&mut self, id: HpoTermId) {
        self.ids.push(id);
    }

    /// Returns `true` if the group contains the id
    pub fn contains(&self, id: &HpoTermId) -> bool {
        self.ids.binary_search(id).is_ok()
    }

    /// Returns an iterator of the contained [`HpoTermId`]s in ascending order
    pub fn iter(&self) -> HpoTermIds<'_> {
        HpoTermIds::new(self.ids.iter())
    }
}

impl From<HashSet<HpoTermId>> for HpoGroup {
    fn from(set: HashSet<HpoTermId>) -> Self {
        let mut group = HpoGroup::with_capacity(set.len());
        for id in set {
            group.insert(id);
        }
        group
    }
}

impl FromIterator<HpoTermId> for HpoGroup {
    fn from_iter<T: IntoIterator<Item = HpoTermId>>(iter: T) -> Self {
        let mut group = HpoGroup::new();
        for id in iter {
            group.insert(id);
        }
        group
    }
}

impl<'a> IntoIterator for &'a HpoGroup {
    type Item = HpoTermId;
    type IntoIter = HpoTermIds<'a>;

    fn into_iter(self) -> HpoTermIds<'a> {
        self.iter()
    }
}

/// An iterator of [`HpoTermId`]s
pub struct HpoTermIds<'a> {
    inner: std::slice::Iter<'a, HpoTermId>,
}

impl<'a> HpoTermIds<'a> {
    fn new(inner: std::slice::Iter<'a, HpoTermId>) -> Self {
        Self { inner }
    }
}

impl Iterator for HpoTermIds<'_> {
    type Item = HpoTermId;
    fn next(&mut self) -> Option<HpoTermId> {
        self.inner.next().copied()
    }
}

impl BitOr for &HpoGroup {
    type Output = HpoGroup;

    /// Returns the union of both groups
    fn bitor(self, rhs: &HpoGroup) -> HpoGroup {
        let mut group = HpoGroup::with_capacity(self.len() + rhs.len());
        let mut lhs_iter = self.ids.iter().peekable();
        let mut rhs_iter = rhs.ids.iter().peekable();

        // both sides are sorted, so a single merge pass suffices
        loop {
            match (lhs_iter.peek(), rhs_iter.peek()) {
                (Some(&&a), Some(&&b)) => {
                    if a < b {
                        group.push_unchecked(a);
                        lhs_iter.next();
                    } else if b < a {
                        group.push_unchecked(b);
                        rhs_iter.next();
                    } else {
                        group.push_unchecked(a);
                        lhs_iter.next();
                        rhs_iter.next();
                    }
                }
                (Some(&&a), None) => {
                    group.push_unchecked(a);
                    lhs_iter.next();
                }
                (None, Some(&&b)) => {
                    group.push_unchecked(b);
                    rhs_iter.next();
                }
                (None, None) => break,
            }
        }
        group
    }
}

impl BitAnd for &HpoGroup {
    type Output = HpoGroup;

    /// Returns the intersection of both groups
    fn bitand(self, rhs: &HpoGroup) -> HpoGroup {
        let (large, small) = if self.len() > rhs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let mut group = HpoGroup::with_capacity(small.len());
        for id in &small.ids {
            if large.contains(id) {
                group.push_unchecked(*id);
            }
        }
        group
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn group(ids: &[u32]) -> HpoGroup {
        ids.iter().map(|id| HpoTermId::from(*id)).collect()
    }

    #[test]
    fn insert_keeps_sorted_unique() {
        let mut g = HpoGroup::new();
        assert!(g.insert(3u32));
        assert!(g.insert(1u32));
        assert!(g.insert(2u32));
        assert!(!g.insert(2u32));

        let ids: Vec<HpoTermId> = g.iter().collect();
        assert_eq!(
            ids,
            vec![
                HpoTermId::from(1u32),
                HpoTermId::from(2u32),
                HpoTermId::from(3u32)
            ]
        );
    }

    #[test]
    fn union() {
        let result = &group(&[1, 2, 3]) | &group(&[2, 4]);
        assert_eq!(result, group(&[1, 2, 3, 4]));

        let result = &group(&[1, 2, 3]) | &group(&[1, 2, 4, 5]);
        assert_eq!(result, group(&[1, 2, 3, 4, 5]));
    }

    #[test]
    fn union_with_empty() {
        let empty = HpoGroup::new();
        assert_eq!(&group(&[1, 2]) | &empty, group(&[1, 2]));
        assert_eq!(&empty | &group(&[1, 2]), group(&[1, 2]));
    }

    #[test]
    fn intersection() {
        let result = &group(&[1, 2, 3]) & &group(&[2, 4, 5, 1]);
        assert_eq!(result, group(&[1, 2]));

        let empty = HpoGroup::new();
        assert_eq!(&group(&[1, 2]) & &empty, empty);
    }

    #[test]
    fn commutative() {
        let a = group(&[1, 5, 9]);
        let b = group(&[2, 5, 12]);
        assert_eq!(&a | &b, &b | &a);
        assert_eq!(&a & &b, &b & &a);
    }
}
