//! Terms of the ontology and their relations to each other
use std::collections::{HashMap, VecDeque};

use crate::annotations::{Genes, OmimDiseases, OrphaDiseases};
use crate::{HpoError, HpoResult, Ontology};

mod group;
mod id;
mod information_content;
pub(crate) mod internal;

pub use group::{HpoGroup, HpoTermIds};
pub use id::HpoTermId;
pub use information_content::{InformationContent, InformationContentKind};
pub(crate) use internal::HpoTermInternal;

/// A single term of the ontology
///
/// `HpoTerm` is a lightweight view into the [`Ontology`]: it borrows the
/// underlying record and the ontology itself, so traversal to parents,
/// children and annotations never copies data.
///
/// # Examples
///
/// ```
/// use hpoquery::ontology::Builder;
///
/// let mut builder = Builder::new();
/// builder.add_term(1u32, "All");
/// builder.add_term(118u32, "Phenotypic abnormality");
/// builder.add_parent(1u32, 118u32);
/// let ontology = builder.build().unwrap();
///
/// let term = ontology.term(118u32).unwrap();
/// assert_eq!(term.name(), "Phenotypic abnormality");
/// assert_eq!(term.parent_ids().len(), 1);
/// ```
#[derive(Clone, Copy)]
pub struct HpoTerm<'a> {
    ontology: &'a Ontology,
    term: &'a HpoTermInternal,
}

impl<'a> HpoTerm<'a> {
    pub(crate) fn new(ontology: &'a Ontology, term: &'a HpoTermInternal) -> HpoTerm<'a> {
        HpoTerm { ontology, term }
    }

    pub(crate) fn try_new(ontology: &'a Ontology, id: HpoTermId) -> HpoResult<HpoTerm<'a>> {
        let term = ontology
            .get(id)
            .ok_or_else(|| HpoError::NotFound(id.to_string()))?;
        Ok(HpoTerm { ontology, term })
    }

    pub(crate) fn ontology(&self) -> &'a Ontology {
        self.ontology
    }

    /// The unique identifier of the term
    pub fn id(&self) -> HpoTermId {
        self.term.id()
    }

    /// The name of the term, e.g. `Macular atrophy`
    pub fn name(&self) -> &'a str {
        self.term.name()
    }

    /// The free-text definition, if one is recorded
    pub fn definition(&self) -> Option<&'a str> {
        self.term.definition()
    }

    /// The free-text comment, if one is recorded
    pub fn comment(&self) -> Option<&'a str> {
        self.term.comment()
    }

    /// All recorded synonyms of the term name
    pub fn synonyms(&self) -> &'a [String] {
        self.term.synonyms()
    }

    /// Cross-references to other databases
    pub fn xrefs(&self) -> &'a [String] {
        self.term.xrefs()
    }

    /// The ids of the direct parent terms
    pub fn parent_ids(&self) -> &'a HpoGroup {
        self.term.parents()
    }

    /// An iterator of the direct parent terms
    pub fn parents(&self) -> Iter<'a> {
        Iter::new(self.term.parents().iter(), self.ontology)
    }

    /// The ids of the direct child terms
    pub fn child_ids(&self) -> &'a HpoGroup {
        self.term.children()
    }

    /// An iterator of the direct child terms
    pub fn children(&self) -> Iter<'a> {
        Iter::new(self.term.children().iter(), self.ontology)
    }

    /// The ids of all terms reachable via parent edges
    ///
    /// The term itself is not included.
    pub fn ancestor_ids(&self) -> &'a HpoGroup {
        self.term.all_parents()
    }

    /// An iterator of all ancestor terms, the term itself excluded
    pub fn ancestors(&self) -> Iter<'a> {
        Iter::new(self.term.all_parents().iter(), self.ontology)
    }

    /// An iterator of all terms reachable via child edges
    ///
    /// The term itself is not included. Terms are yielded in breadth-first
    /// order; every reachable term appears exactly once.
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants::new(*self)
    }

    /// The ids of all terms reachable via child edges
    ///
    /// Unlike [`HpoTerm::ancestor_ids`] this is not cached on the term,
    /// every call walks the subgraph.
    pub fn descendant_ids(&self) -> HpoGroup {
        self.descendants().map(|term| term.id()).collect()
    }

    /// Returns `true` if `self` is an ancestor of `other`
    ///
    /// This is a plain upward walk from `other` with early exit, so a
    /// single check costs at most the size of `other`'s ancestry.
    pub fn is_ancestor_of(&self, other: &HpoTerm) -> bool {
        let mut stack: Vec<HpoTermId> = other.parent_ids().iter().collect();
        let mut seen = HpoGroup::new();
        while let Some(id) = stack.pop() {
            if id == self.id() {
                return true;
            }
            if seen.insert(id) {
                stack.extend(self.ontology.get_unchecked(id).parents().iter());
            }
        }
        false
    }

    /// Returns `true` if `self` is a descendant of `other`
    pub fn is_descendant_of(&self, other: &HpoTerm) -> bool {
        other.is_ancestor_of(self)
    }

    /// The ids of all sibling terms
    ///
    /// Siblings share a parent or a child with `self` but are neither
    /// parent, child nor the term itself.
    pub fn neighbour_ids(&self) -> HpoGroup {
        let mut res = HpoGroup::new();
        for parent in self.parents() {
            for sibling in parent.child_ids() {
                res.insert(sibling);
            }
        }
        for child in self.children() {
            for sibling in child.parent_ids() {
                res.insert(sibling);
            }
        }
        res.iter()
            .filter(|id| {
                *id != self.id()
                    && !self.parent_ids().contains(id)
                    && !self.child_ids().contains(id)
            })
            .collect()
    }

    /// The ids of the genes associated with the term, descendants included
    pub fn genes(&self) -> &'a Genes {
        self.term.genes()
    }

    /// The ids of the OMIM diseases associated with the term
    pub fn omim_diseases(&self) -> &'a OmimDiseases {
        self.term.omim_diseases()
    }

    /// The ids of the OMIM diseases documented as explicitly absent
    pub fn omim_excluded_diseases(&self) -> &'a OmimDiseases {
        self.term.omim_excluded_diseases()
    }

    /// The ids of the Orphanet diseases associated with the term
    pub fn orpha_diseases(&self) -> &'a OrphaDiseases {
        self.term.orpha_diseases()
    }

    /// The ids of the Orphanet diseases documented as explicitly absent
    pub fn orpha_excluded_diseases(&self) -> &'a OrphaDiseases {
        self.term.orpha_excluded_diseases()
    }

    /// The information content of the term
    pub fn information_content(&self) -> &'a InformationContent {
        self.term.information_content()
    }

    /// The ids of all common ancestors of both terms
    ///
    /// Both terms themselves are part of their own closure, so if one term
    /// is an ancestor of the other (or both are identical), it is included.
    pub fn common_ancestor_ids(&self, other: &HpoTerm) -> HpoGroup {
        let mut lhs = self.ancestor_ids().clone();
        lhs.insert(self.id());
        let mut rhs = other.ancestor_ids().clone();
        rhs.insert(other.id());
        &lhs & &rhs
    }

    /// The ids of the union of both terms' ancestors, both terms included
    pub fn union_ancestor_ids(&self, other: &HpoTerm) -> HpoGroup {
        let mut lhs = self.ancestor_ids().clone();
        lhs.insert(self.id());
        let mut rhs = other.ancestor_ids().clone();
        rhs.insert(other.id());
        &lhs | &rhs
    }

    /// The most informative common ancestor of both terms
    ///
    /// Among all common ancestors (the terms themselves included, if one
    /// subsumes the other) the one with the highest information content of
    /// the requested kind is returned. Ties are broken by the lowest term
    /// id so repeated queries always return the same term.
    ///
    /// Returns `None` if the terms share no common ancestor.
    pub fn mica(&self, other: &HpoTerm, kind: InformationContentKind) -> Option<HpoTerm<'a>> {
        let mut best: Option<(HpoTermId, f32)> = None;
        for id in &self.common_ancestor_ids(other) {
            let ic = self
                .ontology
                .get_unchecked(id)
                .information_content()
                .get_kind(kind);
            // ids iterate in ascending order, so strictly-greater keeps
            // the lowest id on ties
            match best {
                Some((_, best_ic)) if ic <= best_ic => {}
                _ => best = Some((id, ic)),
            }
        }
        best.map(|(id, _)| HpoTerm::new(self.ontology, self.ontology.get_unchecked(id)))
    }

    /// The number of edges on the shortest path to `other`
    ///
    /// The path runs upward from both terms through their closest common
    /// ancestor. Identical terms have a distance of `0`. Returns `None`
    /// if the terms share no common ancestor.
    pub fn distance_to(&self, other: &HpoTerm) -> Option<usize> {
        let own = self.ancestor_distances();
        let theirs = other.ancestor_distances();
        own.iter()
            .filter_map(|(id, dist)| theirs.get(id).map(|other_dist| dist + other_dist))
            .min()
    }

    /// Upward edge distances to every ancestor, the term itself at 0
    fn ancestor_distances(&self) -> HashMap<HpoTermId, usize> {
        let mut distances = HashMap::new();
        let mut queue = VecDeque::new();
        queue.push_back((self.id(), 0usize));
        while let Some((id, dist)) = queue.pop_front() {
            if distances.contains_key(&id) {
                continue;
            }
            distances.insert(id, dist);
            for parent in self.ontology.get_unchecked(id).parents() {
                queue.push_back((parent, dist + 1));
            }
        }
        distances
    }
}

impl PartialEq for HpoTerm<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for HpoTerm<'_> {}

impl std::fmt::Debug for HpoTerm<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HpoTerm({} | {})", self.id(), self.name())
    }
}

/// An iterator of [`HpoTerm`]s backed by an [`HpoGroup`]
pub struct Iter<'a> {
    ids: HpoTermIds<'a>,
    ontology: &'a Ontology,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(ids: HpoTermIds<'a>, ontology: &'a Ontology) -> Self {
        Iter { ids, ontology }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = HpoTerm<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        self.ids
            .next()
            .map(|id| HpoTerm::new(self.ontology, self.ontology.get_unchecked(id)))
    }
}

/// A lazy breadth-first iterator of all descendants of a term
pub struct Descendants<'a> {
    ontology: &'a Ontology,
    queue: VecDeque<HpoTermId>,
    seen: HpoGroup,
}

impl<'a> Descendants<'a> {
    fn new(term: HpoTerm<'a>) -> Self {
        let mut seen = HpoGroup::new();
        seen.insert(term.id());
        Self {
            ontology: term.ontology,
            queue: term.child_ids().iter().collect(),
            seen,
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = HpoTerm<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.queue.pop_front() {
            if !self.seen.insert(id) {
                continue;
            }
            let term = self.ontology.get_unchecked(id);
            self.queue.extend(term.children().iter());
            return Some(HpoTerm::new(self.ontology, term));
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ontology::Builder;

    /// ```text
    ///         1
    ///        / \
    ///       2   3
    ///      / \ / \
    ///     4   5   6
    /// ```
    fn diamond() -> Ontology {
        let mut builder = Builder::new();
        for (id, name) in [
            (1u32, "root"),
            (2u32, "left"),
            (3u32, "right"),
            (4u32, "left leaf"),
            (5u32, "shared leaf"),
            (6u32, "right leaf"),
        ] {
            builder.add_term(id, name);
        }
        builder.add_parent(1u32, 2u32);
        builder.add_parent(1u32, 3u32);
        builder.add_parent(2u32, 4u32);
        builder.add_parent(2u32, 5u32);
        builder.add_parent(3u32, 5u32);
        builder.add_parent(3u32, 6u32);
        builder.build().unwrap()
    }

    #[test]
    fn ancestors_exclude_the_term_itself() {
        let ontology = diamond();
        let term = ontology.term(5u32).unwrap();
        let ids: Vec<HpoTermId> = term.ancestor_ids().iter().collect();
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
    fn descendants_are_breadth_first_and_unique() {
        let ontology = diamond();
        let root = ontology.term(1u32).unwrap();
        let ids: Vec<HpoTermId> = root.descendants().map(|t| t.id()).collect();
        // term 5 is reachable via 2 and 3 but appears once
        assert_eq!(
            ids,
            vec![
                HpoTermId::from(2u32),
                HpoTermId::from(3u32),
                HpoTermId::from(4u32),
                HpoTermId::from(5u32),
                HpoTermId::from(6u32)
            ]
        );
        assert_eq!(ontology.term(4u32).unwrap().descendants().count(), 0);
    }

    #[test]
    fn ancestry_checks() {
        let ontology = diamond();
        let root = ontology.term(1u32).unwrap();
        let left = ontology.term(2u32).unwrap();
        let shared = ontology.term(5u32).unwrap();

        assert!(root.is_ancestor_of(&shared));
        assert!(shared.is_descendant_of(&left));
        assert!(!shared.is_ancestor_of(&left));
        assert!(!root.is_ancestor_of(&root));
    }

    #[test]
    fn neighbours_share_a_parent_or_child() {
        let ontology = diamond();
        let left = ontology.term(2u32).unwrap();
        let ids: Vec<HpoTermId> = left.neighbour_ids().iter().collect();
        // 3 shares parent 1 and child 5; 1, 4, 5 are direct relatives
        assert_eq!(ids, vec![HpoTermId::from(3u32)]);
    }

    #[test]
    fn common_and_union_ancestors_include_both_terms() {
        let ontology = diamond();
        let left = ontology.term(2u32).unwrap();
        let shared = ontology.term(5u32).unwrap();

        let common: Vec<HpoTermId> = left.common_ancestor_ids(&shared).iter().collect();
        assert_eq!(common, vec![HpoTermId::from(1u32), HpoTermId::from(2u32)]);

        let union = left.union_ancestor_ids(&shared);
        assert_eq!(union.len(), 4);
        assert!(union.contains(&5u32.into()));
    }

    #[test]
    fn mica_prefers_high_ic_then_low_id() {
        let ontology = diamond();
        let left_leaf = ontology.term(4u32).unwrap();
        let right_leaf = ontology.term(6u32).unwrap();

        // only common ancestor is the root
        let mica = left_leaf
            .mica(&right_leaf, InformationContentKind::Decipher)
            .unwrap();
        assert_eq!(mica.id(), HpoTermId::from(1u32));

        // structural IC favors the deeper shared ancestor
        let shared = ontology.term(5u32).unwrap();
        let mica = left_leaf
            .mica(&shared, InformationContentKind::Decipher)
            .unwrap();
        assert_eq!(mica.id(), HpoTermId::from(2u32));

        // a term subsuming the other is its own MICA
        let left = ontology.term(2u32).unwrap();
        let mica = left.mica(&shared, InformationContentKind::Decipher).unwrap();
        assert_eq!(mica.id(), HpoTermId::from(2u32));
    }

    #[test]
    fn distances() {
        let ontology = diamond();
        let left_leaf = ontology.term(4u32).unwrap();
        let right_leaf = ontology.term(6u32).unwrap();
        let shared = ontology.term(5u32).unwrap();

        assert_eq!(left_leaf.distance_to(&left_leaf), Some(0));
        assert_eq!(left_leaf.distance_to(&shared), Some(2));
        assert_eq!(left_leaf.distance_to(&right_leaf), Some(4));
        assert_eq!(
            ontology.term(2u32).unwrap().distance_to(&shared),
            Some(1)
        );
    }
}
