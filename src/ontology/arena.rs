use std::collections::HashMap;

use crate::term::{HpoTermId, HpoTermInternal};

/// Owns all term records of the ontology
///
/// Records are stored densely in insertion order; an id lookup table maps
/// [`HpoTermId`]s to their slot. The arena is the single owner of all
/// terms, every relation between terms is expressed as ids into it.
#[derive(Default, Debug, Clone)]
pub(crate) struct Arena {
    terms: Vec<HpoTermInternal>,
    lookup: HashMap<HpoTermId, usize>,
}

impl Arena {
    /// Adds a term record, returning `false` if the id is already present
    pub fn insert(&mut self, term: HpoTermInternal) -> bool {
        if self.lookup.contains_key(&term.id()) {
            return false;
        }
        self.lookup.insert(term.id(), self.terms.len());
        self.terms.push(term);
        true
    }

    pub fn contains(&self, id: HpoTermId) -> bool {
        self.lookup.contains_key(&id)
    }

    pub fn get(&self, id: HpoTermId) -> Option<&HpoTermInternal> {
        self.lookup.get(&id).map(|idx| &self.terms[*idx])
    }

    pub fn get_mut(&mut self, id: HpoTermId) -> Option<&mut HpoTermInternal> {
        self.lookup.get(&id).map(|idx| &mut self.terms[*idx])
    }

    /// # Panics
    ///
    /// Panics if the id is not part of the arena. Within the crate all
    /// stored relations point at existing terms, which the builder
    /// guarantees before the ontology is frozen.
    pub fn get_unchecked(&self, id: HpoTermId) -> &HpoTermInternal {
        self.get(id).expect("every linked HpoTermId is in the arena")
    }

    pub fn get_unchecked_mut(&mut self, id: HpoTermId) -> &mut HpoTermInternal {
        self.get_mut(id)
            .expect("every linked HpoTermId is in the arena")
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// All term ids in insertion order
    pub fn keys(&self) -> Vec<HpoTermId> {
        self.terms.iter().map(HpoTermInternal::id).collect()
    }

    /// All term records in insertion order
    pub fn values(&self) -> &[HpoTermInternal] {
        &self.terms
    }

    pub fn values_mut(&mut self) -> std::slice::IterMut<'_, HpoTermInternal> {
        self.terms.iter_mut()
    }
}
