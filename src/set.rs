//! A set of HPO terms, the unit of most higher-level queries
use std::collections::HashSet;

use crate::annotations::{Gene, OmimDiseaseId, OrphaDiseaseId};
use crate::similarity::{Builtins, GroupSimilarity, SimilarityCombiner, StandardCombiner};
use crate::term::{self, HpoGroup, HpoTermId, InformationContentKind};
use crate::{HpoError, HpoResult, Ontology};

/// A set of distinct ontology terms
///
/// `HpoSet` models a patient's clinical information, a gene's or a
/// disease's phenotype spectrum. Members are kept unique and in ascending
/// id order, so every aggregate operation is deterministic.
///
/// # Examples
///
/// ```
/// use hpoquery::ontology::Builder;
/// use hpoquery::HpoSet;
///
/// let mut builder = Builder::new();
/// builder.add_term(1u32, "All");
/// builder.add_term(2u32, "Short stature");
/// builder.add_term(3u32, "Macular atrophy");
/// builder.add_parent(1u32, 2u32);
/// builder.add_parent(1u32, 3u32);
/// let ontology = builder.build().unwrap();
///
/// let set = HpoSet::from_queries(&ontology, ["HP:0000002", "Macular atrophy"]).unwrap();
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.to_serialized(), "2+3");
/// ```
#[derive(Clone)]
pub struct HpoSet<'a> {
    ontology: &'a Ontology,
    group: HpoGroup,
}

impl<'a> HpoSet<'a> {
    /// Constructs a set from an existing group of term ids
    ///
    /// The ids are not validated here; accessing a member that does not
    /// exist in the ontology fails at query time.
    pub fn new(ontology: &'a Ontology, group: HpoGroup) -> Self {
        Self { ontology, group }
    }

    /// Resolves a list of identifiers into a set
    ///
    /// Every identifier is resolved like [`Ontology::term`], duplicates
    /// collapse silently.
    ///
    /// # Errors
    ///
    /// [`HpoError::InvalidTermReference`] carrying every identifier that
    /// failed to resolve. All identifiers are checked before returning,
    /// so the error lists the complete set of offending tokens.
    pub fn from_queries<I>(ontology: &'a Ontology, queries: I) -> HpoResult<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut group = HpoGroup::new();
        let mut invalid = Vec::new();
        for query in queries {
            let query = query.as_ref();
            match ontology.term(query) {
                Ok(term) => {
                    group.insert(term.id());
                }
                Err(_) => invalid.push(query.to_string()),
            }
        }
        if invalid.is_empty() {
            Ok(Self::new(ontology, group))
        } else {
            Err(HpoError::InvalidTermReference(invalid))
        }
    }

    /// Resolves a comma-separated list of identifiers into a set
    ///
    /// Empty tokens are skipped, so `"1,,2"` and `"1,2"` are equivalent.
    ///
    /// # Errors
    ///
    /// Same as [`HpoSet::from_queries`]
    pub fn from_query_string(ontology: &'a Ontology, query: &str) -> HpoResult<Self> {
        Self::from_queries(
            ontology,
            query.split(',').map(str::trim).filter(|s| !s.is_empty()),
        )
    }

    /// Reconstructs a set from its [`HpoSet::to_serialized`] form
    ///
    /// Empty tokens are skipped, so the empty string deserializes into
    /// the empty set and the round trip holds for every set.
    ///
    /// # Errors
    ///
    /// [`HpoError::ParseIntError`] if a token is not an integer,
    /// [`HpoError::NotFound`] if an id is not part of the ontology
    pub fn from_serialized(ontology: &'a Ontology, serialized: &str) -> HpoResult<Self> {
        let mut group = HpoGroup::new();
        for token in serialized.split('+').filter(|s| !s.is_empty()) {
            let id = HpoTermId::try_from(token)?;
            if ontology.get(id).is_none() {
                return Err(HpoError::NotFound(id.to_string()));
            }
            group.insert(id);
        }
        Ok(Self::new(ontology, group))
    }

    /// Serializes the member ids into a single reversible token
    ///
    /// Ids are joined with `+` in ascending order, e.g. `"2+118+5041"`.
    pub fn to_serialized(&self) -> String {
        self.group
            .iter()
            .map(|id| id.as_u32().to_string())
            .collect::<Vec<String>>()
            .join("+")
    }

    pub(crate) fn ontology(&self) -> &'a Ontology {
        self.ontology
    }

    /// The number of terms in the set
    pub fn len(&self) -> usize {
        self.group.len()
    }

    /// Returns `true` if the set contains no terms
    pub fn is_empty(&self) -> bool {
        self.group.is_empty()
    }

    /// Returns `true` if the set contains the term
    pub fn contains(&self, id: &HpoTermId) -> bool {
        self.group.contains(id)
    }

    /// Adds a term to the set, a no-op if it is already a member
    pub fn add(&mut self, id: HpoTermId) -> bool {
        self.group.insert(id)
    }

    /// The member term ids
    pub fn term_ids(&self) -> &HpoGroup {
        &self.group
    }

    /// An iterator of the member terms in ascending id order
    pub fn iter(&self) -> term::Iter<'_> {
        term::Iter::new(self.group.iter(), self.ontology)
    }

    /// The union of both sets
    pub fn union(&self, other: &HpoSet<'a>) -> HpoSet<'a> {
        Self::new(self.ontology, &self.group | &other.group)
    }

    /// The intersection of both sets
    pub fn intersection(&self, other: &HpoSet<'a>) -> HpoSet<'a> {
        Self::new(self.ontology, &self.group & &other.group)
    }

    /// The mean information content of the member terms
    ///
    /// An empty set has an information content of `0.0`.
    pub fn information_content(&self, kind: InformationContentKind) -> f32 {
        if self.group.is_empty() {
            return 0.0;
        }
        self.iter()
            .map(|term| term.information_content().get_kind(kind))
            .sum::<f32>()
            / self.group.len() as f32
    }

    /// The population variance of the member terms' information content
    pub fn variance(&self, kind: InformationContentKind) -> f32 {
        if self.group.is_empty() {
            return 0.0;
        }
        let mean = self.information_content(kind);
        self.iter()
            .map(|term| {
                let deviation = term.information_content().get_kind(kind) - mean;
                deviation * deviation
            })
            .sum::<f32>()
            / self.group.len() as f32
    }

    /// All genes associated with at least one member term
    pub fn gene_ids(&self) -> HashSet<crate::annotations::GeneId> {
        self.iter()
            .flat_map(|term| term.genes().iter().copied().collect::<Vec<_>>())
            .collect()
    }

    /// An iterator of all genes associated with at least one member term
    pub fn genes(&self) -> impl Iterator<Item = &'a Gene> + '_ {
        self.gene_ids()
            .into_iter()
            .filter_map(|id| self.ontology.gene(&id))
    }

    /// All OMIM diseases associated with at least one member term
    pub fn omim_disease_ids(&self) -> HashSet<OmimDiseaseId> {
        self.iter()
            .flat_map(|term| term.omim_diseases().iter().copied().collect::<Vec<_>>())
            .collect()
    }

    /// All Orphanet diseases associated with at least one member term
    pub fn orpha_disease_ids(&self) -> HashSet<OrphaDiseaseId> {
        self.iter()
            .flat_map(|term| term.orpha_diseases().iter().copied().collect::<Vec<_>>())
            .collect()
    }

    /// Set-to-set similarity with an explicit method and combiner
    pub fn similarity<C: SimilarityCombiner>(
        &self,
        other: &HpoSet,
        similarity: Builtins,
        combiner: C,
    ) -> f32 {
        GroupSimilarity::new(combiner, similarity).calculate(self, other)
    }

    /// Set-to-set similarity with method and combiner given by name
    ///
    /// This is the entry point used when method and combination arrive as
    /// request parameters, e.g. `("omim", "graphic", "funSimAvg")`.
    ///
    /// # Errors
    ///
    /// - [`HpoError::UnknownKind`] for an invalid annotation kind
    /// - [`HpoError::UnknownMethod`] for an invalid method name
    /// - [`HpoError::UnknownCombiner`] for an invalid combination name
    pub fn similarity_by_name(
        &self,
        other: &HpoSet,
        kind: &str,
        method: &str,
        combine: &str,
    ) -> HpoResult<f32> {
        let kind: InformationContentKind = kind.parse()?;
        let similarity = Builtins::parse(method, kind)?;
        let combiner: StandardCombiner = combine.parse()?;
        Ok(self.similarity(other, similarity, combiner))
    }
}

impl std::fmt::Debug for HpoSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HpoSet with {} terms", self.len())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ontology::Builder;

    fn ontology() -> Ontology {
        let mut builder = Builder::new();
        builder.add_term(1u32, "All");
        builder.add_term(2u32, "Short stature");
        builder.add_term(3u32, "Macular atrophy");
        builder.add_term(4u32, "Seizure");
        builder.add_parent(1u32, 2u32);
        builder.add_parent(1u32, 3u32);
        builder.add_parent(1u32, 4u32);
        builder.build().unwrap()
    }

    #[test]
    fn from_queries_collects_all_errors() {
        let ontology = ontology();
        let err = HpoSet::from_queries(&ontology, ["HP:0000002", "nope", "also nope"]).unwrap_err();
        assert_eq!(
            err,
            HpoError::InvalidTermReference(vec!["nope".to_string(), "also nope".to_string()])
        );
    }

    #[test]
    fn from_query_string_skips_empty_tokens() {
        let ontology = ontology();
        let set = HpoSet::from_query_string(&ontology, "2, ,3,").unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn serialization_round_trip() {
        let ontology = ontology();
        let set = HpoSet::from_query_string(&ontology, "4,2,3").unwrap();
        assert_eq!(set.to_serialized(), "2+3+4");

        let restored = HpoSet::from_serialized(&ontology, "2+3+4").unwrap();
        assert_eq!(restored.term_ids(), set.term_ids());
    }

    #[test]
    fn empty_set_round_trips() {
        let ontology = ontology();
        let empty = HpoSet::new(&ontology, HpoGroup::new());
        assert_eq!(empty.to_serialized(), "");

        let restored = HpoSet::from_serialized(&ontology, &empty.to_serialized()).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn from_serialized_rejects_bad_input() {
        let ontology = ontology();
        assert_eq!(
            HpoSet::from_serialized(&ontology, "2+x").unwrap_err(),
            HpoError::ParseIntError
        );
        assert_eq!(
            HpoSet::from_serialized(&ontology, "2+999").unwrap_err(),
            HpoError::NotFound("HP:0000999".to_string())
        );
    }

    #[test]
    fn set_algebra() {
        let ontology = ontology();
        let a = HpoSet::from_query_string(&ontology, "2,3").unwrap();
        let b = HpoSet::from_query_string(&ontology, "3,4").unwrap();

        assert_eq!(a.union(&b).to_serialized(), "2+3+4");
        assert_eq!(a.intersection(&b).to_serialized(), "3");
    }

    #[test]
    fn add_is_idempotent() {
        let ontology = ontology();
        let mut set = HpoSet::from_query_string(&ontology, "2").unwrap();
        assert!(set.add(3u32.into()));
        assert!(!set.add(3u32.into()));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn similarity_by_name_validates_input() {
        let ontology = ontology();
        let a = HpoSet::from_query_string(&ontology, "2,3").unwrap();
        let b = HpoSet::from_query_string(&ontology, "3,4").unwrap();

        assert!(a.similarity_by_name(&b, "omim", "graphic", "funSimAvg").is_ok());
        assert_eq!(
            a.similarity_by_name(&b, "omim", "nope", "funSimAvg").unwrap_err(),
            HpoError::UnknownMethod("nope".to_string())
        );
        assert_eq!(
            a.similarity_by_name(&b, "nope", "graphic", "funSimAvg").unwrap_err(),
            HpoError::UnknownKind("nope".to_string())
        );
        assert_eq!(
            a.similarity_by_name(&b, "omim", "graphic", "nope").unwrap_err(),
            HpoError::UnknownCombiner("nope".to_string())
        );
    }

    #[test]
    fn similarity_is_deterministic_and_symmetric_with_fun_sim_avg() {
        let ontology = ontology();
        let a = HpoSet::from_query_string(&ontology, "2,3").unwrap();
        let b = HpoSet::from_query_string(&ontology, "3,4").unwrap();

        let first = a
            .similarity_by_name(&b, "omim", "graphic", "funSimAvg")
            .unwrap();
        let second = a
            .similarity_by_name(&b, "omim", "graphic", "funSimAvg")
            .unwrap();
        let reversed = b
            .similarity_by_name(&a, "omim", "graphic", "funSimAvg")
            .unwrap();

        assert!((0.0..=1.0).contains(&first));
        assert_eq!(first, second);
        assert_eq!(first, reversed);
    }

    #[test]
    fn empty_set_similarity_is_zero() {
        let ontology = ontology();
        let empty = HpoSet::new(&ontology, HpoGroup::new());
        let set = HpoSet::from_query_string(&ontology, "2,3").unwrap();

        assert_eq!(
            empty
                .similarity_by_name(&set, "omim", "graphic", "funSimAvg")
                .unwrap(),
            0.0
        );
    }
}
