//! The `Ontology` is the central struct of the crate, owning all terms
//! and annotations
use std::collections::HashMap;

use crate::annotations::{Gene, GeneId, OmimDisease, OmimDiseaseId, OrphaDisease, OrphaDiseaseId};
use crate::term::{HpoTerm, HpoTermId, HpoTermInternal, InformationContent, InformationContentKind};
use crate::{HpoError, HpoResult};

mod arena;
mod builder;

pub(crate) use arena::Arena;
pub use builder::{
    Builder, ConnectedBuilder, DiseaseAnnotation, GeneAnnotation, LoadReport, TermRecord,
};

/// A term lookup query, either by id or by exact name
///
/// Most callers never name this type: [`Ontology::term`] accepts anything
/// that converts into it, which covers `u32`, [`HpoTermId`] and `&str`.
/// A string is interpreted as an id if it parses as one (`"HP:0000118"`,
/// `"118"`) and as a name otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermQuery<'a> {
    /// Lookup by term id
    Id(HpoTermId),
    /// Lookup by exact term name
    Name(&'a str),
}

impl<'a> From<&'a str> for TermQuery<'a> {
    fn from(s: &'a str) -> Self {
        match HpoTermId::try_from(s) {
            Ok(id) => TermQuery::Id(id),
            Err(_) => TermQuery::Name(s),
        }
    }
}

impl From<u32> for TermQuery<'_> {
    fn from(id: u32) -> Self {
        TermQuery::Id(id.into())
    }
}

impl From<HpoTermId> for TermQuery<'_> {
    fn from(id: HpoTermId) -> Self {
        TermQuery::Id(id)
    }
}

/// The read-only ontology graph with all annotations attached
///
/// Constructed through [`Builder`]; after construction every operation
/// takes `&self`, so a single instance can back any number of concurrent
/// queries.
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
/// assert!(ontology.term("HP:0000118").is_ok());
/// assert!(ontology.term("Phenotypic abnormality").is_ok());
/// assert!(ontology.term(999u32).is_err());
/// ```
pub struct Ontology {
    terms: Arena,
    names: HashMap<String, HpoTermId>,
    search_order: Vec<HpoTermId>,
    genes: HashMap<GeneId, Gene>,
    omim_diseases: HashMap<OmimDiseaseId, OmimDisease>,
    orpha_diseases: HashMap<OrphaDiseaseId, OrphaDisease>,
    max_ic: InformationContent,
}

impl Ontology {
    pub(crate) fn new(
        terms: Arena,
        names: HashMap<String, HpoTermId>,
        search_order: Vec<HpoTermId>,
        genes: HashMap<GeneId, Gene>,
        omim_diseases: HashMap<OmimDiseaseId, OmimDisease>,
        orpha_diseases: HashMap<OrphaDiseaseId, OrphaDisease>,
        max_ic: InformationContent,
    ) -> Self {
        Self {
            terms,
            names,
            search_order,
            genes,
            omim_diseases,
            orpha_diseases,
            max_ic,
        }
    }

    /// Returns the term matching the query
    ///
    /// The query can be an [`HpoTermId`], a `u32`, or a `&str` holding
    /// either an id (`"HP:0000118"`, `"118"`) or an exact term name.
    ///
    /// # Errors
    ///
    /// [`HpoError::NotFound`] if no term matches
    pub fn term<'a, Q: Into<TermQuery<'a>>>(&self, query: Q) -> HpoResult<HpoTerm<'_>> {
        match query.into() {
            TermQuery::Id(id) => HpoTerm::try_new(self, id),
            TermQuery::Name(name) => {
                let id = self
                    .names
                    .get(name)
                    .ok_or_else(|| HpoError::NotFound(name.to_string()))?;
                HpoTerm::try_new(self, *id)
            }
        }
    }

    pub(crate) fn get(&self, id: HpoTermId) -> Option<&HpoTermInternal> {
        self.terms.get(id)
    }

    pub(crate) fn get_unchecked(&self, id: HpoTermId) -> &HpoTermInternal {
        self.terms.get_unchecked(id)
    }

    /// The number of terms in the ontology
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the ontology contains no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// An iterator of all terms, in ascending id order
    pub fn hpos(&self) -> OntologyIterator<'_> {
        OntologyIterator {
            inner: self.search_order.iter(),
            ontology: self,
        }
    }

    /// Case-insensitive substring search over term names and synonyms
    ///
    /// Terms whose name equals the query rank first, all other matches
    /// follow in ascending id order. Matches are yielded lazily, so
    /// callers can page with `skip`/`take` without scoring every term.
    pub fn search<'a>(&'a self, query: &'a str) -> impl Iterator<Item = HpoTerm<'a>> + 'a {
        let exact = query.to_lowercase();
        let substring = exact.clone();

        let exact_matches = self
            .hpos()
            .filter(move |term| term.name().to_lowercase() == exact);
        let substring_matches = self.hpos().filter(move |term| {
            let name = term.name().to_lowercase();
            name != substring
                && (name.contains(&substring)
                    || term
                        .synonyms()
                        .iter()
                        .any(|synonym| synonym.to_lowercase().contains(&substring)))
        });
        exact_matches.chain(substring_matches)
    }

    /// Returns the gene with the given id, if present
    pub fn gene(&self, gene_id: &GeneId) -> Option<&Gene> {
        self.genes.get(gene_id)
    }

    /// Returns the gene with the given symbol, if present
    ///
    /// Symbols are not indexed, so this is a linear scan.
    pub fn gene_by_symbol(&self, symbol: &str) -> Option<&Gene> {
        self.genes.values().find(|gene| gene.symbol() == symbol)
    }

    /// An iterator of all genes, in arbitrary order
    pub fn genes(&self) -> impl Iterator<Item = &Gene> {
        self.genes.values()
    }

    /// Returns the OMIM disease with the given id, if present
    pub fn omim_disease(&self, disease_id: &OmimDiseaseId) -> Option<&OmimDisease> {
        self.omim_diseases.get(disease_id)
    }

    /// An iterator of all OMIM diseases, in arbitrary order
    pub fn omim_diseases(&self) -> impl Iterator<Item = &OmimDisease> {
        self.omim_diseases.values()
    }

    /// Returns the Orphanet disease with the given id, if present
    pub fn orpha_disease(&self, disease_id: &OrphaDiseaseId) -> Option<&OrphaDisease> {
        self.orpha_diseases.get(disease_id)
    }

    /// An iterator of all Orphanet diseases, in arbitrary order
    pub fn orpha_diseases(&self) -> impl Iterator<Item = &OrphaDisease> {
        self.orpha_diseases.values()
    }

    /// The largest information content of the given kind across all terms
    pub fn max_information_content(&self, kind: InformationContentKind) -> f32 {
        self.max_ic.get_kind(kind)
    }
}

impl std::fmt::Debug for Ontology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ontology with {} terms, {} genes, {} OMIM and {} Orphanet diseases",
            self.terms.len(),
            self.genes.len(),
            self.omim_diseases.len(),
            self.orpha_diseases.len()
        )
    }
}

/// An iterator of all terms of the ontology, in ascending id order
pub struct OntologyIterator<'a> {
    inner: std::slice::Iter<'a, HpoTermId>,
    ontology: &'a Ontology,
}

impl<'a> Iterator for OntologyIterator<'a> {
    type Item = HpoTerm<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|id| HpoTerm::new(self.ontology, self.ontology.get_unchecked(*id)))
    }
}

impl<'a> IntoIterator for &'a Ontology {
    type Item = HpoTerm<'a>;
    type IntoIter = OntologyIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.hpos()
    }
}
