use std::collections::HashSet;
use std::fmt::Display;

use crate::annotations::AnnotationId;
use crate::set::HpoSet;
use crate::term::HpoGroup;
use crate::{HpoError, HpoResult, HpoTermId, Ontology};

/// A set of [`GeneId`]s
pub type Genes = HashSet<GeneId>;

/// A unique identifier of a [`Gene`], the HGNC gene id
#[derive(Clone, Copy, Default, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct GeneId {
    inner: u32,
}

impl AnnotationId for GeneId {
    fn as_u32(&self) -> u32 {
        self.inner
    }
}

impl TryFrom<&str> for GeneId {
    type Error = HpoError;
    fn try_from(value: &str) -> HpoResult<Self> {
        Ok(GeneId {
            inner: value.parse::<u32>()?,
        })
    }
}

impl From<u32> for GeneId {
    fn from(inner: u32) -> Self {
        GeneId { inner }
    }
}

impl Display for GeneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HGNC:{}", self.inner)
    }
}

/// A single gene with its associated terms
///
/// The term group contains the directly annotated terms plus all their
/// ancestors once the ontology is built.
#[derive(Default, Debug, Clone)]
pub struct Gene {
    id: GeneId,
    symbol: String,
    hpos: HpoGroup,
}

impl Gene {
    pub(crate) fn new(id: GeneId, symbol: &str) -> Gene {
        Gene {
            id,
            symbol: symbol.to_string(),
            hpos: HpoGroup::default(),
        }
    }

    /// The unique id of the gene
    pub fn id(&self) -> &GeneId {
        &self.id
    }

    /// The HGNC gene symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The gene symbol, alias of [`Gene::symbol`]
    pub fn name(&self) -> &str {
        &self.symbol
    }

    pub(crate) fn add_term<I: Into<HpoTermId>>(&mut self, term_id: I) -> bool {
        self.hpos.insert(term_id)
    }

    /// The group of all terms associated with the gene
    pub fn hpo_terms(&self) -> &HpoGroup {
        &self.hpos
    }

    /// Creates an [`HpoSet`] of all terms associated with the gene
    pub fn to_hpo_set<'a>(&self, ontology: &'a Ontology) -> HpoSet<'a> {
        HpoSet::new(ontology, self.hpos.clone())
    }
}

impl PartialEq for Gene {
    fn eq(&self, other: &Gene) -> bool {
        self.id == other.id
    }
}

impl Eq for Gene {}
