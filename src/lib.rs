//! `hpoquery` answers semantic questions over the Human Phenotype Ontology
//!
//! The crate holds the full ontology graph in memory and provides
//!
//! - term lookup by `HP:0001234` id, bare integer or exact name
//! - ancestor/descendant traversal of the `is-a` hierarchy
//! - gene and disease annotations, propagated to all ancestor terms
//! - information content per annotation source
//! - pairwise and set-to-set semantic similarity with several algorithms
//! - hypergeometric enrichment of genes, diseases and terms
//!
//! The ontology is constructed once at startup through [`ontology::Builder`]
//! and is immutable afterwards. All query operations work on shared
//! references, so one [`Ontology`] can serve arbitrarily many concurrent
//! requests.
//!
//! # Examples
//!
//! ```
//! use hpoquery::ontology::Builder;
//!
//! let mut builder = Builder::new();
//! builder.add_term(1u32, "All");
//! builder.add_term(2u32, "Abnormal phenotype");
//! builder.add_parent(1u32, 2u32);
//! let ontology = builder.build().unwrap();
//!
//! let term = ontology.term("Abnormal phenotype").unwrap();
//! assert_eq!(term.id().to_string(), "HP:0000002");
//! ```
use std::num::ParseIntError;

use thiserror::Error;

pub mod annotations;
mod matrix;
pub mod ontology;
mod set;
pub mod similarity;
pub mod stats;
pub mod term;

pub use ontology::{Ontology, TermQuery};
pub use set::HpoSet;
pub use term::{HpoTerm, HpoTermId, InformationContentKind};

const DEFAULT_NUM_PARENTS: usize = 10;
const DEFAULT_NUM_ALL_PARENTS: usize = 50;
const DEFAULT_NUM_GENES: usize = 50;
const DEFAULT_NUM_OMIM: usize = 20;

/// Errors of the `hpoquery` crate
///
/// Build-time errors ([`HpoError::MalformedOntology`]) are fatal and abort
/// ontology construction. All other variants are query-time errors that are
/// returned to the caller as structured failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HpoError {
    /// A term, gene or disease identifier could not be resolved
    #[error("`{0}` does not exist")]
    NotFound(String),
    /// One or more tokens of a term-set query failed to resolve.
    /// Carries every offending token so callers can report them all at once.
    #[error("invalid term reference(s): {}", .0.join(", "))]
    InvalidTermReference(Vec<String>),
    /// The ontology source data is inconsistent (cycle, dangling parent,
    /// duplicate term name). Fatal at build time.
    #[error("malformed ontology: {0}")]
    MalformedOntology(String),
    /// An unknown similarity method name was requested
    #[error("unknown similarity method `{0}`")]
    UnknownMethod(String),
    /// An unknown score-combination name was requested
    #[error("unknown combination method `{0}`")]
    UnknownCombiner(String),
    /// An enrichment method other than `hypergeom` was requested
    #[error("unsupported enrichment method `{0}`")]
    UnsupportedMethod(String),
    /// An unknown information-content kind was requested
    #[error("unknown annotation kind `{0}`")]
    UnknownKind(String),
    /// An identifier could not be parsed as an integer
    #[error("unable to parse integer")]
    ParseIntError,
}

impl From<ParseIntError> for HpoError {
    fn from(_: ParseIntError) -> Self {
        HpoError::ParseIntError
    }
}

/// Crate-wide `Result` with [`HpoError`]
pub type HpoResult<T> = Result<T, HpoError>;
