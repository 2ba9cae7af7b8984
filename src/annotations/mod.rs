//! Genes and diseases that are annotated to terms of the ontology
//!
//! Annotations are loaded once during ontology construction and propagated
//! upward: an item linked to a term is also linked to every ancestor of
//! that term.

mod disease;
mod gene;

pub use disease::{
    Disease, OmimDisease, OmimDiseaseId, OmimDiseases, OrphaDisease, OrphaDiseaseId, OrphaDiseases,
};
pub use gene::{Gene, GeneId, Genes};

/// Common behaviour of gene and disease identifiers
pub trait AnnotationId: Copy + Ord {
    /// Convert `self` to `u32`
    fn as_u32(&self) -> u32;
}
