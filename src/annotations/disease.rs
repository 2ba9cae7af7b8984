use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use crate::annotations::AnnotationId;
use crate::set::HpoSet;
use crate::term::HpoGroup;
use crate::{HpoError, HpoResult, HpoTerm, HpoTermId, Ontology};

/// Common behaviour of OMIM and Orphanet disease records
///
/// Diseases carry, in addition to their associated terms, a set of terms
/// that are documented as explicitly absent in the disease.
pub trait Disease: PartialEq + Eq + Hash + Sized {
    /// The identifier type of the disease, e.g. [`OmimDiseaseId`]
    type Id: AnnotationId;

    /// The unique id of the disease
    fn id(&self) -> &Self::Id;

    /// The name of the disease
    fn name(&self) -> &str;

    /// The group of all terms associated with the disease
    fn hpo_terms(&self) -> &HpoGroup;

    /// The group of terms documented as explicitly absent
    fn excluded_hpo_terms(&self) -> &HpoGroup;

    /// The number of diseases of this kind in the ontology
    ///
    /// Statistical models over a disease corpus must draw their
    /// population from the matching registry, OMIM and Orphanet sizes
    /// are not interchangeable.
    fn corpus_size(ontology: &Ontology) -> usize;

    /// The ids of the diseases of this kind annotated to the term
    fn of_term<'a>(term: &HpoTerm<'a>) -> &'a HashSet<Self::Id>;

    /// Creates an [`HpoSet`] of all terms associated with the disease
    fn to_hpo_set<'a>(&self, ontology: &'a Ontology) -> HpoSet<'a> {
        HpoSet::new(ontology, self.hpo_terms().clone())
    }
}

macro_rules! disease_record {
    ($(#[$meta:meta])* $disease:ident, $id:ident, $set:ident, $prefix:literal, $accessor:ident) => {
        /// A set of disease ids
        pub type $set = HashSet<$id>;

        #[doc = concat!("A unique identifier of ", $prefix, " disease")]
        #[derive(Clone, Copy, Default, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
        pub struct $id {
            inner: u32,
        }

        impl AnnotationId for $id {
            fn as_u32(&self) -> u32 {
                self.inner
            }
        }

        impl TryFrom<&str> for $id {
            type Error = HpoError;
            fn try_from(value: &str) -> HpoResult<Self> {
                Ok($id {
                    inner: value.parse::<u32>()?,
                })
            }
        }

        impl From<u32> for $id {
            fn from(inner: u32) -> Self {
                $id { inner }
            }
        }

        impl Display for $id {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}:{}", $prefix, self.inner)
            }
        }

        $(#[$meta])*
        #[derive(Default, Debug, Clone)]
        pub struct $disease {
            id: $id,
            name: String,
            hpos: HpoGroup,
            excluded_hpos: HpoGroup,
        }

        impl $disease {
            pub(crate) fn new(id: $id, name: &str) -> $disease {
                $disease {
                    id,
                    name: name.to_string(),
                    hpos: HpoGroup::default(),
                    excluded_hpos: HpoGroup::default(),
                }
            }

            pub(crate) fn add_term<I: Into<HpoTermId>>(&mut self, term_id: I) -> bool {
                self.hpos.insert(term_id)
            }

            pub(crate) fn add_excluded_term<I: Into<HpoTermId>>(&mut self, term_id: I) -> bool {
                self.excluded_hpos.insert(term_id)
            }
        }

        impl Disease for $disease {
            type Id = $id;

            fn id(&self) -> &$id {
                &self.id
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn hpo_terms(&self) -> &HpoGroup {
                &self.hpos
            }

            fn excluded_hpo_terms(&self) -> &HpoGroup {
                &self.excluded_hpos
            }

            fn corpus_size(ontology: &Ontology) -> usize {
                ontology.$accessor().count()
            }

            fn of_term<'a>(term: &HpoTerm<'a>) -> &'a $set {
                term.$accessor()
            }
        }

        impl PartialEq for $disease {
            fn eq(&self, other: &$disease) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $disease {}

        impl Hash for $disease {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }
    };
}

disease_record!(
    /// A single disease from OMIM with its associated terms
    OmimDisease,
    OmimDiseaseId,
    OmimDiseases,
    "OMIM",
    omim_diseases
);

disease_record!(
    /// A single disease from Orphanet with its associated terms
    OrphaDisease,
    OrphaDiseaseId,
    OrphaDiseases,
    "ORPHA",
    orpha_diseases
);
