//! Pairwise and set-to-set semantic similarity
//!
//! A [`Similarity`] scores two individual terms, a [`SimilarityCombiner`]
//! reduces the pairwise score matrix of two term sets to a single value.
//! All built-in methods are available by name through [`Builtins::parse`]
//! and [`StandardCombiner`]'s `FromStr`, mirroring how they are requested
//! over the wire.
//!
//! # Examples
//!
//! ```
//! use hpoquery::ontology::Builder;
//! use hpoquery::similarity::{Builtins, Similarity};
//! use hpoquery::InformationContentKind;
//!
//! let mut builder = Builder::new();
//! builder.add_term(1u32, "All");
//! builder.add_term(2u32, "Child");
//! builder.add_parent(1u32, 2u32);
//! let ontology = builder.build().unwrap();
//!
//! let term = ontology.term(2u32).unwrap();
//! let equal = Builtins::parse("equal", InformationContentKind::Omim).unwrap();
//! assert_eq!(equal.calculate(&term, &term), 1.0);
//! ```
use std::str::FromStr;

pub use crate::matrix::ScoreMatrix;
use crate::term::{HpoTerm, InformationContentKind};
use crate::{HpoError, HpoResult};

/// Calculates the similarity of two individual terms
///
/// All implementations are symmetric: `calculate(a, b) == calculate(b, a)`.
pub trait Similarity {
    /// Returns the similarity score of the two terms
    fn calculate(&self, a: &HpoTerm, b: &HpoTerm) -> f32;
}

/// The information content of the most informative common ancestor
///
/// `sim = IC(mica)`; unbounded above, `0.0` if the terms share no
/// informative ancestor.
#[derive(Debug, Clone, Copy)]
pub struct Resnik(pub InformationContentKind);

impl Similarity for Resnik {
    fn calculate(&self, a: &HpoTerm, b: &HpoTerm) -> f32 {
        a.mica(b, self.0)
            .map_or(0.0, |mica| mica.information_content().get_kind(self.0))
    }
}

/// Lin similarity: `2·IC(mica) / (IC(a) + IC(b))`, in `[0, 1]`
#[derive(Debug, Clone, Copy)]
pub struct Lin(pub InformationContentKind);

impl Similarity for Lin {
    fn calculate(&self, a: &HpoTerm, b: &HpoTerm) -> f32 {
        let denominator = a.information_content().get_kind(self.0)
            + b.information_content().get_kind(self.0);
        if denominator == 0.0 {
            return 0.0;
        }
        2.0 * Resnik(self.0).calculate(a, b) / denominator
    }
}

/// Jiang & Conrath similarity as a reciprocal distance
///
/// `sim = 1 / (IC(a) + IC(b) − 2·IC(mica) + 1)`, in `(0, 1]`
#[derive(Debug, Clone, Copy)]
pub struct Jc(pub InformationContentKind);

impl Similarity for Jc {
    fn calculate(&self, a: &HpoTerm, b: &HpoTerm) -> f32 {
        let distance = a.information_content().get_kind(self.0)
            + b.information_content().get_kind(self.0)
            - 2.0 * Resnik(self.0).calculate(a, b);
        1.0 / (distance + 1.0)
    }
}

/// Jiang & Conrath similarity, normalized linearly
///
/// `sim = 1 − (IC(a) + IC(b) − 2·IC(mica)) / max_distance` where
/// `max_distance` is twice the largest IC in the ontology for the kind.
/// Clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct Jc2(pub InformationContentKind);

impl Similarity for Jc2 {
    fn calculate(&self, a: &HpoTerm, b: &HpoTerm) -> f32 {
        let max_distance = 2.0 * a.ontology().max_information_content(self.0);
        if max_distance == 0.0 {
            return 0.0;
        }
        let distance = a.information_content().get_kind(self.0)
            + b.information_content().get_kind(self.0)
            - 2.0 * Resnik(self.0).calculate(a, b);
        (1.0 - distance / max_distance).clamp(0.0, 1.0)
    }
}

/// Relevance similarity (Schlicker et al.)
///
/// Lin similarity weighted by how rare the MICA is:
/// `sim = lin(a, b) · (1 − exp(−IC(mica)))`
#[derive(Debug, Clone, Copy)]
pub struct Relevance(pub InformationContentKind);

impl Similarity for Relevance {
    fn calculate(&self, a: &HpoTerm, b: &HpoTerm) -> f32 {
        let mica_ic = Resnik(self.0).calculate(a, b);
        Lin(self.0).calculate(a, b) * (1.0 - (-mica_ic).exp())
    }
}

/// Information coefficient similarity (Li et al.)
///
/// `sim = lin(a, b) · (1 − 1 / (1 + IC(mica)))`
#[derive(Debug, Clone, Copy)]
pub struct InformationCoefficient(pub InformationContentKind);

impl Similarity for InformationCoefficient {
    fn calculate(&self, a: &HpoTerm, b: &HpoTerm) -> f32 {
        let mica_ic = Resnik(self.0).calculate(a, b);
        Lin(self.0).calculate(a, b) * (1.0 - 1.0 / (1.0 + mica_ic))
    }
}

/// Graph-based similarity, independent of any annotation corpus
///
/// The ratio of shared to combined ancestors, both terms counted as part
/// of their own ancestry: `|anc(a) ∩ anc(b)| / |anc(a) ∪ anc(b)|`.
/// Identical terms score `1.0`.
#[derive(Debug, Clone, Copy)]
pub struct GraphIc;

impl Similarity for GraphIc {
    fn calculate(&self, a: &HpoTerm, b: &HpoTerm) -> f32 {
        let union = a.union_ancestor_ids(b).len();
        if union == 0 {
            return 0.0;
        }
        a.common_ancestor_ids(b).len() as f32 / union as f32
    }
}

/// Reciprocal shortest-path similarity
///
/// `sim = 1 / (path_length + 1)`; identical terms score `1.0`, terms
/// without a common ancestor score `0.0`.
#[derive(Debug, Clone, Copy)]
pub struct Distance;

impl Similarity for Distance {
    fn calculate(&self, a: &HpoTerm, b: &HpoTerm) -> f32 {
        a.distance_to(b)
            .map_or(0.0, |steps| 1.0 / (steps as f32 + 1.0))
    }
}

/// `1.0` for identical terms, `0.0` otherwise
#[derive(Debug, Clone, Copy)]
pub struct Equal;

impl Similarity for Equal {
    fn calculate(&self, a: &HpoTerm, b: &HpoTerm) -> f32 {
        if a.id() == b.id() {
            1.0
        } else {
            0.0
        }
    }
}

/// The built-in similarity methods, selectable by name
///
/// This is the dispatch point for callers that receive the method as a
/// string, e.g. from a request parameter.
#[derive(Debug, Clone, Copy)]
pub enum Builtins {
    /// [`Resnik`]
    Resnik(InformationContentKind),
    /// [`Lin`]
    Lin(InformationContentKind),
    /// [`Jc`]
    Jc(InformationContentKind),
    /// [`Jc2`]
    Jc2(InformationContentKind),
    /// [`Relevance`]
    Relevance(InformationContentKind),
    /// [`InformationCoefficient`]
    InformationCoefficient(InformationContentKind),
    /// [`GraphIc`]
    GraphIc,
    /// [`Distance`]
    Distance,
    /// [`Equal`]
    Equal,
}

impl Builtins {
    /// Resolves a method name to its implementation
    ///
    /// # Errors
    ///
    /// [`HpoError::UnknownMethod`] for unrecognized names
    pub fn parse(method: &str, kind: InformationContentKind) -> HpoResult<Self> {
        match method {
            "resnik" => Ok(Self::Resnik(kind)),
            "lin" => Ok(Self::Lin(kind)),
            "jc" => Ok(Self::Jc(kind)),
            "jc2" => Ok(Self::Jc2(kind)),
            "rel" => Ok(Self::Relevance(kind)),
            "ic" => Ok(Self::InformationCoefficient(kind)),
            "graphic" => Ok(Self::GraphIc),
            "dist" => Ok(Self::Distance),
            "equal" => Ok(Self::Equal),
            _ => Err(HpoError::UnknownMethod(method.to_string())),
        }
    }
}

impl Similarity for Builtins {
    fn calculate(&self, a: &HpoTerm, b: &HpoTerm) -> f32 {
        match self {
            Self::Resnik(kind) => Resnik(*kind).calculate(a, b),
            Self::Lin(kind) => Lin(*kind).calculate(a, b),
            Self::Jc(kind) => Jc(*kind).calculate(a, b),
            Self::Jc2(kind) => Jc2(*kind).calculate(a, b),
            Self::Relevance(kind) => Relevance(*kind).calculate(a, b),
            Self::InformationCoefficient(kind) => InformationCoefficient(*kind).calculate(a, b),
            Self::GraphIc => GraphIc.calculate(a, b),
            Self::Distance => Distance.calculate(a, b),
            Self::Equal => Equal.calculate(a, b),
        }
    }
}

/// Reduces the pairwise score matrix of two term sets to a single score
pub trait SimilarityCombiner {
    /// Combines the matrix into one score
    ///
    /// An empty matrix (one or both sets empty) always combines to `0.0`.
    fn combine(&self, matrix: &ScoreMatrix) -> f32;
}

/// The built-in score combination strategies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StandardCombiner {
    /// Mean of both directed best-match averages
    #[default]
    FunSimAvg,
    /// Maximum over all directed best matches
    FunSimMax,
    /// Mean of the row-wise maxima only. Deliberately asymmetric: the
    /// first set is scored against the second, not vice versa.
    Bma,
}

impl StandardCombiner {
    fn mean(values: &[f32]) -> f32 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f32>() / values.len() as f32
    }
}

impl SimilarityCombiner for StandardCombiner {
    fn combine(&self, matrix: &ScoreMatrix) -> f32 {
        if matrix.is_empty() {
            return 0.0;
        }
        match self {
            Self::FunSimAvg => {
                (Self::mean(&matrix.row_maxes()) + Self::mean(&matrix.col_maxes())) / 2.0
            }
            Self::FunSimMax => matrix
                .row_maxes()
                .iter()
                .chain(matrix.col_maxes().iter())
                .fold(f32::MIN, |max, &value| max.max(value)),
            Self::Bma => Self::mean(&matrix.row_maxes()),
        }
    }
}

impl FromStr for StandardCombiner {
    type Err = HpoError;

    fn from_str(s: &str) -> HpoResult<Self> {
        match s {
            "funSimAvg" => Ok(Self::FunSimAvg),
            "funSimMax" => Ok(Self::FunSimMax),
            "BMA" => Ok(Self::Bma),
            _ => Err(HpoError::UnknownCombiner(s.to_string())),
        }
    }
}

/// Set-to-set similarity: a pairwise method plus a combination strategy
pub struct GroupSimilarity<S, C> {
    similarity: S,
    combiner: C,
}

impl Default for GroupSimilarity<Builtins, StandardCombiner> {
    fn default() -> Self {
        Self {
            similarity: Builtins::GraphIc,
            combiner: StandardCombiner::FunSimAvg,
        }
    }
}

impl<S: Similarity, C: SimilarityCombiner> GroupSimilarity<S, C> {
    /// Constructs a new `GroupSimilarity`
    pub fn new(combiner: C, similarity: S) -> Self {
        Self {
            similarity,
            combiner,
        }
    }

    /// Calculates the similarity of two term sets
    pub fn calculate(&self, a: &crate::HpoSet, b: &crate::HpoSet) -> f32 {
        let terms_a: Vec<HpoTerm> = a.iter().collect();
        let terms_b: Vec<HpoTerm> = b.iter().collect();

        let mut matrix = ScoreMatrix::new(terms_a.len(), terms_b.len());
        for (row, term_a) in terms_a.iter().enumerate() {
            for (col, term_b) in terms_b.iter().enumerate() {
                matrix.set(row, col, self.similarity.calculate(term_a, term_b));
            }
        }
        self.combiner.combine(&matrix)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ontology::Builder;
    use crate::Ontology;

    /// Root plus two leaves, each leaf annotated with one of two genes
    fn annotated_pair() -> Ontology {
        let mut builder = Builder::new();
        builder.add_term(1u32, "All");
        builder.add_term(2u32, "left");
        builder.add_term(3u32, "right");
        builder.add_parent(1u32, 2u32);
        builder.add_parent(1u32, 3u32);
        let mut connected = builder.connect().unwrap();
        for (term, id, symbol) in [(2u32, 10u32, "G1"), (3u32, 11u32, "G2")] {
            let gene = connected.add_gene(symbol, id);
            connected.link_gene(term.into(), gene).unwrap();
        }
        connected.build().unwrap()
    }

    #[test]
    fn self_similarity_is_the_method_maximum() {
        let ontology = annotated_pair();
        let term = ontology.term(2u32).unwrap();
        let other = ontology.term(3u32).unwrap();
        let kind = InformationContentKind::Gene;

        // one of two genes: IC = -ln(1/2)
        let ic = term.information_content().get_kind(kind);
        assert!((ic - 2.0f32.ln()).abs() < 1e-6);

        assert!((Resnik(kind).calculate(&term, &term) - ic).abs() < 1e-6);
        assert!((Lin(kind).calculate(&term, &term) - 1.0).abs() < 1e-6);
        assert!((Jc(kind).calculate(&term, &term) - 1.0).abs() < 1e-6);
        assert!((Jc2(kind).calculate(&term, &term) - 1.0).abs() < 1e-6);
        assert_eq!(GraphIc.calculate(&term, &term), 1.0);
        assert_eq!(Distance.calculate(&term, &term), 1.0);
        assert_eq!(Equal.calculate(&term, &term), 1.0);

        // rel and ic peak at the self match, scaled below 1 by the
        // term's own IC
        let rel = Relevance(kind).calculate(&term, &term);
        assert!((rel - (1.0 - (-ic).exp())).abs() < 1e-6);
        assert!(rel >= Relevance(kind).calculate(&term, &other));
        let coefficient = InformationCoefficient(kind).calculate(&term, &term);
        assert!((coefficient - ic / (1.0 + ic)).abs() < 1e-6);
        assert!(coefficient >= InformationCoefficient(kind).calculate(&term, &other));
    }

    #[test]
    fn pairwise_values_match_the_formulas() {
        let ontology = annotated_pair();
        let a = ontology.term(2u32).unwrap();
        let b = ontology.term(3u32).unwrap();
        let kind = InformationContentKind::Gene;

        // the only common ancestor is the root with IC 0
        assert_eq!(Resnik(kind).calculate(&a, &b), 0.0);
        assert_eq!(Lin(kind).calculate(&a, &b), 0.0);
        let jc_distance = 2.0 * 2.0f32.ln();
        assert!((Jc(kind).calculate(&a, &b) - 1.0 / (jc_distance + 1.0)).abs() < 1e-6);
        assert!((GraphIc.calculate(&a, &b) - 1.0 / 3.0).abs() < 1e-6);
        assert!((Distance.calculate(&a, &b) - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(Equal.calculate(&a, &b), 0.0);
    }

    #[test]
    fn all_methods_are_symmetric() {
        let ontology = annotated_pair();
        let a = ontology.term(2u32).unwrap();
        let b = ontology.term(1u32).unwrap();
        for name in ["resnik", "lin", "jc", "jc2", "rel", "ic", "graphic", "dist", "equal"] {
            let method = Builtins::parse(name, InformationContentKind::Gene).unwrap();
            assert_eq!(method.calculate(&a, &b), method.calculate(&b, &a));
        }
    }

    #[test]
    fn method_names() {
        for name in ["resnik", "lin", "jc", "jc2", "rel", "ic", "graphic", "dist", "equal"] {
            assert!(Builtins::parse(name, InformationContentKind::Omim).is_ok());
        }
        assert_eq!(
            Builtins::parse("resnick", InformationContentKind::Omim).unwrap_err(),
            HpoError::UnknownMethod("resnick".to_string())
        );
    }

    #[test]
    fn combiner_names() {
        assert_eq!(
            "funSimAvg".parse::<StandardCombiner>().unwrap(),
            StandardCombiner::FunSimAvg
        );
        assert_eq!(
            "funSimMax".parse::<StandardCombiner>().unwrap(),
            StandardCombiner::FunSimMax
        );
        assert_eq!("BMA".parse::<StandardCombiner>().unwrap(), StandardCombiner::Bma);
        assert_eq!(
            "bma".parse::<StandardCombiner>().unwrap_err(),
            HpoError::UnknownCombiner("bma".to_string())
        );
    }

    #[test]
    fn combiners_reduce_the_matrix() {
        let mut matrix = ScoreMatrix::new(2, 2);
        matrix.set(0, 0, 0.2);
        matrix.set(0, 1, 0.8);
        matrix.set(1, 0, 0.4);
        matrix.set(1, 1, 0.6);

        // row maxes: [0.8, 0.6], col maxes: [0.4, 0.8]
        assert!((StandardCombiner::FunSimAvg.combine(&matrix) - 0.65).abs() < 1e-6);
        assert!((StandardCombiner::FunSimMax.combine(&matrix) - 0.8).abs() < 1e-6);
        assert!((StandardCombiner::Bma.combine(&matrix) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn empty_matrix_combines_to_zero() {
        let matrix = ScoreMatrix::new(0, 3);
        assert_eq!(StandardCombiner::FunSimAvg.combine(&matrix), 0.0);
        assert_eq!(StandardCombiner::FunSimMax.combine(&matrix), 0.0);
        assert_eq!(StandardCombiner::Bma.combine(&matrix), 0.0);
    }
}
