use std::str::FromStr;

use crate::{HpoError, HpoResult};

/// The annotation source an information content is based on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InformationContentKind {
    /// Based on gene annotations
    Gene,
    /// Based on OMIM disease annotations
    Omim,
    /// Based on Orphanet disease annotations
    Orpha,
    /// Structural information content derived from the graph topology.
    ///
    /// Unlike the other kinds it has no external annotation source:
    /// `IC = -ln((descendants + 1) / total terms)`, so broad terms score
    /// low and leaf terms score high.
    Decipher,
}

impl FromStr for InformationContentKind {
    type Err = HpoError;

    fn from_str(s: &str) -> HpoResult<Self> {
        match s {
            "gene" => Ok(InformationContentKind::Gene),
            "omim" => Ok(InformationContentKind::Omim),
            "orpha" => Ok(InformationContentKind::Orpha),
            "decipher" => Ok(InformationContentKind::Decipher),
            _ => Err(HpoError::UnknownKind(s.to_string())),
        }
    }
}

/// The information content of a term, for every [`InformationContentKind`]
///
/// The information content is `-ln(frequency)` of the term among all
/// annotations of one kind. Terms without any annotation for a kind carry
/// the maximum information content observed in the corpus for that kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct InformationContent {
    gene: f32,
    omim: f32,
    orpha: f32,
    decipher: f32,
}

impl InformationContent {
    /// Returns the gene-based information content
    pub fn gene(&self) -> f32 {
        self.gene
    }

    /// Returns the OMIM-disease-based information content
    pub fn omim(&self) -> f32 {
        self.omim
    }

    /// Returns the Orpha-disease-based information content
    pub fn orpha(&self) -> f32 {
        self.orpha
    }

    /// Returns the structural (decipher) information content
    pub fn decipher(&self) -> f32 {
        self.decipher
    }

    /// Returns the information content of the given kind
    pub fn get_kind(&self, kind: InformationContentKind) -> f32 {
        match kind {
            InformationContentKind::Gene => self.gene,
            InformationContentKind::Omim => self.omim,
            InformationContentKind::Orpha => self.orpha,
            InformationContentKind::Decipher => self.decipher,
        }
    }

    pub(crate) fn set_kind(&mut self, kind: InformationContentKind, value: f32) {
        match kind {
            InformationContentKind::Gene => self.gene = value,
            InformationContentKind::Omim => self.omim = value,
            InformationContentKind::Orpha => self.orpha = value,
            InformationContentKind::Decipher => self.decipher = value,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_kind() {
        assert_eq!(
            "omim".parse::<InformationContentKind>().unwrap(),
            InformationContentKind::Omim
        );
        assert_eq!(
            "foobar".parse::<InformationContentKind>(),
            Err(HpoError::UnknownKind("foobar".to_string()))
        );
    }

    #[test]
    fn get_and_set() {
        let mut ic = InformationContent::default();
        ic.set_kind(InformationContentKind::Gene, 1.5);
        assert!((ic.gene() - 1.5).abs() < f32::EPSILON);
        assert!((ic.get_kind(InformationContentKind::Gene) - 1.5).abs() < f32::EPSILON);
        assert!(ic.omim().abs() < f32::EPSILON);
    }
}
