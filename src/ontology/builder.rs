//! Staged construction of the [`Ontology`]
//!
//! The build protocol mirrors how the source data is organized:
//!
//! 1. [`Builder`]: terms and `is-a` edges are collected
//! 2. [`Builder::connect`]: children are derived as the transpose of the
//!    parent relation, ancestor closures are cached and cycles or dangling
//!    parent references are rejected
//! 3. [`ConnectedBuilder`]: gene and disease annotations are loaded and
//!    propagated upward
//! 4. [`ConnectedBuilder::build`]: information content is computed and
//!    the frozen, read-only [`Ontology`] is returned
//!
//! After step 4 no mutation is possible; all query APIs take `&self`.
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use crate::annotations::{Gene, GeneId, OmimDisease, OmimDiseaseId, OrphaDisease, OrphaDiseaseId};
use crate::ontology::arena::Arena;
use crate::ontology::Ontology;
use crate::term::{HpoGroup, HpoTermId, HpoTermInternal, InformationContent, InformationContentKind};
use crate::{HpoError, HpoResult};

/// A term record as produced by an ontology file parser
#[derive(Debug, Default, Clone)]
pub struct TermRecord {
    /// The term id
    pub id: HpoTermId,
    /// The term name
    pub name: String,
    /// Free-text definition
    pub definition: Option<String>,
    /// Free-text comment
    pub comment: Option<String>,
    /// Synonyms of the term name
    pub synonyms: Vec<String>,
    /// Cross-references to other databases
    pub xrefs: Vec<String>,
}

/// A single gene-to-term association record
#[derive(Debug, Clone)]
pub struct GeneAnnotation {
    /// The annotated term
    pub term: HpoTermId,
    /// The gene id
    pub gene_id: GeneId,
    /// The gene symbol
    pub symbol: String,
}

/// A single disease-to-term association record
#[derive(Debug, Clone)]
pub struct DiseaseAnnotation<I> {
    /// The annotated term
    pub term: HpoTermId,
    /// The disease id
    pub disease_id: I,
    /// The disease name
    pub name: String,
    /// `true` if the phenotype is documented as explicitly absent
    pub negated: bool,
}

/// Summary of a bulk annotation load
///
/// Records referencing unknown terms are skipped and counted here instead
/// of aborting the load. Ontology and annotation data evolve
/// independently, a partial mismatch must not prevent startup.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of records that were linked
    pub linked: usize,
    /// Number of records that were dropped due to unknown term references
    pub skipped: usize,
}

/// First build stage: collects terms and `is-a` edges
///
/// # Examples
///
/// ```
/// use hpoquery::ontology::Builder;
///
/// let mut builder = Builder::new();
/// builder.add_term(1u32, "All");
/// builder.add_term(2u32, "Abnormality of body height");
/// builder.add_parent(1u32, 2u32);
/// let ontology = builder.build().unwrap();
/// assert_eq!(ontology.len(), 2);
/// ```
#[derive(Default)]
pub struct Builder {
    terms: Arena,
}

impl Builder {
    /// Constructs a new, empty `Builder`
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a term with the given id and name
    ///
    /// Returns `false` if a term with the same id already exists.
    pub fn add_term<I: Into<HpoTermId>>(&mut self, id: I, name: &str) -> bool {
        self.terms
            .insert(HpoTermInternal::new(id.into(), name.to_string()))
    }

    /// Adds a complete term record including definition, synonyms and xrefs
    pub fn insert_record(&mut self, record: TermRecord) -> bool {
        let mut term = HpoTermInternal::new(record.id, record.name);
        *term.definition_mut() = record.definition;
        *term.comment_mut() = record.comment;
        for synonym in record.synonyms {
            term.add_synonym(synonym);
        }
        for xref in record.xrefs {
            term.add_xref(xref);
        }
        self.terms.insert(term)
    }

    /// Records an `is-a` edge from `child_id` to `parent_id`
    ///
    /// The child must already exist; the parent may be added later, its
    /// existence is validated in [`Builder::connect`]. The child relation
    /// is derived there as well.
    pub fn add_parent<I: Into<HpoTermId> + Copy, J: Into<HpoTermId> + Copy>(
        &mut self,
        parent_id: I,
        child_id: J,
    ) {
        if let Some(child) = self.terms.get_mut(child_id.into()) {
            child.add_parent(parent_id.into());
        } else {
            warn!("parent edge for unknown term {}", child_id.into());
        }
    }

    /// Validates the topology and moves on to annotation loading
    ///
    /// Derives the child relation, caches the ancestor closure of every
    /// term and rejects cycles and dangling parent references.
    ///
    /// # Errors
    ///
    /// [`HpoError::MalformedOntology`] if a parent reference points to an
    /// unknown term or the parent relation contains a cycle
    pub fn connect(mut self) -> HpoResult<ConnectedBuilder> {
        let ids = self.terms.keys();

        for id in &ids {
            let parents = self.terms.get_unchecked(*id).parents().clone();
            for parent in &parents {
                if !self.terms.contains(parent) {
                    return Err(HpoError::MalformedOntology(format!(
                        "term {id} references unknown parent {parent}"
                    )));
                }
                self.terms.get_unchecked_mut(parent).add_child(*id);
            }
        }

        let mut in_progress = HashSet::new();
        for id in &ids {
            resolve_ancestors(&mut self.terms, *id, &mut in_progress)?;
        }

        Ok(ConnectedBuilder {
            terms: self.terms,
            genes: HashMap::new(),
            omim_diseases: HashMap::new(),
            orpha_diseases: HashMap::new(),
        })
    }

    /// Shortcut for ontologies without annotations: connect and build
    ///
    /// # Errors
    ///
    /// Same as [`Builder::connect`] and [`ConnectedBuilder::build`]
    pub fn build(self) -> HpoResult<Ontology> {
        self.connect()?.build()
    }
}

/// Computes the full ancestor closure of `id`, memoized on the term
///
/// Cycles are detected through the `in_progress` set: re-entering a term
/// that is currently being resolved means the parent relation loops.
fn resolve_ancestors(
    terms: &mut Arena,
    id: HpoTermId,
    in_progress: &mut HashSet<HpoTermId>,
) -> HpoResult<HpoGroup> {
    {
        let term = terms.get_unchecked(id);
        if term.parents_cached() {
            return Ok(term.all_parents().clone());
        }
    }
    if !in_progress.insert(id) {
        return Err(HpoError::MalformedOntology(format!(
            "cycle in parent relation involving {id}"
        )));
    }

    let parents = terms.get_unchecked(id).parents().clone();
    let mut closure = parents.clone();
    for parent in &parents {
        let ancestors = resolve_ancestors(terms, parent, in_progress)?;
        closure = &closure | &ancestors;
    }

    in_progress.remove(&id);
    *terms.get_unchecked_mut(id).all_parents_mut() = closure.clone();
    Ok(closure)
}

/// Second build stage: the topology is frozen, annotations are loaded
pub struct ConnectedBuilder {
    terms: Arena,
    genes: HashMap<GeneId, Gene>,
    omim_diseases: HashMap<OmimDiseaseId, OmimDisease>,
    orpha_diseases: HashMap<OrphaDiseaseId, OrphaDisease>,
}

impl ConnectedBuilder {
    /// Registers a gene, returning its id
    ///
    /// Registering the same id twice keeps the first record.
    pub fn add_gene<I: Into<GeneId>>(&mut self, symbol: &str, gene_id: I) -> GeneId {
        let id = gene_id.into();
        if let Entry::Vacant(entry) = self.genes.entry(id) {
            entry.insert(Gene::new(id, symbol));
        }
        id
    }

    /// Registers an OMIM disease, returning its id
    pub fn add_omim_disease<I: Into<OmimDiseaseId>>(&mut self, name: &str, disease_id: I) -> OmimDiseaseId {
        let id = disease_id.into();
        if let Entry::Vacant(entry) = self.omim_diseases.entry(id) {
            entry.insert(OmimDisease::new(id, name));
        }
        id
    }

    /// Registers an Orphanet disease, returning its id
    pub fn add_orpha_disease<I: Into<OrphaDiseaseId>>(&mut self, name: &str, disease_id: I) -> OrphaDiseaseId {
        let id = disease_id.into();
        if let Entry::Vacant(entry) = self.orpha_diseases.entry(id) {
            entry.insert(OrphaDisease::new(id, name));
        }
        id
    }

    /// Links a registered gene to a term
    ///
    /// # Errors
    ///
    /// [`HpoError::NotFound`] if the term or the gene is unknown
    pub fn link_gene(&mut self, term_id: HpoTermId, gene_id: GeneId) -> HpoResult<()> {
        let gene = self
            .genes
            .get_mut(&gene_id)
            .ok_or_else(|| HpoError::NotFound(gene_id.to_string()))?;
        let term = self
            .terms
            .get_mut(term_id)
            .ok_or_else(|| HpoError::NotFound(term_id.to_string()))?;
        term.add_gene(gene_id);
        gene.add_term(term_id);
        Ok(())
    }

    /// Links a registered OMIM disease to a term
    ///
    /// # Errors
    ///
    /// [`HpoError::NotFound`] if the term or the disease is unknown
    pub fn link_omim_disease(
        &mut self,
        term_id: HpoTermId,
        disease_id: OmimDiseaseId,
    ) -> HpoResult<()> {
        let disease = self
            .omim_diseases
            .get_mut(&disease_id)
            .ok_or_else(|| HpoError::NotFound(disease_id.to_string()))?;
        let term = self
            .terms
            .get_mut(term_id)
            .ok_or_else(|| HpoError::NotFound(term_id.to_string()))?;
        term.add_omim_disease(disease_id);
        disease.add_term(term_id);
        Ok(())
    }

    /// Records an OMIM disease as explicitly absent for a term
    ///
    /// # Errors
    ///
    /// [`HpoError::NotFound`] if the term or the disease is unknown
    pub fn link_excluded_omim_disease(
        &mut self,
        term_id: HpoTermId,
        disease_id: OmimDiseaseId,
    ) -> HpoResult<()> {
        let disease = self
            .omim_diseases
            .get_mut(&disease_id)
            .ok_or_else(|| HpoError::NotFound(disease_id.to_string()))?;
        let term = self
            .terms
            .get_mut(term_id)
            .ok_or_else(|| HpoError::NotFound(term_id.to_string()))?;
        term.add_omim_excluded_disease(disease_id);
        disease.add_excluded_term(term_id);
        Ok(())
    }

    /// Links a registered Orphanet disease to a term
    ///
    /// # Errors
    ///
    /// [`HpoError::NotFound`] if the term or the disease is unknown
    pub fn link_orpha_disease(
        &mut self,
        term_id: HpoTermId,
        disease_id: OrphaDiseaseId,
    ) -> HpoResult<()> {
        let disease = self
            .orpha_diseases
            .get_mut(&disease_id)
            .ok_or_else(|| HpoError::NotFound(disease_id.to_string()))?;
        let term = self
            .terms
            .get_mut(term_id)
            .ok_or_else(|| HpoError::NotFound(term_id.to_string()))?;
        term.add_orpha_disease(disease_id);
        disease.add_term(term_id);
        Ok(())
    }

    /// Records an Orphanet disease as explicitly absent for a term
    ///
    /// # Errors
    ///
    /// [`HpoError::NotFound`] if the term or the disease is unknown
    pub fn link_excluded_orpha_disease(
        &mut self,
        term_id: HpoTermId,
        disease_id: OrphaDiseaseId,
    ) -> HpoResult<()> {
        let disease = self
            .orpha_diseases
            .get_mut(&disease_id)
            .ok_or_else(|| HpoError::NotFound(disease_id.to_string()))?;
        let term = self
            .terms
            .get_mut(term_id)
            .ok_or_else(|| HpoError::NotFound(term_id.to_string()))?;
        term.add_orpha_excluded_disease(disease_id);
        disease.add_excluded_term(term_id);
        Ok(())
    }

    /// Loads gene association records in bulk
    ///
    /// Records referencing unknown terms are skipped with a warning and
    /// counted in the returned [`LoadReport`].
    pub fn load_genes<I: IntoIterator<Item = GeneAnnotation>>(&mut self, records: I) -> LoadReport {
        let mut report = LoadReport::default();
        for record in records {
            let gene_id = self.add_gene(&record.symbol, record.gene_id);
            match self.link_gene(record.term, gene_id) {
                Ok(()) => report.linked += 1,
                Err(_) => {
                    warn!("gene annotation for unknown term {}", record.term);
                    report.skipped += 1;
                }
            }
        }
        report
    }

    /// Loads OMIM disease association records in bulk
    ///
    /// Records referencing unknown terms are skipped with a warning and
    /// counted in the returned [`LoadReport`].
    pub fn load_omim_diseases<I: IntoIterator<Item = DiseaseAnnotation<OmimDiseaseId>>>(
        &mut self,
        records: I,
    ) -> LoadReport {
        let mut report = LoadReport::default();
        for record in records {
            let disease_id = self.add_omim_disease(&record.name, record.disease_id);
            let linked = if record.negated {
                self.link_excluded_omim_disease(record.term, disease_id)
            } else {
                self.link_omim_disease(record.term, disease_id)
            };
            match linked {
                Ok(()) => report.linked += 1,
                Err(_) => {
                    warn!("omim annotation for unknown term {}", record.term);
                    report.skipped += 1;
                }
            }
        }
        report
    }

    /// Loads Orphanet disease association records in bulk
    ///
    /// Records referencing unknown terms are skipped with a warning and
    /// counted in the returned [`LoadReport`].
    pub fn load_orpha_diseases<I: IntoIterator<Item = DiseaseAnnotation<OrphaDiseaseId>>>(
        &mut self,
        records: I,
    ) -> LoadReport {
        let mut report = LoadReport::default();
        for record in records {
            let disease_id = self.add_orpha_disease(&record.name, record.disease_id);
            let linked = if record.negated {
                self.link_excluded_orpha_disease(record.term, disease_id)
            } else {
                self.link_orpha_disease(record.term, disease_id)
            };
            match linked {
                Ok(()) => report.linked += 1,
                Err(_) => {
                    warn!("orpha annotation for unknown term {}", record.term);
                    report.skipped += 1;
                }
            }
        }
        report
    }

    /// Extends every direct annotation link to all ancestor terms
    ///
    /// Runs automatically during [`ConnectedBuilder::build`]. The
    /// operation is a pure set union, so running it repeatedly does not
    /// change the result.
    pub fn propagate(&mut self) {
        for id in self.terms.keys() {
            let term = self.terms.get_unchecked(id);
            let ancestors = term.all_parents().clone();
            let genes: Vec<GeneId> = term.genes().iter().copied().collect();
            let omim: Vec<OmimDiseaseId> = term.omim_diseases().iter().copied().collect();
            let omim_excluded: Vec<OmimDiseaseId> =
                term.omim_excluded_diseases().iter().copied().collect();
            let orpha: Vec<OrphaDiseaseId> = term.orpha_diseases().iter().copied().collect();
            let orpha_excluded: Vec<OrphaDiseaseId> =
                term.orpha_excluded_diseases().iter().copied().collect();

            for gene_id in &genes {
                let gene = self.genes.get_mut(gene_id).expect("linked genes are registered");
                for ancestor in &ancestors {
                    gene.add_term(ancestor);
                }
            }
            for disease_id in &omim {
                let disease = self
                    .omim_diseases
                    .get_mut(disease_id)
                    .expect("linked diseases are registered");
                for ancestor in &ancestors {
                    disease.add_term(ancestor);
                }
            }
            for disease_id in &omim_excluded {
                let disease = self
                    .omim_diseases
                    .get_mut(disease_id)
                    .expect("linked diseases are registered");
                for ancestor in &ancestors {
                    disease.add_excluded_term(ancestor);
                }
            }
            for disease_id in &orpha {
                let disease = self
                    .orpha_diseases
                    .get_mut(disease_id)
                    .expect("linked diseases are registered");
                for ancestor in &ancestors {
                    disease.add_term(ancestor);
                }
            }
            for disease_id in &orpha_excluded {
                let disease = self
                    .orpha_diseases
                    .get_mut(disease_id)
                    .expect("linked diseases are registered");
                for ancestor in &ancestors {
                    disease.add_excluded_term(ancestor);
                }
            }

            for ancestor in &ancestors {
                let ancestor = self.terms.get_unchecked_mut(ancestor);
                for gene_id in &genes {
                    ancestor.add_gene(*gene_id);
                }
                for disease_id in &omim {
                    ancestor.add_omim_disease(*disease_id);
                }
                for disease_id in &omim_excluded {
                    ancestor.add_omim_excluded_disease(*disease_id);
                }
                for disease_id in &orpha {
                    ancestor.add_orpha_disease(*disease_id);
                }
                for disease_id in &orpha_excluded {
                    ancestor.add_orpha_excluded_disease(*disease_id);
                }
            }
        }
    }

    /// Propagates annotations, computes information content and freezes
    /// the ontology
    ///
    /// # Errors
    ///
    /// [`HpoError::MalformedOntology`] if two terms carry the same name,
    /// since lookup by name must be unambiguous
    pub fn build(mut self) -> HpoResult<Ontology> {
        self.propagate();

        let mut max_ic = InformationContent::default();
        self.calculate_ic(InformationContentKind::Gene, self.genes.len(), &mut max_ic);
        self.calculate_ic(
            InformationContentKind::Omim,
            self.omim_diseases.len(),
            &mut max_ic,
        );
        self.calculate_ic(
            InformationContentKind::Orpha,
            self.orpha_diseases.len(),
            &mut max_ic,
        );
        self.calculate_structural_ic(&mut max_ic);

        let mut names: HashMap<String, HpoTermId> = HashMap::with_capacity(self.terms.len());
        for term in self.terms.values() {
            if let Some(existing) = names.insert(term.name().to_string(), term.id()) {
                return Err(HpoError::MalformedOntology(format!(
                    "duplicate term name `{}` ({} and {})",
                    term.name(),
                    existing,
                    term.id()
                )));
            }
        }

        let mut search_order = self.terms.keys();
        search_order.sort_unstable();

        info!(
            terms = self.terms.len(),
            genes = self.genes.len(),
            omim_diseases = self.omim_diseases.len(),
            orpha_diseases = self.orpha_diseases.len(),
            "ontology built"
        );

        Ok(Ontology::new(
            self.terms,
            names,
            search_order,
            self.genes,
            self.omim_diseases,
            self.orpha_diseases,
            max_ic,
        ))
    }

    /// Computes the information content of every term for one kind
    ///
    /// `IC = -ln(n_annotated / n_total)`. Terms without any annotation for
    /// the kind receive the maximum IC observed in the corpus, treating
    /// them as maximally specific rather than undefined.
    fn calculate_ic(
        &mut self,
        kind: InformationContentKind,
        total: usize,
        max_ic: &mut InformationContent,
    ) {
        if total == 0 {
            // no corpus for this kind, all terms keep the default of 0
            return;
        }
        let total = total as f32;

        let mut max = 0.0f32;
        for term in self.terms.values_mut() {
            let count = match kind {
                InformationContentKind::Gene => term.genes().len(),
                InformationContentKind::Omim => term.omim_diseases().len(),
                InformationContentKind::Orpha => term.orpha_diseases().len(),
                InformationContentKind::Decipher => {
                    unreachable!("structural IC has its own computation")
                }
            };
            if count > 0 {
                let ic = -(count as f32 / total).ln();
                term.information_content_mut().set_kind(kind, ic);
                max = max.max(ic);
            }
        }

        for term in self.terms.values_mut() {
            let count = match kind {
                InformationContentKind::Gene => term.genes().len(),
                InformationContentKind::Omim => term.omim_diseases().len(),
                InformationContentKind::Orpha => term.orpha_diseases().len(),
                InformationContentKind::Decipher => unreachable!(),
            };
            if count == 0 {
                term.information_content_mut().set_kind(kind, max);
            }
        }
        max_ic.set_kind(kind, max);
    }

    /// Computes the structural (decipher) information content
    ///
    /// `IC = -ln((descendants + 1) / n_terms)`: the root scores near 0,
    /// leaf terms score highest. Descendant counts are derived by
    /// inverting the cached ancestor closures.
    fn calculate_structural_ic(&mut self, max_ic: &mut InformationContent) {
        let n_terms = self.terms.len() as f32;
        if self.terms.is_empty() {
            return;
        }

        let mut descendant_counts: HashMap<HpoTermId, usize> = HashMap::new();
        for term in self.terms.values() {
            for ancestor in term.all_parents() {
                *descendant_counts.entry(ancestor).or_insert(0) += 1;
            }
        }

        let mut max = 0.0f32;
        for term in self.terms.values_mut() {
            let descendants = descendant_counts.get(&term.id()).copied().unwrap_or(0);
            let ic = -((descendants + 1) as f32 / n_terms).ln();
            term.information_content_mut()
                .set_kind(InformationContentKind::Decipher, ic);
            max = max.max(ic);
        }
        max_ic.set_kind(InformationContentKind::Decipher, max);
    }
}
