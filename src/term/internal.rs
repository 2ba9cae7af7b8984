use crate::annotations::{GeneId, Genes};
use crate::annotations::{OmimDiseaseId, OmimDiseases, OrphaDiseaseId, OrphaDiseases};
use crate::term::{HpoGroup, HpoTermId, InformationContent};
use crate::{DEFAULT_NUM_ALL_PARENTS, DEFAULT_NUM_GENES, DEFAULT_NUM_OMIM, DEFAULT_NUM_PARENTS};

/// The arena record of a single HPO term
///
/// Parent/child relations are stored as id groups into the arena, never as
/// owning references, so the acyclic hierarchy needs no reference counting.
#[derive(Debug, Clone)]
pub(crate) struct HpoTermInternal {
    id: HpoTermId,
    name: String,
    definition: Option<String>,
    comment: Option<String>,
    synonyms: Vec<String>,
    xrefs: Vec<String>,
    parents: HpoGroup,
    all_parents: HpoGroup,
    children: HpoGroup,
    genes: Genes,
    omim_diseases: OmimDiseases,
    omim_excluded_diseases: OmimDiseases,
    orpha_diseases: OrphaDiseases,
    orpha_excluded_diseases: OrphaDiseases,
    ic: InformationContent,
}

impl HpoTermInternal {
    pub fn new(id: HpoTermId, name: String) -> HpoTermInternal {
        HpoTermInternal {
            id,
            name,
            definition: None,
            comment: None,
            synonyms: Vec::new(),
            xrefs: Vec::new(),
            parents: HpoGroup::with_capacity(DEFAULT_NUM_PARENTS),
            all_parents: HpoGroup::with_capacity(DEFAULT_NUM_ALL_PARENTS),
            children: HpoGroup::with_capacity(DEFAULT_NUM_PARENTS),
            genes: Genes::with_capacity(DEFAULT_NUM_GENES),
            omim_diseases: OmimDiseases::with_capacity(DEFAULT_NUM_OMIM),
            omim_excluded_diseases: OmimDiseases::default(),
            orpha_diseases: OrphaDiseases::with_capacity(DEFAULT_NUM_OMIM),
            orpha_excluded_diseases: OrphaDiseases::default(),
            ic: InformationContent::default(),
        }
    }

    pub fn id(&self) -> HpoTermId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    pub fn definition_mut(&mut self) -> &mut Option<String> {
        &mut self.definition
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn comment_mut(&mut self) -> &mut Option<String> {
        &mut self.comment
    }

    pub fn synonyms(&self) -> &[String] {
        &self.synonyms
    }

    pub fn add_synonym(&mut self, synonym: String) {
        self.synonyms.push(synonym);
    }

    pub fn xrefs(&self) -> &[String] {
        &self.xrefs
    }

    pub fn add_xref(&mut self, xref: String) {
        self.xrefs.push(xref);
    }

    pub fn parents(&self) -> &HpoGroup {
        &self.parents
    }

    pub fn children(&self) -> &HpoGroup {
        &self.children
    }

    pub fn all_parents(&self) -> &HpoGroup {
        &self.all_parents
    }

    pub fn all_parents_mut(&mut self) -> &mut HpoGroup {
        &mut self.all_parents
    }

    /// A term without parents always has a complete (empty) closure
    pub fn parents_cached(&self) -> bool {
        self.parents.is_empty() || !self.all_parents.is_empty()
    }

    pub fn add_parent<I: Into<HpoTermId>>(&mut self, parent_id: I) {
        self.parents.insert(parent_id);
    }

    pub fn add_child<I: Into<HpoTermId>>(&mut self, child_id: I) {
        self.children.insert(child_id);
    }

    pub fn genes(&self) -> &Genes {
        &self.genes
    }

    pub fn add_gene(&mut self, gene_id: GeneId) -> bool {
        self.genes.insert(gene_id)
    }

    pub fn omim_diseases(&self) -> &OmimDiseases {
        &self.omim_diseases
    }

    pub fn add_omim_disease(&mut self, disease_id: OmimDiseaseId) -> bool {
        self.omim_diseases.insert(disease_id)
    }

    pub fn omim_excluded_diseases(&self) -> &OmimDiseases {
        &self.omim_excluded_diseases
    }

    pub fn add_omim_excluded_disease(&mut self, disease_id: OmimDiseaseId) -> bool {
        self.omim_excluded_diseases.insert(disease_id)
    }

    pub fn orpha_diseases(&self) -> &OrphaDiseases {
        &self.orpha_diseases
    }

    pub fn add_orpha_disease(&mut self, disease_id: OrphaDiseaseId) -> bool {
        self.orpha_diseases.insert(disease_id)
    }

    pub fn orpha_excluded_diseases(&self) -> &OrphaDiseases {
        &self.orpha_excluded_diseases
    }

    pub fn add_orpha_excluded_disease(&mut self, disease_id: OrphaDiseaseId) -> bool {
        self.orpha_excluded_diseases.insert(disease_id)
    }

    pub fn information_content(&self) -> &InformationContent {
        &self.ic
    }

    pub fn information_content_mut(&mut self) -> &mut InformationContent {
        &mut self.ic
    }
}

impl PartialEq for HpoTermInternal {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for HpoTermInternal {}
