//! Statistical enrichment of genes, diseases and terms
//!
//! Enrichment answers the question "which genes (or diseases, or terms)
//! are overrepresented in this query set, compared to what the full corpus
//! would predict". The only implemented model is the hypergeometric test
//! in [`hypergeom`]; the string-dispatched entry points exist so that
//! additional models can be added without changing callers.
use std::str::FromStr;

use crate::annotations::{Disease, Gene, GeneId, OmimDiseaseId, OrphaDiseaseId};
use crate::set::HpoSet;
use crate::term::HpoTermId;
use crate::{HpoError, HpoResult, Ontology};

pub mod hypergeom;

/// The implemented enrichment models
///
/// There is exactly one today. The closed enum plus the string parse at
/// the boundary is the extension point for adding another model without
/// touching any caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnrichmentMethod {
    /// The hypergeometric survival test, requested as `hypergeom`
    #[default]
    Hypergeometric,
}

impl FromStr for EnrichmentMethod {
    type Err = HpoError;

    fn from_str(s: &str) -> HpoResult<Self> {
        match s {
            "hypergeom" => Ok(Self::Hypergeometric),
            _ => Err(HpoError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// A single enrichment result
///
/// Lower `pvalue` means stronger enrichment. Results are always returned
/// sorted ascending by `(pvalue, id)`, so equal scores rank
/// deterministically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enrichment<T> {
    /// The enriched item, a gene, disease or term id
    pub id: T,
    /// The hypergeometric survival probability of the observed overlap
    pub pvalue: f64,
    /// The number of query items the candidate overlaps with
    pub count: u64,
}

fn check_method(method: &str) -> HpoResult<EnrichmentMethod> {
    method.parse()
}

/// Genes overrepresented in the query set
///
/// # Errors
///
/// [`HpoError::UnsupportedMethod`] for any method other than `hypergeom`
pub fn gene_enrichment(method: &str, set: &HpoSet) -> HpoResult<Vec<Enrichment<GeneId>>> {
    check_method(method)?;
    Ok(hypergeom::gene_enrichment(set))
}

/// OMIM diseases overrepresented in the query set
///
/// # Errors
///
/// [`HpoError::UnsupportedMethod`] for any method other than `hypergeom`
pub fn omim_disease_enrichment(
    method: &str,
    set: &HpoSet,
) -> HpoResult<Vec<Enrichment<OmimDiseaseId>>> {
    check_method(method)?;
    Ok(hypergeom::omim_disease_enrichment(set))
}

/// Orphanet diseases overrepresented in the query set
///
/// # Errors
///
/// [`HpoError::UnsupportedMethod`] for any method other than `hypergeom`
pub fn orpha_disease_enrichment(
    method: &str,
    set: &HpoSet,
) -> HpoResult<Vec<Enrichment<OrphaDiseaseId>>> {
    check_method(method)?;
    Ok(hypergeom::orpha_disease_enrichment(set))
}

/// Configuration of [`suggest_terms`]
#[derive(Debug, Clone, Copy)]
pub struct SuggestOptions {
    /// How many top enriched genes seed the term enrichment; 0 disables
    /// the gene pass
    pub genes: usize,
    /// How many top enriched OMIM diseases seed the term enrichment; 0
    /// disables the disease pass
    pub omim_diseases: usize,
    /// How many leading candidates to skip, for paging
    pub offset: usize,
    /// The maximum number of suggested terms
    pub limit: usize,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            genes: 5,
            omim_diseases: 5,
            offset: 0,
            limit: 10,
        }
    }
}

/// Suggests terms that plausibly extend the query set
///
/// Two enrichment passes: first the genes and OMIM diseases most enriched
/// in the query are selected, then the terms most enriched among those
/// genes' and diseases' own annotations are ranked. Terms already in the
/// query are dropped; at most `limit` terms are returned, fewer if the
/// candidates run out.
///
/// # Errors
///
/// [`HpoError::UnsupportedMethod`] for any method other than `hypergeom`
pub fn suggest_terms(
    method: &str,
    set: &HpoSet,
    options: &SuggestOptions,
) -> HpoResult<Vec<Enrichment<HpoTermId>>> {
    check_method(method)?;

    let ontology = set.ontology();
    let mut candidates: Vec<Enrichment<HpoTermId>> = Vec::new();

    if options.genes > 0 {
        let genes: Vec<_> = hypergeom::gene_enrichment(set)
            .into_iter()
            .take(options.genes)
            .filter_map(|enrichment| ontology.gene(&enrichment.id))
            .collect();
        candidates.extend(hypergeom::term_enrichment_from_genes(ontology, &genes));
    }

    if options.omim_diseases > 0 {
        let diseases: Vec<_> = hypergeom::omim_disease_enrichment(set)
            .into_iter()
            .take(options.omim_diseases)
            .filter_map(|enrichment| ontology.omim_disease(&enrichment.id))
            .collect();
        candidates.extend(hypergeom::term_enrichment_from_diseases(ontology, &diseases));
    }

    candidates.sort_by(|a, b| {
        a.pvalue
            .partial_cmp(&b.pvalue)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });

    let mut suggested: Vec<Enrichment<HpoTermId>> = Vec::with_capacity(options.limit);
    for candidate in candidates.into_iter().skip(options.offset) {
        if suggested.len() >= options.limit {
            break;
        }
        if set.contains(&candidate.id) {
            continue;
        }
        if suggested.iter().any(|existing| existing.id == candidate.id) {
            continue;
        }
        suggested.push(candidate);
    }
    Ok(suggested)
}

/// Term enrichment seeded from a list of genes, method-checked
///
/// # Errors
///
/// [`HpoError::UnsupportedMethod`] for any method other than `hypergeom`
pub fn term_enrichment_from_genes(
    method: &str,
    ontology: &Ontology,
    genes: &[&Gene],
) -> HpoResult<Vec<Enrichment<HpoTermId>>> {
    check_method(method)?;
    Ok(hypergeom::term_enrichment_from_genes(ontology, genes))
}

/// Term enrichment seeded from a list of diseases, method-checked
///
/// # Errors
///
/// [`HpoError::UnsupportedMethod`] for any method other than `hypergeom`
pub fn term_enrichment_from_diseases<D: Disease>(
    method: &str,
    ontology: &Ontology,
    diseases: &[&D],
) -> HpoResult<Vec<Enrichment<HpoTermId>>> {
    check_method(method)?;
    Ok(hypergeom::term_enrichment_from_diseases(ontology, diseases))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ontology::Builder;
    use crate::term::HpoGroup;

    #[test]
    fn unsupported_method_is_rejected() {
        let ontology = Builder::new().build().unwrap();
        let set = HpoSet::new(&ontology, HpoGroup::new());
        assert_eq!(
            gene_enrichment("fisher", &set).unwrap_err(),
            HpoError::UnsupportedMethod("fisher".to_string())
        );
        assert_eq!(
            omim_disease_enrichment("fisher", &set).unwrap_err(),
            HpoError::UnsupportedMethod("fisher".to_string())
        );
        assert!(gene_enrichment("hypergeom", &set).is_ok());
        assert_eq!(
            "hypergeom".parse::<EnrichmentMethod>().unwrap(),
            EnrichmentMethod::Hypergeometric
        );
    }

    fn annotated_ontology() -> Ontology {
        let mut builder = Builder::new();
        builder.add_term(1u32, "root");
        for (id, name) in [(2u32, "a"), (3u32, "b"), (4u32, "c"), (5u32, "d")] {
            builder.add_term(id, name);
            builder.add_parent(1u32, id);
        }
        let mut connected = builder.connect().unwrap();
        for (term, id, symbol) in [
            (2u32, 10u32, "G1"),
            (3u32, 10u32, "G1"),
            (2u32, 11u32, "G2"),
            (4u32, 11u32, "G2"),
        ] {
            let gene = connected.add_gene(symbol, id);
            connected.link_gene(term.into(), gene).unwrap();
        }
        let disease = connected.add_omim_disease("D1", 50u32);
        connected.link_omim_disease(2u32.into(), disease).unwrap();
        connected.link_omim_disease(5u32.into(), disease).unwrap();
        connected.build().unwrap()
    }

    #[test]
    fn suggested_terms_exclude_the_query() {
        let ontology = annotated_ontology();
        let set = HpoSet::from_query_string(&ontology, "2").unwrap();

        let suggested = suggest_terms("hypergeom", &set, &SuggestOptions::default()).unwrap();
        assert!(!suggested.is_empty());
        assert!(suggested.iter().all(|s| s.id != HpoTermId::from(2u32)));
        for pair in suggested.windows(2) {
            assert!(
                pair[0].pvalue < pair[1].pvalue
                    || (pair[0].pvalue == pair[1].pvalue && pair[0].id < pair[1].id)
            );
        }
    }

    #[test]
    fn suggestion_respects_the_limit() {
        let ontology = annotated_ontology();
        let set = HpoSet::from_query_string(&ontology, "2").unwrap();

        let options = SuggestOptions {
            limit: 2,
            ..SuggestOptions::default()
        };
        let suggested = suggest_terms("hypergeom", &set, &options).unwrap();
        assert!(suggested.len() <= 2);

        let all = suggest_terms("hypergeom", &set, &SuggestOptions::default()).unwrap();
        assert!(all.len() >= suggested.len());
    }

    #[test]
    fn disabled_passes_contribute_nothing() {
        let ontology = annotated_ontology();
        let set = HpoSet::from_query_string(&ontology, "2").unwrap();

        let options = SuggestOptions {
            genes: 0,
            omim_diseases: 0,
            ..SuggestOptions::default()
        };
        assert!(suggest_terms("hypergeom", &set, &options)
            .unwrap()
            .is_empty());
    }
}
