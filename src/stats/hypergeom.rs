//! Hypergeometric enrichment
//!
//! The model is an urn draw: the query draws `|Q|` terms out of the
//! corpus, a candidate item is annotated with `K` of the corpus terms,
//! and the overlap `n = |Q ∩ candidate|` is scored with the survival
//! probability `P(X ≥ n)` of the hypergeometric distribution. A small
//! p-value means the overlap is larger than chance predicts.
use statrs::distribution::{DiscreteCDF, Hypergeometric};
use tracing::debug;

use crate::annotations::{AnnotationId, Disease, Gene, GeneId, OmimDiseaseId, OrphaDiseaseId};
use crate::set::HpoSet;
use crate::stats::Enrichment;
use crate::term::{HpoGroup, HpoTermId};
use crate::Ontology;

/// `P(X ≥ observed)` for a hypergeometric draw
///
/// `successes` and `draws` are clamped to the population so that sparse
/// test corpora with more annotations than population members stay valid
/// model parameters.
fn survival(population: u64, successes: u64, draws: u64, observed: u64) -> f64 {
    let successes = successes.min(population);
    let draws = draws.min(population);
    match Hypergeometric::new(population, successes, draws) {
        // observed >= 1 is guaranteed by the callers, sf is P(X > x)
        Ok(distribution) => distribution.sf(observed - 1),
        Err(_) => 1.0,
    }
}

fn sort<T: AnnotationId>(results: &mut [Enrichment<T>]) {
    results.sort_by(|a, b| {
        a.pvalue
            .partial_cmp(&b.pvalue)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.id.as_u32().cmp(&b.id.as_u32()))
    });
}

/// Genes ranked by enrichment in the query set
///
/// Genes that share no term with the query are not part of the result.
pub fn gene_enrichment(set: &HpoSet) -> Vec<Enrichment<GeneId>> {
    let ontology = set.ontology();
    let population = ontology.genes().count() as u64;
    let mut results: Vec<Enrichment<GeneId>> = ontology
        .genes()
        .filter_map(|gene| {
            enrich_candidate(set, population, *gene.id(), gene.hpo_terms())
        })
        .collect();
    sort(&mut results);
    results
}

/// OMIM diseases ranked by enrichment in the query set
///
/// Diseases that share no term with the query are not part of the result.
pub fn omim_disease_enrichment(set: &HpoSet) -> Vec<Enrichment<OmimDiseaseId>> {
    let ontology = set.ontology();
    let population = ontology.omim_diseases().count() as u64;
    let mut results: Vec<Enrichment<OmimDiseaseId>> = ontology
        .omim_diseases()
        .filter_map(|disease| {
            enrich_candidate(set, population, *disease.id(), disease.hpo_terms())
        })
        .collect();
    sort(&mut results);
    results
}

/// Orphanet diseases ranked by enrichment in the query set
pub fn orpha_disease_enrichment(set: &HpoSet) -> Vec<Enrichment<OrphaDiseaseId>> {
    let ontology = set.ontology();
    let population = ontology.orpha_diseases().count() as u64;
    let mut results: Vec<Enrichment<OrphaDiseaseId>> = ontology
        .orpha_diseases()
        .filter_map(|disease| {
            enrich_candidate(set, population, *disease.id(), disease.hpo_terms())
        })
        .collect();
    sort(&mut results);
    results
}

fn enrich_candidate<T: AnnotationId>(
    set: &HpoSet,
    population: u64,
    id: T,
    terms: &HpoGroup,
) -> Option<Enrichment<T>> {
    let overlap = (set.term_ids() & terms).len() as u64;
    if overlap == 0 {
        debug!("candidate {} shares no terms with the query", id.as_u32());
        return None;
    }
    Some(Enrichment {
        id,
        pvalue: survival(population, terms.len() as u64, set.len() as u64, overlap),
        count: overlap,
    })
}

/// Terms ranked by enrichment among a list of genes
///
/// The model swaps the roles of terms and items: the population is every
/// gene of the ontology, a term "succeeds" on the genes it is annotated
/// with, and the query draws the given genes. Terms not annotated to any
/// of the given genes are not part of the result.
pub fn term_enrichment_from_genes(
    ontology: &Ontology,
    genes: &[&Gene],
) -> Vec<Enrichment<HpoTermId>> {
    let population = ontology.genes().count() as u64;
    let draws = genes.len() as u64;
    let mut results: Vec<Enrichment<HpoTermId>> = ontology
        .hpos()
        .filter_map(|term| {
            let overlap = genes
                .iter()
                .filter(|gene| gene.hpo_terms().contains(&term.id()))
                .count() as u64;
            if overlap == 0 {
                return None;
            }
            Some(Enrichment {
                id: term.id(),
                pvalue: survival(population, term.genes().len() as u64, draws, overlap),
                count: overlap,
            })
        })
        .collect();
    sort_terms(&mut results);
    results
}

/// Terms ranked by enrichment among a list of diseases
///
/// Population and per-term successes come from the corpus of `D`, so
/// OMIM and Orphanet seeds are each scored against their own registry.
pub fn term_enrichment_from_diseases<D: Disease>(
    ontology: &Ontology,
    diseases: &[&D],
) -> Vec<Enrichment<HpoTermId>> {
    let population = D::corpus_size(ontology) as u64;
    let draws = diseases.len() as u64;
    let mut results: Vec<Enrichment<HpoTermId>> = ontology
        .hpos()
        .filter_map(|term| {
            let overlap = diseases
                .iter()
                .filter(|disease| disease.hpo_terms().contains(&term.id()))
                .count() as u64;
            if overlap == 0 {
                return None;
            }
            Some(Enrichment {
                id: term.id(),
                pvalue: survival(
                    population,
                    D::of_term(&term).len() as u64,
                    draws,
                    overlap,
                ),
                count: overlap,
            })
        })
        .collect();
    sort_terms(&mut results);
    results
}

fn sort_terms(results: &mut [Enrichment<HpoTermId>]) {
    results.sort_by(|a, b| {
        a.pvalue
            .partial_cmp(&b.pvalue)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ontology::{Builder, GeneAnnotation};

    /// 4 terms below the root, 3 genes with different term spectra
    fn ontology() -> Ontology {
        let mut builder = Builder::new();
        builder.add_term(1u32, "All");
        for (id, name) in [(2u32, "a"), (3u32, "b"), (4u32, "c"), (5u32, "d")] {
            builder.add_term(id, name);
            builder.add_parent(1u32, id);
        }
        let mut connected = builder.connect().unwrap();
        let records = [
            (2u32, 10u32, "EXACT"),
            (3u32, 10u32, "EXACT"),
            (4u32, 10u32, "EXACT"),
            (2u32, 11u32, "HALF"),
            (5u32, 11u32, "HALF"),
            (5u32, 12u32, "OTHER"),
        ];
        let report = connected.load_genes(records.into_iter().map(|(term, gene, symbol)| {
            GeneAnnotation {
                term: term.into(),
                gene_id: gene.into(),
                symbol: symbol.to_string(),
            }
        }));
        assert_eq!(report.skipped, 0);
        connected.build().unwrap()
    }

    #[test]
    fn genes_with_larger_overlap_rank_first() {
        let ontology = ontology();
        let set = HpoSet::from_query_string(&ontology, "2,3,4").unwrap();

        let results = gene_enrichment(&set);
        assert_eq!(results[0].id, GeneId::from(10u32));
        assert_eq!(results[0].count, 3);
        // OTHER shares no query term, only via the propagated root
        assert!(results.iter().all(|r| (0.0..=1.0).contains(&r.pvalue)));
        assert!(results[0].pvalue <= results[1].pvalue);
    }

    #[test]
    fn candidates_without_overlap_are_dropped() {
        let ontology = ontology();
        let set = HpoSet::from_query_string(&ontology, "3,4").unwrap();

        let results = gene_enrichment(&set);
        assert!(results.iter().all(|r| r.count > 0));
        assert!(!results.iter().any(|r| r.id == GeneId::from(12u32)));
    }

    #[test]
    fn term_enrichment_swaps_the_model() {
        let ontology = ontology();
        let genes = [
            ontology.gene(&10u32.into()).unwrap(),
            ontology.gene(&11u32.into()).unwrap(),
        ];
        let results = term_enrichment_from_genes(&ontology, &genes);

        // term 2 is annotated to both seed genes
        let term2 = results.iter().find(|r| r.id == HpoTermId::from(2u32)).unwrap();
        assert_eq!(term2.count, 2);
        // term 5 is in HALF only; OTHER is not a seed gene
        let term5 = results.iter().find(|r| r.id == HpoTermId::from(5u32)).unwrap();
        assert_eq!(term5.count, 1);
        for pair in results.windows(2) {
            assert!(pair[0].pvalue <= pair[1].pvalue);
        }
    }

    #[test]
    fn disease_term_enrichment_uses_the_matching_corpus() {
        let mut builder = Builder::new();
        builder.add_term(1u32, "All");
        for (id, name) in [(2u32, "a"), (3u32, "b"), (4u32, "c")] {
            builder.add_term(id, name);
            builder.add_parent(1u32, id);
        }
        let mut connected = builder.connect().unwrap();
        for (term, id, name) in [
            (2u32, 100u32, "OA"),
            (3u32, 100u32, "OA"),
            (2u32, 101u32, "OB"),
            (4u32, 101u32, "OB"),
            (3u32, 102u32, "OC"),
        ] {
            let disease = connected.add_orpha_disease(name, id);
            connected.link_orpha_disease(term.into(), disease).unwrap();
        }
        let ontology = connected.build().unwrap();

        let diseases = [
            ontology.orpha_disease(&100u32.into()).unwrap(),
            ontology.orpha_disease(&101u32.into()).unwrap(),
        ];
        let results = term_enrichment_from_diseases(&ontology, &diseases);

        // term 2 carries both seed diseases out of a corpus of 3:
        // P(X >= 2 | N=3, K=2, n=2) = 1/3
        let term2 = results
            .iter()
            .find(|r| r.id == HpoTermId::from(2u32))
            .unwrap();
        assert_eq!(term2.count, 2);
        assert!((term2.pvalue - 1.0 / 3.0).abs() < 1e-9);
        assert!(results.iter().all(|r| r.pvalue > 0.0));
        for pair in results.windows(2) {
            assert!(pair[0].pvalue <= pair[1].pvalue);
        }
    }

    #[test]
    fn survival_is_a_probability() {
        assert!((survival(10, 4, 3, 1) - 1.0).abs() < 0.5);
        assert!(survival(10, 4, 3, 3) < survival(10, 4, 3, 1));
        // clamping keeps degenerate corpora valid
        assert!((0.0..=1.0).contains(&survival(2, 5, 8, 2)));
    }
}
