//! Per-chromosome overlap / containment / nearest queries over genes and
//! transcripts.
//!
//! Generalizes `gtars_overlaprs::multi_chrom_overlapper::MultiChromOverlapper`'s
//! `HashMap<chromosome, overlapper>` shape to two trees per chromosome
//! (genes and transcripts) built directly off the store's rows rather than
//! off a `RegionSet`.

use crate::store::GeneModelStore;

/// Looks up a chromosome's trees, translating internal tree queries back to
/// accession strings. An unknown chromosome yields empty results for every
/// query, never an error — this is intentionally permissive.
pub struct QueryEngine<'a> {
    store: &'a GeneModelStore,
}

impl<'a> QueryEngine<'a> {
    pub fn new(store: &'a GeneModelStore) -> Self {
        QueryEngine { store }
    }

    pub fn find_overlapping_genes(&self, chrom: &str, s: i64, e: i64) -> Vec<String> {
        self.query_genes(chrom, |t| t.find_overlapping(s, e))
    }

    pub fn find_contained_genes(&self, chrom: &str, s: i64, e: i64) -> Vec<String> {
        self.query_genes(chrom, |t| t.find_contained(s, e))
    }

    pub fn find_nearest_genes(&self, chrom: &str, p: i64) -> Vec<String> {
        self.query_genes(chrom, |t| t.find_nearest(p))
    }

    pub fn find_overlapping_transcripts(&self, chrom: &str, s: i64, e: i64) -> Vec<String> {
        self.query_transcripts(chrom, |t| t.find_overlapping(s, e))
    }

    pub fn find_contained_transcripts(&self, chrom: &str, s: i64, e: i64) -> Vec<String> {
        self.query_transcripts(chrom, |t| t.find_contained(s, e))
    }

    pub fn find_nearest_transcripts(&self, chrom: &str, p: i64) -> Vec<String> {
        self.query_transcripts(chrom, |t| t.find_nearest(p))
    }

    fn query_genes(
        &self,
        chrom: &str,
        f: impl Fn(&crate::interval_tree::IntervalTree) -> Vec<u32>,
    ) -> Vec<String> {
        match self.store.chrom_index(chrom) {
            Some(idx) => f(&idx.genes)
                .into_iter()
                .map(|gene_idx| self.store.id_by_gene_idx(gene_idx).to_string())
                .collect(),
            None => Vec::new(),
        }
    }

    fn query_transcripts(
        &self,
        chrom: &str,
        f: impl Fn(&crate::interval_tree::IntervalTree) -> Vec<u32>,
    ) -> Vec<String> {
        match self.store.chrom_index(chrom) {
            Some(idx) => f(&idx.transcripts)
                .into_iter()
                .map(|tx_idx| self.store.id_by_tx_idx(tx_idx).to_string())
                .collect(),
            None => Vec::new(),
        }
    }
}
