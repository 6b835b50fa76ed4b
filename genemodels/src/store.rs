//! The columnar gene/transcript/exon tables.
//!
//! Mirrors `gtars_core::models::RegionSet`'s "flat `Vec` of rows plus a
//! `path`/header sidecar" shape, generalized to three related tables with
//! stable integer indices instead of one. Trees reference these rows by
//! index only, never by pointer, so the store can be dropped and rebuilt
//! freely.

use std::collections::HashMap;

use genemodels_core::{Exon, Gene, GeneModelsError, Interval, Strand, Transcript};

use crate::interval_tree::IntervalTree;

/// A gene record as handed to [`GeneModelStore::add_gene`] by the loader.
/// `start`/`end` are not part of this shape: a gene's bounding box is the
/// union of its transcripts, recomputed by [`GeneModelStore::finalize`].
#[derive(Debug, Clone)]
pub struct GeneRecord {
    pub id: String,
    pub name: String,
    pub source: String,
    pub chromosome: String,
    pub strand: Strand,
}

/// A transcript record as handed to [`GeneModelStore::add_transcript`],
/// paired with its exon list.
#[derive(Debug, Clone)]
pub struct TranscriptRecord {
    pub id: String,
    pub gene_id: String,
    pub chromosome: String,
    pub strand: Strand,
    pub start: i64,
    pub end: i64,
    pub cds: Option<(i64, i64)>,
}

#[derive(Debug, Clone)]
pub(crate) struct GeneRow {
    pub id: String,
    pub name: String,
    pub source: String,
    pub chromosome: String,
    pub strand: Strand,
    pub start: i64,
    pub end: i64,
    pub tx_indices: Vec<usize>,
}

#[derive(Debug, Clone)]
pub(crate) struct TranscriptRow {
    pub id: String,
    pub gene_idx: usize,
    pub chromosome: String,
    pub strand: Strand,
    pub start: i64,
    pub end: i64,
    pub cds: Option<(i64, i64)>,
    pub exon_range: (usize, usize),
}

/// Per-chromosome pair of interval trees built by [`GeneModelStore::finalize`].
#[derive(Debug, Default)]
pub(crate) struct ChromosomeIndex {
    pub genes: IntervalTree,
    pub transcripts: IntervalTree,
}

/// The columnar store: genes, transcripts, and a shared exon arena, plus the
/// inverted lookups and per-chromosome trees built by `finalize()`.
///
/// Mutable during the build phase (owned by the loader), immutable after
/// `finalize()`.
#[derive(Debug, Default)]
pub struct GeneModelStore {
    pub(crate) genes: Vec<GeneRow>,
    pub(crate) transcripts: Vec<TranscriptRow>,
    pub(crate) exons: Vec<Exon>,
    gene_index: HashMap<String, usize>,
    tx_index: HashMap<String, usize>,
    pub(crate) chrom_trees: HashMap<String, ChromosomeIndex>,
    finalized: bool,
}

impl GeneModelStore {
    pub fn new() -> Self {
        GeneModelStore::default()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Appends a new gene row. Rejects a `gene_id` seen before with
    /// `DuplicateId`.
    pub fn add_gene(&mut self, record: GeneRecord) -> Result<(), GeneModelsError> {
        if self.gene_index.contains_key(&record.id) {
            return Err(GeneModelsError::DuplicateId(record.id));
        }
        let idx = self.genes.len();
        self.gene_index.insert(record.id.clone(), idx);
        self.genes.push(GeneRow {
            id: record.id,
            name: record.name,
            source: record.source,
            chromosome: record.chromosome,
            strand: record.strand,
            // Recomputed from transcripts in `finalize()`.
            start: i64::MAX,
            end: i64::MIN,
            tx_indices: Vec::new(),
        });
        Ok(())
    }

    /// Appends a new transcript row and its exons. Rejects a `transcript_id`
    /// seen before with `DuplicateId`, and a `gene_id` that hasn't been
    /// registered via `add_gene` with `UnknownParent`.
    pub fn add_transcript(
        &mut self,
        record: TranscriptRecord,
        exons: Vec<Exon>,
    ) -> Result<(), GeneModelsError> {
        if self.tx_index.contains_key(&record.id) {
            return Err(GeneModelsError::DuplicateId(record.id));
        }
        let gene_idx = *self.gene_index.get(&record.gene_id).ok_or_else(|| {
            GeneModelsError::UnknownParent {
                transcript_id: record.id.clone(),
                gene_id: record.gene_id.clone(),
            }
        })?;

        let exon_start = self.exons.len();
        self.exons.extend(exons);
        let exon_range = (exon_start, self.exons.len());

        let tx_idx = self.transcripts.len();
        let tx_id = record.id.clone();
        self.transcripts.push(TranscriptRow {
            id: record.id,
            gene_idx,
            chromosome: record.chromosome,
            strand: record.strand,
            start: record.start,
            end: record.end,
            cds: record.cds,
            exon_range,
        });
        self.tx_index.insert(tx_id, tx_idx);
        self.genes[gene_idx].tx_indices.push(tx_idx);
        Ok(())
    }

    /// Sorts each transcript's exons, recomputes gene bounding boxes,
    /// validates invariants, and builds the per-chromosome interval trees.
    /// Atomic: on failure the store is left exactly as it was before the
    /// call, so the caller may fix the offending records and retry.
    pub fn finalize(&mut self) -> Result<(), GeneModelsError> {
        for tx in &mut self.transcripts {
            let (a, b) = tx.exon_range;
            self.exons[a..b].sort_by_key(|e| e.start);
        }

        for tx in &self.transcripts {
            let (a, b) = tx.exon_range;
            for exon in &self.exons[a..b] {
                if exon.start < tx.start || exon.end > tx.end {
                    return Err(GeneModelsError::InconsistentGene {
                        gene_id: self.genes[tx.gene_idx].id.clone(),
                        field: "exon bounds exceed transcript span".to_string(),
                    });
                }
            }
            for pair in self.exons[a..b].windows(2) {
                if pair[0].end >= pair[1].start {
                    return Err(GeneModelsError::InconsistentGene {
                        gene_id: self.genes[tx.gene_idx].id.clone(),
                        field: "exons overlap".to_string(),
                    });
                }
            }
            if let Some((cds_start, cds_end)) = tx.cds {
                if !(tx.start <= cds_start && cds_start <= cds_end && cds_end <= tx.end) {
                    return Err(GeneModelsError::InconsistentGene {
                        gene_id: self.genes[tx.gene_idx].id.clone(),
                        field: "CDS bounds outside transcript span".to_string(),
                    });
                }
                let cds_hits_an_exon = self.exons[a..b]
                    .iter()
                    .any(|e| e.start <= cds_end && e.end >= cds_start);
                if !cds_hits_an_exon {
                    return Err(GeneModelsError::InconsistentGene {
                        gene_id: self.genes[tx.gene_idx].id.clone(),
                        field: "CDS does not intersect any exon".to_string(),
                    });
                }
            }
        }

        for gene in &mut self.genes {
            let mut start = i64::MAX;
            let mut end = i64::MIN;
            for &tx_idx in &gene.tx_indices {
                let tx = &self.transcripts[tx_idx];
                start = start.min(tx.start);
                end = end.max(tx.end);
            }
            if start > end {
                // No transcripts registered for this gene: leave an empty,
                // zero-width span rather than an invalid inverted range.
                start = 0;
                end = 0;
            }
            gene.start = start;
            gene.end = end;
        }

        let mut by_chrom_genes: HashMap<String, Vec<Interval>> = HashMap::new();
        for (idx, gene) in self.genes.iter().enumerate() {
            by_chrom_genes
                .entry(gene.chromosome.clone())
                .or_default()
                .push(Interval::new(idx as u32, gene.start, gene.end));
        }

        let mut by_chrom_transcripts: HashMap<String, Vec<Interval>> = HashMap::new();
        for (idx, tx) in self.transcripts.iter().enumerate() {
            by_chrom_transcripts
                .entry(tx.chromosome.clone())
                .or_default()
                .push(Interval::new(idx as u32, tx.start, tx.end));
        }

        let mut chrom_trees = HashMap::new();
        let chromosomes: Vec<String> = by_chrom_genes
            .keys()
            .chain(by_chrom_transcripts.keys())
            .cloned()
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        for chrom in chromosomes {
            let genes = IntervalTree::build(by_chrom_genes.remove(&chrom).unwrap_or_default())?;
            let transcripts =
                IntervalTree::build(by_chrom_transcripts.remove(&chrom).unwrap_or_default())?;
            chrom_trees.insert(chrom, ChromosomeIndex { genes, transcripts });
        }
        self.chrom_trees = chrom_trees;

        self.finalized = true;
        Ok(())
    }

    pub fn get_gene(&self, id: &str) -> Result<Gene, GeneModelsError> {
        let idx = *self
            .gene_index
            .get(id)
            .ok_or_else(|| GeneModelsError::NotFound(id.to_string()))?;
        Ok(self.gene_at(idx))
    }

    pub fn get_transcript(&self, id: &str) -> Result<Transcript, GeneModelsError> {
        let idx = *self
            .tx_index
            .get(id)
            .ok_or_else(|| GeneModelsError::NotFound(id.to_string()))?;
        Ok(self.transcript_at(idx))
    }

    pub fn get_transcript_gene(&self, tx_id: &str) -> Result<String, GeneModelsError> {
        let idx = *self
            .tx_index
            .get(tx_id)
            .ok_or_else(|| GeneModelsError::NotFound(tx_id.to_string()))?;
        Ok(self.genes[self.transcripts[idx].gene_idx].id.clone())
    }

    pub(crate) fn gene_idx(&self, id: &str) -> Result<usize, GeneModelsError> {
        self.gene_index
            .get(id)
            .copied()
            .ok_or_else(|| GeneModelsError::NotFound(id.to_string()))
    }

    pub(crate) fn tx_idx(&self, id: &str) -> Result<usize, GeneModelsError> {
        self.tx_index
            .get(id)
            .copied()
            .ok_or_else(|| GeneModelsError::NotFound(id.to_string()))
    }

    pub(crate) fn gene_row(&self, idx: usize) -> &GeneRow {
        &self.genes[idx]
    }

    pub(crate) fn transcript_row(&self, idx: usize) -> &TranscriptRow {
        &self.transcripts[idx]
    }

    pub(crate) fn exon_slice(&self, range: (usize, usize)) -> &[Exon] {
        &self.exons[range.0..range.1]
    }

    pub(crate) fn chrom_index(&self, chrom: &str) -> Option<&ChromosomeIndex> {
        self.chrom_trees.get(chrom)
    }

    fn gene_at(&self, idx: usize) -> Gene {
        let row = &self.genes[idx];
        Gene {
            id: row.id.clone(),
            name: row.name.clone(),
            source: row.source.clone(),
            chromosome: row.chromosome.clone(),
            strand: row.strand,
            start: row.start,
            end: row.end,
        }
    }

    pub(crate) fn transcript_at(&self, idx: usize) -> Transcript {
        let row = &self.transcripts[idx];
        Transcript {
            id: row.id.clone(),
            gene_id: self.genes[row.gene_idx].id.clone(),
            chromosome: row.chromosome.clone(),
            strand: row.strand,
            start: row.start,
            end: row.end,
            cds: row.cds,
            exons: self.exon_slice(row.exon_range).to_vec(),
        }
    }

    pub(crate) fn id_by_gene_idx(&self, idx: u32) -> &str {
        &self.genes[idx as usize].id
    }

    pub(crate) fn id_by_tx_idx(&self, idx: u32) -> &str {
        &self.transcripts[idx as usize].id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn gene(id: &str, chrom: &str) -> GeneRecord {
        GeneRecord {
            id: id.to_string(),
            name: format!("{id}-name"),
            source: "protein_coding".to_string(),
            chromosome: chrom.to_string(),
            strand: Strand::Plus,
        }
    }

    #[test]
    fn duplicate_gene_is_rejected() {
        let mut store = GeneModelStore::new();
        store.add_gene(gene("G1", "1")).unwrap();
        let err = store.add_gene(gene("G1", "1")).unwrap_err();
        assert!(matches!(err, GeneModelsError::DuplicateId(_)));
    }

    #[test]
    fn transcript_with_unknown_gene_is_rejected() {
        let mut store = GeneModelStore::new();
        let record = TranscriptRecord {
            id: "T1".to_string(),
            gene_id: "missing".to_string(),
            chromosome: "1".to_string(),
            strand: Strand::Plus,
            start: 1,
            end: 100,
            cds: None,
        };
        let err = store.add_transcript(record, vec![]).unwrap_err();
        assert!(matches!(err, GeneModelsError::UnknownParent { .. }));
    }

    #[test]
    fn finalize_recomputes_gene_bounds_from_transcripts() {
        let mut store = GeneModelStore::new();
        store.add_gene(gene("G1", "1")).unwrap();
        store
            .add_transcript(
                TranscriptRecord {
                    id: "T1".to_string(),
                    gene_id: "G1".to_string(),
                    chromosome: "1".to_string(),
                    strand: Strand::Plus,
                    start: 100,
                    end: 200,
                    cds: None,
                },
                vec![Exon::new(100, 200)],
            )
            .unwrap();
        store
            .add_transcript(
                TranscriptRecord {
                    id: "T2".to_string(),
                    gene_id: "G1".to_string(),
                    chromosome: "1".to_string(),
                    strand: Strand::Plus,
                    start: 150,
                    end: 300,
                    cds: None,
                },
                vec![Exon::new(150, 300)],
            )
            .unwrap();
        store.finalize().unwrap();

        let g = store.get_gene("G1").unwrap();
        assert_eq!((g.start, g.end), (100, 300));
    }

    #[test]
    fn not_found_for_missing_accession() {
        let store = GeneModelStore::new();
        assert!(matches!(
            store.get_gene("nope"),
            Err(GeneModelsError::NotFound(_))
        ));
    }

    #[test]
    fn overlapping_exons_are_rejected() {
        let mut store = GeneModelStore::new();
        store.add_gene(gene("G1", "1")).unwrap();
        store
            .add_transcript(
                TranscriptRecord {
                    id: "T1".to_string(),
                    gene_id: "G1".to_string(),
                    chromosome: "1".to_string(),
                    strand: Strand::Plus,
                    start: 100,
                    end: 300,
                    cds: None,
                },
                vec![Exon::new(100, 200), Exon::new(150, 300)],
            )
            .unwrap();
        let err = store.finalize().unwrap_err();
        assert!(matches!(err, GeneModelsError::InconsistentGene { .. }));
    }
}
