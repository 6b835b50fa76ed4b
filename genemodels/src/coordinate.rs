//! Classifies a genomic position relative to a gene's transcripts, and maps
//! transcript-local offsets to genome coordinates and back as spliced
//! regions.
//!
//! Small `Result`-returning functions reading directly off the store's rows,
//! rather than methods on a stateful type — there's no state here beyond the
//! store and config already passed in.

use genemodels_core::{Exon, GeneModelsError, Strand};

use crate::config::GeneModelsConfig;
use crate::store::GeneModelStore;

/// Where a position falls relative to a gene's transcripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationTag {
    Upstream,
    Downstream,
    Utr5p,
    Utr3p,
    Coding,
    Intron,
    /// Overlaps an exon of a non-coding transcript.
    Utr,
    Intergenic,
}

impl LocationTag {
    /// Lower rank wins when multiple transcripts of the same gene cover the
    /// same position: the most-specific tag wins.
    fn priority(self) -> u8 {
        match self {
            LocationTag::Coding => 0,
            LocationTag::Utr5p => 1,
            LocationTag::Utr3p => 2,
            LocationTag::Utr => 3,
            LocationTag::Intron => 4,
            LocationTag::Upstream | LocationTag::Downstream | LocationTag::Intergenic => {
                unreachable!("transcript candidates are never upstream/downstream/intergenic")
            }
        }
    }
}

pub fn calculate_gene_location(
    store: &GeneModelStore,
    config: &GeneModelsConfig,
    gene_id: &str,
    position: i64,
) -> Result<LocationTag, GeneModelsError> {
    let gene_idx = store.gene_idx(gene_id)?;
    let gene = store.gene_row(gene_idx);
    let promoter = config.promoter_bp;

    if position < gene.start - promoter || position > gene.end + promoter {
        return Ok(LocationTag::Intergenic);
    }
    if position < gene.start {
        return Ok(match gene.strand {
            Strand::Plus => LocationTag::Upstream,
            Strand::Minus => LocationTag::Downstream,
        });
    }
    if position > gene.end {
        return Ok(match gene.strand {
            Strand::Plus => LocationTag::Downstream,
            Strand::Minus => LocationTag::Upstream,
        });
    }

    let mut best: Option<LocationTag> = None;
    for &tx_idx in &gene.tx_indices {
        let tx = store.transcript_row(tx_idx);
        if position < tx.start || position > tx.end {
            continue;
        }
        let exons = store.exon_slice(tx.exon_range);
        let candidate = classify_within_transcript(exons, tx.cds, tx.strand, position);
        best = Some(match best {
            None => candidate,
            Some(current) => {
                if candidate.priority() < current.priority() {
                    candidate
                } else {
                    current
                }
            }
        });
    }

    Ok(best.unwrap_or(LocationTag::Intron))
}

fn classify_within_transcript(
    exons: &[Exon],
    cds: Option<(i64, i64)>,
    strand: Strand,
    position: i64,
) -> LocationTag {
    let containing_exon = exons.iter().find(|e| e.contains(position));

    let Some((cds_start, cds_end)) = cds else {
        return match containing_exon {
            Some(_) => LocationTag::Utr,
            None => LocationTag::Intron,
        };
    };

    if containing_exon.is_none() {
        return LocationTag::Intron;
    }

    if position >= cds_start && position <= cds_end {
        return LocationTag::Coding;
    }
    let before_cds = position < cds_start;
    match (before_cds, strand) {
        (true, Strand::Plus) | (false, Strand::Minus) => LocationTag::Utr5p,
        (false, Strand::Plus) | (true, Strand::Minus) => LocationTag::Utr3p,
    }
}

pub fn calculate_genomic_position(
    store: &GeneModelStore,
    tx_id: &str,
    tx_offset: i64,
) -> Result<i64, GeneModelsError> {
    let tx_idx = store.tx_idx(tx_id)?;
    let tx = store.transcript_row(tx_idx);
    let exons = store.exon_slice(tx.exon_range);
    let exons = transcription_order(exons, tx.strand);

    let (exon, r) = locate_offset(&exons, tx_offset).ok_or_else(|| {
        let length: i64 = exons.iter().map(Exon::len).sum();
        GeneModelsError::OutOfRange {
            transcript_id: tx_id.to_string(),
            offset: tx_offset,
            length,
        }
    })?;

    Ok(match tx.strand {
        Strand::Plus => exon.start + r - 1,
        Strand::Minus => exon.end - r + 1,
    })
}

pub fn calculate_genomic_regions(
    store: &GeneModelStore,
    tx_id: &str,
    tx_start: i64,
    tx_end: i64,
) -> Result<Vec<(i64, i64)>, GeneModelsError> {
    let tx_idx = store.tx_idx(tx_id)?;
    let tx = store.transcript_row(tx_idx);
    let exons = store.exon_slice(tx.exon_range);
    let exons = transcription_order(exons, tx.strand);

    let total_length: i64 = exons.iter().map(Exon::len).sum();
    if tx_start < 1 || tx_end > total_length || tx_start > tx_end {
        return Err(GeneModelsError::OutOfRange {
            transcript_id: tx_id.to_string(),
            offset: tx_end,
            length: total_length,
        });
    }

    let mut regions = Vec::new();
    let mut cum = 0i64;
    for exon in &exons {
        let exon_lo = cum + 1;
        let exon_hi = cum + exon.len();
        cum = exon_hi;

        let clip_lo = tx_start.max(exon_lo);
        let clip_hi = tx_end.min(exon_hi);
        if clip_lo > clip_hi {
            continue;
        }

        let r_lo = clip_lo - exon_lo + 1;
        let r_hi = clip_hi - exon_lo + 1;
        let (gs, ge) = match tx.strand {
            Strand::Plus => (exon.start + r_lo - 1, exon.start + r_hi - 1),
            Strand::Minus => (exon.end - r_hi + 1, exon.end - r_lo + 1),
        };
        regions.push((gs, ge));
    }

    regions.sort_unstable();
    Ok(regions)
}

/// Exons in transcription direction: as stored on `+`, reversed on `-`.
fn transcription_order(exons: &[Exon], strand: Strand) -> Vec<Exon> {
    let mut exons = exons.to_vec();
    if matches!(strand, Strand::Minus) {
        exons.reverse();
    }
    exons
}

/// Finds the exon whose cumulative transcript-length range covers
/// `tx_offset` (1-based), returning it along with the residual offset
/// within that exon.
fn locate_offset(exons_transcription_order: &[Exon], tx_offset: i64) -> Option<(Exon, i64)> {
    if tx_offset < 1 {
        return None;
    }
    let mut cum = 0i64;
    for exon in exons_transcription_order {
        let len = exon.len();
        if cum + len >= tx_offset {
            let r = tx_offset - cum;
            return Some((*exon, r));
        }
        cum += len;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{GeneRecord, TranscriptRecord};
    use pretty_assertions::assert_eq;

    fn base_store() -> GeneModelStore {
        let mut store = GeneModelStore::new();
        store
            .add_gene(GeneRecord {
                id: "G1".into(),
                name: "G1".into(),
                source: "protein_coding".into(),
                chromosome: "1".into(),
                strand: Strand::Plus,
            })
            .unwrap();
        store
            .add_transcript(
                TranscriptRecord {
                    id: "T1".into(),
                    gene_id: "G1".into(),
                    chromosome: "1".into(),
                    strand: Strand::Plus,
                    start: 1000,
                    end: 2000,
                    cds: Some((1200, 1800)),
                },
                vec![Exon::new(1000, 1400), Exon::new(1600, 2000)],
            )
            .unwrap();
        store.finalize().unwrap();
        store
    }

    #[test]
    fn classifies_coding_and_utrs() {
        let store = base_store();
        let config = GeneModelsConfig::default();
        assert_eq!(
            calculate_gene_location(&store, &config, "G1", 1100).unwrap(),
            LocationTag::Utr5p
        );
        assert_eq!(
            calculate_gene_location(&store, &config, "G1", 1300).unwrap(),
            LocationTag::Coding
        );
        assert_eq!(
            calculate_gene_location(&store, &config, "G1", 1900).unwrap(),
            LocationTag::Utr3p
        );
        assert_eq!(
            calculate_gene_location(&store, &config, "G1", 1500).unwrap(),
            LocationTag::Intron
        );
        assert_eq!(
            calculate_gene_location(&store, &config, "G1", 500).unwrap(),
            LocationTag::Upstream
        );
        assert_eq!(
            calculate_gene_location(&store, &config, "G1", 2500).unwrap(),
            LocationTag::Downstream
        );
        assert_eq!(
            calculate_gene_location(&store, &config, "G1", 900000).unwrap(),
            LocationTag::Intergenic
        );
    }

    #[test]
    fn promoter_boundary_is_exact() {
        let store = base_store();
        let config = GeneModelsConfig::default();
        // gene.start = 1000, PROMOTER = 2000
        assert_eq!(
            calculate_gene_location(&store, &config, "G1", 1000 - 2000).unwrap(),
            LocationTag::Upstream
        );
        assert_eq!(
            calculate_gene_location(&store, &config, "G1", 1000 - 2000 - 1).unwrap(),
            LocationTag::Intergenic
        );
    }

    #[test]
    fn non_coding_transcript_is_utr_over_exon_else_intron() {
        let mut store = GeneModelStore::new();
        store
            .add_gene(GeneRecord {
                id: "G2".into(),
                name: "G2".into(),
                source: "lncRNA".into(),
                chromosome: "1".into(),
                strand: Strand::Plus,
            })
            .unwrap();
        store
            .add_transcript(
                TranscriptRecord {
                    id: "T2".into(),
                    gene_id: "G2".into(),
                    chromosome: "1".into(),
                    strand: Strand::Plus,
                    start: 1000,
                    end: 2000,
                    cds: None,
                },
                vec![Exon::new(1000, 1400), Exon::new(1600, 2000)],
            )
            .unwrap();
        store.finalize().unwrap();
        let config = GeneModelsConfig::default();

        assert_eq!(
            calculate_gene_location(&store, &config, "G2", 1200).unwrap(),
            LocationTag::Utr
        );
        assert_eq!(
            calculate_gene_location(&store, &config, "G2", 1500).unwrap(),
            LocationTag::Intron
        );
    }

    #[test]
    fn genomic_position_round_trips_through_regions() {
        let store = base_store();
        for k in 1..=store.get_transcript("T1").unwrap().exonic_length() {
            let pos = calculate_genomic_position(&store, "T1", k).unwrap();
            let regions = calculate_genomic_regions(&store, "T1", k, k).unwrap();
            assert_eq!(regions, vec![(pos, pos)]);
        }
    }

    #[test]
    fn minus_strand_reverses_exon_order() {
        let mut store = GeneModelStore::new();
        store
            .add_gene(GeneRecord {
                id: "G3".into(),
                name: "G3".into(),
                source: "protein_coding".into(),
                chromosome: "1".into(),
                strand: Strand::Minus,
            })
            .unwrap();
        store
            .add_transcript(
                TranscriptRecord {
                    id: "T3".into(),
                    gene_id: "G3".into(),
                    chromosome: "1".into(),
                    strand: Strand::Minus,
                    start: 1000,
                    end: 2000,
                    cds: None,
                },
                vec![Exon::new(1000, 1099), Exon::new(1900, 2000)],
            )
            .unwrap();
        store.finalize().unwrap();

        // Transcription order on `-` puts the high-coordinate exon first,
        // so offset 1 maps to its end.
        assert_eq!(calculate_genomic_position(&store, "T3", 1).unwrap(), 2000);
        assert_eq!(calculate_genomic_position(&store, "T3", 101).unwrap(), 1099);
    }

    #[test]
    fn out_of_range_offset_is_an_error() {
        let store = base_store();
        let err = calculate_genomic_position(&store, "T1", 10_000).unwrap_err();
        assert!(matches!(err, GeneModelsError::OutOfRange { .. }));
    }
}
