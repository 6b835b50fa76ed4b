//! Serializes a finalized [`GeneModelStore`] to disk and rebuilds it on load.
//!
//! The trees are derived data, not state, so they are never serialized;
//! only the gene/transcript/exon rows are written, and `finalize()` rebuilds
//! the trees after a load the same way it does after a fresh parse.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use genemodels_core::{Exon, GeneModelsError, Strand};
use serde::{Deserialize, Serialize};

use crate::store::{GeneModelStore, GeneRecord, TranscriptRecord};

const MAGIC: [u8; 4] = *b"GMDB";
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct GeneSnapshot {
    id: String,
    name: String,
    source: String,
    chromosome: String,
    strand: Strand,
}

#[derive(Debug, Serialize, Deserialize)]
struct TranscriptSnapshot {
    id: String,
    gene_id: String,
    chromosome: String,
    strand: Strand,
    start: i64,
    end: i64,
    cds: Option<(i64, i64)>,
    exons: Vec<Exon>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    magic: [u8; 4],
    format_version: u32,
    genes: Vec<GeneSnapshot>,
    transcripts: Vec<TranscriptSnapshot>,
}

/// Writes `store` to `path`. `store` must already be finalized; this is the
/// caller's responsibility, the same way `GeneModelStore::finalize` itself
/// requires the caller to have fully populated the store first.
pub fn save(store: &GeneModelStore, path: impl AsRef<Path>) -> Result<(), GeneModelsError> {
    let genes = store
        .genes
        .iter()
        .map(|row| GeneSnapshot {
            id: row.id.clone(),
            name: row.name.clone(),
            source: row.source.clone(),
            chromosome: row.chromosome.clone(),
            strand: row.strand,
        })
        .collect();

    let transcripts = store
        .transcripts
        .iter()
        .map(|row| {
            let (a, b) = row.exon_range;
            TranscriptSnapshot {
                id: row.id.clone(),
                gene_id: store.genes[row.gene_idx].id.clone(),
                chromosome: row.chromosome.clone(),
                strand: row.strand,
                start: row.start,
                end: row.end,
                cds: row.cds,
                exons: store.exons[a..b].to_vec(),
            }
        })
        .collect();

    let snapshot = Snapshot {
        magic: MAGIC,
        format_version: FORMAT_VERSION,
        genes,
        transcripts,
    };

    let file = File::create(path)?;
    bincode::serialize_into(BufWriter::new(file), &snapshot)?;
    Ok(())
}

/// Reads a snapshot written by [`save`] and rebuilds a finalized store.
pub fn load(path: impl AsRef<Path>) -> Result<GeneModelStore, GeneModelsError> {
    let file = File::open(path)?;
    let snapshot: Snapshot = bincode::deserialize_from(BufReader::new(file))?;

    if snapshot.magic != MAGIC || snapshot.format_version != FORMAT_VERSION {
        return Err(GeneModelsError::VersionMismatch {
            expected: FORMAT_VERSION,
            found: snapshot.format_version,
        });
    }

    let mut store = GeneModelStore::new();
    for gene in snapshot.genes {
        store.add_gene(GeneRecord {
            id: gene.id,
            name: gene.name,
            source: gene.source,
            chromosome: gene.chromosome,
            strand: gene.strand,
        })?;
    }
    for tx in snapshot.transcripts {
        store.add_transcript(
            TranscriptRecord {
                id: tx.id,
                gene_id: tx.gene_id,
                chromosome: tx.chromosome,
                strand: tx.strand,
                start: tx.start,
                end: tx.end,
                cds: tx.cds,
            },
            tx.exons,
        )?;
    }
    store.finalize()?;
    Ok(store)
}
