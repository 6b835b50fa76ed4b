//! Converts GTF-style annotation records into a [`GeneModelStore`].
//!
//! The wire shape (tab-separated fields, `key "value";` attributes) is
//! simple enough to implement directly here, the way
//! `gtars_core::models::region_set::RegionSet`'s `TryFrom<&Path>` parses its
//! own BED-like format inline instead of delegating to a separate crate.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use genemodels_core::{Exon, GeneModelsError, Strand};

use crate::store::{GeneModelStore, GeneRecord, TranscriptRecord};

const RECOGNIZED_FEATURES: &[&str] = &[
    "gene",
    "transcript",
    "exon",
    "CDS",
    "start_codon",
    "stop_codon",
];

#[derive(Debug)]
struct GtfRecord {
    chrom: String,
    feature: String,
    start: i64,
    end: i64,
    strand: Strand,
    attributes: HashMap<String, String>,
}

/// Parses one GTF line. Blank lines and `#`-prefixed comments yield `None`.
/// Coordinates are 1-based inclusive.
fn parse_gtf_line(line: &str, line_no: usize) -> Result<Option<GtfRecord>, GeneModelsError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 9 {
        return Err(GeneModelsError::ParseError {
            line: line_no,
            message: format!(
                "expected 9 tab-separated fields, found {}",
                fields.len()
            ),
        });
    }

    let start = fields[3].parse().map_err(|_| GeneModelsError::ParseError {
        line: line_no,
        message: format!("invalid start coordinate: {:?}", fields[3]),
    })?;
    let end = fields[4].parse().map_err(|_| GeneModelsError::ParseError {
        line: line_no,
        message: format!("invalid end coordinate: {:?}", fields[4]),
    })?;
    let strand = fields[6]
        .parse::<Strand>()
        .map_err(|message| GeneModelsError::ParseError { line: line_no, message })?;

    Ok(Some(GtfRecord {
        chrom: fields[0].to_string(),
        feature: fields[2].to_string(),
        start,
        end,
        strand,
        attributes: parse_attributes(fields[8]),
    }))
}

/// Parses the `;`-separated `key "value"` attribute grammar.
fn parse_attributes(raw: &str) -> HashMap<String, String> {
    let mut attributes = HashMap::new();
    for part in raw.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some(sep) = part.find(char::is_whitespace) {
            let key = part[..sep].trim();
            let value = part[sep..].trim().trim_matches('"');
            attributes.insert(key.to_string(), value.to_string());
        }
    }
    attributes
}

#[derive(Default)]
struct GeneAccum {
    name: Option<String>,
    source: Option<String>,
    chromosome: Option<String>,
    strand: Option<Strand>,
}

struct TranscriptAccum {
    gene_id: String,
    chromosome: String,
    strand: Strand,
    start: Option<i64>,
    end: Option<i64>,
    exons: Vec<(i64, i64)>,
    cds: Option<(i64, i64)>,
}

/// Records `value` into `slot`, erroring if a prior value disagrees.
fn merge_field<T: PartialEq + Clone>(
    slot: &mut Option<T>,
    value: T,
    gene_id: &str,
    field: &str,
) -> Result<(), GeneModelsError> {
    match slot {
        None => *slot = Some(value),
        Some(existing) if *existing == value => {}
        Some(_) => {
            return Err(GeneModelsError::InconsistentGene {
                gene_id: gene_id.to_string(),
                field: field.to_string(),
            });
        }
    }
    Ok(())
}

/// Reads GTF-style annotation records from `reader` and builds a finalized
/// [`GeneModelStore`].
pub fn load_annotations<R: BufRead>(reader: R) -> Result<GeneModelStore, GeneModelsError> {
    let mut gene_order: Vec<String> = Vec::new();
    let mut genes: HashMap<String, GeneAccum> = HashMap::new();
    let mut tx_order: Vec<String> = Vec::new();
    let mut transcripts: HashMap<String, TranscriptAccum> = HashMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let Some(record) = parse_gtf_line(&line, line_no)? else {
            continue;
        };
        if !RECOGNIZED_FEATURES.contains(&record.feature.as_str()) {
            continue;
        }

        let gene_id = record.attributes.get("gene_id").cloned().ok_or_else(|| {
            GeneModelsError::ParseError {
                line: line_no,
                message: "missing required attribute: gene_id".to_string(),
            }
        })?;

        let accum = genes.entry(gene_id.clone()).or_insert_with(|| {
            gene_order.push(gene_id.clone());
            GeneAccum::default()
        });
        merge_field(&mut accum.chromosome, record.chrom.clone(), &gene_id, "chromosome")?;
        merge_field(&mut accum.strand, record.strand, &gene_id, "strand")?;
        if let Some(name) = record.attributes.get("gene_name") {
            merge_field(&mut accum.name, name.clone(), &gene_id, "gene_name")?;
        }
        if let Some(source) = record
            .attributes
            .get("gene_biotype")
            .or_else(|| record.attributes.get("source"))
        {
            merge_field(&mut accum.source, source.clone(), &gene_id, "gene_biotype")?;
        }

        if record.feature == "gene" {
            continue;
        }

        let transcript_id = record
            .attributes
            .get("transcript_id")
            .cloned()
            .ok_or_else(|| GeneModelsError::ParseError {
                line: line_no,
                message: "missing required attribute: transcript_id".to_string(),
            })?;

        let tx_accum = transcripts
            .entry(transcript_id.clone())
            .or_insert_with(|| {
                tx_order.push(transcript_id.clone());
                TranscriptAccum {
                    gene_id: gene_id.clone(),
                    chromosome: record.chrom.clone(),
                    strand: record.strand,
                    start: None,
                    end: None,
                    exons: Vec::new(),
                    cds: None,
                }
            });

        match record.feature.as_str() {
            "transcript" => {
                tx_accum.start = Some(record.start);
                tx_accum.end = Some(record.end);
            }
            "exon" => tx_accum.exons.push((record.start, record.end)),
            "CDS" | "start_codon" | "stop_codon" => {
                let merged = match tx_accum.cds {
                    Some((s, e)) => (s.min(record.start), e.max(record.end)),
                    None => (record.start, record.end),
                };
                tx_accum.cds = Some(merged);
            }
            _ => {}
        }
    }

    let mut store = GeneModelStore::new();

    for gene_id in &gene_order {
        let accum = &genes[gene_id];
        let name = accum.name.clone().ok_or_else(|| GeneModelsError::ParseError {
            line: 0,
            message: format!("gene {gene_id}: missing required attribute: gene_name"),
        })?;
        let source = accum
            .source
            .clone()
            .ok_or_else(|| GeneModelsError::ParseError {
                line: 0,
                message: format!(
                    "gene {gene_id}: missing required attribute: gene_biotype (or source)"
                ),
            })?;
        store.add_gene(GeneRecord {
            id: gene_id.clone(),
            name,
            source,
            chromosome: accum.chromosome.clone().unwrap_or_default(),
            strand: accum.strand.unwrap_or(Strand::Plus),
        })?;
    }

    for tx_id in &tx_order {
        let accum = transcripts.remove(tx_id).expect("populated above");
        let exons: Vec<Exon> = accum
            .exons
            .iter()
            .map(|&(s, e)| Exon::new(s, e))
            .collect();
        let (start, end) = match (accum.start, accum.end) {
            (Some(s), Some(e)) => (s, e),
            _ => {
                let s = exons.iter().map(|e| e.start).min().unwrap_or(0);
                let e = exons.iter().map(|e| e.end).max().unwrap_or(0);
                (s, e)
            }
        };
        store.add_transcript(
            TranscriptRecord {
                id: tx_id.clone(),
                gene_id: accum.gene_id,
                chromosome: accum.chromosome,
                strand: accum.strand,
                start,
                end,
                cds: accum.cds,
            },
            exons,
        )?;
    }

    store.finalize()?;
    Ok(store)
}

/// Convenience wrapper around [`load_annotations`] that opens `path`,
/// transparently decompressing `.gz` input the way
/// `gtars_core::utils::get_dynamic_reader` dispatches on file extension.
pub fn load_annotations_path(path: impl AsRef<Path>) -> Result<GeneModelStore, GeneModelsError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let is_gzipped = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    if is_gzipped {
        load_annotations(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        load_annotations(BufReader::new(file))
    }
}
