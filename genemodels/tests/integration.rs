//! End-to-end tests against a small fixture annotation file, exercising the
//! full path from `GeneModels::load_annotations` through spatial queries,
//! coordinate classification, and transcript coordinate mapping.
//!
//! Mirrors `databio-gtars/gtars/tests/test.rs`'s role as the
//! workspace-facade integration suite, one level down: here it's a single
//! crate's public API rather than a workspace of crates.

use std::collections::HashSet;
use std::path::PathBuf;

use genemodels::{GeneModels, LocationTag};
use pretty_assertions::assert_eq;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/sample.gtf")
}

#[test]
fn loads_and_answers_gene_lookups() {
    let db = GeneModels::load_annotations(fixture_path()).unwrap();

    let gene = db.get_gene("GENE1").unwrap();
    assert_eq!(gene.name, "Gene1");
    assert_eq!(gene.source, "protein_coding");
    assert_eq!(gene.chromosome, "1");
    assert_eq!((gene.start, gene.end), (1000, 2000));

    assert_eq!(db.get_transcript_gene("TX1").unwrap(), "GENE1");
    assert_eq!(db.get_transcript_gene("TX4").unwrap(), "GENE4");
}

#[test]
fn spatial_queries_over_a_window() {
    let db = GeneModels::load_annotations(fixture_path()).unwrap();

    let overlapping: HashSet<String> = db
        .find_overlapping_genes("1", 2000, 3000)
        .into_iter()
        .collect();
    assert_eq!(
        overlapping,
        HashSet::from(["GENE1".to_string(), "GENE2".to_string()])
    );

    let contained: HashSet<String> = db
        .find_contained_genes("1", 2000, 3000)
        .into_iter()
        .collect();
    assert_eq!(contained, HashSet::from(["GENE2".to_string()]));

    let nearest: HashSet<String> = db.find_nearest_genes("1", 4000).into_iter().collect();
    assert_eq!(
        nearest,
        HashSet::from(["GENE2".to_string(), "GENE3".to_string()])
    );

    assert!(db.find_overlapping_genes("chrZ", 0, 100).is_empty());
}

#[test]
fn classifies_positions_against_gene_models() {
    let db = GeneModels::load_annotations(fixture_path()).unwrap();

    assert_eq!(
        db.calculate_gene_location("GENE1", 1100).unwrap(),
        LocationTag::Utr5p
    );
    assert_eq!(
        db.calculate_gene_location("GENE1", 1300).unwrap(),
        LocationTag::Coding
    );
    assert_eq!(
        db.calculate_gene_location("GENE1", 1500).unwrap(),
        LocationTag::Intron
    );
    assert_eq!(
        db.calculate_gene_location("GENE1", 1900).unwrap(),
        LocationTag::Utr3p
    );
    assert_eq!(
        db.calculate_gene_location("GENE1", -1000).unwrap(),
        LocationTag::Upstream
    );
    assert_eq!(
        db.calculate_gene_location("GENE1", -1001).unwrap(),
        LocationTag::Intergenic
    );
    assert_eq!(
        db.calculate_gene_location("GENE1", 4000).unwrap(),
        LocationTag::Downstream
    );
    assert_eq!(
        db.calculate_gene_location("GENE2", 2600).unwrap(),
        LocationTag::Utr
    );
}

#[test]
fn maps_transcript_offsets_on_minus_strand() {
    let db = GeneModels::load_annotations(fixture_path()).unwrap();

    // TX3 is on `-`; transcription order visits (5800,6000) before (5000,5200).
    assert_eq!(db.calculate_genomic_position("TX3", 1).unwrap(), 6000);
    assert_eq!(db.calculate_genomic_position("TX3", 201).unwrap(), 5800);
    assert_eq!(db.calculate_genomic_position("TX3", 202).unwrap(), 5200);
    assert_eq!(db.calculate_genomic_position("TX3", 402).unwrap(), 5000);

    let regions = db.calculate_genomic_regions("TX3", 1, 402).unwrap();
    assert_eq!(regions, vec![(5000, 5200), (5800, 6000)]);

    let single = db.calculate_genomic_regions("TX3", 150, 150).unwrap();
    assert_eq!(single, vec![(5851, 5851)]);

    let err = db.calculate_genomic_position("TX3", 403).unwrap_err();
    assert!(matches!(err, genemodels::GeneModelsError::OutOfRange { .. }));
}

#[test]
fn saves_and_reloads_a_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.bin");

    let original = GeneModels::load_annotations(fixture_path()).unwrap();
    original.save(&path).unwrap();

    let restored = GeneModels::load(&path).unwrap();
    assert_eq!(restored.get_gene("GENE1").unwrap(), original.get_gene("GENE1").unwrap());
    assert_eq!(
        restored.find_overlapping_genes("1", 2000, 3000).into_iter().collect::<HashSet<_>>(),
        original.find_overlapping_genes("1", 2000, 3000).into_iter().collect::<HashSet<_>>(),
    );
}
