//! An in-memory gene-annotation database with a spatial interval-tree index.
//! [`GeneModels`] ties together the columnar [`store::GeneModelStore`], the
//! per-chromosome [`query::QueryEngine`], and the [`coordinate`]
//! classification/mapping functions behind one language-neutral facade.

pub mod config;
pub mod coordinate;
pub mod interval_tree;
pub mod loader;
pub mod persist;
pub mod query;
pub mod store;

pub use config::GeneModelsConfig;
pub use coordinate::LocationTag;
pub use genemodels_core::{Exon, Gene, GeneModelsError, Interval, Strand, Transcript};
pub use interval_tree::IntervalTree;
pub use query::QueryEngine;
pub use store::GeneModelStore;

use std::path::Path;

/// The database: a finalized store plus the configuration its coordinate
/// queries read from. Construct via [`GeneModels::load_annotations`] or
/// [`GeneModels::load`]; there is no empty/mutable-build constructor exposed
/// here; build a [`GeneModelStore`] directly for that (mirrors
/// `gtars_overlaprs::MultiChromOverlapper::from_region_set` taking ownership
/// of an already-complete input rather than exposing a builder).
pub struct GeneModels {
    store: GeneModelStore,
    config: GeneModelsConfig,
}

impl GeneModels {
    /// Parses GTF-style annotation records from `path` (transparently
    /// gzip-decompressed per extension) into a finalized database using the
    /// default configuration.
    pub fn load_annotations(path: impl AsRef<Path>) -> Result<Self, GeneModelsError> {
        Self::load_annotations_with_config(path, GeneModelsConfig::default())
    }

    pub fn load_annotations_with_config(
        path: impl AsRef<Path>,
        config: GeneModelsConfig,
    ) -> Result<Self, GeneModelsError> {
        let store = loader::load_annotations_path(path)?;
        Ok(GeneModels { store, config })
    }

    /// Restores a database previously written with [`GeneModels::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GeneModelsError> {
        let store = persist::load(path)?;
        Ok(GeneModels {
            store,
            config: GeneModelsConfig::default(),
        })
    }

    /// Writes the columnar tables to `path`; trees are rebuilt on the next
    /// [`GeneModels::load`] rather than persisted.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GeneModelsError> {
        persist::save(&self.store, path)
    }

    pub fn config(&self) -> &GeneModelsConfig {
        &self.config
    }

    pub fn get_gene(&self, id: &str) -> Result<Gene, GeneModelsError> {
        self.store.get_gene(id)
    }

    pub fn get_transcript(&self, id: &str) -> Result<Transcript, GeneModelsError> {
        self.store.get_transcript(id)
    }

    pub fn get_transcript_gene(&self, tx_id: &str) -> Result<String, GeneModelsError> {
        self.store.get_transcript_gene(tx_id)
    }

    fn query(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.store)
    }

    pub fn find_overlapping_genes(&self, chrom: &str, start: i64, end: i64) -> Vec<String> {
        self.query().find_overlapping_genes(chrom, start, end)
    }

    pub fn find_contained_genes(&self, chrom: &str, start: i64, end: i64) -> Vec<String> {
        self.query().find_contained_genes(chrom, start, end)
    }

    pub fn find_nearest_genes(&self, chrom: &str, position: i64) -> Vec<String> {
        self.query().find_nearest_genes(chrom, position)
    }

    pub fn find_overlapping_transcripts(&self, chrom: &str, start: i64, end: i64) -> Vec<String> {
        self.query().find_overlapping_transcripts(chrom, start, end)
    }

    pub fn find_contained_transcripts(&self, chrom: &str, start: i64, end: i64) -> Vec<String> {
        self.query().find_contained_transcripts(chrom, start, end)
    }

    pub fn find_nearest_transcripts(&self, chrom: &str, position: i64) -> Vec<String> {
        self.query().find_nearest_transcripts(chrom, position)
    }

    pub fn calculate_gene_location(
        &self,
        gene_id: &str,
        position: i64,
    ) -> Result<LocationTag, GeneModelsError> {
        coordinate::calculate_gene_location(&self.store, &self.config, gene_id, position)
    }

    pub fn calculate_genomic_position(
        &self,
        tx_id: &str,
        tx_offset: i64,
    ) -> Result<i64, GeneModelsError> {
        coordinate::calculate_genomic_position(&self.store, tx_id, tx_offset)
    }

    pub fn calculate_genomic_regions(
        &self,
        tx_id: &str,
        tx_start: i64,
        tx_end: i64,
    ) -> Result<Vec<(i64, i64)>, GeneModelsError> {
        coordinate::calculate_genomic_regions(&self.store, tx_id, tx_start, tx_end)
    }
}
