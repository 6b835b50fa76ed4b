//! Shared data model for `genemodels`: genes, transcripts, exons, and the
//! concrete interval type the tree and the store are built on.

pub mod errors;
pub mod models;

pub use errors::GeneModelsError;
pub use models::{Exon, Gene, Interval, Strand, Transcript};
