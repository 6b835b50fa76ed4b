use super::Strand;

/// A named genomic locus with one or more transcripts.
///
/// `start`/`end` are 1-based, inclusive, and span the union-bounding box of
/// all of this gene's transcripts. They are recomputed by
/// `GeneModelStore::finalize()` and are not meant to be set independently of
/// the transcripts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gene {
    pub id: String,
    pub name: String,
    pub source: String,
    pub chromosome: String,
    pub strand: Strand,
    pub start: i64,
    pub end: i64,
}
