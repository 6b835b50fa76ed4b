use super::{Exon, Strand};

/// An RNA product of a gene: an ordered, non-overlapping set of exons with an
/// optional coding region.
///
/// Exons are sorted ascending by `start`. `cds` is `None` for non-coding
/// transcripts. When present, `cds.0 <= cds.1` and `[cds.0, cds.1]` intersects
/// at least one exon (enforced by `GeneModelStore::finalize()`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transcript {
    pub id: String,
    pub gene_id: String,
    pub chromosome: String,
    pub strand: Strand,
    pub start: i64,
    pub end: i64,
    pub cds: Option<(i64, i64)>,
    pub exons: Vec<Exon>,
}

impl Transcript {
    pub fn is_coding(&self) -> bool {
        self.cds.is_some()
    }

    /// Total exonic (spliced) length in base pairs.
    pub fn exonic_length(&self) -> i64 {
        self.exons.iter().map(Exon::len).sum()
    }
}
