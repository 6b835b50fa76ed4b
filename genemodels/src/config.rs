/// Build-time configuration for [`crate::GeneModels`].
///
/// Currently holds the promoter window size used by
/// [`crate::coordinate::calculate_gene_location`] (see DESIGN.md for why
/// this is a configuration value rather than a hardcoded constant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GeneModelsConfig {
    /// Upstream/downstream flank, in base pairs, used to classify a position
    /// as `upstream`/`downstream` rather than `intergenic`.
    pub promoter_bp: i64,
}

/// Default promoter window, in base pairs.
pub const DEFAULT_PROMOTER_BP: i64 = 2000;

impl Default for GeneModelsConfig {
    fn default() -> Self {
        GeneModelsConfig {
            promoter_bp: DEFAULT_PROMOTER_BP,
        }
    }
}
