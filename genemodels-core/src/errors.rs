use thiserror::Error;

/// Errors surfaced by the interval tree, the store, the loader, and the
/// coordinate model. None of these are retried by the library; callers decide.
#[derive(Error, Debug)]
pub enum GeneModelsError {
    #[error("invalid interval (id={id}): start {start} > end {end}")]
    InvalidInterval { id: u32, start: i64, end: i64 },

    #[error("duplicate id during load: {0}")]
    DuplicateId(String),

    #[error("transcript {transcript_id} refers to unknown gene {gene_id}")]
    UnknownParent {
        transcript_id: String,
        gene_id: String,
    },

    #[error("gene {gene_id} has inconsistent {field} across its records")]
    InconsistentGene { gene_id: String, field: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("transcript {transcript_id} offset {offset} exceeds exonic length {length}")]
    OutOfRange {
        transcript_id: String,
        offset: i64,
        length: i64,
    },

    #[error("snapshot format mismatch: expected version {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Bincode(#[from] bincode::Error),
}
