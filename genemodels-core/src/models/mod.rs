mod exon;
mod gene;
mod interval;
mod strand;
mod transcript;

pub use exon::Exon;
pub use gene::Gene;
pub use interval::Interval;
pub use strand::Strand;
pub use transcript::Transcript;
