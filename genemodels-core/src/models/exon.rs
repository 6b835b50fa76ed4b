/// A single exon span, closed and inclusive. Exons carry no identity of
/// their own; they are addressed by position within a transcript's ordered
/// exon list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exon {
    pub start: i64,
    pub end: i64,
}

impl Exon {
    pub fn new(start: i64, end: i64) -> Self {
        Exon { start, end }
    }

    #[inline]
    pub fn len(&self) -> i64 {
        self.end - self.start + 1
    }

    #[inline]
    pub fn contains(&self, position: i64) -> bool {
        position >= self.start && position <= self.end
    }
}
