pub type FileId = u64;

/// A byte range in one source buffer, with the 1-based line and column of
/// its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub file: FileId,
    pub lo: u32,
    pub hi: u32,
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Span {
    pub fn new(file: FileId, lo: u32, hi: u32, line: u32, column: u32) -> Span {
        Span {
            file,
            lo,
            hi,
            line,
            column,
        }
    }

    /// Zero-width span at the start of `file`.
    pub fn start_of(file: FileId) -> Span {
        Span::new(file, 0, 0, 1, 1)
    }

    /// Union of both spans. Line and column follow whichever span starts first.
    pub fn merge(&self, other: &Span) -> Span {
        let (first, _) = if other.lo < self.lo {
            (other, self)
        } else {
            (self, other)
        };
        Span {
            file: self.file,
            lo: self.lo.min(other.lo),
            hi: self.hi.max(other.hi),
            line: first.line,
            column: first.column,
        }
    }

    pub fn len(&self) -> usize {
        (self.hi - self.lo) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.hi == self.lo
    }
}
