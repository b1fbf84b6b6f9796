use serde::{Deserialize, Serialize};

/// A contiguous, boundary-safe slice of one file's content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Position of this chunk within the file (0-based, ascending)
    pub index: usize,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// The exact slice of file content, terminators included
    pub content: String,

    /// Content size in bytes
    pub size_bytes: usize,

    /// Why the chunk ends where it does
    pub boundary: BoundaryKind,
}

impl Chunk {
    /// Create a new chunk
    #[must_use]
    pub fn new(
        index: usize,
        start_line: usize,
        end_line: usize,
        content: String,
        boundary: BoundaryKind,
    ) -> Self {
        let size_bytes = content.len();
        Self {
            index,
            start_line,
            end_line,
            content,
            size_bytes,
            boundary,
        }
    }

    /// Get the number of lines in this chunk
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Check if chunk contains a specific file-absolute line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    /// Translate a chunk-local 1-based line to a file-absolute line
    #[must_use]
    pub const fn absolute_line(&self, local_line: usize) -> usize {
        self.start_line + local_line - 1
    }
}

/// Why a chunk was closed at its end line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryKind {
    /// The file fit under the threshold; one chunk spans it all
    WholeFile,
    /// Split after a blank line
    BlankLine,
    /// Split after a full-line comment
    CommentLine,
    /// Split after a lone closing brace at depth zero
    ClosingBrace,
    /// Split after an import/export statement
    ImportExport,
    /// No safe seam appeared within the overrun budget; split at the
    /// first line outside string/comment context
    Forced,
    /// End of file flushed whatever was still accumulating
    RemainingTail,
}

impl BoundaryKind {
    /// Human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WholeFile => "whole-file",
            Self::BlankLine => "blank-line",
            Self::CommentLine => "comment-line",
            Self::ClosingBrace => "closing-brace",
            Self::ImportExport => "import-export",
            Self::Forced => "forced",
            Self::RemainingTail => "remaining-tail",
        }
    }

    /// True when the boundary satisfied every safety condition
    #[must_use]
    pub const fn is_safe(self) -> bool {
        !matches!(self, Self::Forced)
    }
}
