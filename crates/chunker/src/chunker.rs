use crate::config::ChunkerConfig;
use crate::error::{ChunkerError, Result};
use crate::language::Language;
use crate::scanner::ScanState;
use crate::types::{BoundaryKind, Chunk};
use std::path::Path;

/// Splits file content into ordered, boundary-safe chunks.
///
/// Content at or under the configured threshold comes back as a single
/// whole-file chunk. Larger content is scanned line by line; a chunk closes
/// at the first safe seam once its accumulated size reaches the threshold.
/// Concatenating the returned chunks in index order always reproduces the
/// input exactly.
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    /// Create a new chunker with configuration
    #[must_use]
    pub fn new(config: ChunkerConfig) -> Self {
        config
            .validate()
            .expect("Invalid chunker configuration provided");
        Self { config }
    }

    /// Chunk a file on disk, detecting the language from its path
    pub fn chunk_file(&self, path: impl AsRef<Path>) -> Result<Vec<Chunk>> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        self.chunk_str(&content, Language::from_path(path))
    }

    /// Chunk content, detecting the language from a file path
    pub fn chunk_path_content(&self, path: impl AsRef<Path>, content: &str) -> Result<Vec<Chunk>> {
        self.chunk_str(content, Language::from_path(path))
    }

    /// Chunk content with an explicit language
    pub fn chunk_str(&self, content: &str, language: Language) -> Result<Vec<Chunk>> {
        if content.is_empty() {
            return Err(ChunkerError::EmptyContent);
        }

        let threshold = self.config.chunk_size_threshold;
        if content.len() <= threshold {
            let end_line = count_lines(content);
            return Ok(vec![Chunk::new(
                0,
                1,
                end_line,
                content.to_string(),
                BoundaryKind::WholeFile,
            )]);
        }

        let overrun_limit = threshold.saturating_mul(self.config.max_overrun_factor);
        let mut state = ScanState::new(language);
        let mut chunks: Vec<Chunk> = Vec::new();
        let mut buf = String::new();
        let mut chunk_start_line = 1;
        let mut line_no = 0;

        for raw in content.split_inclusive('\n') {
            line_no += 1;
            buf.push_str(raw);
            state.advance(raw);

            if buf.len() < threshold {
                continue;
            }

            let mut boundary = if state.at_safe_depth() {
                seam_kind(raw, language)
            } else {
                None
            };

            // Degenerate input: no seam for a long stretch. Take a
            // less-safe split rather than growing without bound, as long
            // as it cannot land inside a string or comment.
            if boundary.is_none() && buf.len() >= overrun_limit && state.outside_literals() {
                boundary = Some(BoundaryKind::Forced);
            }

            if let Some(boundary) = boundary {
                if !boundary.is_safe() {
                    log::debug!(
                        "forced split at line {line_no} after {} bytes without a safe seam",
                        buf.len()
                    );
                }
                chunks.push(Chunk::new(
                    chunks.len(),
                    chunk_start_line,
                    line_no,
                    std::mem::take(&mut buf),
                    boundary,
                ));
                chunk_start_line = line_no + 1;
            }
        }

        if !buf.is_empty() {
            chunks.push(Chunk::new(
                chunks.len(),
                chunk_start_line,
                line_no,
                buf,
                BoundaryKind::RemainingTail,
            ));
        }

        debug_assert_eq!(
            chunks.iter().map(|c| c.content.as_str()).collect::<String>(),
            content,
            "chunk concatenation must reproduce the input"
        );

        Ok(chunks)
    }

    /// Whether a file of `size_bytes` should take the chunked path at all
    #[must_use]
    pub const fn is_large(&self, size_bytes: u64) -> bool {
        size_bytes > self.config.large_file_threshold as u64
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(ChunkerConfig::default())
    }
}

/// Number of lines in content, counting a trailing unterminated line
fn count_lines(content: &str) -> usize {
    content.split_inclusive('\n').count().max(1)
}

/// Classify a line as a safe seam, if it is one.
///
/// A seam is a blank line, a full-line comment, a lone closing brace
/// (trailing `)`/`;`/`,` tolerated), or an import/export statement.
fn seam_kind(line: &str, language: Language) -> Option<BoundaryKind> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return Some(BoundaryKind::BlankLine);
    }

    if language
        .line_comment_prefixes()
        .iter()
        .any(|p| trimmed.starts_with(p))
    {
        return Some(BoundaryKind::CommentLine);
    }

    if trimmed.starts_with('}')
        && trimmed
            .chars()
            .all(|c| matches!(c, '}' | ')' | ']' | ';' | ','))
    {
        return Some(BoundaryKind::ClosingBrace);
    }

    if language
        .import_prefixes()
        .iter()
        .any(|p| trimmed.starts_with(p))
    {
        return Some(BoundaryKind::ImportExport);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reassemble(chunks: &[Chunk]) -> String {
        chunks.iter().map(|c| c.content.as_str()).collect()
    }

    #[test]
    fn small_content_is_one_whole_file_chunk() {
        let chunker = Chunker::default();
        let content = "const a = 1;\nfunction f(){}\n";

        let chunks = chunker.chunk_str(content, Language::JavaScript).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].boundary, BoundaryKind::WholeFile);
        assert_eq!(chunks[0].start_line, 1);
        assert_eq!(chunks[0].end_line, 2);
        assert_eq!(chunks[0].content, content);
    }

    #[test]
    fn empty_content_is_an_error() {
        let chunker = Chunker::default();
        assert!(chunker.chunk_str("", Language::JavaScript).is_err());
    }

    #[test]
    fn large_file_threshold_gates_the_chunked_path() {
        let chunker = Chunker::default();
        assert!(!chunker.is_large(50_000));
        assert!(chunker.is_large(50_001));
    }

    #[test]
    fn chunks_are_ordered_and_gap_free() {
        let chunker = Chunker::new(ChunkerConfig::default().with_chunk_threshold(200));
        let mut content = String::new();
        for i in 0..50 {
            content.push_str(&format!("function f{i}() {{\n  return {i};\n}}\n\n"));
        }

        let chunks = chunker.chunk_str(&content, Language::JavaScript).unwrap();

        assert!(chunks.len() > 1);
        assert_eq!(reassemble(&chunks), content);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            if i > 0 {
                assert_eq!(chunk.start_line, chunks[i - 1].end_line + 1);
            }
        }
        assert_eq!(chunks[0].start_line, 1);
    }

    #[test]
    fn split_lands_on_safe_seams() {
        let chunker = Chunker::new(ChunkerConfig::default().with_chunk_threshold(150));
        let mut content = String::new();
        for i in 0..30 {
            content.push_str(&format!("function f{i}() {{\n  return {i};\n}}\n"));
        }

        let chunks = chunker.chunk_str(&content, Language::JavaScript).unwrap();

        for chunk in &chunks[..chunks.len() - 1] {
            assert!(
                chunk.boundary.is_safe(),
                "unexpected forced boundary: {:?}",
                chunk.boundary
            );
        }
    }

    #[test]
    fn no_split_inside_multiline_string() {
        let chunker = Chunker::new(ChunkerConfig::default().with_chunk_threshold(100));
        let mut content = String::from("const pad = 1;\n\n");
        content.push_str("const s = `\n");
        for _ in 0..20 {
            content.push_str("{ not real code }\n");
        }
        content.push_str("`;\n\nconst after = 2;\n");

        let chunks = chunker.chunk_str(&content, Language::JavaScript).unwrap();

        assert_eq!(reassemble(&chunks), content);
        // Every boundary must fall on or after the line that closes the
        // template literal.
        let close_line = content
            .split_inclusive('\n')
            .position(|l| l.starts_with('`'))
            .unwrap()
            + 1;
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(
                chunk.end_line >= close_line,
                "boundary at line {} is inside the literal (closes at {})",
                chunk.end_line,
                close_line
            );
        }
    }

    #[test]
    fn no_split_inside_block_comment() {
        let chunker = Chunker::new(ChunkerConfig::default().with_chunk_threshold(100));
        let mut content = String::from("let x = 0;\n\n/*\n");
        for _ in 0..20 {
            content.push_str(" long explanation line that pads the comment out\n");
        }
        content.push_str("*/\n\nlet y = 1;\n");

        let chunks = chunker.chunk_str(&content, Language::JavaScript).unwrap();

        assert_eq!(reassemble(&chunks), content);
        let close_line = content
            .split_inclusive('\n')
            .position(|l| l.starts_with("*/"))
            .unwrap()
            + 1;
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(chunk.end_line >= close_line);
        }
    }

    #[test]
    fn pathological_input_still_terminates_with_forced_split() {
        let chunker = Chunker::new(ChunkerConfig {
            chunk_size_threshold: 100,
            large_file_threshold: 100,
            max_overrun_factor: 2,
        });
        // One giant object literal: depth never returns to zero.
        let mut content = String::from("const blob = {\n");
        for i in 0..200 {
            content.push_str(&format!("  key{i}: [{i}],\n"));
        }
        content.push_str("};\n");

        let chunks = chunker.chunk_str(&content, Language::JavaScript).unwrap();

        assert!(chunks.len() > 1, "expected forced splits to fire");
        assert_eq!(reassemble(&chunks), content);
        assert!(chunks
            .iter()
            .any(|c| c.boundary == BoundaryKind::Forced));
    }

    #[test]
    fn last_chunk_is_remaining_tail() {
        let chunker = Chunker::new(ChunkerConfig::default().with_chunk_threshold(200));
        let mut content = String::new();
        for i in 0..40 {
            content.push_str(&format!("const v{i} = {i};\n\n"));
        }
        // Guarantees a short remainder past the last possible seam.
        content.push_str("const leftover = 99;\n");

        let chunks = chunker.chunk_str(&content, Language::JavaScript).unwrap();

        assert_eq!(
            chunks.last().unwrap().boundary,
            BoundaryKind::RemainingTail
        );
    }

    #[test]
    fn file_without_trailing_newline_round_trips() {
        let chunker = Chunker::new(ChunkerConfig::default().with_chunk_threshold(50));
        let content = "const a = 1;\n\nconst b = 2;\n\nconst c = 3;\n\nconst tail = 4;";

        let chunks = chunker.chunk_str(content, Language::JavaScript).unwrap();

        assert_eq!(reassemble(&chunks), content);
        assert_eq!(chunks.last().unwrap().end_line, 7);
    }

    #[test]
    fn seam_kinds() {
        assert_eq!(
            seam_kind("   \n", Language::JavaScript),
            Some(BoundaryKind::BlankLine)
        );
        assert_eq!(
            seam_kind("// note\n", Language::JavaScript),
            Some(BoundaryKind::CommentLine)
        );
        assert_eq!(
            seam_kind("}\n", Language::JavaScript),
            Some(BoundaryKind::ClosingBrace)
        );
        assert_eq!(
            seam_kind("});\n", Language::JavaScript),
            Some(BoundaryKind::ClosingBrace)
        );
        assert_eq!(
            seam_kind("import { a } from './a';\n", Language::JavaScript),
            Some(BoundaryKind::ImportExport)
        );
        assert_eq!(
            seam_kind("use std::fmt;\n", Language::Rust),
            Some(BoundaryKind::ImportExport)
        );
        assert_eq!(seam_kind("const a = 1;\n", Language::JavaScript), None);
        assert_eq!(seam_kind("} else {\n", Language::JavaScript), None);
    }
}
