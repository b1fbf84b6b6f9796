use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Statistics about one analysis run.
///
/// Skipped and failed counts are first-class so partial failure is
/// visible in the final report, never hidden.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisStats {
    /// Files analyzed successfully
    pub files: usize,

    /// Files skipped before analysis (empty, oversized, excluded late)
    pub skipped: usize,

    /// Files whose analysis failed or timed out
    pub failed: usize,

    /// Chunks produced across all files
    pub chunks: usize,

    /// Analyses served from the session cache
    pub cache_hits: usize,

    /// Lines across analyzed files
    pub total_lines: usize,

    /// Wall time of the run in milliseconds
    pub time_ms: u64,

    /// Language name → analyzed file count
    pub languages: HashMap<String, usize>,

    /// Messages for skipped/failed files
    pub errors: Vec<String>,
}

impl AnalysisStats {
    #[must_use]
    pub fn new() -> Self {
        Self {
            files: 0,
            skipped: 0,
            failed: 0,
            chunks: 0,
            cache_hits: 0,
            total_lines: 0,
            time_ms: 0,
            languages: HashMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn add_file(&mut self, language: &str, lines: usize) {
        self.files += 1;
        self.total_lines += lines;
        *self.languages.entry(language.to_string()).or_insert(0) += 1;
    }

    pub fn add_chunks(&mut self, count: usize) {
        self.chunks += count;
    }

    pub fn add_cache_hit(&mut self) {
        self.cache_hits += 1;
        self.files += 1;
    }

    pub fn add_skipped(&mut self, message: String) {
        self.skipped += 1;
        self.errors.push(message);
    }

    pub fn add_failed(&mut self, message: String) {
        self.failed += 1;
        self.errors.push(message);
    }
}

impl Default for AnalysisStats {
    fn default() -> Self {
        Self::new()
    }
}
