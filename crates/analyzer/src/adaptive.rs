use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregate facts about a project, computed before per-file analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectMetrics {
    /// Files found by the walker
    pub total_files: usize,

    /// Line count extrapolated from a bounded sample of files
    pub estimated_total_lines: usize,

    /// Most frequent extension across the record set
    pub dominant_extension: String,

    /// Extension → file count
    pub extension_histogram: HashMap<String, usize>,
}

/// Configuration derived from project scale, consumed by the pipeline.
///
/// Bigger projects get smaller chunks (bounding per-unit latency), a
/// lower deep-analysis ceiling, and quality passes only when the sheer
/// volume warrants them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EffectiveConfig {
    /// Per-chunk size target handed to the chunker
    pub chunk_size_threshold: usize,

    /// File size above which the chunked path is taken
    pub large_file_threshold: usize,

    /// Ceiling on files receiving deep (chunked) analysis; past it, only
    /// architecture-relevant files go deep and the rest are analyzed on
    /// a bounded head
    pub max_deep_files: usize,

    /// Run the quality sub-passes
    pub quality_passes: bool,
}

/// Project size bands for the tuning table
const SMALL_PROJECT_FILES: usize = 200;
const MEDIUM_PROJECT_FILES: usize = 1_000;

/// Line volume past which the quality sub-passes earn their cost
const QUALITY_PASS_LINE_CUTOFF: usize = 20_000;

/// Derive effective settings from aggregate metrics.
///
/// Pure: same metrics, same config, no side effects.
#[must_use]
pub fn tune(metrics: &ProjectMetrics) -> EffectiveConfig {
    let (chunk_size_threshold, large_file_threshold, max_deep_files) =
        if metrics.total_files <= SMALL_PROJECT_FILES {
            (8_000, 50_000, 400)
        } else if metrics.total_files <= MEDIUM_PROJECT_FILES {
            (6_000, 40_000, 250)
        } else {
            (4_000, 30_000, 150)
        };

    EffectiveConfig {
        chunk_size_threshold,
        large_file_threshold,
        max_deep_files,
        quality_passes: metrics.estimated_total_lines >= QUALITY_PASS_LINE_CUTOFF,
    }
}

impl ProjectMetrics {
    /// Metrics for an empty project
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_files: 0,
            estimated_total_lines: 0,
            dominant_extension: String::new(),
            extension_histogram: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(files: usize, lines: usize) -> ProjectMetrics {
        ProjectMetrics {
            total_files: files,
            estimated_total_lines: lines,
            dominant_extension: "js".to_string(),
            extension_histogram: HashMap::new(),
        }
    }

    #[test]
    fn small_projects_get_default_chunks() {
        let config = tune(&metrics(50, 5_000));
        assert_eq!(config.chunk_size_threshold, 8_000);
        assert_eq!(config.large_file_threshold, 50_000);
        assert!(!config.quality_passes);
    }

    #[test]
    fn large_projects_get_smaller_chunks_and_lower_ceiling() {
        let small = tune(&metrics(50, 5_000));
        let medium = tune(&metrics(800, 90_000));
        let large = tune(&metrics(5_000, 900_000));

        assert!(medium.chunk_size_threshold < small.chunk_size_threshold);
        assert!(large.chunk_size_threshold < medium.chunk_size_threshold);
        assert!(large.max_deep_files < small.max_deep_files);
        assert!(medium.quality_passes);
        assert!(large.quality_passes);
    }

    #[test]
    fn tune_is_pure() {
        let m = metrics(321, 40_000);
        assert_eq!(tune(&m), tune(&m));
    }
}
