use crate::adaptive::{self, EffectiveConfig, ProjectMetrics};
use crate::cache::AnalysisSession;
use crate::classifier::Classifier;
use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};
use crate::merger::{merge, single_chunk, ModuleAnalysis};
use crate::stats::AnalysisStats;
use crate::walker::{FileRecord, TreeWalker, WalkOptions};
use atlas_chunker::{Chunker, ChunkerConfig, Language};
use atlas_extractor::{extract_chunk, AnalysisIssue, ChunkAnalysis, ExtractOptions};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Modules bucketed by merged complexity
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComplexityDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

const MEDIUM_COMPLEXITY: u32 = 10;
const HIGH_COMPLEXITY: u32 = 30;

impl ComplexityDistribution {
    fn add(&mut self, complexity: u32) {
        if complexity >= HIGH_COMPLEXITY {
            self.high += 1;
        } else if complexity >= MEDIUM_COMPLEXITY {
            self.medium += 1;
        } else {
            self.low += 1;
        }
    }
}

/// Aggregate result of one analysis run.
///
/// Read-only once built; serialized as-is for downstream consumers
/// (document generators, route layers, workflow steps).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectAnalysis {
    /// Analyzed root, as given
    pub root: String,

    /// Per-file merged analyses
    pub modules: Vec<ModuleAnalysis>,

    /// Aggregate metrics the adaptive controller saw
    pub metrics: ProjectMetrics,

    /// Settings the run actually used
    pub effective: EffectiveConfig,

    /// Modules bucketed by complexity
    pub complexity: ComplexityDistribution,

    /// Dominant language of the project
    pub primary_language: String,

    /// Relative paths of the top architecture-relevant files
    pub architecture_files: Vec<String>,

    /// Run statistics, including skipped/failed counts
    pub stats: AnalysisStats,
}

/// Orchestrates the full pipeline: walk → classify → tune → batched
/// chunk/extract/merge, with a session cache spanning runs.
///
/// ```no_run
/// use atlas_analyzer::{AnalyzerConfig, ProjectAnalyzer};
///
/// #[tokio::main]
/// async fn main() -> atlas_analyzer::Result<()> {
///     let mut analyzer = ProjectAnalyzer::new("/path/to/project", AnalyzerConfig::default())?;
///     let analysis = analyzer.analyze().await?;
///
///     println!("{} modules, {} skipped", analysis.modules.len(), analysis.stats.skipped);
///     Ok(())
/// }
/// ```
pub struct ProjectAnalyzer {
    root: PathBuf,
    config: AnalyzerConfig,
    classifier: Classifier,
    session: AnalysisSession,
    cancel: CancellationToken,
}

impl ProjectAnalyzer {
    /// Create an analyzer for a project root.
    ///
    /// A root that does not exist or is not a directory is a hard error:
    /// the one failure mode that aborts a run instead of degrading it.
    pub fn new(root: impl AsRef<Path>, config: AnalyzerConfig) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        if !root.is_dir() {
            return Err(AnalyzerError::InvalidPath(format!(
                "not a directory: {}",
                root.display()
            )));
        }
        config.validate()?;

        Ok(Self {
            root,
            config,
            classifier: Classifier::new(),
            session: AnalysisSession::new(),
            cancel: CancellationToken::new(),
        })
    }

    /// Token observed between batches; cancel it to stop the run early
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cache hits observed by the session so far
    #[must_use]
    pub fn session_hits(&self) -> u64 {
        self.session.hits()
    }

    /// Explicit session teardown; the next run starts cold
    pub fn clear_session(&mut self) {
        self.session.clear();
    }

    /// Run the full pipeline.
    ///
    /// Errors local to one file become stats entries and issues; only a
    /// bad root or cancellation fails the whole run.
    pub async fn analyze(&mut self) -> Result<ProjectAnalysis> {
        let start = Instant::now();
        let mut stats = AnalysisStats::new();

        if self.cancel.is_cancelled() {
            return Err(AnalyzerError::Cancelled);
        }

        let walk_options = WalkOptions {
            exclude: self.config.exclude.clone(),
            max_depth: self.config.max_depth,
        };
        let walker = TreeWalker::new(&self.root, &walk_options)?;
        let mut records = walker.walk();
        self.classifier.classify_all(&mut records);

        let metrics = sample_metrics(&records).await;
        let effective = self.effective_config(&metrics);
        log::info!(
            "Analyzing {} files (chunk threshold {}, deep ceiling {})",
            records.len(),
            effective.chunk_size_threshold,
            effective.max_deep_files
        );

        // Entries for files deleted since the previous run go now; the
        // rest of the cache stays warm.
        let live: HashSet<PathBuf> = records.iter().map(|r| r.path.clone()).collect();
        let purged = self.session.retain_paths(&live);
        if purged > 0 {
            log::debug!("Purged {purged} cache entries for removed files");
        }

        // Most architecture-relevant files first, so the deep-analysis
        // ceiling spends its budget on what matters.
        records.sort_by(|a, b| {
            a.role
                .priority()
                .cmp(&b.role.priority())
                .then_with(|| b.size_bytes.cmp(&a.size_bytes))
                .then_with(|| a.relative_path.cmp(&b.relative_path))
        });

        let chunker_config = ChunkerConfig {
            chunk_size_threshold: effective.chunk_size_threshold,
            large_file_threshold: effective.large_file_threshold,
            ..ChunkerConfig::default()
        };
        let extract_options = ExtractOptions {
            quality: effective.quality_passes,
        };

        let mut modules: Vec<ModuleAnalysis> = Vec::with_capacity(records.len());
        let timeout = Duration::from_millis(self.config.file_timeout_ms);
        let batch_delay = Duration::from_millis(self.config.batch_delay_ms);
        let total_batches = records.len().div_ceil(self.config.batch_size);

        for (batch_no, batch) in records.chunks(self.config.batch_size).enumerate() {
            if self.cancel.is_cancelled() {
                log::warn!("Analysis cancelled after {batch_no} batches");
                return Err(AnalyzerError::Cancelled);
            }

            // Fan out: every task in the batch is issued before any is
            // awaited.
            let mut pending = Vec::with_capacity(batch.len());
            for (offset, record) in batch.iter().enumerate() {
                if record.size_bytes == 0 {
                    stats.add_skipped(format!("{}: empty file", record.relative_path));
                    continue;
                }
                if record.size_bytes > self.config.max_file_size_bytes {
                    stats.add_skipped(format!(
                        "{}: {} bytes exceeds the size cap",
                        record.relative_path, record.size_bytes
                    ));
                    continue;
                }

                if let Some(hit) = self.session.get(&record.path, record.size_bytes) {
                    stats.add_cache_hit();
                    modules.push((*hit).clone());
                    continue;
                }

                let rank = batch_no * self.config.batch_size + offset;
                let deep = rank < effective.max_deep_files;
                let task_record = record.clone();
                let task_config = chunker_config.clone();
                let handle = tokio::spawn(async move {
                    analyze_file(task_record, task_config, extract_options, deep).await
                });
                pending.push((record.clone(), handle));
            }

            // Fan in, with a per-file deadline.
            for (record, mut handle) in pending {
                match tokio::time::timeout(timeout, &mut handle).await {
                    Ok(Ok(Ok(outcome))) => {
                        self.session
                            .put(&record.path, record.size_bytes, outcome.module.clone());
                        stats.add_file(outcome.language.as_str(), outcome.lines);
                        stats.add_chunks(outcome.chunk_count);
                        modules.push(outcome.module);
                    }
                    Ok(Ok(Err(message))) => {
                        log::warn!("Failed to analyze {}: {message}", record.relative_path);
                        stats.add_failed(message);
                    }
                    Ok(Err(join_error)) => {
                        log::warn!("Analysis task for {} died: {join_error}", record.relative_path);
                        stats.add_failed(format!("{}: {join_error}", record.relative_path));
                    }
                    Err(_elapsed) => {
                        handle.abort();
                        log::warn!(
                            "Analysis of {} exceeded {}ms; skipped",
                            record.relative_path,
                            self.config.file_timeout_ms
                        );
                        stats.add_failed(format!(
                            "{}: timed out after {}ms",
                            record.relative_path, self.config.file_timeout_ms
                        ));
                    }
                }
            }

            // Cooperative pause: keeps a paced downstream consumer from
            // being flooded between batches.
            if batch_no + 1 < total_batches && !batch_delay.is_zero() {
                tokio::time::sleep(batch_delay).await;
            }
        }

        let mut complexity = ComplexityDistribution::default();
        for module in &modules {
            complexity.add(module.complexity);
        }

        let architecture_files = self
            .classifier
            .architecture_relevant(&records, self.config.top_architecture_files)
            .into_iter()
            .map(|r| r.relative_path.clone())
            .collect();

        let primary_language = primary_language_of(&metrics);

        #[allow(clippy::cast_possible_truncation)]
        {
            stats.time_ms = (start.elapsed().as_millis() as u64).max(1);
        }
        log::info!(
            "Analysis complete: {} modules, {} skipped, {} failed in {}ms",
            modules.len(),
            stats.skipped,
            stats.failed,
            stats.time_ms
        );

        Ok(ProjectAnalysis {
            root: self.root.display().to_string(),
            modules,
            metrics,
            effective,
            complexity,
            primary_language,
            architecture_files,
            stats,
        })
    }

    /// Adaptive settings with user overrides applied on top
    fn effective_config(&self, metrics: &ProjectMetrics) -> EffectiveConfig {
        let mut effective = adaptive::tune(metrics);

        if let Some(chunk) = self.config.chunk_size_threshold {
            effective.chunk_size_threshold = chunk;
        }
        if let Some(large) = self.config.large_file_threshold {
            effective.large_file_threshold = large;
        }
        if effective.large_file_threshold < effective.chunk_size_threshold {
            effective.large_file_threshold = effective.chunk_size_threshold;
        }

        effective
    }
}

struct FileOutcome {
    module: ModuleAnalysis,
    language: Language,
    lines: usize,
    chunk_count: usize,
}

/// Analyze one file end to end: read, chunk (or not), extract, merge.
///
/// Runs on a spawned task; returns a message rather than an error type so
/// the driver can fold it straight into the stats.
async fn analyze_file(
    record: FileRecord,
    chunker_config: ChunkerConfig,
    options: ExtractOptions,
    deep: bool,
) -> std::result::Result<FileOutcome, String> {
    let bytes = tokio::fs::read(&record.path)
        .await
        .map_err(|e| format!("{}: {e}", record.relative_path))?;
    if bytes.is_empty() {
        return Err(format!("{}: empty file", record.relative_path));
    }

    let content = String::from_utf8_lossy(&bytes);
    let language = record.language();
    let lines = content.lines().count();
    let is_large = content.len() > chunker_config.large_file_threshold;

    let analyses: Vec<ChunkAnalysis> = if is_large && deep {
        let chunker = Chunker::new(chunker_config);
        let chunks = chunker
            .chunk_str(&content, language)
            .map_err(|e| format!("{}: {e}", record.relative_path))?;
        chunks
            .iter()
            .map(|chunk| extract_chunk(chunk, language, options))
            .collect()
    } else if is_large {
        // Past the deep-file ceiling: a bounded head keeps the file in
        // the report without paying for full chunked analysis.
        let head = head_of(&content, chunker_config.chunk_size_threshold);
        let chunk = single_chunk(head);
        let mut analysis = extract_chunk(&chunk, language, options);
        analysis.issues.push(AnalysisIssue::new(
            "scale",
            format!(
                "analysis limited to the first {} of {} bytes by the deep-file ceiling",
                head.len(),
                content.len()
            ),
        ));
        vec![analysis]
    } else {
        let chunk = single_chunk(&content);
        vec![extract_chunk(&chunk, language, options)]
    };

    let chunk_count = analyses.len();
    let module = merge(record, analyses);

    Ok(FileOutcome {
        module,
        language,
        lines,
        chunk_count,
    })
}

/// Longest whole-line prefix within `max_bytes`
fn head_of(content: &str, max_bytes: usize) -> &str {
    if content.len() <= max_bytes {
        return content;
    }

    let mut end = 0;
    for line in content.split_inclusive('\n') {
        if end + line.len() > max_bytes {
            break;
        }
        end += line.len();
    }

    if end == 0 {
        // One enormous line; fall back to the nearest char boundary.
        end = (0..=max_bytes)
            .rev()
            .find(|i| content.is_char_boundary(*i))
            .unwrap_or(0);
    }

    &content[..end]
}

const METRICS_SAMPLE_FILES: usize = 64;

/// Aggregate metrics from the record set, reading a bounded, evenly
/// spread sample of files for the line estimate
async fn sample_metrics(records: &[FileRecord]) -> ProjectMetrics {
    let mut histogram: HashMap<String, usize> = HashMap::new();
    for record in records {
        *histogram.entry(record.extension.clone()).or_insert(0) += 1;
    }

    // Ties break toward the lexicographically smaller extension so the
    // result is stable across runs.
    let dominant_extension = histogram
        .iter()
        .max_by(|(ka, va), (kb, vb)| va.cmp(vb).then_with(|| kb.cmp(ka)))
        .map(|(k, _)| k.clone())
        .unwrap_or_default();

    let step = (records.len() / METRICS_SAMPLE_FILES).max(1);
    let mut sampled_lines = 0usize;
    let mut sampled = 0usize;
    for record in records.iter().step_by(step).take(METRICS_SAMPLE_FILES) {
        if let Ok(bytes) = tokio::fs::read(&record.path).await {
            sampled_lines += String::from_utf8_lossy(&bytes).lines().count();
            sampled += 1;
        }
    }

    let estimated_total_lines = if sampled == 0 {
        0
    } else {
        sampled_lines * records.len() / sampled
    };

    ProjectMetrics {
        total_files: records.len(),
        estimated_total_lines,
        dominant_extension,
        extension_histogram: histogram,
    }
}

/// Language name for the dominant extension; the raw extension when no
/// language maps to it
fn primary_language_of(metrics: &ProjectMetrics) -> String {
    let language = Language::from_extension(&metrics.dominant_extension);
    if language == Language::Unknown {
        metrics.dominant_extension.clone()
    } else {
        language.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complexity_buckets() {
        let mut dist = ComplexityDistribution::default();
        dist.add(1);
        dist.add(9);
        dist.add(10);
        dist.add(29);
        dist.add(30);
        dist.add(120);

        assert_eq!(dist.low, 2);
        assert_eq!(dist.medium, 2);
        assert_eq!(dist.high, 2);
    }

    #[test]
    fn head_of_respects_line_boundaries() {
        let content = "one\ntwo\nthree\n";
        assert_eq!(head_of(content, 9), "one\ntwo\n");
        assert_eq!(head_of(content, 100), content);
    }

    #[test]
    fn head_of_handles_single_huge_line() {
        let content = "x".repeat(100);
        assert_eq!(head_of(&content, 10).len(), 10);
    }

    #[test]
    fn primary_language_falls_back_to_extension() {
        let mut metrics = ProjectMetrics::empty();
        metrics.dominant_extension = "rs".to_string();
        assert_eq!(primary_language_of(&metrics), "rust");

        metrics.dominant_extension = "md".to_string();
        assert_eq!(primary_language_of(&metrics), "md");
    }
}
