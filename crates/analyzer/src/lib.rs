//! # Atlas Analyzer
//!
//! Project-wide source analysis: walk, classify, chunk, extract, merge.
//!
//! ## Pipeline
//!
//! ```text
//! Project Root
//!     │
//!     ├──> Tree Walker (exclusions, depth bound)
//!     │      └─> FileRecord[]
//!     │
//!     ├──> Classifier (path heuristics → roles)
//!     │
//!     ├──> Adaptive Controller (project scale → effective settings)
//!     │
//!     ├──> Batched per-file analysis (fan-out/fan-in, timeout, cache)
//!     │      ├─> large files: boundary-safe chunks → extract → merge
//!     │      └─> small files: direct extract
//!     │
//!     └──> ProjectAnalysis (modules + metrics + stats)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use atlas_analyzer::{AnalyzerConfig, ProjectAnalyzer};
//!
//! #[tokio::main]
//! async fn main() -> atlas_analyzer::Result<()> {
//!     let mut analyzer = ProjectAnalyzer::new(".", AnalyzerConfig::default())?;
//!     let analysis = analyzer.analyze().await?;
//!
//!     for module in &analysis.modules {
//!         println!(
//!             "{}: {} functions, complexity {}",
//!             module.file.relative_path, module.total_functions, module.complexity
//!         );
//!     }
//!     Ok(())
//! }
//! ```

mod adaptive;
mod analyzer;
mod cache;
mod classifier;
mod config;
mod error;
mod merger;
mod stats;
mod walker;

pub use adaptive::{tune, EffectiveConfig, ProjectMetrics};
pub use analyzer::{ComplexityDistribution, ProjectAnalysis, ProjectAnalyzer};
pub use cache::AnalysisSession;
pub use classifier::{Classifier, FileRole};
pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, Result};
pub use merger::{
    merge, single_chunk, AnalysisStrategy, CrossChunkInsights, CrossChunkLink, ModuleAnalysis,
};
pub use stats::AnalysisStats;
pub use walker::{FileRecord, TreeWalker, WalkOptions};
