use crate::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User-facing configuration for an analysis run.
///
/// Everything here has a sensible default; a TOML file or the caller can
/// override any knob. Adaptive tuning fills in whatever is left `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Exclusion globs applied during the walk, on top of the built-in
    /// scope list
    pub exclude: Vec<String>,

    /// Hard recursion bound for the walk
    pub max_depth: usize,

    /// Files analyzed concurrently per batch
    pub batch_size: usize,

    /// Cooperative pause between batches, in milliseconds. Deliberate
    /// backpressure for downstream consumers that pace on wall-clock
    /// throughput, not a performance knob.
    pub batch_delay_ms: u64,

    /// Per-file deadline; a file past it is recorded as failed and the
    /// run continues
    pub file_timeout_ms: u64,

    /// Files above this size are skipped outright
    pub max_file_size_bytes: u64,

    /// Bound on the architecture-relevant summary list
    pub top_architecture_files: usize,

    /// Override the adaptive chunk size threshold
    pub chunk_size_threshold: Option<usize>,

    /// Override the adaptive large-file threshold
    pub large_file_threshold: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            max_depth: 32,
            batch_size: 5,
            batch_delay_ms: 25,
            file_timeout_ms: 10_000,
            max_file_size_bytes: 4 * 1024 * 1024,
            top_architecture_files: 15,
            chunk_size_threshold: None,
            large_file_threshold: None,
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| AnalyzerError::InvalidConfig(format!("parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(AnalyzerError::InvalidConfig(
                "batch_size must be > 0".to_string(),
            ));
        }

        if self.max_depth == 0 {
            return Err(AnalyzerError::InvalidConfig(
                "max_depth must be > 0".to_string(),
            ));
        }

        if self.file_timeout_ms == 0 {
            return Err(AnalyzerError::InvalidConfig(
                "file_timeout_ms must be > 0".to_string(),
            ));
        }

        if self.chunk_size_threshold == Some(0) {
            return Err(AnalyzerError::InvalidConfig(
                "chunk_size_threshold must be > 0".to_string(),
            ));
        }

        if let (Some(chunk), Some(large)) = (self.chunk_size_threshold, self.large_file_threshold) {
            if large < chunk {
                return Err(AnalyzerError::InvalidConfig(format!(
                    "large_file_threshold ({large}) cannot be below chunk_size_threshold ({chunk})"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn default_config_is_valid() {
        assert!(AnalyzerConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let config = AnalyzerConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let config = AnalyzerConfig {
            chunk_size_threshold: Some(8_000),
            large_file_threshold: Some(1_000),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_chunk_threshold_is_rejected() {
        let config = AnalyzerConfig {
            chunk_size_threshold: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_partial_toml() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("atlas.toml");
        fs::write(
            &path,
            "batch_size = 3\nexclude = [\"generated/**\"]\nchunk_size_threshold = 4000\n",
        )
        .unwrap();

        let config = AnalyzerConfig::from_toml_path(&path).unwrap();
        assert_eq!(config.batch_size, 3);
        assert_eq!(config.exclude, vec!["generated/**"]);
        assert_eq!(config.chunk_size_threshold, Some(4_000));
        // Untouched knobs keep their defaults.
        assert_eq!(config.file_timeout_ms, 10_000);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bad.toml");
        fs::write(&path, "batch_size = \"not a number\"").unwrap();
        assert!(AnalyzerConfig::from_toml_path(&path).is_err());
    }
}
