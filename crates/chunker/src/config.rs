use serde::{Deserialize, Serialize};

/// Configuration for boundary-safe chunking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Accumulated chunk size (bytes) after which the next safe seam
    /// closes the chunk
    pub chunk_size_threshold: usize,

    /// File size (bytes) above which a file is considered "large" and
    /// routed through the chunked path instead of direct analysis
    pub large_file_threshold: usize,

    /// Multiplier over `chunk_size_threshold` after which the chunker
    /// stops waiting for a safe seam and takes a forced split at the
    /// first line outside string/comment context
    pub max_overrun_factor: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size_threshold: 8_000,
            large_file_threshold: 50_000,
            max_overrun_factor: 3,
        }
    }
}

impl ChunkerConfig {
    /// Config tuned for very large projects: smaller chunks bound the
    /// per-unit analysis latency
    #[must_use]
    pub fn for_large_projects() -> Self {
        Self {
            chunk_size_threshold: 4_000,
            large_file_threshold: 30_000,
            ..Default::default()
        }
    }

    /// Config tuned for small projects: bigger chunks, fewer seams
    #[must_use]
    pub fn for_small_projects() -> Self {
        Self {
            chunk_size_threshold: 12_000,
            large_file_threshold: 60_000,
            ..Default::default()
        }
    }

    /// Replace the chunk threshold, keeping the other knobs
    #[must_use]
    pub fn with_chunk_threshold(mut self, threshold: usize) -> Self {
        self.chunk_size_threshold = threshold;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size_threshold == 0 {
            return Err("chunk_size_threshold must be > 0".to_string());
        }

        if self.large_file_threshold < self.chunk_size_threshold {
            return Err(format!(
                "large_file_threshold ({}) cannot be below chunk_size_threshold ({})",
                self.large_file_threshold, self.chunk_size_threshold
            ));
        }

        if self.max_overrun_factor < 2 {
            return Err("max_overrun_factor must be >= 2".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = ChunkerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk_size_threshold, 8_000);
        assert_eq!(config.large_file_threshold, 50_000);
    }

    #[test]
    fn test_preset_configs_valid() {
        assert!(ChunkerConfig::for_large_projects().validate().is_ok());
        assert!(ChunkerConfig::for_small_projects().validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ChunkerConfig::default();

        // Invalid: zero threshold
        config.chunk_size_threshold = 0;
        assert!(config.validate().is_err());

        // Invalid: large-file threshold below chunk threshold
        config.chunk_size_threshold = 8_000;
        config.large_file_threshold = 4_000;
        assert!(config.validate().is_err());

        // Invalid: overrun factor of one would forbid any accumulation
        config.large_file_threshold = 50_000;
        config.max_overrun_factor = 1;
        assert!(config.validate().is_err());

        // Valid configuration
        config.max_overrun_factor = 3;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_chunk_threshold() {
        let config = ChunkerConfig::default().with_chunk_threshold(2_000);
        assert_eq!(config.chunk_size_threshold, 2_000);
        assert_eq!(config.large_file_threshold, 50_000);
    }
}
