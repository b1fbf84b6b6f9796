use crate::merger::ModuleAnalysis;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Cache key: absolute path plus byte size.
///
/// Size stands in for a content hash: when a file changes size the key
/// changes and the stale entry is simply never read again. A same-size
/// content change is invisible to this key; that is an accepted limitation
/// of the single-run session scope, not a bug. A persistent or
/// long-running service would need a content hash here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    size: u64,
}

struct CacheEntry {
    value: Arc<ModuleAnalysis>,
    created_at: Instant,
}

/// Session-scoped memoization of per-file analyses.
///
/// One session owns one cache map: created at session start, discarded at
/// teardown. There is no eviction; the batch-analysis use case bounds the
/// entry count by the project size. Each key is written at most once per
/// session by the pipeline's single writer, so no lock is needed.
#[derive(Default)]
pub struct AnalysisSession {
    entries: HashMap<CacheKey, CacheEntry>,
    hits: u64,
    misses: u64,
}

impl AnalysisSession {
    /// Fresh, empty session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the analysis for (path, size)
    pub fn get(&mut self, path: &Path, size: u64) -> Option<Arc<ModuleAnalysis>> {
        let key = CacheKey {
            path: path.to_path_buf(),
            size,
        };
        match self.entries.get(&key) {
            Some(entry) => {
                self.hits += 1;
                Some(Arc::clone(&entry.value))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store the analysis for (path, size)
    pub fn put(&mut self, path: &Path, size: u64, analysis: ModuleAnalysis) {
        let key = CacheKey {
            path: path.to_path_buf(),
            size,
        };
        self.entries.insert(
            key,
            CacheEntry {
                value: Arc::new(analysis),
                created_at: Instant::now(),
            },
        );
    }

    /// Drop entries for paths not in the live set.
    ///
    /// Returns how many entries were purged. Entries for deleted files
    /// would otherwise sit unread until teardown; unrelated entries are
    /// untouched.
    pub fn retain_paths(&mut self, live: &std::collections::HashSet<PathBuf>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| live.contains(&key.path));
        before - self.entries.len()
    }

    /// Age of the oldest entry, if any
    #[must_use]
    pub fn oldest_entry_age(&self) -> Option<std::time::Duration> {
        self.entries
            .values()
            .map(|e| e.created_at.elapsed())
            .max()
    }

    /// Number of cached analyses
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hits observed so far
    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    /// Misses observed so far
    #[must_use]
    pub const fn misses(&self) -> u64 {
        self.misses
    }

    /// Explicit teardown: drop every entry and reset counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
