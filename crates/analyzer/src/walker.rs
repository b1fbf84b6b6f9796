use crate::classifier::FileRole;
use crate::error::{AnalyzerError, Result};
use atlas_chunker::Language;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One file found during the project walk.
///
/// Created by the walker and immutable afterwards, except for `role`,
/// which the classifier refines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path
    pub path: PathBuf,

    /// Path relative to the walk root, `/`-separated
    pub relative_path: String,

    /// Lowercased extension, empty when the file has none
    pub extension: String,

    /// File size in bytes
    pub size_bytes: u64,

    /// Modification time as unix milliseconds, 0 when unavailable
    pub modified_ms: u64,

    /// Role assigned by the classifier
    pub role: FileRole,
}

impl FileRecord {
    /// Language implied by the extension
    #[must_use]
    pub fn language(&self) -> Language {
        Language::from_extension(&self.extension)
    }
}

/// Options controlling the project walk
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// User exclusion globs, matched against root-relative paths
    pub exclude: Vec<String>,

    /// Hard recursion bound; pathological symlink structures cannot
    /// push the walk past this
    pub max_depth: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            max_depth: 32,
        }
    }
}

/// Walker producing `FileRecord`s for every analyzable file under a root
pub struct TreeWalker {
    root: PathBuf,
    max_depth: usize,
    exclude: GlobSet,
}

impl TreeWalker {
    /// Create a walker. Fails when the root does not exist, is not a
    /// directory, or an exclusion glob is malformed.
    pub fn new(root: impl AsRef<Path>, options: &WalkOptions) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        if !root.is_dir() {
            return Err(AnalyzerError::InvalidPath(format!(
                "not a directory: {}",
                root.display()
            )));
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in &options.exclude {
            let glob = Glob::new(pattern).map_err(|e| {
                AnalyzerError::InvalidConfig(format!("bad exclusion glob {pattern:?}: {e}"))
            })?;
            builder.add(glob);
        }
        let exclude = builder
            .build()
            .map_err(|e| AnalyzerError::InvalidConfig(format!("exclusion set: {e}")))?;

        Ok(Self {
            root,
            max_depth: options.max_depth,
            exclude,
        })
    }

    /// Walk the tree depth-first and collect records.
    ///
    /// Unreadable directories are logged and skipped; they never abort
    /// the walk. File contents are not opened here.
    pub fn walk(&self) -> Vec<FileRecord> {
        let mut records = Vec::new();

        let root = self.root.clone();
        let exclude = self.exclude.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .max_depth(Some(self.max_depth));
        builder.filter_entry(move |entry| !Self::is_excluded(entry.path(), &root, &exclude));

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if !Self::is_analyzable(path) {
                        continue;
                    }

                    let Ok(meta) = entry.metadata() else {
                        log::warn!("Failed to stat {}", path.display());
                        continue;
                    };

                    records.push(self.record_for(path, meta.len(), meta.modified().ok()));
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        log::info!("Found {} analyzable files", records.len());
        records
    }

    fn record_for(&self, path: &Path, size_bytes: u64, modified: Option<SystemTime>) -> FileRecord {
        let relative_path = path
            .strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let modified_ms = modified
            .and_then(|m| m.duration_since(SystemTime::UNIX_EPOCH).ok())
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);

        FileRecord {
            path: path.to_path_buf(),
            relative_path,
            extension,
            size_bytes,
            modified_ms,
            role: FileRole::Generic,
        }
    }

    fn is_excluded(path: &Path, root: &Path, exclude: &GlobSet) -> bool {
        let Ok(relative) = path.strip_prefix(root) else {
            return false;
        };

        if !exclude.is_empty() && exclude.is_match(relative) {
            log::debug!("Excluded by user glob: {}", relative.display());
            return true;
        }

        for component in relative.components() {
            if let std::path::Component::Normal(name) = component {
                let lowered = name.to_string_lossy().to_lowercase();
                if IGNORED_SCOPES.iter().any(|ignored| ignored == &lowered) {
                    return true;
                }
            }
        }

        false
    }

    /// Check if the file is worth analyzing at all
    fn is_analyzable(path: &Path) -> bool {
        if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
            if matches!(
                file_name,
                "Dockerfile" | "Makefile" | "makefile" | "Justfile" | "Gemfile"
            ) {
                return true;
            }
        }

        if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
            let ext = ext.to_lowercase();
            return ANALYZABLE_EXTENSIONS
                .iter()
                .any(|candidate| candidate == &ext);
        }

        false
    }
}

const IGNORED_SCOPES: &[&str] = &[
    // VCS / tooling
    ".git",
    ".hg",
    ".svn",
    ".idea",
    ".vscode",
    // caches / builds
    ".cache",
    "node_modules",
    ".next",
    ".turbo",
    ".parcel-cache",
    "build",
    "dist",
    "out",
    "coverage",
    ".nuxt",
    ".vite",
    ".svelte-kit",
    "target",
    ".venv",
    "venv",
    "__pycache__",
    // data / vendor
    "vendor",
    "third_party",
    "third-party",
];

/// Code, config and docs extensions the pipeline understands
const ANALYZABLE_EXTENSIONS: &[&str] = &[
    // General purpose languages
    "rs", "py", "pyw", "js", "mjs", "cjs", "jsx", "ts", "tsx", "java", "kt", "kts", "go", "c",
    "h", "cpp", "cc", "cxx", "hpp", "hh", "hxx", "cs", "rb", "swift", "php", "scala", "dart",
    "zig", "lua", "ex", "exs",
    // Scripts
    "sh", "bash", "zsh", "ps1",
    // Docs
    "md", "mdx", "rst", "adoc", "txt",
    // Config / data
    "yaml", "yml", "json", "toml", "ini", "cfg", "conf", "env", "xml", "sql", "proto",
];
