use serde::{Deserialize, Serialize};
use std::path::Path;

/// Source language recognized by the lexical passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Go,
    Java,
    C,
    Cpp,
    CSharp,
    Ruby,
    Swift,
    Kotlin,
    Unknown,
}

impl Language {
    /// Detect language from file extension
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "rs" => Language::Rust,
            "py" | "pyw" => Language::Python,
            "js" | "mjs" | "cjs" | "jsx" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "go" => Language::Go,
            "java" => Language::Java,
            "c" | "h" => Language::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Language::Cpp,
            "cs" => Language::CSharp,
            "rb" => Language::Ruby,
            "swift" => Language::Swift,
            "kt" | "kts" => Language::Kotlin,
            _ => Language::Unknown,
        }
    }

    /// Detect language from file path
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Get language name as string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Go => "go",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Ruby => "ruby",
            Language::Swift => "swift",
            Language::Kotlin => "kotlin",
            Language::Unknown => "unknown",
        }
    }

    /// Prefixes that start a comment running to end of line
    #[must_use]
    pub fn line_comment_prefixes(self) -> &'static [&'static str] {
        match self {
            Language::Rust
            | Language::JavaScript
            | Language::TypeScript
            | Language::Go
            | Language::Java
            | Language::C
            | Language::Cpp
            | Language::CSharp
            | Language::Swift
            | Language::Kotlin => &["//"],
            Language::Python | Language::Ruby => &["#"],
            Language::Unknown => &["//", "#"],
        }
    }

    /// Open/close pair for block comments, if the language has them
    #[must_use]
    pub const fn block_comment_delimiters(self) -> Option<(&'static str, &'static str)> {
        match self {
            Language::Rust
            | Language::JavaScript
            | Language::TypeScript
            | Language::Go
            | Language::Java
            | Language::C
            | Language::Cpp
            | Language::CSharp
            | Language::Swift
            | Language::Kotlin
            | Language::Unknown => Some(("/*", "*/")),
            Language::Python | Language::Ruby => None,
        }
    }

    /// Characters that open a string literal.
    ///
    /// Rust intentionally lists only `"`: a bare `'` is far more often a
    /// lifetime than a char literal, and treating it as a string opener
    /// would poison the scanner state for the rest of the file.
    #[must_use]
    pub fn string_delimiters(self) -> &'static [char] {
        match self {
            Language::Rust | Language::Go => &['"', '`'],
            Language::JavaScript | Language::TypeScript => &['"', '\'', '`'],
            Language::Python | Language::Ruby => &['"', '\''],
            Language::Java
            | Language::C
            | Language::Cpp
            | Language::CSharp
            | Language::Swift
            | Language::Kotlin => &['"'],
            Language::Unknown => &['"'],
        }
    }

    /// Statement prefixes that bring symbols into or out of a module
    #[must_use]
    pub fn import_prefixes(self) -> &'static [&'static str] {
        match self {
            Language::Rust => &["use ", "pub use ", "extern crate ", "mod ", "pub mod "],
            Language::Python => &["import ", "from "],
            Language::JavaScript | Language::TypeScript => {
                &["import ", "export ", "require("]
            }
            Language::Go => &["import ", "package "],
            Language::Java | Language::Kotlin => &["import ", "package "],
            Language::CSharp => &["using ", "namespace "],
            Language::Ruby => &["require ", "require_relative ", "include "],
            Language::Swift => &["import "],
            Language::C | Language::Cpp => &["#include "],
            Language::Unknown => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("rs"), Language::Rust);
        assert_eq!(Language::from_extension("RS"), Language::Rust);
        assert_eq!(Language::from_extension("py"), Language::Python);
        assert_eq!(Language::from_extension("jsx"), Language::JavaScript);
        assert_eq!(Language::from_extension("tsx"), Language::TypeScript);
        assert_eq!(Language::from_extension("weird"), Language::Unknown);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("test.rs"), Language::Rust);
        assert_eq!(Language::from_path("src/main.py"), Language::Python);
        assert_eq!(Language::from_path("index.ts"), Language::TypeScript);
        assert_eq!(Language::from_path("no_extension"), Language::Unknown);
    }

    #[test]
    fn test_comment_prefixes() {
        assert!(Language::Rust.line_comment_prefixes().contains(&"//"));
        assert!(Language::Python.line_comment_prefixes().contains(&"#"));
        assert!(Language::Python.block_comment_delimiters().is_none());
        assert_eq!(
            Language::JavaScript.block_comment_delimiters(),
            Some(("/*", "*/"))
        );
    }

    #[test]
    fn test_string_delimiters() {
        assert!(Language::JavaScript.string_delimiters().contains(&'`'));
        assert!(!Language::Rust.string_delimiters().contains(&'\''));
    }

    #[test]
    fn test_import_prefixes() {
        assert!(Language::Rust.import_prefixes().contains(&"use "));
        assert!(Language::Python.import_prefixes().contains(&"import "));
        assert!(Language::JavaScript.import_prefixes().contains(&"export "));
    }
}
