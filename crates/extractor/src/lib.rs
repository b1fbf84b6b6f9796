//! # Atlas Extractor
//!
//! Regex-heuristic structural extraction over chunks of source content.
//!
//! ## Philosophy
//!
//! The extractor identifies structural elements cheaply across many
//! languages. It is lexical and best-effort: patterns find most functions,
//! classes, imports, exports and constants, and what they miss is accepted
//! noise, not an error. Passes are independent and share no mutable state,
//! so chunk-level extraction parallelizes trivially.
//!
//! ## Architecture
//!
//! ```text
//! Chunk Content
//!     │
//!     ├──> Language Rules (per-language pattern set)
//!     │    ├─> imports (module path, symbols, internal/external)
//!     │    ├─> exports (named vs default)
//!     │    ├─> functions (name, params, async, exported)
//!     │    ├─> classes (name, superclass, methods, properties)
//!     │    └─> constants (UPPER_SNAKE, config names)
//!     │
//!     ├──> Complexity Pass (branch keywords + logical operators)
//!     │
//!     ├──> Pattern Tags (keyword heuristics: Singleton, Middleware, ...)
//!     │
//!     └──> ChunkAnalysis (never an error; failures become issues)
//! ```
//!
//! ## Failure policy
//!
//! Malformed or binary content yields an analysis with empty collections
//! and a recorded issue. Extraction never aborts a batch.

mod complexity;
mod ecma;
mod extractor;
mod python;
mod rules;
mod rust_lang;
mod tags;
mod types;

pub use complexity::{complexity_score, max_nesting_depth};
pub use extractor::{extract_chunk, ExtractOptions};
pub use rules::{rules_for, LanguageRules};
pub use tags::detect_pattern_tags;
pub use types::{
    AnalysisIssue, ChunkAnalysis, ClassInfo, ConstantInfo, ExportInfo, ExportKind, FunctionInfo,
    ImportInfo, PatternTag,
};
