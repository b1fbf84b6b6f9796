//! # Atlas Chunker
//!
//! Boundary-safe splitting of oversized source files into ordered chunks.
//!
//! ## Philosophy
//!
//! The chunker slices a file into pieces that downstream extraction can
//! analyze independently, without ever cutting through a string literal,
//! a block comment, or an open brace scope. It is lexical, not syntactic:
//! it tracks just enough state (brace depth, comment flag, active quote)
//! to know where a cut is safe.
//!
//! ## Architecture
//!
//! ```text
//! Source Content
//!     │
//!     ├──> Language Detection (from extension)
//!     │
//!     ├──> Line Scanner
//!     │    ├─> brace depth
//!     │    ├─> block-comment flag
//!     │    └─> active string delimiter (escape-aware)
//!     │
//!     └──> Seam Selection
//!          ├─> blank line / comment line / lone closing brace / import line
//!          ├─> forced split after bounded overrun
//!          └─> Emit Chunk[] (gap-free, overlap-free)
//! ```
//!
//! ## Invariant
//!
//! Concatenating the returned chunks' content in index order reproduces the
//! input exactly. This holds for every input and every threshold.
//!
//! ## Example
//!
//! ```rust
//! use atlas_chunker::{Chunker, ChunkerConfig, Language};
//!
//! let chunker = Chunker::new(ChunkerConfig::default());
//! let code = "const A = 1;\nfunction f() {}\n";
//!
//! let chunks = chunker.chunk_str(code, Language::JavaScript).unwrap();
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].content, code);
//! ```

mod chunker;
mod config;
mod error;
mod language;
mod scanner;
mod types;

pub use chunker::Chunker;
pub use config::ChunkerConfig;
pub use error::{ChunkerError, Result};
pub use language::Language;
pub use scanner::ScanState;
pub use types::{BoundaryKind, Chunk};
