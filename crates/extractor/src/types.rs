use atlas_chunker::Chunk;
use serde::{Deserialize, Serialize};

/// A function or method found by the function pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionInfo {
    /// Declared name
    pub name: String,

    /// Parameter names, as written (types stripped where cheap)
    pub params: Vec<String>,

    /// Line of the declaration, 1-based and local to the analyzed content
    pub line: usize,

    /// Declared async
    pub is_async: bool,

    /// Visible outside the module (export/pub/non-underscore)
    pub is_exported: bool,
}

/// A class-like declaration (class, struct, trait)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassInfo {
    /// Declared name
    pub name: String,

    /// Superclass or extended type, when declared
    pub superclass: Option<String>,

    /// Method names found in the class body
    pub methods: Vec<String>,

    /// Property names found in the class body
    pub properties: Vec<String>,

    /// Constructor parameter names
    pub constructor_params: Vec<String>,

    /// Line of the declaration, 1-based and local to the analyzed content
    pub line: usize,
}

/// One import/require statement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportInfo {
    /// Module path as written in the source
    pub module: String,

    /// Imported symbol names (empty for bare imports)
    pub symbols: Vec<String>,

    /// Line of the statement, 1-based and local
    pub line: usize,

    /// True for package/stdlib imports, false for relative/project-local
    /// ones (leading-dot heuristic)
    pub is_external: bool,
}

/// One exported symbol
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportInfo {
    /// Exported name (`default` exports use the literal name "default"
    /// when anonymous)
    pub name: String,

    /// Line of the statement, 1-based and local
    pub line: usize,

    /// Named or default export
    pub kind: ExportKind,
}

/// Whether an export is named or the module default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Named,
    Default,
}

/// A constant or configuration declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConstantInfo {
    /// Declared name (`UPPER_SNAKE` or a name containing "config")
    pub name: String,

    /// Line of the declaration, 1-based and local
    pub line: usize,
}

/// Design-pattern hints detected by keyword heuristics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternTag {
    Singleton,
    Factory,
    Observer,
    Middleware,
    Repository,
    Builder,
}

impl PatternTag {
    /// Human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Singleton => "singleton",
            Self::Factory => "factory",
            Self::Observer => "observer",
            Self::Middleware => "middleware",
            Self::Repository => "repository",
            Self::Builder => "builder",
        }
    }
}

/// A recoverable problem recorded during extraction or analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisIssue {
    /// The pass or stage that hit the problem
    pub pass: String,

    /// What happened
    pub message: String,

    /// Offending line when known, 1-based and local
    pub line: Option<usize>,
}

impl AnalysisIssue {
    /// Create an issue without a line anchor
    pub fn new(pass: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pass: pass.into(),
            message: message.into(),
            line: None,
        }
    }

    /// Create an issue anchored to a line
    pub fn at_line(pass: impl Into<String>, message: impl Into<String>, line: usize) -> Self {
        Self {
            pass: pass.into(),
            message: message.into(),
            line: Some(line),
        }
    }
}

/// Everything the extractor learned about one chunk.
///
/// Produced once, never mutated. Line numbers are local to the chunk
/// content; the merger translates them to file-absolute positions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkAnalysis {
    /// The chunk this analysis describes
    pub chunk: Chunk,

    /// Functions and methods
    pub functions: Vec<FunctionInfo>,

    /// Class-like declarations
    pub classes: Vec<ClassInfo>,

    /// Import statements
    pub imports: Vec<ImportInfo>,

    /// Export statements
    pub exports: Vec<ExportInfo>,

    /// Constants and configuration declarations
    pub constants: Vec<ConstantInfo>,

    /// Lines that are entirely comment
    pub comment_lines: usize,

    /// Cyclomatic-complexity approximation for the chunk
    pub complexity: u32,

    /// Design-pattern hints
    pub pattern_tags: Vec<PatternTag>,

    /// Recoverable problems hit during extraction
    pub issues: Vec<AnalysisIssue>,
}

impl ChunkAnalysis {
    /// An analysis with every collection empty, for content that could
    /// not be processed
    #[must_use]
    pub fn empty(chunk: Chunk) -> Self {
        Self {
            chunk,
            functions: Vec::new(),
            classes: Vec::new(),
            imports: Vec::new(),
            exports: Vec::new(),
            constants: Vec::new(),
            comment_lines: 0,
            complexity: 1,
            pattern_tags: Vec::new(),
            issues: Vec::new(),
        }
    }
}
