use crate::walker::FileRecord;
use atlas_chunker::{BoundaryKind, Chunk};
use atlas_extractor::{
    AnalysisIssue, ChunkAnalysis, ClassInfo, ConstantInfo, ExportInfo, FunctionInfo, ImportInfo,
    PatternTag,
};
use serde::{Deserialize, Serialize};

/// Whether a file was analyzed whole or through the chunked path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStrategy {
    Direct,
    Chunked,
}

impl AnalysisStrategy {
    /// Human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Chunked => "chunked",
        }
    }
}

/// An import consumed by code in a different chunk of the same file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrossChunkLink {
    /// The imported symbol
    pub symbol: String,

    /// Chunk index of the import statement
    pub imported_in_chunk: usize,

    /// Chunk index where the symbol is used
    pub used_in_chunk: usize,
}

/// What merging learned about relationships across chunk seams
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrossChunkInsights {
    /// Imports whose consumers live in another chunk
    pub links: Vec<CrossChunkLink>,

    /// Entities dropped because adjacent chunks re-detected them across
    /// a seam
    pub deduplicated: usize,
}

/// Merged structural summary of one file, independent of chunking.
///
/// Line numbers are file-absolute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleAnalysis {
    /// The analyzed file
    pub file: FileRecord,

    /// How the file was analyzed
    pub strategy: AnalysisStrategy,

    /// Function count after dedup
    pub total_functions: usize,

    /// Class count after dedup
    pub total_classes: usize,

    /// Functions with file-absolute line numbers
    pub functions: Vec<FunctionInfo>,

    /// Classes with file-absolute line numbers
    pub classes: Vec<ClassInfo>,

    /// Imports with file-absolute line numbers
    pub imports: Vec<ImportInfo>,

    /// Exports with file-absolute line numbers
    pub exports: Vec<ExportInfo>,

    /// Constants with file-absolute line numbers
    pub constants: Vec<ConstantInfo>,

    /// Lines that are entirely comment
    pub comment_lines: usize,

    /// Sum of chunk complexities: total branching work in the file
    pub complexity: u32,

    /// Unique imported module paths, in first-seen order
    pub dependencies: Vec<String>,

    /// Design-pattern hints, deduplicated
    pub pattern_tags: Vec<PatternTag>,

    /// Seam-spanning observations
    pub cross_chunk: CrossChunkInsights,

    /// Problems recorded anywhere in the pipeline for this file
    pub issues: Vec<AnalysisIssue>,
}

/// Two detections of the same name within this many lines are one entity
const DEDUP_LINE_TOLERANCE: usize = 3;

/// Cap on the symbol table used for cross-chunk resolution
const MAX_TRACKED_SYMBOLS: usize = 64;

/// Merge ordered per-chunk analyses into one per-file view.
///
/// Chunk-local line numbers are translated to file-absolute ones, entities
/// re-detected on both sides of a seam are deduplicated, and complexity is
/// summed across chunks.
#[must_use]
pub fn merge(file: FileRecord, mut analyses: Vec<ChunkAnalysis>) -> ModuleAnalysis {
    analyses.sort_by_key(|a| a.chunk.index);

    let strategy = if analyses.len() <= 1
        && analyses
            .first()
            .is_none_or(|a| a.chunk.boundary == BoundaryKind::WholeFile)
    {
        AnalysisStrategy::Direct
    } else {
        AnalysisStrategy::Chunked
    };

    let mut functions: Vec<FunctionInfo> = Vec::new();
    let mut classes: Vec<ClassInfo> = Vec::new();
    let mut imports: Vec<ImportInfo> = Vec::new();
    let mut exports: Vec<ExportInfo> = Vec::new();
    let mut constants: Vec<ConstantInfo> = Vec::new();
    let mut issues: Vec<AnalysisIssue> = Vec::new();
    let mut pattern_tags: Vec<PatternTag> = Vec::new();
    let mut comment_lines = 0;
    let mut complexity: u32 = 0;
    let mut deduplicated = 0;

    for analysis in &analyses {
        let chunk = &analysis.chunk;

        for f in &analysis.functions {
            let line = chunk.absolute_line(f.line);
            if find_duplicate(functions.iter().map(|e| (e.name.as_str(), e.line)), &f.name, line) {
                deduplicated += 1;
                continue;
            }
            let mut f = f.clone();
            f.line = line;
            functions.push(f);
        }

        for c in &analysis.classes {
            let line = chunk.absolute_line(c.line);
            if find_duplicate(classes.iter().map(|e| (e.name.as_str(), e.line)), &c.name, line) {
                deduplicated += 1;
                continue;
            }
            let mut c = c.clone();
            c.line = line;
            classes.push(c);
        }

        for i in &analysis.imports {
            let mut i = i.clone();
            i.line = chunk.absolute_line(i.line);
            imports.push(i);
        }

        for e in &analysis.exports {
            let line = chunk.absolute_line(e.line);
            if find_duplicate(exports.iter().map(|x| (x.name.as_str(), x.line)), &e.name, line) {
                deduplicated += 1;
                continue;
            }
            let mut e = e.clone();
            e.line = line;
            exports.push(e);
        }

        for c in &analysis.constants {
            let mut c = c.clone();
            c.line = chunk.absolute_line(c.line);
            constants.push(c);
        }

        for issue in &analysis.issues {
            let mut issue = issue.clone();
            issue.line = issue.line.map(|l| chunk.absolute_line(l));
            issues.push(issue);
        }

        for tag in &analysis.pattern_tags {
            if !pattern_tags.contains(tag) {
                pattern_tags.push(*tag);
            }
        }

        comment_lines += analysis.comment_lines;
        complexity = complexity.saturating_add(analysis.complexity);
    }

    let dependencies = collect_dependencies(&imports);
    let links = resolve_cross_chunk_links(&analyses);

    ModuleAnalysis {
        file,
        strategy,
        total_functions: functions.len(),
        total_classes: classes.len(),
        functions,
        classes,
        imports,
        exports,
        constants,
        comment_lines,
        complexity,
        dependencies,
        pattern_tags,
        cross_chunk: CrossChunkInsights {
            links,
            deduplicated,
        },
        issues,
    }
}

/// Build a single-chunk analysis wrapper for the direct path
#[must_use]
pub fn single_chunk(content: &str) -> Chunk {
    let lines = content.split_inclusive('\n').count().max(1);
    Chunk::new(0, 1, lines, content.to_string(), BoundaryKind::WholeFile)
}

fn find_duplicate<'a>(
    existing: impl Iterator<Item = (&'a str, usize)>,
    name: &str,
    line: usize,
) -> bool {
    for (other_name, other_line) in existing {
        if other_name == name && line.abs_diff(other_line) <= DEDUP_LINE_TOLERANCE {
            return true;
        }
    }
    false
}

fn collect_dependencies(imports: &[ImportInfo]) -> Vec<String> {
    let mut dependencies: Vec<String> = Vec::new();
    for import in imports {
        if !dependencies.contains(&import.module) {
            dependencies.push(import.module.clone());
        }
    }
    dependencies
}

/// Resolve imports consumed by code in a different chunk.
///
/// A symbol table over every chunk's imports is built first, then each
/// other chunk's content is probed for the symbol. Lexical containment is
/// the bar, matching the fidelity of the extraction passes.
fn resolve_cross_chunk_links(analyses: &[ChunkAnalysis]) -> Vec<CrossChunkLink> {
    if analyses.len() < 2 {
        return Vec::new();
    }

    let mut symbols: Vec<(String, usize)> = Vec::new();
    for analysis in analyses {
        for import in &analysis.imports {
            for symbol in &import.symbols {
                if symbols.len() >= MAX_TRACKED_SYMBOLS {
                    break;
                }
                if symbol.len() > 1 && !symbols.iter().any(|(s, _)| s == symbol) {
                    symbols.push((symbol.clone(), analysis.chunk.index));
                }
            }
        }
    }

    let mut links = Vec::new();
    for (symbol, imported_in) in &symbols {
        for analysis in analyses {
            if analysis.chunk.index == *imported_in {
                continue;
            }
            if contains_word(&analysis.chunk.content, symbol) {
                links.push(CrossChunkLink {
                    symbol: symbol.clone(),
                    imported_in_chunk: *imported_in,
                    used_in_chunk: analysis.chunk.index,
                });
                break;
            }
        }
    }

    links
}

/// Word-boundary containment without a per-symbol regex
fn contains_word(haystack: &str, needle: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let abs = start + pos;
        let before_ok = abs == 0
            || !haystack[..abs]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric() || c == '_');
        let after = abs + needle.len();
        let after_ok = after >= haystack.len()
            || !haystack[after..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_');
        if before_ok && after_ok {
            return true;
        }
        start = abs + needle.len();
    }
    false
}
