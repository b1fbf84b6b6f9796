use crate::complexity::{complexity_score, max_nesting_depth};
use crate::rules::rules_for;
use crate::tags::detect_pattern_tags;
use crate::types::{AnalysisIssue, ChunkAnalysis};
use atlas_chunker::{Chunk, Language};

/// Knobs for the extraction run
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Run the quality sub-passes (deep nesting, long lines, hot spots).
    /// Enabled by the adaptive controller for complex projects only.
    pub quality: bool,
}

const MAX_REASONABLE_LINE: usize = 10_000;
const DEEP_NESTING_CUTOFF: usize = 5;
const LONG_LINE_CUTOFF: usize = 160;
const HOT_CHUNK_COMPLEXITY: u32 = 30;

/// Extract structural facts from one chunk.
///
/// Never fails: content that defeats the passes produces an analysis with
/// empty collections and an `issues` entry instead of an error, so one bad
/// file can never abort a batch.
#[must_use]
pub fn extract_chunk(chunk: &Chunk, language: Language, options: ExtractOptions) -> ChunkAnalysis {
    if let Some(reason) = reject_content(&chunk.content) {
        log::debug!(
            "skipping extraction for chunk {} lines {}-{}: {reason}",
            chunk.index,
            chunk.start_line,
            chunk.end_line
        );
        let mut analysis = ChunkAnalysis::empty(chunk.clone());
        analysis.issues.push(AnalysisIssue::new("content", reason));
        return analysis;
    }

    let lines: Vec<&str> = chunk.content.lines().collect();
    let rules = rules_for(language);
    let mut issues = Vec::new();

    // Pathologically long lines are legal input but poison pattern
    // matching; flag them and let the passes do what they can.
    if let Some(idx) = lines.iter().position(|l| l.len() > MAX_REASONABLE_LINE) {
        issues.push(AnalysisIssue::at_line(
            "content",
            format!("line exceeds {MAX_REASONABLE_LINE} characters"),
            idx + 1,
        ));
    }

    let comment_lines = count_comment_lines(&lines, language);
    let complexity = complexity_score(&lines, language);

    let mut analysis = ChunkAnalysis {
        chunk: chunk.clone(),
        functions: rules.extract_functions(&lines),
        classes: rules.extract_classes(&lines),
        imports: rules.extract_imports(&lines),
        exports: rules.extract_exports(&lines),
        constants: rules.extract_constants(&lines),
        comment_lines,
        complexity,
        pattern_tags: detect_pattern_tags(&chunk.content),
        issues,
    };

    if options.quality {
        run_quality_pass(&mut analysis, &lines, language);
    }

    analysis
}

/// Reasons content cannot be analyzed at all
fn reject_content(content: &str) -> Option<String> {
    if content.contains('\0') {
        return Some("binary content".to_string());
    }

    let replacement_chars = content.matches('\u{FFFD}').count();
    if replacement_chars > 0 && replacement_chars * 100 > content.chars().count() {
        return Some("content is not valid text".to_string());
    }

    None
}

/// Lines that are entirely comment (line comments only; block-comment
/// interiors are approximated by a leading `*`)
fn count_comment_lines(lines: &[&str], language: Language) -> usize {
    let prefixes = language.line_comment_prefixes();

    lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim_start();
            prefixes.iter().any(|p| trimmed.starts_with(p))
                || trimmed.starts_with("/*")
                || trimmed.starts_with('*')
        })
        .count()
}

fn run_quality_pass(analysis: &mut ChunkAnalysis, lines: &[&str], language: Language) {
    let depth = max_nesting_depth(lines, language);
    if depth > DEEP_NESTING_CUTOFF {
        analysis.issues.push(AnalysisIssue::new(
            "quality",
            format!("nesting reaches depth {depth}"),
        ));
    }

    let long_lines = lines.iter().filter(|l| l.len() > LONG_LINE_CUTOFF).count();
    if long_lines > 0 {
        analysis.issues.push(AnalysisIssue::new(
            "quality",
            format!("{long_lines} lines exceed {LONG_LINE_CUTOFF} characters"),
        ));
    }

    if analysis.complexity > HOT_CHUNK_COMPLEXITY {
        analysis.issues.push(AnalysisIssue::new(
            "quality",
            format!(
                "complexity {} concentrated in lines {}-{}",
                analysis.complexity, analysis.chunk.start_line, analysis.chunk.end_line
            ),
        ));
    }
}
