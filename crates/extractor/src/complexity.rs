use atlas_chunker::{Language, ScanState};
use once_cell::sync::Lazy;
use regex::Regex;

static BRANCH_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:if|else|while|for|switch|case|catch)\b").expect("branch pattern")
});

/// Cyclomatic-complexity approximation: base 1, plus one per branch
/// keyword and per logical `&&`/`||`.
///
/// Lexical, not syntactic: keywords inside string literals do count. The
/// score is a comparative workload signal, not a verified metric. Full
/// comment lines are skipped so documentation does not inflate it.
#[must_use]
pub fn complexity_score(lines: &[&str], language: Language) -> u32 {
    let mut score: u32 = 1;
    let prefixes = language.line_comment_prefixes();

    for line in lines {
        let trimmed = line.trim_start();
        if prefixes.iter().any(|p| trimmed.starts_with(p)) || trimmed.starts_with('*') {
            continue;
        }

        let branches = BRANCH_KEYWORD.find_iter(line).count()
            + line.matches("&&").count()
            + line.matches("||").count();
        score = score.saturating_add(u32::try_from(branches).unwrap_or(u32::MAX));
    }

    score
}

/// Deepest end-of-line brace nesting observed across the content.
///
/// Python-family content has no braces to count; indentation depth in
/// steps of four columns stands in for it.
#[must_use]
pub fn max_nesting_depth(lines: &[&str], language: Language) -> usize {
    if language.block_comment_delimiters().is_none() {
        return lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| (l.len() - l.trim_start().len()) / 4)
            .max()
            .unwrap_or(0);
    }

    let mut state = ScanState::new(language);
    let mut max_depth = 0;

    for line in lines {
        state.advance(line);
        max_depth = max_depth.max(state.brace_depth());
    }

    max_depth
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_complexity_is_one() {
        assert_eq!(complexity_score(&["const a = 1;"], Language::JavaScript), 1);
    }

    #[test]
    fn branches_and_logic_add_up() {
        let lines = [
            "if (a && b) {",
            "} else if (c || d) {",
            "for (const x of xs) {",
            "switch (x) {",
            "case 1:",
            "}",
        ];
        // if, &&, else, if, ||, for, switch, case
        assert_eq!(complexity_score(&lines, Language::JavaScript), 9);
    }

    #[test]
    fn comment_lines_do_not_count() {
        let lines = ["// if this else that", "if (x) {}"];
        assert_eq!(complexity_score(&lines, Language::JavaScript), 2);

        let lines = ["# if condition", "if x:"];
        assert_eq!(complexity_score(&lines, Language::Python), 2);
    }

    #[test]
    fn nesting_depth_from_braces() {
        let lines = ["function f() {", "  if (a) {", "    while (b) {", "    }", "  }", "}"];
        assert_eq!(max_nesting_depth(&lines, Language::JavaScript), 3);
    }

    #[test]
    fn nesting_depth_from_indentation_for_python() {
        let lines = ["def f():", "    if a:", "        while b:", "            pass"];
        assert_eq!(max_nesting_depth(&lines, Language::Python), 3);
    }
}
