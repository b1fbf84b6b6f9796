use crate::language::Language;

/// Lexical state carried across lines while scanning for split points.
///
/// Tracks three facts: brace depth, whether the scan position is inside a
/// block comment, and the active string delimiter if inside a string
/// literal. Escaped quotes (`\"`) and quote kinds other than the active one
/// never terminate a literal. State persists across line boundaries so that
/// multi-line strings and comments are never treated as code.
#[derive(Debug, Clone)]
pub struct ScanState {
    language: Language,
    brace_depth: usize,
    in_block_comment: bool,
    string_delim: Option<char>,
}

impl ScanState {
    /// Fresh state at the top of a file
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self {
            language,
            brace_depth: 0,
            in_block_comment: false,
            string_delim: None,
        }
    }

    /// Current brace nesting depth
    #[must_use]
    pub const fn brace_depth(&self) -> usize {
        self.brace_depth
    }

    /// True when inside a block comment
    #[must_use]
    pub const fn in_block_comment(&self) -> bool {
        self.in_block_comment
    }

    /// True when inside a string literal
    #[must_use]
    pub const fn in_string(&self) -> bool {
        self.string_delim.is_some()
    }

    /// Outside both string literals and block comments
    #[must_use]
    pub const fn outside_literals(&self) -> bool {
        !self.in_block_comment && self.string_delim.is_none()
    }

    /// Every split precondition on state: depth zero, not in a comment,
    /// not in a string
    #[must_use]
    pub const fn at_safe_depth(&self) -> bool {
        self.brace_depth == 0 && self.outside_literals()
    }

    /// Feed one line (terminator included or not) through the scanner.
    ///
    /// All significant tokens are ASCII, so the walk is over bytes;
    /// UTF-8 continuation bytes can never collide with them.
    pub fn advance(&mut self, line: &str) {
        let bytes = line.as_bytes();
        let block = self.language.block_comment_delimiters();
        let quotes = self.language.string_delimiters();
        let line_comments = self.language.line_comment_prefixes();

        // Byte slices, not `&line[i..]`: escape skipping can leave `i` in
        // the middle of a multi-byte character, where str indexing panics.
        let mut i = 0;
        while i < bytes.len() {
            if self.in_block_comment {
                if let Some((_, close)) = block {
                    if bytes[i..].starts_with(close.as_bytes()) {
                        self.in_block_comment = false;
                        i += close.len();
                        continue;
                    }
                }
                i += 1;
                continue;
            }

            if let Some(delim) = self.string_delim {
                if bytes[i] == b'\\' {
                    i += 2;
                    continue;
                }
                if bytes[i] == delim as u8 {
                    self.string_delim = None;
                }
                i += 1;
                continue;
            }

            // Code context: a line comment consumes the rest of the line.
            if line_comments
                .iter()
                .any(|p| bytes[i..].starts_with(p.as_bytes()))
            {
                return;
            }

            if let Some((open, _)) = block {
                if bytes[i..].starts_with(open.as_bytes()) {
                    self.in_block_comment = true;
                    i += open.len();
                    continue;
                }
            }

            let c = bytes[i] as char;
            if quotes.contains(&c) {
                self.string_delim = Some(c);
                i += 1;
                continue;
            }

            match bytes[i] {
                b'{' => self.brace_depth += 1,
                b'}' => self.brace_depth = self.brace_depth.saturating_sub(1),
                _ => {}
            }
            i += 1;
        }
    }
}
