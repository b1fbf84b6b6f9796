use crate::rules::LanguageRules;
use crate::types::{ClassInfo, ConstantInfo, ExportInfo, ExportKind, FunctionInfo, ImportInfo};
use atlas_chunker::{Language, ScanState};
use once_cell::sync::Lazy;
use regex::Regex;

static FUNCTION_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?P<export>export\s+)?(?:default\s+)?(?P<async>async\s+)?function\s*\*?\s*(?P<name>[A-Za-z_$][\w$]*)\s*\((?P<params>[^)]*)\)?",
    )
    .expect("function pattern")
});

static ARROW_ASSIGN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?P<export>export\s+)?(?:const|let|var)\s+(?P<name>[A-Za-z_$][\w$]*)\s*=\s*(?P<async>async\s+)?(?:\((?P<params>[^)]*)\)|(?P<single>[A-Za-z_$][\w$]*))\s*=>",
    )
    .expect("arrow pattern")
});

static CLASS_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+(?P<name>[A-Za-z_$][\w$]*)(?:\s+extends\s+(?P<super>[A-Za-z_$][\w$.]*))?",
    )
    .expect("class pattern")
});

static METHOD_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:static\s+)?(?:async\s+)?(?:get\s+|set\s+)?(?P<name>[A-Za-z_$][\w$]*)\s*\((?P<params>[^)]*)\)\s*\{",
    )
    .expect("method pattern")
});

static PROPERTY_ASSIGN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*this\.(?P<name>[A-Za-z_$][\w$]*)\s*=").expect("property pattern"));

static IMPORT_FROM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*import\s+(?:type\s+)?(?P<clause>.+?)\s+from\s+['"](?P<module>[^'"]+)['"]"#)
        .expect("import-from pattern")
});

static IMPORT_BARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*import\s+['"](?P<module>[^'"]+)['"]"#).expect("bare import pattern")
});

static REQUIRE_ASSIGN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:const|let|var)\s+(?P<clause>\{[^}]*\}|[A-Za-z_$][\w$]*)\s*=\s*require\(\s*['"](?P<module>[^'"]+)['"]"#,
    )
    .expect("require pattern")
});

static EXPORT_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*export\s+(?:async\s+)?(?:const|let|var|function\s*\*?|class)\s+(?P<name>[A-Za-z_$][\w$]*)",
    )
    .expect("export-decl pattern")
});

static EXPORT_DEFAULT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*export\s+default\b\s*(?:(?:async\s+)?function\s*\*?\s*|class\s+)?(?P<name>[A-Za-z_$][\w$]*)?")
        .expect("export-default pattern")
});

static EXPORT_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*export\s*\{(?P<names>[^}]*)\}").expect("export-list pattern"));

static MODULE_EXPORTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*module\.exports(?:\.(?P<name>[A-Za-z_$][\w$]*))?\s*=").expect("cjs pattern")
});

static CONST_UPPER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?const\s+(?P<name>[A-Z][A-Z0-9_]{2,})\s*=").expect("const pattern")
});

static CONFIG_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:const|let|var)\s+(?P<name>[\w$]*[Cc]onfig[\w$]*)\s*=")
        .expect("config pattern")
});

/// Shared pattern set for ECMAScript-shaped languages
pub struct EcmaRules;

impl EcmaRules {
    fn split_import_clause(clause: &str) -> Vec<String> {
        let mut symbols = Vec::new();
        let clause = clause.trim();

        // Braced part: named imports, possibly aliased.
        if let (Some(open), Some(close)) = (clause.find('{'), clause.rfind('}')) {
            if open < close {
                for part in clause[open + 1..close].split(',') {
                    let name = part.split_whitespace().next().unwrap_or("");
                    if !name.is_empty() {
                        symbols.push(name.trim_end_matches(',').to_string());
                    }
                }
            }
        }

        // Default / namespace part before any brace.
        let head = clause.split('{').next().unwrap_or("").trim();
        let head = head.trim_end_matches(',').trim();
        if !head.is_empty() {
            if let Some(alias) = head.strip_prefix("* as ") {
                symbols.insert(0, alias.trim().to_string());
            } else if head
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
            {
                symbols.insert(0, head.to_string());
            }
        }

        symbols
    }
}

impl LanguageRules for EcmaRules {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn extract_imports(&self, lines: &[&str]) -> Vec<ImportInfo> {
        let mut imports = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            let line_no = idx + 1;

            if let Some(caps) = IMPORT_FROM.captures(line) {
                let module = caps["module"].to_string();
                imports.push(ImportInfo {
                    is_external: !is_relative(&module),
                    symbols: Self::split_import_clause(&caps["clause"]),
                    module,
                    line: line_no,
                });
                continue;
            }

            if let Some(caps) = IMPORT_BARE.captures(line) {
                let module = caps["module"].to_string();
                imports.push(ImportInfo {
                    is_external: !is_relative(&module),
                    symbols: Vec::new(),
                    module,
                    line: line_no,
                });
                continue;
            }

            if let Some(caps) = REQUIRE_ASSIGN.captures(line) {
                let module = caps["module"].to_string();
                imports.push(ImportInfo {
                    is_external: !is_relative(&module),
                    symbols: Self::split_import_clause(&caps["clause"]),
                    module,
                    line: line_no,
                });
            }
        }

        imports
    }

    fn extract_exports(&self, lines: &[&str]) -> Vec<ExportInfo> {
        let mut exports = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            let line_no = idx + 1;

            if let Some(caps) = EXPORT_DEFAULT.captures(line) {
                let name = caps
                    .name("name")
                    .map_or_else(|| "default".to_string(), |m| m.as_str().to_string());
                exports.push(ExportInfo {
                    name,
                    line: line_no,
                    kind: ExportKind::Default,
                });
                continue;
            }

            if let Some(caps) = EXPORT_DECL.captures(line) {
                exports.push(ExportInfo {
                    name: caps["name"].to_string(),
                    line: line_no,
                    kind: ExportKind::Named,
                });
                continue;
            }

            if let Some(caps) = EXPORT_LIST.captures(line) {
                for part in caps["names"].split(',') {
                    let name = part.split_whitespace().next().unwrap_or("");
                    if !name.is_empty() {
                        exports.push(ExportInfo {
                            name: name.to_string(),
                            line: line_no,
                            kind: ExportKind::Named,
                        });
                    }
                }
                continue;
            }

            if let Some(caps) = MODULE_EXPORTS.captures(line) {
                match caps.name("name") {
                    Some(name) => exports.push(ExportInfo {
                        name: name.as_str().to_string(),
                        line: line_no,
                        kind: ExportKind::Named,
                    }),
                    None => exports.push(ExportInfo {
                        name: "default".to_string(),
                        line: line_no,
                        kind: ExportKind::Default,
                    }),
                }
            }
        }

        exports
    }

    fn extract_functions(&self, lines: &[&str]) -> Vec<FunctionInfo> {
        let mut functions = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            let line_no = idx + 1;

            if let Some(caps) = FUNCTION_DECL.captures(line) {
                functions.push(FunctionInfo {
                    name: caps["name"].to_string(),
                    params: split_params(caps.name("params").map_or("", |m| m.as_str())),
                    line: line_no,
                    is_async: caps.name("async").is_some(),
                    is_exported: caps.name("export").is_some(),
                });
                continue;
            }

            if let Some(caps) = ARROW_ASSIGN.captures(line) {
                let params = match caps.name("params") {
                    Some(p) => split_params(p.as_str()),
                    None => caps
                        .name("single")
                        .map(|m| vec![m.as_str().to_string()])
                        .unwrap_or_default(),
                };
                functions.push(FunctionInfo {
                    name: caps["name"].to_string(),
                    params,
                    line: line_no,
                    is_async: caps.name("async").is_some(),
                    is_exported: caps.name("export").is_some(),
                });
            }
        }

        functions
    }

    fn extract_classes(&self, lines: &[&str]) -> Vec<ClassInfo> {
        let mut classes: Vec<ClassInfo> = Vec::new();
        let mut open: Option<(ClassInfo, usize)> = None;
        let mut state = ScanState::new(Language::JavaScript);

        for (idx, line) in lines.iter().enumerate() {
            let line_no = idx + 1;
            let depth_before = state.brace_depth();
            state.advance(line);

            if let Some(caps) = CLASS_DECL.captures(line) {
                if let Some((done, _)) = open.take() {
                    classes.push(done);
                }
                open = Some((
                    ClassInfo {
                        name: caps["name"].to_string(),
                        superclass: caps.name("super").map(|m| m.as_str().to_string()),
                        methods: Vec::new(),
                        properties: Vec::new(),
                        constructor_params: Vec::new(),
                        line: line_no,
                    },
                    depth_before,
                ));
                continue;
            }

            // Class closed on this line.
            let closed = open
                .as_ref()
                .is_some_and(|(_, depth)| state.brace_depth() <= *depth && !line.trim().is_empty());
            if closed {
                if let Some((done, _)) = open.take() {
                    classes.push(done);
                }
                continue;
            }

            let Some((class, class_depth)) = open.as_mut() else {
                continue;
            };

            // Members sit one level inside the class body.
            if depth_before == *class_depth + 1 {
                if let Some(caps) = METHOD_DECL.captures(line) {
                    let name = caps["name"].to_string();
                    if !matches!(name.as_str(), "if" | "for" | "while" | "switch" | "catch") {
                        if name == "constructor" {
                            class.constructor_params =
                                split_params(caps.name("params").map_or("", |m| m.as_str()));
                        }
                        class.methods.push(name);
                        continue;
                    }
                }
            }

            if let Some(caps) = PROPERTY_ASSIGN.captures(line) {
                let name = caps["name"].to_string();
                if !class.properties.contains(&name) {
                    class.properties.push(name);
                }
            }
        }

        if let Some((done, _)) = open {
            classes.push(done);
        }

        classes
    }

    fn extract_constants(&self, lines: &[&str]) -> Vec<ConstantInfo> {
        let mut constants = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            if let Some(caps) = CONST_UPPER.captures(line) {
                constants.push(ConstantInfo {
                    name: caps["name"].to_string(),
                    line: idx + 1,
                });
            } else if let Some(caps) = CONFIG_DECL.captures(line) {
                constants.push(ConstantInfo {
                    name: caps["name"].to_string(),
                    line: idx + 1,
                });
            }
        }

        constants
    }
}

/// Relative (project-local) module path per the leading-dot heuristic
fn is_relative(module: &str) -> bool {
    module.starts_with('.') || module.starts_with('/')
}

/// Split a parameter list on commas, stripping defaults and cheap type
/// annotations
fn split_params(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|p| {
            p.split(['=', ':'])
                .next()
                .unwrap_or("")
                .trim()
                .trim_start_matches("...")
                .to_string()
        })
        .filter(|p| !p.is_empty())
        .collect()
}
