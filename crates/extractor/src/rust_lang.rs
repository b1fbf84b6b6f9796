use crate::rules::LanguageRules;
use crate::types::{ClassInfo, ConstantInfo, ExportInfo, ExportKind, FunctionInfo, ImportInfo};
use atlas_chunker::Language;
use once_cell::sync::Lazy;
use regex::Regex;

static FN_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?P<vis>pub(?:\([^)]*\))?\s+)?(?:const\s+)?(?P<async>async\s+)?(?:unsafe\s+)?(?:extern\s+\S+\s+)?fn\s+(?P<name>\w+)\s*(?:<[^>]*>)?\s*\((?P<params>[^)]*)\)?",
    )
    .expect("fn pattern")
});

static TYPE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?P<vis>pub(?:\([^)]*\))?\s+)?(?P<kind>struct|enum|trait|union)\s+(?P<name>\w+)",
    )
    .expect("type pattern")
});

static IMPL_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*impl(?:<[^>]*>)?\s+(?:(?P<trait>[\w:]+)\s+for\s+)?(?P<name>[\w:]+)")
        .expect("impl pattern")
});

static USE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<vis>pub\s+)?use\s+(?P<path>\w+(?:::\w+)*)(?:::\{(?P<names>[^}]*)\})?")
        .expect("use pattern")
});

static CONST_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:const|static)\s+(?P<name>[A-Z][A-Z0-9_]*)\s*:")
        .expect("const pattern")
});

static FIELD_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s{4}(?:pub(?:\([^)]*\))?\s+)?(?P<name>[a-z_]\w*)\s*:").expect("field pattern"));

/// Pattern set for Rust sources
pub struct RustRules;

impl LanguageRules for RustRules {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn extract_imports(&self, lines: &[&str]) -> Vec<ImportInfo> {
        let mut imports = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            if let Some(caps) = USE_DECL.captures(line) {
                let path = caps["path"].to_string();
                let symbols = caps
                    .name("names")
                    .map(|m| {
                        m.as_str()
                            .split(',')
                            .map(|n| n.split_whitespace().next().unwrap_or("").to_string())
                            .filter(|n| !n.is_empty())
                            .collect()
                    })
                    .unwrap_or_default();
                let is_external = !(path.starts_with("crate")
                    || path.starts_with("super")
                    || path.starts_with("self"));
                imports.push(ImportInfo {
                    module: path,
                    symbols,
                    line: idx + 1,
                    is_external,
                });
            }
        }

        imports
    }

    fn extract_exports(&self, lines: &[&str]) -> Vec<ExportInfo> {
        // `pub` items are the module surface; re-exports double as both.
        let mut exports = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            if let Some(caps) = FN_DECL.captures(line) {
                if caps.name("vis").is_some() {
                    exports.push(ExportInfo {
                        name: caps["name"].to_string(),
                        line: idx + 1,
                        kind: ExportKind::Named,
                    });
                    continue;
                }
            }
            if let Some(caps) = TYPE_DECL.captures(line) {
                if caps.name("vis").is_some() {
                    exports.push(ExportInfo {
                        name: caps["name"].to_string(),
                        line: idx + 1,
                        kind: ExportKind::Named,
                    });
                    continue;
                }
            }
            if let Some(caps) = USE_DECL.captures(line) {
                if caps.name("vis").is_some() {
                    let name = caps
                        .name("names")
                        .map_or_else(
                            || {
                                caps["path"]
                                    .rsplit("::")
                                    .next()
                                    .unwrap_or(&caps["path"])
                                    .to_string()
                            },
                            |m| m.as_str().trim().to_string(),
                        );
                    exports.push(ExportInfo {
                        name,
                        line: idx + 1,
                        kind: ExportKind::Named,
                    });
                }
            }
        }

        exports
    }

    fn extract_functions(&self, lines: &[&str]) -> Vec<FunctionInfo> {
        let mut functions = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            if let Some(caps) = FN_DECL.captures(line) {
                let params = caps
                    .name("params")
                    .map_or("", |m| m.as_str())
                    .split(',')
                    .map(|p| p.split(':').next().unwrap_or("").trim().to_string())
                    .filter(|p| {
                        !p.is_empty() && p != "&self" && p != "&mut self" && p != "self"
                    })
                    .collect();
                functions.push(FunctionInfo {
                    name: caps["name"].to_string(),
                    params,
                    line: idx + 1,
                    is_async: caps.name("async").is_some(),
                    is_exported: caps.name("vis").is_some(),
                });
            }
        }

        functions
    }

    fn extract_classes(&self, lines: &[&str]) -> Vec<ClassInfo> {
        let mut classes: Vec<ClassInfo> = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            let line_no = idx + 1;

            if let Some(caps) = TYPE_DECL.captures(line) {
                let mut fields = Vec::new();
                // Struct fields: single-level indent until the closing brace.
                if caps["kind"] == *"struct" && line.contains('{') {
                    for body_line in lines.iter().skip(idx + 1) {
                        if body_line.trim_start().starts_with('}') {
                            break;
                        }
                        if let Some(field) = FIELD_DECL.captures(body_line) {
                            fields.push(field["name"].to_string());
                        }
                    }
                }
                classes.push(ClassInfo {
                    name: caps["name"].to_string(),
                    superclass: None,
                    methods: Vec::new(),
                    properties: fields,
                    constructor_params: Vec::new(),
                    line: line_no,
                });
                continue;
            }

            if let Some(caps) = IMPL_DECL.captures(line) {
                let name = caps["name"].to_string();
                let trait_name = caps.name("trait").map(|m| m.as_str().to_string());
                // Fold methods into the struct's entry when it is in the
                // same chunk; otherwise record the impl itself.
                let methods = collect_impl_methods(lines, idx);
                if let Some(class) = classes.iter_mut().find(|c| c.name == name) {
                    class.methods.extend(methods);
                } else {
                    classes.push(ClassInfo {
                        name,
                        superclass: trait_name,
                        methods,
                        properties: Vec::new(),
                        constructor_params: Vec::new(),
                        line: line_no,
                    });
                }
            }
        }

        classes
    }

    fn extract_constants(&self, lines: &[&str]) -> Vec<ConstantInfo> {
        let mut constants = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            if let Some(caps) = CONST_DECL.captures(line) {
                constants.push(ConstantInfo {
                    name: caps["name"].to_string(),
                    line: idx + 1,
                });
            }
        }

        constants
    }
}

/// Method names declared directly inside an impl block starting at
/// `impl_idx`
fn collect_impl_methods(lines: &[&str], impl_idx: usize) -> Vec<String> {
    let mut methods = Vec::new();

    for line in lines.iter().skip(impl_idx + 1) {
        // A column-zero closing brace ends the impl block.
        if line.starts_with('}') {
            break;
        }
        if let Some(caps) = FN_DECL.captures(line) {
            methods.push(caps["name"].to_string());
        }
    }

    methods
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(content: &str) -> Vec<&str> {
        content.lines().collect()
    }

    #[test]
    fn finds_functions_and_visibility() {
        let content =
            "pub async fn serve(addr: SocketAddr, pool: Pool) -> Result<()> {\n}\nfn helper(x: usize) -> usize {\n}\n";
        let functions = RustRules.extract_functions(&lines(content));

        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].name, "serve");
        assert_eq!(functions[0].params, vec!["addr", "pool"]);
        assert!(functions[0].is_async);
        assert!(functions[0].is_exported);
        assert!(!functions[1].is_exported);
    }

    #[test]
    fn self_params_are_dropped() {
        let content = "    pub fn len(&self) -> usize {\n    pub fn push(&mut self, item: T) {\n";
        let functions = RustRules.extract_functions(&lines(content));

        assert!(functions[0].params.is_empty());
        assert_eq!(functions[1].params, vec!["item"]);
    }

    #[test]
    fn finds_use_statements() {
        let content =
            "use std::collections::HashMap;\nuse crate::walker::FileRecord;\nuse serde::{Serialize, Deserialize};\n";
        let imports = RustRules.extract_imports(&lines(content));

        assert_eq!(imports.len(), 3);
        assert!(imports[0].is_external);
        assert_eq!(imports[0].module, "std::collections::HashMap");
        assert!(!imports[1].is_external);
        assert_eq!(imports[2].symbols, vec!["Serialize", "Deserialize"]);
    }

    #[test]
    fn struct_and_impl_fold_together() {
        let content = r"pub struct Session {
    entries: HashMap<String, u64>,
    pub hits: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    fn evict(&mut self) {}
}
";
        let classes = RustRules.extract_classes(&lines(content));

        assert_eq!(classes.len(), 1);
        let class = &classes[0];
        assert_eq!(class.name, "Session");
        assert_eq!(class.properties, vec!["entries", "hits"]);
        assert_eq!(class.methods, vec!["new", "evict"]);
    }

    #[test]
    fn trait_impl_without_struct_keeps_trait_name() {
        let content = "impl Display for Report {\n    fn fmt(&self, f: &mut Formatter) -> Result {\n    }\n}\n";
        let classes = RustRules.extract_classes(&lines(content));

        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "Report");
        assert_eq!(classes[0].superclass.as_deref(), Some("Display"));
        assert_eq!(classes[0].methods, vec!["fmt"]);
    }

    #[test]
    fn pub_items_are_exports() {
        let content =
            "pub fn run() {}\npub struct Engine;\nstruct Hidden;\npub use crate::types::Chunk;\n";
        let exports = RustRules.extract_exports(&lines(content));

        let names: Vec<&str> = exports.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["run", "Engine", "Chunk"]);
    }

    #[test]
    fn finds_consts_and_statics() {
        let content =
            "pub const MAX_DEPTH: usize = 32;\nstatic DEFAULT_BATCH: usize = 5;\nconst lower: usize = 1;\n";
        let constants = RustRules.extract_constants(&lines(content));

        let names: Vec<&str> = constants.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["MAX_DEPTH", "DEFAULT_BATCH"]);
    }
}
