use crate::rules::LanguageRules;
use crate::types::{ClassInfo, ConstantInfo, ExportInfo, ExportKind, FunctionInfo, ImportInfo};
use atlas_chunker::Language;
use once_cell::sync::Lazy;
use regex::Regex;

static DEF_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<indent>\s*)(?P<async>async\s+)?def\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)?")
        .expect("def pattern")
});

static CLASS_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<indent>\s*)class\s+(?P<name>\w+)\s*(?:\((?P<super>[^)]*)\))?\s*:")
        .expect("class pattern")
});

static IMPORT_PLAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*import\s+(?P<modules>[\w.]+(?:\s*,\s*[\w.]+)*)").expect("import pattern"));

static IMPORT_FROM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*from\s+(?P<module>\.*[\w.]*)\s+import\s+(?P<names>.+)").expect("from pattern")
});

static CONST_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<name>[A-Z][A-Z0-9_]{2,})\s*=").expect("const pattern"));

static SELF_ASSIGN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*self\.(?P<name>\w+)\s*=").expect("self-assign pattern"));

static ALL_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^__all__\s*=\s*\[(?P<names>[^\]]*)\]").expect("__all__ pattern"));

/// Pattern set for Python (and, loosely, Ruby)
pub struct PythonRules;

impl LanguageRules for PythonRules {
    fn language(&self) -> Language {
        Language::Python
    }

    fn extract_imports(&self, lines: &[&str]) -> Vec<ImportInfo> {
        let mut imports = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            let line_no = idx + 1;

            if let Some(caps) = IMPORT_FROM.captures(line) {
                let module = caps["module"].to_string();
                let symbols = caps["names"]
                    .split(',')
                    .map(|n| {
                        n.split_whitespace()
                            .next()
                            .unwrap_or("")
                            .trim_matches('(')
                            .to_string()
                    })
                    .filter(|n| !n.is_empty() && n != "*")
                    .collect();
                imports.push(ImportInfo {
                    is_external: !module.starts_with('.'),
                    symbols,
                    module,
                    line: line_no,
                });
                continue;
            }

            if let Some(caps) = IMPORT_PLAIN.captures(line) {
                for module in caps["modules"].split(',') {
                    let module = module.trim().to_string();
                    if !module.is_empty() {
                        imports.push(ImportInfo {
                            is_external: true,
                            symbols: Vec::new(),
                            module,
                            line: line_no,
                        });
                    }
                }
            }
        }

        imports
    }

    fn extract_exports(&self, lines: &[&str]) -> Vec<ExportInfo> {
        // Python has no export statements; `__all__` is the closest thing.
        let mut exports = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            if let Some(caps) = ALL_DECL.captures(line) {
                for part in caps["names"].split(',') {
                    let name = part.trim().trim_matches(['"', '\'']).to_string();
                    if !name.is_empty() {
                        exports.push(ExportInfo {
                            name,
                            line: idx + 1,
                            kind: ExportKind::Named,
                        });
                    }
                }
            }
        }

        exports
    }

    fn extract_functions(&self, lines: &[&str]) -> Vec<FunctionInfo> {
        let mut functions = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            if let Some(caps) = DEF_DECL.captures(line) {
                // Indented defs are methods or nested helpers; the class
                // pass owns those.
                if !caps["indent"].is_empty() {
                    continue;
                }
                let name = caps["name"].to_string();
                let params = caps
                    .name("params")
                    .map_or("", |m| m.as_str())
                    .split(',')
                    .map(|p| p.split([':', '=']).next().unwrap_or("").trim().to_string())
                    .filter(|p| !p.is_empty() && p != "self" && p != "cls")
                    .collect();
                functions.push(FunctionInfo {
                    is_exported: !name.starts_with('_'),
                    name,
                    params,
                    line: idx + 1,
                    is_async: caps.name("async").is_some(),
                });
            }
        }

        functions
    }

    fn extract_classes(&self, lines: &[&str]) -> Vec<ClassInfo> {
        let mut classes: Vec<ClassInfo> = Vec::new();
        let mut open: Option<(ClassInfo, usize)> = None;

        for (idx, line) in lines.iter().enumerate() {
            let line_no = idx + 1;

            if let Some(caps) = CLASS_DECL.captures(line) {
                if let Some((done, _)) = open.take() {
                    classes.push(done);
                }
                let superclass = caps
                    .name("super")
                    .map(|m| m.as_str().split(',').next().unwrap_or("").trim().to_string())
                    .filter(|s| !s.is_empty() && s != "object");
                open = Some((
                    ClassInfo {
                        name: caps["name"].to_string(),
                        superclass,
                        methods: Vec::new(),
                        properties: Vec::new(),
                        constructor_params: Vec::new(),
                        line: line_no,
                    },
                    caps["indent"].len(),
                ));
                continue;
            }

            // Dedent back to (or past) the class header ends the body.
            let dedented = open.as_ref().is_some_and(|(_, class_indent)| {
                let trimmed = line.trim();
                !trimmed.is_empty() && line.len() - line.trim_start().len() <= *class_indent
            });
            if dedented {
                if let Some((done, _)) = open.take() {
                    classes.push(done);
                }
                continue;
            }

            let Some((class, _)) = open.as_mut() else {
                continue;
            };

            if let Some(caps) = DEF_DECL.captures(line) {
                let name = caps["name"].to_string();
                if name == "__init__" {
                    class.constructor_params = caps
                        .name("params")
                        .map_or("", |m| m.as_str())
                        .split(',')
                        .map(|p| p.split([':', '=']).next().unwrap_or("").trim().to_string())
                        .filter(|p| !p.is_empty() && p != "self")
                        .collect();
                }
                class.methods.push(name);
                continue;
            }

            if let Some(caps) = SELF_ASSIGN.captures(line) {
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

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(content: &str) -> Vec<&str> {
        content.lines().collect()
    }

    #[test]
    fn finds_defs_and_marks_private() {
        let content = "def handle(request, timeout=5):\n    pass\n\nasync def _poll(cursor):\n    pass\n";
        let functions = PythonRules.extract_functions(&lines(content));

        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].name, "handle");
        assert_eq!(functions[0].params, vec!["request", "timeout"]);
        assert!(functions[0].is_exported);

        assert_eq!(functions[1].name, "_poll");
        assert!(functions[1].is_async);
        assert!(!functions[1].is_exported);
    }

    #[test]
    fn finds_imports() {
        let content = "import os, sys\nfrom .util import helper\nfrom pathlib import Path\n";
        let imports = PythonRules.extract_imports(&lines(content));

        assert_eq!(imports.len(), 4);
        assert_eq!(imports[0].module, "os");
        assert_eq!(imports[1].module, "sys");
        assert!(imports[0].is_external);

        assert_eq!(imports[2].module, ".util");
        assert!(!imports[2].is_external);
        assert_eq!(imports[2].symbols, vec!["helper"]);

        assert_eq!(imports[3].module, "pathlib");
        assert_eq!(imports[3].symbols, vec!["Path"]);
    }

    #[test]
    fn finds_class_with_members() {
        let content = r"class Store(BaseStore):
    def __init__(self, path, flush_every=10):
        self.path = path
        self.dirty = False

    def get(self, key):
        return self.path

def outside():
    pass
";
        let classes = PythonRules.extract_classes(&lines(content));

        assert_eq!(classes.len(), 1);
        let class = &classes[0];
        assert_eq!(class.name, "Store");
        assert_eq!(class.superclass.as_deref(), Some("BaseStore"));
        assert_eq!(class.methods, vec!["__init__", "get"]);
        assert_eq!(class.constructor_params, vec!["path", "flush_every"]);
        assert_eq!(class.properties, vec!["path", "dirty"]);
    }

    #[test]
    fn dunder_all_becomes_exports() {
        let content = "__all__ = [\"alpha\", 'beta']\n";
        let exports = PythonRules.extract_exports(&lines(content));

        assert_eq!(exports.len(), 2);
        assert_eq!(exports[0].name, "alpha");
        assert_eq!(exports[1].name, "beta");
    }

    #[test]
    fn finds_module_constants() {
        let content = "MAX_SIZE = 100\nretries = 3\nAPI_URL = 'https://x'\n";
        let constants = PythonRules.extract_constants(&lines(content));

        let names: Vec<&str> = constants.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["MAX_SIZE", "API_URL"]);
    }
}
