use crate::ecma::EcmaRules;
use crate::python::PythonRules;
use crate::rust_lang::RustRules;
use crate::types::{ClassInfo, ConstantInfo, ExportInfo, FunctionInfo, ImportInfo};
use atlas_chunker::Language;

/// Per-language extraction capability.
///
/// Each pass takes the content pre-split into lines and returns what it
/// found, with 1-based local line numbers. Passes are pure: no shared
/// state, no ordering requirements between them. Unimplemented passes
/// default to empty, which is the correct best-effort answer for
/// languages the pattern set does not cover.
pub trait LanguageRules: Send + Sync {
    /// The language this rule set covers
    fn language(&self) -> Language;

    /// Import/require statements
    fn extract_imports(&self, _lines: &[&str]) -> Vec<ImportInfo> {
        Vec::new()
    }

    /// Export statements
    fn extract_exports(&self, _lines: &[&str]) -> Vec<ExportInfo> {
        Vec::new()
    }

    /// Function declarations and function-valued assignments
    fn extract_functions(&self, _lines: &[&str]) -> Vec<FunctionInfo> {
        Vec::new()
    }

    /// Class-like declarations with their members
    fn extract_classes(&self, _lines: &[&str]) -> Vec<ClassInfo> {
        Vec::new()
    }

    /// Constant and configuration declarations
    fn extract_constants(&self, _lines: &[&str]) -> Vec<ConstantInfo> {
        Vec::new()
    }
}

/// Rule set for languages without dedicated patterns: every pass empty
struct FallbackRules;

impl LanguageRules for FallbackRules {
    fn language(&self) -> Language {
        Language::Unknown
    }
}

/// Look up the rule set for a language.
///
/// JavaScript and TypeScript share the ECMA set; Go, Java, C#, Swift and
/// Kotlin are close enough in surface syntax that the ECMA function and
/// class patterns give usable best-effort results for them too.
#[must_use]
pub fn rules_for(language: Language) -> &'static dyn LanguageRules {
    static ECMA: EcmaRules = EcmaRules;
    static PYTHON: PythonRules = PythonRules;
    static RUST: RustRules = RustRules;
    static FALLBACK: FallbackRules = FallbackRules;

    match language {
        Language::JavaScript
        | Language::TypeScript
        | Language::Go
        | Language::Java
        | Language::CSharp
        | Language::Swift
        | Language::Kotlin => &ECMA,
        Language::Python | Language::Ruby => &PYTHON,
        Language::Rust => &RUST,
        Language::C | Language::Cpp | Language::Unknown => &FALLBACK,
    }
}
