use crate::walker::FileRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Role a file plays in the project, assigned by path heuristics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileRole {
    EntryPoint,
    ProjectConfig,
    RoutingLayer,
    MiddlewareLayer,
    ServiceLayer,
    DataLayer,
    UtilityLayer,
    Test,
    Documentation,
    Generic,
}

impl FileRole {
    /// Human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EntryPoint => "entry-point",
            Self::ProjectConfig => "project-config",
            Self::RoutingLayer => "routing-layer",
            Self::MiddlewareLayer => "middleware-layer",
            Self::ServiceLayer => "service-layer",
            Self::DataLayer => "data-layer",
            Self::UtilityLayer => "utility-layer",
            Self::Test => "test",
            Self::Documentation => "documentation",
            Self::Generic => "generic",
        }
    }

    /// Ranking weight for the architecture-relevant subset; lower wins
    #[must_use]
    pub const fn priority(self) -> u32 {
        match self {
            Self::EntryPoint => 10,
            Self::ProjectConfig => 20,
            Self::RoutingLayer => 30,
            Self::MiddlewareLayer => 40,
            Self::ServiceLayer => 50,
            Self::DataLayer => 60,
            Self::UtilityLayer => 70,
            Self::Generic => 80,
            Self::Test => 90,
            Self::Documentation => 95,
        }
    }

    /// Candidate for the bounded architecture summary
    #[must_use]
    pub const fn is_architecture_relevant(self) -> bool {
        matches!(
            self,
            Self::EntryPoint
                | Self::ProjectConfig
                | Self::RoutingLayer
                | Self::MiddlewareLayer
                | Self::ServiceLayer
        )
    }
}

struct ClassifierRule {
    role: FileRole,
    /// Match precedence; lower fires first
    priority: u32,
    pattern: &'static Lazy<Regex>,
}

macro_rules! rule_pattern {
    ($name:ident, $pattern:literal) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($pattern).expect("classifier pattern"));
    };
}

rule_pattern!(
    TEST_PATTERN,
    r"(^|/)(tests?|__tests__|spec)/|\.(test|spec)\.[a-z]+$|_test\.[a-z]+$|(^|/)test_[^/]+$"
);
rule_pattern!(
    CONFIG_PATTERN,
    r"(^|/)(package\.json|cargo\.toml|pyproject\.toml|go\.mod|tsconfig\.json|jest\.config\.[a-z]+|webpack\.config\.[a-z]+|vite\.config\.[a-z]+|babel\.config\.[a-z]+|docker-compose\.ya?ml|settings\.py|setup\.py|\.env[^/]*)$"
);
rule_pattern!(
    ENTRY_PATTERN,
    r"(^|/)(main|index|app|server|cli)\.[a-z]+$|(^|/)bin/[^/]+$|(^|/)__main__\.py$"
);
rule_pattern!(
    ROUTING_PATTERN,
    r"rout(e|er|es|ing)|controller|endpoint|(^|/)api(/|\.)"
);
rule_pattern!(MIDDLEWARE_PATTERN, r"middleware|interceptor|guard");
rule_pattern!(
    SERVICE_PATTERN,
    r"service|handler|provider|usecase|use_case|worker"
);
rule_pattern!(
    DATA_PATTERN,
    r"model|schema|entity|repositor|migration|(^|/)(db|database|store|dao)(/|\.|_)"
);
rule_pattern!(
    UTILITY_PATTERN,
    r"util|helper|(^|/)(lib|common|shared)(/|\.)"
);
rule_pattern!(DOCS_PATTERN, r"\.(md|mdx|rst|adoc|txt)$|(^|/)docs?/");

/// Ordered path-pattern classifier.
///
/// Rules fire in ascending priority; the first match wins, which makes
/// the assignment deterministic and independent of the surrounding file
/// set.
pub struct Classifier {
    rules: Vec<ClassifierRule>,
}

impl Classifier {
    /// Classifier with the built-in rule table
    #[must_use]
    pub fn new() -> Self {
        let mut rules = vec![
            ClassifierRule {
                role: FileRole::Test,
                priority: 10,
                pattern: &TEST_PATTERN,
            },
            ClassifierRule {
                role: FileRole::ProjectConfig,
                priority: 20,
                pattern: &CONFIG_PATTERN,
            },
            ClassifierRule {
                role: FileRole::EntryPoint,
                priority: 30,
                pattern: &ENTRY_PATTERN,
            },
            ClassifierRule {
                role: FileRole::RoutingLayer,
                priority: 40,
                pattern: &ROUTING_PATTERN,
            },
            ClassifierRule {
                role: FileRole::MiddlewareLayer,
                priority: 50,
                pattern: &MIDDLEWARE_PATTERN,
            },
            ClassifierRule {
                role: FileRole::ServiceLayer,
                priority: 60,
                pattern: &SERVICE_PATTERN,
            },
            ClassifierRule {
                role: FileRole::DataLayer,
                priority: 70,
                pattern: &DATA_PATTERN,
            },
            ClassifierRule {
                role: FileRole::UtilityLayer,
                priority: 80,
                pattern: &UTILITY_PATTERN,
            },
            ClassifierRule {
                role: FileRole::Documentation,
                priority: 90,
                pattern: &DOCS_PATTERN,
            },
        ];
        rules.sort_by_key(|r| r.priority);
        Self { rules }
    }

    /// Classify one record by its relative path
    #[must_use]
    pub fn classify(&self, record: &FileRecord) -> FileRole {
        let path = record.relative_path.to_lowercase();

        for rule in &self.rules {
            if rule.pattern.is_match(&path) {
                return rule.role;
            }
        }

        FileRole::Generic
    }

    /// Refine the roles of a whole record set in place
    pub fn classify_all(&self, records: &mut [FileRecord]) {
        for record in records.iter_mut() {
            record.role = self.classify(record);
        }
    }

    /// The bounded top-N subset worth summarizing first.
    ///
    /// Ordered by role priority, then size (larger preferred), then path,
    /// so the selection is stable across runs.
    #[must_use]
    pub fn architecture_relevant<'a>(
        &self,
        records: &'a [FileRecord],
        limit: usize,
    ) -> Vec<&'a FileRecord> {
        let mut relevant: Vec<&FileRecord> = records
            .iter()
            .filter(|r| r.role.is_architecture_relevant())
            .collect();

        relevant.sort_by(|a, b| {
            a.role
                .priority()
                .cmp(&b.role.priority())
                .then_with(|| b.size_bytes.cmp(&a.size_bytes))
                .then_with(|| a.relative_path.cmp(&b.relative_path))
        });
        relevant.truncate(limit);
        relevant
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
