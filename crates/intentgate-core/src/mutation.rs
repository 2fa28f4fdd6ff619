//! Mutation classification — refactor vs. intent evolution
//!
//! A write is either AST_REFACTOR (behavior-preserving) or INTENT_EVOLUTION
//! (new or changed behavior). The heuristic is deliberately conservative:
//! when signals are ambiguous the write is reported as evolution, because
//! over-reporting intent change is recoverable and hiding it is not.

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationClass {
    AstRefactor,
    IntentEvolution,
}

impl std::fmt::Display for MutationClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationClass::AstRefactor => f.write_str("AST_REFACTOR"),
            MutationClass::IntentEvolution => f.write_str("INTENT_EVOLUTION"),
        }
    }
}

impl MutationClass {
    /// Parse an explicit caller-supplied class. Anything else is ignored
    /// and the heuristic runs.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "AST_REFACTOR" => Some(Self::AstRefactor),
            "INTENT_EVOLUTION" => Some(Self::IntentEvolution),
            _ => None,
        }
    }
}

/// Any match means the write introduces behavior: new definitions, new
/// exports, new route registrations, or diff-added conditional logic.
const EVOLUTION_SIGNALS: &[&str] = &[
    r"(?m)\b(function|fn|def)\s+\w+\s*\(",
    r"(?m)\b(class|interface|trait|struct)\s+[A-Za-z_]\w*",
    r"(?m)^\+?\s*export\s+(default\s+)?(const|let|var|function|class|async)\b",
    r"(?m)\b(app|router)\.(get|post|put|delete|patch|use)\s*\(",
    r"(?m)^\+\s*if\s*\(",
];

/// Signals of a behavior-preserving shuffle. Each entry is one signal
/// kind; two distinct kinds are required before a write is trusted to be
/// a refactor.
const REFACTOR_SIGNALS: &[&str] = &[
    // paired removed/added declaration lines (rename)
    r"(?m)^-\s*(pub\s+)?(const|let|var|function|fn|class)\b[\s\S]*^\+\s*(pub\s+)?(const|let|var|function|fn|class)\b",
    // whitespace-only diff lines
    r"(?m)^[+-][ \t]*$",
    // import/use line churn
    r"(?m)^[+-]\s*(import\s|use\s|from\s+\S+\s+import|require\s*\()",
    // comment-only diff lines
    r"(?m)^[+-]\s*(//|#\s|/\*|\*\s)",
];

fn matches_any_line(pattern: &str, content: &str) -> bool {
    Regex::new(pattern)
        .map(|re| re.is_match(content))
        .unwrap_or(false)
}

/// Classify a write. Priority: explicit class, then new-file, then
/// evolution signals, then refactor signals, then the conservative default.
pub fn classify_mutation(
    explicit: Option<&str>,
    content: &str,
    is_new_file: bool,
) -> MutationClass {
    if let Some(class) = explicit.and_then(MutationClass::parse) {
        return class;
    }

    if is_new_file {
        return MutationClass::IntentEvolution;
    }

    for pattern in EVOLUTION_SIGNALS {
        if matches_any_line(pattern, content) {
            return MutationClass::IntentEvolution;
        }
    }

    let refactor_hits = REFACTOR_SIGNALS
        .iter()
        .filter(|pattern| matches_any_line(pattern, content))
        .count();
    if refactor_hits >= 2 {
        return MutationClass::AstRefactor;
    }

    MutationClass::IntentEvolution
}
