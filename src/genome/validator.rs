//! Genome validation — structural checks plus the "tendency, not fact" lint.
//!
//! Locus descriptions should describe a tendency ("preference for concrete
//! examples"), never assert a fact.  Descriptions that read like factual
//! declarations are reported as warnings; everything else is an error that
//! blocks construction.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::definition::GenomeDef;
use super::locus::Distribution;

/// Categories a locus may be tagged with.
pub const ALLOWED_CATEGORIES: [&str; 4] = ["cognitive", "value", "style", "domain"];

static FACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"\bis a\b", r"\bare\b", r"\bfact\b", r"\btruth\b", r"\bproven\b", r"\bscience\b", r"1\+1="]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// One finding from [`validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Offending locus, or `None` for document-level issues.
    pub locus_id: Option<String>,
    pub message: String,
}

impl ValidationIssue {
    fn error(locus_id: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            locus_id: locus_id.map(String::from),
            message: message.into(),
        }
    }

    fn warning(locus_id: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            locus_id: locus_id.map(String::from),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.locus_id {
            Some(id) => write!(f, "locus '{}': {}", id, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Check a genome definition. Rule-matrix consistency is checked separately
/// by [`crate::rules::RuleMatrix::new`].
pub fn validate(def: &GenomeDef) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if def.version.trim().is_empty() {
        issues.push(ValidationIssue::error(None, "missing 'version'"));
    }
    if def.loci.is_empty() {
        issues.push(ValidationIssue::error(None, "genome has no loci"));
        return issues;
    }

    let mut seen = HashSet::new();
    for locus in &def.loci {
        let id = Some(locus.id.as_str());

        if locus.id.trim().is_empty() {
            issues.push(ValidationIssue::error(None, "locus with empty id"));
        }
        if !seen.insert(locus.id.as_str()) {
            issues.push(ValidationIssue::error(id, "duplicate locus id"));
        }
        if !ALLOWED_CATEGORIES.contains(&locus.category.as_str()) {
            issues.push(ValidationIssue::error(
                id,
                format!("invalid category '{}'", locus.category),
            ));
        }
        if !(locus.variability.is_finite() && locus.variability >= 0.0) {
            issues.push(ValidationIssue::error(id, "variability must be finite and non-negative"));
        }

        match &locus.distribution {
            Distribution::Range(r) => {
                if ![r.min, r.default, r.max].iter().all(|v| v.is_finite()) {
                    issues.push(ValidationIssue::error(
                        id,
                        format!("range bounds must be finite ({} / {} / {})", r.min, r.default, r.max),
                    ));
                } else if !(r.min <= r.default && r.default <= r.max) {
                    issues.push(ValidationIssue::error(
                        id,
                        format!("range violates min <= default <= max ({} / {} / {})", r.min, r.default, r.max),
                    ));
                }
            }
            Distribution::Categorical(weights) => {
                if weights.iter().any(|(_, w)| !(w.is_finite() && w >= 0.0)) {
                    issues.push(ValidationIssue::error(id, "category weights must be finite and non-negative"));
                }
                if !weights.iter().any(|(_, w)| w > 0.0) {
                    issues.push(ValidationIssue::error(id, "at least one category weight must be positive"));
                }
            }
        }

        let description = locus.description.to_lowercase();
        if FACT_PATTERNS.iter().any(|p| p.is_match(&description)) {
            issues.push(ValidationIssue::warning(
                id,
                "description reads like a factual declaration; describe a tendency instead",
            ));
        }
    }

    issues
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn def_with(locus_yaml: &str) -> GenomeDef {
        GenomeDef::from_yaml(&format!("version: \"1\"\nloci:\n{}", locus_yaml)).unwrap()
    }

    #[test]
    fn test_builtin_is_clean() {
        let def = GenomeDef::builtin().unwrap();
        assert!(validate(&def).is_empty(), "{:?}", validate(&def));
    }

    #[test]
    fn test_missing_version_and_loci() {
        let def = GenomeDef::from_yaml("loci: []").unwrap();
        let issues = validate(&def);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.is_error()));
    }

    #[test]
    fn test_invalid_category() {
        let def = def_with(
            "  - { id: x, category: mood, distribution: { type: range, values: { min: 0, max: 1, default: 0.5 } } }\n",
        );
        let issues = validate(&def);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("invalid category 'mood'"));
        assert_eq!(issues[0].locus_id.as_deref(), Some("x"));
    }

    #[test]
    fn test_default_outside_bounds() {
        let def = def_with(
            "  - { id: x, category: style, distribution: { type: range, values: { min: 0.2, max: 0.5, default: 0.9 } } }\n",
        );
        assert!(validate(&def)[0].message.contains("min <= default <= max"));
    }

    #[test]
    fn test_all_zero_weights() {
        let def = def_with(
            "  - { id: t, category: domain, distribution: { type: categorical, values: { a: 0.0, b: 0.0 } } }\n",
        );
        let issues = validate(&def);
        assert!(issues.iter().any(|i| i.message.contains("at least one")));
    }

    #[test]
    fn test_duplicate_ids() {
        let locus = "  - { id: x, category: style, distribution: { type: range, values: { min: 0, max: 1, default: 0.5 } } }\n";
        let def = def_with(&format!("{}{}", locus, locus));
        assert!(validate(&def).iter().any(|i| i.message == "duplicate locus id"));
    }

    #[test]
    fn test_fact_lint_is_warning() {
        let def = def_with(
            "  - { id: x, category: style, description: \"Water is a liquid\", distribution: { type: range, values: { min: 0, max: 1, default: 0.5 } } }\n",
        );
        let issues = validate(&def);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0].to_string().starts_with("locus 'x':"));
    }

    fn single_error(locus_yaml: &str) -> ValidationIssue {
        let issues = validate(&def_with(locus_yaml));
        assert_eq!(issues.len(), 1, "{:?}", issues);
        assert!(issues[0].is_error());
        issues.into_iter().next().unwrap()
    }

    #[test]
    fn test_infinite_weight_rejected() {
        let issue = single_error(
            "  - { id: t, category: domain, distribution: { type: categorical, values: { a: .inf, b: 1.0 } } }\n",
        );
        assert!(issue.message.contains("finite"));
    }

    #[test]
    fn test_infinite_bounds_rejected() {
        let issue = single_error(
            "  - { id: x, category: style, distribution: { type: range, values: { min: -.inf, max: .inf, default: 0.5 } } }\n",
        );
        assert!(issue.message.contains("finite"));
    }

    #[test]
    fn test_infinite_default_rejected() {
        let issue = single_error(
            "  - { id: x, category: style, distribution: { type: range, values: { min: 0, max: .inf, default: .inf } } }\n",
        );
        assert!(issue.message.contains("finite"));
    }

    #[test]
    fn test_non_finite_variability_rejected() {
        for v in [".inf", ".nan"] {
            let issue = single_error(&format!(
                "  - {{ id: x, category: style, variability: {}, distribution: {{ type: range, values: {{ min: 0, max: 1, default: 0.5 }} }} }}\n",
                v
            ));
            assert!(issue.message.contains("variability"));
        }
    }

    #[test]
    fn test_store_refuses_non_finite_genome() {
        let def = def_with(
            "  - { id: t, category: domain, distribution: { type: categorical, values: { a: .inf } } }\n",
        );
        assert!(crate::genome::GenomeStore::from_def(def).is_err());
    }
}
