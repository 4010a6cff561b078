//! Rule matrix — maps sampled locus values to prompt text.
//!
//! Rules are typed by locus kind: range loci carry an ordered list of
//! inclusive intervals, categorical loci carry a label → text table.  The
//! matrix is checked against the genome when it is built, so a rule that
//! names an unknown locus, or the wrong kind of locus, fails construction
//! instead of silently producing nothing at projection time.
//!
//! # Example YAML
//!
//! ```yaml
//! humor_density:
//!   - { range: [0.0, 0.2], text: "Strictly professional. No jokes or sarcasm." }
//!   - { range: [0.2, 0.5], text: "Occasional dry wit and lightheartedness." }
//! topic_attractors:
//!   section: OPTIONAL_FLAVOR
//!   values:
//!     cybernetics: "You view problems through the lens of feedback loops."
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{PersonaError, Result};
use crate::genome::locus::{Distribution, Locus};

// ============================================================================
// Rule attributes
// ============================================================================

/// Register of a fragment, used by the expression-bandwidth filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Neutral,
    Technical,
    Analogical,
}

impl Tone {
    /// Technical and analogical phrasing is hidden at low intimacy.
    pub fn is_bandwidth_gated(self) -> bool {
        matches!(self, Self::Technical | Self::Analogical)
    }
}

/// Section of the structured prompt a fragment lands in, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromptSection {
    Role,
    Mission,
    Policies,
    #[default]
    Style,
    OutputFormat,
    OptionalFlavor,
}

impl PromptSection {
    pub const ALL: [PromptSection; 6] = [
        Self::Role,
        Self::Mission,
        Self::Policies,
        Self::Style,
        Self::OutputFormat,
        Self::OptionalFlavor,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Self::Role => "ROLE",
            Self::Mission => "MISSION",
            Self::Policies => "POLICIES",
            Self::Style => "STYLE",
            Self::OutputFormat => "OUTPUT_FORMAT",
            Self::OptionalFlavor => "OPTIONAL_FLAVOR",
        }
    }
}

// ============================================================================
// Rule shapes
// ============================================================================

/// One `(low, high, text)` entry for a range locus. Both ends inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRule {
    pub range: [f64; 2],
    pub text: String,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub section: PromptSection,
}

impl IntervalRule {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.range[0] && value <= self.range[1]
    }
}

/// Label → text table for a categorical locus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRules {
    pub values: HashMap<String, String>,
    #[serde(default)]
    pub section: PromptSection,
    /// Overrides the engine's softened template for this locus.
    #[serde(default)]
    pub softened: Option<String>,
}

/// Rules for one locus, typed by the locus kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocusRules {
    Intervals(Vec<IntervalRule>),
    Labels(LabelRules),
}

impl LocusRules {
    fn kind(&self) -> &'static str {
        match self {
            Self::Intervals(_) => "range",
            Self::Labels(_) => "categorical",
        }
    }
}

// ============================================================================
// RuleMatrix
// ============================================================================

/// Rules keyed by locus id, validated against a genome.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleMatrix {
    entries: HashMap<String, LocusRules>,
}

impl RuleMatrix {
    /// Build a matrix, checking every entry against `loci`.
    pub fn new(entries: HashMap<String, LocusRules>, loci: &[Locus]) -> Result<Self> {
        for (id, rules) in &entries {
            let locus = loci
                .iter()
                .find(|l| &l.id == id)
                .ok_or_else(|| PersonaError::Validation(format!("rules reference unknown locus '{}'", id)))?;

            match (&locus.distribution, rules) {
                (Distribution::Range(_), LocusRules::Intervals(intervals)) => {
                    for rule in intervals {
                        if rule.range[0] > rule.range[1] {
                            return Err(PersonaError::Validation(format!(
                                "locus '{}': interval [{}, {}] has low > high",
                                id, rule.range[0], rule.range[1]
                            )));
                        }
                    }
                }
                (Distribution::Categorical(weights), LocusRules::Labels(labels)) => {
                    for label in labels.values.keys() {
                        if weights.get(label).is_none() {
                            return Err(PersonaError::Validation(format!(
                                "locus '{}': rule label '{}' is not a category",
                                id, label
                            )));
                        }
                    }
                }
                (dist, rules) => {
                    return Err(PersonaError::Validation(format!(
                        "locus '{}' is {} but its rules are {}",
                        id,
                        dist.kind(),
                        rules.kind()
                    )));
                }
            }
        }

        for locus in loci {
            if !entries.contains_key(&locus.id) {
                tracing::warn!(locus_id = %locus.id, "locus has no prompt rules; its fragment will be skipped");
            }
        }

        Ok(Self { entries })
    }

    pub fn get(&self, locus_id: &str) -> Option<&LocusRules> {
        self.entries.get(locus_id)
    }

    /// First interval rule of `locus_id` containing `value`.
    pub fn match_interval(&self, locus_id: &str, value: f64) -> Option<&IntervalRule> {
        match self.entries.get(locus_id)? {
            LocusRules::Intervals(rules) => rules.iter().find(|r| r.contains(value)),
            LocusRules::Labels(_) => None,
        }
    }

    /// Label rules of a categorical locus.
    pub fn labels(&self, locus_id: &str) -> Option<&LabelRules> {
        match self.entries.get(locus_id)? {
            LocusRules::Labels(rules) => Some(rules),
            LocusRules::Intervals(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::locus::{CategoryWeights, RangeValues, StanceRole};

    fn loci() -> Vec<Locus> {
        vec![
            Locus {
                id: "depth".into(),
                category: "cognitive".into(),
                display_priority: 1,
                description: String::new(),
                distribution: Distribution::Range(RangeValues { min: 0.0, max: 1.0, default: 0.5 }),
                weight: 1.0,
                variability: 0.1,
                stance_role: StanceRole::Rigor,
                attractor: false,
            },
            Locus {
                id: "topics".into(),
                category: "domain".into(),
                display_priority: 2,
                description: String::new(),
                distribution: Distribution::Categorical(CategoryWeights(vec![
                    ("a".into(), 0.5),
                    ("b".into(), 0.5),
                ])),
                weight: 1.0,
                variability: 0.1,
                stance_role: StanceRole::None,
                attractor: true,
            },
        ]
    }

    fn entries(yaml: &str) -> HashMap<String, LocusRules> {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_untagged_shapes() {
        let e = entries(
            r#"
depth:
  - { range: [0.0, 0.3], text: "simple", tone: analogical, section: MISSION }
  - { range: [0.3, 1.0], text: "deep" }
topics:
  section: OPTIONAL_FLAVOR
  values: { a: "about a", b: "about b" }
"#,
        );
        assert!(matches!(e["depth"], LocusRules::Intervals(_)));
        assert!(matches!(e["topics"], LocusRules::Labels(_)));

        let m = RuleMatrix::new(e, &loci()).unwrap();
        let hit = m.match_interval("depth", 0.1).unwrap();
        assert_eq!(hit.tone, Tone::Analogical);
        assert_eq!(hit.section, PromptSection::Mission);
        assert_eq!(m.labels("topics").unwrap().section, PromptSection::OptionalFlavor);
    }

    #[test]
    fn test_first_match_wins_inclusive() {
        let e = entries(
            r#"
depth:
  - { range: [0.0, 0.3], text: "low" }
  - { range: [0.3, 1.0], text: "high" }
"#,
        );
        let m = RuleMatrix::new(e, &loci()).unwrap();
        assert_eq!(m.match_interval("depth", 0.3).unwrap().text, "low");
        assert_eq!(m.match_interval("depth", 1.0).unwrap().text, "high");
        assert!(m.match_interval("depth", 1.5).is_none());
        assert!(m.match_interval("missing", 0.5).is_none());
    }

    #[test]
    fn test_unknown_locus_rejected() {
        let e = entries("ghost:\n  - { range: [0.0, 1.0], text: x }\n");
        let err = RuleMatrix::new(e, &loci()).unwrap_err();
        assert!(err.to_string().contains("unknown locus 'ghost'"));
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let e = entries("topics:\n  - { range: [0.0, 1.0], text: x }\n");
        let err = RuleMatrix::new(e, &loci()).unwrap_err();
        assert!(err.to_string().contains("is categorical but its rules are range"));
    }

    #[test]
    fn test_unknown_label_rejected() {
        let e = entries("topics:\n  values: { c: nope }\n");
        assert!(RuleMatrix::new(e, &loci()).is_err());
    }

    #[test]
    fn test_inverted_interval_rejected() {
        let e = entries("depth:\n  - { range: [0.8, 0.2], text: x }\n");
        assert!(RuleMatrix::new(e, &loci()).is_err());
    }

    #[test]
    fn test_section_order() {
        let mut sorted = PromptSection::ALL.to_vec();
        sorted.reverse();
        sorted.sort();
        assert_eq!(sorted, PromptSection::ALL.to_vec());
        assert_eq!(PromptSection::OutputFormat.header(), "OUTPUT_FORMAT");
    }
}
