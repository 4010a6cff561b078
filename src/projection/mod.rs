//! Projection engine — one stochastic pass over the genome.
//!
//! ```text
//! project(influence, intimacy)
//!   1. mode      = influence > threshold ? social : strict
//!   2. affect   ← impulse(mode)
//!   3. range loci       → blended sample → first matching interval rule
//!   4. categorical loci → weighted pick  → label rule (suppressed / softened)
//!   5. session habits   → [OPTIONAL_FLAVOR] (suppressed like attractors)
//!   6. bandwidth filter over the fragment list
//!   7. ProjectionRecord { traits, fragments, prompt }
//! ```
//!
//! Appending the record to the history ring and advancing the lifecycle
//! are left to the session that owns those pieces.

pub mod augmenter;
pub mod habits;
pub mod sampler;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::affect::{AffectSimulator, ImpulseProfile};
use crate::config::EngineConfig;
use crate::genome::{Distribution, GenomeStore};
use crate::rules::{PromptSection, RuleMatrix, Tone};

pub use augmenter::{render_prompt, Fragment, ROLE_LINE};
pub use habits::Habit;

// ============================================================================
// Record types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    /// High influence; supportive impulse.
    Social,
    /// Low influence; critical impulse.
    Strict,
}

impl ProjectionMode {
    pub fn classify(influence: f64, threshold: f64) -> Self {
        if influence > threshold {
            Self::Social
        } else {
            Self::Strict
        }
    }

    pub fn impulse(self) -> ImpulseProfile {
        match self {
            Self::Social => ImpulseProfile::Supportive,
            Self::Strict => ImpulseProfile::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Social => "social",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sampled trait: numeric for range loci, a label for categorical ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraitValue {
    Number(f64),
    Label(String),
}

impl TraitValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Label(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            Self::Label(l) => Some(l),
            Self::Number(_) => None,
        }
    }
}

/// Immutable snapshot of one projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub mode: ProjectionMode,
    pub influence: f64,
    pub intimacy: f64,
    pub traits: BTreeMap<String, TraitValue>,
    pub fragments: Vec<Fragment>,
    pub prompt: String,
}

// ============================================================================
// Engine
// ============================================================================

/// Projection thresholds and phrasing, taken from [`EngineConfig`].
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    mode_threshold: f64,
    attractor_suppress_below: f64,
    softened_below: f64,
    bandwidth_below: f64,
    neutral_fallback: String,
    softened_template: String,
    habits: Vec<Habit>,
}

impl ProjectionEngine {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            mode_threshold: config.mode_threshold,
            attractor_suppress_below: config.attractor_suppress_below,
            softened_below: config.softened_below,
            bandwidth_below: config.bandwidth_below,
            neutral_fallback: config.neutral_fallback.clone(),
            softened_template: config.softened_template.clone(),
            habits: Vec::new(),
        }
    }

    /// Attach the session's habits; they are appended to every projection
    /// that is not attractor-suppressed.
    pub fn with_habits(mut self, habits: Vec<Habit>) -> Self {
        self.habits = habits;
        self
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    /// Sample every locus and assemble a record.
    ///
    /// `influence` and `intimacy` are clamped into [0, 1].  The affect
    /// impulse for the derived mode is applied before sampling.
    pub fn project<R: Rng + ?Sized>(
        &self,
        store: &GenomeStore,
        rules: &RuleMatrix,
        affect: &mut AffectSimulator,
        influence: f64,
        intimacy: f64,
        rng: &mut R,
    ) -> ProjectionRecord {
        let influence = unit(influence);
        let intimacy = unit(intimacy);

        let mode = ProjectionMode::classify(influence, self.mode_threshold);
        affect.apply_impulse(mode.impulse());

        let mut traits = BTreeMap::new();
        let mut fragments = Vec::new();

        for locus in store.iter() {
            match &locus.distribution {
                Distribution::Range(range) => {
                    let value = sampler::sample_range(range, influence, rng);
                    tracing::debug!(locus_id = %locus.id, value, "sampled range locus");
                    traits.insert(locus.id.clone(), TraitValue::Number(value));

                    if let Some(rule) = rules.match_interval(&locus.id, value) {
                        fragments.push(Fragment {
                            locus_id: locus.id.clone(),
                            text: rule.text.clone(),
                            tone: rule.tone,
                            section: rule.section,
                        });
                    }
                }
                Distribution::Categorical(weights) => {
                    let Some(selected) = sampler::select_category(weights, rng) else {
                        tracing::warn!(locus_id = %locus.id, "categorical locus has no positive weight");
                        continue;
                    };
                    tracing::debug!(locus_id = %locus.id, selected, "selected category");
                    traits.insert(locus.id.clone(), TraitValue::Label(selected.to_string()));

                    if locus.attractor && influence < self.attractor_suppress_below {
                        continue;
                    }
                    let Some(label_rules) = rules.labels(&locus.id) else {
                        continue;
                    };
                    let text = if intimacy < self.softened_below {
                        let template = label_rules
                            .softened
                            .as_deref()
                            .unwrap_or(self.softened_template.as_str());
                        Some(augmenter::soften(template, selected))
                    } else {
                        label_rules.values.get(selected).cloned()
                    };
                    if let Some(text) = text {
                        fragments.push(Fragment {
                            locus_id: locus.id.clone(),
                            text,
                            tone: Tone::Neutral,
                            section: label_rules.section,
                        });
                    }
                }
            }
        }

        if influence >= self.attractor_suppress_below {
            fragments.extend(self.habits.iter().map(|habit| Fragment {
                locus_id: habits::HABIT_SOURCE.to_string(),
                text: habit.text.clone(),
                tone: Tone::Neutral,
                section: PromptSection::OptionalFlavor,
            }));
        }

        if intimacy < self.bandwidth_below {
            augmenter::apply_bandwidth(&mut fragments, &self.neutral_fallback);
        }

        let prompt = render_prompt(&fragments);
        ProjectionRecord {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            mode,
            influence,
            intimacy,
            traits,
            fragments,
            prompt,
        }
    }
}

fn unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Minimal record for ring and session tests.
#[cfg(test)]
pub(crate) fn test_record(influence: f64) -> ProjectionRecord {
    ProjectionRecord {
        id: Uuid::new_v4(),
        timestamp: Utc::now(),
        mode: ProjectionMode::classify(influence, 0.5),
        influence,
        intimacy: 1.0,
        traits: BTreeMap::new(),
        fragments: Vec::new(),
        prompt: String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================
