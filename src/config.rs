//! Engine tunables — drift, lifecycle, affect, and projection constants.
//!
//! Every field has a serde default, so a config YAML only needs to name the
//! values it overrides:
//!
//! ```yaml
//! drift_multiplier: 0.1
//! thresholds:
//!   locked: 50
//! locked_stance_policy: allow
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PersonaError, Result};
use crate::projection::habits::HABIT_POOL;

/// Largest accepted `history_capacity`.
pub const MAX_HISTORY_CAPACITY: usize = 10_000;

// ============================================================================
// Nested sections
// ============================================================================

/// Interaction-count thresholds for the lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifecycleThresholds {
    #[serde(default = "default_stabilizing")]
    pub stabilizing: f64,
    #[serde(default = "default_stable")]
    pub stable: f64,
    #[serde(default = "default_locked")]
    pub locked: f64,
}

fn default_stabilizing() -> f64 {
    5.0
}
fn default_stable() -> f64 {
    15.0
}
fn default_locked() -> f64 {
    30.0
}

impl Default for LifecycleThresholds {
    fn default() -> Self {
        Self {
            stabilizing: default_stabilizing(),
            stable: default_stable(),
            locked: default_locked(),
        }
    }
}

/// A discrete (pleasure, arousal, dominance) jump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PadDelta {
    pub p: f64,
    pub a: f64,
    pub d: f64,
}

/// The two projection impulse profiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpulseProfiles {
    /// Applied when influence is above the mode threshold.
    #[serde(default = "default_supportive")]
    pub supportive: PadDelta,
    /// Applied otherwise.
    #[serde(default = "default_critical")]
    pub critical: PadDelta,
}

fn default_supportive() -> PadDelta {
    PadDelta { p: 0.2, a: 0.1, d: -0.05 }
}
fn default_critical() -> PadDelta {
    PadDelta { p: -0.1, a: 0.2, d: 0.3 }
}

impl Default for ImpulseProfiles {
    fn default() -> Self {
        Self {
            supportive: default_supportive(),
            critical: default_critical(),
        }
    }
}

/// What `apply_stance` does once the lifecycle is LOCKED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockedStancePolicy {
    /// Reject the whole call with `PersonaError::Locked`.
    #[default]
    Reject,
    /// Keep recomputing defaults, variability, and affect baseline.
    Allow,
}

/// Stance whose mood baseline a session starts from, at construction and
/// on reset. Loci keep the genome file's defaults until a stance is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialStance {
    pub r: f64,
    pub w: f64,
    pub c: f64,
}

impl Default for InitialStance {
    fn default() -> Self {
        Self { r: 0.5, w: 0.5, c: 0.5 }
    }
}

// ============================================================================
// EngineConfig
// ============================================================================

/// All runtime tunables for one persona session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Scale applied to `direction · variability` for one drift nudge.
    #[serde(default = "default_drift_multiplier")]
    pub drift_multiplier: f64,
    /// Interaction weight recorded after a successful drift.
    #[serde(default = "default_drift_weight")]
    pub drift_weight: f64,
    /// Interaction weight recorded after a projection.
    #[serde(default = "default_projection_weight")]
    pub projection_weight: f64,
    /// Fraction of the distance to baseline recovered per tick, in (0, 1).
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,
    /// Wall-clock cadence of the decay driver.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Influence above this is "social"; at or below it is "strict".
    #[serde(default = "default_mode_threshold")]
    pub mode_threshold: f64,
    /// Attractor loci emit nothing when influence is below this.
    #[serde(default = "default_attractor_suppress_below")]
    pub attractor_suppress_below: f64,
    /// Categorical fragments use softened phrasing when intimacy is below this.
    #[serde(default = "default_softened_below")]
    pub softened_below: f64,
    /// Technical/analogical fragments are neutralised when intimacy is below this.
    #[serde(default = "default_bandwidth_below")]
    pub bandwidth_below: f64,
    #[serde(default = "default_neutral_fallback")]
    pub neutral_fallback: String,
    /// Softened categorical phrasing; `{label}` is replaced with the label.
    #[serde(default = "default_softened_template")]
    pub softened_template: String,
    /// Synthetic habits drawn per session; 0 disables them.
    #[serde(default)]
    pub habit_count: usize,
    #[serde(default = "default_habit_pool")]
    pub habit_pool: Vec<String>,
    #[serde(default)]
    pub thresholds: LifecycleThresholds,
    #[serde(default)]
    pub impulses: ImpulseProfiles,
    #[serde(default)]
    pub locked_stance_policy: LockedStancePolicy,
    #[serde(default)]
    pub initial_stance: InitialStance,
}

fn default_drift_multiplier() -> f64 {
    0.05
}
fn default_drift_weight() -> f64 {
    0.2
}
fn default_projection_weight() -> f64 {
    1.0
}
fn default_decay_rate() -> f64 {
    0.05
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_history_capacity() -> usize {
    10
}
fn default_mode_threshold() -> f64 {
    0.5
}
fn default_attractor_suppress_below() -> f64 {
    0.3
}
fn default_softened_below() -> f64 {
    0.5
}
fn default_bandwidth_below() -> f64 {
    0.4
}
fn default_neutral_fallback() -> String {
    "Maintain a standard, polite, and helpful tone.".to_string()
}
fn default_softened_template() -> String {
    "Occasionally mention interests related to {label}.".to_string()
}
fn default_habit_pool() -> Vec<String> {
    HABIT_POOL.iter().map(|h| h.to_string()).collect()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            drift_multiplier: default_drift_multiplier(),
            drift_weight: default_drift_weight(),
            projection_weight: default_projection_weight(),
            decay_rate: default_decay_rate(),
            tick_interval_ms: default_tick_interval_ms(),
            history_capacity: default_history_capacity(),
            mode_threshold: default_mode_threshold(),
            attractor_suppress_below: default_attractor_suppress_below(),
            softened_below: default_softened_below(),
            bandwidth_below: default_bandwidth_below(),
            neutral_fallback: default_neutral_fallback(),
            softened_template: default_softened_template(),
            habit_count: 0,
            habit_pool: default_habit_pool(),
            thresholds: LifecycleThresholds::default(),
            impulses: ImpulseProfiles::default(),
            locked_stance_policy: LockedStancePolicy::default(),
            initial_stance: InitialStance::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a config from a YAML file on disk.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.decay_rate > 0.0 && self.decay_rate < 1.0) {
            return Err(PersonaError::Validation(format!(
                "decay_rate = {} is outside (0, 1)",
                self.decay_rate
            )));
        }
        if self.history_capacity == 0 || self.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(PersonaError::Validation(format!(
                "history_capacity = {} is outside 1..={}",
                self.history_capacity, MAX_HISTORY_CAPACITY
            )));
        }
        if self.drift_multiplier < 0.0 || self.drift_weight < 0.0 || self.projection_weight < 0.0 {
            return Err(PersonaError::Validation(
                "drift_multiplier and interaction weights must be non-negative".into(),
            ));
        }
        let t = &self.thresholds;
        if !(t.stabilizing <= t.stable && t.stable <= t.locked) {
            return Err(PersonaError::Validation(format!(
                "lifecycle thresholds must be ordered: {} <= {} <= {}",
                t.stabilizing, t.stable, t.locked
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(PersonaError::Validation(
                "tick_interval_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
