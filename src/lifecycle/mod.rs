//! Interaction lifecycle — FORMING → STABILIZING → STABLE → LOCKED.
//!
//! State is a one-directional function of the accumulated interaction
//! weight.  A single `record` call that crosses several thresholds jumps
//! straight to the highest qualifying state and reports one transition.
//! LOCKED is terminal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::LifecycleThresholds;

/// Absorbs accumulation error so e.g. 25 × 0.2 reaches a threshold of 5.
const THRESHOLD_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Forming,
    Stabilizing,
    Stable,
    Locked,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forming => "FORMING",
            Self::Stabilizing => "STABILIZING",
            Self::Stable => "STABLE",
            Self::Locked => "LOCKED",
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A net state change produced by one `record` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: LifecycleState,
    pub to: LifecycleState,
    pub interaction_count: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct InteractionLifecycle {
    interaction_count: f64,
    state: LifecycleState,
    #[serde(skip)]
    thresholds: LifecycleThresholds,
}

impl InteractionLifecycle {
    pub fn new(thresholds: LifecycleThresholds) -> Self {
        Self {
            interaction_count: 0.0,
            state: LifecycleState::Forming,
            thresholds,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn interaction_count(&self) -> f64 {
        self.interaction_count
    }

    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }

    /// Highest state whose threshold `count` has reached.
    fn qualifying_state(&self, count: f64) -> LifecycleState {
        let reached = |threshold: f64| count + THRESHOLD_EPSILON >= threshold;
        let t = &self.thresholds;
        if reached(t.locked) {
            LifecycleState::Locked
        } else if reached(t.stable) {
            LifecycleState::Stable
        } else if reached(t.stabilizing) {
            LifecycleState::Stabilizing
        } else {
            LifecycleState::Forming
        }
    }

    /// Accumulate `weight` and advance the state if a threshold was crossed.
    ///
    /// Negative weights are ignored so the count never decreases.
    pub fn record(&mut self, weight: f64) -> Option<Transition> {
        if weight > 0.0 {
            self.interaction_count += weight;
        }
        let target = self.qualifying_state(self.interaction_count);
        if target <= self.state {
            return None;
        }
        let transition = Transition {
            from: self.state,
            to: target,
            interaction_count: self.interaction_count,
        };
        self.state = target;
        Some(transition)
    }

    pub fn reset(&mut self) {
        self.interaction_count = 0.0;
        self.state = LifecycleState::Forming;
    }
}

// ============================================================================
// Tests
// ============================================================================
