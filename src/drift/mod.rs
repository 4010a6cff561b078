//! Drift engine — bounded, direction-signed nudges to a locus default.
//!
//! `delta = direction · variability · drift_multiplier`, then the default is
//! clamped back into the locus bounds.  A successful drift advances the
//! interaction lifecycle by a small fixed weight.

use serde::{Deserialize, Serialize};

use crate::error::{PersonaError, Result};
use crate::genome::GenomeStore;
use crate::lifecycle::{InteractionLifecycle, Transition};

/// Sign of a drift nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

impl TryFrom<i64> for Direction {
    type Error = PersonaError;

    fn try_from(v: i64) -> Result<Self> {
        match v {
            -1 => Ok(Self::Left),
            1 => Ok(Self::Right),
            other => Err(PersonaError::Validation(format!(
                "drift direction must be -1 or +1, got {}",
                other
            ))),
        }
    }
}

impl From<Direction> for i64 {
    fn from(d: Direction) -> i64 {
        match d {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// Result of a drift request that was not rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DriftOutcome {
    Applied {
        locus_id: String,
        previous: f64,
        new_default: f64,
        /// Lifecycle change caused by recording this drift.
        transition: Option<Transition>,
    },
    /// Categorical locus; nothing changed and nothing was recorded.
    NoOp,
}

#[derive(Debug, Clone, Copy)]
pub struct DriftEngine {
    multiplier: f64,
    weight: f64,
}

impl DriftEngine {
    pub fn new(multiplier: f64, weight: f64) -> Self {
        Self { multiplier, weight }
    }

    /// Nudge `locus_id`'s default one step in `direction`.
    ///
    /// Fails with `Locked` once the lifecycle is LOCKED (the default is left
    /// unchanged) and with `NotFound` for unknown ids.
    pub fn apply(
        &self,
        store: &mut GenomeStore,
        lifecycle: &mut InteractionLifecycle,
        locus_id: &str,
        direction: Direction,
    ) -> Result<DriftOutcome> {
        if lifecycle.is_locked() {
            return Err(PersonaError::Locked(format!("drift of '{}'", locus_id)));
        }

        let locus = store.get_locus_mut(locus_id)?;
        let delta = direction.sign() * locus.variability * self.multiplier;
        let Some(range) = locus.range_mut() else {
            return Ok(DriftOutcome::NoOp);
        };

        let previous = range.default;
        range.default = range.clamp(previous + delta);
        let new_default = range.default;

        let transition = lifecycle.record(self.weight);
        Ok(DriftOutcome::Applied {
            locus_id: locus_id.to_string(),
            previous,
            new_default,
            transition,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
