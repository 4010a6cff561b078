//! Synthetic habits — flavour quirks drawn once per session.
//!
//! Habits never touch trait values or safety logic; they only add lines to
//! the `[OPTIONAL_FLAVOR]` prompt section, and every one is marked as
//! generated.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Built-in quirk pool.
pub const HABIT_POOL: [&str; 6] = [
    "Often uses analogies related to old clockwork mechanisms.",
    "Has a habit of starting complex explanations with 'Observe...'.",
    "Occasionally apologizes for being 'excessively precise'.",
    "Uses metaphors derived from biological systems theory.",
    "Tends to structure lists in groups of three for 'optimal clarity'.",
    "Frequently uses phrases like 'strictly speaking' or 'in essence'.",
];

/// Provenance tag carried by every generated habit.
pub const HABIT_PROVENANCE: &str = "generated_habits";

/// Fragment `locus_id` used for habit lines.
pub const HABIT_SOURCE: &str = "habits";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub text: String,
    /// Always `true`: habits are invented, not derived from the genome.
    pub synthetic: bool,
    pub provenance: String,
}

impl Habit {
    fn generated(text: &str) -> Self {
        Self {
            text: text.to_string(),
            synthetic: true,
            provenance: HABIT_PROVENANCE.to_string(),
        }
    }
}

/// Draw up to `count` distinct habits from `pool`.
///
/// A `count` of zero returns nothing and leaves `rng` untouched.
pub fn generate<S, R>(pool: &[S], count: usize, rng: &mut R) -> Vec<Habit>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    if count == 0 || pool.is_empty() {
        return Vec::new();
    }
    let habits: Vec<Habit> = pool
        .choose_multiple(rng, count.min(pool.len()))
        .map(|text| Habit::generated(text.as_ref()))
        .collect();
    tracing::debug!(count = habits.len(), "generated synthetic habits");
    habits
}
