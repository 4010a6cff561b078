//! Observable persona events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use crate::lifecycle::LifecycleState;
use crate::projection::ProjectionMode;

static EMISSION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Next process-wide emission sequence number.
pub fn next_emission_sequence() -> u64 {
    EMISSION_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// What happened to the persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PersonaEvent {
    StateTransition {
        from: LifecycleState,
        to: LifecycleState,
        interaction_count: f64,
    },
    DriftApplied {
        locus_id: String,
        new_default: f64,
    },
    StanceShifted {
        r: f64,
        w: f64,
        c: f64,
    },
    ProjectionCompleted {
        record_id: Uuid,
        mode: ProjectionMode,
        influence: f64,
    },
    HistoryReplayed {
        index: usize,
        record_id: Uuid,
    },
    /// A mutation was refused because the lifecycle is LOCKED.
    MutationRejected {
        operation: String,
    },
}

impl PersonaEvent {
    /// Discriminator string, matching the serialized `type` tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::StateTransition { .. } => "state_transition",
            Self::DriftApplied { .. } => "drift_applied",
            Self::StanceShifted { .. } => "stance_shifted",
            Self::ProjectionCompleted { .. } => "projection_completed",
            Self::HistoryReplayed { .. } => "history_replayed",
            Self::MutationRejected { .. } => "mutation_rejected",
        }
    }
}

/// An event plus its identity and emission metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub emission_sequence: u64,
    /// Persona that emitted the event.
    pub persona_id: String,
    #[serde(flatten)]
    pub event: PersonaEvent,
}

impl EventEnvelope {
    pub fn new(persona_id: impl Into<String>, event: PersonaEvent) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            emission_sequence: next_emission_sequence(),
            persona_id: persona_id.into(),
            event,
        }
    }
}
