//! Per-session event bus.
//!
//! Handlers run synchronously, in registration order, on the emitting
//! thread.  A handler must not call back into the session that owns the
//! bus.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::persona_event::{EventEnvelope, PersonaEvent};

/// A synchronous event handler.
pub type EventHandler = Arc<dyn Fn(&EventEnvelope) + Send + Sync>;

static HANDLER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifier returned by [`EventBus::on`], used to remove the handler.
#[derive(Clone)]
pub struct HandlerId {
    pub name: String,
    id: u64,
}

impl HandlerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: HANDLER_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl fmt::Debug for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandlerId({}:{})", self.id, self.name)
    }
}

impl PartialEq for HandlerId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for HandlerId {}

impl std::hash::Hash for HandlerId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

pub struct EventBus {
    persona_id: String,
    handlers: RwLock<Vec<(HandlerId, EventHandler)>>,
}

impl EventBus {
    pub fn new(persona_id: impl Into<String>) -> Self {
        Self {
            persona_id: persona_id.into(),
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Register a handler for every event.
    pub fn on(
        &self,
        name: impl Into<String>,
        handler: impl Fn(&EventEnvelope) + Send + Sync + 'static,
    ) -> HandlerId {
        let id = HandlerId::new(name);
        self.handlers.write().push((id.clone(), Arc::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if it was not registered.
    pub fn off(&self, id: &HandlerId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(h, _)| h != id);
        handlers.len() != before
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Wrap, log, and dispatch an event. Returns the envelope.
    pub fn emit(&self, event: PersonaEvent) -> EventEnvelope {
        let envelope = EventEnvelope::new(self.persona_id.clone(), event);
        log_event(&envelope);

        // Clone out so a handler can register or remove handlers.
        let handlers: Vec<EventHandler> = self.handlers.read().iter().map(|(_, h)| h.clone()).collect();
        for handler in handlers {
            handler(&envelope);
        }
        envelope
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("persona_id", &self.persona_id)
            .field("handlers", &self.handler_count())
            .finish()
    }
}

fn log_event(envelope: &EventEnvelope) {
    let persona = envelope.persona_id.as_str();
    match &envelope.event {
        PersonaEvent::StateTransition { from, to, interaction_count } => {
            tracing::info!(persona, %from, %to, interaction_count, "lifecycle transition");
        }
        PersonaEvent::DriftApplied { locus_id, new_default } => {
            tracing::info!(persona, %locus_id, new_default, "drift applied");
        }
        PersonaEvent::StanceShifted { r, w, c } => {
            tracing::info!(persona, r, w, c, "stance shifted");
        }
        PersonaEvent::ProjectionCompleted { record_id, mode, influence } => {
            tracing::info!(persona, %record_id, %mode, influence, "projection completed");
        }
        PersonaEvent::HistoryReplayed { index, record_id } => {
            tracing::debug!(persona, index, %record_id, "history replayed");
        }
        PersonaEvent::MutationRejected { operation } => {
            tracing::warn!(persona, %operation, "mutation rejected: persona is locked");
        }
    }
}
