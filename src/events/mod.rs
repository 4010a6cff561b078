//! Persona events: typed payloads, envelopes, and a synchronous bus.

pub mod event_bus;
pub mod persona_event;

pub use event_bus::{EventBus, EventHandler, HandlerId};
pub use persona_event::{EventEnvelope, PersonaEvent};
