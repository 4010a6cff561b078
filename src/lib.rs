//! # Persona Engine
//!
//! Trait genome model and stochastic projection engine for synthetic
//! personas.
//!
//! A persona is a set of weighted, bounded traits (loci).  A stance vector
//! remaps their defaults, drift nudges them, and each projection samples
//! them into natural-language style directives while a PAD mood model
//! reacts and decays.  An interaction lifecycle locks the genome once the
//! persona has settled.
//!
//! ```no_run
//! use persona_engine::{PersonaSession, StanceVector};
//!
//! let mut session = PersonaSession::builtin()?;
//! session.apply_stance(StanceVector::new(0.9, 0.2, 0.1))?;
//! let record = session.project(0.7, 0.8);
//! println!("{}", record.prompt);
//! # Ok::<(), persona_engine::PersonaError>(())
//! ```

pub mod affect;
pub mod config;
pub mod drift;
pub mod error;
pub mod events;
pub mod genome;
pub mod history;
pub mod lifecycle;
pub mod projection;
pub mod rules;
pub mod server;
pub mod session;
pub mod stance;

pub use affect::{AffectSimulator, ImpulseProfile, Pad, WarpFactors};
pub use config::{EngineConfig, LockedStancePolicy};
pub use drift::{Direction, DriftOutcome};
pub use error::{PersonaError, Result};
pub use events::{EventBus, EventEnvelope, HandlerId, PersonaEvent};
pub use genome::{recombine, GenomeDef, GenomeStore, Locus, Recombinator};
pub use history::HistoryRing;
pub use lifecycle::{InteractionLifecycle, LifecycleState};
pub use projection::{Habit, ProjectionMode, ProjectionRecord, TraitValue};
pub use rules::RuleMatrix;
pub use session::{PersonaSession, SessionStatus, SharedSession};
pub use stance::{StancePreset, StanceVector};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
