//! Persona session — one genome with its affect, lifecycle, and history.
//!
//! Every mutating entry point takes `&mut self`; the only way to share a
//! session across tasks is [`SharedSession`], which serialises callers
//! behind a single mutex.
//!
//! ```text
//! apply_stance ─┐
//! apply_drift  ─┼──► GenomeStore ──► project ──► AffectSimulator (impulse)
//! set_default  ─┘                      │
//!                                      ├──► HistoryRing
//!                                      └──► InteractionLifecycle
//! tick (decay driver) ─────────────────────► AffectSimulator (decay)
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::affect::{AffectSimulator, Pad, WarpFactors};
use crate::config::{EngineConfig, LockedStancePolicy};
use crate::drift::{Direction, DriftEngine, DriftOutcome};
use crate::error::{PersonaError, Result};
use crate::events::{EventBus, EventEnvelope, HandlerId, PersonaEvent};
use crate::genome::{inspector, GenomeDef, GenomeStore, Locus, SetDefaultOutcome};
use crate::history::HistoryRing;
use crate::lifecycle::{InteractionLifecycle, LifecycleState, Transition};
use crate::projection::{habits, Habit, ProjectionEngine, ProjectionRecord};
use crate::rules::RuleMatrix;
use crate::stance::{self, StancePreset, StanceVector};

/// Point-in-time summary of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub persona_id: String,
    pub version: String,
    pub state: LifecycleState,
    pub interaction_count: f64,
    pub affect: Pad,
    pub baseline: Pad,
    pub warp: WarpFactors,
    /// `None` until the first stance is applied.
    pub stance: Option<StanceVector>,
    pub history_len: usize,
}

pub struct PersonaSession {
    def: GenomeDef,
    config: EngineConfig,
    genome: GenomeStore,
    rules: RuleMatrix,
    stance: Option<StanceVector>,
    affect: AffectSimulator,
    lifecycle: InteractionLifecycle,
    history: HistoryRing,
    drift: DriftEngine,
    projector: ProjectionEngine,
    seed: Option<u64>,
    rng: StdRng,
    events: EventBus,
}

impl PersonaSession {
    /// Build a session with an entropy-seeded random source.
    pub fn new(def: GenomeDef, config: EngineConfig) -> Result<Self> {
        Self::build(def, config, None)
    }

    /// Build a session whose projections are reproducible for `seed`.
    pub fn with_seed(def: GenomeDef, config: EngineConfig, seed: u64) -> Result<Self> {
        Self::build(def, config, Some(seed))
    }

    /// The embedded `pioneer_v2` persona with default tunables.
    pub fn builtin() -> Result<Self> {
        Self::new(GenomeDef::builtin()?, EngineConfig::default())
    }

    fn build(def: GenomeDef, config: EngineConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        let (genome, rules) = GenomeStore::from_def(def.clone())?;
        let mut affect = AffectSimulator::new(config.decay_rate, config.impulses);
        affect.set_baseline(initial_baseline(&config));
        let (rng, projector) = seeded_projector(&config, seed);

        tracing::info!(
            persona_id = genome.persona_id(),
            version = genome.version(),
            loci = genome.len(),
            rules = rules.len(),
            seeded = seed.is_some(),
            "persona session created"
        );

        Ok(Self {
            events: EventBus::new(genome.persona_id()),
            lifecycle: InteractionLifecycle::new(config.thresholds),
            history: HistoryRing::new(config.history_capacity),
            drift: DriftEngine::new(config.drift_multiplier, config.drift_weight),
            projector,
            rng,
            seed,
            def,
            config,
            genome,
            rules,
            stance: None,
            affect,
        })
    }

    // ------------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------------

    pub fn persona_id(&self) -> &str {
        self.genome.persona_id()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn genome(&self) -> &GenomeStore {
        &self.genome
    }

    pub fn rules(&self) -> &RuleMatrix {
        &self.rules
    }

    /// Last applied stance. The genome file's own defaults are in effect
    /// until the first one.
    pub fn stance(&self) -> Option<StanceVector> {
        self.stance
    }

    pub fn affect(&self) -> &AffectSimulator {
        &self.affect
    }

    pub fn lifecycle(&self) -> &InteractionLifecycle {
        &self.lifecycle
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Synthetic habits drawn for this session.
    pub fn habits(&self) -> &[Habit] {
        self.projector.habits()
    }

    /// Loci in presentation order.
    pub fn renderable_loci(&self) -> Vec<&Locus> {
        self.genome.list_loci()
    }

    pub fn warp_factors(&self) -> WarpFactors {
        self.affect.warp_factors()
    }

    /// Plain-text genome report.
    pub fn inspect(&self) -> String {
        inspector::render(&self.genome)
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            persona_id: self.persona_id().to_string(),
            version: self.genome.version().to_string(),
            state: self.lifecycle.state(),
            interaction_count: self.lifecycle.interaction_count(),
            affect: self.affect.current(),
            baseline: self.affect.baseline(),
            warp: self.affect.warp_factors(),
            stance: self.stance,
            history_len: self.history.len(),
        }
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    /// Remap stance-aligned defaults, every variability, and the affect
    /// baseline.  Components are clamped into [0, 1].
    ///
    /// Once LOCKED this is rejected as a whole unless the config allows
    /// stance changes on a locked persona.
    pub fn apply_stance(&mut self, stance: StanceVector) -> Result<StanceVector> {
        let stance = stance.clamped();
        if self.lifecycle.is_locked() && self.config.locked_stance_policy == LockedStancePolicy::Reject {
            return Err(self.reject("stance"));
        }

        stance::map_onto(&mut self.genome, &stance);
        self.affect.set_baseline(stance.affect_baseline());
        self.stance = Some(stance);
        self.events.emit(PersonaEvent::StanceShifted {
            r: stance.r,
            w: stance.w,
            c: stance.c,
        });
        Ok(stance)
    }

    /// Apply a named preset (`default`, `factual`, `supportive`).
    pub fn apply_preset(&mut self, name: &str) -> Result<StanceVector> {
        let preset: StancePreset = name.parse()?;
        self.apply_stance(preset.stance())
    }

    pub fn apply_drift(&mut self, locus_id: &str, direction: Direction) -> Result<DriftOutcome> {
        let outcome = match self
            .drift
            .apply(&mut self.genome, &mut self.lifecycle, locus_id, direction)
        {
            Ok(outcome) => outcome,
            Err(PersonaError::Locked(_)) => return Err(self.reject(&format!("drift of '{}'", locus_id))),
            Err(e) => return Err(e),
        };

        if let DriftOutcome::Applied { locus_id, new_default, transition, .. } = &outcome {
            self.events.emit(PersonaEvent::DriftApplied {
                locus_id: locus_id.clone(),
                new_default: *new_default,
            });
            self.emit_transition(*transition);
        } else {
            tracing::debug!(locus_id, "drift on categorical locus ignored");
        }
        Ok(outcome)
    }

    /// Write a range default directly, clamped into bounds.
    pub fn set_default(&mut self, locus_id: &str, value: f64) -> Result<SetDefaultOutcome> {
        if self.lifecycle.is_locked() {
            return Err(self.reject(&format!("default write to '{}'", locus_id)));
        }
        self.genome.set_default(locus_id, value)
    }

    /// Sample the genome, apply the mood impulse, and record the result.
    ///
    /// Allowed in every lifecycle state.
    pub fn project(&mut self, influence: f64, intimacy: f64) -> ProjectionRecord {
        let record = self.projector.project(
            &self.genome,
            &self.rules,
            &mut self.affect,
            influence,
            intimacy,
            &mut self.rng,
        );
        self.history.push(record.clone());
        let transition = self.lifecycle.record(self.config.projection_weight);

        self.events.emit(PersonaEvent::ProjectionCompleted {
            record_id: record.id,
            mode: record.mode,
            influence: record.influence,
        });
        self.emit_transition(transition);
        record
    }

    /// One decay step toward the affect baseline.
    pub fn tick(&mut self) -> Pad {
        let pad = self.affect.tick();
        tracing::trace!(p = pad.p, a = pad.a, d = pad.d, "affect decay tick");
        pad
    }

    // ------------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------------

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    /// Re-expose a past record. Never mutates genome or affect.
    pub fn replay(&self, index: usize) -> Result<ProjectionRecord> {
        let record = self.history.get(index)?.clone();
        self.events.emit(PersonaEvent::HistoryReplayed {
            index,
            record_id: record.id,
        });
        Ok(record)
    }

    // ------------------------------------------------------------------------
    // Lifecycle of the session itself
    // ------------------------------------------------------------------------

    /// Back to the state right after construction. Event handlers stay
    /// registered; a seeded session replays the same random sequence.
    pub fn reset(&mut self) -> Result<()> {
        let (genome, rules) = GenomeStore::from_def(self.def.clone())?;
        self.genome = genome;
        self.rules = rules;
        self.stance = None;
        self.affect.reset();
        self.affect.set_baseline(initial_baseline(&self.config));
        self.lifecycle.reset();
        self.history.clear();
        let (rng, projector) = seeded_projector(&self.config, self.seed);
        self.rng = rng;
        self.projector = projector;
        tracing::info!(persona_id = self.persona_id(), "persona session reset");
        Ok(())
    }

    pub fn subscribe(
        &self,
        name: impl Into<String>,
        handler: impl Fn(&EventEnvelope) + Send + Sync + 'static,
    ) -> HandlerId {
        self.events.on(name, handler)
    }

    pub fn unsubscribe(&self, id: &HandlerId) -> bool {
        self.events.off(id)
    }

    fn reject(&self, operation: &str) -> PersonaError {
        self.events.emit(PersonaEvent::MutationRejected {
            operation: operation.to_string(),
        });
        PersonaError::Locked(operation.to_string())
    }

    fn emit_transition(&self, transition: Option<Transition>) {
        if let Some(t) = transition {
            self.events.emit(PersonaEvent::StateTransition {
                from: t.from,
                to: t.to,
                interaction_count: t.interaction_count,
            });
        }
    }
}

impl std::fmt::Debug for PersonaSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonaSession")
            .field("persona_id", &self.persona_id())
            .field("state", &self.lifecycle.state())
            .field("stance", &self.stance)
            .field("history_len", &self.history.len())
            .finish()
    }
}

/// Mood baseline before any stance is applied.
fn initial_baseline(config: &EngineConfig) -> Pad {
    let initial = config.initial_stance;
    StanceVector::new(initial.r, initial.w, initial.c).affect_baseline()
}

/// Fresh random source plus a projector carrying habits drawn from it.
fn seeded_projector(config: &EngineConfig, seed: Option<u64>) -> (StdRng, ProjectionEngine) {
    let mut rng = make_rng(seed);
    let drawn = habits::generate(&config.habit_pool, config.habit_count, &mut rng);
    (rng, ProjectionEngine::from_config(config).with_habits(drawn))
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

// ============================================================================
// SharedSession
// ============================================================================

/// A session behind a single-writer lock, cloneable across tasks.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<PersonaSession>>,
}

impl SharedSession {
    pub fn new(session: PersonaSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, PersonaSession> {
        self.inner.lock()
    }

    /// Spawn the fixed-cadence decay driver on the current tokio runtime.
    ///
    /// The first tick fires one full interval after spawning.
    pub fn spawn_decay_driver(&self) -> JoinHandle<()> {
        let session = self.clone();
        let period = Duration::from_millis(self.lock().config().tick_interval_ms);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            interval.tick().await;
            loop {
                interval.tick().await;
                session.lock().tick();
            }
        })
    }
}

impl std::fmt::Debug for SharedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedSession").field(&*self.inner.lock()).finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InitialStance;
    use crate::projection::TraitValue;

    fn session() -> PersonaSession {
        PersonaSession::with_seed(GenomeDef::builtin().unwrap(), EngineConfig::default(), 42).unwrap()
    }

    fn lock(s: &mut PersonaSession) {
        for _ in 0..30 {
            s.project(0.5, 0.5);
        }
        assert_eq!(s.lifecycle().state(), LifecycleState::Locked);
    }

    fn recorded(s: &PersonaSession) -> Arc<Mutex<Vec<PersonaEvent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        s.subscribe("recorder", move |env| sink.lock().push(env.event.clone()));
        seen
    }

    #[test]
    fn test_builtin_session() {
        let s = PersonaSession::builtin().unwrap();
        assert_eq!(s.persona_id(), "pioneer_v2");
        assert_eq!(s.renderable_loci()[0].id, "identity_signature");
        assert_eq!(s.renderable_loci().last().unwrap().id, "topic_attractors");
        assert_eq!(s.affect().baseline(), StanceVector::default().affect_baseline());
    }

    #[test]
    fn test_stance_idempotent() {
        let mut s = session();
        let v = StanceVector::new(0.9, 0.2, 0.1);
        s.apply_stance(v).unwrap();
        let (defaults, baseline) = (s.genome().defaults(), s.affect().baseline());
        s.apply_stance(v).unwrap();
        assert_eq!(s.genome().defaults(), defaults);
        assert_eq!(s.affect().baseline(), baseline);
        assert_eq!(s.stance(), Some(v));
    }

    #[test]
    fn test_stance_emits_event() {
        let mut s = session();
        let seen = recorded(&s);
        s.apply_preset("supportive").unwrap();
        assert_eq!(
            *seen.lock(),
            vec![PersonaEvent::StanceShifted { r: 0.3, w: 0.9, c: 0.4 }]
        );
    }

    #[test]
    fn test_unknown_preset() {
        let mut s = session();
        assert!(matches!(s.apply_preset("nope"), Err(PersonaError::NotFound(_))));
    }

    #[test]
    fn test_drift_scenario_and_event() {
        let mut s = session();
        let seen = recorded(&s);
        let out = s.apply_drift("explanation_depth", Direction::Right).unwrap();
        assert!(matches!(out, DriftOutcome::Applied { .. }));
        let d = s.genome().get_locus("explanation_depth").unwrap().default_value().unwrap();
        assert!((d - 0.36).abs() < 1e-12);
        let events = seen.lock();
        match &events[0] {
            PersonaEvent::DriftApplied { locus_id, new_default } => {
                assert_eq!(locus_id, "explanation_depth");
                assert!((new_default - 0.36).abs() < 1e-12);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_categorical_drift_noop() {
        let mut s = session();
        let seen = recorded(&s);
        assert_eq!(s.apply_drift("topic_attractors", Direction::Left).unwrap(), DriftOutcome::NoOp);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_locked_rejects_drift_and_stance() {
        let mut s = session();
        lock(&mut s);
        let seen = recorded(&s);
        let before = s.genome().defaults();
        let baseline = s.affect().baseline();
        let variability: Vec<f64> = s.genome().iter().map(|l| l.variability).collect();

        for id in ["explanation_depth", "humor_density", "logical_rigor"] {
            for dir in [Direction::Left, Direction::Right] {
                assert!(matches!(s.apply_drift(id, dir), Err(PersonaError::Locked(_))));
            }
        }
        assert!(matches!(
            s.apply_stance(StanceVector::new(1.0, 1.0, 1.0)),
            Err(PersonaError::Locked(_))
        ));
        assert!(matches!(s.set_default("humor_density", 0.4), Err(PersonaError::Locked(_))));
        assert_eq!(s.genome().defaults(), before);
        assert_eq!(s.affect().baseline(), baseline);
        assert_eq!(
            s.genome().iter().map(|l| l.variability).collect::<Vec<_>>(),
            variability
        );
        assert!(s.stance().is_none());
        assert!(seen
            .lock()
            .iter()
            .all(|e| matches!(e, PersonaEvent::MutationRejected { .. })));

        // read-only and projection calls still work
        s.project(0.7, 0.7);
        assert!(s.replay(0).is_ok());
    }

    #[test]
    fn test_locked_stance_allowed_by_policy() {
        let config = EngineConfig {
            locked_stance_policy: LockedStancePolicy::Allow,
            ..EngineConfig::default()
        };
        let mut s = PersonaSession::with_seed(GenomeDef::builtin().unwrap(), config, 1).unwrap();
        lock(&mut s);
        s.apply_stance(StanceVector::new(0.9, 0.2, 0.1)).unwrap();
        let d = s.genome().get_locus("identity_signature").unwrap().default_value().unwrap();
        assert_eq!(d, 0.2);
        assert!(s.apply_drift("humor_density", Direction::Left).is_err());
    }

    #[test]
    fn test_projection_transitions_emitted_once_each() {
        let mut s = session();
        let seen = recorded(&s);
        for _ in 0..40 {
            s.project(0.6, 0.6);
        }
        let transitions: Vec<(LifecycleState, LifecycleState)> = seen
            .lock()
            .iter()
            .filter_map(|e| match e {
                PersonaEvent::StateTransition { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect();
        assert_eq!(
            transitions,
            vec![
                (LifecycleState::Forming, LifecycleState::Stabilizing),
                (LifecycleState::Stabilizing, LifecycleState::Stable),
                (LifecycleState::Stable, LifecycleState::Locked),
            ]
        );
    }

    #[test]
    fn test_history_capacity_and_replay() {
        let mut s = session();
        let ids: Vec<_> = (0..11).map(|_| s.project(0.9, 0.9).id).collect();
        assert_eq!(s.history().len(), 10);
        assert_eq!(s.replay(0).unwrap().id, ids[10]);
        assert!(s.history().iter().all(|r| r.id != ids[0]));
        assert!(matches!(s.replay(10), Err(PersonaError::OutOfRange { index: 10, len: 10 })));
    }

    #[test]
    fn test_replay_is_read_only() {
        let mut s = session();
        s.project(0.9, 0.9);
        let (affect, defaults) = (s.affect().current(), s.genome().defaults());
        let record = s.replay(0).unwrap();
        assert_eq!(s.affect().current(), affect);
        assert_eq!(s.genome().defaults(), defaults);
        assert_eq!(record, *s.history().get(0).unwrap());
    }

    #[test]
    fn test_tick_converges_to_stance_baseline() {
        let mut s = session();
        s.apply_stance(StanceVector::new(0.9, 0.2, 0.1)).unwrap();
        s.project(0.1, 0.1);
        for _ in 0..2000 {
            s.tick();
        }
        let target = StanceVector::new(0.9, 0.2, 0.1).affect_baseline();
        assert!(s.affect().current().distance(&target) < 1e-9);
    }

    #[test]
    fn test_seeded_sessions_reproduce() {
        let mut a = session();
        let mut b = session();
        for _ in 0..5 {
            assert_eq!(a.project(1.0, 1.0).traits, b.project(1.0, 1.0).traits);
        }
    }

    #[test]
    fn test_reset_restores_construction_state() {
        let mut s = session();
        let first = s.project(1.0, 1.0).traits;
        let defaults = s.genome().defaults();
        s.apply_stance(StanceVector::new(0.1, 0.9, 0.9)).unwrap();
        s.apply_drift("humor_density", Direction::Right).unwrap();
        lock(&mut s);

        s.reset().unwrap();
        assert_eq!(s.lifecycle().state(), LifecycleState::Forming);
        assert_eq!(s.lifecycle().interaction_count(), 0.0);
        assert!(s.history().is_empty());
        assert_eq!(s.genome().defaults(), defaults);
        assert_eq!(s.affect().current(), Pad::default());
        assert_eq!(s.project(1.0, 1.0).traits, first);
        assert!(s.stance().is_none());
        assert!(s.status().stance.is_none());
    }

    #[test]
    fn test_initial_stance_only_seeds_baseline() {
        let config = EngineConfig {
            initial_stance: InitialStance { r: 0.9, w: 0.1, c: 0.1 },
            ..EngineConfig::default()
        };
        let s = PersonaSession::with_seed(GenomeDef::builtin().unwrap(), config, 1).unwrap();
        let file = GenomeStore::from_def(GenomeDef::builtin().unwrap()).unwrap().0;

        assert_eq!(s.genome().defaults(), file.defaults());
        assert_eq!(s.affect().baseline(), StanceVector::new(0.9, 0.1, 0.1).affect_baseline());
        let st = s.status();
        assert!(st.stance.is_none());
        assert!(serde_json::to_value(&st).unwrap()["stance"].is_null());
    }

    #[test]
    fn test_status_snapshot() {
        let mut s = session();
        s.project(0.2, 0.2);
        let st = s.status();
        assert_eq!(st.persona_id, "pioneer_v2");
        assert_eq!(st.state, LifecycleState::Forming);
        assert_eq!(st.interaction_count, 1.0);
        assert_eq!(st.history_len, 1);
        assert_eq!(st.affect, Pad::new(-0.1, 0.2, 0.3));
        let json = serde_json::to_value(&st).unwrap();
        assert_eq!(json["state"], "FORMING");
    }

    #[test]
    fn test_zero_influence_projection_matches_defaults() {
        let mut s = session();
        s.apply_stance(StanceVector::new(0.3, 0.7, 0.6)).unwrap();
        let defaults = s.genome().defaults();
        let record = s.project(0.0, 1.0);
        for (id, d) in defaults {
            assert_eq!(record.traits[&id], TraitValue::Number(d));
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            decay_rate: 1.5,
            ..EngineConfig::default()
        };
        assert!(PersonaSession::new(GenomeDef::builtin().unwrap(), config).is_err());
    }

    #[test]
    fn test_habits_stable_across_reset() {
        let config = EngineConfig {
            habit_count: 2,
            ..EngineConfig::default()
        };
        let mut s = PersonaSession::with_seed(GenomeDef::builtin().unwrap(), config, 21).unwrap();
        let habits = s.habits().to_vec();
        assert_eq!(habits.len(), 2);
        let first = s.project(0.9, 0.9);
        assert!(first.prompt.contains(&habits[1].text));

        s.reset().unwrap();
        assert_eq!(s.habits(), habits.as_slice());
        assert_eq!(s.project(0.9, 0.9).traits, first.traits);
    }

    #[test]
    fn test_huge_history_capacity_is_validation_error() {
        let config = EngineConfig {
            history_capacity: usize::MAX,
            ..EngineConfig::default()
        };
        let err = PersonaSession::new(GenomeDef::builtin().unwrap(), config).unwrap_err();
        assert!(matches!(err, PersonaError::Validation(_)));
    }

    #[tokio::test]
    async fn test_decay_driver_ticks() {
        let config = EngineConfig {
            tick_interval_ms: 5,
            ..EngineConfig::default()
        };
        let session = PersonaSession::with_seed(GenomeDef::builtin().unwrap(), config, 3).unwrap();
        let shared = SharedSession::new(session);
        shared.lock().project(0.0, 0.0);
        let before = shared.lock().affect().current();

        let handle = shared.spawn_decay_driver();
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        let after = shared.lock().affect().current();
        let baseline = shared.lock().affect().baseline();
        assert!(after.distance(&baseline) < before.distance(&baseline));
    }
}
