//! Genome recombination — breed a child genome from two parents.
//!
//! ```text
//! parent A ─┐   crossover (shared loci: pick a parent, average range defaults)
//!           ├─► mutation (±0.1 on range defaults, anchors exempt) ─► child
//! parent B ─┘
//! ```
//!
//! The child keeps parent A's locus order, followed by loci only parent B
//! declares.  Rules travel with the locus they were inherited from.

use std::collections::HashMap;

use chrono::Utc;
use rand::Rng;

use super::definition::{GenomeDef, GenomeMetadata};
use super::locus::{Distribution, Locus};
use crate::rules::LocusRules;

/// Loci that are never mutated.
pub const DEFAULT_SAFETY_ANCHORS: [&str; 2] = ["truth_alignment", "logic_gate"];

/// Largest absolute shift one mutation applies to a range default.
pub const MUTATION_SPAN: f64 = 0.1;

const AUTHOR: &str = "genome-recombinator";

/// Crossover plus bounded mutation between two genome definitions.
#[derive(Debug, Clone)]
pub struct Recombinator {
    mutation_rate: f64,
    safety_anchors: Vec<String>,
}

impl Default for Recombinator {
    fn default() -> Self {
        Self::new(0.05)
    }
}

impl Recombinator {
    /// `mutation_rate` is the per-locus mutation probability, clamped to [0, 1].
    pub fn new(mutation_rate: f64) -> Self {
        Self {
            mutation_rate: if mutation_rate.is_nan() { 0.0 } else { mutation_rate.clamp(0.0, 1.0) },
            safety_anchors: DEFAULT_SAFETY_ANCHORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the set of loci exempt from mutation.
    pub fn with_anchors<I, S>(mut self, anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.safety_anchors = anchors.into_iter().map(Into::into).collect();
        self
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn is_anchor(&self, locus_id: &str) -> bool {
        self.safety_anchors.iter().any(|a| a == locus_id)
    }

    /// Breed `a` and `b` into a child named `child_id`.
    ///
    /// The child carries parent A's version and records both parent ids in
    /// its metadata.  It is not validated here; pass it through
    /// [`super::GenomeStore::from_def`] like any other definition.
    pub fn recombine<R: Rng + ?Sized>(
        &self,
        a: &GenomeDef,
        b: &GenomeDef,
        child_id: &str,
        rng: &mut R,
    ) -> GenomeDef {
        let from_b: HashMap<&str, &Locus> = b.loci.iter().map(|l| (l.id.as_str(), l)).collect();

        let mut loci = Vec::with_capacity(a.loci.len() + b.loci.len());
        let mut rules = HashMap::new();

        for locus_a in &a.loci {
            let (mut locus, source) = match from_b.get(locus_a.id.as_str()) {
                Some(locus_b) => crossover(locus_a, a, locus_b, b, rng),
                None => (locus_a.clone(), a),
            };
            self.maybe_mutate(&mut locus, rng);
            inherit_rules(&mut rules, &locus.id, source);
            loci.push(locus);
        }

        for locus_b in &b.loci {
            if a.loci.iter().any(|l| l.id == locus_b.id) {
                continue;
            }
            let mut locus = locus_b.clone();
            self.maybe_mutate(&mut locus, rng);
            inherit_rules(&mut rules, &locus.id, b);
            loci.push(locus);
        }

        tracing::info!(
            child_id,
            parent_a = a.persona_id(),
            parent_b = b.persona_id(),
            loci = loci.len(),
            "genome recombined"
        );

        GenomeDef {
            version: a.version.clone(),
            metadata: GenomeMetadata {
                persona_id: child_id.to_string(),
                parents: vec![a.persona_id().to_string(), b.persona_id().to_string()],
                author: Some(AUTHOR.to_string()),
                created_at: Some(Utc::now()),
            },
            loci,
            rules,
        }
    }

    fn maybe_mutate<R: Rng + ?Sized>(&self, locus: &mut Locus, rng: &mut R) {
        if self.is_anchor(&locus.id) || rng.gen::<f64>() >= self.mutation_rate {
            return;
        }
        let shift = rng.gen_range(-MUTATION_SPAN..MUTATION_SPAN);
        let Some(range) = locus.range_mut() else {
            return;
        };
        let previous = range.default;
        range.default = range.clamp(previous + shift);
        let new_default = range.default;
        tracing::debug!(locus_id = %locus.id, previous, new_default, "locus mutated");
    }
}

/// Pick one parent's copy of a shared locus; range defaults become the
/// parents' mean, kept inside the chosen copy's bounds.
fn crossover<'g, R: Rng + ?Sized>(
    locus_a: &Locus,
    a: &'g GenomeDef,
    locus_b: &Locus,
    b: &'g GenomeDef,
    rng: &mut R,
) -> (Locus, &'g GenomeDef) {
    let (mut locus, source) = if rng.gen::<f64>() < 0.5 {
        (locus_a.clone(), a)
    } else {
        (locus_b.clone(), b)
    };
    if let (Some(da), Some(db)) = (locus_a.default_value(), locus_b.default_value()) {
        if let Distribution::Range(range) = &mut locus.distribution {
            range.default = range.clamp((da + db) / 2.0);
        }
    }
    (locus, source)
}

fn inherit_rules(rules: &mut HashMap<String, LocusRules>, locus_id: &str, source: &GenomeDef) {
    if let Some(r) = source.rules.get(locus_id) {
        rules.insert(locus_id.to_string(), r.clone());
    }
}

/// One-shot recombination with the default safety anchors.
pub fn recombine<R: Rng + ?Sized>(
    a: &GenomeDef,
    b: &GenomeDef,
    child_id: &str,
    mutation_rate: f64,
    rng: &mut R,
) -> GenomeDef {
    Recombinator::new(mutation_rate).recombine(a, b, child_id, rng)
}

// ============================================================================
// Tests
// ============================================================================
