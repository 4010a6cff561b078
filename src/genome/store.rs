//! Genome store — owns the loci and their live parameters.
//!
//! Loci are fixed at construction; only range defaults and per-locus
//! variability change afterwards.

use std::collections::HashMap;

use serde::Serialize;

use super::definition::GenomeDef;
use super::locus::Locus;
use super::validator::{self, Severity};
use crate::error::{PersonaError, Result};
use crate::rules::RuleMatrix;

/// Result of [`GenomeStore::set_default`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SetDefaultOutcome {
    /// The clamped value that was written.
    Written { value: f64 },
    /// The locus is categorical; nothing changed.
    NoOp,
}

/// Live genome state for one persona.
#[derive(Debug, Clone)]
pub struct GenomeStore {
    version: String,
    persona_id: String,
    loci: Vec<Locus>,
    index: HashMap<String, usize>,
}

impl GenomeStore {
    /// Validate a definition and build the store plus its rule matrix.
    ///
    /// Validation warnings are logged; errors fail construction.
    pub fn from_def(def: GenomeDef) -> Result<(Self, RuleMatrix)> {
        let issues = validator::validate(&def);
        let mut errors = Vec::new();
        for issue in &issues {
            match issue.severity {
                Severity::Error => errors.push(issue.to_string()),
                Severity::Warning => tracing::warn!(persona_id = %def.persona_id(), "{}", issue),
            }
        }
        if !errors.is_empty() {
            return Err(PersonaError::Validation(errors.join("; ")));
        }

        let rules = RuleMatrix::new(def.rules, &def.loci)?;
        let index = def
            .loci
            .iter()
            .enumerate()
            .map(|(i, l)| (l.id.clone(), i))
            .collect();

        tracing::debug!(
            persona_id = %def.metadata.persona_id,
            loci = def.loci.len(),
            rules = rules.len(),
            "genome loaded"
        );

        Ok((
            Self {
                version: def.version,
                persona_id: def.metadata.persona_id,
                loci: def.loci,
                index,
            },
            rules,
        ))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn persona_id(&self) -> &str {
        &self.persona_id
    }

    /// Look up a locus by id.
    pub fn get_locus(&self, id: &str) -> Result<&Locus> {
        self.index
            .get(id)
            .map(|&i| &self.loci[i])
            .ok_or_else(|| PersonaError::NotFound(format!("locus '{}'", id)))
    }

    pub(crate) fn get_locus_mut(&mut self, id: &str) -> Result<&mut Locus> {
        match self.index.get(id) {
            Some(&i) => Ok(&mut self.loci[i]),
            None => Err(PersonaError::NotFound(format!("locus '{}'", id))),
        }
    }

    /// Loci ordered for presentation: ascending `display_priority`, ties in
    /// declaration order.
    pub fn list_loci(&self) -> Vec<&Locus> {
        let mut sorted: Vec<&Locus> = self.loci.iter().collect();
        sorted.sort_by_key(|l| l.display_priority);
        sorted
    }

    /// Loci in declaration order (the sampling order).
    pub fn iter(&self) -> impl Iterator<Item = &Locus> {
        self.loci.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Locus> {
        self.loci.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.loci.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loci.is_empty()
    }

    /// Write a range default, clamped into `[min, max]`.
    pub fn set_default(&mut self, id: &str, value: f64) -> Result<SetDefaultOutcome> {
        let locus = self.get_locus_mut(id)?;
        match locus.range_mut() {
            Some(range) => {
                range.default = range.clamp(value);
                Ok(SetDefaultOutcome::Written { value: range.default })
            }
            None => Ok(SetDefaultOutcome::NoOp),
        }
    }

    /// Snapshot of every range default, keyed by locus id.
    pub fn defaults(&self) -> HashMap<String, f64> {
        self.loci
            .iter()
            .filter_map(|l| l.default_value().map(|d| (l.id.clone(), d)))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
