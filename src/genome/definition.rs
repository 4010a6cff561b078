//! Genome definition — the static configuration a persona is built from.
//!
//! A `GenomeDef` is pure data: version, persona id, the ordered loci, and the
//! prompt rule matrix.  [`super::store::GenomeStore::from_def`] validates it
//! and turns it into live state.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0.0"
//! metadata:
//!   persona_id: "pioneer_v2"
//! loci:
//!   - id: explanation_depth
//!     category: cognitive
//!     display_priority: 2
//!     description: "Preference for abstract theory vs concrete examples"
//!     distribution:
//!       type: range
//!       values: { min: 0.2, max: 0.5, default: 0.35 }
//!     weight: 0.8
//!     variability: 0.2
//!     stance_role: rigor
//! rules:
//!   explanation_depth:
//!     - { range: [0.0, 0.3], text: "Explain using simple analogies.", tone: analogical }
//! ```

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::locus::Locus;
use crate::error::Result;
use crate::rules::LocusRules;

/// The built-in `pioneer_v2` persona.
pub const BUILTIN_GENOME_YAML: &str = include_str!("../../genomes/pioneer_v2.yaml");

/// Descriptive metadata carried with a genome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenomeMetadata {
    #[serde(default)]
    pub persona_id: String,
    /// Persona ids this genome was bred from, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A complete genome definition loaded from YAML or JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeDef {
    /// Semantic version of the genome document.
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub metadata: GenomeMetadata,
    /// Loci in declaration order; this is the sampling order.
    #[serde(default)]
    pub loci: Vec<Locus>,
    /// Prompt rules keyed by locus id.
    #[serde(default)]
    pub rules: HashMap<String, LocusRules>,
}

impl GenomeDef {
    /// Parse a `GenomeDef` from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a `GenomeDef` from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from disk; `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        if path.extension().map_or(false, |ext| ext == "json") {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// The embedded `pioneer_v2` persona.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_GENOME_YAML)
    }

    pub fn persona_id(&self) -> &str {
        &self.metadata.persona_id
    }
}

// ============================================================================
// Tests
// ============================================================================
