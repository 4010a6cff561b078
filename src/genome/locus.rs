//! Locus types — one bounded or categorical personality trait.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================================================
// Distributions
// ============================================================================

/// Bounds and current default of a range locus.
///
/// Invariant: `min <= default <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeValues {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl RangeValues {
    /// Clamp `value` into `[min, max]`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// `min + (max - min) * t`.
    pub fn lerp(&self, t: f64) -> f64 {
        self.min + self.span() * t
    }
}

/// Category label → non-negative weight, in declared order.
///
/// Serialized as a map so genome files read naturally; the declared order
/// is the order categorical selection walks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryWeights(pub Vec<(String, f64)>);

impl CategoryWeights {
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(label, w)| (label.as_str(), *w))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(label, _)| label.as_str())
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, w)| *w)
    }

    pub fn total(&self) -> f64 {
        self.0.iter().map(|(_, w)| w.max(0.0)).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CategoryWeights {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, weight) in &self.0 {
            map.serialize_entry(label, weight)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryWeights {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = CategoryWeights;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category label to weight")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, weight)) = access.next_entry::<String, f64>()? {
                    entries.push((label, weight));
                }
                Ok(CategoryWeights(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// A locus's value distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum Distribution {
    Range(RangeValues),
    Categorical(CategoryWeights),
}

impl Distribution {
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range(_))
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, Self::Categorical(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Range(_) => "range",
            Self::Categorical(_) => "categorical",
        }
    }
}

// ============================================================================
// Stance roles
// ============================================================================

/// Which stance axis drives a range locus's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StanceRole {
    /// `default = min + (max - min) * r`.
    Rigor,
    /// `default = w`.
    Warmth,
    /// `default = min + (max - min) * c`.
    Chaos,
    /// Left untouched by stance application.
    #[default]
    None,
}

// ============================================================================
// Locus
// ============================================================================

/// One named trait in the genome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locus {
    /// Unique key.
    pub id: String,
    /// Informational tag (`cognitive`, `value`, `style`, `domain`).
    pub category: String,
    /// Presentation ordering hint; never affects sampling.
    #[serde(default = "default_display_priority")]
    pub display_priority: i32,
    #[serde(default)]
    pub description: String,
    pub distribution: Distribution,
    /// Reserved influence factor. Not consumed by any computation.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Bounds how far one drift nudge may move the default.
    #[serde(default = "default_variability")]
    pub variability: f64,
    #[serde(default)]
    pub stance_role: StanceRole,
    /// Attractor loci are hidden from low-influence projections.
    #[serde(default)]
    pub attractor: bool,
}

fn default_display_priority() -> i32 {
    99
}
fn default_weight() -> f64 {
    0.5
}
fn default_variability() -> f64 {
    0.5
}

impl Locus {
    pub fn range(&self) -> Option<&RangeValues> {
        match &self.distribution {
            Distribution::Range(r) => Some(r),
            Distribution::Categorical(_) => None,
        }
    }

    pub fn categories(&self) -> Option<&CategoryWeights> {
        match &self.distribution {
            Distribution::Categorical(c) => Some(c),
            Distribution::Range(_) => None,
        }
    }

    /// Current default of a range locus.
    pub fn default_value(&self) -> Option<f64> {
        self.range().map(|r| r.default)
    }

    pub(crate) fn range_mut(&mut self) -> Option<&mut RangeValues> {
        match &mut self.distribution {
            Distribution::Range(r) => Some(r),
            Distribution::Categorical(_) => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
