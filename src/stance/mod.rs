//! Stance mapper — projects the (rigor, warmth, chaos) vector onto the genome.
//!
//! ```text
//! StanceVector (r, w, c)
//!   ├─ rigor loci   → default = min + (max − min)·r
//!   ├─ warmth loci  → default = w
//!   ├─ chaos loci   → default = min + (max − min)·c
//!   ├─ every locus  → variability = 0.05 + 0.4·c
//!   └─ affect       → baseline = (0.8w − 0.2, 0.7c − 0.1, 0.6r − 0.1)
//! ```
//!
//! Application is a full overwrite, so it is idempotent for a given vector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::affect::Pad;
use crate::error::PersonaError;
use crate::genome::{GenomeStore, StanceRole};

/// Three-axis control input, each component in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StanceVector {
    /// Rigor.
    pub r: f64,
    /// Warmth / identity polarity.
    pub w: f64,
    /// Chaos / expressiveness.
    pub c: f64,
}

fn unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

impl StanceVector {
    /// Build a vector, clamping every component into [0, 1].
    pub fn new(r: f64, w: f64, c: f64) -> Self {
        Self {
            r: unit(r),
            w: unit(w),
            c: unit(c),
        }
    }

    pub fn clamped(self) -> Self {
        Self::new(self.r, self.w, self.c)
    }

    /// Mood baseline implied by this stance.
    pub fn affect_baseline(&self) -> Pad {
        Pad {
            p: self.w * 0.8 - 0.2,
            a: self.c * 0.7 - 0.1,
            d: self.r * 0.6 - 0.1,
        }
    }

    /// Variability every locus takes under this stance.
    pub fn variability(&self) -> f64 {
        0.05 + 0.4 * self.c
    }
}

impl Default for StanceVector {
    fn default() -> Self {
        Self::new(0.5, 0.5, 0.5)
    }
}

/// Recompute stance-aligned defaults and every locus's variability.
///
/// Loci with [`StanceRole::None`] keep their defaults.
pub fn map_onto(store: &mut GenomeStore, stance: &StanceVector) {
    let variability = stance.variability();
    for locus in store.iter_mut() {
        locus.variability = variability;
        let role = locus.stance_role;
        if let Some(range) = locus.range_mut() {
            let target = match role {
                StanceRole::Rigor => range.lerp(stance.r),
                StanceRole::Warmth => stance.w,
                StanceRole::Chaos => range.lerp(stance.c),
                StanceRole::None => continue,
            };
            range.default = range.clamp(target);
        }
    }
}

// ============================================================================
// Presets
// ============================================================================

/// Named stances for common scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StancePreset {
    /// Neutral midpoint.
    Default,
    /// Logic-first, cool, low chaos.
    Factual,
    /// Warm, relaxed rigor.
    Supportive,
}

impl StancePreset {
    pub const ALL: [StancePreset; 3] = [Self::Default, Self::Factual, Self::Supportive];

    pub fn stance(&self) -> StanceVector {
        match self {
            Self::Default => StanceVector::new(0.5, 0.5, 0.5),
            Self::Factual => StanceVector::new(0.9, 0.2, 0.1),
            Self::Supportive => StanceVector::new(0.3, 0.9, 0.4),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Factual => "factual",
            Self::Supportive => "supportive",
        }
    }
}

impl fmt::Display for StancePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StancePreset {
    type Err = PersonaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PersonaError::NotFound(format!("stance preset '{}'", s)))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::GenomeDef;

    fn store() -> GenomeStore {
        GenomeStore::from_def(GenomeDef::builtin().unwrap()).unwrap().0
    }

    fn default_of(s: &GenomeStore, id: &str) -> f64 {
        s.get_locus(id).unwrap().default_value().unwrap()
    }

    #[test]
    fn test_rigor_locus_scenario() {
        // rigor-aligned {min: 0.4, max: 0.9}
        let mut def = GenomeDef::builtin().unwrap();
        let locus = def.loci.iter_mut().find(|l| l.id == "logical_rigor").unwrap();
        locus.distribution = crate::genome::Distribution::Range(crate::genome::RangeValues {
            min: 0.4,
            max: 0.9,
            default: 0.5,
        });
        let (mut s, _) = GenomeStore::from_def(def).unwrap();
        map_onto(&mut s, &StanceVector::new(0.9, 0.2, 0.1));
        assert!((default_of(&s, "logical_rigor") - 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_roles_and_variability() {
        let mut s = store();
        let stance = StanceVector::new(0.9, 0.2, 0.1);
        map_onto(&mut s, &stance);
        assert!((default_of(&s, "explanation_depth") - (0.2 + 0.3 * 0.9)).abs() < 1e-12);
        assert_eq!(default_of(&s, "identity_signature"), 0.2);
        assert!((default_of(&s, "humor_density") - (0.05 + 0.4 * 0.1)).abs() < 1e-12);
        for locus in s.iter() {
            assert!((locus.variability - 0.09).abs() < 1e-12);
        }
    }

    #[test]
    fn test_unaligned_locus_untouched() {
        let mut def = GenomeDef::builtin().unwrap();
        def.loci
            .iter_mut()
            .find(|l| l.id == "humor_density")
            .unwrap()
            .stance_role = StanceRole::None;
        let (mut s, _) = GenomeStore::from_def(def).unwrap();
        map_onto(&mut s, &StanceVector::new(1.0, 1.0, 1.0));
        assert_eq!(default_of(&s, "humor_density"), 0.2);
    }

    #[test]
    fn test_idempotent() {
        let mut a = store();
        let stance = StanceVector::new(0.3, 0.7, 0.6);
        map_onto(&mut a, &stance);
        let first = a.defaults();
        map_onto(&mut a, &stance);
        assert_eq!(first, a.defaults());
        assert_eq!(stance.affect_baseline(), stance.affect_baseline());
    }

    #[test]
    fn test_clamps_components() {
        let v = StanceVector::new(1.5, -0.2, f64::NAN);
        assert_eq!((v.r, v.w, v.c), (1.0, 0.0, 0.0));
    }

    #[test]
    fn test_affect_baseline() {
        let b = StanceVector::new(0.9, 0.2, 0.1).affect_baseline();
        assert!((b.p - (-0.04)).abs() < 1e-12);
        assert!((b.a - (-0.03)).abs() < 1e-12);
        assert!((b.d - 0.44).abs() < 1e-12);
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("Factual".parse::<StancePreset>().unwrap(), StancePreset::Factual);
        assert_eq!(StancePreset::Supportive.stance(), StanceVector::new(0.3, 0.9, 0.4));
        assert!(matches!("chaotic".parse::<StancePreset>(), Err(PersonaError::NotFound(_))));
    }
}
