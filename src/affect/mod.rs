//! Affect simulator — pleasure / arousal / dominance mood state.
//!
//! Projections push discrete impulses into the mood; a periodic `tick`
//! pulls every axis back toward the stance-derived baseline:
//!
//! ```text
//! axis += (baseline.axis - axis) * decay_rate
//! ```
//!
//! With `decay_rate` in (0, 1) this converges monotonically and never
//! overshoots the baseline.

use serde::{Deserialize, Serialize};

use crate::config::{ImpulseProfiles, PadDelta};

/// A point in PAD space. Each axis lies in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pad {
    pub p: f64,
    pub a: f64,
    pub d: f64,
}

impl Pad {
    pub fn new(p: f64, a: f64, d: f64) -> Self {
        Self { p, a, d }
    }

    fn clamped(self) -> Self {
        Self {
            p: self.p.clamp(-1.0, 1.0),
            a: self.a.clamp(-1.0, 1.0),
            d: self.d.clamp(-1.0, 1.0),
        }
    }

    /// Largest per-axis distance to `other`.
    pub fn distance(&self, other: &Pad) -> f64 {
        (self.p - other.p)
            .abs()
            .max((self.a - other.a).abs())
            .max((self.d - other.d).abs())
    }
}

/// Which impulse a projection applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpulseProfile {
    /// Raises pleasure and arousal moderately, lowers dominance slightly.
    Supportive,
    /// Lowers pleasure, raises arousal and dominance strongly.
    Critical,
}

impl ImpulseProfile {
    pub fn for_influence(influence: f64, threshold: f64) -> Self {
        if influence > threshold {
            Self::Supportive
        } else {
            Self::Critical
        }
    }
}

/// Read-only sampling modulation derived from the current mood.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarpFactors {
    /// High arousal widens variability: `1 + 0.5 * |a|`.
    pub variability_warp: f64,
    /// Dominance biases assertive traits: `0.2 * d`.
    pub bias_warp: f64,
}

// ============================================================================
// AffectSimulator
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AffectSimulator {
    current: Pad,
    baseline: Pad,
    decay_rate: f64,
    #[serde(skip)]
    impulses: ImpulseProfiles,
}

impl AffectSimulator {
    /// Start at the origin with a zero baseline.
    pub fn new(decay_rate: f64, impulses: ImpulseProfiles) -> Self {
        Self {
            current: Pad::default(),
            baseline: Pad::default(),
            decay_rate,
            impulses,
        }
    }

    pub fn current(&self) -> Pad {
        self.current
    }

    pub fn baseline(&self) -> Pad {
        self.baseline
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    /// Replace the baseline. The current mood is left to decay toward it.
    pub fn set_baseline(&mut self, baseline: Pad) {
        self.baseline = baseline;
    }

    /// Apply one discrete impulse, clamping every axis into [-1, 1].
    pub fn apply_impulse(&mut self, profile: ImpulseProfile) -> Pad {
        let delta: PadDelta = match profile {
            ImpulseProfile::Supportive => self.impulses.supportive,
            ImpulseProfile::Critical => self.impulses.critical,
        };
        self.current = Pad {
            p: self.current.p + delta.p,
            a: self.current.a + delta.a,
            d: self.current.d + delta.d,
        }
        .clamped();
        self.current
    }

    /// One exponential decay step toward the baseline.
    pub fn tick(&mut self) -> Pad {
        let k = self.decay_rate;
        let b = self.baseline;
        let c = &mut self.current;
        c.p += (b.p - c.p) * k;
        c.a += (b.a - c.a) * k;
        c.d += (b.d - c.d) * k;
        self.current
    }

    pub fn warp_factors(&self) -> WarpFactors {
        WarpFactors {
            variability_warp: 1.0 + self.current.a.abs() * 0.5,
            bias_warp: self.current.d * 0.2,
        }
    }

    /// Back to the origin; baseline is left for the caller to re-derive.
    pub fn reset(&mut self) {
        self.current = Pad::default();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sim() -> AffectSimulator {
        AffectSimulator::new(0.05, ImpulseProfiles::default())
    }

    #[test]
    fn test_supportive_impulse() {
        let mut s = sim();
        let pad = s.apply_impulse(ImpulseProfile::Supportive);
        assert!((pad.p - 0.2).abs() < 1e-12);
        assert!((pad.a - 0.1).abs() < 1e-12);
        assert!((pad.d + 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_critical_impulse_clamps() {
        let mut s = sim();
        for _ in 0..10 {
            s.apply_impulse(ImpulseProfile::Critical);
        }
        let pad = s.current();
        assert_eq!(pad.p, -1.0);
        assert_eq!(pad.a, 1.0);
        assert_eq!(pad.d, 1.0);
    }

    #[test]
    fn test_profile_threshold() {
        assert_eq!(ImpulseProfile::for_influence(0.51, 0.5), ImpulseProfile::Supportive);
        assert_eq!(ImpulseProfile::for_influence(0.5, 0.5), ImpulseProfile::Critical);
        assert_eq!(ImpulseProfile::for_influence(0.0, 0.5), ImpulseProfile::Critical);
    }

    #[test]
    fn test_tick_converges_without_overshoot() {
        let mut s = sim();
        s.set_baseline(Pad::new(0.2, -0.1, 0.44));
        s.apply_impulse(ImpulseProfile::Critical);
        s.apply_impulse(ImpulseProfile::Critical);

        let baseline = s.baseline();
        let start = s.current();
        let mut last = start.distance(&baseline);
        for _ in 0..2000 {
            let now = s.tick();
            let dist = now.distance(&baseline);
            assert!(dist <= last + 1e-15, "distance grew: {} -> {}", last, dist);
            // each axis stays on the side it started on
            assert!((now.p - baseline.p) * (start.p - baseline.p) >= 0.0);
            assert!((now.a - baseline.a) * (start.a - baseline.a) >= 0.0);
            assert!((now.d - baseline.d) * (start.d - baseline.d) >= 0.0);
            last = dist;
        }
        assert!(last < 1e-9);
    }

    #[test]
    fn test_set_baseline_does_not_snap() {
        let mut s = sim();
        s.set_baseline(Pad::new(0.5, 0.5, 0.5));
        assert_eq!(s.current(), Pad::default());
        s.tick();
        assert!((s.current().p - 0.025).abs() < 1e-12);
    }

    #[test]
    fn test_warp_factors() {
        let mut s = sim();
        s.apply_impulse(ImpulseProfile::Critical);
        let w = s.warp_factors();
        assert!((w.variability_warp - 1.1).abs() < 1e-12);
        assert!((w.bias_warp - 0.06).abs() < 1e-12);
    }
}
