//! Force constants and the per-trial coupling set derived from them.
//!
//! # Two layers
//!
//! [`ForceConstants`] are the raw, tunable knobs supplied by configuration
//! (and nudged by the calibrator).  [`CouplingConstants`] are what a single
//! trial actually runs with: the raw knobs plus a repulsion coefficient
//! derived at trial start so that, at the initial separation `d0`,
//!
//!   attraction / d0²  ==  repulsion · exp(−d0 / (C / 10))
//!
//! A `CouplingConstants` value is immutable.  Disabling repulsion when the
//! collapse begins produces a new value via
//! [`without_repulsion`][CouplingConstants::without_repulsion].

use crate::Ring;

// ── ForceConstants ────────────────────────────────────────────────────────────

/// Raw force knobs, shared by every trial of an ensemble.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ForceConstants {
    /// Inverse-square attraction coefficient.
    pub attraction:      f64,
    /// Linear velocity drag coefficient.
    pub drag:            f64,
    /// Half-width of the symmetric-uniform charge-in draw.
    pub noise_amplitude: f64,
    /// Energy drained every coarse tick.
    pub leak_rate:       f64,
    /// Stored energy above which the collapse begins.
    pub crash_threshold: f64,
}

impl ForceConstants {
    /// Derive charge-in noise and leak from a mean WAIT duration (in coarse
    /// ticks), treating the charge as an unclamped random walk with drift.
    ///
    /// With `drift = threshold / mean_lifetime`, the mean net charge per tick
    /// `noise / 2 − leak` equals `drift`, and `noise = sqrt(12 · drift · threshold)`.
    ///
    /// This is an approximation.  The energy is clamped at zero, which
    /// pushes the walk upward near the floor, so simulated lifetimes come out
    /// shorter than `mean_lifetime` (roughly 0.6× with the defaults).  Use
    /// the calibrator to hit a target precisely.
    pub fn for_mean_lifetime(
        crash_threshold: f64,
        mean_lifetime:   f64,
        attraction:      f64,
        drag:            f64,
    ) -> Self {
        let drift = crash_threshold / mean_lifetime;
        let noise_amplitude = (12.0 * drift * crash_threshold).sqrt();
        Self {
            attraction,
            drag,
            noise_amplitude,
            leak_rate: noise_amplitude / 2.0 - drift,
            crash_threshold,
        }
    }

    /// Mean net energy gained per coarse tick before clamping.
    #[inline]
    pub fn mean_drift(&self) -> f64 {
        self.noise_amplitude / 2.0 - self.leak_rate
    }
}

impl Default for ForceConstants {
    /// Constants tuned for an 878 s mean lifetime at a 1 s coarse tick.
    fn default() -> Self {
        Self::for_mean_lifetime(2.805e-19, 878.0, 4e-2, 1e-10)
    }
}

// ── CouplingConstants ─────────────────────────────────────────────────────────

/// The complete constant set one trial runs with.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CouplingConstants {
    pub attraction:         f64,
    pub repulsion:          f64,
    pub drag:               f64,
    pub noise_amplitude:    f64,
    pub leak_rate:          f64,
    pub crash_threshold:    f64,
    pub collision_distance: f64,
}

impl CouplingConstants {
    /// Build the trial's constants with repulsion balancing attraction at
    /// `initial_separation`.
    ///
    /// If the exponential factor underflows to zero the repulsion is zero.
    pub fn balanced(
        forces:             &ForceConstants,
        ring:               &Ring,
        initial_separation: f64,
        collision_distance: f64,
    ) -> Self {
        let attract = forces.attraction / (initial_separation * initial_separation);
        let falloff = (-initial_separation / ring.repulsion_length()).exp();
        let repulsion = if falloff > 0.0 { attract / falloff } else { 0.0 };

        Self {
            attraction: forces.attraction,
            repulsion,
            drag: forces.drag,
            noise_amplitude: forces.noise_amplitude,
            leak_rate: forces.leak_rate,
            crash_threshold: forces.crash_threshold,
            collision_distance,
        }
    }

    /// The same constants with the short-range repulsion switched off.
    #[inline]
    pub fn without_repulsion(self) -> Self {
        Self { repulsion: 0.0, ..self }
    }
}
