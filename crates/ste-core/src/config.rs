//! Run configuration.
//!
//! `DecayConfig` is the single configuration value consumed by the trial
//! runner, the ensemble orchestrator and the calibrator.  It is plain data:
//! applications build it in code (starting from [`Default`]) or, with the
//! `serde` feature, load it from a JSON/TOML file.
//!
//! # Defaults
//!
//! | Field                | Default                     |
//! |----------------------|-----------------------------|
//! | `circumference`      | 1.0                         |
//! | `trials`             | 1 000                       |
//! | `num_threads`        | `None` (all logical cores)  |
//! | `coarse_dt`          | 1.0                         |
//! | `fine_dt`            | 1e-6                        |
//! | `wait_horizon`       | 10 000.0                    |
//! | `crash_window`       | 10.0                        |
//! | `collision_distance` | 0.01                        |
//! | `target_half_life`   | 878 · ln 2 ≈ 608.6          |
//! | `seed`               | 42                          |
//! | `forces`             | [`ForceConstants::default`] |

use std::f64::consts::LN_2;

use crate::{ForceConstants, Ring, SteError, SteResult};

/// Mean lifetime the default constants are tuned for.
pub const DEFAULT_MEAN_LIFETIME: f64 = 878.0;

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecayConfig {
    /// Circumference of the ring domain.
    pub circumference: f64,

    /// Number of independent trials in a full ensemble run.
    pub trials: usize,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    /// Ignored without the `parallel` feature of `ste-ensemble`.
    pub num_threads: Option<usize>,

    /// Step size during the charging phase.
    pub coarse_dt: f64,

    /// Step size during the collapse phase.
    pub fine_dt: f64,

    /// Simulated time after which a trial that never ignited is abandoned.
    pub wait_horizon: f64,

    /// Duration of the collapse window after ignition.
    pub crash_window: f64,

    /// Separation below which the flares count as collided.
    pub collision_distance: f64,

    /// Median decay time the ensemble should reproduce.
    pub target_half_life: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Raw force constants.
    pub forces: ForceConstants,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            circumference:      1.0,
            trials:             1_000,
            num_threads:        None,
            coarse_dt:          1.0,
            fine_dt:            1e-6,
            wait_horizon:       10_000.0,
            crash_window:       10.0,
            collision_distance: 0.01,
            target_half_life:   DEFAULT_MEAN_LIFETIME * LN_2,
            seed:               42,
            forces:             ForceConstants::default(),
        }
    }
}

/// The four timing knobs the phase controller needs, split out so trials
/// don't carry the whole configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhaseTimings {
    pub coarse_dt:    f64,
    pub fine_dt:      f64,
    pub wait_horizon: f64,
    pub crash_window: f64,
}

impl PhaseTimings {
    /// Coarse ticks before an un-ignited trial is abandoned.
    #[inline]
    pub fn wait_ticks(&self) -> u64 {
        step_count(self.wait_horizon, self.coarse_dt)
    }

    /// Fine steps in the collapse window.
    #[inline]
    pub fn crash_steps(&self) -> u64 {
        step_count(self.crash_window, self.fine_dt)
    }
}

/// Steps of `dt` needed to cover `span`.
fn step_count(span: f64, dt: f64) -> u64 {
    (span / dt).ceil() as u64
}

impl DecayConfig {
    /// The ring domain described by this configuration.
    #[inline]
    pub fn ring(&self) -> Ring {
        Ring::new(self.circumference)
    }

    #[inline]
    pub fn timings(&self) -> PhaseTimings {
        PhaseTimings {
            coarse_dt:    self.coarse_dt,
            fine_dt:      self.fine_dt,
            wait_horizon: self.wait_horizon,
            crash_window: self.crash_window,
        }
    }

    /// Mean lifetime implied by the half-life target (`half_life / ln 2`).
    #[inline]
    pub fn target_mean_lifetime(&self) -> f64 {
        self.target_half_life / LN_2
    }

    /// Fail fast on any value that would make a trial meaningless.
    ///
    /// Called by every entry point that runs trials, before the first trial.
    pub fn validate(&self) -> SteResult<()> {
        positive("circumference", self.circumference)?;
        if self.trials == 0 {
            return Err(SteError::invalid("trials", "must be at least 1"));
        }
        if self.num_threads == Some(0) {
            return Err(SteError::invalid("num_threads", "must be at least 1 when set"));
        }
        positive("coarse_dt", self.coarse_dt)?;
        positive("fine_dt", self.fine_dt)?;
        if self.fine_dt > self.coarse_dt {
            return Err(SteError::invalid(
                "fine_dt",
                format!("({}) must not exceed coarse_dt ({})", self.fine_dt, self.coarse_dt),
            ));
        }
        positive("wait_horizon", self.wait_horizon)?;
        positive("crash_window", self.crash_window)?;
        positive("collision_distance", self.collision_distance)?;
        if self.collision_distance >= self.circumference / 2.0 {
            return Err(SteError::invalid(
                "collision_distance",
                format!(
                    "({}) must be below half the circumference ({})",
                    self.collision_distance,
                    self.circumference / 2.0
                ),
            ));
        }
        // Every step must move simulated time, up to the latest instant a
        // trial can reach.
        advances("coarse_dt", self.coarse_dt, self.wait_horizon)?;
        advances("fine_dt", self.fine_dt, self.wait_horizon + self.crash_window)?;
        positive("target_half_life", self.target_half_life)?;
        validate_forces(&self.forces)
    }
}

/// Check raw force constants on their own (the calibrator re-checks every
/// perturbed candidate).
pub fn validate_forces(forces: &ForceConstants) -> SteResult<()> {
    non_negative("forces.attraction", forces.attraction)?;
    non_negative("forces.drag", forces.drag)?;
    non_negative("forces.noise_amplitude", forces.noise_amplitude)?;
    non_negative("forces.leak_rate", forces.leak_rate)?;
    positive("forces.crash_threshold", forces.crash_threshold)
}

fn positive(field: &'static str, value: f64) -> SteResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SteError::invalid(field, format!("must be positive and finite, got {value}")))
    }
}

fn advances(field: &'static str, dt: f64, latest: f64) -> SteResult<()> {
    if latest + dt > latest {
        Ok(())
    } else {
        Err(SteError::invalid(
            field,
            format!("({dt}) is too small to advance simulated time at t = {latest}"),
        ))
    }
}

fn non_negative(field: &'static str, value: f64) -> SteResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SteError::invalid(field, format!("must be non-negative and finite, got {value}")))
    }
}
