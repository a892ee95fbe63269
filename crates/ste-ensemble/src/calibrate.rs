//! Stochastic hill-climbing over the raw force constants.
//!
//! # Loop
//!
//! ```text
//! state = { candidate: initial, best: initial, best_error: +∞ }
//! repeat `iterations` times:
//!   probe   = run `probe_trials` trials with `candidate` on a fresh seed
//!   error   = |median(probe) − target| / target      (+∞ if no decays)
//!   if error < best_error: best = candidate, best_error = error
//!   candidate = candidate with every tunable × U[1 − max_step, 1 + max_step]
//! return best
//! ```
//!
//! The returned constants are the best *observed*, which is generally not the
//! final candidate.  `best_error` never increases from one iteration to the
//! next.

use ste_core::{DecayConfig, ForceConstants, RunRng};

use crate::{Ensemble, EnsembleError, EnsembleResult, NoopObserver};

/// Knobs of the search.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationSettings {
    /// Median decay time to aim for.
    pub target_half_life: f64,
    /// Trials per probe ensemble.
    pub probe_trials:     usize,
    /// Number of probe/perturb iterations.
    pub iterations:       usize,
    /// Largest relative change applied to a constant in one perturbation.
    pub max_step:         f64,
    /// Seed for probe seeds and perturbation draws.
    pub seed:             u64,
}

impl CalibrationSettings {
    /// Settings aimed at `config.target_half_life`, seeded from `config.seed`.
    pub fn from_config(config: &DecayConfig, probe_trials: usize, iterations: usize) -> Self {
        Self {
            target_half_life: config.target_half_life,
            probe_trials,
            iterations,
            max_step: 0.05,
            seed: config.seed,
        }
    }

    pub fn validate(&self) -> EnsembleResult<()> {
        if !(self.target_half_life.is_finite() && self.target_half_life > 0.0) {
            return Err(settings("target_half_life", "must be positive and finite"));
        }
        if self.probe_trials == 0 {
            return Err(settings("probe_trials", "must be at least 1"));
        }
        if !(self.max_step > 0.0 && self.max_step < 1.0) {
            return Err(settings("max_step", "must lie strictly between 0 and 1"));
        }
        Ok(())
    }
}

fn settings(field: &'static str, reason: &str) -> EnsembleError {
    EnsembleError::Settings { field, reason: reason.to_owned() }
}

/// The evolving search state.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationState {
    /// Constants the next probe will run with.
    pub candidate:  ForceConstants,
    /// Lowest probe error seen so far (`+∞` until a probe decays).
    pub best_error: f64,
    pub best:       ForceConstants,
}

impl CalibrationState {
    pub fn new(initial: ForceConstants) -> Self {
        Self { candidate: initial, best_error: f64::INFINITY, best: initial }
    }

    /// Keep `candidate` as the best if `error` beats the best so far.
    /// Returns `true` on improvement.
    pub fn consider(&mut self, error: f64) -> bool {
        if error < self.best_error {
            self.best_error = error;
            self.best = self.candidate;
            true
        } else {
            false
        }
    }
}

/// One iteration of the search.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationStep {
    pub iteration:    usize,
    pub candidate:    ForceConstants,
    /// Probe median, `None` if the probe produced no decays.
    pub probe_median: Option<f64>,
    /// Probe error (`+∞` if the probe produced no decays).
    pub probe_error:  f64,
    /// Best error after this iteration.
    pub best_error:   f64,
}

/// What the search found.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationReport {
    pub best:       ForceConstants,
    /// `None` if no probe ever decayed (then `best` is the initial set).
    pub best_error: Option<f64>,
    pub history:    Vec<CalibrationStep>,
}

/// Hill-climbing calibrator.  Probe ensembles run on `ensemble`'s worker
/// pool with the ensemble's geometry and timings.
pub struct Calibrator<'a> {
    ensemble: &'a Ensemble,
    settings: CalibrationSettings,
}

impl<'a> Calibrator<'a> {
    pub fn new(ensemble: &'a Ensemble, settings: CalibrationSettings) -> EnsembleResult<Self> {
        settings.validate()?;
        Ok(Self { ensemble, settings })
    }

    #[inline]
    pub fn settings(&self) -> &CalibrationSettings {
        &self.settings
    }

    /// Search starting from `initial`.
    pub fn run(&self, initial: ForceConstants) -> EnsembleResult<CalibrationReport> {
        ste_core::validate_forces(&initial)?;

        let s = &self.settings;
        let mut rng = RunRng::new(s.seed);
        let mut state = CalibrationState::new(initial);
        let mut history = Vec::with_capacity(s.iterations);

        for iteration in 0..s.iterations {
            let probe_seed = rng.child_seed(iteration as u64);
            let runner = self.ensemble.runner().with_forces(state.candidate);
            let report = self
                .ensemble
                .run_with(&runner, probe_seed, s.probe_trials, &mut NoopObserver)?;

            // An empty probe is strictly worse than any numeric error.
            let probe_median = report.summary.median();
            let probe_error = match probe_median {
                Some(m) => crate::summary::relative_error(m, s.target_half_life),
                None    => f64::INFINITY,
            };

            let improved = state.consider(probe_error);
            match probe_median {
                Some(median) if improved => log::info!(
                    "calibration iter {iteration}: half-life {median:.2}, error {:.2}%",
                    probe_error * 100.0
                ),
                Some(_) => {
                    log::debug!("calibration iter {iteration}: error {probe_error:.4}, no improvement")
                }
                None => log::debug!("calibration iter {iteration}: probe produced no decays"),
            }

            history.push(CalibrationStep {
                iteration,
                candidate: state.candidate,
                probe_median,
                probe_error,
                best_error: state.best_error,
            });

            state.candidate = perturb(&state.candidate, s.max_step, &mut rng);
        }

        Ok(CalibrationReport {
            best:       state.best,
            best_error: state.best_error.is_finite().then_some(state.best_error),
            history,
        })
    }
}

/// Scale every tunable constant by an independent factor in
/// `[1 − max_step, 1 + max_step]`.
///
/// Factors are positive, so signs (and validity) are preserved.
pub fn perturb(forces: &ForceConstants, max_step: f64, rng: &mut RunRng) -> ForceConstants {
    let lo = 1.0 - max_step;
    let hi = 1.0 + max_step;
    ForceConstants {
        attraction:      forces.attraction * rng.gen_range(lo..=hi),
        drag:            forces.drag * rng.gen_range(lo..=hi),
        noise_amplitude: forces.noise_amplitude * rng.gen_range(lo..=hi),
        leak_rate:       forces.leak_rate * rng.gen_range(lo..=hi),
        crash_threshold: forces.crash_threshold * rng.gen_range(lo..=hi),
    }
}
