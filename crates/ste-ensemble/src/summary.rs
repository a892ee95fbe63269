//! Ensemble statistics.
//!
//! An ensemble with zero decays has no statistics.  That case is its own
//! variant, [`DecayStatistics::InsufficientDecays`], never a zero mean or a
//! NaN median.

use std::f64::consts::LN_2;
use std::fmt;

use ste_trial::{TrialOutcome, TrialResult};

/// Descriptive statistics over a non-empty set of decay times.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecayStats {
    pub count:   usize,
    pub mean:    f64,
    /// The simulated half-life.
    pub median:  f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min:     f64,
    pub max:     f64,
    /// Coefficient of variation (`std_dev / mean`).  Near 1 for an
    /// exponential-like distribution.
    pub cv:      f64,
    /// `|median − target| / target`.
    pub half_life_error:     f64,
    /// `|mean − target / ln 2| / (target / ln 2)`.
    pub mean_lifetime_error: f64,
}

impl DecayStats {
    /// Statistics over `times`, or `None` if `times` is empty.
    pub fn from_times(times: &[f64], target_half_life: f64) -> Option<Self> {
        if times.is_empty() {
            return None;
        }
        let n = times.len() as f64;
        let mean = times.iter().sum::<f64>() / n;
        let var = times.iter().map(|t| (t - mean) * (t - mean)).sum::<f64>() / n;
        let std_dev = var.sqrt();
        let median = median(times)?;
        let min = times.iter().copied().fold(f64::INFINITY, f64::min);
        let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let target_mean = target_half_life / LN_2;

        Some(Self {
            count: times.len(),
            mean,
            median,
            std_dev,
            min,
            max,
            cv: if mean > 0.0 { std_dev / mean } else { 0.0 },
            half_life_error:     relative_error(median, target_half_life),
            mean_lifetime_error: relative_error(mean, target_mean),
        })
    }
}

/// Median of `values` (mean of the two middle values for an even count).
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// `|value − target| / target`.
#[inline]
pub fn relative_error(value: f64, target: f64) -> f64 {
    (value - target).abs() / target
}

/// Either statistics over the decays, or the explicit no-decay marker.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecayStatistics {
    InsufficientDecays,
    Measured(DecayStats),
}

/// Outcome counts plus decay statistics for one ensemble run.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnsembleSummary {
    pub trials:           usize,
    pub decays:           usize,
    pub no_ignition:      usize,
    pub no_collision:     usize,
    pub target_half_life: f64,
    pub stats:            DecayStatistics,
}

impl EnsembleSummary {
    /// Summarise `results` against `target_half_life`.
    pub fn from_results(results: &[TrialResult], target_half_life: f64) -> Self {
        let mut counts = OutcomeCounts::default();
        let mut times = Vec::new();
        for r in results {
            counts.record(&r.outcome);
            if let Some(t) = r.decay_time() {
                times.push(t);
            }
        }
        Self::from_parts(counts, &times, target_half_life)
    }

    pub(crate) fn from_parts(counts: OutcomeCounts, times: &[f64], target_half_life: f64) -> Self {
        let stats = match DecayStats::from_times(times, target_half_life) {
            Some(s) => DecayStatistics::Measured(s),
            None    => DecayStatistics::InsufficientDecays,
        };
        Self {
            trials:       counts.trials,
            decays:       counts.decays,
            no_ignition:  counts.no_ignition,
            no_collision: counts.no_collision,
            target_half_life,
            stats,
        }
    }

    #[inline]
    pub fn is_insufficient(&self) -> bool {
        matches!(self.stats, DecayStatistics::InsufficientDecays)
    }

    #[inline]
    pub fn measured(&self) -> Option<&DecayStats> {
        match &self.stats {
            DecayStatistics::Measured(s) => Some(s),
            DecayStatistics::InsufficientDecays => None,
        }
    }

    /// Simulated half-life (median decay time), if any trial decayed.
    #[inline]
    pub fn median(&self) -> Option<f64> {
        self.measured().map(|s| s.median)
    }

    #[inline]
    pub fn half_life_error(&self) -> Option<f64> {
        self.measured().map(|s| s.half_life_error)
    }
}

impl fmt::Display for EnsembleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "trials: {}  decays: {}  no ignition: {}  no collision: {}",
            self.trials, self.decays, self.no_ignition, self.no_collision
        )?;
        match &self.stats {
            DecayStatistics::InsufficientDecays => {
                write!(f, "insufficient decays: no statistics available")
            }
            DecayStatistics::Measured(s) => {
                writeln!(f, "mean {:.2}  std {:.2}  CV {:.2}", s.mean, s.std_dev, s.cv)?;
                writeln!(
                    f,
                    "half-life (median) {:.2}  target {:.2}  error {:.2}%",
                    s.median,
                    self.target_half_life,
                    s.half_life_error * 100.0
                )?;
                writeln!(
                    f,
                    "mean lifetime error {:.2}%",
                    s.mean_lifetime_error * 100.0
                )?;
                write!(f, "min {:.2}  max {:.2}", s.min, s.max)
            }
        }
    }
}

/// Per-outcome tallies.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct OutcomeCounts {
    pub trials:       usize,
    pub decays:       usize,
    pub no_ignition:  usize,
    pub no_collision: usize,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: &TrialOutcome) {
        self.trials += 1;
        match outcome {
            TrialOutcome::Decayed { .. }     => self.decays += 1,
            TrialOutcome::NoIgnition { .. }  => self.no_ignition += 1,
            TrialOutcome::NoCollision { .. } => self.no_collision += 1,
        }
    }
}
