//! Plain data row types written by output backends.

use ste_ensemble::{DecayStatistics, EnsembleSummary};
use ste_trial::TrialResult;

/// One trial's outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialRow {
    pub trial:            u32,
    /// `decayed`, `no_ignition` or `no_collision`.
    pub outcome:          &'static str,
    /// Present only for decayed trials.
    pub decay_time:       Option<f64>,
    /// Present once the trial reached the crash phase.
    pub crash_entered_at: Option<f64>,
}

impl From<&TrialResult> for TrialRow {
    fn from(r: &TrialResult) -> Self {
        Self {
            trial:            r.trial.0,
            outcome:          r.outcome.label(),
            decay_time:       r.decay_time(),
            crash_entered_at: r.outcome.crash_entered_at(),
        }
    }
}

/// Counts and statistics for one run.  Statistic columns are empty when
/// no trial decayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryRow {
    pub trials:              usize,
    pub decays:              usize,
    pub no_ignition:         usize,
    pub no_collision:        usize,
    pub target_half_life:    f64,
    pub mean:                Option<f64>,
    pub median:              Option<f64>,
    pub std_dev:             Option<f64>,
    pub cv:                  Option<f64>,
    pub min:                 Option<f64>,
    pub max:                 Option<f64>,
    pub half_life_error:     Option<f64>,
    pub mean_lifetime_error: Option<f64>,
}

impl From<&EnsembleSummary> for SummaryRow {
    fn from(s: &EnsembleSummary) -> Self {
        let stats = match s.stats {
            DecayStatistics::Measured(d) => Some(d),
            DecayStatistics::InsufficientDecays => None,
        };
        Self {
            trials:              s.trials,
            decays:              s.decays,
            no_ignition:         s.no_ignition,
            no_collision:        s.no_collision,
            target_half_life:    s.target_half_life,
            mean:                stats.map(|d| d.mean),
            median:              stats.map(|d| d.median),
            std_dev:             stats.map(|d| d.std_dev),
            cv:                  stats.map(|d| d.cv),
            min:                 stats.map(|d| d.min),
            max:                 stats.map(|d| d.max),
            half_life_error:     stats.map(|d| d.half_life_error),
            mean_lifetime_error: stats.map(|d| d.mean_lifetime_error),
        }
    }
}
