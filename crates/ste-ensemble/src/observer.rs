//! Ensemble observer trait for progress reporting and data collection.

use ste_trial::TrialResult;

use crate::{EnsembleSummary, ProgressSnapshot};

/// Callbacks invoked by [`Ensemble::run`][crate::Ensemble::run] as trials
/// complete.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Every callback runs on the thread that
/// called `run`, after the trials it reports on have finished.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl EnsembleObserver for ProgressPrinter {
///     fn on_progress(&mut self, p: &ProgressSnapshot) {
///         println!("{}/{} trials, {} decays", p.completed, p.total, p.decays);
///     }
/// }
/// ```
pub trait EnsembleObserver {
    /// Called once before the first trial.
    fn on_run_start(&mut self, _total: usize) {}

    /// Called for every trial, in ascending trial order.
    fn on_trial_end(&mut self, _result: &TrialResult) {}

    /// Called when the [`ProgressPolicy`][crate::ProgressPolicy] fires, and
    /// once more when the run completes.
    fn on_progress(&mut self, _snapshot: &ProgressSnapshot) {}

    /// Called once after the last trial with the final summary.
    fn on_run_end(&mut self, _summary: &EnsembleSummary) {}
}

/// An [`EnsembleObserver`] that does nothing.
pub struct NoopObserver;

impl EnsembleObserver for NoopObserver {}

/// Forwards progress and the final summary to the `log` facade.
pub struct LogObserver;

impl EnsembleObserver for LogObserver {
    fn on_run_start(&mut self, total: usize) {
        log::info!("running {total} trials");
    }

    fn on_progress(&mut self, p: &ProgressSnapshot) {
        match (p.min, p.mean, p.max) {
            (Some(min), Some(mean), Some(max)) => log::info!(
                "progress {:.1}% ({}/{}), decays {}, min {:.2} mean {:.2} max {:.2}",
                p.fraction() * 100.0, p.completed, p.total, p.decays, min, mean, max
            ),
            _ => log::info!(
                "progress {:.1}% ({}/{}), no decays yet",
                p.fraction() * 100.0, p.completed, p.total
            ),
        }
    }

    fn on_run_end(&mut self, summary: &EnsembleSummary) {
        match summary.measured() {
            Some(s) => log::info!(
                "finished: {} decays, half-life {:.2} (error {:.2}%)",
                s.count, s.median, s.half_life_error * 100.0
            ),
            None => log::warn!("finished: no decays in {} trials", summary.trials),
        }
    }
}
