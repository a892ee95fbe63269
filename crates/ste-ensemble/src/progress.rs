//! Bounded-cadence progress reporting.

use std::time::{Duration, Instant};

use ste_trial::TrialResult;

use crate::EnsembleSummary;
use crate::summary::OutcomeCounts;

/// When to emit a [`ProgressSnapshot`].
///
/// A snapshot is emitted when *either* gate fires since the previous one,
/// and always once when the run completes.  With both gates `None` only the
/// final snapshot is emitted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ProgressPolicy {
    /// Emit after this many more trials have completed.
    pub every_trials:   Option<usize>,
    /// Emit once this much wall-clock time has passed.
    pub every_interval: Option<Duration>,
}

impl ProgressPolicy {
    /// Only the final snapshot.
    pub const fn silent() -> Self {
        Self { every_trials: None, every_interval: None }
    }

    pub const fn every_trials(n: usize) -> Self {
        Self { every_trials: Some(n), every_interval: None }
    }
}

impl Default for ProgressPolicy {
    fn default() -> Self {
        Self {
            every_trials:   Some(100),
            every_interval: Some(Duration::from_secs(5)),
        }
    }
}

/// Running view of an ensemble in progress.  Built only from completed
/// trials.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProgressSnapshot {
    pub completed: usize,
    pub total:     usize,
    pub decays:    usize,
    /// Running min / mean / max of decay times so far (`None` until the
    /// first decay).
    pub min:       Option<f64>,
    pub mean:      Option<f64>,
    pub max:       Option<f64>,
    pub elapsed:   Duration,
}

impl ProgressSnapshot {
    /// Completed fraction in `[0, 1]` (1 for an empty run).
    pub fn fraction(&self) -> f64 {
        if self.total == 0 { 1.0 } else { self.completed as f64 / self.total as f64 }
    }
}

// ── Aggregate ─────────────────────────────────────────────────────────────────

/// The orchestrator's single point of mutation: folds completed trials into
/// counts, the decay-time sequence and running extrema.
pub(crate) struct Aggregate {
    total:       usize,
    counts:      OutcomeCounts,
    decay_times: Vec<f64>,
    sum:         f64,
    min:         f64,
    max:         f64,
}

impl Aggregate {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            counts:      OutcomeCounts::default(),
            decay_times: Vec::new(),
            sum:         0.0,
            min:         f64::INFINITY,
            max:         f64::NEG_INFINITY,
        }
    }

    pub fn record(&mut self, result: &TrialResult) {
        self.counts.record(&result.outcome);
        if let Some(t) = result.decay_time() {
            self.decay_times.push(t);
            self.sum += t;
            self.min = self.min.min(t);
            self.max = self.max.max(t);
        }
    }

    #[inline]
    pub fn completed(&self) -> usize {
        self.counts.trials
    }

    pub fn snapshot(&self, elapsed: Duration) -> ProgressSnapshot {
        let decays = self.decay_times.len();
        let has = decays > 0;
        ProgressSnapshot {
            completed: self.counts.trials,
            total:     self.total,
            decays,
            min:       has.then_some(self.min),
            mean:      has.then(|| self.sum / decays as f64),
            max:       has.then_some(self.max),
            elapsed,
        }
    }

    pub fn finish(self, target_half_life: f64) -> (EnsembleSummary, Vec<f64>) {
        let summary = EnsembleSummary::from_parts(self.counts, &self.decay_times, target_half_life);
        (summary, self.decay_times)
    }
}

// ── Gate ──────────────────────────────────────────────────────────────────────

/// Tracks when the last snapshot went out.
pub(crate) struct ProgressGate {
    policy:        ProgressPolicy,
    last_count:    usize,
    last_instant:  Instant,
}

impl ProgressGate {
    pub fn new(policy: ProgressPolicy, start: Instant) -> Self {
        Self { policy, last_count: 0, last_instant: start }
    }

    /// `true` if a snapshot should go out now.  Marks it as sent.
    pub fn due(&mut self, completed: usize, now: Instant) -> bool {
        let by_count = self
            .policy
            .every_trials
            .is_some_and(|n| n > 0 && completed - self.last_count >= n);
        let by_time = self
            .policy
            .every_interval
            .is_some_and(|d| now.duration_since(self.last_instant) >= d);

        if by_count || by_time {
            self.mark(completed, now);
            true
        } else {
            false
        }
    }

    /// `true` if the final snapshot at `completed` has not gone out yet.
    pub fn final_due(&self, completed: usize) -> bool {
        completed == 0 || self.last_count != completed
    }

    fn mark(&mut self, completed: usize, now: Instant) {
        self.last_count = completed;
        self.last_instant = now;
    }
}
