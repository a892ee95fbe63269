//! The `Ensemble` struct and its streaming run loop.

use std::time::{Duration, Instant};

use ste_core::{DecayConfig, TrialId};
use ste_trial::{TrialResult, TrialRunner};

use crate::progress::{Aggregate, ProgressGate};
use crate::{EnsembleError, EnsembleObserver, EnsembleResult, EnsembleSummary, ProgressPolicy};

/// Everything a finished run produces.
#[derive(Clone, Debug)]
pub struct EnsembleReport {
    pub summary:     EnsembleSummary,
    /// Every decay time, in ascending trial order.
    pub decay_times: Vec<f64>,
    /// Wall-clock duration of the run.
    pub elapsed:     Duration,
}

/// Runs many independent trials and aggregates their results.
///
/// Create via [`EnsembleBuilder`][crate::EnsembleBuilder].
pub struct Ensemble {
    /// Validated configuration.
    pub config: DecayConfig,

    pub(crate) runner:   TrialRunner,
    pub(crate) progress: ProgressPolicy,

    /// Dedicated pool when `config.num_threads` is set; Rayon's global pool
    /// otherwise.
    #[cfg(feature = "parallel")]
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl Ensemble {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run `config.trials` trials seeded from `config.seed`.
    pub fn run<O: EnsembleObserver>(&self, observer: &mut O) -> EnsembleResult<EnsembleReport> {
        self.run_trials(self.config.trials, observer)
    }

    /// Run exactly `n` trials (ignores `config.trials`).
    ///
    /// `n = 0` is legal and yields an insufficient-decay summary.
    pub fn run_trials<O: EnsembleObserver>(
        &self,
        n:        usize,
        observer: &mut O,
    ) -> EnsembleResult<EnsembleReport> {
        self.run_with(&self.runner, self.config.seed, n, observer)
    }

    #[inline]
    pub fn runner(&self) -> &TrialRunner {
        &self.runner
    }

    // ── Core loop ─────────────────────────────────────────────────────────

    /// Run `n` trials of `runner` on the stream family of `seed`.
    ///
    /// The calibrator reuses this with perturbed runners and fresh seeds so
    /// probe ensembles share the worker pool.
    pub(crate) fn run_with<O: EnsembleObserver>(
        &self,
        runner:   &TrialRunner,
        seed:     u64,
        n:        usize,
        observer: &mut O,
    ) -> EnsembleResult<EnsembleReport> {
        if TrialId::try_from(n).is_err() {
            return Err(EnsembleError::TooManyTrials { requested: n });
        }

        let start = Instant::now();
        observer.on_run_start(n);

        let mut fold = Fold {
            aggregate: Aggregate::new(n),
            gate:      ProgressGate::new(self.progress, start),
            start,
            observer:  &mut *observer,
        };
        self.execute(runner, seed, n, |result| fold.push(&result));
        let Fold { aggregate, gate, .. } = fold;

        if gate.final_due(aggregate.completed()) {
            observer.on_progress(&aggregate.snapshot(start.elapsed()));
        }

        let (summary, decay_times) = aggregate.finish(self.config.target_half_life);
        if summary.is_insufficient() {
            log::warn!("no decays in {n} trials: statistics unavailable");
        }
        observer.on_run_end(&summary);

        Ok(EnsembleReport { summary, decay_times, elapsed: start.elapsed() })
    }

    /// Run trials `0..n` and hand every result to `sink` on the calling
    /// thread, in ascending trial order.
    ///
    /// `n` fits in `u32` (checked by `run_with`).
    #[cfg(not(feature = "parallel"))]
    fn execute<F: FnMut(TrialResult)>(&self, runner: &TrialRunner, seed: u64, n: usize, mut sink: F) {
        for i in 0..n {
            sink(runner.run_seeded(seed, TrialId(i as u32)));
        }
    }

    /// Run trials `0..n` and hand every result to `sink` on the calling
    /// thread, in ascending trial order.
    #[cfg(feature = "parallel")]
    fn execute<F: FnMut(TrialResult)>(&self, runner: &TrialRunner, seed: u64, n: usize, sink: F) {
        match &self.pool {
            Some(pool) => pool.in_place_scope(|scope| stream_ordered(scope, runner, seed, n, sink)),
            None       => rayon::in_place_scope(|scope| stream_ordered(scope, runner, seed, n, sink)),
        }
    }
}

/// Spawn trials `0..n` into `scope` and fold their results on this thread.
///
/// Workers pull trials continuously and send each result as soon as it
/// finishes.  This thread restores trial order through a reorder buffer
/// while they keep going, so a slow trial never idles the pool.
#[cfg(feature = "parallel")]
fn stream_ordered<'scope, F: FnMut(TrialResult)>(
    scope:    &rayon::Scope<'scope>,
    runner:   &'scope TrialRunner,
    seed:     u64,
    n:        usize,
    mut sink: F,
) {
    use std::collections::BTreeMap;
    use std::sync::mpsc;

    use rayon::prelude::*;

    let (tx, rx) = mpsc::channel::<TrialResult>();
    scope.spawn(move |_| {
        (0..n).into_par_iter().for_each_with(tx, |tx, i| {
            // The receiver lives until every sender is dropped.
            let _ = tx.send(runner.run_seeded(seed, TrialId(i as u32)));
        });
    });

    let mut pending = BTreeMap::new();
    let mut next = 0u32;
    for result in rx {
        pending.insert(result.trial.0, result);
        while let Some(ready) = pending.remove(&next) {
            sink(ready);
            next += 1;
        }
    }
}

/// The single point where completed trials are folded and reported.
struct Fold<'o, O: EnsembleObserver> {
    aggregate: Aggregate,
    gate:      ProgressGate,
    start:     Instant,
    observer:  &'o mut O,
}

impl<O: EnsembleObserver> Fold<'_, O> {
    fn push(&mut self, result: &TrialResult) {
        self.aggregate.record(result);
        self.observer.on_trial_end(result);
        let now = Instant::now();
        if self.gate.due(self.aggregate.completed(), now) {
            self.observer.on_progress(&self.aggregate.snapshot(now.duration_since(self.start)));
        }
    }
}
