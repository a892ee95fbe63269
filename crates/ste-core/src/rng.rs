//! Deterministic per-trial and run-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each trial gets its own independent `SmallRng` seeded by:
//!
//!   seed = run_seed XOR (trial_index * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive trial indices uniformly across the seed space.
//! This means:
//!
//! - Trials never share RNG state (no contention, no correlated draws).
//! - Trial `n` sees the same stream whether the ensemble runs on one thread
//!   or sixty-four, so results are reproducible under any parallelism.
//! - All RNG calls are local to the worker running the trial; no
//!   synchronisation needed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::TrialId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── TrialRng ──────────────────────────────────────────────────────────────────

/// Per-trial deterministic RNG.
///
/// Created by the worker that runs the trial and dropped with it.  The type
/// is `!Sync` to prevent accidental sharing across threads.
pub struct TrialRng(SmallRng);

impl TrialRng {
    /// Seed deterministically from the run's seed and a trial index.
    pub fn new(run_seed: u64, trial: TrialId) -> Self {
        let seed = run_seed ^ (trial.0 as u64).wrapping_mul(MIXING_CONSTANT);
        TrialRng(SmallRng::seed_from_u64(seed))
    }

    /// Draw from `U(-amplitude, amplitude)`.
    ///
    /// `amplitude` must be non-negative; zero always yields `0.0`.
    #[inline]
    pub fn symmetric(&mut self, amplitude: f64) -> f64 {
        if amplitude == 0.0 {
            return 0.0;
        }
        self.0.gen_range(-amplitude..=amplitude)
    }
}

// ── RunRng ────────────────────────────────────────────────────────────────────

/// Run-level RNG for sequential decisions that sit above individual trials
/// (calibration perturbations, probe-ensemble seeds).
///
/// Used only in single-threaded contexts.  Parallel work gets its own
/// `TrialRng` per trial instead.
pub struct RunRng(SmallRng);

impl RunRng {
    pub fn new(seed: u64) -> Self {
        RunRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a fresh seed with a different offset, e.g. the run seed of
    /// one calibration probe ensemble.
    pub fn child_seed(&mut self, offset: u64) -> u64 {
        self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT)
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
