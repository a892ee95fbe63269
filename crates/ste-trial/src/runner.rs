//! Single-trial runner.

use ste_core::{
    CouplingConstants, DecayConfig, ForceConstants, ParticlePairState, PhaseTimings, Ring,
    TrialId, TrialRng,
};

use crate::{PhaseController, TrialResult};

/// Everything needed to run any number of independent trials.
///
/// A runner is plain `Copy` data and is `Send + Sync`, so one instance can
/// be shared by every worker of a parallel ensemble.  Each call to
/// [`run`][Self::run] builds a fresh state and a fresh force-balanced
/// constant set; nothing carries over between trials.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrialRunner {
    ring:               Ring,
    timings:            PhaseTimings,
    forces:             ForceConstants,
    collision_distance: f64,
}

impl TrialRunner {
    pub fn new(
        ring:               Ring,
        timings:            PhaseTimings,
        forces:             ForceConstants,
        collision_distance: f64,
    ) -> Self {
        Self { ring, timings, forces, collision_distance }
    }

    /// Runner for `config`.  The caller is expected to have validated it.
    pub fn from_config(config: &DecayConfig) -> Self {
        Self::new(config.ring(), config.timings(), config.forces, config.collision_distance)
    }

    /// The same runner with different raw force constants.
    pub fn with_forces(self, forces: ForceConstants) -> Self {
        Self { forces, ..self }
    }

    #[inline]
    pub fn forces(&self) -> &ForceConstants {
        &self.forces
    }

    #[inline]
    pub fn ring(&self) -> Ring {
        self.ring
    }

    /// A controller positioned at the start of a trial: flares opposite,
    /// at rest, repulsion balancing attraction at the initial separation.
    pub fn controller(&self) -> PhaseController {
        let state = ParticlePairState::opposed(&self.ring, self.timings.coarse_dt);
        let constants = CouplingConstants::balanced(
            &self.forces,
            &self.ring,
            state.separation(&self.ring),
            self.collision_distance,
        );
        PhaseController::new(self.ring, self.timings, state, constants)
    }

    /// Run one trial to a terminal phase using `rng` for every draw.
    pub fn run(&self, trial: TrialId, rng: &mut TrialRng) -> TrialResult {
        let outcome = self.controller().run(rng);
        TrialResult { trial, outcome }
    }

    /// Run trial `trial` of the run seeded with `run_seed` on its own stream.
    ///
    /// The same `(run_seed, trial)` pair always yields the same result.
    pub fn run_seeded(&self, run_seed: u64, trial: TrialId) -> TrialResult {
        let mut rng = TrialRng::new(run_seed, trial);
        self.run(trial, &mut rng)
    }
}
