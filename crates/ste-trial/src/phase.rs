//! The WAIT → CRASH → {DECAYED, TIMED_OUT} state machine.

use ste_core::{CouplingConstants, ParticlePairState, Phase, PhaseTimings, Ring, TrialRng};
use ste_dynamics::{ForceModel, Integrator};

use crate::TrialOutcome;

/// Drives one flare pair through the two-phase state machine.
///
/// The controller owns the trial's state and constants outright.  Randomness
/// is injected per call so the caller decides which stream a trial draws from.
///
/// Once the collapse begins the controller's constants have zero repulsion
/// for the rest of the trial.
pub struct PhaseController {
    ring:       Ring,
    timings:    PhaseTimings,
    force:      ForceModel,
    integrator: Integrator,
    state:      ParticlePairState,
    constants:  CouplingConstants,

    /// Simulated time at which `Crash` was entered.
    crash_entered_at: Option<f64>,
    /// Ticks (WAIT) or fine steps (CRASH) taken in the current phase.
    phase_steps:      u64,
}

impl PhaseController {
    pub fn new(
        ring:      Ring,
        timings:   PhaseTimings,
        state:     ParticlePairState,
        constants: CouplingConstants,
    ) -> Self {
        Self {
            ring,
            timings,
            force:      ForceModel::new(ring),
            integrator: Integrator::new(ring),
            state,
            constants,
            crash_entered_at: None,
            phase_steps:      0,
        }
    }

    #[inline]
    pub fn state(&self) -> &ParticlePairState {
        &self.state
    }

    /// Constants currently in force (repulsion is zero once crashed).
    #[inline]
    pub fn constants(&self) -> &CouplingConstants {
        &self.constants
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    #[inline]
    pub fn crash_entered_at(&self) -> Option<f64> {
        self.crash_entered_at
    }

    /// Advance one tick of the current phase and return the phase after it.
    ///
    /// A terminal phase is sticky: further calls change nothing.
    pub fn step(&mut self, rng: &mut TrialRng) -> Phase {
        match self.state.phase {
            Phase::Wait  => self.wait_tick(rng),
            Phase::Crash => self.crash_step(),
            Phase::Decayed | Phase::TimedOut => {}
        }
        self.state.phase
    }

    /// Step until a terminal phase is reached.
    pub fn run(&mut self, rng: &mut TrialRng) -> TrialOutcome {
        loop {
            if let Some(outcome) = self.outcome() {
                return outcome;
            }
            self.step(rng);
        }
    }

    /// The trial's outcome, or `None` while it is still running.
    pub fn outcome(&self) -> Option<TrialOutcome> {
        match (self.state.phase, self.crash_entered_at) {
            (Phase::Decayed, Some(crash_entered_at)) => Some(TrialOutcome::Decayed {
                time: self.state.time,
                crash_entered_at,
            }),
            (Phase::TimedOut, Some(crash_entered_at)) => {
                Some(TrialOutcome::NoCollision { crash_entered_at })
            }
            (Phase::TimedOut, None) => Some(TrialOutcome::NoIgnition { elapsed: self.state.time }),
            _ => None,
        }
    }

    // ── Phases ────────────────────────────────────────────────────────────

    /// One coarse charging tick.
    ///
    /// The net draw is always added and the energy clamped at zero, whether
    /// the draw is positive or not.  The crossing tick does not advance time.
    ///
    /// The horizon is a tick count, not a time comparison, so the phase ends
    /// even if `time + dt` rounds back to `time`.
    fn wait_tick(&mut self, rng: &mut TrialRng) {
        if self.phase_steps >= self.timings.wait_ticks() {
            self.state.phase = Phase::TimedOut;
            return;
        }

        let charge_in = rng.symmetric(self.constants.noise_amplitude).abs();
        self.state.add_energy(charge_in - self.constants.leak_rate);

        if self.state.energy() > self.constants.crash_threshold {
            self.enter_crash();
            return;
        }
        self.state.time += self.state.dt;
        self.phase_steps += 1;
    }

    fn enter_crash(&mut self) {
        self.constants = self.constants.without_repulsion();
        self.state.dt = self.timings.fine_dt;
        self.state.phase = Phase::Crash;
        self.crash_entered_at = Some(self.state.time);
        self.phase_steps = 0;
        log::trace!("ignition at t={:.3}, energy={:.4e}", self.state.time, self.state.energy());
    }

    /// One fine collapse step followed by the collision test.
    fn crash_step(&mut self) {
        if self.phase_steps >= self.timings.crash_steps() {
            self.state.phase = Phase::TimedOut;
            return;
        }

        let dt = self.state.dt;
        let forces = self.force.compute(&self.state, &self.constants);
        self.integrator.step(&mut self.state, &forces, dt);
        self.phase_steps += 1;

        if self.state.separation(&self.ring) < self.constants.collision_distance {
            self.state.phase = Phase::Decayed;
        }
    }
}
