//! Semi-implicit (symplectic) Euler step.

use ste_core::{ParticlePairState, Ring};

use crate::PairForces;

/// Advances a [`ParticlePairState`] by one step.
///
/// ```text
/// v ← v + F_net · dt
/// x ← (x + v · dt) mod C      (uses the updated velocity)
/// t ← t + dt
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Integrator {
    ring: Ring,
}

impl Integrator {
    pub fn new(ring: Ring) -> Self {
        Self { ring }
    }

    #[inline]
    pub fn step(&self, state: &mut ParticlePairState, forces: &PairForces, dt: f64) {
        for i in 0..2 {
            state.velocities[i] += forces.net[i] * dt;
            state.positions[i] = self.ring.wrap(state.positions[i].0 + state.velocities[i] * dt);
        }
        state.time += dt;
    }
}
