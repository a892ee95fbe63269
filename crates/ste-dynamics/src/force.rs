//! Per-flare force evaluation.
//!
//! Forces act along the shortest arc between the flares:
//!
//! | Term       | Magnitude                         | Direction            |
//! |------------|-----------------------------------|----------------------|
//! | attraction | `attraction / d²`                 | towards the partner  |
//! | repulsion  | `repulsion · exp(−d / (C / 10))`  | away from the partner|
//! | drag       | `drag · |v|`                      | against own velocity |
//!
//! The net signed force on flare `i` is `dir_i · (attraction − repulsion)
//! − drag · v_i`.  Drag is part of the net force and nowhere else.

use ste_core::{CouplingConstants, ParticlePairState, Ring};

/// Separation substituted when the flares sit exactly on top of each other.
pub const SEPARATION_EPSILON: f64 = 1e-20;

/// Forces acting on both flares at one instant.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PairForces {
    /// Separation the forces were evaluated at (after the epsilon floor).
    pub separation: f64,
    /// Attraction magnitude (shared by both flares).
    pub attraction: f64,
    /// Repulsion magnitude (shared by both flares).
    pub repulsion:  f64,
    /// Signed drag term per flare (`−drag · v`).
    pub drag:       [f64; 2],
    /// Net signed force per flare.
    pub net:        [f64; 2],
}

/// Evaluates [`PairForces`] on a fixed ring.
#[derive(Copy, Clone, Debug)]
pub struct ForceModel {
    ring: Ring,
}

impl ForceModel {
    pub fn new(ring: Ring) -> Self {
        Self { ring }
    }

    pub fn compute(&self, state: &ParticlePairState, k: &CouplingConstants) -> PairForces {
        let [p1, p2] = state.positions;

        let mut d = self.ring.distance(p1, p2);
        if d == 0.0 {
            d = SEPARATION_EPSILON;
        }

        let attraction = k.attraction / (d * d);
        let repulsion = if k.repulsion == 0.0 {
            0.0
        } else {
            k.repulsion * (-d / self.ring.repulsion_length()).exp()
        };

        // Flare 2's direction is the negation of flare 1's so a diametric
        // tie still pulls the pair together.
        let dir1 = self.ring.direction(p1, p2);
        let dirs = [dir1, -dir1];

        let drag = [-k.drag * state.velocities[0], -k.drag * state.velocities[1]];
        let net = [
            dirs[0] * (attraction - repulsion) + drag[0],
            dirs[1] * (attraction - repulsion) + drag[1],
        ];

        PairForces { separation: d, attraction, repulsion, drag, net }
    }
}
