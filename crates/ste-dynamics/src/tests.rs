//! Unit tests for the force model and integrator.

use ste_core::{CouplingConstants, ForceConstants, ParticlePairState, Ring, RingPosition};

fn ring() -> Ring {
    Ring::new(1.0)
}

fn balanced() -> CouplingConstants {
    CouplingConstants::balanced(&ForceConstants::default(), &ring(), 0.5, 0.01)
}

fn state_at(p1: f64, p2: f64) -> ParticlePairState {
    let r = ring();
    let mut s = ParticlePairState::opposed(&r, 1e-6);
    s.positions = [r.wrap(p1), r.wrap(p2)];
    s
}

#[cfg(test)]
mod force_tests {
    use super::*;
    use crate::{ForceModel, SEPARATION_EPSILON};

    #[test]
    fn balanced_forces_cancel_at_start() {
        let model = ForceModel::new(ring());
        let f = model.compute(&state_at(0.0, 0.5), &balanced());
        assert!((f.attraction - f.repulsion).abs() <= f.attraction * 1e-12);
        assert!(f.net[0].abs() < 1e-12 && f.net[1].abs() < 1e-12, "{:?}", f.net);
    }

    #[test]
    fn attraction_pulls_flares_together_without_repulsion() {
        let model = ForceModel::new(ring());
        let k = balanced().without_repulsion();
        let f = model.compute(&state_at(0.0, 0.5), &k);
        assert!(f.net[0] > 0.0, "flare 1 should move towards 0.5");
        assert!(f.net[1] < 0.0, "flare 2 should move back towards 0.0");
        assert_eq!(f.net[0], -f.net[1]);
        assert!((f.attraction - 4e-2 / 0.25).abs() < 1e-12);
    }

    #[test]
    fn direction_follows_shortest_arc_across_seam() {
        let model = ForceModel::new(ring());
        let k = balanced().without_repulsion();
        // 0.9 → 0.1 is closer going forward through 0.
        let f = model.compute(&state_at(0.9, 0.1), &k);
        assert!(f.net[0] > 0.0);
        assert!(f.net[1] < 0.0);
        assert!((f.separation - 0.2).abs() < 1e-12);
    }

    #[test]
    fn zero_separation_uses_epsilon_floor() {
        let model = ForceModel::new(ring());
        let f = model.compute(&state_at(0.3, 0.3), &balanced().without_repulsion());
        assert_eq!(f.separation, SEPARATION_EPSILON);
        assert!(f.attraction.is_finite());
        assert!(f.net.iter().all(|x| !x.is_nan()));
    }

    #[test]
    fn drag_opposes_velocity() {
        let model = ForceModel::new(ring());
        let mut k = balanced().without_repulsion();
        k.attraction = 0.0;
        k.drag = 2.0;
        let mut s = state_at(0.0, 0.5);
        s.velocities = [1.5, -0.5];
        let f = model.compute(&s, &k);
        assert_eq!(f.drag, [-3.0, 1.0]);
        assert_eq!(f.net, [-3.0, 1.0]);
    }
}

#[cfg(test)]
mod integrator_tests {
    use super::*;
    use crate::{ForceModel, Integrator, PairForces};

    #[test]
    fn semi_implicit_step_uses_updated_velocity() {
        let integ = Integrator::new(ring());
        let mut s = state_at(0.1, 0.6);
        let forces = PairForces {
            separation: 0.5,
            attraction: 0.0,
            repulsion:  0.0,
            drag:       [0.0, 0.0],
            net:        [2.0, -2.0],
        };
        integ.step(&mut s, &forces, 0.1);
        assert!((s.velocities[0] - 0.2).abs() < 1e-12);
        assert!((s.velocities[1] + 0.2).abs() < 1e-12);
        // x += v_new * dt
        assert!((s.positions[0].0 - 0.12).abs() < 1e-12);
        assert!((s.positions[1].0 - 0.58).abs() < 1e-12);
        assert!((s.time - 0.1).abs() < 1e-12);
    }

    #[test]
    fn positions_wrap_onto_ring() {
        let integ = Integrator::new(ring());
        let mut s = state_at(0.99, 0.5);
        s.velocities = [1.0, 0.0];
        let forces = PairForces {
            separation: 0.49,
            attraction: 0.0,
            repulsion:  0.0,
            drag:       [0.0, 0.0],
            net:        [0.0, 0.0],
        };
        integ.step(&mut s, &forces, 0.05);
        assert!((s.positions[0].0 - 0.04).abs() < 1e-9, "{}", s.positions[0]);
        assert!(s.positions.iter().all(|p: &RingPosition| p.0 >= 0.0 && p.0 < 1.0));
    }

    #[test]
    fn unbalanced_pair_collapses() {
        let r = ring();
        let model = ForceModel::new(r);
        let integ = Integrator::new(r);
        let k = balanced().without_repulsion();
        let mut s = state_at(0.0, 0.5);

        let dt = 1e-4;
        let mut steps = 0u32;
        while s.separation(&r) >= 0.01 && steps < 100_000 {
            let f = model.compute(&s, &k);
            integ.step(&mut s, &f, dt);
            steps += 1;
        }
        assert!(s.separation(&r) < 0.01, "pair never collided");
        // Free-fall time for d0 = 0.5 under 2·g/d² is about 1.39 s.
        assert!((s.time - 1.39).abs() < 0.1, "collapse took {}", s.time);
    }
}
