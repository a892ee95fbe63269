//! Per-trial mutable state of the flare pair.

use std::fmt;

use crate::{Ring, RingPosition};

/// Discrete spin label carried by each flare.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Spin {
    Up,
    Down,
}

/// The phase of a trial's state machine.
///
/// ```text
/// Wait ──(energy > threshold)──▶ Crash ──(separation < collision)──▶ Decayed
///   │                              │
///   └──(wait horizon)──▶ TimedOut ◀┴──(crash window expired)
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Slow stochastic charging at the coarse time step.
    Wait,
    /// Deterministic collapse at the fine time step.
    Crash,
    Decayed,
    TimedOut,
}

impl Phase {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Decayed | Phase::TimedOut)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Wait     => "wait",
            Phase::Crash    => "crash",
            Phase::Decayed  => "decayed",
            Phase::TimedOut => "timed_out",
        };
        f.write_str(s)
    }
}

/// Positions, velocities, spins and stored energy of one flare pair.
///
/// Owned exclusively by one trial and discarded when the trial ends.
///
/// Invariants: `positions` are always normalised onto the ring, and
/// `energy` is never negative (see [`add_energy`][Self::add_energy]).
#[derive(Clone, Debug, PartialEq)]
pub struct ParticlePairState {
    pub positions:  [RingPosition; 2],
    pub velocities: [f64; 2],
    pub spins:      [Spin; 2],
    energy:         f64,
    /// Elapsed simulated time.
    pub time:       f64,
    /// Current step size (coarse in `Wait`, fine in `Crash`).
    pub dt:         f64,
    pub phase:      Phase,
}

impl ParticlePairState {
    /// The fixed initial layout: flares diametrically opposite (at `0` and
    /// `C/2`), at rest, with opposing spins, no stored energy, in `Wait`.
    pub fn opposed(ring: &Ring, coarse_dt: f64) -> Self {
        let first = ring.wrap(0.0);
        Self {
            positions:  [first, ring.opposite(first)],
            velocities: [0.0, 0.0],
            spins:      [Spin::Up, Spin::Down],
            energy:     0.0,
            time:       0.0,
            dt:         coarse_dt,
            phase:      Phase::Wait,
        }
    }

    #[inline]
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Add a (possibly negative) energy increment, clamping at zero.
    #[inline]
    pub fn add_energy(&mut self, delta: f64) {
        self.energy = (self.energy + delta).max(0.0);
    }

    /// Current shortest-arc separation of the two flares.
    #[inline]
    pub fn separation(&self, ring: &Ring) -> f64 {
        ring.distance(self.positions[0], self.positions[1])
    }
}
