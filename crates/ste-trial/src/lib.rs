//! `ste-trial` — one decay trial, start to finish.
//!
//! # Two-phase state machine
//!
//! ```text
//! WAIT  (coarse dt)  charge += |U(-noise, noise)| − leak, clamped at 0
//!                    charge > threshold  → repulsion off, CRASH
//!                    horizon ticks spent → TIMED_OUT (no ignition)
//! CRASH (fine dt)    ForceModel + Integrator
//!                    separation < collision distance → DECAYED
//!                    window steps spent              → TIMED_OUT (no collision)
//! ```
//!
//! The slow charging phase never integrates motion, so the fine step is only
//! paid for the short collapse after ignition.
//!
//! [`TrialRunner`] builds the initial state and the force-balanced constants
//! for each trial and drives a [`PhaseController`] to a terminal phase.

pub mod outcome;
pub mod phase;
pub mod runner;


pub use outcome::{TrialOutcome, TrialResult};
pub use phase::PhaseController;
pub use runner::TrialRunner;
