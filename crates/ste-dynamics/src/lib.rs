//! `ste-dynamics` — continuous dynamics of the flare pair.
//!
//! Only the collapse phase integrates motion; the charging phase never
//! touches positions.  One collapse step is
//!
//! ```text
//! forces = ForceModel::compute(state, constants)
//! Integrator::step(state, forces, dt)
//! ```

pub mod force;
pub mod integrator;

#[cfg(test)]
mod tests;

pub use force::{ForceModel, PairForces, SEPARATION_EPSILON};
pub use integrator::Integrator;
