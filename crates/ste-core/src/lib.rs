//! `ste-core` — foundational types for the `ste` flare-pair decay simulator.
//!
//! This crate is a dependency of every other `ste-*` crate.  It intentionally
//! has no `ste-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `TrialId`                                             |
//! | [`ring`]        | `Ring`, `RingPosition`, shortest-arc distance         |
//! | [`state`]       | `ParticlePairState`, `Phase`, `Spin`                  |
//! | [`constants`]   | `ForceConstants`, `CouplingConstants` (force balance) |
//! | [`config`]      | `DecayConfig`, `PhaseTimings`                         |
//! | [`rng`]         | `TrialRng` (per-trial), `RunRng` (run-level)          |
//! | [`error`]       | `SteError`, `SteResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to configuration types.     |

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod ring;
pub mod rng;
pub mod state;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DecayConfig, PhaseTimings, validate_forces};
pub use constants::{CouplingConstants, ForceConstants};
pub use error::{SteError, SteResult};
pub use ids::TrialId;
pub use ring::{Ring, RingPosition};
pub use rng::{RunRng, TrialRng};
pub use state::{ParticlePairState, Phase, Spin};
