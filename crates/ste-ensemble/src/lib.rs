//! `ste-ensemble` — many independent trials, their statistics, and the
//! calibration search built on top of them.
//!
//! # Run loop
//!
//! ```text
//! workers:  for i in 0..n (any order, any thread):
//!             result_i = run trial i on TrialRng(seed, i)
//!             send result_i
//! caller:   for each received result:
//!             park it in the reorder buffer
//!             while the next trial in order is parked:
//!               record it, call `on_trial_end`, emit progress when due
//! summary = EnsembleSummary over all results
//! ```
//!
//! Aggregation happens only on the calling thread, after a trial has
//! finished.  Workers never wait on the fold or on observers; without the
//! `parallel` feature the same fold runs inline after each trial.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Streams trials from Rayon's thread pool.               |
//! | `serde`    | Serde derives on summaries and calibration reports.    |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ste_core::DecayConfig;
//! use ste_ensemble::{EnsembleBuilder, LogObserver};
//!
//! let ensemble = EnsembleBuilder::new(DecayConfig::default()).build()?;
//! let report = ensemble.run(&mut LogObserver)?;
//! println!("{}", report.summary);
//! ```

pub mod builder;
pub mod calibrate;
pub mod ensemble;
pub mod error;
pub mod observer;
pub mod progress;
pub mod summary;

#[cfg(test)]
mod tests;

pub use builder::EnsembleBuilder;
pub use calibrate::{
    CalibrationReport, CalibrationSettings, CalibrationState, CalibrationStep, Calibrator,
};
pub use ensemble::{Ensemble, EnsembleReport};
pub use error::{EnsembleError, EnsembleResult};
pub use observer::{EnsembleObserver, LogObserver, NoopObserver};
pub use progress::{ProgressPolicy, ProgressSnapshot};
pub use summary::{DecayStatistics, DecayStats, EnsembleSummary};
