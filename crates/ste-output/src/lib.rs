//! `ste-output` — result writers for decay ensembles.
//!
//! The CSV backend creates two files in the output directory:
//!
//! | File          | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | `trials.csv`  | one row per trial: id, outcome, decay time, crash entry |
//! | `summary.csv` | one row per run: counts and decay statistics            |
//!
//! Writers implement [`OutputWriter`] and are driven by
//! [`EnsembleOutputObserver`], which implements
//! `ste_ensemble::EnsembleObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ste_output::{CsvWriter, EnsembleOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = EnsembleOutputObserver::new(writer);
//! ensemble.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::EnsembleOutputObserver;
pub use row::{SummaryRow, TrialRow};
pub use writer::OutputWriter;
