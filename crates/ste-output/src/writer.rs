//! The `OutputWriter` trait implemented by backend writers.

use crate::{OutputResult, SummaryRow, TrialRow};

/// Sink for per-trial rows and the run summary.
///
/// When driven by [`EnsembleOutputObserver`][crate::EnsembleOutputObserver]
/// errors are stored and retrieved with
/// [`take_error`][crate::EnsembleOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of trial rows.
    fn write_trials(&mut self, rows: &[TrialRow]) -> OutputResult<()>;

    /// Write one summary row.
    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.  Safe to call more than
    /// once.
    fn finish(&mut self) -> OutputResult<()>;
}
