//! `EnsembleOutputObserver<W>` — bridges `EnsembleObserver` to an
//! `OutputWriter`.

use ste_ensemble::{EnsembleObserver, EnsembleSummary};
use ste_trial::TrialResult;

use crate::row::{SummaryRow, TrialRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// Rows buffered before a write.
const FLUSH_ROWS: usize = 256;

/// An [`EnsembleObserver`] that writes every trial and the final summary to
/// any [`OutputWriter`].
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After `ensemble.run()` returns, check with
/// [`take_error`][Self::take_error].
pub struct EnsembleOutputObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<TrialRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> EnsembleOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pending:    Vec::with_capacity(FLUSH_ROWS),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after the run returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let result = self.writer.write_trials(&self.pending);
        self.pending.clear();
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> EnsembleObserver for EnsembleOutputObserver<W> {
    fn on_trial_end(&mut self, result: &TrialResult) {
        self.pending.push(TrialRow::from(result));
        if self.pending.len() >= FLUSH_ROWS {
            self.flush_pending();
        }
    }

    fn on_run_end(&mut self, summary: &EnsembleSummary) {
        self.flush_pending();
        let result = self.writer.write_summary(&SummaryRow::from(summary));
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
