//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `trials.csv`
//! - `summary.csv`
//!
//! Absent values (no decay, no crash entry, no statistics) are empty cells.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, SummaryRow, TrialRow};

pub const TRIAL_HEADERS: [&str; 4] = ["trial", "outcome", "decay_time", "crash_entered_at"];

pub const SUMMARY_HEADERS: [&str; 13] = [
    "trials",
    "decays",
    "no_ignition",
    "no_collision",
    "target_half_life",
    "mean",
    "median",
    "std_dev",
    "cv",
    "min",
    "max",
    "half_life_error",
    "mean_lifetime_error",
];

/// Writes ensemble output to two CSV files.
pub struct CsvWriter {
    trials:   Writer<File>,
    summary:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the two CSV files and write the header
    /// rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut trials = Writer::from_path(dir.join("trials.csv"))?;
        trials.write_record(TRIAL_HEADERS)?;

        let mut summary = Writer::from_path(dir.join("summary.csv"))?;
        summary.write_record(SUMMARY_HEADERS)?;

        Ok(Self { trials, summary, finished: false })
    }
}

fn cell(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_trials(&mut self, rows: &[TrialRow]) -> OutputResult<()> {
        for row in rows {
            self.trials.write_record(&[
                row.trial.to_string(),
                row.outcome.to_owned(),
                cell(row.decay_time),
                cell(row.crash_entered_at),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.summary.write_record(&[
            row.trials.to_string(),
            row.decays.to_string(),
            row.no_ignition.to_string(),
            row.no_collision.to_string(),
            row.target_half_life.to_string(),
            cell(row.mean),
            cell(row.median),
            cell(row.std_dev),
            cell(row.cv),
            cell(row.min),
            cell(row.max),
            cell(row.half_life_error),
            cell(row.mean_lifetime_error),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.trials.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
