//! decay — run a decay ensemble from the command line.
//!
//! Runs `--trials` independent trials on all cores (or `--threads`), prints
//! progress and the half-life summary, and optionally:
//!
//! - hill-climbs the force constants toward the target half-life first
//!   (`--calibrate <iterations>`),
//! - exports `trials.csv`, `summary.csv` and `summary.json` to `--out`.
//!
//! Full resolution (fine step 1e-6) is slow; build with `--release`.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use ste_core::DecayConfig;
use ste_ensemble::{
    CalibrationReport, CalibrationSettings, Calibrator, EnsembleBuilder, EnsembleObserver,
    EnsembleSummary, ProgressSnapshot,
};
use ste_output::{CsvWriter, EnsembleOutputObserver};
use ste_trial::TrialResult;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "decay", about = "Stochastic two-body decay ensemble")]
struct Cli {
    /// JSON configuration; missing fields take their defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Number of trials (overrides the configuration).
    #[arg(long)]
    trials: Option<usize>,
    /// Run seed (overrides the configuration).
    #[arg(long)]
    seed: Option<u64>,
    /// Worker threads; all logical cores when omitted.
    #[arg(long)]
    threads: Option<usize>,
    /// Calibrate the force constants for this many iterations before the run.
    #[arg(long, value_name = "ITERATIONS")]
    calibrate: Option<usize>,
    /// Trials per calibration probe.
    #[arg(long, default_value_t = 200)]
    probe_trials: usize,
    /// Output directory for CSV and JSON results.
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
}

impl Cli {
    fn load_config(&self) -> Result<DecayConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("opening config {}", path.display()))?;
                serde_json::from_reader(file)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => DecayConfig::default(),
        };
        if let Some(n) = self.trials {
            config.trials = n;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.threads.is_some() {
            config.num_threads = self.threads;
        }
        Ok(config)
    }
}

// ── Console observer ──────────────────────────────────────────────────────────

/// Prints progress lines and forwards every callback to the optional CSV
/// observer.
struct ConsoleObserver {
    csv: Option<EnsembleOutputObserver<CsvWriter>>,
}

impl EnsembleObserver for ConsoleObserver {
    fn on_run_start(&mut self, total: usize) {
        if let Some(csv) = &mut self.csv {
            csv.on_run_start(total);
        }
    }

    fn on_trial_end(&mut self, result: &TrialResult) {
        if let Some(csv) = &mut self.csv {
            csv.on_trial_end(result);
        }
    }

    fn on_progress(&mut self, p: &ProgressSnapshot) {
        match (p.min, p.mean, p.max) {
            (Some(min), Some(mean), Some(max)) => println!(
                "  {:>5.1}%  {:>7}/{:<7} decays {:>7}  min {:>9.2}  mean {:>9.2}  max {:>9.2}  ({:.1} s)",
                p.fraction() * 100.0, p.completed, p.total, p.decays, min, mean, max,
                p.elapsed.as_secs_f64(),
            ),
            _ => println!(
                "  {:>5.1}%  {:>7}/{:<7} no decays yet  ({:.1} s)",
                p.fraction() * 100.0, p.completed, p.total, p.elapsed.as_secs_f64(),
            ),
        }
        if let Some(csv) = &mut self.csv {
            csv.on_progress(p);
        }
    }

    fn on_run_end(&mut self, summary: &EnsembleSummary) {
        if let Some(csv) = &mut self.csv {
            csv.on_run_end(summary);
        }
    }
}

// ── JSON export ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct JsonSummary<'a> {
    config:       &'a DecayConfig,
    summary:      &'a EnsembleSummary,
    elapsed_secs: f64,
    calibration:  Option<&'a CalibrationReport>,
}

fn write_json(dir: &Path, summary: &JsonSummary<'_>) -> Result<()> {
    let path = dir.join("summary.json");
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)?;
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = cli.load_config()?;

    println!("=== decay — stochastic two-body decay ensemble ===");
    println!(
        "Trials: {}  |  Seed: {}  |  Threads: {}  |  dt: {} / {}",
        config.trials,
        config.seed,
        config.num_threads.map_or_else(|| "all".to_owned(), |n| n.to_string()),
        config.coarse_dt,
        config.fine_dt,
    );
    println!(
        "Target half-life: {:.2}  |  noise {:.4e}  leak {:.4e}  threshold {:.4e}",
        config.target_half_life,
        config.forces.noise_amplitude,
        config.forces.leak_rate,
        config.forces.crash_threshold,
    );
    println!();

    // 1. Optional calibration.
    let calibration = match cli.calibrate {
        Some(iterations) => {
            let ensemble = EnsembleBuilder::new(config.clone()).build()?;
            let settings = CalibrationSettings::from_config(&config, cli.probe_trials, iterations);
            println!(
                "Calibrating: {} iterations × {} probe trials",
                settings.iterations, settings.probe_trials
            );
            let report = Calibrator::new(&ensemble, settings)?.run(config.forces)?;
            match report.best_error {
                Some(err) => println!("  best probe error {:.2}%", err * 100.0),
                None => println!("  no probe decayed; keeping the initial constants"),
            }
            config.forces = report.best;
            println!();
            Some(report)
        }
        None => None,
    };

    // 2. Output.
    let csv = match &cli.out {
        Some(dir) => Some(EnsembleOutputObserver::new(CsvWriter::new(dir)?)),
        None => None,
    };
    let mut obs = ConsoleObserver { csv };

    // 3. Run.
    let ensemble = EnsembleBuilder::new(config).build()?;
    let report = ensemble.run(&mut obs)?;

    if let Some(e) = obs.csv.as_mut().and_then(EnsembleOutputObserver::take_error) {
        eprintln!("output error: {e}");
    }

    // 4. Summary.
    println!();
    println!("Ensemble complete in {:.3} s", report.elapsed.as_secs_f64());
    println!("{}", report.summary);

    if let Some(dir) = &cli.out {
        write_json(
            dir,
            &JsonSummary {
                config:       &ensemble.config,
                summary:      &report.summary,
                elapsed_secs: report.elapsed.as_secs_f64(),
                calibration:  calibration.as_ref(),
            },
        )?;
        println!();
        println!("Results written to {}", dir.display());
    }

    Ok(())
}
