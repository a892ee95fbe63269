//! Integration tests for ste-ensemble.

use ste_core::{DecayConfig, TrialId};
use ste_trial::TrialResult;

use crate::{
    EnsembleBuilder, EnsembleObserver, EnsembleSummary, NoopObserver, ProgressPolicy,
    ProgressSnapshot,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Default physics, fine step coarse enough for the default test profile.
fn test_config(trials: usize) -> DecayConfig {
    DecayConfig {
        trials,
        fine_dt:     1e-4,
        num_threads: Some(2),
        seed:        2025,
        ..DecayConfig::default()
    }
}

/// Config whose trials can never ignite (and give up quickly).
fn inert_config(trials: usize) -> DecayConfig {
    let mut cfg = DecayConfig { wait_horizon: 50.0, ..test_config(trials) };
    cfg.forces.noise_amplitude = 0.0;
    cfg
}

#[derive(Default)]
struct Recorder {
    started:   Option<usize>,
    trials:    Vec<TrialId>,
    snapshots: Vec<ProgressSnapshot>,
    summary:   Option<EnsembleSummary>,
}

impl EnsembleObserver for Recorder {
    fn on_run_start(&mut self, total: usize) {
        self.started = Some(total);
    }

    fn on_trial_end(&mut self, result: &TrialResult) {
        self.trials.push(result.trial);
    }

    fn on_progress(&mut self, snapshot: &ProgressSnapshot) {
        self.snapshots.push(*snapshot);
    }

    fn on_run_end(&mut self, summary: &EnsembleSummary) {
        self.summary = Some(*summary);
    }
}

// ── Builder validation ────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::EnsembleError;

    #[test]
    fn invalid_config_fails_before_running() {
        let cfg = DecayConfig { circumference: 0.0, ..test_config(10) };
        let result = EnsembleBuilder::new(cfg).build();
        assert!(matches!(result, Err(EnsembleError::Config(_))));
    }

    #[test]
    fn collision_distance_too_large_rejected() {
        let cfg = DecayConfig { collision_distance: 0.6, ..test_config(10) };
        assert!(EnsembleBuilder::new(cfg).build().is_err());
    }

    #[test]
    fn forces_override_reaches_runner() {
        let mut forces = test_config(1).forces;
        forces.attraction = 1e-3;
        let ensemble = EnsembleBuilder::new(test_config(1)).forces(forces).build().unwrap();
        assert_eq!(ensemble.runner().forces().attraction, 1e-3);
        assert_eq!(ensemble.config.forces.attraction, 1e-3);
    }
}

// ── Run loop ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;
    use crate::EnsembleError;

    #[test]
    fn zero_trials_is_insufficient_not_nan() {
        let ensemble = EnsembleBuilder::new(test_config(10)).build().unwrap();
        let mut rec = Recorder::default();
        let report = ensemble.run_trials(0, &mut rec).unwrap();

        assert_eq!(report.summary.trials, 0);
        assert_eq!(report.summary.decays, 0);
        assert!(report.summary.is_insufficient());
        assert_eq!(report.summary.median(), None);
        assert!(report.decay_times.is_empty());
        assert_eq!(rec.started, Some(0));
        assert_eq!(rec.snapshots.len(), 1);
        assert_eq!(rec.snapshots[0].fraction(), 1.0);
    }

    #[test]
    fn no_ignition_everywhere_reports_insufficient_decays() {
        let ensemble = EnsembleBuilder::new(inert_config(20)).build().unwrap();
        let report = ensemble.run(&mut NoopObserver).unwrap();
        assert_eq!(report.summary.trials, 20);
        assert_eq!(report.summary.no_ignition, 20);
        assert!(report.summary.is_insufficient());
        assert!(report.summary.to_string().contains("insufficient decays"));
    }

    #[test]
    fn results_arrive_in_trial_order() {
        let ensemble = EnsembleBuilder::new(test_config(40)).build().unwrap();
        let mut rec = Recorder::default();
        ensemble.run(&mut rec).unwrap();
        let expected: Vec<TrialId> = (0..40).map(TrialId).collect();
        assert_eq!(rec.trials, expected);
        assert_eq!(rec.summary.map(|s| s.trials), Some(40));
    }

    #[test]
    fn matches_independent_trial_runs() {
        let cfg = test_config(24);
        let ensemble = EnsembleBuilder::new(cfg.clone()).build().unwrap();
        let report = ensemble.run(&mut NoopObserver).unwrap();

        let runner = ensemble.runner();
        let expected: Vec<f64> = (0..24)
            .filter_map(|i| runner.run_seeded(cfg.seed, TrialId(i)).decay_time())
            .collect();
        assert_eq!(report.decay_times, expected);
    }

    #[test]
    fn same_seed_same_report() {
        let a = EnsembleBuilder::new(test_config(30)).build().unwrap();
        let b = EnsembleBuilder::new(test_config(30)).build().unwrap();
        let ra = a.run(&mut NoopObserver).unwrap();
        let rb = b.run(&mut NoopObserver).unwrap();
        assert_eq!(ra.decay_times, rb.decay_times);
        assert_eq!(ra.summary, rb.summary);
    }

    #[test]
    fn progress_gated_by_count() {
        let ensemble = EnsembleBuilder::new(inert_config(35))
            .progress(ProgressPolicy::every_trials(10))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        ensemble.run(&mut rec).unwrap();
        let completed: Vec<usize> = rec.snapshots.iter().map(|s| s.completed).collect();
        assert_eq!(completed, [10, 20, 30, 35]);
        assert!(rec.snapshots.iter().all(|s| s.total == 35 && s.mean.is_none()));
    }

    #[test]
    fn silent_policy_emits_only_final_snapshot() {
        let ensemble = EnsembleBuilder::new(test_config(12))
            .progress(ProgressPolicy::silent())
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        let report = ensemble.run(&mut rec).unwrap();
        assert_eq!(rec.snapshots.len(), 1);
        let last = rec.snapshots[0];
        assert_eq!(last.completed, 12);
        assert_eq!(last.decays, report.summary.decays);
        if let Some(stats) = report.summary.measured() {
            assert_eq!(last.min, Some(stats.min));
            assert_eq!(last.max, Some(stats.max));
            assert!((last.mean.unwrap() - stats.mean).abs() < 1e-9);
        }
    }

    #[test]
    fn absurd_trial_count_rejected() {
        let ensemble = EnsembleBuilder::new(test_config(1)).build().unwrap();
        let result = ensemble.run_trials(usize::MAX, &mut NoopObserver);
        assert!(matches!(result, Err(EnsembleError::TooManyTrials { .. })));
    }
}

// ── Parallel execution ────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parallel"))]
mod parallel_tests {
    use super::*;

    fn run_on(threads: Option<usize>) -> (crate::EnsembleReport, Recorder) {
        let cfg = DecayConfig { num_threads: threads, ..test_config(64) };
        let ensemble = EnsembleBuilder::new(cfg)
            .progress(ProgressPolicy::every_trials(16))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        let report = ensemble.run(&mut rec).unwrap();
        (report, rec)
    }

    #[test]
    fn thread_count_does_not_change_results() {
        let (one, rec_one) = run_on(Some(1));
        let (four, rec_four) = run_on(Some(4));

        assert!(!one.decay_times.is_empty());
        assert_eq!(one.decay_times, four.decay_times);
        assert_eq!(one.summary, four.summary);
        assert_eq!(rec_one.trials, rec_four.trials);
        assert_eq!(rec_four.trials, (0..64).map(TrialId).collect::<Vec<_>>());
    }

    #[test]
    fn global_pool_matches_dedicated_pool() {
        let (global, _) = run_on(None);
        let (dedicated, _) = run_on(Some(3));
        assert_eq!(global.decay_times, dedicated.decay_times);
    }

    #[test]
    fn progress_counts_follow_trial_order() {
        let (_, rec) = run_on(Some(4));
        let completed: Vec<usize> = rec.snapshots.iter().map(|s| s.completed).collect();
        assert_eq!(completed, [16, 32, 48, 64]);
    }
}

// ── Statistics ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod summary_tests {
    use crate::summary::{median, DecayStats};
    use crate::{DecayStatistics, EnsembleSummary};
    use ste_core::TrialId;
    use ste_trial::{TrialOutcome, TrialResult};

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn stats_over_known_values() {
        let s = DecayStats::from_times(&[1.0, 2.0, 3.0, 4.0], 2.0).unwrap();
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.median, 2.5);
        assert!((s.std_dev - 1.25f64.sqrt()).abs() < 1e-12);
        assert_eq!((s.min, s.max), (1.0, 4.0));
        assert!((s.half_life_error - 0.25).abs() < 1e-12);
    }

    #[test]
    fn empty_times_have_no_stats() {
        assert!(DecayStats::from_times(&[], 600.0).is_none());
    }

    #[test]
    fn summary_counts_each_outcome() {
        let results = [
            TrialResult { trial: TrialId(0), outcome: TrialOutcome::Decayed { time: 10.0, crash_entered_at: 9.0 } },
            TrialResult { trial: TrialId(1), outcome: TrialOutcome::NoIgnition { elapsed: 100.0 } },
            TrialResult { trial: TrialId(2), outcome: TrialOutcome::NoCollision { crash_entered_at: 5.0 } },
            TrialResult { trial: TrialId(3), outcome: TrialOutcome::Decayed { time: 20.0, crash_entered_at: 18.0 } },
        ];
        let s = EnsembleSummary::from_results(&results, 15.0);
        assert_eq!((s.trials, s.decays, s.no_ignition, s.no_collision), (4, 2, 1, 1));
        match s.stats {
            DecayStatistics::Measured(d) => {
                assert_eq!(d.median, 15.0);
                assert_eq!(d.half_life_error, 0.0);
            }
            DecayStatistics::InsufficientDecays => panic!("expected stats"),
        }
    }
}

// ── Distributional sanity ─────────────────────────────────────────────────────

#[cfg(test)]
mod distribution_tests {
    use super::*;

    fn check_distribution(cfg: DecayConfig) {
        let nominal_mean = cfg.forces.crash_threshold / cfg.forces.mean_drift();
        let ensemble = EnsembleBuilder::new(cfg)
            .progress(ProgressPolicy::silent())
            .build()
            .unwrap();
        let report = ensemble.run(&mut NoopObserver).unwrap();
        let s = report.summary.measured().expect("expected decays");

        assert!(s.count > 0);
        // Order-of-magnitude band around the ~600 s target.
        assert!((100.0..5_000.0).contains(&s.median), "median {}", s.median);
        assert!((100.0..5_000.0).contains(&s.mean), "mean {}", s.mean);
        // Exponential-like: broad spread, not a spike.
        assert!(s.cv > 0.3 && s.cv < 2.0, "cv {}", s.cv);
        assert!(s.min < s.median && s.median < s.max);
        // The zero clamp shortens the charging walk below its unclamped mean.
        assert!(s.mean < nominal_mean, "mean {} vs nominal {nominal_mean}", s.mean);
    }

    #[test]
    fn thousand_trials_land_near_target() {
        check_distribution(test_config(1_000));
    }

    #[test]
    #[ignore = "full-resolution fine step; run with --ignored --release"]
    fn thousand_trials_full_resolution() {
        check_distribution(DecayConfig { trials: 1_000, seed: 2025, ..DecayConfig::default() });
    }
}

// ── Calibration ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod calibration_tests {
    use ste_core::{ForceConstants, RunRng};

    use super::*;
    use crate::calibrate::perturb;
    use crate::{CalibrationSettings, CalibrationState, Calibrator, EnsembleError};

    fn fast_config() -> DecayConfig {
        DecayConfig { fine_dt: 1e-3, ..test_config(1) }
    }

    #[test]
    fn best_error_never_increases() {
        let cfg = fast_config();
        let ensemble = EnsembleBuilder::new(cfg.clone()).build().unwrap();
        let settings = CalibrationSettings {
            max_step: 0.1,
            ..CalibrationSettings::from_config(&cfg, 16, 8)
        };
        let report = Calibrator::new(&ensemble, settings).unwrap().run(cfg.forces).unwrap();

        assert_eq!(report.history.len(), 8);
        for w in report.history.windows(2) {
            assert!(w[1].best_error <= w[0].best_error);
        }

        let best_step = report
            .history
            .iter()
            .min_by(|a, b| a.probe_error.total_cmp(&b.probe_error))
            .unwrap();
        assert_eq!(report.best_error, Some(best_step.probe_error));
        assert_eq!(report.best, best_step.candidate);
        assert_eq!(report.history.last().unwrap().best_error, best_step.probe_error);
    }

    #[test]
    fn calibration_is_reproducible() {
        let cfg = fast_config();
        let ensemble = EnsembleBuilder::new(cfg.clone()).build().unwrap();
        let settings = CalibrationSettings::from_config(&cfg, 8, 4);
        let cal = Calibrator::new(&ensemble, settings).unwrap();
        assert_eq!(cal.run(cfg.forces).unwrap(), cal.run(cfg.forces).unwrap());
    }

    #[test]
    fn empty_probes_never_become_best() {
        let cfg = inert_config(1);
        let ensemble = EnsembleBuilder::new(cfg.clone()).build().unwrap();
        let settings = CalibrationSettings::from_config(&cfg, 4, 3);
        let report = Calibrator::new(&ensemble, settings).unwrap().run(cfg.forces).unwrap();

        assert_eq!(report.best_error, None);
        assert_eq!(report.best, cfg.forces);
        assert!(report.history.iter().all(|s| s.probe_median.is_none()));
        assert!(report.history.iter().all(|s| s.probe_error == f64::INFINITY));
    }

    #[test]
    fn numeric_error_beats_empty_probe() {
        let mut state = CalibrationState::new(ForceConstants::default());
        assert!(!state.consider(f64::INFINITY));
        assert!(state.consider(5.0));
        assert!(!state.consider(f64::INFINITY));
        assert_eq!(state.best_error, 5.0);
    }

    #[test]
    fn perturbation_stays_in_band() {
        let base = ForceConstants::default();
        let mut rng = RunRng::new(3);
        for _ in 0..200 {
            let p = perturb(&base, 0.1, &mut rng);
            for (new, old) in [
                (p.attraction, base.attraction),
                (p.drag, base.drag),
                (p.noise_amplitude, base.noise_amplitude),
                (p.leak_rate, base.leak_rate),
                (p.crash_threshold, base.crash_threshold),
            ] {
                let ratio = new / old;
                assert!((0.9 - 1e-12..=1.1 + 1e-12).contains(&ratio), "ratio {ratio}");
            }
        }
    }

    #[test]
    fn rejects_bad_settings() {
        let cfg = fast_config();
        let ensemble = EnsembleBuilder::new(cfg.clone()).build().unwrap();
        let bad = CalibrationSettings { max_step: 0.0, ..CalibrationSettings::from_config(&cfg, 4, 2) };
        assert!(matches!(
            Calibrator::new(&ensemble, bad),
            Err(EnsembleError::Settings { field: "max_step", .. })
        ));
        let none = CalibrationSettings::from_config(&cfg, 0, 2);
        assert!(Calibrator::new(&ensemble, none).is_err());
    }
}
