//! Fluent builder for constructing an [`Ensemble`].

use ste_core::{DecayConfig, ForceConstants};
use ste_trial::TrialRunner;

use crate::{Ensemble, EnsembleResult, ProgressPolicy};

/// Fluent builder for [`Ensemble`].
///
/// # Optional inputs (have defaults)
///
/// | Method         | Default                         |
/// |----------------|---------------------------------|
/// | `.forces(f)`   | `config.forces`                 |
/// | `.progress(p)` | [`ProgressPolicy::default()`]   |
///
/// # Example
///
/// ```rust,ignore
/// let ensemble = EnsembleBuilder::new(config)
///     .progress(ProgressPolicy::every_trials(250))
///     .build()?;
/// let report = ensemble.run(&mut NoopObserver)?;
/// ```
pub struct EnsembleBuilder {
    config:   DecayConfig,
    progress: ProgressPolicy,
}

impl EnsembleBuilder {
    pub fn new(config: DecayConfig) -> Self {
        Self { config, progress: ProgressPolicy::default() }
    }

    /// Override the configuration's raw force constants.
    pub fn forces(mut self, forces: ForceConstants) -> Self {
        self.config.forces = forces;
        self
    }

    pub fn progress(mut self, policy: ProgressPolicy) -> Self {
        self.progress = policy;
        self
    }

    /// Validate the configuration, set up the worker pool and return a
    /// ready-to-run [`Ensemble`].
    ///
    /// Fails before any trial runs if the configuration is invalid.
    pub fn build(self) -> EnsembleResult<Ensemble> {
        self.config.validate()?;

        let runner = TrialRunner::from_config(&self.config);
        log::debug!(
            "ensemble configured: {} trials, seed {}, circumference {}, dt {}/{}",
            self.config.trials,
            self.config.seed,
            self.config.circumference,
            self.config.coarse_dt,
            self.config.fine_dt,
        );

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(rayon::ThreadPoolBuilder::new().num_threads(n).build()?),
            None    => None,
        };

        Ok(Ensemble {
            config:   self.config,
            runner,
            progress: self.progress,
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
