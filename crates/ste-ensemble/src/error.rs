use ste_core::SteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnsembleError {
    #[error(transparent)]
    Config(#[from] SteError),

    #[error("calibration setting `{field}` {reason}")]
    Settings {
        field:  &'static str,
        reason: String,
    },

    #[error("{requested} trials exceeds the maximum trial index")]
    TooManyTrials {
        requested: usize,
    },

    #[cfg(feature = "parallel")]
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type EnsembleResult<T> = Result<T, EnsembleError>;
