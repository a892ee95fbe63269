//! Terminal outcomes of a trial.

use std::fmt;

use ste_core::TrialId;

/// How a trial ended.
///
/// Only `Decayed` carries a decay time.  The other two are expected modeled
/// outcomes, not failures.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TrialOutcome {
    /// The flares collided during the collapse window.
    Decayed {
        /// Simulated time of the collision.  Always `> crash_entered_at`.
        time:             f64,
        crash_entered_at: f64,
    },
    /// The stored energy never crossed the crash threshold before the wait
    /// horizon.
    NoIgnition {
        elapsed: f64,
    },
    /// The collapse began but the flares did not collide within the window.
    NoCollision {
        crash_entered_at: f64,
    },
}

impl TrialOutcome {
    /// The decay time, or `None` if the trial produced no decay.
    #[inline]
    pub fn decay_time(&self) -> Option<f64> {
        match *self {
            TrialOutcome::Decayed { time, .. } => Some(time),
            _ => None,
        }
    }

    /// When the collapse began, if it ever did.
    #[inline]
    pub fn crash_entered_at(&self) -> Option<f64> {
        match *self {
            TrialOutcome::Decayed { crash_entered_at, .. }
            | TrialOutcome::NoCollision { crash_entered_at } => Some(crash_entered_at),
            TrialOutcome::NoIgnition { .. } => None,
        }
    }

    /// Short machine-friendly label (`decayed`, `no_ignition`, `no_collision`).
    pub fn label(&self) -> &'static str {
        match self {
            TrialOutcome::Decayed { .. }     => "decayed",
            TrialOutcome::NoIgnition { .. }  => "no_ignition",
            TrialOutcome::NoCollision { .. } => "no_collision",
        }
    }
}

impl fmt::Display for TrialOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialOutcome::Decayed { time, .. } => write!(f, "decayed at {time:.3}"),
            other => f.write_str(other.label()),
        }
    }
}

/// The result of one trial, tagged with its index.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrialResult {
    pub trial:   TrialId,
    pub outcome: TrialOutcome,
}

impl TrialResult {
    #[inline]
    pub fn decay_time(&self) -> Option<f64> {
        self.outcome.decay_time()
    }
}
