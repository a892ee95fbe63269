//! Strongly typed trial identifier.
//!
//! The trial index doubles as the seed offset for the trial's RNG stream, so
//! it must be stable across runs: trial `n` of a run always gets the same
//! stream no matter how many workers execute the ensemble.

use std::fmt;

/// Index of one trial within an ensemble run.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialId(pub u32);

impl fmt::Display for TrialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrialId({})", self.0)
    }
}

/// Fails for indices beyond `u32::MAX`.
impl TryFrom<usize> for TrialId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<TrialId, Self::Error> {
        u32::try_from(n).map(TrialId)
    }
}
