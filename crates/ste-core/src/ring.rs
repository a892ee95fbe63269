//! Periodic 1D domain and coordinate arithmetic.
//!
//! Positions live on a ring of fixed circumference.  Every position stored in
//! a [`RingPosition`] is already normalised into `[0, circumference)`; all
//! arithmetic goes through [`Ring`] so that invariant holds after every step.

use std::fmt;

/// A normalised coordinate on the ring, in `[0, circumference)`.
///
/// Construct through [`Ring::wrap`]; the inner value is `pub` for reading.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RingPosition(pub f64);

impl fmt::Display for RingPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// The periodic domain.  Cheap to copy; holds only the circumference.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ring {
    circumference: f64,
}

impl Ring {
    /// Create a ring.  The caller guarantees `circumference > 0`
    /// ([`DecayConfig::validate`][crate::DecayConfig::validate] checks it).
    #[inline]
    pub fn new(circumference: f64) -> Self {
        Self { circumference }
    }

    #[inline]
    pub fn circumference(&self) -> f64 {
        self.circumference
    }

    /// Half the circumference: the largest possible separation.
    #[inline]
    pub fn half(&self) -> f64 {
        self.circumference * 0.5
    }

    /// Decay length of the short-range repulsion: one tenth of the ring.
    #[inline]
    pub fn repulsion_length(&self) -> f64 {
        self.circumference / 10.0
    }

    /// Reduce an arbitrary coordinate modulo the circumference.
    #[inline]
    pub fn wrap(&self, x: f64) -> RingPosition {
        let r = x.rem_euclid(self.circumference);
        // rem_euclid can round a tiny negative input up to exactly C.
        if r >= self.circumference {
            RingPosition(0.0)
        } else {
            RingPosition(r)
        }
    }

    /// Shortest-arc separation, always in `[0, circumference / 2]`.
    #[inline]
    pub fn distance(&self, a: RingPosition, b: RingPosition) -> f64 {
        let d = (a.0 - b.0).abs();
        d.min(self.circumference - d)
    }

    /// Signed shortest-arc displacement from `from` to `to`, in
    /// `(-C/2, C/2]`.  A diametric tie resolves to the positive direction.
    #[inline]
    pub fn offset(&self, from: RingPosition, to: RingPosition) -> f64 {
        let half = self.half();
        let mut delta = to.0 - from.0;
        if delta > half {
            delta -= self.circumference;
        } else if delta <= -half {
            delta += self.circumference;
        }
        delta
    }

    /// Unit direction (`+1.0` or `-1.0`) of the shortest arc from `from`
    /// towards `to`.
    #[inline]
    pub fn direction(&self, from: RingPosition, to: RingPosition) -> f64 {
        if self.offset(from, to) >= 0.0 { 1.0 } else { -1.0 }
    }

    /// The position diametrically opposite `p`.
    #[inline]
    pub fn opposite(&self, p: RingPosition) -> RingPosition {
        self.wrap(p.0 + self.half())
    }
}
