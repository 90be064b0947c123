use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::math::Length;

/// Zero-based index of a segment within a spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SplineSegmentIndex(pub usize);

impl SplineSegmentIndex {
    /// The index of the first handle of this segment's four-handle window
    /// in a margin-handle spline.
    #[must_use]
    pub fn first_handle(self) -> SplineHandleIndex {
        SplineHandleIndex(self.0)
    }
}

impl fmt::Display for SplineSegmentIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Zero-based index of a handle within a spline.
///
/// Distinct from [`SplineSegmentIndex`]: a margin-handle spline has
/// three more handles than segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SplineHandleIndex(pub usize);

impl fmt::Display for SplineHandleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An absolute position on a spline: the arc-length distance from its
/// start, in length units.
///
/// Never interchangeable with [`NormalizedSplineLocation`] without an
/// explicit conversion; the mapping between the two is nonlinear and
/// spline-dependent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct SplineLocation(Length);

impl SplineLocation {
    /// The start of any spline.
    pub const ZERO: Self = Self(Length::ZERO);

    /// Creates a location from an arc-length distance.
    #[must_use]
    pub fn new(length: Length) -> Self {
        Self(length)
    }

    /// Creates a location from a raw distance in length units.
    #[must_use]
    pub fn from_value(value: f64) -> Self {
        Self(Length::new(value))
    }

    /// The arc-length distance from the spline start.
    #[must_use]
    pub fn length(self) -> Length {
        self.0
    }

    /// The raw distance in length units.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0.value()
    }

    /// Linear interpolation between two locations.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self(self.0.lerp(other.0, t))
    }
}

impl fmt::Display for SplineLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Length> for SplineLocation {
    fn from(length: Length) -> Self {
        Self(length)
    }
}

impl From<f64> for SplineLocation {
    fn from(value: f64) -> Self {
        Self::from_value(value)
    }
}

impl Add for SplineLocation {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for SplineLocation {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for SplineLocation {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for SplineLocation {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// A dimensionless position on a spline: the integer part is the segment
/// index, the fractional part the progress within that segment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedSplineLocation(f64);

impl NormalizedSplineLocation {
    /// The start of any spline.
    pub const ZERO: Self = Self(0.0);

    /// Creates a normalized location from its raw value.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Composes a normalized location from a segment index and the
    /// progress within that segment.
    #[must_use]
    pub fn from_segment(segment: SplineSegmentIndex, progress: f64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let base = segment.0 as f64;
        Self(base + progress)
    }

    /// The raw value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Splits into segment index and in-segment progress.
    ///
    /// The very end of the spline belongs to the last segment: for a
    /// spline of `segment_count` segments, the location `segment_count`
    /// decomposes to the last segment at progress 1 instead of a
    /// nonexistent segment at progress 0.
    #[must_use]
    pub fn split(self, segment_count: usize) -> (SplineSegmentIndex, f64) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mut segment = self.0.max(0.0).floor() as usize;
        if segment >= segment_count {
            segment = segment_count.saturating_sub(1);
        }
        #[allow(clippy::cast_precision_loss)]
        let progress = self.0 - segment as f64;
        (SplineSegmentIndex(segment), progress)
    }

    /// Linear interpolation between two normalized locations.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self(self.0 + (other.0 - self.0) * t)
    }
}

impl fmt::Display for NormalizedSplineLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<f64> for NormalizedSplineLocation {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl Eq for NormalizedSplineLocation {}

impl PartialOrd for NormalizedSplineLocation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NormalizedSplineLocation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

impl Add for NormalizedSplineLocation {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for NormalizedSplineLocation {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn split_interior_location() {
        let (segment, progress) = NormalizedSplineLocation::new(2.25).split(4);
        assert_eq!(segment, SplineSegmentIndex(2));
        assert_relative_eq!(progress, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn split_end_of_spline_belongs_to_last_segment() {
        let (segment, progress) = NormalizedSplineLocation::new(4.0).split(4);
        assert_eq!(segment, SplineSegmentIndex(3));
        assert_relative_eq!(progress, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn from_segment_round_trips() {
        let location = NormalizedSplineLocation::from_segment(SplineSegmentIndex(3), 0.5);
        assert_relative_eq!(location.value(), 3.5, epsilon = 1e-12);
    }

    #[test]
    fn locations_are_ordered() {
        assert!(SplineLocation::from_value(1.0) < SplineLocation::from_value(2.0));
        assert!(NormalizedSplineLocation::new(0.5) < NormalizedSplineLocation::new(1.5));
    }

    #[test]
    fn location_arithmetic() {
        let a = SplineLocation::from_value(2.0);
        let b = SplineLocation::from_value(0.5);
        assert_relative_eq!((a - b).value(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(a.lerp(b, 0.5).value(), 1.25, epsilon = 1e-12);
    }
}
