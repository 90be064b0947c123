use crate::geometry::Polynomial;
use crate::math::{PARAMETER_TOLERANCE, TOLERANCE};
use crate::ops::SplineOps;

use super::location::{NormalizedSplineLocation, SplineSegmentIndex};
use super::Spline;

/// A point on a spline, addressed by segment and in-segment progress.
///
/// Position, derivatives, and curvature are recomputed on demand from the
/// owning spline's cached polynomial; a sample stores no derived values,
/// so it can never go stale relative to the spline it points into.
#[derive(Debug, Clone, Copy)]
pub struct SplineSample<'s, O: SplineOps> {
    spline: &'s Spline<O>,
    segment: SplineSegmentIndex,
    t: f64,
}

impl<'s, O: SplineOps> SplineSample<'s, O> {
    /// Resolves a normalized location into a sample.
    ///
    /// Returns `None` when the location does not lie on the spline
    /// (beyond the usual clamping slack).
    #[must_use]
    pub fn at(spline: &'s Spline<O>, location: NormalizedSplineLocation) -> Option<Self> {
        let count = spline.segment_count();
        #[allow(clippy::cast_precision_loss)]
        let upper = count as f64;
        let value = location.value();
        if !(-PARAMETER_TOLERANCE..=upper + PARAMETER_TOLERANCE).contains(&value) {
            return None;
        }
        let clamped = NormalizedSplineLocation::new(value.clamp(0.0, upper));
        let (segment, progress) = clamped.split(count);
        Some(Self {
            spline,
            segment,
            t: progress.clamp(0.0, 1.0),
        })
    }

    /// The normalized location this sample sits at.
    #[must_use]
    pub fn location(&self) -> NormalizedSplineLocation {
        NormalizedSplineLocation::from_segment(self.segment, self.t)
    }

    /// The segment this sample lies on.
    #[must_use]
    pub fn segment_index(&self) -> SplineSegmentIndex {
        self.segment
    }

    /// The in-segment progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.t
    }

    fn polynomial(&self) -> &Polynomial<O> {
        // The segment index came from a validated split, so it exists.
        self.spline
            .polynomial(self.segment)
            .unwrap_or_else(|| unreachable!("sample points at a validated segment"))
    }

    /// The position at this sample.
    #[must_use]
    pub fn position(&self) -> O::Pos {
        self.polynomial().position_at(self.t)
    }

    /// The derivative with respect to the in-segment parameter.
    #[must_use]
    pub fn derivative(&self) -> O::Diff {
        self.polynomial().derivative_at(self.t)
    }

    /// The second derivative with respect to the in-segment parameter.
    #[must_use]
    pub fn second_derivative(&self) -> O::Diff {
        self.polynomial().second_derivative_at(self.t)
    }

    /// The `n`-th derivative with respect to the in-segment parameter.
    ///
    /// Orders above the segment's degree yield the zero displacement.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero; the zeroth derivative is [`Self::position`].
    #[must_use]
    pub fn nth_derivative(&self, n: usize) -> O::Diff {
        assert!(n >= 1, "derivative order must be at least 1");
        let polynomial = self.polynomial();
        if n > polynomial.degree() {
            return polynomial.zero_diff();
        }
        polynomial.nth_derivative_at(self.t, n)
    }

    /// Velocity at this sample: the parameter derivative over the
    /// segment's duration.
    #[must_use]
    pub fn velocity(&self) -> O::Vel {
        let ops = self.spline.ops();
        let duration = match self.spline.segment(self.segment) {
            Some(segment) => segment.curve().duration(),
            None => ops.time_from_raw(1.0),
        };
        ops.velocity(self.derivative(), duration)
    }

    /// Unit tangent, or `None` where the derivative degenerates to zero.
    #[must_use]
    pub fn tangent(&self) -> Option<O::Diff> {
        let ops = self.spline.ops();
        let derivative = self.derivative();
        let magnitude = ops.magnitude(derivative);
        if magnitude < TOLERANCE {
            return None;
        }
        Some(ops.scale(derivative, 1.0 / magnitude))
    }

    /// Curvature at this sample.
    ///
    /// `sqrt(|d1|²·|d2|² - dot(d1, d2)²) / |d1|³`, the cross-product
    /// magnitude written in inner products only, so it works for any
    /// displacement representation. Zero for straight (or degenerate)
    /// stretches.
    #[must_use]
    pub fn curvature(&self) -> f64 {
        let ops = self.spline.ops();
        let d1 = self.derivative();
        let d2 = self.second_derivative();
        let d1_sq = ops.squared_magnitude(d1);
        if d1_sq < TOLERANCE {
            return 0.0;
        }
        let rejected = ops.squared_magnitude(d2).mul_add(d1_sq, -ops.dot(d1, d2).powi(2));
        rejected.max(0.0).sqrt() / d1_sq.powf(1.5)
    }
}
