pub mod location;
pub mod normalization;
pub mod sample;

pub use location::{
    NormalizedSplineLocation, SplineHandleIndex, SplineLocation, SplineSegmentIndex,
};
pub use normalization::{
    bulk_normalize_ordered, de_normalize, normalize, DEFAULT_OVERSHOOT_TOLERANCE,
    DEFAULT_PROGRESS_OVERSHOOT_TOLERANCE,
};
pub use sample::SplineSample;

use std::sync::OnceLock;

use crate::error::{ConstructionError, Result};
use crate::geometry::{
    BezierSegment, CatmullRomKind, CatmullRomSegment, Polynomial, SegmentCurve,
    DEFAULT_LENGTH_SAMPLES,
};
use crate::math::Length;
use crate::ops::SplineOps;

/// One segment of a spline: its control data plus lazily computed,
/// immutable-once-set caches for the polynomial and the arc length.
///
/// The caches are single-assignment cells, so concurrent readers may at
/// worst recompute redundantly while racing the first initialization;
/// they can never observe a torn value.
#[derive(Debug)]
pub struct Segment<O: SplineOps> {
    curve: SegmentCurve<O>,
    polynomial: OnceLock<Polynomial<O>>,
    length: OnceLock<Length>,
}

impl<O: SplineOps> Segment<O> {
    fn new(curve: SegmentCurve<O>) -> Self {
        Self {
            curve,
            polynomial: OnceLock::new(),
            length: OnceLock::new(),
        }
    }

    /// The control data backing this segment.
    #[must_use]
    pub fn curve(&self) -> &SegmentCurve<O> {
        &self.curve
    }

    /// The segment's trajectory polynomial, built on first access.
    #[must_use]
    pub fn polynomial(&self, ops: O) -> &Polynomial<O> {
        self.polynomial.get_or_init(|| self.curve.to_polynomial(ops))
    }

    /// The segment's arc length, computed on first access by Simpson
    /// quadrature over [`DEFAULT_LENGTH_SAMPLES`] intervals.
    #[must_use]
    pub fn length(&self, ops: O) -> Length {
        *self
            .length
            .get_or_init(|| self.polynomial(ops).length_simpson(DEFAULT_LENGTH_SAMPLES))
    }

    /// The raw duration of this segment.
    #[must_use]
    pub fn duration_raw(&self, ops: O) -> f64 {
        ops.time_to_raw(self.curve.duration())
    }
}

impl<O: SplineOps> Clone for Segment<O> {
    fn clone(&self) -> Self {
        // Caches restart empty; they are derived data.
        Self::new(self.curve.clone())
    }
}

/// An immutable, continuous sequence of curve segments.
///
/// Constructed once and never mutated; all queries are pure functions of
/// the construction input. Consecutive segments must connect: the end of
/// each segment has to coincide with the start of the next within
/// [`Length::EPSILON`], checked at construction.
#[derive(Debug, Clone)]
pub struct Spline<O: SplineOps> {
    segments: Vec<Segment<O>>,
    ops: O,
}

impl<O: SplineOps> Spline<O> {
    /// Builds a spline from raw segment curves.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::Degenerate`] for an empty segment
    /// list and [`ConstructionError::Discontinuity`] naming the first
    /// adjacent pair whose shared endpoint gap exceeds [`Length::EPSILON`].
    pub fn new(curves: Vec<SegmentCurve<O>>, ops: O) -> Result<Self> {
        if curves.is_empty() {
            return Err(
                ConstructionError::Degenerate("spline requires at least one segment".into()).into(),
            );
        }
        for (i, pair) in curves.windows(2).enumerate() {
            let gap = ops.distance(pair[0].end(), pair[1].start());
            if gap.value() > Length::EPSILON {
                return Err(ConstructionError::Discontinuity {
                    segment: SplineSegmentIndex(i),
                    next: SplineSegmentIndex(i + 1),
                    gap: gap.value(),
                }
                .into());
            }
        }
        Ok(Self {
            segments: curves.into_iter().map(Segment::new).collect(),
            ops,
        })
    }

    /// Builds a Catmull-Rom spline from an ordered handle sequence.
    ///
    /// The first and last handle are margins shaping the boundary
    /// tangents; the curve itself runs from the second handle to the
    /// second-to-last. Every segment spans one unit of raw time.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::InsufficientHandles`] for fewer than
    /// four handles.
    pub fn catmull_rom(handles: &[O::Pos], kind: CatmullRomKind, ops: O) -> Result<Self> {
        if handles.len() < 4 {
            return Err(ConstructionError::InsufficientHandles {
                required: 4,
                actual: handles.len(),
            }
            .into());
        }
        let duration = ops.time_from_raw(1.0);
        let curves = handles
            .windows(4)
            .map(|w| {
                SegmentCurve::CatmullRom(CatmullRomSegment::new(
                    [w[0], w[1], w[2], w[3]],
                    kind,
                    duration,
                ))
            })
            .collect();
        Self::new(curves, ops)
    }

    /// Builds a spline from Bezier segments.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Spline::new`].
    pub fn from_bezier_segments(segments: Vec<BezierSegment<O>>, ops: O) -> Result<Self> {
        Self::new(segments.into_iter().map(SegmentCurve::Bezier).collect(), ops)
    }

    /// The geometric operations this spline computes with.
    #[must_use]
    pub fn ops(&self) -> O {
        self.ops
    }

    /// Number of segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of handles of the equivalent margin-handle spline
    /// (three more than the segment count).
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.segments.len() + 3
    }

    /// All segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment<O>] {
        &self.segments
    }

    /// The segment at `index`, if it exists.
    #[must_use]
    pub fn segment(&self, index: SplineSegmentIndex) -> Option<&Segment<O>> {
        self.segments.get(index.0)
    }

    /// The cached trajectory polynomial of the segment at `index`.
    #[must_use]
    pub fn polynomial(&self, index: SplineSegmentIndex) -> Option<&Polynomial<O>> {
        self.segment(index).map(|s| s.polynomial(self.ops))
    }

    /// The cached arc length of the segment at `index`.
    #[must_use]
    pub fn segment_length(&self, index: SplineSegmentIndex) -> Option<Length> {
        self.segment(index).map(|s| s.length(self.ops))
    }

    /// Total arc length of the spline.
    #[must_use]
    pub fn total_length(&self) -> Length {
        self.segments.iter().map(|s| s.length(self.ops)).sum()
    }

    /// Arc-length offsets of each segment start from the spline start,
    /// plus the total length as the final entry.
    #[must_use]
    pub fn cumulative_lengths(&self) -> Vec<Length> {
        let mut offsets = Vec::with_capacity(self.segments.len() + 1);
        let mut running = Length::ZERO;
        offsets.push(running);
        for segment in &self.segments {
            running += segment.length(self.ops);
            offsets.push(running);
        }
        offsets
    }

    /// Sum of all raw segment durations.
    #[must_use]
    pub fn total_duration_raw(&self) -> f64 {
        self.segments.iter().map(|s| s.duration_raw(self.ops)).sum()
    }

    /// The position at a normalized location.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::LocationError::NormalizedOutOfBounds`] if
    /// the location does not lie on the spline.
    pub fn position_at(&self, location: NormalizedSplineLocation) -> Result<O::Pos> {
        let sample = SplineSample::at(self, location).ok_or_else(|| {
            crate::error::LocationError::NormalizedOutOfBounds {
                location,
                segments: self.segment_count(),
            }
        })?;
        Ok(sample.position())
    }

    /// Converts an absolute location into a normalized one using the
    /// default overshoot tolerance.
    ///
    /// # Errors
    ///
    /// See [`normalize`].
    pub fn normalize(&self, location: SplineLocation) -> Result<NormalizedSplineLocation> {
        normalize(self, location, DEFAULT_OVERSHOOT_TOLERANCE)
    }

    /// Converts a normalized location into an absolute one using the
    /// default overshoot tolerance.
    ///
    /// # Errors
    ///
    /// See [`de_normalize`].
    pub fn de_normalize(&self, location: NormalizedSplineLocation) -> Result<SplineLocation> {
        de_normalize(self, location, DEFAULT_PROGRESS_OVERSHOOT_TOLERANCE)
    }

    /// Produces a new spline of a possibly different position type by
    /// mapping every handle through a pure function.
    ///
    /// Curvature is not re-derived; the control data is mapped as-is and
    /// the result re-validated.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::Discontinuity`] if the mapping breaks
    /// segment continuity.
    pub fn map_positions<P: SplineOps>(
        &self,
        new_ops: P,
        mapping: &impl Fn(O::Pos) -> P::Pos,
    ) -> Result<Spline<P>> {
        let curves = self
            .segments
            .iter()
            .map(|s| s.curve.map_positions(self.ops, new_ops, mapping))
            .collect();
        Spline::new(curves, new_ops)
    }

    /// The same trajectory traversed backward: segment order and each
    /// segment's handle order reversed.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let segments = self
            .segments
            .iter()
            .rev()
            .map(|s| Segment::new(s.curve.reversed()))
            .collect();
        Self {
            segments,
            ops: self.ops,
        }
    }
}
