use std::sync::OnceLock;

use crate::error::{QueryError, Result};
use crate::math::{Length, TOLERANCE};
use crate::ops::SplineOps;
use crate::spline::{
    de_normalize, NormalizedSplineLocation, Spline, SplineLocation, SplineSample,
    DEFAULT_PROGRESS_OVERSHOOT_TOLERANCE,
};

/// Default number of coarse samples across the whole spline.
pub const DEFAULT_INITIAL_SAMPLES: usize = 32;

/// Default cap on Newton refinement steps.
pub const DEFAULT_ITERATIONS: usize = 25;

/// Default step size below which refinement stops early.
pub const DEFAULT_MIN_STEP: f64 = 1e-6;

/// Result of a closest point query.
///
/// The absolute arc-length location is denormalized lazily on first
/// access; denormalization costs a partial arc-length integral and many
/// callers only need the normalized location or the distance.
#[derive(Debug)]
pub struct ClosestOnSplineResult<'s, O: SplineOps> {
    spline: &'s Spline<O>,
    queried: O::Pos,
    normalized: NormalizedSplineLocation,
    position: O::Pos,
    distance: Length,
    location: OnceLock<SplineLocation>,
}

impl<O: SplineOps> ClosestOnSplineResult<'_, O> {
    /// The position the query ran for.
    #[must_use]
    pub fn queried_position(&self) -> O::Pos {
        self.queried
    }

    /// The spline the result lies on.
    #[must_use]
    pub fn spline(&self) -> &Spline<O> {
        self.spline
    }

    /// The normalized location of the closest point.
    #[must_use]
    pub fn normalized_location(&self) -> NormalizedSplineLocation {
        self.normalized
    }

    /// The closest position on the spline.
    #[must_use]
    pub fn position(&self) -> O::Pos {
        self.position
    }

    /// Euclidean distance from the queried position to the spline.
    #[must_use]
    pub fn distance(&self) -> Length {
        self.distance
    }

    /// The absolute arc-length location of the closest point, computed
    /// on first access.
    #[must_use]
    pub fn location(&self) -> SplineLocation {
        *self.location.get_or_init(|| {
            de_normalize(
                self.spline,
                self.normalized,
                DEFAULT_PROGRESS_OVERSHOOT_TOLERANCE,
            )
            .unwrap_or(SplineLocation::ZERO)
        })
    }
}

/// Finds the closest point on a spline to an arbitrary query position.
///
/// Coarse sampling across the whole spline picks a starting location;
/// Newton's method on the squared distance refines it. The refinement is
/// greedy: on strongly curved splines with several near-equidistant
/// branches it can settle on a local minimum. That is an accepted
/// approximation, bounded by the coarse sample count.
#[derive(Debug, Clone)]
pub struct ClosestPointOnSpline<O: SplineOps> {
    position: O::Pos,
    initial_samples: usize,
    iterations: usize,
    min_step: f64,
}

impl<O: SplineOps> ClosestPointOnSpline<O> {
    /// Creates a new `ClosestPointOnSpline` query with default sampling
    /// and refinement parameters.
    #[must_use]
    pub fn new(position: O::Pos) -> Self {
        Self {
            position,
            initial_samples: DEFAULT_INITIAL_SAMPLES,
            iterations: DEFAULT_ITERATIONS,
            min_step: DEFAULT_MIN_STEP,
        }
    }

    /// Overrides the coarse sample count.
    #[must_use]
    pub fn with_initial_samples(mut self, initial_samples: usize) -> Self {
        self.initial_samples = initial_samples;
        self
    }

    /// Overrides the Newton iteration cap.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Overrides the early-exit step threshold.
    #[must_use]
    pub fn with_min_step(mut self, min_step: f64) -> Self {
        self.min_step = min_step;
        self
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidSampleCount`] if the configured
    /// initial sample count is zero.
    pub fn execute<'s>(&self, spline: &'s Spline<O>) -> Result<ClosestOnSplineResult<'s, O>> {
        if self.initial_samples < 1 {
            return Err(QueryError::InvalidSampleCount {
                count: self.initial_samples,
            }
            .into());
        }

        let ops = spline.ops();
        #[allow(clippy::cast_precision_loss)]
        let upper = spline.segment_count() as f64;

        let mut best = 0.0;
        let mut best_distance = Length::new(f64::INFINITY);
        for i in 0..=self.initial_samples {
            #[allow(clippy::cast_precision_loss)]
            let location = upper * i as f64 / self.initial_samples as f64;
            if let Some(sample) = SplineSample::at(spline, NormalizedSplineLocation::new(location))
            {
                let distance = ops.distance(sample.position(), self.position);
                if distance < best_distance {
                    best_distance = distance;
                    best = location;
                }
            }
        }

        let refined = self.refine(spline, best, upper);
        let normalized = NormalizedSplineLocation::new(refined);
        let found = match SplineSample::at(spline, normalized) {
            Some(sample) => sample.position(),
            None => self.position,
        };
        Ok(ClosestOnSplineResult {
            spline,
            queried: self.position,
            normalized,
            position: found,
            distance: ops.distance(found, self.position),
            location: OnceLock::new(),
        })
    }

    /// Newton refinement in normalized-location space.
    ///
    /// Within each segment the parameter derivatives are rescaled by
    /// `total_duration / (segment_count · segment_duration)` so that a
    /// step stays commensurate when the iterate crosses into a segment
    /// with a different time scale; for uniform durations the factor is 1
    /// and this is the plain squared-distance Newton update.
    fn refine(&self, spline: &Spline<O>, start: f64, upper: f64) -> f64 {
        let ops = spline.ops();
        let count = spline.segment_count();
        let total_duration = spline.total_duration_raw();

        let mut location = start;
        for _ in 0..self.iterations {
            let (index, t) = NormalizedSplineLocation::new(location).split(count);
            let Some(segment) = spline.segment(index) else {
                break;
            };
            let polynomial = segment.polynomial(ops);
            #[allow(clippy::cast_precision_loss)]
            let rescale = total_duration / (count as f64 * segment.duration_raw(ops));

            let diff = ops.sub(polynomial.position_at(t), self.position);
            let tangent = ops.scale(polynomial.derivative_at(t), rescale);
            let second = ops.scale(polynomial.second_derivative_at(t), rescale * rescale);

            let slope = ops.dot(tangent, diff);
            let curvature = ops.dot(second, diff) + ops.dot(tangent, tangent);
            if curvature.abs() < TOLERANCE {
                break;
            }
            let step = slope / curvature;
            location = (location - step).clamp(0.0, upper);
            if step.abs() < self.min_step {
                break;
            }
        }
        location
    }

    /// Runs the query against every candidate spline and keeps the
    /// closest valid result.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NoSplines`] for an empty candidate slice and
    /// [`QueryError::AllSplinesFailed`] when every per-spline query
    /// errored; the two are distinct failures.
    pub fn execute_on_any<'s>(
        &self,
        splines: &'s [Spline<O>],
    ) -> Result<ClosestOnSplineResult<'s, O>> {
        if splines.is_empty() {
            return Err(QueryError::NoSplines.into());
        }
        splines
            .iter()
            .filter_map(|spline| self.execute(spline).ok())
            .min_by_key(ClosestOnSplineResult::distance)
            .ok_or_else(|| QueryError::AllSplinesFailed.into())
    }
}
