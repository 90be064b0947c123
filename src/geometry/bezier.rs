use crate::error::{ConstructionError, Result};
use crate::math::combinatorics::{binomial, MAX_DEGREE};
use crate::ops::SplineOps;

use super::polynomial::Polynomial;

/// One Bezier segment of arbitrary degree up to [`MAX_DEGREE`].
///
/// Holds the Bernstein control handles; the curve runs from the first
/// handle to the last, shaped by the interior ones.
#[derive(Debug, Clone)]
pub struct BezierSegment<O: SplineOps> {
    handles: Vec<O::Pos>,
    duration: O::Time,
}

impl<O: SplineOps> BezierSegment<O> {
    /// Creates a segment from raw Bernstein handles.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::InsufficientHandles`] for fewer than
    /// two handles and [`ConstructionError::DegreeTooHigh`] above degree 12
    /// (the closed-form expansion relies on exact factorials, which lose
    /// integer exactness and numeric stability beyond that).
    pub fn new(handles: Vec<O::Pos>, duration: O::Time) -> Result<Self> {
        if handles.len() < 2 {
            return Err(ConstructionError::InsufficientHandles {
                required: 2,
                actual: handles.len(),
            }
            .into());
        }
        let degree = handles.len() - 1;
        if degree > MAX_DEGREE {
            return Err(ConstructionError::DegreeTooHigh {
                degree,
                max: MAX_DEGREE,
            }
            .into());
        }
        Ok(Self { handles, duration })
    }

    /// Quadratic segment from three handles.
    #[must_use]
    pub fn quadratic(p0: O::Pos, p1: O::Pos, p2: O::Pos, duration: O::Time) -> Self {
        Self {
            handles: vec![p0, p1, p2],
            duration,
        }
    }

    /// Cubic segment from four handles.
    #[must_use]
    pub fn cubic(p0: O::Pos, p1: O::Pos, p2: O::Pos, p3: O::Pos, duration: O::Time) -> Self {
        Self {
            handles: vec![p0, p1, p2, p3],
            duration,
        }
    }

    /// Quartic segment from five handles.
    #[must_use]
    pub fn quartic(
        p0: O::Pos,
        p1: O::Pos,
        p2: O::Pos,
        p3: O::Pos,
        p4: O::Pos,
        duration: O::Time,
    ) -> Self {
        Self {
            handles: vec![p0, p1, p2, p3, p4],
            duration,
        }
    }

    /// Quintic segment from six handles.
    #[must_use]
    pub fn quintic(
        p0: O::Pos,
        p1: O::Pos,
        p2: O::Pos,
        p3: O::Pos,
        p4: O::Pos,
        p5: O::Pos,
        duration: O::Time,
    ) -> Self {
        Self {
            handles: vec![p0, p1, p2, p3, p4, p5],
            duration,
        }
    }

    /// Cubic segment matching the given endpoint velocities.
    ///
    /// The first interior handle sits at `start + velocity · duration / 3`
    /// (degree 3), the last symmetrically before `end`.
    #[must_use]
    pub fn with_velocities(
        ops: O,
        start: O::Pos,
        start_velocity: O::Vel,
        end_velocity: O::Vel,
        end: O::Pos,
        duration: O::Time,
    ) -> Self {
        let step_in = ops.scale(ops.displacement(start_velocity, duration), 1.0 / 3.0);
        let step_out = ops.scale(ops.displacement(end_velocity, duration), 1.0 / 3.0);
        Self::cubic(
            start,
            ops.add(start, step_in),
            ops.add(end, ops.negate(step_out)),
            end,
            duration,
        )
    }

    /// Quintic segment matching endpoint velocities and accelerations.
    ///
    /// Accelerations are displacements per squared raw time unit. The
    /// second handle from each end folds the acceleration in via
    /// `(accel · duration² + 2 · (degree - 1) · velocity · duration)
    /// / (degree · (degree - 1))`.
    #[must_use]
    #[allow(clippy::too_many_arguments, clippy::similar_names)]
    pub fn with_velocities_and_accelerations(
        ops: O,
        start: O::Pos,
        start_velocity: O::Vel,
        start_acceleration: O::Diff,
        end_acceleration: O::Diff,
        end_velocity: O::Vel,
        end: O::Pos,
        duration: O::Time,
    ) -> Self {
        let degree = 5.0;
        let raw = ops.time_to_raw(duration);
        let normalizer = degree * (degree - 1.0);

        let v_in = ops.displacement(start_velocity, duration);
        let v_out = ops.displacement(end_velocity, duration);
        let p1 = ops.add(start, ops.scale(v_in, 1.0 / degree));
        let p4 = ops.add(end, ops.scale(v_out, -1.0 / degree));

        let fold_in = ops.combine(
            ops.scale(start_acceleration, raw * raw),
            ops.scale(v_in, 2.0 * (degree - 1.0)),
        );
        let p2 = ops.add(start, ops.scale(fold_in, 1.0 / normalizer));

        let fold_out = ops.diff_between(
            ops.scale(end_acceleration, raw * raw),
            ops.scale(v_out, 2.0 * (degree - 1.0)),
        );
        let p3 = ops.add(end, ops.scale(fold_out, 1.0 / normalizer));

        Self::quintic(start, p1, p2, p3, p4, end, duration)
    }

    /// Splits a `2n+1`-handle chain into `n` quadratic segments sharing
    /// their junction handles.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::HandleCountMismatch`] if the count is
    /// not `2n+1` with `n >= 1`.
    pub fn chain_from_quadratic_handles(
        handles: &[O::Pos],
        duration: O::Time,
    ) -> Result<Vec<Self>> {
        Self::chain(handles, 2, duration)
    }

    /// Splits a `3n+1`-handle chain into `n` cubic segments.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::HandleCountMismatch`] if the count is
    /// not `3n+1` with `n >= 1`.
    pub fn chain_from_cubic_handles(handles: &[O::Pos], duration: O::Time) -> Result<Vec<Self>> {
        Self::chain(handles, 3, duration)
    }

    fn chain(handles: &[O::Pos], degree: usize, duration: O::Time) -> Result<Vec<Self>> {
        if handles.len() < degree + 1 || (handles.len() - 1) % degree != 0 {
            return Err(ConstructionError::HandleCountMismatch {
                degree,
                actual: handles.len(),
            }
            .into());
        }
        let segments = (handles.len() - 1) / degree;
        let mut result = Vec::with_capacity(segments);
        for i in 0..segments {
            let window = &handles[i * degree..=(i + 1) * degree];
            result.push(Self {
                handles: window.to_vec(),
                duration,
            });
        }
        Ok(result)
    }

    /// The Bernstein handles.
    #[must_use]
    pub fn handles(&self) -> &[O::Pos] {
        &self.handles
    }

    /// The curve degree.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.handles.len() - 1
    }

    /// The first handle, which the curve starts at.
    #[must_use]
    pub fn start(&self) -> O::Pos {
        self.handles[0]
    }

    /// The last handle, which the curve ends at.
    #[must_use]
    pub fn end(&self) -> O::Pos {
        self.handles[self.handles.len() - 1]
    }

    /// The time the segment spans.
    #[must_use]
    pub fn duration(&self) -> O::Time {
        self.duration
    }

    /// Expands the Bernstein basis into power-basis coefficients:
    ///
    /// `c_j = C(n, j) · Σ_{i=1..j} (-1)^(j-i) · C(j, i) · (P_i - P_0)`.
    ///
    /// The `i = 0` term always cancels (the alternating binomial row sums
    /// to zero), which is what lets the expansion work on displacements
    /// from the base handle instead of raw positions.
    #[must_use]
    pub fn to_polynomial(&self, ops: O) -> Polynomial<O> {
        let n = self.degree();
        let base = self.handles[0];
        let mut coefficients = Vec::with_capacity(n);
        for j in 1..=n {
            let mut c = ops.sub(base, base);
            for i in 1..=j {
                #[allow(clippy::cast_precision_loss)]
                let mut weight = binomial(j, i) as f64;
                if (j - i) % 2 == 1 {
                    weight = -weight;
                }
                c = ops.combine(c, ops.scale(ops.sub(self.handles[i], base), weight));
            }
            #[allow(clippy::cast_precision_loss)]
            let outer = binomial(n, j) as f64;
            coefficients.push(ops.scale(c, outer));
        }
        Polynomial::new(ops, base, coefficients)
    }

    /// Velocity entering the segment: `degree · (P_1 - P_0) / duration`.
    #[must_use]
    pub fn start_velocity(&self, ops: O) -> O::Vel {
        #[allow(clippy::cast_precision_loss)]
        let n = self.degree() as f64;
        ops.velocity(
            ops.scale(ops.sub(self.handles[1], self.handles[0]), n),
            self.duration,
        )
    }

    /// Velocity leaving the segment: `degree · (P_n - P_{n-1}) / duration`.
    #[must_use]
    pub fn end_velocity(&self, ops: O) -> O::Vel {
        let last = self.handles.len() - 1;
        #[allow(clippy::cast_precision_loss)]
        let n = self.degree() as f64;
        ops.velocity(
            ops.scale(ops.sub(self.handles[last], self.handles[last - 1]), n),
            self.duration,
        )
    }

    /// Acceleration entering the segment, as displacement per squared raw
    /// time unit: `n·(n-1)·(P_2 - 2·P_1 + P_0) / duration²`.
    #[must_use]
    pub fn start_acceleration(&self, ops: O) -> O::Diff {
        self.hull_acceleration(ops, 0, 1, 2)
    }

    /// Acceleration leaving the segment.
    #[must_use]
    pub fn end_acceleration(&self, ops: O) -> O::Diff {
        let last = self.handles.len() - 1;
        self.hull_acceleration(ops, last, last - 1, last - 2)
    }

    fn hull_acceleration(&self, ops: O, a: usize, b: usize, c: usize) -> O::Diff {
        #[allow(clippy::cast_precision_loss)]
        let n = self.degree() as f64;
        let raw = ops.time_to_raw(self.duration);
        let folded = ops.combine(
            ops.sub(self.handles[c], self.handles[b]),
            ops.sub(self.handles[a], self.handles[b]),
        );
        ops.scale(folded, n * (n - 1.0) / (raw * raw))
    }

    /// The same trajectory traversed backward.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut handles = self.handles.clone();
        handles.reverse();
        Self {
            handles,
            duration: self.duration,
        }
    }

    /// Maps every handle through a pure position mapping, carrying the
    /// duration over via its raw value.
    #[must_use]
    pub fn map_positions<P: SplineOps>(
        &self,
        ops: O,
        new_ops: P,
        mapping: &impl Fn(O::Pos) -> P::Pos,
    ) -> BezierSegment<P> {
        BezierSegment {
            handles: self.handles.iter().map(|&h| mapping(h)).collect(),
            duration: new_ops.time_from_raw(ops.time_to_raw(self.duration)),
        }
    }
}
