use crate::error::{LocationError, Result};
use crate::math::combinatorics::falling_factorial;
use crate::math::{Length, PARAMETER_TOLERANCE, TOLERANCE};
use crate::ops::SplineOps;

/// Default sample count for arc-length quadrature.
pub const DEFAULT_LENGTH_SAMPLES: usize = 64;

/// The trajectory of one spline segment as a power series in the
/// normalized parameter `t ∈ [0, 1]`.
///
/// `position(t) = base + Σ coefficients[i] · t^(i+1)`.
///
/// A polynomial is built once per segment and immutable thereafter.
/// Evaluation outside `[0, 1]` (beyond a small slack band that clamps)
/// is a contract violation and reported as an error.
#[derive(Debug, Clone)]
pub struct Polynomial<O: SplineOps> {
    ops: O,
    base: O::Pos,
    coefficients: Vec<O::Diff>,
}

impl<O: SplineOps> Polynomial<O> {
    /// Creates a polynomial from its base point and tail coefficients.
    #[must_use]
    pub fn new(ops: O, base: O::Pos, coefficients: Vec<O::Diff>) -> Self {
        Self {
            ops,
            base,
            coefficients,
        }
    }

    /// The polynomial degree (number of tail coefficients).
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coefficients.len()
    }

    /// The base point, i.e. the position at `t = 0`.
    #[must_use]
    pub fn base(&self) -> O::Pos {
        self.base
    }

    /// The tail coefficients.
    #[must_use]
    pub fn coefficients(&self) -> &[O::Diff] {
        &self.coefficients
    }

    pub(crate) fn zero_diff(&self) -> O::Diff {
        self.ops.sub(self.base, self.base)
    }

    fn validate_parameter(t: f64) -> Result<f64> {
        if !(-PARAMETER_TOLERANCE..=1.0 + PARAMETER_TOLERANCE).contains(&t) {
            return Err(LocationError::ParameterOutOfRange {
                parameter: "t",
                value: t,
                min: 0.0,
                max: 1.0,
            }
            .into());
        }
        Ok(t.clamp(0.0, 1.0))
    }

    pub(crate) fn position_at(&self, t: f64) -> O::Pos {
        let mut pos = self.base;
        let mut power = t;
        for &c in &self.coefficients {
            pos = self.ops.add(pos, self.ops.scale(c, power));
            power *= t;
        }
        pos
    }

    pub(crate) fn derivative_at(&self, t: f64) -> O::Diff {
        let mut sum = self.zero_diff();
        let mut power = 1.0;
        for (i, &c) in self.coefficients.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let weight = (i + 1) as f64;
            sum = self.ops.combine(sum, self.ops.scale(c, weight * power));
            power *= t;
        }
        sum
    }

    pub(crate) fn second_derivative_at(&self, t: f64) -> O::Diff {
        let mut sum = self.zero_diff();
        let mut power = 1.0;
        for (i, &c) in self.coefficients.iter().enumerate().skip(1) {
            #[allow(clippy::cast_precision_loss)]
            let weight = (i * (i + 1)) as f64;
            sum = self.ops.combine(sum, self.ops.scale(c, weight * power));
            power *= t;
        }
        sum
    }

    pub(crate) fn nth_derivative_at(&self, t: f64, n: usize) -> O::Diff {
        let mut sum = self.zero_diff();
        let mut power = 1.0;
        for (i, &c) in self.coefficients.iter().enumerate().skip(n - 1) {
            #[allow(clippy::cast_precision_loss)]
            let weight = falling_factorial(i + 1, n) as f64;
            sum = self.ops.combine(sum, self.ops.scale(c, weight * power));
            power *= t;
        }
        sum
    }

    /// Evaluates the position at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::ParameterOutOfRange`] if `t` lies outside
    /// `[0, 1]` beyond the clamping slack.
    pub fn evaluate(&self, t: f64) -> Result<O::Pos> {
        Ok(self.position_at(Self::validate_parameter(t)?))
    }

    /// Evaluates the first derivative with respect to `t`.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::ParameterOutOfRange`] if `t` is out of range.
    pub fn evaluate_derivative(&self, t: f64) -> Result<O::Diff> {
        Ok(self.derivative_at(Self::validate_parameter(t)?))
    }

    /// Evaluates the second derivative with respect to `t`.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::ParameterOutOfRange`] if `t` is out of range.
    pub fn evaluate_second_derivative(&self, t: f64) -> Result<O::Diff> {
        Ok(self.second_derivative_at(Self::validate_parameter(t)?))
    }

    /// Evaluates the `n`-th derivative with respect to `t`.
    ///
    /// Orders above the degree yield the zero displacement.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::ParameterOutOfRange`] if `t` is out of range.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero; the zeroth derivative is [`Self::evaluate`].
    pub fn evaluate_nth_derivative(&self, t: f64, n: usize) -> Result<O::Diff> {
        assert!(n >= 1, "derivative order must be at least 1");
        let t = Self::validate_parameter(t)?;
        if n > self.degree() {
            return Ok(self.zero_diff());
        }
        Ok(self.nth_derivative_at(t, n))
    }

    /// Finds the parameter minimizing the distance to `target`.
    ///
    /// Newton's method on the squared distance `d(t) = |pos(t) - target|²`,
    /// starting at `t = 0.5`:
    ///
    /// `d'(t) = dot(tangent, diff)`,
    /// `d''(t) = dot(second, diff) + dot(tangent, tangent)`,
    /// `t ← t - d'/d''`, clamped into `[0, 1]` each step.
    ///
    /// Terminates after `iterations` steps or as soon as the denominator
    /// underflows, returning the current estimate.
    #[must_use]
    pub fn closest_point_to(&self, target: O::Pos, iterations: usize) -> f64 {
        let mut t = 0.5;
        for _ in 0..iterations {
            let diff = self.ops.sub(self.position_at(t), target);
            let tangent = self.derivative_at(t);
            let second = self.second_derivative_at(t);
            let slope = self.ops.dot(tangent, diff);
            let curvature = self.ops.dot(second, diff) + self.ops.dot(tangent, tangent);
            if curvature.abs() < TOLERANCE {
                break;
            }
            t = (t - slope / curvature).clamp(0.0, 1.0);
        }
        t
    }

    /// Approximates the arc length by Simpson's rule over the derivative
    /// magnitude, with weights `1, 4, 2, …, 4, 1` scaled by `h/3`.
    ///
    /// `samples` is rounded up to the next even interval count. The result
    /// is a deterministic approximation, never exact.
    #[must_use]
    pub fn length_simpson(&self, samples: usize) -> Length {
        let intervals = samples.max(2).next_multiple_of(2);
        #[allow(clippy::cast_precision_loss)]
        let h = 1.0 / intervals as f64;
        let mut sum = self.ops.magnitude(self.derivative_at(0.0))
            + self.ops.magnitude(self.derivative_at(1.0));
        for i in 1..intervals {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 * h;
            let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
            sum += weight * self.ops.magnitude(self.derivative_at(t));
        }
        Length::new(sum * h / 3.0)
    }

    /// Approximates the arc length by summing chord distances between
    /// consecutive samples.
    #[must_use]
    pub fn length_trapezoidal(&self, samples: usize) -> Length {
        let intervals = samples.max(1);
        let mut total = Length::ZERO;
        let mut previous = self.base;
        for i in 1..=intervals {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / intervals as f64;
            let current = self.position_at(t);
            total += self.ops.distance(previous, current);
            previous = current;
        }
        total
    }

    /// Inverts the arc-length integral: the parameter at which `length`
    /// of curve has been traversed from `t = 0`.
    ///
    /// Overshoot clamps to `1.0` and negative input clamps to `0.0`;
    /// callers apply their tolerance policy before calling.
    #[must_use]
    pub fn length_to_progress(&self, length: Length, samples: usize) -> f64 {
        if length <= Length::ZERO {
            return 0.0;
        }
        let intervals = samples.max(1);
        #[allow(clippy::cast_precision_loss)]
        let h = 1.0 / intervals as f64;
        let mut walked = Length::ZERO;
        let mut previous = self.base;
        for i in 1..=intervals {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 * h;
            let current = self.position_at(t);
            let step = self.ops.distance(previous, current);
            if walked + step >= length {
                let within = if step.value() < TOLERANCE {
                    0.0
                } else {
                    (length - walked) / step
                };
                return (t - h) + within * h;
            }
            walked += step;
            previous = current;
        }
        1.0
    }

    /// The arc length traversed from `t = 0` up to `t`.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::ParameterOutOfRange`] if `t` is out of range.
    pub fn progress_to_length(&self, t: f64, samples: usize) -> Result<Length> {
        let t = Self::validate_parameter(t)?;
        let intervals = samples.max(1);
        let mut total = Length::ZERO;
        let mut previous = self.base;
        for i in 1..=intervals {
            #[allow(clippy::cast_precision_loss)]
            let step_t = t * i as f64 / intervals as f64;
            let current = self.position_at(step_t);
            total += self.ops.distance(previous, current);
            previous = current;
        }
        Ok(total)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3};
    use crate::ops::Euclidean3;
    use approx::assert_relative_eq;

    /// f(t) = a + b·t + c·t² + d·t³ with distinct per-axis values.
    fn synthetic_cubic() -> Polynomial<Euclidean3> {
        Polynomial::new(
            Euclidean3,
            Point3::new(1.0, -2.0, 0.5),
            vec![
                Vector3::new(2.0, 1.0, -1.0),
                Vector3::new(-3.0, 0.5, 2.0),
                Vector3::new(1.5, -1.0, 0.25),
            ],
        )
    }

    fn closed_form(t: f64) -> Point3 {
        let b = Vector3::new(2.0, 1.0, -1.0);
        let c = Vector3::new(-3.0, 0.5, 2.0);
        let d = Vector3::new(1.5, -1.0, 0.25);
        Point3::new(1.0, -2.0, 0.5) + b * t + c * t * t + d * t * t * t
    }

    #[test]
    fn evaluate_at_zero_is_base() {
        let poly = synthetic_cubic();
        assert_eq!(poly.evaluate(0.0).unwrap(), poly.base());
    }

    #[test]
    fn evaluate_matches_closed_form() {
        let poly = synthetic_cubic();
        for i in 0..=10 {
            let t = f64::from(i) / 10.0;
            let expected = closed_form(t);
            let actual = poly.evaluate(t).unwrap();
            assert_relative_eq!(actual.x, expected.x, epsilon = 1e-12);
            assert_relative_eq!(actual.y, expected.y, epsilon = 1e-12);
            assert_relative_eq!(actual.z, expected.z, epsilon = 1e-12);
        }
    }

    #[test]
    fn derivatives_match_closed_form() {
        let poly = synthetic_cubic();
        let b = Vector3::new(2.0, 1.0, -1.0);
        let c = Vector3::new(-3.0, 0.5, 2.0);
        let d = Vector3::new(1.5, -1.0, 0.25);
        for i in 0..=10 {
            let t = f64::from(i) / 10.0;
            let first = b + c * 2.0 * t + d * 3.0 * t * t;
            let second = c * 2.0 + d * 6.0 * t;
            let third = d * 6.0;

            let d1 = poly.evaluate_derivative(t).unwrap();
            let d2 = poly.evaluate_second_derivative(t).unwrap();
            let d3 = poly.evaluate_nth_derivative(t, 3).unwrap();
            assert_relative_eq!(d1.x, first.x, epsilon = 1e-7);
            assert_relative_eq!(d1.y, first.y, epsilon = 1e-7);
            assert_relative_eq!(d1.z, first.z, epsilon = 1e-7);
            assert_relative_eq!(d2.x, second.x, epsilon = 1e-7);
            assert_relative_eq!(d2.z, second.z, epsilon = 1e-7);
            assert_relative_eq!(d3.x, third.x, epsilon = 1e-7);

            // The generalized form agrees with the dedicated ones.
            let g1 = poly.evaluate_nth_derivative(t, 1).unwrap();
            let g2 = poly.evaluate_nth_derivative(t, 2).unwrap();
            assert_relative_eq!(g1.x, d1.x, epsilon = 1e-12);
            assert_relative_eq!(g2.y, d2.y, epsilon = 1e-12);
        }
    }

    #[test]
    fn high_order_derivatives_of_cubic_are_zero() {
        let poly = synthetic_cubic();
        for n in 4..=5 {
            let d = poly.evaluate_nth_derivative(0.3, n).unwrap();
            assert_relative_eq!(d.norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn out_of_range_parameter_is_rejected() {
        let poly = synthetic_cubic();
        assert!(poly.evaluate(1.5).is_err());
        assert!(poly.evaluate(-0.5).is_err());
        // Within the slack band it clamps instead.
        assert!(poly.evaluate(1.0005).is_ok());
    }

    #[test]
    fn closest_point_on_straight_segment() {
        // pos(t) = (4t, 0, 0); closest to (1, 2, 0) is t = 0.25.
        let poly = Polynomial::new(
            Euclidean3,
            Point3::origin(),
            vec![Vector3::new(4.0, 0.0, 0.0)],
        );
        let t = poly.closest_point_to(Point3::new(1.0, 2.0, 0.0), 16);
        assert_relative_eq!(t, 0.25, epsilon = 1e-6);
    }

    #[test]
    fn closest_point_clamps_to_range() {
        let poly = Polynomial::new(
            Euclidean3,
            Point3::origin(),
            vec![Vector3::new(1.0, 0.0, 0.0)],
        );
        let t = poly.closest_point_to(Point3::new(5.0, 0.0, 0.0), 16);
        assert_relative_eq!(t, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn straight_segment_length() {
        let poly = Polynomial::new(
            Euclidean3,
            Point3::origin(),
            vec![Vector3::new(3.0, 4.0, 0.0)],
        );
        assert_relative_eq!(poly.length_simpson(32).value(), 5.0, epsilon = 1e-9);
        assert_relative_eq!(poly.length_trapezoidal(32).value(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn quadrature_methods_agree_on_curved_segment() {
        // pos(t) = (t, t², 0): length = ∫√(1+4t²) dt ≈ 1.478942857.
        let poly = Polynomial::new(
            Euclidean3,
            Point3::origin(),
            vec![Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0)],
        );
        let simpson = poly.length_simpson(64).value();
        let trapezoid = poly.length_trapezoidal(64).value();
        let reference = poly.length_trapezoidal(4096).value();
        assert_relative_eq!(simpson, 1.478_942_857, epsilon = 1e-4);
        assert!((simpson - trapezoid).abs() < 0.01);
        assert!((simpson - reference).abs() < 0.01);
    }

    #[test]
    fn length_inversion_round_trip() {
        let poly = Polynomial::new(
            Euclidean3,
            Point3::origin(),
            vec![Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0)],
        );
        let total = poly.length_trapezoidal(DEFAULT_LENGTH_SAMPLES);
        for fraction in [0.1, 0.25, 0.5, 0.75, 0.9] {
            let target = total * fraction;
            let t = poly.length_to_progress(target, DEFAULT_LENGTH_SAMPLES);
            let back = poly.progress_to_length(t, DEFAULT_LENGTH_SAMPLES).unwrap();
            assert!((back - target).abs().value() < 0.01);
        }
    }

    #[test]
    fn length_to_progress_clamps_overshoot() {
        let poly = Polynomial::new(
            Euclidean3,
            Point3::origin(),
            vec![Vector3::new(1.0, 0.0, 0.0)],
        );
        assert_relative_eq!(
            poly.length_to_progress(Length::new(2.0), 16),
            1.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            poly.length_to_progress(Length::new(-1.0), 16),
            0.0,
            epsilon = 1e-12
        );
    }
}
