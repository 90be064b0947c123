//! Conversion between absolute arc-length locations and normalized
//! segment-plus-progress locations.
//!
//! The mapping is nonlinear (arc length versus parameter) and depends on
//! the spline, so the two location types are only ever related through
//! the functions here. Locations overshooting either end of the spline by
//! no more than the tolerance clamp to the boundary; anything further out
//! is an error.

use crate::error::{LocationError, Result};
use crate::geometry::DEFAULT_LENGTH_SAMPLES;
use crate::math::Length;
use crate::ops::SplineOps;

use super::location::{NormalizedSplineLocation, SplineLocation, SplineSegmentIndex};
use super::Spline;

/// Default overshoot tolerance for [`normalize`], in length units.
pub const DEFAULT_OVERSHOOT_TOLERANCE: Length = Length::new(1e-3);

/// Default overshoot tolerance for [`de_normalize`], in normalized units.
pub const DEFAULT_PROGRESS_OVERSHOOT_TOLERANCE: f64 = 1e-3;

fn clamp_location(
    location: SplineLocation,
    total: Length,
    tolerance: Length,
) -> Result<Length> {
    let value = location.length();
    if value < Length::ZERO {
        if value >= -tolerance {
            return Ok(Length::ZERO);
        }
        return Err(LocationError::OutOfBounds {
            location,
            length: total,
        }
        .into());
    }
    if value > total {
        if value <= total + tolerance {
            return Ok(total);
        }
        return Err(LocationError::OutOfBounds {
            location,
            length: total,
        }
        .into());
    }
    Ok(value)
}

/// Converts an absolute arc-length location into a normalized one.
///
/// Binary-searches the cumulative segment offsets for the containing
/// segment, then inverts that segment's arc-length integral.
///
/// # Errors
///
/// Returns [`LocationError::OutOfBounds`] when `location` overshoots
/// either end of the spline by more than `tolerance`.
pub fn normalize<O: SplineOps>(
    spline: &Spline<O>,
    location: SplineLocation,
    tolerance: Length,
) -> Result<NormalizedSplineLocation> {
    let offsets = spline.cumulative_lengths();
    let total = offsets[offsets.len() - 1];
    let value = clamp_location(location, total, tolerance)?;

    let segment = offsets
        .partition_point(|&offset| offset <= value)
        .saturating_sub(1)
        .min(spline.segment_count() - 1);
    let index = SplineSegmentIndex(segment);
    let within = value - offsets[segment];
    let progress = match spline.polynomial(index) {
        Some(polynomial) => polynomial.length_to_progress(within, DEFAULT_LENGTH_SAMPLES),
        None => 0.0,
    };
    Ok(NormalizedSplineLocation::from_segment(index, progress))
}

/// Converts a normalized location into an absolute arc-length one.
///
/// Sums the full lengths of the segments before the containing one, plus
/// the partial arc-length integral of the fractional remainder.
///
/// # Errors
///
/// Returns [`LocationError::NormalizedOutOfBounds`] when `location`
/// overshoots either end by more than `tolerance` (in normalized units).
pub fn de_normalize<O: SplineOps>(
    spline: &Spline<O>,
    location: NormalizedSplineLocation,
    tolerance: f64,
) -> Result<SplineLocation> {
    let count = spline.segment_count();
    #[allow(clippy::cast_precision_loss)]
    let upper = count as f64;
    let value = location.value();

    let out_of_bounds = || LocationError::NormalizedOutOfBounds {
        location,
        segments: count,
    };
    let clamped = if value < 0.0 {
        if value < -tolerance {
            return Err(out_of_bounds().into());
        }
        NormalizedSplineLocation::ZERO
    } else if value > upper {
        if value > upper + tolerance {
            return Err(out_of_bounds().into());
        }
        NormalizedSplineLocation::new(upper)
    } else {
        location
    };

    let (index, progress) = clamped.split(count);
    let offsets = spline.cumulative_lengths();
    let partial = match spline.polynomial(index) {
        Some(polynomial) => polynomial.progress_to_length(progress, DEFAULT_LENGTH_SAMPLES)?,
        None => Length::ZERO,
    };
    Ok(SplineLocation::new(offsets[index.0] + partial))
}

/// Normalizes a batch of ascending locations in one forward walk.
///
/// Strictly more efficient than calling [`normalize`] per location: the
/// segment cursor only ever advances, so the whole batch costs one pass
/// over the segments regardless of batch size. The input must already be
/// sorted ascending.
///
/// # Errors
///
/// Returns [`LocationError::Unsorted`] at the first index whose location
/// is smaller than its predecessor, and [`LocationError::OutOfBounds`]
/// for locations overshooting beyond `tolerance`. The two conditions are
/// distinct errors.
pub fn bulk_normalize_ordered<O: SplineOps>(
    spline: &Spline<O>,
    locations: &[SplineLocation],
    tolerance: Length,
) -> Result<Vec<NormalizedSplineLocation>> {
    for (i, pair) in locations.windows(2).enumerate() {
        if pair[1] < pair[0] {
            return Err(LocationError::Unsorted { index: i + 1 }.into());
        }
    }

    let offsets = spline.cumulative_lengths();
    let total = offsets[offsets.len() - 1];
    let last = spline.segment_count() - 1;

    let mut result = Vec::with_capacity(locations.len());
    let mut segment = 0;
    for &location in locations {
        let value = clamp_location(location, total, tolerance)?;
        while segment < last && offsets[segment + 1] < value {
            segment += 1;
        }
        let index = SplineSegmentIndex(segment);
        let progress = match spline.polynomial(index) {
            Some(polynomial) => {
                polynomial.length_to_progress(value - offsets[segment], DEFAULT_LENGTH_SAMPLES)
            }
            None => 0.0,
        };
        result.push(NormalizedSplineLocation::from_segment(index, progress));
    }
    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::CatmullRomKind;
    use crate::math::Point3;
    use crate::ops::Euclidean3;
    use approx::assert_relative_eq;

    fn linear_spline() -> Spline<Euclidean3> {
        // Five collinear handles spaced one unit apart: the curve runs
        // linearly from (0,0,0) to (2,0,0) over two segments.
        let handles: Vec<Point3> = (-1..=3).map(|i| Point3::new(f64::from(i), 0.0, 0.0)).collect();
        Spline::catmull_rom(&handles, CatmullRomKind::Centripetal, Euclidean3).unwrap()
    }

    fn curved_spline() -> Spline<Euclidean3> {
        let handles = vec![
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(3.0, -1.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(5.0, 1.0, 0.0),
        ];
        Spline::catmull_rom(&handles, CatmullRomKind::Centripetal, Euclidean3).unwrap()
    }

    #[test]
    fn linear_spline_normalization_is_identity() {
        let spline = linear_spline();
        for value in [0.0, 0.5, 1.0, 1.5, 2.0] {
            let normalized = spline.normalize(SplineLocation::from_value(value)).unwrap();
            assert_relative_eq!(normalized.value(), value, epsilon = 1e-9);

            let position = spline.position_at(normalized).unwrap();
            assert_relative_eq!(position.x, value, epsilon = 1e-9);
            assert_relative_eq!(position.y, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn round_trip_on_curved_spline() {
        let spline = curved_spline();
        let total = spline.total_length().value();
        for i in 0..=20 {
            let value = total * f64::from(i) / 20.0;
            let location = SplineLocation::from_value(value);
            let normalized = spline.normalize(location).unwrap();
            let back = spline.de_normalize(normalized).unwrap();
            assert!(
                (back.value() - value).abs() < 0.01,
                "round trip drifted: {value} -> {}",
                back.value()
            );
        }
    }

    #[test]
    fn reverse_round_trip_on_curved_spline() {
        let spline = curved_spline();
        #[allow(clippy::cast_precision_loss)]
        let upper = spline.segment_count() as f64;
        for i in 0..=20 {
            let value = upper * f64::from(i) / 20.0;
            let normalized = NormalizedSplineLocation::new(value);
            let location = spline.de_normalize(normalized).unwrap();
            let back = spline.normalize(location).unwrap();
            assert!(
                (back.value() - value).abs() < 0.01,
                "round trip drifted: {value} -> {}",
                back.value()
            );
        }
    }

    #[test]
    fn normalization_is_monotonic() {
        let spline = curved_spline();
        let total = spline.total_length().value();
        let mut previous = None;
        for i in 0..=50 {
            let value = total * f64::from(i) / 50.0;
            let normalized = spline.normalize(SplineLocation::from_value(value)).unwrap();
            if let Some(prev) = previous {
                assert!(normalized > prev, "not monotonic at {value}");
            }
            previous = Some(normalized);
        }
    }

    #[test]
    fn overshoot_within_tolerance_clamps() {
        let spline = linear_spline();
        let total = spline.total_length();
        let just_past = SplineLocation::new(total + Length::new(5e-4));
        let normalized = spline.normalize(just_past).unwrap();
        assert_relative_eq!(normalized.value(), 2.0, epsilon = 1e-9);

        let just_before = SplineLocation::from_value(-5e-4);
        let normalized = spline.normalize(just_before).unwrap();
        assert_relative_eq!(normalized.value(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn overshoot_beyond_tolerance_errors() {
        let spline = linear_spline();
        let far_past = SplineLocation::from_value(spline.total_length().value() + 1.0);
        assert!(matches!(
            spline.normalize(far_past),
            Err(crate::error::CurvisError::Location(
                LocationError::OutOfBounds { .. }
            ))
        ));

        let far_out = NormalizedSplineLocation::new(5.0);
        assert!(matches!(
            spline.de_normalize(far_out),
            Err(crate::error::CurvisError::Location(
                LocationError::NormalizedOutOfBounds { .. }
            ))
        ));
    }

    #[test]
    fn bulk_matches_single_normalization() {
        let spline = curved_spline();
        let total = spline.total_length().value();
        let locations: Vec<SplineLocation> = (0..=30)
            .map(|i| SplineLocation::from_value(total * f64::from(i) / 30.0))
            .collect();
        let bulk =
            bulk_normalize_ordered(&spline, &locations, DEFAULT_OVERSHOOT_TOLERANCE).unwrap();
        for (location, bulk_result) in locations.iter().zip(&bulk) {
            let single = spline.normalize(*location).unwrap();
            assert_relative_eq!(bulk_result.value(), single.value(), epsilon = 1e-9);
        }
    }

    #[test]
    fn bulk_rejects_unsorted_input_distinctly() {
        let spline = linear_spline();
        let unsorted = [
            SplineLocation::from_value(1.0),
            SplineLocation::from_value(0.5),
        ];
        assert!(matches!(
            bulk_normalize_ordered(&spline, &unsorted, DEFAULT_OVERSHOOT_TOLERANCE),
            Err(crate::error::CurvisError::Location(
                LocationError::Unsorted { index: 1 }
            ))
        ));

        let out_of_range = [
            SplineLocation::from_value(0.5),
            SplineLocation::from_value(99.0),
        ];
        assert!(matches!(
            bulk_normalize_ordered(&spline, &out_of_range, DEFAULT_OVERSHOOT_TOLERANCE),
            Err(crate::error::CurvisError::Location(
                LocationError::OutOfBounds { .. }
            ))
        ));
    }
}
