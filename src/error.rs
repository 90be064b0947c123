use thiserror::Error;

use crate::math::Length;
use crate::spline::{NormalizedSplineLocation, SplineLocation, SplineSegmentIndex};

/// Top-level error type for the curvis spline engine.
#[derive(Debug, Error)]
pub enum CurvisError {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Sampling(#[from] SamplingError),
}

/// Errors raised while building a spline or one of its segments.
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("spline requires at least {required} handles, got {actual}")]
    InsufficientHandles { required: usize, actual: usize },

    #[error(
        "bezier chain requires {degree}n+1 handles \
         (expected a multiple of {degree} after the first), got {actual}"
    )]
    HandleCountMismatch { degree: usize, actual: usize },

    #[error(
        "segments {segment} and {next} are not continuous: \
         endpoint gap is {gap} length units"
    )]
    Discontinuity {
        segment: SplineSegmentIndex,
        next: SplineSegmentIndex,
        gap: f64,
    },

    #[error("bezier degree {degree} exceeds the supported maximum of {max}")]
    DegreeTooHigh { degree: usize, max: usize },

    #[error("degenerate segment: {0}")]
    Degenerate(String),
}

/// Errors raised when a location lies outside a spline or violates
/// an ordering contract.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error(
        "location {location} is outside the spline \
         (valid range is 0 to {length} length units)"
    )]
    OutOfBounds {
        location: SplineLocation,
        length: Length,
    },

    #[error(
        "normalized location {location} is outside the spline \
         (valid range is 0 to {segments})"
    )]
    NormalizedOutOfBounds {
        location: NormalizedSplineLocation,
        segments: usize,
    },

    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("bulk normalization input is not ascending at index {index}")]
    Unsorted { index: usize },
}

/// Errors raised by spline queries.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("closest-point query requires at least 1 initial sample, got {count}")]
    InvalidSampleCount { count: usize },

    #[error("no splines supplied to multi-spline query")]
    NoSplines,

    #[error("every candidate spline failed the query")]
    AllSplinesFailed,
}

/// Errors raised while sampling a spline.
#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("desired sample length must be positive, got {length}")]
    InvalidSampleLength { length: f64 },

    #[error("sampling requires at least {required} samples, got {actual}")]
    InvalidSampleCount { required: usize, actual: usize },
}

/// Convenience type alias for results using [`CurvisError`].
pub type Result<T> = std::result::Result<T, CurvisError>;
