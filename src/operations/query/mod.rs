mod closest_point;

pub use closest_point::{
    ClosestOnSplineResult, ClosestPointOnSpline, DEFAULT_INITIAL_SAMPLES, DEFAULT_ITERATIONS,
    DEFAULT_MIN_STEP,
};
