pub mod combinatorics;
pub mod length;

pub use length::Length;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Slack accepted on the normalized [0, 1] segment parameter before an
/// evaluation counts as out of range. Values inside the band are clamped.
pub const PARAMETER_TOLERANCE: f64 = 1e-3;
