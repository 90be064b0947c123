mod bezier;
mod catmull_rom;
mod polynomial;

pub use bezier::BezierSegment;
pub use catmull_rom::{CatmullRomKind, CatmullRomSegment};
pub use polynomial::{Polynomial, DEFAULT_LENGTH_SAMPLES};

use crate::ops::SplineOps;

/// The curve data backing one spline segment.
///
/// Holds the raw control data sufficient to derive a [`Polynomial`];
/// start/end positions and boundary derivatives are available in closed
/// form without materializing it.
#[derive(Debug, Clone)]
pub enum SegmentCurve<O: SplineOps> {
    CatmullRom(CatmullRomSegment<O>),
    Bezier(BezierSegment<O>),
}

impl<O: SplineOps> SegmentCurve<O> {
    /// The position the segment starts at.
    #[must_use]
    pub fn start(&self) -> O::Pos {
        match self {
            Self::CatmullRom(segment) => segment.start(),
            Self::Bezier(segment) => segment.start(),
        }
    }

    /// The position the segment ends at.
    #[must_use]
    pub fn end(&self) -> O::Pos {
        match self {
            Self::CatmullRom(segment) => segment.end(),
            Self::Bezier(segment) => segment.end(),
        }
    }

    /// The time the segment spans.
    #[must_use]
    pub fn duration(&self) -> O::Time {
        match self {
            Self::CatmullRom(segment) => segment.duration(),
            Self::Bezier(segment) => segment.duration(),
        }
    }

    /// Expands the control data into the segment's power-basis trajectory.
    #[must_use]
    pub fn to_polynomial(&self, ops: O) -> Polynomial<O> {
        match self {
            Self::CatmullRom(segment) => segment.to_polynomial(ops),
            Self::Bezier(segment) => segment.to_polynomial(ops),
        }
    }

    /// Velocity entering the segment.
    #[must_use]
    pub fn start_velocity(&self, ops: O) -> O::Vel {
        match self {
            Self::CatmullRom(segment) => segment.start_velocity(ops),
            Self::Bezier(segment) => segment.start_velocity(ops),
        }
    }

    /// Velocity leaving the segment.
    #[must_use]
    pub fn end_velocity(&self, ops: O) -> O::Vel {
        match self {
            Self::CatmullRom(segment) => segment.end_velocity(ops),
            Self::Bezier(segment) => segment.end_velocity(ops),
        }
    }

    /// Acceleration entering the segment, as displacement per squared
    /// raw time unit.
    #[must_use]
    pub fn start_acceleration(&self, ops: O) -> O::Diff {
        match self {
            Self::CatmullRom(segment) => segment.start_acceleration(ops),
            Self::Bezier(segment) => segment.start_acceleration(ops),
        }
    }

    /// Acceleration leaving the segment.
    #[must_use]
    pub fn end_acceleration(&self, ops: O) -> O::Diff {
        match self {
            Self::CatmullRom(segment) => segment.end_acceleration(ops),
            Self::Bezier(segment) => segment.end_acceleration(ops),
        }
    }

    /// The same trajectory traversed backward.
    #[must_use]
    pub fn reversed(&self) -> Self {
        match self {
            Self::CatmullRom(segment) => Self::CatmullRom(segment.reversed()),
            Self::Bezier(segment) => Self::Bezier(segment.reversed()),
        }
    }

    /// Maps every handle through a pure position mapping.
    #[must_use]
    pub fn map_positions<P: SplineOps>(
        &self,
        ops: O,
        new_ops: P,
        mapping: &impl Fn(O::Pos) -> P::Pos,
    ) -> SegmentCurve<P> {
        match self {
            Self::CatmullRom(segment) => {
                SegmentCurve::CatmullRom(segment.map_positions(ops, new_ops, mapping))
            }
            Self::Bezier(segment) => {
                SegmentCurve::Bezier(segment.map_positions(ops, new_ops, mapping))
            }
        }
    }
}
