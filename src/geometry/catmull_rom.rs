use crate::math::TOLERANCE;
use crate::ops::SplineOps;

use super::polynomial::Polynomial;

/// Tangent-scaling strategy for Catmull-Rom construction.
///
/// The alpha exponent controls how handle spacing influences curvature:
/// uniform ignores spacing, chordal follows it fully, centripetal sits
/// in between and avoids cusps and self-intersections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatmullRomKind {
    /// Alpha 0.
    Uniform,
    /// Alpha 0.5. The default.
    #[default]
    Centripetal,
    /// Alpha 1.
    Chordal,
}

impl CatmullRomKind {
    /// The knot-parameterization exponent.
    #[must_use]
    pub fn alpha(self) -> f64 {
        match self {
            Self::Uniform => 0.0,
            Self::Centripetal => 0.5,
            Self::Chordal => 1.0,
        }
    }
}

/// One Catmull-Rom segment: four consecutive handles, of which the curve
/// traverses `p1` to `p2`; `p0` and `p3` only shape the tangents.
#[derive(Debug, Clone)]
pub struct CatmullRomSegment<O: SplineOps> {
    handles: [O::Pos; 4],
    kind: CatmullRomKind,
    duration: O::Time,
}

impl<O: SplineOps> CatmullRomSegment<O> {
    /// Creates a segment from four consecutive handles.
    #[must_use]
    pub fn new(handles: [O::Pos; 4], kind: CatmullRomKind, duration: O::Time) -> Self {
        Self {
            handles,
            kind,
            duration,
        }
    }

    /// The four handles.
    #[must_use]
    pub fn handles(&self) -> &[O::Pos; 4] {
        &self.handles
    }

    /// The traversed start position (`p1`).
    #[must_use]
    pub fn start(&self) -> O::Pos {
        self.handles[1]
    }

    /// The traversed end position (`p2`).
    #[must_use]
    pub fn end(&self) -> O::Pos {
        self.handles[2]
    }

    /// The time the segment spans.
    #[must_use]
    pub fn duration(&self) -> O::Time {
        self.duration
    }

    /// Knot intervals `distance(p_i, p_{i+1})^alpha`, with degenerate
    /// zero intervals replaced by 1 so coincident handles cannot divide
    /// by zero.
    fn knot_intervals(&self, ops: O) -> [f64; 3] {
        let alpha = self.kind.alpha();
        let mut intervals = [0.0; 3];
        for (i, interval) in intervals.iter_mut().enumerate() {
            let chord = ops
                .distance(self.handles[i], self.handles[i + 1])
                .value()
                .powf(alpha);
            *interval = if chord < TOLERANCE { 1.0 } else { chord };
        }
        intervals
    }

    /// Hermite tangents at `p1` and `p2`, expressed per unit of the
    /// normalized segment parameter.
    fn tangents(&self, ops: O) -> (O::Diff, O::Diff) {
        let [p0, p1, p2, p3] = self.handles;
        let [t01, t12, t23] = self.knot_intervals(ops);
        let span = ops.sub(p2, p1);

        // Non-uniform Catmull-Rom tangents (Barry-Goldman knots folded
        // into Hermite form). Uniform spacing reduces both to the
        // familiar (p_{i+1} - p_{i-1}) / 2.
        let inner_start = ops.diff_between(
            ops.scale(ops.sub(p1, p0), 1.0 / t01),
            ops.scale(ops.sub(p2, p0), 1.0 / (t01 + t12)),
        );
        let start = ops.combine(span, ops.scale(inner_start, t12));

        let inner_end = ops.diff_between(
            ops.scale(ops.sub(p3, p2), 1.0 / t23),
            ops.scale(ops.sub(p3, p1), 1.0 / (t12 + t23)),
        );
        let end = ops.combine(span, ops.scale(inner_end, t12));

        (start, end)
    }

    /// Expands the segment into its cubic Hermite power basis:
    ///
    /// `c1 = m1`, `c2 = 3·(p2 - p1) - 2·m1 - m2`, `c3 = 2·(p1 - p2) + m1 + m2`.
    #[must_use]
    pub fn to_polynomial(&self, ops: O) -> Polynomial<O> {
        let [_, p1, p2, _] = self.handles;
        let (m1, m2) = self.tangents(ops);
        let span = ops.sub(p2, p1);

        let c2 = ops.diff_between(
            ops.scale(span, 3.0),
            ops.combine(ops.scale(m1, 2.0), m2),
        );
        let c3 = ops.combine(ops.scale(span, -2.0), ops.combine(m1, m2));

        Polynomial::new(ops, p1, vec![m1, c2, c3])
    }

    /// Velocity entering the segment, without materializing the polynomial.
    #[must_use]
    pub fn start_velocity(&self, ops: O) -> O::Vel {
        ops.velocity(self.tangents(ops).0, self.duration)
    }

    /// Velocity leaving the segment.
    #[must_use]
    pub fn end_velocity(&self, ops: O) -> O::Vel {
        ops.velocity(self.tangents(ops).1, self.duration)
    }

    /// Acceleration entering the segment, as displacement per squared
    /// raw time unit.
    #[must_use]
    pub fn start_acceleration(&self, ops: O) -> O::Diff {
        let (m1, m2) = self.tangents(ops);
        let span = ops.sub(self.handles[2], self.handles[1]);
        // Second derivative at t = 0 is 2·c2.
        let second = ops.scale(
            ops.diff_between(ops.scale(span, 3.0), ops.combine(ops.scale(m1, 2.0), m2)),
            2.0,
        );
        let raw = ops.time_to_raw(self.duration);
        ops.scale(second, 1.0 / (raw * raw))
    }

    /// Acceleration leaving the segment, as displacement per squared
    /// raw time unit.
    #[must_use]
    pub fn end_acceleration(&self, ops: O) -> O::Diff {
        let (m1, m2) = self.tangents(ops);
        let span = ops.sub(self.handles[2], self.handles[1]);
        // Second derivative at t = 1 is 2·c2 + 6·c3.
        let c2 = ops.diff_between(ops.scale(span, 3.0), ops.combine(ops.scale(m1, 2.0), m2));
        let c3 = ops.combine(ops.scale(span, -2.0), ops.combine(m1, m2));
        let second = ops.combine(ops.scale(c2, 2.0), ops.scale(c3, 6.0));
        let raw = ops.time_to_raw(self.duration);
        ops.scale(second, 1.0 / (raw * raw))
    }

    /// The same trajectory traversed backward.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let [p0, p1, p2, p3] = self.handles;
        Self {
            handles: [p3, p2, p1, p0],
            kind: self.kind,
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
    ) -> CatmullRomSegment<P> {
        let [p0, p1, p2, p3] = self.handles;
        CatmullRomSegment {
            handles: [mapping(p0), mapping(p1), mapping(p2), mapping(p3)],
            kind: self.kind,
            duration: new_ops.time_from_raw(ops.time_to_raw(self.duration)),
        }
    }

    /// The parameterization kind.
    #[must_use]
    pub fn kind(&self) -> CatmullRomKind {
        self.kind
    }
}
