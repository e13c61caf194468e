//! Piecewise-linear parameterized boundary curve.

use std::fmt;

use nalgebra::Point2;

/// Errors raised while evaluating or searching along a [`Curve`].
#[derive(Clone, Debug, PartialEq)]
pub enum CurveError {
    /// `distance_away` did not converge within its bracket/bisection budget.
    DistanceAwayDidNotConverge { from: f64, target: f64 },
    /// A curve needs at least two points to have a well-defined length.
    TooFewPoints { got: usize },
}

impl fmt::Display for CurveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveError::DistanceAwayDidNotConverge { from, target } => {
                write!(f, "distance_away({from}, {target}) did not converge")
            }
            CurveError::TooFewPoints { got } => write!(f, "curve needs at least 2 points, got {got}"),
        }
    }
}

impl std::error::Error for CurveError {}

/// A piecewise-linear path parameterized by arclength. Closed curves
/// implicitly repeat their first point at the end of `points`/`distances`.
#[derive(Clone, Debug)]
pub struct Curve {
    points: Vec<Point2<f64>>,
    closed: bool,
    distances: Vec<f64>,
}

impl Curve {
    /// Builds a curve from its vertices, computing cumulative arclength.
    /// `points` must have at least 2 entries; if `closed`, an implicit
    /// segment from the last point back to the first is included.
    pub fn new(points: Vec<Point2<f64>>, closed: bool) -> Result<Self, CurveError> {
        if points.len() < 2 {
            return Err(CurveError::TooFewPoints { got: points.len() });
        }
        let mut pts = points;
        if closed {
            let first = pts[0];
            pts.push(first);
        }
        let mut distances = Vec::with_capacity(pts.len());
        distances.push(0.0);
        for w in pts.windows(2) {
            let last = *distances.last().unwrap();
            distances.push(last + (w[1] - w[0]).norm());
        }
        Ok(Self { points: pts, closed, distances })
    }

    pub fn closed(&self) -> bool {
        self.closed
    }

    /// Total arclength of the curve.
    pub fn length(&self) -> f64 {
        *self.distances.last().expect("constructor guarantees at least one distance")
    }

    fn wrap(&self, f: f64) -> f64 {
        if self.closed {
            let l = self.length();
            let mut g = f % l;
            if g < 0.0 {
                g += l;
            }
            g
        } else {
            f
        }
    }

    /// Index `i` such that `distances[i] <= f < distances[i+1]`.
    fn segment_at(&self, f: f64) -> usize {
        match self.distances.binary_search_by(|d| d.partial_cmp(&f).unwrap()) {
            Ok(i) => i.min(self.distances.len() - 2),
            Err(0) => 0,
            Err(i) => (i - 1).min(self.distances.len() - 2),
        }
    }

    /// Evaluates the curve at arclength `f`, interpolating linearly within
    /// the enclosing segment. `f=0` maps to the first point.
    pub fn eval(&self, f: f64) -> Point2<f64> {
        let f = self.wrap(f);
        let i = self.segment_at(f);
        let (d0, d1) = (self.distances[i], self.distances[i + 1]);
        let t = if d1 > d0 { (f - d0) / (d1 - d0) } else { 0.0 };
        self.points[i] + (self.points[i + 1] - self.points[i]) * t
    }

    /// Resamples each segment into roughly `scale_fn(midpoint)`-long pieces,
    /// with at least one interval per source segment.
    pub fn upsample(&self, scale_fn: impl Fn(Point2<f64>) -> f64) -> Vec<Point2<f64>> {
        self.upsample_with_params(scale_fn).into_iter().map(|(_, p)| p).collect()
    }

    /// As [`Curve::upsample`], but also returns each point's arclength
    /// parameter, for callers that need to pin the result back onto this
    /// curve (e.g. a `oring` assignment).
    pub fn upsample_with_params(&self, scale_fn: impl Fn(Point2<f64>) -> f64) -> Vec<(f64, Point2<f64>)> {
        let mut out = Vec::new();
        let n_segments = self.points.len() - 1;
        for i in 0..n_segments {
            let (p0, p1) = (self.points[i], self.points[i + 1]);
            let (d0, d1) = (self.distances[i], self.distances[i + 1]);
            let seg_len = d1 - d0;
            let mid = Point2::from((p0.coords + p1.coords) * 0.5);
            let scale = scale_fn(mid).max(1e-12);
            let steps = (seg_len / scale).round().max(1.0) as usize;
            for s in 0..steps {
                let t = s as f64 / steps as f64;
                out.push((d0 + seg_len * t, p0 + (p1 - p0) * t));
            }
        }
        if !self.closed {
            out.push((*self.distances.last().unwrap(), *self.points.last().unwrap()));
        }
        out
    }

    /// Finds `f1` such that `|eval(f1) - eval(f0)| ~= |d|`, walking in the
    /// direction of `d`'s sign. Brackets by geometric expansion (factor
    /// 1.5, up to 10 steps) then bisects (up to 10 steps) to `rtol=0.05`.
    pub fn distance_away(&self, f0: f64, d: f64) -> Result<(f64, Point2<f64>), CurveError> {
        const RTOL: f64 = 0.05;
        let target = d.abs();
        let sign = if d >= 0.0 { 1.0 } else { -1.0 };
        let p0 = self.eval(f0);

        let chord = |f1: f64| (self.eval(f1) - p0).norm();

        let mut step = target.max(1e-9);
        let mut lo = f0;
        let mut hi = f0 + sign * step;
        let mut hi_chord = chord(hi);
        let mut bracketed = hi_chord >= target;
        if !bracketed {
            for _ in 0..10 {
                step *= 1.5;
                hi = f0 + sign * step;
                hi_chord = chord(hi);
                if hi_chord >= target || (!self.closed && (hi <= self.distances[0] || hi >= self.length())) {
                    bracketed = hi_chord >= target;
                    break;
                }
            }
        }
        if !bracketed {
            return Err(CurveError::DistanceAwayDidNotConverge { from: f0, target: d });
        }

        for _ in 0..10 {
            let mid = (lo + hi) / 2.0;
            let c = chord(mid);
            if (c - target).abs() <= RTOL * target {
                return Ok((mid, self.eval(mid)));
            }
            if c < target {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let mid = (lo + hi) / 2.0;
        let c = chord(mid);
        if (c - target).abs() <= RTOL * target {
            Ok((mid, self.eval(mid)))
        } else {
            Err(CurveError::DistanceAwayDidNotConverge { from: f0, target: d })
        }
    }

    /// True iff `b` is reached before `c` walking forward (increasing
    /// arclength, wrapping if closed) from `a`.
    pub fn is_forward(&self, f_a: f64, f_b: f64, f_c: f64) -> bool {
        let l = self.length();
        let fwd = |from: f64, to: f64| -> f64 {
            let d = to - from;
            if self.closed {
                ((d % l) + l) % l
            } else {
                d
            }
        };
        fwd(f_a, f_b) < fwd(f_a, f_c)
    }

    /// True iff `b` is reached before `c` walking backward from `a`.
    pub fn is_reverse(&self, f_a: f64, f_b: f64, f_c: f64) -> bool {
        self.is_forward(f_a, 2.0 * f_a - f_b, 2.0 * f_a - f_c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Curve {
        Curve::new(vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), Point2::new(10.0, 10.0), Point2::new(0.0, 10.0)], true)
            .unwrap()
    }

    #[test]
    fn eval_at_zero_is_first_point() {
        let c = square();
        assert_eq!(c.eval(0.0), Point2::new(0.0, 0.0));
    }

    #[test]
    fn eval_wraps_for_closed_curves() {
        let c = square();
        let p = c.eval(c.length() + 5.0);
        assert!((p - Point2::new(5.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn distance_away_along_straight_segment() {
        let c = square();
        let (f1, p1) = c.distance_away(0.0, 5.0).unwrap();
        assert!((f1 - 5.0).abs() < 0.25);
        assert!((p1 - Point2::new(5.0, 0.0)).norm() < 0.25);
    }

    #[test]
    fn upsample_emits_at_least_one_point_per_segment() {
        let c = square();
        let pts = c.upsample(|_| 100.0);
        assert_eq!(pts.len(), 4);
    }
}
