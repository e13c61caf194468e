//! Exact geometric predicates.
//!
//! Orientation and incircle tests are delegated to the `robust` crate, a
//! Rust port of Shewchuk's adaptive-precision arithmetic. Sign is exact for
//! any input representable in `f64`; only the magnitude is approximate.

use nalgebra::Point2;
use robust::Coord;

#[inline]
fn coord(p: Point2<f64>) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

/// Orientation of `c` relative to the directed line `a -> b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// `c` is strictly left of `a -> b` (CCW turn).
    Left,
    /// `c` is strictly right of `a -> b` (CW turn).
    Right,
    /// `a`, `b`, `c` are collinear.
    Collinear,
}

impl Orientation {
    /// Sign convention used throughout this crate: `+1`/`-1`/`0`.
    pub fn sign(self) -> i32 {
        match self {
            Orientation::Left => 1,
            Orientation::Right => -1,
            Orientation::Collinear => 0,
        }
    }
}

/// `orientation(a,b,c)`: sign of the signed area `2 * [a,b,c]`.
///
/// `Left` iff `c` is strictly left of `a->b`.
pub fn orientation(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Orientation {
    let det = robust::orient2d(coord(a), coord(b), coord(c));
    if det > 0.0 {
        Orientation::Left
    } else if det < 0.0 {
        Orientation::Right
    } else {
        Orientation::Collinear
    }
}

/// Result of the in-circle test for `d` against the circle through `a,b,c`
/// (which must be given in CCW order).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InCircle {
    /// `d` is strictly inside the circumcircle of `(a,b,c)`.
    Inside,
    /// `d` is strictly outside.
    Outside,
    /// `d` lies exactly on the circumcircle.
    Cocircular,
}

impl InCircle {
    pub fn sign(self) -> i32 {
        match self {
            InCircle::Inside => 1,
            InCircle::Outside => -1,
            InCircle::Cocircular => 0,
        }
    }
}

/// `incircle(a,b,c,d)` with `a,b,c` CCW.
pub fn incircle(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>, d: Point2<f64>) -> InCircle {
    let det = robust::incircle(coord(a), coord(b), coord(c), coord(d));
    if det > 0.0 {
        InCircle::Inside
    } else if det < 0.0 {
        InCircle::Outside
    } else {
        InCircle::Cocircular
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_basic_triangle() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.0, 1.0);
        assert_eq!(orientation(a, b, c), Orientation::Left);
        assert_eq!(orientation(a, c, b), Orientation::Right);
        assert_eq!(orientation(a, b, Point2::new(2.0, 0.0)), Orientation::Collinear);
    }

    #[test]
    fn incircle_unit_square_diagonal_is_cocircular() {
        // (0,0),(1,0),(1,1) CCW; (0,1) lies exactly on their circumcircle.
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(1.0, 1.0);
        let d = Point2::new(0.0, 1.0);
        assert_eq!(incircle(a, b, c, d), InCircle::Cocircular);
    }

    #[test]
    fn incircle_detects_inside_and_outside() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.0, 1.0);
        assert_eq!(incircle(a, b, c, Point2::new(0.1, 0.1)), InCircle::Inside);
        assert_eq!(incircle(a, b, c, Point2::new(5.0, 5.0)), InCircle::Outside);
    }
}
