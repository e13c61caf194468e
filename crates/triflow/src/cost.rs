//! Per-node mesh-quality penalty used by the optimization pass.

use nalgebra::Point2;

const MAX_ANGLE_DEG: f64 = 85.0;
const IDEAL_ANGLE_DEG: f64 = 60.0;

/// Interior angle at vertex `b` of triangle `(a,b,c)`, in radians.
pub fn internal_angle(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    let u = a - b;
    let v = c - b;
    let cos = u.dot(&v) / (u.norm() * v.norm());
    cos.clamp(-1.0, 1.0).acos()
}

fn deg(rad: f64) -> f64 {
    rad.to_degrees()
}

/// Quality cost of placing a node at `p` with ring edges to each `(b_i,c_i)`
/// pair (each triangle `(p, b_i, c_i)` assumed left-oriented), relative to a
/// target edge length `target_length`. Lower is better; never negative.
pub fn cost(p: Point2<f64>, ring: &[(Point2<f64>, Point2<f64>)], target_length: f64) -> f64 {
    assert!(!ring.is_empty(), "cost function needs at least one triangle");

    let mut worst_deviation: f64 = 0.0;
    let mut max_angle_observed: f64 = 0.0;
    let mut min_sq: f64 = f64::INFINITY;
    let mut max_sq: f64 = 0.0;

    for &(b, c) in ring {
        let alpha = deg(internal_angle(c, p, b));
        let beta = deg(internal_angle(p, b, c));
        let gamma = deg(internal_angle(b, c, p));

        for angle in [alpha, beta, gamma] {
            worst_deviation = worst_deviation.max((angle - IDEAL_ANGLE_DEG).abs());
            max_angle_observed = max_angle_observed.max(angle);
        }

        min_sq = min_sq.min((p - b).norm_squared()).min((p - c).norm_squared());
        max_sq = max_sq.max((p - b).norm_squared()).max((p - c).norm_squared());
    }

    let angle_penalty = 10.0 * (worst_deviation / (MAX_ANGLE_DEG - IDEAL_ANGLE_DEG)).powi(5);
    let near_invalid_penalty = ((max_angle_observed - (MAX_ANGLE_DEG - 3.0)) / 3.0).exp();

    let target_sq = target_length * target_length;
    let length_penalty = 2.0 * ((target_sq / min_sq).max(1.0) - 1.0) + 2.0 * ((max_sq / target_sq).max(1.0) - 1.0);

    angle_penalty + near_invalid_penalty + length_penalty
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equilateral_triangle_at_target_length_is_near_zero_cost() {
        let p = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.5, 3.0_f64.sqrt() / 2.0);
        let c_val = cost(p, &[(b, c)], 1.0);
        assert!(c_val < 1e-3, "expected near-zero cost, got {c_val}");
    }

    #[test]
    fn sliver_triangle_costs_more_than_equilateral() {
        let p = Point2::new(0.0, 0.0);
        let good = cost(p, &[(Point2::new(1.0, 0.0), Point2::new(0.5, 0.866))], 1.0);
        let bad = cost(p, &[(Point2::new(1.0, 0.0), Point2::new(2.0, 0.01))], 1.0);
        assert!(bad > good);
    }
}
