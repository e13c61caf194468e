//! Per-node position optimization against the quality cost function.

use nalgebra::{Point2, Vector2};

use crate::cost::cost;
use crate::curve::Curve;
use crate::mesh::{Fixed, Mesh, NodeId};

/// Minimizes the cost of `n`'s incident triangles by moving it, respecting
/// its `fixed` kind: `FREE` nodes move anywhere in the plane, `SLIDE` nodes
/// move only along their ring curve, `RIGID` nodes are left untouched.
///
/// Uses a derivative-free Nelder-Mead-style simplex search rather than a
/// gradient method, since the cost function isn't differentiable at
/// degenerate triangle configurations.
pub(crate) fn relax_node(mesh: &mut Mesh, curves: &[Curve], n: NodeId, target_length: f64) -> f64 {
    match mesh.node_fixed(n) {
        Fixed::Rigid => node_cost(mesh, n, target_length),
        Fixed::Free => {
            let x0 = mesh.node_x(n);
            let ring = ring_of(mesh, n);
            if ring.is_empty() {
                return 0.0;
            }
            let f = |p: Point2<f64>| cost(p, &ring, target_length);
            let tol = target_length * 1e-4;
            let x_star = simplex_minimize_2d(x0, f, tol);
            mesh.modify_node(n, x_star).expect("relax_node moves without changing topology");
            f(x_star)
        }
        Fixed::Slide => {
            let Some((curve_id, f0)) = mesh.node_oring(n) else { return node_cost(mesh, n, target_length) };
            let curve = &curves[curve_id];
            let ring = ring_of(mesh, n);
            if ring.is_empty() {
                return 0.0;
            }
            let f = |param: f64| cost(curve.eval(param), &ring, target_length);
            let tol = target_length * 1e-4;
            let f_star = simplex_minimize_1d(f0, f, tol);
            let x_star = curve.eval(f_star);
            mesh.modify_node(n, x_star).expect("relax_node moves without changing topology");
            mesh.set_node_oring(n, curve_id, f_star);
            f(f_star)
        }
    }
}

fn node_cost(mesh: &Mesh, n: NodeId, target_length: f64) -> f64 {
    let ring = ring_of(mesh, n);
    if ring.is_empty() {
        return 0.0;
    }
    cost(mesh.node_x(n), &ring, target_length)
}

/// Consecutive CCW neighbor pairs around `n` forming its incident-triangle
/// ring, in the shape the cost function expects.
fn ring_of(mesh: &Mesh, n: NodeId) -> Vec<(Point2<f64>, Point2<f64>)> {
    mesh.node_to_cells(n)
        .into_iter()
        .map(|c| {
            let verts = mesh.cell_to_nodes(c);
            let i = verts.iter().position(|&v| v == n).expect("cell at n must contain n");
            (mesh.node_x(verts[(i + 1) % 3]), mesh.node_x(verts[(i + 2) % 3]))
        })
        .collect()
}

/// Degenerate (zero-area) 1D simplex search: golden-section-ish bracket
/// shrink, adequate for the smooth, unimodal-near-optimum cost landscape.
fn simplex_minimize_1d(x0: f64, f: impl Fn(f64) -> f64, tol: f64) -> f64 {
    let mut a = x0 - 1.0;
    let mut b = x0 + 1.0;
    let gr = (5.0_f64.sqrt() - 1.0) / 2.0;
    let mut c = b - gr * (b - a);
    let mut d = a + gr * (b - a);
    for _ in 0..60 {
        if (b - a).abs() < tol {
            break;
        }
        if f(c) < f(d) {
            b = d;
        } else {
            a = c;
        }
        c = b - gr * (b - a);
        d = a + gr * (b - a);
    }
    let mid = (a + b) / 2.0;
    if f(mid) < f(x0) {
        mid
    } else {
        x0
    }
}

/// Nelder-Mead simplex search in the plane.
fn simplex_minimize_2d(x0: Point2<f64>, f: impl Fn(Point2<f64>) -> f64, tol: f64) -> Point2<f64> {
    let step = tol.max(1e-6) * 10.0;
    let mut verts = [
        x0,
        x0 + Vector2::new(step, 0.0),
        x0 + Vector2::new(0.0, step),
    ];
    let mut vals: Vec<f64> = verts.iter().map(|&p| f(p)).collect();

    for _ in 0..80 {
        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| vals[a].partial_cmp(&vals[b]).unwrap());
        let (best, mid, worst) = (order[0], order[1], order[2]);
        if (vals[worst] - vals[best]).abs() < tol {
            break;
        }
        let centroid = Point2::from((verts[best].coords + verts[mid].coords) / 2.0);
        let reflected = Point2::from(centroid.coords + (centroid.coords - verts[worst].coords));
        let f_reflected = f(reflected);
        if f_reflected < vals[best] {
            let expanded = Point2::from(centroid.coords + 2.0 * (centroid.coords - verts[worst].coords));
            let f_expanded = f(expanded);
            if f_expanded < f_reflected {
                verts[worst] = expanded;
                vals[worst] = f_expanded;
            } else {
                verts[worst] = reflected;
                vals[worst] = f_reflected;
            }
        } else if f_reflected < vals[mid] {
            verts[worst] = reflected;
            vals[worst] = f_reflected;
        } else {
            let contracted = Point2::from(centroid.coords + 0.5 * (verts[worst].coords - centroid.coords));
            let f_contracted = f(contracted);
            if f_contracted < vals[worst] {
                verts[worst] = contracted;
                vals[worst] = f_contracted;
            } else {
                for i in 0..3 {
                    if i != best {
                        verts[i] = Point2::from(verts[best].coords + 0.5 * (verts[i].coords - verts[best].coords));
                        vals[i] = f(verts[i]);
                    }
                }
            }
        }
    }

    let best = (0..3).min_by(|&a, &b| vals[a].partial_cmp(&vals[b]).unwrap()).unwrap();
    if vals[best] < f(x0) {
        verts[best]
    } else {
        x0
    }
}
