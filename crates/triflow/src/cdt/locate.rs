//! Point location.

use nalgebra::Point2;

use crate::mesh::{CellId, EdgeId, HalfEdge, Mesh, NodeId};
use crate::predicates::{orientation, Orientation};

/// Where a target point `t` falls relative to the current triangulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// Insertion would raise the triangulation's affine dimension.
    OutsideAffineHull { dim: i32 },
    /// Inside the affine hull but outside the convex hull.
    OutsideConvexHull(HullExit),
    /// `t` coincides with an existing node.
    InVertex(NodeId),
    /// `t` lies in the interior of an edge.
    InEdge(EdgeId),
    /// `t` is strictly interior to a cell.
    InFace(CellId),
}

/// The exit point of a walk that fell off the convex hull.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HullExit {
    /// `dim == 1`: the nearer of the chain's two endpoints.
    Node(NodeId),
    /// `dim == 2`: a boundary halfedge with `t` strictly to its exterior.
    Halfedge(HalfEdge),
}

/// Locates `t`, optionally starting the 2D walk at `hint`.
pub fn locate(mesh: &Mesh, t: Point2<f64>, hint: Option<CellId>) -> Location {
    match mesh.dim() {
        -1 => Location::OutsideAffineHull { dim: -1 },
        0 => locate_dim0(mesh, t),
        1 => locate_dim1(mesh, t),
        _ => locate_dim2(mesh, t, hint),
    }
}

fn coincident(a: Point2<f64>, b: Point2<f64>, eps: f64) -> bool {
    (a - b).norm_squared() <= eps * eps
}

fn locate_dim0(mesh: &Mesh, t: Point2<f64>) -> Location {
    let n0 = mesh.live_node_ids().next().expect("dim==0 implies one live node");
    if coincident(mesh.node_x(n0), t, crate::tol::GeomTol::default().coincident_eps) {
        Location::InVertex(n0)
    } else {
        Location::OutsideAffineHull { dim: 0 }
    }
}

/// With `dim==1` the node set is a simple collinear chain (each insertion
/// rule that can raise to this state only ever appends an end node or
/// splits an edge). We project every live node onto the chain's direction
/// vector and classify `t` against that ordering, which gets the same
/// result as walking edge-by-edge in the required direction but avoids the
/// traversal bookkeeping for a structure that is, by construction, a path.
fn locate_dim1(mesh: &Mesh, t: Point2<f64>) -> Location {
    let e0 = mesh.live_edge_ids().next().expect("dim==1 implies an edge exists");
    let [n0, n1] = mesh.edge_to_nodes(e0);
    let (p0, p1) = (mesh.node_x(n0), mesh.node_x(n1));
    if orientation(p0, p1, t) != Orientation::Collinear {
        return Location::OutsideAffineHull { dim: 1 };
    }
    let dir = p1 - p0;
    let coord = |x: Point2<f64>| (x - p0).dot(&dir);
    let t_c = coord(t);

    let mut ordered: Vec<NodeId> = mesh.live_node_ids().collect();
    ordered.sort_by(|&a, &b| coord(mesh.node_x(a)).partial_cmp(&coord(mesh.node_x(b))).unwrap());

    let eps = crate::tol::GeomTol::default().coincident_eps;
    for w in ordered.windows(2) {
        let (a, b) = (w[0], w[1]);
        let (ca, cb) = (coord(mesh.node_x(a)), coord(mesh.node_x(b)));
        if (t_c - ca).abs() <= eps {
            return Location::InVertex(a);
        }
        if (t_c - cb).abs() <= eps {
            return Location::InVertex(b);
        }
        if ca < t_c && t_c < cb {
            let edge = mesh.nodes_to_edge(a, b).expect("consecutive chain nodes must share an edge").edge;
            return Location::InEdge(edge);
        }
    }
    let first = *ordered.first().unwrap();
    let last = *ordered.last().unwrap();
    if t_c <= coord(mesh.node_x(first)) {
        Location::OutsideConvexHull(HullExit::Node(first))
    } else {
        Location::OutsideConvexHull(HullExit::Node(last))
    }
}

fn locate_dim2(mesh: &Mesh, t: Point2<f64>, hint: Option<CellId>) -> Location {
    let mut cell = hint
        .filter(|&c| mesh.cell_exists(c))
        .unwrap_or_else(|| mesh.live_cell_ids().next().expect("dim==2 implies a cell exists"));

    loop {
        let nodes = mesh.cell_to_nodes(cell);
        let pts = [mesh.node_x(nodes[0]), mesh.node_x(nodes[1]), mesh.node_x(nodes[2])];
        let mut os = [0i32; 3];
        for i in 0..3 {
            os[i] = orientation(pts[i], pts[(i + 1) % 3], t).sign();
        }

        if let Some(i) = (0..3).find(|&i| os[i] == -1) {
            let he = mesh.halfedge_aligned_with_cell(cell, i);
            debug_assert_eq!(he.cell(mesh), cell);
            let neighbor = he.cell_opp(mesh);
            if !neighbor.is_finite() {
                return Location::OutsideConvexHull(HullExit::Halfedge(he.opposite()));
            }
            cell = neighbor;
            continue;
        }

        let zeros = os.iter().filter(|&&o| o == 0).count();
        return match zeros {
            0 => Location::InFace(cell),
            1 => {
                let i = os.iter().position(|&o| o == 0).unwrap();
                Location::InEdge(mesh.cell_to_edges(cell)[i])
            }
            2 => {
                let shared = if os[0] == 0 && os[1] == 0 {
                    nodes[1]
                } else if os[1] == 0 && os[2] == 0 {
                    nodes[2]
                } else {
                    nodes[0]
                };
                Location::InVertex(shared)
            }
            _ => unreachable!("3 zeros implies a degenerate (zero-area) cell"),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    #[test]
    fn locate_in_face_and_in_edge_and_in_vertex() {
        let mut m = Mesh::new();
        let a = m.add_node(p(0.0, 0.0)).unwrap();
        let b = m.add_node(p(1.0, 0.0)).unwrap();
        let c = m.add_node(p(0.0, 1.0)).unwrap();
        let cell = m.add_cell(a, b, c).unwrap();

        match locate(&m, p(0.2, 0.2), Some(cell)) {
            Location::InFace(found) => assert_eq!(found, cell),
            other => panic!("expected InFace, got {other:?}"),
        }
        match locate(&m, p(0.5, 0.0), Some(cell)) {
            Location::InEdge(_) => {}
            other => panic!("expected InEdge, got {other:?}"),
        }
        match locate(&m, p(0.0, 0.0), Some(cell)) {
            Location::InVertex(found) => assert_eq!(found, a),
            other => panic!("expected InVertex, got {other:?}"),
        }
        match locate(&m, p(5.0, 5.0), Some(cell)) {
            Location::OutsideConvexHull(_) => {}
            other => panic!("expected OutsideConvexHull, got {other:?}"),
        }
    }

    #[test]
    fn locate_walks_across_cells() {
        let mut m = Mesh::new();
        let a = m.add_node(p(0.0, 0.0)).unwrap();
        let b = m.add_node(p(1.0, 0.0)).unwrap();
        let c = m.add_node(p(1.0, 1.0)).unwrap();
        let d = m.add_node(p(0.0, 1.0)).unwrap();
        let cell1 = m.add_cell(a, b, c).unwrap();
        let cell2 = m.add_cell(a, c, d).unwrap();
        match locate(&m, p(0.9, 0.8), Some(cell1)) {
            Location::InFace(found) => assert_eq!(found, cell2),
            other => panic!("expected InFace(cell2), got {other:?}"),
        }
    }
}
