//! Front-extension site selection.

use crate::cost::internal_angle;
use crate::mesh::{EdgeId, Mesh, NodeId};
use crate::sentinel::UNMESHED;

/// An ordered triple of boundary nodes describing where the front may
/// extend: `(a,b)` and `(b,c)` are both existing edges whose unmeshed side
/// faces the interior still to be triangulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriangleSite {
    pub a: NodeId,
    pub b: NodeId,
    pub c: NodeId,
}

impl TriangleSite {
    /// Internal angle of the site at its pivot vertex `b`.
    pub fn internal_angle(&self, mesh: &Mesh) -> f64 {
        internal_angle(mesh.node_x(self.a), mesh.node_x(self.b), mesh.node_x(self.c))
    }
}

/// Edges whose unmeshed side is still `UNMESHED` (have not yet been given a
/// real cell on the interior side).
pub(crate) fn front_edges(mesh: &Mesh) -> Vec<EdgeId> {
    mesh.live_edge_ids().filter(|&e| mesh.edge_to_cells(e).contains(&UNMESHED)).collect()
}

/// Directed front edge: `(from, to)` such that the unmeshed region is to
/// the left of `from -> to`.
pub(crate) fn front_direction(mesh: &Mesh, e: EdgeId) -> (NodeId, NodeId) {
    let nodes = mesh.edge_to_nodes(e);
    let cells = mesh.edge_to_cells(e);
    if cells[0] == UNMESHED {
        (nodes[0], nodes[1])
    } else {
        (nodes[1], nodes[0])
    }
}

/// Builds a site at every vertex shared by two consecutive front edges and
/// returns the one with the smallest internal angle.
pub(crate) fn choose_site(mesh: &Mesh) -> Option<TriangleSite> {
    let edges = front_edges(mesh);
    let directed: Vec<(NodeId, NodeId)> = edges.iter().map(|&e| front_direction(mesh, e)).collect();

    let mut best: Option<(f64, TriangleSite)> = None;
    for &(a, b) in &directed {
        for &(b2, c) in &directed {
            if b2 != b || a == c {
                continue;
            }
            let site = TriangleSite { a, b, c };
            let angle = site.internal_angle(mesh);
            if best.as_ref().map(|(best_angle, _)| angle < *best_angle).unwrap_or(true) {
                best = Some((angle, site));
            }
        }
    }
    best.map(|(_, s)| s)
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;

    use super::*;

    #[test]
    fn choose_site_picks_sharpest_front_corner() {
        let mut mesh = Mesh::new();
        let a = mesh.add_node(Point2::new(0.0, 0.0)).unwrap();
        let b = mesh.add_node(Point2::new(1.0, 0.0)).unwrap();
        let c = mesh.add_node(Point2::new(1.0, 1.0)).unwrap();
        let d = mesh.add_node(Point2::new(0.0, 1.0)).unwrap();
        for (from, to) in [(a, b), (b, c), (c, d), (d, a)] {
            let he = mesh.add_edge(from, to).unwrap();
            mesh.set_edge_cell(he, 0, UNMESHED);
        }
        let site = choose_site(&mesh).unwrap();
        assert!([a, b, c, d].contains(&site.b));
        assert!((site.internal_angle(&mesh) - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }
}
