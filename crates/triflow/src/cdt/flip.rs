//! Edge flip and Lawson-style legalization.

use crate::mesh::{CellId, EdgeId, Mesh, NodeId};
use crate::predicates::{incircle, InCircle};

fn apex(mesh: &Mesh, cell: CellId, a: NodeId, c: NodeId) -> NodeId {
    mesh.cell_to_nodes(cell)
        .into_iter()
        .find(|&n| n != a && n != c)
        .expect("every cell has exactly one vertex outside a given edge")
}

fn opposite_edge(mesh: &Mesh, cell: CellId, n: NodeId) -> Option<EdgeId> {
    let nodes = mesh.cell_to_nodes(cell);
    let i = nodes.iter().position(|&x| x == n)?;
    Some(mesh.cell_to_edges(cell)[(i + 1) % 3])
}

/// Flips `j`, replacing its two incident cells with the two cells formed by
/// the opposite diagonal. Caller must ensure `j` is unconstrained and has
/// finite cells on both sides.
pub(crate) fn flip_edge(mesh: &mut Mesh, j: EdgeId) {
    debug_assert!(!mesh.edge_constrained(j), "cannot flip a constrained edge");
    let [a, c] = mesh.edge_to_nodes(j);
    let cells = mesh.edge_to_cells(j);
    debug_assert!(cells[0].is_finite() && cells[1].is_finite(), "flip requires two finite cells");
    let d = apex(mesh, cells[0], a, c);
    let b = apex(mesh, cells[1], a, c);

    // Cells must be deleted before the edge is retargeted: halfedge
    // navigation near `j` depends on live cell topology.
    mesh.delete_cell(cells[0]);
    mesh.delete_cell(cells[1]);
    mesh.modify_edge_nodes(j, b, d).expect("retargeting an unconstrained edge cannot be vetoed");
    mesh.add_cell(a, b, d).expect("add_cell cannot fail once nodes exist");
    mesh.add_cell(c, d, b).expect("add_cell cannot fail once nodes exist");
}

/// Restores the local Delaunay property around a just-inserted node `n`
/// using a non-recursive stack of candidate edges.
///
/// Visitation order is not required to match any particular walk direction:
/// Lawson flipping terminates and produces a locally Delaunay triangulation
/// regardless of the order candidate edges are processed in, as long as
/// every edge newly made "opposite `n`" by a flip is re-examined.
pub(crate) fn restore_delaunay(mesh: &mut Mesh, n: NodeId) {
    let mut stack: Vec<EdgeId> =
        mesh.node_to_cells(n).into_iter().filter_map(|c| opposite_edge(mesh, c, n)).collect();

    while let Some(e) = stack.pop() {
        if !mesh.edge_exists(e) || mesh.edge_constrained(e) {
            continue;
        }
        let cells = mesh.edge_to_cells(e);
        if !cells[0].is_finite() || !cells[1].is_finite() {
            continue;
        }
        let [p, r] = mesh.edge_to_nodes(e);
        let apex0 = apex(mesh, cells[0], p, r);
        let apex1 = apex(mesh, cells[1], p, r);
        let (tri_cell, q) = if apex0 == n {
            (cells[0], apex1)
        } else if apex1 == n {
            (cells[1], apex0)
        } else {
            // Stale stack entry: `n` no longer borders this edge.
            continue;
        };

        let tri = mesh.cell_to_nodes(tri_cell);
        let (pa, pb, pc) = (mesh.node_x(tri[0]), mesh.node_x(tri[1]), mesh.node_x(tri[2]));
        if incircle(pa, pb, pc, mesh.node_x(q)) == InCircle::Inside {
            tracing::debug!(edge = ?e, node = ?n, "flipping to restore local Delaunay property");
            flip_edge(mesh, e);
            for nc in mesh.node_to_cells(n) {
                if mesh.cell_to_nodes(nc).contains(&q) {
                    if let Some(oe) = opposite_edge(mesh, nc, n) {
                        stack.push(oe);
                    }
                }
            }
        }
    }
}

/// Used by `remove_constraint`: legalize starting from one
/// specific cell's apex rather than a whole node fan.
pub(crate) fn propagating_flip_from(mesh: &mut Mesh, edge: EdgeId) {
    let cells = mesh.edge_to_cells(edge);
    if !cells[0].is_finite() || !cells[1].is_finite() || mesh.edge_constrained(edge) {
        return;
    }
    let [a, c] = mesh.edge_to_nodes(edge);
    let apex_left = apex(mesh, cells[0], a, c);
    restore_delaunay(mesh, apex_left);
}
