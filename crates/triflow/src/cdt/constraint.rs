//! Constraint insertion and removal.

use std::collections::HashSet;

use crate::mesh::{CellId, EdgeId, Mesh, NodeId};
use crate::predicates::orientation;

use super::error::CdtError;
use super::fill_hole::{fill_hole, HoleEntry};
use super::flip::propagating_flip_from;

/// Inserts a constrained edge `(n_a, n_b)`, carving the triangulation along
/// the straight segment between them if it doesn't already exist.
///
/// Walks through the triangulation cell by cell (an "intersection-history"
/// walk): deletions only happen once the walk has fully succeeded, so a
/// failure midway leaves the mesh untouched.
pub(crate) fn add_constraint(mesh: &mut Mesh, n_a: NodeId, n_b: NodeId) -> Result<(), CdtError> {
    if let Some(he) = mesh.nodes_to_edge(n_a, n_b) {
        mesh.set_edge_constrained(he.edge, true);
        return Ok(());
    }

    let pa = mesh.node_x(n_a);
    let pb = mesh.node_x(n_b);
    let dir = pb - pa;

    // Find the wedge at n_a whose interior contains the ray toward n_b.
    let mut entry: Option<(NodeId, NodeId, CellId)> = None;
    for c in mesh.node_to_cells(n_a) {
        let nodes = mesh.cell_to_nodes(c);
        let i = nodes.iter().position(|&x| x == n_a).expect("cell at n_a must contain n_a");
        let p = nodes[(i + 1) % 3];
        let q = nodes[(i + 2) % 3];
        let op = orientation(pa, pb, mesh.node_x(p)).sign();
        let oq = orientation(pa, pb, mesh.node_x(q)).sign();
        if op == 0 && (mesh.node_x(p) - pa).dot(&dir) > 0.0 {
            return Err(CdtError::ConstraintCollinearNode { n_a, n_b, collinear: p });
        }
        if oq == 0 && (mesh.node_x(q) - pa).dot(&dir) > 0.0 {
            return Err(CdtError::ConstraintCollinearNode { n_a, n_b, collinear: q });
        }
        if op >= 0 && oq <= 0 {
            entry = Some((p, q, c));
            break;
        }
    }
    let (mut p, mut q, mut cell) = entry.expect("some cell at n_a must contain the ray toward n_b");

    let mut visited_cells = Vec::new();
    let mut visited_edges = Vec::new();
    let mut left_nodes = Vec::new();
    let mut right_nodes = Vec::new();
    let mut seen: HashSet<NodeId> = HashSet::new();
    seen.insert(p);
    seen.insert(q);
    right_nodes.push(p);
    left_nodes.push(q);

    loop {
        visited_cells.push(cell);
        let nodes = mesh.cell_to_nodes(cell);
        let r = nodes.into_iter().find(|&x| x != p && x != q).expect("a triangle has a third vertex");

        if r == n_b {
            break;
        }
        let sign_r = orientation(pa, pb, mesh.node_x(r)).sign();
        if sign_r == 0 {
            return Err(CdtError::ConstraintCollinearNode { n_a, n_b, collinear: r });
        }
        if seen.insert(r) {
            if sign_r > 0 {
                left_nodes.push(r);
            } else {
                right_nodes.push(r);
            }
        }

        let sign_p = orientation(pa, pb, mesh.node_x(p)).sign();
        let (exit_u, exit_v) = if sign_r == sign_p { (q, r) } else { (p, r) };
        let exit_he = mesh.nodes_to_edge(exit_u, exit_v).expect("cell edge must connect its own vertices");
        let exit_edge = exit_he.edge;
        if mesh.edge_constrained(exit_edge) {
            return Err(CdtError::IntersectingConstraints { n_a, n_b, crossed: exit_edge });
        }
        visited_edges.push(exit_edge);

        let sides = mesh.edge_to_cells(exit_edge);
        let next_cell = if sides[0] == cell { sides[1] } else { sides[0] };
        debug_assert!(next_cell.is_finite(), "a constrained segment between live nodes stays inside the hull");

        let sign_u = orientation(pa, pb, mesh.node_x(exit_u)).sign();
        (p, q) = if sign_u < 0 { (exit_u, exit_v) } else { (exit_v, exit_u) };
        cell = next_cell;
    }

    for c in &visited_cells {
        mesh.delete_cell(*c);
    }
    let visited_edges: Vec<EdgeId> = visited_edges;
    for e in &visited_edges {
        mesh.delete_edge(*e)?;
    }
    let new_edge = mesh.add_edge(n_a, n_b)?;
    mesh.set_edge_constrained(new_edge, true);

    let mut left_loop = vec![HoleEntry::Node(n_a)];
    left_loop.extend(left_nodes.iter().map(|&n| HoleEntry::Node(n)));
    left_loop.push(HoleEntry::Node(n_b));
    fill_hole(mesh, left_loop);

    let mut right_loop = vec![HoleEntry::Node(n_b)];
    right_loop.extend(right_nodes.iter().rev().map(|&n| HoleEntry::Node(n)));
    right_loop.push(HoleEntry::Node(n_a));
    fill_hole(mesh, right_loop);

    Ok(())
}

/// Clears the constraint flag and re-legalizes locally: unlike
/// `add_constraint`'s global carve, this only restores the Delaunay property
/// in the immediate neighborhood of the freed edge.
pub(crate) fn remove_constraint(mesh: &mut Mesh, n_a: NodeId, n_b: NodeId) -> Result<(), CdtError> {
    let he = mesh.nodes_to_edge(n_a, n_b).ok_or_else(|| CdtError::GridException {
        detail: format!("no edge between {n_a:?} and {n_b:?} to unconstrain"),
    })?;
    mesh.set_edge_constrained(he.edge, false);
    propagating_flip_from(mesh, he.edge);
    Ok(())
}
