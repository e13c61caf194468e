//! Insertion dispatch.

use nalgebra::Point2;

use crate::mesh::{CellId, EdgeId, HalfEdge, Mesh, NodeId};
use crate::predicates::{orientation, Orientation};

use super::error::CdtError;
use super::flip::restore_delaunay;
use super::locate::{locate, HullExit, Location};

/// Adds a node at `x` and wires it into the triangulation per its
/// [`Location`]. `hint` seeds the 2D point-location walk.
pub(crate) fn tri_insert(mesh: &mut Mesh, x: Point2<f64>, hint: Option<CellId>) -> Result<NodeId, CdtError> {
    let loc = locate_for_insert(mesh, x, hint)?;
    let n = mesh.add_node(x)?;
    wire_new_node(mesh, n, loc)?;
    Ok(n)
}

/// Like [`tri_insert`], but reuses a specific (currently free) node id
/// instead of allocating a fresh one. Used by `Cdt::modify_node`'s
/// delete/reinsert-at-same-id protocol.
pub(crate) fn tri_insert_at(mesh: &mut Mesh, n: NodeId, x: Point2<f64>, hint: Option<CellId>) -> Result<(), CdtError> {
    let loc = locate_for_insert(mesh, x, hint)?;
    mesh.add_node_at(n, x)?;
    wire_new_node(mesh, n, loc)
}

fn locate_for_insert(mesh: &Mesh, x: Point2<f64>, hint: Option<CellId>) -> Result<Location, CdtError> {
    let loc = locate(mesh, x, hint);
    if let Location::InVertex(existing) = loc {
        return Err(CdtError::DuplicateNode { at: existing });
    }
    Ok(loc)
}

fn wire_new_node(mesh: &mut Mesh, n: NodeId, loc: Location) -> Result<(), CdtError> {
    match loc {
        Location::InFace(cell) => insert_in_face(mesh, n, cell)?,
        Location::InEdge(edge) => insert_in_edge(mesh, n, edge)?,
        Location::OutsideConvexHull(HullExit::Node(end)) => {
            mesh.add_edge(n, end)?;
        }
        Location::OutsideConvexHull(HullExit::Halfedge(h0)) => insert_outside_hull_2d(mesh, n, h0)?,
        Location::OutsideAffineHull { dim } => insert_promote(mesh, n, dim)?,
        Location::InVertex(_) => unreachable!("locate_for_insert already rejected InVertex"),
    }
    if mesh.dim() == 2 {
        restore_delaunay(mesh, n);
    }
    Ok(())
}

fn insert_in_face(mesh: &mut Mesh, n: NodeId, cell: CellId) -> Result<(), CdtError> {
    let verts = mesh.cell_to_nodes(cell);
    mesh.delete_cell(cell);
    for v in verts {
        mesh.add_edge(n, v)?;
    }
    for i in 0..3 {
        mesh.add_cell(n, verts[i], verts[(i + 1) % 3])?;
    }
    Ok(())
}

fn insert_in_edge(mesh: &mut Mesh, n: NodeId, edge: EdgeId) -> Result<(), CdtError> {
    let [e0, e1] = mesh.edge_to_nodes(edge);
    let was_constrained = mesh.edge_constrained(edge);
    let mut opposites = Vec::new();
    for c in mesh.edge_to_cells(edge) {
        if c.is_finite() {
            let verts = mesh.cell_to_nodes(c);
            let opp = verts.into_iter().find(|&v| v != e0 && v != e1).expect("a triangle has a third vertex");
            opposites.push(opp);
        }
    }
    for c in mesh.edge_to_cells(edge) {
        if c.is_finite() {
            mesh.delete_cell(c);
        }
    }
    mesh.delete_edge(edge)?;
    let ea = mesh.add_edge(e0, n)?;
    let eb = mesh.add_edge(n, e1)?;
    if was_constrained {
        mesh.set_edge_constrained(ea, true);
        mesh.set_edge_constrained(eb, true);
    }
    for &opp in &opposites {
        mesh.add_edge(n, opp)?;
    }
    for &opp in &opposites {
        mesh.add_cell(n, e0, opp)?;
        mesh.add_cell(n, opp, e1)?;
    }
    Ok(())
}

/// Next boundary halfedge continuing the CCW hull walk from `h`'s tip.
fn hull_next(mesh: &Mesh, h: HalfEdge) -> HalfEdge {
    let v = h.node_fwd(mesh);
    for e in mesh.node_to_edges(v) {
        for cand in [HalfEdge::forward(e), HalfEdge::backward(e)] {
            if cand.node_rev(mesh) == v && !cand.cell(mesh).is_finite() && cand.cell_opp(mesh).is_finite() {
                return cand;
            }
        }
    }
    unreachable!("every convex-hull vertex has exactly two boundary edges")
}

/// Previous boundary halfedge continuing the CCW hull walk backward from
/// `h`'s tail.
fn hull_prev(mesh: &Mesh, h: HalfEdge) -> HalfEdge {
    let v = h.node_rev(mesh);
    for e in mesh.node_to_edges(v) {
        for cand in [HalfEdge::forward(e), HalfEdge::backward(e)] {
            if cand.node_fwd(mesh) == v && !cand.cell(mesh).is_finite() && cand.cell_opp(mesh).is_finite() {
                return cand;
            }
        }
    }
    unreachable!("every convex-hull vertex has exactly two boundary edges")
}

fn insert_outside_hull_2d(mesh: &mut Mesh, n: NodeId, h0: HalfEdge) -> Result<(), CdtError> {
    let t = mesh.node_x(n);
    let mut collected = vec![h0];

    let mut cur = h0;
    loop {
        let next = hull_next(mesh, cur);
        let (rv, fv) = (mesh.node_x(next.node_rev(mesh)), mesh.node_x(next.node_fwd(mesh)));
        if orientation(rv, fv, t) == Orientation::Left {
            collected.push(next);
            cur = next;
        } else {
            break;
        }
    }
    let mut cur = h0;
    loop {
        let prev = hull_prev(mesh, cur);
        let (rv, fv) = (mesh.node_x(prev.node_rev(mesh)), mesh.node_x(prev.node_fwd(mesh)));
        if orientation(rv, fv, t) == Orientation::Left {
            collected.insert(0, prev);
            cur = prev;
        } else {
            break;
        }
    }

    for h in &collected {
        let (rv, fv) = (h.node_rev(mesh), h.node_fwd(mesh));
        if mesh.nodes_to_edge(n, rv).is_none() {
            mesh.add_edge(n, rv)?;
        }
        if mesh.nodes_to_edge(n, fv).is_none() {
            mesh.add_edge(n, fv)?;
        }
        mesh.add_cell(n, rv, fv)?;
    }
    Ok(())
}

fn insert_promote(mesh: &mut Mesh, n: NodeId, dim: i32) -> Result<(), CdtError> {
    match dim {
        -1 => {}
        0 => {
            let other = mesh.live_node_ids().find(|&x| x != n).expect("dim==0 implies exactly one other node");
            mesh.add_edge(n, other)?;
        }
        1 => {
            let others: Vec<NodeId> = mesh.live_node_ids().filter(|&x| x != n).collect();
            for o in others {
                mesh.add_edge(n, o)?;
            }
            let chain_edges: Vec<EdgeId> =
                mesh.live_edge_ids().filter(|&e| !mesh.edge_to_nodes(e).contains(&n)).collect();
            for e in chain_edges {
                let [a, b] = mesh.edge_to_nodes(e);
                mesh.add_cell(n, a, b)?;
            }
        }
        _ => unreachable!("OutsideAffineHull dim must be -1, 0, or 1"),
    }
    Ok(())
}
