//! Node deletion.

use crate::mesh::{CellId, Mesh, NodeId};
use crate::predicates::orientation;

use super::error::CdtError;
use super::fill_hole::{fill_hole, HoleEntry};

pub(crate) fn delete_node(mesh: &mut Mesh, n: NodeId) -> Result<(), CdtError> {
    match mesh.dim() {
        0 => delete_dim0(mesh, n),
        1 => delete_dim1(mesh, n),
        2 => delete_dim2(mesh, n),
        d => unreachable!("delete_node called on an empty mesh (dim={d})"),
    }
}

fn delete_dim0(mesh: &mut Mesh, n: NodeId) -> Result<(), CdtError> {
    mesh.delete_node(n)?;
    Ok(())
}

fn delete_dim1(mesh: &mut Mesh, n: NodeId) -> Result<(), CdtError> {
    let neighbors = mesh.node_to_nodes(n);
    match neighbors.len() {
        1 => {
            let e = mesh.node_to_edges(n)[0];
            mesh.delete_edge(e)?;
            mesh.delete_node(n)?;
        }
        2 => {
            for e in mesh.node_to_edges(n) {
                mesh.delete_edge(e)?;
            }
            mesh.delete_node(n)?;
            mesh.add_edge(neighbors[0], neighbors[1])?;
        }
        other => unreachable!("dim==1 implies node degree 1 or 2, got {other}"),
    }
    Ok(())
}

/// True when deleting `n` leaves the remaining nodes collinear and every
/// finite cell touches `n`.
fn is_demotable(mesh: &Mesh, n: NodeId) -> bool {
    let others: Vec<NodeId> = mesh.live_node_ids().filter(|&x| x != n).collect();
    if others.len() < 2 {
        return true;
    }
    let (p0, p1) = (mesh.node_x(others[0]), mesh.node_x(others[1]));
    let collinear = others.iter().all(|&o| orientation(p0, p1, mesh.node_x(o)).sign() == 0);
    collinear && mesh.live_cell_ids().all(|c| mesh.cell_to_nodes(c).contains(&n))
}

fn demote_to_1d(mesh: &mut Mesh, n: NodeId) -> Result<(), CdtError> {
    for c in mesh.live_cell_ids().collect::<Vec<_>>() {
        mesh.delete_cell(c);
    }
    for e in mesh.node_to_edges(n) {
        mesh.delete_edge(e)?;
    }
    mesh.delete_node(n)?;
    Ok(())
}

fn sorted_neighbors_ccw(mesh: &Mesh, n: NodeId) -> Vec<NodeId> {
    let p = mesh.node_x(n);
    let mut neighbors = mesh.node_to_nodes(n);
    neighbors.sort_by(|&a, &b| {
        let pa = mesh.node_x(a) - p;
        let pb = mesh.node_x(b) - p;
        pa.y.atan2(pa.x).partial_cmp(&pb.y.atan2(pb.x)).unwrap()
    });
    neighbors
}

fn delete_dim2(mesh: &mut Mesh, n: NodeId) -> Result<(), CdtError> {
    if is_demotable(mesh, n) {
        return demote_to_1d(mesh, n);
    }

    let neighbors = sorted_neighbors_ccw(mesh, n);
    let cells_at_n: Vec<CellId> = mesh.node_to_cells(n);
    let k = neighbors.len();
    let mut hole = Vec::with_capacity(k + 1);
    for i in 0..k {
        let u = neighbors[i];
        let v = neighbors[(i + 1) % k];
        hole.push(HoleEntry::Node(u));
        let spanned = cells_at_n.iter().any(|&c| {
            let verts = mesh.cell_to_nodes(c);
            verts.contains(&u) && verts.contains(&v)
        });
        if !spanned {
            hole.push(HoleEntry::Inf);
        }
    }

    for c in cells_at_n {
        mesh.delete_cell(c);
    }
    for e in mesh.node_to_edges(n) {
        mesh.delete_edge(e)?;
    }
    mesh.delete_node(n)?;

    fill_hole(mesh, hole);
    Ok(())
}
