//! Join strategy: collapses the site's two outer nodes into one, closing
//! the front there instead of adding area.

use crate::cdt::CdtError;
use crate::mesh::{CellId, EdgeId, Fixed, Mesh, NodeId};
use crate::tol::AdvancingFrontCfg;

use super::super::site::TriangleSite;
use super::Edits;

/// Never assigned to a real cell or edge; exists only to record that this
/// crate's `JOIN_PENDING` analog is `-5`, not `-2`, because `-2` is already
/// `INF_CELL` here.
#[allow(dead_code)]
const JOIN_PENDING: CellId = CellId(-5);

const SCALE_FACTOR: f64 = 1.0;

fn movable(mesh: &Mesh, n: NodeId) -> bool {
    matches!(mesh.node_fixed(n), Fixed::Free | Fixed::Slide)
}

pub(crate) fn metric(mesh: &Mesh, site: &TriangleSite, cfg: &AdvancingFrontCfg) -> f64 {
    let theta = site.internal_angle(mesh);
    if theta > cfg.max_strategy_angle || (!movable(mesh, site.a) && !movable(mesh, site.c)) {
        return f64::INFINITY;
    }
    SCALE_FACTOR * theta
}

pub(crate) fn execute(mesh: &mut Mesh, site: &TriangleSite) -> Result<Edits, CdtError> {
    debug_assert_ne!(JOIN_PENDING, crate::sentinel::INF_CELL);

    let (moved, anchor) = if movable(mesh, site.a) {
        (site.a, site.c)
    } else if movable(mesh, site.c) {
        (site.c, site.a)
    } else {
        return Err(CdtError::StrategyFailed { reason: "neither endpoint of the join site is movable".into() });
    };

    let edge_ab = mesh.nodes_to_edge(site.a, site.b).expect("site edge (a,b) must exist").edge;
    let edge_bc = mesh.nodes_to_edge(site.b, site.c).expect("site edge (b,c) must exist").edge;
    let doomed_front_edge = if moved == site.a { edge_ab } else { edge_bc };

    let cells: Vec<CellId> = mesh.node_to_cells(moved);
    let mut rebuilt_cells = Vec::new();
    for &c in &cells {
        let verts = mesh.cell_to_nodes(c);
        if verts.contains(&anchor) {
            continue;
        }
        let subbed: Vec<NodeId> = verts.iter().map(|&v| if v == moved { anchor } else { v }).collect();
        rebuilt_cells.push((subbed[0], subbed[1], subbed[2]));
    }

    for &c in &cells {
        mesh.delete_cell(c);
    }
    let other_edges: Vec<EdgeId> =
        mesh.node_to_edges(moved).into_iter().filter(|&e| e != doomed_front_edge).collect();
    mesh.delete_edge(doomed_front_edge)?;
    for e in other_edges {
        if mesh.edge_exists(e) {
            mesh.delete_edge(e)?;
        }
    }
    mesh.delete_node(moved)?;

    for (x, y, z) in rebuilt_cells {
        for (p, q) in [(x, y), (y, z), (z, x)] {
            if mesh.nodes_to_edge(p, q).is_none() {
                mesh.add_edge(p, q)?;
            }
        }
        mesh.add_cell(x, y, z)?;
    }

    Ok(Edits { nodes: vec![anchor, site.b] })
}
