//! Boundary-node resampling against a parameterized ring curve.

use crate::cdt::CdtError;
use crate::curve::Curve;
use crate::mesh::{Mesh, NodeId};
use crate::tol::AdvancingFrontCfg;

use super::mark_unmeshed;

/// Redistributes `n` (a `SLIDE` node of degree <= 2) along its ring curve so
/// its spacing from `anchor` approaches `scale`, absorbing any
/// shorter-than-target `SLIDE` neighbors that fall in between.
///
/// No-op if `n` or `anchor` isn't pinned to a curve (e.g. interior nodes
/// reached via a degenerate site).
pub(crate) fn resample(
    mesh: &mut Mesh,
    curves: &[Curve],
    n: NodeId,
    anchor: NodeId,
    scale: f64,
    cfg: &AdvancingFrontCfg,
) -> Result<(), CdtError> {
    let Some((curve_id, f_anchor)) = mesh.node_oring(anchor) else { return Ok(()) };
    let Some((n_curve_id, f_n)) = mesh.node_oring(n) else { return Ok(()) };
    if curve_id != n_curve_id {
        return Ok(());
    }
    let curve = &curves[curve_id];

    let l = curve.length();
    let raw = f_n - f_anchor;
    let wrapped = if curve.closed() {
        let mut w = raw % l;
        if w > l / 2.0 {
            w -= l;
        } else if w < -l / 2.0 {
            w += l;
        }
        w
    } else {
        raw
    };
    let sign = if wrapped >= 0.0 { 1.0 } else { -1.0 };
    let span = wrapped.abs();

    let max_span = cfg.max_span_factor * scale;
    let target_span = if span <= max_span {
        let k = (span / scale).round().max(1.0);
        span / k
    } else {
        scale
    };

    let (f_new, pos_new) = curve
        .distance_away(f_anchor, sign * target_span)
        .map_err(|e| CdtError::StrategyFailed { reason: e.to_string() })?;

    // Drop SLIDE, degree-2 nodes strictly between anchor and the new target,
    // measured along this resample's own (unwrapped) arclength offset.
    let d_new = f_new - f_anchor;
    let between: Vec<NodeId> = mesh
        .live_node_ids()
        .filter(|&m| m != n && m != anchor)
        .filter(|&m| matches!(mesh.node_oring(m), Some((c, _)) if c == curve_id))
        .filter(|&m| mesh.node_fixed(m) == crate::mesh::Fixed::Slide && mesh.node_to_nodes(m).len() <= 2)
        .filter(|&m| {
            let (_, f_m) = mesh.node_oring(m).unwrap();
            let d_m = f_m - f_anchor;
            d_m.signum() == d_new.signum() && d_m.abs() < d_new.abs()
        })
        .collect();
    for m in between {
        remove_boundary_node(mesh, m)?;
    }

    mesh.modify_node(n, pos_new)?;
    mesh.set_node_oring(n, curve_id, f_new);
    Ok(())
}

/// Removes a degree-2 boundary node, rejoining its two neighbors with a
/// single edge that inherits the unmeshed-side marker.
fn remove_boundary_node(mesh: &mut Mesh, n: NodeId) -> Result<(), CdtError> {
    let neighbors = mesh.node_to_nodes(n);
    if neighbors.len() != 2 {
        return Ok(());
    }
    let edges = mesh.node_to_edges(n);
    let directed: Vec<(NodeId, NodeId)> = edges.iter().map(|&e| super::site::front_direction(mesh, e)).collect();
    let p = directed.iter().find_map(|&(from, to)| if to == n { Some(from) } else { None });
    let q = directed.iter().find_map(|&(from, to)| if from == n { Some(to) } else { None });

    for e in edges {
        mesh.delete_edge(e)?;
    }
    mesh.delete_node(n)?;
    mesh.add_edge(neighbors[0], neighbors[1])?;
    if let (Some(p), Some(q)) = (p, q) {
        mark_unmeshed(mesh, p, q);
    }
    Ok(())
}
