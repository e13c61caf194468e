//! Bulk construction.

use nalgebra::Point2;

use super::error::CdtError;
use super::insert::tri_insert;
use crate::mesh::{CellId, Mesh, NodeId};

/// Builds a triangulation from a batch of points by repeated insertion.
///
/// No batch Delaunay algorithm (divide-and-conquer, sweep-line) is part of
/// this crate's dependency set, so each point is inserted one at a time, in
/// the order given, with the previous insertion's cell as a locality hint.
pub(crate) fn bulk_init(mesh: &mut Mesh, points: &[Point2<f64>]) -> Result<Vec<NodeId>, CdtError> {
    let mut ids = Vec::with_capacity(points.len());
    let mut hint: Option<CellId> = None;
    for &p in points {
        let n = tri_insert(mesh, p, hint)?;
        hint = mesh.node_to_cells(n).first().copied();
        ids.push(n);
    }
    Ok(ids)
}
