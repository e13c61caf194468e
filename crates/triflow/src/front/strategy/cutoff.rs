//! Cutoff strategy: closes the site with existing nodes only, no new
//! geometry added.

use crate::cdt::CdtError;
use crate::mesh::Mesh;
use crate::tol::AdvancingFrontCfg;

use super::super::mark_unmeshed;
use super::super::site::TriangleSite;
use super::Edits;

pub(crate) fn metric(mesh: &Mesh, site: &TriangleSite, local_length: f64, cfg: &AdvancingFrontCfg) -> f64 {
    let theta = site.internal_angle(mesh);
    if theta > cfg.max_strategy_angle {
        return f64::INFINITY;
    }
    let edge_length = (mesh.node_x(site.a) - mesh.node_x(site.c)).norm();
    let ideal = 60.0_f64.to_radians() + (1.0 - edge_length / local_length) * 30.0_f64.to_radians();
    (theta - ideal).abs()
}

pub(crate) fn execute(mesh: &mut Mesh, site: &TriangleSite) -> Result<Edits, CdtError> {
    if mesh.nodes_to_edge(site.c, site.a).is_none() {
        mesh.add_edge(site.c, site.a)?;
    }
    mesh.add_cell(site.a, site.b, site.c)?;
    mark_unmeshed(mesh, site.a, site.c);
    Ok(Edits { nodes: vec![] })
}
