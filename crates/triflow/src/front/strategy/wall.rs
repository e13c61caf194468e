//! Wall strategy: adds a single new node to square off a near-right-angle
//! site, the default when neither Cutoff nor Join is a better fit.

use nalgebra::Vector2;

use crate::cdt::CdtError;
use crate::mesh::Mesh;
use crate::tol::AdvancingFrontCfg;

use super::super::mark_unmeshed;
use super::super::site::TriangleSite;
use super::Edits;

pub(crate) fn metric(mesh: &Mesh, site: &TriangleSite, cfg: &AdvancingFrontCfg) -> f64 {
    let theta = site.internal_angle(mesh);
    ((cfg.wall_pivot_angle - theta) / 30.0_f64.to_radians()).clamp(0.0, 1.0)
}

/// Places a new node `d` by rotating `c - b` by 60 degrees about `b`, and
/// emits the single new triangle `(b,c,d)`; `a` is untouched, left for a
/// later site to close.
pub(crate) fn execute(mesh: &mut Mesh, site: &TriangleSite) -> Result<Edits, CdtError> {
    let pb = mesh.node_x(site.b);
    let pc = mesh.node_x(site.c);
    let v = pc - pb;
    let angle = std::f64::consts::FRAC_PI_3;
    let (s, co) = angle.sin_cos();
    let rotated = Vector2::new(co * v.x - s * v.y, s * v.x + co * v.y);
    let d_pos = pb + rotated;

    let d = mesh.add_node(d_pos)?;
    mesh.add_edge(site.b, d)?;
    mesh.add_edge(site.c, d)?;
    mesh.add_cell(site.b, site.c, d)?;
    mark_unmeshed(mesh, d, site.c);
    mark_unmeshed(mesh, site.b, d);

    Ok(Edits { nodes: vec![d] })
}
