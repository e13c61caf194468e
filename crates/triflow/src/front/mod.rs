//! The advancing-front scheduler: grows a triangular mesh inward from a set
//! of boundary curves one site at a time.

mod optimize;
mod resample;
mod site;
pub mod strategy;

use nalgebra::Point2;

use crate::cdt::CdtError;
use crate::curve::Curve;
use crate::mesh::{Fixed, Mesh, NodeId};
use crate::sentinel::UNMESHED;
use crate::tol::AdvancingFrontCfg;

pub use site::TriangleSite;

/// Marks the edge `from -> to` as bordering unmeshed territory on its left,
/// the convention [`Mesh::add_cell`] already uses for the side it fills in.
pub(crate) fn mark_unmeshed(mesh: &mut Mesh, from: NodeId, to: NodeId) {
    if let Some(he) = mesh.nodes_to_edge(from, to) {
        let side = if he.reversed { 1 } else { 0 };
        mesh.set_edge_cell(he.edge, side, UNMESHED);
    }
}

fn turning_angle(prev: Point2<f64>, cur: Point2<f64>, next: Point2<f64>) -> f64 {
    let v1 = (cur - prev).normalize();
    let v2 = (next - cur).normalize();
    v1.dot(&v2).clamp(-1.0, 1.0).acos()
}

/// Grows a triangular mesh inward from a set of boundary curves, one
/// minimum-angle site at a time, using the Wall/Cutoff/Join strategies and
/// cost-based relaxation to keep triangle quality in check.
pub struct Driver {
    mesh: Mesh,
    curves: Vec<Curve>,
    edge_scale: Box<dyn Fn(Point2<f64>) -> f64>,
    cfg: AdvancingFrontCfg,
}

impl Driver {
    pub fn new(edge_scale: impl Fn(Point2<f64>) -> f64 + 'static) -> Self {
        Self {
            mesh: Mesh::new(),
            curves: Vec::new(),
            edge_scale: Box::new(edge_scale),
            cfg: AdvancingFrontCfg::default(),
        }
    }

    pub fn with_cfg(edge_scale: impl Fn(Point2<f64>) -> f64 + 'static, cfg: AdvancingFrontCfg) -> Self {
        Self { cfg, ..Self::new(edge_scale) }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    /// Registers a boundary curve and returns its index, used later as the
    /// `curve` half of a node's `oring`.
    pub fn add_curve(&mut self, curve: Curve) -> usize {
        self.curves.push(curve);
        self.curves.len() - 1
    }

    pub fn set_edge_scale(&mut self, edge_scale: impl Fn(Point2<f64>) -> f64 + 'static) {
        self.edge_scale = Box::new(edge_scale);
    }

    /// Upsamples every registered curve to the local target edge length and
    /// seeds the front: each sampled point becomes a node pinned to its
    /// curve (`oring`), `RIGID` at sharp corners (and at the two free ends
    /// of an open curve) and `SLIDE` elsewhere, connected into a ring of
    /// edges whose interior side is left `UNMESHED` for the driver loop to
    /// fill in.
    pub fn initialize_boundaries(&mut self) -> Result<(), CdtError> {
        for curve_id in 0..self.curves.len() {
            let (mesh, curves, edge_scale) = (&mut self.mesh, &self.curves, &self.edge_scale);
            let curve = &curves[curve_id];
            let samples = curve.upsample_with_params(|p| edge_scale(p));
            let count = samples.len();
            if count < 2 {
                continue;
            }

            let mut node_ids = Vec::with_capacity(count);
            for &(f, p) in &samples {
                let n = mesh.add_node(p)?;
                mesh.set_node_oring(n, curve_id, f);
                node_ids.push(n);
            }

            for i in 0..count {
                let prev = samples[(i + count - 1) % count].1;
                let cur = samples[i].1;
                let next = samples[(i + 1) % count].1;
                let is_open_end = !curve.closed() && (i == 0 || i == count - 1);
                let fixed = if is_open_end || turning_angle(prev, cur, next) > self.cfg.corner_angle_threshold {
                    Fixed::Rigid
                } else {
                    Fixed::Slide
                };
                mesh.set_node_fixed(node_ids[i], fixed);
            }

            let edge_count = if curve.closed() { count } else { count - 1 };
            for i in 0..edge_count {
                let (from, to) = (node_ids[i], node_ids[(i + 1) % count]);
                mesh.add_edge(from, to)?;
                mark_unmeshed(mesh, from, to);
            }
        }
        Ok(())
    }

    /// Runs the site-selection/resample/strategy/relax loop until the front
    /// closes or `count` sites have been processed, whichever comes first.
    pub fn run(&mut self, count: Option<usize>) -> Result<usize, CdtError> {
        let mut processed = 0;
        while count.map(|c| processed < c).unwrap_or(true) {
            let Some(site) = site::choose_site(&self.mesh) else { break };

            for (n, anchor) in [(site.a, site.b), (site.c, site.b)] {
                if self.mesh.node_fixed(n) == Fixed::Slide && self.mesh.node_to_nodes(n).len() <= 2 {
                    let scale = (self.edge_scale)(self.mesh.node_x(n));
                    resample::resample(&mut self.mesh, &self.curves, n, anchor, scale, &self.cfg)?;
                }
            }

            // Resampling may have deleted or moved the site's own nodes;
            // re-derive it against the now-current front.
            let Some(site) = site::choose_site(&self.mesh) else { break };
            let local_length = (self.edge_scale)(self.mesh.node_x(site.b));
            let kind = strategy::choose_strategy(&self.mesh, &site, local_length, &self.cfg);
            let edits = strategy::execute(kind, &mut self.mesh, &site)?;

            self.optimize_edits(&edits.nodes, local_length);
            processed += 1;
        }
        Ok(processed)
    }

    fn optimize_edits(&mut self, nodes: &[NodeId], target_length: f64) {
        for _ in 0..self.cfg.max_levels {
            let mut worst = 0.0f64;
            for &n in nodes {
                let c = optimize::relax_node(&mut self.mesh, &self.curves, n, target_length);
                worst = worst.max(c);
            }
            if worst <= self.cfg.max_cost_relax {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;

    use super::*;

    #[test]
    fn initialize_boundaries_seeds_a_closed_ring_with_unmeshed_interior() {
        let square = Curve::new(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(4.0, 0.0),
                Point2::new(4.0, 4.0),
                Point2::new(0.0, 4.0),
            ],
            true,
        )
        .unwrap();

        let mut driver = Driver::new(|_| 1.0);
        driver.add_curve(square);
        driver.initialize_boundaries().unwrap();

        assert!(driver.mesh().node_count() >= 4);
        assert_eq!(driver.mesh().cell_count(), 0);
        assert!(!site::front_edges(driver.mesh()).is_empty());
    }

    #[test]
    fn run_closes_a_small_square_front_without_error() {
        let square = Curve::new(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(2.0, 2.0),
                Point2::new(0.0, 2.0),
            ],
            true,
        )
        .unwrap();

        let mut driver = Driver::new(|_| 1.0);
        driver.add_curve(square);
        driver.initialize_boundaries().unwrap();
        let processed = driver.run(Some(50)).unwrap();

        assert!(processed > 0);
        assert!(driver.mesh().cell_count() > 0);
    }
}
