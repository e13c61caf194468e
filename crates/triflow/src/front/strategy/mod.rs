//! Topological actions that extend the mesh at a chosen front site.

pub(crate) mod cutoff;
pub(crate) mod join;
pub(crate) mod wall;

use crate::cdt::CdtError;
use crate::mesh::{Mesh, NodeId};
use crate::tol::AdvancingFrontCfg;

use super::site::TriangleSite;

/// Nodes touched by a strategy's `execute`, fed into the optimization pass
/// that follows it.
#[derive(Clone, Debug, Default)]
pub(crate) struct Edits {
    pub nodes: Vec<NodeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StrategyKind {
    Wall,
    Cutoff,
    Join,
}

fn metric(kind: StrategyKind, mesh: &Mesh, site: &TriangleSite, local_length: f64, cfg: &AdvancingFrontCfg) -> f64 {
    match kind {
        StrategyKind::Wall => wall::metric(mesh, site, cfg),
        StrategyKind::Cutoff => cutoff::metric(mesh, site, local_length, cfg),
        StrategyKind::Join => join::metric(mesh, site, cfg),
    }
}

pub(crate) fn execute(kind: StrategyKind, mesh: &mut Mesh, site: &TriangleSite) -> Result<Edits, CdtError> {
    match kind {
        StrategyKind::Wall => wall::execute(mesh, site),
        StrategyKind::Cutoff => cutoff::execute(mesh, site),
        StrategyKind::Join => join::execute(mesh, site),
    }
}

/// Picks the strategy with the smallest metric at `site`; `Wall` never
/// returns infinity, so this always picks something.
pub(crate) fn choose_strategy(mesh: &Mesh, site: &TriangleSite, local_length: f64, cfg: &AdvancingFrontCfg) -> StrategyKind {
    [StrategyKind::Join, StrategyKind::Cutoff, StrategyKind::Wall]
        .into_iter()
        .min_by(|&a, &b| {
            metric(a, mesh, site, local_length, cfg)
                .partial_cmp(&metric(b, mesh, site, local_length, cfg))
                .unwrap()
        })
        .expect("non-empty strategy list")
}
