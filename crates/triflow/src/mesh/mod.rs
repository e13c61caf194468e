//! Generic unstructured mesh container.
//!
//! `Mesh` is an arena of nodes/edges/cells addressed by stable ids, with
//! tombstone-based deletion so ids stay valid (or cleanly dead) across
//! mutation. It is deliberately triangulation-agnostic: [`crate::cdt::Cdt`]
//! wraps one to get Delaunay semantics, and the advancing-front driver
//! mutates a bare one directly as the mesh it is actually building.

mod events;
mod halfedge;
mod types;

pub use events::{EventBus, HookError, MeshEvent, MeshOp};
pub use halfedge::HalfEdge;
pub use types::{CellId, EdgeId, Fixed, NodeId};

use nalgebra::Point2;
use types::{CellRecord, EdgeRecord, NodeRecord};

use crate::sentinel::INF_CELL;

/// Arena-backed node/edge/cell container.
pub struct Mesh {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    cells: Vec<CellRecord>,
    free_nodes: Vec<usize>,
    free_edges: Vec<usize>,
    free_cells: Vec<usize>,
    pub events: EventBus,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    pub fn new() -> Self {
        Mesh {
            nodes: Vec::new(),
            edges: Vec::new(),
            cells: Vec::new(),
            free_nodes: Vec::new(),
            free_edges: Vec::new(),
            free_cells: Vec::new(),
            events: EventBus::default(),
        }
    }

    // --- raw record access (crate-internal; `cdt`/`front` need the fields) ---

    pub(crate) fn node_rec(&self, n: NodeId) -> &NodeRecord {
        &self.nodes[n.0]
    }

    pub(crate) fn node_rec_mut(&mut self, n: NodeId) -> &mut NodeRecord {
        &mut self.nodes[n.0]
    }

    pub(crate) fn edge_rec(&self, e: EdgeId) -> &EdgeRecord {
        &self.edges[e.0]
    }

    pub(crate) fn edge_rec_mut(&mut self, e: EdgeId) -> &mut EdgeRecord {
        &mut self.edges[e.0]
    }

    pub(crate) fn cell_rec(&self, c: CellId) -> &CellRecord {
        &self.cells[c.index().expect("finite cell id")]
    }

    pub(crate) fn cell_rec_mut(&mut self, c: CellId) -> &mut CellRecord {
        &mut self.cells[c.index().expect("finite cell id")]
    }

    /// Thin public accessor used by [`HalfEdge`] navigation.
    pub(crate) fn edge(&self, e: EdgeId) -> &EdgeRecord {
        self.edge_rec(e)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.deleted).count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| !e.deleted).count()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.deleted).count()
    }

    pub fn node_exists(&self, n: NodeId) -> bool {
        self.nodes.get(n.0).is_some_and(|r| !r.deleted)
    }

    pub fn edge_exists(&self, e: EdgeId) -> bool {
        self.edges.get(e.0).is_some_and(|r| !r.deleted)
    }

    pub fn cell_exists(&self, c: CellId) -> bool {
        c.index().is_some_and(|i| self.cells.get(i).is_some_and(|r| !r.deleted))
    }

    pub fn node_x(&self, n: NodeId) -> Point2<f64> {
        self.node_rec(n).x
    }

    pub fn node_fixed(&self, n: NodeId) -> Fixed {
        self.node_rec(n).fixed
    }

    pub fn set_node_fixed(&mut self, n: NodeId, fixed: Fixed) {
        self.node_rec_mut(n).fixed = fixed;
    }

    pub fn node_oring(&self, n: NodeId) -> Option<(usize, f64)> {
        let r = self.node_rec(n);
        r.oring.map(|c| (c, r.ring_f))
    }

    pub fn set_node_oring(&mut self, n: NodeId, curve: usize, f: f64) {
        let r = self.node_rec_mut(n);
        r.oring = Some(curve);
        r.ring_f = f;
    }

    pub fn clear_node_oring(&mut self, n: NodeId) {
        let r = self.node_rec_mut(n);
        r.oring = None;
        r.ring_f = f64::NAN;
    }

    // --- node CRUD ---

    /// Adds a node at `x`, reusing a tombstoned slot if one is free.
    /// Fires `AddNode` before/after events.
    pub fn add_node(&mut self, x: Point2<f64>) -> Result<NodeId, HookError> {
        self.events.fire_before(&MeshEvent::BeforeAddNode { x })?;
        let id = self.alloc_node(x);
        self.events.fire_after(&MeshEvent::AfterAddNode { id, x });
        Ok(id)
    }

    fn alloc_node(&mut self, x: Point2<f64>) -> NodeId {
        let rec = NodeRecord { x, deleted: false, fixed: Fixed::Free, oring: None, ring_f: f64::NAN };
        if let Some(i) = self.free_nodes.pop() {
            self.nodes[i] = rec;
            NodeId(i)
        } else {
            self.nodes.push(rec);
            NodeId(self.nodes.len() - 1)
        }
    }

    /// Re-creates a node at a specific, previously-freed id (used by the
    /// shadow CDT's reinsert-at-same-id protocol and by `Cdt::delete_node`'s
    /// hole refill). Panics if `n` is currently live.
    pub(crate) fn add_node_at(&mut self, n: NodeId, x: Point2<f64>) -> Result<(), HookError> {
        debug_assert!(!self.node_exists(n), "add_node_at on a live node");
        self.events.fire_before(&MeshEvent::BeforeAddNode { x })?;
        while self.nodes.len() <= n.0 {
            let i = self.nodes.len();
            self.nodes.push(NodeRecord::tombstone());
            self.free_nodes.push(i);
        }
        self.free_nodes.retain(|&i| i != n.0);
        self.nodes[n.0] = NodeRecord { x, deleted: false, fixed: Fixed::Free, oring: None, ring_f: f64::NAN };
        self.events.fire_after(&MeshEvent::AfterAddNode { id: n, x });
        Ok(())
    }

    /// Moves a node. Does not touch incident
    /// edges/cells; callers that need re-triangulation (e.g. [`crate::cdt`])
    /// orchestrate delete+reinsert around this.
    pub fn modify_node(&mut self, n: NodeId, new_x: Point2<f64>) -> Result<(), HookError> {
        let old_x = self.node_x(n);
        self.events.fire_before(&MeshEvent::BeforeModifyNode { id: n, new_x })?;
        self.node_rec_mut(n).x = new_x;
        self.events.fire_after(&MeshEvent::AfterModifyNode { id: n, old_x, new_x });
        Ok(())
    }

    /// Tombstones a node. Caller must have already detached all incident
    /// edges.
    pub fn delete_node(&mut self, n: NodeId) -> Result<(), HookError> {
        self.events.fire_before(&MeshEvent::BeforeDeleteNode { id: n })?;
        self.node_rec_mut(n).deleted = true;
        self.free_nodes.push(n.0);
        self.events.fire_after(&MeshEvent::AfterDeleteNode { id: n });
        Ok(())
    }

    // --- edge CRUD ---

    /// Adds an edge `n0 -> n1` with both cell slots set to [`INF_CELL`].
    /// Fires `AddEdge` before/after events.
    pub fn add_edge(&mut self, n0: NodeId, n1: NodeId) -> Result<EdgeId, HookError> {
        self.events.fire_before(&MeshEvent::BeforeAddEdge { n0, n1 })?;
        let rec = EdgeRecord { nodes: [n0, n1], cells: [INF_CELL, INF_CELL], deleted: false, constrained: false };
        let id = if let Some(i) = self.free_edges.pop() {
            self.edges[i] = rec;
            EdgeId(i)
        } else {
            self.edges.push(rec);
            EdgeId(self.edges.len() - 1)
        };
        self.events.fire_after(&MeshEvent::AfterAddEdge { id, n0, n1 });
        Ok(id)
    }

    /// Rewrites an edge's endpoints in place, preserving its id (used when
    /// collapsing a node into a neighbor, as the Join front strategy does).
    pub fn modify_edge_nodes(&mut self, e: EdgeId, n0: NodeId, n1: NodeId) -> Result<(), HookError> {
        let old = self.edge_rec(e).nodes;
        self.events.fire_before(&MeshEvent::BeforeModifyEdge {
            id: e,
            old_nodes: (old[0], old[1]),
            new_nodes: (n0, n1),
        })?;
        self.edge_rec_mut(e).nodes = [n0, n1];
        self.events.fire_after(&MeshEvent::AfterModifyEdge {
            id: e,
            old_nodes: (old[0], old[1]),
            new_nodes: (n0, n1),
        });
        Ok(())
    }

    pub fn set_edge_constrained(&mut self, e: EdgeId, constrained: bool) {
        self.edge_rec_mut(e).constrained = constrained;
    }

    pub fn edge_constrained(&self, e: EdgeId) -> bool {
        self.edge_rec(e).constrained
    }

    pub fn delete_edge(&mut self, e: EdgeId) -> Result<(), HookError> {
        let nodes = self.edge_rec(e).nodes;
        self.events.fire_before(&MeshEvent::BeforeDeleteEdge { id: e, n0: nodes[0], n1: nodes[1] })?;
        self.edge_rec_mut(e).deleted = true;
        self.free_edges.push(e.0);
        self.events.fire_after(&MeshEvent::AfterDeleteEdge { id: e, n0: nodes[0], n1: nodes[1] });
        Ok(())
    }

    pub(crate) fn set_edge_cell(&mut self, e: EdgeId, side: usize, c: CellId) {
        self.edge_rec_mut(e).cells[side] = c;
    }

    // --- cell CRUD ---

    /// Adds a cell, reordering `n0,n1,n2` to CCW if given CW, creating any of
    /// its 3 edges that don't already exist, and wiring the cell pointer on
    /// each edge's appropriate side.
    ///
    /// Not event-observed: cell creation has no mutation event of its own,
    /// so nothing downstream needs to react to it directly (the shadow CDT
    /// only ever mirrors node/edge mutations).
    pub fn add_cell(&mut self, n0: NodeId, n1: NodeId, n2: NodeId) -> Result<CellId, HookError> {
        let (p0, p1, p2) = (self.node_x(n0), self.node_x(n1), self.node_x(n2));
        let (n0, n1, n2) = match crate::predicates::orientation(p0, p1, p2) {
            crate::predicates::Orientation::Right => (n0, n2, n1),
            _ => (n0, n1, n2),
        };
        let nodes = [n0, n1, n2];
        let mut edges = [EdgeId(0); 3];
        for k in 0..3 {
            let (a, b) = (nodes[k], nodes[(k + 1) % 3]);
            edges[k] = match self.nodes_to_edge(a, b) {
                Some(he) => he.edge,
                None => self.add_edge(a, b)?,
            };
        }
        let rec = CellRecord { nodes, edges, deleted: false };
        let id = if let Some(i) = self.free_cells.pop() {
            self.cells[i] = rec;
            CellId::from(i)
        } else {
            self.cells.push(rec);
            CellId::from(self.cells.len() - 1)
        };
        for k in 0..3 {
            let (a, b) = (nodes[k], nodes[(k + 1) % 3]);
            let side = if self.edge_rec(edges[k]).nodes == [a, b] { 0 } else { 1 };
            self.set_edge_cell(edges[k], side, id);
        }
        Ok(id)
    }

    /// Tombstones a cell and clears its pointer from the 3 bordering edges.
    pub fn delete_cell(&mut self, c: CellId) {
        let edges = self.cell_rec(c).edges;
        for e in edges {
            for side in 0..2 {
                if self.edge_rec(e).cells[side] == c {
                    self.set_edge_cell(e, side, INF_CELL);
                }
            }
        }
        self.cell_rec_mut(c).deleted = true;
        self.free_cells.push(c.index().unwrap());
    }

    // --- navigation ---

    pub fn cell_to_nodes(&self, c: CellId) -> [NodeId; 3] {
        self.cell_rec(c).nodes
    }

    pub fn cell_to_edges(&self, c: CellId) -> [EdgeId; 3] {
        self.cell_rec(c).edges
    }

    pub fn edge_to_nodes(&self, e: EdgeId) -> [NodeId; 2] {
        self.edge_rec(e).nodes
    }

    pub fn edge_to_cells(&self, e: EdgeId) -> [CellId; 2] {
        self.edge_rec(e).cells
    }

    pub fn live_node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId).filter(move |n| !self.nodes[n.0].deleted)
    }

    pub fn live_edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId).filter(move |e| !self.edges[e.0].deleted)
    }

    pub fn live_cell_ids(&self) -> impl Iterator<Item = CellId> + '_ {
        (0..self.cells.len()).map(CellId::from).filter(move |c| !self.cells[c.index().unwrap()].deleted)
    }

    pub fn node_to_edges(&self, n: NodeId) -> Vec<EdgeId> {
        (0..self.edges.len())
            .map(EdgeId)
            .filter(|&e| !self.edges[e.0].deleted && self.edges[e.0].nodes.contains(&n))
            .collect()
    }

    pub fn node_to_nodes(&self, n: NodeId) -> Vec<NodeId> {
        self.node_to_edges(n)
            .into_iter()
            .map(|e| {
                let [a, b] = self.edge_to_nodes(e);
                if a == n { b } else { a }
            })
            .collect()
    }

    pub fn node_to_cells(&self, n: NodeId) -> Vec<CellId> {
        let mut out: Vec<CellId> = (0..self.cells.len())
            .map(CellId::from)
            .filter(|&c| !self.cells[c.index().unwrap()].deleted && self.cells[c.index().unwrap()].nodes.contains(&n))
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// The halfedge `n0 -> n1`, if that edge exists.
    pub fn nodes_to_halfedge(&self, n0: NodeId, n1: NodeId) -> Option<HalfEdge> {
        self.node_to_edges(n0).into_iter().find_map(|e| {
            let nodes = self.edge_to_nodes(e);
            if nodes == [n0, n1] {
                Some(HalfEdge::forward(e))
            } else if nodes == [n1, n0] {
                Some(HalfEdge::backward(e))
            } else {
                None
            }
        })
    }

    pub fn nodes_to_edge(&self, n0: NodeId, n1: NodeId) -> Option<HalfEdge> {
        self.nodes_to_halfedge(n0, n1)
    }

    /// The cell bordering the directed edge `n0 -> n1` to its left, if any.
    pub fn nodes_to_cell(&self, n0: NodeId, n1: NodeId) -> Option<CellId> {
        self.nodes_to_halfedge(n0, n1).map(|he| he.cell(self)).filter(|c| c.is_finite())
    }

    /// The position of `edge` within `c.edges`, if `edge` borders `c`.
    pub(crate) fn cell_edge_slot(&self, c: CellId, edge: EdgeId) -> Option<usize> {
        c.index().and_then(|i| self.cells[i].edges.iter().position(|&e| e == edge))
    }

    /// The halfedge at `c.edges[slot]` oriented so that it borders `c`.
    pub(crate) fn halfedge_aligned_with_cell(&self, c: CellId, slot: usize) -> HalfEdge {
        let cell = self.cell_rec(c);
        let e = cell.edges[slot];
        let (a, b) = (cell.nodes[slot], cell.nodes[(slot + 1) % 3]);
        if self.edge_rec(e).nodes == [a, b] {
            HalfEdge::forward(e)
        } else {
            HalfEdge::backward(e)
        }
    }

    /// Topological dimension of the mesh: -1 empty, 0 isolated points only,
    /// 1 edges but no cells, 2 at least one cell.
    pub fn dim(&self) -> i32 {
        if self.cell_count() > 0 {
            2
        } else if self.edge_count() > 0 {
            1
        } else if self.node_count() > 0 {
            0
        } else {
            -1
        }
    }

    pub fn subscribe_before(&mut self, op: MeshOp, hook: Box<dyn FnMut(&MeshEvent) -> Result<(), HookError>>) {
        self.events.subscribe_before(op, hook);
    }

    pub fn subscribe_after(&mut self, op: MeshOp, hook: Box<dyn FnMut(&MeshEvent)>) {
        self.events.subscribe_after(op, hook);
    }

    /// Edges whose two incident triangles violate the local empty-circle
    /// test, ignoring constrained edges (which are exempt by definition).
    /// Returns offending edges rather than a bool, for diagnostics.
    pub fn check_local_delaunay(&self) -> Vec<EdgeId> {
        use crate::predicates::{incircle, InCircle};

        let mut bad = Vec::new();
        for e in self.live_edge_ids() {
            if self.edge_constrained(e) {
                continue;
            }
            let cells = self.edge_to_cells(e);
            if !cells[0].is_finite() || !cells[1].is_finite() {
                continue;
            }
            let [a, c] = self.edge_to_nodes(e);
            let apex = |cell: CellId| -> NodeId {
                self.cell_to_nodes(cell).into_iter().find(|&n| n != a && n != c).expect("triangle has third vertex")
            };
            let (d, b) = (apex(cells[0]), apex(cells[1]));
            let (pa, pc, pd, pb) = (self.node_x(a), self.node_x(c), self.node_x(d), self.node_x(b));
            if incircle(pa, pc, pd, pb) == InCircle::Inside {
                bad.push(e);
            }
        }
        bad
    }

    /// Full-mesh sweep checking every finite cell against every live node.
    /// O(cells * nodes): intended for tests and `post_check`, not hot
    /// paths.
    pub fn check_global_delaunay(&self) -> Vec<CellId> {
        use crate::predicates::{incircle, InCircle};

        let mut bad = Vec::new();
        for c in self.live_cell_ids() {
            let verts = self.cell_to_nodes(c);
            let (pa, pb, pc) = (self.node_x(verts[0]), self.node_x(verts[1]), self.node_x(verts[2]));
            let violated = self.live_node_ids().filter(|&n| !verts.contains(&n)).any(|n| {
                incircle(pa, pb, pc, self.node_x(n)) == InCircle::Inside
            });
            if violated {
                bad.push(c);
            }
        }
        bad
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    #[test]
    fn add_triangle_orients_ccw_and_wires_edges() {
        let mut m = Mesh::new();
        let a = m.add_node(p(0.0, 0.0)).unwrap();
        let b = m.add_node(p(1.0, 0.0)).unwrap();
        let c = m.add_node(p(0.0, 1.0)).unwrap();
        // Pass clockwise; add_cell must reorder to CCW.
        let cell = m.add_cell(a, c, b).unwrap();
        assert_eq!(m.cell_to_nodes(cell), [a, b, c]);
        assert_eq!(m.dim(), 2);
        for (u, v) in [(a, b), (b, c), (c, a)] {
            let he = m.nodes_to_halfedge(u, v).expect("edge should exist");
            assert_eq!(he.cell(&m), cell);
        }
    }

    #[test]
    fn delete_node_tombstones_and_frees_slot() {
        let mut m = Mesh::new();
        let a = m.add_node(p(0.0, 0.0)).unwrap();
        m.delete_node(a).unwrap();
        assert!(!m.node_exists(a));
        let b = m.add_node(p(9.0, 9.0)).unwrap();
        assert_eq!(b, a, "freed slot should be reused");
        assert_eq!(m.node_x(b), p(9.0, 9.0));
    }

    #[test]
    fn before_hook_can_veto_add_node() {
        let mut m = Mesh::new();
        m.subscribe_before(MeshOp::AddNode, Box::new(|_| Err(HookError("nope".into()))));
        assert!(m.add_node(p(0.0, 0.0)).is_err());
        assert_eq!(m.node_count(), 0);
    }

    #[test]
    fn halfedge_fwd_rev_cycle_through_triangle() {
        let mut m = Mesh::new();
        let a = m.add_node(p(0.0, 0.0)).unwrap();
        let b = m.add_node(p(1.0, 0.0)).unwrap();
        let c = m.add_node(p(0.0, 1.0)).unwrap();
        let cell = m.add_cell(a, b, c).unwrap();
        let he = m.nodes_to_halfedge(a, b).unwrap();
        let he2 = he.fwd(&m).unwrap();
        assert_eq!(he2.node_rev(&m), b);
        let he3 = he2.fwd(&m).unwrap();
        assert_eq!(he3.node_rev(&m), c);
        let he0 = he3.fwd(&m).unwrap();
        assert_eq!(he0, he);
        assert_eq!(he.cell(&m), cell);
        assert!(!he.cell_opp(&m).is_finite());
    }
}
