//! Incremental exact Constrained Delaunay Triangulation.
//!
//! [`Cdt`] wraps a bare [`Mesh`] and drives it through [`tri_insert`],
//! [`delete_node`], [`add_constraint`]/[`remove_constraint`] and
//! [`bulk_init`], keeping the Delaunay property invariant after every public
//! call.

mod bulk;
mod constraint;
mod delete;
mod error;
mod fill_hole;
mod flip;
mod insert;
mod locate;

pub use error::CdtError;

use nalgebra::Point2;

use crate::mesh::{CellId, EdgeId, Mesh, NodeId};

/// An incremental exact Constrained Delaunay Triangulation over a 2D point
/// set.
pub struct Cdt {
    mesh: Mesh,
    /// When set, every mutating call re-validates the local Delaunay
    /// property and turns any violation into [`CdtError::GridException`];
    /// off by default, expensive, intended for tests.
    pub post_check: bool,
}

impl Default for Cdt {
    fn default() -> Self {
        Self::new()
    }
}

impl Cdt {
    pub fn new() -> Self {
        Self { mesh: Mesh::new(), post_check: false }
    }

    /// Borrows the underlying mesh for read-only navigation.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Inserts a point, returning its stable id. `hint` seeds point location
    /// with a likely-nearby cell.
    pub fn add_node(&mut self, x: Point2<f64>, hint: Option<CellId>) -> Result<NodeId, CdtError> {
        let n = insert::tri_insert(&mut self.mesh, x, hint)?;
        self.run_post_check()?;
        Ok(n)
    }

    /// Moves an existing node to a new position, re-triangulating around it.
    ///
    /// Uses a save/delete/reinsert/rollback protocol: incident constrained
    /// edges are recorded as node-id pairs before the node is deleted and
    /// reinserted (at the same id) at `x`; the saved constraints are then
    /// re-added one at a time. If any re-add fails with
    /// `IntersectingConstraints`, the node is moved back to its original
    /// position, all original constraints are restored (which must
    /// succeed), and the error is re-raised — so a failed `modify_node`
    /// leaves the mesh exactly as it was.
    pub fn modify_node(&mut self, n: NodeId, x: Point2<f64>) -> Result<(), CdtError> {
        let old_x = self.mesh.node_x(n);
        let constrained_peers: Vec<NodeId> = self
            .mesh
            .node_to_nodes(n)
            .into_iter()
            .filter(|&m| {
                self.mesh.nodes_to_edge(n, m).map(|he| self.mesh.edge_constrained(he.edge)).unwrap_or(false)
            })
            .collect();
        let hint = self.mesh.node_to_cells(n).first().copied();

        delete::delete_node(&mut self.mesh, n)?;
        insert::tri_insert_at(&mut self.mesh, n, x, hint)?;

        for &m in &constrained_peers {
            if let Err(e) = constraint::add_constraint(&mut self.mesh, n, m) {
                delete::delete_node(&mut self.mesh, n)?;
                insert::tri_insert_at(&mut self.mesh, n, old_x, hint)?;
                for &m2 in &constrained_peers {
                    constraint::add_constraint(&mut self.mesh, n, m2)
                        .expect("restoring the original constraints must succeed");
                }
                return Err(e);
            }
        }
        self.run_post_check()?;
        Ok(())
    }

    /// Deletes a node, re-triangulating the hole it leaves behind.
    pub fn delete_node(&mut self, n: NodeId) -> Result<(), CdtError> {
        delete::delete_node(&mut self.mesh, n)?;
        self.run_post_check()?;
        Ok(())
    }

    /// Carves a constrained edge between two existing nodes into the
    /// triangulation.
    pub fn add_constraint(&mut self, n_a: NodeId, n_b: NodeId) -> Result<EdgeId, CdtError> {
        constraint::add_constraint(&mut self.mesh, n_a, n_b)?;
        self.run_post_check()?;
        Ok(self.mesh.nodes_to_edge(n_a, n_b).expect("constraint just added").edge)
    }

    /// Un-constrains an edge and re-legalizes around it locally.
    pub fn remove_constraint(&mut self, n_a: NodeId, n_b: NodeId) -> Result<(), CdtError> {
        constraint::remove_constraint(&mut self.mesh, n_a, n_b)?;
        self.run_post_check()?;
        Ok(())
    }

    /// Builds a triangulation from a batch of points via repeated insertion.
    pub fn bulk_init(&mut self, points: &[Point2<f64>]) -> Result<Vec<NodeId>, CdtError> {
        let ids = bulk::bulk_init(&mut self.mesh, points)?;
        self.run_post_check()?;
        Ok(ids)
    }

    /// Edges that locally violate the empty-circle property.
    pub fn check_local_delaunay(&self) -> Vec<EdgeId> {
        self.mesh.check_local_delaunay()
    }

    /// Cells whose circumcircle contains some other live node.
    pub fn check_global_delaunay(&self) -> Vec<CellId> {
        self.mesh.check_global_delaunay()
    }

    fn run_post_check(&self) -> Result<(), CdtError> {
        if !self.post_check {
            return Ok(());
        }
        let bad_edges = self.mesh.check_local_delaunay();
        if !bad_edges.is_empty() {
            return Err(CdtError::GridException { detail: format!("post_check: non-Delaunay edges {bad_edges:?}") });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    #[test]
    fn bulk_init_of_a_square_is_locally_delaunay() {
        let mut cdt = Cdt::new();
        cdt.bulk_init(&[pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 1.0), pt(0.0, 1.0)]).unwrap();
        assert_eq!(cdt.mesh().dim(), 2);
        assert!(cdt.check_local_delaunay().is_empty());
    }

    #[test]
    fn add_constraint_across_a_square_carves_the_diagonal() {
        let mut cdt = Cdt::new();
        let ids = cdt.bulk_init(&[pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 1.0), pt(0.0, 1.0)]).unwrap();
        let edge = cdt.add_constraint(ids[0], ids[2]).unwrap();
        assert!(cdt.mesh().edge_constrained(edge));
    }

    #[test]
    fn delete_node_from_a_square_leaves_a_valid_triangulation() {
        let mut cdt = Cdt::new();
        let ids = cdt.bulk_init(&[pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 1.0), pt(0.0, 1.0), pt(0.5, 0.5)]).unwrap();
        cdt.delete_node(ids[4]).unwrap();
        assert!(cdt.check_local_delaunay().is_empty());
    }
}
