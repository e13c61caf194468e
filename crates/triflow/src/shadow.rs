//! Shadow CDT: a secondary triangulation mirrored off a primary mesh's
//! mutation events, so the primary mesh can query Delaunay-style geometric
//! properties after every mutation without itself being a [`Cdt`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::cdt::Cdt;
use crate::mesh::{Mesh, MeshEvent, MeshOp, NodeId};

struct Inner {
    cdt: Cdt,
    /// primary node id -> shadow node id.
    map: HashMap<NodeId, NodeId>,
}

/// Mirrors every `add_node`/`modify_node`/`delete_node`/`add_edge`/
/// `modify_edge`/`delete_edge` on a primary [`Mesh`] into an internal
/// [`Cdt`], vetoing primary mutations that would produce crossing
/// constraints.
///
/// Holds its state behind `Rc<RefCell<_>>` because the mesh's hook closures
/// need independent access to it while `ShadowCdt` itself stays alive for
/// the caller to query `check_*` through.
pub struct ShadowCdt {
    inner: Rc<RefCell<Inner>>,
}

impl ShadowCdt {
    /// Attaches a new shadow to `mesh`, subscribing to all six mutation
    /// hooks. The shadow starts empty; it only sees mutations from this
    /// point forward.
    pub fn attach(mesh: &mut Mesh) -> Self {
        let inner = Rc::new(RefCell::new(Inner { cdt: Cdt::new(), map: HashMap::new() }));

        let after_add_node = Rc::clone(&inner);
        mesh.subscribe_after(
            MeshOp::AddNode,
            Box::new(move |ev| {
                if let MeshEvent::AfterAddNode { id, x } = ev {
                    let mut st = after_add_node.borrow_mut();
                    let shadow_id = st.cdt.add_node(*x, None).expect("shadow add_node cannot fail for a fresh point");
                    st.map.insert(*id, shadow_id);
                }
            }),
        );

        let before_modify_node = Rc::clone(&inner);
        mesh.subscribe_before(
            MeshOp::ModifyNode,
            Box::new(move |ev| {
                if let MeshEvent::BeforeModifyNode { id, new_x } = ev {
                    let mut st = before_modify_node.borrow_mut();
                    let shadow_id = *st.map.get(id).expect("shadow mapping must cover every live primary node");
                    st.cdt
                        .modify_node(shadow_id, *new_x)
                        .map_err(|e| crate::mesh::HookError(format!("shadow veto: {e}")))?;
                }
                Ok(())
            }),
        );

        let after_delete_node = Rc::clone(&inner);
        mesh.subscribe_after(
            MeshOp::DeleteNode,
            Box::new(move |ev| {
                if let MeshEvent::AfterDeleteNode { id } = ev {
                    let mut st = after_delete_node.borrow_mut();
                    let shadow_id = st.map.remove(id).expect("shadow mapping must cover every live primary node");
                    st.cdt.delete_node(shadow_id).expect("shadow delete_node cannot fail for a mirrored node");
                }
            }),
        );

        let before_add_edge = Rc::clone(&inner);
        mesh.subscribe_before(
            MeshOp::AddEdge,
            Box::new(move |ev| {
                if let MeshEvent::BeforeAddEdge { n0, n1 } = ev {
                    let mut st = before_add_edge.borrow_mut();
                    let (m0, m1) = (
                        *st.map.get(n0).expect("shadow mapping must cover every live primary node"),
                        *st.map.get(n1).expect("shadow mapping must cover every live primary node"),
                    );
                    st.cdt.add_constraint(m0, m1).map_err(|e| crate::mesh::HookError(format!("shadow veto: {e}")))?;
                }
                Ok(())
            }),
        );

        let before_modify_edge = Rc::clone(&inner);
        mesh.subscribe_before(
            MeshOp::ModifyEdge,
            Box::new(move |ev| {
                if let MeshEvent::BeforeModifyEdge { old_nodes, new_nodes, .. } = ev {
                    let mut st = before_modify_edge.borrow_mut();
                    let (old0, old1) = (
                        *st.map.get(&old_nodes.0).expect("shadow mapping must cover every live primary node"),
                        *st.map.get(&old_nodes.1).expect("shadow mapping must cover every live primary node"),
                    );
                    st.cdt.remove_constraint(old0, old1).expect("shadow had the constrained edge being modified");

                    let (new0, new1) = (
                        *st.map.get(&new_nodes.0).expect("shadow mapping must cover every live primary node"),
                        *st.map.get(&new_nodes.1).expect("shadow mapping must cover every live primary node"),
                    );
                    if let Err(e) = st.cdt.add_constraint(new0, new1) {
                        st.cdt.add_constraint(old0, old1).expect("restoring the original constraint must succeed");
                        return Err(crate::mesh::HookError(format!("shadow veto: {e}")));
                    }
                }
                Ok(())
            }),
        );

        let after_delete_edge = Rc::clone(&inner);
        mesh.subscribe_after(
            MeshOp::DeleteEdge,
            Box::new(move |ev| {
                if let MeshEvent::AfterDeleteEdge { n0, n1, .. } = ev {
                    let mut st = after_delete_edge.borrow_mut();
                    let (m0, m1) = (
                        *st.map.get(n0).expect("shadow mapping must cover every live primary node"),
                        *st.map.get(n1).expect("shadow mapping must cover every live primary node"),
                    );
                    st.cdt.remove_constraint(m0, m1).expect("shadow had the constrained edge being deleted");
                }
            }),
        );

        Self { inner }
    }

    /// Number of nodes currently mirrored (for the `shadow_of` bijection
    /// property: should equal the primary mesh's live node count at every
    /// quiescent point).
    pub fn node_count(&self) -> usize {
        self.inner.borrow().map.len()
    }

    pub fn shadow_of(&self, primary: NodeId) -> Option<NodeId> {
        self.inner.borrow().map.get(&primary).copied()
    }

    pub fn check_local_delaunay(&self) -> Vec<crate::mesh::EdgeId> {
        self.inner.borrow().cdt.check_local_delaunay()
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;

    use super::*;

    #[test]
    fn shadow_mirrors_node_additions() {
        let mut mesh = Mesh::new();
        let shadow = ShadowCdt::attach(&mut mesh);
        let n0 = mesh.add_node(Point2::new(0.0, 0.0)).unwrap();
        let n1 = mesh.add_node(Point2::new(1.0, 0.0)).unwrap();
        assert_eq!(shadow.node_count(), 2);
        assert!(shadow.shadow_of(n0).is_some());
        assert!(shadow.shadow_of(n1).is_some());
    }

    #[test]
    fn shadow_mirrors_constrained_edges() {
        let mut mesh = Mesh::new();
        let shadow = ShadowCdt::attach(&mut mesh);
        let n0 = mesh.add_node(Point2::new(0.0, 0.0)).unwrap();
        let n1 = mesh.add_node(Point2::new(1.0, 0.0)).unwrap();
        mesh.add_edge(n0, n1).unwrap();
        let (m0, m1) = (shadow.shadow_of(n0).unwrap(), shadow.shadow_of(n1).unwrap());
        assert!(shadow.inner.borrow().cdt.mesh().nodes_to_edge(m0, m1).is_some());
    }
}
