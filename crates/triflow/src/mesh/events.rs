//! Mutation pub/sub: the shadow CDT attaches to a primary mesh with
//! enum-keyed pre/post hooks rather than through a base-class override, so
//! the primary mesh stays ignorant of who, if anyone, is listening.

use std::fmt;

use nalgebra::Point2;

use super::types::{CellId, EdgeId, NodeId};

/// One mutating operation on a [`super::Mesh`]. Subscriptions are keyed by
/// this enum rather than by a string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshOp {
    AddNode,
    ModifyNode,
    DeleteNode,
    AddEdge,
    ModifyEdge,
    DeleteEdge,
}

/// Payload passed to hooks. "Before" events describe the mutation about to
/// happen; "after" events describe what happened, firing once new ids are
/// known.
#[derive(Clone, Debug)]
pub enum MeshEvent {
    BeforeAddNode { x: Point2<f64> },
    AfterAddNode { id: NodeId, x: Point2<f64> },
    BeforeModifyNode { id: NodeId, new_x: Point2<f64> },
    AfterModifyNode { id: NodeId, old_x: Point2<f64>, new_x: Point2<f64> },
    BeforeDeleteNode { id: NodeId },
    AfterDeleteNode { id: NodeId },
    BeforeAddEdge { n0: NodeId, n1: NodeId },
    AfterAddEdge { id: EdgeId, n0: NodeId, n1: NodeId },
    BeforeModifyEdge { id: EdgeId, old_nodes: (NodeId, NodeId), new_nodes: (NodeId, NodeId) },
    AfterModifyEdge { id: EdgeId, old_nodes: (NodeId, NodeId), new_nodes: (NodeId, NodeId) },
    BeforeDeleteEdge { id: EdgeId, n0: NodeId, n1: NodeId },
    AfterDeleteEdge { id: EdgeId, n0: NodeId, n1: NodeId },
}

impl MeshEvent {
    pub fn op(&self) -> MeshOp {
        match self {
            MeshEvent::BeforeAddNode { .. } | MeshEvent::AfterAddNode { .. } => MeshOp::AddNode,
            MeshEvent::BeforeModifyNode { .. } | MeshEvent::AfterModifyNode { .. } => MeshOp::ModifyNode,
            MeshEvent::BeforeDeleteNode { .. } | MeshEvent::AfterDeleteNode { .. } => MeshOp::DeleteNode,
            MeshEvent::BeforeAddEdge { .. } | MeshEvent::AfterAddEdge { .. } => MeshOp::AddEdge,
            MeshEvent::BeforeModifyEdge { .. } | MeshEvent::AfterModifyEdge { .. } => MeshOp::ModifyEdge,
            MeshEvent::BeforeDeleteEdge { .. } | MeshEvent::AfterDeleteEdge { .. } => MeshOp::DeleteEdge,
        }
    }
}

/// Raised by a "before" hook to veto the mutation it was called for.
#[derive(Clone, Debug)]
pub struct HookError(pub String);

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for HookError {}

type BeforeHook = Box<dyn FnMut(&MeshEvent) -> Result<(), HookError>>;
type AfterHook = Box<dyn FnMut(&MeshEvent)>;

/// Per-mesh registry of before/after callback lists, invoked synchronously
/// and in subscription order.
#[derive(Default)]
pub struct EventBus {
    before: Vec<(MeshOp, BeforeHook)>,
    after: Vec<(MeshOp, AfterHook)>,
}

impl EventBus {
    pub fn subscribe_before(&mut self, op: MeshOp, hook: BeforeHook) {
        self.before.push((op, hook));
    }

    pub fn subscribe_after(&mut self, op: MeshOp, hook: AfterHook) {
        self.after.push((op, hook));
    }

    pub(crate) fn fire_before(&mut self, ev: &MeshEvent) -> Result<(), HookError> {
        let op = ev.op();
        for (sub_op, hook) in self.before.iter_mut() {
            if *sub_op == op {
                hook(ev)?;
            }
        }
        Ok(())
    }

    pub(crate) fn fire_after(&mut self, ev: &MeshEvent) {
        let op = ev.op();
        for (sub_op, hook) in self.after.iter_mut() {
            if *sub_op == op {
                hook(ev);
            }
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("before_subscribers", &self.before.len())
            .field("after_subscribers", &self.after.len())
            .finish()
    }
}
