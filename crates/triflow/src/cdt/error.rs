//! CDT error kinds.

use std::fmt;

use crate::mesh::{EdgeId, NodeId};

/// Errors raised by [`super::Cdt`]'s public operations.
#[derive(Clone, Debug, PartialEq)]
pub enum CdtError {
    /// Insertion target coincides with an existing node.
    DuplicateNode { at: NodeId },
    /// A third node lies on the interior of a requested constrained edge;
    /// caller must split the edge first.
    ConstraintCollinearNode { n_a: NodeId, n_b: NodeId, collinear: NodeId },
    /// A requested constrained edge crosses an existing one.
    IntersectingConstraints { n_a: NodeId, n_b: NodeId, crossed: EdgeId },
    /// A strategy's preconditions were not met; the caller should try the
    /// next-best strategy rather than treat this as fatal.
    StrategyFailed { reason: String },
    /// `post_check` found an invariant violation after a mutating call.
    GridException { detail: String },
}

impl CdtError {
    /// True for the two "bad constraint" variants; Rust enums don't nest a
    /// nameable `BadConstraint` supertype over just these two, so this is a
    /// predicate instead.
    pub fn is_bad_constraint(&self) -> bool {
        matches!(self, CdtError::ConstraintCollinearNode { .. } | CdtError::IntersectingConstraints { .. })
    }
}

impl fmt::Display for CdtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CdtError::DuplicateNode { at } => write!(f, "duplicate node at existing node {at:?}"),
            CdtError::ConstraintCollinearNode { n_a, n_b, collinear } => {
                write!(f, "node {collinear:?} lies collinear between {n_a:?} and {n_b:?}")
            }
            CdtError::IntersectingConstraints { n_a, n_b, crossed } => {
                write!(f, "constraint ({n_a:?},{n_b:?}) crosses existing constrained edge {crossed:?}")
            }
            CdtError::StrategyFailed { reason } => write!(f, "strategy failed: {reason}"),
            CdtError::GridException { detail } => write!(f, "grid invariant violated: {detail}"),
        }
    }
}

impl std::error::Error for CdtError {}

impl From<crate::mesh::HookError> for CdtError {
    fn from(e: crate::mesh::HookError) -> Self {
        CdtError::GridException { detail: e.0 }
    }
}
