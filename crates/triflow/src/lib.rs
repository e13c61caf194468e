//! Incremental exact constrained Delaunay triangulation and an
//! advancing-front triangular mesher built on top of it.
//!
//! The crate is organized bottom-up:
//! - [`predicates`] — exact orientation/incircle tests (thin wrapper over
//!   the `robust` adaptive-precision routines).
//! - [`mesh`] — the arena-backed node/edge/cell container with tombstones,
//!   halfedge navigation and a pub/sub mutation-event system.
//! - [`cdt`] — point location, insertion, edge flipping, deletion, hole
//!   filling, and constraint insertion/removal on top of [`mesh`].
//! - [`shadow`] — a secondary CDT mirrored off a primary mesh's events.
//! - [`curve`] — piecewise-linear parameterized boundary curves.
//! - [`cost`] — the per-node quality penalty used during optimization.
//! - [`front`] — the advancing-front scheduler and its Wall/Cutoff/Join
//!   strategies.

pub mod cdt;
pub mod cost;
pub mod curve;
pub mod front;
pub mod mesh;
pub mod predicates;
pub mod sentinel;
pub mod shadow;
pub mod tol;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::{Point2, Vector2};

/// Common imports for callers driving a triangulation end to end.
pub mod prelude {
    pub use crate::cdt::{Cdt, CdtError};
    pub use crate::curve::{Curve, CurveError};
    pub use crate::front::Driver;
    pub use crate::mesh::{CellId, EdgeId, Fixed, Mesh, NodeId};
    pub use crate::sentinel::{INF_CELL, INF_NODE, UNDEFINED, UNMESHED};
    pub use crate::tol::{AdvancingFrontCfg, GeomTol};
    pub use nalgebra::{Point2, Vector2};
}
