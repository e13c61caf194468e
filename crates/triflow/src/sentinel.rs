//! Sentinel values for adjacency slots.
//!
//! Distinct negative ids so that a bug that mixes them up (e.g. treating
//! "not yet meshed" as "will never be meshed") fails loudly instead of
//! silently aliasing.

use crate::mesh::CellId;

/// Cell id meaning "outside the convex hull" — a finite edge with this in
/// one of its cell slots is a hull boundary edge. Kept distinct from plain
/// `-1` so a bug that forgets to special-case "no cell yet" can't
/// silently alias it with "provably outside the hull".
pub const INF_CELL: CellId = CellId(-2);

/// Reserved node id for the conceptual point at infinity. Never actually
/// stored; predicates and `locate` never dereference it.
pub const INF_NODE: i64 = -666;

/// Adjacency slot meaning "not yet meshed" — the advancing front still owns
/// this side of the edge.
pub const UNMESHED: CellId = CellId(-3);

/// Adjacency slot meaning "will never be meshed" (outside the domain,
/// e.g. the exterior side of a boundary edge once the front has closed).
pub const UNDEFINED: CellId = CellId(-4);
