//! Devillers boundary-completion hole filling.

use crate::mesh::{Mesh, NodeId};
use crate::predicates::{incircle, orientation};

/// One position in a hole boundary: either a real node, or the sentinel
/// standing in for "the convex-hull exterior".
#[derive(Clone, Copy, Debug)]
pub(crate) enum HoleEntry {
    Node(NodeId),
    Inf,
}

/// Re-triangulates one or more hole boundaries using a stack of loops, each
/// split recursively around its Delaunay-optimal third vertex. Terminates
/// because each split strictly shortens every pushed loop.
pub(crate) fn fill_hole(mesh: &mut Mesh, loop0: Vec<HoleEntry>) {
    let mut stack = vec![loop0];

    while let Some(loop_) = stack.pop() {
        if loop_.len() < 3 {
            continue;
        }

        let n = loop_.len();
        let rot = (0..n)
            .find(|&i| matches!(loop_[i], HoleEntry::Node(_)) && matches!(loop_[(i + 1) % n], HoleEntry::Node(_)))
            .expect("a hole boundary has at least one real edge between two nodes");
        let rotated: Vec<HoleEntry> = (0..n).map(|i| loop_[(rot + i) % n]).collect();

        let a = match rotated[0] {
            HoleEntry::Node(x) => x,
            HoleEntry::Inf => unreachable!("rotation guarantees a real node at position 0"),
        };
        let b = match rotated[1] {
            HoleEntry::Node(x) => x,
            HoleEntry::Inf => unreachable!("rotation guarantees a real node at position 1"),
        };
        let (pa, pb) = (mesh.node_x(a), mesh.node_x(b));

        let mut saw_inf = false;
        let mut candidates: Vec<(usize, NodeId)> = Vec::new();
        for (idx, entry) in rotated.iter().enumerate().skip(2) {
            match entry {
                HoleEntry::Inf => saw_inf = true,
                HoleEntry::Node(c) => {
                    if orientation(pa, pb, mesh.node_x(*c)).sign() > 0 {
                        candidates.push((idx, *c));
                    }
                }
            }
        }

        if candidates.is_empty() {
            debug_assert!(saw_inf, "hole boundary with no viable third vertex and no hull marker");
            continue;
        }

        // First-seen Delaunay-optimal tie-break.
        let (idx_c, c) = candidates
            .iter()
            .copied()
            .find(|&(_, c)| {
                let pc = mesh.node_x(c);
                !candidates
                    .iter()
                    .any(|&(_, d)| d != c && incircle(pa, pb, pc, mesh.node_x(d)).sign() > 0)
            })
            .expect("a non-empty candidate set always has a Delaunay-optimal vertex");

        if mesh.nodes_to_edge(a, c).is_none() {
            mesh.add_edge(a, c).expect("add_edge on existing nodes cannot be vetoed here");
        }
        if mesh.nodes_to_edge(c, b).is_none() {
            mesh.add_edge(c, b).expect("add_edge on existing nodes cannot be vetoed here");
        }
        mesh.add_cell(a, b, c).expect("add_cell on existing nodes cannot be vetoed here");

        // The new triangle (a,b,c) splits the remaining boundary in two: the
        // b..c run (closed by the new edge (c,b)) and the c..a run (closed
        // by the new edge (a,c)). Either run can already be a bare edge
        // rather than a real hole, so the four cases below are: both sides
        // degenerate (finished), only one side left, or both sides real.
        let left: Vec<HoleEntry> = rotated[1..=idx_c].to_vec();
        let mut right: Vec<HoleEntry> = rotated[idx_c..].to_vec();
        right.push(HoleEntry::Node(a));

        match (left.len() >= 3, right.len() >= 3) {
            (false, false) => {}
            (true, false) => stack.push(left),
            (false, true) => stack.push(right),
            (true, true) => {
                stack.push(left);
                stack.push(right);
            }
        }
    }
}
