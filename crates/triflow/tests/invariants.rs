//! Property tests over random insertion/deletion sequences: every finite
//! cell stays CCW, unconstrained edges stay locally Delaunay, and the
//! shadow CDT's node mapping stays a bijection.

use proptest::prelude::*;
use triflow::cdt::Cdt;
use triflow::mesh::Mesh;
use triflow::predicates::{orientation, Orientation};
use triflow::shadow::ShadowCdt;
use triflow::Point2;

fn all_cells_ccw(mesh: &Mesh) -> bool {
    mesh.live_cell_ids().all(|c| {
        let [a, b, d] = mesh.cell_to_nodes(c);
        orientation(mesh.node_x(a), mesh.node_x(b), mesh.node_x(d)) != Orientation::Right
    })
}

fn arb_points(max_n: usize) -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-50.0..50.0f64, -50.0..50.0f64), 0..max_n)
}

proptest! {
    /// P1: every finite cell is CCW after any sequence of insertions.
    #[test]
    fn all_cells_are_ccw_after_random_insertions(pts in arb_points(40)) {
        let mut cdt = Cdt::new();
        for (x, y) in pts {
            let _ = cdt.add_node(Point2::new(x, y), None);
        }
        prop_assert!(all_cells_ccw(cdt.mesh()));
    }

    /// P2/P4: unconstrained edges stay locally Delaunay after any sequence
    /// of insertions (no constraints to exempt an edge from the check).
    #[test]
    fn unconstrained_triangulation_stays_locally_delaunay(pts in arb_points(40)) {
        let mut cdt = Cdt::new();
        for (x, y) in pts {
            let _ = cdt.add_node(Point2::new(x, y), None);
        }
        prop_assert!(cdt.check_local_delaunay().is_empty());
        prop_assert!(cdt.check_global_delaunay().is_empty());
    }

    /// P5: the shadow's `shadow_of` mapping stays a bijection over live
    /// nodes as nodes are added and deleted on the primary mesh.
    #[test]
    fn shadow_mapping_stays_a_bijection(pts in arb_points(30)) {
        let mut mesh = Mesh::new();
        let shadow = ShadowCdt::attach(&mut mesh);
        let mut added = Vec::new();
        for (x, y) in pts {
            if let Ok(n) = mesh.add_node(Point2::new(x, y)) {
                added.push(n);
            }
        }
        prop_assert_eq!(shadow.node_count(), mesh.node_count());
        for n in added {
            prop_assert!(shadow.shadow_of(n).is_some());
        }
    }
}
