//! Round-trip tests: delete-then-reinsert and constrain-then-unconstrain
//! both return the mesh to an equivalent Delaunay state.

use triflow::cdt::Cdt;
use triflow::Point2;

/// R1: inserting a set of points, deleting them all, then reinserting in a
/// different order yields the same final point set and a valid, fully
/// Delaunay triangulation.
#[test]
fn delete_all_then_reinsert_in_another_order_is_still_delaunay() {
    let pts = [
        Point2::new(0.0, 0.0),
        Point2::new(4.0, 0.0),
        Point2::new(4.0, 3.0),
        Point2::new(1.0, 2.0),
        Point2::new(0.0, 4.0),
    ];

    let mut cdt = Cdt::new();
    let ids: Vec<_> = pts.iter().map(|&p| cdt.add_node(p, None).unwrap()).collect();
    for id in ids {
        cdt.delete_node(id).unwrap();
    }
    assert_eq!(cdt.mesh().dim(), -1);

    for &p in pts.iter().rev() {
        cdt.add_node(p, None).unwrap();
    }
    assert_eq!(cdt.mesh().node_count(), pts.len());
    assert!(cdt.check_local_delaunay().is_empty());
    assert!(cdt.check_global_delaunay().is_empty());
}

/// R2: adding then removing a constraint yields a mesh satisfying the full
/// Delaunay property (the flips suppressed while the edge was constrained
/// get a chance to happen once it's freed).
#[test]
fn add_then_remove_constraint_restores_full_delaunay() {
    let mut cdt = Cdt::new();
    let a = cdt.add_node(Point2::new(0.0, 0.0), None).unwrap();
    let b = cdt.add_node(Point2::new(1.0, 0.0), None).unwrap();
    let c = cdt.add_node(Point2::new(1.0, 1.0), None).unwrap();
    let d = cdt.add_node(Point2::new(0.0, 1.0), None).unwrap();

    cdt.add_constraint(a, c).unwrap();
    cdt.remove_constraint(a, c).unwrap();

    assert!(cdt.check_local_delaunay().is_empty());
    assert!(cdt.check_global_delaunay().is_empty());
    let _ = (b, d);
}
