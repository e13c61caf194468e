//! Boundary-case tests: dimensional promotion, on-edge insertion, duplicate
//! rejection, and the two "bad constraint" failure modes.

use triflow::cdt::{Cdt, CdtError};
use triflow::Point2;

/// B1: inserting the 1st, 2nd, 3rd non-collinear points promotes dim -1 -> 0 -> 1 -> 2.
#[test]
fn dim_walks_up_as_non_collinear_points_are_inserted() {
    let mut cdt = Cdt::new();
    assert_eq!(cdt.mesh().dim(), -1);
    cdt.add_node(Point2::new(0.0, 0.0), None).unwrap();
    assert_eq!(cdt.mesh().dim(), 0);
    cdt.add_node(Point2::new(1.0, 0.0), None).unwrap();
    assert_eq!(cdt.mesh().dim(), 1);
    cdt.add_node(Point2::new(0.0, 1.0), None).unwrap();
    assert_eq!(cdt.mesh().dim(), 2);
}

/// B2: inserting a point exactly on an existing edge splits the two
/// triangles bordering it into four.
#[test]
fn inserting_on_an_edge_splits_both_bordering_cells() {
    let mut cdt = Cdt::new();
    cdt.add_node(Point2::new(0.0, 0.0), None).unwrap();
    cdt.add_node(Point2::new(2.0, 0.0), None).unwrap();
    cdt.add_node(Point2::new(1.0, 1.0), None).unwrap();
    cdt.add_node(Point2::new(1.0, -1.0), None).unwrap();
    assert_eq!(cdt.mesh().cell_count(), 2);

    cdt.add_node(Point2::new(1.0, 0.0), None).unwrap();
    assert_eq!(cdt.mesh().cell_count(), 4);
}

/// B3: inserting a duplicate node raises `DuplicateNode`.
#[test]
fn inserting_a_duplicate_node_is_rejected() {
    let mut cdt = Cdt::new();
    let n = cdt.add_node(Point2::new(3.0, 4.0), None).unwrap();
    let err = cdt.add_node(Point2::new(3.0, 4.0), None).unwrap_err();
    assert_eq!(err, CdtError::DuplicateNode { at: n });
}

/// B4: a constraint across a collinear node raises `ConstraintCollinearNode`.
#[test]
fn constraint_across_a_collinear_node_is_rejected() {
    let mut cdt = Cdt::new();
    let a = cdt.add_node(Point2::new(0.0, 0.0), None).unwrap();
    let m = cdt.add_node(Point2::new(1.0, 0.0), None).unwrap();
    let b = cdt.add_node(Point2::new(2.0, 0.0), None).unwrap();
    cdt.add_node(Point2::new(1.0, 1.0), None).unwrap();
    cdt.add_node(Point2::new(1.0, -1.0), None).unwrap();

    let err = cdt.add_constraint(a, b).unwrap_err();
    assert!(err.is_bad_constraint());
    match err {
        CdtError::ConstraintCollinearNode { collinear, .. } => assert_eq!(collinear, m),
        other => panic!("expected ConstraintCollinearNode, got {other:?}"),
    }
}

/// B5: two crossing constraint requests - the second raises `IntersectingConstraints`.
#[test]
fn crossing_constraints_are_rejected() {
    let mut cdt = Cdt::new();
    let a = cdt.add_node(Point2::new(0.0, 0.0), None).unwrap();
    let b = cdt.add_node(Point2::new(1.0, 1.0), None).unwrap();
    let c = cdt.add_node(Point2::new(1.0, 0.0), None).unwrap();
    let d = cdt.add_node(Point2::new(0.0, 1.0), None).unwrap();

    cdt.add_constraint(a, b).unwrap();
    let err = cdt.add_constraint(c, d).unwrap_err();
    assert!(err.is_bad_constraint());
    assert!(matches!(err, CdtError::IntersectingConstraints { .. }));
}
