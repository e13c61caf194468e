//! End-to-end seed scenarios exercising the CDT and the advancing-front
//! driver together on small, hand-checkable inputs.

use triflow::cdt::Cdt;
use triflow::curve::Curve;
use triflow::front::Driver;
use triflow::mesh::EdgeId;
use triflow::sentinel::UNMESHED;
use triflow::Point2;

/// S1: a unit square triangulates into 2 cells, both locally Delaunay.
#[test]
fn unit_square_triangulates_into_two_cells() {
    let mut cdt = Cdt::new();
    cdt.add_node(Point2::new(0.0, 0.0), None).unwrap();
    cdt.add_node(Point2::new(1.0, 0.0), None).unwrap();
    cdt.add_node(Point2::new(0.0, 1.0), None).unwrap();
    cdt.add_node(Point2::new(1.0, 1.0), None).unwrap();

    assert_eq!(cdt.mesh().cell_count(), 2);
    assert!(cdt.check_local_delaunay().is_empty());
}

/// S2: constraining one diagonal of the square leaves it present and
/// constrained, and the other diagonal absent.
#[test]
fn constraining_one_diagonal_leaves_the_other_absent() {
    let mut cdt = Cdt::new();
    let n0 = cdt.add_node(Point2::new(0.0, 0.0), None).unwrap();
    let n1 = cdt.add_node(Point2::new(1.0, 0.0), None).unwrap();
    let n2 = cdt.add_node(Point2::new(0.0, 1.0), None).unwrap();
    let n3 = cdt.add_node(Point2::new(1.0, 1.0), None).unwrap();

    cdt.add_constraint(n0, n3).unwrap();
    let he = cdt.mesh().nodes_to_edge(n0, n3).expect("diagonal (0,0)-(1,1) must exist");
    assert!(cdt.mesh().edge_constrained(he.edge));
    assert!(cdt.mesh().nodes_to_edge(n1, n2).is_none());
}

/// S3: three collinear points then an off-line point walks dim 0 -> 1 -> 1 -> 2
/// and leaves a single triangle.
#[test]
fn collinear_chain_then_off_line_point_yields_two_triangles() {
    let mut cdt = Cdt::new();
    cdt.add_node(Point2::new(0.0, 0.0), None).unwrap();
    assert_eq!(cdt.mesh().dim(), 0);
    cdt.add_node(Point2::new(1.0, 0.0), None).unwrap();
    assert_eq!(cdt.mesh().dim(), 1);
    cdt.add_node(Point2::new(2.0, 0.0), None).unwrap();
    assert_eq!(cdt.mesh().dim(), 1);
    cdt.add_node(Point2::new(1.0, 1.0), None).unwrap();
    assert_eq!(cdt.mesh().dim(), 2);
    assert_eq!(cdt.mesh().cell_count(), 2);
}

/// S4: `distance_away` on a 10x10 square perimeter walks 5 units from the
/// origin corner, landing halfway along the first edge.
#[test]
fn distance_away_on_a_square_perimeter() {
    let curve = Curve::new(
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ],
        true,
    )
    .unwrap();

    let (f1, p1) = curve.distance_away(0.0, 5.0).unwrap();
    assert!((f1 - 5.0).abs() < 0.25);
    assert!((p1 - Point2::new(5.0, 0.0)).norm() < 0.25);
}

/// S5: driving a 10x10 square with scale=2.0 seeds ~20 boundary nodes and
/// the advancing-front loop closes the whole interior with no `UNMESHED`
/// side left.
#[test]
fn advancing_front_closes_a_square_with_no_unmeshed_edges_left() {
    let curve = Curve::new(
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ],
        true,
    )
    .unwrap();

    let mut driver = Driver::new(|_| 2.0);
    driver.add_curve(curve);
    driver.initialize_boundaries().unwrap();
    assert!((driver.mesh().node_count() as i64 - 20).abs() <= 4);

    driver.run(None).unwrap();

    let remaining_unmeshed: Vec<EdgeId> =
        driver.mesh().live_edge_ids().filter(|&e| driver.mesh().edge_to_cells(e).contains(&UNMESHED)).collect();
    assert!(remaining_unmeshed.is_empty());
    assert!(driver.mesh().cell_count() > 0);
}

/// S6: `modify_node` on an interior node with two constraints preserves
/// both constraints, and rolls back cleanly if the move would cross
/// another constrained edge.
#[test]
fn modify_node_preserves_constraints_and_rolls_back_on_conflict() {
    let mut cdt = Cdt::new();
    let center = cdt.add_node(Point2::new(0.0, 0.0), None).unwrap();
    let left = cdt.add_node(Point2::new(-2.0, 0.0), None).unwrap();
    let right = cdt.add_node(Point2::new(2.0, 0.0), None).unwrap();
    let fence_top = cdt.add_node(Point2::new(5.0, 2.0), None).unwrap();
    let fence_bottom = cdt.add_node(Point2::new(5.0, -2.0), None).unwrap();

    cdt.add_constraint(left, center).unwrap();
    cdt.add_constraint(center, right).unwrap();
    cdt.add_constraint(fence_top, fence_bottom).unwrap();

    let original = cdt.mesh().node_x(center);
    // Moving center past x=5 forces its re-added constraints to cross the
    // unrelated fence_top-fence_bottom constraint.
    let err = cdt.modify_node(center, Point2::new(6.0, 0.0)).unwrap_err();
    assert!(err.is_bad_constraint());
    assert_eq!(cdt.mesh().node_x(center), original);
    assert!(cdt.mesh().nodes_to_edge(left, center).map(|he| cdt.mesh().edge_constrained(he.edge)).unwrap_or(false));
    assert!(cdt.mesh().nodes_to_edge(center, right).map(|he| cdt.mesh().edge_constrained(he.edge)).unwrap_or(false));

    cdt.modify_node(center, Point2::new(0.1, 0.1)).unwrap();
    assert!(cdt.mesh().nodes_to_edge(left, center).map(|he| cdt.mesh().edge_constrained(he.edge)).unwrap_or(false));
    assert!(cdt.mesh().nodes_to_edge(center, right).map(|he| cdt.mesh().edge_constrained(he.edge)).unwrap_or(false));
}
