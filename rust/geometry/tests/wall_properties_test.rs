// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Whole-floor wall synthesis over a layout whose rows do not line up.
//!
//! ```text
//!   0     4   6 7          12
//! 0 +-----+-----+----------+
//!   |  a  |  b  |    c     |
//! 3 +-----+-+---+----------+
//!   |   d   |       e      |
//! 7 +-------+--------------+
//! ```

use std::sync::Arc;

use approx::assert_relative_eq;
use floorplan_core::{
    Axis, Bounds, Config, Diagnostics, Location, Rect, ResolvedFloor, ResolvedRoom, Style,
    WallDirection, Walls,
};
use floorplan_geometry::{
    build_wall_plans, calculate_wall_overlap, detect_adjacencies, wall_owner, WallPlan,
};

fn room(id: &str, x: f64, y: f64, w: f64, h: f64) -> ResolvedRoom {
    ResolvedRoom {
        id: id.into(),
        label: None,
        parent: None,
        bounds: Bounds::Rect(Rect::new(x, y, w, h)),
        walls: Walls::default(),
        height: 3.0,
        elevation: 0.0,
        absolute_elevation: 0.0,
        style: Arc::new(Style::fallback()),
        explicit_style: false,
        stacks_above: None,
    }
}

fn layout() -> ResolvedFloor {
    ResolvedFloor {
        id: "ground".into(),
        index: 0,
        elevation: 0.0,
        height: 3.0,
        rooms: vec![
            room("a", 0.0, 0.0, 4.0, 3.0),
            room("b", 4.0, 0.0, 3.0, 3.0),
            room("c", 7.0, 0.0, 5.0, 3.0),
            room("d", 0.0, 3.0, 6.0, 4.0),
            room("e", 6.0, 3.0, 6.0, 4.0),
        ],
    }
}

fn plans(floor: &ResolvedFloor) -> Vec<WallPlan> {
    let mut diags = Diagnostics::new();
    let adjacencies = detect_adjacencies(floor, &mut diags);
    let plans = build_wall_plans(floor, &adjacencies, &Config::default(), &mut diags).unwrap();
    assert!(diags.is_empty(), "{:?}", diags);
    plans
}

fn plan<'p>(plans: &'p [WallPlan], room: &str, wall: WallDirection) -> &'p WallPlan {
    plans
        .iter()
        .find(|p| p.room == room && p.wall == wall)
        .unwrap()
}

#[test]
fn test_each_boundary_emitted_once() {
    let floor = layout();
    let mut diags = Diagnostics::new();
    let adjacencies = detect_adjacencies(&floor, &mut diags);
    // a|b, b|c, d|e, a/d, b/d, b/e, c/e seen from both sides.
    assert_eq!(adjacencies.len(), 14);

    let plans = plans(&floor);
    let shared: Vec<_> = plans
        .iter()
        .flat_map(|p| &p.segments)
        .filter(|s| s.neighbor.is_some())
        .collect();
    assert_eq!(shared.len(), 7);

    let mut pairs: Vec<(String, String)> = shared
        .iter()
        .map(|s| (s.owner.clone(), s.neighbor.clone().unwrap_or_default()))
        .collect();
    pairs.sort();
    let expected: Vec<(String, String)> = [
        ("a", "b"),
        ("a", "d"),
        ("b", "c"),
        ("b", "d"),
        ("b", "e"),
        ("c", "e"),
        ("d", "e"),
    ]
    .iter()
    .map(|(o, n)| (o.to_string(), n.to_string()))
    .collect();
    assert_eq!(pairs, expected);
}

#[test]
fn test_upper_row_owns_the_seam() {
    let plans = plans(&layout());

    let b_bottom = plan(&plans, "b", WallDirection::Bottom);
    let ranges: Vec<(f64, f64)> = b_bottom.segments.iter().map(|s| (s.start, s.end)).collect();
    assert_eq!(ranges, vec![(4.0, 6.0), (6.0, 7.0)]);

    let d_top = plan(&plans, "d", WallDirection::Top);
    assert!(d_top.segments.is_empty());
    let deferred: Vec<&str> = d_top.deferred.iter().map(|d| d.owner.as_str()).collect();
    assert_eq!(deferred, vec!["a", "b"]);
}

#[test]
fn test_every_wall_fully_covered() {
    let plans = plans(&layout());
    assert_eq!(plans.len(), 5 * 4);

    for plan in &plans {
        let ranges = plan.covered_ranges();
        assert!(!ranges.is_empty(), "{}.{} has no coverage", plan.room, plan.wall);
        assert_relative_eq!(ranges[0].0, plan.start, epsilon = 1e-9);
        for pair in ranges.windows(2) {
            assert_relative_eq!(pair[0].1, pair[1].0, epsilon = 1e-9);
        }
        assert_relative_eq!(ranges[ranges.len() - 1].1, plan.end, epsilon = 1e-9);
    }
}

#[test]
fn test_exterior_walls_have_no_neighbor() {
    let plans = plans(&layout());
    let a_top = plan(&plans, "a", WallDirection::Top);
    assert_eq!(a_top.segments.len(), 1);
    assert!(a_top.segments[0].neighbor.is_none());

    // e's right wall is exterior; its bottom too.
    for wall in [WallDirection::Right, WallDirection::Bottom] {
        let p = plan(&plans, "e", wall);
        assert!(p.segments.iter().all(|s| s.neighbor.is_none()));
        assert!(p.deferred.is_empty());
    }
}

#[test]
fn test_ownership_independent_of_order() {
    let floor = layout();
    let location = Location::floor("ground");
    for a in &floor.rooms {
        for b in &floor.rooms {
            if a.id == b.id {
                continue;
            }
            for axis in [Axis::Vertical, Axis::Horizontal] {
                match (
                    wall_owner(a, b, axis, &location),
                    wall_owner(b, a, axis, &location),
                ) {
                    (Ok(x), Ok(y)) => assert_eq!(x.id, y.id),
                    (Err(x), Err(y)) => assert_eq!(x, y),
                    other => panic!("order-dependent ownership: {:?}", other),
                }
            }
        }
    }
}

#[test]
fn test_overlap_symmetric() {
    let floor = layout();
    for a in &floor.rooms {
        for b in &floor.rooms {
            let (ra, rb) = (a.rect().unwrap(), b.rect().unwrap());
            for axis in [Axis::Vertical, Axis::Horizontal] {
                assert_eq!(
                    calculate_wall_overlap(ra, rb, axis),
                    calculate_wall_overlap(rb, ra, axis)
                );
            }
        }
    }
}
