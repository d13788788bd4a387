// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall segmentation.
//!
//! Every wall of every rectangular room gets a [`WallPlan`]. The wall is cut
//! at each neighbor's overlap range: ranges the room owns become segments
//! facing that neighbor, ranges a neighbor owns are deferred to it, and
//! whatever is left becomes exterior segments owned by the room.

use floorplan_core::{
    Config, Diagnostics, Error, Location, Rect, ResolvedFloor, ResolvedRoom, Result,
    WallDirection, Warning, LENGTH_EPSILON,
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::adjacency::Adjacency;
use crate::ownership::wall_owner;
use crate::types::{DeferredSpan, Material, SegmentId, WallPlan, WallSegment};

/// A neighbor's claim on one wall, before it is cut into the plan.
#[derive(Debug, Clone, Copy)]
struct Span<'a> {
    neighbor: &'a ResolvedRoom,
    start: f64,
    end: f64,
    owned: bool,
}

/// Build the wall plans of a floor.
///
/// Ownership is decided for every adjacency first; an ambiguous pair halts
/// the floor and is returned as the error. Overlapping neighbors and
/// type/height mismatches are reported to `diagnostics`.
pub fn build_wall_plans(
    floor: &ResolvedFloor,
    adjacencies: &[Adjacency],
    config: &Config,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<WallPlan>> {
    let rooms: FxHashMap<&str, &ResolvedRoom> =
        floor.rooms.iter().map(|room| (room.id.as_str(), room)).collect();

    // Join point: all adjacencies of a wall are gathered before cutting it.
    let mut by_wall: FxHashMap<(&str, WallDirection), SmallVec<[&Adjacency; 4]>> =
        FxHashMap::default();
    for adjacency in adjacencies {
        by_wall
            .entry((adjacency.room.as_str(), adjacency.wall))
            .or_default()
            .push(adjacency);
    }

    let mut plans = Vec::new();
    for room in &floor.rooms {
        let Some(rect) = room.rect() else {
            continue;
        };
        for wall in WallDirection::ALL {
            let location = Location::floor(&floor.id).with_room(&room.id).with_wall(wall);

            let mut spans: SmallVec<[Span; 4]> = SmallVec::new();
            for adjacency in by_wall.get(&(room.id.as_str(), wall)).into_iter().flatten() {
                let Some(&neighbor) = rooms.get(adjacency.neighbor.as_str()) else {
                    continue;
                };
                let owner = wall_owner(room, neighbor, wall.axis(), &location)?;
                spans.push(Span {
                    neighbor,
                    start: adjacency.overlap.start,
                    end: adjacency.overlap.end,
                    owned: owner.id == room.id,
                });
            }

            let spans = clip_overlapping(spans, &location, diagnostics);
            plans.push(cut_wall(room, rect, wall, &spans, config, &location, diagnostics));
        }
    }

    debug!(
        floor = %floor.id,
        plans = plans.len(),
        segments = plans.iter().map(|p| p.segments.len()).sum::<usize>(),
        "wall plans built"
    );
    Ok(plans)
}

/// Sort spans along the wall and clip any that overlap an earlier one.
fn clip_overlapping<'a>(
    mut spans: SmallVec<[Span<'a>; 4]>,
    location: &Location,
    diagnostics: &mut Diagnostics,
) -> SmallVec<[Span<'a>; 4]> {
    spans.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut kept: SmallVec<[Span<'a>; 4]> = SmallVec::new();
    for mut span in spans {
        if let Some(last) = kept.last() {
            if span.start < last.end - LENGTH_EPSILON {
                diagnostics.error(Error::OverlappingNeighbor {
                    first: last.neighbor.id.clone(),
                    second: span.neighbor.id.clone(),
                    start: span.start,
                    end: span.end.min(last.end),
                    location: location.clone(),
                });
                span.start = last.end;
                if span.end - span.start <= LENGTH_EPSILON {
                    continue;
                }
            }
        }
        kept.push(span);
    }
    kept
}

fn cut_wall(
    room: &ResolvedRoom,
    rect: &Rect,
    wall: WallDirection,
    spans: &[Span],
    config: &Config,
    location: &Location,
    diagnostics: &mut Diagnostics,
) -> WallPlan {
    let (start, end) = rect.wall_extent(wall.axis());
    let owner_face = Material::wall_of(&room.style);

    let mut plan = WallPlan {
        room: room.id.clone(),
        wall,
        start,
        end,
        segments: Vec::new(),
        deferred: Vec::new(),
    };

    let push_segment = |plan: &mut WallPlan, from: f64, to: f64, neighbor: Option<&ResolvedRoom>| {
        let index = plan.segments.len();
        plan.segments.push(WallSegment {
            id: SegmentId {
                room: room.id.clone(),
                wall,
                index,
            },
            owner: room.id.clone(),
            wall,
            neighbor: neighbor.map(|n| n.id.clone()),
            start: from,
            end: to,
            line: rect.wall_line(wall),
            thickness: config.wall_thickness,
            height: room.height,
            base_elevation: room.absolute_elevation,
            wall_type: room.walls.get(wall),
            owner_face: owner_face.clone(),
            neighbor_face: neighbor
                .map(|n| Material::wall_of(&n.style))
                .unwrap_or_else(|| owner_face.clone()),
        });
    };

    let mut cursor = start;
    for span in spans {
        if span.start > cursor + LENGTH_EPSILON {
            push_segment(&mut plan, cursor, span.start, None);
        }
        // Sub-epsilon gaps are absorbed so the plan covers the wall exactly.
        let from = if span.start > cursor + LENGTH_EPSILON { span.start } else { cursor };

        if span.owned {
            check_mismatch(room, span.neighbor, wall, location, diagnostics);
            push_segment(&mut plan, from, span.end, Some(span.neighbor));
        } else {
            plan.deferred.push(DeferredSpan {
                owner: span.neighbor.id.clone(),
                start: from,
                end: span.end,
            });
        }
        cursor = span.end;
    }
    if end > cursor + LENGTH_EPSILON {
        push_segment(&mut plan, cursor, end, None);
    } else if let Some(last) = plan.segments.last_mut().filter(|s| s.end == cursor) {
        last.end = end;
    } else if let Some(last) = plan.deferred.last_mut().filter(|d| d.end == cursor) {
        last.end = end;
    }

    plan
}

/// Type and height checks between an owner and the neighbor it faces.
fn check_mismatch(
    owner: &ResolvedRoom,
    neighbor: &ResolvedRoom,
    wall: WallDirection,
    location: &Location,
    diagnostics: &mut Diagnostics,
) {
    let owner_type = owner.walls.get(wall);
    let neighbor_type = neighbor.walls.get(wall.opposite());
    if owner_type != neighbor_type {
        diagnostics.warn(Warning::WallTypeMismatch {
            owner: owner.id.clone(),
            neighbor: neighbor.id.clone(),
            owner_type,
            neighbor_type,
            location: location.clone(),
        });
    }

    if (owner.height - neighbor.height).abs() > LENGTH_EPSILON {
        diagnostics.warn(Warning::WallHeightMismatch {
            owner: owner.id.clone(),
            neighbor: neighbor.id.clone(),
            owner_height: owner.height,
            neighbor_height: neighbor.height,
            location: location.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::detect_adjacencies;
    use crate::test_support::{floor, room};
    use approx::assert_relative_eq;
    use floorplan_core::{Color, DiagnosticKind, Style, WallType};
    use std::sync::Arc;

    fn plans_for(floor: &ResolvedFloor) -> (Result<Vec<WallPlan>>, Diagnostics) {
        let mut diags = Diagnostics::new();
        let adjacencies = detect_adjacencies(floor, &mut diags);
        let plans = build_wall_plans(floor, &adjacencies, &Config::default(), &mut diags);
        (plans, diags)
    }

    fn plan<'a>(plans: &'a [WallPlan], room: &str, wall: WallDirection) -> &'a WallPlan {
        plans
            .iter()
            .find(|p| p.room == room && p.wall == wall)
            .unwrap()
    }

    fn assert_covers(plan: &WallPlan) {
        let ranges = plan.covered_ranges();
        assert_relative_eq!(ranges[0].0, plan.start, epsilon = 1e-9);
        assert_relative_eq!(ranges[ranges.len() - 1].1, plan.end, epsilon = 1e-9);
        for pair in ranges.windows(2) {
            assert_relative_eq!(pair[0].1, pair[1].0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_owner_emits_shared_wall() {
        let floor = floor(vec![
            room("a", 0.0, 0.0, 10.0, 10.0),
            room("b", 10.0, 0.0, 10.0, 10.0),
        ]);
        let (plans, diags) = plans_for(&floor);
        let plans = plans.unwrap();
        assert!(diags.is_empty());
        assert_eq!(plans.len(), 8);

        let a_right = plan(&plans, "a", WallDirection::Right);
        assert_eq!(a_right.segments.len(), 1);
        assert_eq!(a_right.segments[0].neighbor.as_deref(), Some("b"));
        assert_eq!((a_right.segments[0].start, a_right.segments[0].end), (0.0, 10.0));

        let b_left = plan(&plans, "b", WallDirection::Left);
        assert!(b_left.segments.is_empty());
        assert_eq!(b_left.deferred[0].owner, "a");

        for plan in &plans {
            assert_covers(plan);
        }
    }

    #[test]
    fn test_two_neighbors_split_wall() {
        let floor = floor(vec![
            room("a", 0.0, 0.0, 20.0, 10.0),
            room("b", 0.0, 10.0, 10.0, 10.0),
            room("c", 10.0, 10.0, 10.0, 10.0),
        ]);
        let (plans, _) = plans_for(&floor);
        let plans = plans.unwrap();

        let bottom = plan(&plans, "a", WallDirection::Bottom);
        let ranges: Vec<_> = bottom.segments.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(ranges, vec![(0.0, 10.0), (10.0, 20.0)]);
        assert_eq!(bottom.segments[0].neighbor.as_deref(), Some("b"));
        assert_eq!(bottom.segments[1].neighbor.as_deref(), Some("c"));
        assert_eq!(bottom.segments[1].id.index, 1);
    }

    #[test]
    fn test_exterior_remainder() {
        let floor = floor(vec![
            room("a", 0.0, 0.0, 10.0, 20.0),
            room("b", 10.0, 5.0, 10.0, 5.0),
        ]);
        let (plans, _) = plans_for(&floor);
        let plans = plans.unwrap();

        let right = plan(&plans, "a", WallDirection::Right);
        let ranges: Vec<_> = right
            .segments
            .iter()
            .map(|s| (s.start, s.end, s.neighbor.clone()))
            .collect();
        assert_eq!(
            ranges,
            vec![
                (0.0, 5.0, None),
                (5.0, 10.0, Some("b".to_string())),
                (10.0, 20.0, None)
            ]
        );
        assert_eq!(right.segments[0].owner_face, right.segments[0].neighbor_face);
        assert_covers(right);
    }

    #[test]
    fn test_neighbor_face_uses_neighbor_style() {
        let mut brick = Style::fallback();
        brick.name = "brick".into();
        brick.wall_color = Color::parse("#884422").unwrap();
        let mut b = room("b", 10.0, 0.0, 10.0, 10.0);
        b.style = Arc::new(brick);
        b.explicit_style = true;

        let floor = floor(vec![room("a", 0.0, 0.0, 10.0, 10.0), b]);
        let (plans, _) = plans_for(&floor);
        let plans = plans.unwrap();
        let segment = &plan(&plans, "a", WallDirection::Right).segments[0];
        assert_eq!(segment.owner_face.color.as_str(), "#909090");
        assert_eq!(segment.neighbor_face.color.as_str(), "#884422");
    }

    #[test]
    fn test_mismatch_warnings() {
        let mut a = room("a", 0.0, 0.0, 10.0, 10.0);
        a.walls.right = WallType::Window;
        let mut b = room("b", 10.0, 0.0, 10.0, 10.0);
        b.height = 2.5;

        let floor = floor(vec![a, b]);
        let (plans, diags) = plans_for(&floor);
        assert!(plans.is_ok());
        assert_eq!(diags.count_of(DiagnosticKind::WallTypeMismatch), 1);
        assert_eq!(diags.count_of(DiagnosticKind::WallHeightMismatch), 1);
        assert!(!diags.has_errors());
    }

    #[test]
    fn test_overlapping_neighbors_are_reported() {
        // b and c both claim part of a's right wall; c was drawn over b.
        let floor = floor(vec![
            room("a", 0.0, 0.0, 10.0, 20.0),
            room("b", 10.0, 0.0, 5.0, 12.0),
            room("c", 10.0, 8.0, 8.0, 12.0),
        ]);
        let (plans, diags) = plans_for(&floor);
        let plans = plans.unwrap();
        assert_eq!(diags.count_of(DiagnosticKind::OverlappingNeighborError), 1);

        let right = plan(&plans, "a", WallDirection::Right);
        let ranges: Vec<_> = right.segments.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(ranges, vec![(0.0, 12.0), (12.0, 20.0)]);
        assert_covers(right);
    }
}
