// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection placement.
//!
//! Each connection is placed on the owner's segment of the boundary it
//! crosses, whichever side it was written from. `A.right -> B.left` and
//! `B.left -> A.right` therefore land on the same segment and collide.

use floorplan_core::{
    Config, Connection, Diagnostics, Error, Location, OpeningKind, ResolvedFloor, ResolvedRoom,
    Result, Warning, LENGTH_EPSILON,
};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::adjacency::Adjacency;
use crate::ownership::wall_owner;
use crate::types::{ResolvedOpening, WallPlan, WallSegment};

/// Position used when a connection gives no `at`.
pub const DEFAULT_PERCENT: f64 = 50.0;

/// Physical size of an opening before clipping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningSize {
    pub width: f64,
    pub height: f64,
    pub sill: f64,
}

impl OpeningSize {
    /// Size from the connection override, else the config default for its kind.
    pub fn for_connection(connection: &Connection, config: &Config) -> Self {
        let sill = match connection.kind {
            OpeningKind::Window => config.window_sill,
            _ => 0.0,
        };
        let (width, height) = connection.size.unwrap_or(match connection.kind {
            OpeningKind::Door | OpeningKind::Opening => (config.door_width, config.door_height),
            OpeningKind::DoubleDoor => (config.door_width * config.double_door_factor, config.door_height),
            OpeningKind::Window => (config.window_width, config.window_height),
        });
        Self { width, height, sill }
    }
}

/// Place every connection of a floor onto its wall segment, appending the
/// results to `openings`.
///
/// A connection between rooms that do not share the named boundary halts
/// the floor and is returned as the error; openings placed before it stay
/// in `openings`. Overlaps, bad percentages and advisories are reported to
/// `diagnostics` and the offending connection is left out.
pub fn resolve_openings<'c>(
    floor: &ResolvedFloor,
    connections: impl IntoIterator<Item = &'c Connection>,
    adjacencies: &[Adjacency],
    plans: &[WallPlan],
    config: &Config,
    openings: &mut Vec<ResolvedOpening>,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let rooms: FxHashMap<&str, &ResolvedRoom> =
        floor.rooms.iter().map(|room| (room.id.as_str(), room)).collect();

    for connection in connections {
        let location = Location::floor(&floor.id)
            .with_room(&connection.from.room)
            .with_wall(connection.from.wall)
            .with_connection(connection.index);

        // ─── Step 1: Locate the owner segment ───
        let segment = find_segment(connection, &rooms, adjacencies, plans, &location)?;

        // ─── Step 2: Center and extent ───
        let percent = connection.at.unwrap_or(DEFAULT_PERCENT);
        if !(0.0..=100.0).contains(&percent) {
            diagnostics.error(Error::OutOfRange {
                property: "at".to_string(),
                value: percent,
                min: 0.0,
                max: 100.0,
                location,
            });
            continue;
        }
        let center = segment.start + segment.length() * (percent / 100.0);

        let size = OpeningSize::for_connection(connection, config);
        let half = size.width / 2.0;
        let start = (center - half).max(segment.start);
        let end = (center + half).min(segment.end);
        if end - start < size.width - LENGTH_EPSILON {
            diagnostics.warn(Warning::OpeningClipped {
                requested: size.width,
                actual: end - start,
                location: location.clone(),
            });
        }

        // ─── Step 3: Collisions with openings already placed ───
        let collision = openings
            .iter()
            .filter(|other| other.segment == segment.id)
            .find(|other| start < other.end - LENGTH_EPSILON && other.start < end - LENGTH_EPSILON);
        if let Some(other) = collision {
            diagnostics.error(Error::OverlappingOpening {
                first: other.connection,
                second: connection.index,
                start: start.max(other.start),
                end: end.min(other.end),
                location,
            });
            continue;
        }

        // ─── Step 4: Advisories ───
        if let Some(target) = &connection.opens_into {
            if target != &connection.from.room && target != &connection.to.room {
                diagnostics.warn(Warning::InvalidOpensInto {
                    target: target.clone(),
                    location: location.clone(),
                });
            }
        }
        if connection.swing.is_some() && !connection.kind.swings() {
            diagnostics.warn(Warning::SwingIgnored {
                location: location.clone(),
            });
        }

        openings.push(ResolvedOpening {
            connection: connection.index,
            segment: segment.id.clone(),
            kind: connection.kind,
            from: connection.from.clone(),
            to: connection.to.clone(),
            center,
            start,
            end,
            height: size.height,
            sill: size.sill,
            position: segment.point_at(center),
            swing: connection.swing.filter(|_| connection.kind.swings()),
            opens_into: connection.opens_into.clone(),
        });
    }

    debug!(floor = %floor.id, openings = openings.len(), "openings resolved");
    Ok(())
}

/// The owner's segment on the boundary a connection names.
fn find_segment<'p>(
    connection: &Connection,
    rooms: &FxHashMap<&str, &ResolvedRoom>,
    adjacencies: &[Adjacency],
    plans: &'p [WallPlan],
    location: &Location,
) -> Result<&'p WallSegment> {
    let not_adjacent = || Error::NotAdjacent {
        from: connection.from.to_string(),
        to: connection.to.to_string(),
        location: location.clone(),
    };

    let (Some(&from), Some(&to)) = (
        rooms.get(connection.from.room.as_str()),
        rooms.get(connection.to.room.as_str()),
    ) else {
        return Err(not_adjacent());
    };

    let shares_boundary = connection.to.wall == connection.from.wall.opposite()
        && adjacencies.iter().any(|a| {
            a.room == from.id && a.wall == connection.from.wall && a.neighbor == to.id
        });
    if !shares_boundary {
        return Err(not_adjacent());
    }

    let owner = wall_owner(from, to, connection.from.wall.axis(), location)?;
    let (owner_wall, neighbor) = if owner.id == from.id {
        (connection.from.wall, to)
    } else {
        (connection.to.wall, from)
    };

    plans
        .iter()
        .find(|plan| plan.room == owner.id && plan.wall == owner_wall)
        .and_then(|plan| {
            plan.segments
                .iter()
                .find(|s| s.neighbor.as_deref() == Some(neighbor.id.as_str()))
        })
        .ok_or_else(not_adjacent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::detect_adjacencies;
    use crate::segmentation::build_wall_plans;
    use crate::test_support::{floor, room};
    use approx::assert_relative_eq;
    use floorplan_core::{DiagnosticKind, Point2D, Swing, WallDirection, WallRef};

    fn connection(index: usize, from: (&str, WallDirection), to: (&str, WallDirection)) -> Connection {
        Connection {
            index,
            floor: "ground".into(),
            from: WallRef::new(from.0, from.1),
            to: WallRef::new(to.0, to.1),
            kind: OpeningKind::Door,
            at: None,
            swing: None,
            opens_into: None,
            size: None,
        }
    }

    fn a_to_b(index: usize, at: f64) -> Connection {
        let mut c = connection(index, ("a", WallDirection::Bottom), ("b", WallDirection::Top));
        c.at = Some(at);
        c.size = Some((2.0, 2.1));
        c
    }

    /// a sits above b; their shared horizontal wall is 20 long.
    fn run(connections: &[Connection]) -> (Result<Vec<ResolvedOpening>>, Diagnostics) {
        let floor = floor(vec![
            room("a", 0.0, 0.0, 20.0, 10.0),
            room("b", 0.0, 10.0, 20.0, 10.0),
        ]);
        let config = Config::default();
        let mut diags = Diagnostics::new();
        let adjacencies = detect_adjacencies(&floor, &mut diags);
        let plans = build_wall_plans(&floor, &adjacencies, &config, &mut diags).unwrap();
        let mut openings = Vec::new();
        let result = resolve_openings(
            &floor,
            connections,
            &adjacencies,
            &plans,
            &config,
            &mut openings,
            &mut diags,
        );
        (result.map(|()| openings), diags)
    }

    #[test]
    fn test_quarter_positions_do_not_overlap() {
        let (openings, diags) = run(&[a_to_b(0, 25.0), a_to_b(1, 75.0)]);
        let openings = openings.unwrap();
        assert!(!diags.has_errors());
        assert_eq!(openings.len(), 2);
        assert_relative_eq!(openings[0].center, 5.0, epsilon = 1e-9);
        assert_relative_eq!(openings[0].start, 4.0, epsilon = 1e-9);
        assert_relative_eq!(openings[0].end, 6.0, epsilon = 1e-9);
        assert_relative_eq!(openings[1].center, 15.0, epsilon = 1e-9);
        assert_eq!(openings[0].position, Point2D::new(5.0, 10.0));
    }

    #[test]
    fn test_same_position_overlaps() {
        let (openings, diags) = run(&[a_to_b(0, 50.0), a_to_b(1, 50.0)]);
        assert_eq!(openings.unwrap().len(), 1);
        assert_eq!(diags.count_of(DiagnosticKind::OverlappingOpeningError), 1);
    }

    #[test]
    fn test_reverse_direction_duplicate_overlaps() {
        let mut reverse = connection(1, ("b", WallDirection::Top), ("a", WallDirection::Bottom));
        reverse.at = Some(50.0);
        let (openings, diags) = run(&[a_to_b(0, 50.0), reverse]);
        assert_eq!(openings.unwrap().len(), 1);
        assert_eq!(diags.count_of(DiagnosticKind::OverlappingOpeningError), 1);
    }

    #[test]
    fn test_touching_openings_are_accepted() {
        // Extents [9, 11] and [11, 13].
        let (openings, diags) = run(&[a_to_b(0, 50.0), a_to_b(1, 60.0)]);
        assert_eq!(openings.unwrap().len(), 2);
        assert!(!diags.has_errors());
    }

    #[test]
    fn test_default_widths_and_center() {
        let mut double = connection(0, ("a", WallDirection::Bottom), ("b", WallDirection::Top));
        double.kind = OpeningKind::DoubleDoor;
        let mut window = connection(1, ("a", WallDirection::Bottom), ("b", WallDirection::Top));
        window.kind = OpeningKind::Window;
        window.at = Some(10.0);
        window.swing = Some(Swing::Left);

        let (openings, diags) = run(&[double, window]);
        let openings = openings.unwrap();
        assert_relative_eq!(openings[0].center, 10.0, epsilon = 1e-9);
        assert_relative_eq!(openings[0].width(), 1.8, epsilon = 1e-9);
        assert_relative_eq!(openings[1].width(), 1.2, epsilon = 1e-9);
        assert_relative_eq!(openings[1].sill, 0.9, epsilon = 1e-9);
        assert_eq!(openings[1].swing, None);
        assert_eq!(diags.count_of(DiagnosticKind::SwingIgnored), 1);
    }

    #[test]
    fn test_clipping_at_segment_end() {
        let (openings, diags) = run(&[a_to_b(0, 0.0)]);
        let openings = openings.unwrap();
        assert_relative_eq!(openings[0].start, 0.0, epsilon = 1e-9);
        assert_relative_eq!(openings[0].end, 1.0, epsilon = 1e-9);
        assert_eq!(diags.count_of(DiagnosticKind::OpeningClipped), 1);
    }

    #[test]
    fn test_percent_out_of_range() {
        let (openings, diags) = run(&[a_to_b(0, 120.0)]);
        assert!(openings.unwrap().is_empty());
        assert_eq!(diags.count_of(DiagnosticKind::OutOfRangeError), 1);
    }

    #[test]
    fn test_opens_into_must_name_a_side() {
        let mut c = a_to_b(0, 50.0);
        c.opens_into = Some("garage".into());
        let (_, diags) = run(&[c]);
        assert_eq!(diags.count_of(DiagnosticKind::InvalidOpensInto), 1);
    }

    #[test]
    fn test_not_adjacent_halts() {
        let wrong_wall = connection(0, ("a", WallDirection::Right), ("b", WallDirection::Left));
        let (openings, _) = run(&[wrong_wall]);
        let err = openings.unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::NotAdjacentError);
        assert!(err.halts_floor());

        let missing = connection(0, ("a", WallDirection::Bottom), ("c", WallDirection::Top));
        assert!(run(&[missing]).0.is_err());
    }

    #[test]
    fn test_halt_keeps_openings_placed_before_it() {
        let floor = floor(vec![
            room("a", 0.0, 0.0, 20.0, 10.0),
            room("b", 0.0, 10.0, 20.0, 10.0),
            room("far", 30.0, 0.0, 5.0, 5.0),
        ]);
        let config = Config::default();
        let mut diags = Diagnostics::new();
        let adjacencies = detect_adjacencies(&floor, &mut diags);
        let plans = build_wall_plans(&floor, &adjacencies, &config, &mut diags).unwrap();

        let connections = [
            a_to_b(0, 25.0),
            connection(1, ("a", WallDirection::Right), ("far", WallDirection::Left)),
            a_to_b(2, 75.0),
        ];
        let mut openings = Vec::new();
        let err = resolve_openings(
            &floor,
            &connections,
            &adjacencies,
            &plans,
            &config,
            &mut openings,
            &mut diags,
        )
        .unwrap_err();

        assert_eq!(err.kind(), DiagnosticKind::NotAdjacentError);
        assert_eq!(openings.len(), 1);
        assert_eq!(openings[0].connection, 0);
        assert_relative_eq!(openings[0].center, 5.0, epsilon = 1e-9);
    }
}
