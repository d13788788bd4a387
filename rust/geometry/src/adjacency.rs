// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adjacency detection between rooms of one floor.
//!
//! Two rooms are adjacent along a wall when that wall lies on the same line
//! as the opposite wall of the other room and their extents along the line
//! overlap by more than a touch. Only rectangular rooms sharing a parent are
//! compared; polygon rooms are reported and skipped.

use floorplan_core::{
    Axis, Diagnostics, Location, Rect, ResolvedFloor, WallDirection, Warning, LENGTH_EPSILON,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::OverlapResult;

/// `room.wall` faces `neighbor.wall.opposite()` over `overlap`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Adjacency {
    pub room: String,
    pub wall: WallDirection,
    pub neighbor: String,
    pub overlap: OverlapResult,
}

/// Intersect the extents of two rooms along a wall axis.
///
/// Vertical walls compare y extents, horizontal walls compare x extents.
/// Returns `None` when `end <= start`. Symmetric in its arguments.
pub fn calculate_wall_overlap(a: &Rect, b: &Rect, axis: Axis) -> Option<OverlapResult> {
    let (a_start, a_end) = a.wall_extent(axis);
    let (b_start, b_end) = b.wall_extent(axis);
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    if end <= start {
        None
    } else {
        Some(OverlapResult::new(start, end))
    }
}

/// Whether `a`'s wall lies on the line of `b`'s opposite wall.
pub fn facing(a: &Rect, b: &Rect, wall: WallDirection) -> bool {
    (a.wall_line(wall) - b.wall_line(wall.opposite())).abs() <= LENGTH_EPSILON
}

/// Shared range of `a.wall` and `b.wall.opposite()`, if they face each other.
pub fn shared_wall(a: &Rect, b: &Rect, wall: WallDirection) -> Option<OverlapResult> {
    if !facing(a, b, wall) {
        return None;
    }
    calculate_wall_overlap(a, b, wall.axis()).filter(|overlap| overlap.length > LENGTH_EPSILON)
}

/// Detect every adjacency on a floor.
///
/// Pairs are visited in declaration order, and each shared boundary yields
/// one record per side, so the output is stable for a given input.
pub fn detect_adjacencies(floor: &ResolvedFloor, diagnostics: &mut Diagnostics) -> Vec<Adjacency> {
    let mut rects: Vec<(usize, &Rect)> = Vec::with_capacity(floor.rooms.len());
    for (index, room) in floor.rooms.iter().enumerate() {
        match room.rect() {
            Some(rect) => rects.push((index, rect)),
            None => diagnostics.warn(Warning::PolygonExcluded {
                location: Location::floor(&floor.id).with_room(&room.id),
            }),
        }
    }

    let mut adjacencies = Vec::new();
    for (i, &(a_index, a_rect)) in rects.iter().enumerate() {
        let a = &floor.rooms[a_index];
        for &(b_index, b_rect) in &rects[i + 1..] {
            let b = &floor.rooms[b_index];
            if a.parent != b.parent {
                continue;
            }
            for wall in WallDirection::ALL {
                let Some(overlap) = shared_wall(a_rect, b_rect, wall) else {
                    continue;
                };
                adjacencies.push(Adjacency {
                    room: a.id.clone(),
                    wall,
                    neighbor: b.id.clone(),
                    overlap,
                });
                adjacencies.push(Adjacency {
                    room: b.id.clone(),
                    wall: wall.opposite(),
                    neighbor: a.id.clone(),
                    overlap,
                });
            }
        }
    }

    debug!(
        floor = %floor.id,
        rooms = rects.len(),
        adjacencies = adjacencies.len() / 2,
        "adjacency computed"
    );
    adjacencies
}
