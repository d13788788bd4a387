// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Derived wall-synthesis types: overlaps, segments, wall plans, openings

use floorplan_core::{
    Color, OpeningKind, Point2D, Style, Swing, WallDirection, WallRef, WallType,
};
use serde::{Deserialize, Serialize};

/// Shared range of two facing walls, measured along the wall axis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OverlapResult {
    pub start: f64,
    pub end: f64,
    pub length: f64,
}

impl OverlapResult {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            length: end - start,
        }
    }

    /// Interior intersection with another range; touching ends do not count.
    pub fn intersection(&self, other: &OverlapResult) -> Option<OverlapResult> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if end <= start {
            None
        } else {
            Some(OverlapResult::new(start, end))
        }
    }
}

/// Material applied to one face of a wall segment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Material {
    /// Name of the style it came from
    pub style: String,
    pub color: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    pub roughness: f64,
    pub metalness: f64,
}

impl Material {
    /// Wall material of a style.
    pub fn wall_of(style: &Style) -> Self {
        Self {
            style: style.name.clone(),
            color: style.wall_color.clone(),
            texture: style.wall_texture.clone(),
            roughness: style.roughness,
            metalness: style.metalness,
        }
    }
}

/// Faces of an extruded wall segment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    /// Face inside the owner room
    Owner,
    /// Face inside the neighbor room
    Neighbor,
    /// End caps
    Side,
    Top,
    Bottom,
}

/// Stable identity of a segment: owner room, wall, position in the plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId {
    pub room: String,
    pub wall: WallDirection,
    pub index: usize,
}

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}#{}", self.room, self.wall, self.index)
    }
}

/// A piece of wall emitted by its owner room
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WallSegment {
    pub id: SegmentId,
    pub owner: String,
    pub wall: WallDirection,
    /// Room on the other side; `None` for exterior stretches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighbor: Option<String>,
    pub start: f64,
    pub end: f64,
    /// Fixed coordinate of the wall line (x for left/right, y for top/bottom).
    pub line: f64,
    pub thickness: f64,
    pub height: f64,
    /// Absolute elevation of the segment base.
    pub base_elevation: f64,
    pub wall_type: WallType,
    pub owner_face: Material,
    pub neighbor_face: Material,
}

impl WallSegment {
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn range(&self) -> OverlapResult {
        OverlapResult::new(self.start, self.end)
    }

    /// Material for a face. Only the face toward the neighbor differs from
    /// the owner's wall material.
    pub fn face_material(&self, face: Face) -> &Material {
        match face {
            Face::Neighbor => &self.neighbor_face,
            Face::Owner | Face::Side | Face::Top | Face::Bottom => &self.owner_face,
        }
    }

    /// World-space point on the wall line at `offset` along the axis.
    pub fn point_at(&self, offset: f64) -> Point2D {
        match self.wall {
            WallDirection::Left | WallDirection::Right => Point2D::new(self.line, offset),
            WallDirection::Top | WallDirection::Bottom => Point2D::new(offset, self.line),
        }
    }
}

/// Stretch of a room wall whose geometry another room emits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeferredSpan {
    pub owner: String,
    pub start: f64,
    pub end: f64,
}

/// Full breakdown of one room wall.
///
/// `segments` and `deferred` are disjoint, sorted by start, and together
/// cover `[start, end]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WallPlan {
    pub room: String,
    pub wall: WallDirection,
    pub start: f64,
    pub end: f64,
    pub segments: Vec<WallSegment>,
    pub deferred: Vec<DeferredSpan>,
}

impl WallPlan {
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Every covered range, owned or deferred, in order.
    pub fn covered_ranges(&self) -> Vec<(f64, f64)> {
        let mut ranges: Vec<(f64, f64)> = self
            .segments
            .iter()
            .map(|s| (s.start, s.end))
            .chain(self.deferred.iter().map(|d| (d.start, d.end)))
            .collect();
        ranges.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranges
    }
}

/// A connection placed on a wall segment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedOpening {
    /// Index of the connection in the document
    pub connection: usize,
    pub segment: SegmentId,
    pub kind: OpeningKind,
    pub from: WallRef,
    pub to: WallRef,
    /// Center along the wall axis
    pub center: f64,
    /// Physical extent along the wall axis, after clipping
    pub start: f64,
    pub end: f64,
    pub height: f64,
    /// Height of the opening's bottom edge above the floor
    pub sill: f64,
    /// World-space center on the wall line
    pub position: Point2D,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swing: Option<Swing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opens_into: Option<String>,
}

impl ResolvedOpening {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn range(&self) -> OverlapResult {
        OverlapResult::new(self.start, self.end)
    }
}

/// Wall-synthesis output of one floor
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FloorGeometry {
    pub floor: String,
    pub adjacencies: Vec<crate::adjacency::Adjacency>,
    pub plans: Vec<WallPlan>,
    pub openings: Vec<ResolvedOpening>,
}

impl FloorGeometry {
    /// All segments in plan order.
    pub fn segments(&self) -> impl Iterator<Item = &WallSegment> {
        self.plans.iter().flat_map(|plan| plan.segments.iter())
    }

    pub fn segment(&self, id: &SegmentId) -> Option<&WallSegment> {
        self.segments().find(|segment| &segment.id == id)
    }

    pub fn plan(&self, room: &str, wall: WallDirection) -> Option<&WallPlan> {
        self.plans
            .iter()
            .find(|plan| plan.room == room && plan.wall == wall)
    }

    pub fn openings_for<'a>(&'a self, segment: &'a SegmentId) -> impl Iterator<Item = &'a ResolvedOpening> + 'a {
        self.openings.iter().filter(move |o| &o.segment == segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_intersection() {
        let a = OverlapResult::new(0.0, 10.0);
        let b = OverlapResult::new(5.0, 15.0);
        let shared = a.intersection(&b).unwrap();
        assert_eq!((shared.start, shared.end, shared.length), (5.0, 10.0, 5.0));

        let touching = OverlapResult::new(10.0, 12.0);
        assert!(a.intersection(&touching).is_none());
    }

    #[test]
    fn test_face_materials() {
        let owner = Style::fallback();
        let mut other = Style::fallback();
        other.name = "brick".into();
        other.wall_color = Color::parse("#aa3311").unwrap();

        let segment = WallSegment {
            id: SegmentId {
                room: "a".into(),
                wall: WallDirection::Right,
                index: 0,
            },
            owner: "a".into(),
            wall: WallDirection::Right,
            neighbor: Some("b".into()),
            start: 0.0,
            end: 4.0,
            line: 5.0,
            thickness: 0.2,
            height: 3.0,
            base_elevation: 0.0,
            wall_type: WallType::Solid,
            owner_face: Material::wall_of(&owner),
            neighbor_face: Material::wall_of(&other),
        };

        assert_eq!(segment.face_material(Face::Neighbor).color.as_str(), "#AA3311");
        for face in [Face::Owner, Face::Side, Face::Top, Face::Bottom] {
            assert_eq!(segment.face_material(face).color.as_str(), "#909090");
        }
        assert_eq!(segment.point_at(2.0), Point2D::new(5.0, 2.0));
        assert_eq!(segment.id.to_string(), "a.right#0");
    }
}
