// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resolved document model
//!
//! Everything in this module is produced by [`crate::resolve_document`] and is
//! immutable afterwards. All lengths are meters, all styles are shared by
//! reference and every room carries a stable id that later stages key on.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::style::Style;
use crate::version::GrammarVersion;

/// Tolerance used when comparing resolved lengths (meters).
pub const LENGTH_EPSILON: f64 = 1e-6;

/// One of the four walls of an axis-aligned room.
///
/// The plan uses screen orientation: `y` grows downwards, so `Top` is the
/// wall at the room's minimum `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallDirection {
    Top,
    Bottom,
    Left,
    Right,
}

impl WallDirection {
    /// All directions in declaration order.
    pub const ALL: [WallDirection; 4] = [
        WallDirection::Top,
        WallDirection::Bottom,
        WallDirection::Left,
        WallDirection::Right,
    ];

    /// Axis the wall line runs along.
    pub fn axis(self) -> Axis {
        match self {
            WallDirection::Left | WallDirection::Right => Axis::Vertical,
            WallDirection::Top | WallDirection::Bottom => Axis::Horizontal,
        }
    }

    /// The wall a neighbor must present to share this one.
    pub fn opposite(self) -> WallDirection {
        match self {
            WallDirection::Top => WallDirection::Bottom,
            WallDirection::Bottom => WallDirection::Top,
            WallDirection::Left => WallDirection::Right,
            WallDirection::Right => WallDirection::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WallDirection::Top => "top",
            WallDirection::Bottom => "bottom",
            WallDirection::Left => "left",
            WallDirection::Right => "right",
        }
    }
}

impl std::fmt::Display for WallDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Orientation of a wall line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Left/right walls (line of constant `x`).
    Vertical,
    /// Top/bottom walls (line of constant `y`).
    Horizontal,
}

/// How a wall is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallType {
    #[default]
    Solid,
    Door,
    Window,
    Open,
}

impl WallType {
    pub fn as_str(self) -> &'static str {
        match self {
            WallType::Solid => "solid",
            WallType::Door => "door",
            WallType::Window => "window",
            WallType::Open => "open",
        }
    }
}

impl std::fmt::Display for WallType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-wall type of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Walls {
    pub top: WallType,
    pub bottom: WallType,
    pub left: WallType,
    pub right: WallType,
}

impl Walls {
    pub fn get(&self, direction: WallDirection) -> WallType {
        match direction {
            WallDirection::Top => self.top,
            WallDirection::Bottom => self.bottom,
            WallDirection::Left => self.left,
            WallDirection::Right => self.right,
        }
    }
}

/// A 2D point in plan coordinates (meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle in plan coordinates (meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Fixed coordinate of the given wall line.
    pub fn wall_line(&self, direction: WallDirection) -> f64 {
        match direction {
            WallDirection::Top => self.top(),
            WallDirection::Bottom => self.bottom(),
            WallDirection::Left => self.left(),
            WallDirection::Right => self.right(),
        }
    }

    /// Extent `(start, end)` of a wall running along `axis`.
    ///
    /// Vertical walls span the room's `y` range, horizontal walls its `x`
    /// range.
    pub fn wall_extent(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::Vertical => (self.top(), self.bottom()),
            Axis::Horizontal => (self.left(), self.right()),
        }
    }

    /// Coordinate used by the ownership tie-break on this axis.
    pub fn origin_on(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.x,
            Axis::Horizontal => self.y,
        }
    }

    /// True when the interiors of the two rectangles intersect.
    ///
    /// Rectangles that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right() - LENGTH_EPSILON
            && other.left() < self.right() - LENGTH_EPSILON
            && self.top() < other.bottom() - LENGTH_EPSILON
            && other.top() < self.bottom() - LENGTH_EPSILON
    }

    /// True when `other` lies inside `self` (edges may coincide).
    pub fn contains(&self, other: &Rect) -> bool {
        other.left() >= self.left() - LENGTH_EPSILON
            && other.right() <= self.right() + LENGTH_EPSILON
            && other.top() >= self.top() - LENGTH_EPSILON
            && other.bottom() <= self.bottom() + LENGTH_EPSILON
    }
}

/// Footprint of a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bounds {
    Rect(Rect),
    /// Closed polygon; the closing vertex is not repeated.
    Polygon(Vec<Point2D>),
}

impl Bounds {
    pub fn as_rect(&self) -> Option<&Rect> {
        match self {
            Bounds::Rect(rect) => Some(rect),
            Bounds::Polygon(_) => None,
        }
    }

    /// Axis-aligned bounding box of the footprint.
    pub fn bounding_rect(&self) -> Rect {
        match self {
            Bounds::Rect(rect) => *rect,
            Bounds::Polygon(points) => {
                let mut min_x = f64::MAX;
                let mut min_y = f64::MAX;
                let mut max_x = f64::MIN;
                let mut max_y = f64::MIN;
                for p in points {
                    min_x = min_x.min(p.x);
                    min_y = min_y.min(p.y);
                    max_x = max_x.max(p.x);
                    max_y = max_y.max(p.y);
                }
                if points.is_empty() {
                    return Rect::new(0.0, 0.0, 0.0, 0.0);
                }
                Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
            }
        }
    }
}

/// A room with every value resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRoom {
    /// Stable id: the room name, or `parent.child` for sub-rooms.
    pub id: String,
    pub label: Option<String>,
    /// Id of the enclosing room for sub-rooms.
    pub parent: Option<String>,
    /// Absolute footprint in floor coordinates.
    pub bounds: Bounds,
    pub walls: Walls,
    /// Wall height; the document default when the room declares none.
    pub height: f64,
    /// Elevation relative to the floor baseline.
    pub elevation: f64,
    /// Floor elevation plus room elevation.
    pub absolute_elevation: f64,
    pub style: Arc<Style>,
    /// Whether the style came from the room itself rather than a default.
    pub explicit_style: bool,
    pub stacks_above: Option<String>,
}

impl ResolvedRoom {
    pub fn rect(&self) -> Option<&Rect> {
        self.bounds.as_rect()
    }
}

/// A floor with its rooms in declaration order (sub-rooms follow their
/// parent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFloor {
    pub id: String,
    /// Position in the document.
    pub index: usize,
    /// Baseline elevation in meters.
    pub elevation: f64,
    /// Storey height used to stack the next floor.
    pub height: f64,
    pub rooms: Vec<ResolvedRoom>,
}

impl ResolvedFloor {
    pub fn room(&self, id: &str) -> Option<&ResolvedRoom> {
        self.rooms.iter().find(|room| room.id == id)
    }
}

/// Kind of opening a connection cuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpeningKind {
    Door,
    DoubleDoor,
    Window,
    Opening,
}

impl OpeningKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OpeningKind::Door => "door",
            OpeningKind::DoubleDoor => "double-door",
            OpeningKind::Window => "window",
            OpeningKind::Opening => "opening",
        }
    }

    pub fn swings(self) -> bool {
        matches!(self, OpeningKind::Door | OpeningKind::DoubleDoor)
    }
}

/// Hinge side of a door leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Swing {
    Left,
    Right,
}

/// `room.wall` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallRef {
    pub room: String,
    pub wall: WallDirection,
}

impl WallRef {
    pub fn new(room: impl Into<String>, wall: WallDirection) -> Self {
        Self {
            room: room.into(),
            wall,
        }
    }
}

impl std::fmt::Display for WallRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.room, self.wall)
    }
}

/// A connection with its size override resolved to meters.
///
/// Placement onto a wall segment happens per floor in the geometry stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Position in the document's connection list.
    pub index: usize,
    /// Floor of the `from` room.
    pub floor: String,
    pub from: WallRef,
    pub to: WallRef,
    pub kind: OpeningKind,
    /// Position along the wall segment in percent.
    pub at: Option<f64>,
    pub swing: Option<Swing>,
    pub opens_into: Option<String>,
    /// Explicit `(width, height)` override.
    pub size: Option<(f64, f64)>,
}

/// The fully resolved document handed to the geometry stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDocument {
    pub version: GrammarVersion,
    pub config: Arc<Config>,
    /// Style table keyed by name.
    pub styles: BTreeMap<String, Arc<Style>>,
    pub floors: Vec<ResolvedFloor>,
    pub connections: Vec<Connection>,
}

impl ResolvedDocument {
    pub fn floor(&self, id: &str) -> Option<&ResolvedFloor> {
        self.floors.iter().find(|floor| floor.id == id)
    }

    /// Connections whose `from` room sits on the given floor.
    pub fn connections_on<'a>(&'a self, floor: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.floor == floor)
    }
}
