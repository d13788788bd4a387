// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed syntax tree handed over by the parser.
//!
//! Every construct is a closed type so resolution can match exhaustively.
//! Values are raw: lengths still carry their optional unit tag and names
//! (variables, styles, rooms) are unresolved strings.

use serde::{Deserialize, Serialize};

use crate::model::{OpeningKind, Swing, WallDirection, WallType};

/// A whole floor-plan document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    /// Declared grammar version, e.g. `"1.2"`.
    pub version: Option<String>,
    /// Frontmatter entries (lowest document precedence).
    pub frontmatter: Vec<ConfigEntry>,
    /// `config { ... }` block entries.
    pub config: Vec<ConfigEntry>,
    /// Inline directives (highest precedence).
    pub directives: Vec<ConfigEntry>,
    pub defines: Vec<Define>,
    pub styles: Vec<StyleDecl>,
    pub floors: Vec<FloorDecl>,
    pub connections: Vec<ConnectionDecl>,
}

/// A number with an optional unit tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLength {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl RawLength {
    /// A value in the document default unit.
    pub fn new(value: f64) -> Self {
        Self { value, unit: None }
    }

    pub fn with_unit(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: Some(unit.into()),
        }
    }
}

/// A pair of lengths, either written out or taken from a `define`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionExpr {
    Literal(RawLength, RawLength),
    Variable(String),
}

impl DimensionExpr {
    pub fn literal(first: f64, second: f64) -> Self {
        DimensionExpr::Literal(RawLength::new(first), RawLength::new(second))
    }
}

/// `define name (W x H)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Define {
    pub name: String,
    pub width: RawLength,
    pub height: RawLength,
}

/// Room footprint as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Rect {
        position: DimensionExpr,
        size: DimensionExpr,
    },
    Polygon {
        vertices: Vec<(RawLength, RawLength)>,
    },
}

/// Per-wall types; missing walls are `solid`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallsDecl {
    pub top: Option<WallType>,
    pub bottom: Option<WallType>,
    pub left: Option<WallType>,
    pub right: Option<WallType>,
}

impl WallsDecl {
    pub fn set(mut self, direction: WallDirection, wall_type: WallType) -> Self {
        match direction {
            WallDirection::Top => self.top = Some(wall_type),
            WallDirection::Bottom => self.bottom = Some(wall_type),
            WallDirection::Left => self.left = Some(wall_type),
            WallDirection::Right => self.right = Some(wall_type),
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDecl {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    pub shape: Shape,
    #[serde(default)]
    pub walls: WallsDecl,
    #[serde(default)]
    pub height: Option<RawLength>,
    #[serde(default)]
    pub elevation: Option<RawLength>,
    #[serde(default)]
    pub style: Option<String>,
    /// Nested rooms, positioned relative to this room.
    #[serde(default)]
    pub sub_rooms: Vec<RoomDecl>,
    /// Room on a lower floor this one sits on.
    #[serde(default)]
    pub stacks_above: Option<String>,
}

impl RoomDecl {
    /// A rectangular room with unit-less coordinates.
    pub fn rect(name: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            label: None,
            shape: Shape::Rect {
                position: DimensionExpr::literal(x, y),
                size: DimensionExpr::literal(width, height),
            },
            walls: WallsDecl::default(),
            height: None,
            elevation: None,
            style: None,
            sub_rooms: Vec::new(),
            stacks_above: None,
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_wall(mut self, direction: WallDirection, wall_type: WallType) -> Self {
        self.walls = self.walls.set(direction, wall_type);
        self
    }

    pub fn with_height(mut self, height: RawLength) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_sub_room(mut self, room: RoomDecl) -> Self {
        self.sub_rooms.push(room);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorDecl {
    pub id: String,
    /// Explicit baseline; stacked on the previous floor when absent.
    #[serde(default)]
    pub elevation: Option<RawLength>,
    #[serde(default)]
    pub rooms: Vec<RoomDecl>,
}

impl FloorDecl {
    pub fn new(id: impl Into<String>, rooms: Vec<RoomDecl>) -> Self {
        Self {
            id: id.into(),
            elevation: None,
            rooms,
        }
    }
}

/// `style Name { ... }`; missing properties fall back to the built-in style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDecl {
    pub name: String,
    pub floor_color: Option<String>,
    pub wall_color: Option<String>,
    pub floor_texture: Option<String>,
    pub wall_texture: Option<String>,
    pub roughness: Option<f64>,
    pub metalness: Option<f64>,
}

impl StyleDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One `key: value` config line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: ConfigValue,
}

impl ConfigEntry {
    pub fn new(key: impl Into<String>, value: ConfigValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigValue {
    Number(f64),
    Length(RawLength),
    Size(RawLength, RawLength),
    Text(String),
    Bool(bool),
}

/// `room.wall` as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallRefDecl {
    pub room: String,
    pub wall: WallDirection,
}

/// `connect a.right to b.left door at 50%`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDecl {
    pub from: WallRefDecl,
    pub to: WallRefDecl,
    pub kind: OpeningKind,
    #[serde(default)]
    pub at: Option<f64>,
    #[serde(default)]
    pub swing: Option<Swing>,
    #[serde(default)]
    pub opens_into: Option<String>,
    #[serde(default)]
    pub size: Option<(RawLength, RawLength)>,
}

impl ConnectionDecl {
    pub fn new(
        from: (&str, WallDirection),
        to: (&str, WallDirection),
        kind: OpeningKind,
    ) -> Self {
        Self {
            from: WallRefDecl {
                room: from.0.to_string(),
                wall: from.1,
            },
            to: WallRefDecl {
                room: to.0.to_string(),
                wall: to.1,
            },
            kind,
            at: None,
            swing: None,
            opens_into: None,
            size: None,
        }
    }

    pub fn at(mut self, percent: f64) -> Self {
        self.at = Some(percent);
        self
    }
}
