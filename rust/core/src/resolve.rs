// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document resolution: version, config, variables, styles, then floors,
//! rooms and connections with every length in meters.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

use crate::ast::{ConnectionDecl, DimensionExpr, Document, FloorDecl, RoomDecl, Shape, WallsDecl};
use crate::config::{declared_version, Config, ConfigResolver};
use crate::context::ResolutionContext;
use crate::diagnostics::{Diagnostics, Location, Warning};
use crate::error::{Error, Result};
use crate::model::{
    Bounds, Connection, Point2D, Rect, ResolvedDocument, ResolvedFloor, ResolvedRoom, WallRef,
    Walls,
};
use crate::polygon::{normalize_ring, validate_ring};
use crate::style::StyleTable;
use crate::units::{LengthUnit, UnitResolver};
use crate::variables::VariableTable;
use crate::version::{resolve_version, GrammarVersion};

/// Outcome of resolving a document.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub document: ResolvedDocument,
    pub diagnostics: Diagnostics,
    /// Set when the document cannot be resolved at all; `document` is then
    /// empty.
    pub halted: Option<Error>,
}

impl Resolution {
    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }
}

/// Resolve a parsed document into the canonical model.
///
/// Problems are collected into the returned diagnostics. Only an
/// unsupported grammar version stops resolution early.
pub fn resolve_document(doc: &Document) -> Resolution {
    let mut diagnostics = Diagnostics::new();

    // ─── Step 1: Grammar version ───
    let version = match resolve_version(declared_version(doc)) {
        Ok((version, warning)) => {
            if let Some(warning) = warning {
                diagnostics.warn(warning);
            }
            version
        }
        Err(err) => {
            diagnostics.error(err.clone());
            return Resolution {
                document: empty_document(GrammarVersion::CURRENT),
                diagnostics,
                halted: Some(err),
            };
        }
    };

    // ─── Step 2: Config layers (sets the default unit) ───
    let mut units = UnitResolver::new(LengthUnit::SYSTEM_DEFAULT);
    let config = ConfigResolver::new(version, &mut units, &mut diagnostics).resolve(doc);

    // ─── Step 3: Variables and styles ───
    let variables = VariableTable::build(&doc.defines, &mut units, &mut diagnostics);
    let styles = StyleTable::build(&doc.styles, config.default_style.as_deref(), &mut diagnostics);
    debug!(
        variables = variables.len(),
        styles = styles.len(),
        unit = %config.default_unit,
        "document tables built"
    );

    let ctx = ResolutionContext::new(version, config, styles, variables);

    // ─── Step 4: Floors and rooms ───
    let mut resolver = RoomResolver {
        ctx: &ctx,
        units: &mut units,
        diagnostics: &mut diagnostics,
        used_variables: FxHashSet::default(),
        room_floors: FxHashMap::default(),
    };
    let floors = resolver.resolve_floors(&doc.floors);
    let used_variables = std::mem::take(&mut resolver.used_variables);
    let room_floors = std::mem::take(&mut resolver.room_floors);

    // ─── Step 5: Stacking references ───
    check_stacking(&floors, &room_floors, resolver.diagnostics);

    // ─── Step 6: Connections ───
    let connections = resolver.resolve_connections(&doc.connections, &floors, &room_floors);

    // ─── Step 7: Document-wide advisories ───
    for warning in ctx.variables.unused(&used_variables) {
        diagnostics.warn(warning);
    }
    if let Some(warning) = units.usage().mixed_units_warning() {
        diagnostics.warn(warning);
    }

    info!(
        version = %version,
        floors = floors.len(),
        rooms = floors.iter().map(|f| f.rooms.len()).sum::<usize>(),
        connections = connections.len(),
        errors = diagnostics.error_count(),
        warnings = diagnostics.warning_count(),
        "document resolved"
    );

    Resolution {
        document: ResolvedDocument {
            version,
            config: Arc::clone(&ctx.config),
            styles: ctx.styles.to_map(),
            floors,
            connections,
        },
        diagnostics,
        halted: None,
    }
}

fn empty_document(version: GrammarVersion) -> ResolvedDocument {
    ResolvedDocument {
        version,
        config: Arc::new(Config::default()),
        styles: Default::default(),
        floors: Vec::new(),
        connections: Vec::new(),
    }
}

/// Absolute frame of an enclosing room, for sub-room placement.
struct ParentFrame {
    id: String,
    bounds: Rect,
}

struct RoomResolver<'a> {
    ctx: &'a ResolutionContext,
    units: &'a mut UnitResolver,
    diagnostics: &'a mut Diagnostics,
    used_variables: FxHashSet<String>,
    /// Room id -> index of the floor it sits on.
    room_floors: FxHashMap<String, usize>,
}

impl<'a> RoomResolver<'a> {
    fn resolve_floors(&mut self, decls: &[FloorDecl]) -> Vec<ResolvedFloor> {
        let mut floors: Vec<ResolvedFloor> = Vec::with_capacity(decls.len());

        for (index, decl) in decls.iter().enumerate() {
            let location = Location::floor(&decl.id);
            let stacked = floors
                .last()
                .map(|prev| prev.elevation + prev.height)
                .unwrap_or(0.0);
            let elevation = match &decl.elevation {
                Some(raw) => match self.units.resolve(raw, &location) {
                    Ok(value) => value,
                    Err(err) => {
                        self.diagnostics.error(err);
                        stacked
                    }
                },
                None => stacked,
            };

            let mut rooms = Vec::new();
            for room in &decl.rooms {
                self.resolve_room(room, &decl.id, index, elevation, None, &mut rooms);
            }

            let height = self.floor_height(&rooms);
            debug!(floor = %decl.id, elevation, height, rooms = rooms.len(), "floor resolved");

            floors.push(ResolvedFloor {
                id: decl.id.clone(),
                index,
                elevation,
                height,
                rooms,
            });
        }

        floors
    }

    /// Storey height: configured, else the tallest top-level room, else the
    /// default wall height.
    fn floor_height(&self, rooms: &[ResolvedRoom]) -> f64 {
        if let Some(height) = self.ctx.config.floor_height {
            return height;
        }
        rooms
            .iter()
            .filter(|room| room.parent.is_none())
            .map(|room| room.elevation + room.height)
            .fold(None, |max: Option<f64>, h| Some(max.map_or(h, |m| m.max(h))))
            .unwrap_or(self.ctx.config.wall_height)
    }

    fn resolve_room(
        &mut self,
        decl: &RoomDecl,
        floor_id: &str,
        floor_index: usize,
        floor_elevation: f64,
        parent: Option<&ParentFrame>,
        out: &mut Vec<ResolvedRoom>,
    ) {
        let id = match parent {
            Some(parent) => format!("{}.{}", parent.id, decl.name),
            None => decl.name.clone(),
        };
        let location = Location::floor(floor_id).with_room(&id);

        if self.room_floors.contains_key(&id) {
            self.diagnostics.error(Error::DuplicateRoom {
                name: id,
                location,
            });
            return;
        }

        let origin = parent.map(|p| (p.bounds.x, p.bounds.y)).unwrap_or((0.0, 0.0));
        let bounds = match self.resolve_bounds(&decl.shape, origin, &location) {
            Some(bounds) => bounds,
            None => return,
        };

        if let Some(parent) = parent {
            if !parent.bounds.contains(&bounds.bounding_rect()) {
                self.diagnostics.warn(Warning::SubRoomOutsideParent {
                    location: location.clone(),
                });
            }
        }

        let height = match &decl.height {
            Some(raw) => match self.units.resolve(raw, &location) {
                Ok(value) if value > 0.0 => value,
                Ok(value) => {
                    self.diagnostics.error(Error::OutOfRange {
                        property: "height".to_string(),
                        value,
                        min: 0.0,
                        max: f64::INFINITY,
                        location,
                    });
                    return;
                }
                Err(err) => {
                    self.diagnostics.error(err);
                    return;
                }
            },
            None => self.ctx.config.wall_height,
        };

        let elevation = match &decl.elevation {
            Some(raw) => match self.units.resolve(raw, &location) {
                Ok(value) => value,
                Err(err) => {
                    self.diagnostics.error(err);
                    return;
                }
            },
            None => 0.0,
        };

        // A bad style reference still leaves a usable room.
        let (style, explicit_style) = match self.ctx.styles.resolve(decl.style.as_deref(), &location) {
            Ok(style) => {
                let explicit = decl
                    .style
                    .as_deref()
                    .is_some_and(|name| !self.ctx.styles.is_rejected(name));
                (style, explicit)
            }
            Err(err) => {
                self.diagnostics.error(err);
                (Arc::clone(self.ctx.styles.default_style()), false)
            }
        };

        let frame = ParentFrame {
            id: id.clone(),
            bounds: bounds.bounding_rect(),
        };

        self.room_floors.insert(id.clone(), floor_index);
        out.push(ResolvedRoom {
            id,
            label: decl.label.clone(),
            parent: parent.map(|p| p.id.clone()),
            bounds,
            walls: resolve_walls(&decl.walls),
            height,
            elevation,
            absolute_elevation: floor_elevation + elevation,
            style,
            explicit_style,
            stacks_above: decl.stacks_above.clone(),
        });

        for sub_room in &decl.sub_rooms {
            self.resolve_room(sub_room, floor_id, floor_index, floor_elevation, Some(&frame), out);
        }
    }

    fn resolve_bounds(
        &mut self,
        shape: &Shape,
        origin: (f64, f64),
        location: &Location,
    ) -> Option<Bounds> {
        match shape {
            Shape::Rect { position, size } => {
                // Both halves are checked so one pass reports both problems.
                let position = self.resolve_dimension(position, location);
                let size = self.resolve_dimension(size, location);
                let ((x, y), (width, height)) = match (position, size) {
                    (Ok(position), Ok(size)) => (position, size),
                    (position, size) => {
                        for err in [position.err(), size.err()].into_iter().flatten() {
                            self.diagnostics.error(err);
                        }
                        return None;
                    }
                };
                if width <= 0.0 || height <= 0.0 {
                    self.diagnostics.error(Error::DegenerateBounds {
                        width,
                        height,
                        location: location.clone(),
                    });
                    return None;
                }
                Some(Bounds::Rect(Rect::new(
                    origin.0 + x,
                    origin.1 + y,
                    width,
                    height,
                )))
            }
            Shape::Polygon { vertices } => {
                let mut points = Vec::with_capacity(vertices.len());
                for (x, y) in vertices {
                    match self.units.resolve_pair(x, y, location) {
                        Ok((x, y)) => points.push(Point2D::new(origin.0 + x, origin.1 + y)),
                        Err(err) => {
                            self.diagnostics.error(err);
                            return None;
                        }
                    }
                }
                let ring = normalize_ring(&points);
                if let Err(reason) = validate_ring(&ring) {
                    self.diagnostics.error(Error::InvalidPolygon {
                        reason,
                        location: location.clone(),
                    });
                    return None;
                }
                Some(Bounds::Polygon(ring))
            }
        }
    }

    fn resolve_dimension(&mut self, expr: &DimensionExpr, location: &Location) -> Result<(f64, f64)> {
        match expr {
            DimensionExpr::Literal(a, b) => self.units.resolve_pair(a, b, location),
            DimensionExpr::Variable(name) => {
                self.used_variables.insert(name.clone());
                self.ctx.variables.lookup(name, location)
            }
        }
    }

    fn resolve_connections(
        &mut self,
        decls: &[ConnectionDecl],
        floors: &[ResolvedFloor],
        room_floors: &FxHashMap<String, usize>,
    ) -> Vec<Connection> {
        let mut connections = Vec::with_capacity(decls.len());

        for (index, decl) in decls.iter().enumerate() {
            let location = Location::document().with_connection(index);

            let mut known = true;
            for room in [&decl.from.room, &decl.to.room] {
                if !room_floors.contains_key(room) {
                    self.diagnostics.error(Error::UndefinedRoom {
                        name: room.clone(),
                        location: location.clone(),
                    });
                    known = false;
                }
            }
            let Some(&floor_index) = room_floors.get(&decl.from.room) else {
                continue;
            };
            if !known {
                continue;
            }

            let size = match &decl.size {
                Some((width, height)) => match self.units.resolve_pair(width, height, &location) {
                    Ok((w, h)) if w > 0.0 && h > 0.0 => Some((w, h)),
                    Ok((w, h)) => {
                        self.diagnostics.error(Error::OutOfRange {
                            property: "size".to_string(),
                            value: w.min(h),
                            min: 0.0,
                            max: f64::INFINITY,
                            location,
                        });
                        continue;
                    }
                    Err(err) => {
                        self.diagnostics.error(err);
                        continue;
                    }
                },
                None => None,
            };

            connections.push(Connection {
                index,
                floor: floors[floor_index].id.clone(),
                from: WallRef::new(&decl.from.room, decl.from.wall),
                to: WallRef::new(&decl.to.room, decl.to.wall),
                kind: decl.kind,
                at: decl.at,
                swing: decl.swing,
                opens_into: decl.opens_into.clone(),
                size,
            });
        }

        connections
    }
}

fn resolve_walls(decl: &WallsDecl) -> Walls {
    Walls {
        top: decl.top.unwrap_or_default(),
        bottom: decl.bottom.unwrap_or_default(),
        left: decl.left.unwrap_or_default(),
        right: decl.right.unwrap_or_default(),
    }
}

/// Check every `stacks_above` reference against the floors below.
fn check_stacking(
    floors: &[ResolvedFloor],
    room_floors: &FxHashMap<String, usize>,
    diagnostics: &mut Diagnostics,
) {
    for floor in floors {
        for room in &floor.rooms {
            let Some(below_id) = &room.stacks_above else {
                continue;
            };
            let location = Location::floor(&floor.id).with_room(&room.id);

            let Some(&below_floor) = room_floors.get(below_id) else {
                diagnostics.error(Error::UndefinedRoom {
                    name: below_id.clone(),
                    location,
                });
                continue;
            };

            let aligned = below_floor < floor.index
                && floors[below_floor]
                    .room(below_id)
                    .is_some_and(|below| {
                        below.bounds.bounding_rect().intersects(&room.bounds.bounding_rect())
                    });
            if !aligned {
                diagnostics.warn(Warning::StackMisaligned {
                    below: below_id.clone(),
                    location,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ConfigEntry, ConfigValue, Define, RawLength, StyleDecl};
    use crate::diagnostics::DiagnosticKind;
    use crate::model::{OpeningKind, WallDirection, WallType};
    use approx::assert_relative_eq;

    fn versioned(floors: Vec<FloorDecl>) -> Document {
        Document {
            version: Some("1.2".into()),
            floors,
            ..Document::default()
        }
    }

    #[test]
    fn test_simple_document() {
        let doc = versioned(vec![FloorDecl::new(
            "ground",
            vec![
                RoomDecl::rect("a", 0.0, 0.0, 10.0, 10.0),
                RoomDecl::rect("b", 10.0, 0.0, 10.0, 10.0).with_wall(WallDirection::Left, WallType::Door),
            ],
        )]);
        let resolution = resolve_document(&doc);
        assert!(resolution.diagnostics.is_empty(), "{:?}", resolution.diagnostics);

        let floor = &resolution.document.floors[0];
        assert_eq!(floor.rooms.len(), 2);
        let b = floor.room("b").unwrap();
        assert_eq!(b.rect().unwrap().x, 10.0);
        assert_eq!(b.walls.left, WallType::Door);
        assert_eq!(b.walls.top, WallType::Solid);
        assert_eq!(b.style.name, "default");
        assert!(!b.explicit_style);
    }

    #[test]
    fn test_missing_version_warns() {
        let doc = Document::default();
        let resolution = resolve_document(&doc);
        assert!(resolution.diagnostics.contains(DiagnosticKind::MissingVersion));
        assert_eq!(resolution.document.version, GrammarVersion::CURRENT);
        assert!(!resolution.is_halted());
    }

    #[test]
    fn test_unsupported_version_halts() {
        let mut doc = versioned(vec![FloorDecl::new(
            "ground",
            vec![RoomDecl::rect("a", 0.0, 0.0, 1.0, 1.0)],
        )]);
        doc.version = Some("2.0".into());
        let resolution = resolve_document(&doc);
        assert!(resolution.is_halted());
        assert!(resolution.document.floors.is_empty());
        assert_eq!(resolution.diagnostics.count_of(DiagnosticKind::UnsupportedVersionError), 1);
    }

    #[test]
    fn test_default_unit_applies_to_rooms() {
        let mut doc = versioned(vec![FloorDecl::new(
            "ground",
            vec![RoomDecl::rect("a", 0.0, 0.0, 400.0, 300.0)],
        )]);
        doc.config
            .push(ConfigEntry::new("default_unit", ConfigValue::Text("cm".into())));
        let resolution = resolve_document(&doc);
        let rect = *resolution.document.floors[0].rooms[0].rect().unwrap();
        assert_relative_eq!(rect.width, 4.0, epsilon = 1e-9);
        assert_relative_eq!(rect.height, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mixed_units_are_normalized() {
        let mut feet = RoomDecl::rect("bedroom", 0.0, 0.0, 0.0, 0.0);
        feet.shape = Shape::Rect {
            position: DimensionExpr::literal(0.0, 0.0),
            size: DimensionExpr::Literal(
                RawLength::with_unit(10.0, "ft"),
                RawLength::with_unit(12.0, "ft"),
            ),
        };
        let mut meters = RoomDecl::rect("office", 0.0, 0.0, 0.0, 0.0);
        meters.shape = Shape::Rect {
            position: DimensionExpr::Literal(
                RawLength::with_unit(3.048, "m"),
                RawLength::with_unit(0.0, "m"),
            ),
            size: DimensionExpr::Literal(RawLength::with_unit(3.0, "m"), RawLength::with_unit(3.0, "m")),
        };
        let doc = versioned(vec![FloorDecl::new("ground", vec![feet, meters])]);
        let resolution = resolve_document(&doc);

        assert_eq!(resolution.diagnostics.error_count(), 0);
        assert_eq!(resolution.diagnostics.count_of(DiagnosticKind::MixedUnits), 1);
        let bedroom = resolution.document.floors[0].rooms[0].rect().copied().unwrap();
        assert_relative_eq!(bedroom.width, 3.048, epsilon = 1e-9);
        assert_relative_eq!(bedroom.height, 3.6576, epsilon = 1e-9);
    }

    #[test]
    fn test_variables_and_unused() {
        let mut doc = versioned(Vec::new());
        doc.defines = vec![
            Define {
                name: "bedroom".into(),
                width: RawLength::new(4.0),
                height: RawLength::new(3.0),
            },
            Define {
                name: "closet".into(),
                width: RawLength::new(1.0),
                height: RawLength::new(1.0),
            },
        ];
        let mut room = RoomDecl::rect("b1", 0.0, 0.0, 0.0, 0.0);
        room.shape = Shape::Rect {
            position: DimensionExpr::literal(0.0, 0.0),
            size: DimensionExpr::Variable("bedroom".into()),
        };
        let mut bad = RoomDecl::rect("b2", 0.0, 0.0, 0.0, 0.0);
        bad.shape = Shape::Rect {
            position: DimensionExpr::Variable("nowhere".into()),
            size: DimensionExpr::Variable("missing".into()),
        };
        doc.floors = vec![FloorDecl::new("ground", vec![room, bad])];

        let resolution = resolve_document(&doc);
        let diags = &resolution.diagnostics;
        assert_eq!(diags.count_of(DiagnosticKind::UndefinedVariableError), 2);
        assert_eq!(diags.count_of(DiagnosticKind::UnusedVariable), 1);
        let floor = &resolution.document.floors[0];
        assert_eq!(floor.rooms.len(), 1);
        assert_eq!(floor.rooms[0].rect().unwrap().width, 4.0);
    }

    #[test]
    fn test_sub_rooms_are_absolute() {
        let hall = RoomDecl::rect("hall", 5.0, 5.0, 10.0, 10.0)
            .with_sub_room(RoomDecl::rect("closet", 1.0, 1.0, 2.0, 2.0))
            .with_sub_room(RoomDecl::rect("nook", 9.0, 9.0, 2.0, 2.0));
        let doc = versioned(vec![FloorDecl::new("ground", vec![hall])]);
        let resolution = resolve_document(&doc);

        let floor = &resolution.document.floors[0];
        let closet = floor.room("hall.closet").unwrap();
        assert_eq!(closet.parent.as_deref(), Some("hall"));
        assert_eq!(closet.rect().unwrap().x, 6.0);
        assert_eq!(
            resolution.diagnostics.count_of(DiagnosticKind::SubRoomOutsideParent),
            1
        );
    }

    #[test]
    fn test_duplicate_and_degenerate_rooms() {
        let doc = versioned(vec![
            FloorDecl::new(
                "ground",
                vec![
                    RoomDecl::rect("a", 0.0, 0.0, 1.0, 1.0),
                    RoomDecl::rect("flat", 0.0, 0.0, 1.0, 0.0),
                ],
            ),
            FloorDecl::new("upper", vec![RoomDecl::rect("a", 0.0, 0.0, 1.0, 1.0)]),
        ]);
        let resolution = resolve_document(&doc);
        let diags = &resolution.diagnostics;
        assert_eq!(diags.count_of(DiagnosticKind::DuplicateRoomError), 1);
        assert_eq!(diags.count_of(DiagnosticKind::DegenerateBoundsError), 1);
        assert_eq!(resolution.document.floors[0].rooms.len(), 1);
        assert!(resolution.document.floors[1].rooms.is_empty());
    }

    #[test]
    fn test_floors_stack() {
        let doc = versioned(vec![
            FloorDecl::new(
                "ground",
                vec![RoomDecl::rect("a", 0.0, 0.0, 4.0, 4.0).with_height(RawLength::new(3.5))],
            ),
            FloorDecl::new("upper", vec![RoomDecl::rect("b", 0.0, 0.0, 4.0, 4.0)]),
            FloorDecl::new("roof", Vec::new()),
        ]);
        let resolution = resolve_document(&doc);
        let floors = &resolution.document.floors;
        assert_relative_eq!(floors[0].elevation, 0.0, epsilon = 1e-9);
        assert_relative_eq!(floors[0].height, 3.5, epsilon = 1e-9);
        assert_relative_eq!(floors[1].elevation, 3.5, epsilon = 1e-9);
        assert_relative_eq!(floors[1].rooms[0].absolute_elevation, 3.5, epsilon = 1e-9);
        assert_relative_eq!(floors[2].elevation, 6.5, epsilon = 1e-9);
    }

    #[test]
    fn test_stacks_above() {
        let mut over = RoomDecl::rect("over", 0.0, 0.0, 4.0, 4.0);
        over.stacks_above = Some("base".into());
        let mut beside = RoomDecl::rect("beside", 20.0, 0.0, 4.0, 4.0);
        beside.stacks_above = Some("base".into());
        let mut ghost = RoomDecl::rect("ghost", 0.0, 10.0, 4.0, 4.0);
        ghost.stacks_above = Some("nothing".into());

        let doc = versioned(vec![
            FloorDecl::new("ground", vec![RoomDecl::rect("base", 0.0, 0.0, 4.0, 4.0)]),
            FloorDecl::new("upper", vec![over, beside, ghost]),
        ]);
        let resolution = resolve_document(&doc);
        let diags = &resolution.diagnostics;
        assert_eq!(diags.count_of(DiagnosticKind::StackMisaligned), 1);
        assert_eq!(diags.count_of(DiagnosticKind::UndefinedRoomError), 1);
    }

    #[test]
    fn test_bad_style_keeps_room() {
        let mut doc = versioned(vec![FloorDecl::new(
            "ground",
            vec![
                RoomDecl::rect("a", 0.0, 0.0, 1.0, 1.0).with_style("wood"),
                RoomDecl::rect("b", 1.0, 0.0, 1.0, 1.0).with_style("marble"),
            ],
        )]);
        let mut wood = StyleDecl::new("wood");
        wood.floor_color = Some("#8B4513".into());
        doc.styles = vec![wood];

        let resolution = resolve_document(&doc);
        assert_eq!(
            resolution.diagnostics.count_of(DiagnosticKind::UndefinedStyleError),
            1
        );
        let floor = &resolution.document.floors[0];
        assert_eq!(floor.rooms.len(), 2);
        assert!(floor.room("a").unwrap().explicit_style);
        assert_eq!(floor.room("b").unwrap().style.name, "default");
        assert!(resolution.document.styles.contains_key("wood"));
    }

    #[test]
    fn test_polygon_room() {
        let mut room = RoomDecl::rect("l", 0.0, 0.0, 0.0, 0.0);
        room.shape = Shape::Polygon {
            vertices: [(0.0, 0.0), (6.0, 0.0), (6.0, 3.0), (3.0, 3.0), (3.0, 6.0), (0.0, 6.0)]
                .iter()
                .map(|&(x, y)| (RawLength::new(x), RawLength::new(y)))
                .collect(),
        };
        let mut bow_tie = RoomDecl::rect("x", 0.0, 0.0, 0.0, 0.0);
        bow_tie.shape = Shape::Polygon {
            vertices: [(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0)]
                .iter()
                .map(|&(x, y)| (RawLength::new(x), RawLength::new(y)))
                .collect(),
        };
        let doc = versioned(vec![FloorDecl::new("ground", vec![room, bow_tie])]);
        let resolution = resolve_document(&doc);
        assert_eq!(
            resolution.diagnostics.count_of(DiagnosticKind::InvalidPolygonError),
            1
        );
        let floor = &resolution.document.floors[0];
        assert_eq!(floor.rooms.len(), 1);
        assert!(floor.rooms[0].rect().is_none());
    }

    #[test]
    fn test_connections_resolve() {
        let mut doc = versioned(vec![FloorDecl::new(
            "ground",
            vec![
                RoomDecl::rect("a", 0.0, 0.0, 10.0, 10.0),
                RoomDecl::rect("b", 10.0, 0.0, 10.0, 10.0),
            ],
        )]);
        let mut sized = ConnectionDecl::new(
            ("a", WallDirection::Right),
            ("b", WallDirection::Left),
            OpeningKind::Door,
        )
        .at(50.0);
        sized.size = Some((RawLength::with_unit(100.0, "cm"), RawLength::new(2.0)));
        doc.connections = vec![
            sized,
            ConnectionDecl::new(
                ("a", WallDirection::Right),
                ("zz", WallDirection::Left),
                OpeningKind::Door,
            ),
        ];

        let resolution = resolve_document(&doc);
        assert_eq!(
            resolution.diagnostics.count_of(DiagnosticKind::UndefinedRoomError),
            1
        );
        let connections = &resolution.document.connections;
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].floor, "ground");
        let (w, h) = connections[0].size.unwrap();
        assert_relative_eq!(w, 1.0, epsilon = 1e-9);
        assert_relative_eq!(h, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_non_positive_connection_size_rejected() {
        let mut doc = versioned(vec![FloorDecl::new(
            "ground",
            vec![
                RoomDecl::rect("a", 0.0, 0.0, 20.0, 10.0),
                RoomDecl::rect("b", 0.0, 10.0, 20.0, 10.0),
            ],
        )]);
        let mut inverted = ConnectionDecl::new(
            ("a", WallDirection::Bottom),
            ("b", WallDirection::Top),
            OpeningKind::Door,
        )
        .at(50.0);
        inverted.size = Some((RawLength::new(-2.0), RawLength::new(0.0)));
        doc.connections = vec![inverted];

        let resolution = resolve_document(&doc);
        assert_eq!(
            resolution.diagnostics.count_of(DiagnosticKind::OutOfRangeError),
            1
        );
        assert!(resolution.document.connections.is_empty());
    }

    #[test]
    fn test_rejected_style_reported_once() {
        let mut doc = versioned(vec![FloorDecl::new(
            "ground",
            vec![RoomDecl::rect("a", 0.0, 0.0, 4.0, 4.0).with_style("glossy")],
        )]);
        let mut glossy = StyleDecl::new("glossy");
        glossy.roughness = Some(1.5);
        doc.styles = vec![glossy];

        let resolution = resolve_document(&doc);
        assert_eq!(resolution.diagnostics.error_count(), 1);
        let room = resolution.document.floors[0].room("a").unwrap();
        assert_eq!(room.style.name, "default");
        assert!(!room.explicit_style);
    }
}
