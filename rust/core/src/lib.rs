// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Floorplan Core
//!
//! Resolves a parsed floor-plan document into a canonical model with every
//! length in meters, every style reference bound and every config key
//! settled.
//!
//! ## Overview
//!
//! - **Units**: `m`, `cm`, `mm`, `ft`, `in`, with a document default unit
//! - **Variables & styles**: `define` bindings and named material bundles
//! - **Config & version**: layered config, grammar version and deprecations
//! - **Document model**: floors, rooms (with sub-rooms) and connections
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use floorplan_core::{resolve_document, ast::{Document, FloorDecl, RoomDecl}};
//!
//! let doc = Document {
//!     version: Some("1.2".into()),
//!     floors: vec![FloorDecl::new("ground", vec![RoomDecl::rect("hall", 0.0, 0.0, 4.0, 3.0)])],
//!     ..Document::default()
//! };
//!
//! let resolution = resolve_document(&doc);
//! for diagnostic in resolution.diagnostics.iter() {
//!     println!("{:?}: {}", diagnostic.kind, diagnostic.message);
//! }
//! ```

pub mod ast;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod polygon;
pub mod resolve;
pub mod style;
pub mod units;
pub mod variables;
pub mod version;

pub use config::{Config, ConfigResolver, Theme};
pub use context::ResolutionContext;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Location, Severity, Warning};
pub use error::{Error, Result};
pub use model::{
    Axis, Bounds, Connection, OpeningKind, Point2D, Rect, ResolvedDocument, ResolvedFloor,
    ResolvedRoom, Swing, WallDirection, WallRef, WallType, Walls, LENGTH_EPSILON,
};
pub use resolve::{resolve_document, Resolution};
pub use style::{Color, Style, StyleTable};
pub use units::{LengthUnit, UnitResolver};
pub use variables::VariableTable;
pub use version::GrammarVersion;
