// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error taxonomy shared by every resolution stage.
//!
//! Errors are values: stages push them into [`crate::Diagnostics`] and keep
//! going. Only the variants reported by [`Error::halts_floor`] stop a floor's
//! geometry derivation.

use thiserror::Error;

use crate::diagnostics::{DiagnosticKind, Location};

/// Result type for resolution operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving a floor plan
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{location}: unrecognized unit '{tag}' (expected m, cm, mm, ft or in)")]
    Unit { tag: String, location: Location },

    #[error("{location}: undefined variable '{name}'")]
    UndefinedVariable { name: String, location: Location },

    #[error("variable '{name}' is defined more than once")]
    DuplicateVariable { name: String, location: Location },

    #[error("{location}: undefined style '{name}'")]
    UndefinedStyle { name: String, location: Location },

    #[error("{location}: {property} '{value}' is not a #RRGGBB color")]
    InvalidColorFormat {
        property: String,
        value: String,
        location: Location,
    },

    #[error("{location}: {property} {value} is outside [{min}, {max}]")]
    OutOfRange {
        property: String,
        value: f64,
        min: f64,
        max: f64,
        location: Location,
    },

    #[error("style '{name}' is defined more than once")]
    DuplicateStyle { name: String, location: Location },

    #[error("{location}: config key '{key}' expects {expected}")]
    InvalidConfigValue {
        key: String,
        expected: &'static str,
        location: Location,
    },

    #[error("unsupported grammar version '{version}': {reason}")]
    UnsupportedVersion {
        version: String,
        reason: String,
        location: Location,
    },

    #[error("{location}: room '{name}' is defined more than once")]
    DuplicateRoom { name: String, location: Location },

    #[error("{location}: undefined room '{name}'")]
    UndefinedRoom { name: String, location: Location },

    #[error("{location}: bounds {width} x {height} are degenerate")]
    DegenerateBounds {
        width: f64,
        height: f64,
        location: Location,
    },

    #[error("{location}: invalid polygon: {reason}")]
    InvalidPolygon { reason: String, location: Location },

    #[error("{location}: rooms '{first}' and '{second}' overlap")]
    OverlappingRooms {
        first: String,
        second: String,
        location: Location,
    },

    #[error("{location}: cannot decide which of '{first}' and '{second}' owns the shared wall (equal coordinates)")]
    AmbiguousOwnership {
        first: String,
        second: String,
        location: Location,
    },

    #[error("{location}: neighbors '{first}' and '{second}' overlap on [{start:.3}, {end:.3}]")]
    OverlappingNeighbor {
        first: String,
        second: String,
        start: f64,
        end: f64,
        location: Location,
    },

    #[error("{location}: '{from}' and '{to}' are not adjacent")]
    NotAdjacent {
        from: String,
        to: String,
        location: Location,
    },

    #[error("{location}: openings of connections #{first} and #{second} overlap on [{start:.3}, {end:.3}]")]
    OverlappingOpening {
        first: usize,
        second: usize,
        start: f64,
        end: f64,
        location: Location,
    },
}

impl Error {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Error::Unit { .. } => DiagnosticKind::UnitError,
            Error::UndefinedVariable { .. } => DiagnosticKind::UndefinedVariableError,
            Error::DuplicateVariable { .. } => DiagnosticKind::DuplicateVariableError,
            Error::UndefinedStyle { .. } => DiagnosticKind::UndefinedStyleError,
            Error::InvalidColorFormat { .. } => DiagnosticKind::InvalidColorFormatError,
            Error::OutOfRange { .. } => DiagnosticKind::OutOfRangeError,
            Error::DuplicateStyle { .. } => DiagnosticKind::DuplicateStyleError,
            Error::InvalidConfigValue { .. } => DiagnosticKind::InvalidConfigValueError,
            Error::UnsupportedVersion { .. } => DiagnosticKind::UnsupportedVersionError,
            Error::DuplicateRoom { .. } => DiagnosticKind::DuplicateRoomError,
            Error::UndefinedRoom { .. } => DiagnosticKind::UndefinedRoomError,
            Error::DegenerateBounds { .. } => DiagnosticKind::DegenerateBoundsError,
            Error::InvalidPolygon { .. } => DiagnosticKind::InvalidPolygonError,
            Error::OverlappingRooms { .. } => DiagnosticKind::OverlappingRoomsError,
            Error::AmbiguousOwnership { .. } => DiagnosticKind::AmbiguousOwnershipError,
            Error::OverlappingNeighbor { .. } => DiagnosticKind::OverlappingNeighborError,
            Error::NotAdjacent { .. } => DiagnosticKind::NotAdjacentError,
            Error::OverlappingOpening { .. } => DiagnosticKind::OverlappingOpeningError,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            Error::Unit { location, .. }
            | Error::UndefinedVariable { location, .. }
            | Error::DuplicateVariable { location, .. }
            | Error::UndefinedStyle { location, .. }
            | Error::InvalidColorFormat { location, .. }
            | Error::OutOfRange { location, .. }
            | Error::DuplicateStyle { location, .. }
            | Error::InvalidConfigValue { location, .. }
            | Error::UnsupportedVersion { location, .. }
            | Error::DuplicateRoom { location, .. }
            | Error::UndefinedRoom { location, .. }
            | Error::DegenerateBounds { location, .. }
            | Error::InvalidPolygon { location, .. }
            | Error::OverlappingRooms { location, .. }
            | Error::AmbiguousOwnership { location, .. }
            | Error::OverlappingNeighbor { location, .. }
            | Error::NotAdjacent { location, .. }
            | Error::OverlappingOpening { location, .. } => location,
        }
    }

    /// Errors after which no coherent segment set can be built for a floor.
    pub fn halts_floor(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedVersion { .. }
                | Error::AmbiguousOwnership { .. }
                | Error::NotAdjacent { .. }
        )
    }
}
