// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Diagnostics collected across all resolution stages.
//!
//! - [`Warning`]: non-fatal findings, typed like [`Error`]
//! - [`Diagnostic`]: flattened `{severity, kind, message, location}` record
//! - [`Diagnostics`]: ordered collector every stage appends to

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Error;
use crate::model::{WallDirection, WallType};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    // Errors
    UnitError,
    UndefinedVariableError,
    DuplicateVariableError,
    UndefinedStyleError,
    InvalidColorFormatError,
    OutOfRangeError,
    DuplicateStyleError,
    InvalidConfigValueError,
    UnsupportedVersionError,
    DuplicateRoomError,
    UndefinedRoomError,
    DegenerateBoundsError,
    InvalidPolygonError,
    OverlappingRoomsError,
    AmbiguousOwnershipError,
    OverlappingNeighborError,
    NotAdjacentError,
    OverlappingOpeningError,

    // Warnings
    MixedUnits,
    WallTypeMismatch,
    WallHeightMismatch,
    DeprecatedKey,
    MissingVersion,
    FutureMinorVersion,
    UnknownConfigKey,
    DuplicateConfigKey,
    UnknownTheme,
    UnusedVariable,
    SubRoomOutsideParent,
    StackMisaligned,
    PolygonExcluded,
    OpeningClipped,
    InvalidOpensInto,
    SwingIgnored,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        use DiagnosticKind::*;
        match self {
            UnitError
            | UndefinedVariableError
            | DuplicateVariableError
            | UndefinedStyleError
            | InvalidColorFormatError
            | OutOfRangeError
            | DuplicateStyleError
            | InvalidConfigValueError
            | UnsupportedVersionError
            | DuplicateRoomError
            | UndefinedRoomError
            | DegenerateBoundsError
            | InvalidPolygonError
            | OverlappingRoomsError
            | AmbiguousOwnershipError
            | OverlappingNeighborError
            | NotAdjacentError
            | OverlappingOpeningError => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

/// Where a diagnostic applies. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wall: Option<WallDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_key: Option<String>,
}

impl Location {
    /// Document-wide location.
    pub fn document() -> Self {
        Self::default()
    }

    pub fn floor(id: impl Into<String>) -> Self {
        Self {
            floor: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn style(name: impl Into<String>) -> Self {
        Self {
            style: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn config_key(key: impl Into<String>) -> Self {
        Self {
            config_key: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    pub fn with_wall(mut self, wall: WallDirection) -> Self {
        self.wall = Some(wall);
        self
    }

    pub fn with_connection(mut self, index: usize) -> Self {
        self.connection = Some(index);
        self
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if let Some(floor) = &self.floor {
            parts.push(format!("floor '{}'", floor));
        }
        if let Some(room) = &self.room {
            parts.push(format!("room '{}'", room));
        }
        if let Some(wall) = self.wall {
            parts.push(format!("{} wall", wall));
        }
        if let Some(index) = self.connection {
            parts.push(format!("connection #{}", index));
        }
        if let Some(style) = &self.style {
            parts.push(format!("style '{}'", style));
        }
        if let Some(key) = &self.config_key {
            parts.push(format!("config '{}'", key));
        }
        if parts.is_empty() {
            f.write_str("document")
        } else {
            f.write_str(&parts.join(" > "))
        }
    }
}

/// Non-fatal findings. Resolution always proceeds past these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Warning {
    #[error("document mixes length units: {}", units.join(", "))]
    MixedUnits { units: Vec<String> },

    #[error("{location}: wall type '{owner_type}' of '{owner}' differs from '{neighbor_type}' of '{neighbor}'")]
    WallTypeMismatch {
        owner: String,
        neighbor: String,
        owner_type: WallType,
        neighbor_type: WallType,
        location: Location,
    },

    #[error("{location}: wall height {owner_height:.3} m of '{owner}' differs from {neighbor_height:.3} m of '{neighbor}'")]
    WallHeightMismatch {
        owner: String,
        neighbor: String,
        owner_height: f64,
        neighbor_height: f64,
        location: Location,
    },

    #[error("config key '{key}' is deprecated since {since} and will be removed in {removal}; use '{replacement}' instead")]
    DeprecatedKey {
        key: String,
        replacement: &'static str,
        since: String,
        removal: String,
    },

    #[error("no grammar version declared; assuming {assumed}")]
    MissingVersion { assumed: String },

    #[error("grammar version {declared} is newer than {current}; newer features may be ignored")]
    FutureMinorVersion { declared: String, current: String },

    #[error("unknown config key '{key}'")]
    UnknownConfigKey { key: String },

    #[error("config key '{key}' is set more than once in the same block; the last value wins")]
    DuplicateConfigKey { key: String },

    #[error("unknown theme '{theme}'; using 'default'")]
    UnknownTheme { theme: String },

    #[error("variable '{name}' is never used")]
    UnusedVariable { name: String },

    #[error("{location}: sub-room extends beyond its parent")]
    SubRoomOutsideParent { location: Location },

    #[error("{location}: does not sit above '{below}' (must be on a lower floor with an overlapping footprint)")]
    StackMisaligned { below: String, location: Location },

    #[error("{location}: polygon rooms take no part in wall synthesis")]
    PolygonExcluded { location: Location },

    #[error("{location}: opening width {requested:.3} m clipped to {actual:.3} m at the segment end")]
    OpeningClipped {
        requested: f64,
        actual: f64,
        location: Location,
    },

    #[error("{location}: opens into '{target}', which is neither side of the connection")]
    InvalidOpensInto { target: String, location: Location },

    #[error("{location}: swing only applies to doors")]
    SwingIgnored { location: Location },
}

impl Warning {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Warning::MixedUnits { .. } => DiagnosticKind::MixedUnits,
            Warning::WallTypeMismatch { .. } => DiagnosticKind::WallTypeMismatch,
            Warning::WallHeightMismatch { .. } => DiagnosticKind::WallHeightMismatch,
            Warning::DeprecatedKey { .. } => DiagnosticKind::DeprecatedKey,
            Warning::MissingVersion { .. } => DiagnosticKind::MissingVersion,
            Warning::FutureMinorVersion { .. } => DiagnosticKind::FutureMinorVersion,
            Warning::UnknownConfigKey { .. } => DiagnosticKind::UnknownConfigKey,
            Warning::DuplicateConfigKey { .. } => DiagnosticKind::DuplicateConfigKey,
            Warning::UnknownTheme { .. } => DiagnosticKind::UnknownTheme,
            Warning::UnusedVariable { .. } => DiagnosticKind::UnusedVariable,
            Warning::SubRoomOutsideParent { .. } => DiagnosticKind::SubRoomOutsideParent,
            Warning::StackMisaligned { .. } => DiagnosticKind::StackMisaligned,
            Warning::PolygonExcluded { .. } => DiagnosticKind::PolygonExcluded,
            Warning::OpeningClipped { .. } => DiagnosticKind::OpeningClipped,
            Warning::InvalidOpensInto { .. } => DiagnosticKind::InvalidOpensInto,
            Warning::SwingIgnored { .. } => DiagnosticKind::SwingIgnored,
        }
    }

    pub fn location(&self) -> Location {
        match self {
            Warning::WallTypeMismatch { location, .. }
            | Warning::WallHeightMismatch { location, .. }
            | Warning::SubRoomOutsideParent { location }
            | Warning::StackMisaligned { location, .. }
            | Warning::PolygonExcluded { location }
            | Warning::OpeningClipped { location, .. }
            | Warning::InvalidOpensInto { location, .. }
            | Warning::SwingIgnored { location } => location.clone(),
            Warning::DeprecatedKey { key, .. }
            | Warning::UnknownConfigKey { key }
            | Warning::DuplicateConfigKey { key } => Location::config_key(key.clone()),
            Warning::UnknownTheme { .. } => Location::config_key("theme"),
            Warning::MixedUnits { .. }
            | Warning::MissingVersion { .. }
            | Warning::FutureMinorVersion { .. }
            | Warning::UnusedVariable { .. } => Location::document(),
        }
    }
}

/// A single entry of the diagnostics report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    pub location: Location,
}

impl From<&Error> for Diagnostic {
    fn from(err: &Error) -> Self {
        Self {
            severity: Severity::Error,
            kind: err.kind(),
            message: err.to_string(),
            location: err.location().clone(),
        }
    }
}

impl From<&Warning> for Diagnostic {
    fn from(warning: &Warning) -> Self {
        Self {
            severity: Severity::Warning,
            kind: warning.kind(),
            message: warning.to_string(),
            location: warning.location(),
        }
    }
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, err: Error) {
        tracing::debug!(kind = ?err.kind(), "{}", err);
        self.entries.push(Diagnostic::from(&err));
    }

    pub fn warn(&mut self, warning: Warning) {
        tracing::debug!(kind = ?warning.kind(), "{}", warning);
        self.entries.push(Diagnostic::from(&warning));
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Number of entries of the given kind.
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.count_of(kind) > 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
