// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grammar version handling and the deprecation schedule.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Location, Warning};
use crate::error::{Error, Result};

/// `MAJOR.MINOR.PATCH` grammar version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GrammarVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl GrammarVersion {
    /// Version implemented by this crate.
    pub const CURRENT: GrammarVersion = GrammarVersion::new(1, 2, 0);

    /// Oldest major version still accepted.
    pub const MIN_SUPPORTED_MAJOR: u32 = 1;

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse `MAJOR.MINOR[.PATCH]`, with an optional leading `v`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let text = text.strip_prefix('v').unwrap_or(text);
        let mut parts = text.split('.');

        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        let patch = match parts.next() {
            Some(p) => p.parse().ok()?,
            None => 0,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(major, minor, patch))
    }
}

impl Default for GrammarVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl std::fmt::Display for GrammarVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Resolve the declared version.
///
/// Returns the effective version and an optional advisory. Unparseable
/// versions and unsupported majors are hard errors.
pub fn resolve_version(declared: Option<&str>) -> Result<(GrammarVersion, Option<Warning>)> {
    let Some(text) = declared else {
        return Ok((
            GrammarVersion::CURRENT,
            Some(Warning::MissingVersion {
                assumed: GrammarVersion::CURRENT.to_string(),
            }),
        ));
    };

    let version = GrammarVersion::parse(text).ok_or_else(|| Error::UnsupportedVersion {
        version: text.to_string(),
        reason: "expected MAJOR.MINOR[.PATCH]".to_string(),
        location: Location::document(),
    })?;

    if version.major < GrammarVersion::MIN_SUPPORTED_MAJOR {
        return Err(Error::UnsupportedVersion {
            version: text.to_string(),
            reason: format!(
                "major versions before {} are no longer supported",
                GrammarVersion::MIN_SUPPORTED_MAJOR
            ),
            location: Location::document(),
        });
    }

    if version.major > GrammarVersion::CURRENT.major {
        return Err(Error::UnsupportedVersion {
            version: text.to_string(),
            reason: format!("newest supported version is {}", GrammarVersion::CURRENT),
            location: Location::document(),
        });
    }

    let warning = (version > GrammarVersion::CURRENT).then(|| Warning::FutureMinorVersion {
        declared: version.to_string(),
        current: GrammarVersion::CURRENT.to_string(),
    });

    Ok((version, warning))
}

/// A config key scheduled for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deprecation {
    pub key: &'static str,
    pub replacement: &'static str,
    pub since: GrammarVersion,
    pub removal: GrammarVersion,
}

impl Deprecation {
    /// Warning for a document declaring `version`, if the key is already
    /// deprecated there.
    pub fn warning_for(&self, version: GrammarVersion) -> Option<Warning> {
        (version >= self.since).then(|| Warning::DeprecatedKey {
            key: self.key.to_string(),
            replacement: self.replacement,
            since: self.since.to_string(),
            removal: self.removal.to_string(),
        })
    }
}

pub const DEPRECATIONS: &[Deprecation] = &[
    Deprecation {
        key: "door_width",
        replacement: "door_size",
        since: GrammarVersion::new(1, 1, 0),
        removal: GrammarVersion::new(2, 0, 0),
    },
    Deprecation {
        key: "door_height",
        replacement: "door_size",
        since: GrammarVersion::new(1, 1, 0),
        removal: GrammarVersion::new(2, 0, 0),
    },
    Deprecation {
        key: "window_width",
        replacement: "window_size",
        since: GrammarVersion::new(1, 1, 0),
        removal: GrammarVersion::new(2, 0, 0),
    },
    Deprecation {
        key: "window_height",
        replacement: "window_size",
        since: GrammarVersion::new(1, 1, 0),
        removal: GrammarVersion::new(2, 0, 0),
    },
];

pub fn deprecation_for(key: &str) -> Option<&'static Deprecation> {
    DEPRECATIONS.iter().find(|d| d.key == key)
}
