// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Style table: validated material bundles shared by reference.

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::ast::StyleDecl;
use crate::diagnostics::{Diagnostics, Location};
use crate::error::{Error, Result};

/// `#RRGGBB` color, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color(String);

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(text: String) -> std::result::Result<Self, Self::Error> {
        Color::parse(&text).ok_or_else(|| format!("'{}' is not a #RRGGBB color", text))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl Color {
    /// Parse a color written as exactly `#` followed by six hex digits.
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Color(format!("#{}", digits.to_ascii_uppercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// RGBA in `[0, 1]`, alpha always 1.
    pub fn rgba(&self) -> [f32; 4] {
        let channel = |i: usize| {
            u8::from_str_radix(&self.0[i..i + 2], 16).map_or(0.0, |v| v as f32 / 255.0)
        };
        [channel(1), channel(3), channel(5), 1.0]
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub name: String,
    pub floor_color: Color,
    pub wall_color: Color,
    pub floor_texture: Option<String>,
    pub wall_texture: Option<String>,
    pub roughness: f64,
    pub metalness: f64,
}

impl Style {
    pub const FALLBACK_NAME: &'static str = "default";
    pub const FALLBACK_FLOOR_COLOR: &'static str = "#E0E0E0";
    pub const FALLBACK_WALL_COLOR: &'static str = "#909090";
    pub const FALLBACK_ROUGHNESS: f64 = 0.8;
    pub const FALLBACK_METALNESS: f64 = 0.1;

    /// Built-in style used when neither the room nor the config names one.
    pub fn fallback() -> Self {
        Self {
            name: Self::FALLBACK_NAME.to_string(),
            floor_color: Color(Self::FALLBACK_FLOOR_COLOR.to_string()),
            wall_color: Color(Self::FALLBACK_WALL_COLOR.to_string()),
            floor_texture: None,
            wall_texture: None,
            roughness: Self::FALLBACK_ROUGHNESS,
            metalness: Self::FALLBACK_METALNESS,
        }
    }

    /// Validate a declaration.
    ///
    /// Properties are checked in order (colors, roughness, metalness) and the
    /// first failure is returned, so one bad style yields one error.
    pub fn from_decl(decl: &StyleDecl) -> Result<Self> {
        let location = Location::style(&decl.name);
        let fallback = Self::fallback();

        let color = |property: &str, value: &Option<String>, default: Color| match value {
            Some(text) => Color::parse(text).ok_or_else(|| Error::InvalidColorFormat {
                property: property.to_string(),
                value: text.clone(),
                location: location.clone(),
            }),
            None => Ok(default),
        };
        let unit_interval = |property: &str, value: Option<f64>, default: f64| match value {
            Some(v) if !(0.0..=1.0).contains(&v) => Err(Error::OutOfRange {
                property: property.to_string(),
                value: v,
                min: 0.0,
                max: 1.0,
                location: location.clone(),
            }),
            Some(v) => Ok(v),
            None => Ok(default),
        };

        Ok(Self {
            name: decl.name.clone(),
            floor_color: color("floor_color", &decl.floor_color, fallback.floor_color)?,
            wall_color: color("wall_color", &decl.wall_color, fallback.wall_color)?,
            floor_texture: decl.floor_texture.clone(),
            wall_texture: decl.wall_texture.clone(),
            roughness: unit_interval("roughness", decl.roughness, fallback.roughness)?,
            metalness: unit_interval("metalness", decl.metalness, fallback.metalness)?,
        })
    }
}

/// Named styles plus the document default.
#[derive(Debug, Clone)]
pub struct StyleTable {
    styles: FxHashMap<String, Arc<Style>>,
    /// Declared but invalid; already reported once.
    rejected: FxHashSet<String>,
    default: Arc<Style>,
}

impl StyleTable {
    /// Build the table from declarations.
    ///
    /// Invalid styles are reported once and left out; references to them
    /// fall back to the default without a further error. Duplicate names are
    /// reported and the first definition kept. A `default_style` that names
    /// no declared style is reported and the built-in fallback used.
    pub fn build(
        decls: &[StyleDecl],
        default_style: Option<&str>,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut styles: FxHashMap<String, Arc<Style>> = FxHashMap::default();
        let mut rejected: FxHashSet<String> = FxHashSet::default();

        for decl in decls {
            if styles.contains_key(&decl.name) || rejected.contains(&decl.name) {
                diagnostics.error(Error::DuplicateStyle {
                    name: decl.name.clone(),
                    location: Location::style(&decl.name),
                });
                continue;
            }
            match Style::from_decl(decl) {
                Ok(style) => {
                    styles.insert(decl.name.clone(), Arc::new(style));
                }
                Err(err) => {
                    diagnostics.error(err);
                    rejected.insert(decl.name.clone());
                }
            }
        }

        let default = match default_style {
            Some(name) => match styles.get(name) {
                Some(style) => Arc::clone(style),
                None if rejected.contains(name) => Arc::new(Style::fallback()),
                None => {
                    diagnostics.error(Error::UndefinedStyle {
                        name: name.to_string(),
                        location: Location::config_key("default_style"),
                    });
                    Arc::new(Style::fallback())
                }
            },
            None => Arc::new(Style::fallback()),
        };

        Self {
            styles,
            rejected,
            default,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Style>> {
        self.styles.get(name)
    }

    pub fn default_style(&self) -> &Arc<Style> {
        &self.default
    }

    /// Whether `name` was declared but failed validation.
    pub fn is_rejected(&self, name: &str) -> bool {
        self.rejected.contains(name)
    }

    /// Style for a room: explicit reference, else the document default.
    ///
    /// A reference to a rejected style gets the default.
    pub fn resolve(&self, explicit: Option<&str>, location: &Location) -> Result<Arc<Style>> {
        match explicit {
            Some(name) if self.rejected.contains(name) => Ok(Arc::clone(&self.default)),
            Some(name) => self.styles.get(name).cloned().ok_or_else(|| Error::UndefinedStyle {
                name: name.to_string(),
                location: location.clone(),
            }),
            None => Ok(Arc::clone(&self.default)),
        }
    }

    /// Styles ordered by name.
    pub fn to_map(&self) -> BTreeMap<String, Arc<Style>> {
        self.styles
            .iter()
            .map(|(name, style)| (name.clone(), Arc::clone(style)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
