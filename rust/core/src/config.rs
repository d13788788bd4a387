// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document configuration.
//!
//! Layers are merged with strict precedence, later wins:
//! built-in defaults < frontmatter < config block < inline directives.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::ast::{ConfigEntry, ConfigValue, Document, RawLength};
use crate::diagnostics::{Diagnostics, Location, Warning};
use crate::error::Error;
use crate::units::{parse_unit, LengthUnit, UnitResolver};
use crate::version::{deprecation_for, GrammarVersion};

/// Rendering theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Dark,
    Blueprint,
    Sketch,
}

impl Theme {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Theme::Default),
            "dark" => Some(Theme::Dark),
            "blueprint" => Some(Theme::Blueprint),
            "sketch" => Some(Theme::Sketch),
            _ => None,
        }
    }
}

/// Resolved document configuration. Lengths are meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Wall thickness
    pub wall_thickness: f64,
    /// Default wall height for rooms without an explicit height
    pub wall_height: f64,
    /// Storey height used for stacking; derived from the rooms when unset
    pub floor_height: Option<f64>,
    pub door_width: f64,
    pub door_height: f64,
    /// Double-door width as a multiple of `door_width`
    pub double_door_factor: f64,
    pub window_width: f64,
    pub window_height: f64,
    /// Window sill height above the room elevation
    pub window_sill: f64,
    pub default_unit: LengthUnit,
    pub default_style: Option<String>,
    pub theme: Theme,
    pub font_family: String,
    pub font_size: f64,
    pub show_labels: bool,
    pub show_dimensions: bool,
    pub show_area: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wall_thickness: 0.2,
            wall_height: 3.0, // Default 3m floor height
            floor_height: None,
            door_width: 0.9,
            door_height: 2.1,
            double_door_factor: 2.0,
            window_width: 1.2,
            window_height: 1.2,
            window_sill: 0.9,
            default_unit: LengthUnit::SYSTEM_DEFAULT,
            default_style: None,
            theme: Theme::Default,
            font_family: "sans-serif".to_string(),
            font_size: 12.0,
            show_labels: true,
            show_dimensions: false,
            show_area: false,
        }
    }
}

/// Merges the config layers of a document over the defaults.
pub struct ConfigResolver<'a> {
    version: GrammarVersion,
    units: &'a mut UnitResolver,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(
        version: GrammarVersion,
        units: &'a mut UnitResolver,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            version,
            units,
            diagnostics,
        }
    }

    /// Resolve the document's config layers.
    ///
    /// The unit resolver's default unit is updated to the resolved
    /// `default_unit` so every later length uses it.
    pub fn resolve(mut self, doc: &Document) -> Config {
        let layers: [&[ConfigEntry]; 3] = [&doc.frontmatter, &doc.config, &doc.directives];
        let mut config = Config::default();

        // default_unit governs every other length, so it is settled first.
        for entry in layers.iter().flat_map(|layer| layer.iter()) {
            if entry.key == "default_unit" {
                if let Some(unit) = self.default_unit(entry) {
                    config.default_unit = unit;
                }
            }
        }
        self.units.set_default_unit(config.default_unit);

        for layer in layers {
            self.check_duplicates(layer);
            // Deprecated keys first so a canonical key in the same layer wins.
            let (deprecated, canonical): (Vec<&ConfigEntry>, Vec<&ConfigEntry>) = layer
                .iter()
                .partition(|entry| deprecation_for(&entry.key).is_some());
            for entry in deprecated.into_iter().chain(canonical) {
                self.apply(&mut config, entry);
            }
        }

        tracing::debug!(
            unit = %config.default_unit,
            wall_thickness = config.wall_thickness,
            wall_height = config.wall_height,
            "Resolved config"
        );
        config
    }

    fn check_duplicates(&mut self, layer: &[ConfigEntry]) {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut reported: FxHashSet<&str> = FxHashSet::default();
        for entry in layer {
            if !seen.insert(entry.key.as_str()) && reported.insert(entry.key.as_str()) {
                self.diagnostics.warn(Warning::DuplicateConfigKey {
                    key: entry.key.clone(),
                });
            }
        }
    }

    fn default_unit(&mut self, entry: &ConfigEntry) -> Option<LengthUnit> {
        let location = Location::config_key(&entry.key);
        match &entry.value {
            ConfigValue::Text(tag) => match parse_unit(tag, &location) {
                Ok(unit) => Some(unit),
                Err(err) => {
                    self.diagnostics.error(err);
                    None
                }
            },
            _ => {
                self.invalid(entry, "a unit name");
                None
            }
        }
    }

    fn apply(&mut self, config: &mut Config, entry: &ConfigEntry) {
        let key = entry.key.as_str();

        if let Some(deprecation) = deprecation_for(key) {
            if let Some(warning) = deprecation.warning_for(self.version) {
                self.diagnostics.warn(warning);
            }
            if let Some(value) = self.positive_length(entry) {
                match key {
                    "door_width" => config.door_width = value,
                    "door_height" => config.door_height = value,
                    "window_width" => config.window_width = value,
                    "window_height" => config.window_height = value,
                    _ => {}
                }
            }
            return;
        }

        match key {
            // Handled before the layers are merged.
            "version" | "default_unit" => {}
            "wall_thickness" => {
                if let Some(v) = self.positive_length(entry) {
                    config.wall_thickness = v;
                }
            }
            "wall_height" => {
                if let Some(v) = self.positive_length(entry) {
                    config.wall_height = v;
                }
            }
            "floor_height" => {
                if let Some(v) = self.positive_length(entry) {
                    config.floor_height = Some(v);
                }
            }
            "window_sill" => {
                if let Some(v) = self.length(entry) {
                    config.window_sill = v;
                }
            }
            "door_size" => {
                if let Some((w, h)) = self.size(entry) {
                    config.door_width = w;
                    config.door_height = h;
                }
            }
            "window_size" => {
                if let Some((w, h)) = self.size(entry) {
                    config.window_width = w;
                    config.window_height = h;
                }
            }
            "double_door_factor" => match entry.value {
                ConfigValue::Number(v) if v >= 1.0 => config.double_door_factor = v,
                ConfigValue::Number(v) => self.diagnostics.error(Error::OutOfRange {
                    property: key.to_string(),
                    value: v,
                    min: 1.0,
                    max: f64::INFINITY,
                    location: Location::config_key(key),
                }),
                _ => self.invalid(entry, "a number"),
            },
            "default_style" => match &entry.value {
                ConfigValue::Text(name) => config.default_style = Some(name.clone()),
                _ => self.invalid(entry, "a style name"),
            },
            "theme" => match &entry.value {
                ConfigValue::Text(name) => match Theme::parse(name) {
                    Some(theme) => config.theme = theme,
                    None => {
                        self.diagnostics.warn(Warning::UnknownTheme {
                            theme: name.clone(),
                        });
                        config.theme = Theme::Default;
                    }
                },
                _ => self.invalid(entry, "a theme name"),
            },
            "font_family" => match &entry.value {
                ConfigValue::Text(name) => config.font_family = name.clone(),
                _ => self.invalid(entry, "a font name"),
            },
            "font_size" => match entry.value {
                ConfigValue::Number(v) if v > 0.0 => config.font_size = v,
                _ => self.invalid(entry, "a positive number"),
            },
            "show_labels" | "show_dimensions" | "show_area" => match entry.value {
                ConfigValue::Bool(flag) => match key {
                    "show_labels" => config.show_labels = flag,
                    "show_dimensions" => config.show_dimensions = flag,
                    _ => config.show_area = flag,
                },
                _ => self.invalid(entry, "true or false"),
            },
            _ => {
                self.diagnostics.warn(Warning::UnknownConfigKey {
                    key: key.to_string(),
                });
            }
        }
    }

    fn length(&mut self, entry: &ConfigEntry) -> Option<f64> {
        let location = Location::config_key(&entry.key);
        let raw = match &entry.value {
            ConfigValue::Length(raw) => raw.clone(),
            ConfigValue::Number(v) => RawLength::new(*v),
            _ => {
                self.invalid(entry, "a length");
                return None;
            }
        };
        match self.units.resolve(&raw, &location) {
            Ok(v) => Some(v),
            Err(err) => {
                self.diagnostics.error(err);
                None
            }
        }
    }

    fn positive_length(&mut self, entry: &ConfigEntry) -> Option<f64> {
        let value = self.length(entry)?;
        if value > 0.0 {
            Some(value)
        } else {
            self.diagnostics.error(Error::OutOfRange {
                property: entry.key.clone(),
                value,
                min: 0.0,
                max: f64::INFINITY,
                location: Location::config_key(&entry.key),
            });
            None
        }
    }

    fn size(&mut self, entry: &ConfigEntry) -> Option<(f64, f64)> {
        let location = Location::config_key(&entry.key);
        let ConfigValue::Size(w, h) = &entry.value else {
            self.invalid(entry, "a size (W x H)");
            return None;
        };
        match self.units.resolve_pair(w, h, &location) {
            Ok((w, h)) if w > 0.0 && h > 0.0 => Some((w, h)),
            Ok((w, h)) => {
                self.diagnostics.error(Error::OutOfRange {
                    property: entry.key.clone(),
                    value: w.min(h),
                    min: 0.0,
                    max: f64::INFINITY,
                    location,
                });
                None
            }
            Err(err) => {
                self.diagnostics.error(err);
                None
            }
        }
    }

    fn invalid(&mut self, entry: &ConfigEntry, expected: &'static str) {
        self.diagnostics.error(Error::InvalidConfigValue {
            key: entry.key.clone(),
            expected,
            location: Location::config_key(&entry.key),
        });
    }
}

/// Version string from the document, or from a `version` frontmatter entry.
pub fn declared_version(doc: &Document) -> Option<&str> {
    doc.version.as_deref().or_else(|| {
        doc.frontmatter.iter().rev().find_map(|entry| match &entry.value {
            ConfigValue::Text(text) if entry.key == "version" => Some(text.as_str()),
            _ => None,
        })
    })
}
