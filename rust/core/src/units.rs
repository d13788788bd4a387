// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit resolution for length-bearing values
//!
//! Every length is normalized to meters. The unit is taken from the value's
//! own tag, then the document `default_unit`, then the system default (`m`).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ast::RawLength;
use crate::diagnostics::{Location, Warning};
use crate::error::{Error, Result};

/// Length units accepted in documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "mm")]
    Millimeters,
    #[serde(rename = "ft")]
    Feet,
    #[serde(rename = "in")]
    Inches,
}

impl LengthUnit {
    /// Unit used when neither the value nor the document names one.
    pub const SYSTEM_DEFAULT: LengthUnit = LengthUnit::Meters;

    /// Parse a unit tag. Tags are case-insensitive.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "m" => Some(LengthUnit::Meters),
            "cm" => Some(LengthUnit::Centimeters),
            "mm" => Some(LengthUnit::Millimeters),
            "ft" => Some(LengthUnit::Feet),
            "in" => Some(LengthUnit::Inches),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Meters => "m",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Millimeters => "mm",
            LengthUnit::Feet => "ft",
            LengthUnit::Inches => "in",
        }
    }

    /// Multiplier converting one unit to meters
    #[inline]
    pub fn meters_per_unit(self) -> f64 {
        match self {
            LengthUnit::Meters => 1.0,
            LengthUnit::Centimeters => 1e-2,
            LengthUnit::Millimeters => 1e-3,
            LengthUnit::Feet => 0.3048, // International foot
            LengthUnit::Inches => 0.0254,
        }
    }

    #[inline]
    pub fn to_meters(self, value: f64) -> f64 {
        value * self.meters_per_unit()
    }

    #[inline]
    pub fn from_meters(self, meters: f64) -> f64 {
        meters / self.meters_per_unit()
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Parse an explicit unit tag, failing with `UnitError` when unknown.
pub fn parse_unit(tag: &str, location: &Location) -> Result<LengthUnit> {
    LengthUnit::parse(tag).ok_or_else(|| Error::Unit {
        tag: tag.to_string(),
        location: location.clone(),
    })
}

/// Record of the explicit unit tags seen in a document.
#[derive(Debug, Clone, Default)]
pub struct UnitUsage {
    explicit: BTreeSet<LengthUnit>,
}

impl UnitUsage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, unit: LengthUnit) {
        self.explicit.insert(unit);
    }

    /// Advisory raised when more than one explicit unit was used.
    pub fn mixed_units_warning(&self) -> Option<Warning> {
        if self.explicit.len() > 1 {
            Some(Warning::MixedUnits {
                units: self.explicit.iter().map(|u| u.symbol().to_string()).collect(),
            })
        } else {
            None
        }
    }
}

/// Resolves raw lengths to meters against a document default unit.
#[derive(Debug, Clone)]
pub struct UnitResolver {
    default_unit: LengthUnit,
    usage: UnitUsage,
}

impl UnitResolver {
    pub fn new(default_unit: LengthUnit) -> Self {
        Self {
            default_unit,
            usage: UnitUsage::new(),
        }
    }

    pub fn default_unit(&self) -> LengthUnit {
        self.default_unit
    }

    pub fn set_default_unit(&mut self, unit: LengthUnit) {
        self.default_unit = unit;
    }

    /// Resolve a single value to meters.
    pub fn resolve(&mut self, raw: &RawLength, location: &Location) -> Result<f64> {
        let unit = match raw.unit.as_deref() {
            Some(tag) => {
                let unit = parse_unit(tag, location)?;
                self.usage.record(unit);
                unit
            }
            None => self.default_unit,
        };
        Ok(unit.to_meters(raw.value))
    }

    /// Resolve a pair of values, reporting the first failure.
    pub fn resolve_pair(
        &mut self,
        first: &RawLength,
        second: &RawLength,
        location: &Location,
    ) -> Result<(f64, f64)> {
        let a = self.resolve(first, location)?;
        let b = self.resolve(second, location)?;
        Ok((a, b))
    }

    pub fn usage(&self) -> &UnitUsage {
        &self.usage
    }
}
