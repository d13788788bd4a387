// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dimension variables (`define name (W x H)`).

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ast::Define;
use crate::diagnostics::{Diagnostics, Location, Warning};
use crate::error::{Error, Result};
use crate::units::UnitResolver;

/// Resolved `define` bindings, in meters.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    bindings: FxHashMap<String, (f64, f64)>,
    /// Declaration order, for deterministic reporting.
    order: Vec<String>,
}

impl VariableTable {
    /// Resolve all defines. Redefinitions are reported and the first kept.
    pub fn build(defines: &[Define], units: &mut UnitResolver, diagnostics: &mut Diagnostics) -> Self {
        let mut table = Self::default();

        for define in defines {
            if table.bindings.contains_key(&define.name) {
                diagnostics.error(Error::DuplicateVariable {
                    name: define.name.clone(),
                    location: Location::document(),
                });
                continue;
            }
            let location = Location::document();
            match units.resolve_pair(&define.width, &define.height, &location) {
                Ok(value) => {
                    table.bindings.insert(define.name.clone(), value);
                    table.order.push(define.name.clone());
                }
                Err(err) => diagnostics.error(err),
            }
        }

        table
    }

    /// Look up a binding.
    pub fn lookup(&self, name: &str, location: &Location) -> Result<(f64, f64)> {
        self.bindings
            .get(name)
            .copied()
            .ok_or_else(|| Error::UndefinedVariable {
                name: name.to_string(),
                location: location.clone(),
            })
    }

    /// Warnings for bindings never referenced.
    pub fn unused(&self, used: &FxHashSet<String>) -> Vec<Warning> {
        self.order
            .iter()
            .filter(|name| !used.contains(*name))
            .map(|name| Warning::UnusedVariable { name: name.clone() })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
