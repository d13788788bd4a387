// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor validation and the aggregated diagnostics report.

use floorplan_core::{
    Diagnostic, DiagnosticKind, Diagnostics, Error, Location, ResolvedFloor, Severity,
};
use serde::{Deserialize, Serialize};

use crate::pipeline::FloorOutput;

/// Report sibling rooms whose footprints overlap.
///
/// Rooms that merely share an edge are fine; only rectangular rooms with the
/// same parent are compared.
pub fn check_overlapping_rooms(floor: &ResolvedFloor, diagnostics: &mut Diagnostics) {
    for (i, a) in floor.rooms.iter().enumerate() {
        let Some(a_rect) = a.rect() else {
            continue;
        };
        for b in &floor.rooms[i + 1..] {
            if a.parent != b.parent {
                continue;
            }
            let Some(b_rect) = b.rect() else {
                continue;
            };
            if a_rect.intersects(b_rect) {
                diagnostics.error(Error::OverlappingRooms {
                    first: a.id.clone(),
                    second: b.id.clone(),
                    location: Location::floor(&floor.id).with_room(&a.id),
                });
            }
        }
    }
}

/// Every diagnostic of a processed document, in order: document-level
/// entries first, then each floor in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub entries: Vec<Diagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
}

impl Report {
    pub fn build(document: &Diagnostics, floors: &[FloorOutput]) -> Self {
        let entries: Vec<Diagnostic> = document
            .iter()
            .chain(floors.iter().flat_map(|floor| floor.diagnostics.iter()))
            .cloned()
            .collect();
        let error_count = entries
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let warning_count = entries.len() - error_count;

        Self {
            entries,
            error_count,
            warning_count,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }
}
