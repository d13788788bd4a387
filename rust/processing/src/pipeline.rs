// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor-plan processing pipeline with parallel per-floor geometry.

use floorplan_core::{
    ast::Document, resolve_document, Diagnostic, Diagnostics, Error, ResolvedDocument,
    ResolvedFloor,
};
use floorplan_geometry::{build_wall_plans, detect_adjacencies, resolve_openings, FloorGeometry};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::validator::{check_overlapping_rooms, Report};

/// Per-floor pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorStage {
    Unresolved,
    UnitsResolved,
    StylesResolved,
    AdjacencyComputed,
    SegmentsBuilt,
    OpeningsResolved,
    Validated,
}

impl FloorStage {
    /// The following stage; `Validated` is terminal.
    pub fn next(self) -> Option<FloorStage> {
        match self {
            FloorStage::Unresolved => Some(FloorStage::UnitsResolved),
            FloorStage::UnitsResolved => Some(FloorStage::StylesResolved),
            FloorStage::StylesResolved => Some(FloorStage::AdjacencyComputed),
            FloorStage::AdjacencyComputed => Some(FloorStage::SegmentsBuilt),
            FloorStage::SegmentsBuilt => Some(FloorStage::OpeningsResolved),
            FloorStage::OpeningsResolved => Some(FloorStage::Validated),
            FloorStage::Validated => None,
        }
    }
}

/// Where a floor's pipeline stopped, and why if it stopped early.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorRun {
    pub stage: FloorStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halted: Option<Diagnostic>,
}

impl FloorRun {
    pub fn new() -> Self {
        Self {
            stage: FloorStage::Unresolved,
            halted: None,
        }
    }

    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.stage == FloorStage::Validated
    }

    fn advance(&mut self) {
        if let Some(next) = self.stage.next() {
            self.stage = next;
        }
    }

    fn halt(&mut self, err: &Error) {
        self.halted = Some(Diagnostic::from(err));
    }
}

impl Default for FloorRun {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything derived for one floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorOutput {
    pub floor: String,
    pub run: FloorRun,
    pub geometry: FloorGeometry,
    pub diagnostics: Diagnostics,
}

/// Counts for a processed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub floors: usize,
    pub rooms: usize,
    pub segments: usize,
    pub openings: usize,
    pub halted_floors: usize,
}

/// Result of processing a document end to end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedDocument {
    pub document: ResolvedDocument,
    pub floors: Vec<FloorOutput>,
    pub stats: ProcessingStats,
    pub report: Report,
}

impl ProcessedDocument {
    pub fn floor(&self, id: &str) -> Option<&FloorOutput> {
        self.floors.iter().find(|floor| floor.floor == id)
    }
}

/// Process a document: resolve it once, then derive every floor's geometry
/// in parallel.
pub fn process_document(doc: &Document) -> ProcessedDocument {
    let total_start = std::time::Instant::now();
    tracing::info!(floors = doc.floors.len(), "Starting floor-plan processing");

    let resolution = resolve_document(doc);

    let floors: Vec<FloorOutput> = if let Some(err) = &resolution.halted {
        tracing::warn!(error = %err, "Document halted before floor processing");
        doc.floors
            .iter()
            .map(|decl| {
                let mut run = FloorRun::new();
                run.halt(err);
                FloorOutput {
                    floor: decl.id.clone(),
                    run,
                    geometry: FloorGeometry {
                        floor: decl.id.clone(),
                        ..FloorGeometry::default()
                    },
                    diagnostics: Diagnostics::new(),
                }
            })
            .collect()
    } else {
        let document = &resolution.document;
        // Collected in floor order, so output is independent of scheduling.
        document
            .floors
            .par_iter()
            .map(|floor| process_floor(document, floor))
            .collect()
    };

    let report = Report::build(&resolution.diagnostics, &floors);
    let stats = ProcessingStats {
        floors: floors.len(),
        rooms: resolution.document.floors.iter().map(|f| f.rooms.len()).sum(),
        segments: floors.iter().map(|f| f.geometry.segments().count()).sum(),
        openings: floors.iter().map(|f| f.geometry.openings.len()).sum(),
        halted_floors: floors.iter().filter(|f| f.run.is_halted()).count(),
    };

    tracing::info!(
        floors = stats.floors,
        segments = stats.segments,
        openings = stats.openings,
        halted_floors = stats.halted_floors,
        errors = report.error_count,
        warnings = report.warning_count,
        total_time_ms = total_start.elapsed().as_millis(),
        "Floor-plan processing complete"
    );

    ProcessedDocument {
        document: resolution.document,
        floors,
        stats,
        report,
    }
}

/// Run the geometry stages for one floor of a resolved document.
///
/// Units and styles are already resolved document-wide, so the run starts
/// past those stages. A halting error stops the run; whatever was derived
/// before it is kept.
pub fn process_floor(document: &ResolvedDocument, floor: &ResolvedFloor) -> FloorOutput {
    let mut run = FloorRun::new();
    let mut diagnostics = Diagnostics::new();
    let mut geometry = FloorGeometry {
        floor: floor.id.clone(),
        ..FloorGeometry::default()
    };

    run.advance(); // UnitsResolved
    run.advance(); // StylesResolved

    geometry.adjacencies = detect_adjacencies(floor, &mut diagnostics);
    run.advance();

    match build_wall_plans(floor, &geometry.adjacencies, &document.config, &mut diagnostics) {
        Ok(plans) => {
            geometry.plans = plans;
            run.advance();
        }
        Err(err) => return halted(floor, run, geometry, diagnostics, err),
    }

    // Openings placed before a halt are kept.
    match resolve_openings(
        floor,
        document.connections_on(&floor.id),
        &geometry.adjacencies,
        &geometry.plans,
        &document.config,
        &mut geometry.openings,
        &mut diagnostics,
    ) {
        Ok(()) => run.advance(),
        Err(err) => return halted(floor, run, geometry, diagnostics, err),
    }

    check_overlapping_rooms(floor, &mut diagnostics);
    run.advance();

    tracing::debug!(
        floor = %floor.id,
        segments = geometry.segments().count(),
        openings = geometry.openings.len(),
        diagnostics = diagnostics.len(),
        "Floor validated"
    );

    FloorOutput {
        floor: floor.id.clone(),
        run,
        geometry,
        diagnostics,
    }
}

fn halted(
    floor: &ResolvedFloor,
    mut run: FloorRun,
    geometry: FloorGeometry,
    mut diagnostics: Diagnostics,
    err: Error,
) -> FloorOutput {
    tracing::warn!(floor = %floor.id, stage = ?run.stage, error = %err, "Floor halted");
    run.halt(&err);
    diagnostics.error(err);
    FloorOutput {
        floor: floor.id.clone(),
        run,
        geometry,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let mut stage = FloorStage::Unresolved;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            assert!(next > stage);
            stage = next;
            seen.push(stage);
        }
        assert_eq!(seen.len(), 7);
        assert_eq!(stage, FloorStage::Validated);
    }

    #[test]
    fn test_run_halt_keeps_stage() {
        let mut run = FloorRun::new();
        run.advance();
        run.halt(&Error::NotAdjacent {
            from: "a.right".into(),
            to: "b.left".into(),
            location: floorplan_core::Location::floor("ground"),
        });
        assert_eq!(run.stage, FloorStage::UnitsResolved);
        assert!(run.is_halted());
        assert!(!run.is_complete());
    }
}
