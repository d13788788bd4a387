// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floorplan Wall Synthesis
//!
//! Per-floor geometry derivation over a resolved document: which rooms touch,
//! which room owns each shared wall, how each wall splits into segments, and
//! where every door and window sits.

pub mod adjacency;
pub mod openings;
pub mod ownership;
pub mod segmentation;
pub mod types;

#[cfg(test)]
mod test_support;

pub use adjacency::{calculate_wall_overlap, detect_adjacencies, shared_wall, Adjacency};
pub use openings::{resolve_openings, OpeningSize, DEFAULT_PERCENT};
pub use ownership::wall_owner;
pub use segmentation::build_wall_plans;
pub use types::{
    DeferredSpan, Face, FloorGeometry, Material, OverlapResult, ResolvedOpening, SegmentId,
    WallPlan, WallSegment,
};
