// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared floor-plan processing pipeline and report types used by the CLI.

pub mod pipeline;
pub mod validator;

pub use pipeline::{
    process_document, process_floor, FloorOutput, FloorRun, FloorStage, ProcessedDocument,
    ProcessingStats,
};
pub use validator::{check_overlapping_rooms, Report};
