// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builders shared by the unit tests.

use std::sync::Arc;

use floorplan_core::{Bounds, Rect, ResolvedFloor, ResolvedRoom, Style, Walls};

pub fn room(id: &str, x: f64, y: f64, w: f64, h: f64) -> ResolvedRoom {
    ResolvedRoom {
        id: id.into(),
        label: None,
        parent: None,
        bounds: Bounds::Rect(Rect::new(x, y, w, h)),
        walls: Walls::default(),
        height: 3.0,
        elevation: 0.0,
        absolute_elevation: 0.0,
        style: Arc::new(Style::fallback()),
        explicit_style: false,
        stacks_above: None,
    }
}

pub fn floor(rooms: Vec<ResolvedRoom>) -> ResolvedFloor {
    ResolvedFloor {
        id: "ground".into(),
        index: 0,
        elevation: 0.0,
        height: 3.0,
        rooms,
    }
}
