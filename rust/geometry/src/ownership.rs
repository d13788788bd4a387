// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall ownership tie-break.

use floorplan_core::{Axis, Error, Location, ResolvedRoom, Result, LENGTH_EPSILON};

/// Pick the room that emits the shared wall between `a` and `b`.
///
/// Vertical walls go to the room with the lower x, horizontal walls to the
/// room with the lower y. The answer does not depend on argument order;
/// equal coordinates are an [`Error::AmbiguousOwnership`].
pub fn wall_owner<'r>(
    a: &'r ResolvedRoom,
    b: &'r ResolvedRoom,
    axis: Axis,
    location: &Location,
) -> Result<&'r ResolvedRoom> {
    let a_origin = a.bounds.bounding_rect().origin_on(axis);
    let b_origin = b.bounds.bounding_rect().origin_on(axis);

    if (a_origin - b_origin).abs() <= LENGTH_EPSILON {
        // Report in a fixed order so both call orders produce the same error.
        let (first, second) = if a.id <= b.id { (a, b) } else { (b, a) };
        return Err(Error::AmbiguousOwnership {
            first: first.id.clone(),
            second: second.id.clone(),
            location: location.clone(),
        });
    }

    Ok(if a_origin < b_origin { a } else { b })
}
