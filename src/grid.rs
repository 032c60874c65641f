//! Day/slot grid shapes: inferring the shape a flat availability row was
//! authored against, and projecting it onto the requested shape.

use serde::{Deserialize, Serialize};

/// A (days, slots-per-day) shape for a flat preference row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridShape {
    pub days: usize,
    pub slots_per_day: usize,
}

impl GridShape {
    pub const fn new(days: usize, slots_per_day: usize) -> Self {
        Self {
            days,
            slots_per_day,
        }
    }

    pub const fn total_slots(&self) -> usize {
        self.days * self.slots_per_day
    }
}

/// Shapes seen in availability files, most common first. The first entry
/// whose size equals a row's length is taken as that row's shape.
pub const GRID_CATALOG: &[GridShape] = &[
    GridShape::new(9, 7),
    GridShape::new(7, 7),
    GridShape::new(5, 7),
    GridShape::new(10, 7),
    GridShape::new(9, 8),
    GridShape::new(8, 9),
    GridShape::new(8, 8),
    GridShape::new(6, 7),
    GridShape::new(4, 7),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferredGrid {
    pub shape: GridShape,
    /// False when the row length matched no catalog entry.
    pub exact: bool,
}

/// Infers the grid a row of `row_len` values was written against.
///
/// The first catalog entry with `row_len` slots wins. Failing that the
/// requested day count is assumed with `row_len / days` slots per day (the
/// requested slot count when that comes out as zero).
pub fn infer_grid(row_len: usize, requested: GridShape) -> InferredGrid {
    if let Some(shape) = GRID_CATALOG.iter().find(|shape| shape.total_slots() == row_len) {
        return InferredGrid {
            shape: *shape,
            exact: true,
        };
    }

    let days = requested.days.max(1);
    let slots_per_day = match row_len / days {
        0 => requested.slots_per_day,
        computed => computed,
    };

    InferredGrid {
        shape: GridShape::new(days, slots_per_day),
        exact: false,
    }
}

/// Projects `values` from `source` onto `target`, returning exactly
/// `target.total_slots()` entries of 0 or 1.
///
/// Identical grids copy, padding with zeros or truncating to the target
/// length. Different grids copy day by day: for each of the first
/// `min(source.days, target.days)` days the first `min(source, target)` slots
/// are copied left-aligned; everything else stays 0.
pub fn remap(values: &[u8], source: GridShape, target: GridShape) -> Vec<u8> {
    let mut converted = vec![0u8; target.total_slots()];

    if source == target {
        for (slot, value) in converted.iter_mut().zip(values) {
            *slot = coerce(*value);
        }
        return converted;
    }

    let days = source.days.min(target.days);
    for day in 0..days {
        let start = day * source.slots_per_day;
        if start >= values.len() {
            break;
        }
        let end = (start + source.slots_per_day).min(values.len());
        let day_values = &values[start..end];

        let copy = day_values.len().min(target.slots_per_day);
        let target_start = day * target.slots_per_day;
        for (offset, value) in day_values[..copy].iter().enumerate() {
            converted[target_start + offset] = coerce(*value);
        }
    }

    converted
}

/// Anything other than 1 counts as unavailable.
pub fn coerce(value: u8) -> u8 {
    u8::from(value == 1)
}

/// Reads one availability cell: `"1"` is available, everything else is not.
pub fn coerce_cell(cell: &str) -> u8 {
    u8::from(cell.trim() == "1")
}
