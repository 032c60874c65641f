//! Request configuration for one reconciliation run.

use serde::{Deserialize, Serialize};

use crate::grid::GridShape;

pub const DEFAULT_DAYS: usize = 9;
pub const DEFAULT_SLOTS_PER_DAY: usize = 7;
pub const DEFAULT_ROOMS: usize = 3;
pub const DEFAULT_ROOM_CAPACITY: usize = 5;

/// Time-of-day labels; a request uses the first `slots_per_day` of them.
pub const SLOT_LABEL_CATALOG: [&str; 10] = [
    "08:00-09:00",
    "09:00-10:00",
    "10:00-11:00",
    "11:00-12:00",
    "13:00-14:00",
    "14:00-15:00",
    "15:00-16:00",
    "16:00-17:00",
    "17:00-18:00",
    "18:00-19:00",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileConfig {
    #[serde(default = "default_days")]
    pub days: usize,
    #[serde(default = "default_slots_per_day")]
    pub slots_per_day: usize,
    /// Raw start date as the caller typed it; parsed leniently.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Passed through to the solver; not used for reconciliation.
    #[serde(default = "default_rooms")]
    pub rooms: usize,
    #[serde(default = "default_room_capacity")]
    pub room_capacity: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS,
            slots_per_day: DEFAULT_SLOTS_PER_DAY,
            start_date: None,
            rooms: DEFAULT_ROOMS,
            room_capacity: DEFAULT_ROOM_CAPACITY,
        }
    }
}

impl ReconcileConfig {
    /// Zero counts fall back to their defaults.
    pub fn normalized(mut self) -> Self {
        if self.days == 0 {
            self.days = DEFAULT_DAYS;
        }
        if self.slots_per_day == 0 {
            self.slots_per_day = DEFAULT_SLOTS_PER_DAY;
        }
        if self.rooms == 0 {
            self.rooms = DEFAULT_ROOMS;
        }
        if self.room_capacity == 0 {
            self.room_capacity = DEFAULT_ROOM_CAPACITY;
        }
        self
    }

    /// The requested grid, with slots per day limited to the label catalog.
    pub fn grid(&self) -> GridShape {
        GridShape::new(self.days, self.slots_per_day.min(SLOT_LABEL_CATALOG.len()))
    }

    pub fn slot_labels(&self) -> Vec<String> {
        SLOT_LABEL_CATALOG
            .iter()
            .take(self.grid().slots_per_day)
            .map(|label| label.to_string())
            .collect()
    }
}

fn default_days() -> usize {
    DEFAULT_DAYS
}

fn default_slots_per_day() -> usize {
    DEFAULT_SLOTS_PER_DAY
}

fn default_rooms() -> usize {
    DEFAULT_ROOMS
}

fn default_room_capacity() -> usize {
    DEFAULT_ROOM_CAPACITY
}
