//! Non-fatal findings recorded while reconciling.

use std::fmt;

use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// An availability row named nobody on the roster; its values were dropped.
    #[serde(rename_all = "camelCase")]
    UnmatchedSupervisor { row: usize, raw_name: String },
    /// An availability row had no name in its first column.
    #[serde(rename_all = "camelCase")]
    EmptyAvailabilityName { row: usize },
    /// The row length fit no known grid; a best-effort grid was assumed.
    #[serde(rename_all = "camelCase")]
    ApproximateGrid {
        raw_name: String,
        row_length: usize,
        assumed_days: usize,
        assumed_slots_per_day: usize,
    },
    /// A row authored against another grid was projected onto the requested one.
    #[serde(rename_all = "camelCase")]
    GridConverted {
        supervisor: String,
        from_days: usize,
        from_slots_per_day: usize,
    },
    /// A later availability row replaced an earlier one for the same supervisor.
    #[serde(rename_all = "camelCase")]
    DuplicateAvailability { supervisor: String, raw_name: String },
    #[serde(rename_all = "camelCase")]
    InvalidStartDate { raw: Option<String> },
    /// Roster rows before the first named supervisor.
    #[serde(rename_all = "camelCase")]
    OrphanRosterRows { count: usize },
    #[serde(rename_all = "camelCase")]
    SlotCountClamped { requested: usize, available: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnmatchedSupervisor { row, raw_name } => write!(
                f,
                "Availability row {row}: no roster supervisor matches \"{raw_name}\"; row skipped."
            ),
            Diagnostic::EmptyAvailabilityName { row } => {
                write!(f, "Availability row {row} has no supervisor name; row skipped.")
            }
            Diagnostic::ApproximateGrid {
                raw_name,
                row_length,
                assumed_days,
                assumed_slots_per_day,
            } => write!(
                f,
                "\"{raw_name}\" has {row_length} slots, which fits no known grid; read as {assumed_days} days x {assumed_slots_per_day} slots."
            ),
            Diagnostic::GridConverted {
                supervisor,
                from_days,
                from_slots_per_day,
            } => write!(
                f,
                "Availability for {supervisor} was written for {from_days} days x {from_slots_per_day} slots and was converted to the requested grid."
            ),
            Diagnostic::DuplicateAvailability {
                supervisor,
                raw_name,
            } => write!(
                f,
                "\"{raw_name}\" replaced earlier availability already recorded for {supervisor}."
            ),
            Diagnostic::InvalidStartDate { raw } => match raw {
                Some(raw) => write!(f, "Start date \"{raw}\" is not a valid date; using today."),
                None => write!(f, "No start date was provided; using today."),
            },
            Diagnostic::OrphanRosterRows { count } => write!(
                f,
                "{count} roster {} before any supervisor is named.",
                if *count == 1 { "row appears" } else { "rows appear" }
            ),
            Diagnostic::SlotCountClamped {
                requested,
                available,
            } => write!(
                f,
                "{requested} slots per day were requested but only {available} time slots are defined; using {available}."
            ),
        }
    }
}

/// Collects diagnostics in the order they occur and logs each one.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.entries.push(diagnostic);
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
