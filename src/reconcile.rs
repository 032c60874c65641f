//! Assembles the supervisor availability matrix from a roster and an optional
//! availability file.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{ReconcileConfig, SLOT_LABEL_CATALOG};
use crate::dates::{day_labels, parse_start_date, today};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::grid::{coerce_cell, infer_grid, remap, GridShape};
use crate::matcher::{match_name, MatchTier};
use crate::name_index::NameIndex;
use crate::roster::{forward_fill, CanonicalSupervisor, Roster};

/// One line of an availability file: a free-text name and its 0/1 values,
/// in whatever grid the author used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRow {
    pub raw_name: String,
    pub values: Vec<u8>,
}

impl AvailabilityRow {
    pub fn new(raw_name: impl Into<String>, values: Vec<u8>) -> Self {
        Self {
            raw_name: raw_name.into(),
            values,
        }
    }

    /// First cell is the name, the rest are availability cells.
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Option<Self> {
        let (name, values) = cells.split_first()?;
        Some(Self {
            raw_name: name.as_ref().trim().to_string(),
            values: values.iter().map(|cell| coerce_cell(cell.as_ref())).collect(),
        })
    }
}

/// The hand-off to the scheduler: one row per canonical supervisor, one column
/// per (day, slot) pair, day-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityMatrix {
    pub supervisors: Vec<String>,
    pub days: Vec<String>,
    pub slots: Vec<String>,
    pub preferences: Vec<Vec<u8>>,
    pub day_count: usize,
    pub slots_per_day: usize,
    pub rooms: usize,
    pub room_capacity: usize,
    pub start_date: String,
}

impl AvailabilityMatrix {
    pub fn available_slots(&self, supervisor: usize) -> usize {
        self.preferences
            .get(supervisor)
            .map(|row| row.iter().filter(|value| **value == 1).count())
            .unwrap_or(0)
    }
}

/// How one availability row was attributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityMatch {
    pub row: usize,
    pub raw_name: String,
    pub supervisor: String,
    pub supervisor_index: usize,
    pub tier: MatchTier,
    pub source_grid: GridShape,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub matrix: AvailabilityMatrix,
    pub supervisors: Vec<CanonicalSupervisor>,
    pub matches: Vec<AvailabilityMatch>,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip)]
    pub roster: Roster,
}

#[derive(Debug, Clone)]
pub struct Reconciler {
    config: ReconcileConfig,
    today: NaiveDate,
}

impl Reconciler {
    pub fn new(config: ReconcileConfig) -> Self {
        Self {
            config: config.normalized(),
            today: today(),
        }
    }

    /// Date used when the configured start date is missing or invalid.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Runs one reconciliation. Never fails: every problem becomes a diagnostic
    /// and the matrix always has one full-width row per canonical supervisor.
    pub fn reconcile(&self, mut roster: Roster, availability: &[AvailabilityRow]) -> ReconcileReport {
        let mut diagnostics = Diagnostics::default();
        let grid = self.config.grid();

        if self.config.slots_per_day > grid.slots_per_day {
            diagnostics.push(Diagnostic::SlotCountClamped {
                requested: self.config.slots_per_day,
                available: SLOT_LABEL_CATALOG.len(),
            });
        }

        let fill = forward_fill(&mut roster.rows);
        if fill.orphan_rows > 0 {
            diagnostics.push(Diagnostic::OrphanRosterRows {
                count: fill.orphan_rows,
            });
        }

        let names = fill.display_names();
        let index = NameIndex::build_excluding(&names, |position| {
            fill.placeholder == Some(position)
        });
        info!(
            "Roster has {} rows and {} supervisors ({} index keys)",
            roster.rows.len(),
            names.len(),
            index.key_count()
        );

        let mut preferences = vec![vec![0u8; grid.total_slots()]; names.len()];
        let mut filled = vec![false; names.len()];
        let mut matches = Vec::new();

        for (offset, row) in availability.iter().enumerate() {
            let row_number = offset + 1;
            if row.raw_name.trim().is_empty() {
                diagnostics.push(Diagnostic::EmptyAvailabilityName { row: row_number });
                continue;
            }

            let Some(found) = match_name(&row.raw_name, &index) else {
                diagnostics.push(Diagnostic::UnmatchedSupervisor {
                    row: row_number,
                    raw_name: row.raw_name.clone(),
                });
                continue;
            };
            debug!(
                "Matched \"{}\" to \"{}\" (row {}, {} tier)",
                row.raw_name,
                found.name,
                found.position,
                found.tier.label()
            );

            let inferred = infer_grid(row.values.len(), grid);
            if !inferred.exact {
                diagnostics.push(Diagnostic::ApproximateGrid {
                    raw_name: row.raw_name.clone(),
                    row_length: row.values.len(),
                    assumed_days: inferred.shape.days,
                    assumed_slots_per_day: inferred.shape.slots_per_day,
                });
            } else if inferred.shape != grid {
                info!(
                    "Converting availability for \"{}\" from {}x{} to {}x{}",
                    found.name,
                    inferred.shape.days,
                    inferred.shape.slots_per_day,
                    grid.days,
                    grid.slots_per_day
                );
                diagnostics.push(Diagnostic::GridConverted {
                    supervisor: found.name.to_string(),
                    from_days: inferred.shape.days,
                    from_slots_per_day: inferred.shape.slots_per_day,
                });
            }

            if filled[found.position] {
                diagnostics.push(Diagnostic::DuplicateAvailability {
                    supervisor: found.name.to_string(),
                    raw_name: row.raw_name.clone(),
                });
            }

            preferences[found.position] = remap(&row.values, inferred.shape, grid);
            filled[found.position] = true;
            matches.push(AvailabilityMatch {
                row: row_number,
                raw_name: row.raw_name.clone(),
                supervisor: found.name.to_string(),
                supervisor_index: found.position,
                tier: found.tier,
                source_grid: inferred.shape,
            });
        }

        let start = match self.config.start_date.as_deref().and_then(parse_start_date) {
            Some(date) => date,
            None => {
                diagnostics.push(Diagnostic::InvalidStartDate {
                    raw: self.config.start_date.clone(),
                });
                self.today
            }
        };

        let matrix = AvailabilityMatrix {
            supervisors: names,
            days: day_labels(start, grid.days),
            slots: self.config.slot_labels(),
            preferences,
            day_count: grid.days,
            slots_per_day: grid.slots_per_day,
            rooms: self.config.rooms,
            room_capacity: self.config.room_capacity,
            start_date: start.format("%Y-%m-%d").to_string(),
        };

        for (position, name) in matrix.supervisors.iter().enumerate() {
            debug!(
                "{}: {}/{} slots available",
                name,
                matrix.available_slots(position),
                grid.total_slots()
            );
        }
        info!(
            "Attributed {} of {} availability rows",
            matches.len(),
            availability.len()
        );

        ReconcileReport {
            matrix,
            supervisors: fill.supervisors,
            matches,
            diagnostics: diagnostics.into_vec(),
            roster,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{RosterRow, PLACEHOLDER_SUPERVISOR};

    fn reconciler() -> Reconciler {
        Reconciler::new(ReconcileConfig {
            start_date: Some("2025-01-06".into()),
            ..ReconcileConfig::default()
        })
        .with_today(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap())
    }

    fn roster(names: &[&str]) -> Roster {
        Roster::from_rows(names.iter().map(|name| RosterRow::new(*name)).collect())
    }

    #[test]
    fn from_cells_coerces_values() {
        let row = AvailabilityRow::from_cells(&[" Budi ", "1", "0", "x", " 1"]).unwrap();
        assert_eq!(row.raw_name, "Budi");
        assert_eq!(row.values, vec![1, 0, 0, 1]);
        assert!(AvailabilityRow::from_cells::<&str>(&[]).is_none());
    }

    #[test]
    fn matrix_without_availability_is_all_zero() {
        let report = reconciler().reconcile(roster(&["Ahmad", "", "Budi"]), &[]);
        assert_eq!(report.matrix.supervisors, vec!["Ahmad", "Budi"]);
        assert_eq!(report.matrix.preferences.len(), 2);
        assert!(report
            .matrix
            .preferences
            .iter()
            .all(|row| row.len() == 63 && row.iter().all(|value| *value == 0)));
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn day_labels_start_at_the_configured_date() {
        let report = reconciler().reconcile(roster(&["Ahmad"]), &[]);
        assert_eq!(report.matrix.days.len(), 9);
        assert_eq!(report.matrix.days[0], "2025-01-06");
        assert_eq!(report.matrix.days[8], "2025-01-14");
        assert_eq!(report.matrix.slots.len(), 7);
    }

    #[test]
    fn invalid_start_date_falls_back_to_today() {
        let report = Reconciler::new(ReconcileConfig {
            start_date: Some("someday".into()),
            ..ReconcileConfig::default()
        })
        .with_today(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap())
        .reconcile(roster(&["Ahmad"]), &[]);
        assert_eq!(report.matrix.days[0], "2024-12-01");
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::InvalidStartDate {
                raw: Some("someday".into())
            }]
        );
    }

    #[test]
    fn later_rows_overwrite_earlier_ones_with_a_diagnostic() {
        let first = AvailabilityRow::new("Ahmad", vec![1; 63]);
        let second = AvailabilityRow::new("Pak Ahmad", vec![0; 63]);
        let report = reconciler().reconcile(roster(&["Dr. Ahmad"]), &[first, second]);
        assert_eq!(report.matrix.available_slots(0), 0);
        assert!(matches!(
            report.diagnostics.as_slice(),
            [Diagnostic::DuplicateAvailability { .. }]
        ));
        assert_eq!(report.matches.len(), 2);
    }

    #[test]
    fn placeholder_never_receives_availability() {
        let rows = vec![AvailabilityRow::new("Unknown Lecturer", vec![1; 63])];
        let report = reconciler().reconcile(roster(&["", "Ahmad"]), &rows);
        assert_eq!(report.matrix.supervisors[0], PLACEHOLDER_SUPERVISOR);
        assert_eq!(report.matrix.available_slots(0), 0);
        assert!(report
            .diagnostics
            .iter()
            .any(|diagnostic| matches!(diagnostic, Diagnostic::UnmatchedSupervisor { .. })));
    }

    #[test]
    fn supervisor_named_like_the_placeholder_still_receives_availability() {
        let rows = vec![AvailabilityRow::new("Unknown Lecturer", vec![1; 63])];
        let report = reconciler().reconcile(roster(&["", "Ahmad", PLACEHOLDER_SUPERVISOR]), &rows);
        assert_eq!(
            report.matrix.supervisors,
            vec![PLACEHOLDER_SUPERVISOR, "Ahmad", PLACEHOLDER_SUPERVISOR]
        );
        assert_eq!(report.matrix.available_slots(0), 0);
        assert_eq!(report.matrix.available_slots(2), 63);
        assert_eq!(report.matches[0].supervisor_index, 2);
        assert_eq!(report.matches[0].tier, MatchTier::Exact);
    }

    #[test]
    fn approximate_grids_are_reported_and_still_used() {
        let rows = vec![AvailabilityRow::new("Ahmad", vec![1; 50])];
        let report = reconciler().reconcile(roster(&["Ahmad"]), &rows);
        assert!(report.diagnostics.contains(&Diagnostic::ApproximateGrid {
            raw_name: "Ahmad".into(),
            row_length: 50,
            assumed_days: 9,
            assumed_slots_per_day: 5,
        }));
        // 5 of 7 slots on each of 9 days
        assert_eq!(report.matrix.available_slots(0), 45);
    }

    #[test]
    fn empty_names_are_skipped() {
        let rows = vec![AvailabilityRow::new("  ", vec![1; 63])];
        let report = reconciler().reconcile(roster(&["Ahmad"]), &rows);
        assert_eq!(report.diagnostics, vec![Diagnostic::EmptyAvailabilityName { row: 1 }]);
        assert_eq!(report.matrix.available_slots(0), 0);
    }
}
