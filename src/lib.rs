//! Reconciles a thesis-defense roster with the availability files supervisors
//! fill in on their own, producing one availability row per supervisor on the
//! requested day/slot grid.

pub mod config;
pub mod dates;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod grid;
pub mod matcher;
pub mod name_index;
pub mod names;
pub mod reconcile;
pub mod roster;
pub mod spreadsheet;

pub use config::ReconcileConfig;
pub use diagnostics::Diagnostic;
pub use error::{Error, Result};
pub use grid::GridShape;
pub use matcher::{match_name, MatchTier, NameMatch};
pub use name_index::NameIndex;
pub use reconcile::{AvailabilityMatrix, AvailabilityRow, ReconcileReport, Reconciler};
pub use roster::{CanonicalSupervisor, Roster, RosterRow};

use std::path::Path;

/// Reads the roster and optional availability file and reconciles them.
pub fn reconcile_files(
    roster_path: &Path,
    availability_path: Option<&Path>,
    supervisor_column: Option<&str>,
    config: ReconcileConfig,
) -> Result<ReconcileReport> {
    let roster = spreadsheet::read_roster(roster_path, supervisor_column)?;
    let availability = match availability_path {
        Some(path) => spreadsheet::read_availability(path)?,
        None => Vec::new(),
    };
    Ok(Reconciler::new(config).reconcile(roster, &availability))
}
