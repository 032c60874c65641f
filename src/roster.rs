//! Roster rows and the forward-fill of merged supervisor cells.

use std::collections::HashSet;

use serde::Serialize;

/// Display name for rows that precede the first named supervisor.
pub const PLACEHOLDER_SUPERVISOR: &str = "Unknown Lecturer";

/// One student row. `passthrough` holds every other column untouched, aligned
/// with [`Roster::passthrough_headers`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterRow {
    pub supervisor: String,
    pub passthrough: Vec<String>,
}

impl RosterRow {
    pub fn new(supervisor: impl Into<String>) -> Self {
        Self {
            supervisor: supervisor.into(),
            passthrough: Vec::new(),
        }
    }

    pub fn with_passthrough(supervisor: impl Into<String>, passthrough: Vec<String>) -> Self {
        Self {
            supervisor: supervisor.into(),
            passthrough,
        }
    }

    fn has_supervisor(&self) -> bool {
        !self.supervisor.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    pub supervisor_header: String,
    pub passthrough_headers: Vec<String>,
    pub rows: Vec<RosterRow>,
}

impl Roster {
    pub fn from_rows(rows: Vec<RosterRow>) -> Self {
        Self {
            supervisor_header: "supervisor".into(),
            passthrough_headers: Vec::new(),
            rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalSupervisor {
    /// Dense, first-seen order; doubles as the matrix row.
    pub index: usize,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ForwardFill {
    pub supervisors: Vec<CanonicalSupervisor>,
    /// Rows that had no supervisor above them and received the placeholder.
    pub orphan_rows: usize,
    /// Canonical position of the placeholder, when any row received it.
    pub placeholder: Option<usize>,
}

impl ForwardFill {
    fn push(&mut self, display_name: &str) -> usize {
        let index = self.supervisors.len();
        self.supervisors.push(CanonicalSupervisor {
            index,
            display_name: display_name.to_string(),
        });
        index
    }

    pub fn display_names(&self) -> Vec<String> {
        self.supervisors
            .iter()
            .map(|supervisor| supervisor.display_name.clone())
            .collect()
    }
}

/// Copies the last named supervisor down into blank rows and collects the
/// distinct supervisors in first-seen order.
///
/// Rows before any named supervisor receive [`PLACEHOLDER_SUPERVISOR`]. The
/// placeholder gets one canonical entry of its own at its first-seen position,
/// kept apart from a real supervisor who happens to share its name.
pub fn forward_fill(rows: &mut [RosterRow]) -> ForwardFill {
    let mut last_seen: Option<String> = None;
    let mut seen = HashSet::new();
    let mut fill = ForwardFill::default();

    for row in rows.iter_mut() {
        if row.has_supervisor() {
            last_seen = Some(row.supervisor.clone());
        } else if let Some(supervisor) = &last_seen {
            row.supervisor = supervisor.clone();
        } else {
            row.supervisor = PLACEHOLDER_SUPERVISOR.to_string();
            fill.orphan_rows += 1;
            if fill.placeholder.is_none() {
                fill.placeholder = Some(fill.push(PLACEHOLDER_SUPERVISOR));
            }
            continue;
        }

        let display_name = row.supervisor.trim();
        if seen.insert(display_name.to_string()) {
            fill.push(display_name);
        }
    }

    fill
}
