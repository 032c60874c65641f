//! Lookup table from name tokens and token windows to canonical supervisors.

use std::collections::HashMap;

use crate::names::{normalize, token_windows, tokenize};

/// Longest token window registered as a key.
pub const MAX_WINDOW: usize = 3;

/// Immutable index built once per reconciliation run.
///
/// Keys are single significant tokens plus contiguous 2- and 3-token windows of
/// each canonical name. The first canonical name to register a key keeps it.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    entries: Vec<IndexedName>,
    keys: HashMap<String, usize>,
}

#[derive(Debug, Clone)]
struct IndexedName {
    display: String,
    normalized: String,
    tokens: Vec<String>,
    matchable: bool,
}

impl NameIndex {
    pub fn build<S: AsRef<str>>(canonical_names: &[S]) -> Self {
        Self::build_excluding(canonical_names, |_| false)
    }

    /// Builds the index while keeping the names at `excluded` positions out of
    /// every tier. Excluded names still occupy their position so positions
    /// line up with the caller's canonical list.
    pub fn build_excluding<S, F>(canonical_names: &[S], excluded: F) -> Self
    where
        S: AsRef<str>,
        F: Fn(usize) -> bool,
    {
        let mut index = NameIndex::default();

        for (position, name) in canonical_names.iter().enumerate() {
            let display = name.as_ref();
            let matchable = !excluded(position);
            let tokens = tokenize(display);

            if matchable {
                for size in 1..=MAX_WINDOW {
                    for key in token_windows(&tokens, size) {
                        index.keys.entry(key).or_insert(position);
                    }
                }
            }

            index.entries.push(IndexedName {
                display: display.to_string(),
                normalized: normalize(display),
                tokens,
                matchable,
            });
        }

        index
    }

    pub fn lookup(&self, key: &str) -> Option<usize> {
        self.keys.get(key).copied()
    }

    pub fn display_name(&self, position: usize) -> Option<&str> {
        self.entries.get(position).map(|entry| entry.display.as_str())
    }

    /// Positions of matchable names in registration order with their normalized
    /// form and significant tokens.
    pub fn candidates(&self) -> impl Iterator<Item = (usize, &str, &[String])> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.matchable)
            .map(|(position, entry)| (position, entry.normalized.as_str(), entry.tokens.as_slice()))
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}
