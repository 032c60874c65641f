//! Resolves free-text supervisor names to canonical roster names.
//!
//! Resolution is an ordered list of tiers, strictest first. Each tier is a
//! pure function of the input and the [`NameIndex`]; the first one that
//! produces a candidate wins.

use serde::Serialize;

use crate::name_index::NameIndex;
use crate::names::{normalize, token_windows, tokenize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchTier {
    /// Normalized input equals a normalized canonical name.
    Exact,
    /// A significant token of the input is an index key.
    Token,
    /// A 2-token window of the input is an index key.
    Bigram,
    /// A 3-token window of the input is an index key.
    Trigram,
    /// Every input token contains, or is contained in, a token of one
    /// canonical name. Permissive; may over-match on short fragments.
    Substring,
}

impl MatchTier {
    pub const ORDER: [MatchTier; 5] = [
        MatchTier::Exact,
        MatchTier::Token,
        MatchTier::Bigram,
        MatchTier::Trigram,
        MatchTier::Substring,
    ];

    /// Runs this tier alone. `input` is the raw name; `tokens` its significant tokens.
    pub fn resolve(self, input: &str, tokens: &[String], index: &NameIndex) -> Option<usize> {
        match self {
            MatchTier::Exact => exact(input, index),
            MatchTier::Token => window_lookup(tokens, 1, index),
            MatchTier::Bigram => window_lookup(tokens, 2, index),
            MatchTier::Trigram => window_lookup(tokens, 3, index),
            MatchTier::Substring => substring(tokens, index),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchTier::Exact => "exact",
            MatchTier::Token => "token",
            MatchTier::Bigram => "bigram",
            MatchTier::Trigram => "trigram",
            MatchTier::Substring => "substring",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameMatch<'a> {
    /// Position of the canonical name, which is also its matrix row.
    pub position: usize,
    pub name: &'a str,
    pub tier: MatchTier,
}

/// Returns the canonical name `input` refers to, or `None` when no tier matches.
pub fn match_name<'a>(input: &str, index: &'a NameIndex) -> Option<NameMatch<'a>> {
    let tokens = tokenize(input);

    MatchTier::ORDER.iter().find_map(|tier| {
        let position = tier.resolve(input, &tokens, index)?;
        let name = index.display_name(position)?;
        Some(NameMatch {
            position,
            name,
            tier: *tier,
        })
    })
}

fn exact(input: &str, index: &NameIndex) -> Option<usize> {
    let cleaned = normalize(input);
    if cleaned.is_empty() {
        return None;
    }
    index
        .candidates()
        .find(|(_, normalized, _)| *normalized == cleaned)
        .map(|(position, _, _)| position)
}

fn window_lookup(tokens: &[String], size: usize, index: &NameIndex) -> Option<usize> {
    token_windows(tokens, size).find_map(|key| index.lookup(&key))
}

fn substring(tokens: &[String], index: &NameIndex) -> Option<usize> {
    if tokens.is_empty() {
        return None;
    }
    index
        .candidates()
        .find(|(_, _, full_tokens)| {
            tokens.iter().all(|token| {
                full_tokens
                    .iter()
                    .any(|full| full.contains(token.as_str()) || token.contains(full.as_str()))
            })
        })
        .map(|(position, _, _)| position)
}
