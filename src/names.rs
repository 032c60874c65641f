//! Case/whitespace canonicalization and tokenization of supervisor names.

/// Academic titles, degrees and honorifics that never identify a person.
/// Stored without periods; tokens are compared with their periods removed.
pub const TITLE_TOKENS: &[&str] = &[
    "dr", "dra", "drs", "ir", "prof", "ing", "pe", "st", "mt", "mti", "mm", "mmsi", "msc", "msi",
    "mpsi", "mpd", "mkes", "mkom", "meng", "masce", "mcs", "phd", "skom", "ssi", "spd",
];

/// Lowercases, collapses internal whitespace and trims.
pub fn normalize(name: &str) -> String {
    name.split_whitespace()
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Significant tokens of a name: titles and single-character fragments removed,
/// in their original order.
pub fn tokenize(name: &str) -> Vec<String> {
    let normalized = normalize(name);
    let mut tokens = Vec::new();

    for raw in normalized.split(|ch: char| ch.is_whitespace() || matches!(ch, ',' | '(' | ')' | ';')) {
        let trimmed = raw.trim_matches('.');
        if trimmed.is_empty() || is_title(trimmed) {
            continue;
        }

        // "a.santoso" style initials glued to a surname
        for fragment in trimmed.split('.') {
            if fragment.chars().count() <= 1 || is_title(fragment) {
                continue;
            }
            tokens.push(fragment.to_string());
        }
    }

    tokens
}

/// Contiguous windows of `size` tokens joined by a single space.
pub fn token_windows(tokens: &[String], size: usize) -> impl Iterator<Item = String> + '_ {
    tokens.windows(size.max(1)).map(|window| window.join(" "))
}

fn is_title(token: &str) -> bool {
    let compact: String = token.chars().filter(|ch| *ch != '.').collect();
    TITLE_TOKENS.contains(&compact.as_str())
}
