// src/process/columns.rs
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Fallback identifier for headers that clean down to nothing.
const PLACEHOLDER: &str = "unnamed";

/// Canonicalize raw header strings into unique lowercase identifiers,
/// preserving order. Every maximal run of characters outside `[a-z0-9]`
/// collapses to a single underscore; leading/trailing underscores are
/// stripped; an empty result becomes `unnamed`. Duplicates get `_2`,
/// `_3`, … suffixes in order of appearance.
///
/// Output length always equals input length and no two entries collide.
pub fn normalize_columns<S: AsRef<str>>(headers: &[S]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut normalized = Vec::with_capacity(headers.len());

    for raw in headers {
        let lower = raw.as_ref().trim().to_lowercase();
        let clean = NON_ALNUM
            .replace_all(&lower, "_")
            .trim_matches('_')
            .to_string();
        let clean = if clean.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            clean
        };

        let mut deduped = clean.clone();
        let mut counter = 2;
        while seen.contains(&deduped) {
            deduped = format!("{}_{}", clean, counter);
            counter += 1;
        }
        seen.insert(deduped.clone());
        normalized.push(deduped);
    }

    normalized
}
