// src/process/years.rs
//
// Year reconstruction for spreadsheet headers where the year appears once
// per academic-level pair ("2019 Undergraduate", "Graduate", "2020
// Undergraduate", …). This is the most assumption-laden logic in the crate,
// so it lives behind named functions with its own tests.
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());

/// Academic level a value column reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Undergraduate,
    Graduate,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Undergraduate => "Undergraduate",
            Level::Graduate => "Graduate",
        }
    }
}

/// Labels containing the capitalized word `Graduate` are graduate columns;
/// everything else is undergraduate. The match is case-sensitive on purpose:
/// `"Undergraduate"` does not contain `"Graduate"`.
pub fn level_for(label: &str) -> Level {
    if label.contains("Graduate") {
        Level::Graduate
    } else {
        Level::Undergraduate
    }
}

/// Infer one year per column label, aligned with the input.
///
/// For each label, the first run of four digits is the candidate year; a
/// label with no digits continues the year of its predecessor (the second
/// column of an Undergraduate/Graduate pair usually carries no year at all).
/// A label with neither yields `None` and contributes nothing downstream.
///
/// Each year may be emitted at most twice (one Undergraduate and one
/// Graduate column). A third occurrence bumps the candidate upward until a
/// free or singly-used year is found. That spill rule keeps extra mid-year
/// splits from collapsing onto one year, but it can misassign when more
/// than two value columns genuinely share a year; callers accept that as a
/// known limitation of the source layout.
pub fn infer_years<S: AsRef<str>>(labels: &[S]) -> Vec<Option<i32>> {
    let mut year_counts: HashMap<i32, u32> = HashMap::new();
    let mut last_year: Option<i32> = None;
    let mut inferred = Vec::with_capacity(labels.len());

    for label in labels {
        let candidate = YEAR
            .find(label.as_ref())
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .or(last_year);

        let mut year = match candidate {
            Some(y) => y,
            None => {
                inferred.push(None);
                continue;
            }
        };

        while year_counts.get(&year).copied().unwrap_or(0) >= 2 {
            year += 1;
        }
        *year_counts.entry(year).or_insert(0) += 1;

        inferred.push(Some(year));
        last_year = Some(year);
    }

    inferred
}
