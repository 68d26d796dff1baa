// src/process/reshape.rs
use anyhow::{bail, Result};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use super::years::{infer_years, level_for, Level};
use super::Table;

/// Identifier column of the NCAA counts sheet.
pub const SPORT_COLUMN: &str = "Sport";

/// The counts sheet in wide form: one row per sport, one numeric column per
/// (year, level) pair. Cells that fail numeric coercion are `None`, the
/// missing-value marker, which is distinct from zero and skipped by sums.
#[derive(Debug)]
pub struct WideTable {
    pub sports: Vec<String>,
    /// Original labels of the value columns, in sheet order.
    pub columns: Vec<String>,
    /// `values[row][col]`, parallel to `sports` x `columns`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl WideTable {
    /// Split a loaded sheet into the `Sport` identifier column and coerced
    /// numeric value columns. A sheet without a `Sport` column is fatal for
    /// this pipeline.
    pub fn from_table(table: &Table) -> Result<Self> {
        let sport_idx = match table.column_index(SPORT_COLUMN) {
            Some(i) => i,
            None => bail!(
                "sheet has no `{}` column (headers: {:?})",
                SPORT_COLUMN,
                table.headers
            ),
        };

        let value_indices: Vec<usize> = (0..table.headers.len())
            .filter(|&i| i != sport_idx)
            .collect();
        let columns: Vec<String> = value_indices
            .iter()
            .map(|&i| table.headers[i].clone())
            .collect();

        let mut sports = Vec::with_capacity(table.rows.len());
        let mut values = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            sports.push(row.get(sport_idx).cloned().unwrap_or_default());
            values.push(
                value_indices
                    .iter()
                    .map(|&i| coerce_numeric(row.get(i)))
                    .collect(),
            );
        }

        Ok(WideTable {
            sports,
            columns,
            values,
        })
    }
}

fn coerce_numeric(cell: Option<&String>) -> Option<f64> {
    cell.map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
}

/// One (sport, year, level) observation after reshaping.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    pub sport: String,
    pub athletes: Option<f64>,
    pub year: i32,
    pub level: Level,
}

/// Reshape wide to long: one row per (sport, value column) pair. Columns
/// whose year cannot be inferred are dropped entirely; rows with a missing
/// value are kept.
pub fn to_long(wide: &WideTable) -> Vec<LongRow> {
    let years = infer_years(&wide.columns);

    let mut long = Vec::new();
    for (c, (label, year)) in wide.columns.iter().zip(&years).enumerate() {
        let year = match year {
            Some(y) => *y,
            None => continue,
        };
        let level = level_for(label);
        for (r, sport) in wide.sports.iter().enumerate() {
            long.push(LongRow {
                sport: sport.clone(),
                athletes: wide.values[r][c],
                year,
                level,
            });
        }
    }
    long
}

/// Total athletes per year, across all sports and levels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyTotal {
    pub year: i32,
    #[serde(serialize_with = "serialize_total")]
    pub total_transfers: f64,
}

/// Total athletes per (sport, year). The identifier header keeps the source
/// sheet's capitalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SportYearlyTotal {
    #[serde(rename = "Sport")]
    pub sport: String,
    pub year: i32,
    #[serde(serialize_with = "serialize_total")]
    pub total_transfers: f64,
}

// Integral totals render without a fractional suffix (13, not 13.0).
fn serialize_total<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Sum athletes per year, skipping missing values. Groups are emitted in
/// ascending year order; a group whose values are all missing totals 0.
pub fn yearly_totals(rows: &[LongRow]) -> Vec<YearlyTotal> {
    let mut groups: BTreeMap<i32, f64> = BTreeMap::new();
    for row in rows {
        let total = groups.entry(row.year).or_insert(0.0);
        if let Some(v) = row.athletes {
            *total += v;
        }
    }
    groups
        .into_iter()
        .map(|(year, total_transfers)| YearlyTotal {
            year,
            total_transfers,
        })
        .collect()
}

/// Sum athletes per (sport, year), ascending by sport then year.
pub fn sport_yearly_totals(rows: &[LongRow]) -> Vec<SportYearlyTotal> {
    let mut groups: BTreeMap<(String, i32), f64> = BTreeMap::new();
    for row in rows {
        let total = groups.entry((row.sport.clone(), row.year)).or_insert(0.0);
        if let Some(v) = row.athletes {
            *total += v;
        }
    }
    groups
        .into_iter()
        .map(|((sport, year), total_transfers)| SportYearlyTotal {
            sport,
            year,
            total_transfers,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_wide() -> WideTable {
        // Sport, "2019 Undergraduate", "Graduate"
        let table = Table {
            headers: vec![
                "Sport".into(),
                "2019 Undergraduate".into(),
                "Graduate".into(),
            ],
            rows: vec![
                vec!["Football".into(), "5".into(), "1".into()],
                vec!["Golf".into(), "2".into(), "0".into()],
                vec!["Football".into(), "3".into(), "2".into()],
            ],
        };
        WideTable::from_table(&table).unwrap()
    }

    #[test]
    fn splits_identifier_from_values() {
        let wide = sample_wide();
        assert_eq!(wide.sports, vec!["Football", "Golf", "Football"]);
        assert_eq!(wide.columns, vec!["2019 Undergraduate", "Graduate"]);
        assert_eq!(wide.values[0], vec![Some(5.0), Some(1.0)]);
    }

    #[test]
    fn sport_column_is_required() {
        let table = Table {
            headers: vec!["Team".into(), "2019".into()],
            rows: vec![],
        };
        assert!(WideTable::from_table(&table).is_err());
    }

    #[test]
    fn non_numeric_cells_become_missing() {
        let table = Table {
            headers: vec!["Sport".into(), "2019 Undergraduate".into()],
            rows: vec![
                vec!["Soccer".into(), "n/a".into()],
                vec!["Tennis".into(), "".into()],
                vec!["Swimming".into(), " 12 ".into()],
            ],
        };
        let wide = WideTable::from_table(&table).unwrap();
        assert_eq!(wide.values[0][0], None);
        assert_eq!(wide.values[1][0], None);
        assert_eq!(wide.values[2][0], Some(12.0));
    }

    #[test]
    fn long_rows_carry_year_and_level() {
        let long = to_long(&sample_wide());
        // 3 sports x 2 columns
        assert_eq!(long.len(), 6);
        assert!(long
            .iter()
            .take(3)
            .all(|r| r.year == 2019 && r.level == Level::Undergraduate));
        assert!(long
            .iter()
            .skip(3)
            .all(|r| r.year == 2019 && r.level == Level::Graduate));
    }

    #[test]
    fn yearless_leading_column_is_dropped_without_shifting_pairs() {
        let table = Table {
            headers: vec!["Sport".into(), "Notes".into(), "2020 Undergraduate".into()],
            rows: vec![vec!["Golf".into(), "x".into(), "7".into()]],
        };
        let wide = WideTable::from_table(&table).unwrap();
        let long = to_long(&wide);
        assert_eq!(long.len(), 1);
        assert_eq!(long[0].year, 2020);
        assert_eq!(long[0].athletes, Some(7.0));
    }

    #[test]
    fn yearly_total_matches_hand_sum() {
        // 5 + 2 + 3 + 1 + 0 + 2 = 13
        let totals = yearly_totals(&to_long(&sample_wide()));
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].year, 2019);
        assert_eq!(totals[0].total_transfers, 13.0);
    }

    #[test]
    fn reshaping_preserves_numeric_mass() {
        let wide = sample_wide();
        let wide_sum: f64 = wide
            .values
            .iter()
            .flatten()
            .filter_map(|v| *v)
            .sum();
        let long_sum: f64 = yearly_totals(&to_long(&wide))
            .iter()
            .map(|t| t.total_transfers)
            .sum();
        assert_eq!(wide_sum, long_sum);
    }

    #[test]
    fn missing_values_contribute_nothing() {
        let rows = vec![
            LongRow {
                sport: "Golf".into(),
                athletes: None,
                year: 2019,
                level: Level::Undergraduate,
            },
            LongRow {
                sport: "Golf".into(),
                athletes: Some(4.0),
                year: 2019,
                level: Level::Graduate,
            },
        ];
        let totals = yearly_totals(&rows);
        assert_eq!(totals[0].total_transfers, 4.0);
    }

    #[test]
    fn all_missing_group_totals_zero() {
        let rows = vec![LongRow {
            sport: "Golf".into(),
            athletes: None,
            year: 2019,
            level: Level::Undergraduate,
        }];
        let totals = yearly_totals(&rows);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total_transfers, 0.0);
    }

    #[test]
    fn sport_totals_sorted_by_sport_then_year() {
        let long = to_long(&sample_wide());
        let totals = sport_yearly_totals(&long);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].sport, "Football");
        assert_eq!(totals[0].total_transfers, 11.0);
        assert_eq!(totals[1].sport, "Golf");
        assert_eq!(totals[1].total_transfers, 2.0);
    }
}
