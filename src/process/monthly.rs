// src/process/monthly.rs
use anyhow::{bail, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use super::{columns::normalize_columns, dates, Table};

/// Header names looked up after normalization.
const DATE_COLUMN: &str = "transfer_date";
const POSITION_COLUMN: &str = "position";

/// Label for events with no usable position cell.
const UNKNOWN_POSITION: &str = "UNKNOWN";

/// One transfer event, reduced to the fields the monthly aggregations use.
/// `date` is `None` when the source cell was missing or unparseable; such
/// events are excluded from every bucket.
#[derive(Debug)]
pub struct TransferEvent {
    pub date: Option<NaiveDateTime>,
    pub position: String,
}

/// (month, post-NIL flag) count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    pub month: String,
    pub post_nil: bool,
    pub transfer_count: u64,
}

/// (month, position, post-NIL flag) count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionMonthlyCount {
    pub month: String,
    pub position: String,
    pub post_nil: bool,
    pub transfer_count: u64,
}

/// Pull transfer events out of a raw portal table. The table's headers are
/// normalized first, so any spelling that cleans to `transfer_date` /
/// `position` is accepted. A missing date column is fatal for this
/// pipeline; a missing position column just labels every event `UNKNOWN`.
pub fn extract_events(table: &Table) -> Result<Vec<TransferEvent>> {
    let headers = normalize_columns(&table.headers);

    let date_idx = match headers.iter().position(|h| h == DATE_COLUMN) {
        Some(i) => i,
        None => bail!(
            "portal table has no `{}` column (normalized headers: {:?})",
            DATE_COLUMN,
            headers
        ),
    };
    let position_idx = headers.iter().position(|h| h == POSITION_COLUMN);
    if position_idx.is_none() {
        warn!(
            "portal table has no `{}` column; all events labeled {}",
            POSITION_COLUMN, UNKNOWN_POSITION
        );
    }

    let events: Vec<TransferEvent> = table
        .rows
        .iter()
        .map(|row| TransferEvent {
            date: row
                .get(date_idx)
                .and_then(|cell| dates::parse_transfer_date(cell)),
            position: clean_position(position_idx.and_then(|i| row.get(i))),
        })
        .collect();

    let dropped = events.iter().filter(|e| e.date.is_none()).count();
    if dropped > 0 {
        warn!(
            dropped,
            total = events.len(),
            "events without a parseable transfer date are excluded from monthly counts"
        );
    }

    Ok(events)
}

fn clean_position(cell: Option<&String>) -> String {
    match cell.map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(s) => s.to_uppercase(),
        None => UNKNOWN_POSITION.to_string(),
    }
}

/// Count events per (month, post-NIL flag). Output is sorted by month then
/// flag; summed counts equal the number of events with a parseable date.
pub fn monthly_counts(events: &[TransferEvent], cutoff: NaiveDateTime) -> Vec<MonthlyCount> {
    let mut groups: BTreeMap<(String, bool), u64> = BTreeMap::new();
    for event in events {
        if let Some(ts) = event.date {
            *groups.entry((dates::month_key(&ts), ts >= cutoff)).or_insert(0) += 1;
        }
    }
    groups
        .into_iter()
        .map(|((month, post_nil), transfer_count)| MonthlyCount {
            month,
            post_nil,
            transfer_count,
        })
        .collect()
}

/// Count events per (position, month, post-NIL flag). Output is sorted by
/// position, then month, then flag.
pub fn position_monthly_counts(
    events: &[TransferEvent],
    cutoff: NaiveDateTime,
) -> Vec<PositionMonthlyCount> {
    let mut groups: BTreeMap<(String, String, bool), u64> = BTreeMap::new();
    for event in events {
        if let Some(ts) = event.date {
            let key = (
                event.position.clone(),
                dates::month_key(&ts),
                ts >= cutoff,
            );
            *groups.entry(key).or_insert(0) += 1;
        }
    }
    groups
        .into_iter()
        .map(|((position, month, post_nil), transfer_count)| PositionMonthlyCount {
            month,
            position,
            post_nil,
            transfer_count,
        })
        .collect()
}
