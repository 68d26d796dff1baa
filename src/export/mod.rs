// src/export/mod.rs
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use csv::Writer;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::{
    fetch,
    process::{self, dates, monthly, reshape},
};

pub mod stoplight;

/// Output file names, fixed by the front-end that consumes them.
pub const CFP_MONTHLY_FILE: &str = "cfp_monthly_transfers.csv";
pub const CFP_POSITION_MONTHLY_FILE: &str = "cfp_position_monthly_transfers.csv";
pub const NCAA_YEARLY_FILE: &str = "ncaa_yearly_transfers.csv";
pub const NCAA_SPORT_YEARLY_FILE: &str = "ncaa_sport_yearly_transfers.csv";
pub const STOPLIGHT_FILE: &str = "stoplight_class_year_data.json";

/// Everything a pipeline run needs, passed explicitly; there are no
/// module-level path constants.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Root of the downloaded portal dataset (layout not ours to control).
    pub dataset_root: PathBuf,
    /// NCAA counts sheet, exported from the spreadsheet as CSV.
    pub sheet_path: PathBuf,
    /// Directory the output tables land in; created if absent.
    pub out_dir: PathBuf,
    /// Timestamps on or after this are flagged post-NIL.
    pub nil_cutoff: NaiveDateTime,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            dataset_root: PathBuf::from("dataset"),
            sheet_path: PathBuf::from("NCAA_Transfer_Portal_Data.csv"),
            out_dir: PathBuf::from("data"),
            nil_cutoff: *dates::NIL_CUTOFF,
        }
    }
}

/// Serialize rows to a comma-delimited file with a header row derived from
/// the row struct's fields.
pub fn write_csv<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> Result<()> {
    let mut wtr = Writer::from_path(&path)
        .with_context(|| format!("Failed to create output file: {:?}", path.as_ref()))?;
    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("Failed to write row to {:?}", path.as_ref()))?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to flush {:?}", path.as_ref()))?;
    Ok(())
}

/// CFP pipeline: portal events → monthly and position-level monthly counts.
pub fn export_cfp(cfg: &ExportConfig) -> Result<()> {
    fs::create_dir_all(&cfg.out_dir).context("creating output directory")?;

    let csv_path = fetch::find_portal_csv(&cfg.dataset_root)?;
    let table = process::load_csv_table(&csv_path)?;
    let events = monthly::extract_events(&table)?;

    let by_position = monthly::position_monthly_counts(&events, cfg.nil_cutoff);
    let position_path = cfg.out_dir.join(CFP_POSITION_MONTHLY_FILE);
    write_csv(&position_path, &by_position)?;
    info!(
        rows = by_position.len(),
        path = %position_path.display(),
        "exported position-level monthly transfers"
    );

    // Aggregate across positions, kept for the older chart.
    let by_month = monthly::monthly_counts(&events, cfg.nil_cutoff);
    let monthly_path = cfg.out_dir.join(CFP_MONTHLY_FILE);
    write_csv(&monthly_path, &by_month)?;
    info!(
        rows = by_month.len(),
        path = %monthly_path.display(),
        "exported monthly transfers"
    );

    if let (Some(first), Some(last)) = (by_month.first(), by_month.last()) {
        info!(from = %first.month, to = %last.month, "cfp date range");
    }

    Ok(())
}

/// NCAA pipeline: wide counts sheet → yearly and sport-yearly totals.
pub fn export_ncaa(cfg: &ExportConfig) -> Result<()> {
    fs::create_dir_all(&cfg.out_dir).context("creating output directory")?;

    let table = process::load_csv_table(&cfg.sheet_path)?;
    let wide = reshape::WideTable::from_table(&table)?;
    let long = reshape::to_long(&wide);

    let yearly = reshape::yearly_totals(&long);
    let yearly_path = cfg.out_dir.join(NCAA_YEARLY_FILE);
    write_csv(&yearly_path, &yearly)?;
    info!(
        rows = yearly.len(),
        path = %yearly_path.display(),
        "exported yearly transfer totals"
    );

    let sport_yearly = reshape::sport_yearly_totals(&long);
    let sport_path = cfg.out_dir.join(NCAA_SPORT_YEARLY_FILE);
    write_csv(&sport_path, &sport_yearly)?;
    info!(
        rows = sport_yearly.len(),
        path = %sport_path.display(),
        "exported sport-yearly transfer totals"
    );

    Ok(())
}

/// Stoplight pipeline: writes the fixed illustrative class-year document.
/// Reads no input, so it succeeds even when the other pipelines cannot.
pub fn export_stoplight(cfg: &ExportConfig) -> Result<()> {
    fs::create_dir_all(&cfg.out_dir).context("creating output directory")?;

    let data = stoplight::build();
    let json = serde_json::to_string_pretty(&data).context("serializing stoplight data")?;
    let path = cfg.out_dir.join(STOPLIGHT_FILE);
    fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))?;
    info!(path = %path.display(), "exported stoplight class-year data (illustrative)");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> ExportConfig {
        ExportConfig {
            dataset_root: dir.path().join("dataset"),
            sheet_path: dir.path().join("sheet.csv"),
            out_dir: dir.path().join("data"),
            ..ExportConfig::default()
        }
    }

    fn write_portal_csv(cfg: &ExportConfig) {
        fs::create_dir_all(&cfg.dataset_root).unwrap();
        let mut f = fs::File::create(cfg.dataset_root.join("portal_events.csv")).unwrap();
        writeln!(f, "Player,Position,Transfer Date").unwrap();
        writeln!(f, "A,qb,2021-06-15").unwrap();
        writeln!(f, "B,QB,2021-06-20").unwrap();
        writeln!(f, "C,wr,2021-08-01").unwrap();
        writeln!(f, "D,,2021-08-02").unwrap();
        writeln!(f, "E,rb,bad-date").unwrap();
    }

    #[test]
    fn cfp_pipeline_writes_both_tables() -> Result<()> {
        let dir = TempDir::new()?;
        let cfg = config_in(&dir);
        write_portal_csv(&cfg);

        export_cfp(&cfg)?;

        let monthly = fs::read_to_string(cfg.out_dir.join(CFP_MONTHLY_FILE))?;
        let mut lines = monthly.lines();
        assert_eq!(lines.next(), Some("month,post_nil,transfer_count"));
        assert_eq!(lines.next(), Some("2021-06,false,2"));
        assert_eq!(lines.next(), Some("2021-08,true,2"));
        assert_eq!(lines.next(), None); // bad-date row dropped

        let by_position = fs::read_to_string(cfg.out_dir.join(CFP_POSITION_MONTHLY_FILE))?;
        let mut lines = by_position.lines();
        assert_eq!(lines.next(), Some("month,position,post_nil,transfer_count"));
        assert_eq!(lines.next(), Some("2021-06,QB,false,2"));
        assert_eq!(lines.next(), Some("2021-08,UNKNOWN,true,1"));
        assert_eq!(lines.next(), Some("2021-08,WR,true,1"));
        Ok(())
    }

    #[test]
    fn cfp_pipeline_fails_without_dataset() {
        let dir = TempDir::new().unwrap();
        let cfg = config_in(&dir);
        assert!(export_cfp(&cfg).is_err());
        assert!(!cfg.out_dir.join(CFP_MONTHLY_FILE).exists());
    }

    #[test]
    fn ncaa_pipeline_writes_yearly_totals() -> Result<()> {
        let dir = TempDir::new()?;
        let cfg = config_in(&dir);

        let mut f = fs::File::create(&cfg.sheet_path)?;
        writeln!(f, "Sport,2019 Undergraduate,Graduate")?;
        writeln!(f, "Football,5,1")?;
        writeln!(f, "Golf,2,0")?;
        writeln!(f, "Football,3,2")?;

        export_ncaa(&cfg)?;

        let yearly = fs::read_to_string(cfg.out_dir.join(NCAA_YEARLY_FILE))?;
        assert_eq!(yearly, "year,total_transfers\n2019,13\n");

        let sport_yearly = fs::read_to_string(cfg.out_dir.join(NCAA_SPORT_YEARLY_FILE))?;
        let mut lines = sport_yearly.lines();
        assert_eq!(lines.next(), Some("Sport,year,total_transfers"));
        assert_eq!(lines.next(), Some("Football,2019,11"));
        assert_eq!(lines.next(), Some("Golf,2019,2"));
        Ok(())
    }

    #[test]
    fn stoplight_pipeline_needs_no_input() -> Result<()> {
        let dir = TempDir::new()?;
        let cfg = config_in(&dir);

        export_stoplight(&cfg)?;

        let json = fs::read_to_string(cfg.out_dir.join(STOPLIGHT_FILE))?;
        let doc: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(doc["pre_nil"]["total_transfers"], 1500);
        assert_eq!(doc["post_nil"]["lights"][1]["highlight"], true);
        Ok(())
    }

    #[test]
    fn reruns_are_byte_identical() -> Result<()> {
        let dir = TempDir::new()?;
        let cfg = config_in(&dir);
        write_portal_csv(&cfg);

        export_cfp(&cfg)?;
        export_stoplight(&cfg)?;
        let first_csv = fs::read_to_string(cfg.out_dir.join(CFP_MONTHLY_FILE))?;
        let first_json = fs::read_to_string(cfg.out_dir.join(STOPLIGHT_FILE))?;

        export_cfp(&cfg)?;
        export_stoplight(&cfg)?;
        assert_eq!(first_csv, fs::read_to_string(cfg.out_dir.join(CFP_MONTHLY_FILE))?);
        assert_eq!(first_json, fs::read_to_string(cfg.out_dir.join(STOPLIGHT_FILE))?);
        Ok(())
    }
}
