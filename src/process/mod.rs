// src/process/mod.rs
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::{fs::File, io::BufReader, path::Path};

pub mod columns;
pub mod dates;
pub mod monthly;
pub mod reshape;
pub mod years;

/// A CSV sheet held in memory as strings, before any typing or
/// normalization is applied.
#[derive(Debug)]
pub struct Table {
    /// Column names exactly as the file claims them.
    pub headers: Vec<String>,
    /// One Vec<String> per data row. Rows may be ragged when the source
    /// file is; consumers index with `get` and treat absent cells as empty.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Position of `name` in `headers`, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Read an entire CSV file into a `Table`. The first record is taken as the
/// header row; every following record becomes a data row.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_csv_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path.as_ref()))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // keep this so records with different field-counts work
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("Failed to read header row from {:?}", path.as_ref()))?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| {
            format!(
                "CSV parse error in {:?} at record {}",
                path.as_ref(),
                idx + 1
            )
        })?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    Ok(Table { headers, rows })
}
