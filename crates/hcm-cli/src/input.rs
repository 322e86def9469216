//! CSV input and output for the command-line harness.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use hcm_model::Row;

/// Header and rows of one CSV file. Empty cells are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl CsvTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn read_csv(path: &Path) -> Result<CsvTable> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let table = read_csv_from(file).with_context(|| format!("read {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.len(),
        "loaded input"
    );
    Ok(table)
}

/// Parse CSV with a header row. Short records leave trailing columns empty.
pub fn read_csv_from<R: Read>(reader: R) -> Result<CsvTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("read header row")?
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            let h = if idx == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();
    if headers.iter().all(String::is_empty) {
        bail!("input has no header row");
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read record {}", idx + 1))?;
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                let value = record.get(col).filter(|v| !v.trim().is_empty());
                (header.as_str(), value)
            })
            .collect();
        rows.push(row);
    }
    Ok(CsvTable { headers, rows })
}

/// Write `rows` with the given column order; missing cells are written empty.
pub fn write_csv_to<W: Write>(writer: W, headers: &[String], rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(headers).context("write header row")?;
    for row in rows {
        writer
            .write_record(headers.iter().map(|h| row.get(h).unwrap_or_default()))
            .context("write record")?;
    }
    writer.flush().context("flush output")?;
    Ok(())
}

pub fn write_csv(path: &Path, headers: &[String], rows: &[Row]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_csv_to(file, headers, rows).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = rows.len(), "wrote output");
    Ok(())
}
