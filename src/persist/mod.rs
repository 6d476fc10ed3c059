//! CSV and JSON artifact writers for sweep histories.
//!
//! `save_artifacts` materializes one history as `<stem>.csv` plus
//! `<stem>.json`; both carry the same records in the same append order, with
//! the fixed metric columns first and the union of parameter names (in first
//! appearance order) after them. Writes go to a `.tmp` sibling and are
//! renamed into place, so a crash mid-write never leaves a torn artifact and
//! a retry after a failure is safe.

use crate::run::RunRecord;
use crate::Result;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Metric columns shared by every row, ahead of any parameter columns.
const BASE_COLUMNS: [&str; 6] = [
    "run",
    "epoch",
    "loss",
    "accuracy",
    "epoch_duration",
    "run_duration",
];

/// Write `records` as `<stem>.csv` and `<stem>.json`, creating the stem's
/// parent directory when missing.
///
/// An empty history still produces valid artifacts: a header-only CSV and an
/// empty JSON array.
///
/// # Errors
///
/// IO failures creating, writing, or renaming either artifact, or JSON
/// serialization failures.
pub fn save_artifacts(stem: &Path, records: &[RunRecord]) -> Result<()> {
    if let Some(parent) = stem.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    write_csv(stem, records)?;
    write_json(stem, records)?;
    Ok(())
}

/// `<stem>.<extension>`, appended rather than substituted so dotted stems
/// like `results.v2` keep their stem intact.
fn artifact_path(stem: &Path, extension: &str) -> PathBuf {
    let mut path = OsString::from(stem.as_os_str());
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Union of parameter names across `records`, ordered by first appearance.
fn parameter_columns(records: &[RunRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for (name, _) in record.params() {
            if !columns.iter().any(|column| column == name) {
                columns.push(name.clone());
            }
        }
    }
    columns
}

fn write_csv(stem: &Path, records: &[RunRecord]) -> Result<()> {
    let path = artifact_path(stem, "csv");
    let tmp = tmp_path(&path);
    let columns = parameter_columns(records);
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        let header: Vec<String> = BASE_COLUMNS
            .iter()
            .map(|&column| column.to_owned())
            .chain(columns.iter().map(|column| escape(column)))
            .collect();
        writeln!(writer, "{}", header.join(","))?;
        for record in records {
            let mut row = vec![
                record.run().to_string(),
                record.epoch().to_string(),
                format!("{:.6}", record.loss()),
                format!("{:.6}", record.accuracy()),
                format!("{:.6}", record.epoch_duration()),
                format!("{:.6}", record.run_duration()),
            ];
            for column in &columns {
                // A record missing a column (mixed sweeps) yields an empty cell.
                row.push(
                    record
                        .param(column)
                        .map_or_else(String::new, |value| escape(&value.to_string())),
                );
            }
            writeln!(writer, "{}", row.join(","))?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp, &path)?;
    debug!(path = %path.display(), rows = records.len(), "csv artifact written");
    Ok(())
}

fn write_json(stem: &Path, records: &[RunRecord]) -> Result<()> {
    let path = artifact_path(stem, "json");
    let tmp = tmp_path(&path);
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    fs::rename(&tmp, &path)?;
    debug!(path = %path.display(), rows = records.len(), "json artifact written");
    Ok(())
}

/// Quote a CSV field only when it needs it; embedded quotes are doubled.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
