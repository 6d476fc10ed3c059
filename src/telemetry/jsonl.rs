//! JSON-lines telemetry sink.

use super::{HistogramSummary, TelemetryEvent, TelemetrySink};
use crate::data::Batch;
use crate::{Error, Result};
use chrono::Utc;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Sink writing each session as one JSON-lines file under a directory.
///
/// The file name is the sanitized session label plus `.jsonl`; each line is
/// one internally tagged [`TelemetryEvent`], so a session file replays the
/// run's telemetry in order.
#[derive(Debug)]
pub struct JsonlSink {
    dir: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl JsonlSink {
    /// Sink rooted at `dir`; the directory is created when the first session
    /// opens.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            writer: None,
        }
    }

    /// Path a session labeled `label` writes to.
    #[must_use]
    pub fn session_path(&self, label: &str) -> PathBuf {
        self.dir.join(format!("{}.jsonl", sanitize(label)))
    }

    fn write_event(&mut self, event: &TelemetryEvent) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| Error::Telemetry("no open session".to_owned()))?;
        append_event(writer, event)
    }
}

fn append_event(writer: &mut BufWriter<File>, event: &TelemetryEvent) -> Result<()> {
    serde_json::to_writer(&mut *writer, event)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Keep labels path-safe: anything outside `[A-Za-z0-9-_=.]` becomes `-`.
fn sanitize(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '=' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

impl TelemetrySink for JsonlSink {
    fn open_session(&mut self, label: &str) -> Result<()> {
        if self.writer.is_some() {
            return Err(Error::Telemetry(format!(
                "session already open, cannot open {label}"
            )));
        }
        fs::create_dir_all(&self.dir)?;
        let file = File::create(self.session_path(label))?;
        // Stored only once the opening event lands, so a failed open leaves
        // the sink closed instead of blocking every later session.
        let mut writer = BufWriter::new(file);
        append_event(
            &mut writer,
            &TelemetryEvent::SessionOpened {
                label: label.to_owned(),
                opened_at: Utc::now(),
            },
        )?;
        self.writer = Some(writer);
        Ok(())
    }

    fn scalar(&mut self, tag: &str, value: f64, step: u32) -> Result<()> {
        self.write_event(&TelemetryEvent::Scalar {
            tag: tag.to_owned(),
            value,
            step,
        })
    }

    fn image_grid(&mut self, tag: &str, batch: &Batch) -> Result<()> {
        self.write_event(&TelemetryEvent::ImageGrid {
            tag: tag.to_owned(),
            samples: batch.len(),
        })
    }

    fn graph(&mut self, description: &str, sample: &Batch) -> Result<()> {
        self.write_event(&TelemetryEvent::Graph {
            description: description.to_owned(),
            sample_size: sample.len(),
        })
    }

    fn histogram(&mut self, tag: &str, values: &[f32], step: u32) -> Result<()> {
        self.write_event(&TelemetryEvent::Histogram {
            tag: tag.to_owned(),
            step,
            summary: HistogramSummary::from_values(values),
        })
    }

    fn close_session(&mut self) -> Result<()> {
        // Taken before any IO: a failed close write must still end the
        // session, not leave the sink rejecting every later open.
        let mut writer = self
            .writer
            .take()
            .ok_or_else(|| Error::Telemetry("no open session".to_owned()))?;
        append_event(&mut writer, &TelemetryEvent::SessionClosed)?;
        writer.flush()?;
        Ok(())
    }
}
