//! Telemetry sink seam and event model.
//!
//! A sink owns at most one open session at a time; the run manager opens a
//! session at `begin_run`, streams scalars and diagnostics into it, and
//! closes it at `end_run`. The manager decides severity: session lifecycle
//! and scalar emission failures are fatal to the run, while image-grid,
//! graph, and histogram failures are logged and skipped.

mod jsonl;
mod memory;

pub use jsonl::JsonlSink;
pub use memory::MemorySink;

use crate::data::Batch;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Live telemetry endpoint driven by the run manager.
pub trait TelemetrySink {
    /// Open a session tagged with a run label. The manager guarantees the
    /// pairing with [`close_session`](Self::close_session) and never opens
    /// two sessions at once.
    ///
    /// # Errors
    ///
    /// Sink-specific; an error here is fatal to the run being started.
    fn open_session(&mut self, label: &str) -> Result<()>;

    /// Emit one scalar sample under `tag` at `step`.
    ///
    /// # Errors
    ///
    /// Sink-specific; an error here is fatal to the epoch being closed.
    fn scalar(&mut self, tag: &str, value: f64, step: u32) -> Result<()>;

    /// Emit a sample image grid built from `batch` (diagnostic).
    ///
    /// # Errors
    ///
    /// Sink-specific; the manager logs and skips the failure.
    fn image_grid(&mut self, tag: &str, batch: &Batch) -> Result<()>;

    /// Emit a structural model snapshot traced with `sample` (diagnostic).
    ///
    /// # Errors
    ///
    /// Sink-specific; the manager logs and skips the failure.
    fn graph(&mut self, description: &str, sample: &Batch) -> Result<()>;

    /// Emit a distribution snapshot of `values` under `tag` at `step`
    /// (diagnostic).
    ///
    /// # Errors
    ///
    /// Sink-specific; the manager logs and skips the failure.
    fn histogram(&mut self, tag: &str, values: &[f32], step: u32) -> Result<()>;

    /// Flush and close the open session.
    ///
    /// # Errors
    ///
    /// Sink-specific; the manager surfaces the error after returning to
    /// idle.
    fn close_session(&mut self) -> Result<()>;
}

/// Summary statistics standing in for a full histogram payload.
///
/// Telemetry is a diagnostic stream; shipping whole parameter tensors through
/// it would dwarf the metrics, so sinks record the shape of the distribution
/// instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSummary {
    /// Sample count.
    pub count: usize,
    /// Smallest sample (`0.0` when empty).
    pub min: f32,
    /// Largest sample (`0.0` when empty).
    pub max: f32,
    /// Arithmetic mean (`0.0` when empty).
    pub mean: f64,
}

impl HistogramSummary {
    /// Summarize a sample slice.
    #[must_use]
    pub fn from_values(values: &[f32]) -> Self {
        if values.is_empty() {
            return Self {
                count: 0,
                min: 0.0,
                max: 0.0,
                mean: 0.0,
            };
        }
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0_f64;
        for &value in values {
            min = min.min(value);
            max = max.max(value);
            sum += f64::from(value);
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = sum / values.len() as f64;
        Self {
            count: values.len(),
            min,
            max,
            mean,
        }
    }
}

/// One event as observed by the recording sinks.
///
/// Serialized internally tagged, so a JSON-lines stream reads as
/// `{"event":"scalar","tag":"Loss",...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A session opened under `label`.
    SessionOpened {
        /// Session label derived from the run index and config.
        label: String,
        /// Wall-clock open time.
        opened_at: DateTime<Utc>,
    },
    /// One scalar sample.
    Scalar {
        /// Metric tag.
        tag: String,
        /// Sampled value.
        value: f64,
        /// Step (epoch index) the sample belongs to.
        step: u32,
    },
    /// Sample image grid, reduced to its example count.
    ImageGrid {
        /// Grid tag.
        tag: String,
        /// Number of examples in the sampled batch.
        samples: usize,
    },
    /// Structural model snapshot.
    Graph {
        /// Model description as reported by the probe.
        description: String,
        /// Number of examples in the tracing sample.
        sample_size: usize,
    },
    /// Distribution snapshot.
    Histogram {
        /// Parameter tag (`name` or `name.grad`).
        tag: String,
        /// Step (epoch index) the snapshot belongs to.
        step: u32,
        /// Summarized distribution.
        summary: HistogramSummary,
    },
    /// The session flushed and closed.
    SessionClosed,
}

/// Sink that discards every event (the default).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn open_session(&mut self, _label: &str) -> Result<()> {
        Ok(())
    }

    fn scalar(&mut self, _tag: &str, _value: f64, _step: u32) -> Result<()> {
        Ok(())
    }

    fn image_grid(&mut self, _tag: &str, _batch: &Batch) -> Result<()> {
        Ok(())
    }

    fn graph(&mut self, _description: &str, _sample: &Batch) -> Result<()> {
        Ok(())
    }

    fn histogram(&mut self, _tag: &str, _values: &[f32], _step: u32) -> Result<()> {
        Ok(())
    }

    fn close_session(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_summary() {
        let summary = HistogramSummary::from_values(&[1.0, -2.0, 4.0, 1.0]);
        assert_eq!(summary.count, 4);
        assert!((summary.min - (-2.0)).abs() < f32::EPSILON);
        assert!((summary.max - 4.0).abs() < f32::EPSILON);
        assert!((summary.mean - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_histogram_summary_of_empty_slice() {
        let summary = HistogramSummary::from_values(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.min.abs() < f32::EPSILON);
        assert!(summary.max.abs() < f32::EPSILON);
    }

    #[test]
    fn test_event_serializes_internally_tagged() {
        let event = TelemetryEvent::Scalar {
            tag: "Loss".into(),
            value: 0.25,
            step: 3,
        };
        let json = serde_json::to_string(&event).expect("serialization failed");
        assert_eq!(json, r#"{"event":"scalar","tag":"Loss","value":0.25,"step":3}"#);
    }

    #[test]
    fn test_null_sink_accepts_everything() {
        let mut sink = NullSink;
        assert!(sink.open_session("run-1-default").is_ok());
        assert!(sink.scalar("Loss", 1.0, 1).is_ok());
        assert!(sink.image_grid("images", &Batch::default()).is_ok());
        assert!(sink.graph("model", &Batch::default()).is_ok());
        assert!(sink.histogram("w", &[0.1], 1).is_ok());
        assert!(sink.close_session().is_ok());
    }
}
