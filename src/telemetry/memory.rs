//! In-memory recording sink for tests and demos.

use super::{HistogramSummary, TelemetryEvent, TelemetrySink};
use crate::data::Batch;
use crate::Result;
use chrono::Utc;
use std::sync::{Arc, Mutex, PoisonError};

/// Sink that appends every event to a shared in-memory buffer.
///
/// Clones share the same buffer, so keep one clone aside before handing the
/// sink to a manager and inspect what was emitted through it:
///
/// ```
/// use barrido::run::RunManager;
/// use barrido::telemetry::MemorySink;
///
/// let sink = MemorySink::new();
/// let events = sink.clone();
/// let manager = RunManager::builder().sink(sink).build();
/// assert!(events.events().is_empty());
/// # let _ = manager;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<TelemetryEvent>>>,
}

impl MemorySink {
    /// New sink with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event recorded so far, in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drop all recorded events.
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, event: TelemetryEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl TelemetrySink for MemorySink {
    fn open_session(&mut self, label: &str) -> Result<()> {
        self.record(TelemetryEvent::SessionOpened {
            label: label.to_owned(),
            opened_at: Utc::now(),
        });
        Ok(())
    }

    fn scalar(&mut self, tag: &str, value: f64, step: u32) -> Result<()> {
        self.record(TelemetryEvent::Scalar {
            tag: tag.to_owned(),
            value,
            step,
        });
        Ok(())
    }

    fn image_grid(&mut self, tag: &str, batch: &Batch) -> Result<()> {
        self.record(TelemetryEvent::ImageGrid {
            tag: tag.to_owned(),
            samples: batch.len(),
        });
        Ok(())
    }

    fn graph(&mut self, description: &str, sample: &Batch) -> Result<()> {
        self.record(TelemetryEvent::Graph {
            description: description.to_owned(),
            sample_size: sample.len(),
        });
        Ok(())
    }

    fn histogram(&mut self, tag: &str, values: &[f32], step: u32) -> Result<()> {
        self.record(TelemetryEvent::Histogram {
            tag: tag.to_owned(),
            step,
            summary: HistogramSummary::from_values(values),
        });
        Ok(())
    }

    fn close_session(&mut self) -> Result<()> {
        self.record(TelemetryEvent::SessionClosed);
        Ok(())
    }
}
