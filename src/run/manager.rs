//! Run/epoch lifecycle state machine and metrics aggregation.

use super::record::RunRecord;
use super::state::{EpochState, Phase, RunState};
use crate::data::{Batch, DataSource, StepOutcome};
use crate::model::ModelProbe;
use crate::persist;
use crate::sweep::RunConfig;
use crate::telemetry::{NullSink, TelemetrySink};
use crate::{Error, Result};
use std::fmt;
use std::mem;
use std::path::Path;
use tracing::{debug, info, warn};

/// Comparison rule counting prediction/label matches in one batch.
pub type MatchRule = Box<dyn Fn(&[Vec<f32>], &[usize]) -> usize>;

/// Default comparison rule: arg-max class equality. The first maximum wins
/// ties; prediction/label pairs are compared index-by-index.
#[must_use]
pub fn argmax_matches(predictions: &[Vec<f32>], labels: &[usize]) -> usize {
    predictions
        .iter()
        .zip(labels)
        .filter(|(scores, label)| argmax(scores) == Some(**label))
        .count()
}

fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

/// Owner of the run/epoch lifecycle, the metric accumulators, and the
/// append-only result history.
///
/// ```text
/// Idle ──begin_run──▶ RunActive ──begin_epoch──▶ EpochActive
///  ▲                   ▲    │                        │
///  └─────end_run───────┘    └────────end_epoch───────┘
/// ```
///
/// One manager drives one sweep: a single logical thread calls the lifecycle
/// hooks in order, one run at a time, one epoch at a time. Out-of-phase calls
/// return [`Error::LifecycleViolation`] and leave the current phase intact.
pub struct RunManager {
    sink: Box<dyn TelemetrySink>,
    match_rule: MatchRule,
    phase: Phase,
    runs_started: u32,
    history: Vec<RunRecord>,
}

impl fmt::Debug for RunManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunManager")
            .field("phase", &self.phase.name())
            .field("runs_started", &self.runs_started)
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl Default for RunManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RunManager {
    /// Manager with a discarding sink and the default arg-max rule.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Builder for telemetry-sink and comparison-rule injection.
    #[must_use]
    pub fn builder() -> RunManagerBuilder {
        RunManagerBuilder::default()
    }

    /// Start the next run of the sweep under `config`.
    ///
    /// Opens a telemetry session labeled from the run index and config, then
    /// captures one sample batch from `data` for a best-effort image grid and
    /// model graph snapshot; those diagnostics may fail (logged at `warn`)
    /// without failing the run.
    ///
    /// # Errors
    ///
    /// [`Error::LifecycleViolation`] unless the manager is idle;
    /// [`Error::EmptyDataset`] when `data.dataset_size()` is zero (checked
    /// before any session opens); any error from the sink's `open_session`.
    /// On error the manager stays idle and the run counter is untouched.
    pub fn begin_run(
        &mut self,
        config: RunConfig,
        model: &dyn ModelProbe,
        data: &dyn DataSource,
    ) -> Result<()> {
        match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => {}
            other => {
                let found = other.name();
                self.phase = other;
                return Err(Error::LifecycleViolation {
                    operation: "begin_run",
                    expected: "idle",
                    found,
                });
            }
        }
        let dataset_size = data.dataset_size();
        if dataset_size == 0 {
            return Err(Error::EmptyDataset);
        }

        let run = RunState::begin(config, self.runs_started + 1, dataset_size);
        self.sink.open_session(&run.label)?;
        self.runs_started = run.index;
        debug!(
            run = run.index,
            label = %run.label,
            dataset_size,
            started_at = %run.started_at,
            "run started"
        );
        self.emit_run_diagnostics(model, data);
        self.phase = Phase::RunActive(run);
        Ok(())
    }

    /// Start the next epoch of the active run: bumps the 1-based epoch index
    /// and zeroes both accumulators.
    ///
    /// # Errors
    ///
    /// [`Error::LifecycleViolation`] unless a run is active with no epoch
    /// open.
    pub fn begin_epoch(&mut self) -> Result<()> {
        match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::RunActive(mut run) => {
                run.epochs_begun += 1;
                let epoch = EpochState::begin(run.epochs_begun);
                debug!(run = run.index, epoch = epoch.index, "epoch started");
                self.phase = Phase::EpochActive(run, epoch);
                Ok(())
            }
            other => {
                let found = other.name();
                self.phase = other;
                Err(Error::LifecycleViolation {
                    operation: "begin_epoch",
                    expected: "run-active",
                    found,
                })
            }
        }
    }

    /// Accumulate one batch's mean loss, weighted by its example count.
    ///
    /// Losses are batch means; summing them unweighted would bias the epoch
    /// mean whenever batch sizes vary (a ragged final batch, say).
    ///
    /// # Errors
    ///
    /// [`Error::LifecycleViolation`] unless an epoch is active.
    #[allow(clippy::cast_precision_loss)]
    pub fn track_loss(&mut self, batch_loss: f64, batch_size: usize) -> Result<()> {
        match &mut self.phase {
            Phase::EpochActive(_, epoch) => {
                epoch.weighted_loss += batch_loss * batch_size as f64;
                Ok(())
            }
            other => Err(Error::LifecycleViolation {
                operation: "track_loss",
                expected: "epoch-active",
                found: other.name(),
            }),
        }
    }

    /// Count this batch's correct predictions under the injected comparison
    /// rule and add them to the epoch's accumulator.
    ///
    /// # Errors
    ///
    /// [`Error::LifecycleViolation`] unless an epoch is active.
    pub fn track_correct(&mut self, predictions: &[Vec<f32>], labels: &[usize]) -> Result<()> {
        match &mut self.phase {
            Phase::EpochActive(_, epoch) => {
                epoch.correct += (self.match_rule)(predictions, labels);
                Ok(())
            }
            other => Err(Error::LifecycleViolation {
                operation: "track_correct",
                expected: "epoch-active",
                found: other.name(),
            }),
        }
    }

    /// Close the active epoch: derive the dataset-weighted mean loss and
    /// accuracy, emit epoch telemetry, and append a [`RunRecord`] to the
    /// history.
    ///
    /// Scalars (`Loss`, `Accuracy`, `Number Correct`) are core telemetry and
    /// their failure fails the call with the epoch left open for a retry.
    /// Parameter and gradient histograms are best-effort diagnostics, logged
    /// and skipped on failure.
    ///
    /// # Errors
    ///
    /// [`Error::LifecycleViolation`] unless an epoch is active; any scalar
    /// emission error from the sink.
    #[allow(clippy::cast_precision_loss)]
    pub fn end_epoch(&mut self, model: &dyn ModelProbe) -> Result<RunRecord> {
        match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::EpochActive(run, epoch) => {
                let epoch_duration = epoch.started.elapsed().as_secs_f64();
                let run_duration = run.started.elapsed().as_secs_f64();
                let denominator = run.dataset_size as f64;
                let mean_loss = epoch.weighted_loss / denominator;
                let accuracy = epoch.correct as f64 / denominator;

                if let Err(e) = self.emit_epoch_scalars(mean_loss, accuracy, epoch.correct, epoch.index) {
                    self.phase = Phase::EpochActive(run, epoch);
                    return Err(e);
                }
                self.emit_histograms(model, epoch.index);

                let record = RunRecord::new(
                    run.index,
                    epoch.index,
                    mean_loss,
                    accuracy,
                    epoch_duration,
                    run_duration,
                    run.config.pairs().to_vec(),
                );
                info!(
                    run = run.index,
                    epoch = epoch.index,
                    loss = mean_loss,
                    accuracy,
                    "epoch complete"
                );
                self.history.push(record.clone());
                self.phase = Phase::RunActive(run);
                Ok(record)
            }
            other => {
                let found = other.name();
                self.phase = other;
                Err(Error::LifecycleViolation {
                    operation: "end_epoch",
                    expected: "epoch-active",
                    found,
                })
            }
        }
    }

    /// Finish the active run: flush and close its telemetry session.
    ///
    /// The manager returns to idle even when the final flush fails; the
    /// error is surfaced after the transition, so a broken sink cannot wedge
    /// the lifecycle. The accumulated history is kept; it spans the whole
    /// sweep.
    ///
    /// # Errors
    ///
    /// [`Error::LifecycleViolation`] unless a run is active (an open epoch
    /// must be ended first); any error from the sink's `close_session`.
    pub fn end_run(&mut self) -> Result<()> {
        match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::RunActive(run) => {
                debug!(run = run.index, epochs = run.epochs_begun, "run complete");
                self.sink.close_session()
            }
            other => {
                let found = other.name();
                self.phase = other;
                Err(Error::LifecycleViolation {
                    operation: "end_run",
                    expected: "run-active",
                    found,
                })
            }
        }
    }

    /// Drive one full epoch: `begin_epoch`, then one `step` call per batch
    /// with its loss and matches tracked, then `end_epoch`.
    ///
    /// The model is lent to each `step` call mutably (training mutates it)
    /// and probed for histograms once the last batch is done.
    ///
    /// # Errors
    ///
    /// Propagates the underlying lifecycle and telemetry errors.
    pub fn run_epoch<M, F>(
        &mut self,
        model: &mut M,
        data: &dyn DataSource,
        mut step: F,
    ) -> Result<RunRecord>
    where
        M: ModelProbe,
        F: FnMut(&mut M, &Batch) -> StepOutcome,
    {
        self.begin_epoch()?;
        for batch in data.batches() {
            let outcome = step(model, &batch);
            self.track_loss(outcome.loss, batch.len())?;
            self.track_correct(&outcome.predictions, &batch.labels)?;
        }
        self.end_epoch(&*model)
    }

    /// Persist the accumulated history as `<destination>.csv` and
    /// `<destination>.json`.
    ///
    /// Callable in any phase and safe to retry: artifacts are written to
    /// temporary siblings and renamed into place, and the in-memory history
    /// is never touched.
    ///
    /// # Errors
    ///
    /// IO or serialization failures from the artifact writers.
    pub fn save(&self, destination: impl AsRef<Path>) -> Result<()> {
        let stem = destination.as_ref();
        persist::save_artifacts(stem, &self.history)?;
        info!(
            stem = %stem.display(),
            records = self.history.len(),
            "artifacts written"
        );
        Ok(())
    }

    /// Every appended record, in append order.
    #[must_use]
    pub fn history(&self) -> &[RunRecord] {
        &self.history
    }

    /// Number of runs begun over the manager's lifetime.
    #[must_use]
    pub const fn runs_started(&self) -> u32 {
        self.runs_started
    }

    /// Index of the live run, if one is active.
    #[must_use]
    pub const fn current_run(&self) -> Option<u32> {
        match &self.phase {
            Phase::Idle => None,
            Phase::RunActive(run) | Phase::EpochActive(run, _) => Some(run.index),
        }
    }

    /// Index of the live epoch, if one is active.
    #[must_use]
    pub const fn current_epoch(&self) -> Option<u32> {
        match &self.phase {
            Phase::EpochActive(_, epoch) => Some(epoch.index),
            _ => None,
        }
    }

    /// True when no run is active.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    fn emit_run_diagnostics(&mut self, model: &dyn ModelProbe, data: &dyn DataSource) {
        let Some(sample) = data.batches().next() else {
            warn!("data source produced no sample batch; skipping run diagnostics");
            return;
        };
        if let Err(e) = self.sink.image_grid("images", &sample) {
            warn!(error = %e, "sample image grid emission failed; continuing");
        }
        if let Err(e) = self.sink.graph(&model.describe(), &sample) {
            warn!(error = %e, "model graph emission failed; continuing");
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn emit_epoch_scalars(
        &mut self,
        loss: f64,
        accuracy: f64,
        correct: usize,
        step: u32,
    ) -> Result<()> {
        self.sink.scalar("Loss", loss, step)?;
        self.sink.scalar("Accuracy", accuracy, step)?;
        self.sink.scalar("Number Correct", correct as f64, step)?;
        Ok(())
    }

    fn emit_histograms(&mut self, model: &dyn ModelProbe, step: u32) {
        for snapshot in model.parameters() {
            if let Err(e) = self.sink.histogram(snapshot.name(), snapshot.values(), step) {
                warn!(tag = snapshot.name(), error = %e, "parameter histogram emission failed; continuing");
            }
            if let Some(gradients) = snapshot.gradients() {
                let tag = format!("{}.grad", snapshot.name());
                if let Err(e) = self.sink.histogram(&tag, gradients, step) {
                    warn!(tag = %tag, error = %e, "gradient histogram emission failed; continuing");
                }
            }
        }
    }
}

/// Builder injecting the telemetry sink and comparison rule.
#[derive(Default)]
pub struct RunManagerBuilder {
    sink: Option<Box<dyn TelemetrySink>>,
    match_rule: Option<MatchRule>,
}

impl RunManagerBuilder {
    /// Use `sink` for telemetry (default: [`NullSink`]).
    #[must_use]
    pub fn sink(mut self, sink: impl TelemetrySink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Replace the default arg-max comparison rule.
    #[must_use]
    pub fn match_rule(
        mut self,
        rule: impl Fn(&[Vec<f32>], &[usize]) -> usize + 'static,
    ) -> Self {
        self.match_rule = Some(Box::new(rule));
        self
    }

    /// Build the manager: idle, empty history.
    #[must_use]
    pub fn build(self) -> RunManager {
        RunManager {
            sink: self.sink.unwrap_or_else(|| Box::new(NullSink)),
            match_rule: self.match_rule.unwrap_or_else(|| Box::new(argmax_matches)),
            phase: Phase::Idle,
            runs_started: 0,
            history: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InMemoryDataSource;
    use crate::model::ParameterSnapshot;
    use crate::sweep::ParamValue;
    use crate::telemetry::{MemorySink, TelemetryEvent};

    struct StubModel;

    impl ModelProbe for StubModel {
        fn describe(&self) -> String {
            "stub(1 -> 2)".to_owned()
        }

        fn parameters(&self) -> Vec<ParameterSnapshot> {
            vec![
                ParameterSnapshot::new("w", vec![0.1, 0.2]).with_gradients(vec![0.01, -0.02]),
                ParameterSnapshot::new("b", vec![0.0]),
            ]
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn source(items: usize, batch_size: usize) -> InMemoryDataSource {
        InMemoryDataSource::new(
            (0..items).map(|i| (vec![i as f32], i % 2)).collect(),
            batch_size,
        )
    }

    fn config() -> RunConfig {
        RunConfig::from_pairs([("lr", 0.1)])
    }

    /// One-hot scores matching each label exactly.
    fn perfect_predictions(labels: &[usize]) -> Vec<Vec<f32>> {
        labels
            .iter()
            .map(|&label| {
                let mut scores = vec![0.0_f32; 2];
                scores[label] = 1.0;
                scores
            })
            .collect()
    }

    #[test]
    fn test_starts_idle() {
        let manager = RunManager::new();
        assert!(manager.is_idle());
        assert_eq!(manager.runs_started(), 0);
        assert_eq!(manager.current_run(), None);
        assert_eq!(manager.current_epoch(), None);
        assert!(manager.history().is_empty());
    }

    #[test]
    fn test_begin_run_transitions_and_counts() {
        let mut manager = RunManager::new();
        manager.begin_run(config(), &StubModel, &source(10, 4)).unwrap();
        assert!(!manager.is_idle());
        assert_eq!(manager.runs_started(), 1);
        assert_eq!(manager.current_run(), Some(1));
        assert_eq!(manager.current_epoch(), None);
    }

    #[test]
    fn test_begin_run_requires_idle() {
        let mut manager = RunManager::new();
        manager.begin_run(config(), &StubModel, &source(10, 4)).unwrap();
        let err = manager
            .begin_run(config(), &StubModel, &source(10, 4))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::LifecycleViolation {
                operation: "begin_run",
                found: "run-active",
                ..
            }
        ));
        // The live run survives the rejected call.
        assert_eq!(manager.current_run(), Some(1));
        assert_eq!(manager.runs_started(), 1);
    }

    #[test]
    fn test_begin_run_rejects_empty_dataset_before_opening_a_session() {
        let sink = MemorySink::new();
        let observer = sink.clone();
        let mut manager = RunManager::builder().sink(sink).build();
        let err = manager
            .begin_run(config(), &StubModel, &source(0, 4))
            .unwrap_err();
        assert!(matches!(err, Error::EmptyDataset));
        assert!(manager.is_idle());
        assert_eq!(manager.runs_started(), 0);
        assert!(observer.events().is_empty());
    }

    #[test]
    fn test_begin_epoch_requires_a_run() {
        let mut manager = RunManager::new();
        let err = manager.begin_epoch().unwrap_err();
        assert!(matches!(
            err,
            Error::LifecycleViolation {
                operation: "begin_epoch",
                found: "idle",
                ..
            }
        ));
    }

    #[test]
    fn test_double_begin_epoch_is_a_violation() {
        let mut manager = RunManager::new();
        manager.begin_run(config(), &StubModel, &source(10, 4)).unwrap();
        manager.begin_epoch().unwrap();
        let err = manager.begin_epoch().unwrap_err();
        assert!(matches!(
            err,
            Error::LifecycleViolation {
                operation: "begin_epoch",
                found: "epoch-active",
                ..
            }
        ));
        // The open epoch survives the rejected call.
        assert_eq!(manager.current_epoch(), Some(1));
    }

    #[test]
    fn test_track_calls_require_an_epoch() {
        let mut manager = RunManager::new();
        manager.begin_run(config(), &StubModel, &source(10, 4)).unwrap();
        assert!(matches!(
            manager.track_loss(0.5, 4).unwrap_err(),
            Error::LifecycleViolation { operation: "track_loss", .. }
        ));
        assert!(matches!(
            manager.track_correct(&[], &[]).unwrap_err(),
            Error::LifecycleViolation { operation: "track_correct", .. }
        ));
    }

    #[test]
    fn test_end_run_with_open_epoch_is_a_violation() {
        let mut manager = RunManager::new();
        manager.begin_run(config(), &StubModel, &source(10, 4)).unwrap();
        manager.begin_epoch().unwrap();
        let err = manager.end_run().unwrap_err();
        assert!(matches!(
            err,
            Error::LifecycleViolation {
                operation: "end_run",
                found: "epoch-active",
                ..
            }
        ));
    }

    #[test]
    fn test_mean_loss_is_weighted_by_batch_size() {
        let mut manager = RunManager::new();
        manager.begin_run(config(), &StubModel, &source(6, 4)).unwrap();
        manager.begin_epoch().unwrap();
        manager.track_loss(0.5, 4).unwrap();
        manager.track_loss(0.8, 2).unwrap();
        let record = manager.end_epoch(&StubModel).unwrap();
        // (0.5 * 4 + 0.8 * 2) / 6 = 0.6, not the naive (0.5 + 0.8) / 2.
        assert!((record.loss() - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_accuracy_uses_the_default_argmax_rule() {
        let mut manager = RunManager::new();
        manager.begin_run(config(), &StubModel, &source(4, 4)).unwrap();
        manager.begin_epoch().unwrap();
        // Three of four predicted correctly.
        let labels = [0, 1, 0, 1];
        let mut predictions = perfect_predictions(&labels);
        predictions[3] = vec![1.0, 0.0];
        manager.track_loss(0.5, 4).unwrap();
        manager.track_correct(&predictions, &labels).unwrap();
        let record = manager.end_epoch(&StubModel).unwrap();
        assert!((record.accuracy() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_injected_match_rule_replaces_argmax() {
        let mut manager = RunManager::builder()
            .match_rule(|predictions, _labels| predictions.len())
            .build();
        manager.begin_run(config(), &StubModel, &source(4, 4)).unwrap();
        manager.begin_epoch().unwrap();
        manager.track_loss(0.1, 4).unwrap();
        manager
            .track_correct(&vec![vec![0.0]; 4], &[9, 9, 9, 9])
            .unwrap();
        let record = manager.end_epoch(&StubModel).unwrap();
        assert!((record.accuracy() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_end_epoch_appends_the_returned_record() {
        let mut manager = RunManager::new();
        manager.begin_run(config(), &StubModel, &source(8, 4)).unwrap();
        manager.begin_epoch().unwrap();
        manager.track_loss(1.0, 8).unwrap();
        let record = manager.end_epoch(&StubModel).unwrap();
        assert_eq!(manager.history().len(), 1);
        assert_eq!(manager.history()[0], record);
        assert_eq!(record.run(), 1);
        assert_eq!(record.epoch(), 1);
        assert_eq!(record.param("lr"), Some(&ParamValue::Float(0.1)));
    }

    #[test]
    fn test_epoch_counter_resets_per_run_and_history_survives() {
        let mut manager = RunManager::new();
        for _ in 0..2 {
            manager.begin_run(config(), &StubModel, &source(4, 2)).unwrap();
            for _ in 0..2 {
                manager.begin_epoch().unwrap();
                manager.track_loss(0.5, 4).unwrap();
                manager.end_epoch(&StubModel).unwrap();
            }
            manager.end_run().unwrap();
        }
        assert!(manager.is_idle());
        assert_eq!(manager.runs_started(), 2);
        let pairs: Vec<(u32, u32)> = manager
            .history()
            .iter()
            .map(|r| (r.run(), r.epoch()))
            .collect();
        assert_eq!(pairs, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn test_run_epoch_drives_the_batch_loop() {
        let mut manager = RunManager::new();
        let data = source(10, 4);
        let mut model = StubModel;
        manager.begin_run(config(), &model, &data).unwrap();
        let record = manager
            .run_epoch(&mut model, &data, |_, batch| StepOutcome {
                predictions: perfect_predictions(&batch.labels),
                loss: 0.4,
            })
            .unwrap();
        // Uniform per-batch loss stays the epoch mean; every example matched.
        assert!((record.loss() - 0.4).abs() < f64::EPSILON);
        assert!((record.accuracy() - 1.0).abs() < f64::EPSILON);
        assert_eq!(manager.current_epoch(), None);
    }

    #[test]
    fn test_telemetry_stream_shape() {
        let sink = MemorySink::new();
        let observer = sink.clone();
        let mut manager = RunManager::builder().sink(sink).build();
        manager.begin_run(config(), &StubModel, &source(4, 2)).unwrap();
        manager.begin_epoch().unwrap();
        manager.track_loss(0.5, 4).unwrap();
        manager.end_epoch(&StubModel).unwrap();
        manager.end_run().unwrap();

        let events = observer.events();
        assert!(matches!(
            &events[0],
            TelemetryEvent::SessionOpened { label, .. } if label == "run-1-lr=0.1"
        ));
        assert!(matches!(
            &events[1],
            TelemetryEvent::ImageGrid { tag, samples: 2 } if tag == "images"
        ));
        assert!(matches!(
            &events[2],
            TelemetryEvent::Graph { description, .. } if description == "stub(1 -> 2)"
        ));
        let scalar_tags: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                TelemetryEvent::Scalar { tag, .. } => Some(tag.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(scalar_tags, vec!["Loss", "Accuracy", "Number Correct"]);
        let histogram_tags: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                TelemetryEvent::Histogram { tag, .. } => Some(tag.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(histogram_tags, vec!["w", "w.grad", "b"]);
        assert!(matches!(events.last(), Some(TelemetryEvent::SessionClosed)));
    }

    #[test]
    fn test_argmax_matches_rule() {
        let predictions = vec![
            vec![0.9, 0.1],        // argmax 0
            vec![0.2, 0.8],        // argmax 1
            vec![0.5, 0.5],        // tie: first max wins, argmax 0
            vec![],                // no scores, never matches
        ];
        assert_eq!(argmax_matches(&predictions, &[0, 1, 0, 0]), 3);
        assert_eq!(argmax_matches(&predictions, &[1, 1, 1, 1]), 1);
        assert_eq!(argmax_matches(&[], &[]), 0);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_mean_loss_matches_weighted_average(
                batches in prop::collection::vec((0.0_f64..5.0, 1_usize..20), 1..10)
            ) {
                let dataset: usize = batches.iter().map(|(_, size)| size).sum();
                let mut manager = RunManager::new();
                manager.begin_run(config(), &StubModel, &source(dataset, 4)).unwrap();
                manager.begin_epoch().unwrap();
                for &(loss, size) in &batches {
                    manager.track_loss(loss, size).unwrap();
                }
                let record = manager.end_epoch(&StubModel).unwrap();

                #[allow(clippy::cast_precision_loss)]
                let expected = batches
                    .iter()
                    .map(|&(loss, size)| loss * size as f64)
                    .sum::<f64>()
                    / dataset as f64;
                prop_assert!((record.loss() - expected).abs() < 1e-12);
                prop_assert!(record.loss() >= 0.0);
            }

            #[test]
            fn prop_accuracy_stays_in_unit_interval(
                hits in prop::collection::vec(any::<bool>(), 1..50)
            ) {
                let dataset = hits.len();
                let labels: Vec<usize> = hits.iter().map(|&hit| usize::from(!hit)).collect();
                // Always predict class 0: hits are the examples labeled 0.
                let predictions = vec![vec![1.0_f32, 0.0]; dataset];
                let mut manager = RunManager::new();
                manager.begin_run(config(), &StubModel, &source(dataset, 8)).unwrap();
                manager.begin_epoch().unwrap();
                manager.track_loss(1.0, dataset).unwrap();
                manager.track_correct(&predictions, &labels).unwrap();
                let record = manager.end_epoch(&StubModel).unwrap();

                prop_assert!(record.accuracy() >= 0.0);
                prop_assert!(record.accuracy() <= 1.0);
                #[allow(clippy::cast_precision_loss)]
                let expected = hits.iter().filter(|&&hit| hit).count() as f64 / dataset as f64;
                prop_assert!((record.accuracy() - expected).abs() < 1e-12);
            }
        }
    }
}
