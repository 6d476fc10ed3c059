//! Lifecycle phases and their state payloads.
//!
//! The counters the manager mutates live inside the phase that owns them, so
//! an out-of-phase call has no accumulator to corrupt; it simply has nothing
//! to match on.

use crate::sweep::RunConfig;
use chrono::{DateTime, Utc};
use std::time::Instant;

/// Everything scoped to one live run.
#[derive(Debug)]
pub(crate) struct RunState {
    pub(crate) config: RunConfig,
    pub(crate) index: u32,
    pub(crate) label: String,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) started: Instant,
    pub(crate) dataset_size: usize,
    pub(crate) epochs_begun: u32,
}

impl RunState {
    pub(crate) fn begin(config: RunConfig, index: u32, dataset_size: usize) -> Self {
        let label = format!("run-{index}-{config}");
        Self {
            config,
            index,
            label,
            started_at: Utc::now(),
            started: Instant::now(),
            dataset_size,
            epochs_begun: 0,
        }
    }
}

/// Everything scoped to one live epoch.
#[derive(Debug)]
pub(crate) struct EpochState {
    pub(crate) index: u32,
    pub(crate) started: Instant,
    pub(crate) weighted_loss: f64,
    pub(crate) correct: usize,
}

impl EpochState {
    pub(crate) fn begin(index: u32) -> Self {
        Self {
            index,
            started: Instant::now(),
            weighted_loss: 0.0,
            correct: 0,
        }
    }
}

/// Run-manager lifecycle phase. At most one run and one epoch are ever live.
#[derive(Debug)]
pub(crate) enum Phase {
    Idle,
    RunActive(RunState),
    EpochActive(RunState, EpochState),
}

impl Phase {
    pub(crate) const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::RunActive(_) => "run-active",
            Self::EpochActive(..) => "epoch-active",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::ParamValue;

    #[test]
    fn test_run_state_label_encodes_index_and_config() {
        let config = RunConfig::from_entries(vec![
            ("lr".to_owned(), ParamValue::Float(0.01)),
            ("shuffle".to_owned(), ParamValue::Bool(true)),
        ]);
        let run = RunState::begin(config, 3, 100);
        assert_eq!(run.label, "run-3-lr=0.01-shuffle=true");
        assert_eq!(run.index, 3);
        assert_eq!(run.dataset_size, 100);
        assert_eq!(run.epochs_begun, 0);
    }

    #[test]
    fn test_epoch_state_begins_zeroed() {
        let epoch = EpochState::begin(2);
        assert_eq!(epoch.index, 2);
        assert!(epoch.weighted_loss.abs() < f64::EPSILON);
        assert_eq!(epoch.correct, 0);
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::Idle.name(), "idle");
        let run = RunState::begin(RunConfig::default(), 1, 10);
        assert_eq!(Phase::RunActive(run).name(), "run-active");
    }
}
