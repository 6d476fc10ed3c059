//! Run and epoch lifecycle management.
//!
//! A sweep is a sequence of runs; a run is a sequence of epochs. The
//! [`RunManager`] enforces that nesting as a state machine and will not let
//! a caller record metrics outside an epoch or start a run inside another:
//!
//! ```text
//! ┌──────┐ begin_run  ┌────────────┐ begin_epoch ┌─────────────┐
//! │ Idle │ ─────────▶ │ Run active │ ──────────▶ │ Epoch active│
//! └──────┘            └────────────┘             └─────────────┘
//!     ▲    end_run         ▲          end_epoch        │
//!     └─────────────────── ┴───────────────────────────┘
//! ```
//!
//! Each `end_epoch` appends one immutable [`RunRecord`] to the manager's
//! history, which outlives every run and feeds the CSV/JSON artifacts.
//!
//! # Usage
//!
//! ```
//! use barrido::data::InMemoryDataSource;
//! use barrido::model::{ModelProbe, ParameterSnapshot};
//! use barrido::run::RunManager;
//! use barrido::sweep::RunConfig;
//!
//! struct Probe;
//!
//! impl ModelProbe for Probe {
//!     fn describe(&self) -> String {
//!         "linear(1 -> 2)".to_owned()
//!     }
//!     fn parameters(&self) -> Vec<ParameterSnapshot> {
//!         vec![ParameterSnapshot::new("w", vec![0.5, -0.5])]
//!     }
//! }
//!
//! let data = InMemoryDataSource::new(vec![(vec![0.0], 0), (vec![1.0], 1)], 2);
//! let mut manager = RunManager::new();
//!
//! manager.begin_run(RunConfig::from_pairs([("lr", 0.01)]), &Probe, &data)?;
//! manager.begin_epoch()?;
//! manager.track_loss(0.35, 2)?;
//! manager.track_correct(&[vec![0.9, 0.1], vec![0.2, 0.8]], &[0, 1])?;
//! let record = manager.end_epoch(&Probe)?;
//! manager.end_run()?;
//!
//! assert_eq!((record.run(), record.epoch()), (1, 1));
//! assert!((record.accuracy() - 1.0).abs() < f64::EPSILON);
//! # Ok::<(), barrido::Error>(())
//! ```

mod manager;
mod record;
mod state;

pub use manager::{argmax_matches, MatchRule, RunManager, RunManagerBuilder};
pub use record::RunRecord;
