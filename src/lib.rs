//! # Barrido: Hyperparameter Sweep Orchestration
//!
//! Deterministic grid-search bookkeeping for model training experiments:
//! enumerate a parameter space, drive each configuration through a
//! lifecycle-checked sequence of runs and epochs, stream telemetry to a
//! pluggable sink, and persist every epoch's metrics as matching CSV and
//! JSON artifacts.
//!
//! ## Design Principles
//!
//! - **Deterministic enumeration**: the Cartesian product of declared
//!   parameters, in declaration order with the last parameter cycling
//!   fastest. Same space in, same run sequence out.
//! - **Machine-checked lifecycle**: runs and epochs nest through an explicit
//!   state machine. Out-of-order calls fail with a typed error instead of
//!   silently corrupting metrics.
//! - **Exact accounting**: epoch loss is the batch-size-weighted mean over
//!   the dataset; accuracy is an exact match count over the dataset size.
//! - **Best-effort diagnostics**: sample grids, model graphs, and parameter
//!   histograms are logged and skipped on failure. Only core scalars and
//!   artifact persistence are allowed to fail a call.
//!
//! ## Example Usage
//!
//! ```
//! use barrido::data::{InMemoryDataSource, StepOutcome};
//! use barrido::model::{ModelProbe, ParameterSnapshot};
//! use barrido::run::RunManager;
//! use barrido::sweep::{ParameterSpace, SweepBuilder};
//!
//! struct Probe;
//!
//! impl ModelProbe for Probe {
//!     fn describe(&self) -> String {
//!         "linear(1 -> 2)".to_owned()
//!     }
//!     fn parameters(&self) -> Vec<ParameterSnapshot> {
//!         vec![ParameterSnapshot::new("w", vec![0.1, -0.1])]
//!     }
//! }
//!
//! let space = ParameterSpace::new()
//!     .parameter("lr", [0.1, 0.01])
//!     .parameter("batch_size", [16, 32]);
//!
//! let mut manager = RunManager::new();
//! let mut model = Probe;
//! for config in SweepBuilder::enumerate(&space) {
//!     let batch_size = config
//!         .get("batch_size")
//!         .and_then(|value| value.as_int())
//!         .map_or(16, |n| usize::try_from(n).unwrap_or(16));
//!     let data = InMemoryDataSource::new(
//!         (0..100_usize).map(|i| (vec![i as f32], i % 2)).collect(),
//!         batch_size,
//!     );
//!
//!     manager.begin_run(config, &model, &data)?;
//!     for _ in 0..2 {
//!         manager.run_epoch(&mut model, &data, |_, batch| StepOutcome {
//!             predictions: batch
//!                 .labels
//!                 .iter()
//!                 .map(|&label| {
//!                     let mut scores = vec![0.0_f32; 2];
//!                     scores[label] = 1.0;
//!                     scores
//!                 })
//!                 .collect(),
//!             loss: 0.3,
//!         })?;
//!     }
//!     manager.end_run()?;
//! }
//!
//! // 4 configurations x 2 epochs.
//! assert_eq!(manager.history().len(), 8);
//!
//! let dir = tempfile::tempdir()?;
//! manager.save(dir.path().join("results"))?;
//! assert!(dir.path().join("results.csv").exists());
//! assert!(dir.path().join("results.json").exists());
//! # Ok::<(), barrido::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod data;
pub mod error;
pub mod model;
pub mod persist;
pub mod run;
pub mod sweep;
pub mod telemetry;

pub use error::{Error, Result};
