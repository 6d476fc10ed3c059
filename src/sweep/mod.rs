//! Sweep declaration and enumeration.
//!
//! A sweep starts from a declarative grid and becomes an ordered list of run
//! configurations:
//!
//! ```text
//! ParameterSpace                     Vec<RunConfig>
//! ┌──────────────────────────┐      ┌──────────────────────────────┐
//! │ lr         → [0.01]      │      │ lr=0.01-batch_size=100       │
//! │ batch_size → [100, 200]  │  ──▶ │ lr=0.01-batch_size=200       │
//! └──────────────────────────┘      └──────────────────────────────┘
//!        SweepBuilder::enumerate (last-declared varies fastest)
//! ```
//!
//! ## Usage
//!
//! ```
//! use barrido::sweep::{ParameterSpace, SweepBuilder};
//!
//! let space = ParameterSpace::new()
//!     .parameter("lr", [0.01, 0.001])
//!     .parameter("shuffle", [true, false]);
//!
//! let runs = SweepBuilder::enumerate(&space);
//! assert_eq!(runs.len(), 4);
//! assert_eq!(runs[0].to_string(), "lr=0.01-shuffle=true");
//! ```

mod builder;
mod config;
mod space;
mod value;

pub use builder::SweepBuilder;
pub use config::RunConfig;
pub use space::ParameterSpace;
pub use value::ParamValue;
