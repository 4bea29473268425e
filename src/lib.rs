//! Cellular-automaton model of a stomach-flu outbreak on a square
//! population grid, plus a parameter sweep that renders each run as an
//! animated GIF.
//!
//! Every person carries a day counter `0..=7`: `0` is susceptible, `1..=2`
//! infectious and `3..=7` immune. Each tick, infectious people infect their
//! susceptible Von Neumann neighbours and everyone else moves one day on,
//! with day 7 wrapping back to susceptible.

pub mod config;
pub mod error;
pub mod grid;
pub mod padded;
pub mod render;
pub mod simulation;
pub mod sweep;


pub use config::{SimulationConfig, SweepConfig, DEFAULT_GRID_SIZE, DEFAULT_MAX_ITER};
pub use error::{FluError, Result};
pub use grid::{Grid, Health, HealthCounts, Status};
pub use padded::PaddedGrid;
pub use simulation::{init_grid, run, simulate, step};
pub use sweep::{run_sweep, RunRecord, RunSummary, SnapshotSink, SweepItem};
