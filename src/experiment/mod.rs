//! Experiment harness: repeated ILS runs over parameter grids, per-run
//! quality metrics, and CSV export.
//!
//! Runs are independent (own grid, own seeded generator) and share only
//! the read-only [`VesselProfile`](crate::model::VesselProfile); enable the
//! `parallel` feature to spread them over a rayon pool.

mod metrics;
mod report;
mod runner;

pub use metrics::RunMetrics;
pub use report::{write_csv, CSV_HEADER};
pub use runner::{Experiment, ExperimentConfig, RunRecord};
