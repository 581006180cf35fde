//! Container stowage on a vessel's bay × stack grid.
//!
//! Assigns shipping containers to cells of a cargo grid, maximizing the
//! number placed while respecting stack height, stack weight and the
//! vessel's normalized longitudinal / transverse centre of gravity:
//!
//! - **Model**: [`Container`](model::Container), read-only
//!   [`VesselProfile`](model::VesselProfile), and the mutable
//!   [`VesselGrid`](model::VesselGrid) with its feasibility probe.
//! - **ILS**: randomized greedy construction followed by Iterated Local
//!   Search (remove/reinsert perturbation, pairwise swap local search,
//!   strict-improvement acceptance).
//! - **Loading**: vessel-profile and manifest readers.
//! - **Generator**: synthetic manifests around nominal weights.
//! - **Experiment**: repetition sweeps, run metrics and CSV export.
//!
//! # Architecture
//!
//! The engine is synchronous and single-threaded within a run. All
//! randomness comes from a generator passed in explicitly (or seeded from
//! the configuration), so runs are reproducible and independent runs can
//! be parallelized freely.

pub mod error;
pub mod experiment;
pub mod generator;
pub mod ils;
pub mod loading;
pub mod model;

pub use error::StowageError;
