//! Stowage domain model.
//!
//! - [`Container`]: immutable identity / class / weight record.
//! - [`VesselProfile`]: read-only vessel geometry and limits.
//! - [`VesselGrid`]: the mutable placement state searched over.

mod container;
mod grid;
mod profile;

pub use container::{Cell, Container, ContainerId, LengthClass};
pub use grid::{Placement, VesselGrid};
pub use profile::{HydroPoint, VesselProfile};
