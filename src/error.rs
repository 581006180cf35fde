//! Error types shared by the stowage model and the search engine.

use std::fmt;

use crate::model::{Cell, ContainerId};

/// Errors raised by the allocation engine.
///
/// Containers that cannot be placed anywhere are *not* errors: they are
/// simply left out of the grid and show up in the occupancy rate.
#[derive(Debug, Clone, PartialEq)]
pub enum StowageError {
    /// The vessel profile is malformed (zero dimensions, tolerances outside
    /// `[0, 1]`, non-positive stack weight limit, ...).
    InvalidProfile(String),
    /// A search configuration failed validation.
    InvalidConfig(String),
    /// Removal was requested for a container that is not on the grid.
    NotPlaced(ContainerId),
    /// Placement was requested for a container that is already on the grid.
    AlreadyPlaced(ContainerId),
    /// The requested cell lies outside the vessel grid.
    CellOutOfBounds {
        /// The offending cell.
        cell: Cell,
        /// Number of bays of the vessel.
        bays: usize,
        /// Number of stacks of the vessel.
        stacks: usize,
    },
}

impl fmt::Display for StowageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StowageError::InvalidProfile(msg) => write!(f, "invalid vessel profile: {msg}"),
            StowageError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            StowageError::NotPlaced(id) => write!(f, "container {id} is not placed"),
            StowageError::AlreadyPlaced(id) => write!(f, "container {id} is already placed"),
            StowageError::CellOutOfBounds { cell, bays, stacks } => write!(
                f,
                "cell {cell} is outside the {bays}x{stacks} vessel grid"
            ),
        }
    }
}

impl std::error::Error for StowageError {}
