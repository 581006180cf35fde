//! Container records and grid coordinates.

use std::fmt;
use std::str::FromStr;

/// Unique identifier of a container within one manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerId(pub u32);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ISO length class of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LengthClass {
    /// Twenty-foot equivalent unit.
    Twenty,
    /// Forty-foot container.
    Forty,
}

impl LengthClass {
    /// Label used in manifests (`"20ft"` / `"40ft"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            LengthClass::Twenty => "20ft",
            LengthClass::Forty => "40ft",
        }
    }
}

impl fmt::Display for LengthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LengthClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "20ft" | "20" => Ok(LengthClass::Twenty),
            "40ft" | "40" => Ok(LengthClass::Forty),
            other => Err(format!("unknown length class '{other}'")),
        }
    }
}

/// A container to be stowed.
///
/// The record itself is immutable. Where it sits on the vessel is owned by
/// [`VesselGrid`](super::VesselGrid), so copying a container never copies a
/// placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Container {
    /// Manifest identifier.
    pub id: ContainerId,
    /// Length class.
    pub length_class: LengthClass,
    /// Gross weight (positive).
    pub weight: u32,
}

impl Container {
    pub fn new(id: u32, length_class: LengthClass, weight: u32) -> Self {
        Self {
            id: ContainerId(id),
            length_class,
            weight,
        }
    }
}

/// A (bay, stack) cell of the cargo grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Longitudinal index, `0..bays`.
    pub bay: usize,
    /// Transverse index, `0..stacks`.
    pub stack: usize,
}

impl Cell {
    pub fn new(bay: usize, stack: usize) -> Self {
        Self { bay, stack }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.bay, self.stack)
    }
}
