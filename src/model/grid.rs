//! Mutable placement state over a vessel's bay × stack grid.
//!
//! The grid is a value type: containers are stored by value in an ordered
//! `placed` list and per-cell heights and stack weights live in flat
//! vectors indexed by `bay * stacks + stack`. Cloning a grid therefore
//! yields a fully independent branch that shares only the immutable
//! [`VesselProfile`].

use std::sync::Arc;

use super::container::{Cell, Container, ContainerId};
use super::profile::VesselProfile;
use crate::error::StowageError;

/// A container together with the cell it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub container: Container,
    pub cell: Cell,
}

/// Solution state: which containers occupy which cells.
///
/// Mutation goes exclusively through [`place`](Self::place) and
/// [`remove`](Self::remove). Neither checks stowage rules; callers probe
/// [`feasible`](Self::feasible) first.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_stowage::model::{Cell, Container, LengthClass, VesselGrid, VesselProfile};
///
/// let profile = Arc::new(VesselProfile::new(2, 2, 2).with_max_stack_weight(1000.0));
/// let mut grid = VesselGrid::new(profile).unwrap();
/// let c = Container::new(0, LengthClass::Twenty, 100);
///
/// assert!(grid.feasible(&c, Cell::new(0, 0)));
/// grid.place(c, Cell::new(0, 0)).unwrap();
/// assert_eq!(grid.score(), 1);
/// assert_eq!(grid.height(Cell::new(0, 0)), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VesselGrid {
    profile: Arc<VesselProfile>,
    placed: Vec<Placement>,
    heights: Vec<usize>,
    stack_weights: Vec<u64>,
}

/// Normalized coordinate of `index` along an axis of `size` slots.
///
/// A single-slot axis sits exactly on the centre line.
#[inline]
fn normalize(index: usize, size: usize) -> f64 {
    if size <= 1 {
        0.5
    } else {
        index as f64 / (size - 1) as f64
    }
}

#[inline]
fn within(cg: f64, tolerance: f64) -> bool {
    0.5 - tolerance <= cg && cg <= 0.5 + tolerance
}

impl VesselGrid {
    /// Creates an empty grid for a validated profile.
    pub fn new(profile: Arc<VesselProfile>) -> Result<Self, StowageError> {
        profile.validate()?;
        let cells = profile.cell_count();
        Ok(Self {
            profile,
            placed: Vec::new(),
            heights: vec![0; cells],
            stack_weights: vec![0; cells],
        })
    }

    /// The shared vessel profile.
    pub fn profile(&self) -> &Arc<VesselProfile> {
        &self.profile
    }

    /// Placed containers in insertion order.
    pub fn placed(&self) -> &[Placement] {
        &self.placed
    }

    /// Objective value: the number of placed containers.
    #[inline]
    pub fn score(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// All cells in bay-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let stacks = self.profile.stacks;
        (0..self.profile.bays).flat_map(move |bay| (0..stacks).map(move |stack| Cell::new(bay, stack)))
    }

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.bay < self.profile.bays && cell.stack < self.profile.stacks
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        cell.bay * self.profile.stacks + cell.stack
    }

    fn check_bounds(&self, cell: Cell) -> Result<usize, StowageError> {
        if self.in_bounds(cell) {
            Ok(self.index(cell))
        } else {
            Err(StowageError::CellOutOfBounds {
                cell,
                bays: self.profile.bays,
                stacks: self.profile.stacks,
            })
        }
    }

    /// Number of containers stacked in `cell` (0 outside the grid).
    pub fn height(&self, cell: Cell) -> usize {
        if self.in_bounds(cell) {
            self.heights[self.index(cell)]
        } else {
            0
        }
    }

    /// Total weight stacked in `cell` (0 outside the grid).
    pub fn stack_weight(&self, cell: Cell) -> u64 {
        if self.in_bounds(cell) {
            self.stack_weights[self.index(cell)]
        } else {
            0
        }
    }

    /// Occupied cells with their heights, in bay-major order.
    pub fn occupancy(&self) -> impl Iterator<Item = (Cell, usize)> + '_ {
        self.cells()
            .map(move |cell| (cell, self.heights[self.index(cell)]))
            .filter(|&(_, h)| h > 0)
    }

    /// Weights of all occupied stacks, in bay-major order.
    pub fn occupied_stack_weights(&self) -> Vec<u64> {
        self.heights
            .iter()
            .zip(&self.stack_weights)
            .filter(|&(&h, _)| h > 0)
            .map(|(_, &w)| w)
            .collect()
    }

    /// Cell currently holding container `id`, if any.
    pub fn position_of(&self, id: ContainerId) -> Option<Cell> {
        self.placed
            .iter()
            .find(|p| p.container.id == id)
            .map(|p| p.cell)
    }

    pub fn contains(&self, id: ContainerId) -> bool {
        self.placed.iter().any(|p| p.container.id == id)
    }

    /// Sum of all placed weights.
    pub fn total_weight(&self) -> u64 {
        self.placed.iter().map(|p| u64::from(p.container.weight)).sum()
    }

    /// Total weight and the longitudinal / transverse moments of the
    /// placed containers, each container's coordinates normalized before
    /// weighting.
    fn moments(&self) -> (f64, f64, f64) {
        let (bays, stacks) = (self.profile.bays, self.profile.stacks);
        self.placed.iter().fold((0.0, 0.0, 0.0), |(w, ml, mt), p| {
            let cw = f64::from(p.container.weight);
            (
                w + cw,
                ml + cw * normalize(p.cell.bay, bays),
                mt + cw * normalize(p.cell.stack, stacks),
            )
        })
    }

    /// Normalized (longitudinal, transverse) centre of gravity, or `None`
    /// when nothing with weight is on board.
    pub fn normalized_cg(&self) -> Option<(f64, f64)> {
        let (w, ml, mt) = self.moments();
        if w > 0.0 {
            Some((ml / w, mt / w))
        } else {
            None
        }
    }

    /// Whether the current CG lies within both tolerances. An empty grid
    /// is balanced.
    pub fn is_balanced(&self) -> bool {
        match self.normalized_cg() {
            Some((long, trans)) => {
                within(long, self.profile.long_cg_tolerance)
                    && within(trans, self.profile.trans_cg_tolerance)
            }
            None => true,
        }
    }

    /// Read-only probe: would placing `container` at `cell` keep every
    /// stowage rule satisfied?
    ///
    /// Checks bounds, duplicate id, tier height, stack weight and the
    /// normalized CG on both axes, evaluated as if the placement had
    /// already happened.
    pub fn feasible(&self, container: &Container, cell: Cell) -> bool {
        if !self.in_bounds(cell) || self.contains(container.id) {
            return false;
        }
        let idx = self.index(cell);
        if self.heights[idx] >= self.profile.max_tier_height {
            return false;
        }
        let stack_weight = self.stack_weights[idx] + u64::from(container.weight);
        if stack_weight as f64 > self.profile.max_stack_weight {
            return false;
        }

        let (w, ml, mt) = self.moments();
        let cw = f64::from(container.weight);
        let total = w + cw;
        if total <= 0.0 {
            return true;
        }
        let long = (ml + cw * normalize(cell.bay, self.profile.bays)) / total;
        let trans = (mt + cw * normalize(cell.stack, self.profile.stacks)) / total;
        within(long, self.profile.long_cg_tolerance)
            && within(trans, self.profile.trans_cg_tolerance)
    }

    /// Puts `container` on top of `cell`.
    ///
    /// Does not check height, weight or balance. Fails only when the cell
    /// is outside the grid or the container is already on board.
    pub fn place(&mut self, container: Container, cell: Cell) -> Result<(), StowageError> {
        let idx = self.check_bounds(cell)?;
        if self.contains(container.id) {
            return Err(StowageError::AlreadyPlaced(container.id));
        }
        self.heights[idx] += 1;
        self.stack_weights[idx] += u64::from(container.weight);
        self.placed.push(Placement { container, cell });
        Ok(())
    }

    /// Takes container `id` off the grid and returns its former placement.
    pub fn remove(&mut self, id: ContainerId) -> Result<Placement, StowageError> {
        let pos = self
            .placed
            .iter()
            .position(|p| p.container.id == id)
            .ok_or(StowageError::NotPlaced(id))?;
        Ok(self.remove_at(pos))
    }

    /// Removes the `pos`-th entry of [`placed`](Self::placed).
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of range.
    pub(crate) fn remove_at(&mut self, pos: usize) -> Placement {
        let placement = self.placed.remove(pos);
        let idx = self.index(placement.cell);
        self.heights[idx] -= 1;
        self.stack_weights[idx] -= u64::from(placement.container.weight);
        placement
    }

    /// Containers per bay.
    pub fn bay_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.profile.bays];
        for p in &self.placed {
            counts[p.cell.bay] += 1;
        }
        counts
    }

    /// Stack heights as a `bays × stacks` matrix.
    pub fn distribution_matrix(&self) -> Vec<Vec<usize>> {
        self.heights
            .chunks(self.profile.stacks)
            .map(<[usize]>::to_vec)
            .collect()
    }

    /// Verifies the structural invariants: bounds, cached heights and
    /// weights agree with `placed`, tier and weight limits, unique ids.
    ///
    /// Balance is reported separately by [`is_balanced`](Self::is_balanced)
    /// since removals may legitimately move the CG.
    pub fn check_invariants(&self) -> Result<(), String> {
        let cells = self.profile.cell_count();
        let mut heights = vec![0usize; cells];
        let mut weights = vec![0u64; cells];
        let mut ids = std::collections::HashSet::with_capacity(self.placed.len());

        for p in &self.placed {
            if !self.in_bounds(p.cell) {
                return Err(format!("container {} outside grid at {}", p.container.id, p.cell));
            }
            if !ids.insert(p.container.id) {
                return Err(format!("container {} placed twice", p.container.id));
            }
            let idx = self.index(p.cell);
            heights[idx] += 1;
            weights[idx] += u64::from(p.container.weight);
        }
        if heights != self.heights {
            return Err("cached heights disagree with placements".into());
        }
        if weights != self.stack_weights {
            return Err("cached stack weights disagree with placements".into());
        }
        for cell in self.cells() {
            let idx = self.index(cell);
            if self.heights[idx] > self.profile.max_tier_height {
                return Err(format!("stack {cell} exceeds max tier height"));
            }
            if self.stack_weights[idx] as f64 > self.profile.max_stack_weight {
                return Err(format!("stack {cell} exceeds max stack weight"));
            }
        }
        Ok(())
    }
}
