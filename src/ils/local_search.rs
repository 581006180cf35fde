//! Pairwise swap hill climbing.

use rand::Rng;

use crate::error::StowageError;
use crate::model::VesselGrid;

/// Hill-climbs from `grid` with random pairwise position swaps.
///
/// Each round clones the incumbent, picks two distinct placed containers,
/// and exchanges their cells if both moves are feasible; otherwise both go
/// back where they were. The candidate replaces the incumbent only on a
/// strictly higher score. Stops after `max_stall` consecutive
/// non-improving rounds, or immediately if fewer than two containers are
/// placed. The input grid is left untouched.
///
/// A swap never changes the number of placed containers, so under the
/// placed-count objective this acts as a feasibility-preserving shuffle of
/// the branch being explored.
pub fn improve<R: Rng>(
    grid: &VesselGrid,
    max_stall: usize,
    rng: &mut R,
) -> Result<VesselGrid, StowageError> {
    let mut best = grid.clone();
    let mut stall = 0;

    while stall < max_stall && best.score() >= 2 {
        let mut candidate = best.clone();
        swap_random_pair(&mut candidate, rng)?;

        if candidate.score() > best.score() {
            best = candidate;
            stall = 0;
        } else {
            stall += 1;
        }
    }

    Ok(best)
}

/// Exchanges the cells of two distinct random containers when the
/// exchange is feasible. Returns whether the swap was committed.
///
/// The second move is probed with the first already applied, so a
/// committed swap satisfies every stowage rule.
/// This is stricter than probing both moves with both containers removed.
pub fn swap_random_pair<R: Rng>(grid: &mut VesselGrid, rng: &mut R) -> Result<bool, StowageError> {
    if grid.score() < 2 {
        return Ok(false);
    }
    let pair = rand::seq::index::sample(rng, grid.score(), 2);
    let first = grid.placed()[pair.index(0)];
    let second = grid.placed()[pair.index(1)];

    grid.remove(first.container.id)?;
    grid.remove(second.container.id)?;

    if grid.feasible(&first.container, second.cell) {
        grid.place(first.container, second.cell)?;
        if grid.feasible(&second.container, first.cell) {
            grid.place(second.container, first.cell)?;
            return Ok(true);
        }
        grid.remove(first.container.id)?;
    }

    grid.place(first.container, first.cell)?;
    grid.place(second.container, second.cell)?;
    Ok(false)
}
