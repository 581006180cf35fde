//! Remove-and-reinsert perturbation.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::StowageError;
use crate::model::{Cell, Container, VesselGrid};

/// Removes `size` placed containers chosen uniformly at random (or all of
/// them if fewer are placed), then tries to reinsert each one on a random
/// feasible cell.
///
/// All removals happen before the first reinsertion. Containers that find
/// no feasible cell stay off the grid and are returned.
pub fn perturb<R: Rng>(
    grid: &mut VesselGrid,
    size: usize,
    rng: &mut R,
) -> Result<Vec<Container>, StowageError> {
    let k = size.min(grid.score());
    if k == 0 {
        return Ok(Vec::new());
    }

    let mut picked = rand::seq::index::sample(rng, grid.score(), k).into_vec();
    // Highest index first so earlier indices stay valid.
    picked.sort_unstable_by(|a, b| b.cmp(a));
    let removed: Vec<Container> = picked
        .into_iter()
        .map(|pos| grid.remove_at(pos).container)
        .collect();

    let mut cells: Vec<Cell> = grid.cells().collect();
    let mut dropped = Vec::new();
    for container in removed {
        cells.shuffle(rng);
        match cells.iter().copied().find(|&cell| grid.feasible(&container, cell)) {
            Some(cell) => grid.place(container, cell)?,
            None => dropped.push(container),
        }
    }

    tracing::trace!(removed = k, dropped = dropped.len(), "perturbation applied");
    Ok(dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LengthClass, VesselProfile};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    fn filled_grid(bays: usize, stacks: usize, tiers: usize, n: u32) -> VesselGrid {
        let profile = VesselProfile::new(bays, stacks, tiers).with_max_stack_weight(10_000.0);
        let mut grid = VesselGrid::new(Arc::new(profile)).unwrap();
        let cells: Vec<Cell> = grid.cells().collect();
        for i in 0..n {
            let cell = cells[i as usize % cells.len()];
            grid.place(Container::new(i, LengthClass::Twenty, 100), cell)
                .unwrap();
        }
        grid
    }

    #[test]
    fn test_perturb_empty_grid_is_noop() {
        let mut grid = filled_grid(2, 2, 2, 0);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let dropped = perturb(&mut grid, 3, &mut rng).unwrap();
        assert!(dropped.is_empty());
        assert_eq!(grid.score(), 0);
    }

    #[test]
    fn test_perturb_zero_size_is_noop() {
        let mut grid = filled_grid(2, 2, 2, 4);
        let before = grid.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        perturb(&mut grid, 0, &mut rng).unwrap();
        assert_eq!(grid, before);
    }

    #[test]
    fn test_perturb_reinserts_when_room_exists() {
        let mut grid = filled_grid(3, 3, 3, 6);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let dropped = perturb(&mut grid, 4, &mut rng).unwrap();

        assert!(dropped.is_empty());
        assert_eq!(grid.score(), 6);
        assert!(grid.check_invariants().is_ok());
    }

    #[test]
    fn test_perturb_size_larger_than_placed() {
        let mut grid = filled_grid(2, 2, 2, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let dropped = perturb(&mut grid, 50, &mut rng).unwrap();

        assert_eq!(grid.score() + dropped.len(), 3);
        assert!(grid.check_invariants().is_ok());
    }

    #[test]
    fn test_perturb_score_never_exceeds_original() {
        let mut grid = filled_grid(2, 2, 1, 4);
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut branch = grid.clone();
            let dropped = perturb(&mut branch, 2, &mut rng).unwrap();
            assert_eq!(branch.score() + dropped.len(), 4);
        }
        // Full grid with one tier per stack: removed boxes always fit back.
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let dropped = perturb(&mut grid, 2, &mut rng).unwrap();
        assert!(dropped.is_empty());
    }
}
