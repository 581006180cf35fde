//! Randomized greedy construction.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::StowageError;
use crate::model::{Cell, Container, ContainerId, VesselGrid};

/// Places each container, in input order, on a uniformly chosen feasible
/// cell.
///
/// For every container all cells are probed, the feasible ones shuffled,
/// and the first one taken. Containers with no feasible cell stay off the
/// grid; their ids are returned in input order.
pub fn construct<R: Rng>(
    containers: &[Container],
    grid: &mut VesselGrid,
    rng: &mut R,
) -> Result<Vec<ContainerId>, StowageError> {
    let cells: Vec<Cell> = grid.cells().collect();
    let mut unplaced = Vec::new();

    for container in containers {
        let mut feasible: Vec<Cell> = cells
            .iter()
            .copied()
            .filter(|&cell| grid.feasible(container, cell))
            .collect();
        feasible.shuffle(rng);

        match feasible.first() {
            Some(&cell) => grid.place(*container, cell)?,
            None => unplaced.push(container.id),
        }
    }

    tracing::trace!(
        placed = grid.score(),
        unplaced = unplaced.len(),
        "greedy construction finished"
    );
    Ok(unplaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LengthClass, VesselProfile};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    fn boxes(n: u32, weight: u32) -> Vec<Container> {
        (0..n)
            .map(|i| Container::new(i, LengthClass::Twenty, weight))
            .collect()
    }

    fn square_grid(tiers: usize, max_weight: f64) -> VesselGrid {
        let profile = VesselProfile::new(2, 2, tiers)
            .with_cell_capacity(usize::MAX, usize::MAX)
            .with_max_stack_weight(max_weight)
            .with_cg_tolerances(0.5, 0.5);
        VesselGrid::new(Arc::new(profile)).unwrap()
    }

    #[test]
    fn test_construct_fills_every_cell() {
        let mut grid = square_grid(2, 1000.0);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let unplaced = construct(&boxes(4, 100), &mut grid, &mut rng).unwrap();

        assert!(unplaced.is_empty());
        assert_eq!(grid.score(), 4);
        assert!(grid.check_invariants().is_ok());
    }

    #[test]
    fn test_construct_respects_stack_weight() {
        // 150 < 2 × 100: every stack takes at most one container.
        let mut grid = square_grid(2, 150.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let containers = boxes(8, 100);

        let unplaced = construct(&containers, &mut grid, &mut rng).unwrap();

        let cells = 4;
        let per_stack = (150.0_f64 / 100.0).floor() as usize;
        assert!(grid.score() <= cells * per_stack);
        assert_eq!(grid.score() + unplaced.len(), containers.len());
        assert!(grid.occupancy().all(|(_, h)| h == 1));
    }

    #[test]
    fn test_construct_leaves_overflow_unplaced() {
        let mut grid = square_grid(1, 1000.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let unplaced = construct(&boxes(6, 10), &mut grid, &mut rng).unwrap();

        assert_eq!(grid.score(), 4);
        assert_eq!(unplaced, vec![ContainerId(4), ContainerId(5)]);
    }

    #[test]
    fn test_construct_skips_duplicate_ids() {
        let mut grid = square_grid(2, 1000.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let containers = vec![
            Container::new(1, LengthClass::Twenty, 10),
            Container::new(1, LengthClass::Forty, 20),
        ];

        let unplaced = construct(&containers, &mut grid, &mut rng).unwrap();

        assert_eq!(grid.score(), 1);
        assert_eq!(unplaced, vec![ContainerId(1)]);
    }

    #[test]
    fn test_construct_is_seed_deterministic() {
        let containers = boxes(6, 50);
        let run = |seed| {
            let mut grid = square_grid(3, 1000.0);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            construct(&containers, &mut grid, &mut rng).unwrap();
            grid
        };
        assert_eq!(run(11), run(11));
    }
}
