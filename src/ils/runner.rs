//! Iterated Local Search execution engine.
//!
//! # Algorithm
//!
//! 1. Greedy construction on the input grid
//! 2. best = clone of the constructed grid
//! 3. Repeat `max_iterations` times:
//!    a. **Perturbation**: candidate = best.clone(), remove and reinsert
//!    `perturbation_size` random containers
//!    b. **Local search**: swap hill climbing on the candidate
//!    c. **Acceptance**: adopt the candidate only if it places strictly
//!    more containers than best
//! 4. Return best
//!
//! # Reference
//!
//! Lourenço, H. R., Martin, O. C. & Stützle, T. (2003). "Iterated Local
//! Search", *Handbook of Metaheuristics*, 320-353.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::config::IlsConfig;
use super::construct::construct;
use super::local_search::improve;
use super::perturb::perturb;
use crate::error::StowageError;
use crate::model::{Container, ContainerId, VesselGrid};

/// Result of an ILS run.
#[derive(Debug, Clone)]
pub struct IlsResult {
    /// Best grid found.
    pub best: VesselGrid,
    /// Score (placed containers) of the best grid.
    pub best_score: usize,
    /// Score right after greedy construction.
    pub initial_score: usize,
    /// Iterations executed.
    pub iterations: usize,
    /// Number of accepted improvements.
    pub improvements: usize,
    /// Iteration at which the best grid was found (0 = construction).
    pub best_iteration: usize,
    /// Best score after construction and after every iteration.
    pub score_history: Vec<usize>,
}

impl IlsResult {
    /// Ids from `containers` that the best grid leaves off the vessel.
    pub fn unplaced(&self, containers: &[Container]) -> Vec<ContainerId> {
        containers
            .iter()
            .map(|c| c.id)
            .filter(|&id| !self.best.contains(id))
            .collect()
    }
}

/// Iterated Local Search runner.
pub struct IlsRunner;

impl IlsRunner {
    /// Runs ILS with a generator seeded from `config.seed`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use u_stowage::ils::{IlsConfig, IlsRunner};
    /// use u_stowage::model::{Container, LengthClass, VesselGrid, VesselProfile};
    ///
    /// let profile = Arc::new(VesselProfile::new(2, 2, 2).with_max_stack_weight(1000.0));
    /// let grid = VesselGrid::new(profile).unwrap();
    /// let containers: Vec<Container> = (0..4)
    ///     .map(|i| Container::new(i, LengthClass::Twenty, 100))
    ///     .collect();
    ///
    /// let config = IlsConfig::default().with_max_iterations(10).with_seed(1);
    /// let result = IlsRunner::run(&containers, grid, &config).unwrap();
    /// assert_eq!(result.best_score, 4);
    /// ```
    pub fn run(
        containers: &[Container],
        grid: VesselGrid,
        config: &IlsConfig,
    ) -> Result<IlsResult, StowageError> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed.unwrap_or(42));
        Self::run_with_rng(containers, grid, config, &mut rng)
    }

    /// Runs ILS drawing all randomness from `rng`.
    pub fn run_with_rng<R: Rng>(
        containers: &[Container],
        mut grid: VesselGrid,
        config: &IlsConfig,
        rng: &mut R,
    ) -> Result<IlsResult, StowageError> {
        config.validate()?;

        construct(containers, &mut grid, rng)?;
        let mut best = grid;
        let initial_score = best.score();
        let mut best_iteration = 0;
        let mut improvements = 0;
        let mut score_history = Vec::with_capacity(config.max_iterations + 1);
        score_history.push(initial_score);

        tracing::debug!(
            containers = containers.len(),
            initial_score,
            iterations = config.max_iterations,
            perturbation_size = config.perturbation_size,
            "ILS start"
        );

        for iteration in 1..=config.max_iterations {
            let mut candidate = best.clone();
            perturb(&mut candidate, config.perturbation_size, rng)?;
            let candidate = improve(&candidate, config.max_stall, rng)?;

            if candidate.score() > best.score() {
                tracing::debug!(
                    iteration,
                    from = best.score(),
                    to = candidate.score(),
                    "ILS accepted improvement"
                );
                best = candidate;
                best_iteration = iteration;
                improvements += 1;
            } else {
                tracing::trace!(iteration, candidate = candidate.score(), "ILS rejected");
            }
            score_history.push(best.score());
        }

        let best_score = best.score();
        tracing::debug!(best_score, improvements, best_iteration, "ILS finished");

        Ok(IlsResult {
            best,
            best_score,
            initial_score,
            iterations: config.max_iterations,
            improvements,
            best_iteration,
            score_history,
        })
    }
}
