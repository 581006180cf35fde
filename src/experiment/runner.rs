//! Repetition sweeps over search parameters.

use std::sync::Arc;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::metrics::RunMetrics;
use crate::error::StowageError;
use crate::ils::{IlsConfig, IlsRunner, DEFAULT_STALL_LIMIT};
use crate::model::{Container, VesselGrid, VesselProfile};

/// Parameter grid and repetition count of an experiment.
///
/// # Examples
///
/// ```
/// use u_stowage::experiment::ExperimentConfig;
///
/// let config = ExperimentConfig::default()
///     .with_iterations(vec![20, 50])
///     .with_perturbation_sizes(vec![1, 2])
///     .with_repetitions(3);
/// assert_eq!(config.run_count(), 12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentConfig {
    /// ILS iteration budgets to try.
    pub iterations: Vec<usize>,
    /// Perturbation sizes to try.
    pub perturbation_sizes: Vec<usize>,
    /// Independent runs per parameter pair.
    pub repetitions: usize,
    /// Local-search stall limit for every run.
    pub max_stall: usize,
    /// Seed of the first run; later runs use consecutive seeds.
    pub base_seed: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            iterations: vec![20],
            perturbation_sizes: vec![2],
            repetitions: 5,
            max_stall: DEFAULT_STALL_LIMIT,
            base_seed: 42,
        }
    }
}

impl ExperimentConfig {
    /// Sets the iteration counts to sweep.
    pub fn with_iterations(mut self, iterations: Vec<usize>) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the perturbation sizes to sweep.
    pub fn with_perturbation_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.perturbation_sizes = sizes;
        self
    }

    /// Sets the number of repetitions per parameter pair.
    pub fn with_repetitions(mut self, n: usize) -> Self {
        self.repetitions = n;
        self
    }

    /// Sets the local-search stall limit for every run.
    pub fn with_max_stall(mut self, n: usize) -> Self {
        self.max_stall = n;
        self
    }

    /// Sets the seed of the first run.
    pub fn with_base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    /// Total number of runs.
    pub fn run_count(&self) -> usize {
        self.iterations.len() * self.perturbation_sizes.len() * self.repetitions
    }

    pub fn validate(&self) -> Result<(), StowageError> {
        if self.iterations.is_empty() {
            return Err(StowageError::InvalidConfig("iterations must not be empty".into()));
        }
        if self.perturbation_sizes.is_empty() {
            return Err(StowageError::InvalidConfig(
                "perturbation_sizes must not be empty".into(),
            ));
        }
        if self.repetitions == 0 {
            return Err(StowageError::InvalidConfig("repetitions must be at least 1".into()));
        }
        Ok(())
    }
}

/// Outcome of one run, ready for tabular export.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunRecord {
    pub instance_id: String,
    pub max_iterations: usize,
    pub perturbation_size: usize,
    /// 1-based repetition number.
    pub repetition_index: usize,
    /// Wall-clock seconds.
    pub elapsed_time: f64,
    pub occupancy_rate: f64,
    pub containers_placed: usize,
    pub normalized_long_cg: f64,
    pub normalized_trans_cg: f64,
    pub stack_weight_stdev: f64,
}

/// One scheduled run of a sweep.
#[derive(Debug, Clone, Copy)]
struct Job {
    max_iterations: usize,
    perturbation_size: usize,
    repetition_index: usize,
    seed: u64,
}

/// Runs parameter sweeps over a single instance.
pub struct Experiment;

impl Experiment {
    /// Runs every (iterations, perturbation size) pair `repetitions` times
    /// on a fresh grid and returns one record per run.
    ///
    /// Run `i` (0-based, in iterations-major order) uses seed
    /// `base_seed + i`. Records come back in that same order; with the
    /// `parallel` feature the runs execute concurrently, each owning its
    /// grid and generator and sharing only the profile.
    pub fn run_instance(
        instance_id: &str,
        profile: &Arc<VesselProfile>,
        containers: &[Container],
        config: &ExperimentConfig,
    ) -> Result<Vec<RunRecord>, StowageError> {
        config.validate()?;
        profile.validate()?;

        let mut jobs = Vec::with_capacity(config.run_count());
        for &max_iterations in &config.iterations {
            for &perturbation_size in &config.perturbation_sizes {
                for repetition_index in 1..=config.repetitions {
                    let seed = config.base_seed.wrapping_add(jobs.len() as u64);
                    jobs.push(Job {
                        max_iterations,
                        perturbation_size,
                        repetition_index,
                        seed,
                    });
                }
            }
        }

        let run = |job: &Job| Self::run_job(instance_id, profile, containers, config, job);

        #[cfg(feature = "parallel")]
        let records = jobs.par_iter().map(run).collect::<Result<Vec<_>, _>>()?;
        #[cfg(not(feature = "parallel"))]
        let records = jobs.iter().map(run).collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn run_job(
        instance_id: &str,
        profile: &Arc<VesselProfile>,
        containers: &[Container],
        config: &ExperimentConfig,
        job: &Job,
    ) -> Result<RunRecord, StowageError> {
        let ils = IlsConfig::default()
            .with_max_iterations(job.max_iterations)
            .with_perturbation_size(job.perturbation_size)
            .with_max_stall(config.max_stall)
            .with_seed(job.seed);

        let grid = VesselGrid::new(Arc::clone(profile))?;
        let start = Instant::now();
        let result = IlsRunner::run(containers, grid, &ils)?;
        let elapsed_time = start.elapsed().as_secs_f64();

        let metrics = RunMetrics::measure(&result.best, containers.len());
        tracing::info!(
            instance = instance_id,
            max_iterations = job.max_iterations,
            perturbation_size = job.perturbation_size,
            repetition = job.repetition_index,
            placed = metrics.containers_placed,
            total = containers.len(),
            elapsed_time,
            "run finished"
        );

        Ok(RunRecord {
            instance_id: instance_id.to_string(),
            max_iterations: job.max_iterations,
            perturbation_size: job.perturbation_size,
            repetition_index: job.repetition_index,
            elapsed_time,
            occupancy_rate: metrics.occupancy_rate,
            containers_placed: metrics.containers_placed,
            normalized_long_cg: metrics.normalized_long_cg,
            normalized_trans_cg: metrics.normalized_trans_cg,
            stack_weight_stdev: metrics.stack_weight_stdev,
        })
    }
}
