//! Iterated Local Search configuration.

use crate::error::StowageError;

/// Configuration parameters for the stowage ILS.
///
/// # Examples
///
/// ```
/// use u_stowage::ils::IlsConfig;
///
/// let config = IlsConfig::default()
///     .with_max_iterations(300)
///     .with_perturbation_size(4)
///     .with_seed(7);
/// assert_eq!(config.max_iterations, 300);
/// assert_eq!(config.perturbation_size, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IlsConfig {
    /// Number of perturb → improve → accept rounds.
    pub max_iterations: usize,
    /// Containers removed and reinserted per perturbation.
    pub perturbation_size: usize,
    /// Local-search rounds without improvement before it stops.
    pub max_stall: usize,
    /// Random seed (None for default seed).
    pub seed: Option<u64>,
}

/// Local-search stall limit used when none is configured.
pub const DEFAULT_STALL_LIMIT: usize = 50;

impl Default for IlsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            perturbation_size: 2,
            max_stall: DEFAULT_STALL_LIMIT,
            seed: None,
        }
    }
}

impl IlsConfig {
    /// Short run: 50 iterations, single-container perturbation.
    pub fn fast() -> Self {
        Self::default()
            .with_max_iterations(50)
            .with_perturbation_size(1)
    }

    /// Longer run: 200 iterations, three-container perturbation.
    pub fn thorough() -> Self {
        Self::default()
            .with_max_iterations(200)
            .with_perturbation_size(3)
    }

    /// Sets the number of outer ILS iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets how many containers each perturbation removes.
    pub fn with_perturbation_size(mut self, k: usize) -> Self {
        self.perturbation_size = k;
        self
    }

    /// Sets the local-search stall limit. Must be at least 1.
    pub fn with_max_stall(mut self, n: usize) -> Self {
        self.max_stall = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration. A zero stall limit is rejected even
    /// though [`improve`](super::improve) would accept it as a no-op.
    pub fn validate(&self) -> Result<(), StowageError> {
        if self.max_stall == 0 {
            return Err(StowageError::InvalidConfig(
                "max_stall must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
