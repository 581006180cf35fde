//! Synthetic container manifests.

use rand::Rng;

use crate::error::StowageError;
use crate::model::{Container, LengthClass};

/// A container type with its nominal gross weight.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportType {
    pub length_class: LengthClass,
    pub nominal_weight: u32,
}

impl TransportType {
    /// Creates a transport type.
    pub fn new(length_class: LengthClass, nominal_weight: u32) -> Self {
        Self {
            length_class,
            nominal_weight,
        }
    }
}

/// Draws manifests whose weights vary uniformly around each type's
/// nominal weight.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use u_stowage::generator::{ContainerGenerator, TransportType};
/// use u_stowage::model::LengthClass;
///
/// let types = [TransportType::new(LengthClass::Twenty, 2000)];
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
/// let manifest = ContainerGenerator::default()
///     .generate(&types, 10, &mut rng)
///     .unwrap();
/// assert_eq!(manifest.len(), 10);
/// assert!(manifest.iter().all(|c| (1800..=2200).contains(&c.weight)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerGenerator {
    /// Relative weight spread, in `[0, 1)`.
    pub variation: f64,
}

impl Default for ContainerGenerator {
    fn default() -> Self {
        Self { variation: 0.1 }
    }
}

impl ContainerGenerator {
    /// Sets the relative weight spread around each nominal weight.
    pub fn with_variation(mut self, variation: f64) -> Self {
        self.variation = variation;
        self
    }

    pub fn validate(&self) -> Result<(), StowageError> {
        if !(0.0..1.0).contains(&self.variation) {
            return Err(StowageError::InvalidConfig(format!(
                "variation must be in [0, 1), got {}",
                self.variation
            )));
        }
        Ok(())
    }

    /// Generates `count` containers with ids `0..count`, each of a type
    /// drawn uniformly from `types`.
    pub fn generate<R: Rng>(
        &self,
        types: &[TransportType],
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Container>, StowageError> {
        self.validate()?;
        if types.is_empty() {
            return Err(StowageError::InvalidConfig(
                "at least one transport type required".into(),
            ));
        }

        let mut containers = Vec::with_capacity(count);
        for id in 0..count {
            let ty = types[rng.random_range(0..types.len())];
            containers.push(self.draw(id, ty, rng));
        }
        Ok(containers)
    }

    /// Generates one container per entry of `sequence`, keeping its order
    /// and length class; only the weight is drawn. Ids run from 0.
    ///
    /// Pair with [`ContainerInstance::type_sequence`] to turn an instance
    /// file into a manifest.
    ///
    /// [`ContainerInstance::type_sequence`]: crate::loading::ContainerInstance::type_sequence
    pub fn generate_sequence<R: Rng>(
        &self,
        sequence: &[TransportType],
        rng: &mut R,
    ) -> Result<Vec<Container>, StowageError> {
        self.validate()?;
        Ok(sequence
            .iter()
            .enumerate()
            .map(|(id, &ty)| self.draw(id, ty, rng))
            .collect())
    }

    fn draw<R: Rng>(&self, id: usize, ty: TransportType, rng: &mut R) -> Container {
        let nominal = f64::from(ty.nominal_weight);
        let lo = nominal * (1.0 - self.variation);
        let hi = nominal * (1.0 + self.variation);
        let weight = if hi > lo {
            rng.random_range(lo..hi)
        } else {
            lo
        };
        // Truncation toward zero; weights stay positive.
        let weight = (weight as u32).max(1);
        Container::new(id as u32, ty.length_class, weight)
    }
}
