//! Vessel geometry and stability limits.

use super::container::LengthClass;
use crate::error::StowageError;

/// One row of a vessel's hydrostatic table.
///
/// Loaders attach these when the source format provides them; the search
/// engine does not consume them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HydroPoint {
    pub displacement: f64,
    pub min_lcg: f64,
    pub max_lcg: f64,
    pub metacenter: f64,
}

/// Read-only description of a vessel's cargo grid.
///
/// A profile is built once, validated, and then shared (behind an `Arc`)
/// by every grid that searches over it.
///
/// # Examples
///
/// ```
/// use u_stowage::model::VesselProfile;
///
/// let profile = VesselProfile::new(4, 3, 5)
///     .with_max_stack_weight(120_000.0)
///     .with_cg_tolerances(0.2, 0.1);
/// assert!(profile.validate().is_ok());
/// assert_eq!(profile.cell_count(), 12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VesselProfile {
    /// Number of bays along the vessel.
    pub bays: usize,
    /// Number of stacks across each bay.
    pub stacks: usize,
    /// Maximum number of containers per stack.
    pub max_tier_height: usize,
    /// Cell capacity for 20ft containers.
    pub capacity_20ft: usize,
    /// Cell capacity for 40ft containers.
    pub capacity_40ft: usize,
    /// Maximum total weight of one stack.
    pub max_stack_weight: f64,
    /// Allowed deviation of the normalized longitudinal CG from 0.5.
    pub long_cg_tolerance: f64,
    /// Allowed deviation of the normalized transverse CG from 0.5.
    pub trans_cg_tolerance: f64,
    /// Optional hydrostatic table.
    pub hydrostatics: Vec<HydroPoint>,
}

impl VesselProfile {
    /// Creates a profile with unbounded stack weight, full CG tolerance and
    /// cell capacities equal to the tier height.
    pub fn new(bays: usize, stacks: usize, max_tier_height: usize) -> Self {
        Self {
            bays,
            stacks,
            max_tier_height,
            capacity_20ft: max_tier_height,
            capacity_40ft: max_tier_height,
            max_stack_weight: f64::INFINITY,
            long_cg_tolerance: 0.5,
            trans_cg_tolerance: 0.5,
            hydrostatics: Vec::new(),
        }
    }

    /// Sets the maximum total weight of one stack.
    pub fn with_max_stack_weight(mut self, weight: f64) -> Self {
        self.max_stack_weight = weight;
        self
    }

    /// Sets the longitudinal and transverse CG tolerances.
    pub fn with_cg_tolerances(mut self, long: f64, trans: f64) -> Self {
        self.long_cg_tolerance = long;
        self.trans_cg_tolerance = trans;
        self
    }

    /// Sets the per-cell capacities for 20ft and 40ft containers.
    pub fn with_cell_capacity(mut self, capacity_20ft: usize, capacity_40ft: usize) -> Self {
        self.capacity_20ft = capacity_20ft;
        self.capacity_40ft = capacity_40ft;
        self
    }

    /// Sets the hydrostatic table.
    pub fn with_hydrostatics(mut self, points: Vec<HydroPoint>) -> Self {
        self.hydrostatics = points;
        self
    }

    /// Cell capacity for the given length class.
    pub fn cell_capacity(&self, class: LengthClass) -> usize {
        match class {
            LengthClass::Twenty => self.capacity_20ft,
            LengthClass::Forty => self.capacity_40ft,
        }
    }

    /// Number of (bay, stack) cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.bays * self.stacks
    }

    /// Validates the profile.
    pub fn validate(&self) -> Result<(), StowageError> {
        if self.bays == 0 {
            return Err(StowageError::InvalidProfile("bays must be at least 1".into()));
        }
        if self.stacks == 0 {
            return Err(StowageError::InvalidProfile("stacks must be at least 1".into()));
        }
        if self.max_tier_height == 0 {
            return Err(StowageError::InvalidProfile(
                "max_tier_height must be at least 1".into(),
            ));
        }
        if self.max_stack_weight.is_nan() || self.max_stack_weight <= 0.0 {
            return Err(StowageError::InvalidProfile(format!(
                "max_stack_weight must be positive, got {}",
                self.max_stack_weight
            )));
        }
        for (name, tol) in [
            ("long_cg_tolerance", self.long_cg_tolerance),
            ("trans_cg_tolerance", self.trans_cg_tolerance),
        ] {
            if !(0.0..=1.0).contains(&tol) {
                return Err(StowageError::InvalidProfile(format!(
                    "{name} must be in [0, 1], got {tol}"
                )));
            }
        }
        Ok(())
    }
}
