//! Quality measures of a finished stowage plan.

use crate::model::VesselGrid;

/// Summary statistics of one stowage plan.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunMetrics {
    /// Containers on board.
    pub containers_placed: usize,
    /// Placed containers as a percentage of the manifest.
    pub occupancy_rate: f64,
    /// Normalized longitudinal CG (0 when nothing is placed).
    pub normalized_long_cg: f64,
    /// Normalized transverse CG (0 when nothing is placed).
    pub normalized_trans_cg: f64,
    /// Sample standard deviation of occupied stack weights.
    pub stack_weight_stdev: f64,
}

impl RunMetrics {
    /// Measures `grid` against a manifest of `total_containers`.
    pub fn measure(grid: &VesselGrid, total_containers: usize) -> Self {
        let containers_placed = grid.score();
        let occupancy_rate = if total_containers > 0 {
            containers_placed as f64 / total_containers as f64 * 100.0
        } else {
            0.0
        };
        let (normalized_long_cg, normalized_trans_cg) = grid.normalized_cg().unwrap_or((0.0, 0.0));
        let weights: Vec<f64> = grid
            .occupied_stack_weights()
            .into_iter()
            .map(|w| w as f64)
            .collect();

        Self {
            containers_placed,
            occupancy_rate,
            normalized_long_cg,
            normalized_trans_cg,
            stack_weight_stdev: sample_std_dev(&weights),
        }
    }
}

/// Sample standard deviation; 0 for fewer than two values.
fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, Container, LengthClass, VesselProfile};
    use std::sync::Arc;

    #[test]
    fn test_sample_std_dev() {
        assert_eq!(sample_std_dev(&[]), 0.0);
        assert_eq!(sample_std_dev(&[5.0]), 0.0);
        assert!((sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.138_089_935).abs() < 1e-6);
    }

    #[test]
    fn test_measure_empty_grid() {
        let grid = VesselGrid::new(Arc::new(VesselProfile::new(2, 2, 2))).unwrap();
        let m = RunMetrics::measure(&grid, 0);
        assert_eq!(m, RunMetrics::default());
    }

    #[test]
    fn test_measure_plan() {
        let mut grid = VesselGrid::new(Arc::new(VesselProfile::new(3, 3, 2))).unwrap();
        grid.place(Container::new(0, LengthClass::Twenty, 100), Cell::new(0, 0))
            .unwrap();
        grid.place(Container::new(1, LengthClass::Twenty, 300), Cell::new(2, 2))
            .unwrap();

        let m = RunMetrics::measure(&grid, 4);

        assert_eq!(m.containers_placed, 2);
        assert!((m.occupancy_rate - 50.0).abs() < 1e-12);
        assert!((m.normalized_long_cg - 0.75).abs() < 1e-12);
        assert!((m.normalized_trans_cg - 0.75).abs() < 1e-12);
        assert!((m.stack_weight_stdev - 200.0_f64.sqrt() * 10.0).abs() < 1e-9);
    }
}
