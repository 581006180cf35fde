//! CSV export of run records.

use std::io::{self, Write};

use super::runner::RunRecord;

/// Column header matching [`write_csv`] rows.
pub const CSV_HEADER: &str = "instance_id,max_iterations,perturbation_size,repetition_index,\
elapsed_time,occupancy_rate,containers_placed,normalized_long_cg,normalized_trans_cg,\
stack_weight_stdev";

/// Writes `records` as CSV rows, optionally preceded by [`CSV_HEADER`].
///
/// Elapsed time and CG values are rounded to four decimals, occupancy rate
/// and weight deviation to two.
pub fn write_csv<W: Write>(records: &[RunRecord], writer: &mut W, include_header: bool) -> io::Result<()> {
    if include_header {
        writeln!(writer, "{CSV_HEADER}")?;
    }
    for r in records {
        writeln!(
            writer,
            "{},{},{},{},{:.4},{:.2},{},{:.4},{:.4},{:.2}",
            r.instance_id,
            r.max_iterations,
            r.perturbation_size,
            r.repetition_index,
            r.elapsed_time,
            r.occupancy_rate,
            r.containers_placed,
            r.normalized_long_cg,
            r.normalized_trans_cg,
            r.stack_weight_stdev,
        )?;
    }
    Ok(())
}
