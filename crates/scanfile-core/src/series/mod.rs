//! Flux normalisation and acquisition-artifact repair for the numeric block.
//!
//! Column 0 is the scan variable, the second-to-last column the monitor and
//! the last column the detector.

pub mod table;

use crate::common::config::CalibrationProfile;
use crate::common::constants::POSITION_TOLERANCE;
use crate::domain::Series;
use table::{NumericTable, TableShapeError, read_table};

const MONITOR_COLUMN_FROM_END: usize = 2;
const DETECTOR_COLUMN_FROM_END: usize = 1;

/// Corrected series together with what the correction pass changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub series: Series,
    /// Indices (into the uncorrected series) whose position was replaced by a midpoint.
    pub repaired_positions: Vec<usize>,
    /// Indices (into the uncorrected series) dropped for a zero normalised count.
    pub removed_rows: Vec<usize>,
    pub first_point_reset: bool,
}

/// Runs the artifact correction pass over one series.
///
/// Positions are repaired in a single forward sweep over `0 < i < n - 2`:
/// a sample that sits above its predecessor and within tolerance of its
/// successor takes the midpoint of its neighbours. Zero-count rows are
/// collected during the same sweep and removed afterwards. Finally, if the
/// first remaining position lies above the second it is reset to the origin.
pub fn correct(mut x_data: Vec<f64>, real_counts: Vec<i64>) -> Correction {
    debug_assert_eq!(x_data.len(), real_counts.len());
    let length = x_data.len().min(real_counts.len());
    let mut repaired_positions = Vec::new();
    let mut removed_rows = Vec::new();

    for index in 0..length {
        if index > 0
            && index + 2 < length
            && x_data[index] > x_data[index - 1]
            && (x_data[index] - x_data[index + 1]).abs() < POSITION_TOLERANCE
        {
            x_data[index] = (x_data[index - 1] + x_data[index + 1]) / 2.0;
            repaired_positions.push(index);
        }
        if real_counts[index] == 0 {
            removed_rows.push(index);
        }
    }

    let (mut kept_x, kept_counts): (Vec<f64>, Vec<i64>) = x_data
        .into_iter()
        .zip(real_counts)
        .enumerate()
        .filter(|(index, _)| removed_rows.binary_search(index).is_err())
        .map(|(_, point)| point)
        .unzip();

    let mut first_point_reset = false;
    if kept_x.len() >= 2 && kept_x[0] > kept_x[1] {
        kept_x[0] = 0.0;
        first_point_reset = true;
    }

    Correction {
        series: Series::from_corrected(kept_x, kept_counts),
        repaired_positions,
        removed_rows,
        first_point_reset,
    }
}

#[derive(Debug, Clone, Default)]
pub struct SeriesCorrector {
    calibration: CalibrationProfile,
}

impl SeriesCorrector {
    pub fn new(calibration: CalibrationProfile) -> Self {
        Self { calibration }
    }

    pub fn calibration(&self) -> &CalibrationProfile {
        &self.calibration
    }

    /// Detector counts divided by incident flux, truncated toward zero.
    /// A non-finite quotient (zero monitor) counts as zero.
    pub fn normalize(&self, monitor_counts: f64, detector_counts: f64) -> i64 {
        let normalized = detector_counts / self.calibration.flux(monitor_counts);
        if normalized.is_finite() {
            normalized.trunc() as i64
        } else {
            0
        }
    }

    pub fn process_source(&self, source: &str) -> Series {
        let lines: Vec<&str> = source.lines().collect();
        self.process(&lines)
    }

    pub fn process<S: AsRef<str>>(&self, lines: &[S]) -> Series {
        match self.correct_lines(lines) {
            Ok(correction) => correction.series,
            Err(reason) => {
                tracing::debug!("treating file as non-scan: {reason}");
                Series::invalid()
            }
        }
    }

    /// Like [`SeriesCorrector::process`] but keeps the table error and correction details.
    pub fn correct_lines<S: AsRef<str>>(&self, lines: &[S]) -> Result<Correction, TableShapeError> {
        let table = read_table(lines)?;
        Ok(self.correct_table(&table))
    }

    pub fn correct_table(&self, table: &NumericTable) -> Correction {
        let x_data = table.column(0);
        let monitor = table.column_from_end(MONITOR_COLUMN_FROM_END);
        let detector = table.column_from_end(DETECTOR_COLUMN_FROM_END);
        let real_counts = monitor
            .iter()
            .zip(&detector)
            .map(|(monitor, detector)| self.normalize(*monitor, *detector))
            .collect();

        let correction = correct(x_data, real_counts);
        if !correction.series.is_valid() {
            tracing::debug!("every row had a zero normalised count");
        }
        correction
    }
}
