// STD Imports
use std::sync::Arc;

// Third party library imports
use serde::{Deserialize, Serialize};

pub mod error;

/// One channel of spectrum data.
pub type DataArray = Vec<f64>;

/// Copy-on-write handle to a data array. Cloning the handle shares the
/// backing buffer; mutation goes through `Arc::make_mut`, which hands the
/// mutator a private copy if anything else still shares the buffer.
pub type SharedDataArray = Arc<DataArray>;

pub const DOUBLE_WIDTH: usize = std::mem::size_of::<f64>();
pub const SPECTRUM_NO_WIDTH: usize = std::mem::size_of::<i32>();

/// How the uncertainties attached to a spectrum are to be interpreted.
///
/// The store never looks inside the model; it is an externally-owned tag
/// shared between spectra, and it is not part of the on-disk format.
pub trait ErrorModel: std::fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;
}

/// Counting statistics: errors are standard deviations.
#[derive(Debug)]
pub struct GaussianErrors;

impl ErrorModel for GaussianErrors {
    fn name(&self) -> &'static str {
        "gaussian"
    }
}

/// The model a spectrum carries until a caller assigns another one, and the
/// one every spectrum reports after a reload from storage.
pub fn default_error_model() -> Arc<dyn ErrorModel> {
    Arc::new(GaussianErrors)
}

/// Geometry of one serialized spectrum record.
///
/// A record is `x_length` doubles of X, then `y_length` doubles each of Y,
/// E and E2, then one i32 spectrum number, in host byte order with no
/// padding. There are no per-record length markers, so a manager addresses
/// the backing file purely through this arithmetic.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    pub x_length: usize,
    pub y_length: usize,
}

impl RecordLayout {
    pub fn new(x_length: usize, y_length: usize) -> Self {
        Self { x_length, y_length }
    }

    /// Size of one record in bytes.
    pub fn record_size(&self) -> usize {
        (self.x_length + 3 * self.y_length) * DOUBLE_WIDTH + SPECTRUM_NO_WIDTH
    }

    /// Size of a block of `n_spectra` records in bytes.
    pub fn block_size(&self, n_spectra: usize) -> usize {
        n_spectra * self.record_size()
    }

    /// File offset of block `block_number` in a file cut into blocks of
    /// `rows_per_block` records.
    pub fn block_offset(&self, rows_per_block: usize, block_number: usize) -> u64 {
        (block_number * self.block_size(rows_per_block)) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_size_arithmetic() {
        let layout = RecordLayout::new(4, 4);
        // (4 + 3 * 4) doubles + one i32
        assert_eq!(layout.record_size(), 16 * 8 + 4);
        assert_eq!(layout.block_size(3), 3 * 132);
    }

    #[test]
    fn bin_edge_layouts_allow_unequal_lengths() {
        // Histogram data: X holds bin edges, one more than the Y bins.
        let layout = RecordLayout::new(5, 4);
        assert_eq!(layout.record_size(), (5 + 12) * 8 + 4);
    }

    #[test]
    fn block_offsets_are_multiples_of_block_size() {
        let layout = RecordLayout::new(4, 4);
        assert_eq!(layout.block_offset(8, 0), 0);
        assert_eq!(layout.block_offset(8, 3), (3 * 8 * 132) as u64);
    }

    #[test]
    fn default_model_is_gaussian() {
        assert_eq!(default_error_model().name(), "gaussian");
    }
}
