// Rust Builtin Imports

use std::io::{Read, Write};

// Third party library imports

use serde::{Deserialize, Serialize};

// First party library imports

use crate::common::error::Result;
use crate::common::RecordLayout;

pub mod block;
pub mod spectrum;

pub use block::SpectrumBlock;
pub use spectrum::Spectrum;

/// Sidecar description of a blocked backing file.
///
/// The binary format carries no headers or markers, so whoever opens a
/// backing file must already know how it was cut into records. The manager
/// persists this manifest next to its data file when the store is created
/// and reads it back on open; it is the caller-side guarantee that a block
/// handed to `SpectrumBlock::read_from` has the geometry the file was
/// written with.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StoreManifest {
    /// Total spectra in the backing file.
    pub n_spectra: usize,
    /// Spectra per block; the final block may cover fewer.
    pub rows_per_block: usize,
    pub layout: RecordLayout,
}

impl StoreManifest {
    pub fn new(n_spectra: usize, rows_per_block: usize, layout: RecordLayout) -> Self {
        Self {
            n_spectra,
            rows_per_block,
            layout,
        }
    }

    /// Number of blocks needed to cover every spectrum.
    pub fn block_count(&self) -> usize {
        if self.rows_per_block == 0 {
            return 0;
        }
        self.n_spectra.div_ceil(self.rows_per_block)
    }

    /// File offset of block `block_number`.
    pub fn offset_of_block(&self, block_number: usize) -> u64 {
        self.layout.block_offset(self.rows_per_block, block_number)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_round_trips_through_json() {
        let manifest = StoreManifest::new(1000, 8, RecordLayout::new(5, 4));

        let mut buffer = Vec::new();
        manifest.to_writer(&mut buffer).unwrap();
        let reloaded = StoreManifest::from_reader(buffer.as_slice()).unwrap();

        assert_eq!(reloaded, manifest);
    }

    #[test]
    fn block_count_rounds_the_tail_block_up() {
        let layout = RecordLayout::new(4, 4);
        assert_eq!(StoreManifest::new(16, 8, layout).block_count(), 2);
        assert_eq!(StoreManifest::new(17, 8, layout).block_count(), 3);
        assert_eq!(StoreManifest::new(0, 8, layout).block_count(), 0);
        assert_eq!(StoreManifest::new(5, 0, layout).block_count(), 0);
    }

    #[test]
    fn offsets_step_by_whole_blocks() {
        let manifest = StoreManifest::new(100, 10, RecordLayout::new(4, 4));
        let block_bytes = manifest.layout.block_size(10) as u64;
        assert_eq!(manifest.offset_of_block(0), 0);
        assert_eq!(manifest.offset_of_block(7), 7 * block_bytes);
    }
}
