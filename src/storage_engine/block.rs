// STD Imports
use std::io::{Read, Write};
use std::sync::Arc;

// Third party library imports
use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use tracing::warn;

// First party library imports
use crate::common::error::{Error, Result};
use crate::common::{DataArray, ErrorModel, RecordLayout, SharedDataArray};
use crate::storage_engine::Spectrum;

/// A contiguous run of spectra, paged in and out of the backing file as one
/// unit.
///
/// The block covers the global index range `[min_index, min_index + n)` and
/// is addressed with global indexes throughout; the managing cache routes a
/// lookup to the right resident block via `min_index` and asks
/// `has_changes` whether a flush is needed before eviction. Any access that
/// could mutate spectrum data marks the block dirty at the moment the
/// access is handed out — writes made later through a returned reference
/// cannot be observed, so over-marking is the only safe policy.
pub struct SpectrumBlock {
    spectra: Vec<Spectrum>,
    x_length: usize,
    y_length: usize,
    min_index: i64,
    has_changes: bool,
}

impl SpectrumBlock {
    /// A block of `n_spectra` zero-filled spectra starting at global index
    /// `min_index`, with X arrays of `x_length` and Y/E/E2 arrays of
    /// `y_length`.
    ///
    /// The parameters are signed because they arrive from collaborators
    /// that index with signed integers; any negative value is rejected.
    pub fn new(min_index: i64, n_spectra: i64, x_length: i64, y_length: i64) -> Result<Self> {
        if min_index < 0 || n_spectra < 0 || x_length < 0 || y_length < 0 {
            return Err(Error::InvalidArgument(format!(
                "SpectrumBlock::new arguments must be non-negative, got \
                 (min_index: {}, n_spectra: {}, x_length: {}, y_length: {})",
                min_index, n_spectra, x_length, y_length
            )));
        }
        let x_length = x_length as usize;
        let y_length = y_length as usize;
        let spectra = (0..n_spectra)
            .map(|_| Spectrum::new(x_length, y_length))
            .collect();
        Ok(Self {
            spectra,
            x_length,
            y_length,
            min_index,
            has_changes: false,
        })
    }

    /// Global index of the first spectrum in this block.
    pub fn min_index(&self) -> i64 {
        self.min_index
    }

    pub fn n_spectra(&self) -> usize {
        self.spectra.len()
    }

    /// The record geometry this block serializes with.
    pub fn layout(&self) -> RecordLayout {
        RecordLayout::new(self.x_length, self.y_length)
    }

    /// Whether anything may have changed since the block was last marked
    /// clean. True after any mutating or potentially-mutating access.
    pub fn has_changes(&self) -> bool {
        self.has_changes
    }

    /// Reset the dirty flag, e.g. after the manager has flushed the block.
    pub fn mark_clean(&mut self) {
        self.has_changes = false;
    }

    // Maps a global index to a slot in `spectra`, or reports which
    // operation was mis-routed.
    fn slot(&self, operation: &'static str, index: i64) -> Result<usize> {
        if index < self.min_index || index >= self.min_index + self.spectra.len() as i64 {
            return Err(Error::OutOfRange { operation, index });
        }
        Ok((index - self.min_index) as usize)
    }

    pub fn set_x(&mut self, index: i64, values: DataArray) -> Result<()> {
        let slot = self.slot("SpectrumBlock::set_x", index)?;
        self.spectra[slot].set_x(values);
        self.has_changes = true;
        Ok(())
    }

    pub fn set_x_shared(&mut self, index: i64, values: SharedDataArray) -> Result<()> {
        let slot = self.slot("SpectrumBlock::set_x_shared", index)?;
        self.spectra[slot].set_x_shared(values);
        self.has_changes = true;
        Ok(())
    }

    /// Replace the Y channel and, where given, the error channels. Channels
    /// passed as `None` are left unchanged.
    pub fn set_data(
        &mut self,
        index: i64,
        y: DataArray,
        e: Option<DataArray>,
        e2: Option<DataArray>,
    ) -> Result<()> {
        let slot = self.slot("SpectrumBlock::set_data", index)?;
        let spectrum = &mut self.spectra[slot];
        spectrum.set_y(y);
        if let Some(e) = e {
            spectrum.set_e(e);
        }
        if let Some(e2) = e2 {
            spectrum.set_e2(e2);
        }
        self.has_changes = true;
        Ok(())
    }

    pub fn set_data_shared(
        &mut self,
        index: i64,
        y: SharedDataArray,
        e: Option<SharedDataArray>,
        e2: Option<SharedDataArray>,
    ) -> Result<()> {
        let slot = self.slot("SpectrumBlock::set_data_shared", index)?;
        let spectrum = &mut self.spectra[slot];
        spectrum.set_y_shared(y);
        if let Some(e) = e {
            spectrum.set_e_shared(e);
        }
        if let Some(e2) = e2 {
            spectrum.set_e2_shared(e2);
        }
        self.has_changes = true;
        Ok(())
    }

    pub fn data_x(&self, index: i64) -> Result<&[f64]> {
        let slot = self.slot("SpectrumBlock::data_x", index)?;
        Ok(self.spectra[slot].data_x())
    }

    pub fn data_y(&self, index: i64) -> Result<&[f64]> {
        let slot = self.slot("SpectrumBlock::data_y", index)?;
        Ok(self.spectra[slot].data_y())
    }

    pub fn data_e(&self, index: i64) -> Result<&[f64]> {
        let slot = self.slot("SpectrumBlock::data_e", index)?;
        Ok(self.spectra[slot].data_e())
    }

    pub fn data_e2(&self, index: i64) -> Result<&[f64]> {
        let slot = self.slot("SpectrumBlock::data_e2", index)?;
        Ok(self.spectra[slot].data_e2())
    }

    /// Mutable access to a spectrum's X array. Marks the block dirty even
    /// if the caller never writes through the reference.
    pub fn data_x_mut(&mut self, index: i64) -> Result<&mut DataArray> {
        let slot = self.slot("SpectrumBlock::data_x_mut", index)?;
        self.has_changes = true;
        Ok(self.spectra[slot].data_x_mut())
    }

    pub fn data_y_mut(&mut self, index: i64) -> Result<&mut DataArray> {
        let slot = self.slot("SpectrumBlock::data_y_mut", index)?;
        self.has_changes = true;
        Ok(self.spectra[slot].data_y_mut())
    }

    pub fn data_e_mut(&mut self, index: i64) -> Result<&mut DataArray> {
        let slot = self.slot("SpectrumBlock::data_e_mut", index)?;
        self.has_changes = true;
        Ok(self.spectra[slot].data_e_mut())
    }

    pub fn data_e2_mut(&mut self, index: i64) -> Result<&mut DataArray> {
        let slot = self.slot("SpectrumBlock::data_e2_mut", index)?;
        self.has_changes = true;
        Ok(self.spectra[slot].data_e2_mut())
    }

    pub fn spectrum_no(&self, index: i64) -> Result<i32> {
        let slot = self.slot("SpectrumBlock::spectrum_no", index)?;
        Ok(self.spectra[slot].spectrum_no())
    }

    /// Set a spectrum's number. Spectrum numbers are part of the record, so
    /// this marks the block dirty like the array setters do.
    pub fn set_spectrum_no(&mut self, index: i64, spectrum_no: i32) -> Result<()> {
        let slot = self.slot("SpectrumBlock::set_spectrum_no", index)?;
        self.spectra[slot].set_spectrum_no(spectrum_no);
        self.has_changes = true;
        Ok(())
    }

    pub fn error_model(&self, index: i64) -> Result<&Arc<dyn ErrorModel>> {
        let slot = self.slot("SpectrumBlock::error_model", index)?;
        Ok(self.spectra[slot].error_model())
    }

    /// Attach an error model to a spectrum. The model lives in memory only
    /// and is never serialized, so this does not mark the block dirty.
    pub fn set_error_model(&mut self, index: i64, model: Arc<dyn ErrorModel>) -> Result<()> {
        let slot = self.slot("SpectrumBlock::set_error_model", index)?;
        self.spectra[slot].set_error_model(model);
        Ok(())
    }

    /// Write every record to `writer`, which the caller has positioned at
    /// this block's offset in the backing file.
    ///
    /// If an array's length has drifted from the block lengths it is
    /// resized back (zero-padding) before being written, so each record is
    /// exactly `layout().record_size()` bytes no matter what callers did to
    /// the arrays; the manager's offset arithmetic has no per-record length
    /// markers to fall back on. Error models are not written. The dirty
    /// flag is left as-is — only the caller knows whether the bytes reached
    /// stable storage, so clearing it is the caller's call via
    /// `mark_clean`.
    pub fn write_to<W: Write>(&mut self, writer: &mut W) -> Result<()> {
        let x_length = self.x_length;
        let y_length = self.y_length;
        for spectrum in &mut self.spectra {
            if spectrum.data_x().len() != x_length {
                spectrum.resize_x(x_length);
                warn!("X array resized to {} elements for write-out", x_length);
            }
            write_array(writer, spectrum.data_x())?;
            if spectrum.data_y().len() != y_length {
                spectrum.resize_y(y_length);
                warn!("Y array resized to {} elements for write-out", y_length);
            }
            write_array(writer, spectrum.data_y())?;
            if spectrum.data_e().len() != y_length {
                spectrum.resize_e(y_length);
                warn!("E array resized to {} elements for write-out", y_length);
            }
            write_array(writer, spectrum.data_e())?;
            if spectrum.data_e2().len() != y_length {
                spectrum.resize_e2(y_length);
                warn!("E2 array resized to {} elements for write-out", y_length);
            }
            write_array(writer, spectrum.data_e2())?;
            writer.write_i32::<NativeEndian>(spectrum.spectrum_no())?;
        }
        Ok(())
    }

    /// Read every record from `reader`, overwriting this block's contents.
    ///
    /// The stream must hold a block written with the same
    /// `(n_spectra, x_length, y_length)` — the format carries no markers to
    /// check against, and the caller owns that guarantee. Arrays are
    /// resized to the block lengths as they are read; resizing and filling
    /// go through the copy-on-write handles, so buffers shared with other
    /// holders are detached, not overwritten. Error models are not in the
    /// stream and keep their in-memory values.
    pub fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        let x_length = self.x_length;
        let y_length = self.y_length;
        for spectrum in &mut self.spectra {
            spectrum.resize_x(x_length);
            read_array(reader, spectrum.data_x_mut())?;
            spectrum.resize_y(y_length);
            read_array(reader, spectrum.data_y_mut())?;
            spectrum.resize_e(y_length);
            read_array(reader, spectrum.data_e_mut())?;
            spectrum.resize_e2(y_length);
            read_array(reader, spectrum.data_e2_mut())?;
            spectrum.set_spectrum_no(reader.read_i32::<NativeEndian>()?);
        }
        Ok(())
    }
}

// The on-disk format is host byte order by contract: these files are
// scratch space for one machine, not an interchange format.
fn write_array<W: Write>(writer: &mut W, values: &[f64]) -> Result<()> {
    for &value in values {
        writer.write_f64::<NativeEndian>(value)?;
    }
    Ok(())
}

fn read_array<R: Read>(reader: &mut R, values: &mut [f64]) -> Result<()> {
    for value in values.iter_mut() {
        *value = reader.read_f64::<NativeEndian>()?;
    }
    Ok(())
}
