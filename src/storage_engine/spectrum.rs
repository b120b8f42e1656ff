// STD Imports
use std::sync::Arc;

// First party library imports
use crate::common::{default_error_model, DataArray, ErrorModel, SharedDataArray};

/// One spectrum: four parallel data channels plus identifying metadata.
///
/// The channels are held through copy-on-write handles, so a manager can
/// alias one buffer across many spectra (the X axis of a workspace is
/// commonly identical for every spectrum). The spectrum number is caller-
/// assigned data, independent of where the spectrum sits in a block.
#[derive(Debug, Clone)]
pub struct Spectrum {
    x: SharedDataArray,
    y: SharedDataArray,
    e: SharedDataArray,
    e2: SharedDataArray,
    spectrum_no: i32,
    error_model: Arc<dyn ErrorModel>,
}

impl Spectrum {
    /// A zero-filled spectrum with X of `x_length` and Y/E/E2 of `y_length`.
    pub fn new(x_length: usize, y_length: usize) -> Self {
        Self {
            x: Arc::new(vec![0.0; x_length]),
            y: Arc::new(vec![0.0; y_length]),
            e: Arc::new(vec![0.0; y_length]),
            e2: Arc::new(vec![0.0; y_length]),
            spectrum_no: 0,
            error_model: default_error_model(),
        }
    }

    pub fn data_x(&self) -> &[f64] {
        &self.x
    }

    pub fn data_y(&self) -> &[f64] {
        &self.y
    }

    pub fn data_e(&self) -> &[f64] {
        &self.e
    }

    pub fn data_e2(&self) -> &[f64] {
        &self.e2
    }

    /// Mutable access to X. Resolves the copy-on-write handle: if the
    /// buffer is shared the caller gets a private copy, never a view into
    /// a co-sharer's data.
    pub fn data_x_mut(&mut self) -> &mut DataArray {
        Arc::make_mut(&mut self.x)
    }

    pub fn data_y_mut(&mut self) -> &mut DataArray {
        Arc::make_mut(&mut self.y)
    }

    pub fn data_e_mut(&mut self) -> &mut DataArray {
        Arc::make_mut(&mut self.e)
    }

    pub fn data_e2_mut(&mut self) -> &mut DataArray {
        Arc::make_mut(&mut self.e2)
    }

    pub fn set_x(&mut self, values: DataArray) {
        self.x = Arc::new(values);
    }

    pub fn set_y(&mut self, values: DataArray) {
        self.y = Arc::new(values);
    }

    pub fn set_e(&mut self, values: DataArray) {
        self.e = Arc::new(values);
    }

    pub fn set_e2(&mut self, values: DataArray) {
        self.e2 = Arc::new(values);
    }

    pub fn set_x_shared(&mut self, values: SharedDataArray) {
        self.x = values;
    }

    pub fn set_y_shared(&mut self, values: SharedDataArray) {
        self.y = values;
    }

    pub fn set_e_shared(&mut self, values: SharedDataArray) {
        self.e = values;
    }

    pub fn set_e2_shared(&mut self, values: SharedDataArray) {
        self.e2 = values;
    }

    pub fn spectrum_no(&self) -> i32 {
        self.spectrum_no
    }

    pub fn set_spectrum_no(&mut self, spectrum_no: i32) {
        self.spectrum_no = spectrum_no;
    }

    pub fn error_model(&self) -> &Arc<dyn ErrorModel> {
        &self.error_model
    }

    pub fn set_error_model(&mut self, model: Arc<dyn ErrorModel>) {
        self.error_model = model;
    }

    // Resizing goes through the COW handle like any other mutation, so a
    // co-sharer keeps its original length.
    pub(crate) fn resize_x(&mut self, len: usize) {
        Arc::make_mut(&mut self.x).resize(len, 0.0);
    }

    pub(crate) fn resize_y(&mut self, len: usize) {
        Arc::make_mut(&mut self.y).resize(len, 0.0);
    }

    pub(crate) fn resize_e(&mut self, len: usize) {
        Arc::make_mut(&mut self.e).resize(len, 0.0);
    }

    pub(crate) fn resize_e2(&mut self, len: usize) {
        Arc::make_mut(&mut self.e2).resize(len, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_spectrum_is_zero_filled() {
        let spectrum = Spectrum::new(5, 4);
        assert_eq!(spectrum.data_x(), &[0.0; 5]);
        assert_eq!(spectrum.data_y(), &[0.0; 4]);
        assert_eq!(spectrum.data_e(), &[0.0; 4]);
        assert_eq!(spectrum.data_e2(), &[0.0; 4]);
        assert_eq!(spectrum.spectrum_no(), 0);
        assert_eq!(spectrum.error_model().name(), "gaussian");
    }

    #[test]
    fn mutating_a_shared_buffer_copies_first() {
        let shared: SharedDataArray = Arc::new(vec![1.0, 2.0, 3.0]);
        let mut a = Spectrum::new(3, 3);
        let mut b = Spectrum::new(3, 3);
        a.set_x_shared(Arc::clone(&shared));
        b.set_x_shared(Arc::clone(&shared));

        a.data_x_mut()[0] = 99.0;

        assert_eq!(a.data_x(), &[99.0, 2.0, 3.0]);
        assert_eq!(b.data_x(), &[1.0, 2.0, 3.0]);
        assert_eq!(*shared, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn resize_zero_fills_without_touching_sharers() {
        let shared: SharedDataArray = Arc::new(vec![1.0, 2.0]);
        let mut a = Spectrum::new(2, 2);
        a.set_y_shared(Arc::clone(&shared));

        a.resize_y(4);

        assert_eq!(a.data_y(), &[1.0, 2.0, 0.0, 0.0]);
        assert_eq!(*shared, vec![1.0, 2.0]);
    }
}
