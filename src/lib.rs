pub mod common;
pub mod storage_engine;

#[cfg(test)]
pub mod test_utils {
    use crate::storage_engine::SpectrumBlock;

    /// Fill a block with distinct deterministic values so round-trip tests
    /// can tell every channel and every row apart.
    ///
    /// Row i (counted from the block start) gets x = [i, i+1, ...],
    /// y = [10i, 10i+1, ...], e = y/10, e2 = y/100 and spectrum number 100+i.
    pub fn fill_block(block: &mut SpectrumBlock) {
        let min_index = block.min_index();
        let n_spectra = block.n_spectra() as i64;
        for index in min_index..min_index + n_spectra {
            let i = (index - min_index) as f64;
            let x_length = block.data_x(index).unwrap().len();
            let y_length = block.data_y(index).unwrap().len();
            block
                .set_x(index, (0..x_length).map(|j| i + j as f64).collect())
                .unwrap();
            block
                .set_data(
                    index,
                    (0..y_length).map(|j| 10.0 * i + j as f64).collect(),
                    Some((0..y_length).map(|j| (10.0 * i + j as f64) / 10.0).collect()),
                    Some((0..y_length).map(|j| (10.0 * i + j as f64) / 100.0).collect()),
                )
                .unwrap();
            block
                .set_spectrum_no(index, 100 + (index - min_index) as i32)
                .unwrap();
        }
    }
}
