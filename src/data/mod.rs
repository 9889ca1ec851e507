mod data_bin;
pub use data_bin::DataBin;

mod measurement;
pub use measurement::Measurement;

use ndarray::{ArrayView1, ArrayView2};

/// Measured data of all bins of the fit
#[derive(Clone, Debug, PartialEq)]
pub struct Data {
    bins: Vec<DataBin>,
}

impl Data {
    pub fn new(bins: Vec<DataBin>) -> Self {
        Self { bins }
    }

    pub fn nr_bins(&self) -> usize {
        self.bins.len()
    }

    pub fn bin(&self, idx: usize) -> &DataBin {
        &self.bins[idx]
    }

    pub fn bins(&self) -> &[DataBin] {
        &self.bins
    }

    pub fn nr_mass_bins(&self, bin: usize) -> usize {
        self.bins[bin].nr_mass_bins()
    }

    pub fn mass_bin_centers(&self, bin: usize) -> ArrayView1<'_, f64> {
        self.bins[bin].mass_bin_centers()
    }

    pub fn phase_space_integrals(&self, bin: usize) -> ArrayView2<'_, f64> {
        self.bins[bin].phase_space_integrals()
    }
}
