use crate::data::measurement::Measurement;
use crate::error::DataError;

use itertools::Itertools;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Measured mass binning and phase-space integrals of one kinematic bin
#[derive(Clone, Debug, PartialEq)]
pub struct DataBin {
    mass_bin_centers: Array1<f64>,
    phase_space_integrals: Array2<f64>,
    measurement: Option<Measurement>,
}

impl DataBin {
    /// Construct [DataBin] from mass-bin centers and phase-space integrals
    ///
    /// `mass_bin_centers` must increase strictly, `phase_space_integrals` has shape
    /// `(mass bins, waves)` with waves in the order of the corresponding [crate::InputBin] and
    /// finite non-negative values.
    pub fn new(
        mass_bin_centers: impl Into<Array1<f64>>,
        phase_space_integrals: Array2<f64>,
    ) -> Result<Self, DataError> {
        let mass_bin_centers = mass_bin_centers.into();
        if !mass_bin_centers.iter().tuple_windows().all(|(a, b)| a < b) {
            return Err(DataError::UnsortedMassBins);
        }
        if phase_space_integrals.nrows() != mass_bin_centers.len() {
            return Err(DataError::ShapeMismatch {
                array: "phase_space_integrals",
                actual: phase_space_integrals.shape().to_vec(),
                expected: vec![mass_bin_centers.len(), phase_space_integrals.ncols()],
            });
        }
        if let Some(((mass_bin, wave), _)) = phase_space_integrals
            .indexed_iter()
            .find(|(_, x)| !x.is_finite() || **x < 0.0)
        {
            return Err(DataError::InvalidPhaseSpaceIntegral { mass_bin, wave });
        }
        Ok(Self {
            mass_bin_centers,
            phase_space_integrals,
            measurement: None,
        })
    }

    /// Attach measured intensities and phases
    pub fn with_measurement(mut self, measurement: Measurement) -> Result<Self, DataError> {
        let expected = [self.nr_mass_bins(), self.nr_waves()];
        if measurement.shape() != expected {
            return Err(DataError::ShapeMismatch {
                array: "measurement",
                actual: measurement.shape().to_vec(),
                expected: expected.to_vec(),
            });
        }
        self.measurement = Some(measurement);
        Ok(self)
    }

    pub fn nr_mass_bins(&self) -> usize {
        self.mass_bin_centers.len()
    }

    pub fn nr_waves(&self) -> usize {
        self.phase_space_integrals.ncols()
    }

    pub fn mass_bin_centers(&self) -> ArrayView1<'_, f64> {
        self.mass_bin_centers.view()
    }

    /// Phase-space integrals with shape `(mass bins, waves)`
    pub fn phase_space_integrals(&self) -> ArrayView2<'_, f64> {
        self.phase_space_integrals.view()
    }

    pub fn measurement(&self) -> Option<&Measurement> {
        self.measurement.as_ref()
    }
}
