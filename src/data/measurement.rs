use crate::error::DataError;

use ndarray::{Array2, Array3};

/// Intensities and relative phases of the partial waves measured in one bin
///
/// Intensities have shape `(mass bins, waves)`, phases `(mass bins, waves, waves)` where
/// `phases[[k, i, j]]` is the phase of wave `i` relative to wave `j` in radians.
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    intensities: Array2<f64>,
    intensity_errors: Array2<f64>,
    phases: Array3<f64>,
    phase_errors: Array3<f64>,
}

impl Measurement {
    pub fn new(
        intensities: Array2<f64>,
        intensity_errors: Array2<f64>,
        phases: Array3<f64>,
        phase_errors: Array3<f64>,
    ) -> Result<Self, DataError> {
        let (nr_mass_bins, nr_waves) = intensities.dim();
        let check = |array: &'static str, actual: &[usize], expected: &[usize]| {
            if actual == expected {
                Ok(())
            } else {
                Err(DataError::ShapeMismatch {
                    array,
                    actual: actual.to_vec(),
                    expected: expected.to_vec(),
                })
            }
        };
        check(
            "intensity_errors",
            intensity_errors.shape(),
            &[nr_mass_bins, nr_waves],
        )?;
        check("phases", phases.shape(), &[nr_mass_bins, nr_waves, nr_waves])?;
        check(
            "phase_errors",
            phase_errors.shape(),
            &[nr_mass_bins, nr_waves, nr_waves],
        )?;
        Ok(Self {
            intensities,
            intensity_errors,
            phases,
            phase_errors,
        })
    }

    /// `[mass bins, waves]`
    pub fn shape(&self) -> [usize; 2] {
        let (nr_mass_bins, nr_waves) = self.intensities.dim();
        [nr_mass_bins, nr_waves]
    }

    /// Intensity and its error
    #[inline]
    pub fn intensity(&self, idx_mass: usize, wave: usize) -> (f64, f64) {
        (
            self.intensities[(idx_mass, wave)],
            self.intensity_errors[(idx_mass, wave)],
        )
    }

    /// Phase of `wave` relative to `other` and its error
    #[inline]
    pub fn phase(&self, idx_mass: usize, wave: usize, other: usize) -> (f64, f64) {
        (
            self.phases[(idx_mass, wave, other)],
            self.phase_errors[(idx_mass, wave, other)],
        )
    }
}
