use crate::data::Data;
use crate::error::FitError;
use crate::input::Input;
use crate::model::Model;
use crate::parameter_space::ParameterSpace;

use std::f64::consts::{PI, TAU};

/// Wrap a phase difference into `(-π, π]`
#[inline]
pub fn wrap_phase(phase: f64) -> f64 {
    let wrapped = phase.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// χ² of the model intensities and phases with respect to measured ones
///
/// Only mass bins inside the mass range of a wave contribute, a phase difference enters if both
/// waves are in range. Errors are scaled by the `rescaleErrors` factor of the bin, entries with
/// non-positive or non-finite errors are skipped.
#[derive(Clone, Debug)]
pub struct Chi2Cost<'a> {
    model: &'a Model,
    input: &'a Input,
    data: &'a Data,
}

impl<'a> Chi2Cost<'a> {
    pub fn new(model: &'a Model, input: &'a Input, data: &'a Data) -> Result<Self, FitError> {
        if model.nr_bins() != data.nr_bins() {
            return Err(FitError::BinCountMismatch {
                model: model.nr_bins(),
                data: data.nr_bins(),
            });
        }
        if let Some(bin) = data.bins().iter().position(|b| b.measurement().is_none()) {
            return Err(FitError::MissingMeasurements(bin));
        }
        Ok(Self { model, input, data })
    }

    /// Number of measured values entering the χ²
    pub fn nr_data_points(&self) -> usize {
        (0..self.data.nr_bins())
            .map(|bin| {
                let waves = self.input.bin(bin).waves();
                self.data
                    .mass_bin_centers(bin)
                    .iter()
                    .map(|&mass| {
                        let in_range = waves.iter().filter(|w| w.in_range(mass)).count();
                        in_range + in_range * in_range.saturating_sub(1) / 2
                    })
                    .sum::<usize>()
            })
            .sum()
    }

    pub fn evaluate(&self, space: &ParameterSpace) -> f64 {
        let mut chi2 = 0.0;
        for (idx_bin, data_bin) in self.data.bins().iter().enumerate() {
            let Some(measurement) = data_bin.measurement() else {
                continue;
            };
            let input_bin = self.input.bin(idx_bin);
            let rescale = input_bin.rescale_errors();
            let waves = input_bin.waves();
            for (idx_mass, &mass) in data_bin.mass_bin_centers().iter().enumerate() {
                let amplitudes =
                    self.model
                        .production_amplitudes(space, idx_bin, mass, Some(idx_mass));
                for (i, wave) in waves.iter().enumerate() {
                    if !wave.in_range(mass) {
                        continue;
                    }
                    let (intensity, error) = measurement.intensity(idx_mass, i);
                    chi2 += residual_squared(amplitudes[i].norm_sqr() - intensity, error * rescale);

                    for (j, other) in waves.iter().enumerate().skip(i + 1) {
                        if !other.in_range(mass) {
                            continue;
                        }
                        let (phase, error) = measurement.phase(idx_mass, i, j);
                        let model_phase = (amplitudes[i] * amplitudes[j].conj()).arg();
                        chi2 += residual_squared(wrap_phase(model_phase - phase), error * rescale);
                    }
                }
            }
        }
        chi2
    }
}

#[inline]
fn residual_squared(difference: f64, error: f64) -> f64 {
    if error > 0.0 && error.is_finite() {
        (difference / error).powi(2)
    } else {
        0.0
    }
}
