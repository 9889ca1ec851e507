use crate::data::Data;

use ndarray::Array1;

/// Binding of one wave to one component
///
/// Keeps a copy of the mass binning and of the wave's phase-space integrals for every bin the
/// wave is used in, both are empty for the other bins.
#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    wave_name: String,
    wave_indices: Vec<Option<usize>>,
    bins: Vec<usize>,
    mass_bin_centers: Vec<Array1<f64>>,
    phase_space_integrals: Vec<Array1<f64>>,
}

impl Channel {
    /// `wave_indices` gives for every bin the index of the wave in the bin's wave list
    pub fn new(wave_name: impl Into<String>, wave_indices: Vec<Option<usize>>, data: &Data) -> Self {
        assert_eq!(
            wave_indices.len(),
            data.nr_bins(),
            "wave indices are required for every bin"
        );

        let bins = wave_indices
            .iter()
            .enumerate()
            .filter_map(|(bin, idx)| idx.map(|_| bin))
            .collect();
        let (mass_bin_centers, phase_space_integrals) = wave_indices
            .iter()
            .enumerate()
            .map(|(bin, idx)| match idx {
                Some(idx) => (
                    data.mass_bin_centers(bin).to_owned(),
                    data.phase_space_integrals(bin).column(*idx).to_owned(),
                ),
                None => (Array1::zeros(0), Array1::zeros(0)),
            })
            .unzip();

        Self {
            wave_name: wave_name.into(),
            wave_indices,
            bins,
            mass_bin_centers,
            phase_space_integrals,
        }
    }

    pub fn wave_name(&self) -> &str {
        &self.wave_name
    }

    /// Bins in which the wave is present
    pub fn bins(&self) -> &[usize] {
        &self.bins
    }

    pub fn is_in_bin(&self, bin: usize) -> bool {
        self.wave_indices[bin].is_some()
    }

    /// Index of the wave in the wave list of `bin`
    pub fn wave_index(&self, bin: usize) -> Option<usize> {
        self.wave_indices[bin]
    }

    pub fn wave_indices(&self) -> &[Option<usize>] {
        &self.wave_indices
    }

    /// Zero for bins the wave is not part of
    pub fn nr_mass_bins(&self, bin: usize) -> usize {
        self.mass_bin_centers[bin].len()
    }

    pub fn mass_bin_centers(&self, bin: usize) -> &Array1<f64> {
        &self.mass_bin_centers[bin]
    }

    /// Phase-space integral of the wave
    ///
    /// With `idx_mass` the cached value of that mass bin is returned, otherwise the value is
    /// linearly interpolated between mass-bin centers and kept constant beyond the outermost
    /// ones. A NaN mass gives the value of the lowest mass bin. Zero for bins the wave is not part
    /// of.
    pub fn phase_space_integral(&self, bin: usize, mass: f64, idx_mass: Option<usize>) -> f64 {
        let values = &self.phase_space_integrals[bin];
        if values.is_empty() {
            return 0.0;
        }
        if let Some(idx_mass) = idx_mass {
            return values[idx_mass];
        }

        let masses = &self.mass_bin_centers[bin];
        let n = masses.len();
        if n == 1 || mass.is_nan() || mass <= masses[0] {
            return values[0];
        }
        if mass >= masses[n - 1] {
            return values[n - 1];
        }
        let i = masses
            .as_slice()
            .map(|m| m.partition_point(|&x| x <= mass))
            .unwrap_or_else(|| masses.iter().take_while(|&&x| x <= mass).count());
        let (m0, m1) = (masses[i - 1], masses[i]);
        values[i - 1] + (values[i] - values[i - 1]) * (mass - m0) / (m1 - m0)
    }
}

#[allow(clippy::float_cmp)]
#[cfg(test)]
mod tests {
    use super::*;

    use crate::data::DataBin;

    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn two_bin_data() -> Data {
        Data::new(vec![
            DataBin::new(
                array![1.0, 1.5, 2.0],
                array![[1.0, 10.0], [2.0, 20.0], [4.0, 40.0]],
            )
            .unwrap(),
            DataBin::new(array![1.0, 2.0], array![[5.0], [7.0]]).unwrap(),
        ])
    }

    #[test]
    fn bins_follow_wave_indices() {
        let data = two_bin_data();
        let channel = Channel::new("b", vec![Some(1), None], &data);
        assert_eq!(channel.wave_name(), "b");
        assert_eq!(channel.bins(), &[0]);
        assert!(channel.is_in_bin(0));
        assert!(!channel.is_in_bin(1));
        assert_eq!(channel.wave_index(0), Some(1));
        assert_eq!(channel.nr_mass_bins(0), 3);
        assert_eq!(channel.nr_mass_bins(1), 0);
        assert!(channel.mass_bin_centers(1).is_empty());
    }

    #[test]
    fn cached_phase_space() {
        let data = two_bin_data();
        let channel = Channel::new("a", vec![Some(0), Some(0)], &data);
        assert_eq!(channel.phase_space_integral(0, 1.5, Some(1)), 2.0);
        assert_eq!(channel.phase_space_integral(1, 2.0, Some(1)), 7.0);
    }

    #[test]
    fn interpolated_phase_space() {
        let data = two_bin_data();
        let channel = Channel::new("b", vec![Some(1), None], &data);
        assert_abs_diff_eq!(channel.phase_space_integral(0, 1.25, None), 15.0);
        assert_abs_diff_eq!(channel.phase_space_integral(0, 1.75, None), 30.0);
        assert_eq!(channel.phase_space_integral(0, 0.5, None), 10.0);
        assert_eq!(channel.phase_space_integral(0, 2.5, None), 40.0);
        assert_eq!(channel.phase_space_integral(1, 1.5, None), 0.0);
    }

    #[test]
    fn nan_mass_phase_space() {
        let data = two_bin_data();
        let channel = Channel::new("b", vec![Some(1), Some(0)], &data);
        assert_eq!(channel.phase_space_integral(0, f64::NAN, None), 10.0);
        assert_eq!(channel.phase_space_integral(1, f64::NAN, None), 5.0);
    }
}
