use crate::error::{ConfigurationError, ConfigurationErrorReason};

/// A partial wave entering the fit in one bin
#[derive(Clone, Debug, PartialEq)]
pub struct InputWave {
    name: String,
    mass_limits: (f64, f64),
}

impl InputWave {
    /// `mass_limits` restrict the mass range used in the fit, negative values mean unlimited
    pub fn new(name: impl Into<String>, mass_limits: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            mass_limits,
        }
    }

    pub fn unlimited(name: impl Into<String>) -> Self {
        Self::new(name, (-1.0, -1.0))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass_limits(&self) -> (f64, f64) {
        self.mass_limits
    }

    pub fn in_range(&self, mass: f64) -> bool {
        let (lower, upper) = self.mass_limits;
        (lower < 0.0 || mass >= lower) && (upper < 0.0 || mass <= upper)
    }
}

/// One independently measured kinematic bin
#[derive(Clone, Debug, PartialEq)]
pub struct InputBin {
    file_name: String,
    waves: Vec<InputWave>,
    t_prime_mean: f64,
    rescale_errors: f64,
    systematics: Vec<String>,
}

impl InputBin {
    pub fn new(
        file_name: impl Into<String>,
        waves: Vec<InputWave>,
        t_prime_mean: f64,
        rescale_errors: f64,
        systematics: Vec<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            waves,
            t_prime_mean,
            rescale_errors,
            systematics,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn nr_waves(&self) -> usize {
        self.waves.len()
    }

    pub fn wave(&self, idx: usize) -> &InputWave {
        &self.waves[idx]
    }

    pub fn waves(&self) -> &[InputWave] {
        &self.waves
    }

    pub fn wave_index(&self, name: &str) -> Option<usize> {
        self.waves.iter().position(|w| w.name() == name)
    }

    pub fn t_prime_mean(&self) -> f64 {
        self.t_prime_mean
    }

    pub fn rescale_errors(&self) -> f64 {
        self.rescale_errors
    }

    pub fn systematics(&self) -> &[String] {
        &self.systematics
    }

    /// Union of the mass ranges of all waves, `None` for an unlimited side
    pub fn mass_range(&self) -> (Option<f64>, Option<f64>) {
        let lower = self
            .waves
            .iter()
            .map(|w| w.mass_limits.0)
            .try_fold(f64::INFINITY, |acc, x| (x >= 0.0).then(|| acc.min(x)));
        let upper = self
            .waves
            .iter()
            .map(|w| w.mass_limits.1)
            .try_fold(f64::NEG_INFINITY, |acc, x| (x >= 0.0).then(|| acc.max(x)));
        (lower, upper)
    }
}

/// Read-only description of all bins of the fit
#[derive(Clone, Debug, PartialEq)]
pub struct Input {
    bins: Vec<InputBin>,
}

impl Input {
    pub fn new(bins: Vec<InputBin>) -> Result<Self, ConfigurationError> {
        for (idx_bin, bin) in bins.iter().enumerate() {
            for (idx_wave, wave) in bin.waves.iter().enumerate() {
                if bin.waves[..idx_wave].iter().any(|w| w.name == wave.name) {
                    return Err(ConfigurationError::new(
                        format!("input[{idx_bin}].waves[{idx_wave}].name"),
                        ConfigurationErrorReason::DuplicateWave(wave.name.clone()),
                    ));
                }
            }
        }
        Ok(Self { bins })
    }

    pub fn nr_bins(&self) -> usize {
        self.bins.len()
    }

    pub fn bin(&self, idx: usize) -> &InputBin {
        &self.bins[idx]
    }

    pub fn bins(&self) -> &[InputBin] {
        &self.bins
    }

    /// Index of the wave in every bin, `None` where the bin does not contain it
    ///
    /// Returns `None` if no bin contains the wave.
    pub fn wave_indices(&self, name: &str) -> Option<Vec<Option<usize>>> {
        let indices: Vec<_> = self.bins.iter().map(|b| b.wave_index(name)).collect();
        indices.iter().any(Option::is_some).then_some(indices)
    }
}
