use crate::components::Component;
use crate::error::{ConfigurationError, ConfigurationErrorReason};
use crate::fsmd::Fsmd;
use crate::input::Input;
use crate::parameter_space::ParameterSpace;

use ndarray::Array1;
use num_complex::Complex64;
use tracing::debug;

/// Reference coupling of a bin
///
/// Amplitudes of a bin are divided by the phase of this coupling, which removes the unobservable
/// global phase of the bin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Anchor {
    /// Index of the anchor wave in the bin
    pub wave: usize,
    pub component: usize,
    pub channel: usize,
    pub coupling: usize,
}

/// Immutable description of the amplitudes of all bins
///
/// The model never stores parameter values, every evaluation reads them from a
/// [ParameterSpace].
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    components: Vec<Component>,
    fsmd: Fsmd,
    anchor_wave_names: Vec<String>,
    anchor_component_names: Vec<String>,
    anchors: Vec<Anchor>,
    wave_names: Vec<Vec<String>>,
    // (component, channel) pairs contributing to every wave of every bin
    contributions: Vec<Vec<Vec<(usize, usize)>>>,
}

impl Model {
    /// Assemble a model
    ///
    /// Component ids must equal their position and the fsmd id must equal the number of
    /// components. `anchors` holds one `(wave, component)` pair per bin.
    pub fn new(
        input: &Input,
        components: Vec<Component>,
        fsmd: Fsmd,
        anchors: Vec<(String, String)>,
    ) -> Result<Self, ConfigurationError> {
        for (idx, component) in components.iter().enumerate() {
            assert_eq!(component.id(), idx, "component ids must be dense");
            if components[..idx].iter().any(|c| c.name() == component.name()) {
                return Err(ConfigurationError::new(
                    format!("model.components[{idx}].name"),
                    ConfigurationErrorReason::DuplicateComponent(component.name().to_owned()),
                ));
            }
        }
        assert_eq!(
            fsmd.id(),
            components.len(),
            "fsmd id must follow the component ids"
        );

        if anchors.len() != input.nr_bins() {
            return Err(ConfigurationError::new(
                "model.anchorwave",
                ConfigurationErrorReason::AnchorCountMismatch {
                    actual: anchors.len(),
                    expected: input.nr_bins(),
                },
            ));
        }

        let wave_names: Vec<Vec<String>> = input
            .bins()
            .iter()
            .map(|bin| bin.waves().iter().map(|w| w.name().to_owned()).collect())
            .collect();

        let contributions = wave_names
            .iter()
            .enumerate()
            .map(|(idx_bin, waves)| {
                let mut per_wave = vec![vec![]; waves.len()];
                for component in components.iter() {
                    for (idx_channel, channel) in component.channels().iter().enumerate() {
                        if let Some(idx_wave) = channel.wave_index(idx_bin) {
                            per_wave[idx_wave].push((component.id(), idx_channel));
                        }
                    }
                }
                per_wave
            })
            .collect();

        let resolved = anchors
            .iter()
            .enumerate()
            .map(|(bin, (wave_name, component_name))| {
                let path = || format!("model.anchorwave[{bin}]");
                let wave = input.bin(bin).wave_index(wave_name).ok_or_else(|| {
                    ConfigurationError::new(
                        path(),
                        ConfigurationErrorReason::AnchorWaveNotInBin {
                            wave: wave_name.clone(),
                            bin,
                        },
                    )
                })?;
                let not_found = || {
                    ConfigurationError::new(
                        path(),
                        ConfigurationErrorReason::AnchorNotFound {
                            wave: wave_name.clone(),
                            component: component_name.clone(),
                            bin,
                        },
                    )
                };
                let component = components
                    .iter()
                    .find(|c| c.name() == component_name.as_str())
                    .ok_or_else(not_found)?;
                let channel = component
                    .channel_index(wave_name)
                    .filter(|&idx| component.channel(idx).is_in_bin(bin))
                    .ok_or_else(not_found)?;
                debug!(
                    "anchor of bin {bin} is wave '{wave_name}' in component '{component_name}'"
                );
                Ok(Anchor {
                    wave,
                    component: component.id(),
                    channel,
                    coupling: component.map_channel_to_coupling(channel),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (anchor_wave_names, anchor_component_names) = anchors.into_iter().unzip();
        Ok(Self {
            components,
            fsmd,
            anchor_wave_names,
            anchor_component_names,
            anchors: resolved,
            wave_names,
            contributions,
        })
    }

    pub fn nr_components(&self) -> usize {
        self.components.len()
    }

    pub fn component(&self, idx: usize) -> &Component {
        &self.components[idx]
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component_by_name(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name() == name)
    }

    pub fn fsmd(&self) -> &Fsmd {
        &self.fsmd
    }

    pub fn nr_bins(&self) -> usize {
        self.wave_names.len()
    }

    pub fn nr_waves(&self, bin: usize) -> usize {
        self.wave_names[bin].len()
    }

    pub fn wave_names(&self, bin: usize) -> &[String] {
        &self.wave_names[bin]
    }

    pub fn wave_index(&self, bin: usize, wave_name: &str) -> Option<usize> {
        self.wave_names[bin].iter().position(|w| w == wave_name)
    }

    pub fn anchor(&self, bin: usize) -> &Anchor {
        &self.anchors[bin]
    }

    pub fn anchor_wave_name(&self, bin: usize) -> &str {
        &self.anchor_wave_names[bin]
    }

    pub fn anchor_component_name(&self, bin: usize) -> &str {
        &self.anchor_component_names[bin]
    }

    /// Is coupling `coupling` of component `component` the anchor of `bin`?
    pub fn is_anchor(&self, component: usize, coupling: usize, bin: usize) -> bool {
        let anchor = &self.anchors[bin];
        anchor.component == component && anchor.coupling == coupling
    }

    /// Components and their channels contributing to a wave
    pub fn contributions(&self, bin: usize, wave: usize) -> &[(usize, usize)] {
        &self.contributions[bin][wave]
    }

    /// Smallest ParameterSpace shape `(components, channels, parameters, bins)` the model reads
    pub fn parameter_space_shape(&self) -> (usize, usize, usize, usize) {
        let nr_channels = self
            .components
            .iter()
            .map(|c| c.nr_channels())
            .max()
            .unwrap_or(0);
        let nr_parameters = self
            .components
            .iter()
            .map(|c| c.nr_parameters())
            .chain(std::iter::once(self.fsmd.nr_parameters()))
            .max()
            .unwrap_or(0);
        (
            self.components.len() + 1,
            nr_channels,
            nr_parameters,
            self.nr_bins(),
        )
    }

    #[inline]
    pub fn fsmd_value(
        &self,
        space: &ParameterSpace,
        bin: usize,
        mass: f64,
        idx_mass: Option<usize>,
    ) -> f64 {
        if self.fsmd.is_none() {
            return 1.0;
        }
        self.fsmd
            .value(space.parameters_of(self.fsmd.id()), bin, mass, idx_mass)
    }

    fn anchor_phase(&self, space: &ParameterSpace, bin: usize) -> Complex64 {
        let anchor = &self.anchors[bin];
        let coupling = space.coupling(anchor.component, anchor.coupling, bin);
        let norm = coupling.norm();
        if norm > 0.0 {
            coupling / norm
        } else {
            Complex64::new(1.0, 0.0)
        }
    }

    fn raw_amplitude(
        &self,
        space: &ParameterSpace,
        bin: usize,
        wave: usize,
        mass: f64,
        idx_mass: Option<usize>,
    ) -> Complex64 {
        self.contributions[bin][wave]
            .iter()
            .map(|&(component, channel)| {
                self.components[component].val(space, channel, bin, mass, idx_mass)
            })
            .sum()
    }

    /// Production amplitude of `wave` in `bin` at `mass`
    ///
    /// Channel contributions are summed, multiplied by the final-state mass dependence and
    /// rotated so that the anchor coupling of the bin is real and positive. `idx_mass` selects
    /// cached per-mass-bin values, with `None` they are interpolated at `mass`.
    pub fn production_amplitude(
        &self,
        space: &ParameterSpace,
        bin: usize,
        wave: usize,
        mass: f64,
        idx_mass: Option<usize>,
    ) -> Complex64 {
        let amplitude = self.raw_amplitude(space, bin, wave, mass, idx_mass);
        amplitude * self.fsmd_value(space, bin, mass, idx_mass) / self.anchor_phase(space, bin)
    }

    /// Production amplitudes of all waves of `bin`
    pub fn production_amplitudes(
        &self,
        space: &ParameterSpace,
        bin: usize,
        mass: f64,
        idx_mass: Option<usize>,
    ) -> Array1<Complex64> {
        let factor = Complex64::new(self.fsmd_value(space, bin, mass, idx_mass), 0.0)
            / self.anchor_phase(space, bin);
        (0..self.nr_waves(bin))
            .map(|wave| self.raw_amplitude(space, bin, wave, mass, idx_mass) * factor)
            .collect()
    }

    pub fn intensity(
        &self,
        space: &ParameterSpace,
        bin: usize,
        wave: usize,
        mass: f64,
        idx_mass: Option<usize>,
    ) -> f64 {
        self.production_amplitude(space, bin, wave, mass, idx_mass)
            .norm_sqr()
    }

    pub fn phase_absolute(
        &self,
        space: &ParameterSpace,
        bin: usize,
        wave: usize,
        mass: f64,
        idx_mass: Option<usize>,
    ) -> f64 {
        self.production_amplitude(space, bin, wave, mass, idx_mass)
            .arg()
    }

    /// `A(wave1) · conj(A(wave2))`
    pub fn spin_density_matrix(
        &self,
        space: &ParameterSpace,
        bin: usize,
        wave1: usize,
        wave2: usize,
        mass: f64,
        idx_mass: Option<usize>,
    ) -> Complex64 {
        let amplitude1 = self.production_amplitude(space, bin, wave1, mass, idx_mass);
        let amplitude2 = self.production_amplitude(space, bin, wave2, mass, idx_mass);
        amplitude1 * amplitude2.conj()
    }

    /// Phase of `wave1` relative to `wave2`
    pub fn phase(
        &self,
        space: &ParameterSpace,
        bin: usize,
        wave1: usize,
        wave2: usize,
        mass: f64,
        idx_mass: Option<usize>,
    ) -> f64 {
        self.spin_density_matrix(space, bin, wave1, wave2, mass, idx_mass)
            .arg()
    }
}
