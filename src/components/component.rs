use crate::components::channel::Channel;
use crate::components::lineshape::{Lineshape, LineshapeKind, LineshapeTrait};
use crate::error::ConfigurationErrorReason;
use crate::parameter::Parameter;
use crate::parameter_space::ParameterSpace;

use itertools::Itertools;
use ndarray::ArrayView1;
use num_complex::Complex64;

/// Split a wave name into its quantum-number prefix and the decay part
///
/// The prefix is the leading run of digits and signs, e.g. `1-1++0+` of `1-1++0+rho770_01_pi-`.
pub fn split_wave_name(wave_name: &str) -> (&str, &str) {
    let end = wave_name
        .find(|c: char| !(c.is_ascii_digit() || c == '+' || c == '-'))
        .unwrap_or(wave_name.len());
    wave_name.split_at(end)
}

/// Partition of the channels of a component into groups sharing one fit quantity
///
/// Groups are numbered densely in the order of their first channel, which is the group's master.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelGroups {
    group_of_channel: Vec<usize>,
    master_of_group: Vec<usize>,
}

impl ChannelGroups {
    /// Every channel forms its own group
    pub fn singletons(nr_channels: usize) -> Self {
        Self {
            group_of_channel: (0..nr_channels).collect(),
            master_of_group: (0..nr_channels).collect(),
        }
    }

    /// Channels with equal keys form a group
    pub fn from_keys<K: PartialEq>(keys: &[K]) -> Self {
        let mut group_of_channel = Vec::with_capacity(keys.len());
        let mut master_of_group: Vec<usize> = vec![];
        for (channel, key) in keys.iter().enumerate() {
            let group = match master_of_group.iter().position(|&m| keys[m] == *key) {
                Some(group) => group,
                None => {
                    master_of_group.push(channel);
                    master_of_group.len() - 1
                }
            };
            group_of_channel.push(group);
        }
        Self {
            group_of_channel,
            master_of_group,
        }
    }

    pub fn nr_groups(&self) -> usize {
        self.master_of_group.len()
    }

    #[inline]
    pub fn group(&self, channel: usize) -> usize {
        self.group_of_channel[channel]
    }

    #[inline]
    pub fn master(&self, group: usize) -> usize {
        self.master_of_group[group]
    }

    pub fn is_master(&self, channel: usize) -> bool {
        self.master(self.group(channel)) == channel
    }

    /// Channels of a group, master first
    pub fn members(&self, group: usize) -> impl Iterator<Item = usize> + '_ {
        self.group_of_channel
            .iter()
            .positions(move |&g| g == group)
    }
}

/// One additive term of the amplitude sum
///
/// A component couples a [Lineshape] to a set of waves, one [Channel] per wave. Channels may share
/// their complex coupling and their complex branching, see [ChannelGroups].
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    id: usize,
    name: String,
    parameters: Vec<Parameter>,
    channels: Vec<Channel>,
    lineshape: Lineshape,
    couplings: ChannelGroups,
    branchings: ChannelGroups,
    branching_fixed: Vec<bool>,
}

impl Component {
    /// Assemble a component
    ///
    /// `parameters` follow [LineshapeKind::parameter_names] of the lineshape. With
    /// `use_branchings` channels with the same quantum numbers share a coupling and channels with
    /// the same decay share a branching, otherwise every channel has its own coupling and a fixed
    /// unit branching.
    pub fn new(
        id: usize,
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        channels: Vec<Channel>,
        lineshape: impl Into<Lineshape>,
        use_branchings: bool,
    ) -> Result<Self, ConfigurationErrorReason> {
        let name = name.into();
        let lineshape = lineshape.into();

        let expected = lineshape.kind().parameter_names().len();
        if parameters.len() != expected {
            return Err(ConfigurationErrorReason::ParameterCountMismatch {
                actual: parameters.len(),
                expected,
            });
        }
        for parameter in parameters.iter() {
            parameter.validate()?;
        }
        if let Some(duplicate) = channels
            .iter()
            .map(|c| c.wave_name())
            .duplicates()
            .next()
        {
            return Err(ConfigurationErrorReason::DuplicateChannelWave {
                wave: duplicate.to_owned(),
                component: name,
            });
        }

        let (couplings, branchings, branching_fixed) = if use_branchings {
            let (prefixes, decays): (Vec<_>, Vec<_>) = channels
                .iter()
                .map(|c| split_wave_name(c.wave_name()))
                .unzip();
            let couplings = ChannelGroups::from_keys(&prefixes);
            let branchings = ChannelGroups::from_keys(&decays);
            let branching_fixed = (0..branchings.nr_groups())
                .map(|group| couplings.is_master(branchings.master(group)))
                .collect();
            (couplings, branchings, branching_fixed)
        } else {
            (
                ChannelGroups::singletons(channels.len()),
                ChannelGroups::singletons(channels.len()),
                vec![true; channels.len()],
            )
        };

        for (idx, channel) in channels.iter().enumerate() {
            let master = &channels[couplings.master(couplings.group(idx))];
            if channel.bins() != master.bins() {
                return Err(ConfigurationErrorReason::SharedCouplingBinsMismatch {
                    first: master.wave_name().to_owned(),
                    second: channel.wave_name().to_owned(),
                });
            }
        }

        Ok(Self {
            id,
            name,
            parameters,
            channels,
            lineshape,
            couplings,
            branchings,
            branching_fixed,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> LineshapeKind {
        self.lineshape.kind()
    }

    pub fn lineshape(&self) -> &Lineshape {
        &self.lineshape
    }

    pub fn nr_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, idx: usize) -> &Channel {
        &self.channels[idx]
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Index of the channel bound to `wave_name`
    pub fn channel_index(&self, wave_name: &str) -> Option<usize> {
        self.channels.iter().position(|c| c.wave_name() == wave_name)
    }

    pub fn nr_parameters(&self) -> usize {
        self.parameters.len()
    }

    pub fn parameter(&self, idx: usize) -> &Parameter {
        &self.parameters[idx]
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn nr_couplings(&self) -> usize {
        self.couplings.nr_groups()
    }

    pub fn nr_branchings(&self) -> usize {
        self.branchings.nr_groups()
    }

    pub fn map_channel_to_coupling(&self, channel: usize) -> usize {
        self.couplings.group(channel)
    }

    pub fn map_coupling_to_master_channel(&self, coupling: usize) -> usize {
        self.couplings.master(coupling)
    }

    pub fn map_channel_to_branching(&self, channel: usize) -> usize {
        self.branchings.group(channel)
    }

    pub fn map_branching_to_master_channel(&self, branching: usize) -> usize {
        self.branchings.master(branching)
    }

    /// Is the branching held at `(1, 0)`?
    pub fn is_branching_fixed(&self, branching: usize) -> bool {
        self.branching_fixed[branching]
    }

    pub fn coupling_groups(&self) -> &ChannelGroups {
        &self.couplings
    }

    pub fn branching_groups(&self) -> &ChannelGroups {
        &self.branchings
    }

    /// Lineshape of the component, without coupling and branching
    #[inline]
    pub fn lineshape_val(&self, parameters: ArrayView1<f64>, bin: usize, mass: f64) -> Complex64 {
        self.lineshape.val(parameters, bin, mass)
    }

    /// Contribution of one channel to the production amplitude of its wave
    ///
    /// `coupling · branching · sqrt(phase space) · lineshape`, where the phase-space integral is
    /// the cached value of mass bin `idx_mass` or interpolated at `mass`.
    pub fn val(
        &self,
        space: &ParameterSpace,
        channel: usize,
        bin: usize,
        mass: f64,
        idx_mass: Option<usize>,
    ) -> Complex64 {
        let coupling = space.coupling(self.id, self.map_channel_to_coupling(channel), bin);
        let branching = space.branching(self.id, self.map_channel_to_branching(channel));
        let phase_space = self.channels[channel].phase_space_integral(bin, mass, idx_mass);
        let lineshape = self.lineshape_val(space.parameters_of(self.id), bin, mass);
        coupling * branching * phase_space.sqrt() * lineshape
    }

    /// Lowest and highest mass-bin center over the bins any channel is used in
    pub fn mass_range(&self) -> Option<(f64, f64)> {
        self.channels
            .iter()
            .flat_map(|c| c.bins().iter().map(move |&bin| c.mass_bin_centers(bin)))
            .flat_map(|centers| centers.iter().copied())
            .minmax()
            .into_option()
    }
}
