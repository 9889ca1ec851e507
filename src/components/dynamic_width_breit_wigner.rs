use super::lineshape::*;

macro_const! {
    const DOC: &str = r"
Relativistic Breit-Wigner with mass-dependent width

$$
\mathrm{BW}(m) = \frac{m_0 \Gamma_0}{m_0^2 - m^2 - i m_0 \Gamma(m)},\quad
\Gamma(m) = \Gamma_0 \sum_i \mathrm{BR}_i \left(\frac{q_i(m)}{q_i(m_0)}\right)^{2 L_i + 1} \frac{m_0}{m},
$$
where $q_i$ is the breakup momentum into the isobars of decay channel $i$, $L_i$ the relative
orbital angular momentum and $\mathrm{BR}_i$ the branching ratio. Branching ratios are normalized
to unit sum, so that $\Gamma(m_0) = \Gamma_0$. Channels below their threshold do not contribute.

- Parameters: **mass**, **width**
- Static per decay channel: **branchingRatio**, **relAngularMom**, **mIsobar1**, **mIsobar2**
";
}

/// Static description of one decay channel of a resonance
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DecayChannel {
    pub branching_ratio: f64,
    pub rel_angular_mom: u32,
    pub m_isobar1: f64,
    pub m_isobar2: f64,
}

impl DecayChannel {
    pub fn new(branching_ratio: f64, rel_angular_mom: u32, m_isobar1: f64, m_isobar2: f64) -> Self {
        Self {
            branching_ratio,
            rel_angular_mom,
            m_isobar1,
            m_isobar2,
        }
    }

    fn breakup_momentum(&self, mass: f64) -> f64 {
        breakup_momentum(mass, self.m_isobar1, self.m_isobar2)
    }
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DynamicWidthBreitWigner {
    decay_channels: Vec<DecayChannel>,
}

impl DynamicWidthBreitWigner {
    /// Branching ratios are normalized to unit sum
    pub fn new(mut decay_channels: Vec<DecayChannel>) -> Self {
        assert!(
            !decay_channels.is_empty(),
            "at least one decay channel is required"
        );
        let sum: f64 = decay_channels.iter().map(|c| c.branching_ratio).sum();
        assert!(sum > 0.0, "sum of branching ratios must be positive");
        for channel in decay_channels.iter_mut() {
            channel.branching_ratio /= sum;
        }
        Self { decay_channels }
    }

    pub fn decay_channels(&self) -> &[DecayChannel] {
        &self.decay_channels
    }

    pub const fn doc() -> &'static str {
        DOC
    }

    fn width(&self, m0: f64, gamma0: f64, mass: f64) -> f64 {
        let sum: f64 = self
            .decay_channels
            .iter()
            .map(|channel| {
                let q = channel.breakup_momentum(mass);
                let q0 = channel.breakup_momentum(m0);
                if q == 0.0 || q0 == 0.0 {
                    return 0.0;
                }
                channel.branching_ratio * (q / q0).powi(2 * channel.rel_angular_mom as i32 + 1)
            })
            .sum();
        if sum == 0.0 {
            return 0.0;
        }
        gamma0 * sum * m0 / mass
    }
}

impl LineshapeTrait for DynamicWidthBreitWigner {
    fn kind(&self) -> LineshapeKind {
        LineshapeKind::DynamicWidthBreitWigner
    }

    fn val(&self, parameters: ArrayView1<f64>, _bin: usize, mass: f64) -> Complex64 {
        let m0 = parameters[0];
        let gamma0 = parameters[1];
        breit_wigner(m0, gamma0, self.width(m0, gamma0, mass), mass)
    }
}
