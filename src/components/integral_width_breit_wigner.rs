use super::lineshape::*;

macro_const! {
    const DOC: &str = r"
Relativistic Breit-Wigner with a width given by tabulated phase-space integrals

$$
\mathrm{BW}(m) = \frac{m_0 \Gamma_0}{m_0^2 - m^2 - i m_0 \Gamma(m)},\quad
\Gamma(m) = \Gamma_0 \sum_i \mathrm{BR}_i \frac{I_i(m)}{I_i(m_0)},
$$
where $I_i$ is the phase-space integral of decay channel $i$, linearly interpolated from a table,
and $\mathrm{BR}_i$ its branching ratio normalized to unit sum. The tables have to cover every mass
the lineshape is evaluated at, as well as every value the resonance mass can take during a fit.

- Parameters: **mass**, **width**
- Static per decay channel: **branchingRatio**, **integral**
";
}

/// Decay channel described by its tabulated phase-space integral
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct IntegralDecayChannel {
    pub branching_ratio: f64,
    pub integral: TabulatedCurve,
}

impl IntegralDecayChannel {
    pub fn new(branching_ratio: f64, integral: TabulatedCurve) -> Self {
        Self {
            branching_ratio,
            integral,
        }
    }
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct IntegralWidthBreitWigner {
    decay_channels: Vec<IntegralDecayChannel>,
}

impl IntegralWidthBreitWigner {
    /// Branching ratios are normalized to unit sum
    pub fn new(mut decay_channels: Vec<IntegralDecayChannel>) -> Self {
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

    pub fn decay_channels(&self) -> &[IntegralDecayChannel] {
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
                let ps0 = channel.integral.eval(m0);
                if ps0 == 0.0 {
                    return 0.0;
                }
                channel.branching_ratio * channel.integral.eval(mass) / ps0
            })
            .sum();
        gamma0 * sum
    }
}

impl LineshapeTrait for IntegralWidthBreitWigner {
    fn kind(&self) -> LineshapeKind {
        LineshapeKind::IntegralWidthBreitWigner
    }

    fn val(&self, parameters: ArrayView1<f64>, _bin: usize, mass: f64) -> Complex64 {
        let m0 = parameters[0];
        let gamma0 = parameters[1];
        breit_wigner(m0, gamma0, self.width(m0, gamma0, mass), mass)
    }

    fn validate_domain(
        &self,
        parameters: &[Parameter],
        lower: f64,
        upper: f64,
    ) -> Result<(), ConfigurationErrorReason> {
        // the tables are also read at the resonance mass
        let mass = &parameters[0];
        let (mut lower, mut upper) = (
            lower.min(mass.start_value()),
            upper.max(mass.start_value()),
        );
        // a free mass has to stay inside the tables during a fit
        if !mass.fixed() {
            let limit_lower = mass
                .limit_lower()
                .ok_or_else(|| ConfigurationErrorReason::MissingField("mass.lower".into()))?;
            let limit_upper = mass
                .limit_upper()
                .ok_or_else(|| ConfigurationErrorReason::MissingField("mass.upper".into()))?;
            lower = lower.min(limit_lower);
            upper = upper.max(limit_upper);
        }
        self.decay_channels
            .iter()
            .try_for_each(|channel| check_curve_domain(&channel.integral, lower, upper))
    }
}
