use super::lineshape::*;

macro_const! {
    const DOC: &str = r"
Exponentially falling background in the breakup momentum

$$
f(m) = q^L \exp\left(-g\, q^{\alpha}\right),\quad q = q(m - m_0;\, m_1, m_2),
$$
where $q$ is the breakup momentum into isobars of masses $m_1$ and $m_2$ evaluated at the mass
shifted by $m_0$, $L$ is the relative orbital angular momentum (default 0) and $\alpha$ the
exponent (default 2). The background vanishes below the threshold $m - m_0 < m_1 + m_2$.

- Parameters: **m0**, **g**
- Static: **mIsobar1**, **mIsobar2**, **relAngularMom**, **exponent**
";
}

/// Breakup-momentum dependence shared by the analytic backgrounds
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BreakupShape {
    pub m_isobar1: f64,
    pub m_isobar2: f64,
    pub rel_angular_mom: u32,
    pub exponent: f64,
}

impl BreakupShape {
    pub fn new(m_isobar1: f64, m_isobar2: f64) -> Self {
        Self {
            m_isobar1,
            m_isobar2,
            rel_angular_mom: Self::default_rel_angular_mom(),
            exponent: Self::default_exponent(),
        }
    }

    #[inline]
    pub fn default_rel_angular_mom() -> u32 {
        0
    }

    #[inline]
    pub fn default_exponent() -> f64 {
        2.0
    }

    pub fn with_rel_angular_mom(mut self, rel_angular_mom: u32) -> Self {
        self.rel_angular_mom = rel_angular_mom;
        self
    }

    pub fn with_exponent(mut self, exponent: f64) -> Self {
        self.exponent = exponent;
        self
    }

    /// `q^L exp(-slope q^exponent)` at `mass - m0`, zero below threshold
    pub(super) fn eval(&self, m0: f64, slope: f64, mass: f64) -> f64 {
        let shifted = mass - m0;
        if shifted < self.m_isobar1 + self.m_isobar2 {
            return 0.0;
        }
        let q = breakup_momentum(shifted, self.m_isobar1, self.m_isobar2);
        q.powi(self.rel_angular_mom as i32) * f64::exp(-slope * q.powf(self.exponent))
    }
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ExponentialBackground {
    shape: BreakupShape,
}

impl ExponentialBackground {
    pub fn new(shape: BreakupShape) -> Self {
        Self { shape }
    }

    pub fn shape(&self) -> &BreakupShape {
        &self.shape
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl LineshapeTrait for ExponentialBackground {
    fn kind(&self) -> LineshapeKind {
        LineshapeKind::ExponentialBackground
    }

    fn val(&self, parameters: ArrayView1<f64>, _bin: usize, mass: f64) -> Complex64 {
        let m0 = parameters[0];
        let g = parameters[1];
        Complex64::new(self.shape.eval(m0, g, mass), 0.0)
    }
}
