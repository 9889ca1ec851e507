use super::exponential_background::BreakupShape;
use super::lineshape::*;

macro_const! {
    const DOC: &str = r"
Exponentially falling background with a slope proportional to the mean $t'$ of the bin

$$
f_b(m) = q^L \exp\left(-g\, \langle t' \rangle_b\, q^{\alpha}\right),\quad q = q(m - m_0;\, m_1, m_2),
$$
with the same conventions as [ExponentialBackground](crate::ExponentialBackground).

- Parameters: **m0**, **g**
- Static: **mIsobar1**, **mIsobar2**, **relAngularMom**, **exponent**, the mean $t'$ of every bin
";
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TPrimeDependentBackground {
    shape: BreakupShape,
    t_prime_means: Vec<f64>,
}

impl TPrimeDependentBackground {
    /// `t_prime_means` holds the mean `t'` of every bin of the fit
    pub fn new(shape: BreakupShape, t_prime_means: Vec<f64>) -> Self {
        Self {
            shape,
            t_prime_means,
        }
    }

    pub fn shape(&self) -> &BreakupShape {
        &self.shape
    }

    pub fn t_prime_means(&self) -> &[f64] {
        &self.t_prime_means
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl LineshapeTrait for TPrimeDependentBackground {
    fn kind(&self) -> LineshapeKind {
        LineshapeKind::TPrimeDependentBackground
    }

    fn val(&self, parameters: ArrayView1<f64>, bin: usize, mass: f64) -> Complex64 {
        let m0 = parameters[0];
        let g = parameters[1];
        let slope = g * self.t_prime_means[bin];
        Complex64::new(self.shape.eval(m0, slope, mass), 0.0)
    }
}
