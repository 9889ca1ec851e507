use super::exponential_background_integral::ExponentialBackgroundIntegral;
use super::lineshape::*;

macro_const! {
    const DOC: &str = r"
Exponentially falling background in a tabulated phase-space integral with a slope proportional to
the mean $t'$ of the bin

$$
f_b(m) = \exp\left(-g\, \langle t' \rangle_b\, I(m)^{\alpha}\right),
$$
with the same conventions as [ExponentialBackgroundIntegral](crate::ExponentialBackgroundIntegral).

- Parameters: **g**
- Static: **integral**, **exponent**, the mean $t'$ of every bin
";
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TPrimeDependentBackgroundIntegral {
    background: ExponentialBackgroundIntegral,
    t_prime_means: Vec<f64>,
}

impl TPrimeDependentBackgroundIntegral {
    /// `t_prime_means` holds the mean `t'` of every bin of the fit
    pub fn new(integral: TabulatedCurve, exponent: f64, t_prime_means: Vec<f64>) -> Self {
        Self {
            background: ExponentialBackgroundIntegral::new(integral, exponent),
            t_prime_means,
        }
    }

    pub fn integral(&self) -> &TabulatedCurve {
        self.background.integral()
    }

    pub fn exponent(&self) -> f64 {
        self.background.exponent()
    }

    pub fn t_prime_means(&self) -> &[f64] {
        &self.t_prime_means
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl LineshapeTrait for TPrimeDependentBackgroundIntegral {
    fn kind(&self) -> LineshapeKind {
        LineshapeKind::TPrimeDependentBackgroundIntegral
    }

    fn val(&self, parameters: ArrayView1<f64>, bin: usize, mass: f64) -> Complex64 {
        let slope = parameters[0] * self.t_prime_means[bin];
        Complex64::new(self.background.eval(slope, mass), 0.0)
    }

    fn validate_domain(
        &self,
        parameters: &[Parameter],
        lower: f64,
        upper: f64,
    ) -> Result<(), ConfigurationErrorReason> {
        self.background.validate_domain(parameters, lower, upper)
    }
}

#[allow(clippy::float_cmp)]
#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;

    check_lineshape!(
        TPrimeDependentBackgroundIntegral,
        TPrimeDependentBackgroundIntegral::new(
            TabulatedCurve::from_pairs(&[[0.0, 0.0], [4.0, 2.0]]).unwrap(),
            1.0,
            vec![0.2]
        ),
        [3.0]
    );

    #[test]
    fn slope_scales_with_t_prime() {
        let integral = TabulatedCurve::from_pairs(&[[1.0, 0.0], [2.0, 2.0]]).unwrap();
        let t_prime = TPrimeDependentBackgroundIntegral::new(integral.clone(), 1.0, vec![0.25, 1.0]);
        let plain = ExponentialBackgroundIntegral::new(integral, 1.0);
        assert_eq!(
            t_prime.val(array![4.0].view(), 0, 1.7),
            plain.val(array![1.0].view(), 0, 1.7)
        );
        assert_eq!(
            t_prime.val(array![4.0].view(), 1, 1.7),
            plain.val(array![4.0].view(), 0, 1.7)
        );
    }
}
