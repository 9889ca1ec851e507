use super::lineshape::*;

macro_const! {
    const DOC: &str = r"
Exponentially falling background in a tabulated phase-space integral

$$
f(m) = \exp\left(-g\, I(m)^{\alpha}\right),
$$
where $I$ is linearly interpolated from the tabulated **integral** and $\alpha$ is the mandatory
**exponent**. The table has to cover the mass-bin centers of every bin the component is used in.

- Parameters: **g**
- Static: **integral**, **exponent**
";
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ExponentialBackgroundIntegral {
    integral: TabulatedCurve,
    exponent: f64,
}

impl ExponentialBackgroundIntegral {
    pub fn new(integral: TabulatedCurve, exponent: f64) -> Self {
        Self { integral, exponent }
    }

    pub fn integral(&self) -> &TabulatedCurve {
        &self.integral
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    pub const fn doc() -> &'static str {
        DOC
    }

    pub(super) fn eval(&self, slope: f64, mass: f64) -> f64 {
        f64::exp(-slope * self.integral.eval(mass).powf(self.exponent))
    }
}

impl LineshapeTrait for ExponentialBackgroundIntegral {
    fn kind(&self) -> LineshapeKind {
        LineshapeKind::ExponentialBackgroundIntegral
    }

    fn val(&self, parameters: ArrayView1<f64>, _bin: usize, mass: f64) -> Complex64 {
        Complex64::new(self.eval(parameters[0], mass), 0.0)
    }

    fn validate_domain(
        &self,
        _parameters: &[Parameter],
        lower: f64,
        upper: f64,
    ) -> Result<(), ConfigurationErrorReason> {
        check_curve_domain(&self.integral, lower, upper)
    }
}

#[allow(clippy::float_cmp)]
#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    check_lineshape!(
        ExponentialBackgroundIntegral,
        ExponentialBackgroundIntegral::new(
            TabulatedCurve::from_pairs(&[[0.0, 0.0], [4.0, 2.0]]).unwrap(),
            2.0
        ),
        [0.5]
    );

    #[test]
    fn follows_integral() {
        let integral = TabulatedCurve::from_pairs(&[[1.0, 0.0], [2.0, 2.0]]).unwrap();
        let bg = ExponentialBackgroundIntegral::new(integral, 2.0);
        let value = bg.val(array![0.5].view(), 0, 1.5);
        assert_relative_eq!(value.re, (-0.5_f64).exp(), max_relative = 1e-14);
        assert_eq!(bg.val(array![0.5].view(), 0, 1.0).re, 1.0);
    }

    #[test]
    fn domain() {
        let integral = TabulatedCurve::from_pairs(&[[1.0, 0.0], [2.0, 2.0]]).unwrap();
        let bg = ExponentialBackgroundIntegral::new(integral, 2.0);
        let parameters = [Parameter::new("g")];
        assert!(bg.validate_domain(&parameters, 1.0, 2.0).is_ok());
        assert!(matches!(
            bg.validate_domain(&parameters, 1.0, 2.1),
            Err(ConfigurationErrorReason::TabulatedCurveDomain { .. })
        ));
    }
}
