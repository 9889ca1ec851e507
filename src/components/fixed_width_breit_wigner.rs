use super::lineshape::*;

macro_const! {
    const DOC: &str = r"
Relativistic Breit-Wigner with constant width

$$
\mathrm{BW}(m) = \frac{m_0 \Gamma_0}{m_0^2 - m^2 - i m_0 \Gamma_0},
$$
where $m_0$ is the nominal mass and $\Gamma_0$ the nominal width of the resonance.
The lineshape does not depend on the bin, at the pole it equals $i$.

- Parameters: **mass**, **width**
";
}

#[doc = DOC!()]
#[derive(Clone, Default, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FixedWidthBreitWigner {}

impl FixedWidthBreitWigner {
    pub fn new() -> Self {
        Self {}
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl LineshapeTrait for FixedWidthBreitWigner {
    fn kind(&self) -> LineshapeKind {
        LineshapeKind::FixedWidthBreitWigner
    }

    fn val(&self, parameters: ArrayView1<f64>, _bin: usize, mass: f64) -> Complex64 {
        let m0 = parameters[0];
        let gamma0 = parameters[1];
        breit_wigner(m0, gamma0, gamma0, mass)
    }
}

#[allow(clippy::float_cmp)]
#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use std::f64::consts::FRAC_PI_2;

    check_lineshape!(
        FixedWidthBreitWigner,
        FixedWidthBreitWigner::new(),
        [1.5, 0.2]
    );

    #[test]
    fn pole_phase() {
        let bw = FixedWidthBreitWigner::new();
        for (m0, gamma0) in [(1.5, 0.2), (0.77, 0.15), (2.3, 0.04)] {
            let value = bw.val(array![m0, gamma0].view(), 0, m0);
            assert_eq!(value.re, 0.0);
            assert_abs_diff_eq!(value.im, 1.0, epsilon = 1e-14);
            assert_abs_diff_eq!(value.arg(), FRAC_PI_2, epsilon = 1e-14);
        }
    }

    #[test]
    fn same_in_every_bin() {
        let bw = FixedWidthBreitWigner::new();
        let parameters = array![1.3, 0.3];
        assert_eq!(
            bw.val(parameters.view(), 0, 1.1),
            bw.val(parameters.view(), 3, 1.1)
        );
    }

    #[test]
    fn half_maximum() {
        let bw = FixedWidthBreitWigner::new();
        let (m0, gamma0) = (1.5_f64, 0.2_f64);
        // |BW|² = 1/2 where m0² - m² = m0 Γ0
        let mass = (m0 * m0 - m0 * gamma0).sqrt();
        let value = bw.val(array![m0, gamma0].view(), 0, mass);
        assert_abs_diff_eq!(value.norm_sqr(), 0.5, epsilon = 1e-12);
    }
}
