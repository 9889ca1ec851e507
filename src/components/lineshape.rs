pub(super) use crate::error::ConfigurationErrorReason;
pub(super) use crate::parameter::Parameter;
pub(super) use crate::physics::breakup_momentum;
pub(super) use crate::tabulated_curve::TabulatedCurve;

use enum_dispatch::enum_dispatch;
pub(super) use macro_const::macro_const;
pub(super) use ndarray::ArrayView1;
pub(super) use num_complex::Complex64;
pub(super) use schemars::JsonSchema;
pub(super) use serde::{Deserialize, Serialize};

use super::constant_background::ConstantBackground;
use super::dynamic_width_breit_wigner::DynamicWidthBreitWigner;
use super::exponential_background::ExponentialBackground;
use super::exponential_background_integral::ExponentialBackgroundIntegral;
use super::fixed_width_breit_wigner::FixedWidthBreitWigner;
use super::integral_width_breit_wigner::IntegralWidthBreitWigner;
use super::t_prime_dependent_background::TPrimeDependentBackground;
use super::t_prime_dependent_background_integral::TPrimeDependentBackgroundIntegral;

/// Tag of the lineshape family, as used by the `type` field of a component configuration
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum LineshapeKind {
    #[default]
    FixedWidthBreitWigner,
    DynamicWidthBreitWigner,
    IntegralWidthBreitWigner,
    ConstantBackground,
    ExponentialBackground,
    TPrimeDependentBackground,
    ExponentialBackgroundIntegral,
    TPrimeDependentBackgroundIntegral,
}

impl LineshapeKind {
    pub const ALL: [Self; 8] = [
        Self::FixedWidthBreitWigner,
        Self::DynamicWidthBreitWigner,
        Self::IntegralWidthBreitWigner,
        Self::ConstantBackground,
        Self::ExponentialBackground,
        Self::TPrimeDependentBackground,
        Self::ExponentialBackgroundIntegral,
        Self::TPrimeDependentBackgroundIntegral,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::FixedWidthBreitWigner => "fixedWidthBreitWigner",
            Self::DynamicWidthBreitWigner => "dynamicWidthBreitWigner",
            Self::IntegralWidthBreitWigner => "integralWidthBreitWigner",
            Self::ConstantBackground => "constantBackground",
            Self::ExponentialBackground => "exponentialBackground",
            Self::TPrimeDependentBackground => "tPrimeDependentBackground",
            Self::ExponentialBackgroundIntegral => "exponentialBackgroundIntegral",
            Self::TPrimeDependentBackgroundIntegral => "tPrimeDependentBackgroundIntegral",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Names of the scalar parameters in the order the lineshape reads them
    pub fn parameter_names(self) -> &'static [&'static str] {
        match self {
            Self::FixedWidthBreitWigner
            | Self::DynamicWidthBreitWigner
            | Self::IntegralWidthBreitWigner => &["mass", "width"],
            Self::ConstantBackground => &["scale"],
            Self::ExponentialBackground | Self::TPrimeDependentBackground => &["m0", "g"],
            Self::ExponentialBackgroundIntegral | Self::TPrimeDependentBackgroundIntegral => &["g"],
        }
    }

    /// Default parameter set, every parameter free, starting at zero
    pub fn default_parameters(self) -> Vec<Parameter> {
        self.parameter_names()
            .iter()
            .map(|&name| Parameter::new(name))
            .collect()
    }
}

impl std::fmt::Display for LineshapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[enum_dispatch]
pub trait LineshapeTrait {
    fn kind(&self) -> LineshapeKind;

    /// Lineshape at `mass` in `bin`
    ///
    /// `parameters` is the row of the component in the [crate::ParameterSpace], its first
    /// entries follow [LineshapeKind::parameter_names]. Never fails, returns zero where the
    /// lineshape vanishes physically.
    fn val(&self, parameters: ArrayView1<f64>, bin: usize, mass: f64) -> Complex64;

    /// Check that every tabulated input covers the masses the lineshape is evaluated at
    ///
    /// `lower` and `upper` bound the mass-bin centers of all bins the component is used in.
    fn validate_domain(
        &self,
        _parameters: &[Parameter],
        _lower: f64,
        _upper: f64,
    ) -> Result<(), ConfigurationErrorReason> {
        Ok(())
    }
}

/// All lineshapes are available as variants of this enum
///
/// Consider to import [LineshapeTrait] as well
#[enum_dispatch(LineshapeTrait)]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[non_exhaustive]
pub enum Lineshape {
    FixedWidthBreitWigner,
    DynamicWidthBreitWigner,
    IntegralWidthBreitWigner,
    ConstantBackground,
    ExponentialBackground,
    TPrimeDependentBackground,
    ExponentialBackgroundIntegral,
    TPrimeDependentBackgroundIntegral,
}

/// Relativistic Breit-Wigner `m0 Γ0 / (m0² - m² - i m0 Γ(m))`
#[inline]
pub(super) fn breit_wigner(m0: f64, gamma0: f64, gamma: f64, mass: f64) -> Complex64 {
    let numerator = Complex64::new(m0 * gamma0, 0.0);
    let denominator = Complex64::new(m0 * m0 - mass * mass, -m0 * gamma);
    numerator / denominator
}

/// Fails unless `curve` covers `[lower, upper]`
pub(super) fn check_curve_domain(
    curve: &TabulatedCurve,
    lower: f64,
    upper: f64,
) -> Result<(), ConfigurationErrorReason> {
    if curve.covers(lower, upper) {
        Ok(())
    } else {
        Err(ConfigurationErrorReason::TabulatedCurveDomain {
            curve_lower: curve.lower(),
            curve_upper: curve.upper(),
            lower,
            upper,
        })
    }
}
