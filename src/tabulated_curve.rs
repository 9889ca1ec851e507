use crate::error::TabulatedCurveError;

use itertools::Itertools;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Function of mass given by `(mass, value)` knots
///
/// Masses are guaranteed to be strictly increasing and at least two knots are present. Evaluation
/// linearly interpolates between knots and clamps to the edge values outside of the tabulated
/// domain, callers validate the domain with [TabulatedCurve::covers] beforehand.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(try_from = "TabulatedCurveParameters", into = "TabulatedCurveParameters")]
pub struct TabulatedCurve {
    masses: Vec<f64>,
    values: Vec<f64>,
}

impl TabulatedCurve {
    pub fn new(masses: Vec<f64>, values: Vec<f64>) -> Result<Self, TabulatedCurveError> {
        if masses.len() != values.len() {
            return Err(TabulatedCurveError::LengthMismatch);
        }
        if masses.len() < 2 {
            return Err(TabulatedCurveError::TooShort(masses.len()));
        }
        if masses.iter().chain(values.iter()).any(|x| !x.is_finite()) {
            return Err(TabulatedCurveError::NonFinite);
        }
        if !masses.iter().tuple_windows().all(|(a, b)| a < b) {
            return Err(TabulatedCurveError::Unordered);
        }
        Ok(Self { masses, values })
    }

    pub fn from_pairs(pairs: &[[f64; 2]]) -> Result<Self, TabulatedCurveError> {
        let (masses, values) = pairs.iter().map(|&[m, v]| (m, v)).unzip();
        Self::new(masses, values)
    }

    pub fn lower(&self) -> f64 {
        self.masses[0]
    }

    pub fn upper(&self) -> f64 {
        self.masses[self.masses.len() - 1]
    }

    /// Is `[lower, upper]` inside the tabulated domain?
    pub fn covers(&self, lower: f64, upper: f64) -> bool {
        self.lower() <= lower && upper <= self.upper()
    }

    /// Linear interpolation between the knots, constant beyond them
    ///
    /// A NaN mass gives the value of the first knot.
    pub fn eval(&self, mass: f64) -> f64 {
        if mass.is_nan() || mass <= self.lower() {
            return self.values[0];
        }
        if mass >= self.upper() {
            return self.values[self.values.len() - 1];
        }
        // first knot strictly above mass, it is never the first one here
        let i = self.masses.partition_point(|&m| m <= mass);
        let (m0, m1) = (self.masses[i - 1], self.masses[i]);
        let (v0, v1) = (self.values[i - 1], self.values[i]);
        v0 + (v1 - v0) * (mass - m0) / (m1 - m0)
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename = "TabulatedCurve")]
struct TabulatedCurveParameters {
    points: Vec<[f64; 2]>,
}

impl From<TabulatedCurve> for TabulatedCurveParameters {
    fn from(c: TabulatedCurve) -> Self {
        Self {
            points: c
                .masses
                .into_iter()
                .zip(c.values)
                .map(|(m, v)| [m, v])
                .collect(),
        }
    }
}

impl TryFrom<TabulatedCurveParameters> for TabulatedCurve {
    type Error = TabulatedCurveError;

    fn try_from(p: TabulatedCurveParameters) -> Result<Self, Self::Error> {
        Self::from_pairs(&p.points)
    }
}

#[allow(clippy::float_cmp)]
#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;

    #[test]
    fn interpolation() {
        let curve = TabulatedCurve::new(vec![1.0, 2.0, 4.0], vec![0.0, 1.0, 5.0]).unwrap();
        assert_abs_diff_eq!(curve.eval(1.5), 0.5);
        assert_abs_diff_eq!(curve.eval(3.0), 3.0);
        assert_eq!(curve.eval(2.0), 1.0);
        assert_eq!(curve.eval(4.0), 5.0);
    }

    #[test]
    fn clamps_outside() {
        let curve = TabulatedCurve::new(vec![1.0, 2.0], vec![3.0, 4.0]).unwrap();
        assert_eq!(curve.eval(0.0), 3.0);
        assert_eq!(curve.eval(10.0), 4.0);
    }

    #[test]
    fn nan_mass() {
        let curve = TabulatedCurve::new(vec![1.0, 2.0, 4.0], vec![3.0, 4.0, 6.0]).unwrap();
        assert_eq!(curve.eval(f64::NAN), 3.0);
    }

    #[test]
    fn covers() {
        let curve = TabulatedCurve::new(vec![1.0, 2.0], vec![3.0, 4.0]).unwrap();
        assert!(curve.covers(1.0, 2.0));
        assert!(curve.covers(1.2, 1.8));
        assert!(!curve.covers(0.9, 1.8));
        assert!(!curve.covers(1.2, 2.1));
    }

    #[test]
    fn too_short() {
        assert_eq!(
            TabulatedCurve::new(vec![1.0], vec![1.0]),
            Err(TabulatedCurveError::TooShort(1))
        );
    }

    #[test]
    fn unordered() {
        assert_eq!(
            TabulatedCurve::new(vec![1.0, 3.0, 2.0], vec![1.0, 1.0, 1.0]),
            Err(TabulatedCurveError::Unordered)
        );
        assert_eq!(
            TabulatedCurve::new(vec![1.0, 1.0], vec![1.0, 1.0]),
            Err(TabulatedCurveError::Unordered)
        );
    }

    #[test]
    fn serialization() {
        let curve = TabulatedCurve::from_pairs(&[[1.0, 0.5], [2.0, 0.7]]).unwrap();
        let json = serde_json::to_string(&curve).unwrap();
        assert_eq!(json, r#"{"points":[[1.0,0.5],[2.0,0.7]]}"#);
        let back: TabulatedCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(back, curve);
        assert!(serde_json::from_str::<TabulatedCurve>(r#"{"points":[[1.0,0.5]]}"#).is_err());
    }
}
