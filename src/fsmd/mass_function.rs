use enum_dispatch::enum_dispatch;
use ndarray::ArrayView1;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[enum_dispatch]
pub trait MassFunctionTrait {
    fn nr_parameters(&self) -> usize;

    /// Names of the parameters in the order [MassFunctionTrait::eval] reads them
    fn parameter_names(&self) -> Vec<String>;

    fn eval(&self, mass: f64, parameters: ArrayView1<f64>) -> f64;
}

/// Smooth real function of mass with named parameters
///
/// [Custom](MassFunction::Custom) functions are not serializable.
#[enum_dispatch(MassFunctionTrait)]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[non_exhaustive]
pub enum MassFunction {
    Polynomial,
    Exponential,
    #[serde(skip)]
    Custom(CustomMassFunction),
}

fn polynomial_parameter_names(degree: usize) -> Vec<String> {
    (0..=degree).map(|i| format!("p{i}")).collect()
}

/// Horner scheme, `parameters[i]` is the coefficient of `mass^i`
fn horner(mass: f64, parameters: ArrayView1<f64>) -> f64 {
    parameters.iter().rev().fold(0.0, |acc, &p| acc * mass + p)
}

/// Polynomial `p0 + p1 m + ... + pn m^n`
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Polynomial {
    pub degree: usize,
}

impl Polynomial {
    pub fn new(degree: usize) -> Self {
        Self { degree }
    }
}

impl MassFunctionTrait for Polynomial {
    fn nr_parameters(&self) -> usize {
        self.degree + 1
    }

    fn parameter_names(&self) -> Vec<String> {
        polynomial_parameter_names(self.degree)
    }

    fn eval(&self, mass: f64, parameters: ArrayView1<f64>) -> f64 {
        horner(mass, parameters)
    }
}

/// Exponential of a polynomial `exp(p0 + p1 m + ... + pn m^n)`
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Exponential {
    pub degree: usize,
}

impl Exponential {
    pub fn new(degree: usize) -> Self {
        Self { degree }
    }
}

impl MassFunctionTrait for Exponential {
    fn nr_parameters(&self) -> usize {
        self.degree + 1
    }

    fn parameter_names(&self) -> Vec<String> {
        polynomial_parameter_names(self.degree)
    }

    fn eval(&self, mass: f64, parameters: ArrayView1<f64>) -> f64 {
        horner(mass, parameters).exp()
    }
}

type MassClosure = dyn Fn(f64, &[f64]) -> f64 + Send + Sync;

/// User-supplied function of mass and a parameter slice
#[derive(Clone)]
pub struct CustomMassFunction {
    function: Arc<MassClosure>,
    parameter_names: Vec<String>,
}

impl CustomMassFunction {
    pub fn new<F>(function: F, parameter_names: Vec<String>) -> Self
    where
        F: Fn(f64, &[f64]) -> f64 + Send + Sync + 'static,
    {
        Self {
            function: Arc::new(function),
            parameter_names,
        }
    }
}

impl fmt::Debug for CustomMassFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomMassFunction")
            .field("parameter_names", &self.parameter_names)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CustomMassFunction {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.function, &other.function) && self.parameter_names == other.parameter_names
    }
}

impl MassFunctionTrait for CustomMassFunction {
    fn nr_parameters(&self) -> usize {
        self.parameter_names.len()
    }

    fn parameter_names(&self) -> Vec<String> {
        self.parameter_names.clone()
    }

    fn eval(&self, mass: f64, parameters: ArrayView1<f64>) -> f64 {
        match parameters.as_slice() {
            Some(slice) => (self.function)(mass, slice),
            None => (self.function)(mass, &parameters.to_vec()),
        }
    }
}
