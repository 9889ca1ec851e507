//! Resolved configuration tree of a fit
//!
//! The tree mirrors the vocabulary of the fit configuration files (`decaychannels`,
//! `anchorwave`, `finalStateMassDependence`, ...) and can be produced by any serde data format.
//! [FitConfig::build] validates it and turns it into a [crate::Model] with its initial
//! [crate::ParameterSpace].

mod builder;
pub use builder::{AnchorConvention, FitOptions, FitSetup};

use crate::fsmd::MassFunction;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FitConfig {
    pub input: Vec<InputConfig>,
    pub model: ModelConfig,
    /// Stages of parameters released one after another, see [crate::fit::ReleaseOrder]
    #[serde(default, rename = "freeparameters", skip_serializing_if = "Option::is_none")]
    pub free_parameters: Option<Vec<String>>,
}

/// One bin of the fit
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InputConfig {
    pub name: String,
    pub t_prime_mean: f64,
    #[serde(default = "InputConfig::default_rescale_errors")]
    pub rescale_errors: f64,
    #[serde(default)]
    pub systematics: Vec<String>,
    pub waves: Vec<WaveConfig>,
}

impl InputConfig {
    pub fn default_rescale_errors() -> f64 {
        1.0
    }
}

/// Negative mass limits mean that the side is unlimited
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaveConfig {
    pub name: String,
    #[serde(default = "WaveConfig::unlimited")]
    pub mass_lower: f64,
    #[serde(default = "WaveConfig::unlimited")]
    pub mass_upper: f64,
}

impl WaveConfig {
    fn unlimited() -> f64 {
        -1.0
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ModelConfig {
    /// `[wave, component]` for every bin
    pub anchorwave: Vec<[String; 2]>,
    pub components: Vec<ComponentConfig>,
    #[serde(
        default,
        rename = "finalStateMassDependence",
        skip_serializing_if = "Option::is_none"
    )]
    pub final_state_mass_dependence: Option<FsmdConfig>,
}

/// A component, its scalar parameters are keyed by their names
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentConfig {
    pub name: String,
    /// Name of the lineshape, `fixedWidthBreitWigner` if absent
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub decaychannels: Vec<DecayChannelConfig>,
    /// Decay channels contributing to the width without being part of the fit
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extradecaychannels: Vec<DecayChannelConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m_isobar1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m_isobar2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_angular_mom: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exponent: Option<f64>,
    /// `[mass, value]` knots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integral: Option<Vec<[f64; 2]>>,
    #[serde(flatten)]
    pub parameters: BTreeMap<String, ParameterConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DecayChannelConfig {
    /// Name of the wave
    pub amp: String,
    /// `[re, im]` for every bin the wave is used in, given for coupling masters only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub couplings: Vec<[f64; 2]>,
    /// `[re, im]`, given for masters of free branchings only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branching: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branching_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_angular_mom: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m_isobar1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m_isobar2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integral: Option<Vec<[f64; 2]>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ParameterConfig {
    pub val: f64,
    pub fix: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

/// Error estimate, formats without non-finite numbers give `"nan"` or `"inf"` as strings
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(untagged)]
pub enum ErrorValue {
    Number(f64),
    Text(String),
}

impl ErrorValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(x) => Some(*x),
            Self::Text(s) => match s.to_lowercase().as_str() {
                "nan" => Some(f64::NAN),
                "inf" | "+inf" => Some(f64::INFINITY),
                "-inf" => Some(f64::NEG_INFINITY),
                _ => None,
            },
        }
    }
}

/// Final-state mass dependence: one function for all bins or one per bin
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(untagged)]
pub enum FsmdConfig {
    Global(FsmdFunctionConfig),
    PerBin(Vec<FsmdFunctionConfig>),
}

/// Mass function with its parameters keyed by [crate::MassFunctionTrait::parameter_names]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FsmdFunctionConfig {
    pub formula: MassFunction,
    #[serde(flatten)]
    pub parameters: BTreeMap<String, ParameterConfig>,
}
