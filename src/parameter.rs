use crate::error::ConfigurationErrorReason;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Metadata of a single scalar fit parameter
///
/// The current value during a fit is not stored here, but in the [crate::ParameterSpace].
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Parameter {
    name: String,
    start_value: f64,
    start_error: f64,
    fixed: bool,
    limit_lower: Option<f64>,
    limit_upper: Option<f64>,
    step: f64,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_value: 0.0,
            start_error: 0.0,
            fixed: false,
            limit_lower: None,
            limit_upper: None,
            step: Self::default_step(),
        }
    }

    #[inline]
    pub fn default_step() -> f64 {
        0.0001
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_value(&self) -> f64 {
        self.start_value
    }

    pub fn start_error(&self) -> f64 {
        self.start_error
    }

    pub fn fixed(&self) -> bool {
        self.fixed
    }

    pub fn limited_lower(&self) -> bool {
        self.limit_lower.is_some()
    }

    pub fn limit_lower(&self) -> Option<f64> {
        self.limit_lower
    }

    pub fn limited_upper(&self) -> bool {
        self.limit_upper.is_some()
    }

    pub fn limit_upper(&self) -> Option<f64> {
        self.limit_upper
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Bounds with infinities for unlimited sides
    pub fn bounds(&self) -> (f64, f64) {
        (
            self.limit_lower.unwrap_or(f64::NEG_INFINITY),
            self.limit_upper.unwrap_or(f64::INFINITY),
        )
    }

    pub fn set_start_value(&mut self, value: f64) {
        self.start_value = value;
    }

    pub fn set_start_error(&mut self, error: f64) {
        self.start_error = error;
    }

    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
    }

    pub fn set_limit_lower(&mut self, limit: Option<f64>) {
        self.limit_lower = limit;
    }

    pub fn set_limit_upper(&mut self, limit: Option<f64>) {
        self.limit_upper = limit;
    }

    pub fn set_step(&mut self, step: f64) {
        self.step = step;
    }

    pub fn with_start_value(mut self, value: f64) -> Self {
        self.set_start_value(value);
        self
    }

    pub fn with_fixed(mut self, fixed: bool) -> Self {
        self.set_fixed(fixed);
        self
    }

    pub fn with_limits(mut self, lower: Option<f64>, upper: Option<f64>) -> Self {
        self.limit_lower = lower;
        self.limit_upper = upper;
        self
    }

    /// Check that the limits, if both are set, are ordered
    pub fn validate(&self) -> Result<(), ConfigurationErrorReason> {
        match (self.limit_lower, self.limit_upper) {
            (Some(lower), Some(upper)) if lower > upper => {
                Err(ConfigurationErrorReason::InvalidBounds { lower, upper })
            }
            _ => Ok(()),
        }
    }
}
