#![doc = include_str!("../README.md")]


pub mod components;
pub use components::*;

pub mod config;
pub use config::{AnchorConvention, FitConfig, FitOptions, FitSetup};

mod data;
pub use data::{Data, DataBin, Measurement};

mod error;
pub use error::{ConfigurationError, ConfigurationErrorReason, DataError, FitError, TabulatedCurveError};

pub mod fit;
pub use fit::{FitResult, Fitter};

pub mod fsmd;
pub use fsmd::{Fsmd, FsmdFunction, FsmdKind, MassFunction, MassFunctionTrait};

mod input;
pub use input::{Input, InputBin, InputWave};

mod model;
pub use model::{Anchor, Model};

mod parameter;
pub use parameter::Parameter;

mod parameter_space;
pub use parameter_space::ParameterSpace;

pub mod physics;

pub mod spherical;

mod tabulated_curve;
pub use tabulated_curve::TabulatedCurve;

pub use ndarray;
pub use num_complex;
