/// Error returned when a fit configuration cannot be turned into a [crate::Model]
///
/// `path` points to the offending field of the configuration tree, e.g.
/// `model.components[2].decaychannels[0].amp`.
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("{path}: {reason}")]
pub struct ConfigurationError {
    pub path: String,
    pub reason: ConfigurationErrorReason,
}

impl ConfigurationError {
    pub fn new(path: impl Into<String>, reason: ConfigurationErrorReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigurationErrorReason {
    #[error("component '{0}' defined twice")]
    DuplicateComponent(String),

    #[error("wave '{0}' defined twice")]
    DuplicateWave(String),

    #[error("wave '{wave}' defined twice in the decay channels of component '{component}'")]
    DuplicateChannelWave { wave: String, component: String },

    #[error("wave '{wave}' not in fit, but used as decay channel in component '{component}'")]
    UnknownWave { wave: String, component: String },

    #[error("unknown component type '{0}'")]
    UnknownComponentType(String),

    #[error("mandatory variable '{0}' is missing")]
    MissingField(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("lower limit {lower} is larger than upper limit {upper}")]
    InvalidBounds { lower: f64, upper: f64 },

    #[error(transparent)]
    TabulatedCurve(#[from] TabulatedCurveError),

    #[error("tabulated curve covers [{curve_lower}, {curve_upper}], but [{lower}, {upper}] is required")]
    TabulatedCurveDomain {
        curve_lower: f64,
        curve_upper: f64,
        lower: f64,
        upper: f64,
    },

    #[error("{actual} anchors given, but the fit has {expected} bins")]
    AnchorCountMismatch { actual: usize, expected: usize },

    #[error("anchor wave '{wave}' is not part of bin {bin}")]
    AnchorWaveNotInBin { wave: String, bin: usize },

    #[error("component '{component}' has no decay channel for anchor wave '{wave}' in bin {bin}")]
    AnchorNotFound {
        wave: String,
        component: String,
        bin: usize,
    },

    #[error("{actual} couplings given, but the decay channel is used in {expected} bins")]
    CouplingCountMismatch { actual: usize, expected: usize },

    #[error("decay channels '{first}' and '{second}' share a coupling, but are used in different bins")]
    SharedCouplingBinsMismatch { first: String, second: String },

    #[error("{actual} final-state mass-dependence functions given, but the fit has {expected} bins")]
    FsmdBinCountMismatch { actual: usize, expected: usize },

    #[error("{actual} parameters given, but {expected} are required")]
    ParameterCountMismatch { actual: usize, expected: usize },

    #[error("data shape mismatch: {0}")]
    DataShapeMismatch(String),

    #[error("'{0}' does not match any parameter of the model")]
    UnknownFreeParameter(String),

    #[error("release order of parameters is an empty sequence")]
    EmptyFreeParameters,
}

/// Error returned from [crate::TabulatedCurve] constructor
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TabulatedCurveError {
    #[error("tabulated curve has to contain at least two points, {0} given")]
    TooShort(usize),

    #[error("masses of tabulated curve have to be strictly ordered")]
    Unordered,

    #[error("masses and values of tabulated curve have different lengths")]
    LengthMismatch,

    #[error("tabulated curve contains non-finite numbers")]
    NonFinite,
}

/// Error returned from [crate::DataBin] constructor
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DataError {
    #[error("mass-bin centers have to be strictly ordered")]
    UnsortedMassBins,

    #[error("{array} has shape {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        array: &'static str,
        actual: Vec<usize>,
        expected: Vec<usize>,
    },

    #[error("phase-space integral of wave {wave} in mass bin {mass_bin} has to be finite and non-negative")]
    InvalidPhaseSpaceIntegral { mass_bin: usize, wave: usize },
}

/// Error returned from [crate::Fitter]
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FitError {
    #[error("data of bin {0} carry no measurements to compare the model with")]
    MissingMeasurements(usize),

    #[error("model has {model} bins, data has {data}")]
    BinCountMismatch { model: usize, data: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_message() {
        let err = ConfigurationError::new(
            "model.components[1].name",
            ConfigurationErrorReason::DuplicateComponent("a1".into()),
        );
        assert_eq!(
            err.to_string(),
            "model.components[1].name: component 'a1' defined twice"
        );
    }
}
