//! Final-state mass dependence applied to all amplitudes of a bin

mod mass_function;
pub use mass_function::{
    CustomMassFunction, Exponential, MassFunction, MassFunctionTrait, Polynomial,
};

use crate::data::Data;
use crate::error::ConfigurationErrorReason;
use crate::parameter::Parameter;

use ndarray::{Array1, ArrayView1, s};
use tracing::debug;

/// Mass function together with the metadata of its parameters
#[derive(Clone, Debug, PartialEq)]
pub struct FsmdFunction {
    function: MassFunction,
    parameters: Vec<Parameter>,
}

impl FsmdFunction {
    pub fn new(
        function: impl Into<MassFunction>,
        parameters: Vec<Parameter>,
    ) -> Result<Self, ConfigurationErrorReason> {
        let function = function.into();
        if parameters.len() != function.nr_parameters() {
            return Err(ConfigurationErrorReason::ParameterCountMismatch {
                actual: parameters.len(),
                expected: function.nr_parameters(),
            });
        }
        for parameter in parameters.iter() {
            parameter.validate()?;
        }
        Ok(Self {
            function,
            parameters,
        })
    }

    pub fn function(&self) -> &MassFunction {
        &self.function
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn nr_parameters(&self) -> usize {
        self.parameters.len()
    }
}

/// Global or bin-wise final-state mass dependence
#[derive(Clone, Debug, PartialEq, Default)]
pub enum FsmdKind {
    #[default]
    None,
    Global(FsmdFunction),
    PerBin(Vec<FsmdFunction>),
}

/// Real factor multiplying the total amplitude of every wave in a bin
///
/// Parameters are stored in the [crate::ParameterSpace] row of id `nr_components`. Functions of
/// different bins are laid out consecutively in that row.
#[derive(Clone, Debug, PartialEq)]
pub struct Fsmd {
    id: usize,
    kind: FsmdKind,
    offsets: Vec<usize>,
    cache: Option<Vec<Array1<f64>>>,
}

impl Fsmd {
    pub fn none(id: usize) -> Self {
        Self {
            id,
            kind: FsmdKind::None,
            offsets: vec![],
            cache: None,
        }
    }

    /// Values at the mass-bin centres are precomputed if no parameter is free
    pub fn new(id: usize, kind: FsmdKind, data: &Data) -> Result<Self, ConfigurationErrorReason> {
        let functions: &[FsmdFunction] = match &kind {
            FsmdKind::None => return Ok(Self::none(id)),
            FsmdKind::Global(function) => std::slice::from_ref(function),
            FsmdKind::PerBin(functions) => {
                if functions.len() != data.nr_bins() {
                    return Err(ConfigurationErrorReason::FsmdBinCountMismatch {
                        actual: functions.len(),
                        expected: data.nr_bins(),
                    });
                }
                functions
            }
        };
        let offsets = functions
            .iter()
            .scan(0, |offset, f| {
                let current = *offset;
                *offset += f.nr_parameters();
                Some(current)
            })
            .collect();

        let mut fsmd = Self {
            id,
            kind,
            offsets,
            cache: None,
        };
        if fsmd.parameters().all(|p| p.fixed()) {
            debug!("final-state mass dependence has no free parameters, caching its values");
            let start_values: Array1<f64> = fsmd.parameters().map(|p| p.start_value()).collect();
            let cache = (0..data.nr_bins())
                .map(|bin| {
                    data.mass_bin_centers(bin)
                        .mapv(|mass| fsmd.eval(start_values.view(), bin, mass))
                })
                .collect();
            fsmd.cache = Some(cache);
        }
        Ok(fsmd)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn kind(&self) -> &FsmdKind {
        &self.kind
    }

    pub fn is_none(&self) -> bool {
        matches!(self.kind, FsmdKind::None)
    }

    pub fn functions(&self) -> &[FsmdFunction] {
        match &self.kind {
            FsmdKind::None => &[],
            FsmdKind::Global(function) => std::slice::from_ref(function),
            FsmdKind::PerBin(functions) => functions,
        }
    }

    /// Offset of the parameters of function `idx` in the parameter row
    pub fn offset(&self, idx: usize) -> usize {
        self.offsets[idx]
    }

    /// Metadata of all parameters in the order of the parameter row
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> + '_ {
        self.functions().iter().flat_map(|f| f.parameters().iter())
    }

    pub fn nr_parameters(&self) -> usize {
        self.functions().iter().map(|f| f.nr_parameters()).sum()
    }

    fn function_index(&self, bin: usize) -> Option<usize> {
        match &self.kind {
            FsmdKind::None => None,
            FsmdKind::Global(_) => Some(0),
            FsmdKind::PerBin(_) => Some(bin),
        }
    }

    fn eval(&self, parameters: ArrayView1<f64>, bin: usize, mass: f64) -> f64 {
        match self.function_index(bin) {
            None => 1.0,
            Some(idx) => {
                let function = &self.functions()[idx];
                let offset = self.offsets[idx];
                let parameters = parameters.slice(s![offset..offset + function.nr_parameters()]);
                function.function().eval(mass, parameters)
            }
        }
    }

    /// Factor at `mass` in `bin`, one if there is no final-state mass dependence
    ///
    /// `parameters` is the row of the fsmd in the [crate::ParameterSpace].
    #[inline]
    pub fn value(
        &self,
        parameters: ArrayView1<f64>,
        bin: usize,
        mass: f64,
        idx_mass: Option<usize>,
    ) -> f64 {
        if let (Some(cache), Some(idx_mass)) = (&self.cache, idx_mass) {
            return cache[bin][idx_mass];
        }
        self.eval(parameters, bin, mass)
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }
}
