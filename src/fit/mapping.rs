use crate::config::AnchorConvention;
use crate::fsmd::FsmdKind;
use crate::model::Model;
use crate::parameter_space::ParameterSpace;

use num_complex::Complex64;

/// Real or imaginary part of a complex parameter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Part {
    Re,
    Im,
}

impl Part {
    fn get(self, value: Complex64) -> f64 {
        match self {
            Self::Re => value.re,
            Self::Im => value.im,
        }
    }

    fn set(self, value: &mut Complex64, x: f64) {
        match self {
            Self::Re => value.re = x,
            Self::Im => value.im = x,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Re => "re",
            Self::Im => "im",
        }
    }
}

/// [ParameterSpace] cell behind one entry of the optimizer vector
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// Scalar parameter, `component` equal to the number of components addresses the fsmd
    Parameter { component: usize, parameter: usize },
    Coupling {
        component: usize,
        coupling: usize,
        bin: usize,
        part: Part,
    },
    Branching {
        component: usize,
        branching: usize,
        part: Part,
    },
}

impl Target {
    fn get(&self, space: &ParameterSpace) -> f64 {
        match *self {
            Self::Parameter {
                component,
                parameter,
            } => space.parameter(component, parameter),
            Self::Coupling {
                component,
                coupling,
                bin,
                part,
            } => part.get(space.coupling(component, coupling, bin)),
            Self::Branching {
                component,
                branching,
                part,
            } => part.get(space.branching(component, branching)),
        }
    }

    fn set(&self, space: &mut ParameterSpace, x: f64) {
        match *self {
            Self::Parameter {
                component,
                parameter,
            } => space.set_parameter(component, parameter, x),
            Self::Coupling {
                component,
                coupling,
                bin,
                part,
            } => {
                let mut value = space.coupling(component, coupling, bin);
                part.set(&mut value, x);
                space.set_coupling(component, coupling, bin, value);
            }
            Self::Branching {
                component,
                branching,
                part,
            } => {
                let mut value = space.branching(component, branching);
                part.set(&mut value, x);
                space.set_branching(component, branching, value);
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Entry {
    target: Target,
    name: String,
    bounds: (f64, f64),
}

/// Bijection between the optimizer vector and the free cells of a [ParameterSpace]
///
/// The layout is fixed at construction: per component its free scalar parameters, the couplings
/// of its coupling masters for every bin the master is used in and its free branchings, then the
/// free parameters of the final-state mass dependence. Complex values take two entries. Fixed
/// parameters, fixed branchings and the constrained parts of the anchor couplings are left out.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterMapping {
    entries: Vec<Entry>,
}

impl ParameterMapping {
    pub fn new(model: &Model, anchor: AnchorConvention) -> Self {
        let mut entries = vec![];
        for component in model.components() {
            let id = component.id();
            let name = component.name();

            for (idx, parameter) in component.parameters().iter().enumerate() {
                if parameter.fixed() {
                    continue;
                }
                entries.push(Entry {
                    target: Target::Parameter {
                        component: id,
                        parameter: idx,
                    },
                    name: format!("{name}::{}", parameter.name()),
                    bounds: parameter.bounds(),
                });
            }

            for coupling in 0..component.nr_couplings() {
                let master = component.channel(component.map_coupling_to_master_channel(coupling));
                for &bin in master.bins() {
                    let parts: &[Part] = match (model.is_anchor(id, coupling, bin), anchor) {
                        (false, _) => &[Part::Re, Part::Im],
                        (true, AnchorConvention::RealValued) => &[Part::Re],
                        (true, AnchorConvention::Unit) => &[],
                    };
                    for &part in parts {
                        entries.push(Entry {
                            target: Target::Coupling {
                                component: id,
                                coupling,
                                bin,
                                part,
                            },
                            name: format!(
                                "{name}::coupling[{}][{bin}].{}",
                                master.wave_name(),
                                part.suffix()
                            ),
                            bounds: (f64::NEG_INFINITY, f64::INFINITY),
                        });
                    }
                }
            }

            for branching in 0..component.nr_branchings() {
                if component.is_branching_fixed(branching) {
                    continue;
                }
                let master = component.channel(component.map_branching_to_master_channel(branching));
                for part in [Part::Re, Part::Im] {
                    entries.push(Entry {
                        target: Target::Branching {
                            component: id,
                            branching,
                            part,
                        },
                        name: format!(
                            "{name}::branching[{}].{}",
                            master.wave_name(),
                            part.suffix()
                        ),
                        bounds: (f64::NEG_INFINITY, f64::INFINITY),
                    });
                }
            }
        }

        let fsmd = model.fsmd();
        let per_bin = matches!(fsmd.kind(), FsmdKind::PerBin(_));
        for (idx_function, function) in fsmd.functions().iter().enumerate() {
            let prefix = if per_bin {
                format!("fsmd[{idx_function}]")
            } else {
                "fsmd".to_owned()
            };
            for (idx, parameter) in function.parameters().iter().enumerate() {
                if parameter.fixed() {
                    continue;
                }
                entries.push(Entry {
                    target: Target::Parameter {
                        component: fsmd.id(),
                        parameter: fsmd.offset(idx_function) + idx,
                    },
                    name: format!("{prefix}::{}", parameter.name()),
                    bounds: parameter.bounds(),
                });
            }
        }

        Self { entries }
    }

    /// Keep only the entries `predicate` is true for
    pub fn filter(mut self, predicate: impl Fn(&Target) -> bool) -> Self {
        self.entries.retain(|entry| predicate(&entry.target));
        self
    }

    pub fn nr_free(&self) -> usize {
        self.entries.len()
    }

    pub fn targets(&self) -> impl Iterator<Item = &Target> + '_ {
        self.entries.iter().map(|entry| &entry.target)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    /// Lower and upper bound of every entry, infinite where unlimited
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        self.entries.iter().map(|entry| entry.bounds).collect()
    }

    pub fn to_vector(&self, space: &ParameterSpace) -> Vec<f64> {
        self.entries
            .iter()
            .map(|entry| entry.target.get(space))
            .collect()
    }

    /// Write the optimizer vector into `space`, cells not in the mapping are kept
    pub fn apply(&self, x: &[f64], space: &mut ParameterSpace) {
        assert_eq!(
            x.len(),
            self.nr_free(),
            "parameter vector length must match the number of free parameters"
        );
        for (entry, &value) in self.entries.iter().zip(x) {
            entry.target.set(space, value);
        }
    }
}
