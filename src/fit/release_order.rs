use crate::error::{ConfigurationError, ConfigurationErrorReason};
use crate::fit::mapping::Target;
use crate::model::Model;

use std::fmt;
use tracing::debug;

/// Group of parameters released by one word of a release stage
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseToken {
    /// All free couplings
    Coupling,
    /// All free branchings
    Branching,
    /// Parameters of this name in all components and in the final-state mass dependence
    Parameter(String),
    /// Parameter of a single component, written as `component::parameter`
    ComponentParameter { component: String, parameter: String },
}

impl ReleaseToken {
    pub fn parse(token: &str) -> Self {
        match token {
            "coupling" => Self::Coupling,
            "branching" => Self::Branching,
            _ => match token.split_once("::") {
                Some((component, parameter)) => Self::ComponentParameter {
                    component: component.to_owned(),
                    parameter: parameter.to_owned(),
                },
                None => Self::Parameter(token.to_owned()),
            },
        }
    }

    /// Does the token release `target`?
    pub fn releases(&self, target: &Target, model: &Model) -> bool {
        match (self, target) {
            (Self::Coupling, Target::Coupling { .. }) => true,
            (Self::Branching, Target::Branching { .. }) => true,
            (Self::Parameter(name), &Target::Parameter { component, parameter }) => {
                target_parameter_name(model, component, parameter) == name.as_str()
            }
            (
                Self::ComponentParameter {
                    component: component_name,
                    parameter: parameter_name,
                },
                &Target::Parameter { component, parameter },
            ) => {
                component < model.nr_components()
                    && model.component(component).name() == component_name.as_str()
                    && model.component(component).parameter(parameter).name()
                        == parameter_name.as_str()
            }
            _ => false,
        }
    }

    /// Does the model contain anything this token addresses?
    fn is_known(&self, model: &Model) -> bool {
        match self {
            Self::Coupling | Self::Branching => true,
            Self::Parameter(name) => {
                model
                    .components()
                    .iter()
                    .flat_map(|c| c.parameters())
                    .chain(model.fsmd().parameters())
                    .any(|p| p.name() == name.as_str())
            }
            Self::ComponentParameter {
                component,
                parameter,
            } => model
                .component_by_name(component)
                .is_some_and(|c| c.parameters().iter().any(|p| p.name() == parameter.as_str())),
        }
    }
}

impl fmt::Display for ReleaseToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coupling => f.write_str("coupling"),
            Self::Branching => f.write_str("branching"),
            Self::Parameter(name) => f.write_str(name),
            Self::ComponentParameter {
                component,
                parameter,
            } => write!(f, "{component}::{parameter}"),
        }
    }
}

fn target_parameter_name(model: &Model, component: usize, parameter: usize) -> &str {
    if component < model.nr_components() {
        model.component(component).parameter(parameter).name()
    } else {
        model
            .fsmd()
            .parameters()
            .nth(parameter)
            .map_or("", |p| p.name())
    }
}

/// Stages in which parameters are released during a fit
///
/// Every stage releases its tokens in addition to the tokens of all previous stages. Fixed
/// parameters are never released.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReleaseOrder {
    stages: Vec<Vec<ReleaseToken>>,
}

impl ReleaseOrder {
    /// A single stage releasing every free parameter
    pub fn all_at_once() -> Self {
        Self { stages: vec![] }
    }

    /// Parse stages of whitespace-separated tokens, every token has to match the model
    pub fn new(stages: &[String], model: &Model) -> Result<Self, ConfigurationError> {
        if stages.is_empty() {
            return Err(ConfigurationError::new(
                "freeparameters",
                ConfigurationErrorReason::EmptyFreeParameters,
            ));
        }
        let stages = stages
            .iter()
            .enumerate()
            .map(|(idx, stage)| {
                let tokens: Vec<_> = stage.split_whitespace().map(ReleaseToken::parse).collect();
                if let Some(unknown) = tokens.iter().find(|token| !token.is_known(model)) {
                    return Err(ConfigurationError::new(
                        format!("freeparameters[{idx}]"),
                        ConfigurationErrorReason::UnknownFreeParameter(unknown.to_string()),
                    ));
                }
                debug!("release stage {idx}: '{stage}'");
                Ok(tokens)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { stages })
    }

    pub fn is_all_at_once(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn nr_stages(&self) -> usize {
        self.stages.len().max(1)
    }

    /// Tokens released up to and including `stage`
    pub fn released(&self, stage: usize) -> impl Iterator<Item = &ReleaseToken> + '_ {
        self.stages[..=stage].iter().flatten()
    }

    /// Is `target` free in `stage`?
    pub fn releases(&self, stage: usize, target: &Target, model: &Model) -> bool {
        self.is_all_at_once() || self.released(stage).any(|token| token.releases(target, model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tests::*;

    fn stages(stages: &[&str]) -> Vec<String> {
        stages.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn parse_tokens() {
        assert_eq!(ReleaseToken::parse("coupling"), ReleaseToken::Coupling);
        assert_eq!(ReleaseToken::parse("branching"), ReleaseToken::Branching);
        assert_eq!(
            ReleaseToken::parse("width"),
            ReleaseToken::Parameter("width".into())
        );
        assert_eq!(
            ReleaseToken::parse("a1::mass"),
            ReleaseToken::ComponentParameter {
                component: "a1".into(),
                parameter: "mass".into()
            }
        );
    }

    #[test]
    fn stages_accumulate() {
        let (_, model, _) = scenario_c();
        let order = ReleaseOrder::new(&stages(&["coupling", "a1::mass  width"]), &model).unwrap();
        assert_eq!(order.nr_stages(), 2);
        assert_eq!(order.released(0).count(), 1);
        assert_eq!(order.released(1).count(), 3);

        let mass = Target::Parameter {
            component: 0,
            parameter: 0,
        };
        let width = Target::Parameter {
            component: 0,
            parameter: 1,
        };
        assert!(!order.releases(0, &mass, &model));
        assert!(order.releases(1, &mass, &model));
        assert!(order.releases(1, &width, &model));
    }

    #[test]
    fn all_at_once() {
        let (_, model, _) = scenario_c();
        let order = ReleaseOrder::all_at_once();
        assert_eq!(order.nr_stages(), 1);
        let scale = Target::Parameter {
            component: 1,
            parameter: 0,
        };
        assert!(order.releases(0, &scale, &model));
    }

    #[test]
    fn unknown_tokens() {
        let (_, model, _) = scenario_c();
        let err = ReleaseOrder::new(&stages(&["coupling mass", "m0"]), &model).unwrap_err();
        assert_eq!(err.path, "freeparameters[1]");
        assert_eq!(
            err.reason,
            ConfigurationErrorReason::UnknownFreeParameter("m0".into())
        );

        let err = ReleaseOrder::new(&stages(&["bkg::mass"]), &model).unwrap_err();
        assert_eq!(
            err.reason,
            ConfigurationErrorReason::UnknownFreeParameter("bkg::mass".into())
        );

        let err = ReleaseOrder::new(&[], &model).unwrap_err();
        assert_eq!(err.reason, ConfigurationErrorReason::EmptyFreeParameters);
    }
}
