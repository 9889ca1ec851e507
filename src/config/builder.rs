use crate::components::{
    BreakupShape, Channel, Component, ConstantBackground, DecayChannel, DynamicWidthBreitWigner,
    ExponentialBackground, ExponentialBackgroundIntegral, FixedWidthBreitWigner,
    IntegralDecayChannel, IntegralWidthBreitWigner, Lineshape, LineshapeKind, LineshapeTrait,
    TPrimeDependentBackground, TPrimeDependentBackgroundIntegral,
};
use crate::config::{
    ComponentConfig, DecayChannelConfig, FitConfig, FsmdConfig, FsmdFunctionConfig,
    InputConfig, ParameterConfig,
};
use crate::data::Data;
use crate::error::{ConfigurationError, ConfigurationErrorReason};
use crate::fit::ReleaseOrder;
use crate::fsmd::{Fsmd, FsmdFunction, FsmdKind, MassFunctionTrait};
use crate::input::{Input, InputBin, InputWave};
use crate::model::Model;
use crate::parameter::Parameter;
use crate::parameter_space::ParameterSpace;
use crate::tabulated_curve::TabulatedCurve;

use num_complex::Complex64;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// How the anchor coupling of every bin is constrained
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum AnchorConvention {
    /// Imaginary part fixed to zero, real part free
    #[default]
    RealValued,
    /// Fixed to `(1, 0)`
    Unit,
}

/// Options of a fit which are not part of its configuration tree
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FitOptions {
    /// Share couplings between channels of the same quantum numbers and fit branchings
    pub use_branchings: bool,
    pub anchor: AnchorConvention,
}

/// Everything a fit needs, built from a [FitConfig]
#[derive(Clone, Debug, PartialEq)]
pub struct FitSetup {
    pub input: Input,
    pub model: Model,
    /// Start values
    pub parameters: ParameterSpace,
    /// Start errors of the scalar parameters, couplings and branchings are zero
    pub parameter_errors: ParameterSpace,
    pub release_order: ReleaseOrder,
    pub options: FitOptions,
}

fn at(path: impl Into<String>) -> impl FnOnce(ConfigurationErrorReason) -> ConfigurationError {
    let path = path.into();
    move |reason| ConfigurationError::new(path, reason)
}

fn mandatory<T>(value: Option<T>, path: &str, field: &str) -> Result<T, ConfigurationError> {
    value.ok_or_else(|| {
        ConfigurationError::new(
            format!("{path}.{field}"),
            ConfigurationErrorReason::MissingField(field.to_owned()),
        )
    })
}

fn curve(pairs: &[[f64; 2]], path: &str) -> Result<TabulatedCurve, ConfigurationError> {
    TabulatedCurve::from_pairs(pairs).map_err(|err| at(format!("{path}.integral"))(err.into()))
}

impl FitConfig {
    /// Validate the configuration and build the model with its initial parameter space
    ///
    /// `data` has to follow the bins and wave lists of the `input` section. Nothing is returned
    /// unless every check passes.
    pub fn build(&self, data: &Data, options: FitOptions) -> Result<FitSetup, ConfigurationError> {
        let input = build_input(&self.input, data)?;
        debug!("read {} bins", input.nr_bins());

        let components = self
            .model
            .components
            .iter()
            .enumerate()
            .map(|(id, config)| build_component(id, config, &input, data, options))
            .collect::<Result<Vec<_>, _>>()?;

        let fsmd = build_fsmd(
            self.model.final_state_mass_dependence.as_ref(),
            components.len(),
            data,
        )?;

        let anchors = self
            .model
            .anchorwave
            .iter()
            .map(|[wave, component]| (wave.clone(), component.clone()))
            .collect();
        let model = Model::new(&input, components, fsmd, anchors)?;

        let (parameters, parameter_errors) = initial_values(&model, &self.model.components, options)?;

        let release_order = match &self.free_parameters {
            Some(stages) => ReleaseOrder::new(stages, &model)?,
            None => {
                warn!("no release order of parameters given, releasing all at once");
                ReleaseOrder::all_at_once()
            }
        };

        Ok(FitSetup {
            input,
            model,
            parameters,
            parameter_errors,
            release_order,
            options,
        })
    }
}

fn build_input(configs: &[InputConfig], data: &Data) -> Result<Input, ConfigurationError> {
    if configs.len() != data.nr_bins() {
        return Err(ConfigurationError::new(
            "input",
            ConfigurationErrorReason::DataShapeMismatch(format!(
                "{} bins configured, data has {}",
                configs.len(),
                data.nr_bins()
            )),
        ));
    }
    let bins = configs
        .iter()
        .enumerate()
        .map(|(idx_bin, config)| {
            let path = format!("input[{idx_bin}]");
            if !config.t_prime_mean.is_finite() {
                return Err(ConfigurationError::new(
                    format!("{path}.tPrimeMean"),
                    ConfigurationErrorReason::InvalidValue(format!(
                        "mean t' {} is not finite",
                        config.t_prime_mean
                    )),
                ));
            }
            if !(config.rescale_errors > 0.0 && config.rescale_errors.is_finite()) {
                return Err(ConfigurationError::new(
                    format!("{path}.rescaleErrors"),
                    ConfigurationErrorReason::InvalidValue(format!(
                        "error scale {} is not a positive number",
                        config.rescale_errors
                    )),
                ));
            }
            let data_waves = data.bin(idx_bin).nr_waves();
            if config.waves.len() != data_waves {
                return Err(ConfigurationError::new(
                    format!("{path}.waves"),
                    ConfigurationErrorReason::DataShapeMismatch(format!(
                        "{} waves configured, data has {}",
                        config.waves.len(),
                        data_waves
                    )),
                ));
            }
            let waves = config
                .waves
                .iter()
                .map(|w| InputWave::new(&w.name, (w.mass_lower, w.mass_upper)))
                .collect();
            debug!(
                "bin {idx_bin} from '{}' with {} waves",
                config.name,
                config.waves.len()
            );
            Ok(InputBin::new(
                &config.name,
                waves,
                config.t_prime_mean,
                config.rescale_errors,
                config.systematics.clone(),
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Input::new(bins)
}

fn build_parameter(
    name: &str,
    config: &ParameterConfig,
) -> Result<Parameter, ConfigurationErrorReason> {
    if !config.val.is_finite() {
        return Err(ConfigurationErrorReason::InvalidValue(format!(
            "start value {} of '{name}' is not finite",
            config.val
        )));
    }
    let error = match &config.error {
        Some(error) => error.value().ok_or_else(|| {
            ConfigurationErrorReason::InvalidValue(format!("error of '{name}' is not a number"))
        })?,
        None => 0.0,
    };
    let mut parameter = Parameter::new(name)
        .with_start_value(config.val)
        .with_fixed(config.fix)
        .with_limits(config.lower, config.upper);
    parameter.set_start_error(error);
    parameter.set_step(config.step.unwrap_or_else(Parameter::default_step));
    parameter.validate()?;
    Ok(parameter)
}

/// Parameters in the order of `names`, every name is mandatory
fn read_parameters<'a>(
    names: impl IntoIterator<Item = &'a str>,
    configs: &BTreeMap<String, ParameterConfig>,
    path: &str,
) -> Result<Vec<Parameter>, ConfigurationError> {
    let names: Vec<_> = names.into_iter().collect();
    for unused in configs.keys().filter(|key| !names.contains(&key.as_str())) {
        warn!("parameter '{unused}' of {path} is not used");
    }
    names
        .into_iter()
        .map(|name| {
            let config = mandatory(configs.get(name), path, name)?;
            build_parameter(name, config).map_err(at(format!("{path}.{name}")))
        })
        .collect()
}

/// Static decay channel descriptions of the lineshape with their paths
fn width_channels<'a>(
    config: &'a ComponentConfig,
    path: &'a str,
) -> impl Iterator<Item = (String, &'a DecayChannelConfig)> + 'a {
    let fitted = config
        .decaychannels
        .iter()
        .enumerate()
        .map(move |(idx, dc)| (format!("{path}.decaychannels[{idx}]"), dc));
    let extra = config
        .extradecaychannels
        .iter()
        .enumerate()
        .map(move |(idx, dc)| (format!("{path}.extradecaychannels[{idx}]"), dc));
    fitted.chain(extra)
}

fn check_branching_ratios<'a>(
    ratios: impl IntoIterator<Item = &'a f64>,
    path: &str,
) -> Result<(), ConfigurationError> {
    let mut sum = 0.0;
    for &ratio in ratios {
        if !(ratio >= 0.0 && ratio.is_finite()) {
            return Err(ConfigurationError::new(
                path,
                ConfigurationErrorReason::InvalidValue(format!(
                    "branching ratio {ratio} is not a non-negative number"
                )),
            ));
        }
        sum += ratio;
    }
    if sum > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::new(
            path,
            ConfigurationErrorReason::InvalidValue("branching ratios sum up to zero".into()),
        ))
    }
}

fn breakup_shape(config: &ComponentConfig, path: &str) -> Result<BreakupShape, ConfigurationError> {
    let m_isobar1 = mandatory(config.m_isobar1, path, "mIsobar1")?;
    let m_isobar2 = mandatory(config.m_isobar2, path, "mIsobar2")?;
    let rel_angular_mom = config.rel_angular_mom.unwrap_or_else(|| {
        let default = BreakupShape::default_rel_angular_mom();
        info!("{path}: 'relAngularMom' not given, using {default}");
        default
    });
    let exponent = config.exponent.unwrap_or_else(|| {
        let default = BreakupShape::default_exponent();
        info!("{path}: 'exponent' not given, using {default}");
        default
    });
    Ok(BreakupShape::new(m_isobar1, m_isobar2)
        .with_rel_angular_mom(rel_angular_mom)
        .with_exponent(exponent))
}

fn build_lineshape(
    kind: LineshapeKind,
    config: &ComponentConfig,
    input: &Input,
    path: &str,
) -> Result<Lineshape, ConfigurationError> {
    let t_prime_means = || -> Vec<f64> { input.bins().iter().map(InputBin::t_prime_mean).collect() };
    let lineshape = match kind {
        LineshapeKind::FixedWidthBreitWigner => FixedWidthBreitWigner::new().into(),
        LineshapeKind::DynamicWidthBreitWigner => {
            let channels = width_channels(config, path)
                .map(|(path, dc)| -> Result<_, ConfigurationError> {
                    Ok(DecayChannel::new(
                        mandatory(dc.branching_ratio, &path, "branchingRatio")?,
                        mandatory(dc.rel_angular_mom, &path, "relAngularMom")?,
                        mandatory(dc.m_isobar1, &path, "mIsobar1")?,
                        mandatory(dc.m_isobar2, &path, "mIsobar2")?,
                    ))
                })
                .collect::<Result<Vec<_>, _>>()?;
            check_branching_ratios(channels.iter().map(|c| &c.branching_ratio), path)?;
            DynamicWidthBreitWigner::new(channels).into()
        }
        LineshapeKind::IntegralWidthBreitWigner => {
            let channels = width_channels(config, path)
                .map(|(path, dc)| -> Result<_, ConfigurationError> {
                    let branching_ratio = mandatory(dc.branching_ratio, &path, "branchingRatio")?;
                    let integral = mandatory(dc.integral.as_deref(), &path, "integral")?;
                    Ok(IntegralDecayChannel::new(
                        branching_ratio,
                        curve(integral, &path)?,
                    ))
                })
                .collect::<Result<Vec<_>, _>>()?;
            check_branching_ratios(channels.iter().map(|c| &c.branching_ratio), path)?;
            IntegralWidthBreitWigner::new(channels).into()
        }
        LineshapeKind::ConstantBackground => ConstantBackground::new().into(),
        LineshapeKind::ExponentialBackground => {
            ExponentialBackground::new(breakup_shape(config, path)?).into()
        }
        LineshapeKind::TPrimeDependentBackground => {
            TPrimeDependentBackground::new(breakup_shape(config, path)?, t_prime_means()).into()
        }
        LineshapeKind::ExponentialBackgroundIntegral => {
            let integral = mandatory(config.integral.as_deref(), path, "integral")?;
            let exponent = mandatory(config.exponent, path, "exponent")?;
            ExponentialBackgroundIntegral::new(curve(integral, path)?, exponent).into()
        }
        LineshapeKind::TPrimeDependentBackgroundIntegral => {
            let integral = mandatory(config.integral.as_deref(), path, "integral")?;
            let exponent = mandatory(config.exponent, path, "exponent")?;
            TPrimeDependentBackgroundIntegral::new(
                curve(integral, path)?,
                exponent,
                t_prime_means(),
            )
            .into()
        }
    };
    Ok(lineshape)
}

fn build_component(
    id: usize,
    config: &ComponentConfig,
    input: &Input,
    data: &Data,
    options: FitOptions,
) -> Result<Component, ConfigurationError> {
    let path = format!("model.components[{id}]");

    let kind = match &config.kind {
        Some(name) => LineshapeKind::from_name(name).ok_or_else(|| {
            ConfigurationError::new(
                format!("{path}.type"),
                ConfigurationErrorReason::UnknownComponentType(name.clone()),
            )
        })?,
        None => LineshapeKind::default(),
    };
    debug!("reading component '{}' of type '{kind}'", config.name);

    let parameters = read_parameters(
        kind.parameter_names().iter().copied(),
        &config.parameters,
        &path,
    )?;

    if config.decaychannels.is_empty() {
        return Err(ConfigurationError::new(
            format!("{path}.decaychannels"),
            ConfigurationErrorReason::InvalidValue(format!(
                "component '{}' has no decay channels",
                config.name
            )),
        ));
    }
    let channels = config
        .decaychannels
        .iter()
        .enumerate()
        .map(|(idx, dc)| -> Result<_, ConfigurationError> {
            let wave_indices = input.wave_indices(&dc.amp).ok_or_else(|| {
                ConfigurationError::new(
                    format!("{path}.decaychannels[{idx}].amp"),
                    ConfigurationErrorReason::UnknownWave {
                        wave: dc.amp.clone(),
                        component: config.name.clone(),
                    },
                )
            })?;
            Ok(Channel::new(&dc.amp, wave_indices, data))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let lineshape = build_lineshape(kind, config, input, &path)?;

    let component = Component::new(
        id,
        config.name.as_str(),
        parameters,
        channels,
        lineshape,
        options.use_branchings,
    )
    .map_err(at(format!("{path}.decaychannels")))?;

    if let Some((lower, upper)) = component.mass_range() {
        component
            .lineshape()
            .validate_domain(component.parameters(), lower, upper)
            .map_err(at(path.as_str()))?;
    }
    debug!(
        "component '{}' has {} channels, {} couplings and {} branchings",
        component.name(),
        component.nr_channels(),
        component.nr_couplings(),
        component.nr_branchings()
    );
    Ok(component)
}

fn build_fsmd_function(
    config: &FsmdFunctionConfig,
    path: &str,
) -> Result<FsmdFunction, ConfigurationError> {
    let names = config.formula.parameter_names();
    let parameters = read_parameters(names.iter().map(String::as_str), &config.parameters, path)?;
    FsmdFunction::new(config.formula.clone(), parameters).map_err(at(path))
}

fn build_fsmd(
    config: Option<&FsmdConfig>,
    id: usize,
    data: &Data,
) -> Result<Fsmd, ConfigurationError> {
    const PATH: &str = "model.finalStateMassDependence";
    let kind = match config {
        None => {
            debug!("no final-state mass dependence");
            FsmdKind::None
        }
        Some(FsmdConfig::Global(function)) => {
            debug!("global final-state mass dependence");
            FsmdKind::Global(build_fsmd_function(function, PATH)?)
        }
        Some(FsmdConfig::PerBin(functions)) => {
            debug!("final-state mass dependence for each of {} bins", functions.len());
            FsmdKind::PerBin(
                functions
                    .iter()
                    .enumerate()
                    .map(|(bin, function)| build_fsmd_function(function, &format!("{PATH}[{bin}]")))
                    .collect::<Result<_, _>>()?,
            )
        }
    };
    Fsmd::new(id, kind, data).map_err(at(PATH))
}

/// Start values and start errors of all parameters
fn initial_values(
    model: &Model,
    configs: &[ComponentConfig],
    options: FitOptions,
) -> Result<(ParameterSpace, ParameterSpace), ConfigurationError> {
    let (nr_components, nr_channels, nr_parameters, nr_bins) = model.parameter_space_shape();
    let mut values = ParameterSpace::with_shape(nr_components, nr_channels, nr_parameters, nr_bins);
    let mut errors = values.clone();

    for (component, config) in model.components().iter().zip(configs) {
        let id = component.id();
        let path = format!("model.components[{id}]");

        for (idx, parameter) in component.parameters().iter().enumerate() {
            values.set_parameter(id, idx, parameter.start_value());
            errors.set_parameter(id, idx, parameter.start_error());
        }

        for coupling in 0..component.nr_couplings() {
            let master = component.map_coupling_to_master_channel(coupling);
            let bins = component.channel(master).bins();
            let given = &config.decaychannels[master].couplings;
            if given.len() != bins.len() {
                return Err(ConfigurationError::new(
                    format!("{path}.decaychannels[{master}].couplings"),
                    ConfigurationErrorReason::CouplingCountMismatch {
                        actual: given.len(),
                        expected: bins.len(),
                    },
                ));
            }
            for (&bin, &[re, im]) in bins.iter().zip(given) {
                values.set_coupling(id, coupling, bin, Complex64::new(re, im));
            }
        }
        for (idx, dc) in config.decaychannels.iter().enumerate() {
            if !component.coupling_groups().is_master(idx) && !dc.couplings.is_empty() {
                debug!("{path}.decaychannels[{idx}]: couplings of a shared coupling are ignored");
            }
        }

        for branching in 0..component.nr_branchings() {
            let master = component.map_branching_to_master_channel(branching);
            let given = config.decaychannels[master].branching;
            let value = if component.is_branching_fixed(branching) {
                if options.use_branchings && given.is_some_and(|b| b != [1.0, 0.0]) {
                    warn!(
                        "{path}.decaychannels[{master}]: branching is fixed, forcing it to (1, 0)"
                    );
                }
                Complex64::new(1.0, 0.0)
            } else {
                let path = format!("{path}.decaychannels[{master}]");
                let [re, im] = mandatory(given, &path, "branching")?;
                Complex64::new(re, im)
            };
            values.set_branching(id, branching, value);
        }
    }

    let fsmd = model.fsmd();
    for (idx, parameter) in fsmd.parameters().enumerate() {
        values.set_parameter(fsmd.id(), idx, parameter.start_value());
        errors.set_parameter(fsmd.id(), idx, parameter.start_error());
    }

    for bin in 0..model.nr_bins() {
        let anchor = *model.anchor(bin);
        let coupling = values.coupling(anchor.component, anchor.coupling, bin);
        let forced = match options.anchor {
            AnchorConvention::RealValued => Complex64::new(coupling.re, 0.0),
            AnchorConvention::Unit => Complex64::new(1.0, 0.0),
        };
        if forced != coupling {
            warn!(
                "anchor coupling of bin {bin} is {coupling}, forcing it to {forced} ({:?})",
                options.anchor
            );
            values.set_coupling(anchor.component, anchor.coupling, bin, forced);
        }
    }

    Ok((values, errors))
}

#[allow(clippy::float_cmp)]
#[cfg(test)]
mod tests {
    use super::*;

    use crate::tests::*;

    use approx::assert_abs_diff_eq;

    fn scenario_c_config() -> FitConfig {
        serde_json::from_str(SCENARIO_C_CONFIG).unwrap()
    }

    fn scenario_c_data() -> Data {
        single_bin(&SCENARIO_C_WAVES).1
    }

    fn build_err(config: &FitConfig, data: &Data) -> ConfigurationError {
        config.build(data, FitOptions::default()).unwrap_err()
    }

    #[test]
    fn build_scenario_c() {
        let setup = scenario_c_config()
            .build(&scenario_c_data(), FitOptions::default())
            .unwrap();
        let model = &setup.model;
        assert_eq!(model.nr_components(), 2);
        assert_eq!(model.component(0).kind(), LineshapeKind::FixedWidthBreitWigner);
        assert_eq!(model.component(1).kind(), LineshapeKind::ConstantBackground);
        assert_eq!(model.anchor_component_name(0), "a1");
        assert_eq!(setup.input.bin(0).wave(0).mass_limits(), (1.0, 2.0));

        let a1 = model.component(0);
        assert_eq!(a1.parameter(0).limit_lower(), Some(1.0));
        assert_eq!(a1.parameter(0).step(), 0.001);
        assert_eq!(a1.parameter(1).step(), Parameter::default_step());
        assert_eq!(setup.parameters.parameter(0, 0), 1.26);
        assert_eq!(setup.parameter_errors.parameter(0, 1), 0.05);
        assert!(setup.parameter_errors.parameter(1, 0).is_nan());

        assert_eq!(setup.parameters.coupling(1, 1, 0), Complex64::new(-0.5, 0.1));
        assert_eq!(setup.parameters.branching(1, 1), Complex64::new(1.0, 0.0));
        assert!(setup.release_order.is_all_at_once());
    }

    #[test]
    fn built_model_evaluates_like_fixture() {
        let setup = scenario_c_config()
            .build(&scenario_c_data(), FitOptions::default())
            .unwrap();
        let (_, model, space) = scenario_c();
        for wave in 0..2 {
            for (idx_mass, &mass) in MASS_BIN_CENTERS.iter().enumerate() {
                let expected = model.production_amplitude(&space, 0, wave, mass, Some(idx_mass));
                let actual =
                    setup
                        .model
                        .production_amplitude(&setup.parameters, 0, wave, mass, Some(idx_mass));
                assert_abs_diff_eq!(actual.re, expected.re, epsilon = 1e-14);
                assert_abs_diff_eq!(actual.im, expected.im, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn anchor_convention() {
        let mut config = scenario_c_config();
        config.model.components[0].decaychannels[0].couplings = vec![[2.0, 0.5]];
        let data = scenario_c_data();

        let setup = config.build(&data, FitOptions::default()).unwrap();
        assert_eq!(setup.parameters.coupling(0, 0, 0), Complex64::new(2.0, 0.0));

        let options = FitOptions {
            anchor: AnchorConvention::Unit,
            ..FitOptions::default()
        };
        let setup = config.build(&data, options).unwrap();
        assert_eq!(setup.parameters.coupling(0, 0, 0), Complex64::new(1.0, 0.0));
    }

    #[test]
    fn unknown_wave() {
        let mut config = scenario_c_config();
        config.model.components[1].decaychannels[1].amp = "1-0-+0+f0_00_pi-".into();
        let err = build_err(&config, &scenario_c_data());
        assert_eq!(err.path, "model.components[1].decaychannels[1].amp");
        assert_eq!(
            err.reason,
            ConfigurationErrorReason::UnknownWave {
                wave: "1-0-+0+f0_00_pi-".into(),
                component: "bkg".into()
            }
        );
    }

    #[test]
    fn unknown_component_type() {
        let mut config = scenario_c_config();
        config.model.components[1].kind = Some("flatBackground".into());
        let err = build_err(&config, &scenario_c_data());
        assert_eq!(err.path, "model.components[1].type");
        assert_eq!(
            err.reason,
            ConfigurationErrorReason::UnknownComponentType("flatBackground".into())
        );
    }

    #[test]
    fn duplicate_component() {
        let mut config = scenario_c_config();
        config.model.components[1].name = "a1".into();
        let err = build_err(&config, &scenario_c_data());
        assert_eq!(err.path, "model.components[1].name");
        assert_eq!(
            err.reason,
            ConfigurationErrorReason::DuplicateComponent("a1".into())
        );
    }

    #[test]
    fn missing_parameter() {
        let mut config = scenario_c_config();
        config.model.components[0].parameters.remove("width");
        let err = build_err(&config, &scenario_c_data());
        assert_eq!(err.path, "model.components[0].width");
        assert_eq!(
            err.reason,
            ConfigurationErrorReason::MissingField("width".into())
        );
    }

    #[test]
    fn invalid_bounds() {
        let mut config = scenario_c_config();
        let mass = config.model.components[0].parameters.get_mut("mass").unwrap();
        mass.lower = Some(2.0);
        let err = build_err(&config, &scenario_c_data());
        assert_eq!(err.path, "model.components[0].mass");
        assert_eq!(
            err.reason,
            ConfigurationErrorReason::InvalidBounds {
                lower: 2.0,
                upper: 1.5
            }
        );
    }

    #[test]
    fn coupling_count() {
        let mut config = scenario_c_config();
        config.model.components[1].decaychannels[0]
            .couplings
            .push([1.0, 0.0]);
        let err = build_err(&config, &scenario_c_data());
        assert_eq!(err.path, "model.components[1].decaychannels[0].couplings");
        assert_eq!(
            err.reason,
            ConfigurationErrorReason::CouplingCountMismatch {
                actual: 2,
                expected: 1
            }
        );
    }

    #[test]
    fn anchor_count() {
        let mut config = scenario_c_config();
        config
            .model
            .anchorwave
            .push(["1-1++0+rho770_01_pi-".into(), "a1".into()]);
        let err = build_err(&config, &scenario_c_data());
        assert_eq!(err.path, "model.anchorwave");
        assert_eq!(
            err.reason,
            ConfigurationErrorReason::AnchorCountMismatch {
                actual: 2,
                expected: 1
            }
        );
    }

    #[test]
    fn data_shape() {
        let err = build_err(&scenario_c_config(), &unit_data(&[&["a"]]));
        assert_eq!(err.path, "input[0].waves");
        assert!(matches!(
            err.reason,
            ConfigurationErrorReason::DataShapeMismatch(_)
        ));

        let err = build_err(&scenario_c_config(), &unit_data(&[]));
        assert_eq!(err.path, "input");
    }

    #[test]
    fn dynamic_width_needs_channel_statics() {
        let json = r#"{
            "input": [{"name": "bin0", "tPrimeMean": 0.2, "waves": [{"name": "1-1++0+rho770_01_pi-"}]}],
            "model": {
                "anchorwave": [["1-1++0+rho770_01_pi-", "a1"]],
                "components": [{
                    "name": "a1",
                    "type": "dynamicWidthBreitWigner",
                    "mass": {"val": 1.26, "fix": false},
                    "width": {"val": 0.4, "fix": false},
                    "decaychannels": [{
                        "amp": "1-1++0+rho770_01_pi-",
                        "couplings": [[1.0, 0.0]],
                        "branchingRatio": 1.0,
                        "relAngularMom": 0,
                        "mIsobar1": 0.775
                    }]
                }]
            }
        }"#;
        let config: FitConfig = serde_json::from_str(json).unwrap();
        let data = unit_data(&[&["1-1++0+rho770_01_pi-"]]);
        let err = build_err(&config, &data);
        assert_eq!(err.path, "model.components[0].decaychannels[0].mIsobar2");
        assert_eq!(
            err.reason,
            ConfigurationErrorReason::MissingField("mIsobar2".into())
        );

        let mut config = config;
        config.model.components[0].decaychannels[0].m_isobar2 = Some(0.13957);
        let setup = config.build(&data, FitOptions::default()).unwrap();
        assert_eq!(
            setup.model.component(0).kind(),
            LineshapeKind::DynamicWidthBreitWigner
        );
    }

    #[test]
    fn exponential_background_defaults() {
        let json = r#"{
            "input": [
                {"name": "bin0", "tPrimeMean": 0.2, "waves": [{"name": "1-1++0+rho770_01_pi-"}]},
                {"name": "bin1", "tPrimeMean": 0.5, "waves": [{"name": "1-1++0+rho770_01_pi-"}]}
            ],
            "model": {
                "anchorwave": [["1-1++0+rho770_01_pi-", "bkg"], ["1-1++0+rho770_01_pi-", "bkg"]],
                "components": [{
                    "name": "bkg",
                    "type": "tPrimeDependentBackground",
                    "mIsobar1": 0.775,
                    "mIsobar2": 0.13957,
                    "m0": {"val": 0.0, "fix": true},
                    "g": {"val": 2.0, "fix": false},
                    "decaychannels": [{"amp": "1-1++0+rho770_01_pi-", "couplings": [[1.0, 0.0], [0.5, 0.0]]}]
                }]
            },
            "freeparameters": ["coupling", "g"]
        }"#;
        let config: FitConfig = serde_json::from_str(json).unwrap();
        let data = unit_data(&[&["1-1++0+rho770_01_pi-"], &["1-1++0+rho770_01_pi-"]]);
        let setup = config.build(&data, FitOptions::default()).unwrap();
        match setup.model.component(0).lineshape() {
            Lineshape::TPrimeDependentBackground(bkg) => {
                assert_eq!(bkg.shape().rel_angular_mom, 0);
                assert_eq!(bkg.shape().exponent, 2.0);
                assert_eq!(bkg.t_prime_means(), [0.2, 0.5]);
            }
            lineshape => panic!("unexpected lineshape {lineshape:?}"),
        }
        assert_eq!(setup.parameters.coupling(0, 0, 1), Complex64::new(0.5, 0.0));
        assert_eq!(setup.release_order.nr_stages(), 2);
    }

    #[test]
    fn integral_domain() {
        let json = r#"{
            "input": [{"name": "bin0", "tPrimeMean": 0.2, "waves": [{"name": "1-1++0+rho770_01_pi-"}]}],
            "model": {
                "anchorwave": [["1-1++0+rho770_01_pi-", "bkg"]],
                "components": [{
                    "name": "bkg",
                    "type": "exponentialBackgroundIntegral",
                    "integral": [[1.2, 0.0], [2.5, 1.0]],
                    "exponent": 2.0,
                    "g": {"val": 1.0, "fix": false},
                    "decaychannels": [{"amp": "1-1++0+rho770_01_pi-", "couplings": [[1.0, 0.0]]}]
                }]
            }
        }"#;
        let config: FitConfig = serde_json::from_str(json).unwrap();
        let data = unit_data(&[&["1-1++0+rho770_01_pi-"]]);
        let err = build_err(&config, &data);
        assert_eq!(err.path, "model.components[0]");
        assert_eq!(
            err.reason,
            ConfigurationErrorReason::TabulatedCurveDomain {
                curve_lower: 1.2,
                curve_upper: 2.5,
                lower: 1.0,
                upper: 2.0
            }
        );

        let mut config = config;
        config.model.components[0].integral = Some(vec![[1.0, 0.0], [1.0, 1.0]]);
        let err = build_err(&config, &data);
        assert_eq!(err.path, "model.components[0].integral");
        assert_eq!(
            err.reason,
            ConfigurationErrorReason::TabulatedCurve(crate::error::TabulatedCurveError::Unordered)
        );
    }

    #[test]
    fn integral_width_free_mass_limits() {
        let json = r#"{
            "input": [{"name": "bin0", "tPrimeMean": 0.2, "waves": [{"name": "1-1++0+rho770_01_pi-"}]}],
            "model": {
                "anchorwave": [["1-1++0+rho770_01_pi-", "a1"]],
                "components": [{
                    "name": "a1",
                    "type": "integralWidthBreitWigner",
                    "mass": {"val": 1.26, "fix": false},
                    "width": {"val": 0.4, "fix": false},
                    "decaychannels": [{
                        "amp": "1-1++0+rho770_01_pi-",
                        "couplings": [[1.0, 0.0]],
                        "branchingRatio": 1.0,
                        "integral": [[0.5, 0.5], [2.5, 2.5]]
                    }]
                }]
            }
        }"#;
        let mut config: FitConfig = serde_json::from_str(json).unwrap();
        let data = unit_data(&[&["1-1++0+rho770_01_pi-"]]);
        let err = build_err(&config, &data);
        assert_eq!(err.path, "model.components[0]");
        assert_eq!(
            err.reason,
            ConfigurationErrorReason::MissingField("mass.lower".into())
        );

        let mass = config.model.components[0].parameters.get_mut("mass").unwrap();
        mass.lower = Some(1.0);
        mass.upper = Some(3.0);
        let err = build_err(&config, &data);
        assert_eq!(
            err.reason,
            ConfigurationErrorReason::TabulatedCurveDomain {
                curve_lower: 0.5,
                curve_upper: 2.5,
                lower: 1.0,
                upper: 3.0
            }
        );

        config.model.components[0]
            .parameters
            .get_mut("mass")
            .unwrap()
            .upper = Some(1.5);
        let setup = config.build(&data, FitOptions::default()).unwrap();
        let mapping = crate::fit::ParameterMapping::new(&setup.model, AnchorConvention::RealValued);
        assert_eq!(mapping.names()[0], "a1::mass");
        assert_eq!(mapping.bounds()[0], (1.0, 1.5));
    }

    #[test]
    fn branchings() {
        let json = r#"{
            "input": [{"name": "bin0", "tPrimeMean": 0.2, "waves": [
                {"name": "1-1++0+rho770_01_pi-"},
                {"name": "1-1++0+f2_21_pi-"},
                {"name": "1-2-+0+rho770_01_pi-"}
            ]}],
            "model": {
                "anchorwave": [["1-1++0+rho770_01_pi-", "a1"]],
                "components": [{
                    "name": "a1",
                    "mass": {"val": 1.26, "fix": false},
                    "width": {"val": 0.4, "fix": false},
                    "decaychannels": [
                        {"amp": "1-1++0+rho770_01_pi-", "couplings": [[1.0, 0.0]], "branching": [3.0, 1.0]},
                        {"amp": "1-1++0+f2_21_pi-", "branching": [0.5, 0.2]},
                        {"amp": "1-2-+0+rho770_01_pi-", "couplings": [[0.3, 0.1]]}
                    ]
                }]
            }
        }"#;
        let config: FitConfig = serde_json::from_str(json).unwrap();
        let data = unit_data(&[&[
            "1-1++0+rho770_01_pi-",
            "1-1++0+f2_21_pi-",
            "1-2-+0+rho770_01_pi-",
        ]]);
        let options = FitOptions {
            use_branchings: true,
            ..FitOptions::default()
        };
        let setup = config.build(&data, options).unwrap();
        let a1 = setup.model.component(0);
        assert_eq!(a1.nr_couplings(), 2);
        assert_eq!(a1.nr_branchings(), 2);
        assert!(a1.is_branching_fixed(0));
        assert!(!a1.is_branching_fixed(1));
        assert_eq!(setup.parameters.branching(0, 0), Complex64::new(1.0, 0.0));
        assert_eq!(setup.parameters.branching(0, 1), Complex64::new(0.5, 0.2));
        assert_eq!(setup.parameters.coupling(0, 1, 0), Complex64::new(0.3, 0.1));

        let mut config = config;
        config.model.components[0].decaychannels[1].branching = None;
        let err = config.build(&data, options).unwrap_err();
        assert_eq!(err.path, "model.components[0].decaychannels[1].branching");
    }

    #[test]
    fn fsmd() {
        let mut config = scenario_c_config();
        config.model.final_state_mass_dependence = Some(
            serde_json::from_str(
                r#"{"formula": {"Polynomial": {"degree": 1}}, "p0": {"val": 0.5, "fix": true}, "p1": {"val": 1.0, "fix": false, "error": 0.1}}"#,
            )
            .unwrap(),
        );
        let setup = config
            .build(&scenario_c_data(), FitOptions::default())
            .unwrap();
        let fsmd = setup.model.fsmd();
        assert_eq!(fsmd.id(), 2);
        assert_eq!(fsmd.nr_parameters(), 2);
        assert_eq!(setup.parameters.parameter(2, 0), 0.5);
        assert_eq!(setup.parameters.parameter(2, 1), 1.0);
        assert_eq!(setup.parameter_errors.parameter(2, 1), 0.1);

        config.model.final_state_mass_dependence = Some(FsmdConfig::PerBin(vec![]));
        let err = build_err(&config, &scenario_c_data());
        assert_eq!(err.path, "model.finalStateMassDependence");
        assert_eq!(
            err.reason,
            ConfigurationErrorReason::FsmdBinCountMismatch {
                actual: 0,
                expected: 1
            }
        );
    }

    #[test]
    fn release_order_errors() {
        let mut config = scenario_c_config();
        config.free_parameters = Some(vec![]);
        let err = build_err(&config, &scenario_c_data());
        assert_eq!(err.path, "freeparameters");
        assert_eq!(err.reason, ConfigurationErrorReason::EmptyFreeParameters);

        config.free_parameters = Some(vec!["coupling".into(), "a1::mass bkg::width".into()]);
        let err = build_err(&config, &scenario_c_data());
        assert_eq!(err.path, "freeparameters[1]");
        assert_eq!(
            err.reason,
            ConfigurationErrorReason::UnknownFreeParameter("bkg::width".into())
        );
    }
}
