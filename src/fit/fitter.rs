use crate::config::FitSetup;
use crate::data::Data;
use crate::error::FitError;
use crate::fit::cost::Chi2Cost;
use crate::fit::mapping::ParameterMapping;
use crate::fit::minimizer::{Minimizer, MinimizerResult, MinimizerTrait};
use crate::parameter_space::ParameterSpace;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use tracing::{debug, info, warn};

/// Result of a staged fit
#[derive(Clone, Debug, PartialEq)]
pub struct FitResult {
    /// Parameter values after the last stage
    pub parameters: ParameterSpace,
    /// χ² at [Self::parameters]
    pub cost: f64,
    /// Every stage converged
    pub success: bool,
    pub nr_evaluations: usize,
    pub nr_data_points: usize,
    /// Number of parameters free in the last stage
    pub nr_free: usize,
    /// Names of the parameters free in the last stage
    pub free_parameter_names: Vec<String>,
    pub stages: Vec<MinimizerResult>,
}

impl FitResult {
    /// χ² per degree of freedom, infinite when there are no degrees of freedom left
    pub fn reduced_chi2(&self) -> f64 {
        match self.nr_data_points.checked_sub(self.nr_free) {
            Some(ndf) if ndf > 0 => self.cost / ndf as f64,
            _ => f64::INFINITY,
        }
    }
}

/// Minimizes the χ² of a [FitSetup] stage by stage
///
/// Every stage of the release order is minimized with all parameters released so far, starting
/// from the result of the previous stage.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Fitter {
    pub minimizer: Minimizer,
}

impl Fitter {
    pub fn new(minimizer: impl Into<Minimizer>) -> Self {
        Self {
            minimizer: minimizer.into(),
        }
    }

    pub fn fit(&self, setup: &FitSetup, data: &Data) -> Result<FitResult, FitError> {
        let model = &setup.model;
        let cost = Chi2Cost::new(model, &setup.input, data)?;
        let nr_data_points = cost.nr_data_points();

        let mut space = setup.parameters.clone();
        info!(
            "fit of {} components to {} data points in {} stages, start χ² = {}",
            model.nr_components(),
            nr_data_points,
            setup.release_order.nr_stages(),
            cost.evaluate(&space),
        );

        let mut stages = Vec::with_capacity(setup.release_order.nr_stages());
        let mut free_parameter_names = vec![];
        for stage in 0..setup.release_order.nr_stages() {
            let mapping = ParameterMapping::new(model, setup.options.anchor)
                .filter(|target| setup.release_order.releases(stage, target, model));
            free_parameter_names = mapping.names().into_iter().map(str::to_owned).collect();

            if mapping.nr_free() == 0 {
                warn!("stage {stage} releases no parameters, skipping it");
                stages.push(MinimizerResult {
                    x: vec![],
                    cost: cost.evaluate(&space),
                    success: true,
                    nr_evaluations: 0,
                });
                continue;
            }
            debug!("stage {stage} free parameters: {:?}", mapping.names());

            let x0 = mapping.to_vector(&space);
            let working = RefCell::new(space.clone());
            let result = self.minimizer.minimize(
                |x| {
                    let mut working = working.borrow_mut();
                    mapping.apply(x, &mut working);
                    cost.evaluate(&working)
                },
                &x0,
                &mapping.bounds(),
            );
            mapping.apply(&result.x, &mut space);

            if result.success {
                info!(
                    "stage {stage}: {} free parameters, χ² = {} after {} evaluations",
                    mapping.nr_free(),
                    result.cost,
                    result.nr_evaluations
                );
            } else {
                warn!(
                    "stage {stage} did not converge, χ² = {} after {} evaluations",
                    result.cost, result.nr_evaluations
                );
            }
            stages.push(result);
        }

        let result = FitResult {
            cost: cost.evaluate(&space),
            parameters: space,
            success: stages.iter().all(|stage| stage.success),
            nr_evaluations: stages.iter().map(|stage| stage.nr_evaluations).sum(),
            nr_data_points,
            nr_free: free_parameter_names.len(),
            free_parameter_names,
            stages,
        };
        info!(
            "fit finished, χ² = {}, χ²/ndf = {}",
            result.cost,
            result.reduced_chi2()
        );
        Ok(result)
    }
}
