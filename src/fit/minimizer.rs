use cobyla::{FailStatus, Func, RhoBeg, StopTols, SuccessStatus, minimize};
use enum_dispatch::enum_dispatch;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Outcome of a single minimization
#[derive(Clone, Debug, PartialEq)]
pub struct MinimizerResult {
    pub x: Vec<f64>,
    pub cost: f64,
    pub success: bool,
    pub nr_evaluations: usize,
}

#[enum_dispatch]
pub trait MinimizerTrait {
    /// Minimize `cost` starting from `x0` within `bounds`, infinite bounds leave a side open
    fn minimize<F>(&self, cost: F, x0: &[f64], bounds: &[(f64, f64)]) -> MinimizerResult
    where
        F: Fn(&[f64]) -> f64;
}

/// Derivative-free COBYLA minimizer
///
/// COBYLA (Constrained Optimization BY Linear Approximations) builds linear approximations of
/// the cost function and keeps the parameters inside their bounds by treating them as
/// constraints. It needs no derivatives, so it copes with lineshapes which are tabulated or
/// integrated numerically.
///
/// The trust region shrinks from `rhobeg` down to `xtol_rel * rhobeg`, so the minimization ends
/// even if the cost stops improving, e.g. at an exact zero of synthetic data.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename = "Cobyla")]
pub struct CobylaMinimizer {
    pub niterations: u32,
    pub rhobeg: f64,
    pub ftol_rel: f64,
    #[serde(default = "CobylaMinimizer::default_xtol_rel")]
    pub xtol_rel: f64,
}

impl CobylaMinimizer {
    /// Create a new [CobylaMinimizer].
    ///
    /// # Arguments
    /// - `niterations`: maximum number of cost evaluations
    /// - `rhobeg`: initial change of the parameters
    /// - `ftol_rel`: relative tolerance on the cost for convergence
    /// - `xtol_rel`: final trust-region radius relative to `rhobeg`
    pub fn new(niterations: u32, rhobeg: f64, ftol_rel: f64, xtol_rel: f64) -> Self {
        assert!(niterations > 0, "niterations must be positive");
        assert!(rhobeg > 0.0, "rhobeg must be positive");
        assert!(rhobeg.is_finite(), "rhobeg must be finite");
        assert!(ftol_rel >= 0.0, "ftol_rel must be non-negative");
        assert!(ftol_rel.is_finite(), "ftol_rel must be finite");
        assert!(xtol_rel > 0.0, "xtol_rel must be positive");
        assert!(xtol_rel < 1.0, "xtol_rel must be less than unity");
        Self {
            niterations,
            rhobeg,
            ftol_rel,
            xtol_rel,
        }
    }

    #[inline]
    pub fn default_niterations() -> u32 {
        1000
    }

    #[inline]
    pub fn default_rhobeg() -> f64 {
        0.5
    }

    #[inline]
    pub fn default_ftol_rel() -> f64 {
        1e-6
    }

    #[inline]
    pub fn default_xtol_rel() -> f64 {
        1e-8
    }
}

impl Default for CobylaMinimizer {
    fn default() -> Self {
        Self::new(
            Self::default_niterations(),
            Self::default_rhobeg(),
            Self::default_ftol_rel(),
            Self::default_xtol_rel(),
        )
    }
}

impl MinimizerTrait for CobylaMinimizer {
    fn minimize<F>(&self, cost: F, x0: &[f64], bounds: &[(f64, f64)]) -> MinimizerResult
    where
        F: Fn(&[f64]) -> f64,
    {
        let nr_evaluations = Cell::new(0_usize);
        let objective = |x: &[f64], _user_data: &mut ()| -> f64 {
            nr_evaluations.set(nr_evaluations.get() + 1);
            cost(x)
        };

        let constraints: Vec<&dyn Func<()>> = vec![];
        let stop_tol = StopTols {
            ftol_rel: self.ftol_rel,
            xtol_rel: self.xtol_rel,
            ..StopTols::default()
        };

        let result = minimize(
            objective,
            x0,
            bounds,
            &constraints,
            (),
            self.niterations as usize,
            RhoBeg::All(self.rhobeg),
            Some(stop_tol),
        );

        let (x, cost, success) = cobyla_outcome(result);
        MinimizerResult {
            x,
            cost,
            success,
            nr_evaluations: nr_evaluations.get(),
        }
    }
}

/// Unpack the result of [cobyla::minimize] into `(x, cost, success)`
///
/// The trust region cannot shrink below the floating-point resolution of `x`, cobyla reports this
/// as [FailStatus::RoundoffLimited]. With a finite cost it is a converged minimum.
#[allow(clippy::type_complexity)]
fn cobyla_outcome(
    result: Result<(SuccessStatus, Vec<f64>, f64), (FailStatus, Vec<f64>, f64)>,
) -> (Vec<f64>, f64, bool) {
    match result {
        Ok((status, x, cost)) => {
            let success = matches!(
                status,
                SuccessStatus::Success | SuccessStatus::FtolReached | SuccessStatus::XtolReached
            );
            (x, cost, success)
        }
        Err((FailStatus::RoundoffLimited, x, cost)) => {
            let success = cost.is_finite();
            (x, cost, success)
        }
        Err((_status, x, cost)) => (x, cost, false),
    }
}

/// Minimization algorithm used by [crate::fit::Fitter]
#[enum_dispatch(MinimizerTrait)]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[non_exhaustive]
pub enum Minimizer {
    Cobyla(CobylaMinimizer),
}

impl Default for Minimizer {
    fn default() -> Self {
        CobylaMinimizer::default().into()
    }
}
