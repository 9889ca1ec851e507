//! Staged χ² fit of a [crate::Model] to measured spin-density matrix elements

mod cost;
pub use cost::{Chi2Cost, wrap_phase};

mod fitter;
pub use fitter::{FitResult, Fitter};

mod mapping;
pub use mapping::{ParameterMapping, Part, Target};

mod minimizer;
pub use minimizer::{CobylaMinimizer, Minimizer, MinimizerResult, MinimizerTrait};

mod release_order;
pub use release_order::{ReleaseOrder, ReleaseToken};
