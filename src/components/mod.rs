//! Components of the resonance model and the family of their lineshapes

mod channel;
pub use channel::Channel;

mod component;
pub use component::{ChannelGroups, Component, split_wave_name};

mod lineshape;
pub use lineshape::{Lineshape, LineshapeKind, LineshapeTrait};

mod constant_background;
pub use constant_background::ConstantBackground;

mod dynamic_width_breit_wigner;
pub use dynamic_width_breit_wigner::{DecayChannel, DynamicWidthBreitWigner};

mod exponential_background;
pub use exponential_background::{BreakupShape, ExponentialBackground};

mod exponential_background_integral;
pub use exponential_background_integral::ExponentialBackgroundIntegral;

mod fixed_width_breit_wigner;
pub use fixed_width_breit_wigner::FixedWidthBreitWigner;

mod integral_width_breit_wigner;
pub use integral_width_breit_wigner::{IntegralDecayChannel, IntegralWidthBreitWigner};

mod t_prime_dependent_background;
pub use t_prime_dependent_background::TPrimeDependentBackground;

mod t_prime_dependent_background_integral;
pub use t_prime_dependent_background_integral::TPrimeDependentBackgroundIntegral;
