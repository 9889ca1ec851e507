use ndarray::{s, Array2, Array3, ArrayView1};
use num_complex::Complex64;
use num_traits::Zero;

/// Live values of all fit parameters
///
/// Scalars are addressed by `(component, parameter)`, couplings by `(component, coupling, bin)`
/// and branchings by `(component, branching)`. The store has to be [resized](Self::resize) to
/// cover every component before it is read, access outside of the current shape panics.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSpace {
    parameters: Array2<f64>,
    couplings: Array3<Complex64>,
    branchings: Array2<Complex64>,
}

impl ParameterSpace {
    pub fn new() -> Self {
        Self {
            parameters: Array2::zeros((0, 0)),
            couplings: Array3::zeros((0, 0, 0)),
            branchings: Array2::zeros((0, 0)),
        }
    }

    /// Create a zero-filled store of the given shape
    pub fn with_shape(
        nr_components: usize,
        nr_channels: usize,
        nr_parameters: usize,
        nr_bins: usize,
    ) -> Self {
        let mut space = Self::new();
        space.resize(nr_components, nr_channels, nr_parameters, nr_bins);
        space
    }

    /// Grow every dimension to at least the given size
    ///
    /// Dimensions never shrink, previously set cells keep their values, and new cells are
    /// zero-filled. `nr_channels` bounds both the number of couplings and of branchings.
    pub fn resize(
        &mut self,
        nr_components: usize,
        nr_channels: usize,
        nr_parameters: usize,
        nr_bins: usize,
    ) {
        let (old_components, old_parameters) = self.parameters.dim();
        let (_, old_channels, old_bins) = self.couplings.dim();

        let nr_components = nr_components.max(old_components);
        let nr_channels = nr_channels.max(old_channels);
        let nr_parameters = nr_parameters.max(old_parameters);
        let nr_bins = nr_bins.max(old_bins);

        if (nr_components, nr_parameters) != self.parameters.dim() {
            let mut parameters = Array2::zeros((nr_components, nr_parameters));
            parameters
                .slice_mut(s![..old_components, ..old_parameters])
                .assign(&self.parameters);
            self.parameters = parameters;
        }

        if (nr_components, nr_channels, nr_bins) != self.couplings.dim() {
            let mut couplings = Array3::zeros((nr_components, nr_channels, nr_bins));
            couplings
                .slice_mut(s![..old_components, ..old_channels, ..old_bins])
                .assign(&self.couplings);
            self.couplings = couplings;
        }

        if (nr_components, nr_channels) != self.branchings.dim() {
            let mut branchings = Array2::zeros((nr_components, nr_channels));
            branchings
                .slice_mut(s![..old_components, ..old_channels])
                .assign(&self.branchings);
            self.branchings = branchings;
        }
    }

    pub fn nr_components(&self) -> usize {
        self.parameters.nrows()
    }

    pub fn nr_channels(&self) -> usize {
        self.couplings.dim().1
    }

    pub fn nr_parameters(&self) -> usize {
        self.parameters.ncols()
    }

    pub fn nr_bins(&self) -> usize {
        self.couplings.dim().2
    }

    #[inline]
    pub fn parameter(&self, component: usize, parameter: usize) -> f64 {
        self.parameters[(component, parameter)]
    }

    #[inline]
    pub fn set_parameter(&mut self, component: usize, parameter: usize, value: f64) {
        self.parameters[(component, parameter)] = value;
    }

    /// All scalar parameters of a single component
    #[inline]
    pub fn parameters_of(&self, component: usize) -> ArrayView1<'_, f64> {
        self.parameters.row(component)
    }

    #[inline]
    pub fn coupling(&self, component: usize, coupling: usize, bin: usize) -> Complex64 {
        self.couplings[(component, coupling, bin)]
    }

    #[inline]
    pub fn set_coupling(&mut self, component: usize, coupling: usize, bin: usize, value: Complex64) {
        self.couplings[(component, coupling, bin)] = value;
    }

    #[inline]
    pub fn branching(&self, component: usize, branching: usize) -> Complex64 {
        self.branchings[(component, branching)]
    }

    #[inline]
    pub fn set_branching(&mut self, component: usize, branching: usize, value: Complex64) {
        self.branchings[(component, branching)] = value;
    }

    /// Set every cell to zero, keeping the shape
    pub fn clear(&mut self) {
        self.parameters.fill(0.0);
        self.couplings.fill(Complex64::zero());
        self.branchings.fill(Complex64::zero());
    }
}

impl Default for ParameterSpace {
    fn default() -> Self {
        Self::new()
    }
}
