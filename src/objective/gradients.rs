//! Owned gradient and hessian buffers.
//!
//! [`Gradients`] holds the two flat `f32` buffers an objective writes into,
//! laid out output-major like the raw predictions: the value for `sample`
//! and `output` lives at `output * n_samples + sample`. Each output's slice
//! is therefore contiguous, which is what a histogram pass over one output
//! reads.

/// Derivatives of the loss for every (sample, output) pair.
///
/// # Example
///
/// ```
/// use histboost::objective::Gradients;
///
/// let mut gradients = Gradients::new(100, 3);
/// gradients.set(0, 2, -0.5, 0.25);
///
/// assert_eq!(gradients.get(0, 2), (-0.5, 0.25));
/// assert_eq!(gradients.output_grads(2)[0], -0.5);
/// assert_eq!(gradients.output_grads(0)[0], 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Gradients {
    grads: Vec<f32>,
    hess: Vec<f32>,
    n_samples: usize,
    n_outputs: usize,
}

impl Gradients {
    /// Zeroed buffers for `n_samples` samples and `n_outputs` outputs.
    ///
    /// # Panics
    ///
    /// Panics if `n_outputs` is zero.
    pub fn new(n_samples: usize, n_outputs: usize) -> Self {
        assert!(n_outputs > 0, "n_outputs must be positive");
        let len = n_samples * n_outputs;
        Self {
            grads: vec![0.0; len],
            hess: vec![0.0; len],
            n_samples,
            n_outputs,
        }
    }

    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    #[inline]
    pub fn n_outputs(&self) -> usize {
        self.n_outputs
    }

    /// `n_samples * n_outputs`.
    #[inline]
    pub fn len(&self) -> usize {
        self.grads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.grads.is_empty()
    }

    #[inline]
    fn offset(&self, sample: usize, output: usize) -> usize {
        debug_assert!(sample < self.n_samples && output < self.n_outputs);
        output * self.n_samples + sample
    }

    /// `(gradient, hessian)` of one sample and output.
    #[inline]
    pub fn get(&self, sample: usize, output: usize) -> (f32, f32) {
        let at = self.offset(sample, output);
        (self.grads[at], self.hess[at])
    }

    #[inline]
    pub fn set(&mut self, sample: usize, output: usize, grad: f32, hess: f32) {
        let at = self.offset(sample, output);
        self.grads[at] = grad;
        self.hess[at] = hess;
    }

    /// The whole gradient buffer, output-major.
    #[inline]
    pub fn grads(&self) -> &[f32] {
        &self.grads
    }

    /// The whole hessian buffer, output-major.
    #[inline]
    pub fn hess(&self) -> &[f32] {
        &self.hess
    }

    /// Both buffers at once, in the form
    /// [`update_gradients_and_hessians`](super::ObjectiveFn::update_gradients_and_hessians)
    /// takes them.
    #[inline]
    pub fn as_mut_slices(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.grads, &mut self.hess)
    }

    /// Gradients of every sample for one output.
    #[inline]
    pub fn output_grads(&self, output: usize) -> &[f32] {
        &self.grads[self.output_range(output)]
    }

    /// Hessians of every sample for one output.
    #[inline]
    pub fn output_hess(&self, output: usize) -> &[f32] {
        &self.hess[self.output_range(output)]
    }

    #[inline]
    fn output_range(&self, output: usize) -> std::ops::Range<usize> {
        debug_assert!(output < self.n_outputs);
        let start = output * self.n_samples;
        start..start + self.n_samples
    }
}
