use super::{DenseLayer, Layer, Parameters};
use crate::error::Result;

use rand::Rng;

/// The last layer of a chain.
///
/// Forward behaviour is identical to [`DenseLayer`]. During the backward pass
/// it has no downstream layer, so its deltas are seeded directly from the
/// externally supplied error: `delta[i] = error[i] * (1 - activation[i]^2)`,
/// where `error` is the loss gradient with respect to the prediction
/// (usually `prediction - target`).
#[derive(Clone, Debug)]
pub struct OutputLayer {
    dense: DenseLayer,
}

impl OutputLayer {
    /// Initializes a new, untrained output layer.
    pub fn new<R: Rng + ?Sized>(rng: &mut R, inputs: usize, outputs: usize) -> Result<Self> {
        Ok(OutputLayer {
            dense: DenseLayer::new(rng, inputs, outputs)?,
        })
    }

    pub fn from_parameters(params: Parameters) -> Self {
        OutputLayer {
            dense: DenseLayer::from_parameters(params),
        }
    }

    /// See [`DenseLayer::weight`].
    pub fn weight(&self, input: usize, output: usize) -> Result<f64> {
        self.dense.weight(input, output)
    }
}

impl Layer for OutputLayer {
    fn input_len(&self) -> usize {
        self.dense.input_len()
    }

    fn output_len(&self) -> usize {
        self.dense.output_len()
    }

    fn evaluate(&self, inputs: &[f64], outputs: &mut [f64]) {
        self.dense.evaluate(inputs, outputs);
    }

    fn forward(&mut self, inputs: &[f64]) -> &[f64] {
        self.dense.forward(inputs)
    }

    fn backward(&mut self, learning_rate: f64, error: &[f64]) -> &[f64] {
        self.dense.propagate(learning_rate, error)
    }

    fn parameters(&self) -> Option<&Parameters> {
        self.dense.parameters()
    }

    fn is_output(&self) -> bool {
        true
    }
}
