use super::{Cache, Layer};
use crate::activator;
use crate::error::{Error, Result};
use crate::matrix::Mat;
use crate::utils::ZeroOut;

use itertools::multizip;
use rand::Rng;
use std::fmt;

/// The trainable weights and biases of a fully connected layer.
///
/// Dimensions are fixed at construction; only the values change, and only
/// during backward propagation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Parameters {
    /// One row of weights per output unit.
    weights: Mat,
    /// One bias per output unit.
    bias: Vec<f64>,
}

impl Parameters {
    /// Builds parameters from explicit values.
    ///
    /// Arguments:
    ///
    ///  * `weights` - one row per output unit, each holding one weight per
    ///                input unit.
    ///  * `bias` - one bias per output unit.
    pub fn new(weights: Vec<Vec<f64>>, bias: Vec<f64>) -> Result<Self> {
        let weights = Mat::from_rows(&weights).ok_or_else(|| {
            Error::InvalidNetwork("weight rows differ in length".into())
        })?;
        if weights.rows() == 0 || weights.cols() == 0 {
            return Err(Error::InvalidWidth {
                layer: "fully connected layer",
            });
        }
        if bias.len() != weights.rows() {
            return Err(Error::WidthMismatch {
                what: "bias",
                expected: weights.rows(),
                actual: bias.len(),
            });
        }
        Ok(Parameters { weights, bias })
    }

    /// Draws every weight and bias uniformly from `[-1, 1]`.
    fn random<R: Rng + ?Sized>(rng: &mut R, inputs: usize, outputs: usize) -> Self {
        let weights = Mat::random(rng, outputs, inputs);
        let bias = Mat::random(rng, 1, outputs).row(0).to_vec();
        Parameters { weights, bias }
    }

    pub fn input_len(&self) -> usize {
        self.weights.cols()
    }

    pub fn output_len(&self) -> usize {
        self.weights.rows()
    }

    /// Returns the weight connecting input unit `input` to output unit
    /// `output`.
    pub fn weight(&self, input: usize, output: usize) -> Result<f64> {
        self.weights
            .get(output, input)
            .ok_or(Error::WeightOutOfRange {
                input,
                output,
                inputs: self.input_len(),
                outputs: self.output_len(),
            })
    }

    /// Returns the weights feeding output unit `output`.
    fn row(&self, output: usize) -> &[f64] {
        self.weights.row(output)
    }

    pub fn bias(&self) -> &[f64] {
        &self.bias
    }

    /// Computes `tanh(W·inputs + bias)` into `outputs`.
    fn apply(&self, inputs: &[f64], outputs: &mut [f64]) {
        assert_eq!(inputs.len(), self.input_len());
        assert_eq!(outputs.len(), self.output_len());
        for (i, (out, b)) in outputs.iter_mut().zip(&self.bias).enumerate() {
            let sum: f64 = self
                .weights
                .row(i)
                .iter()
                .zip(inputs)
                .map(|(w, x)| w * x)
                .sum();
            *out = activator::f(sum + b);
        }
    }

    /// Takes one gradient descent step given each output unit's delta and the
    /// inputs that produced it.
    fn descend(&mut self, rate: f64, deltas: &[f64], inputs: &[f64]) {
        for (i, (&delta, b)) in deltas.iter().zip(self.bias.iter_mut()).enumerate() {
            for (w, x) in self.weights.row_mut(i).iter_mut().zip(inputs) {
                *w -= rate * delta * x;
            }
            *b -= rate * delta;
        }
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for i in 0..self.output_len() {
            write!(f, "\t")?;
            for w in self.row(i) {
                write!(f, "{:+.6} ", w)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A fully connected layer with a tanh activation.
#[derive(Clone, Debug)]
pub struct DenseLayer {
    params: Parameters,
    cache: Cache,
    /// Per-output `error * f'(activation)` from the last backward pass.
    deltas: Vec<f64>,
    /// Gradient with respect to the inputs, handed to the previous layer.
    input_errors: Vec<f64>,
}

impl DenseLayer {
    /// Initializes a new, untrained layer.
    ///
    /// Arguments:
    ///
    ///  * `rng` - the random source used to initialize the parameters.
    ///  * `inputs` - the number of inputs to this layer.
    ///  * `outputs` - the number of outputs from this layer.
    pub fn new<R: Rng + ?Sized>(rng: &mut R, inputs: usize, outputs: usize) -> Result<Self> {
        if inputs == 0 || outputs == 0 {
            return Err(Error::InvalidWidth {
                layer: "fully connected layer",
            });
        }
        Ok(Self::from_parameters(Parameters::random(rng, inputs, outputs)))
    }

    /// Wraps existing parameters in a layer.
    pub fn from_parameters(params: Parameters) -> Self {
        let (inputs, outputs) = (params.input_len(), params.output_len());
        DenseLayer {
            params,
            cache: Cache::new(inputs, outputs),
            deltas: vec![0.0; outputs],
            input_errors: vec![0.0; inputs],
        }
    }

    /// Returns the weight connecting input unit `input` to output unit
    /// `output`, failing when either index is out of range.
    pub fn weight(&self, input: usize, output: usize) -> Result<f64> {
        self.params.weight(input, output)
    }

    /// Computes the local deltas from `output_errors`, updates the weights,
    /// and then weights the deltas through the updated weights to form the
    /// signal for the previous layer.
    pub(super) fn propagate(&mut self, learning_rate: f64, output_errors: &[f64]) -> &[f64] {
        assert_eq!(output_errors.len(), self.params.output_len());
        for (d, &e, &y) in multizip((
            self.deltas.iter_mut(),
            output_errors.iter(),
            self.cache.outputs.iter(),
        )) {
            *d = e * activator::fprime(y);
        }

        self.params
            .descend(learning_rate, &self.deltas, &self.cache.inputs);

        self.input_errors.zero_out();
        for (i, &delta) in self.deltas.iter().enumerate() {
            for (err, w) in self.input_errors.iter_mut().zip(self.params.row(i)) {
                *err += w * delta;
            }
        }
        &self.input_errors
    }
}

impl Layer for DenseLayer {
    fn input_len(&self) -> usize {
        self.params.input_len()
    }

    fn output_len(&self) -> usize {
        self.params.output_len()
    }

    fn evaluate(&self, inputs: &[f64], outputs: &mut [f64]) {
        self.params.apply(inputs, outputs);
    }

    fn forward(&mut self, inputs: &[f64]) -> &[f64] {
        assert_eq!(inputs.len(), self.input_len());
        self.cache.inputs.copy_from_slice(inputs);
        self.params.apply(inputs, &mut self.cache.outputs);
        &self.cache.outputs
    }

    /// `output_errors` is the signal returned by the next layer's backward
    /// pass, i.e. its deltas weighted through its weight columns.
    fn backward(&mut self, learning_rate: f64, output_errors: &[f64]) -> &[f64] {
        self.propagate(learning_rate, output_errors)
    }

    fn parameters(&self) -> Option<&Parameters> {
        Some(&self.params)
    }
}
