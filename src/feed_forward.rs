//! A [Feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network).
//!
//! # Example
//!
//! Let's train a small network to classify points by the sign of their first
//! coordinate:
//!
//! ```
//! # fn main() -> Result<(), bp_ann::Error> {
//! use bp_ann::feed_forward::Network;
//! use bp_ann::layers::InputLayer;
//! use bp_ann::task::{one_hot, Task};
//! use bp_ann::trainer::{Logging, Trainer};
//! use rand::rngs::StdRng;
//! use rand::{Rng, SeedableRng};
//!
//! struct Sign(StdRng);
//!
//! impl Task for Sign {
//!     fn sample(&mut self, input: &mut [f64]) {
//!         for x in input.iter_mut() {
//!             *x = self.0.gen_range(-1.0..=1.0);
//!         }
//!     }
//!
//!     fn label(&self, input: &[f64], target: &mut [f64]) -> bp_ann::Result<usize> {
//!         one_hot(if input[0] < 0.0 { 0 } else { 1 }, target)
//!     }
//! }
//!
//! // Build the chain: 2 inputs, 4 hidden units, 2 outputs
//! let mut rng = StdRng::seed_from_u64(1);
//! let network = Network::builder(InputLayer::new(2)?)
//!     .dense(&mut rng, 4)?
//!     .output(&mut rng, 2)?;
//!
//! // Train it on freshly drawn samples
//! let network = Trainer::new(network)
//!     .learning_rate(0.05)
//!     .iterations(5000)
//!     .logging(Logging::Silent)
//!     .train(&mut Sign(StdRng::seed_from_u64(2)))?;
//!
//! assert_eq!(network.classify(&[-0.9, 0.3])?, 0);
//! assert_eq!(network.classify(&[0.9, -0.3])?, 1);
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use crate::layers::{DenseLayer, Layer, OutputLayer};
use crate::utils::argmax;

use rand::Rng;

/// A feedforward neural network.
///
/// The network owns its layers in chain order. A layer's neighbours are the
/// layers next to it in that order; layers never hold references to each
/// other.
#[derive(Debug)]
pub struct Network {
    layers: Vec<Box<dyn Layer>>,
}

impl Network {
    /// Assembles a network from an ordered chain of layers.
    ///
    /// The chain must start with an input layer, end with its only
    /// [`OutputLayer`], contain nothing but trainable layers in between, and
    /// every layer's output width must match the next layer's input width.
    pub fn new(layers: Vec<Box<dyn Layer>>) -> Result<Self> {
        let (first, last) = match (layers.first(), layers.last()) {
            (Some(first), Some(last)) if layers.len() >= 2 => (first, last),
            _ => {
                return Err(Error::InvalidNetwork(
                    "a network needs an input and an output layer".into(),
                ))
            }
        };
        if first.parameters().is_some() {
            return Err(Error::InvalidNetwork(
                "the first layer must be an input layer".into(),
            ));
        }
        if !last.is_output() {
            return Err(Error::InvalidNetwork(
                "the last layer must be an output layer".into(),
            ));
        }
        for (i, layer) in layers.iter().enumerate().skip(1) {
            if layer.parameters().is_none() {
                return Err(Error::InvalidNetwork(format!(
                    "layer {} is an input layer but is not first",
                    i
                )));
            }
            if layer.is_output() && i != layers.len() - 1 {
                return Err(Error::InvalidNetwork(format!(
                    "layer {} is an output layer but is not last",
                    i
                )));
            }
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].output_len() != pair[1].input_len() {
                return Err(Error::InvalidNetwork(format!(
                    "layer {} produces {} values but layer {} expects {}",
                    i,
                    pair[0].output_len(),
                    i + 1,
                    pair[1].input_len()
                )));
            }
        }
        Ok(Network { layers })
    }

    /// Starts a chain at `input`; later layers inherit their input width
    /// from the layer before them.
    pub fn builder<L: Layer + 'static>(input: L) -> Builder {
        Builder {
            layers: vec![Box::new(input)],
        }
    }

    /// Returns the size of the input layer to the network.
    pub fn input_len(&self) -> usize {
        self.layers[0].input_len()
    }

    /// Returns the size of the output layer from the network.
    pub fn output_len(&self) -> usize {
        self.layers[self.layers.len() - 1].output_len()
    }

    /// Returns the layers in chain order.
    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    /// Feeds `input` through every layer in chain order, caching each layer's
    /// inputs and outputs for the following `backward` call. Returns the
    /// output layer's activations.
    pub fn forward<'a>(&'a mut self, input: &'a [f64]) -> Result<&'a [f64]> {
        check_len("network input", self.input_len(), input.len())?;
        let mut signal = input;
        for layer in self.layers.iter_mut() {
            signal = layer.forward(signal);
        }
        Ok(signal)
    }

    /// Feeds `error`, the loss gradient with respect to the output layer's
    /// activations, backwards through the chain in reverse order, updating
    /// every trainable layer.
    pub fn backward(&mut self, learning_rate: f64, error: &[f64]) -> Result<()> {
        check_len("output error", self.output_len(), error.len())?;
        let mut signal = error;
        for layer in self.layers.iter_mut().rev() {
            signal = layer.backward(learning_rate, signal);
        }
        Ok(())
    }

    /// Feeds the provided `input` through the network, returning the output
    /// layer. Cached training state is left untouched.
    pub fn run(&self, input: &[f64]) -> Result<Vec<f64>> {
        check_len("network input", self.input_len(), input.len())?;
        let mut activations = self.empty_network();
        activations[0].copy_from_slice(input);
        for (i, layer) in self.layers.iter().enumerate() {
            let (input, output) = mut_layers(&mut activations, i);
            layer.evaluate(input, output);
        }
        Ok(activations.remove(self.layers.len()))
    }

    /// Returns the index of the strongest output unit for `input`.
    pub fn classify(&self, input: &[f64]) -> Result<usize> {
        self.run(input).map(|output| argmax(&output))
    }

    /// Returns an activation buffer per layer boundary, full of zeros.
    fn empty_network(&self) -> Vec<Vec<f64>> {
        let mut network = Vec::with_capacity(self.layers.len() + 1);
        network.push(vec![0.0; self.input_len()]);
        for layer in &self.layers {
            network.push(vec![0.0; layer.output_len()]);
        }
        network
    }
}

/// Appends trainable layers to a chain, each sized from its predecessor.
#[derive(Debug)]
pub struct Builder {
    layers: Vec<Box<dyn Layer>>,
}

impl Builder {
    /// Appends a hidden fully connected layer with `outputs` units.
    pub fn dense<R: Rng + ?Sized>(mut self, rng: &mut R, outputs: usize) -> Result<Self> {
        let layer = DenseLayer::new(rng, self.width(), outputs)?;
        self.layers.push(Box::new(layer));
        Ok(self)
    }

    /// Appends the output layer with `outputs` units and finishes the chain.
    pub fn output<R: Rng + ?Sized>(mut self, rng: &mut R, outputs: usize) -> Result<Network> {
        let layer = OutputLayer::new(rng, self.width(), outputs)?;
        self.layers.push(Box::new(layer));
        Network::new(self.layers)
    }

    fn width(&self) -> usize {
        self.layers.last().map_or(0, |layer| layer.output_len())
    }
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::WidthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Gets the input and output buffers around a layer.
fn mut_layers(layers: &mut [Vec<f64>], layer: usize) -> (&mut [f64], &mut [f64]) {
    let (before, after) = layers[layer..].split_at_mut(1);
    (&mut before[0], &mut after[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{feature, InputLayer, MappingInputLayer, Parameters};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn network(seed: u64) -> Network {
        let mut rng = StdRng::seed_from_u64(seed);
        let input = MappingInputLayer::new(
            2,
            vec![feature(|x| x[0].sin()), feature(|x| x[0] * x[1])],
        )
        .unwrap();
        Network::builder(input)
            .dense(&mut rng, 5)
            .unwrap()
            .dense(&mut rng, 3)
            .unwrap()
            .output(&mut rng, 2)
            .unwrap()
    }

    fn loss(network: &Network, input: &[f64], target: &[f64]) -> f64 {
        let output = network.run(input).unwrap();
        output.iter().zip(target).map(|(p, t)| (p - t) * (p - t)).sum()
    }

    #[test]
    fn adjacent_widths_agree() {
        let network = network(1);
        let layers = network.layers();
        assert_eq!(layers.len(), 4);
        for pair in layers.windows(2) {
            assert_eq!(pair[0].output_len(), pair[1].input_len());
        }
        assert_eq!(layers[1].input_len(), 4);
        assert_eq!((network.input_len(), network.output_len()), (2, 2));
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let layers: Vec<Box<dyn Layer>> = vec![
            Box::new(InputLayer::new(2).unwrap()),
            Box::new(DenseLayer::new(&mut rng, 3, 4).unwrap()),
            Box::new(OutputLayer::new(&mut rng, 4, 2).unwrap()),
        ];
        assert!(matches!(Network::new(layers), Err(Error::InvalidNetwork(_))));
    }

    #[test]
    fn chain_shape_is_validated() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(Network::new(Vec::new()).is_err());

        let no_output: Vec<Box<dyn Layer>> = vec![
            Box::new(InputLayer::new(2).unwrap()),
            Box::new(DenseLayer::new(&mut rng, 2, 2).unwrap()),
        ];
        assert!(Network::new(no_output).is_err());

        let no_input: Vec<Box<dyn Layer>> = vec![
            Box::new(DenseLayer::new(&mut rng, 2, 2).unwrap()),
            Box::new(OutputLayer::new(&mut rng, 2, 2).unwrap()),
        ];
        assert!(Network::new(no_input).is_err());

        let early_output: Vec<Box<dyn Layer>> = vec![
            Box::new(InputLayer::new(2).unwrap()),
            Box::new(OutputLayer::new(&mut rng, 2, 2).unwrap()),
            Box::new(OutputLayer::new(&mut rng, 2, 2).unwrap()),
        ];
        assert!(Network::new(early_output).is_err());

        let inner_input: Vec<Box<dyn Layer>> = vec![
            Box::new(InputLayer::new(2).unwrap()),
            Box::new(InputLayer::new(2).unwrap()),
            Box::new(OutputLayer::new(&mut rng, 2, 2).unwrap()),
        ];
        assert!(Network::new(inner_input).is_err());
    }

    #[test]
    fn builder_rejects_zero_width() {
        let mut rng = StdRng::seed_from_u64(0);
        let builder = Network::builder(InputLayer::new(2).unwrap());
        assert!(builder.dense(&mut rng, 0).is_err());
    }

    #[test]
    fn wrong_input_length_fails() {
        let mut network = network(2);
        assert_eq!(
            network.run(&[1.0]).unwrap_err(),
            Error::WidthMismatch {
                what: "network input",
                expected: 2,
                actual: 1,
            }
        );
        assert!(network.forward(&[1.0, 2.0, 3.0]).is_err());
        assert!(network.backward(0.1, &[1.0]).is_err());
    }

    #[test]
    fn run_matches_forward() {
        let mut network = network(3);
        let input = [0.4, -0.7];
        let expected = network.run(&input).unwrap();
        let output = network.forward(&input).unwrap().to_vec();
        assert_eq!(expected, output);
        assert!(output.iter().all(|y| *y > -1.0 && *y < 1.0));
    }

    #[test]
    fn one_backward_pass_reduces_loss() {
        let mut network = network(4);
        let input = [0.3, 0.8];
        let target = [1.0, -1.0];
        let before = loss(&network, &input, &target);

        let output = network.forward(&input).unwrap().to_vec();
        let error: Vec<f64> = output.iter().zip(&target).map(|(p, t)| p - t).collect();
        network.backward(0.01, &error).unwrap();

        assert!(loss(&network, &input, &target) < before);
    }

    #[test]
    fn hidden_layer_sees_updated_output_weights() {
        let hidden = Parameters::new(vec![vec![0.5]], vec![0.0]).unwrap();
        let output = Parameters::new(vec![vec![0.8]], vec![0.0]).unwrap();
        let layers: Vec<Box<dyn Layer>> = vec![
            Box::new(InputLayer::new(1).unwrap()),
            Box::new(DenseLayer::from_parameters(hidden)),
            Box::new(OutputLayer::from_parameters(output)),
        ];
        let mut network = Network::new(layers).unwrap();

        let y = network.forward(&[1.0]).unwrap()[0];
        network.backward(1.0, &[y + 1.0]).unwrap();

        let h = 0.5f64.tanh();
        let delta_out = (y + 1.0) * (1.0 - y * y);
        let w_out = 0.8 - delta_out * h;
        let delta_hidden = w_out * delta_out * (1.0 - h * h);
        let layers = network.layers();
        let hidden = layers[1].parameters().unwrap().weight(0, 0).unwrap();
        let output = layers[2].parameters().unwrap().weight(0, 0).unwrap();
        assert_relative_eq!(output, w_out, max_relative = 1e-12);
        assert_relative_eq!(hidden, 0.5 - delta_hidden, max_relative = 1e-12);
        assert_relative_eq!(hidden, 0.264635, epsilon = 1e-6);
    }

    #[test]
    fn backward_only_changes_trainable_layers() {
        let mut network = network(5);
        let before: Vec<Option<Parameters>> =
            network.layers().iter().map(|l| l.parameters().cloned()).collect();
        network.forward(&[0.5, 0.5]).unwrap();
        network.backward(0.1, &[0.5, -0.5]).unwrap();
        let after: Vec<Option<Parameters>> =
            network.layers().iter().map(|l| l.parameters().cloned()).collect();
        assert!(before[0].is_none() && after[0].is_none());
        for (b, a) in before.iter().zip(&after).skip(1) {
            assert_ne!(b, a);
        }
    }

    #[test]
    fn classify_picks_strongest_output() {
        let params = Parameters::new(vec![vec![1.0, 0.0], vec![0.0, 1.0]], vec![0.0, 0.0]);
        let layers: Vec<Box<dyn Layer>> = vec![
            Box::new(InputLayer::new(2).unwrap()),
            Box::new(OutputLayer::from_parameters(params.unwrap())),
        ];
        let network = Network::new(layers).unwrap();
        assert_eq!(network.classify(&[0.9, 0.1]).unwrap(), 0);
        assert_eq!(network.classify(&[-0.5, 0.2]).unwrap(), 1);
        assert_relative_eq!(network.run(&[0.5, 0.0]).unwrap()[0], 0.5f64.tanh());
    }
}
