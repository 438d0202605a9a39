//! The layers a network chain is assembled from.
//!
//! Every layer implements [`Layer`]. Layers never reference their neighbours;
//! the owning [`Network`](crate::feed_forward::Network) threads the signals
//! between them in chain order.

mod dense;
mod input;
mod mapping;
mod output;

pub use self::dense::{DenseLayer, Parameters};
pub use self::input::InputLayer;
pub use self::mapping::{feature, Feature, MappingInputLayer};
pub use self::output::OutputLayer;

use std::fmt;

/// The capability shared by every layer variant.
///
/// A layer cycles forward, backward, forward, ... once per training sample.
/// `backward` reads the values cached by the preceding `forward` call, so
/// calling it first yields meaningless gradients.
///
/// Like the slices they are built on, layers assert that every slice handed
/// to them has the width they were built with, and panic otherwise.
/// [`Network`](crate::feed_forward::Network) checks widths before calling
/// into its layers and reports a mismatch as [`Error::WidthMismatch`].
///
/// [`Error::WidthMismatch`]: crate::Error::WidthMismatch
pub trait Layer: fmt::Debug {
    /// Returns the number of inputs to this layer.
    fn input_len(&self) -> usize;

    /// Returns the number of outputs from this layer.
    fn output_len(&self) -> usize;

    /// Computes the layer's outputs without touching any cached state.
    fn evaluate(&self, inputs: &[f64], outputs: &mut [f64]);

    /// Feeds `inputs` forward, caching both the inputs and the resulting
    /// outputs for the next `backward` call. Returns the cached outputs.
    fn forward(&mut self, inputs: &[f64]) -> &[f64];

    /// Feeds `output_errors`, the loss gradient with respect to this layer's
    /// outputs, backwards through the layer.
    ///
    /// Trainable layers update their parameters in place and return the
    /// gradient with respect to their inputs. Layers with nothing to train
    /// return an empty slice.
    fn backward(&mut self, learning_rate: f64, output_errors: &[f64]) -> &[f64];

    /// Returns the trainable parameters, if the layer has any.
    fn parameters(&self) -> Option<&Parameters> {
        None
    }

    /// Returns true if this layer receives the externally computed error.
    fn is_output(&self) -> bool {
        false
    }
}

/// The values seen by the most recent `forward` call.
#[derive(Clone, Debug)]
struct Cache {
    inputs: Vec<f64>,
    outputs: Vec<f64>,
}

impl Cache {
    fn new(inputs: usize, outputs: usize) -> Self {
        Cache {
            inputs: vec![0.0; inputs],
            outputs: vec![0.0; outputs],
        }
    }
}
