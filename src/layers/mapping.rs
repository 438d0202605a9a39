use super::{Cache, Layer};
use crate::error::{Error, Result};

use std::fmt;

/// Derives one extra scalar feature from the raw input vector.
pub type Feature = Box<dyn Fn(&[f64]) -> f64>;

/// Boxes a closure as a [`Feature`].
pub fn feature<F>(f: F) -> Feature
where
    F: Fn(&[f64]) -> f64 + 'static,
{
    Box::new(f)
}

/// An input layer that widens its input with derived features.
///
/// The raw input is copied verbatim into the first `input_len` outputs, then
/// each feature is appended in registration order. Gradients are not
/// propagated through the features.
pub struct MappingInputLayer {
    features: Vec<Feature>,
    cache: Cache,
}

impl MappingInputLayer {
    /// Creates a mapping layer.
    ///
    /// Arguments:
    ///
    ///  * `width` - the number of raw inputs.
    ///  * `features` - the derived features, appended after the raw inputs.
    pub fn new(width: usize, features: Vec<Feature>) -> Result<Self> {
        if width == 0 {
            return Err(Error::InvalidWidth {
                layer: "mapping input layer",
            });
        }
        let outputs = width + features.len();
        Ok(MappingInputLayer {
            features,
            cache: Cache::new(width, outputs),
        })
    }
}

impl fmt::Debug for MappingInputLayer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MappingInputLayer")
            .field("inputs", &self.input_len())
            .field("features", &self.features.len())
            .finish()
    }
}

impl Layer for MappingInputLayer {
    fn input_len(&self) -> usize {
        self.cache.inputs.len()
    }

    fn output_len(&self) -> usize {
        self.cache.outputs.len()
    }

    fn evaluate(&self, inputs: &[f64], outputs: &mut [f64]) {
        assert_eq!(inputs.len(), self.input_len());
        assert_eq!(outputs.len(), self.output_len());
        map_into(&self.features, inputs, outputs);
    }

    fn forward(&mut self, inputs: &[f64]) -> &[f64] {
        assert_eq!(inputs.len(), self.input_len());
        self.cache.inputs.copy_from_slice(inputs);
        map_into(&self.features, inputs, &mut self.cache.outputs);
        &self.cache.outputs
    }

    fn backward(&mut self, _: f64, _: &[f64]) -> &[f64] {
        &[]
    }
}

/// Copies the raw inputs, then appends one value per feature.
fn map_into(features: &[Feature], inputs: &[f64], outputs: &mut [f64]) {
    let (raw, derived) = outputs.split_at_mut(inputs.len());
    raw.copy_from_slice(inputs);
    for (out, feature) in derived.iter_mut().zip(features) {
        *out = feature(inputs);
    }
}
