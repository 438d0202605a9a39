use super::{Cache, Layer};
use crate::error::{Error, Result};

/// The entry point of a chain: passes its input through unchanged.
#[derive(Clone, Debug)]
pub struct InputLayer {
    cache: Cache,
}

impl InputLayer {
    /// Creates an identity layer accepting `width` inputs.
    pub fn new(width: usize) -> Result<Self> {
        if width == 0 {
            return Err(Error::InvalidWidth { layer: "input layer" });
        }
        Ok(InputLayer {
            cache: Cache::new(width, width),
        })
    }
}

impl Layer for InputLayer {
    fn input_len(&self) -> usize {
        self.cache.inputs.len()
    }

    fn output_len(&self) -> usize {
        self.cache.outputs.len()
    }

    fn evaluate(&self, inputs: &[f64], outputs: &mut [f64]) {
        assert_eq!(inputs.len(), self.input_len());
        outputs.copy_from_slice(inputs);
    }

    fn forward(&mut self, inputs: &[f64]) -> &[f64] {
        assert_eq!(inputs.len(), self.input_len());
        self.cache.inputs.copy_from_slice(inputs);
        self.cache.outputs.copy_from_slice(inputs);
        &self.cache.outputs
    }

    fn backward(&mut self, _: f64, _: &[f64]) -> &[f64] {
        &[]
    }
}
