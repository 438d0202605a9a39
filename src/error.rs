//! Error types for network construction and training.

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration and contract violations detected by precondition checks.
///
/// None of these are transient: every variant describes a programming or
/// configuration mistake on the caller's side.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A layer was built with a zero width
    #[error("{layer} width must be positive")]
    InvalidWidth { layer: &'static str },

    /// Two vectors that must agree in length do not
    #[error("{what}: expected length {expected}, got {actual}")]
    WidthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Weight accessor called outside the layer's dimensions
    #[error(
        "weight ({input}, {output}) out of range for a {inputs}x{outputs} layer"
    )]
    WeightOutOfRange {
        input: usize,
        output: usize,
        inputs: usize,
        outputs: usize,
    },

    /// The oracle produced a class that has no output unit
    #[error("class index {index} out of range for {classes} classes")]
    ClassOutOfRange { index: usize, classes: usize },

    /// The sample generator produced a NaN or infinite value
    #[error("sample contains a non-finite value")]
    NonFiniteSample,

    /// The layer chain does not form a usable network
    #[error("invalid network: {0}")]
    InvalidNetwork(String),

    /// Learning rate is not a positive finite number
    #[error("invalid learning rate {0}")]
    InvalidLearningRate(f64),

    /// Evaluation requested over an empty sample set
    #[error("accuracy needs at least one sample")]
    NoSamples,
}
