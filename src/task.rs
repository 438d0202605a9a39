//! The behaviours a training run is driven by.

use crate::error::{Error, Result};

/// A learning problem: where samples come from and what they should map to.
///
/// Only `sample` and `label` are required. The defaults for `error` and
/// `loss` are the plain residual and the sum of squares.
pub trait Task {
    /// Writes one freshly generated input sample into `input`.
    fn sample(&mut self, input: &mut [f64]);

    /// Writes the ground-truth target for `input` into `target` and returns
    /// the index of the true class, which must be less than `target.len()`.
    fn label(&self, input: &[f64], target: &mut [f64]) -> Result<usize>;

    /// Writes the loss gradient with respect to the prediction into `error`.
    fn error(&self, predicted: &[f64], target: &[f64], error: &mut [f64]) {
        residual(predicted, target, error);
    }

    /// Reduces an error vector to a single number for progress reporting.
    fn loss(&self, error: &[f64]) -> f64 {
        sum_of_squares(error)
    }
}

/// Sets `target[index]` to `1` and every other element to `-1`.
///
/// Returns `index`, or an error when there is no such element.
pub fn one_hot(index: usize, target: &mut [f64]) -> Result<usize> {
    if index >= target.len() {
        return Err(Error::ClassOutOfRange {
            index,
            classes: target.len(),
        });
    }
    for (i, t) in target.iter_mut().enumerate() {
        *t = if i == index { 1.0 } else { -1.0 };
    }
    Ok(index)
}

/// Computes `predicted - target` elementwise.
///
/// # Panics
///
/// Panics if the three slices differ in length.
pub fn residual(predicted: &[f64], target: &[f64], error: &mut [f64]) {
    assert_eq!(predicted.len(), target.len());
    assert_eq!(predicted.len(), error.len());
    for (e, (p, t)) in error.iter_mut().zip(predicted.iter().zip(target)) {
        *e = p - t;
    }
}

pub fn sum_of_squares(error: &[f64]) -> f64 {
    error.iter().map(|e| e * e).sum()
}
