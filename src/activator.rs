//! The saturating nonlinearity applied by every trainable layer.
//!
//! Only the [hyperbolic tangent](https://en.wikipedia.org/wiki/Hyperbolic_functions)
//! is supported. Its output lies in `(-1, 1)`.

/// Evaluates `tanh(x)`.
#[inline]
pub fn f(x: f64) -> f64 {
    x.tanh()
}

/// Evaluates the derivative `f'(x)`, where `x = f^{-1}(y)`.
///
/// Note that this function takes in the *output* of the activation
/// function, rather than the input. This means layers only have to cache
/// their activations, not the sums that produced them.
#[inline]
pub fn fprime(y: f64) -> f64 {
    1.0 - y * y
}
