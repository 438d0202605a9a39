//! Utilities for training neural networks.

use crate::error::{Error, Result};
use crate::feed_forward::Network;
use crate::task::Task;
use crate::utils::ZeroOut;

use std::time::Instant;
use tracing::{debug, info, trace};

/// A builder for training networks by stochastic gradient descent.
#[derive(Debug)]
pub struct Trainer {
    network: Network,
    learning_rate: f64,
    iterations: usize,
    logging: Logging,
}

impl Trainer {
    /// Creates a new Trainer instance for an already assembled `network`.
    ///
    /// The trainer is initialized with some default values. These defaults are:
    ///
    /// * A learning rate of 0.1.
    /// * Stops after 1000 training iterations.
    /// * Logs on training completion.
    pub fn new(network: Network) -> Self {
        Trainer {
            network,
            learning_rate: 0.1,
            iterations: 1000,
            logging: Logging::Completion,
        }
    }

    /// Sets the learning rate to use during gradient descent.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the number of samples to train on.
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Trains the network on samples drawn from `task`.
    ///
    /// Every iteration draws a fresh sample, runs it forward through the
    /// chain, and feeds the resulting error backwards in reverse chain
    /// order. Only the layers' parameters carry over between iterations.
    ///
    /// Returns:
    ///   The trained network, or an error if invalid training parameters
    ///   were provided or `task` broke its contract.
    pub fn train<T: Task + ?Sized>(mut self, task: &mut T) -> Result<Network> {
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(Error::InvalidLearningRate(self.learning_rate));
        }

        let mut input = vec![0.0; self.network.input_len()];
        let mut target = vec![0.0; self.network.output_len()];
        let mut error = vec![0.0; self.network.output_len()];

        let start_time = Instant::now();
        let mut window_loss = 0.0;
        let mut total_loss = 0.0;
        for iteration in 1..=self.iterations {
            draw(task, &mut input, &mut target)?;
            error.zero_out();

            let prediction = self.network.forward(&input)?;
            task.error(prediction, &target, &mut error);
            let loss = task.loss(&error);
            trace!(iteration, loss, "sample");

            self.network.backward(self.learning_rate, &error)?;

            window_loss += loss;
            total_loss += loss;
            if let Some(window) = self.logging.due(iteration) {
                self.logging.iteration(iteration, window_loss / window as f64);
                window_loss = 0.0;
            }
        }

        let mean_loss = if self.iterations > 0 {
            total_loss / self.iterations as f64
        } else {
            0.0
        };
        self.logging.completion(self.iterations, mean_loss, start_time);
        Ok(self.network)
    }
}

/// Runs `samples` fresh samples from `task` through `network` without
/// training it, returning the percentage whose strongest output matches the
/// true class.
pub fn accuracy<T: Task + ?Sized>(network: &Network, task: &mut T, samples: usize) -> Result<f64> {
    if samples == 0 {
        return Err(Error::NoSamples);
    }
    let mut input = vec![0.0; network.input_len()];
    let mut target = vec![0.0; network.output_len()];
    let mut correct = 0;
    for _ in 0..samples {
        let class = draw(task, &mut input, &mut target)?;
        if network.classify(&input)? == class {
            correct += 1;
        }
    }
    let rate = 100.0 * correct as f64 / samples as f64;
    debug!(correct, samples, rate, "evaluation finished");
    Ok(rate)
}

/// Draws one labelled sample into the provided buffers, returning its class.
fn draw<T: Task + ?Sized>(task: &mut T, input: &mut [f64], target: &mut [f64]) -> Result<usize> {
    input.zero_out();
    target.zero_out();
    task.sample(input);
    if input.iter().any(|x| !x.is_finite()) {
        return Err(Error::NonFiniteSample);
    }
    let class = task.label(input, target)?;
    if class >= target.len() {
        return Err(Error::ClassOutOfRange {
            index: class,
            classes: target.len(),
        });
    }
    Ok(class)
}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Logging {
    /// No logs will be emitted
    Silent,
    /// A summary will be emitted at completion
    Completion,
    /// The mean loss will be emitted after every `n` training iterations, as
    /// well as a summary at completion
    Iterations(usize),
}

impl Logging {
    /// Returns the window size if a progress line is due at `iteration`.
    fn due(&self, iteration: usize) -> Option<usize> {
        match *self {
            Logging::Iterations(freq) if freq > 0 && iteration % freq == 0 => Some(freq),
            _ => None,
        }
    }

    /// Reports the mean loss over the window ending at `iteration`.
    fn iteration(&self, iteration: usize, mean_loss: f64) {
        info!(iteration, mean_loss, "training progress");
    }

    /// Performs logging at the end of training.
    fn completion(&self, iterations: usize, mean_loss: f64, start_time: Instant) {
        if let Logging::Silent = self {
            return;
        }
        info!(
            iterations,
            mean_loss,
            elapsed = ?start_time.elapsed(),
            "training completed"
        );
    }
}
