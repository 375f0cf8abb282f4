//! Utilities for training networks over many epochs.
//!
//! # Example
//!
//! Let's train a single sigmoid unit to compute the OR function:
//!
//! ```
//! # use backprop::activator::Activator;
//! # use backprop::network::Network;
//! # use backprop::trainer::*;
//! // Create examples of the OR function
//! let samples = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
//! let targets = [[0.0], [1.0], [1.0], [1.0]];
//!
//! // Train a network using those examples
//! let network = Network::new(2, 1, &[], Activator::Sigmoid, Activator::Sigmoid).unwrap();
//! let mut network = Trainer::new(network)
//!     .learning_rate(0.5)
//!     .momentum(0.1)
//!     .initial_weights(-0.05, 0.05, 1)
//!     .logging(Logging::Silent)
//!     .stop_condition(StopCondition::Iterations(2000))
//!     .train(&samples, &targets)
//!     .unwrap();
//!
//! // And verify the network correctly computes OR!
//! let classify = |out: Vec<f64>| out[0] > 0.5;
//! assert_eq!(classify(network.evaluate(&[0.0, 0.0])), false);
//! assert_eq!(classify(network.evaluate(&[0.0, 1.0])), true);
//! assert_eq!(classify(network.evaluate(&[1.0, 0.0])), true);
//! assert_eq!(classify(network.evaluate(&[1.0, 1.0])), true);
//! ```

use crate::backprop::Backpropagation;
use crate::config::Hyperparameters;
use crate::error::Result;
use crate::network::Network;

use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// A builder for training a network with backpropagation.
///
/// Each epoch runs every sample once, in order, through
/// [`Network::train`](crate::network::Network::train). One `Backpropagation`
/// learner is kept across epochs so its momentum state carries over.
///
/// Training always ends: besides the stop condition, it stops once the epoch
/// error is no longer finite, and after `max_iterations` epochs when a cap is
/// set.
#[derive(Debug)]
pub struct Trainer {
    network: Network,
    learning_rate: f64,
    momentum: f64,
    initial_weights: Option<(f64, f64, u64)>,
    logging: Logging,
    stop_condition: StopCondition,
    max_iterations: Option<usize>,
}

/// Where a training run ended.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Progress {
    /// Number of completed epochs.
    pub iterations: usize,
    /// Error of the last epoch, `Σ SSE / (2 * samples)`.
    pub error: f64,
}

impl Trainer {
    /// Creates a new Trainer instance.
    ///
    /// The trainer is initialized with some default values. These defaults are:
    ///
    /// * A learning rate of 0.3.
    /// * A momentum of 0.2.
    /// * The network's current weights, left as they are.
    /// * Stops after 1000 training iterations, with no further cap.
    /// * Logs on training completion.
    pub fn new(network: Network) -> Self {
        Trainer {
            network,
            learning_rate: 0.3,
            momentum: 0.2,
            initial_weights: None,
            logging: Logging::Completion,
            stop_condition: StopCondition::Iterations(1000),
            max_iterations: None,
        }
    }

    /// Creates a Trainer configured from `params`.
    ///
    /// `params.epochs` always bounds the run. With an `error_threshold` set,
    /// training may stop earlier once the epoch error drops below it.
    pub fn with_hyperparameters(network: Network, params: &Hyperparameters) -> Self {
        let stop = match params.error_threshold {
            Some(threshold) => StopCondition::ErrorThreshold(threshold),
            None => StopCondition::Iterations(params.epochs),
        };
        Trainer::new(network)
            .learning_rate(params.learning_rate)
            .momentum(params.momentum)
            .initial_weights(params.weight_low, params.weight_high, params.seed)
            .stop_condition(stop)
            .max_iterations(params.epochs)
    }

    /// Sets the learning rate to use during gradient descent.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the weight given to the previous sample's deltas.
    pub fn momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    /// Randomizes the weights in `[low, high)` from `seed` before training.
    pub fn initial_weights(mut self, low: f64, high: f64, seed: u64) -> Self {
        self.initial_weights = Some((low, high, seed));
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Sets the condition to finish training.
    pub fn stop_condition<C>(mut self, condition: C) -> Self
    where
        C: Into<StopCondition>,
    {
        self.stop_condition = condition.into();
        self
    }

    /// Caps the number of epochs, whatever the stop condition.
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Trains the network on `samples` aligned by index with `targets`.
    ///
    /// Returns:
    ///   The trained network, or an error if the data does not fit the network
    ///   or the hyperparameters are invalid.
    pub fn train<I, O>(self, samples: &[I], targets: &[O]) -> Result<Network>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        self.run(samples, targets).map(|(network, _)| network)
    }

    /// Trains like [`Trainer::train`], also reporting where training ended.
    pub(crate) fn run<I, O>(self, samples: &[I], targets: &[O]) -> Result<(Network, Progress)>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        let mut network = self.network;
        if let Some((low, high, seed)) = self.initial_weights {
            network.randomize_weights_seeded(low, high, seed);
        }
        let mut learner = Backpropagation::new(&network, self.learning_rate, self.momentum)?;
        network.validate(samples, targets, &learner)?;
        let mut progress = Progress {
            iterations: 0,
            error: 0.0,
        };
        if samples.is_empty() {
            debug!("no training samples, leaving network untouched");
            return Ok((network, progress));
        }

        let start_time = Instant::now();
        loop {
            progress.error =
                network.fit(samples, targets, &mut learner) / (2.0 * samples.len() as f64);
            progress.iterations += 1;

            self.logging.iteration(progress.iterations, progress.error);
            if !progress.error.is_finite() {
                warn!(
                    "training diverged at iteration {}: MSE={}",
                    progress.iterations, progress.error
                );
                break;
            }
            if self
                .max_iterations
                .map_or(false, |cap| progress.iterations >= cap)
            {
                break;
            }
            if self
                .stop_condition
                .should_stop(progress.iterations, progress.error, start_time)
            {
                break;
            }
        }
        self.logging
            .completion(progress.iterations, progress.error, start_time);
        Ok((network, progress))
    }
}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Logging {
    /// No logs will be emitted
    Silent,
    /// A summary will be logged at completion
    Completion,
    /// A summary will be logged after every `n` training iterations
    Iterations(usize),
}

impl Logging {
    /// Performs logging at the current `iteration` of training.
    fn iteration(&self, iteration: usize, training_error: f64) {
        if let Logging::Iterations(freq) = *self {
            if freq > 0 && iteration % freq == 0 {
                info!("iteration {}: MSE={}", iteration, training_error);
            }
        }
    }

    /// Performs logging at the end of training.
    fn completion(&self, iterations: usize, training_error: f64, start_time: Instant) {
        if let Logging::Silent = *self {
            return;
        }
        info!(
            "ran {} iterations in {:.3} seconds, final MSE={}",
            iterations,
            start_time.elapsed().as_secs_f64(),
            training_error
        );
    }
}

/// When to stop training
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StopCondition {
    /// Stops after the provided number of training iterations
    Iterations(usize),
    /// Stops when the training error drops below the provided threshold
    ErrorThreshold(f64),
    /// Stops after the provided duration
    Duration(Duration),
}

impl From<Duration> for StopCondition {
    fn from(duration: Duration) -> StopCondition {
        StopCondition::Duration(duration)
    }
}

impl StopCondition {
    /// Returns true if training is complete.
    fn should_stop(&self, iteration: usize, training_error: f64, start_time: Instant) -> bool {
        match *self {
            StopCondition::Iterations(iterations) => iteration >= iterations,
            StopCondition::ErrorThreshold(threshold) => training_error < threshold,
            StopCondition::Duration(duration) => start_time.elapsed() > duration,
        }
    }
}
