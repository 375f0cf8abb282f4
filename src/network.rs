//! A fully connected [Feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network).
//!
//! # Example
//!
//! A single step perceptron computing OR:
//!
//! ```
//! # use backprop::activator::Activator;
//! # use backprop::network::Network;
//! let mut network = Network::new(2, 1, &[], Activator::Step, Activator::Step).unwrap();
//! {
//!     let node = &mut network.layers_mut()[0].nodes_mut()[0];
//!     node.weights_mut().copy_from_slice(&[0.0, 1.0, 1.0]);
//!     node.set_threshold(1.0);
//! }
//! assert_eq!(network.evaluate(&[0.0, 0.0]), vec![0.0]);
//! assert_eq!(network.evaluate(&[0.0, 1.0]), vec![1.0]);
//! assert_eq!(network.evaluate(&[1.0, 1.0]), vec![1.0]);
//! ```

use crate::activator::Activator;
use crate::backprop::Learner;
use crate::error::{Error, Result};
use crate::layer::Layer;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A Feedforward neural network
///
/// `layers` holds every hidden layer followed by the output layer. Each layer's
/// node count fixes the input width of the next one.
#[derive(Clone, Debug)]
pub struct Network {
    inputs: Vec<f64>,
    layers: Vec<Layer>,
}

impl Network {
    /// Creates a new neural network with all weights zeroed.
    ///
    /// Arguments:
    ///  * `inputs` - the width of the raw input vector.
    ///  * `outputs` - the number of output nodes.
    ///  * `hidden` - the number of nodes in each hidden layer, in order. May be
    ///               empty for a single-layer network.
    ///  * `hidden_activator` - the activation of every hidden node.
    ///  * `output_activator` - the activation of every output node.
    pub fn new(
        inputs: usize,
        outputs: usize,
        hidden: &[usize],
        hidden_activator: Activator,
        output_activator: Activator,
    ) -> Result<Self> {
        if inputs == 0 {
            return Err(Error::NoInputs);
        }
        if outputs == 0 {
            return Err(Error::NoOutputs);
        }

        let mut layers = Vec::with_capacity(hidden.len() + 1);
        let mut previous = inputs;
        for (layer, &size) in hidden.iter().enumerate() {
            if size < 1 {
                return Err(Error::EmptyLayer { layer });
            }
            layers.push(Layer::new(hidden_activator, previous, size));
            previous = size;
        }
        layers.push(Layer::new(output_activator, previous, outputs));

        debug!(
            "built network: {} inputs, hidden {:?}, {} outputs",
            inputs, hidden, outputs
        );
        Ok(Network {
            inputs: vec![0.0; inputs],
            layers,
        })
    }

    /// Returns the size of the raw input vector.
    pub fn input_len(&self) -> usize {
        self.inputs.len()
    }

    /// Returns the size of the output layer from the network.
    pub fn output_len(&self) -> usize {
        self.layers.last().map_or(0, Layer::output_len)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// Feeds the provided `inputs` through the network, returning the output
    /// layer's activations.
    ///
    /// # Panics
    ///
    /// If `inputs` is not exactly `input_len()` long.
    pub fn evaluate(&mut self, inputs: &[f64]) -> Vec<f64> {
        assert_eq!(
            inputs.len(),
            self.inputs.len(),
            "network input lengths do not match"
        );
        self.inputs.copy_from_slice(inputs);

        let mut outputs = self.inputs.clone();
        for layer in &mut self.layers {
            outputs = layer.propagate(&outputs);
        }
        outputs
    }

    /// Assigns every weight of every node from `rng`.
    ///
    /// Each weight is `u * (high - low) - |low|` for `u` uniform in `[0, 1)`.
    /// This is the half-open range `[low, high)` whenever `low <= 0`; for a
    /// positive `low` the range is shifted down to `[-low, high - 2 * low)`.
    pub fn randomize_weights<R: Rng + ?Sized>(&mut self, low: f64, high: f64, rng: &mut R) {
        let range = high - low;
        for layer in &mut self.layers {
            for node in layer.nodes_mut() {
                for weight in node.weights_mut() {
                    *weight = rng.gen::<f64>() * range - low.abs();
                }
            }
        }
    }

    /// Like [`Network::randomize_weights`], drawing from a generator seeded
    /// with `seed`.
    pub fn randomize_weights_seeded(&mut self, low: f64, high: f64, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        self.randomize_weights(low, high, &mut rng);
    }

    /// Trains the network on `samples`, one sample at a time in order.
    ///
    /// For every sample the network is evaluated and `learner` adjusts the
    /// weights against the matching target. All shapes are checked before any
    /// weight changes, so an error leaves the network untouched.
    pub fn train<I, O, L>(&mut self, samples: &[I], targets: &[O], learner: &mut L) -> Result<()>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
        L: Learner + ?Sized,
    {
        self.validate(samples, targets, learner)?;
        self.fit(samples, targets, learner);
        Ok(())
    }

    /// Verifies that `samples` and `targets` fit this network and that
    /// `learner` was built for it.
    pub(crate) fn validate<I, O, L>(&self, samples: &[I], targets: &[O], learner: &L) -> Result<()>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
        L: Learner + ?Sized,
    {
        if samples.len() != targets.len() {
            return Err(Error::SampleCount {
                samples: samples.len(),
                targets: targets.len(),
            });
        }
        for (sample, (input, target)) in samples.iter().zip(targets).enumerate() {
            if input.as_ref().len() != self.input_len() {
                return Err(Error::InputLength {
                    sample,
                    expected: self.input_len(),
                    actual: input.as_ref().len(),
                });
            }
            if target.as_ref().len() != self.output_len() {
                return Err(Error::TargetLength {
                    sample,
                    expected: self.output_len(),
                    actual: target.as_ref().len(),
                });
            }
        }
        if !learner.fits(self) {
            return Err(Error::Topology);
        }
        Ok(())
    }

    /// Runs one pass of online learning over already validated data, returning
    /// the summed squared error of the outputs seen before each update.
    pub(crate) fn fit<I, O, L>(&mut self, samples: &[I], targets: &[O], learner: &mut L) -> f64
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
        L: Learner + ?Sized,
    {
        let mut error = 0.0;
        for (d, (input, target)) in samples.iter().zip(targets).enumerate() {
            let outputs = self.evaluate(input.as_ref());
            error += sum_squared_error(&outputs, target.as_ref());
            learner.learn(self, &outputs, target.as_ref());
            trace!("sample {}: outputs={:?}", d, outputs);
        }
        error
    }
}

/// Computes `Σ (actual[i] - expected[i])^2`.
pub fn sum_squared_error(actual: &[f64], expected: &[f64]) -> f64 {
    assert_eq!(actual.len(), expected.len());
    actual
        .iter()
        .zip(expected)
        .map(|(a, e)| (a - e) * (a - e))
        .sum()
}

/// Computes the mean squared error between `actual` and `expected`.
pub fn mean_square_error(actual: &[f64], expected: &[f64]) -> f64 {
    sum_squared_error(actual, expected) / actual.len() as f64
}
