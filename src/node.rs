//! A single computational unit of a layer.

use crate::activator::Activator;

/// A neuron holding its own weight vector.
///
/// A node never owns its inputs: every node in a layer reads the same
/// bias-augmented buffer owned by the [`Layer`](crate::layer::Layer), which is
/// handed to [`Node::compute`] as a borrowed slice. `weights[0]` pairs with the
/// bias slot of that buffer.
#[derive(Clone, Debug)]
pub struct Node {
    weights: Vec<f64>,
    threshold: f64,
    activator: Activator,
    output: f64,
}

impl Node {
    /// Creates a node with `inputs` zeroed weights, bias weight included.
    pub fn new(activator: Activator, inputs: usize) -> Self {
        Node::with_weights(activator, vec![0.0; inputs], 0.0)
    }

    /// Creates a node with explicit weights and threshold.
    pub fn with_weights(activator: Activator, weights: Vec<f64>, threshold: f64) -> Self {
        Node {
            weights,
            threshold,
            activator,
            output: 0.0,
        }
    }

    /// Runs the activation function over `inputs`, caching and returning the
    /// result.
    ///
    /// `inputs` must be as long as the weight vector.
    pub fn compute(&mut self, inputs: &[f64]) -> f64 {
        assert_eq!(inputs.len(), self.weights.len());
        self.output = self.activator.activate(inputs, &self.weights, self.threshold);
        self.output
    }

    /// The value produced by the last call to [`Node::compute`].
    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    pub fn activator(&self) -> Activator {
        self.activator
    }
}
