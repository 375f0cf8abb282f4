//! The [backpropagation](https://en.wikipedia.org/wiki/Backpropagation)
//! learning rule, with a momentum term.
//!
//! Delta buffers are laid out like layer input buffers: the buffer of layer `h`
//! holds a bias slot at index 0 followed by one delta per node of layer `h`.
//! For every layer but the last, that is exactly the width of the inputs of
//! layer `h + 1`, so the signal layer `h + 1` sends backwards lands index for
//! index in the buffer layer `h` consumes. The bias slot always ends up zero,
//! as the bias input is fixed at `1.0`.

use crate::activator::Activator;
use crate::error::{Error, Result};
use crate::layer::Layer;
use crate::network::Network;

use itertools::multizip;
use log::{debug, trace};

/// Adjusts a network's weights after each forward pass.
pub trait Learner {
    /// Updates `network` given the `outputs` of the forward pass just run and
    /// the `targets` the network should have produced.
    fn learn(&mut self, network: &mut Network, outputs: &[f64], targets: &[f64]);

    /// Returns true if this learner can be used with `network`.
    fn fits(&self, _network: &Network) -> bool {
        true
    }
}

/// Online gradient descent driven by backpropagated errors.
///
/// The weight update for input `i` of node `j` is
/// `w_ij += rate * delta_j * x_i + momentum * prev_delta_j`, where
/// `prev_delta_j` is the delta the same node had on the previous sample.
#[derive(Clone, Debug)]
pub struct Backpropagation {
    learn_rate: f64,
    momentum: f64,
    deltas: Vec<Vec<f64>>,
    prev_deltas: Vec<Vec<f64>>,
}

impl Backpropagation {
    /// Creates a learner with delta buffers sized for `network`.
    ///
    /// The learner stays tied to that topology; training a differently shaped
    /// network with it is rejected.
    pub fn new(network: &Network, learn_rate: f64, momentum: f64) -> Result<Self> {
        if !(learn_rate.is_finite() && learn_rate > 0.0) {
            return Err(Error::InvalidHyperparameter(format!(
                "learn rate must be positive, got {}",
                learn_rate
            )));
        }
        if !(momentum.is_finite() && momentum >= 0.0) {
            return Err(Error::InvalidHyperparameter(format!(
                "momentum must be non-negative, got {}",
                momentum
            )));
        }

        let output_activator = network
            .layers()
            .last()
            .and_then(|layer| layer.nodes().first())
            .map(|node| node.activator());
        if let Some(activator) = output_activator {
            if activator != Activator::Sigmoid {
                debug!(
                    "output activator is {:?}; output deltas still use the sigmoid o(1 - o) factor",
                    activator
                );
            }
        }

        let deltas: Vec<Vec<f64>> = network
            .layers()
            .iter()
            .map(|layer| vec![0.0; layer.output_len() + 1])
            .collect();
        Ok(Backpropagation {
            learn_rate,
            momentum,
            prev_deltas: deltas.clone(),
            deltas,
        })
    }

    pub fn learn_rate(&self) -> f64 {
        self.learn_rate
    }

    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    /// Deltas computed by the most recent call to `learn`, which the next call
    /// uses for its momentum term.
    pub fn previous_deltas(&self) -> &[Vec<f64>] {
        &self.prev_deltas
    }
}

impl Learner for Backpropagation {
    fn learn(&mut self, network: &mut Network, outputs: &[f64], targets: &[f64]) {
        assert_eq!(outputs.len(), targets.len());
        let layers = network.layers_mut();
        let last = layers.len() - 1;
        assert_eq!(self.deltas[last].len(), outputs.len() + 1);

        // o_k (1 - o_k) (t_k - o_k)
        let output_deltas = &mut self.deltas[last];
        output_deltas[0] = 0.0;
        for (delta, (&o, &t)) in output_deltas[1..]
            .iter_mut()
            .zip(outputs.iter().zip(targets))
        {
            *delta = o * (1.0 - o) * (t - o);
        }

        // Inputs of the first layer are raw values and carry no delta.
        for h in (1..=last).rev() {
            let (below, above) = self.deltas.split_at_mut(h);
            back_propagate(&layers[h], &above[0], &mut below[h - 1]);
        }

        for h in (0..=last).rev() {
            update_weights(
                &mut layers[h],
                &self.deltas[h],
                &self.prev_deltas[h],
                self.learn_rate,
                self.momentum,
            );
        }
        trace!("output deltas: {:?}", &self.deltas[last][1..]);

        std::mem::swap(&mut self.deltas, &mut self.prev_deltas);
    }

    fn fits(&self, network: &Network) -> bool {
        let layers = network.layers();
        layers.len() == self.deltas.len()
            && layers
                .iter()
                .zip(&self.deltas)
                .all(|(layer, deltas)| layer.output_len() + 1 == deltas.len())
    }
}

/// Computes the deltas arriving at each input of `layer`.
///
/// For input `i`: `x_i (1 - x_i) Σ_k w_ki delta_k`. The `x (1 - x)` factor
/// assumes the input is itself a sigmoid output.
fn back_propagate(layer: &Layer, deltas: &[f64], input_deltas: &mut [f64]) {
    assert_eq!(input_deltas.len(), layer.input_len());
    for (i, (&input, input_delta)) in layer
        .inputs()
        .iter()
        .zip(input_deltas.iter_mut())
        .enumerate()
    {
        let sum: f64 = layer
            .nodes()
            .iter()
            .zip(&deltas[1..])
            .map(|(node, delta)| node.weights()[i] * delta)
            .sum();
        *input_delta = input * (1.0 - input) * sum;
    }
}

/// Applies one step of gradient descent with momentum to every node weight.
fn update_weights(
    layer: &mut Layer,
    deltas: &[f64],
    prev_deltas: &[f64],
    learn_rate: f64,
    momentum: f64,
) {
    let (inputs, nodes) = layer.split_mut();
    for (node, &delta, &prev) in multizip((nodes.iter_mut(), &deltas[1..], &prev_deltas[1..])) {
        for (weight, &input) in node.weights_mut().iter_mut().zip(inputs) {
            *weight += learn_rate * delta * input + momentum * prev;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::sum_squared_error;
    use approx::assert_abs_diff_eq;

    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    fn sigmoid_network(inputs: usize, outputs: usize, hidden: &[usize]) -> Network {
        Network::new(inputs, outputs, hidden, Activator::Sigmoid, Activator::Sigmoid).unwrap()
    }

    #[test]
    fn delta_buffers_match_downstream_inputs() {
        let network = sigmoid_network(5, 2, &[3, 4, 3]);
        let bp = Backpropagation::new(&network, 0.3, 0.2).unwrap();
        let widths: Vec<usize> = bp.previous_deltas().iter().map(Vec::len).collect();
        assert_eq!(widths, vec![4, 5, 4, 3]);
        let layers = network.layers();
        for h in 0..layers.len() - 1 {
            assert_eq!(widths[h], layers[h + 1].input_len());
        }
    }

    #[test]
    fn rejects_bad_hyperparameters() {
        let network = sigmoid_network(1, 1, &[]);
        assert!(Backpropagation::new(&network, 0.0, 0.2).is_err());
        assert!(Backpropagation::new(&network, f64::NAN, 0.2).is_err());
        assert!(Backpropagation::new(&network, 0.3, -0.1).is_err());
        assert!(Backpropagation::new(&network, 0.3, 0.0).is_ok());
    }

    #[test]
    fn single_layer_steps() {
        let mut network = sigmoid_network(1, 1, &[]);
        let mut bp = Backpropagation::new(&network, 0.5, 0.2).unwrap();

        // Zero weights give o = 0.5 and delta = 0.5 * 0.5 * 0.5.
        network.train(&[[1.0]], &[[1.0]], &mut bp).unwrap();
        let weights = network.layers()[0].nodes()[0].weights().to_vec();
        assert_abs_diff_eq!(weights[0], 0.0625);
        assert_abs_diff_eq!(weights[1], 0.0625);
        assert_abs_diff_eq!(bp.previous_deltas()[0][1], 0.125);

        // The second step adds momentum times the first delta.
        network.train(&[[1.0]], &[[1.0]], &mut bp).unwrap();
        let o = sigmoid(0.125);
        let delta = o * (1.0 - o) * (1.0 - o);
        let expected = 0.0625 + 0.5 * delta + 0.2 * 0.125;
        let weights = network.layers()[0].nodes()[0].weights();
        assert_abs_diff_eq!(weights[0], expected, epsilon = 1e-12);
        assert_abs_diff_eq!(weights[1], expected, epsilon = 1e-12);
        assert_abs_diff_eq!(bp.previous_deltas()[0][1], delta, epsilon = 1e-12);
    }

    #[test]
    fn hidden_deltas_use_pre_update_weights() {
        let mut network = sigmoid_network(1, 1, &[1]);
        let (w, v) = ([0.1, 0.4], [-0.2, 0.3]);
        network.layers_mut()[0].nodes_mut()[0].weights_mut().copy_from_slice(&w);
        network.layers_mut()[1].nodes_mut()[0].weights_mut().copy_from_slice(&v);
        let (x, t, rate) = (0.7, 0.9, 0.3);
        let mut bp = Backpropagation::new(&network, rate, 0.2).unwrap();
        network.train(&[[x]], &[[t]], &mut bp).unwrap();

        let h = sigmoid(w[0] + w[1] * x);
        let o = sigmoid(v[0] + v[1] * h);
        let delta_o = o * (1.0 - o) * (t - o);
        let delta_h = h * (1.0 - h) * v[1] * delta_o;

        let hidden = network.layers()[0].nodes()[0].weights();
        assert_abs_diff_eq!(hidden[0], w[0] + rate * delta_h, epsilon = 1e-12);
        assert_abs_diff_eq!(hidden[1], w[1] + rate * delta_h * x, epsilon = 1e-12);
        let output = network.layers()[1].nodes()[0].weights();
        assert_abs_diff_eq!(output[0], v[0] + rate * delta_o, epsilon = 1e-12);
        assert_abs_diff_eq!(output[1], v[1] + rate * delta_o * h, epsilon = 1e-12);

        let previous = bp.previous_deltas();
        assert_eq!(previous[0][0], 0.0);
        assert_abs_diff_eq!(previous[0][1], delta_h, epsilon = 1e-12);
        assert_abs_diff_eq!(previous[1][1], delta_o, epsilon = 1e-12);
    }

    #[test]
    fn repeated_training_reduces_error() {
        let mut network = sigmoid_network(5, 2, &[3, 4, 3]);
        network.randomize_weights_seeded(-0.05, 0.05, 1);
        let mut bp = Backpropagation::new(&network, 0.3, 0.2).unwrap();
        let sample = [0.0, 2.0, 2.0, 1.0, 2.0];
        let target = [0.9, 0.1];

        let initial = sum_squared_error(&network.evaluate(&sample), &target);
        let mut previous = initial;
        for _ in 0..50 {
            network.train(&[sample], &[target], &mut bp).unwrap();
            let error = sum_squared_error(&network.evaluate(&sample), &target);
            assert!(error < previous, "{} did not improve on {}", error, previous);
            previous = error;
        }
        assert!(previous < initial / 2.0);
    }

    #[test]
    fn rejects_other_topology() {
        let small = sigmoid_network(2, 1, &[2]);
        let mut large = sigmoid_network(2, 1, &[3]);
        let mut bp = Backpropagation::new(&small, 0.3, 0.2).unwrap();
        let err = large.train(&[[0.0, 1.0]], &[[1.0]], &mut bp).unwrap_err();
        assert!(matches!(err, Error::Topology));
    }

    fn half_squared_error(network: &mut Network, sample: &[f64], target: &[f64]) -> f64 {
        0.5 * sum_squared_error(&network.evaluate(sample), target)
    }

    #[test]
    fn updates_follow_numerical_gradient() {
        let mut original = sigmoid_network(3, 2, &[3, 2]);
        original.randomize_weights_seeded(-0.5, 0.5, 21);
        let (sample, target, rate) = ([0.3, -0.8, 0.6], [0.9, 0.2], 0.5);

        let mut trained = original.clone();
        let mut bp = Backpropagation::new(&trained, rate, 0.0).unwrap();
        trained.train(&[sample], &[target], &mut bp).unwrap();

        let eps = 1e-6;
        for (h, layer) in original.layers().iter().enumerate() {
            for (j, node) in layer.nodes().iter().enumerate() {
                for (i, &weight) in node.weights().iter().enumerate() {
                    let mut shifted = original.clone();
                    shifted.layers_mut()[h].nodes_mut()[j].weights_mut()[i] = weight + eps;
                    let above = half_squared_error(&mut shifted, &sample, &target);
                    shifted.layers_mut()[h].nodes_mut()[j].weights_mut()[i] = weight - eps;
                    let below = half_squared_error(&mut shifted, &sample, &target);
                    let gradient = (above - below) / (2.0 * eps);

                    let updated = trained.layers()[h].nodes()[j].weights()[i];
                    assert_abs_diff_eq!(updated - weight, -rate * gradient, epsilon = 1e-6);
                }
            }
        }
    }
}
