//! Activation function types.

use serde_derive::{Deserialize, Serialize};

/// [Activation function](https://en.wikipedia.org/wiki/Activation_function)
/// types.
///
/// Every variant is evaluated over a node's full input vector and weight
/// vector, together with the node's threshold, so all three share one
/// signature.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activator {
    /// Plain weighted sum of the inputs. The threshold is ignored.
    ///
    /// Useful as a linear (identity) output activation.
    WeightedSum,
    /// Perceptron step function
    ///
    /// Outputs `1.0` when the weighted sum reaches the threshold, `0.0`
    /// otherwise. The threshold is compared against, never subtracted; a bias
    /// should be encoded in `weights[0]` instead.
    Step,
    /// Logistic sigmoid of the weighted sum. The threshold is ignored.
    Sigmoid,
}

impl Activator {
    /// Evaluates the activation function for a node.
    ///
    /// `inputs` and `weights` must have the same length.
    pub fn activate(&self, inputs: &[f64], weights: &[f64], threshold: f64) -> f64 {
        let net = weighted_sum(inputs, weights);
        match *self {
            Activator::WeightedSum => net,
            Activator::Step => {
                if net >= threshold {
                    1.0
                } else {
                    0.0
                }
            }
            Activator::Sigmoid => 1.0 / (1.0 + (-net).exp()),
        }
    }
}

/// Returns `Σ inputs[i] * weights[i]`.
pub fn weighted_sum(inputs: &[f64], weights: &[f64]) -> f64 {
    debug_assert_eq!(inputs.len(), weights.len());
    inputs.iter().zip(weights).map(|(x, w)| x * w).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn weighted_sum_ignores_threshold() {
        let inputs = [1.0, 2.0, -3.0];
        let weights = [0.5, 0.25, 1.0];
        assert_abs_diff_eq!(
            Activator::WeightedSum.activate(&inputs, &weights, 100.0),
            -2.0
        );
        assert_abs_diff_eq!(weighted_sum(&inputs, &weights), -2.0);
    }

    #[test]
    fn step_compares_against_threshold() {
        let weights = [0.0, 1.0, 1.0];
        assert_eq!(Activator::Step.activate(&[1.0, 0.0, 0.0], &weights, 1.0), 0.0);
        assert_eq!(Activator::Step.activate(&[1.0, 1.0, 0.0], &weights, 1.0), 1.0);
        assert_eq!(Activator::Step.activate(&[1.0, 1.0, 1.0], &weights, 1.0), 1.0);
        assert_eq!(Activator::Step.activate(&[1.0, 1.0, 1.0], &weights, 2.5), 0.0);
    }

    #[test]
    fn sigmoid_of_weighted_sum() {
        let inputs = [1.0, 1.0];
        assert_abs_diff_eq!(Activator::Sigmoid.activate(&inputs, &[0.0, 0.0], 0.0), 0.5);
        assert_abs_diff_eq!(
            Activator::Sigmoid.activate(&inputs, &[1.0, 1.0], 0.0),
            1.0 / (1.0 + (-2.0f64).exp()),
            epsilon = 1e-12
        );
        // Threshold is accepted but unused.
        assert_eq!(
            Activator::Sigmoid.activate(&inputs, &[0.3, -0.1], 0.0),
            Activator::Sigmoid.activate(&inputs, &[0.3, -0.1], 7.0)
        );
    }
}
