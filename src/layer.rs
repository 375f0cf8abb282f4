use crate::activator::Activator;
use crate::node::Node;

use rayon::prelude::*;

/// A wrapper for a single hidden or output layer of the neural network
///
/// The layer owns one bias-augmented input buffer that every node reads, so
/// copying the incoming activations in once updates the view of every node.
#[derive(Clone, Debug)]
pub struct Layer {
    /// Shared inputs, with `inputs[0]` fixed to `1.0` for the bias weight.
    inputs: Vec<f64>,
    /// The layer's neurons, each holding `inputs.len()` weights.
    nodes: Vec<Node>,
}

impl Layer {
    /// Initializes a new layer with zeroed weights.
    ///
    /// Arguments:
    ///
    ///  * `activator` - the activation function to be used for every node.
    ///  * `inputs` - the number of values fed into this layer, not counting
    ///               the bias.
    ///  * `nodes` - the number of nodes, and so outputs, of this layer.
    pub fn new(activator: Activator, inputs: usize, nodes: usize) -> Self {
        let width = inputs + 1;
        let mut buffer = vec![0.0; width];
        buffer[0] = 1.0;
        Layer {
            inputs: buffer,
            nodes: (0..nodes).map(|_| Node::new(activator, width)).collect(),
        }
    }

    /// Builds a layer around existing nodes.
    ///
    /// Every node must carry exactly `inputs + 1` weights.
    pub fn from_nodes(inputs: usize, nodes: Vec<Node>) -> Self {
        let width = inputs + 1;
        for node in &nodes {
            assert_eq!(node.weights().len(), width);
        }
        let mut buffer = vec![0.0; width];
        buffer[0] = 1.0;
        Layer {
            inputs: buffer,
            nodes,
        }
    }

    /// Returns the width of the input buffer, bias slot included.
    pub fn input_len(&self) -> usize {
        self.inputs.len()
    }

    /// Returns the number of outputs from this layer.
    pub fn output_len(&self) -> usize {
        self.nodes.len()
    }

    /// The bias-augmented inputs seen by the last propagation.
    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Splits the layer into its shared inputs and mutable nodes, for weight
    /// updates that read the inputs while writing the weights.
    pub(crate) fn split_mut(&mut self) -> (&[f64], &mut [Node]) {
        (&self.inputs, &mut self.nodes)
    }

    /// Feeds `incoming` forward through the layer, returning a fresh vector of
    /// node outputs.
    ///
    /// The buffer is written before any node runs. Nodes then compute in
    /// parallel, and all of them have finished by the time this returns.
    pub fn propagate(&mut self, incoming: &[f64]) -> Vec<f64> {
        assert_eq!(incoming.len() + 1, self.inputs.len());
        self.inputs[0] = 1.0;
        self.inputs[1..].copy_from_slice(incoming);

        let inputs = &self.inputs;
        self.nodes
            .par_iter_mut()
            .map(|node| node.compute(inputs))
            .collect()
    }
}
