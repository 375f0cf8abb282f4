//! Error types for network construction and training.

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Contract violations caught at the API boundary.
///
/// These are usage errors, never transient conditions: nothing is retried and
/// nothing is partially applied.
#[derive(Error, Debug)]
pub enum Error {
    /// A network needs at least one input
    #[error("network must have at least one input")]
    NoInputs,

    /// A network needs at least one output
    #[error("network must have at least one output")]
    NoOutputs,

    /// A hidden layer was configured with no nodes
    #[error("hidden layer {layer} has no nodes")]
    EmptyLayer { layer: usize },

    /// A training sample does not match the network input width
    #[error("sample {sample} has {actual} inputs, network expects {expected}")]
    InputLength {
        sample: usize,
        expected: usize,
        actual: usize,
    },

    /// A training target does not match the network output width
    #[error("target {sample} has {actual} outputs, network produces {expected}")]
    TargetLength {
        sample: usize,
        expected: usize,
        actual: usize,
    },

    /// Samples and targets are not aligned by index
    #[error("{samples} samples but {targets} targets")]
    SampleCount { samples: usize, targets: usize },

    /// The learner was sized for a different network
    #[error("learner is bound to a network with a different topology")]
    Topology,

    /// A learning rate, momentum or weight range out of bounds
    #[error("invalid hyperparameter: {0}")]
    InvalidHyperparameter(String),

    /// JSON configuration could not be parsed
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
