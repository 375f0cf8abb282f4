//! A fully connected feedforward neural network trained by backpropagation
//! with momentum, one sample at a time.

pub mod activator;
pub mod backprop;
pub mod config;
pub mod error;
pub mod layer;
pub mod network;
pub mod node;
pub mod trainer;

pub use crate::activator::Activator;
pub use crate::backprop::{Backpropagation, Learner};
pub use crate::error::{Error, Result};
pub use crate::network::Network;
