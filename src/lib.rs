#[macro_use]
mod util;

/// The agent interface
pub mod agent;

/// Implemented RL algorithms
pub mod algo;

/// Experiment configuration
pub mod config;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Episode loop
pub mod episode;

/// Error type
pub mod error;

/// Exploration policies
pub mod exploration;

/// A single step of experience
pub mod transition;

/// Tabular action-value storage
pub mod value;

/// Testing environments
#[cfg(feature = "gym")]
pub mod gym;

pub use error::{Error, Result};
