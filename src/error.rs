use thiserror::Error;

/// Errors produced while configuring, training or persisting agents and environments
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid action {action}, the action space has {nr_actions} actions")]
    InvalidAction { action: usize, nr_actions: usize },

    #[error("cannot select an action from an empty action space")]
    EmptyActionSpace,

    #[error("expected {expected} action counts, found {found}")]
    MissingCounts { expected: usize, found: usize },

    #[error("malformed map: {0}")]
    Map(String),

    #[error("unsupported model version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
