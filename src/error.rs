//! Error types
//!
//! Nothing here propagates out of the frame loop: setup errors disable the
//! component that raised them, config errors are reported before a scene
//! is built.

use thiserror::Error;

/// Raised while attaching a component or registering a manager
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// A required reference (collider, volume, prefab, node) is not set
    #[error("{component}: required {dependency} is missing")]
    MissingDependency {
        component: String,
        dependency: &'static str,
    },
    /// A second manager of the same kind was registered
    #[error("duplicate {0} instance, keeping the first one")]
    DuplicateSingleton(&'static str),
}

impl SetupError {
    pub fn missing(component: impl Into<String>, dependency: &'static str) -> Self {
        SetupError::MissingDependency {
            component: component.into(),
            dependency,
        }
    }
}

/// Raised while loading or validating a `GameConfig`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
