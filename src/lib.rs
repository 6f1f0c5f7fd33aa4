//! conductor - configuration for an agent orchestration pipeline

pub mod cli;
pub mod core;
pub mod logging;

// Re-export commonly used types
pub use crate::core::{load, validate, ConfigError, Configuration, ValidationErrors, Violation};
pub use crate::core::{AgentSpec, BuildSpec, CredentialSpec, ProjectRef, PromptSpec, SecretRef, StepSpec};
pub use logging::init_logging;
