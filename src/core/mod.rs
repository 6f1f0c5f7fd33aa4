//! Core configuration model for conductor
//!
//! This module defines the `orchestrator.yaml` schema, loads it from disk,
//! and validates it.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validator;

pub use error::{ConfigError, ValidationErrors, Violation};
pub use loader::{from_yaml, load, DEFAULT_CONFIG_PATH};
pub use schema::*;
pub use validator::{collect_violations, validate};
