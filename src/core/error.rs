//! Configuration error types

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for loading and validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be opened or read
    #[error("config: read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed against the schema
    #[error("config: parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// One or more invariants were violated
    #[error("{0}")]
    Invalid(ValidationErrors),
}

impl ConfigError {
    pub fn is_read(&self) -> bool {
        matches!(self, ConfigError::Read { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, ConfigError::Parse { .. })
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ConfigError::Invalid(_))
    }

    /// Path of the offending file, for read and parse failures
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => Some(path.as_path()),
            ConfigError::Invalid(_) => None,
        }
    }
}

/// A single invariant violation at a dotted document path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Document path, e.g. `agents.worker.prompt.system` or `pipeline[2].depends_on`
    pub path: String,

    /// Short human-readable reason
    pub reason: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Every violation found by one validation pass, in check order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// `Ok(())` when nothing was recorded, otherwise the composite error
    pub fn into_result(self) -> Result<(), ConfigError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}
