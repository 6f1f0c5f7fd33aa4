//! Configuration loading from YAML

use crate::core::error::ConfigError;
use crate::core::schema::Configuration;
use std::path::Path;
use tracing::debug;

/// Default configuration path used by the CLI
pub const DEFAULT_CONFIG_PATH: &str = "orchestrator.yaml";

/// Load configuration from a YAML file.
///
/// Performs no validation; call [`validate`](crate::core::validate) separately.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Configuration, ConfigError> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = content.len(), "read configuration");

    from_yaml(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse configuration from a YAML string.
///
/// An empty document yields the all-empty configuration.
pub fn from_yaml(yaml: &str) -> Result<Configuration, serde_yaml::Error> {
    let config: Option<Configuration> = serde_yaml::from_str(yaml)?;
    Ok(config.unwrap_or_default())
}
