//! Persistence settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Storage keys must stay stable across releases: older snapshots are only
/// found under the keys they were written with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Key holding the serialized (optionally compressed) plan.
    pub state_key: String,
    /// Key holding the literal `"true"` / `"false"` compression flag.
    pub compression_key: String,
    /// Compression setting assumed while no flag has been stored.
    pub default_compression: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            state_key: "relocation-plan".to_owned(),
            compression_key: "relocation-plan-compressed".to_owned(),
            default_compression: true,
        }
    }
}

impl StoreConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = StoreConfig::from_toml_str("default_compression = false\n").unwrap();
        assert!(!config.default_compression);
        assert_eq!(config.state_key, "relocation-plan");
    }

    #[test]
    fn test_full_toml() {
        let config = StoreConfig::from_toml_str(
            r#"
state_key = "plan"
compression_key = "plan-compressed"
default_compression = true
"#,
        )
        .unwrap();
        assert_eq!(config.state_key, "plan");
        assert_eq!(config.compression_key, "plan-compressed");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            StoreConfig::from_toml_str("state_key = 3"),
            Err(ConfigError::Toml(_))
        ));
    }
}
