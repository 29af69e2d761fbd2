//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use valuator_core::{PeriodType, Result, ValuatorError};
use valuator_store::StoreConfig;

/// Settings of a [`Valuator`](crate::Valuator).
///
/// Every field has a default, so `{}` is a valid configuration: annual
/// filings and no persistence.
///
/// ```
/// use valuator::{PeriodType, ValuatorConfig};
///
/// let config = ValuatorConfig::from_json(r#"{
///     "period_type": "quarterly",
///     "store": { "kind": "file", "root": "/var/lib/valuator" }
/// }"#).unwrap();
/// assert_eq!(config.period_type, PeriodType::Quarterly);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuatorConfig {
    /// Period type requested from the filing source.
    pub period_type: PeriodType,
    /// Where raw filings and valuations are persisted.
    pub store: StoreConfig,
}

impl ValuatorConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    /// Returns [`ValuatorError::Parse`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ValuatorError::Parse(e.to_string()))
    }

    /// Reads a JSON configuration file.
    ///
    /// # Errors
    /// Returns [`ValuatorError::Other`] if the file cannot be read, or
    /// [`ValuatorError::Parse`] if it is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ValuatorError::Other(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ValuatorConfig::from_json("{}").unwrap();
        assert_eq!(config, ValuatorConfig::default());
        assert_eq!(config.period_type, PeriodType::Annual);
        assert_eq!(config.store, StoreConfig::None);
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("valuator.json");
        std::fs::write(
            &path,
            r#"{"period_type": "annual", "store": {"kind": "sqlite", "path": "valuator.db"}}"#,
        )
        .unwrap();

        let config = ValuatorConfig::load(&path).unwrap();
        assert_eq!(
            config.store,
            StoreConfig::Sqlite {
                path: PathBuf::from("valuator.db")
            }
        );
    }

    #[test]
    fn test_malformed_config() {
        assert!(matches!(
            ValuatorConfig::from_json(r#"{"period_type": "weekly"}"#),
            Err(ValuatorError::Parse(_))
        ));
        assert!(ValuatorConfig::load("/nonexistent/valuator.json").is_err());
    }
}
