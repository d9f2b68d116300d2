//! Compiler configuration.
//!
//! The defaults reproduce the stock protocol layout exactly; a TOML file can
//! override the document header values, narrow or extend the set of node
//! types treated as sensor inputs, and map custom node tags onto built-in
//! types.
//!
//! ```toml
//! sensor_types = ["input/sensor"]
//!
//! [document]
//! interval_ms = 1000
//! default_address = "0x77"
//!
//! [type_mappings]
//! "process/scale" = "process/calibration"
//! ```

use crate::error::ConfigError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;

/// Node types counted as sensor inputs unless configured otherwise.
pub const DEFAULT_SENSOR_TYPES: [&str; 3] =
    ["input/sensor", "input/modbus_sensor", "input/analog_sensor"];

/// Fixed header values of the emitted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentOptions {
    pub header: String,
    pub id: String,
    pub device_type: String,
    pub interval_ms: u32,
    pub whoami_reg: String,
    pub whoami_value: String,
    /// Used when the primary sensor has no `bus` property.
    pub default_bus: String,
    /// Used when the primary sensor has no `address` property.
    pub default_address: String,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            header: "RIVO Node Protocol - Generated from Visual Editor".to_string(),
            id: "generated-protocol".to_string(),
            device_type: "sensor".to_string(),
            interval_ms: 500,
            whoami_reg: "0xD0".to_string(),
            whoami_value: "0x60".to_string(),
            default_bus: "i2c".to_string(),
            default_address: "0x76".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Replaces [`DEFAULT_SENSOR_TYPES`] when present.
    pub sensor_types: Option<Vec<String>>,
    pub document: DocumentOptions,
    /// Custom node tag -> built-in node tag.
    pub type_mappings: AHashMap<String, String>,
}

impl CompilerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_keeps_stock_layout() {
        let config = CompilerConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config.document, DocumentOptions::default());
        assert!(config.sensor_types.is_none());
        assert!(config.type_mappings.is_empty());
    }

    #[test]
    fn partial_document_section_keeps_other_defaults() {
        let config = CompilerConfig::from_toml_str(
            r#"
            sensor_types = ["input/sensor"]

            [document]
            interval_ms = 1000

            [type_mappings]
            "process/scale" = "process/calibration"
            "#,
        )
        .expect("config parses");

        assert_eq!(config.document.interval_ms, 1000);
        assert_eq!(config.document.id, "generated-protocol");
        assert_eq!(config.sensor_types, Some(vec!["input/sensor".to_string()]));
        assert_eq!(
            config.type_mappings.get("process/scale").map(String::as_str),
            Some("process/calibration")
        );
    }

    #[test]
    fn malformed_config_is_a_parse_error() {
        let err = CompilerConfig::from_toml_str("sensor_types = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
