use crate::error::{GeofenceError, Result};
use crate::models::ValidityMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Label used for events whose vehicle has no known display name
pub const DEFAULT_FALLBACK_VEHICLE_NAME: &str = "Unknown Vehicle";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Plain settings the detector is constructed with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorConfig {
    pub fallback_vehicle_name: String,
    pub zone_validity: ValidityMode,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            fallback_vehicle_name: DEFAULT_FALLBACK_VEHICLE_NAME.to_string(),
            zone_validity: ValidityMode::Lenient,
        }
    }
}

/// Layered configuration for the geofence engine
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub fallback_vehicle_name: ConfigValue<String>,
    pub zone_validity: ConfigValue<ValidityMode>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            fallback_vehicle_name: ConfigValue::new(
                DEFAULT_FALLBACK_VEHICLE_NAME.to_string(),
                ConfigSource::Default,
            ),
            zone_validity: ConfigValue::new(ValidityMode::Lenient, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeofenceError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeofenceError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(name) = file_config.fallback_vehicle_name {
            self.fallback_vehicle_name.update(name, ConfigSource::File);
        }

        if let Some(zone_validity) = file_config.zone_validity {
            self.zone_validity.update(zone_validity, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // GEOFENCE_FALLBACK_VEHICLE_NAME
        if let Ok(name) = env::var("GEOFENCE_FALLBACK_VEHICLE_NAME") {
            if name.trim().is_empty() {
                tracing::warn!("Ignoring empty GEOFENCE_FALLBACK_VEHICLE_NAME");
            } else {
                self.fallback_vehicle_name.update(name, ConfigSource::Environment);
            }
        }

        // GEOFENCE_ZONE_VALIDITY
        if let Ok(validity_str) = env::var("GEOFENCE_ZONE_VALIDITY") {
            match parse_validity_mode(&validity_str) {
                Ok(validity) => self.zone_validity.update(validity, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOFENCE_ZONE_VALIDITY value '{}': expected strict or lenient",
                    validity_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(name) = overrides.fallback_vehicle_name {
            self.fallback_vehicle_name.update(name, ConfigSource::Cli);
        }

        if let Some(zone_validity) = overrides.zone_validity {
            self.zone_validity.update(zone_validity, ConfigSource::Cli);
        }
    }

    /// Resolve the effective detector settings
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            fallback_vehicle_name: self.fallback_vehicle_name.value.clone(),
            zone_validity: self.zone_validity.value,
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "fallback_vehicle_name".to_string(),
            (self.fallback_vehicle_name.value.clone(), self.fallback_vehicle_name.source),
        );

        map.insert(
            "zone_validity".to_string(),
            (format!("{:?}", self.zone_validity.value), self.zone_validity.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    fallback_vehicle_name: Option<String>,
    zone_validity: Option<ValidityMode>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub fallback_vehicle_name: Option<String>,
    pub zone_validity: Option<ValidityMode>,
}

/// Parse validity mode from string
pub fn parse_validity_mode(s: &str) -> Result<ValidityMode> {
    match s.to_lowercase().as_str() {
        "strict" => Ok(ValidityMode::Strict),
        "lenient" => Ok(ValidityMode::Lenient),
        _ => Err(GeofenceError::ConfigInvalid {
            key: "zone_validity".to_string(),
            reason: format!("Invalid validity mode: {}. Use strict or lenient", s),
        }),
    }
}
