//! Configuration file loading

use super::schema::{ConfigSchema, PlacementMode, MAX_RADIUS_KM};
use crate::error::{Error, ErrorCode, Result, ResultExt};
use crate::validation::Validator;
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed settings
    pub schema: ConfigSchema,
    /// File the settings came from, if any
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and defaults are used when nothing is found.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            if !Path::new(p).exists() {
                return Err(Error::config_not_found(p));
            }
        }

        let config_path = path.map(String::from).or_else(find_config_file);

        let schema = if let Some(ref p) = config_path {
            tracing::debug!(path = %p, "Loading configuration");
            load_config_file(p)?
        } else {
            tracing::debug!("No configuration file found, using defaults");
            ConfigSchema::default()
        };

        validate(&schema).context(format!(
            "In {}",
            config_path.as_deref().unwrap_or("default configuration")
        ))?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let schema: ConfigSchema = toml::from_str(content)?;
        validate(&schema)?;
        Ok(Self { schema, path: None })
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = [
        ".bookshare.toml",
        "bookshare.toml",
        ".config/bookshare.toml",
    ];

    candidates
        .into_iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(String::from)
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read config file {path}: {e}")).with_source(e))?;

    toml::from_str(&content).map_err(|e| {
        Error::new(
            ErrorCode::ConfigParseError,
            format!("Failed to parse config file {path}: {e}"),
        )
        .with_source(e)
    })
}

/// Check value ranges that serde cannot express
fn validate(schema: &ConfigSchema) -> Result<()> {
    let locator = &schema.locator;
    let mut validator = Validator::new()
        .coordinate("locator.fallback", locator.fallback_latitude, locator.fallback_longitude)
        .radius_km("locator.default_radius_km", locator.default_radius_km)
        .range("map.zoom", schema.map.zoom, 0, 22)
        .range("map.circle_points", schema.map.circle_points, 3, 1024)
        .one_of(
            "logging.level",
            &schema.logging.level.to_ascii_lowercase(),
            &["trace", "debug", "info", "warn", "error"],
        );

    if schema.placement.mode == PlacementMode::Synthetic {
        validator = validator.range("placement.spread_km", schema.placement.spread_km, 0.0, MAX_RADIUS_KM);
    }

    validator
        .validate()
        .to_result()
        .map_err(|e| Error::invalid_config(e.message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapBackendKind;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.locator.default_radius_km, 5.0);
        assert_eq!(config.schema.locator.fallback_latitude, 40.7128);
        assert_eq!(config.schema.locator.fallback_longitude, -74.0060);
        assert_eq!(config.schema.map.backend, MapBackendKind::Mapbox);
        assert_eq!(config.schema.placement.mode, PlacementMode::Synthetic);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [map]
            backend = "leaflet"

            [placement]
            mode = "stored"
            "#,
        )
        .unwrap();

        assert_eq!(config.schema.map.backend, MapBackendKind::Leaflet);
        assert_eq!(config.schema.map.circle_points, 64);
        assert_eq!(config.schema.placement.mode, PlacementMode::Stored);
        assert_eq!(config.schema.locator.default_radius_km, 5.0);
    }

    #[test]
    fn test_out_of_range_radius_is_rejected() {
        let err = Config::from_toml("[locator]\ndefault_radius_km = 75.0\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
        assert!(err.message.contains("locator.default_radius_km"));
    }

    #[test]
    fn test_fallback_outside_wgs84_is_rejected() {
        let err = Config::from_toml("[locator]\nfallback_latitude = 95.0\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
        assert!(err.message.contains("locator.fallback"));
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let err = Config::from_toml("[logging]\nlevel = \"loud\"\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
        assert!(err.message.contains("logging.level"));

        assert!(Config::from_toml("[logging]\nlevel = \"DEBUG\"\n").is_ok());
    }

    #[test]
    fn test_unknown_backend_is_parse_error() {
        let err = Config::from_toml("[map]\nbackend = \"bing\"\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[locator]\ndefault_radius_km = 12.0").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.schema.locator.default_radius_km, 12.0);
        assert_eq!(config.path.as_deref(), Some(path.as_str()));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some("/definitely/not/here/bookshare.toml")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }
}
