//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::LaneChangeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// On-disk config syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML, everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Load and validate configuration from a file.
pub fn load_config(path: &Path) -> Result<LaneChangeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, ConfigFormat::from_path(path))
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<LaneChangeConfig, ConfigError> {
    let config: LaneChangeConfig = match format {
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON_CONFIG: &str = r#"{
        "port": 8080,
        "default": "A",
        "lanes": {
            "A": { "headers": { "Content-Type": "text/html" }, "content": "<h1>A</h1>" },
            "B": { "headers": {}, "content": "<h1>B</h1>" }
        }
    }"#;

    #[test]
    fn test_parse_minimal_json() {
        let config = parse_config(JSON_CONFIG, ConfigFormat::Json).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_lane, "A");
        assert_eq!(config.lanes.len(), 2);
        assert_eq!(config.lanes["A"].headers["Content-Type"], "text/html");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.assignments.sweep_interval_secs, 600);
        assert!(config.assignments.default_ttl().is_none());
    }

    #[test]
    fn test_parse_toml_with_sections() {
        let content = r#"
            port = 9000
            host = "127.0.0.1"
            default = "A"

            [lanes.A]
            content = "a"

            [lanes.A.headers]
            X-Lane = "a"

            [assignments]
            default_ttl_secs = 3600
            sweep_interval_secs = 60
        "#;
        let config = parse_config(content, ConfigFormat::Toml).unwrap();
        assert_eq!(config.listen_addr(), Some("127.0.0.1:9000".parse().unwrap()));
        assert_eq!(config.lanes["A"].headers["X-Lane"], "a");
        assert_eq!(config.assignments.default_ttl_secs, 3600);
        assert_eq!(config.assignments.sweep_interval().as_secs(), 60);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = parse_config("{ not json", ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_missing_keys_is_validation_error() {
        let err = parse_config(r#"{"port": 8080}"#, ConfigFormat::Json).unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert!(errors.contains(&ValidationError::MissingDefault));
                assert!(errors.contains(&ValidationError::NoLanes));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("definitely/not/here/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("lane_change_{}.json", std::process::id()));
        fs::write(&path, JSON_CONFIG).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.default_lane, "A");

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("lanes.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("config.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), ConfigFormat::Json);
    }
}
