//! Load — config loading from file and environment variables.

use std::fs;
use std::path::Path;

use super::error::ConfigError;
use super::model::{BannerMode, OutputPosition, PipelineConfig};

pub const CONFIG_FILE_ENV: &str = "CHROMELOG_CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "chromelog.toml";

impl PipelineConfig {
    /// Load configuration from file or defaults, then apply environment overrides
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var(CONFIG_FILE_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using defaults", config_path);
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply `CHROMELOG_*` overrides obtained through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("CHROMELOG_BACKTRACE_POSITION") {
            self.backtrace_position = parse_position("CHROMELOG_BACKTRACE_POSITION", &value)?;
        }
        if let Some(value) = lookup("CHROMELOG_TIMESTAMP_POSITION") {
            self.timestamp_position = parse_position("CHROMELOG_TIMESTAMP_POSITION", &value)?;
        }
        if let Some(value) = lookup("CHROMELOG_TIMESTAMP_FORMAT") {
            self.timestamp_format = value;
        }
        if let Some(value) = lookup("CHROMELOG_MAX_BLOB_SIZE") {
            self.max_blob_size = value.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("CHROMELOG_MAX_BLOB_SIZE: not a byte count '{}'", value))
            })?;
        }
        if let Some(value) = lookup("CHROMELOG_DISPLAY_DATA_URL") {
            self.display_data_url = BannerMode::parse(&value).ok_or_else(|| {
                ConfigError::Invalid(format!("CHROMELOG_DISPLAY_DATA_URL: unknown banner mode '{}'", value))
            })?;
        }
        Ok(())
    }
}

fn parse_position(key: &str, value: &str) -> Result<OutputPosition, ConfigError> {
    OutputPosition::parse(value)
        .ok_or_else(|| ConfigError::Invalid(format!("{}: unknown position '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_positions_and_format() {
        let mut cfg = PipelineConfig::default();
        cfg.apply_overrides(lookup(&[
            ("CHROMELOG_BACKTRACE_POSITION", "leading"),
            ("CHROMELOG_TIMESTAMP_POSITION", "none"),
            ("CHROMELOG_TIMESTAMP_FORMAT", "%T"),
        ]))
        .unwrap();
        assert_eq!(cfg.backtrace_position, OutputPosition::Leading);
        assert_eq!(cfg.timestamp_position, OutputPosition::None);
        assert_eq!(cfg.timestamp_format, "%T");
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut cfg = PipelineConfig::plain();
        cfg.apply_overrides(lookup(&[])).unwrap();
        assert_eq!(cfg, PipelineConfig::plain());
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let mut cfg = PipelineConfig::default();
        let err = cfg
            .apply_overrides(lookup(&[("CHROMELOG_BACKTRACE_POSITION", "sideways")]))
            .unwrap_err();
        assert!(err.to_string().contains("CHROMELOG_BACKTRACE_POSITION"));
    }

    #[test]
    fn test_banner_override() {
        let mut cfg = PipelineConfig::default();
        cfg.apply_overrides(lookup(&[("CHROMELOG_DISPLAY_DATA_URL", "group")]))
            .unwrap();
        assert_eq!(cfg.display_data_url, BannerMode::Group);
    }

    #[test]
    fn test_blob_size_override() {
        let mut cfg = PipelineConfig::default();
        cfg.apply_overrides(lookup(&[("CHROMELOG_MAX_BLOB_SIZE", "2048")]))
            .unwrap();
        assert_eq!(cfg.max_blob_size, 2048);

        let err = cfg
            .apply_overrides(lookup(&[("CHROMELOG_MAX_BLOB_SIZE", "2k")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_file_missing() {
        let result = PipelineConfig::from_file("/nonexistent/chromelog.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_from_file_reads_toml() {
        let path = std::env::temp_dir().join(format!("chromelog-test-{}.toml", std::process::id()));
        fs::write(&path, "timestamp_position = \"trailing\"\n").unwrap();
        let cfg = PipelineConfig::from_file(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(cfg.timestamp_position, OutputPosition::Trailing);
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = PipelineConfig::from_toml_str("backtrace_position = ");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }
}
