//! Model — PipelineConfig, style table and annotation placement.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::format::ConsoleMethod;
use crate::parser::MAX_BLOB_SIZE;

/// Where an annotation goes relative to the rest of a generated pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputPosition {
    None,
    Leading,
    Trailing,
}

impl OutputPosition {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "0" => Some(OutputPosition::None),
            "leading" | "1" => Some(OutputPosition::Leading),
            "trailing" | "2" => Some(OutputPosition::Trailing),
            _ => None,
        }
    }
}

/// Semantic categories a style token can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleCategory {
    Error,
    Warn,
    Info,
    Log,
    Debug,
    Group,
    Number,
    Fileline,
    Classname,
    Header,
    Timestamp,
}

/// Style token per category. An empty token means "no styling".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleTable {
    pub error: String,
    pub warn: String,
    pub info: String,
    pub log: String,
    pub debug: String,
    pub group: String,
    pub number: String,
    pub fileline: String,
    pub classname: String,
    pub header: String,
    pub timestamp: String,
}

impl StyleTable {
    /// A table with every category unstyled
    pub fn unstyled() -> Self {
        Self {
            error: String::new(),
            warn: String::new(),
            info: String::new(),
            log: String::new(),
            debug: String::new(),
            group: String::new(),
            number: String::new(),
            fileline: String::new(),
            classname: String::new(),
            header: String::new(),
            timestamp: String::new(),
        }
    }

    /// Style token for a category, `None` when the category is unstyled
    pub fn get(&self, category: StyleCategory) -> Option<&str> {
        let style = self.raw(category);
        if style.is_empty() {
            None
        } else {
            Some(style)
        }
    }

    /// Style token for a category, empty string when unstyled
    pub fn raw(&self, category: StyleCategory) -> &str {
        match category {
            StyleCategory::Error => &self.error,
            StyleCategory::Warn => &self.warn,
            StyleCategory::Info => &self.info,
            StyleCategory::Log => &self.log,
            StyleCategory::Debug => &self.debug,
            StyleCategory::Group => &self.group,
            StyleCategory::Number => &self.number,
            StyleCategory::Fileline => &self.fileline,
            StyleCategory::Classname => &self.classname,
            StyleCategory::Header => &self.header,
            StyleCategory::Timestamp => &self.timestamp,
        }
    }

    /// Builder-style setter
    pub fn with(mut self, category: StyleCategory, style: impl Into<String>) -> Self {
        let slot = match category {
            StyleCategory::Error => &mut self.error,
            StyleCategory::Warn => &mut self.warn,
            StyleCategory::Info => &mut self.info,
            StyleCategory::Log => &mut self.log,
            StyleCategory::Debug => &mut self.debug,
            StyleCategory::Group => &mut self.group,
            StyleCategory::Number => &mut self.number,
            StyleCategory::Fileline => &mut self.fileline,
            StyleCategory::Classname => &mut self.classname,
            StyleCategory::Header => &mut self.header,
            StyleCategory::Timestamp => &mut self.timestamp,
        };
        *slot = style.into();
        self
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self {
            error: "color:red;".to_string(),
            warn: "color:orange;".to_string(),
            info: "color:limegreen;".to_string(),
            log: String::new(),
            debug: String::new(),
            group: "color:mediumturquoise;border-bottom:1px dashed;cursor:pointer;".to_string(),
            number: "background-color:dodgerblue;color:white;font-weight:bold;border-radius:0.5em;padding:0em 0.3em;".to_string(),
            fileline: "color:mediumpurple;font-style:italic;border-style:solid;border-width:0px 1px;border-radius:0.5em;padding:0em 0.5em;".to_string(),
            classname: "font-weight:bold;".to_string(),
            header: "display:block;background-color:black;color:white;text-align:center;padding:0.2em;border-radius:0.3em;".to_string(),
            timestamp: "margin-right:.4em; padding:.01em .5em; border-radius: .3em; background-color:#595959; color:#aadbd9;".to_string(),
        }
    }
}

/// Request-URL banner option of the embedding shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerMode {
    Off,
    Log,
    Group,
    GroupCollapsed,
}

impl BannerMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "off" | "false" => Some(BannerMode::Off),
            "log" | "true" => Some(BannerMode::Log),
            "group" => Some(BannerMode::Group),
            "group_collapsed" | "groupCollapsed" => Some(BannerMode::GroupCollapsed),
            _ => None,
        }
    }

    /// Console method used for the banner line
    pub fn method(&self) -> Option<ConsoleMethod> {
        match self {
            BannerMode::Off => None,
            BannerMode::Log => Some(ConsoleMethod::Log),
            BannerMode::Group => Some(ConsoleMethod::Group),
            BannerMode::GroupCollapsed => Some(ConsoleMethod::GroupCollapsed),
        }
    }
}

/// Immutable configuration snapshot for one pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub backtrace_position: OutputPosition,
    pub timestamp_position: OutputPosition,
    /// chrono strftime format for timestamp annotations (rendered in UTC)
    pub timestamp_format: String,
    pub display_data_url: BannerMode,
    /// Largest encoded header blob the decoder accepts, in bytes
    pub max_blob_size: usize,
    pub console_substitution_styles: StyleTable,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            console_substitution_styles: StyleTable::default(),
            backtrace_position: OutputPosition::Trailing,
            timestamp_position: OutputPosition::Leading,
            timestamp_format: "%H:%M:%S%.3f".to_string(),
            display_data_url: BannerMode::Log,
            max_blob_size: MAX_BLOB_SIZE,
        }
    }
}

impl PipelineConfig {
    /// Plain configuration: no styles, no annotations, no banner
    pub fn plain() -> Self {
        Self {
            console_substitution_styles: StyleTable::unstyled(),
            backtrace_position: OutputPosition::None,
            timestamp_position: OutputPosition::None,
            timestamp_format: "%H:%M:%S%.3f".to_string(),
            display_data_url: BannerMode::Off,
            max_blob_size: MAX_BLOB_SIZE,
        }
    }

    pub fn styles(&self) -> &StyleTable {
        &self.console_substitution_styles
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_blob_size == 0 {
            return Err(ConfigError::Invalid("max_blob_size must be greater than 0".to_string()));
        }
        if self.timestamp_format.is_empty() {
            return Err(ConfigError::Invalid("timestamp_format must not be empty".to_string()));
        }
        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Invalid(format!(
                "timestamp_format is not a valid strftime format: {}",
                self.timestamp_format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Defaults ─────────────────────────────────────────────────

    #[test]
    fn test_default_positions() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.backtrace_position, OutputPosition::Trailing);
        assert_eq!(cfg.timestamp_position, OutputPosition::Leading);
        assert_eq!(cfg.display_data_url, BannerMode::Log);
    }

    #[test]
    fn test_default_styles_leave_log_and_debug_unstyled() {
        let styles = StyleTable::default();
        assert_eq!(styles.get(StyleCategory::Log), None);
        assert_eq!(styles.get(StyleCategory::Debug), None);
        assert_eq!(styles.get(StyleCategory::Error), Some("color:red;"));
        assert!(styles.get(StyleCategory::Fileline).is_some());
    }

    #[test]
    fn test_plain_config_has_no_styles() {
        let cfg = PipelineConfig::plain();
        assert_eq!(cfg.styles().get(StyleCategory::Number), None);
        assert_eq!(cfg.backtrace_position, OutputPosition::None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_style_table_with() {
        let styles = StyleTable::unstyled().with(StyleCategory::Number, "b");
        assert_eq!(styles.get(StyleCategory::Number), Some("b"));
        assert_eq!(styles.raw(StyleCategory::Log), "");
    }

    // ── Parsing helpers ──────────────────────────────────────────

    #[test]
    fn test_output_position_parse() {
        assert_eq!(OutputPosition::parse("LEADING"), Some(OutputPosition::Leading));
        assert_eq!(OutputPosition::parse("2"), Some(OutputPosition::Trailing));
        assert_eq!(OutputPosition::parse(" none "), Some(OutputPosition::None));
        assert_eq!(OutputPosition::parse("middle"), None);
    }

    #[test]
    fn test_banner_mode_methods() {
        assert_eq!(BannerMode::Off.method(), None);
        assert_eq!(BannerMode::GroupCollapsed.method(), Some(ConsoleMethod::GroupCollapsed));
        assert_eq!(BannerMode::parse("groupCollapsed"), Some(BannerMode::GroupCollapsed));
        assert_eq!(BannerMode::parse("true"), Some(BannerMode::Log));
    }

    // ── Validation ───────────────────────────────────────────────

    #[test]
    fn test_validate_rejects_empty_timestamp_format() {
        let cfg = PipelineConfig {
            timestamp_format: String::new(),
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("timestamp_format"), "Error should mention timestamp_format: {}", err);
    }

    #[test]
    fn test_validate_rejects_bad_strftime() {
        let cfg = PipelineConfig {
            timestamp_format: "%Q".to_string(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_blob_size() {
        let cfg = PipelineConfig {
            max_blob_size: 0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("max_blob_size"));
    }

    // ── Serialization ────────────────────────────────────────────

    #[test]
    fn test_config_toml_round_trip() {
        let cfg = PipelineConfig::default();
        let toml_str = toml::to_string(&cfg).expect("Should serialize to TOML");
        let deserialized: PipelineConfig = toml::from_str(&toml_str).expect("Should deserialize from TOML");
        assert_eq!(deserialized, cfg);
    }

    #[test]
    fn test_config_deserialize_partial_toml() {
        let toml_str = r#"
            backtrace_position = "leading"
            display_data_url = "group_collapsed"
            max_blob_size = 4194304

            [console_substitution_styles]
            log = "color:gray;"
        "#;
        let cfg: PipelineConfig = toml::from_str(toml_str).expect("Should accept partial TOML");
        assert_eq!(cfg.backtrace_position, OutputPosition::Leading);
        assert_eq!(cfg.timestamp_position, OutputPosition::Leading); // default
        assert_eq!(cfg.display_data_url, BannerMode::GroupCollapsed);
        assert_eq!(cfg.max_blob_size, 4 * 1024 * 1024);
        assert_eq!(cfg.styles().get(StyleCategory::Log), Some("color:gray;"));
        assert_eq!(cfg.styles().get(StyleCategory::Error), Some("color:red;")); // default
    }

    #[test]
    fn test_config_rejects_unknown_position() {
        let result: Result<PipelineConfig, _> = toml::from_str(r#"backtrace_position = "middle""#);
        assert!(result.is_err());
    }
}
