use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Environment variables checked, in order, when no key is configured.
const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub gemini: GeminiConfig,
    pub storage: StorageConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// "json" or "pretty"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    /// No timeout unless set.
    pub request_timeout_secs: Option<u64>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl GeminiConfig {
    /// Configured key, falling back to the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    fn resolve_api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| API_KEY_ENV_VARS.iter().find_map(|&name| lookup(name)))
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
    pub download_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|dir| dir.join("grablink"))
                .unwrap_or_else(|| PathBuf::from(".grablink"))
        })
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(|| {
            dirs::download_dir().unwrap_or_else(|| PathBuf::from("downloads"))
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ExportConfig {
    /// Leading component of exported file names
    pub prefix: String,
    /// Name written into placeholder contents
    pub brand: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            prefix: "grablink".to_string(),
            brand: "grablink".to_string(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse config file {}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn get_logging_format(&self) -> &str {
        &self.logging.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.get_logging_format(), "json");
        assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.gemini.api_base, DEFAULT_GEMINI_API_BASE);
        assert_eq!(config.gemini.request_timeout_secs, None);
        assert_eq!(config.export.prefix, "grablink");
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
[logging]
format = "pretty"

[gemini]
api_key = "secret"
model = "gemini-test"
request_timeout_secs = 30

[storage]
data_dir = "/tmp/grablink-data"
download_dir = "/tmp/grablink-downloads"

[export]
prefix = "tandev"
"#,
        )
        .unwrap();

        assert_eq!(config.get_logging_format(), "pretty");
        assert_eq!(config.gemini.api_key.as_deref(), Some("secret"));
        assert_eq!(config.gemini.model, "gemini-test");
        assert_eq!(config.gemini.request_timeout_secs, Some(30));
        assert_eq!(config.storage.data_dir(), PathBuf::from("/tmp/grablink-data"));
        assert_eq!(
            config.storage.download_dir(),
            PathBuf::from("/tmp/grablink-downloads")
        );
        assert_eq!(config.export.prefix, "tandev");
        assert_eq!(config.export.brand, "grablink");
    }

    #[test]
    fn test_invalid_config_is_error() {
        assert!(Config::from_toml("[gemini]\nmodel = 5").is_err());
    }

    #[test]
    fn test_api_key_resolution_order() {
        let env = |name: &str| match name {
            "GEMINI_API_KEY" => Some("from-gemini-env".to_string()),
            "API_KEY" => Some("from-generic-env".to_string()),
            _ => None,
        };

        let configured = GeminiConfig {
            api_key: Some("from-file".to_string()),
            ..Default::default()
        };
        assert_eq!(
            configured.resolve_api_key_with(env).as_deref(),
            Some("from-file")
        );

        let unconfigured = GeminiConfig::default();
        assert_eq!(
            unconfigured.resolve_api_key_with(env).as_deref(),
            Some("from-gemini-env")
        );
        assert_eq!(
            unconfigured
                .resolve_api_key_with(|name| (name == "API_KEY").then(|| "generic".to_string()))
                .as_deref(),
            Some("generic")
        );
        assert_eq!(unconfigured.resolve_api_key_with(|_| None), None);
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let config = GeminiConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key_with(|_| None), None);
    }
}
