//! Configuration loaded from `byline.toml`.
//!
//! [`BylineConfig`] holds the single service base URL that parameterizes all
//! three endpoints, plus the one-shot request timeout. Values missing from
//! the file fall back to defaults; the `BYLINE_API_URL` environment variable
//! takes precedence over the file, and the `--base-url` flag over both.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::BylineError;

/// Top-level configuration loaded from `byline.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct BylineConfig {
    /// Base URL of the article generation service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout in seconds for the one-shot requests (create, fetch).
    /// The status subscription is exempt.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for BylineConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl BylineConfig {
    /// Load the configuration from `byline.toml` in the current directory.
    /// Uses defaults if the file does not exist.
    pub fn load() -> Result<Self, BylineError> {
        Self::load_from(Path::new("byline.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self, BylineError> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<BylineConfig>(&contents)?
        } else {
            Self::default()
        };

        // The environment takes precedence over the file for the base URL.
        if let Ok(url) = std::env::var("BYLINE_API_URL")
            && !url.is_empty()
        {
            config.base_url = url;
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let config = BylineConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            base_url = "https://articles.example.com/api"
        "#;
        let config: BylineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.base_url, "https://articles.example.com/api");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn load_from_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BylineConfig::load_from(&dir.path().join("byline.toml")).unwrap();
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn load_from_reads_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("byline.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "base_url = \"http://svc:9000\"").unwrap();
        writeln!(file, "request_timeout_secs = 5").unwrap();

        let config = BylineConfig::load_from(&path).unwrap();
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("byline.toml");
        std::fs::write(&path, "base_url = [not valid").unwrap();

        assert!(BylineConfig::load_from(&path).is_err());
    }
}
