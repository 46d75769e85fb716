use std::fmt;
use std::fs;
use std::path::Path;

use reqwest::Url;
use serde::Deserialize;

use crate::ConnectorError;

/// Credentials and identity endpoint for one CPMS account.
///
/// Deserializes from the `config.json` layout used by the service tooling:
///
/// ```json
/// { "username": "merchant", "api_key": "...", "api_url": "https://api.example.com" }
/// ```
///
/// All three keys are required.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub username: String,
    pub api_key: String,
    pub api_url: String,
}

impl Config {
    pub fn new(
        username: impl Into<String>,
        api_key: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
            api_url: api_url.into(),
        }
    }

    /// Parses a configuration from a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConnectorError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConnectorError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Checks that every field is set and returns the parsed identity URL.
    pub fn validate(&self) -> Result<Url, ConnectorError> {
        for (field, value) in [
            ("username", &self.username),
            ("api_key", &self.api_key),
            ("api_url", &self.api_url),
        ] {
            if value.trim().is_empty() {
                return Err(ConnectorError::InvalidConfig { field });
            }
        }

        let url = Url::parse(&self.api_url)
            .map_err(|_| ConnectorError::InvalidBaseUrl(self.api_url.clone()))?;
        if url.cannot_be_a_base() || url.host_str().is_none_or(str::is_empty) {
            return Err(ConnectorError::InvalidBaseUrl(self.api_url.clone()));
        }
        Ok(url)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use crate::ConnectorError;

    #[test]
    fn parses_config_json() {
        let config = Config::from_json_str(
            r#"{"username":"merchant","api_key":"secret","api_url":"https://api.example.com"}"#,
        )
        .expect("valid config");
        assert_eq!(
            config,
            Config::new("merchant", "secret", "https://api.example.com")
        );
    }

    #[test]
    fn rejects_config_json_with_missing_key() {
        let error = Config::from_json_str(r#"{"username":"merchant","api_key":"secret"}"#)
            .expect_err("api_url is required");
        assert!(matches!(error, ConnectorError::Json(_)));
    }

    #[test]
    fn rejects_empty_fields() {
        let error = Config::new("merchant", "", "https://api.example.com")
            .validate()
            .expect_err("empty api key");
        assert!(matches!(
            error,
            ConnectorError::InvalidConfig { field: "api_key" }
        ));
    }

    #[test]
    fn rejects_relative_or_hostless_urls() {
        for url in ["api.example.com/v1", "mailto:ops@example.com"] {
            let error = Config::new("merchant", "secret", url)
                .validate()
                .expect_err("not an absolute base URL");
            assert!(matches!(error, ConnectorError::InvalidBaseUrl(_)), "{url}");
        }
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let rendered = format!("{:?}", Config::new("merchant", "secret", "https://a.b"));
        assert!(!rendered.contains("secret"));
    }
}
