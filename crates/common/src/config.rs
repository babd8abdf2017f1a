use crate::error::ReviewLensError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default secrets file, read when `REVIEWLENS_SECRETS` is unset
pub const DEFAULT_SECRETS_FILE: &str = "secrets.toml";

/// ReviewLens application configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the chat-completion service
    pub openai_api_key: String,

    /// Chat-completion API base URL
    pub openai_base_url: String,

    /// Model used for theme extraction
    pub llm_model: String,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("llm_model", &self.llm_model)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("log_dir", &self.log_dir)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            llm_model: "gpt-3.5-turbo".to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the secrets file, environment variables and .env file
    ///
    /// Environment variables take precedence over the secrets file.
    /// A missing API key is a startup error.
    pub fn from_env() -> Result<Self, ReviewLensError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let secrets_path = std::env::var("REVIEWLENS_SECRETS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SECRETS_FILE));
        let file_key = Self::read_secrets_file(&secrets_path)?;

        let config = Self::from_lookup(|key| std::env::var(key).ok(), file_key)?;
        config.validate()?;

        Ok(config)
    }

    /// Build configuration from a variable lookup and an optional key read from the secrets file
    pub fn from_lookup<F>(lookup: F, file_api_key: Option<String>) -> Result<Self, ReviewLensError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let openai_api_key = lookup("OPENAI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .or(file_api_key)
            .ok_or_else(|| {
                ReviewLensError::config(
                    "OPENAI_API_KEY is not set (environment or [general] section of the secrets file)",
                )
            })?;

        Ok(Self {
            openai_api_key,
            openai_base_url: lookup("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            llm_model: lookup("LLM_MODEL").unwrap_or(defaults.llm_model),
            server_host: lookup("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: lookup("SERVER_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.server_port),
            log_dir: lookup("LOG_DIR").map(PathBuf::from).unwrap_or(defaults.log_dir),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Read `general.OPENAI_API_KEY` from a TOML secrets file, if the file exists
    pub fn read_secrets_file(path: &Path) -> Result<Option<String>, ReviewLensError> {
        if !path.exists() {
            return Ok(None);
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .build()
            .map_err(|e| {
                ReviewLensError::config(format!(
                    "Failed to read secrets file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        let key = ["general.OPENAI_API_KEY", "general.openai_api_key"]
            .iter()
            .find_map(|k| settings.get_string(k).ok())
            .filter(|k| !k.trim().is_empty());

        Ok(key)
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ReviewLensError> {
        if self.openai_api_key.trim().is_empty() {
            return Err(ReviewLensError::config("OPENAI_API_KEY cannot be empty"));
        }

        if !self.openai_base_url.starts_with("http://")
            && !self.openai_base_url.starts_with("https://") {
            return Err(ReviewLensError::config(
                "OpenAI base URL must start with http:// or https://"
            ));
        }

        if self.llm_model.is_empty() {
            return Err(ReviewLensError::config("LLM model name cannot be empty"));
        }

        // Validate port range
        if self.server_port == 0 {
            return Err(ReviewLensError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.llm_model, "gpt-3.5-turbo");
    }

    #[test]
    fn test_server_bind_address() {
        let config = AppConfig::default();
        assert_eq!(config.server_bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let result = AppConfig::from_lookup(lookup_from(&[]), None);
        assert!(matches!(result, Err(ReviewLensError::Config(_))));
    }

    #[test]
    fn test_env_key_wins_over_secrets_file() {
        let config = AppConfig::from_lookup(
            lookup_from(&[("OPENAI_API_KEY", "sk-env"), ("SERVER_PORT", "9000")]),
            Some("sk-file".to_string()),
        )
        .unwrap();
        assert_eq!(config.openai_api_key, "sk-env");
        assert_eq!(config.server_port, 9000);
    }

    #[test]
    fn test_secrets_file_key_used_when_env_missing() {
        let config = AppConfig::from_lookup(lookup_from(&[]), Some("sk-file".to_string())).unwrap();
        assert_eq!(config.openai_api_key, "sk-file");
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_read_secrets_file() {
        let path = std::env::temp_dir().join(format!("reviewlens-secrets-{}.toml", std::process::id()));
        std::fs::write(&path, "[general]\nOPENAI_API_KEY = \"sk-from-toml\"\n").unwrap();

        let key = AppConfig::read_secrets_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(key.as_deref(), Some("sk-from-toml"));
    }

    #[test]
    fn test_missing_secrets_file_is_not_an_error() {
        let key = AppConfig::read_secrets_file(Path::new("/nonexistent/secrets.toml")).unwrap();
        assert!(key.is_none());
    }

    #[test]
    fn test_validate() {
        let config = AppConfig {
            openai_api_key: "sk-test".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let mut invalid_config = config.clone();
        invalid_config.openai_base_url = "api.openai.com".to_string();
        assert!(invalid_config.validate().is_err());

        let mut no_key = config;
        no_key.openai_api_key = String::new();
        assert!(no_key.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = AppConfig {
            openai_api_key: "sk-secret".to_string(),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
    }
}
