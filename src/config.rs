use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/client.json";
pub const API_URL_ENV: &str = "CELESTIAL_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub database_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            database_path: "data/client.db".to_string(),
        }
    }
}

impl AppConfig {
    /// A non-blank `api_url` replaces the configured base URL.
    pub fn with_api_url_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
            log::info!("Using API base URL from {API_URL_ENV}: {url}");
            self.api_base_url = url.trim().to_string();
        }
        self
    }
}

/// Load the JSON config file, then apply the environment override.
pub fn load_config(path: &str) -> AppConfig {
    read_config_file(path).with_api_url_override(std::env::var(API_URL_ENV).ok())
}

fn read_config_file(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(content: &str) -> String {
        let path = std::env::temp_dir().join(format!("client-config-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn missing_file_uses_defaults() {
        assert_eq!(read_config_file("/nonexistent/client.json"), AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let path = temp_config(r#"{ "api_base_url": "https://stars.example" }"#);
        let config = read_config_file(&path);
        fs::remove_file(&path).ok();

        assert_eq!(config.api_base_url, "https://stars.example");
        assert_eq!(config.database_path, AppConfig::default().database_path);
    }

    #[test]
    fn malformed_file_uses_defaults() {
        let path = temp_config("{ nope");
        let config = read_config_file(&path);
        fs::remove_file(&path).ok();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn blank_override_is_ignored() {
        let config = AppConfig::default().with_api_url_override(Some("  ".into()));
        assert_eq!(config, AppConfig::default());

        let config = AppConfig::default().with_api_url_override(Some("http://10.0.0.2:8000".into()));
        assert_eq!(config.api_base_url, "http://10.0.0.2:8000");
    }
}
