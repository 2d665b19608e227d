mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use tracing::debug;

/// Loads configuration from an optional YAML file, then applies the
/// environment overrides the service is deployed with: ZHIPU_API_KEY for the
/// inference credential and PORT for the listen port.
pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    let mut config = match tokio::fs::read_to_string(&config_path).await {
        Ok(config_str) => {
            debug!("Loading configuration from: {}", config_path);
            serde_yaml::from_str(&config_str)?
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
        Err(e) => return Err(e.into()),
    };

    if let Ok(api_key) = env::var("ZHIPU_API_KEY") {
        config.llm.api_key = api_key;
    }

    if let Ok(port) = env::var("PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| Error::config(format!("Invalid PORT value: '{}'", port)))?;
    }

    if config.llm.api_key.is_empty() {
        return Err(Error::config(
            "Missing API key: set ZHIPU_API_KEY or llm.api_key",
        ));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.llm.base_url, "https://open.bigmodel.cn/api/paas/v4");
        assert_eq!(config.llm.ocr_model, "glm-4v-flash");
        assert_eq!(config.llm.generation_model, "glm-4-flash");
        assert_eq!(config.llm.temperature, 0.7);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.logs.level, "info");
    }

    #[test]
    fn test_config_from_partial_yaml() {
        let yaml = r#"
llm:
  api_key: test-key
  ocr_model: glm-4v
server:
  port: 9000
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.llm.api_key, "test-key");
        assert_eq!(config.llm.ocr_model, "glm-4v");
        // Unspecified fields keep their defaults
        assert_eq!(config.llm.generation_model, "glm-4-flash");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_config_from_empty_yaml() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.llm.api_key.is_empty());
    }
}
