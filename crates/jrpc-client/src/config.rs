//! Client configuration file

use jrpc_core::id::{Decimal, Hexadecimal, Random, UuidV4};
use jrpc_core::{Error, IdGenerator, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::http::{AsyncHttpTransport, HttpTransport, HttpTransportBuilder};
use crate::options::ClientOptions;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdGeneratorKind {
    #[default]
    Decimal,
    Hexadecimal,
    Random,
    Uuid,
}

impl IdGeneratorKind {
    pub fn build(self) -> Arc<dyn IdGenerator> {
        match self {
            Self::Decimal => Arc::new(Decimal::new()),
            Self::Hexadecimal => Arc::new(Hexadecimal::new()),
            Self::Random => Arc::new(Random::new()),
            Self::Uuid => Arc::new(UuidV4),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoint: String,
    pub id_generator: IdGeneratorKind,
    pub trim_log_values: bool,
    pub headers: BTreeMap<String, String>,
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000/".to_string(),
            id_generator: IdGeneratorKind::Decimal,
            trim_log_values: false,
            headers: BTreeMap::new(),
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(Error::Config("Endpoint cannot be empty".to_string()));
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(Error::Config(format!(
                "Endpoint '{}' must be an http:// or https:// URL",
                endpoint
            )));
        }

        if self.headers.keys().any(|name| name.trim().is_empty()) {
            return Err(Error::Config("Header names cannot be empty".to_string()));
        }

        if self.timeout_secs == Some(0) {
            return Err(Error::Config(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Load from a JSON file. A missing or empty file yields the defaults,
    /// which are written back.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;

        // Handle empty file case
        if content.trim().is_empty() {
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let config: Self = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn to_options(&self) -> ClientOptions {
        ClientOptions {
            id_generator: self.id_generator.build(),
            trim_log_values: self.trim_log_values,
            ..ClientOptions::default()
        }
    }

    fn transport_builder(&self) -> Result<HttpTransportBuilder> {
        self.validate()?;
        let mut builder = HttpTransportBuilder::new(self.endpoint.trim());
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(builder)
    }

    pub fn http_transport(&self) -> Result<HttpTransport> {
        self.transport_builder()?.build()
    }

    pub fn async_http_transport(&self) -> Result<AsyncHttpTransport> {
        self.transport_builder()?.build_async()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jrpc_core::RequestId;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.id_generator, IdGeneratorKind::Decimal);
        assert_eq!(
            config.to_options().id_generator.next_id(),
            RequestId::Number(1)
        );
    }

    #[test]
    fn test_validation() {
        let mut config = ClientConfig {
            endpoint: "".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        config.endpoint = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.endpoint = "https://example.com/rpc".to_string();
        assert!(config.validate().is_ok());

        config.timeout_secs = Some(0);
        assert!(config.validate().is_err());

        config.timeout_secs = Some(5);
        config.headers.insert(" ".to_string(), "x".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("client.json");

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_load_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("client.json");
        std::fs::write(&path, "  \n").unwrap();

        assert_eq!(ClientConfig::load(&path).unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("client.json");
        std::fs::write(
            &path,
            r#"{"endpoint": "http://rpc.local/", "id_generator": "random", "trim_log_values": true}"#,
        )
        .unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.endpoint, "http://rpc.local/");
        assert_eq!(config.id_generator, IdGeneratorKind::Random);
        assert!(config.trim_log_values);
        assert!(config.headers.is_empty());
        assert!(config.to_options().trim_log_values);
    }

    #[test]
    fn test_load_rejects_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("client.json");

        std::fs::write(&path, r#"{"id_generator": "sequential"}"#).unwrap();
        assert!(matches!(ClientConfig::load(&path), Err(Error::Config(_))));

        std::fs::write(&path, r#"{"endpoint": "localhost"}"#).unwrap();
        assert!(matches!(ClientConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_keeps_io_error() {
        let temp_dir = TempDir::new().unwrap();

        // A directory exists but cannot be read as a file
        let err = ClientConfig::load(temp_dir.path()).unwrap_err();
        match &err {
            Error::Io(io) => assert_eq!(io.kind(), std::io::ErrorKind::IsADirectory),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_save_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("client.json");

        let mut config = ClientConfig {
            id_generator: IdGeneratorKind::Uuid,
            timeout_secs: Some(10),
            ..ClientConfig::default()
        };
        config
            .headers
            .insert("X-Api-Key".to_string(), "secret".to_string());
        config.save(&path).unwrap();

        assert_eq!(ClientConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_http_transport_from_config() {
        let mut config = ClientConfig::default();
        config
            .headers
            .insert("Accept".to_string(), "application/json-rpc".to_string());

        let transport = config.http_transport().unwrap();
        assert_eq!(transport.endpoint(), "http://localhost:5000/");
        assert_eq!(transport.headers()["accept"], "application/json-rpc");
    }
}
