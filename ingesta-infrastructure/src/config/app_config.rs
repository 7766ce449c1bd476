use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use ingesta_domain::{RuntimeConfig, StorageBackendKind, StorageSettings};

use super::validation::{validate_base_path, validate_container_name};

pub const CONFIG_PATH_ENV: &str = "INGESTA_CONFIG";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_key: Option<String>,
    pub require_api_key: bool,
    pub storage_backend: StorageBackendKind,
    pub storage_account_name: Option<String>,
    pub storage_account_key: Option<String>,
    pub storage_endpoint: Option<String>,
    pub container_name: String,
    pub local_storage_dir: String,
    pub base_path: String,
    pub source_tag: String,
    pub validation_sample_limit: Option<usize>,
    pub max_violations: usize,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub storage_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:7071".to_string(),
            api_key: None,
            require_api_key: false,
            storage_backend: StorageBackendKind::Azure,
            storage_account_name: None,
            storage_account_key: None,
            storage_endpoint: None,
            container_name: "raw".to_string(),
            local_storage_dir: "./data".to_string(),
            base_path: "ingesta_ccma".to_string(),
            source_tag: "api-ingesta-ccma".to_string(),
            validation_sample_limit: None,
            max_violations: 50,
            max_body_bytes: 8 * 1024 * 1024,
            request_timeout_seconds: 30,
            storage_timeout_seconds: 20,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            toml::from_str::<AppConfig>(&content)
                .map_err(|err| anyhow!("invalid config file {}: {}", path, err))?
        } else {
            warn!("{} not found, using defaults and environment", path);
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(file_path.parent());
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        self.api_key = normalize_secret(self.api_key.take());
        self.storage_account_name = normalize_optional(self.storage_account_name.take());
        self.storage_account_key = normalize_optional(self.storage_account_key.take());
        self.storage_endpoint = normalize_optional(self.storage_endpoint.take());
        self.container_name = self.container_name.trim().to_string();
        self.base_path = self.base_path.trim().trim_matches('/').to_string();
        self.source_tag = self.source_tag.trim().to_string();
        if let Some(limit) = self.validation_sample_limit {
            if limit == 0 {
                self.validation_sample_limit = None;
            }
        }
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        let local = Path::new(self.local_storage_dir.trim());
        if !local.is_absolute() && !base.as_os_str().is_empty() {
            self.local_storage_dir = base.join(local).to_string_lossy().to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        validate_base_path(&self.base_path)?;
        validate_container_name(&self.container_name)?;
        if self.source_tag.is_empty() {
            return Err(anyhow!("source_tag must not be empty"));
        }
        if self.max_violations == 0 {
            return Err(anyhow!("max_violations must be greater than 0"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        // A storage write must give up before the HTTP timeout answers 408.
        if self.storage_timeout_seconds == 0
            || self.storage_timeout_seconds >= self.request_timeout_seconds
        {
            return Err(anyhow!(
                "storage_timeout_seconds must be between 1 and request_timeout_seconds - 1"
            ));
        }
        if self.storage_backend == StorageBackendKind::Local && self.local_storage_dir.trim().is_empty()
        {
            return Err(anyhow!("local_storage_dir must not be empty for the local backend"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_key: self.api_key.clone(),
            require_api_key: self.require_api_key,
            base_path: self.base_path.clone(),
            source_tag: self.source_tag.clone(),
            validation_sample_limit: self.validation_sample_limit,
            max_violations: self.max_violations,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
            storage_timeout_seconds: self.storage_timeout_seconds,
        }
    }

    pub fn to_storage_settings(&self) -> StorageSettings {
        StorageSettings {
            backend: self.storage_backend,
            account_name: self.storage_account_name.clone(),
            account_key: self.storage_account_key.clone(),
            endpoint: self.storage_endpoint.clone(),
            container_name: self.container_name.clone(),
            local_dir: self.local_storage_dir.clone(),
            request_timeout_seconds: self.storage_timeout_seconds,
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("INGESTA_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Some(value) = lookup("INGESTA_API_KEY") {
            self.api_key = Some(value);
        }
        if let Some(value) = lookup("INGESTA_REQUIRE_API_KEY") {
            self.require_api_key = parse_bool(&value).unwrap_or(self.require_api_key);
        }
        if let Some(value) = lookup("INGESTA_STORAGE_BACKEND") {
            match value.trim().to_ascii_lowercase().as_str() {
                "azure" => self.storage_backend = StorageBackendKind::Azure,
                "local" => self.storage_backend = StorageBackendKind::Local,
                other => warn!("ignoring unknown INGESTA_STORAGE_BACKEND '{}'", other),
            }
        }
        if let Some(value) = lookup("STORAGE_ACCOUNT_NAME") {
            self.storage_account_name = Some(value);
        }
        if let Some(value) = lookup("STORAGE_ACCOUNT_KEY") {
            self.storage_account_key = Some(value);
        }
        if let Some(value) = lookup("STORAGE_BLOB_ENDPOINT") {
            self.storage_endpoint = Some(value);
        }
        if let Some(value) = lookup("STORAGE_CONTAINER_NAME") {
            self.container_name = value;
        }
        if let Some(value) = lookup("INGESTA_LOCAL_STORAGE_DIR") {
            self.local_storage_dir = value;
        }
        if let Some(value) = lookup("INGESTA_BASE_PATH") {
            self.base_path = value;
        }
        if let Some(value) = lookup("INGESTA_SOURCE_TAG") {
            self.source_tag = value;
        }
        if let Some(value) = lookup("INGESTA_VALIDATION_SAMPLE_LIMIT") {
            self.validation_sample_limit = value.trim().parse().ok();
        }
        if let Some(value) = lookup("INGESTA_MAX_VIOLATIONS") {
            self.max_violations = value.trim().parse().unwrap_or(self.max_violations);
        }
        if let Some(value) = lookup("INGESTA_MAX_BODY_BYTES") {
            self.max_body_bytes = value.trim().parse().unwrap_or(self.max_body_bytes);
        }
        if let Some(value) = lookup("INGESTA_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds =
                value.trim().parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Some(value) = lookup("INGESTA_STORAGE_TIMEOUT_SECONDS") {
            self.storage_timeout_seconds =
                value.trim().parse().unwrap_or(self.storage_timeout_seconds);
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    match value {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        None => None,
    }
}

/// Secrets are compared verbatim; only a blank value is dropped.
fn normalize_secret(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn with_env(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = AppConfig::default();
        config.apply_overrides(|name| vars.get(name).cloned());
        config.normalize();
        config
    }

    #[test]
    fn defaults_match_raw_zone_layout() {
        let config = AppConfig::default();
        assert_eq!(config.container_name, "raw");
        assert_eq!(config.base_path, "ingesta_ccma");
        assert_eq!(config.source_tag, "api-ingesta-ccma");
        assert!(config.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_storage_and_secret() {
        let config = with_env(&[
            ("STORAGE_ACCOUNT_NAME", "ccmadatalake"),
            ("STORAGE_ACCOUNT_KEY", " a2V5 "),
            ("INGESTA_API_KEY", "secret-1"),
            ("INGESTA_BASE_PATH", "/otra_ruta/"),
            ("INGESTA_VALIDATION_SAMPLE_LIMIT", "50"),
            ("INGESTA_REQUIRE_API_KEY", "yes"),
        ]);
        let storage = config.to_storage_settings();
        assert_eq!(storage.account_name.as_deref(), Some("ccmadatalake"));
        assert_eq!(storage.account_key.as_deref(), Some("a2V5"));
        let runtime = config.to_runtime_config();
        assert_eq!(runtime.api_key.as_deref(), Some("secret-1"));
        assert_eq!(runtime.base_path, "otra_ruta");
        assert_eq!(runtime.validation_sample_limit, Some(50));
        assert!(runtime.require_api_key);
    }

    #[test]
    fn blank_secret_means_unconfigured() {
        let config = with_env(&[("INGESTA_API_KEY", "   ")]);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn api_key_is_kept_verbatim() {
        let config = with_env(&[("INGESTA_API_KEY", " clave con espacios ")]);
        assert_eq!(config.api_key.as_deref(), Some(" clave con espacios "));
    }

    #[test]
    fn storage_timeout_must_fit_inside_request_timeout() {
        let config = with_env(&[("INGESTA_REQUEST_TIMEOUT_SECONDS", "10")]);
        assert!(config.validate().is_err());

        let config = with_env(&[
            ("INGESTA_REQUEST_TIMEOUT_SECONDS", "10"),
            ("INGESTA_STORAGE_TIMEOUT_SECONDS", "9"),
        ]);
        assert!(config.validate().is_ok());
        assert_eq!(config.to_storage_settings().request_timeout_seconds, 9);
        assert_eq!(config.to_runtime_config().storage_timeout_seconds, 9);
    }

    #[test]
    fn zero_sample_limit_means_full_validation() {
        let config = with_env(&[("INGESTA_VALIDATION_SAMPLE_LIMIT", "0")]);
        assert!(config.validation_sample_limit.is_none());
    }

    #[test]
    fn toml_file_fields_are_read() {
        let config: AppConfig = toml::from_str(
            r#"
bind_addr = "127.0.0.1:8080"
storage_backend = "local"
local_storage_dir = "/var/lib/ingesta"
max_violations = 10
"#,
        )
        .expect("toml");
        assert_eq!(config.storage_backend, StorageBackendKind::Local);
        assert_eq!(config.max_violations, 10);
        assert_eq!(config.container_name, "raw");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_invalid_layout_settings() {
        let mut config = AppConfig::default();
        config.base_path = "../escape".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.container_name = "RAW".to_string();
        assert!(config.validate().is_err());
    }
}
