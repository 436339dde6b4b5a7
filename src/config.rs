// file: src/config.rs
// description: application configuration management with toml and environment support
// reference: https://docs.rs/config

use crate::error::{DashboardError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const BASE_URL_ENV: &str = "API_BASE_URL";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub top_k: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    pub history_limit: usize,
    pub answer_preview_chars: usize,
    pub source_preview_chars: usize,
}

impl Config {
    /// Layers built-in defaults, an optional TOML file, `TENANT_DASHBOARD__*`
    /// variables and finally `API_BASE_URL`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| DashboardError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path)),
            None => builder
                .add_source(config::File::from(Path::new("config/default.toml")).required(false)),
        };

        builder = builder
            .add_source(
                config::Environment::with_prefix("TENANT_DASHBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.base_url", std::env::var(BASE_URL_ENV).ok())
            .map_err(|e| DashboardError::Config(e.to_string()))?;

        let settings = builder
            .build()
            .map_err(|e| DashboardError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| DashboardError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                top_k: 5,
                timeout_secs: 30,
            },
            session: SessionConfig { storage_path: None },
            ui: UiConfig {
                history_limit: 5,
                answer_preview_chars: 120,
                source_preview_chars: 300,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_url(&self.api.base_url)
            .map_err(|e| DashboardError::Config(e.to_string()))?;

        if self.api.top_k == 0 {
            return Err(DashboardError::Config(
                "top_k must be greater than 0".to_string(),
            ));
        }

        if self.api.timeout_secs == 0 {
            return Err(DashboardError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.ui.history_limit == 0 {
            return Err(DashboardError::Config(
                "history_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl SessionConfig {
    /// Where the persisted session lives when no explicit path is configured.
    pub fn resolve_path(&self) -> PathBuf {
        if let Some(path) = &self.storage_path {
            return path.clone();
        }

        dirs::data_dir()
            .map(|dir| dir.join("tenant-dashboard"))
            .unwrap_or_else(|| PathBuf::from(".tenant-dashboard"))
            .join("session.json")
    }
}
