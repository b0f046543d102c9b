use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/divvy.toml";

/// Runtime configuration: file under environment (`DIVVY_*`), then CLI
/// flag overrides on top.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Email of the signed-in account; identifies the caller when
    /// partitioning balances.
    pub email: String,
    /// Bearer token issued by the identity provider. Empty means no
    /// session: requests go out anonymous and the backend rejects them.
    pub token: String,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            email: String::new(),
            token: String::new(),
            level: "info".to_string(),
        }
    }
}

/// CLI flag overrides, applied after file and environment sources.
#[derive(Debug, Default)]
pub struct Overrides {
    pub config: Option<String>,
    pub base_url: Option<String>,
    pub email: Option<String>,
    pub token: Option<String>,
}

pub fn load(overrides: Overrides) -> Result<AppConfig> {
    let config_path = overrides.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("DIVVY"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = overrides.base_url {
        settings.base_url = base_url;
    }
    if let Some(email) = overrides.email {
        settings.email = email;
    }
    if let Some(token) = overrides.token {
        settings.token = token;
    }

    Ok(settings)
}
