use std::time::Duration;

use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub login: LoginConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load the configuration from a YAML file.
    pub fn load(yml_path: &str) -> anyhow::Result<Self> {
        let yml = std::fs::read_to_string(yml_path)?;
        let config = serde_yaml::from_str(&yml)?;
        Ok(config)
    }

    /// Load the configuration if the file exists, otherwise use the defaults.
    ///
    /// `SHEET_TOKEN` from the environment (or `.env`) takes precedence over the file.
    pub fn load_or_default(yml_path: &str) -> anyhow::Result<Self> {
        let mut config = if std::path::Path::new(yml_path).exists() {
            Self::load(yml_path)?
        } else {
            Self::default()
        };
        if let Ok(token) = dotenvy::var("SHEET_TOKEN") {
            config.api.token = Some(token);
        }
        Ok(config)
    }
}

/// Where the recipe sheet lives.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Sent as a bearer token when present
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".into(),
            token: None,
        }
    }
}

/// Where the session token and liked recipes are kept between runs.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: ".pantry/state.json".into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    /// Artificial latency before a login attempt is answered
    pub delay_ms: u64,
}

impl LoginConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self { delay_ms: 600 }
    }
}

/// Logs go to stderr unless a directory is set, in which case they are
/// written there as daily rotated JSON files.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: Option<String>,
}
