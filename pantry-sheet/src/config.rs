use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
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
            tracing::info!("{yml_path} not found, using default configuration");
            Self::default()
        };
        if let Ok(token) = dotenvy::var("SHEET_TOKEN") {
            config.auth.token = Some(token);
        }
        Ok(config)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:3000".into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "data/sheet.db".into(),
        }
    }
}

/// Bearer token required on every request. `None` leaves the API open.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str("database:\n  path: /tmp/x.db\n").unwrap();
        assert_eq!(config.database.path, "/tmp/x.db");
        assert_eq!(config.server.address, "0.0.0.0:3000");
        assert!(config.auth.token.is_none());
    }
}
