use serde::Deserialize;

use crate::db::DatabaseSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseSettings,
    pub port: u16,
    /// Bearer key required by the full-list route. Unset leaves it open.
    pub full_list_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database: DatabaseSettings {
                host: required_var("DB_HOST")?,
                port: std::env::var("DB_PORT")
                    .unwrap_or_else(|_| "5432".to_string())
                    .parse()
                    .map_err(|_| {
                        anyhow::anyhow!("DB_PORT must be a valid number between 1-65535")
                    })?,
                user: required_var("DB_USER")?,
                password: required_var("DB_PASSWORD")?,
                name: required_var("DB_NAME")?,
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            full_list_api_key: std::env::var("FULL_LIST_API_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!(
            "Database: {}@{}:{}/{}",
            config.database.user,
            config.database.host,
            config.database.port,
            config.database.name
        );
        tracing::debug!("Server Port: {}", config.port);
        if config.full_list_api_key.is_none() {
            tracing::warn!("FULL_LIST_API_KEY not set, full company lists are not protected");
        }

        Ok(config)
    }
}

fn required_var(name: &str) -> anyhow::Result<String> {
    let value = std::env::var(name)
        .map_err(|_| anyhow::anyhow!("{} environment variable required", name))?;
    if value.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", name);
    }
    Ok(value)
}
