use crate::errors::PipelineError;
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};
use sqlx::Connection;
use std::fmt;

/// Connection details of the registry database.
#[derive(Clone, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(PgSslMode::Disable)
    }
}

/// Opens one dedicated connection per request.
///
/// There is no pool: the registry is queried through a short-lived
/// connection that the caller closes when its request is done.
#[derive(Clone)]
pub struct RegistryDatabase {
    options: PgConnectOptions,
}

impl fmt::Debug for RegistryDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryDatabase")
            .field("host", &self.options.get_host())
            .field("port", &self.options.get_port())
            .field("database", &self.options.get_database())
            .finish()
    }
}

impl RegistryDatabase {
    pub fn new(settings: DatabaseSettings) -> Self {
        Self::with_options(settings.connect_options())
    }

    /// Uses prepared options as-is (search path, application name, ...).
    pub fn with_options(options: PgConnectOptions) -> Self {
        Self { options }
    }

    pub async fn connect(&self) -> Result<PgConnection, PipelineError> {
        PgConnection::connect_with(&self.options)
            .await
            .map_err(PipelineError::Connection)
    }
}
