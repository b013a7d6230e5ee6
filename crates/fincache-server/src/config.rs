//! Environment-based server configuration.

use std::net::SocketAddr;

use fincache::{DataError, Result};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Settings read from the environment at startup.
#[derive(Clone)]
pub(crate) struct ServerConfig {
    /// SQLite database path.
    pub(crate) database_url: String,
    /// FMP API key.
    pub(crate) fmp_api_key: String,
    /// Override for the FMP endpoint.
    pub(crate) fmp_base_url: Option<String>,
    /// Address to bind.
    pub(crate) host: String,
    /// Port to bind.
    pub(crate) port: u16,
    /// Origins allowed by CORS.
    pub(crate) cors_origins: Vec<String>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("database_url", &self.database_url)
            .field("fmp_api_key", &"[REDACTED]")
            .field("fmp_base_url", &self.fmp_base_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

impl ServerConfig {
    /// Load settings from process environment variables.
    ///
    /// `DATABASE_URL` and `FMP_API_KEY` are required.
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`; blank values count as unset.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| {
            var(key).ok_or_else(|| DataError::Config(format!("{key} must be set")))
        };

        let port = match var("API_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| DataError::Config(format!("API_PORT is not a valid port: {raw}")))?,
            None => DEFAULT_PORT,
        };

        let cors_origins = var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_else(|| vec![DEFAULT_CORS_ORIGIN.to_string()]);

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            fmp_api_key: required("FMP_API_KEY")?,
            fmp_base_url: var("FMP_BASE_URL"),
            host: var("API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            cors_origins,
        })
    }

    /// Address the server listens on.
    pub(crate) fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| DataError::Config(format!("Invalid listen address: {e}")))
    }
}
