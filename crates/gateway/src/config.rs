//! Gateway configuration.

use std::env;

use common::{AppResult, DatabaseConfig, JwtConfig, ServiceConfig};

/// Everything the gateway needs at startup, read once from the environment.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Listener address (`GATEWAY_HOST` / `GATEWAY_PORT`)
    pub server: ServiceConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    /// Single allowed origin; any origin when unset
    pub cors_allow_origin: Option<String>,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            server: ServiceConfig::from_env("GATEWAY"),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env()?,
            cors_allow_origin: env::var("CORS_ALLOW_ORIGIN")
                .ok()
                .filter(|origin| !origin.trim().is_empty()),
        })
    }

    /// Replace the listener address with command-line overrides.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }
}
