use std::time::Duration;

use serde::Deserialize;

/// Service configuration, read from `HOOKWATCH_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// SQLite database, e.g. `sqlite://github_webhooks.db`. Activities are kept
    /// in memory when unset.
    pub database_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_store_timeout_secs")]
    pub store_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    5000
}

fn default_max_connections() -> u32 {
    5
}

fn default_store_timeout_secs() -> u64 {
    5
}

impl Config {
    pub const ENV_PREFIX: &'static str = "HOOKWATCH_";

    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed(Self::ENV_PREFIX).from_env()
    }

    pub fn bind(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}
