//! HTTP/WS server shell configuration parsing from environment variables.

use std::env;

#[derive(Debug, Clone)]
pub struct ServerEnvConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServerEnvConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerEnvConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            bind_address: env::var("DUETTO_SERVER__BIND_ADDRESS").unwrap_or(default.bind_address),
            port: env::var("DUETTO_SERVER__PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_defaults() {
        let config = ServerEnvConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_address, "0.0.0.0");
    }
}
