use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Context;
use axum::http::HeaderValue;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://chat.db";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Browser origin allowed through CORS.
    pub allowed_origin: HeaderValue,
}

impl Config {
    /// Reads the process environment, with `.env` taken into account.
    pub fn from_env() -> anyhow::Result<Config> {
        Self::from_vars(|key| dotenv::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
        let database_url = var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());

        let port = match var("PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("PORT={port} is not a valid port"))?,
            None => DEFAULT_PORT,
        };

        let origin = var("ALLOWED_ORIGIN").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_owned());
        let allowed_origin = HeaderValue::from_str(&origin)
            .with_context(|| format!("ALLOWED_ORIGIN={origin} is not a valid header value"))?;

        Ok(Config {
            database_url,
            port,
            allowed_origin,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.port, 3001);
        assert_eq!(config.allowed_origin, "http://localhost:3000");
        assert_eq!(config.addr().to_string(), "0.0.0.0:3001");
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("DATABASE_URL", "sqlite://other.db"),
            ("PORT", "8080"),
            ("ALLOWED_ORIGIN", "https://chat.example"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "sqlite://other.db");
        assert_eq!(config.port, 8080);
        assert_eq!(config.allowed_origin, "https://chat.example");
    }

    #[test]
    fn rejects_bad_port() {
        let err = config(&[("PORT", "loud")]).unwrap_err();
        assert!(err.to_string().contains("PORT=loud"));
    }
}
