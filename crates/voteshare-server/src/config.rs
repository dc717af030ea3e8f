//! Environment-variable configuration (SPEC_FULL.md §10.3). Fails fast on
//! a missing or malformed variable instead of silently defaulting
//! security-relevant fields.

use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Coordinator,
    Share,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeId {
    A,
    B,
}

impl NodeId {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeId::A => "A",
            NodeId::B => "B",
        }
    }
}

pub struct Config {
    pub mode: Mode,
    pub node_id: Option<NodeId>,
    pub hmac_key: Vec<u8>,
    pub share_node_a_url: Option<String>,
    pub share_node_b_url: Option<String>,
    pub http_timeout: Duration,
    pub storage_path: String,
    pub bind_addr: std::net::SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mode = match require("MODE")?.as_str() {
            "coordinator" => Mode::Coordinator,
            "share" => Mode::Share,
            other => return Err(ConfigError::Invalid("MODE", other.to_string())),
        };

        let node_id = match mode {
            Mode::Share => Some(match require("NODE_ID")?.as_str() {
                "A" => NodeId::A,
                "B" => NodeId::B,
                other => return Err(ConfigError::Invalid("NODE_ID", other.to_string())),
            }),
            Mode::Coordinator => None,
        };

        let hmac_key = require("HMAC_KEY")?.into_bytes();
        if hmac_key.len() < 32 {
            return Err(ConfigError::Invalid("HMAC_KEY", "must be at least 32 bytes".to_string()));
        }

        let (share_node_a_url, share_node_b_url) = match mode {
            Mode::Coordinator => (Some(require("SHARE_NODE_A_URL")?), Some(require("SHARE_NODE_B_URL")?)),
            Mode::Share => (None, None),
        };

        let http_timeout = Duration::from_secs(optional("HTTP_TIMEOUT", "10")?.parse().map_err(|_| {
            ConfigError::Invalid("HTTP_TIMEOUT", "must be an integer number of seconds".to_string())
        })?);

        let storage_path = optional("STORAGE_PATH", "./data")?;

        let bind_addr = optional("BIND_ADDR", "0.0.0.0:8080")?
            .parse()
            .map_err(|_| ConfigError::Invalid("BIND_ADDR", "must be a socket address".to_string()))?;

        Ok(Self { mode, node_id, hmac_key, share_node_a_url, share_node_b_url, http_timeout, storage_path, bind_addr })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn optional(name: &'static str, default: &str) -> Result<String, ConfigError> {
    Ok(env::var(name).unwrap_or_else(|_| default.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_all() {
        for key in [
            "MODE",
            "NODE_ID",
            "HMAC_KEY",
            "SHARE_NODE_A_URL",
            "SHARE_NODE_B_URL",
            "HTTP_TIMEOUT",
            "STORAGE_PATH",
            "BIND_ADDR",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn missing_mode_fails_fast() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Missing("MODE")));
    }

    #[test]
    fn share_mode_requires_node_id_and_no_share_node_urls() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        env::set_var("MODE", "share");
        env::set_var("NODE_ID", "A");
        env::set_var("HMAC_KEY", "x".repeat(32));

        let config = Config::from_env().unwrap();
        assert_eq!(config.mode, Mode::Share);
        assert_eq!(config.node_id, Some(NodeId::A));
        assert!(config.share_node_a_url.is_none());
    }

    #[test]
    fn short_hmac_key_is_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        env::set_var("MODE", "share");
        env::set_var("NODE_ID", "A");
        env::set_var("HMAC_KEY", "too-short");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("HMAC_KEY", _)));
    }
}
