// ⚙️ Server Configuration
//
// Defaults, overridden by environment variables, overridden by CLI flags:
//   COOKBOOK_ADDR  bind address (default 0.0.0.0:8080)
//   COOKBOOK_SEED  JSON seed file loaded at startup (default: none)

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const ADDR_ENV: &str = "COOKBOOK_ADDR";
pub const SEED_ENV: &str = "COOKBOOK_SEED";
pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub seed_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            seed_path: None,
        }
    }
}

impl ServerConfig {
    /// Read the process environment on top of the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();

        if let Some(addr) = lookup(ADDR_ENV).filter(|v| !v.trim().is_empty()) {
            config.bind_addr = parse_addr(&addr).with_context(|| format!("Invalid {}", ADDR_ENV))?;
        }

        if let Some(seed) = lookup(SEED_ENV).filter(|v| !v.trim().is_empty()) {
            config.seed_path = Some(PathBuf::from(seed));
        }

        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, addr: Option<SocketAddr>, seed: Option<PathBuf>) -> Self {
        if let Some(addr) = addr {
            self.bind_addr = addr;
        }
        if seed.is_some() {
            self.seed_path = seed;
        }
        self
    }
}

fn parse_addr(value: &str) -> Result<SocketAddr> {
    value
        .trim()
        .parse::<SocketAddr>()
        .with_context(|| format!("'{}' is not a socket address (expected e.g. {})", value, DEFAULT_ADDR))
}
