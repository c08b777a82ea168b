//! Service configuration from environment variables.
//!
//! Every value is optional. A malformed number falls back to its default with
//! a warning so a typo never keeps the service from starting.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    /// `DATABASE_URL`; `None` means the store is not configured.
    pub database_url: Option<String>,
    /// `PORT`.
    pub port: u16,
    /// `DB_MAX_CONNECTIONS`.
    pub db_max_connections: u32,
    /// `STATIC_DIR`: host page and wasm package served as a fallback.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            port: DEFAULT_PORT,
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            static_dir: None,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        Self {
            database_url: var("DATABASE_URL"),
            port: parse_or("PORT", var("PORT"), DEFAULT_PORT),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", var("DB_MAX_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS)
                .max(1),
            static_dir: var("STATIC_DIR").map(PathBuf::from),
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy + std::fmt::Display>(name: &str, raw: Option<String>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };
    raw.parse().unwrap_or_else(|_| {
        tracing::warn!(%name, value = %raw, %default, "invalid value, using default");
        default
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
