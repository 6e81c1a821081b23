pub mod error;
pub mod loader;

pub use error::ConfigError;
pub use loader::{read_profile, read_profiles};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Connection options for one simulated backend.
///
/// Only `host` influences runtime behaviour (it is appended to every logged
/// query); the remaining fields exist so profiles written for a real adapter
/// can be reused against the mock unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectOptions {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

impl ConnectOptions {
    pub fn with_host(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            ..Self::default()
        }
    }

    /// Layer `overrides` on top of `self`; unset override fields fall back.
    pub fn merge(&self, overrides: &ConnectOptions) -> ConnectOptions {
        ConnectOptions {
            host: overrides.host.clone().or_else(|| self.host.clone()),
            database: overrides.database.clone().or_else(|| self.database.clone()),
            user: overrides.user.clone().or_else(|| self.user.clone()),
            port: overrides.port.or(self.port),
        }
    }
}

/// One named profile out of a `connections.yml`-style file: global options
/// plus per-shard overrides.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MockProfile {
    #[serde(flatten)]
    pub options: ConnectOptions,
    #[serde(default)]
    pub shards: HashMap<String, ConnectOptions>,
}

impl MockProfile {
    /// Options for `shard`, with global options as the fallback layer.
    pub fn shard_options(&self, shard: &str) -> ConnectOptions {
        match self.shards.get(shard) {
            Some(overrides) => self.options.merge(overrides),
            None => self.options.clone(),
        }
    }
}
