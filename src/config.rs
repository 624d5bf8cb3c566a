//! Physics server configuration
//!
//! Loaded from multiple sources with the following priority (lowest to highest):
//! 1. Built-in defaults
//! 2. `config/server.toml` (version controlled)
//! 3. `config/local.toml` (gitignored, local overrides)
//! 4. Environment variables (`HOOP_SECTION__KEY`)

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tuning::FlightTuning;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind: String,
    /// Directory served for non-API GET requests (`index.html`, wasm bundle)
    pub web_root: Option<PathBuf>,
    /// Ball flight constants used by `/update_ball`
    pub physics: FlightTuning,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            web_root: None,
            physics: FlightTuning::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `config/`
    pub fn load() -> Result<Self> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref();

        let figment = Figment::from(Serialized::defaults(ServerConfig::default()))
            .merge(Toml::file(config_dir.join("server.toml")))
            .merge(Toml::file(config_dir.join("local.toml")))
            // HOOP_PHYSICS__GRAVITY=0.8 -> physics.gravity = 0.8
            .merge(Env::prefixed("HOOP_").split("__"));

        Ok(figment.extract()?)
    }
}
