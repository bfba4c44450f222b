//! Configuration shared by every service binary.

use config::{Config as Loader, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

/// Settings every service needs regardless of its domain. Service crates
/// flatten this into their own configuration struct.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Port the HTTP listener binds.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load from an optional `configuration` file, then from `APP__`-prefixed
    /// environment variables. A `.env` file is honored when present.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let loaded = Loader::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(loaded.try_deserialize()?)
    }
}
