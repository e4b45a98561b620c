//! Layered runtime configuration.
//!
//! Sources, lowest precedence first:
//! - built-in defaults (`Config::default()`)
//! - `config.toml` in the working directory, if present
//! - environment variables prefixed with `PITFALL_` (e.g. `PITFALL_DATABASE_URL`)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

pub use crate::service::markup::MarkupMode;

pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "PITFALL_";

/// Which evaluator backs `POST /calculate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorKind {
    /// General-purpose evaluator with a shared, writable context.
    #[default]
    Unsandboxed,
    /// Numeric literals and `+ - * / %` only.
    Arithmetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    pub evaluator: EvaluatorKind,
    pub markup: MarkupMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            database_url: "sqlite:users.db".to_string(),
            loglevel: "info".to_string(),
            evaluator: EvaluatorKind::default(),
            markup: MarkupMode::default(),
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}
