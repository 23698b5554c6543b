//! Layered application configuration.
//!
//! Sources, later ones win: built-in defaults, the YAML file given with
//! `--config`, then `DEPLOYMENT_HUB__*` environment variables (`__` separates
//! nesting levels, e.g. `DEPLOYMENT_HUB__LOGGING__LEVEL=debug`).

use std::path::Path;

use anyhow::Context;
use deployment_hub::{DeploymentHubConfig, StaticDirectoryConfig};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "DEPLOYMENT_HUB__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub deployment_hub: DeploymentHubConfig,
    /// Users and teams the CLI resolves callers against.
    pub directory: StaticDirectoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: LogFormat::Plain,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

impl AppConfig {
    /// Load defaults, then the optional YAML file, then the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or any source does not fit
    /// the configuration schema.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path
            && !path.is_file()
        {
            anyhow::bail!("config file does not exist: {}", path.display());
        }
        Self::figment(path)
            .extract()
            .context("invalid configuration")
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// `-v` info, `-vv` debug, `-vvv` trace.
    pub fn apply_verbosity(&mut self, verbose: u8) {
        let level = match verbose {
            0 => return,
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        level.clone_into(&mut self.logging.level);
    }
}
