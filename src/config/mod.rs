pub mod states;
pub mod toml_config;

use crate::config::states::us_states;
use crate::config::toml_config::{
    usable_api_key, validate_bind, validate_provider, TomlConfig, DEFAULT_BIND,
    DEFAULT_CENSUS_BASE_URL, DEFAULT_CONCURRENT_REQUESTS, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::ConfigProvider;
use crate::domain::model::StateInfo;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "cli")]
use clap::Parser;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "census-employment"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Serves state employment summaries from the Census QWI API")
)]
pub struct CliConfig {
    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_BIND))]
    pub bind: String,

    #[cfg_attr(
        feature = "cli",
        arg(long, env = "CENSUS_BASE_URL", default_value = DEFAULT_CENSUS_BASE_URL)
    )]
    pub census_base_url: String,

    #[cfg_attr(feature = "cli", arg(long, env = "CENSUS_API_KEY", hide_env_values = true))]
    pub census_api_key: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, default_value_t = DEFAULT_CONCURRENT_REQUESTS))]
    pub concurrent_requests: usize,

    #[cfg_attr(feature = "cli", arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS))]
    pub request_timeout_secs: u64,

    /// TOML file; keys it sets replace the command-line values.
    #[cfg_attr(feature = "cli", arg(long))]
    pub config: Option<PathBuf>,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Emit logs as JSON lines"))]
    pub log_json: bool,

    #[cfg_attr(feature = "cli", arg(skip))]
    pub states: Vec<StateInfo>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            census_base_url: DEFAULT_CENSUS_BASE_URL.to_string(),
            census_api_key: None,
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
            request_timeout_secs: DEFAULT_TIMEOUT_SECONDS,
            config: None,
            verbose: false,
            log_json: false,
            states: Vec::new(),
        }
    }
}

impl CliConfig {
    /// Loads `--config` when given and layers it over the command line.
    pub fn resolve(mut self) -> Result<Self> {
        if let Some(path) = self.config.clone() {
            let file = TomlConfig::from_file(&path)?;
            self.merge(file);
        }
        Ok(self)
    }

    pub fn merge(&mut self, file: TomlConfig) {
        if let Some(bind) = file.server.and_then(|s| s.bind) {
            self.bind = bind;
        }

        if let Some(census) = file.census {
            if let Some(base_url) = census.base_url {
                self.census_base_url = base_url;
            }
            if census.api_key.is_some() {
                self.census_api_key = census.api_key;
            }
            if let Some(concurrent) = census.concurrent_requests {
                self.concurrent_requests = concurrent;
            }
            if let Some(timeout) = census.timeout_seconds {
                self.request_timeout_secs = timeout;
            }
        }

        if let Some(states) = file.states {
            self.states = states;
        }
    }
}

impl ConfigProvider for CliConfig {
    fn census_base_url(&self) -> &str {
        &self.census_base_url
    }

    fn census_api_key(&self) -> Option<&str> {
        usable_api_key(self.census_api_key.as_deref())
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn states(&self) -> &[StateInfo] {
        if self.states.is_empty() {
            us_states()
        } else {
            &self.states
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_bind(&self.bind)?;
        validate_provider(self)
    }
}
