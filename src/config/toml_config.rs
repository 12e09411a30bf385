use crate::config::states::us_states;
use crate::domain::model::StateInfo;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CensusError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_CENSUS_BASE_URL: &str = "https://api.census.gov/data/timeseries/qwi/sa";
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 128;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerConfig>,
    pub census: Option<CensusConfig>,
    pub states: Option<Vec<StateInfo>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CensusConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub concurrent_requests: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

impl TomlConfig {
    /// Reads and parses a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CensusError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML text after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CensusError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay as-is.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn bind(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.bind.as_deref())
            .unwrap_or(DEFAULT_BIND)
    }

    fn census(&self) -> Option<&CensusConfig> {
        self.census.as_ref()
    }
}

/// Placeholders left unsubstituted mean the variable was never set.
pub(crate) fn usable_api_key(key: Option<&str>) -> Option<&str> {
    key.map(str::trim)
        .filter(|k| !k.is_empty() && !(k.starts_with("${") && k.ends_with('}')))
}

/// Shared checks for every `ConfigProvider`.
pub(crate) fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    crate::utils::validation::validate_url("census.base_url", config.census_base_url())?;
    crate::utils::validation::validate_positive_number(
        "census.concurrent_requests",
        config.concurrent_requests(),
        1,
    )?;

    if config.request_timeout().is_zero() {
        return Err(CensusError::InvalidConfigValueError {
            field: "census.timeout_seconds".to_string(),
            value: "0".to_string(),
            reason: "Timeout must be at least 1 second".to_string(),
        });
    }

    let states = config.states();
    if states.is_empty() {
        return Err(CensusError::MissingConfigError {
            field: "states".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for state in states {
        crate::utils::validation::validate_non_empty_string("states.code", &state.code)?;
        crate::utils::validation::validate_non_empty_string("states.name", &state.name)?;
        if !seen.insert(state.code.as_str()) {
            return Err(CensusError::InvalidConfigValueError {
                field: "states.code".to_string(),
                value: state.code.clone(),
                reason: "Duplicate state code".to_string(),
            });
        }
    }

    Ok(())
}

pub(crate) fn validate_bind(bind: &str) -> Result<()> {
    bind.parse::<std::net::SocketAddr>()
        .map(|_| ())
        .map_err(|e| CensusError::InvalidConfigValueError {
            field: "server.bind".to_string(),
            value: bind.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

impl ConfigProvider for TomlConfig {
    fn census_base_url(&self) -> &str {
        self.census()
            .and_then(|c| c.base_url.as_deref())
            .unwrap_or(DEFAULT_CENSUS_BASE_URL)
    }

    fn census_api_key(&self) -> Option<&str> {
        usable_api_key(self.census().and_then(|c| c.api_key.as_deref()))
    }

    fn concurrent_requests(&self) -> usize {
        self.census()
            .and_then(|c| c.concurrent_requests)
            .unwrap_or(DEFAULT_CONCURRENT_REQUESTS)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.census()
                .and_then(|c| c.timeout_seconds)
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    fn states(&self) -> &[StateInfo] {
        self.states.as_deref().unwrap_or_else(|| us_states())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_bind(self.bind())?;
        validate_provider(self)
    }
}
