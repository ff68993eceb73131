//! Client configuration.
//!
//! Settings are read from a YAML file and then overridden by `CSE_*`
//! environment variables. Credentials are never compiled in.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::transport_http::{HttpTransport, DEFAULT_TIMEOUT};
use crate::{Result, SearchError};

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Query suggestion endpoint used when none is configured.
pub const DEFAULT_SUGGEST_ENDPOINT: &str = "https://suggestqueries.google.com/complete/search";

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "CSE_API_KEY";
/// Environment variable holding the search engine identifier.
pub const ENV_ENGINE_ID: &str = "CSE_ENGINE_ID";
/// Environment variable overriding the endpoint.
pub const ENV_ENDPOINT: &str = "CSE_ENDPOINT";
/// Environment variable overriding the suggestion endpoint.
pub const ENV_SUGGEST_ENDPOINT: &str = "CSE_SUGGEST_ENDPOINT";
/// Environment variable overriding the timeout in seconds.
pub const ENV_TIMEOUT: &str = "CSE_TIMEOUT";
/// Environment variable holding a proxy URL.
pub const ENV_PROXY: &str = "CSE_PROXY";
/// Environment variable pointing at a config file.
pub const ENV_CONFIG: &str = "CSE_CONFIG";

/// API key and search engine identifier.
///
/// Both values are opaque and passed through unvalidated.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    engine_id: String,
}

impl Credentials {
    /// Creates credentials from an API key and a search engine (cx) identifier.
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            engine_id: engine_id.into(),
        }
    }

    /// Returns the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the search engine identifier.
    pub fn engine_id(&self) -> &str {
        &self.engine_id
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &mask(&self.api_key))
            .field("engine_id", &self.engine_id)
            .finish()
    }
}

/// Settings for the search client.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// API key.
    pub api_key: Option<String>,
    /// Search engine (cx) identifier.
    pub engine_id: Option<String>,
    /// Search endpoint base URL.
    pub endpoint: String,
    /// Query suggestion endpoint base URL.
    pub suggest_endpoint: String,
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User agent override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Proxy URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            engine_id: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            suggest_endpoint: DEFAULT_SUGGEST_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT.as_secs(),
            user_agent: None,
            proxy: None,
        }
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &self.api_key.as_deref().map(mask))
            .field("engine_id", &self.engine_id)
            .field("endpoint", &self.endpoint)
            .field("suggest_endpoint", &self.suggest_endpoint)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("proxy", &self.proxy)
            .finish()
    }
}

impl SearchConfig {
    /// Loads settings from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SearchError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
            .map_err(|e| SearchError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parses settings from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| SearchError::Config(e.to_string()))
    }

    /// Resolves the config file and environment into settings.
    ///
    /// An explicit `path` must exist. Otherwise `CSE_CONFIG` is consulted,
    /// then the per-user default location, which is skipped if absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, default_path(), |key| std::env::var(key).ok())
    }

    /// Like [`SearchConfig::load`], with the default path and environment supplied by the caller.
    pub fn load_with<F>(path: Option<&Path>, default_path: Option<PathBuf>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| env(ENV_CONFIG).filter(|p| !p.is_empty()).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Self::from_file(path)?
            }
            None => match default_path.filter(|p| p.is_file()) {
                Some(path) => {
                    debug!("Loading config from {}", path.display());
                    Self::from_file(path)?
                }
                None => Self::default(),
            },
        };

        config.merge_env_with(env);
        Ok(config)
    }

    /// Merges `CSE_*` environment variables into these settings.
    pub fn merge_env(&mut self) {
        self.merge_env_with(|key| std::env::var(key).ok());
    }

    /// Merges values from the given variable lookup.
    pub fn merge_env_with<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = env(ENV_API_KEY) {
            self.api_key = Some(val);
        }
        if let Some(val) = env(ENV_ENGINE_ID) {
            self.engine_id = Some(val);
        }
        if let Some(val) = env(ENV_ENDPOINT) {
            self.endpoint = val;
        }
        if let Some(val) = env(ENV_SUGGEST_ENDPOINT) {
            self.suggest_endpoint = val;
        }
        if let Some(val) = env(ENV_TIMEOUT) {
            match val.parse() {
                Ok(timeout) => self.timeout = timeout,
                Err(_) => warn!("Ignoring invalid {}={:?}", ENV_TIMEOUT, val),
            }
        }
        if let Some(val) = env(ENV_PROXY) {
            self.proxy = Some(val);
        }
    }

    /// Returns the credentials, failing if either value is missing or blank.
    pub fn credentials(&self) -> Result<Credentials> {
        let api_key = required(&self.api_key, "API key", ENV_API_KEY, "api_key")?;
        let engine_id = required(&self.engine_id, "search engine id", ENV_ENGINE_ID, "engine_id")?;
        Ok(Credentials::new(api_key, engine_id))
    }

    /// Returns the parsed endpoint URL.
    pub fn endpoint_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.endpoint)?)
    }

    /// Returns the parsed suggestion endpoint URL.
    pub fn suggest_endpoint_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.suggest_endpoint)?)
    }

    /// Returns the request timeout.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Builds the HTTP transport described by these settings.
    pub fn build_transport(&self) -> Result<HttpTransport> {
        let mut builder = HttpTransport::builder().timeout(self.timeout_duration());
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(proxy);
        }
        builder.build()
    }

    /// Returns a copy safe to display, with the API key masked.
    pub fn masked(&self) -> Self {
        Self {
            api_key: self.api_key.as_deref().map(mask),
            ..self.clone()
        }
    }
}

/// Per-user config file location.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cse-search").join("config.yaml"))
}

fn required(value: &Option<String>, what: &str, env: &str, key: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(SearchError::Config(format!(
            "missing {}: set {} or `{}` in the config file",
            what, env, key
        ))),
    }
}

/// Secrets shorter than this are masked entirely.
const MIN_MASKED_TAIL_LEN: usize = 12;

/// Masks a secret, keeping the last four characters of long ones.
fn mask(secret: &str) -> String {
    let count = secret.chars().count();
    if count < MIN_MASKED_TAIL_LEN {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{}", tail)
}
