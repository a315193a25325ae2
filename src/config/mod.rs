//! Configuration management for negotiate-http
//!
//! Handles loading and validating the adapter configuration: base address,
//! content-type negotiation sets, method whitelist, cookie policy and the
//! engine-level knobs handed to the HTTP session.

use crate::client::HttpMethod;
use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod defaults;

pub use defaults::*;

/// Cookie jar behaviour of the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookiePolicy {
    /// No cookie store at all
    Disabled,
    /// Keep cookies, but refuse those set by IP-literal hosts
    #[default]
    Strict,
    /// Keep every cookie, including those from IP-literal hosts
    Unsafe,
}

/// Adapter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// URL prefix prepended to every request path
    #[serde(default = "defaults::default_base_url")]
    pub base_url: String,

    /// Content types decoded as JSON
    #[serde(default = "defaults::default_json_content_types")]
    pub json_content_types: Vec<String>,

    /// Exact content types read as raw bytes
    #[serde(default = "defaults::default_binary_content_types")]
    pub binary_content_types: Vec<String>,

    /// Main types read as raw bytes
    #[serde(default = "defaults::default_binary_main_types")]
    pub binary_main_types: Vec<String>,

    /// Method whitelist; `None` allows every supported method
    #[serde(default)]
    pub allowed_methods: Option<Vec<HttpMethod>>,

    /// Cookie jar policy
    #[serde(default)]
    pub cookies: CookiePolicy,

    /// Engine-level request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User-Agent sent with every request
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Create a configuration bound to `base_url` with default negotiation sets
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from the default location
    ///
    /// Tries in order:
    /// 1. `XDG_CONFIG_HOME/negotiate-http/config.toml`
    /// 2. `~/.config/negotiate-http/config.toml`
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Err(ClientError::NoConfig);
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| ClientError::ConfigRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ClientError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .and_then(|path| if path.is_empty() { None } else { Some(path) })
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        config_home
            .ok_or_else(|| {
                ClientError::Internal(
                    "Could not determine config directory: XDG_CONFIG_HOME not set and no home directory found"
                        .to_string(),
                )
            })
            .map(|path| path.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Apply `NEGOTIATE_HTTP_BASE_URL` if set and non-empty
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
        self
    }

    /// Replace the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the JSON content-type set
    #[must_use]
    pub fn with_json_content_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.json_content_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the exact binary content-type set
    #[must_use]
    pub fn with_binary_content_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.binary_content_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the binary main-type set
    #[must_use]
    pub fn with_binary_main_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.binary_main_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict the methods the client may issue
    #[must_use]
    pub fn with_allowed_methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = HttpMethod>,
    {
        self.allowed_methods = Some(methods.into_iter().collect());
        self
    }

    /// Set the cookie jar policy
    #[must_use]
    pub const fn with_cookies(mut self, cookies: CookiePolicy) -> Self {
        self.cookies = cookies;
        self
    }

    /// Set the engine-level timeout
    #[must_use]
    pub const fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Engine timeout as a [`Duration`]
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // An empty base URL is allowed; callers then pass absolute URLs as paths
        if !self.base_url.is_empty()
            && !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://"))
        {
            return Err(ClientError::InvalidConfig(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        for (field, entries) in [
            ("json_content_types", &self.json_content_types),
            ("binary_content_types", &self.binary_content_types),
            ("binary_main_types", &self.binary_main_types),
        ] {
            if entries.iter().any(|entry| entry.trim().is_empty()) {
                return Err(ClientError::InvalidConfig(format!(
                    "{field} cannot contain empty entries"
                )));
            }
        }

        if self.binary_main_types.iter().any(|entry| entry.contains('/')) {
            return Err(ClientError::InvalidConfig(
                "binary_main_types entries must not contain '/'".to_string(),
            ));
        }

        if matches!(&self.allowed_methods, Some(methods) if methods.is_empty()) {
            return Err(ClientError::InvalidConfig(
                "allowed_methods cannot be empty when set".to_string(),
            ));
        }

        if self.timeout_secs == Some(0) {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            json_content_types: default_json_content_types(),
            binary_content_types: default_binary_content_types(),
            binary_main_types: default_binary_main_types(),
            allowed_methods: None,
            cookies: CookiePolicy::default(),
            timeout_secs: None,
            user_agent: None,
        }
    }
}
