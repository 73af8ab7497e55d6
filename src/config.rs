use crate::error::ConfigError;
use crate::feeds::trends::{DEFAULT_FEED_URL_TEMPLATE, REGION_PLACEHOLDER};
use crate::notify::format::Presentation;
use crate::notify::slack::DEFAULT_POST_URL;
use crate::region::RegionStrategy;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CREDENTIAL_ENV: &str = "OAUTH_ACCESS_TOKEN";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub address: IpAddr,
    pub port: u16,
    pub feed_url_template: String,
    pub post_url: String,
    pub filter_to_today: bool,
    pub presentation: Presentation,
    pub region_strategy: RegionStrategy,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            feed_url_template: DEFAULT_FEED_URL_TEMPLATE.to_string(),
            post_url: DEFAULT_POST_URL.to_string(),
            filter_to_today: false,
            presentation: Presentation::default(),
            region_strategy: RegionStrategy::default(),
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when it exists, or
    /// fall back to built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|p| p.exists()),
        };

        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                toml::from_str::<Config>(&content)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => Config::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("trends-relay").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.feed_url_template.contains(REGION_PLACEHOLDER) {
            return Err(ConfigError::InvalidFeedTemplate(
                self.feed_url_template.clone(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Bot token used for every message post. Read once at startup.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::MissingCredential(CREDENTIAL_ENV));
        }
        Ok(Self(token))
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(std::env::var(CREDENTIAL_ENV).unwrap_or_default())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
