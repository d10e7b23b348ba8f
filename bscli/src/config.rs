//! CLI configuration management
//!
//! Handles loading and saving CLI-specific configuration.

use crate::dispatch::{normalize_origin, DEFAULT_TIMEOUT};
use crate::route::API_PREFIX;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Keys accepted by `bscli config set`
pub const CONFIG_KEYS: [&str; 7] = [
    "host", "username", "password", "format", "verbose", "timeout", "insecure",
];

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    /// Player address, `host[:port]` or a full `http(s)://` origin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// DWS username
    pub username: String,

    /// DWS password; prompted for when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Default output format
    pub output_format: String,

    /// Enable verbose logging by default
    pub verbose: bool,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Use HTTPS and accept self-signed player certificates
    pub insecure: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            host: None,
            username: "admin".to_string(),
            password: None,
            output_format: "table".to_string(),
            verbose: false,
            timeout: DEFAULT_TIMEOUT.as_secs(),
            insecure: false,
        }
    }
}

impl CliConfig {
    /// Default configuration file location
    pub fn default_path() -> PathBuf {
        brightsign_core::default_config_path()
    }

    /// Load configuration from `path`, or the defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read CLI config file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse CLI config file {}", path.display()))
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize CLI config")?;

        std::fs::write(path, content).context("Failed to write CLI config file")?;

        Ok(())
    }

    /// Update a single setting by key, validating the value
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "host" => {
                ConfigBuilder::validate_host(value)?;
                self.host = Some(value.to_string());
            }
            "username" | "user" => {
                ConfigBuilder::validate_username(value)?;
                self.username = value.to_string();
            }
            "password" => self.password = Some(value.to_string()),
            "format" | "output_format" => {
                ConfigBuilder::validate_output_format(value)?;
                self.output_format = value.to_string();
            }
            "verbose" => self.verbose = parse_bool(value)?,
            "timeout" => {
                let timeout = value
                    .parse()
                    .with_context(|| format!("Invalid timeout '{}'", value))?;
                ConfigBuilder::validate_timeout(timeout)?;
                self.timeout = timeout;
            }
            "insecure" => self.insecure = parse_bool(value)?,
            _ => {
                return Err(anyhow::anyhow!(
                    "Unknown config key '{}'. Valid keys: {}",
                    key,
                    CONFIG_KEYS.join(", ")
                ))
            }
        }
        Ok(())
    }

    /// Origin the dispatcher talks to, `None` without a host
    pub fn origin(&self) -> Option<String> {
        self.host
            .as_deref()
            .map(|host| normalize_origin(host, self.insecure))
    }

    /// Base URL of the REST API, for display
    pub fn api_base_url(&self) -> Option<String> {
        self.origin().map(|origin| format!("{}{}", origin, API_PREFIX))
    }

    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!("Invalid boolean '{}'", value)),
    }
}

fn env_flag(value: &str) -> bool {
    value.to_lowercase() == "true" || value == "1"
}

/// Builder for CLI configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Config file
/// 3. Environment variables
/// 4. CLI arguments
///
/// Apply layers from highest to lowest: each later layer only fills values
/// that are still unset.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    host: Option<String>,
    username: Option<String>,
    password: Option<String>,
    output_format: Option<String>,
    verbose: Option<bool>,
    timeout: Option<u64>,
    insecure: Option<bool>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set player host (with validation)
    pub fn with_host(mut self, host: impl Into<String>) -> Result<Self> {
        let host = host.into();
        Self::validate_host(&host)?;
        self.host = Some(host);
        Ok(self)
    }

    /// Set username (with validation)
    pub fn with_username(mut self, username: impl Into<String>) -> Result<Self> {
        let username = username.into();
        Self::validate_username(&username)?;
        self.username = Some(username);
        Ok(self)
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set output format (with validation)
    pub fn with_output_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        Self::validate_output_format(&format)?;
        self.output_format = Some(format);
        Ok(self)
    }

    /// Set verbose flag
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Set timeout (with validation)
    pub fn with_timeout(mut self, timeout: u64) -> Result<Self> {
        Self::validate_timeout(timeout)?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = Some(insecure);
        self
    }

    /// Fill unset values from the config file at `path`.
    ///
    /// A missing file is not an error; a file that cannot be parsed is.
    pub fn with_config_file(self, path: &Path) -> Result<Self> {
        let config = CliConfig::load_from(path)?;

        Ok(Self {
            host: self.host.or(config.host),
            username: self.username.or(Some(config.username)),
            password: self.password.or(config.password),
            output_format: self.output_format.or(Some(config.output_format)),
            verbose: self.verbose.or(Some(config.verbose)),
            timeout: self.timeout.or(Some(config.timeout)),
            insecure: self.insecure.or(Some(config.insecure)),
        })
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(mut self) -> Self {
        // Only apply env vars if values weren't already set (preserving priority)
        if self.host.is_none() {
            if let Ok(host) = std::env::var("BSCLI_HOST") {
                if Self::validate_host(&host).is_ok() {
                    self.host = Some(host);
                }
            }
        }

        if self.username.is_none() {
            if let Ok(username) = std::env::var("BSCLI_USER") {
                if Self::validate_username(&username).is_ok() {
                    self.username = Some(username);
                }
            }
        }

        if self.password.is_none() {
            if let Ok(password) = std::env::var("BSCLI_PASSWORD") {
                self.password = Some(password);
            }
        }

        if self.output_format.is_none() {
            if let Ok(format) = std::env::var("BSCLI_FORMAT") {
                if Self::validate_output_format(&format).is_ok() {
                    self.output_format = Some(format);
                }
            }
        }

        if self.verbose.is_none() {
            if let Ok(verbose) = std::env::var("BSCLI_VERBOSE") {
                self.verbose = Some(env_flag(&verbose));
            }
        }

        if self.timeout.is_none() {
            if let Ok(timeout) = std::env::var("BSCLI_TIMEOUT") {
                if let Ok(timeout) = timeout.parse() {
                    if Self::validate_timeout(timeout).is_ok() {
                        self.timeout = Some(timeout);
                    }
                }
            }
        }

        if self.insecure.is_none() {
            if let Ok(insecure) = std::env::var("BSCLI_INSECURE") {
                self.insecure = Some(env_flag(&insecure));
            }
        }

        self
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<CliConfig> {
        let defaults = CliConfig::default();

        let username = self.username.unwrap_or(defaults.username);
        let output_format = self.output_format.unwrap_or(defaults.output_format);
        let timeout = self.timeout.unwrap_or(defaults.timeout);

        // Validate final values
        if let Some(host) = &self.host {
            Self::validate_host(host)?;
        }
        Self::validate_username(&username)?;
        Self::validate_output_format(&output_format)?;
        Self::validate_timeout(timeout)?;

        Ok(CliConfig {
            host: self.host,
            username,
            password: self.password,
            output_format,
            verbose: self.verbose.unwrap_or(defaults.verbose),
            timeout,
            insecure: self.insecure.unwrap_or(defaults.insecure),
        })
    }

    /// Validate a player address
    fn validate_host(host: &str) -> Result<()> {
        if host.trim().is_empty() {
            return Err(anyhow::anyhow!("Host cannot be empty"));
        }

        if host.contains(char::is_whitespace) {
            return Err(anyhow::anyhow!("Host cannot contain whitespace"));
        }

        if host.contains("://") && !host.starts_with("http://") && !host.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "Host scheme must be http:// or https://"
            ));
        }

        Ok(())
    }

    fn validate_username(username: &str) -> Result<()> {
        if username.is_empty() {
            return Err(anyhow::anyhow!("Username cannot be empty"));
        }
        if username.contains('"') {
            return Err(anyhow::anyhow!("Username cannot contain '\"'"));
        }
        Ok(())
    }

    /// Validate output format
    fn validate_output_format(format: &str) -> Result<()> {
        match format {
            "table" | "json" => Ok(()),
            _ => Err(anyhow::anyhow!(
                "Invalid output format '{}'. Must be 'table' or 'json'",
                format
            )),
        }
    }

    /// Validate timeout value
    fn validate_timeout(timeout: u64) -> Result<()> {
        if timeout == 0 {
            return Err(anyhow::anyhow!("Timeout must be greater than 0"));
        }

        if timeout > 300 {
            return Err(anyhow::anyhow!(
                "Timeout must be less than or equal to 300 seconds"
            ));
        }

        Ok(())
    }
}
