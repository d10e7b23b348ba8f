//! Default path resolution for configuration files

use std::path::PathBuf;

/// Returns the default path for the CLI configuration file.
///
/// - Linux: `~/.config/bscli/config.toml`
/// - macOS: `~/Library/Application Support/bscli/config.toml`
/// - Fallback: `./bscli/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bscli")
        .join("config.toml")
}
