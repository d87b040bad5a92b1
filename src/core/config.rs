//! # Configuration & Profile
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI argument.
//!
//! Config lives at `~/.pssst/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! Resolution collapses everything into a [`Profile`] — the credential
//! bundle the messaging client is constructed with. A profile without a
//! username cannot exist; that is the one fatal configuration error and it
//! fires before any terminal mode change.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub address: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ProfileConfig {
    pub username: Option<String>,
    pub token: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_SERVER_ADDRESS: &str = "https://api.pssst.name";

// ============================================================================
// Resolved Profile (concrete values, no Options)
// ============================================================================

/// The credential bundle a session runs with. Owned by the messaging client
/// for the session lifetime and never mutated.
#[derive(Debug, Clone)]
pub struct Profile {
    pub username: String,
    pub token: Option<String>,
    pub server: String,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// No username was supplied by CLI, env, or config file.
    ProfileRequired,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::ProfileRequired => write!(f, "Profile required"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.pssst/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".pssst").join("config.toml"))
}

/// Load config from `~/.pssst/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ChatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ChatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ChatConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ChatConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: ChatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Pssst Chat Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI argument.

# [server]
# address = "https://api.pssst.name"  # Or set PSSST_SERVER env var

# [profile]
# username = "alice"                  # Or pass as CLI argument
# token = "..."                       # Or set PSSST_TOKEN env var
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final profile by collapsing: defaults → config file → env
/// vars → CLI argument.
///
/// `cli_username` comes from the positional CLI argument (None = not given).
pub fn resolve(config: &ChatConfig, cli_username: Option<&str>) -> Result<Profile, ConfigError> {
    // Username: CLI → env → config; missing everywhere is fatal.
    let username = cli_username
        .map(|s| s.to_string())
        .or_else(|| std::env::var("PSSST_USERNAME").ok())
        .or_else(|| config.profile.username.clone())
        .filter(|s| !s.trim().is_empty())
        .ok_or(ConfigError::ProfileRequired)?;

    // Token: env → config (optional).
    let token = std::env::var("PSSST_TOKEN")
        .ok()
        .or_else(|| config.profile.token.clone());

    // Server address: env → config → default.
    let server = std::env::var("PSSST_SERVER")
        .ok()
        .or_else(|| config.server.address.clone())
        .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string());

    Ok(Profile {
        username,
        token,
        server,
    })
}
