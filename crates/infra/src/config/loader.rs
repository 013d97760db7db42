//! Configuration loader
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `CONTACTSYNC_DB_PATH` is missing or a value is invalid, falls back
//!    to a config file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `CONTACTSYNC_DB_PATH`: External reference database path (required)
//! - `CONTACTSYNC_DB_POOL_SIZE`: Connection pool size (default 4)
//! - `CONTACTSYNC_SYNC_ENABLED`: Master switch for contact sync (default true)
//! - `CONTACTSYNC_DUPLICATE_INTO_CONTACTS`: Duplicate companies and contacts
//!   into the directory (default false)
//! - `CONTACTSYNC_GOOGLE_ACCOUNT`: Account name used in log messages
//! - `CONTACTSYNC_GOOGLE_ACCESS_TOKEN`: Static access token
//! - `CONTACTSYNC_GOOGLE_CLIENT_ID`, `CONTACTSYNC_GOOGLE_CLIENT_SECRET`,
//!   `CONTACTSYNC_GOOGLE_REFRESH_TOKEN`: Refresh-token credentials
//! - `CONTACTSYNC_GOOGLE_API_BASE`, `CONTACTSYNC_GOOGLE_TOKEN_URL`: Endpoint
//!   overrides
//! - `CONTACTSYNC_GOOGLE_TIMEOUT`: Request timeout in seconds (default 30)
//!
//! ## File Locations
//! The loader probes `config.{json,toml}` and `contactsync.{json,toml}` in the
//! current working directory, its two parents, and the same set relative to
//! the executable.

use std::path::{Path, PathBuf};

use contactsync_domain::{
    Config, ContactSyncError, DatabaseConfig, GoogleConfig, Result, SyncSettings,
};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["config.json", "config.toml", "contactsync.json", "contactsync.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `ContactSyncError::Config` if configuration cannot be loaded from
/// either source.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `CONTACTSYNC_DB_PATH` is required; everything else has a default.
///
/// # Errors
/// Returns `ContactSyncError::Config` if the database path is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("CONTACTSYNC_DB_PATH")?;
    let pool_size = env_parse::<u32>("CONTACTSYNC_DB_POOL_SIZE", "pool size")?;

    let defaults = SyncSettings::default();
    let sync = SyncSettings {
        enabled: env_bool("CONTACTSYNC_SYNC_ENABLED", defaults.enabled),
        duplicate_into_contacts: env_bool(
            "CONTACTSYNC_DUPLICATE_INTO_CONTACTS",
            defaults.duplicate_into_contacts,
        ),
    };

    let mut google = GoogleConfig {
        account: env_opt("CONTACTSYNC_GOOGLE_ACCOUNT"),
        access_token: env_opt("CONTACTSYNC_GOOGLE_ACCESS_TOKEN"),
        client_id: env_opt("CONTACTSYNC_GOOGLE_CLIENT_ID"),
        client_secret: env_opt("CONTACTSYNC_GOOGLE_CLIENT_SECRET"),
        refresh_token: env_opt("CONTACTSYNC_GOOGLE_REFRESH_TOKEN"),
        ..GoogleConfig::default()
    };
    if let Some(api_base) = env_opt("CONTACTSYNC_GOOGLE_API_BASE") {
        google.api_base = api_base;
    }
    if let Some(token_url) = env_opt("CONTACTSYNC_GOOGLE_TOKEN_URL") {
        google.token_url = token_url;
    }
    if let Some(timeout) = env_parse::<u64>("CONTACTSYNC_GOOGLE_TIMEOUT", "google timeout")? {
        google.timeout_seconds = timeout;
    }

    let mut database = DatabaseConfig { path: db_path, ..DatabaseConfig::default() };
    if let Some(pool_size) = pool_size {
        database.pool_size = pool_size;
    }

    Ok(Config { database, sync, google })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations via
/// [`probe_config_paths`]. Format is detected by file extension.
///
/// # Errors
/// Returns `ContactSyncError::Config` if the file is missing, unreadable or
/// invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ContactSyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ContactSyncError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ContactSyncError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ContactSyncError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ContactSyncError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(ContactSyncError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    candidate_paths(&roots).into_iter().find(|path| path.exists())
}

fn candidate_paths(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    for root in roots {
        for dir in [root.clone(), root.join(".."), root.join("../..")] {
            candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| dir.join(name)));
        }
    }
    candidates
}

fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        ContactSyncError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Non-empty environment variable
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|s| {
            s.parse::<T>().map_err(|e| ContactSyncError::Config(format!("Invalid {what}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
