//! Configuration loading and persistence.
//!
//! Handles path resolution (default XDG location or a process-wide custom
//! directory), default file creation, parsing, validation, and saving.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::Config;
use super::validation::validate_config;

/// Global configuration directory, set once at startup.
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Template written when no configuration file exists yet.
const DEFAULT_CONFIG_TEMPLATE: &str = r#"#[Backend]
backend = "auto"          # Actuator: "auto", "gnome", "log"

#[Location]
location_mode = "auto"    # "auto" (timezone-based) or "manual"
manual_location = ""      # Coordinates as "lat,lon" for manual mode

#[Schedule]
strength = 50             # Night Light strength percentage (0-100)
transition_minutes = 10   # Fade duration handed to the actuator (0-60)
interval_minutes = 5      # Scheduler evaluation cadence (1-240)
override = "auto"         # "auto", "on", "off"; consumed after one tick

#[Behavior]
dry_run = true            # Log intended actions without applying them
start_at_login = false    # Reserved for session integration
"#;

/// Set the configuration directory for the current process.
/// Can only be called once, typically at startup.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

/// Get the custom configuration directory if one was set.
pub fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|d| d.clone())
}

/// Resolve the path of `duskr.toml`.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom) = get_custom_config_dir() {
        return Ok(custom.join("duskr.toml"));
    }
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join("duskr").join("duskr.toml"))
}

/// Load configuration using automatic path detection.
///
/// Creates a default configuration file if none exists.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;
    if !config_path.exists() {
        create_default_config(&config_path)?;
        log_block_start!("Created default configuration");
        log_indented!("{}", config_path.display());
    }
    load_from_path(&config_path)
}

/// Load and validate configuration from an explicit path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config at {}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Persist a configuration record back to `path`.
///
/// Writes plain TOML; comments from the template are not preserved.
pub fn save(config: &Config, path: &Path) -> Result<()> {
    let content =
        toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, content)
        .with_context(|| format!("Failed to write config to {}", path.display()))
}

/// Run a read-modify-write cycle on the config file under an exclusive
/// file lock, serializing it against other duskr processes.
///
/// The lock lives in a sibling `.lock` file so the config file itself can be
/// replaced atomically while the lock is held.
pub fn with_config_lock<T>(path: &Path, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let lock_path = path.with_extension("toml.lock");
    if let Some(parent) = lock_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    let lock_file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .open(&lock_path)
        .with_context(|| format!("Failed to open lock file {}", lock_path.display()))?;
    lock_file
        .lock_exclusive()
        .with_context(|| format!("Failed to lock {}", lock_path.display()))?;

    let result = f();

    let _ = FileExt::unlock(&lock_file);
    result
}

fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write default config to {}", path.display()))
}

#[cfg(test)]
pub(super) fn default_template() -> &'static str {
    DEFAULT_CONFIG_TEMPLATE
}
