//! Configuration system for duskr with validation and defaults.
//!
//! Settings live in a TOML file, `duskr.toml`, under the XDG config
//! directory (`$XDG_CONFIG_HOME/duskr/duskr.toml`) or a directory supplied
//! with `--config-dir`. Every field is optional in the file; accessor methods
//! apply the documented defaults so a missing or partial file always yields a
//! usable configuration.
//!
//! ```toml
//! #[Backend]
//! backend = "auto"          # Actuator: "auto", "gnome", "log"
//!
//! #[Location]
//! location_mode = "auto"    # "auto" (timezone-based) or "manual"
//! manual_location = ""      # Coordinates as "lat,lon" for manual mode
//! latitude = 40.7128        # Optional explicit coordinates for auto mode
//! longitude = -74.0060
//!
//! #[Schedule]
//! strength = 50             # Night Light strength percentage (0-100)
//! transition_minutes = 10   # Fade duration handed to the actuator (0-60)
//! interval_minutes = 5      # Scheduler evaluation cadence (1-240)
//! override = "auto"         # "auto", "on", "off"; consumed after one tick
//!
//! #[Behavior]
//! dry_run = true            # Log intended actions without applying them
//! start_at_login = false    # Reserved for session integration
//! ```

pub mod loading;
pub mod validation;


use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::engine::Override;

// Re-export public API
pub use loading::{
    get_config_path, get_custom_config_dir, load, load_from_path, save, set_config_dir,
    with_config_lock,
};

/// Actuator backend selection.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Detect the appropriate actuator from the environment.
    Auto,
    /// GNOME Night Light via gsettings.
    Gnome,
    /// Log intended actions only; always reports success.
    Log,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Auto => "auto",
            Backend::Gnome => "gnome",
            Backend::Log => "log",
        }
    }
}

/// Configuration record loaded from `duskr.toml`.
///
/// All fields optional; use the accessor methods to read values with their
/// defaults applied. Validated on load by
/// [`validation::validate_config`].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Actuator backend to use. Defaults to auto-detection.
    pub backend: Option<Backend>,
    /// "auto" (timezone-based detection) or "manual" (coordinate text).
    pub location_mode: Option<String>,
    /// Coordinate text for manual mode, e.g. "40.7128,-74.0060".
    pub manual_location: Option<String>,
    /// Explicit latitude for auto mode, wins over timezone detection.
    pub latitude: Option<f64>,
    /// Explicit longitude for auto mode, wins over timezone detection.
    pub longitude: Option<f64>,
    /// Night Light strength percentage (0-100).
    pub strength: Option<u8>,
    /// Transition duration in minutes handed to the actuator (0-60).
    pub transition_minutes: Option<u32>,
    /// Scheduler evaluation interval in minutes (1-240).
    pub interval_minutes: Option<u64>,
    /// Pending single-use override; reset to "auto" once consumed.
    #[serde(rename = "override")]
    pub manual_override: Option<Override>,
    /// When true, the actuator logs intended actions without applying them.
    pub dry_run: Option<bool>,
    /// Reserved for session autostart integration.
    pub start_at_login: Option<bool>,
}

impl Config {
    pub fn strength(&self) -> u8 {
        self.strength.unwrap_or(DEFAULT_STRENGTH)
    }

    pub fn transition_minutes(&self) -> u32 {
        self.transition_minutes.unwrap_or(DEFAULT_TRANSITION_MINUTES)
    }

    pub fn interval_minutes(&self) -> u64 {
        self.interval_minutes.unwrap_or(DEFAULT_INTERVAL_MINUTES)
    }

    pub fn location_mode(&self) -> &str {
        self.location_mode.as_deref().unwrap_or(DEFAULT_LOCATION_MODE)
    }

    pub fn backend(&self) -> Backend {
        self.backend.unwrap_or(Backend::Auto)
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run.unwrap_or(DEFAULT_DRY_RUN)
    }

    pub fn manual_override(&self) -> Override {
        self.manual_override.unwrap_or_default()
    }

    /// Log the effective configuration as an indented block.
    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");
        log_indented!("Backend: {}", self.backend().as_str());
        log_indented!("Location mode: {}", self.location_mode());
        if let Some(text) = self.manual_location.as_deref()
            && !text.is_empty()
        {
            log_indented!("Manual location: {text}");
        }
        if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
            log_indented!("Coordinates: {lat:.4}, {lon:.4}");
        }
        log_indented!("Strength: {}%", self.strength());
        log_indented!("Transition: {} min", self.transition_minutes());
        log_indented!("Interval: {} min", self.interval_minutes());
        log_indented!("Override: {}", self.manual_override());
        log_indented!("Dry run: {}", self.dry_run());
    }
}
