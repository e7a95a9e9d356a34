//! Actuator abstraction for applying Night Light state.
//!
//! The [`NightLightBackend`] trait is the seam between the scheduler's
//! decisions and whatever actually changes the display. Implementations clamp
//! strength to 0..=100 and report success as a plain boolean outcome flag;
//! callers never retry on `false`.
//!
//! ## Backends
//!
//! - **Gnome**: real mutations through `gsettings` against GNOME's built-in
//!   Night Light.
//! - **Log**: records intended actions only and always succeeds; used for
//!   dry-run operation and platforms without an integration.
//!
//! Selection is automatic from the environment, or explicit via
//! `backend = "gnome"` / `backend = "log"` in the config.

pub mod gnome;
pub mod log;

use crate::config::{Backend, Config};
use crate::constants::MAXIMUM_STRENGTH;

/// The actuator contract.
///
/// `apply_state` performs (or simulates) the platform change and reports the
/// outcome. In dry-run mode the intended action is logged and success
/// reported without touching the system.
pub trait NightLightBackend: Send + Sync {
    /// Apply the desired state. Returns true if the operation was executed
    /// or safely simulated.
    fn apply_state(
        &self,
        enabled: bool,
        strength: u8,
        transition_minutes: u32,
        dry_run: bool,
    ) -> bool;

    /// Short identifier for logging.
    fn name(&self) -> &'static str;
}

/// Clamp a requested strength into the valid percentage range.
pub(crate) fn clamp_strength(strength: u8) -> u8 {
    strength.min(MAXIMUM_STRENGTH)
}

/// Backend implementations duskr can instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Gnome,
    Log,
}

impl BackendType {
    pub fn name(&self) -> &'static str {
        match self {
            BackendType::Gnome => "GNOME",
            BackendType::Log => "log",
        }
    }
}

/// Determine which backend to use based on configuration and environment.
pub fn detect_backend(config: &Config) -> BackendType {
    match config.backend() {
        Backend::Gnome => BackendType::Gnome,
        Backend::Log => BackendType::Log,
        Backend::Auto => {
            if gnome::is_gnome_session() {
                log_decorated!("Auto-detected GNOME session");
                BackendType::Gnome
            } else {
                log_decorated!("No supported desktop detected, using log backend");
                BackendType::Log
            }
        }
    }
}

/// Instantiate the selected backend.
pub fn create_backend(backend_type: BackendType) -> Box<dyn NightLightBackend> {
    match backend_type {
        BackendType::Gnome => Box::new(gnome::GnomeBackend::new()),
        BackendType::Log => Box::new(log::LogBackend::new()),
    }
}
