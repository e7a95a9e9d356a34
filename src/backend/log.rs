//! Logging-only actuator.
//!
//! Records the intended Night Light action without touching the system.
//! Serves dry-run operation and platforms duskr has no integration for, and
//! always reports success.

use super::{NightLightBackend, clamp_strength};

pub struct LogBackend;

impl LogBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl NightLightBackend for LogBackend {
    fn apply_state(
        &self,
        enabled: bool,
        strength: u8,
        transition_minutes: u32,
        dry_run: bool,
    ) -> bool {
        let strength = clamp_strength(strength);
        let prefix = if dry_run { "[Dry run] " } else { "" };
        log_decorated!(
            "{prefix}Would set Night Light {} at {strength}% (transition {transition_minutes} min)",
            if enabled { "ON" } else { "OFF" }
        );
        true
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
