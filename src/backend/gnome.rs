//! GNOME Night Light actuator via gsettings.
//!
//! GNOME ships a built-in Night Light controlled by the
//! `org.gnome.settings-daemon.plugins.color` schema. Strength maps linearly
//! onto the color temperature range: 0% stays at the day temperature, 100%
//! reaches the warmest night temperature. GNOME performs its own fading, so
//! the requested transition duration is informational here.

use std::process::Command;

use super::{NightLightBackend, clamp_strength};
use crate::constants::{DAY_COLOR_TEMP, NIGHT_COLOR_TEMP};

const COLOR_SCHEMA: &str = "org.gnome.settings-daemon.plugins.color";

pub struct GnomeBackend;

impl GnomeBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GnomeBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the current session looks like GNOME with gsettings available.
pub fn is_gnome_session() -> bool {
    let desktop = std::env::var("XDG_CURRENT_DESKTOP").unwrap_or_default();
    if !desktop.to_lowercase().contains("gnome") {
        return false;
    }
    Command::new("gsettings")
        .arg("--version")
        .output()
        .is_ok()
}

/// Map a strength percentage onto GNOME's night-light-temperature scale.
fn strength_to_temperature(strength: u8) -> u32 {
    let span = DAY_COLOR_TEMP - NIGHT_COLOR_TEMP;
    DAY_COLOR_TEMP - span * u32::from(clamp_strength(strength)) / 100
}

fn gsettings_set(key: &str, value: &str) -> bool {
    match Command::new("gsettings")
        .args(["set", COLOR_SCHEMA, key, value])
        .status()
    {
        Ok(status) => status.success(),
        Err(err) => {
            log_warning!("gsettings invocation failed: {err}");
            false
        }
    }
}

impl NightLightBackend for GnomeBackend {
    fn apply_state(
        &self,
        enabled: bool,
        strength: u8,
        transition_minutes: u32,
        dry_run: bool,
    ) -> bool {
        let strength = clamp_strength(strength);
        let temperature = strength_to_temperature(strength);

        if dry_run {
            log_decorated!(
                "[Dry run] Would set GNOME Night Light {} at {strength}% ({temperature}K, transition {transition_minutes} min)",
                if enabled { "ON" } else { "OFF" }
            );
            return true;
        }

        let enabled_ok = gsettings_set(
            "night-light-enabled",
            if enabled { "true" } else { "false" },
        );
        // GNOME keeps the temperature setting across enable/disable.
        let temp_ok = gsettings_set("night-light-temperature", &temperature.to_string());

        let ok = enabled_ok && temp_ok;
        if ok {
            log_decorated!(
                "Set GNOME Night Light {} at {strength}% ({temperature}K)",
                if enabled { "ON" } else { "OFF" }
            );
        } else {
            log_warning!("Failed to apply GNOME Night Light state");
        }
        ok
    }

    fn name(&self) -> &'static str {
        "GNOME"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_strength_is_day_temperature() {
        assert_eq!(strength_to_temperature(0), DAY_COLOR_TEMP);
    }

    #[test]
    fn full_strength_is_night_temperature() {
        assert_eq!(strength_to_temperature(100), NIGHT_COLOR_TEMP);
    }

    #[test]
    fn oversized_strength_clamps() {
        assert_eq!(strength_to_temperature(255), NIGHT_COLOR_TEMP);
    }

    #[test]
    fn midpoint_is_between() {
        let mid = strength_to_temperature(50);
        assert!(mid > NIGHT_COLOR_TEMP && mid < DAY_COLOR_TEMP);
    }

    #[test]
    fn dry_run_always_succeeds() {
        let backend = GnomeBackend::new();
        assert!(backend.apply_state(true, 60, 10, true));
    }
}
