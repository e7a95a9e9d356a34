//! Set command - update configuration fields from the command line.
//!
//! Validates every field before writing anything, then saves the updated
//! record. This is also how a pending override reaches a running daemon:
//! `duskr set override on` persists the override, and the daemon's next tick
//! picks it up from disk and consumes it.

use anyhow::{Context, Result};

use crate::config::{self, Backend, Config};
use crate::config::validation::validate_config;
use crate::engine::Override;

/// Handle the set command - update configuration fields.
pub fn handle_set_command(fields: &[(String, String)]) -> Result<()> {
    log_version!();

    let config_path = config::get_config_path()?;
    // The whole read-modify-write runs under the file lock so a concurrent
    // daemon tick cannot interleave its own rewrite.
    config::with_config_lock(&config_path, || {
        let mut config = config::load().context("Failed to load current configuration")?;

        for (field, value) in fields {
            apply_field(&mut config, field, value).with_context(|| {
                format!("Invalid value '{value}' for field '{field}'")
            })?;
        }
        validate_config(&config)?;

        config::save(&config, &config_path)
    })?;
    log_block_start!("Updated configuration");
    for (field, value) in fields {
        log_indented!("{field} = {value}");
    }
    log_indented!("in {}", config_path.display());
    log_end!();
    Ok(())
}

fn apply_field(config: &mut Config, field: &str, value: &str) -> Result<()> {
    match field {
        "backend" => {
            config.backend = Some(match value {
                "auto" => Backend::Auto,
                "gnome" => Backend::Gnome,
                "log" => Backend::Log,
                other => anyhow::bail!("unknown backend '{other}'"),
            });
        }
        "location_mode" => config.location_mode = Some(value.to_string()),
        "manual_location" => config.manual_location = Some(value.to_string()),
        "latitude" => config.latitude = Some(value.parse()?),
        "longitude" => config.longitude = Some(value.parse()?),
        "strength" => config.strength = Some(value.parse()?),
        "transition_minutes" => config.transition_minutes = Some(value.parse()?),
        "interval_minutes" => config.interval_minutes = Some(value.parse()?),
        "override" | "manual_override" => {
            config.manual_override = Some(value.parse::<Override>()?);
        }
        "dry_run" => config.dry_run = Some(value.parse()?),
        "start_at_login" => config.start_at_login = Some(value.parse()?),
        other => anyhow::bail!("unknown field '{other}'"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_known_fields() {
        let mut config = Config::default();
        apply_field(&mut config, "strength", "80").unwrap();
        apply_field(&mut config, "override", "on").unwrap();
        apply_field(&mut config, "dry_run", "false").unwrap();
        assert_eq!(config.strength(), 80);
        assert_eq!(config.manual_override(), Override::ForceOn);
        assert!(!config.dry_run());
    }

    #[test]
    fn rejects_unknown_field() {
        let mut config = Config::default();
        assert!(apply_field(&mut config, "brightness", "80").is_err());
    }

    #[test]
    fn rejects_unparseable_value() {
        let mut config = Config::default();
        assert!(apply_field(&mut config, "strength", "lots").is_err());
        assert!(apply_field(&mut config, "override", "maybe").is_err());
    }
}
