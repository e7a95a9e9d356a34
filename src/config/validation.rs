//! Configuration validation.
//!
//! Range and mode checks applied at the load boundary so the rest of the
//! application can trust any `Config` it is handed.

use anyhow::Result;

use super::Config;
use crate::constants::*;

/// Validate a configuration record, rejecting out-of-range values.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(mode) = config.location_mode.as_deref()
        && mode != "auto"
        && mode != "manual"
    {
        anyhow::bail!("location_mode must be \"auto\" or \"manual\" (got \"{mode}\")");
    }

    if let Some(strength) = config.strength
        && strength > MAXIMUM_STRENGTH
    {
        anyhow::bail!(
            "strength ({strength}) must be between 0 and {MAXIMUM_STRENGTH} percent"
        );
    }

    if let Some(transition) = config.transition_minutes
        && transition > MAXIMUM_TRANSITION_MINUTES
    {
        anyhow::bail!(
            "transition_minutes ({transition}) must be between 0 and {MAXIMUM_TRANSITION_MINUTES}"
        );
    }

    if let Some(interval) = config.interval_minutes
        && !(MINIMUM_INTERVAL_MINUTES..=MAXIMUM_INTERVAL_MINUTES).contains(&interval)
    {
        anyhow::bail!(
            "interval_minutes ({interval}) must be between {MINIMUM_INTERVAL_MINUTES} and {MAXIMUM_INTERVAL_MINUTES}"
        );
    }

    if let Some(lat) = config.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {lat})");
    }

    if let Some(lon) = config.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        anyhow::bail!("longitude must be between -180 and 180 degrees (got {lon})");
    }

    Ok(())
}
