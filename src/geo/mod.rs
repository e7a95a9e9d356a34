//! Location resolution for sunrise/sunset scheduling.
//!
//! The scheduler needs coordinates to compute sun times. Resolution never
//! fails: each strategy falls through to the next and the final fallback is
//! the null island default, so the tick function's "always returns a result"
//! contract holds.
//!
//! Resolution order:
//!
//! 1. Manual mode: coordinate text (`"lat,lon"`) from the config.
//! 2. Explicit `latitude`/`longitude` config fields.
//! 3. Approximation from the system timezone's UTC offset.
//! 4. Default `(0, 0)`, labelled unknown.

pub mod sun;

use chrono::Offset;
use chrono_tz::Tz;

use crate::config::Config;

/// A resolved geographic position.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Where the coordinates came from, for status display.
    pub label: Option<String>,
}

impl Location {
    fn unknown() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            label: Some("unknown (default)".into()),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} ({:.2}, {:.2})", label, self.latitude, self.longitude),
            None => write!(f, "{:.2}, {:.2}", self.latitude, self.longitude),
        }
    }
}

/// Resolve the location to schedule for. Infallible by policy: failures fall
/// back rather than propagate.
pub fn resolve_location(config: &Config) -> Location {
    if config.location_mode() == "manual" {
        if let Some(text) = config.manual_location.as_deref() {
            if let Some(location) = parse_coordinate_text(text) {
                return location;
            }
            log_warning!("Could not parse manual_location '{text}', falling back");
        }
    }

    if let (Some(latitude), Some(longitude)) = (config.latitude, config.longitude) {
        return Location {
            latitude,
            longitude,
            label: Some("configured".into()),
        };
    }

    if let Some(location) = detect_from_timezone() {
        return location;
    }

    log_decorated!("No location available, using default (0, 0)");
    Location::unknown()
}

/// Parse `"lat,lon"` coordinate text. Returns None for anything malformed or
/// out of range.
fn parse_coordinate_text(text: &str) -> Option<Location> {
    let (lat_str, lon_str) = text.split_once(',')?;
    let latitude: f64 = lat_str.trim().parse().ok()?;
    let longitude: f64 = lon_str.trim().parse().ok()?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }
    Some(Location {
        latitude,
        longitude,
        label: None,
    })
}

/// Approximate a location from the system timezone.
///
/// The UTC offset gives a rough longitude (15 degrees per hour); latitude is
/// unknowable from an offset alone, so the equator is assumed. Coarse, but it
/// produces a plausible day/night window without any network access.
fn detect_from_timezone() -> Option<Location> {
    let name = system_timezone_name()?;
    let tz: Tz = name.parse().ok()?;
    let now = chrono::Utc::now().with_timezone(&tz);
    let offset_secs = now.offset().fix().local_minus_utc();
    let longitude = (f64::from(offset_secs) / 3600.0 * 15.0).clamp(-180.0, 180.0);

    log_decorated!("Approximated location from timezone {name}");
    Some(Location {
        latitude: 0.0,
        longitude,
        label: Some(format!("timezone {name}")),
    })
}

/// The IANA name of the system timezone, from `TZ` or `/etc/localtime`.
fn system_timezone_name() -> Option<String> {
    if let Ok(tz) = std::env::var("TZ")
        && !tz.is_empty()
    {
        return Some(tz);
    }

    let link = std::fs::read_link("/etc/localtime").ok()?;
    let path = link.to_str()?;
    // Symlink target looks like ../usr/share/zoneinfo/Europe/Berlin
    let name = path.split("zoneinfo/").nth(1)?;
    Some(name.to_string())
}
