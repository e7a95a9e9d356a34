//! Sunrise/sunset times for a location, with full timezone context.
//!
//! Solar positions are computed locally with the `sunrise` crate and carried
//! as `DateTime<Tz>` in the coordinate's own timezone, resolved from the
//! coordinates with `tzf-rs`. Keeping the timezone attached means callers can
//! normalize "now" into the same zone before comparing instants, which is the
//! invariant the decision engine relies on.
//!
//! Every failure path (invalid coordinates, polar day/night degeneracy,
//! unparseable timezone) substitutes a static 07:00/19:00 fallback window so
//! the provider never fails.

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use sunrise::{Coordinates, SolarDay, SolarEvent};
use tzf_rs::DefaultFinder;

use super::Location;
use crate::constants::{FALLBACK_SUNRISE_HOUR, FALLBACK_SUNSET_HOUR};

/// Timezone lookup table; expensive to build, so construct it once.
static TZ_FINDER: Lazy<DefaultFinder> = Lazy::new(DefaultFinder::new);

/// Today's sunrise and sunset at a location, in the coordinate timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct SunTimes {
    pub sunrise: DateTime<Tz>,
    pub sunset: DateTime<Tz>,
    /// The coordinate timezone both instants are expressed in.
    pub timezone: Tz,
}

/// Resolve the IANA timezone for a coordinate pair, defaulting to UTC when
/// the name cannot be parsed (ocean coordinates and the like).
pub fn timezone_for(latitude: f64, longitude: f64) -> Tz {
    let name = TZ_FINDER.get_tz_name(longitude, latitude);
    name.parse().unwrap_or(Tz::UTC)
}

/// The current instant expressed in `tz`.
pub fn now_in(tz: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&tz)
}

/// Sunrise and sunset for today at `location`.
///
/// Infallible by policy: when the solar calculation cannot produce a usable
/// window, the static fallback is substituted and a warning logged.
pub fn sun_times(location: &Location) -> SunTimes {
    let tz = timezone_for(location.latitude, location.longitude);
    match compute(location.latitude, location.longitude, tz) {
        Some(times) => times,
        None => {
            log_warning!(
                "Solar calculation unavailable for ({:.2}, {:.2}), using {:02}:00/{:02}:00 fallback",
                location.latitude,
                location.longitude,
                FALLBACK_SUNRISE_HOUR,
                FALLBACK_SUNSET_HOUR
            );
            fallback_sun_times(tz)
        }
    }
}

fn compute(latitude: f64, longitude: f64, tz: Tz) -> Option<SunTimes> {
    let coordinates = Coordinates::new(latitude, longitude)?;
    let today = now_in(tz).date_naive();
    let solar_day = SolarDay::new(coordinates, today);
    let sunrise = solar_day
        .event_time(SolarEvent::Sunrise)
        .with_timezone(&tz);
    let sunset = solar_day.event_time(SolarEvent::Sunset).with_timezone(&tz);

    // Polar day/night collapses the events together; treat as unavailable.
    if sunrise == sunset {
        return None;
    }

    Some(SunTimes {
        sunrise,
        sunset,
        timezone: tz,
    })
}

/// Static fallback window: local 07:00 to 19:00 in `tz`, with sunset pushed
/// back a day if it would otherwise precede sunrise.
pub fn fallback_sun_times(tz: Tz) -> SunTimes {
    let today = now_in(tz).date_naive();
    let sunrise = local_instant(tz, today, FALLBACK_SUNRISE_HOUR);
    let mut sunset = local_instant(tz, today, FALLBACK_SUNSET_HOUR);
    if sunset < sunrise {
        sunset = sunset + Duration::days(1);
    }
    SunTimes {
        sunrise,
        sunset,
        timezone: tz,
    }
}

/// Interpret `hour:00` on `date` as an instant in `tz`, resolving DST gaps
/// and folds to the earliest valid interpretation.
fn local_instant(tz: Tz, date: chrono::NaiveDate, hour: u32) -> DateTime<Tz> {
    let naive = date
        .and_hms_opt(hour, 0, 0)
        .unwrap_or_else(|| date.and_hms_opt(12, 0, 0).expect("noon is always valid"));
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timezone_for_known_cities() {
        assert_eq!(timezone_for(40.7128, -74.0060), Tz::America__New_York);
        assert_eq!(timezone_for(51.5074, -0.1278), Tz::Europe__London);
        assert_eq!(timezone_for(35.6762, 139.6503), Tz::Asia__Tokyo);
    }

    #[test]
    fn mid_latitude_sun_times_are_ordered() {
        let location = Location {
            latitude: 40.7128,
            longitude: -74.0060,
            label: None,
        };
        let times = sun_times(&location);
        assert_eq!(times.timezone, Tz::America__New_York);
        assert!(times.sunrise < times.sunset);
        // Same calendar day in the coordinate timezone.
        assert_eq!(times.sunrise.date_naive(), times.sunset.date_naive());
    }

    #[test]
    fn fallback_window_is_seven_to_nineteen() {
        let times = fallback_sun_times(Tz::UTC);
        assert_eq!(times.sunrise.format("%H:%M").to_string(), "07:00");
        assert_eq!(times.sunset.format("%H:%M").to_string(), "19:00");
        assert!(times.sunrise < times.sunset);
    }

    #[test]
    fn now_in_matches_timezone() {
        let now = now_in(Tz::Asia__Tokyo);
        assert_eq!(now.timezone(), Tz::Asia__Tokyo);
    }
}
