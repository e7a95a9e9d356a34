//! Status command - print the current schedule decision without actuating.
//!
//! Evaluates location, sun times, and the decision engine exactly like a
//! tick, but neither consumes the pending override nor touches the actuator.
//! Supports human-readable and JSON output.

use anyhow::Result;
use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use crate::config;
use crate::engine::{self, ScheduleDecision};
use crate::geo::{self, sun};
use crate::logger::Log;

/// Snapshot of the current evaluation, serializable for `--json`.
#[derive(Debug, Serialize)]
struct StatusReport {
    decision: ScheduleDecision,
    override_pending: String,
    location: String,
    latitude: f64,
    longitude: f64,
    timezone: String,
    sunrise: DateTime<Tz>,
    sunset: DateTime<Tz>,
    now: DateTime<Tz>,
    dry_run: bool,
}

/// Handle the status command.
pub fn handle_status_command(json: bool) -> Result<()> {
    if json {
        // Resolver fallbacks log as they go; keep JSON output clean.
        Log::set_enabled(false);
    } else {
        log_version!();
    }

    let config = config::load()?;
    let location = geo::resolve_location(&config);
    let sun_times = sun::sun_times(&location);
    let now = sun::now_in(sun_times.timezone);
    let decision = engine::decide(
        now,
        sun_times.sunrise,
        sun_times.sunset,
        config.strength(),
        config.manual_override(),
    );

    let report = StatusReport {
        override_pending: config.manual_override().to_string(),
        location: location.to_string(),
        latitude: location.latitude,
        longitude: location.longitude,
        timezone: sun_times.timezone.to_string(),
        sunrise: sun_times.sunrise,
        sunset: sun_times.sunset,
        now,
        dry_run: config.dry_run(),
        decision,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    log_block_start!(
        "Night Light should be {} at {}%",
        if report.decision.should_enable { "ON" } else { "OFF" },
        report.decision.target_strength
    );
    log_indented!("Reason: {}", report.decision.reason);
    log_indented!(
        "Next change: {}",
        report.decision.next_change.format("%Y-%m-%d %H:%M %Z")
    );
    log_block_start!("Location: {}", report.location);
    log_indented!("Timezone: {}", report.timezone);
    log_indented!("Sunrise: {}", report.sunrise.format("%H:%M"));
    log_indented!("Sunset: {}", report.sunset.format("%H:%M"));
    if report.override_pending != "auto" {
        log_indented!("Pending override: {}", report.override_pending);
    }
    if report.dry_run {
        log_indented!("Dry run is active; apply will only log");
    }
    log_end!();
    Ok(())
}
