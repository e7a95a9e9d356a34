//! Pure scheduling decisions from sunrise/sunset windows.
//!
//! This module is the decision core of duskr: given the current instant,
//! today's sunrise and sunset, a target strength, and an optional manual
//! override, it determines whether Night Light should be enabled and when the
//! next natural transition will occur. Everything here is a pure function of
//! its inputs; no state is held between evaluations and nothing can fail.
//!
//! ## Timezone invariant
//!
//! All three instants handed to these functions must be resolved to the same
//! timezone before comparison. The sun-time provider resolves the coordinate
//! timezone and the caller converts `now` into it (see [`crate::geo::sun`]).
//!
//! ## Midnight crossings
//!
//! Sun-time sources near a date boundary can legitimately hand us a sunset
//! instant that precedes the sunrise instant (the sunlit window wraps past
//! midnight). [`is_night`] handles both orderings with an asymmetric rule,
//! and its edge values are deliberate: at the sunrise instant it is already
//! day, at the sunset instant it is already night.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Why a decision chose its enabled state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DecisionReason {
    /// A user-forced state took precedence over the schedule.
    ManualOverride,
    /// The state follows the computed night window.
    SunSchedule,
}

impl std::fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionReason::ManualOverride => write!(f, "manual override"),
            DecisionReason::SunSchedule => write!(f, "sun schedule"),
        }
    }
}

/// User-specified forced state that takes precedence over the night window
/// for exactly one evaluation.
///
/// The engine has no memory of this value; whichever component tracks pending
/// user intent owns it, passes it in per call, and resets it to `Auto` once
/// consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Override {
    /// Follow the sun schedule.
    #[default]
    #[serde(rename = "auto")]
    Auto,
    /// Force Night Light on for the next evaluation.
    #[serde(rename = "on")]
    ForceOn,
    /// Force Night Light off for the next evaluation.
    #[serde(rename = "off")]
    ForceOff,
}

impl Override {
    /// The forced enabled state, or `None` when following the schedule.
    pub fn as_flag(self) -> Option<bool> {
        match self {
            Override::Auto => None,
            Override::ForceOn => Some(true),
            Override::ForceOff => Some(false),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Override::Auto => "auto",
            Override::ForceOn => "on",
            Override::ForceOff => "off",
        }
    }
}

impl std::str::FromStr for Override {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Override::Auto),
            "on" => Ok(Override::ForceOn),
            "off" => Ok(Override::ForceOff),
            other => Err(anyhow::anyhow!(
                "invalid override '{other}' (expected auto, on, or off)"
            )),
        }
    }
}

impl std::fmt::Display for Override {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one schedule evaluation.
///
/// Produced fresh on every call to [`decide`]; never stored or mutated by the
/// engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleDecision {
    /// Whether Night Light should be enabled right now.
    pub should_enable: bool,
    /// Requested strength, passed through unclamped (the actuator clamps).
    pub target_strength: u8,
    /// The next instant at which the natural schedule changes state.
    pub next_change: DateTime<Tz>,
    /// What drove the enabled state.
    pub reason: DecisionReason,
}

/// Determine whether `now` falls inside the night window.
///
/// When `sunrise <= sunset` the sunlit window sits inside a single calendar
/// day and night is everything outside it. When `sunrise > sunset` the
/// sunlit window wraps past midnight, so night is the stretch between the
/// (earlier) sunset and the (later) sunrise.
///
/// Edge values: `now == sunrise` is day, `now == sunset` is night.
pub fn is_night(now: DateTime<Tz>, sunrise: DateTime<Tz>, sunset: DateTime<Tz>) -> bool {
    if sunrise <= sunset {
        now < sunrise || now >= sunset
    } else {
        sunset <= now && now < sunrise
    }
}

/// The next instant at which the schedule naturally changes state.
///
/// During night the next change is the upcoming sunrise, during day the
/// upcoming sunset. If that event already passed today it is projected one
/// calendar day forward, which keeps the result strictly in the future even
/// when a caller feeds slightly stale "today" values.
pub fn next_transition(
    now: DateTime<Tz>,
    sunrise: DateTime<Tz>,
    sunset: DateTime<Tz>,
) -> DateTime<Tz> {
    if is_night(now, sunrise, sunset) {
        if sunrise <= now {
            sunrise + Duration::days(1)
        } else {
            sunrise
        }
    } else if sunset <= now {
        sunset + Duration::days(1)
    } else {
        sunset
    }
}

/// Produce a [`ScheduleDecision`] for the given inputs.
///
/// A non-`Auto` override wins over the computed night window, but does not
/// affect the projected next natural transition. `target_strength` flows
/// through untouched; clamping to 0..=100 belongs to the actuator.
pub fn decide(
    now: DateTime<Tz>,
    sunrise: DateTime<Tz>,
    sunset: DateTime<Tz>,
    target_strength: u8,
    override_state: Override,
) -> ScheduleDecision {
    let (should_enable, reason) = match override_state.as_flag() {
        Some(forced) => (forced, DecisionReason::ManualOverride),
        None => (is_night(now, sunrise, sunset), DecisionReason::SunSchedule),
    };

    ScheduleDecision {
        should_enable,
        target_strength,
        next_change: next_transition(now, sunrise, sunset),
        reason,
    }
}
