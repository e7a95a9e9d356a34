//! Property tests for the decision engine.
//!
//! The engine is a pure function of its inputs, which makes it a natural fit
//! for property testing: the interval laws, the strictly-future transition
//! guarantee, override precedence, and determinism hold for arbitrary
//! instants.

use chrono::{DateTime, Duration, TimeZone};
use chrono_tz::Tz;
use proptest::prelude::*;

use duskr::engine::{self, DecisionReason, Override};

/// Map a second offset onto a fixed base day in UTC.
fn instant(offset_secs: i64) -> DateTime<Tz> {
    let base = Tz::UTC.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    base + Duration::seconds(offset_secs)
}

/// Seconds within a three-day window, enough to cover midnight wraps.
fn offset_strategy() -> impl Strategy<Value = i64> {
    0..(3 * 86_400i64)
}

/// Seconds within one 24h cycle.
fn same_day_offset_strategy() -> impl Strategy<Value = i64> {
    0..86_400i64
}

proptest! {
    /// Non-wrapping window: night is everything outside [sunrise, sunset).
    #[test]
    fn non_wrapping_interval_law(
        now in offset_strategy(),
        a in offset_strategy(),
        b in offset_strategy(),
    ) {
        let (sunrise, sunset) = (a.min(b), a.max(b));
        let expected = now < sunrise || now >= sunset;
        prop_assert_eq!(
            engine::is_night(instant(now), instant(sunrise), instant(sunset)),
            expected
        );
    }

    /// Wrapping window: night is the stretch from sunset up to sunrise.
    #[test]
    fn wrapping_interval_law(
        now in offset_strategy(),
        a in offset_strategy(),
        b in offset_strategy(),
    ) {
        prop_assume!(a != b);
        let (sunset, sunrise) = (a.min(b), a.max(b));
        let expected = sunset <= now && now < sunrise;
        prop_assert_eq!(
            engine::is_night(instant(now), instant(sunrise), instant(sunset)),
            expected
        );
    }

    /// With sun events in the same 24h cycle as now, the projected
    /// transition is strictly in the future.
    #[test]
    fn next_transition_is_strictly_future(
        now in same_day_offset_strategy(),
        sunrise in same_day_offset_strategy(),
        sunset in same_day_offset_strategy(),
    ) {
        let next = engine::next_transition(
            instant(now),
            instant(sunrise),
            instant(sunset),
        );
        prop_assert!(next > instant(now));
    }

    /// An override always wins and is always reported as the reason.
    #[test]
    fn override_takes_precedence(
        now in offset_strategy(),
        sunrise in offset_strategy(),
        sunset in offset_strategy(),
        strength in any::<u8>(),
        forced in any::<bool>(),
    ) {
        let override_state = if forced { Override::ForceOn } else { Override::ForceOff };
        let decision = engine::decide(
            instant(now),
            instant(sunrise),
            instant(sunset),
            strength,
            override_state,
        );
        prop_assert_eq!(decision.should_enable, forced);
        prop_assert_eq!(decision.reason, DecisionReason::ManualOverride);
    }

    /// Without an override the decision mirrors is_night exactly.
    #[test]
    fn schedule_follows_is_night(
        now in offset_strategy(),
        sunrise in offset_strategy(),
        sunset in offset_strategy(),
        strength in any::<u8>(),
    ) {
        let decision = engine::decide(
            instant(now),
            instant(sunrise),
            instant(sunset),
            strength,
            Override::Auto,
        );
        prop_assert_eq!(
            decision.should_enable,
            engine::is_night(instant(now), instant(sunrise), instant(sunset))
        );
        prop_assert_eq!(decision.reason, DecisionReason::SunSchedule);
        prop_assert_eq!(decision.target_strength, strength);
    }

    /// Identical inputs yield identical decisions.
    #[test]
    fn decide_is_deterministic(
        now in offset_strategy(),
        sunrise in offset_strategy(),
        sunset in offset_strategy(),
        strength in any::<u8>(),
    ) {
        let first = engine::decide(
            instant(now),
            instant(sunrise),
            instant(sunset),
            strength,
            Override::Auto,
        );
        let second = engine::decide(
            instant(now),
            instant(sunrise),
            instant(sunset),
            strength,
            Override::Auto,
        );
        prop_assert_eq!(first, second);
    }

    /// The projected transition never depends on the override.
    #[test]
    fn override_does_not_move_next_change(
        now in offset_strategy(),
        sunrise in offset_strategy(),
        sunset in offset_strategy(),
    ) {
        let auto = engine::decide(
            instant(now), instant(sunrise), instant(sunset), 50, Override::Auto,
        );
        let forced = engine::decide(
            instant(now), instant(sunrise), instant(sunset), 50, Override::ForceOn,
        );
        prop_assert_eq!(auto.next_change, forced.next_change);
    }
}
