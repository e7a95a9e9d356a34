//! Application-wide constants and configuration defaults.

/// Default Night Light strength percentage when unset in config.
pub const DEFAULT_STRENGTH: u8 = 50;
/// Default transition duration in minutes handed to the actuator.
pub const DEFAULT_TRANSITION_MINUTES: u32 = 10;
/// Default scheduler evaluation interval in minutes.
pub const DEFAULT_INTERVAL_MINUTES: u64 = 5;
/// Default location mode ("auto" or "manual").
pub const DEFAULT_LOCATION_MODE: &str = "auto";
/// Whether the actuator runs in dry-run mode by default.
pub const DEFAULT_DRY_RUN: bool = true;

/// Fallback sunrise hour (local time) when solar calculation is unavailable.
pub const FALLBACK_SUNRISE_HOUR: u32 = 7;
/// Fallback sunset hour (local time) when solar calculation is unavailable.
pub const FALLBACK_SUNSET_HOUR: u32 = 19;

/// Maximum Night Light strength percentage.
pub const MAXIMUM_STRENGTH: u8 = 100;
/// Maximum transition duration in minutes.
pub const MAXIMUM_TRANSITION_MINUTES: u32 = 60;
/// Minimum scheduler interval in minutes.
pub const MINIMUM_INTERVAL_MINUTES: u64 = 1;
/// Maximum scheduler interval in minutes.
pub const MAXIMUM_INTERVAL_MINUTES: u64 = 240;

/// Day-side color temperature used when mapping strength onto Kelvin.
pub const DAY_COLOR_TEMP: u32 = 6500;
/// Night-side color temperature reached at 100% strength.
pub const NIGHT_COLOR_TEMP: u32 = 1700;

/// Exit code indicating successful operation.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code indicating a failure.
pub const EXIT_FAILURE: i32 = 1;
