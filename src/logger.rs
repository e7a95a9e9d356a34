//! Structured logging with visual formatting.
//!
//! duskr's log output uses Unicode box-drawing characters to group related
//! messages into visual blocks: a version header opens the stream, block
//! starts introduce a new conceptual section, decorated and indented lines
//! carry the details, and a terminal marker closes the stream at shutdown.
//!
//! Logging can be disabled at runtime for quiet operation (the `status --json`
//! path and tests), and debug messages are gated on the `--debug` flag.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Main logging interface.
///
/// ## Conventions
///
/// - **`log_version!`**: application startup header, once at the beginning.
/// - **`log_block_start!`**: opens a new conceptual block (state change,
///   configuration load, backend detection). Related follow-up lines use
///   `log_decorated!` or `log_indented!`.
/// - **`log_decorated!`**: a `┣`-prefixed line inside an existing block.
/// - **`log_indented!`**: nested detail lines under a parent message.
/// - **`log_pipe!`**: a single empty `┃` line for vertical spacing, used
///   before `log_warning!`/`log_error!` when they start a new visual block.
/// - **`log_end!`**: final termination marker, once at shutdown.
/// - **`log_warning!`, `log_error!`, `log_debug!`**: semantic
///   `[LEVEL]`-prefixed messages.
pub struct Log;

impl Log {
    /// Enable or disable all log output.
    ///
    /// Useful for quiet operation where output would interfere with
    /// machine-readable results.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Enable or disable debug-level messages.
    pub fn set_debug(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if debug-level messages are enabled.
    pub fn is_debug() -> bool {
        DEBUG_ENABLED.load(Ordering::SeqCst)
    }
}

/// Write a formatted line to stdout, flushing immediately.
pub fn write_output(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let version = env!("CARGO_PKG_VERSION");
            $crate::logger::write_output(&format!("┏ duskr v{version} ━━╸\n"));
        }
    }};
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            $crate::logger::write_output("╹\n");
        }
    }};
}

/// Log a block start message, initiating a new conceptual block.
#[macro_export]
macro_rules! log_block_start {
    ($($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($($arg)*);
            $crate::logger::write_output(&format!("┃\n┣ {message}\n"));
        }
    }};
}

/// Log a decorated message, typically as part of an existing block.
#[macro_export]
macro_rules! log_decorated {
    ($($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($($arg)*);
            $crate::logger::write_output(&format!("┣ {message}\n"));
        }
    }};
}

/// Log an indented message for sub-items or details within a block.
#[macro_export]
macro_rules! log_indented {
    ($($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($($arg)*);
            $crate::logger::write_output(&format!("┃   {message}\n"));
        }
    }};
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            $crate::logger::write_output("┃\n");
        }
    }};
}

/// Log a warning message with pipe prefix and yellow-colored level.
#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($($arg)*);
            $crate::logger::write_output(&format!("┣[\x1b[33mWARNING\x1b[0m] {message}\n"));
        }
    }};
}

/// Log an error message with pipe prefix and red-colored level.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($($arg)*);
            $crate::logger::write_output(&format!("┣[\x1b[31mERROR\x1b[0m] {message}\n"));
        }
    }};
}

/// Log a debug message, emitted only when `--debug` is active.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() && Log::is_debug() {
            let message = format!($($arg)*);
            $crate::logger::write_output(&format!("┣[\x1b[32mDEBUG\x1b[0m] {message}\n"));
        }
    }};
}
