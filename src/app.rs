//! Application coordinator managing the duskr lifecycle.
//!
//! The [`Duskr`] struct wires the collaborators together: it loads
//! configuration, selects an actuator backend, builds the tick function, and
//! drives the [`Scheduler`]. The daemon path consumes results from the
//! delivery channel until a termination signal arrives; the one-shot path
//! reuses the same tick through `trigger_once`.
//!
//! ## The tick
//!
//! Each tick re-reads the configuration from disk (keeping the last good copy
//! when the read fails), resolves the location, fetches sun times, normalizes
//! "now" into the coordinate timezone, consumes any pending override, asks
//! the engine for a decision, and hands it to the actuator. Every fallible
//! step substitutes a fallback, so the tick always returns a result, which is
//! the contract the Scheduler depends on.
//!
//! Shared mutable state between ticks (the cached config) sits behind a
//! `Mutex`, which also settles the race between the timer's tick and a
//! concurrent `trigger_once`: both go through the same lock and the same
//! delivery channel, and order is simply completion order.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{RecvTimeoutError, channel};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::backend::{NightLightBackend, create_backend, detect_backend};
use crate::config::{self, Config};
use crate::engine::{self, Override};
use crate::geo::{self, sun};
use crate::scheduler::{Scheduler, SchedulerResult, TickFn};

/// Builder for configuring and running the duskr application.
///
/// ```no_run
/// use duskr::Duskr;
///
/// # fn main() -> anyhow::Result<()> {
/// // Daemon loop
/// Duskr::new(false).run()?;
///
/// // One-shot apply
/// let result = Duskr::new(true).apply_once()?;
/// println!("{}", result.message);
/// # Ok(())
/// # }
/// ```
pub struct Duskr {
    debug_enabled: bool,
}

impl Duskr {
    pub fn new(debug_enabled: bool) -> Self {
        Self { debug_enabled }
    }

    /// Run the scheduler daemon until SIGINT or SIGTERM.
    pub fn run(self) -> Result<()> {
        log_version!();
        let context = TickContext::initialize(self.debug_enabled)?;
        let interval_minutes = context.interval_minutes();

        let terminate = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&terminate))
            .context("Failed to register SIGTERM handler")?;
        signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&terminate))
            .context("Failed to register SIGINT handler")?;

        let (results_tx, results_rx) = channel();
        let mut scheduler = Scheduler::new(interval_minutes, context.into_tick(), results_tx);
        scheduler.start();
        log_block_start!("Scheduler running, evaluating every {interval_minutes} min");

        while !terminate.load(Ordering::SeqCst) {
            match results_rx.recv_timeout(Duration::from_millis(500)) {
                Ok(result) => log_result(&result),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        log_block_start!("Shutting down");
        scheduler.stop();
        log_end!();
        Ok(())
    }

    /// Evaluate and apply exactly once through the scheduler's one-shot path,
    /// without starting the background worker.
    pub fn apply_once(self) -> Result<SchedulerResult> {
        let context = TickContext::initialize(self.debug_enabled)?;
        let interval_minutes = context.interval_minutes();

        let (results_tx, results_rx) = channel();
        let scheduler = Scheduler::new(interval_minutes, context.into_tick(), results_tx);
        let result = scheduler.trigger_once();
        // Drain the delivery copy so the channel does not outlive this call.
        let _ = results_rx.try_recv();

        log_result(&result);
        log_end!();
        Ok(result)
    }
}

/// Everything the tick function needs, shared between the worker thread and
/// any `trigger_once` caller.
struct TickContext {
    config_path: PathBuf,
    config: Mutex<Config>,
    backend: Box<dyn NightLightBackend>,
}

impl TickContext {
    /// Load configuration, pick a backend, and log the startup block.
    fn initialize(debug_enabled: bool) -> Result<Arc<Self>> {
        crate::logger::Log::set_debug(debug_enabled);

        let config_path = config::get_config_path()?;
        let config = config::load()?;
        config.log_config();

        let backend_type = detect_backend(&config);
        let backend = create_backend(backend_type);
        log_block_start!("Using {} backend", backend_type.name());

        Ok(Arc::new(Self {
            config_path,
            config: Mutex::new(config),
            backend,
        }))
    }

    fn interval_minutes(&self) -> u64 {
        self.config
            .lock()
            .map(|config| config.interval_minutes())
            .unwrap_or(crate::constants::DEFAULT_INTERVAL_MINUTES)
    }

    fn into_tick(self: Arc<Self>) -> TickFn {
        Arc::new(move || self.tick())
    }

    /// One evaluation cycle: resolve inputs, decide, apply, report.
    /// Infallible by construction.
    fn tick(&self) -> SchedulerResult {
        let (config, override_state) = self.refresh_config();

        let location = geo::resolve_location(&config);
        let sun_times = sun::sun_times(&location);
        let now = sun::now_in(sun_times.timezone);

        let decision = engine::decide(
            now,
            sun_times.sunrise,
            sun_times.sunset,
            config.strength(),
            override_state,
        );
        let applied = self.backend.apply_state(
            decision.should_enable,
            decision.target_strength,
            config.transition_minutes(),
            config.dry_run(),
        );

        log_debug!(
            "Tick at {location}: sunrise {}, sunset {}",
            sun_times.sunrise.format("%H:%M"),
            sun_times.sunset.format("%H:%M")
        );

        let message = format!("{}; applied={applied}", decision.reason);
        SchedulerResult {
            decision,
            applied,
            timestamp: now,
            message,
        }
    }

    /// Re-read the config from disk and take any pending override.
    ///
    /// The read and the consumption form one critical section: the `auto`
    /// reset is persisted, under the cross-process file lock, before either
    /// lock is released, so a pending override reaches exactly one
    /// evaluation no matter how ticks and one-shot triggers interleave. Only
    /// the freshly-read record is written back, so concurrent `set` edits
    /// survive the reset.
    ///
    /// On a failed reload the last good copy is kept and no override is
    /// reported; whatever is pending on disk stays pending until a reload
    /// succeeds.
    fn refresh_config(&self) -> (Config, Override) {
        let mut cached = match self.config.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let refreshed = config::with_config_lock(&self.config_path, || {
            let mut fresh = config::load_from_path(&self.config_path)?;
            let pending = fresh.manual_override();
            if pending != Override::Auto {
                fresh.manual_override = Some(Override::Auto);
                config::save(&fresh, &self.config_path)?;
            }
            Ok((fresh, pending))
        });

        match refreshed {
            Ok((fresh, pending)) => {
                *cached = fresh.clone();
                (fresh, pending)
            }
            Err(err) => {
                log_warning!("Config reload failed, keeping previous: {err:#}");
                (cached.clone(), Override::Auto)
            }
        }
    }
}


/// Log one scheduler result as a block.
fn log_result(result: &SchedulerResult) {
    let decision = &result.decision;
    log_block_start!(
        "Night Light {} at {}%",
        if decision.should_enable { "ON" } else { "OFF" },
        decision.target_strength
    );
    log_indented!("Reason: {}", decision.reason);
    log_indented!(
        "Next change: {}",
        decision.next_change.format("%Y-%m-%d %H:%M %Z")
    );
    log_indented!("Applied: {}", result.applied);
}
