//! Periodic evaluation worker with a one-shot trigger path.
//!
//! The [`Scheduler`] owns a single background worker thread that repeatedly
//! invokes a caller-supplied tick function and delivers each
//! [`SchedulerResult`] through an mpsc channel. The worker sleeps between
//! ticks by waiting on a control channel, so [`Scheduler::stop`] wakes it
//! promptly instead of waiting out the interval. [`Scheduler::trigger_once`]
//! runs the same tick synchronously on the caller's thread for "apply now"
//! requests, independent of the worker's state.
//!
//! ## State machine
//!
//! Idle (no worker) → Running (worker ticking on interval) → Stopped
//! (worker joined), and back to Running on a subsequent [`Scheduler::start`].
//!
//! ## Tick contract
//!
//! The tick function must be infallible: it converts every collaborator
//! failure into a fallback [`SchedulerResult`] itself. The Scheduler has no
//! retry or error-recovery logic and imposes no per-tick timeout; a slow tick
//! stretches the effective interval but cannot corrupt scheduler state, and a
//! panicking tick is a contract violation rather than a runtime condition.
//!
//! ## Ordering
//!
//! Results arrive on the channel in completion order. A `trigger_once` racing
//! a timer tick has no defined interleaving beyond that; all shared mutable
//! state between evaluations lives with the tick function's owner, behind its
//! own synchronization.

use chrono::DateTime;
use chrono_tz::Tz;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{RecvTimeoutError, Sender, channel};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::engine::ScheduleDecision;

/// Outcome of one scheduler tick: the decision plus what became of it.
#[derive(Debug, Clone)]
pub struct SchedulerResult {
    /// The engine's decision for this evaluation.
    pub decision: ScheduleDecision,
    /// Whether the actuator reported success applying the decision.
    pub applied: bool,
    /// The evaluation instant (not the delivery instant).
    pub timestamp: DateTime<Tz>,
    /// Human-readable summary for logging.
    pub message: String,
}

/// The boxed tick callable. Shared between the worker thread and the
/// synchronous `trigger_once` path.
pub type TickFn = Arc<dyn Fn() -> SchedulerResult + Send + Sync>;

/// Periodically evaluates and applies Night Light state.
///
/// Owns the background worker's lifecycle and nothing else; the tick function
/// carries all domain state.
pub struct Scheduler {
    interval_minutes: u64,
    tick: TickFn,
    results: Sender<SchedulerResult>,
    running: Arc<AtomicBool>,
    worker: Option<Worker>,
}

struct Worker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

impl Scheduler {
    /// Create a scheduler delivering results into `results`.
    ///
    /// The caller keeps the matching `Receiver`; a dropped receiver is not an
    /// error, results are simply discarded from then on.
    pub fn new(
        interval_minutes: u64,
        tick: TickFn,
        results: Sender<SchedulerResult>,
    ) -> Self {
        Self {
            interval_minutes,
            tick,
            results,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// The sleep between ticks, floored at one second so a zero-interval
    /// configuration cannot busy-spin.
    fn sleep_interval(&self) -> Duration {
        Duration::from_secs((self.interval_minutes * 60).max(1))
    }

    /// Whether the background worker is currently active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawn the background worker. No-op if already running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        let (stop_tx, stop_rx) = channel::<()>();
        let tick = Arc::clone(&self.tick);
        let results = self.results.clone();
        let running = Arc::clone(&self.running);
        let interval = self.sleep_interval();

        self.running.store(true, Ordering::SeqCst);
        let handle = std::thread::spawn(move || {
            loop {
                let result = tick();
                let _ = results.send(result);
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            running.store(false, Ordering::SeqCst);
        });

        self.worker = Some(Worker {
            stop: stop_tx,
            handle,
        });
    }

    /// Signal the worker to exit and wait for it to terminate.
    ///
    /// Cooperative: a tick already in flight runs to completion, so the wait
    /// is bounded by the tick's own worst-case latency. Safe to call when
    /// never started; `start` may be called again afterward.
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop.send(());
            drop(worker.stop);
            let _ = worker.handle.join();
        }
        self.running.store(false, Ordering::SeqCst);
    }

    /// Run the tick and delivery exactly once, synchronously, on the calling
    /// thread. Independent of the timer: it neither resets nor waits on the
    /// worker's sleep cycle.
    pub fn trigger_once(&self) -> SchedulerResult {
        let result = (self.tick)();
        let _ = self.results.send(result.clone());
        result
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{DecisionReason, ScheduleDecision};
    use chrono::TimeZone;
    use chrono_tz::Tz::UTC;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc::Receiver;

    fn counting_scheduler(
        interval_minutes: u64,
    ) -> (Scheduler, Receiver<SchedulerResult>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let tick_calls = Arc::clone(&calls);
        let tick: TickFn = Arc::new(move || {
            tick_calls.fetch_add(1, Ordering::SeqCst);
            let now = UTC.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
            SchedulerResult {
                decision: ScheduleDecision {
                    should_enable: false,
                    target_strength: 50,
                    next_change: now,
                    reason: DecisionReason::SunSchedule,
                },
                applied: true,
                timestamp: now,
                message: "tick".into(),
            }
        });
        let (tx, rx) = channel();
        (Scheduler::new(interval_minutes, tick, tx), rx, calls)
    }

    #[test]
    fn stop_without_start_is_safe() {
        let (mut scheduler, _rx, calls) = counting_scheduler(60);
        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn zero_interval_is_floored_to_one_second() {
        let (scheduler, _rx, _calls) = counting_scheduler(0);
        assert_eq!(scheduler.sleep_interval(), Duration::from_secs(1));
    }

    #[test]
    fn results_are_discarded_when_receiver_dropped() {
        let (mut scheduler, rx, _calls) = counting_scheduler(60);
        drop(rx);
        scheduler.start();
        // Worker survives the failed send and stop still joins cleanly.
        std::thread::sleep(Duration::from_millis(100));
        assert!(scheduler.is_running());
        scheduler.stop();
        assert!(!scheduler.is_running());
    }
}
