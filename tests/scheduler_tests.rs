//! Integration tests for the scheduler lifecycle and delivery semantics.

use chrono::TimeZone;
use chrono_tz::Tz::UTC;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, channel};
use std::time::Duration;

use serial_test::serial;

use duskr::engine::{DecisionReason, ScheduleDecision};
use duskr::scheduler::{Scheduler, SchedulerResult, TickFn};

/// A tick function that numbers its results, for counting and ordering
/// assertions. The interval is set high enough that only the startup tick
/// fires within a test window.
fn numbered_scheduler(
    interval_minutes: u64,
) -> (Scheduler, Receiver<SchedulerResult>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let tick_calls = Arc::clone(&calls);
    let tick: TickFn = Arc::new(move || {
        let sequence = tick_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let now = UTC.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        SchedulerResult {
            decision: ScheduleDecision {
                should_enable: sequence % 2 == 0,
                target_strength: 50,
                next_change: now,
                reason: DecisionReason::SunSchedule,
            },
            applied: true,
            timestamp: now,
            message: format!("tick {sequence}"),
        }
    });
    let (tx, rx) = channel();
    (Scheduler::new(interval_minutes, tick, tx), rx, calls)
}

#[test]
#[serial]
fn double_start_runs_exactly_one_worker() {
    let (mut scheduler, rx, calls) = numbered_scheduler(60);
    scheduler.start();
    scheduler.start();

    assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
    // A second worker would produce a second startup tick immediately.
    assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    scheduler.stop();
}

#[test]
#[serial]
fn stop_then_trigger_once_still_produces_results() {
    let (mut scheduler, rx, _calls) = numbered_scheduler(60);
    scheduler.start();
    assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
    scheduler.stop();
    assert!(!scheduler.is_running());

    let result = scheduler.trigger_once();
    assert!(result.applied);
    assert_eq!(result.message, "tick 2");

    // The one-shot also went through the delivery channel.
    let delivered = rx.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(delivered.message, "tick 2");
}

#[test]
#[serial]
fn trigger_once_without_start_works() {
    let (scheduler, rx, calls) = numbered_scheduler(60);
    let result = scheduler.trigger_once();
    assert_eq!(result.message, "tick 1");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(rx.recv_timeout(Duration::from_secs(1)).is_ok());
}

#[test]
#[serial]
fn results_arrive_in_completion_order() {
    let (scheduler, rx, _calls) = numbered_scheduler(60);
    scheduler.trigger_once();
    scheduler.trigger_once();
    scheduler.trigger_once();

    let mut sequences = Vec::new();
    while let Ok(result) = rx.recv_timeout(Duration::from_millis(500)) {
        sequences.push(result.message.clone());
        if sequences.len() == 3 {
            break;
        }
    }
    assert_eq!(sequences, vec!["tick 1", "tick 2", "tick 3"]);
}

#[test]
#[serial]
fn short_interval_produces_repeated_ticks() {
    // interval 0 floors to one second, so two ticks arrive within ~1.5s.
    let (mut scheduler, rx, _calls) = numbered_scheduler(0);
    scheduler.start();

    let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    let second = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(first.message, "tick 1");
    assert_eq!(second.message, "tick 2");

    scheduler.stop();
}

#[test]
#[serial]
fn trigger_once_during_active_worker_keeps_counts_consistent() {
    // interval 0 floors to one second, so worker ticks interleave with the
    // one-shot triggers fired from this thread.
    let (mut scheduler, rx, calls) = numbered_scheduler(0);
    scheduler.start();

    for _ in 0..5 {
        let result = scheduler.trigger_once();
        assert!(result.applied);
        std::thread::sleep(Duration::from_millis(120));
    }
    std::thread::sleep(Duration::from_millis(1200));

    scheduler.stop();
    assert!(!scheduler.is_running());

    // Every tick, whichever path ran it, produced exactly one delivery.
    let mut delivered = 0;
    while rx.try_recv().is_ok() {
        delivered += 1;
    }
    assert_eq!(delivered, calls.load(Ordering::SeqCst));
    // At least the startup tick, one interval tick, and the five one-shots.
    assert!(delivered >= 7);
}

#[test]
#[serial]
fn restart_after_stop_resumes_ticking() {
    let (mut scheduler, rx, calls) = numbered_scheduler(60);
    scheduler.start();
    assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
    scheduler.stop();

    scheduler.start();
    assert!(scheduler.is_running());
    assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    scheduler.stop();
}
