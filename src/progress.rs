//! # Progress: Atomic Run Counters
//!
//! Thread-safe counters shared between the rayon workers of a batch run and a
//! background status reporter. Counters are lock-free atomics; only the
//! current-index label sits behind a Mutex (one writer per chunk).
//!
//! ## Background Reporter
//!
//! A dedicated thread logs throughput every `interval`: indices processed,
//! verified/failed counts, rate, and the current label. It waits on a
//! `Condvar` between reports, so [`Progress::stop`] wakes it immediately.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

pub struct Progress {
    pub processed: AtomicU64,
    pub verified: AtomicU64,
    pub failed: AtomicU64,
    pub current: Mutex<String>,
    start: Instant,
    shutdown: Mutex<bool>,
    wake: Condvar,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub processed: u64,
    pub verified: u64,
    pub failed: u64,
    pub elapsed: Duration,
}

impl Snapshot {
    /// Indices per second; 0.0 before the first whole second.
    pub fn rate(&self) -> f64 {
        if self.elapsed.as_secs() > 0 {
            self.processed as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Percentage of completed pipelines that verified.
    pub fn pass_rate(&self) -> f64 {
        let done = self.verified + self.failed;
        100.0 * self.verified as f64 / done.max(1) as f64
    }
}

impl Progress {
    pub fn new() -> Arc<Self> {
        Arc::new(Progress {
            processed: AtomicU64::new(0),
            verified: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            current: Mutex::new(String::new()),
            start: Instant::now(),
            shutdown: Mutex::new(false),
            wake: Condvar::new(),
        })
    }

    pub fn start_reporter(self: &Arc<Self>, interval: Duration) -> thread::JoinHandle<()> {
        let progress = Arc::clone(self);
        thread::spawn(move || loop {
            let Ok(guard) = progress.shutdown.lock() else {
                break;
            };
            let Ok((stopped, _)) = progress
                .wake
                .wait_timeout_while(guard, interval, |stopped| !*stopped)
            else {
                break;
            };
            if *stopped {
                break;
            }
            drop(stopped);
            progress.print_status();
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            processed: self.processed.load(Ordering::Relaxed),
            verified: self.verified.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            elapsed: self.start.elapsed(),
        }
    }

    pub fn print_status(&self) {
        let snap = self.snapshot();
        let current = self
            .current
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default();
        let secs = snap.elapsed.as_secs();
        info!(
            current = %current,
            processed = snap.processed,
            verified = snap.verified,
            failed = snap.failed,
            rate = format_args!("{:.0}", snap.rate()),
            elapsed = format_args!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60),
            "run progress"
        );
    }

    pub fn stop(&self) {
        if let Ok(mut stopped) = self.shutdown.lock() {
            *stopped = true;
        }
        self.wake.notify_all();
    }
}
