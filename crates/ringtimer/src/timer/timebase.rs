//! Drift-free elapsed time
//!
//! `TimeBase` turns host-supplied millisecond timestamps into elapsed time
//! using an anchor plus an accumulator. Only two clock reads matter (the
//! anchor and `now`), so late or missing ticks never lose time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Source of monotonic millisecond timestamps for hosts
pub trait Clock: Send {
    fn now_ms(&self) -> u64;
}

/// Wall clock backed by `Instant`, counting from its creation
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Manually advanced clock; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum RunState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// Anchor/accumulator elapsed-time tracker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeBase {
    anchor_ms: u64,
    accumulated_ms: u64,
    /// Latest `now` observed; earlier timestamps are clamped up to it
    latest_now_ms: u64,
    state: RunState,
}

impl TimeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor at `now_ms` with nothing accumulated
    pub fn start(&mut self, now_ms: u64) {
        self.start_with_offset(now_ms, 0);
    }

    /// Anchor at `now_ms`, reporting `offset_ms` as already elapsed
    pub fn start_with_offset(&mut self, now_ms: u64, offset_ms: u64) {
        self.latest_now_ms = now_ms;
        self.anchor_ms = now_ms;
        self.accumulated_ms = offset_ms;
        self.state = RunState::Running;
    }

    /// Fold the running span into the accumulator. No-op unless running.
    pub fn pause(&mut self, now_ms: u64) {
        if self.state != RunState::Running {
            return;
        }
        let now = self.observe(now_ms);
        self.accumulated_ms += now - self.anchor_ms;
        self.state = RunState::Paused;
    }

    /// Re-anchor at `now_ms`. No-op unless paused.
    pub fn resume(&mut self, now_ms: u64) {
        if self.state != RunState::Paused {
            return;
        }
        let now = self.observe(now_ms);
        self.anchor_ms = now;
        self.state = RunState::Running;
    }

    /// Elapsed time at `now_ms` without recording the observation
    pub fn elapsed(&self, now_ms: u64) -> u64 {
        match self.state {
            RunState::Stopped => 0,
            RunState::Paused => self.accumulated_ms,
            RunState::Running => {
                let now = now_ms.max(self.latest_now_ms);
                self.accumulated_ms + (now - self.anchor_ms)
            }
        }
    }

    /// Record `now_ms` as observed and return the elapsed time at it.
    ///
    /// A timestamp earlier than one already seen counts as a zero-progress
    /// observation, so the result never decreases.
    pub fn sample(&mut self, now_ms: u64) -> u64 {
        let now = self.observe(now_ms);
        self.elapsed(now)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == RunState::Paused
    }

    pub fn is_started(&self) -> bool {
        self.state != RunState::Stopped
    }

    fn observe(&mut self, now_ms: u64) -> u64 {
        self.latest_now_ms = self.latest_now_ms.max(now_ms);
        self.latest_now_ms
    }
}
