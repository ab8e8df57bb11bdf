//! Stopwatch
//!
//! Free-running elapsed time with lap marking. No phases, no cues.

use tracing::debug;

use crate::config::timing::MAX_LAPS;

use super::timebase::TimeBase;
use super::types::{
    Command, LapRecord, StopwatchConfig, StopwatchPhase, StopwatchState, Update,
};
use super::TimerEngine;

const NOT_RUNNING: &str = "stopwatch is not running";
const NOT_PAUSED: &str = "stopwatch is not paused";
const ALREADY_STARTED: &str = "stopwatch is already started";
const NO_SKIP: &str = "stopwatch has no phases to skip";
const LAP_LIMIT: &str = "lap limit reached";
const NO_PROGRESS: &str = "no time has elapsed since the previous lap";

#[derive(Debug, Clone, Default)]
pub struct StopwatchEngine {
    config: StopwatchConfig,
    time: TimeBase,
    phase: StopwatchPhase,
    elapsed_ms: u64,
    laps: Vec<LapRecord>,
}

impl StopwatchEngine {
    pub fn new(config: StopwatchConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &StopwatchConfig {
        &self.config
    }

    /// Stamp a lap at the current elapsed time. Only valid while running.
    pub fn lap(&mut self, now_ms: u64) -> Update<StopwatchState> {
        if self.phase != StopwatchPhase::Running {
            return self.reject(Command::Lap, NOT_RUNNING);
        }
        if self.laps.len() >= MAX_LAPS {
            return self.reject(Command::Lap, LAP_LIMIT);
        }
        self.elapsed_ms = self.time.sample(now_ms);

        let previous = self
            .laps
            .last()
            .map_or(self.config.starting_offset_ms, |l| l.elapsed_at_lap_ms);
        // Laps must be strictly increasing
        if !self.laps.is_empty() && self.elapsed_ms <= previous {
            return self.reject(Command::Lap, NO_PROGRESS);
        }

        let lap = LapRecord {
            index: self.laps.len(),
            elapsed_at_lap_ms: self.elapsed_ms,
            split_ms: self.elapsed_ms.saturating_sub(previous),
        };
        debug!(index = lap.index, elapsed_ms = lap.elapsed_at_lap_ms, "lap");
        self.laps.push(lap);
        Update::new(self.snapshot())
    }

    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }

    /// Lap with the shortest split
    pub fn fastest_lap(&self) -> Option<&LapRecord> {
        self.laps.iter().min_by_key(|l| l.split_ms)
    }

    /// Lap with the longest split
    pub fn slowest_lap(&self) -> Option<&LapRecord> {
        self.laps.iter().max_by_key(|l| l.split_ms)
    }

    fn reject(&self, command: Command, reason: &'static str) -> Update<StopwatchState> {
        debug!(%command, phase = %self.phase, reason, "command rejected");
        Update::rejected(self.snapshot(), command, reason)
    }
}

impl TimerEngine for StopwatchEngine {
    type State = StopwatchState;

    fn start(&mut self, now_ms: u64) -> Update<StopwatchState> {
        if self.phase != StopwatchPhase::Idle {
            return self.reject(Command::Start, ALREADY_STARTED);
        }
        self.time
            .start_with_offset(now_ms, self.config.starting_offset_ms);
        self.elapsed_ms = self.time.sample(now_ms);
        self.phase = StopwatchPhase::Running;
        Update::new(self.snapshot())
    }

    fn pause(&mut self, now_ms: u64) -> Update<StopwatchState> {
        if self.phase != StopwatchPhase::Running {
            return self.reject(Command::Pause, NOT_RUNNING);
        }
        self.elapsed_ms = self.time.sample(now_ms);
        self.time.pause(now_ms);
        self.phase = StopwatchPhase::Paused;
        Update::new(self.snapshot())
    }

    fn resume(&mut self, now_ms: u64) -> Update<StopwatchState> {
        if self.phase != StopwatchPhase::Paused {
            return self.reject(Command::Resume, NOT_PAUSED);
        }
        self.time.resume(now_ms);
        self.phase = StopwatchPhase::Running;
        Update::new(self.snapshot())
    }

    fn skip(&mut self, _now_ms: u64) -> Update<StopwatchState> {
        self.reject(Command::Skip, NO_SKIP)
    }

    fn reset(&mut self) -> Update<StopwatchState> {
        self.time.reset();
        self.laps.clear();
        self.elapsed_ms = 0;
        self.phase = StopwatchPhase::Idle;
        Update::new(self.snapshot())
    }

    fn tick(&mut self, now_ms: u64) -> Update<StopwatchState> {
        if self.phase == StopwatchPhase::Running {
            self.elapsed_ms = self.time.sample(now_ms);
        }
        Update::new(self.snapshot())
    }

    fn snapshot(&self) -> StopwatchState {
        StopwatchState {
            phase: self.phase,
            elapsed_ms: self.elapsed_ms,
            laps: self.laps.clone(),
            is_running: self.phase == StopwatchPhase::Running,
        }
    }
}
