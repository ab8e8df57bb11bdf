//! Interval (Tabata-style) timer
//!
//! Fixed work/rest cycles. Every work phase is followed by a rest phase,
//! including the last one; the run completes when the final rest ends.

use crate::error::Result;
use crate::presets::TABATA;

use super::phased::{CueStyle, PhaseMachine};
use super::types::{EngineState, TimerConfig, Update};
use super::TimerEngine;

/// High/low intensity cycle timer
#[derive(Debug, Clone)]
pub struct IntervalTimerEngine {
    machine: PhaseMachine,
}

impl IntervalTimerEngine {
    /// Create an idle engine. `rest_after_last_round` is ignored: the
    /// interval timer always rests after the final round.
    pub fn new(config: TimerConfig) -> Result<Self> {
        Ok(Self {
            machine: PhaseMachine::new(config, CueStyle::Interval)?,
        })
    }

    /// 20s work / 10s rest x 8
    pub fn tabata() -> Result<Self> {
        Self::new(TABATA.to_config())
    }

    pub fn config(&self) -> &TimerConfig {
        self.machine.config()
    }
}

impl TimerEngine for IntervalTimerEngine {
    type State = EngineState;

    fn start(&mut self, now_ms: u64) -> Update<EngineState> {
        self.machine.start(now_ms)
    }

    fn pause(&mut self, now_ms: u64) -> Update<EngineState> {
        self.machine.pause(now_ms)
    }

    fn resume(&mut self, now_ms: u64) -> Update<EngineState> {
        self.machine.resume(now_ms)
    }

    fn skip(&mut self, now_ms: u64) -> Update<EngineState> {
        self.machine.skip(now_ms)
    }

    fn reset(&mut self) -> Update<EngineState> {
        self.machine.reset()
    }

    fn tick(&mut self, now_ms: u64) -> Update<EngineState> {
        self.machine.tick(now_ms)
    }

    fn snapshot(&self) -> EngineState {
        self.machine.snapshot()
    }
}
