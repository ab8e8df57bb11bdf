//! Timer engines
//!
//! Three state machines driven by host commands and host ticks:
//! `RoundTimerEngine`, `IntervalTimerEngine` and `StopwatchEngine`. Every
//! command and tick takes the host's current monotonic time in milliseconds
//! and returns an `Update` with the new snapshot plus any cues to play.

pub mod cue;
pub mod interval;
mod phased;
pub mod round;
pub mod stopwatch;
pub mod timebase;
pub mod types;

pub use cue::{CueDefinition, CueScheduler};
pub use interval::IntervalTimerEngine;
pub use round::RoundTimerEngine;
pub use stopwatch::StopwatchEngine;
pub use timebase::{Clock, ManualClock, MonotonicClock, TimeBase};
pub use types::{
    Command, CueEvent, CueKind, EngineState, LapRecord, Phase, PhaseTransition, Rejection,
    StopwatchConfig, StopwatchPhase, StopwatchState, TimerConfig, Update,
};

/// Command surface shared by all engines
pub trait TimerEngine {
    type State: Clone;

    fn start(&mut self, now_ms: u64) -> Update<Self::State>;
    fn pause(&mut self, now_ms: u64) -> Update<Self::State>;
    fn resume(&mut self, now_ms: u64) -> Update<Self::State>;
    fn skip(&mut self, now_ms: u64) -> Update<Self::State>;
    fn reset(&mut self) -> Update<Self::State>;
    fn tick(&mut self, now_ms: u64) -> Update<Self::State>;
    fn snapshot(&self) -> Self::State;
}
