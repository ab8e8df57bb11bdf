//! The engine a session currently owns
//!
//! Wraps the three engines behind one enum so the controller can drive
//! whichever mode is active without knowing its snapshot type.

use tracing::debug;

use ringtimer::timer::{
    Command, CueEvent, EngineState, IntervalTimerEngine, PhaseTransition, Rejection,
    RoundTimerEngine, StopwatchEngine, StopwatchState, TimerEngine, Update,
};

use crate::error::Result;

use super::state::{EngineView, SessionSetup, TimerMode};

const LAP_NEEDS_STOPWATCH: &str = "laps are only available on the stopwatch";

/// Exactly one engine; switching modes replaces it wholesale
#[derive(Debug, Clone)]
pub enum ActiveEngine {
    Round(RoundTimerEngine),
    Interval(IntervalTimerEngine),
    Stopwatch(StopwatchEngine),
}

/// Mode-independent result of a command or tick
#[derive(Debug, Clone)]
pub struct Outcome {
    pub view: EngineView,
    pub cues: Vec<CueEvent>,
    pub transitions: Vec<PhaseTransition>,
    pub rejected: Option<Rejection>,
    /// Current position on the engine's total-elapsed timeline, taken from
    /// the clock sample when the engine read one
    pub now_total_ms: u64,
}

impl From<Update<EngineState>> for Outcome {
    fn from(update: Update<EngineState>) -> Self {
        Self {
            now_total_ms: update
                .sampled_ms
                .unwrap_or(update.snapshot.total_elapsed_ms),
            view: EngineView::Timer(update.snapshot),
            cues: update.cues,
            transitions: update.transitions,
            rejected: update.rejected,
        }
    }
}

impl From<Update<StopwatchState>> for Outcome {
    fn from(update: Update<StopwatchState>) -> Self {
        Self {
            now_total_ms: update.sampled_ms.unwrap_or(update.snapshot.elapsed_ms),
            view: EngineView::Stopwatch(update.snapshot),
            cues: update.cues,
            transitions: update.transitions,
            rejected: update.rejected,
        }
    }
}

impl ActiveEngine {
    /// Build an idle engine for `setup`
    pub fn build(setup: &SessionSetup) -> Result<Self> {
        let engine = match setup {
            SessionSetup::Round(config) => {
                ActiveEngine::Round(RoundTimerEngine::new(config.clone())?)
            }
            SessionSetup::Interval(config) => {
                ActiveEngine::Interval(IntervalTimerEngine::new(config.clone())?)
            }
            SessionSetup::Stopwatch(config) => {
                ActiveEngine::Stopwatch(StopwatchEngine::new(*config))
            }
        };
        debug!(mode = %engine.mode(), "engine built");
        Ok(engine)
    }

    pub fn mode(&self) -> TimerMode {
        match self {
            ActiveEngine::Round(_) => TimerMode::Round,
            ActiveEngine::Interval(_) => TimerMode::Interval,
            ActiveEngine::Stopwatch(_) => TimerMode::Stopwatch,
        }
    }

    pub fn view(&self) -> EngineView {
        match self {
            ActiveEngine::Round(e) => EngineView::Timer(e.snapshot()),
            ActiveEngine::Interval(e) => EngineView::Timer(e.snapshot()),
            ActiveEngine::Stopwatch(e) => EngineView::Stopwatch(e.snapshot()),
        }
    }

    pub fn apply(&mut self, command: Command, now_ms: u64) -> Outcome {
        match self {
            ActiveEngine::Round(e) => dispatch(e, command, now_ms).into(),
            ActiveEngine::Interval(e) => dispatch(e, command, now_ms).into(),
            ActiveEngine::Stopwatch(e) if command == Command::Lap => e.lap(now_ms).into(),
            ActiveEngine::Stopwatch(e) => dispatch(e, command, now_ms).into(),
        }
    }

    pub fn tick(&mut self, now_ms: u64) -> Outcome {
        match self {
            ActiveEngine::Round(e) => e.tick(now_ms).into(),
            ActiveEngine::Interval(e) => e.tick(now_ms).into(),
            ActiveEngine::Stopwatch(e) => e.tick(now_ms).into(),
        }
    }
}

fn dispatch<E: TimerEngine>(engine: &mut E, command: Command, now_ms: u64) -> Update<E::State> {
    match command {
        Command::Start => engine.start(now_ms),
        Command::Pause => engine.pause(now_ms),
        Command::Resume => engine.resume(now_ms),
        Command::Skip => engine.skip(now_ms),
        Command::Reset => engine.reset(),
        Command::Lap => {
            debug!(reason = LAP_NEEDS_STOPWATCH, "command rejected");
            Update::rejected(engine.snapshot(), Command::Lap, LAP_NEEDS_STOPWATCH)
        }
    }
}
