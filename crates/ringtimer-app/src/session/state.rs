//! Session commands and shared state
//!
//! `SessionCommand` is what a front end sends to the controller.
//! `SessionSnapshot` is what the controller publishes back.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use ringtimer::timer::{
    CueEvent, EngineState, Phase, Rejection, StopwatchConfig, StopwatchPhase, StopwatchState,
    TimerConfig,
};

/// The three timer modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    #[default]
    Round,
    Interval,
    Stopwatch,
}

impl TimerMode {
    pub const ALL: [TimerMode; 3] = [TimerMode::Round, TimerMode::Interval, TimerMode::Stopwatch];
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerMode::Round => write!(f, "round"),
            TimerMode::Interval => write!(f, "interval"),
            TimerMode::Stopwatch => write!(f, "stopwatch"),
        }
    }
}

impl FromStr for TimerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "round" | "rounds" => Ok(TimerMode::Round),
            "interval" | "hiit" => Ok(TimerMode::Interval),
            "stopwatch" => Ok(TimerMode::Stopwatch),
            other => Err(format!(
                "unknown mode '{}' (expected round, interval or stopwatch)",
                other
            )),
        }
    }
}

/// Everything needed to build a fresh engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSetup {
    Round(TimerConfig),
    Interval(TimerConfig),
    Stopwatch(StopwatchConfig),
}

impl SessionSetup {
    pub fn mode(&self) -> TimerMode {
        match self {
            SessionSetup::Round(_) => TimerMode::Round,
            SessionSetup::Interval(_) => TimerMode::Interval,
            SessionSetup::Stopwatch(_) => TimerMode::Stopwatch,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            SessionSetup::Round(c) | SessionSetup::Interval(c) => c.label.as_deref(),
            SessionSetup::Stopwatch(_) => None,
        }
    }
}

/// Commands sent by the front end
#[derive(Debug, Clone)]
pub enum SessionCommand {
    // Timer
    Start,
    Pause,
    Resume,
    /// Start when idle, pause when running, resume when paused
    Toggle,
    Skip,
    Reset,
    Lap,

    // Engine selection; both discard the current engine
    SwitchMode(TimerMode),
    Configure(SessionSetup),

    // Audio
    UnlockAudio,
    SetVolume(f32),
    Mute,
    Unmute,

    Shutdown,
}

/// Engine-specific part of the snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineView {
    Timer(EngineState),
    Stopwatch(StopwatchState),
}

impl EngineView {
    pub fn is_running(&self) -> bool {
        match self {
            EngineView::Timer(s) => s.is_running,
            EngineView::Stopwatch(s) => s.is_running,
        }
    }

    pub fn is_idle(&self) -> bool {
        match self {
            EngineView::Timer(s) => s.phase == Phase::Idle,
            EngineView::Stopwatch(s) => s.phase == StopwatchPhase::Idle,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, EngineView::Timer(s) if s.phase == Phase::Complete)
    }
}

/// Snapshot of the session shared between the controller and the UI
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub mode: TimerMode,
    pub label: Option<String>,
    pub view: EngineView,
    pub volume: f32,
    pub is_muted: bool,
    pub audio_unlocked: bool,
    /// Last cue handed to the audio output
    pub last_cue: Option<CueEvent>,
    pub cues_played: u64,
    /// Cues not played because they were stale or audio was muted
    pub cues_dropped: u64,
    pub last_rejection: Option<Rejection>,
    pub status_text: Cow<'static, str>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            mode: TimerMode::default(),
            label: None,
            view: EngineView::Stopwatch(StopwatchState::default()),
            volume: ringtimer::config::audio::DEFAULT_VOLUME,
            is_muted: false,
            audio_unlocked: false,
            last_cue: None,
            cues_played: 0,
            cues_dropped: 0,
            last_rejection: None,
            status_text: Cow::Borrowed("Ready"),
        }
    }
}
