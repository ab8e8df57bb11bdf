//! Shared timer types
//!
//! Pure data types used by the engines, the cue scheduler and hosts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::cues::DEFAULT_WARNING_LEAD_SECS;
use crate::error::{Result, TimerError};

/// Immutable configuration for the round and interval engines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub work_duration_secs: u32,
    pub rest_duration_secs: u32,
    pub total_rounds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Round engine only: schedule a rest phase after the final round
    #[serde(default)]
    pub rest_after_last_round: bool,
    /// Warning beep lead before each phase end, in seconds
    #[serde(default = "default_warning_lead")]
    pub warning_lead_secs: u32,
}

fn default_warning_lead() -> u32 {
    DEFAULT_WARNING_LEAD_SECS
}

impl TimerConfig {
    pub fn new(work_duration_secs: u32, rest_duration_secs: u32, total_rounds: u32) -> Self {
        Self {
            work_duration_secs,
            rest_duration_secs,
            total_rounds,
            label: None,
            rest_after_last_round: false,
            warning_lead_secs: DEFAULT_WARNING_LEAD_SECS,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_rest_after_last_round(mut self, enabled: bool) -> Self {
        self.rest_after_last_round = enabled;
        self
    }

    pub fn with_warning_lead(mut self, secs: u32) -> Self {
        self.warning_lead_secs = secs;
        self
    }

    /// Reject non-positive durations and zero rounds
    pub fn validate(&self) -> Result<()> {
        if self.work_duration_secs == 0 {
            return Err(TimerError::InvalidConfig(
                "work duration must be positive".to_string(),
            ));
        }
        if self.rest_duration_secs == 0 {
            return Err(TimerError::InvalidConfig(
                "rest duration must be positive".to_string(),
            ));
        }
        if self.total_rounds < 1 {
            return Err(TimerError::InvalidConfig(
                "total_rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn work_duration_ms(&self) -> u64 {
        u64::from(self.work_duration_secs) * 1_000
    }

    pub fn rest_duration_ms(&self) -> u64 {
        u64::from(self.rest_duration_secs) * 1_000
    }

    pub fn warning_lead_ms(&self) -> u64 {
        u64::from(self.warning_lead_secs) * 1_000
    }

    /// Length of a full session, from start to `Complete`
    pub fn total_duration_ms(&self, rest_after_last_round: bool) -> u64 {
        let rounds = u64::from(self.total_rounds);
        let rests = if rest_after_last_round {
            rounds
        } else {
            rounds.saturating_sub(1)
        };
        rounds
            .saturating_mul(self.work_duration_ms())
            .saturating_add(rests.saturating_mul(self.rest_duration_ms()))
    }
}

/// Stopwatch configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StopwatchConfig {
    /// Elapsed time the stopwatch shows right after `start`
    #[serde(default)]
    pub starting_offset_ms: u64,
}

/// Phase of a round or interval run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Phase {
    #[default]
    Idle,
    Work,
    Rest,
    Complete,
}

impl Phase {
    /// True while the phase is part of a run (Work or Rest)
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Work | Phase::Rest)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "Idle"),
            Phase::Work => write!(f, "Work"),
            Phase::Rest => write!(f, "Rest"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Stopwatch state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopwatchPhase {
    #[default]
    Idle,
    Running,
    Paused,
}

impl fmt::Display for StopwatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopwatchPhase::Idle => write!(f, "Idle"),
            StopwatchPhase::Running => write!(f, "Running"),
            StopwatchPhase::Paused => write!(f, "Paused"),
        }
    }
}

/// Snapshot of a round or interval engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    pub phase: Phase,
    /// 1-indexed
    pub current_round: u32,
    pub total_rounds: u32,
    pub elapsed_in_phase_ms: u64,
    pub phase_duration_ms: u64,
    pub total_elapsed_ms: u64,
    pub is_running: bool,
}

impl EngineState {
    pub fn remaining_in_phase_ms(&self) -> u64 {
        self.phase_duration_ms.saturating_sub(self.elapsed_in_phase_ms)
    }

    /// Fraction of the current phase that has elapsed (0.0..=1.0)
    pub fn phase_progress(&self) -> f64 {
        if self.phase_duration_ms == 0 {
            return if self.phase == Phase::Complete { 1.0 } else { 0.0 };
        }
        (self.elapsed_in_phase_ms as f64 / self.phase_duration_ms as f64).clamp(0.0, 1.0)
    }
}

/// One lap stamped by the stopwatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LapRecord {
    /// 0-based, insertion order
    pub index: usize,
    pub elapsed_at_lap_ms: u64,
    /// Time since the previous lap (or since start for the first lap)
    pub split_ms: u64,
}

/// Snapshot of the stopwatch engine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StopwatchState {
    pub phase: StopwatchPhase,
    pub elapsed_ms: u64,
    pub laps: Vec<LapRecord>,
    pub is_running: bool,
}

/// Audio cue kinds, each mapped to a named tone pattern on the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueKind {
    /// Short beep ahead of a phase end
    WarningBeep,
    /// Long bell
    PhaseEndBeep,
    /// Triple beep
    PhaseStartBeep,
    /// Double beep
    IntervalTransitionBeep,
}

impl fmt::Display for CueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CueKind::WarningBeep => write!(f, "warning"),
            CueKind::PhaseEndBeep => write!(f, "phase end"),
            CueKind::PhaseStartBeep => write!(f, "phase start"),
            CueKind::IntervalTransitionBeep => write!(f, "transition"),
        }
    }
}

/// A cue delivered to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueEvent {
    pub kind: CueKind,
    /// Position of the cue on the run's total-elapsed timeline
    pub fired_at_ms: u64,
}

impl CueEvent {
    /// True when the cue was crossed more than `tolerance_ms` before `now_total_ms`,
    /// e.g. during a long gap between host ticks.
    pub fn is_stale(&self, now_total_ms: u64, tolerance_ms: u64) -> bool {
        now_total_ms.saturating_sub(self.fired_at_ms) > tolerance_ms
    }
}

/// A phase change caused by a tick or command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: Phase,
    pub to: Phase,
    /// Round of the entered phase
    pub round: u32,
    /// Position of the transition on the total-elapsed timeline
    pub at_ms: u64,
}

/// Host-facing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Skip,
    Reset,
    Lap,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Start => write!(f, "start"),
            Command::Pause => write!(f, "pause"),
            Command::Resume => write!(f, "resume"),
            Command::Skip => write!(f, "skip"),
            Command::Reset => write!(f, "reset"),
            Command::Lap => write!(f, "lap"),
        }
    }
}

/// A command that was not valid in the engine's current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    pub command: Command,
    pub reason: &'static str,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rejected: {}", self.command, self.reason)
    }
}

/// Result of a command or a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update<S> {
    pub snapshot: S,
    pub cues: Vec<CueEvent>,
    pub transitions: Vec<PhaseTransition>,
    pub rejected: Option<Rejection>,
    /// Timeline position read from the clock for this update. Stays ahead of
    /// the snapshot's total once a long gap runs the session to completion.
    pub sampled_ms: Option<u64>,
}

impl<S> Update<S> {
    pub fn new(snapshot: S) -> Self {
        Self {
            snapshot,
            cues: Vec::new(),
            transitions: Vec::new(),
            rejected: None,
            sampled_ms: None,
        }
    }

    pub fn rejected(snapshot: S, command: Command, reason: &'static str) -> Self {
        Self {
            rejected: Some(Rejection { command, reason }),
            ..Self::new(snapshot)
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.rejected.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- TimerConfig ---

    #[test]
    fn config_defaults() {
        let config = TimerConfig::new(180, 60, 12);
        assert_eq!(config.label, None);
        assert!(!config.rest_after_last_round);
        assert_eq!(config.warning_lead_secs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_zero_work() {
        let err = TimerConfig::new(0, 60, 3).validate().unwrap_err();
        assert!(matches!(err, TimerError::InvalidConfig(_)));
    }

    #[test]
    fn config_rejects_zero_rest() {
        assert!(TimerConfig::new(180, 0, 3).validate().is_err());
    }

    #[test]
    fn config_rejects_zero_rounds() {
        let err = TimerConfig::new(180, 60, 0).validate().unwrap_err();
        assert!(err.to_string().contains("total_rounds"));
    }

    #[test]
    fn config_durations_in_ms() {
        let config = TimerConfig::new(180, 60, 3);
        assert_eq!(config.work_duration_ms(), 180_000);
        assert_eq!(config.rest_duration_ms(), 60_000);
        assert_eq!(config.warning_lead_ms(), 10_000);
    }

    #[test]
    fn config_total_duration() {
        let config = TimerConfig::new(180, 60, 3);
        assert_eq!(config.total_duration_ms(false), 3 * 180_000 + 2 * 60_000);
        assert_eq!(config.total_duration_ms(true), 3 * 180_000 + 3 * 60_000);
    }

    #[test]
    fn huge_config_total_duration_saturates() {
        let config = TimerConfig::new(u32::MAX, u32::MAX, u32::MAX);
        assert!(config.validate().is_ok());
        assert_eq!(config.total_duration_ms(true), u64::MAX);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let json = r#"{"work_duration_secs":20,"rest_duration_secs":10,"total_rounds":8}"#;
        let config: TimerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config, TimerConfig::new(20, 10, 8));
    }

    // --- Phase ---

    #[test]
    fn phase_default_is_idle() {
        assert_eq!(Phase::default(), Phase::Idle);
        assert_eq!(StopwatchPhase::default(), StopwatchPhase::Idle);
    }

    #[test]
    fn phase_display() {
        assert_eq!(Phase::Work.to_string(), "Work");
        assert_eq!(Phase::Complete.to_string(), "Complete");
        assert_eq!(StopwatchPhase::Paused.to_string(), "Paused");
    }

    #[test]
    fn only_work_and_rest_are_active() {
        assert!(Phase::Work.is_active());
        assert!(Phase::Rest.is_active());
        assert!(!Phase::Idle.is_active());
        assert!(!Phase::Complete.is_active());
    }

    // --- EngineState ---

    #[test]
    fn remaining_and_progress() {
        let state = EngineState {
            phase: Phase::Work,
            current_round: 1,
            total_rounds: 3,
            elapsed_in_phase_ms: 45_000,
            phase_duration_ms: 180_000,
            total_elapsed_ms: 45_000,
            is_running: true,
        };
        assert_eq!(state.remaining_in_phase_ms(), 135_000);
        assert!((state.phase_progress() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_of_complete_is_full() {
        let state = EngineState {
            phase: Phase::Complete,
            current_round: 3,
            total_rounds: 3,
            elapsed_in_phase_ms: 0,
            phase_duration_ms: 0,
            total_elapsed_ms: 660_000,
            is_running: false,
        };
        assert_eq!(state.phase_progress(), 1.0);
        assert_eq!(state.remaining_in_phase_ms(), 0);
    }

    // --- CueEvent ---

    #[test]
    fn cue_staleness() {
        let cue = CueEvent {
            kind: CueKind::WarningBeep,
            fired_at_ms: 170_000,
        };
        assert!(!cue.is_stale(170_000, 1_000));
        assert!(!cue.is_stale(171_000, 1_000));
        assert!(cue.is_stale(171_001, 1_000));
        // A timeline position behind the cue is never stale
        assert!(!cue.is_stale(100_000, 1_000));
    }

    // --- Update ---

    #[test]
    fn rejection_display() {
        let update = Update::rejected((), Command::Lap, "stopwatch is not running");
        assert!(!update.is_accepted());
        assert_eq!(
            update.rejected.unwrap().to_string(),
            "lap rejected: stopwatch is not running"
        );
    }
}
