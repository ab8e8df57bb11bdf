//! Session controller
//!
//! Owns the active engine, the clock and the cue output, and processes
//! commands from the front end through a single crossbeam channel. Between
//! commands it ticks the engine on a fixed interval and publishes a
//! `SessionSnapshot` behind `Arc<Mutex<_>>`.

use std::borrow::Cow;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use tracing::{debug, trace};

use ringtimer::audio::CueSink;
use ringtimer::config::timing::{STALE_CUE_TOLERANCE_MS, TICK_INTERVAL_MS};
use ringtimer::timer::{Clock, Command, Phase, StopwatchConfig, StopwatchPhase, TimerConfig};

use crate::error::Result;

use super::engine::{ActiveEngine, Outcome};
use super::state::{EngineView, SessionCommand, SessionSetup, SessionSnapshot, TimerMode};

pub struct SessionController {
    cmd_rx: Receiver<SessionCommand>,
    shared_state: Arc<Mutex<SessionSnapshot>>,
    clock: Box<dyn Clock>,
    sink: Box<dyn CueSink>,
    engine: ActiveEngine,
    /// Last setup used for each mode, so switching back restores it
    round_config: TimerConfig,
    interval_config: TimerConfig,
    stopwatch_config: StopwatchConfig,
    label: Option<String>,
    volume: f32,
    muted: bool,
    audio_unlocked: bool,
}

impl SessionController {
    /// Create a controller with an idle engine for `setup`.
    ///
    /// `round` and `interval` are the configurations used when switching to
    /// those modes later; `setup` overrides the one for its own mode.
    pub fn new(
        cmd_rx: Receiver<SessionCommand>,
        shared_state: Arc<Mutex<SessionSnapshot>>,
        clock: Box<dyn Clock>,
        sink: Box<dyn CueSink>,
        setup: SessionSetup,
        defaults: (TimerConfig, TimerConfig),
    ) -> Result<Self> {
        let engine = ActiveEngine::build(&setup)?;
        let (round_config, interval_config) = defaults;
        let mut controller = Self {
            cmd_rx,
            shared_state,
            clock,
            sink,
            engine,
            round_config,
            interval_config,
            stopwatch_config: StopwatchConfig::default(),
            label: setup.label().map(str::to_string),
            volume: ringtimer::config::audio::DEFAULT_VOLUME,
            muted: false,
            audio_unlocked: false,
        };
        controller.remember(setup);
        controller.publish(|state| state.status_text = Cow::Borrowed("Ready"));
        Ok(controller)
    }

    /// Apply initial audio preferences
    pub fn with_audio(mut self, volume: f32, muted: bool) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self.muted = muted;
        self.sink.set_volume(self.volume);
        self.publish(|_| {});
        self
    }

    /// Run the controller loop (blocking, call from a dedicated thread)
    pub fn run(&mut self) {
        let interval = Duration::from_millis(TICK_INTERVAL_MS);
        loop {
            match self.cmd_rx.recv_timeout(interval) {
                Ok(cmd) => {
                    if self.handle_command(cmd) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.tick();
        }
        debug!("session controller stopped");
    }

    /// Handle a single command. Returns true if the loop should exit.
    pub fn handle_command(&mut self, cmd: SessionCommand) -> bool {
        let now = self.clock.now_ms();
        match cmd {
            SessionCommand::Shutdown => return true,

            SessionCommand::Start => self.apply(Command::Start, now),
            SessionCommand::Pause => self.apply(Command::Pause, now),
            SessionCommand::Resume => self.apply(Command::Resume, now),
            SessionCommand::Skip => self.apply(Command::Skip, now),
            SessionCommand::Reset => self.apply(Command::Reset, now),
            SessionCommand::Lap => self.apply(Command::Lap, now),
            SessionCommand::Toggle => {
                let view = self.engine.view();
                let command = if view.is_idle() || view.is_complete() {
                    Command::Start
                } else if view.is_running() {
                    Command::Pause
                } else {
                    Command::Resume
                };
                self.apply(command, now);
            }

            SessionCommand::SwitchMode(mode) => {
                let setup = match mode {
                    TimerMode::Round => SessionSetup::Round(self.round_config.clone()),
                    TimerMode::Interval => SessionSetup::Interval(self.interval_config.clone()),
                    TimerMode::Stopwatch => SessionSetup::Stopwatch(self.stopwatch_config),
                };
                self.replace_engine(setup);
            }
            SessionCommand::Configure(setup) => self.replace_engine(setup),

            SessionCommand::UnlockAudio => {
                if !self.audio_unlocked {
                    self.sink.unlock_audio();
                    self.audio_unlocked = true;
                    debug!("audio unlocked");
                    self.publish(|_| {});
                }
            }
            SessionCommand::SetVolume(vol) => {
                self.volume = vol.clamp(0.0, 1.0);
                // Changing the volume to something audible unmutes
                if self.muted && self.volume > 0.0 {
                    self.muted = false;
                }
                self.sink.set_volume(self.volume);
                self.publish(|_| {});
            }
            SessionCommand::Mute => {
                self.muted = true;
                self.publish(|_| {});
            }
            SessionCommand::Unmute => {
                self.muted = false;
                self.publish(|_| {});
            }
        }
        false
    }

    /// Advance the engine to the clock's current time
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        let outcome = self.engine.tick(now);
        self.route(outcome, None);
    }

    fn apply(&mut self, command: Command, now_ms: u64) {
        let outcome = self.engine.apply(command, now_ms);
        self.route(outcome, Some(command));
    }

    /// Discard the current engine and build a fresh idle one
    fn replace_engine(&mut self, setup: SessionSetup) {
        match ActiveEngine::build(&setup) {
            Ok(engine) => {
                debug!(from = %self.engine.mode(), to = %engine.mode(), "mode switch");
                self.engine = engine;
                self.label = setup.label().map(str::to_string);
                self.remember(setup);
                self.publish(|state| {
                    state.last_rejection = None;
                    state.last_cue = None;
                    state.status_text = Cow::Borrowed("Ready");
                });
            }
            Err(e) => {
                debug!(error = %e, "mode switch refused");
                let message = e.to_string();
                self.publish(|state| state.status_text = Cow::Owned(message));
            }
        }
    }

    fn remember(&mut self, setup: SessionSetup) {
        match setup {
            SessionSetup::Round(config) => self.round_config = config,
            SessionSetup::Interval(config) => self.interval_config = config,
            SessionSetup::Stopwatch(config) => self.stopwatch_config = config,
        }
    }

    /// Play fresh cues, count the rest, then publish the new view
    fn route(&mut self, outcome: Outcome, command: Option<Command>) {
        let mut played = 0;
        let mut dropped = 0;
        let mut last = None;
        for cue in &outcome.cues {
            if self.muted || cue.is_stale(outcome.now_total_ms, STALE_CUE_TOLERANCE_MS) {
                trace!(cue = %cue.kind, fired_at_ms = cue.fired_at_ms, "cue not played");
                dropped += 1;
                continue;
            }
            // Output failures are swallowed by the sink
            self.sink.play_cue(cue.kind);
            played += 1;
            last = Some(*cue);
        }

        let status = status_text(&outcome.view);
        let view = outcome.view;
        let rejected = outcome.rejected;
        self.publish(move |state| {
            state.view = view;
            state.cues_played += played;
            state.cues_dropped += dropped;
            if last.is_some() {
                state.last_cue = last;
            }
            if command.is_some() {
                state.last_rejection = rejected;
            }
            state.status_text = status;
        });
    }

    fn publish(&self, update: impl FnOnce(&mut SessionSnapshot)) {
        let mut state = self.shared_state.lock().unwrap_or_else(|e| e.into_inner());
        state.mode = self.engine.mode();
        state.label.clone_from(&self.label);
        state.volume = self.volume;
        state.is_muted = self.muted;
        state.audio_unlocked = self.audio_unlocked;
        state.view = self.engine.view();
        update(&mut state);
    }
}

fn status_text(view: &EngineView) -> Cow<'static, str> {
    match view {
        EngineView::Timer(s) => match s.phase {
            Phase::Idle => Cow::Borrowed("Ready"),
            Phase::Complete => Cow::Borrowed("Session complete"),
            Phase::Work | Phase::Rest if !s.is_running => Cow::Borrowed("Paused"),
            Phase::Work => Cow::Owned(format!("Round {} of {}", s.current_round, s.total_rounds)),
            Phase::Rest => Cow::Owned(format!(
                "Rest after round {} of {}",
                s.current_round, s.total_rounds
            )),
        },
        EngineView::Stopwatch(s) => match s.phase {
            StopwatchPhase::Idle => Cow::Borrowed("Ready"),
            StopwatchPhase::Running => Cow::Borrowed("Running"),
            StopwatchPhase::Paused => Cow::Borrowed("Paused"),
        },
    }
}
