//! Audio cue player
//!
//! Runs tone playback on a dedicated thread, accepting commands via a
//! bounded crossbeam channel. Every request is fire-and-forget: a full
//! queue, a locked player or a dead output thread drops the cue and logs it,
//! never touching timer state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use rodio::{DeviceSinkBuilder, Player};
use tracing::{debug, trace, warn};

use crate::config::audio::{COMMAND_QUEUE_SIZE, DEFAULT_VOLUME};
use crate::error::{Result, TimerError};
use crate::timer::CueKind;

use super::tone::{cue_pattern, ToneSegment, ToneSequence};
use super::types::{AudioCommand, CueSink};

/// Owned audio output with an explicit lifecycle: `acquire`, `unlock_audio`,
/// then `shutdown` (or drop).
pub struct AudioCuePlayer {
    cmd_tx: Sender<AudioCommand>,
    unlocked: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl AudioCuePlayer {
    /// Open the default output device on a new player thread.
    ///
    /// Blocks until the output is initialized (or fails). The player starts
    /// locked; nothing plays until `unlock_audio`.
    pub fn acquire() -> Result<Self> {
        let (cmd_tx, cmd_rx) = bounded::<AudioCommand>(COMMAND_QUEUE_SIZE);
        let (init_tx, init_rx) = bounded::<std::result::Result<(), String>>(1);
        let unlocked = Arc::new(AtomicBool::new(false));
        let unlocked_thread = unlocked.clone();

        let thread = thread::Builder::new()
            .name("audio-cues".to_string())
            .spawn(move || {
                Self::run(cmd_rx, init_tx, unlocked_thread);
            })
            .map_err(|e| TimerError::Audio(format!("Failed to spawn audio thread: {}", e)))?;

        let init_result = init_rx
            .recv()
            .map_err(|_| TimerError::Audio("Audio thread terminated during init".to_string()))?;
        init_result.map_err(TimerError::Audio)?;

        debug!("audio cue player acquired");
        Ok(Self {
            cmd_tx,
            unlocked,
            thread: Some(thread),
        })
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked.load(Ordering::SeqCst)
    }

    /// Release the output device (consumes self)
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = self.cmd_tx.send(AudioCommand::Shutdown);
            let _ = thread.join();
        }
    }

    fn send(&self, cmd: AudioCommand) {
        match self.cmd_tx.try_send(cmd) {
            Ok(()) => {}
            Err(TrySendError::Full(cmd)) => warn!(?cmd, "audio queue full, cue dropped"),
            Err(TrySendError::Disconnected(cmd)) => {
                warn!(?cmd, "audio thread gone, cue dropped")
            }
        }
    }

    fn play_pattern(&self, kind: CueKind) {
        self.send(AudioCommand::Play {
            segments: cue_pattern(kind),
            volume: None,
        });
    }

    /// The player's main loop, running on the dedicated thread
    fn run(
        cmd_rx: Receiver<AudioCommand>,
        init_tx: Sender<std::result::Result<(), String>>,
        unlocked: Arc<AtomicBool>,
    ) {
        // Create audio output on this thread (cpal streams may be !Send)
        let mut stream = match DeviceSinkBuilder::open_default_sink() {
            Ok(s) => s,
            Err(e) => {
                let _ = init_tx.send(Err(format!("Failed to open audio output: {}", e)));
                return;
            }
        };
        stream.log_on_drop(false);

        // `stream` must be declared before `sink` so Rust drops sink first
        let sink = Player::connect_new(stream.mixer());

        let _ = init_tx.send(Ok(()));

        let mut master_volume = DEFAULT_VOLUME;

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                AudioCommand::Play { segments, volume } => {
                    if !unlocked.load(Ordering::SeqCst) {
                        trace!("audio locked, cue dropped");
                        continue;
                    }
                    let source = ToneSequence::new(segments, volume.unwrap_or(master_volume));
                    sink.append(source);
                    sink.play();
                }
                AudioCommand::SetVolume(v) => {
                    master_volume = v.clamp(0.0, 1.0);
                }
                AudioCommand::Shutdown => break,
            }
        }

        sink.stop();
    }
}

impl CueSink for AudioCuePlayer {
    fn play_tone(&self, frequency_hz: f32, duration_ms: u32, volume: f32) {
        self.send(AudioCommand::Play {
            segments: vec![ToneSegment::tone(frequency_hz, duration_ms)],
            volume: Some(volume),
        });
    }

    fn play_warning_beep(&self) {
        self.play_pattern(CueKind::WarningBeep);
    }

    fn play_long_beep(&self) {
        self.play_pattern(CueKind::PhaseEndBeep);
    }

    fn play_triple_beep(&self) {
        self.play_pattern(CueKind::PhaseStartBeep);
    }

    fn play_double_beep(&self) {
        self.play_pattern(CueKind::IntervalTransitionBeep);
    }

    fn set_volume(&self, volume: f32) {
        self.send(AudioCommand::SetVolume(volume));
    }

    fn unlock_audio(&self) {
        if !self.unlocked.swap(true, Ordering::SeqCst) {
            debug!("audio unlocked");
        }
    }
}

impl Drop for AudioCuePlayer {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}
