//! Audio collaborator contract
//!
//! The engines never produce sound themselves. Hosts route `CueEvent`s to a
//! `CueSink`, which must never block and must swallow its own failures.

use std::fmt;

use crate::timer::CueKind;

use super::tone::ToneSegment;

/// Fire-and-forget tone output
pub trait CueSink: Send {
    fn play_tone(&self, frequency_hz: f32, duration_ms: u32, volume: f32);
    fn play_warning_beep(&self);
    fn play_long_beep(&self);
    fn play_triple_beep(&self);
    fn play_double_beep(&self);

    /// Master volume for the named cues (0.0..=1.0)
    fn set_volume(&self, volume: f32);

    /// Must be called from a user gesture before any tone plays
    fn unlock_audio(&self);

    fn play_cue(&self, kind: CueKind) {
        match kind {
            CueKind::WarningBeep => self.play_warning_beep(),
            CueKind::PhaseEndBeep => self.play_long_beep(),
            CueKind::PhaseStartBeep => self.play_triple_beep(),
            CueKind::IntervalTransitionBeep => self.play_double_beep(),
        }
    }
}

/// Sink used when no audio output is available
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCuePlayer;

impl CueSink for SilentCuePlayer {
    fn play_tone(&self, _frequency_hz: f32, _duration_ms: u32, _volume: f32) {}
    fn play_warning_beep(&self) {}
    fn play_long_beep(&self) {}
    fn play_triple_beep(&self) {}
    fn play_double_beep(&self) {}
    fn set_volume(&self, _volume: f32) {}
    fn unlock_audio(&self) {}
}

/// Commands sent to the audio player thread
pub enum AudioCommand {
    /// Play segments; `volume` overrides the master volume when set
    Play {
        segments: Vec<ToneSegment>,
        volume: Option<f32>,
    },
    /// Set master volume (0.0..=1.0)
    SetVolume(f32),
    /// Shut down the player thread
    Shutdown,
}

impl fmt::Debug for AudioCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioCommand::Play { segments, volume } => f
                .debug_struct("Play")
                .field("segments", &segments.len())
                .field("volume", volume)
                .finish(),
            AudioCommand::SetVolume(v) => write!(f, "SetVolume({})", v),
            AudioCommand::Shutdown => write!(f, "Shutdown"),
        }
    }
}
