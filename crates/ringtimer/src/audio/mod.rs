//! Audio cue output
//!
//! Tone synthesis and the player the host routes `CueEvent`s to.

pub mod player;
pub mod tone;
pub mod types;

pub use player::AudioCuePlayer;
pub use tone::{cue_pattern, ToneSegment, ToneSequence};
pub use types::{AudioCommand, CueSink, SilentCuePlayer};
