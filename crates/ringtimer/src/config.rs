//! Configuration constants for the ringtimer engine

/// Cue scheduling configuration
pub mod cues {
    /// Default lead time of the warning beep before a phase ends, in seconds
    pub const DEFAULT_WARNING_LEAD_SECS: u32 = 10;
}

/// Tone synthesis configuration
pub mod audio {
    /// Output sample rate for synthesized tones (Hz)
    pub const SAMPLE_RATE: u32 = 44_100;

    /// Attack/release ramp applied to every tone to avoid clicks (milliseconds)
    pub const RAMP_MS: u32 = 5;

    /// Default playback volume (0.0..=1.0)
    pub const DEFAULT_VOLUME: f32 = 0.8;

    /// Warning beep: one short high tone
    pub const WARNING_FREQ_HZ: f32 = 880.0;
    pub const WARNING_DURATION_MS: u32 = 150;

    /// Long beep: the bell at the end of a phase or session
    pub const LONG_FREQ_HZ: f32 = 440.0;
    pub const LONG_DURATION_MS: u32 = 1_000;

    /// Triple beep: phase start
    pub const TRIPLE_FREQ_HZ: f32 = 1_000.0;
    pub const TRIPLE_DURATION_MS: u32 = 120;
    pub const TRIPLE_GAP_MS: u32 = 80;

    /// Double beep: work/rest transition
    pub const DOUBLE_FREQ_HZ: f32 = 660.0;
    pub const DOUBLE_DURATION_MS: u32 = 200;
    pub const DOUBLE_GAP_MS: u32 = 100;

    /// Bounded capacity of the player's command channel
    pub const COMMAND_QUEUE_SIZE: usize = 32;
}

/// Timing configuration for hosts driving the engines
pub mod timing {
    /// Host tick interval (milliseconds). Correctness does not depend on it.
    pub const TICK_INTERVAL_MS: u64 = 50;

    /// Cues crossed longer ago than this are reported but not played
    pub const STALE_CUE_TOLERANCE_MS: u64 = 1_000;

    /// Maximum number of laps kept by the stopwatch
    pub const MAX_LAPS: usize = 99;
}
