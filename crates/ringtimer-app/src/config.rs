//! Configuration constants for ringtimer app services

/// Application metadata
pub mod app {
    /// Application name (used for config directory, etc.)
    pub const NAME: &str = "ringtimer";

    /// Settings file inside the config directory
    pub const SETTINGS_FILE: &str = "settings.json";
}

/// UI-related configuration
pub mod ui {
    /// Volume change per keypress
    pub const VOLUME_STEP: f32 = 0.1;

    /// Laps shown in the lap list
    pub const VISIBLE_LAPS: usize = 8;

    /// Redraw interval of the terminal UI
    pub const FRAME_INTERVAL_MS: u64 = 33;
}
