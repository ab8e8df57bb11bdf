//! Data persistence
//!
//! Settings and custom presets stored as JSON in the config directory.

pub mod settings;
pub mod storage;

pub use settings::{CustomPreset, ResolvedPreset, Settings};
pub use storage::{config_dir, data_path, load, save};
