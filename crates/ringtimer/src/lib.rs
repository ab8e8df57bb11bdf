//! Ringtimer: martial arts workout timer engine
//!
//! Round, interval and stopwatch timing with drift-free elapsed time and
//! exactly-once audio cues.
//!
//! ## Quick start
//!
//! ```
//! use ringtimer::presets::BOXING;
//! use ringtimer::timer::{RoundTimerEngine, TimerEngine};
//!
//! let mut engine = RoundTimerEngine::new(BOXING.to_config()).unwrap();
//! engine.start(0);
//! let update = engine.tick(185_000);
//! assert_eq!(update.snapshot.elapsed_in_phase_ms, 5_000);
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod format;
pub mod presets;
pub mod timer;
