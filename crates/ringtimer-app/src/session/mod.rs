//! Timer sessions
//!
//! A session owns one engine at a time and drives it from front-end
//! commands and a fixed tick.

pub mod controller;
pub mod engine;
pub mod state;

pub use controller::SessionController;
pub use engine::{ActiveEngine, Outcome};
pub use state::{EngineView, SessionCommand, SessionSetup, SessionSnapshot, TimerMode};
