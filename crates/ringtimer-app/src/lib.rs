//! Ringtimer App Services
//!
//! Settings persistence, custom presets and the session controller.
//! Depends on the `ringtimer` engine crate.

pub mod config;
pub mod data;
pub mod error;
pub mod session;
