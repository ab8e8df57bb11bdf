//! JSON file storage
//!
//! Path-based load/save used by settings, plus wrappers resolving names
//! against the application config directory.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::config::app::NAME;
use crate::error::{AppError, Result};

/// Application config directory (`<config>/ringtimer`)
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir().map(|p| p.join(NAME)).ok_or_else(|| {
        AppError::Config(
            "Could not determine config directory. HOME environment variable may not be set."
                .to_string(),
        )
    })
}

/// Path of a file in the config directory
pub fn data_path(filename: &str) -> Result<PathBuf> {
    Ok(config_dir()?.join(filename))
}

/// Map an I/O failure to a message naming the operation and path
fn io_error(action: &str, path: &Path, e: io::Error) -> AppError {
    let msg = match e.kind() {
        ErrorKind::PermissionDenied => format!("Permission denied: cannot {} {:?}", action, path),
        ErrorKind::ReadOnlyFilesystem => {
            format!("Cannot {} {:?}: filesystem is read-only", action, path)
        }
        _ => format!("Failed to {} {:?}: {}", action, path, e),
    };
    AppError::Config(msg)
}

/// Load JSON from `path`.
///
/// A missing or blank file yields `None`; unreadable or malformed content is an error.
pub fn load_from<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error("read", path, e)),
    };
    if content.trim().is_empty() {
        return Ok(None);
    }
    let data = serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("Failed to parse {:?}: {}", path, e)))?;
    Ok(Some(data))
}

/// Save pretty JSON to `path`, creating parent directories.
///
/// Writes a sibling temp file first and renames it over the target, so a
/// crash mid-write never leaves a truncated file behind.
pub fn save_to<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error("create directory", parent, e))?;
    }

    let content = serde_json::to_string_pretty(data)
        .map_err(|e| AppError::Config(format!("Failed to serialize data: {}", e)))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content).map_err(|e| io_error("write to", &tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        io_error("replace", path, e)
    })?;
    debug!(?path, "saved");
    Ok(())
}

/// Delete `path`; a missing file is not an error
pub fn delete_at(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error("delete", path, e)),
    }
}

/// Load a file from the config directory
pub fn load<T: DeserializeOwned>(filename: &str) -> Result<Option<T>> {
    load_from(&data_path(filename)?)
}

/// Save a file to the config directory, creating it if needed
pub fn save<T: Serialize>(filename: &str, data: &T) -> Result<()> {
    save_to(&data_path(filename)?, data)
}
