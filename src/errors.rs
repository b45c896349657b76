//! Engine error taxonomy
//!
//! Every failure the capture/restore engine can report, one variant per
//! failing stage. OS status codes are carried verbatim so the caller sees
//! exactly what the display subsystem returned.

use std::path::PathBuf;
use thiserror::Error;

/// Raw status code returned by the OS display-configuration calls.
pub type OsStatus = i32;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested profile was never saved.
    #[error("profile not found: {0}")]
    NotFound(PathBuf),

    /// The profile file exists but cannot be parsed into a topology.
    #[error("profile is corrupt: {path}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The OS failed to report how many path/mode records exist.
    #[error("sizing display topology buffers failed (status {0})")]
    QuerySize(OsStatus),

    /// The OS failed to fill the allocated path/mode buffers.
    #[error("filling display topology buffers failed (status {0})")]
    QueryFill(OsStatus),

    /// The OS rejected the submitted display configuration.
    #[error("applying display configuration failed (status {0})")]
    Apply(OsStatus),

    /// A hotkey chord is already registered by another application.
    /// Non-fatal: the dispatcher skips the binding and keeps the rest.
    #[error("hotkey chord already in use: {0}")]
    HotkeyConflict(String),

    /// Reading or writing a profile file failed.
    #[error("profile i/o failed: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Built on a platform without a display-configuration backend.
    #[error("display configuration is only supported on Windows")]
    Unsupported,
}
