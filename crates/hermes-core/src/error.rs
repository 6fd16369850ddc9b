//! Error types shared by every Hermes component.
//!
//! Errors serialize as their display string so they can cross the IPC
//! boundary to the presentation layer.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HermesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file exists but could not be parsed.
    #[error("Malformed config file {path}: {reason}")]
    MalformedConfig { path: PathBuf, reason: String },

    /// The configuration file parsed, but its top level is not an object.
    #[error("Config file {path} must contain a JSON object")]
    NotAnObject { path: PathBuf },

    #[error("Invalid asset file name: {0:?}")]
    InvalidFileName(String),

    #[error("Cannot open an empty link")]
    EmptyLink,

    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },
}

impl Serialize for HermesError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type HermesResult<T> = Result<T, HermesError>;

/// Converts a poisoned lock into [`HermesError::LockPoisoned`].
pub trait LockResultExt<T> {
    fn map_lock_err(self, context: &str) -> HermesResult<T>;
}

impl<T> LockResultExt<T> for Result<T, std::sync::PoisonError<T>> {
    fn map_lock_err(self, context: &str) -> HermesResult<T> {
        self.map_err(|_| HermesError::LockPoisoned {
            context: context.to_string(),
        })
    }
}
