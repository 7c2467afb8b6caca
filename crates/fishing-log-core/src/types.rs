// SPDX-License-Identifier: AGPL-3.0
// Fishing Log Core - Type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fill percentage at which a storage warning is raised by default
pub const DEFAULT_FILL_WARNING_PERCENT: f64 = 95.0;

/// Application settings (frontend-agnostic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Directory holding saved_data.json and fish_data.json.
    /// None means the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Fill percentage at which a storage warning is shown
    #[serde(default = "default_fill_warning_percent")]
    pub fill_warning_percent: f64,
}

fn default_fill_warning_percent() -> f64 {
    DEFAULT_FILL_WARNING_PERCENT
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            fill_warning_percent: default_fill_warning_percent(),
        }
    }
}

impl AppSettings {
    /// Resolve the data directory: explicit override, then settings, then platform default
    pub fn resolve_data_dir(&self, override_dir: Option<PathBuf>) -> Result<PathBuf, AppError> {
        if let Some(dir) = override_dir.or_else(|| self.data_dir.clone()) {
            return Ok(dir);
        }

        crate::project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| AppError::FileIo("Could not determine data directory".to_string()))
    }
}

/// Coarse classification of an [`AppError`], for frontends that style by kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Blank or unparseable user input
    Validation,
    /// An operation would break a weight-capacity limit
    Capacity,
    /// The requested operation does not apply to the current state
    State,
    /// Loading or saving a document failed
    Persistence,
}

/// Error types for the application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Not enough space: {available_kg:.2} kg available, tried to add {requested_kg:.2} kg")]
    CapacityExceeded { available_kg: f64, requested_kg: f64 },

    #[error("Cannot set limit to {limit_kg:.1} kg: current weight is {current_kg:.2} kg")]
    LimitBelowContents { limit_kg: f64, current_kg: f64 },

    #[error("No active storage")]
    NoActiveStorage,

    #[error("Cannot delete the last storage")]
    LastStorage,

    #[error("A storage named '{0}' already exists")]
    DuplicateStorageName(String),

    #[error("Storage not found: {0}")]
    StorageNotFound(String),

    #[error("Fish not found: {0}")]
    FishNotFound(String),

    #[error("No fish to transfer")]
    NothingToTransfer,

    #[error("No fish to sell")]
    NothingToSell,

    #[error("File I/O error: {0}")]
    FileIo(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::CapacityExceeded { .. } | Self::LimitBelowContents { .. } => ErrorKind::Capacity,
            Self::NoActiveStorage
            | Self::LastStorage
            | Self::DuplicateStorageName(_)
            | Self::StorageNotFound(_)
            | Self::FishNotFound(_)
            | Self::NothingToTransfer
            | Self::NothingToSell => ErrorKind::State,
            Self::FileIo(_) | Self::Serialization(_) | Self::MalformedRecord(_) => {
                ErrorKind::Persistence
            }
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileIo(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
