// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for brush export

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while exporting or loading geometry
#[derive(Debug, Error)]
pub enum ExportError {
    /// No eligible mesh was supplied, or the mesh is malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Export settings are outside their accepted range
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Building the output text failed
    #[error("Failed to format T3D output")]
    Format(#[from] std::fmt::Error),

    /// Reading or writing a file failed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A scene file could not be parsed
    #[error("Failed to parse {path:?}: {details}")]
    Parse { path: PathBuf, details: String },
}

impl ExportError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Result type for export operations
pub type ExportResult<T> = std::result::Result<T, ExportError>;
