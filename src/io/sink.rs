// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Destinations for finished documents

use crate::error::{ExportError, ExportResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Something that accepts a finished T3D document
pub trait Sink {
    fn write(&mut self, text: &str) -> ExportResult<()>;
}

/// Keeps the last written document in memory
#[derive(Debug, Default)]
pub struct StringSink {
    pub contents: Option<String>,
}

impl StringSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sink for StringSink {
    fn write(&mut self, text: &str) -> ExportResult<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// Writes the document to a file, replacing its contents
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn write(&mut self, text: &str) -> ExportResult<()> {
        debug!("Writing {} bytes to {:?}", text.len(), self.path);
        std::fs::write(&self.path, text).map_err(|source| ExportError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Prints the document to standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn write(&mut self, text: &str) -> ExportResult<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{text}")
            .and_then(|_| handle.flush())
            .map_err(|source| ExportError::Io {
                path: PathBuf::from("<stdout>"),
                source,
            })
    }
}
