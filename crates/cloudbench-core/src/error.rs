// Dweve Cloudbench - Cross-cloud benchmark aggregation and analytics
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Structured error types shared by every Cloudbench crate.
//!
//! Library operations return `Result<T, CoreError>`; downstream crates wrap
//! this type with `#[from]` in their own error enums.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while loading, validating, merging or writing documents.
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    /// I/O operation failed (file read, write, rename or metadata access).
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// File size exceeds the configured limit.
    #[error("File '{path}' is too large ({actual} bytes). Maximum allowed: {max} bytes ({max_mb} MB)")]
    FileTooLarge {
        /// The file path that exceeded the limit
        path: PathBuf,
        /// The actual file size in bytes
        actual: u64,
        /// The maximum allowed file size in bytes
        max: u64,
        /// The maximum allowed file size in MB (for display)
        max_mb: u64,
    },

    /// The document is not syntactically valid JSON or does not have the
    /// canonical shape.
    #[error("Invalid document '{path}' at line {line}, column {column}: {message}")]
    InvalidDocument {
        /// Document path (or `<memory>` for in-memory text)
        path: PathBuf,
        /// 1-based line of the failure
        line: usize,
        /// 1-based column of the failure
        column: usize,
        /// Parser message
        message: String,
    },

    /// The generation log header is missing or malformed.
    #[error("Invalid generation log in '{path}': {message}")]
    InvalidGenerationLog {
        /// Document path
        path: PathBuf,
        /// What is wrong with the header
        message: String,
    },

    /// Two documents produced by different extraction logic were merged.
    #[error("Generation log version mismatch: '{expected}' vs '{found}' ({path})")]
    VersionMismatch {
        /// Version tag of the first merge input
        expected: String,
        /// Version tag of the offending input
        found: String,
        /// Label of the offending input
        path: PathBuf,
    },

    /// Nothing to merge.
    #[error("No documents given to merge")]
    EmptyMerge,

    /// A custom machine table could not be parsed.
    #[error("Invalid machine table: {0}")]
    InvalidLut(String),

    /// JSON serialization failed.
    #[error("JSON format error: {message}")]
    JsonFormat {
        /// The error message
        message: String,
    },
}

impl CoreError {
    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a file-too-large error.
    pub fn file_too_large(path: impl Into<PathBuf>, actual: u64, max: u64) -> Self {
        Self::FileTooLarge {
            path: path.into(),
            actual,
            max,
            max_mb: max / (1024 * 1024),
        }
    }

    /// Create an invalid-document error from a `serde_json` failure.
    pub fn invalid_document(path: impl Into<PathBuf>, source: &serde_json::Error) -> Self {
        Self::InvalidDocument {
            path: path.into(),
            line: source.line(),
            column: source.column(),
            message: source.to_string(),
        }
    }

    /// Create an invalid-generation-log error.
    pub fn invalid_generation_log(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidGenerationLog {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(source: serde_json::Error) -> Self {
        Self::JsonFormat {
            message: source.to_string(),
        }
    }
}
