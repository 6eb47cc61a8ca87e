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

//! Structured error types for the Cloudbench CLI.

use cloudbench_aggregate::AggregateError;
use cloudbench_analytics::AnalyticsError;
use cloudbench_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for CLI operations.
///
/// # Examples
///
/// ```rust
/// use cloudbench_cli::error::CliError;
///
/// let err = CliError::output_exists("host.json");
/// assert!(err.to_string().contains("host.json"));
/// ```
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// Reading, parsing, merging or writing a document failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Aggregation could not start or a search root was inaccessible.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    /// A report failed.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    /// The output exists and overwriting was declined.
    #[error("Output '{path}' already exists; use --force to overwrite")]
    OutputExists {
        /// The existing output path
        path: PathBuf,
    },

    /// The output location cannot be used.
    #[error("Invalid output '{path}': {message}")]
    InvalidOutput {
        /// The output path
        path: PathBuf,
        /// Why it cannot be used
        message: String,
    },

    /// Every requested report failed.
    #[error("None of the {requested} requested reports could be generated")]
    NoReports {
        /// Number of reports requested
        requested: usize,
    },
}

impl CliError {
    /// Create an output-exists error.
    pub fn output_exists(path: impl Into<PathBuf>) -> Self {
        Self::OutputExists { path: path.into() }
    }

    /// Create an invalid-output error.
    pub fn invalid_output(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidOutput {
            path: path.into(),
            message: message.into(),
        }
    }
}
