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

//! Error types for the aggregation stage.

use cloudbench_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole aggregation pass.
#[derive(Error, Debug, Clone)]
pub enum AggregateError {
    /// A search root does not exist or cannot be canonicalized.
    #[error("Search root '{path}' is not accessible: {message}")]
    RootNotFound {
        /// The root as given
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// A search root could not be traversed.
    #[error("Failed to walk '{path}': {message}")]
    Walk {
        /// The directory being walked
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// Shared document error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Reasons a benchmark directory cannot be placed in the hierarchy.
///
/// These skip one directory; they never abort the pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The directory is not below the search root.
    #[error("'{dir}' is not below search root '{root}'")]
    OutsideRoot {
        /// Benchmark directory
        dir: PathBuf,
        /// Search root
        root: PathBuf,
    },

    /// A machine directory was found but no OS directory sits between it
    /// and the category.
    #[error("'{dir}': no OS directory between machine '{machine}' and the category")]
    MissingOs {
        /// Benchmark directory
        dir: PathBuf,
        /// Machine that was matched
        machine: String,
    },

    /// Neither the machine table nor the path layout identifies a machine.
    #[error("'{dir}': no machine directory found and the path is too shallow for machine/os/category/benchmark")]
    Unresolvable {
        /// Benchmark directory
        dir: PathBuf,
    },
}

/// Reasons one thread count of a benchmark cannot be extracted.
#[derive(Error, Debug, Clone)]
pub enum ExtractError {
    /// An artifact exists but is not valid for its format.
    #[error("Malformed artifact '{path}': {message}")]
    MalformedArtifact {
        /// Artifact path
        path: PathBuf,
        /// What is wrong
        message: String,
    },

    /// Reading an artifact failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ExtractError {
    /// Create a malformed-artifact error.
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedArtifact {
            path: path.into(),
            message: message.into(),
        }
    }
}
