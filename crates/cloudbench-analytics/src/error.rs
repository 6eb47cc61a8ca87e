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

//! Error types for the analytics stage.

use crate::report::ReportKind;
use cloudbench_core::CoreError;
use thiserror::Error;

/// Result alias for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors that fail one report.
#[derive(Error, Debug, Clone)]
pub enum AnalyticsError {
    /// No comparison category of the report could establish its
    /// reference point.
    #[error("{report} report: no reference point ({reason})")]
    NoReference {
        /// Affected report
        report: ReportKind,
        /// Why no reference was found
        reason: String,
    },

    /// Writing or reading failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl AnalyticsError {
    /// Create a no-reference error.
    pub fn no_reference(report: ReportKind, reason: impl Into<String>) -> Self {
        Self::NoReference {
            report,
            reason: reason.into(),
        }
    }
}
