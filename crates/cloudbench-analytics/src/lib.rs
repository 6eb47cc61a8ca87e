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

//! Cloudbench Analytics
//!
//! Four comparative reports over a canonical benchmark document:
//!
//! | Report | Reference point | Value |
//! |--------|-----------------|-------|
//! | Performance | Leader of each (OS, threads, test) group | score relative to the leader |
//! | Cost | Most cost-efficient machine of each group | efficiency relative to the top |
//! | Scaling | Highest usable thread count per machine and test | percent of the reference |
//! | CSP | Each provider's arm64 instance | sibling efficiency as percent of the reference's |
//!
//! Values that cannot be computed are recorded as `"unknown"` and produce a
//! warning citing the input line and JSON pointer they concern.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cloudbench_analytics::AnalyticsEngine;
//! use cloudbench_core::read_document;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let loaded = read_document(Path::new("one_big_json.json"))?;
//! let report = AnalyticsEngine::from_loaded(&loaded).cost()?;
//! report.export_json(Path::new("cost_comparison.json"))?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod cost;
pub mod csp;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod performance;
pub mod report;
pub mod scaling;
pub mod score;
pub mod walk;

pub use cost::{CostGroup, CostRow};
pub use csp::{CspComparison, CspProvider};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use engine::{AnalyticsEngine, AnalyzeSelection, AnyReport};
pub use error::{AnalyticsError, Result};
pub use performance::{PerfGroup, PerfRow};
pub use report::{Report, ReportBody, ReportKind};
pub use scaling::ScalingCurve;
pub use score::{Basis, Direction, Score};
