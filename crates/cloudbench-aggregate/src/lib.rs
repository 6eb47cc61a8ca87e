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

//! Cloudbench Aggregation
//!
//! Turns results trees of raw per-thread benchmark artifacts into one
//! canonical document.
//!
//! ```text
//! discover ─► HierarchyResolver ─► PatternExtractor ─► CanonicalDocument
//!  (walkdir)   (LUT ancestor walk)   (C/D, override, A/B, perf recovery)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cloudbench_aggregate::Aggregator;
//! use cloudbench_core::MachineLut;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let lut = MachineLut::builtin();
//! let aggregation = Aggregator::new(&lut).aggregate(&[PathBuf::from("results")])?;
//! println!("{} tests", aggregation.summary.tests);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod aggregator;
pub mod artifacts;
pub mod discover;
pub mod error;
pub mod extractor;
pub mod log_parser;
pub mod overrides;
pub mod resolver;
pub mod strategy;

pub use aggregator::{AggregateConfig, AggregateSummary, Aggregation, Aggregator};
pub use error::{AggregateError, ExtractError, ResolveError};
pub use extractor::{Extraction, PatternExtractor};
pub use overrides::{OverrideFn, OverrideRegistry};
pub use resolver::{HierarchyResolver, Resolution, ResolveMethod};
pub use strategy::{ArtifactProbe, Provenance, Strategy};
