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

//! Cloudbench Core
//!
//! Shared model for the aggregation and analytics stages: the machine
//! lookup table, the canonical result document, sentinel values, document
//! merging and bounded/atomic file I/O.
//!
//! ## Quick Start
//!
//! ```rust
//! use cloudbench_core::{BenchmarkLocation, CanonicalDocument, MachineLut, ThreadEntry};
//!
//! let lut = MachineLut::builtin();
//! let record = lut.lookup("m8g.xlarge");
//! let location = BenchmarkLocation {
//!     machine: "m8g.xlarge".to_string(),
//!     os: "Ubuntu_24_04".to_string(),
//!     category: "Processor".to_string(),
//!     benchmark: "coremark-1.0.1".to_string(),
//! };
//!
//! let mut doc = CanonicalDocument::default();
//! doc.insert_thread(&record, &location, 4, ThreadEntry::default());
//! assert_eq!(doc.thread_entry_count(), 1);
//! ```

#![warn(missing_docs)]

pub mod document;
pub mod error;
pub mod generation;
pub mod io;
pub mod lut;
pub mod merge;
pub mod naming;
pub mod sentinel;
pub mod source_map;
pub mod units;

pub use document::{
    cost_usd, BenchmarkLocation, BenchmarkNode, BenchmarkRef, CanonicalDocument, CategoryNode,
    MachineNode, OsNode, PerfStat, TestResultEntry, ThreadEntry, GENERATION_LOG_KEY,
};
pub use error::{CoreError, Result};
pub use generation::{version_tag, GenerationLog};
pub use io::{read_document, write_atomic, write_json_atomic, LoadedDocument};
pub use lut::{Csp, MachineLut, MachineRecord};
pub use merge::{merge_documents, MergeStats};
pub use naming::{assign_keys, NamedResult};
pub use sentinel::{round_to, Assessed, Reading, NOT_AVAILABLE, UNKNOWN};
pub use source_map::{pointer, SourceMap};
pub use units::{finite, is_time_unit, parse_finite, seconds_per_unit};
