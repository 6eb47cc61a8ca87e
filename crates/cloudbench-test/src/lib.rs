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

//! Shared test fixtures for Cloudbench crates.
//!
//! # Quick Start
//!
//! ```rust
//! use cloudbench_test::fixtures::{logs, DocumentBuilder, EntryBuilder, ResultsTree};
//!
//! // A raw results tree on disk
//! let tree = ResultsTree::new();
//! tree.bench("m8g.xlarge/Ubuntu_24_04/Processor/coremark-1.0.1")
//!     .log(4, &logs::single_result("CoreMark 1.0", &[1234.56], 1234.56, "Iterations/Sec"));
//!
//! // A canonical document in memory
//! let doc = DocumentBuilder::new()
//!     .test("m8g.xlarge", "coremark-1.0.1", 4, "CoreMark", EntryBuilder::value(1.0, "ops/s"))
//!     .build();
//! assert_eq!(doc.machines.len(), 1);
//! ```

pub mod fixtures;
