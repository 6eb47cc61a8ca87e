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

//! Test fixtures.
//!
//! - [`builders`]: canonical documents and test entries built in memory
//! - [`tree`]: raw results trees written to a temporary directory
//! - [`logs`]: sample execution logs

pub mod builders;
pub mod logs;
pub mod tree;

pub use builders::{DocumentBuilder, EntryBuilder, FIXTURE_DATE, FIXTURE_VERSION};
pub use tree::{BenchDir, ResultsTree, StructuredExport};
