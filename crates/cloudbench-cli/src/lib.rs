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

//! Cloudbench CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! - **aggregate**: Scan results trees (`-D/--dir`, repeatable) into one
//!   canonical document, or merge existing documents (`-M/--merge`)
//! - **analyze**: Generate performance (`--perf`), cost (`--cost`),
//!   thread-scaling (`--th`) and CSP (`--csp`) reports
//!
//! # Examples
//!
//! ```bash
//! # Aggregate two machines' results into one document
//! cloudbench aggregate -D results/m8g.xlarge -D results/c4a-standard-4 -O one_big_json.json
//!
//! # Merge per-machine documents
//! cloudbench aggregate -M m8g.json c4a.json -O one_big_json.json
//!
//! # Cost and scaling reports into ./reports
//! cloudbench analyze --cost --th --output reports
//! ```
//!
//! # Logging
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG` (for example
//! `RUST_LOG=cloudbench_aggregate=debug`) to change the default `info`
//! level. Summaries go to stdout.

pub mod cli;
pub mod commands;
pub mod error;
