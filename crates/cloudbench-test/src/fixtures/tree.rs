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

//! On-disk results trees.
//!
//! [`ResultsTree`] owns a temporary directory and writes per-thread raw
//! artifacts in the layout the benchmark runner leaves behind:
//! `N-thread.log`, `N-thread.json`, `N-thread_perf_summary.json`,
//! `N-thread_freq_start.txt` and `N-thread_freq_end.txt`.

use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary results tree.
#[derive(Debug)]
pub struct ResultsTree {
    dir: TempDir,
}

impl ResultsTree {
    /// Creates an empty tree.
    ///
    /// # Panics
    ///
    /// Panics when the temporary directory cannot be created.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// The tree root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `rel` under the root.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Creates (if needed) the benchmark directory at `rel`.
    pub fn bench(&self, rel: &str) -> BenchDir {
        let path = self.path(rel);
        fs::create_dir_all(&path).expect("failed to create benchmark dir");
        BenchDir { path }
    }
}

impl Default for ResultsTree {
    fn default() -> Self {
        Self::new()
    }
}

/// A benchmark directory inside a [`ResultsTree`].
#[derive(Debug, Clone)]
pub struct BenchDir {
    path: PathBuf,
}

impl BenchDir {
    /// The directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `N-thread.log`.
    pub fn log(&self, thread: u32, text: &str) -> &Self {
        self.write(&format!("{thread}-thread.log"), text)
    }

    /// Writes `N-thread.json`.
    pub fn structured(&self, thread: u32, export: &Value) -> &Self {
        self.write(&format!("{thread}-thread.json"), &export.to_string())
    }

    /// Writes `N-thread_perf_summary.json` with an elapsed time and IPC.
    pub fn perf_summary(&self, thread: u32, elapsed_sec: f64, ipc: f64) -> &Self {
        let summary = json!({
            "elapsed_time_sec": elapsed_sec,
            "ipc": ipc,
            "total_cycles": 1_000_000u64,
            "total_instructions": 2_000_000u64,
            "cpu_utilization_percent": 99.5,
        });
        self.write(&format!("{thread}-thread_perf_summary.json"), &summary.to_string())
    }

    /// Writes start and end frequency samples, one core per line.
    pub fn freq(&self, thread: u32, start: &[f64], end: &[f64]) -> &Self {
        let render = |values: &[f64]| {
            values
                .iter()
                .enumerate()
                .map(|(core, mhz)| format!("cpu{core}: {mhz}\n"))
                .collect::<String>()
        };
        self.write(&format!("{thread}-thread_freq_start.txt"), &render(start));
        self.write(&format!("{thread}-thread_freq_end.txt"), &render(end))
    }

    /// Writes an arbitrary file.
    pub fn write(&self, name: &str, contents: &str) -> &Self {
        fs::write(self.path.join(name), contents).expect("failed to write artifact");
        self
    }
}

/// Builder for structured result exports.
///
/// # Examples
///
/// ```
/// use cloudbench_test::fixtures::tree::StructuredExport;
///
/// let export = StructuredExport::new()
///     .result("r1", "CoreMark", "", "Iterations/Sec", 100.0, &[99.0, 101.0], &[10.0, 12.0])
///     .build();
/// assert!(export["results"]["r1"]["results"].is_object());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StructuredExport {
    results: Map<String, Value>,
}

impl StructuredExport {
    /// Creates an empty export.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one result. Empty `raw` or `run_times` slices are omitted.
    #[allow(clippy::too_many_arguments)]
    pub fn result(
        mut self,
        id: &str,
        title: &str,
        description: &str,
        scale: &str,
        value: f64,
        raw: &[f64],
        run_times: &[f64],
    ) -> Self {
        let mut system = Map::new();
        system.insert("value".to_string(), json!(value));
        if !raw.is_empty() {
            system.insert("raw_values".to_string(), json!(raw));
        }
        if !run_times.is_empty() {
            system.insert("test_run_times".to_string(), json!(run_times));
        }
        self.results.insert(
            id.to_string(),
            json!({
                "title": title,
                "description": description,
                "scale": scale,
                "results": { "cloudbench": Value::Object(system) },
            }),
        );
        self
    }

    /// Builds the JSON value.
    pub fn build(self) -> Value {
        json!({ "results": Value::Object(self.results) })
    }
}
