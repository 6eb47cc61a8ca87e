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

//! Builder pattern for canonical documents and test entries.

use cloudbench_core::{
    BenchmarkLocation, CanonicalDocument, GenerationLog, MachineLut, PerfStat, Reading,
    TestResultEntry, ThreadEntry,
};

/// Version tag used by fixtures unless overridden.
pub const FIXTURE_VERSION: &str = "v1.0.0-gabc1234";

/// Date used by fixtures unless overridden.
pub const FIXTURE_DATE: &str = "20261018-120000";

/// Builder for a single [`TestResultEntry`].
///
/// # Examples
///
/// ```
/// use cloudbench_test::fixtures::builders::EntryBuilder;
///
/// let entry = EntryBuilder::value(1234.5, "Iterations/Sec").time(42.0).build();
/// assert_eq!(entry.values.as_f64(), Some(1234.5));
/// assert_eq!(entry.time.as_f64(), Some(42.0));
/// ```
#[derive(Debug, Clone)]
pub struct EntryBuilder {
    entry: TestResultEntry,
}

impl EntryBuilder {
    /// An entry with a representative value and unit; `raw_values` is `[value]`.
    pub fn value(value: f64, unit: &str) -> Self {
        Self {
            entry: TestResultEntry {
                description: String::new(),
                values: Reading::Value(value),
                raw_values: Reading::Value(vec![value]),
                unit: unit.to_string(),
                time: Reading::NotAvailable,
                test_run_times: Reading::NotAvailable,
                cost: 0.0,
            },
        }
    }

    /// An entry carrying only an elapsed time (perf-summary recovery shape).
    pub fn time_only(seconds: f64) -> Self {
        Self {
            entry: TestResultEntry {
                description: String::new(),
                values: Reading::NotAvailable,
                raw_values: Reading::NotAvailable,
                unit: String::new(),
                time: Reading::Value(seconds),
                test_run_times: Reading::NotAvailable,
                cost: 0.0,
            },
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: &str) -> Self {
        self.entry.description = description.to_string();
        self
    }

    /// Sets the representative time and a one-element run-time list.
    pub fn time(mut self, seconds: f64) -> Self {
        self.entry.time = Reading::Value(seconds);
        self.entry.test_run_times = Reading::Value(vec![seconds]);
        self
    }

    /// Sets the raw values.
    pub fn raw_values(mut self, raw: Vec<f64>) -> Self {
        self.entry.raw_values = Reading::Value(raw);
        self
    }

    /// Builds the entry.
    pub fn build(self) -> TestResultEntry {
        self.entry
    }
}

/// Builder for [`CanonicalDocument`] fixtures.
///
/// Machine metadata comes from the built-in LUT (or the one given to
/// [`DocumentBuilder::with_lut`]); costs are computed on insertion.
///
/// # Examples
///
/// ```
/// use cloudbench_test::fixtures::builders::{DocumentBuilder, EntryBuilder};
///
/// let doc = DocumentBuilder::new()
///     .test("m8g.xlarge", "coremark-1.0.1", 4, "CoreMark", EntryBuilder::value(100.0, "ops/s"))
///     .build();
/// assert_eq!(doc.test_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    lut: MachineLut,
    version: String,
    os: String,
    category: String,
    document: CanonicalDocument,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    /// Creates a builder with the built-in LUT, OS `Ubuntu_24_04` and
    /// category `Processor`.
    pub fn new() -> Self {
        Self::with_lut(MachineLut::builtin())
    }

    /// Creates a builder resolving machines against `lut`.
    pub fn with_lut(lut: MachineLut) -> Self {
        Self {
            lut,
            version: FIXTURE_VERSION.to_string(),
            os: "Ubuntu_24_04".to_string(),
            category: "Processor".to_string(),
            document: CanonicalDocument::new(GenerationLog {
                version_info: FIXTURE_VERSION.to_string(),
                date: FIXTURE_DATE.to_string(),
            }),
        }
    }

    /// Sets the version tag written into the generation log.
    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Sets the OS used by subsequent insertions.
    pub fn os(mut self, os: &str) -> Self {
        self.os = os.to_string();
        self
    }

    /// Sets the category used by subsequent insertions.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    /// Adds one test result, keeping any tests already stored for the thread.
    pub fn test(
        mut self,
        machine: &str,
        benchmark: &str,
        thread: u32,
        key: &str,
        entry: EntryBuilder,
    ) -> Self {
        let location = self.location(machine, benchmark);
        let mut thread_entry = self
            .document
            .thread(machine, &location.os, &location.category, benchmark, thread)
            .cloned()
            .unwrap_or_default();
        thread_entry.test_name.insert(key.to_string(), entry.build());
        let record = self.lut.lookup(machine);
        self.document
            .insert_thread(&record, &location, thread, thread_entry);
        self
    }

    /// Sets the perf block of an existing or new thread entry.
    pub fn perf(mut self, machine: &str, benchmark: &str, thread: u32, perf: PerfStat) -> Self {
        let location = self.location(machine, benchmark);
        let mut thread_entry: ThreadEntry = self
            .document
            .thread(machine, &location.os, &location.category, benchmark, thread)
            .cloned()
            .unwrap_or_default();
        thread_entry.perf_stat = perf;
        let record = self.lut.lookup(machine);
        self.document
            .insert_thread(&record, &location, thread, thread_entry);
        self
    }

    /// Builds the document.
    pub fn build(mut self) -> CanonicalDocument {
        self.document.generation_log.version_info = self.version;
        self.document
    }

    fn location(&self, machine: &str, benchmark: &str) -> BenchmarkLocation {
        BenchmarkLocation {
            machine: machine.to_string(),
            os: self.os.clone(),
            category: self.category.clone(),
            benchmark: benchmark.to_string(),
        }
    }
}
