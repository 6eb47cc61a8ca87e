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

//! Canonical hierarchical result document.
//!
//! ```text
//! generation log
//! <machine> -> {CSP, total_vcpu, cpu_name, cpu_isa, cost_hour, os}
//!   os -> <os> -> <category> -> <benchmark> -> <thread count> -> ThreadEntry
//!     ThreadEntry -> {perf_stat, test_name -> <canonical key> -> TestResultEntry}
//! ```
//!
//! All maps are ordered so serialization is deterministic. Thread maps are
//! keyed by integer, so `4` sorts before `16`.

use crate::error::{CoreError, Result};
use crate::generation::GenerationLog;
use crate::lut::{Csp, MachineRecord};
use crate::sentinel::{round_to, Reading};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Key of the header block in the top-level map.
pub const GENERATION_LOG_KEY: &str = "generation log";

/// Seconds per hour, for the cost formula.
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Decimal places kept in cost values.
pub const COST_PLACES: i32 = 6;

/// Cost in USD of running for `time` seconds at `cost_hour` USD/hour.
///
/// `round(cost_hour * time / 3600, 6)`; an unavailable time, or one too
/// large to price, costs `0.0`.
pub fn cost_usd(cost_hour: f64, time: &Reading<f64>) -> f64 {
    match time {
        Reading::Value(seconds) => {
            crate::units::finite(round_to(cost_hour * seconds / SECONDS_PER_HOUR, COST_PLACES))
                .unwrap_or(0.0)
        }
        Reading::NotAvailable => 0.0,
    }
}

/// Perf counters and frequency samples of one thread-count run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerfStat {
    /// Per-core frequency at run start, MHz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_freq_mhz: Option<Vec<f64>>,
    /// Per-core frequency at run end, MHz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_freq_mhz: Option<Vec<f64>>,
    /// Instructions per cycle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipc: Option<f64>,
    /// Total cycles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cycles: Option<u64>,
    /// Total instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_instructions: Option<u64>,
    /// CPU utilization percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_utilization_percent: Option<f64>,
    /// Wall-clock duration of the run, seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_time_sec: Option<f64>,
}

impl PerfStat {
    /// Returns whether no field is populated.
    pub fn is_empty(&self) -> bool {
        *self == PerfStat::default()
    }

    /// Fills fields missing here from `other`.
    pub fn fill_from(&mut self, other: &PerfStat) {
        fn fill<T: Clone>(slot: &mut Option<T>, from: &Option<T>) {
            if slot.is_none() {
                slot.clone_from(from);
            }
        }
        fill(&mut self.start_freq_mhz, &other.start_freq_mhz);
        fill(&mut self.end_freq_mhz, &other.end_freq_mhz);
        fill(&mut self.ipc, &other.ipc);
        fill(&mut self.total_cycles, &other.total_cycles);
        fill(&mut self.total_instructions, &other.total_instructions);
        fill(&mut self.cpu_utilization_percent, &other.cpu_utilization_percent);
        fill(&mut self.elapsed_time_sec, &other.elapsed_time_sec);
    }
}

/// One named test result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResultEntry {
    /// Test description (empty when the source had none).
    pub description: String,
    /// Representative value.
    pub values: Reading<f64>,
    /// Per-iteration values.
    pub raw_values: Reading<Vec<f64>>,
    /// Unit of `values`.
    pub unit: String,
    /// Representative time, seconds.
    pub time: Reading<f64>,
    /// Per-iteration times, seconds.
    pub test_run_times: Reading<Vec<f64>>,
    /// Cost of `time` on the owning machine, USD.
    #[serde(default)]
    pub cost: f64,
}

impl TestResultEntry {
    /// Recomputes `cost` for the given hourly price.
    pub fn apply_hourly_cost(&mut self, cost_hour: f64) {
        self.cost = cost_usd(cost_hour, &self.time);
    }
}

/// Results of one benchmark at one thread count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadEntry {
    /// Perf counters.
    #[serde(default)]
    pub perf_stat: PerfStat,
    /// Results by canonical test key.
    #[serde(default)]
    pub test_name: BTreeMap<String, TestResultEntry>,
}

/// Thread count -> results.
pub type BenchmarkNode = BTreeMap<u32, ThreadEntry>;
/// Benchmark -> thread map.
pub type CategoryNode = BTreeMap<String, BenchmarkNode>;
/// Category -> benchmarks.
pub type OsNode = BTreeMap<String, CategoryNode>;

/// A machine and everything measured on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineNode {
    /// Cloud provider.
    #[serde(rename = "CSP")]
    pub csp: Csp,
    /// Virtual CPU count.
    pub total_vcpu: u32,
    /// CPU model name.
    pub cpu_name: String,
    /// Instruction-set family.
    pub cpu_isa: String,
    /// On-demand USD per hour.
    #[serde(rename = "cost_hour[730h-mo]")]
    pub cost_hour: f64,
    /// OS -> categories.
    #[serde(default)]
    pub os: BTreeMap<String, OsNode>,
}

impl MachineNode {
    /// Creates an empty node carrying a machine's metadata.
    pub fn from_record(record: &MachineRecord) -> Self {
        Self {
            csp: record.csp,
            total_vcpu: record.vcpu,
            cpu_name: record.cpu_name.clone(),
            cpu_isa: record.cpu_isa.clone(),
            cost_hour: record.cost_hour,
            os: BTreeMap::new(),
        }
    }

    /// Rebuilds the machine record this node was created from.
    pub fn record(&self, id: &str) -> MachineRecord {
        MachineRecord {
            id: id.to_string(),
            csp: self.csp,
            vcpu: self.total_vcpu,
            cpu_name: self.cpu_name.clone(),
            cpu_isa: self.cpu_isa.clone(),
            cost_hour: self.cost_hour,
        }
    }

    /// Returns whether both nodes describe the same machine type.
    pub fn same_metadata(&self, other: &MachineNode) -> bool {
        self.csp == other.csp
            && self.total_vcpu == other.total_vcpu
            && self.cpu_name == other.cpu_name
            && self.cpu_isa == other.cpu_isa
            && self.cost_hour == other.cost_hour
    }
}

/// Where a benchmark directory sits in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BenchmarkLocation {
    /// Machine identifier.
    pub machine: String,
    /// OS name.
    pub os: String,
    /// Category name.
    pub category: String,
    /// Benchmark directory name.
    pub benchmark: String,
}

impl fmt::Display for BenchmarkLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.machine, self.os, self.category, self.benchmark
        )
    }
}

/// Borrowed view of one benchmark node with its ancestry.
#[derive(Debug, Clone, Copy)]
pub struct BenchmarkRef<'a> {
    /// Machine identifier.
    pub machine: &'a str,
    /// Machine node.
    pub node: &'a MachineNode,
    /// OS name.
    pub os: &'a str,
    /// Category name.
    pub category: &'a str,
    /// Benchmark name.
    pub benchmark: &'a str,
    /// Thread map.
    pub threads: &'a BenchmarkNode,
}

/// The canonical document.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalDocument {
    /// Provenance header.
    pub generation_log: GenerationLog,
    /// Machine identifier -> machine node.
    pub machines: BTreeMap<String, MachineNode>,
}

impl Default for CanonicalDocument {
    fn default() -> Self {
        Self::new(GenerationLog::current())
    }
}

impl CanonicalDocument {
    /// Creates an empty document with the given header.
    pub fn new(generation_log: GenerationLog) -> Self {
        Self {
            generation_log,
            machines: BTreeMap::new(),
        }
    }

    /// Inserts a thread entry, creating intermediate nodes on first touch.
    ///
    /// The machine node is created from `record` the first time the machine
    /// is seen; later calls reuse the stored metadata. Test costs are
    /// computed from the stored hourly price. Returns the entry previously
    /// stored at the same location, if any.
    pub fn insert_thread(
        &mut self,
        record: &MachineRecord,
        location: &BenchmarkLocation,
        thread: u32,
        mut entry: ThreadEntry,
    ) -> Option<ThreadEntry> {
        let machine = self
            .machines
            .entry(location.machine.clone())
            .or_insert_with(|| MachineNode::from_record(record));

        for test in entry.test_name.values_mut() {
            test.apply_hourly_cost(machine.cost_hour);
        }

        machine
            .os
            .entry(location.os.clone())
            .or_default()
            .entry(location.category.clone())
            .or_default()
            .entry(location.benchmark.clone())
            .or_default()
            .insert(thread, entry)
    }

    /// Looks up one thread entry.
    pub fn thread(
        &self,
        machine: &str,
        os: &str,
        category: &str,
        benchmark: &str,
        thread: u32,
    ) -> Option<&ThreadEntry> {
        self.machines
            .get(machine)?
            .os
            .get(os)?
            .get(category)?
            .get(benchmark)?
            .get(&thread)
    }

    /// Iterates over every benchmark node in key order.
    pub fn benchmarks(&self) -> impl Iterator<Item = BenchmarkRef<'_>> {
        self.machines.iter().flat_map(|(machine, node)| {
            node.os.iter().flat_map(move |(os, categories)| {
                categories.iter().flat_map(move |(category, benches)| {
                    benches
                        .iter()
                        .map(move |(benchmark, threads)| BenchmarkRef {
                            machine,
                            node,
                            os,
                            category,
                            benchmark,
                            threads,
                        })
                })
            })
        })
    }

    /// Number of thread entries.
    pub fn thread_entry_count(&self) -> usize {
        self.benchmarks().map(|b| b.threads.len()).sum()
    }

    /// Number of test results.
    pub fn test_count(&self) -> usize {
        self.benchmarks()
            .flat_map(|b| b.threads.values())
            .map(|t| t.test_name.len())
            .sum()
    }

    /// Parses and validates a document.
    ///
    /// `label` names the source in error messages.
    pub fn from_json_str(text: &str, label: &Path) -> Result<Self> {
        let document: CanonicalDocument =
            serde_json::from_str(text).map_err(|e| CoreError::invalid_document(label, &e))?;

        document
            .generation_log
            .validate()
            .map_err(|msg| CoreError::invalid_generation_log(label, msg))?;

        Ok(document)
    }

    /// Serializes to pretty JSON with a trailing newline.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }
}

impl Serialize for CanonicalDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.machines.len() + 1))?;
        map.serialize_entry(GENERATION_LOG_KEY, &self.generation_log)?;
        for (name, machine) in &self.machines {
            map.serialize_entry(name, machine)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CanonicalDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(DocumentVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = CanonicalDocument;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a benchmark document with a generation log and machine entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut generation_log: Option<GenerationLog> = None;
        let mut machines = BTreeMap::new();

        while let Some(key) = access.next_key::<String>()? {
            if key == GENERATION_LOG_KEY {
                if generation_log.is_some() {
                    return Err(de::Error::duplicate_field(GENERATION_LOG_KEY));
                }
                generation_log = Some(access.next_value()?);
            } else {
                let machine: MachineNode = access.next_value()?;
                if machines.insert(key.clone(), machine).is_some() {
                    return Err(de::Error::custom(format!("duplicate machine '{key}'")));
                }
            }
        }

        let generation_log =
            generation_log.ok_or_else(|| de::Error::missing_field(GENERATION_LOG_KEY))?;

        Ok(CanonicalDocument {
            generation_log,
            machines,
        })
    }
}
