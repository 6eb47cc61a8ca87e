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

//! Benchmark-specific extraction overrides.
//!
//! Some benchmarks write logs the generic scanner cannot read. The
//! [`OverrideRegistry`] maps a benchmark identifier (directory name without
//! its version suffix) to a function producing named results from the
//! cleaned log. An override that returns nothing lets extraction continue
//! with the generic log strategies.

use cloudbench_core::{parse_finite, NamedResult, TestResultEntry};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// An override extraction function over a cleaned log.
pub type OverrideFn = fn(&str) -> Vec<NamedResult>;

static VERSION_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)-[0-9][0-9.]*$").expect("valid version suffix pattern"));

/// Registry key of a benchmark directory: the name without a trailing
/// `-<version>`, lowercased.
pub fn benchmark_id(dir_name: &str) -> String {
    let base = VERSION_SUFFIX_RE
        .captures(dir_name)
        .and_then(|caps| caps.get(1))
        .map_or(dir_name, |m| m.as_str());
    base.to_ascii_lowercase()
}

/// Median of a sequence; the mean of the middle pair for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Named override functions.
#[derive(Clone)]
pub struct OverrideRegistry {
    entries: HashMap<String, (&'static str, OverrideFn)>,
}

impl fmt::Debug for OverrideRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.entries.values().map(|(name, _)| *name).collect();
        names.sort_unstable();
        f.debug_struct("OverrideRegistry").field("entries", &names).finish()
    }
}

impl Default for OverrideRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl OverrideRegistry {
    /// A registry without entries.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The registry with the built-in `sysbench` and `pgbench` overrides.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("sysbench", extract_sysbench);
        registry.register("pgbench", extract_pgbench);
        registry
    }

    /// Registers `function` for benchmark identifier `id`, replacing any
    /// earlier entry.
    pub fn register(&mut self, id: &'static str, function: OverrideFn) {
        self.entries.insert(id.to_ascii_lowercase(), (id, function));
    }

    /// Finds the override for a benchmark directory name.
    pub fn get(&self, dir_name: &str) -> Option<(&'static str, OverrideFn)> {
        self.entries.get(&benchmark_id(dir_name)).copied()
    }

    /// Number of registered overrides.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no override is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn series_entry(description: &str, values: &[f64], unit: &str, times: &[f64]) -> TestResultEntry {
    let non_empty = |v: &[f64]| (!v.is_empty()).then(|| v.to_vec());
    TestResultEntry {
        description: description.to_string(),
        values: median(values).into(),
        raw_values: non_empty(values).into(),
        unit: unit.to_string(),
        time: median(times).into(),
        test_run_times: non_empty(times).into(),
        cost: 0.0,
    }
}

fn named(title: &str, description: &str, entry: TestResultEntry) -> NamedResult {
    NamedResult {
        title: title.to_string(),
        description: description.to_string(),
        entry,
    }
}

static SYSBENCH_CPU_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"events per second:\s*([0-9.]+)").expect("valid sysbench cpu pattern"));
static SYSBENCH_MEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"MiB transferred \(([0-9.]+)\s*MiB/sec\)").expect("valid sysbench memory pattern")
});
static SYSBENCH_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"total time:\s*([0-9.]+)s").expect("valid sysbench time pattern"));

#[derive(Clone, Copy, PartialEq, Eq)]
enum SysbenchRun {
    Cpu,
    Memory,
}

/// sysbench's native log: CPU runs report `events per second`, memory runs
/// report `MiB transferred (X MiB/sec)`; each run ends with `total time`.
fn extract_sysbench(log: &str) -> Vec<NamedResult> {
    let mut cpu = (Vec::new(), Vec::new());
    let mut memory = (Vec::new(), Vec::new());
    let mut pending: Option<SysbenchRun> = None;

    for line in log.lines() {
        if let Some(caps) = SYSBENCH_CPU_RE.captures(line) {
            if let Some(v) = parse_finite(&caps[1]) {
                cpu.0.push(v);
                pending = Some(SysbenchRun::Cpu);
            }
        } else if let Some(caps) = SYSBENCH_MEM_RE.captures(line) {
            if let Some(v) = parse_finite(&caps[1]) {
                memory.0.push(v);
                pending = Some(SysbenchRun::Memory);
            }
        } else if let Some(caps) = SYSBENCH_TIME_RE.captures(line) {
            if let (Some(run), Some(t)) = (pending.take(), parse_finite(&caps[1])) {
                match run {
                    SysbenchRun::Cpu => cpu.1.push(t),
                    SysbenchRun::Memory => memory.1.push(t),
                }
            }
        }
    }

    let mut results = Vec::new();
    if !cpu.0.is_empty() {
        results.push(named(
            "sysbench",
            "CPU",
            series_entry("CPU", &cpu.0, "Events Per Second", &cpu.1),
        ));
    }
    if !memory.0.is_empty() {
        results.push(named(
            "sysbench",
            "Memory",
            series_entry("Memory", &memory.0, "MiB/sec", &memory.1),
        ));
    }
    results
}

static PG_CLIENTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^number of clients:\s*(\d+)").expect("valid pgbench clients pattern"));
static PG_DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^duration:\s*([0-9.]+)\s*s").expect("valid pgbench duration pattern"));
static PG_LATENCY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^latency average\s*=\s*([0-9.]+)\s*ms").expect("valid pgbench latency pattern")
});
static PG_TPS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^tps\s*=\s*([0-9.]+)").expect("valid pgbench tps pattern"));

#[derive(Default)]
struct PgConfig {
    tps: Vec<f64>,
    latency: Vec<f64>,
    durations: Vec<f64>,
}

/// pgbench: each run prints its `number of clients`, `duration`,
/// `latency average` and `tps`; results are grouped per client count.
fn extract_pgbench(log: &str) -> Vec<NamedResult> {
    let mut configs: BTreeMap<u32, PgConfig> = BTreeMap::new();
    let mut clients: Option<u32> = None;
    let mut duration: Option<f64> = None;

    for line in log.lines().map(str::trim) {
        if let Some(caps) = PG_CLIENTS_RE.captures(line) {
            clients = caps[1].parse().ok();
            duration = None;
            continue;
        }
        let Some(current) = clients else {
            continue;
        };
        if let Some(caps) = PG_DURATION_RE.captures(line) {
            duration = parse_finite(&caps[1]);
        } else if let Some(caps) = PG_LATENCY_RE.captures(line) {
            if let Some(v) = parse_finite(&caps[1]) {
                configs.entry(current).or_default().latency.push(v);
            }
        } else if let Some(caps) = PG_TPS_RE.captures(line) {
            if let Some(v) = parse_finite(&caps[1]) {
                let config = configs.entry(current).or_default();
                config.tps.push(v);
                config.durations.extend(duration);
            }
        }
    }

    let mut results = Vec::new();
    for (clients, config) in configs {
        let description = format!("Clients: {clients}");
        if !config.tps.is_empty() {
            results.push(named(
                "TPS",
                &description,
                series_entry(&description, &config.tps, "TPS", &config.durations),
            ));
        }
        if !config.latency.is_empty() {
            results.push(named(
                "Average Latency",
                &description,
                series_entry(&description, &config.latency, "ms", &config.durations),
            ));
        }
    }
    results
}
