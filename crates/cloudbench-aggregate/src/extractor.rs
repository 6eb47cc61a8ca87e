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

//! Per-thread result extraction.
//!
//! Sources are tried in a fixed order:
//!
//! 1. structured export (strategy C, or D when every value is a time)
//! 2. the benchmark's override, if registered and it yields results
//! 3. the execution log (strategy A or B)
//! 4. perf-summary recovery: one time-only entry from `elapsed_time_sec`
//!
//! Perf counters and frequency samples are attached whichever source wins.

use crate::artifacts::{read_log, read_perf_stat, read_structured, StructuredResult, ThreadArtifacts};
use crate::error::ExtractError;
use crate::log_parser::{scan, LogResult};
use crate::overrides::{median, OverrideRegistry};
use crate::strategy::{ArtifactProbe, Provenance, Strategy};
use cloudbench_core::{
    assign_keys, finite, seconds_per_unit, NamedResult, PerfStat, Reading, TestResultEntry, ThreadEntry,
};
use std::path::Path;
use tracing::debug;

/// The extracted entry of one thread count.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Thread count.
    pub thread: u32,
    /// Which source produced the tests.
    pub provenance: Provenance,
    /// The entry.
    pub entry: ThreadEntry,
}

/// Extracts thread entries from benchmark directories.
#[derive(Debug, Clone)]
pub struct PatternExtractor<'a> {
    overrides: &'a OverrideRegistry,
    max_file_size: u64,
}

impl<'a> PatternExtractor<'a> {
    /// Creates an extractor reading artifacts up to `max_file_size` bytes.
    pub fn new(overrides: &'a OverrideRegistry, max_file_size: u64) -> Self {
        Self {
            overrides,
            max_file_size,
        }
    }

    /// Extracts the entry for `thread` in `bench_dir`.
    ///
    /// Returns `Ok(None)` when no source yields a result.
    pub fn extract(&self, bench_dir: &Path, thread: u32) -> Result<Option<Extraction>, ExtractError> {
        let bench_name = bench_dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let artifacts = ThreadArtifacts::new(bench_dir, thread);

        let perf_stat = read_perf_stat(&artifacts, self.max_file_size)?;
        let structured = read_structured(&artifacts, self.max_file_size)?.filter(|r| !r.is_empty());
        let log = read_log(&artifacts, self.max_file_size)?;
        let log_results = log.as_deref().map(scan).unwrap_or_default();

        let probe = ArtifactProbe {
            structured_units: structured
                .as_ref()
                .map(|results| results.iter().map(|r| r.unit.clone()).collect()),
            log_results: log_results.len(),
        };
        let strategy = Strategy::select(&probe);

        let Some((provenance, named)) =
            self.pick_source(bench_name, strategy, structured, log.as_deref(), log_results, &perf_stat)
        else {
            debug!(dir = %bench_dir.display(), thread, "no results");
            return Ok(None);
        };

        let test_name = assign_keys(named);
        if test_name.is_empty() {
            return Ok(None);
        }
        debug!(
            dir = %bench_dir.display(),
            thread,
            source = %provenance,
            tests = test_name.len(),
            "extracted"
        );
        Ok(Some(Extraction {
            thread,
            provenance,
            entry: ThreadEntry {
                perf_stat,
                test_name,
            },
        }))
    }

    fn pick_source(
        &self,
        bench_name: &str,
        strategy: Option<Strategy>,
        structured: Option<Vec<StructuredResult>>,
        log: Option<&str>,
        log_results: Vec<LogResult>,
        perf_stat: &PerfStat,
    ) -> Option<(Provenance, Vec<NamedResult>)> {
        if let (Some(s), Some(results)) = (strategy.filter(Strategy::is_structured), structured) {
            return Some((Provenance::Strategy(s), from_structured(results, s, bench_name)));
        }

        if let (Some((name, function)), Some(text)) = (self.overrides.get(bench_name), log) {
            let results = function(text);
            if !results.is_empty() {
                return Some((Provenance::Override(name), results));
            }
            debug!(benchmark = bench_name, name, "override found nothing, using generic log strategies");
        }

        if let Some(s) = strategy {
            return Some((Provenance::Strategy(s), from_log(log_results, bench_name)));
        }

        let elapsed = perf_stat.elapsed_time_sec?;
        Some((Provenance::PerfSummaryOnly, vec![recovered(bench_name, elapsed)]))
    }
}

fn non_empty(values: Vec<f64>) -> Reading<Vec<f64>> {
    if values.is_empty() {
        Reading::NotAvailable
    } else {
        Reading::Value(values)
    }
}

fn title_or(title: String, bench_name: &str) -> String {
    if title.trim().is_empty() {
        bench_name.to_string()
    } else {
        title
    }
}

fn from_structured(results: Vec<StructuredResult>, strategy: Strategy, bench_name: &str) -> Vec<NamedResult> {
    results
        .into_iter()
        .map(|r| {
            let raw = r.raw_values.or_else(|| r.value.map(|v| vec![v])).unwrap_or_default();
            let (time, test_run_times) = match strategy {
                Strategy::StructuredTimeValued => {
                    let factor = seconds_per_unit(&r.unit).unwrap_or(1.0);
                    let times: Vec<f64> = raw.iter().filter_map(|v| finite(v * factor)).collect();
                    (r.value.and_then(|v| finite(v * factor)).into(), non_empty(times))
                }
                _ => {
                    let times = r.test_run_times.unwrap_or_default();
                    (median(&times).into(), non_empty(times))
                }
            };
            NamedResult {
                title: title_or(r.title, bench_name),
                description: r.description.clone(),
                entry: TestResultEntry {
                    description: r.description,
                    values: r.value.into(),
                    raw_values: non_empty(raw),
                    unit: r.unit,
                    time,
                    test_run_times,
                    cost: 0.0,
                },
            }
        })
        .collect()
}

fn from_log(results: Vec<LogResult>, bench_name: &str) -> Vec<NamedResult> {
    results
        .into_iter()
        .map(|r| {
            let (time, test_run_times) = match seconds_per_unit(&r.unit) {
                Some(factor) => (
                    finite(r.value * factor).into(),
                    non_empty(r.raw_values.iter().filter_map(|v| finite(v * factor)).collect()),
                ),
                None => (Reading::NotAvailable, Reading::NotAvailable),
            };
            NamedResult {
                title: title_or(r.title.unwrap_or_default(), bench_name),
                description: r.description.clone(),
                entry: TestResultEntry {
                    description: r.description,
                    values: Reading::Value(r.value),
                    raw_values: non_empty(r.raw_values),
                    unit: r.unit,
                    time,
                    test_run_times,
                    cost: 0.0,
                },
            }
        })
        .collect()
}

fn recovered(bench_name: &str, elapsed: f64) -> NamedResult {
    NamedResult {
        title: bench_name.to_string(),
        description: String::new(),
        entry: TestResultEntry {
            description: String::new(),
            values: Reading::NotAvailable,
            raw_values: Reading::NotAvailable,
            unit: String::new(),
            time: Reading::Value(elapsed),
            test_run_times: Reading::NotAvailable,
            cost: 0.0,
        },
    }
}
