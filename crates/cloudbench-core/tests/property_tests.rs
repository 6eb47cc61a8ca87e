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

//! Property-based tests for the canonical document model.
//!
//! - Cost values follow the hourly-price formula and never go negative
//! - Merging a partitioned document reproduces the whole
//! - Canonical keys are unique per (title, description) pair
//! - Every serialized test entry has a source line

use cloudbench_core::{
    assign_keys, cost_usd, merge_documents, pointer, round_to, BenchmarkLocation,
    CanonicalDocument, GenerationLog, MachineLut, NamedResult, Reading, SourceMap,
    TestResultEntry, ThreadEntry,
};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

// ===== Test Helpers =====

const MACHINES: [&str; 4] = ["m8g.xlarge", "c4-standard-8", "Standard_D4ps_v6", "lab-box"];
const BENCHMARKS: [&str; 3] = ["coremark-1.0.1", "stream-1.3.4", "nginx-3.0.1"];

type Coord = (usize, usize, u32, String);

fn header() -> GenerationLog {
    GenerationLog {
        version_info: "v1.0.0-gabc1234".to_string(),
        date: "20261018-120000".to_string(),
    }
}

fn entry(value: f64, time: f64) -> TestResultEntry {
    TestResultEntry {
        description: String::new(),
        values: Reading::Value(value),
        raw_values: Reading::Value(vec![value]),
        unit: "ops/s".to_string(),
        time: Reading::Value(time),
        test_run_times: Reading::Value(vec![time]),
        cost: 0.0,
    }
}

fn location(machine: usize, bench: usize) -> BenchmarkLocation {
    BenchmarkLocation {
        machine: MACHINES[machine].to_string(),
        os: "Ubuntu_24_04".to_string(),
        category: "Processor".to_string(),
        benchmark: BENCHMARKS[bench].to_string(),
    }
}

/// Builds a document from test coordinates, grouping tests per thread entry.
fn build(results: &BTreeMap<Coord, (f64, f64)>) -> CanonicalDocument {
    let lut = MachineLut::builtin();
    let mut grouped: BTreeMap<(usize, usize, u32), ThreadEntry> = BTreeMap::new();
    for ((machine, bench, thread, test), (value, time)) in results {
        grouped
            .entry((*machine, *bench, *thread))
            .or_default()
            .test_name
            .insert(test.clone(), entry(*value, *time));
    }

    let mut doc = CanonicalDocument::new(header());
    for ((machine, bench, thread), thread_entry) in grouped {
        let record = lut.lookup(MACHINES[machine]);
        doc.insert_thread(&record, &location(machine, bench), thread, thread_entry);
    }
    doc
}

// ===== Property-Based Test Generators =====

fn coord() -> impl Strategy<Value = Coord> {
    (
        0..MACHINES.len(),
        0..BENCHMARKS.len(),
        prop::sample::select(vec![1u32, 2, 4, 8, 16]),
        prop::string::string_regex("[A-Z][a-z]{1,6}").expect("test name regex"),
    )
}

fn results() -> impl Strategy<Value = BTreeMap<Coord, (f64, f64)>> {
    prop::collection::btree_map(coord(), (0.1f64..1e6, 0.01f64..1e4), 1..40)
}

// ===== Properties =====

proptest! {
    #[test]
    fn prop_cost_matches_formula(cost_hour in 0.0f64..50.0, seconds in 0.0f64..1e6) {
        let cost = cost_usd(cost_hour, &Reading::Value(seconds));
        prop_assert_eq!(cost, round_to(cost_hour * seconds / 3600.0, 6));
        prop_assert!(cost >= 0.0);
        prop_assert_eq!(cost_usd(cost_hour, &Reading::NotAvailable), 0.0);
    }

    #[test]
    fn prop_merge_of_partition_equals_whole(results in results(), mask in prop::collection::vec(any::<bool>(), 40)) {
        let whole = build(&results);

        let mut left = BTreeMap::new();
        let mut right = BTreeMap::new();
        for (i, (k, v)) in results.into_iter().enumerate() {
            if mask[i % mask.len()] {
                left.insert(k, v);
            } else {
                right.insert(k, v);
            }
        }

        let mut inputs = Vec::new();
        if !left.is_empty() {
            inputs.push((PathBuf::from("left.json"), build(&left)));
        }
        if !right.is_empty() {
            inputs.push((PathBuf::from("right.json"), build(&right)));
        }

        let (merged, stats) = merge_documents(inputs).unwrap();
        prop_assert_eq!(stats.overlapping_tests, 0);
        prop_assert_eq!(merged.machines, whole.machines);
    }

    #[test]
    fn prop_keys_unique_per_pair(
        pairs in prop::collection::vec(
            (
                prop::string::string_regex("[A-Z][a-z]{0,4}").expect("title regex"),
                prop::string::string_regex("[a-z]{0,4}").expect("description regex"),
            ),
            0..30,
        )
    ) {
        let named: Vec<NamedResult> = pairs
            .iter()
            .map(|(title, description)| NamedResult {
                title: title.clone(),
                description: description.clone(),
                entry: entry(1.0, 1.0),
            })
            .collect();
        let keys = assign_keys(named);

        let distinct: BTreeSet<&(String, String)> = pairs.iter().collect();
        let titles: BTreeSet<&String> = pairs.iter().map(|(t, _)| t).collect();
        prop_assert!(keys.len() <= distinct.len());
        prop_assert!(keys.len() >= titles.len());
        for title in titles {
            let prefix = format!("{title} - ");
            prop_assert!(keys.keys().any(|k| k == title || k.starts_with(&prefix)));
        }
    }

    #[test]
    fn prop_every_test_has_a_line(results in results()) {
        let doc = build(&results);
        let text = doc.to_json_pretty().unwrap();
        let map = SourceMap::index(&text);

        for bench in doc.benchmarks() {
            for (thread, thread_entry) in bench.threads {
                for test in thread_entry.test_name.keys() {
                    let thread = thread.to_string();
                    let path = pointer([
                        bench.machine,
                        "os",
                        bench.os,
                        bench.category,
                        bench.benchmark,
                        thread.as_str(),
                        "test_name",
                        test.as_str(),
                    ]);
                    prop_assert!(map.line_of(&path).is_some(), "no line for {}", path);
                }
            }
        }
    }
}
