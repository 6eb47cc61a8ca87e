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

//! Flattened views of a canonical document.

use cloudbench_core::{pointer, CanonicalDocument, MachineNode, TestResultEntry};
use std::collections::{BTreeMap, BTreeSet};

/// One test result with its full location.
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    /// Machine identifier.
    pub machine: &'a str,
    /// Machine metadata.
    pub node: &'a MachineNode,
    /// Operating system.
    pub os: &'a str,
    /// Benchmark category.
    pub category: &'a str,
    /// Benchmark directory name.
    pub benchmark: &'a str,
    /// Thread count.
    pub thread: u32,
    /// Canonical test key.
    pub test: &'a str,
    /// The result.
    pub entry: &'a TestResultEntry,
}

impl Observation<'_> {
    /// JSON pointer of the result in the input document.
    pub fn pointer(&self) -> String {
        test_pointer(
            self.machine,
            self.os,
            self.category,
            self.benchmark,
            self.thread,
            self.test,
        )
    }
}

/// JSON pointer of a test result.
pub fn test_pointer(
    machine: &str,
    os: &str,
    category: &str,
    benchmark: &str,
    thread: u32,
    test: &str,
) -> String {
    let thread = thread.to_string();
    pointer([machine, "os", os, category, benchmark, thread.as_str(), "test_name", test])
}

/// JSON pointer of a thread entry.
pub fn thread_pointer(machine: &str, os: &str, category: &str, benchmark: &str, thread: u32) -> String {
    let thread = thread.to_string();
    pointer([machine, "os", os, category, benchmark, thread.as_str()])
}

/// JSON pointer of a machine.
pub fn machine_pointer(machine: &str) -> String {
    pointer([machine])
}

/// Every test result in document order.
pub fn observations(document: &CanonicalDocument) -> impl Iterator<Item = Observation<'_>> {
    document.benchmarks().flat_map(|b| {
        b.threads.iter().flat_map(move |(&thread, entry)| {
            entry.test_name.iter().map(move |(test, result)| Observation {
                machine: b.machine,
                node: b.node,
                os: b.os,
                category: b.category,
                benchmark: b.benchmark,
                thread,
                test,
                entry: result,
            })
        })
    })
}

/// Key of a cross-machine comparison group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GroupKey<'a> {
    /// Operating system.
    pub os: &'a str,
    /// Thread count.
    pub thread: u32,
    /// Benchmark category.
    pub category: &'a str,
    /// Benchmark directory name.
    pub benchmark: &'a str,
    /// Canonical test key.
    pub test: &'a str,
}

/// Results of one test across machines at one OS and thread count.
#[derive(Debug, Clone)]
pub struct ComparisonGroup<'a> {
    /// Group key.
    pub key: GroupKey<'a>,
    /// Machines that recorded the test, by machine name.
    pub present: BTreeMap<&'a str, Observation<'a>>,
    /// Machines that ran the benchmark at this OS and thread count but
    /// recorded no result under this test key.
    pub missing: BTreeSet<&'a str>,
}

/// Groups every result by (OS, thread, category, benchmark, test).
pub fn comparison_groups(document: &CanonicalDocument) -> Vec<ComparisonGroup<'_>> {
    let mut ran: BTreeMap<(&str, u32, &str, &str), BTreeSet<&str>> = BTreeMap::new();
    for b in document.benchmarks() {
        for &thread in b.threads.keys() {
            ran.entry((b.os, thread, b.category, b.benchmark))
                .or_default()
                .insert(b.machine);
        }
    }

    let mut groups: BTreeMap<GroupKey<'_>, BTreeMap<&str, Observation<'_>>> = BTreeMap::new();
    for obs in observations(document) {
        let key = GroupKey {
            os: obs.os,
            thread: obs.thread,
            category: obs.category,
            benchmark: obs.benchmark,
            test: obs.test,
        };
        groups.entry(key).or_default().insert(obs.machine, obs);
    }

    groups
        .into_iter()
        .map(|(key, present)| {
            let missing = ran
                .get(&(key.os, key.thread, key.category, key.benchmark))
                .map(|machines| {
                    machines
                        .iter()
                        .copied()
                        .filter(|m| !present.contains_key(m))
                        .collect()
                })
                .unwrap_or_default();
            ComparisonGroup {
                key,
                present,
                missing,
            }
        })
        .collect()
}
