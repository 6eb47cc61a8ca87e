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

//! Cross-provider comparison against each provider's arm64 reference.
//!
//! Within one provider, every sibling machine's cost efficiency is
//! expressed as a percentage of the reference instance's, per identical
//! (OS, category, benchmark, test, thread). Above 100 the sibling is more
//! cost-efficient than the reference. A crossover is a thread count at
//! which that relation flips.

use crate::diagnostics::Diagnostics;
use crate::performance::RATIO_PLACES;
use crate::report::{cell, ReportBody};
use crate::score::{ratio, Basis, Score};
use crate::walk::{machine_pointer, observations, test_pointer, Observation};
use cloudbench_core::{round_to, Assessed, CanonicalDocument, Csp, MachineNode};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Value of parity with the reference.
pub const PARITY: f64 = 100.0;

/// One sibling test series against the reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CspComparison {
    /// Sibling machine.
    pub machine: String,
    /// Sibling instruction-set family.
    pub cpu_isa: String,
    /// Operating system.
    pub os: String,
    /// Benchmark category.
    pub category: String,
    /// Benchmark directory name.
    pub benchmark: String,
    /// Canonical test key.
    pub test: String,
    /// Thread count -> sibling efficiency as percent of the reference's.
    pub values: BTreeMap<u32, Assessed>,
    /// Thread counts at which the value crosses 100.
    pub crossover_threads: Vec<u32>,
}

/// Comparisons of one provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CspProvider {
    /// Provider.
    #[serde(rename = "CSP")]
    pub csp: Csp,
    /// Reference instance.
    pub reference: String,
    /// vCPU count of the reference instance.
    pub reference_vcpu: u32,
    /// Hourly cost of the reference instance.
    pub reference_cost_hour: f64,
    /// Sibling series.
    pub comparisons: Vec<CspComparison>,
}

type SeriesKey<'a> = (&'a str, &'a str, &'a str, &'a str);
type Series<'a> = BTreeMap<SeriesKey<'a>, BTreeMap<u32, Observation<'a>>>;

/// Picks a provider's reference instance: machines whose identifier
/// contains the provider's arm64 family, smallest vCPU count first, then
/// by name.
pub fn reference_instance<'a>(document: &'a CanonicalDocument, csp: Csp) -> Option<(&'a str, &'a MachineNode)> {
    let family = csp.reference_family()?.to_ascii_lowercase();
    document
        .machines
        .iter()
        .filter(|(id, node)| node.csp == csp && id.to_ascii_lowercase().contains(&family))
        .min_by(|a, b| a.1.total_vcpu.cmp(&b.1.total_vcpu).then_with(|| a.0.cmp(b.0)))
        .map(|(id, node)| (id.as_str(), node))
}

/// Thread counts at which `value - 100` changes sign. Unknown values and
/// exact parity do not break a run.
pub fn crossovers(values: &BTreeMap<u32, Assessed>) -> Vec<u32> {
    let mut crossings = Vec::new();
    let mut previous: Option<bool> = None;
    for (&thread, value) in values {
        let Some(v) = value.as_f64() else {
            continue;
        };
        if v == PARITY {
            continue;
        }
        let above = v > PARITY;
        if previous.is_some_and(|p| p != above) {
            crossings.push(thread);
        }
        previous = Some(above);
    }
    crossings
}

/// Compares every provider's siblings against its reference instance.
pub fn compare_csp(document: &CanonicalDocument, diags: &mut Diagnostics<'_>) -> Vec<CspProvider> {
    let mut by_machine: BTreeMap<&str, Series<'_>> = BTreeMap::new();
    for obs in observations(document) {
        by_machine
            .entry(obs.machine)
            .or_default()
            .entry((obs.os, obs.category, obs.benchmark, obs.test))
            .or_default()
            .insert(obs.thread, obs);
    }
    let empty = Series::new();

    let providers: BTreeSet<Csp> = document
        .machines
        .values()
        .map(|n| n.csp)
        .filter(Csp::is_known)
        .collect();

    let mut results = Vec::new();
    for csp in providers {
        // Reference first; nothing is compared until it is validated.
        let Some((reference, reference_node)) = reference_instance(document, csp) else {
            diags.error(
                "",
                format!(
                    "no {} reference instance (identifier containing '{}') in the document",
                    csp,
                    csp.reference_family().unwrap_or_default()
                ),
            );
            continue;
        };
        if reference_node.cost_hour <= 0.0 {
            diags.error(
                machine_pointer(reference),
                format!(
                    "{} reference {} has hourly cost {}; provider skipped",
                    csp, reference, reference_node.cost_hour
                ),
            );
            continue;
        }
        let reference_series = by_machine.get(reference).unwrap_or(&empty);

        let mut comparisons = Vec::new();
        for (machine, node) in &document.machines {
            if node.csp != csp || machine == reference {
                continue;
            }
            if node.cost_hour <= 0.0 {
                diags.warn(
                    machine_pointer(machine),
                    format!("{} has hourly cost {}; excluded from {} comparison", machine, node.cost_hour, csp),
                );
                continue;
            }
            let sibling_series = by_machine.get(machine.as_str()).unwrap_or(&empty);
            let keys: BTreeSet<&SeriesKey<'_>> = reference_series.keys().chain(sibling_series.keys()).collect();
            for key in keys {
                comparisons.push(compare_series(
                    Side::new(reference, reference_node, reference_series.get(key)),
                    Side::new(machine, node, sibling_series.get(key)),
                    key,
                    diags,
                ));
            }
        }

        debug!(%csp, reference, comparisons = comparisons.len(), "provider compared");
        results.push(CspProvider {
            csp,
            reference: reference.to_string(),
            reference_vcpu: reference_node.total_vcpu,
            reference_cost_hour: reference_node.cost_hour,
            comparisons,
        });
    }
    results
}

struct Side<'a, 'd> {
    machine: &'a str,
    node: &'a MachineNode,
    points: Option<&'d BTreeMap<u32, Observation<'a>>>,
}

impl<'a, 'd> Side<'a, 'd> {
    fn new(machine: &'a str, node: &'a MachineNode, points: Option<&'d BTreeMap<u32, Observation<'a>>>) -> Self {
        Self { machine, node, points }
    }

    fn at(&self, thread: u32) -> Option<&Observation<'a>> {
        self.points.and_then(|p| p.get(&thread))
    }

    fn efficiency(&self, obs: &Observation<'_>, basis: Option<Basis>) -> Option<f64> {
        let score = Score::with_basis(obs.entry, basis?)?;
        ratio(score.performance()?, self.node.cost_hour)
    }
}

fn compare_series(
    reference: Side<'_, '_>,
    sibling: Side<'_, '_>,
    key: &SeriesKey<'_>,
    diags: &mut Diagnostics<'_>,
) -> CspComparison {
    let &(os, category, benchmark, test) = key;
    let threads: BTreeSet<u32> = [&reference, &sibling]
        .iter()
        .filter_map(|side| side.points)
        .flat_map(|p| p.keys().copied())
        .collect();
    let basis = Basis::common(
        [&reference, &sibling]
            .iter()
            .filter_map(|side| side.points)
            .flat_map(|p| p.values().map(|o| o.entry)),
    );

    let mut values = BTreeMap::new();
    for thread in threads {
        let value = match (reference.at(thread), sibling.at(thread)) {
            (Some(r), Some(s)) if r.entry.unit != s.entry.unit => {
                diags.warn(
                    s.pointer(),
                    format!(
                        "'{}' on {} is measured in '{}' but reference {} uses '{}'; recorded as unknown",
                        test, sibling.machine, s.entry.unit, reference.machine, r.entry.unit
                    ),
                );
                Assessed::Unknown
            }
            (Some(r), Some(s)) => {
                let computed = reference
                    .efficiency(r, basis)
                    .zip(sibling.efficiency(s, basis))
                    .and_then(|(re, se)| ratio(se, re));
                match computed {
                    Some(v) => Assessed::Value(round_to(v * PARITY, RATIO_PLACES)),
                    None => {
                        diags.warn(
                            s.pointer(),
                            format!(
                                "cost efficiency of '{}' on {} vs {} at {} threads is undefined; recorded as unknown",
                                test, sibling.machine, reference.machine, thread
                            ),
                        );
                        Assessed::Unknown
                    }
                }
            }
            (Some(_), None) => missing(&reference, &sibling, key, thread, diags),
            (None, _) => missing(&sibling, &reference, key, thread, diags),
        };
        values.insert(thread, value);
    }

    CspComparison {
        machine: sibling.machine.to_string(),
        cpu_isa: sibling.node.cpu_isa.clone(),
        os: os.to_string(),
        category: category.to_string(),
        benchmark: benchmark.to_string(),
        test: test.to_string(),
        crossover_threads: crossovers(&values),
        values,
    }
}

fn missing(
    has: &Side<'_, '_>,
    lacks: &Side<'_, '_>,
    key: &SeriesKey<'_>,
    thread: u32,
    diags: &mut Diagnostics<'_>,
) -> Assessed {
    let &(os, category, benchmark, test) = key;
    diags.warn(
        test_pointer(has.machine, os, category, benchmark, thread, test),
        format!(
            "'{}' at {} threads exists on {} but not on {}; recorded as unknown",
            test, thread, has.machine, lacks.machine
        ),
    );
    Assessed::Unknown
}

impl ReportBody for Vec<CspProvider> {
    fn render_markdown(&self, md: &mut String) {
        for provider in self {
            md.push_str(&format!(
                "### {} (reference: {}, {} vCPU, ${}/hour)\n\n",
                provider.csp, cell(&provider.reference), provider.reference_vcpu, provider.reference_cost_hour
            ));
            if provider.comparisons.is_empty() {
                md.push_str("_No sibling instances._\n\n");
                continue;
            }
            md.push_str("| Machine | ISA | OS | Benchmark | Test | Value (threads: %) | Crossover |\n");
            md.push_str("|---------|-----|----|-----------|------|--------------------|-----------|\n");
            for c in &provider.comparisons {
                let points: Vec<String> = c.values.iter().map(|(t, v)| format!("{}: {}", t, v)).collect();
                let crossings: Vec<String> = c.crossover_threads.iter().map(|t| t.to_string()).collect();
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {} | {} |\n",
                    cell(&c.machine),
                    cell(&c.cpu_isa),
                    cell(&c.os),
                    cell(&c.benchmark),
                    cell(&c.test),
                    points.join(", "),
                    if crossings.is_empty() { "-".to_string() } else { crossings.join(", ") }
                ));
            }
            md.push('\n');
        }
    }

    fn record_count(&self) -> usize {
        self.len()
    }
}
