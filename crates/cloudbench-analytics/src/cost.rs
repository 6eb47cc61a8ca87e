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

//! Cost-efficiency ranking.
//!
//! Efficiency is performance per USD-hour: the score itself for
//! higher-is-better tests, its reciprocal for time-valued ones, divided by
//! the machine's hourly cost. Machines with no real price are removed from
//! the report, not shown as unknown.

use crate::diagnostics::Diagnostics;
use crate::performance::{score_group, RATIO_PLACES};
use crate::report::{cell, ReportBody};
use crate::score::{ratio, Basis};
use crate::walk::{comparison_groups, machine_pointer, thread_pointer, ComparisonGroup};
use cloudbench_core::{round_to, Assessed, CanonicalDocument, Csp, MachineNode};
use serde::Serialize;
use std::collections::BTreeSet;

/// One ranked machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostRow {
    /// 1-based rank; absent for unknown efficiency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    /// Machine identifier.
    pub machine: String,
    /// Provider.
    #[serde(rename = "CSP")]
    pub csp: Csp,
    /// Hourly cost in USD.
    pub cost_hour: f64,
    /// Raw score.
    pub score: Assessed,
    /// Performance per USD-hour.
    pub efficiency: Assessed,
    /// Efficiency relative to the most efficient machine.
    pub relative_cost_efficiency: Assessed,
}

/// One comparison group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostGroup {
    /// Operating system.
    pub os: String,
    /// Thread count.
    pub thread: u32,
    /// Benchmark category.
    pub category: String,
    /// Benchmark directory name.
    pub benchmark: String,
    /// Canonical test key.
    pub test: String,
    /// Unit of the scores.
    pub unit: String,
    /// Field the scores were taken from.
    pub basis: Basis,
    /// Machines, most efficient first; unknown efficiency last.
    pub ranking: Vec<CostRow>,
}

/// Whether a machine can be priced.
fn is_priced(node: &MachineNode) -> bool {
    node.csp.is_known() && node.cost_hour > 0.0
}

/// Ranks every comparison group by cost efficiency.
pub fn compare_cost(document: &CanonicalDocument, diags: &mut Diagnostics<'_>) -> Vec<CostGroup> {
    let mut excluded = BTreeSet::new();
    for (machine, node) in &document.machines {
        if !is_priced(node) {
            diags.warn(
                machine_pointer(machine),
                format!(
                    "{} has CSP '{}' and hourly cost {}; excluded from cost ranking",
                    machine, node.csp, node.cost_hour
                ),
            );
            excluded.insert(machine.as_str());
        }
    }

    comparison_groups(document)
        .into_iter()
        .filter_map(|mut group| {
            group.present.retain(|m, _| !excluded.contains(m));
            group.missing.retain(|m| !excluded.contains(m));
            if group.present.is_empty() {
                return None;
            }
            rank_group(document, &group, diags)
        })
        .collect()
}

fn rank_group(
    document: &CanonicalDocument,
    group: &ComparisonGroup<'_>,
    diags: &mut Diagnostics<'_>,
) -> Option<CostGroup> {
    let key = &group.key;
    let scored = score_group(group, diags);

    let mut efficient = Vec::new();
    let mut unknown = Vec::new();
    for (obs, score) in &scored.usable {
        match score.performance().and_then(|p| ratio(p, obs.node.cost_hour)) {
            Some(efficiency) => efficient.push((obs, score.value, efficiency)),
            None => {
                diags.warn(
                    obs.pointer(),
                    format!(
                        "{} scored {} on '{}', which has no defined throughput; recorded as unknown",
                        obs.machine, score.value, key.test
                    ),
                );
                unknown.push(row(obs.machine, obs.node, Assessed::Value(score.value)));
            }
        }
    }

    // Reference: the most efficient machine.
    efficient.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.0.machine.cmp(b.0.machine)));
    let Some(&(_, _, top)) = efficient.first() else {
        let pointer = group
            .present
            .values()
            .next()
            .map(|o| o.pointer())
            .unwrap_or_default();
        diags.error(
            pointer,
            format!(
                "no priced machine has a usable score for '{}' ({}) on {} at {} threads; group omitted",
                key.test, key.benchmark, key.os, key.thread
            ),
        );
        return None;
    };
    let basis = scored.basis?;

    let mut ranking = Vec::with_capacity(group.present.len() + group.missing.len());
    for (index, (obs, value, efficiency)) in efficient.iter().enumerate() {
        let relative_cost_efficiency = match ratio(*efficiency, top) {
            Some(r) => Assessed::Value(round_to(r, RATIO_PLACES)),
            None => {
                diags.warn(
                    obs.pointer(),
                    format!(
                        "relative cost efficiency of {} on '{}' has a zero denominator; recorded as unknown",
                        obs.machine, key.test
                    ),
                );
                Assessed::Unknown
            }
        };
        ranking.push(CostRow {
            rank: Some(index + 1),
            efficiency: Assessed::Value(*efficiency),
            relative_cost_efficiency,
            ..row(obs.machine, obs.node, Assessed::Value(*value))
        });
    }

    ranking.extend(unknown);
    for obs in &scored.unusable {
        ranking.push(row(obs.machine, obs.node, Assessed::Unknown));
    }
    for &machine in &group.missing {
        let Some(node) = document.machines.get(machine) else {
            continue;
        };
        diags.warn(
            thread_pointer(machine, key.os, key.category, key.benchmark, key.thread),
            format!(
                "{} ran {} at {} threads but recorded no '{}'; recorded as unknown",
                machine, key.benchmark, key.thread, key.test
            ),
        );
        ranking.push(row(machine, node, Assessed::Unknown));
    }
    ranking[efficient.len()..].sort_by(|a, b| a.machine.cmp(&b.machine));

    Some(CostGroup {
        os: key.os.to_string(),
        thread: key.thread,
        category: key.category.to_string(),
        benchmark: key.benchmark.to_string(),
        test: key.test.to_string(),
        unit: scored.unit,
        basis,
        ranking,
    })
}

fn row(machine: &str, node: &MachineNode, score: Assessed) -> CostRow {
    CostRow {
        rank: None,
        machine: machine.to_string(),
        csp: node.csp,
        cost_hour: node.cost_hour,
        score,
        efficiency: Assessed::Unknown,
        relative_cost_efficiency: Assessed::Unknown,
    }
}

impl ReportBody for Vec<CostGroup> {
    fn render_markdown(&self, md: &mut String) {
        for group in self {
            md.push_str(&format!(
                "### {} / {} / {} ({}, {} threads)\n\n",
                cell(&group.category),
                cell(&group.benchmark),
                cell(&group.test),
                cell(&group.os),
                group.thread
            ));
            md.push_str("| Rank | Machine | CSP | $/hour | Score | Efficiency | Relative |\n");
            md.push_str("|------|---------|-----|--------|-------|------------|----------|\n");
            for row in &group.ranking {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {} | {} |\n",
                    row.rank.map_or_else(|| "-".to_string(), |r| r.to_string()),
                    cell(&row.machine),
                    row.csp,
                    row.cost_hour,
                    row.score,
                    row.efficiency,
                    row.relative_cost_efficiency
                ));
            }
            md.push('\n');
        }
    }

    fn record_count(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudbench_core::{MachineLut, MachineRecord, SourceMap};
    use cloudbench_test::fixtures::{DocumentBuilder, EntryBuilder};

    fn run(document: &CanonicalDocument) -> (Vec<CostGroup>, usize, usize) {
        let map = SourceMap::empty();
        let mut diags = Diagnostics::new(&map);
        let groups = compare_cost(document, &mut diags);
        let (errors, warnings) = diags.into_parts();
        (groups, errors.len(), warnings.len())
    }

    #[test]
    fn test_efficiency_per_dollar() {
        // m8g.xlarge: 0.17952/h, m7i.xlarge: 0.2016/h
        let doc = DocumentBuilder::new()
            .test("m8g.xlarge", "coremark", 4, "CoreMark", EntryBuilder::value(179.52, "ops"))
            .test("m7i.xlarge", "coremark", 4, "CoreMark", EntryBuilder::value(100.8, "ops"))
            .build();
        let (groups, errors, warnings) = run(&doc);
        assert_eq!((errors, warnings), (0, 0));

        let ranking = &groups[0].ranking;
        assert_eq!(ranking[0].machine, "m8g.xlarge");
        assert_eq!(ranking[0].relative_cost_efficiency, Assessed::Value(1.0));
        assert_eq!(ranking[1].machine, "m7i.xlarge");
        assert_eq!(ranking[1].relative_cost_efficiency, Assessed::Value(0.5));
    }

    #[test]
    fn test_time_scores_use_reciprocal() {
        let doc = DocumentBuilder::new()
            .test("m8g.xlarge", "openssl", 4, "openssl", EntryBuilder::time_only(10.0))
            .test("m7i.xlarge", "openssl", 4, "openssl", EntryBuilder::time_only(5.0))
            .build();
        let (groups, _, _) = run(&doc);
        let ranking = &groups[0].ranking;
        // 1 / (5 * 0.2016) beats 1 / (10 * 0.17952)
        assert_eq!(ranking[0].machine, "m7i.xlarge");
        let expected = round_to((10.0 * 0.17952_f64).recip() / (5.0 * 0.2016_f64).recip(), 6);
        assert_eq!(ranking[1].relative_cost_efficiency, Assessed::Value(expected));
    }

    #[test]
    fn test_unpriced_machines_removed() {
        let lut = MachineLut::new(vec![
            MachineRecord {
                id: "free-box".to_string(),
                csp: Csp::Aws,
                vcpu: 4,
                cpu_name: "x".to_string(),
                cpu_isa: "arm64".to_string(),
                cost_hour: 0.0,
            },
            MachineRecord {
                id: "paid-box".to_string(),
                csp: Csp::Aws,
                vcpu: 4,
                cpu_name: "x".to_string(),
                cpu_isa: "arm64".to_string(),
                cost_hour: 1.0,
            },
        ]);
        let doc = DocumentBuilder::with_lut(lut)
            .test("free-box", "coremark", 4, "CoreMark", EntryBuilder::value(1000.0, "ops"))
            .test("paid-box", "coremark", 4, "CoreMark", EntryBuilder::value(10.0, "ops"))
            .test("lab-box", "coremark", 4, "CoreMark", EntryBuilder::value(50.0, "ops"))
            .build();
        let (groups, errors, warnings) = run(&doc);
        assert_eq!(errors, 0);
        assert_eq!(warnings, 2);

        let machines: Vec<_> = groups[0].ranking.iter().map(|r| r.machine.as_str()).collect();
        assert_eq!(machines, vec!["paid-box"]);
    }

    #[test]
    fn test_group_of_only_unpriced_machines_omitted() {
        let doc = DocumentBuilder::new()
            .test("lab-box", "coremark", 4, "CoreMark", EntryBuilder::value(50.0, "ops"))
            .build();
        let (groups, errors, warnings) = run(&doc);
        assert!(groups.is_empty());
        assert_eq!((errors, warnings), (0, 1));
    }
}
