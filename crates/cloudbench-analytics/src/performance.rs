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

//! Absolute performance ranking.
//!
//! Per (OS, thread count, category, benchmark, test), machines are ranked
//! by score and each is expressed relative to the leader, so the leader
//! always reads 1.0.

use crate::diagnostics::Diagnostics;
use crate::report::{cell, ReportBody};
use crate::score::{ratio, Basis, Direction, Score};
use crate::walk::{comparison_groups, thread_pointer, ComparisonGroup, Observation};
use cloudbench_core::{round_to, Assessed, CanonicalDocument, Csp};
use serde::Serialize;
use std::cmp::Ordering;

/// Decimal places kept in ratios.
pub const RATIO_PLACES: i32 = 6;

/// One ranked machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerfRow {
    /// 1-based rank; absent for unknown scores.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    /// Machine identifier.
    pub machine: String,
    /// Provider.
    #[serde(rename = "CSP")]
    pub csp: Csp,
    /// Raw score.
    pub score: Assessed,
    /// Score relative to the leader.
    pub relative_performance: Assessed,
}

/// One comparison group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerfGroup {
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
    /// Ranking direction.
    pub direction: Direction,
    /// Machines, best first; unknown scores last.
    pub ranking: Vec<PerfRow>,
}

/// Orders two scores of the same direction best-first.
pub(crate) fn best_first(a: &Score, b: &Score) -> Ordering {
    match a.direction {
        Direction::HigherIsBetter => b.value.total_cmp(&a.value),
        Direction::LowerIsBetter => a.value.total_cmp(&b.value),
    }
}

/// Scores the members of a group on a common basis.
///
/// The first usable score in machine order sets the reference unit;
/// members measured in another unit are unusable.
pub(crate) struct ScoredGroup<'a> {
    pub basis: Option<Basis>,
    pub unit: String,
    pub usable: Vec<(Observation<'a>, Score)>,
    pub unusable: Vec<Observation<'a>>,
}

pub(crate) fn score_group<'a>(group: &ComparisonGroup<'a>, diags: &mut Diagnostics<'_>) -> ScoredGroup<'a> {
    let basis = Basis::common(group.present.values().map(|o| o.entry));
    let mut unit: Option<String> = None;
    let mut usable = Vec::new();
    let mut unusable = Vec::new();

    for obs in group.present.values() {
        let score = basis.and_then(|b| Score::with_basis(obs.entry, b));
        match score {
            Some(score) => {
                let reference = unit.get_or_insert_with(|| obs.entry.unit.clone());
                if *reference == obs.entry.unit {
                    usable.push((*obs, score));
                } else {
                    diags.warn(
                        obs.pointer(),
                        format!(
                            "'{}' on {} is measured in '{}' but the group uses '{}'; recorded as unknown",
                            obs.test, obs.machine, obs.entry.unit, reference
                        ),
                    );
                    unusable.push(*obs);
                }
            }
            None => {
                diags.warn(
                    obs.pointer(),
                    format!(
                        "'{}' on {} has no numeric {}; recorded as unknown",
                        obs.test,
                        obs.machine,
                        basis.map_or_else(|| "values or time".to_string(), |b| b.to_string())
                    ),
                );
                unusable.push(*obs);
            }
        }
    }

    ScoredGroup {
        basis,
        unit: unit.unwrap_or_default(),
        usable,
        unusable,
    }
}

/// Ranks every comparison group of the document.
pub fn compare_performance(document: &CanonicalDocument, diags: &mut Diagnostics<'_>) -> Vec<PerfGroup> {
    comparison_groups(document)
        .iter()
        .filter_map(|group| rank_group(document, group, diags))
        .collect()
}

fn rank_group(
    document: &CanonicalDocument,
    group: &ComparisonGroup<'_>,
    diags: &mut Diagnostics<'_>,
) -> Option<PerfGroup> {
    let key = &group.key;
    let scored = score_group(group, diags);

    // Reference: the leader.
    let mut usable = scored.usable;
    usable.sort_by(|a, b| best_first(&a.1, &b.1).then_with(|| a.0.machine.cmp(b.0.machine)));
    let Some(&(_, leader)) = usable.first() else {
        let pointer = group
            .present
            .values()
            .next()
            .map(|o| o.pointer())
            .unwrap_or_default();
        diags.error(
            pointer,
            format!(
                "no usable score for '{}' ({}) on {} at {} threads; group omitted",
                key.test, key.benchmark, key.os, key.thread
            ),
        );
        return None;
    };

    let mut ranking = Vec::with_capacity(group.present.len() + group.missing.len());
    for (index, (obs, score)) in usable.iter().enumerate() {
        let relative = match leader.direction {
            Direction::HigherIsBetter => ratio(score.value, leader.value),
            Direction::LowerIsBetter => ratio(leader.value, score.value),
        };
        let relative_performance = match relative {
            Some(r) => Assessed::Value(round_to(r, RATIO_PLACES)),
            None => {
                diags.warn(
                    obs.pointer(),
                    format!(
                        "relative performance of {} on '{}' has a zero denominator; recorded as unknown",
                        obs.machine, key.test
                    ),
                );
                Assessed::Unknown
            }
        };
        ranking.push(PerfRow {
            rank: Some(index + 1),
            machine: obs.machine.to_string(),
            csp: obs.node.csp,
            score: Assessed::Value(score.value),
            relative_performance,
        });
    }

    for obs in &scored.unusable {
        ranking.push(unknown_row(obs.machine, obs.node.csp));
    }
    for &machine in &group.missing {
        diags.warn(
            thread_pointer(machine, key.os, key.category, key.benchmark, key.thread),
            format!(
                "{} ran {} at {} threads but recorded no '{}'; recorded as unknown",
                machine, key.benchmark, key.thread, key.test
            ),
        );
        let csp = document.machines.get(machine).map_or(Csp::Unknown, |n| n.csp);
        ranking.push(unknown_row(machine, csp));
    }
    ranking[usable.len()..].sort_by(|a, b| a.machine.cmp(&b.machine));

    Some(PerfGroup {
        os: key.os.to_string(),
        thread: key.thread,
        category: key.category.to_string(),
        benchmark: key.benchmark.to_string(),
        test: key.test.to_string(),
        unit: scored.unit,
        basis: leader.basis,
        direction: leader.direction,
        ranking,
    })
}

fn unknown_row(machine: &str, csp: Csp) -> PerfRow {
    PerfRow {
        rank: None,
        machine: machine.to_string(),
        csp,
        score: Assessed::Unknown,
        relative_performance: Assessed::Unknown,
    }
}

impl ReportBody for Vec<PerfGroup> {
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
            md.push_str(&format!("Unit: {} ({:?})\n\n", cell(&group.unit), group.direction));
            md.push_str("| Rank | Machine | CSP | Score | Relative |\n");
            md.push_str("|------|---------|-----|-------|----------|\n");
            for row in &group.ranking {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    row.rank.map_or_else(|| "-".to_string(), |r| r.to_string()),
                    cell(&row.machine),
                    row.csp,
                    row.score,
                    row.relative_performance
                ));
            }
            md.push('\n');
        }
    }

    fn record_count(&self) -> usize {
        self.len()
    }
}
