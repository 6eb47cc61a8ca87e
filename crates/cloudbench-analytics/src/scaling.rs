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

//! Thread-scaling curves.
//!
//! For each (machine, OS, category, benchmark, test) the performance at
//! every thread count is expressed as a percentage of the performance at
//! the highest thread count with a usable score, which reads exactly 100.

use crate::diagnostics::Diagnostics;
use crate::performance::RATIO_PLACES;
use crate::report::{cell, ReportBody};
use crate::score::{ratio, Basis, Direction, Score};
use crate::walk::{observations, Observation};
use cloudbench_core::{round_to, Assessed, CanonicalDocument};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Value of the reference point.
pub const REFERENCE_PERCENT: f64 = 100.0;

/// Scaling of one test on one machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalingCurve {
    /// Machine identifier.
    pub machine: String,
    /// Operating system.
    pub os: String,
    /// Benchmark category.
    pub category: String,
    /// Benchmark directory name.
    pub benchmark: String,
    /// Canonical test key.
    pub test: String,
    /// Unit of the underlying scores.
    pub unit: String,
    /// Field the scores were taken from.
    pub basis: Basis,
    /// Direction of the underlying scores.
    pub direction: Direction,
    /// Thread count normalized to 100.
    pub reference_thread: u32,
    /// Thread count -> percent of the reference performance.
    pub scaling: BTreeMap<u32, Assessed>,
}

type CurveKey<'a> = (&'a str, &'a str, &'a str, &'a str, &'a str);

/// Builds a curve for every test recorded at two or more thread counts.
pub fn compare_scaling(document: &CanonicalDocument, diags: &mut Diagnostics<'_>) -> Vec<ScalingCurve> {
    let mut series: BTreeMap<CurveKey<'_>, Vec<Observation<'_>>> = BTreeMap::new();
    for obs in observations(document) {
        series
            .entry((obs.machine, obs.os, obs.category, obs.benchmark, obs.test))
            .or_default()
            .push(obs);
    }

    series
        .into_values()
        .filter_map(|points| build_curve(&points, diags))
        .collect()
}

fn build_curve(points: &[Observation<'_>], diags: &mut Diagnostics<'_>) -> Option<ScalingCurve> {
    let first = points.first()?;
    if points.len() < 2 {
        debug!(machine = first.machine, test = first.test, "single thread count; no scaling curve");
        return None;
    }

    let basis = Basis::common(points.iter().map(|o| o.entry));
    let performance: Vec<(&Observation<'_>, Option<(Score, f64)>)> = points
        .iter()
        .map(|obs| {
            let scored = basis
                .and_then(|b| Score::with_basis(obs.entry, b))
                .and_then(|s| s.performance().filter(|p| *p > 0.0).map(|p| (s, p)));
            (obs, scored)
        })
        .collect();

    let usable = performance.iter().filter(|(_, p)| p.is_some()).count();
    if usable < 2 {
        debug!(
            machine = first.machine,
            test = first.test,
            usable,
            "fewer than two usable thread counts; no scaling curve"
        );
        return None;
    }

    // Reference: the highest thread count with a usable score. Points are
    // in ascending thread order.
    let (reference_obs, (reference_score, reference_perf)) = performance
        .iter()
        .rev()
        .find_map(|(obs, p)| p.map(|p| (*obs, p)))?;

    let mut scaling = BTreeMap::new();
    for (obs, scored) in &performance {
        let value = if obs.thread == reference_obs.thread {
            Assessed::Value(REFERENCE_PERCENT)
        } else {
            match scored.and_then(|(_, p)| ratio(p, reference_perf)) {
                Some(r) => Assessed::Value(round_to(r * REFERENCE_PERCENT, RATIO_PLACES)),
                None => {
                    diags.warn(
                        obs.pointer(),
                        format!(
                            "'{}' on {} at {} threads has no usable score; recorded as unknown",
                            obs.test, obs.machine, obs.thread
                        ),
                    );
                    Assessed::Unknown
                }
            }
        };
        scaling.insert(obs.thread, value);
    }

    Some(ScalingCurve {
        machine: first.machine.to_string(),
        os: first.os.to_string(),
        category: first.category.to_string(),
        benchmark: first.benchmark.to_string(),
        test: first.test.to_string(),
        unit: reference_obs.entry.unit.clone(),
        basis: reference_score.basis,
        direction: reference_score.direction,
        reference_thread: reference_obs.thread,
        scaling,
    })
}

impl ReportBody for Vec<ScalingCurve> {
    fn render_markdown(&self, md: &mut String) {
        md.push_str("| Machine | OS | Benchmark | Test | Scaling (threads: %) |\n");
        md.push_str("|---------|----|-----------|------|----------------------|\n");
        for curve in self {
            let points: Vec<String> = curve
                .scaling
                .iter()
                .map(|(thread, value)| format!("{}: {}", thread, value))
                .collect();
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                cell(&curve.machine),
                cell(&curve.os),
                cell(&curve.benchmark),
                cell(&curve.test),
                points.join(", ")
            ));
        }
    }

    fn record_count(&self) -> usize {
        self.len()
    }
}
