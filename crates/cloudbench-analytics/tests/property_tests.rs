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

//! Property tests for report invariants.

use cloudbench_analytics::AnalyticsEngine;
use cloudbench_core::{Assessed, CanonicalDocument, SourceMap};
use cloudbench_test::fixtures::{DocumentBuilder, EntryBuilder};
use proptest::prelude::*;

const MACHINES: [&str; 5] = [
    "m8g.xlarge",
    "m7i.xlarge",
    "c4a-standard-4",
    "c4-standard-4",
    "lab-box",
];
const THREADS: [u32; 4] = [1, 2, 4, 8];

/// (machine index, thread index, score, time-valued)
fn observation() -> impl Strategy<Value = (usize, usize, f64, bool)> {
    (0..MACHINES.len(), 0..THREADS.len(), 0.1f64..10_000.0, any::<bool>())
}

fn document(observations: &[(usize, usize, f64, bool)]) -> CanonicalDocument {
    observations
        .iter()
        .fold(DocumentBuilder::new(), |builder, &(m, t, score, timed)| {
            let entry = if timed {
                EntryBuilder::time_only(score)
            } else {
                EntryBuilder::value(score, "ops/s")
            };
            builder.test(MACHINES[m], "bench-1.0", THREADS[t], "test", entry)
        })
        .build()
}

proptest! {
    #[test]
    fn prop_scaling_curves_have_reference_at_100(obs in prop::collection::vec(observation(), 1..30)) {
        let doc = document(&obs);
        let map = SourceMap::empty();
        if let Ok(report) = AnalyticsEngine::new(&doc, &map).scaling() {
            for curve in &report.results {
                prop_assert!(curve.scaling.len() >= 2);
                prop_assert_eq!(curve.scaling[&curve.reference_thread], Assessed::Value(100.0));
                let usable_above = curve
                    .scaling
                    .range(curve.reference_thread + 1..)
                    .any(|(_, v)| !v.is_unknown());
                prop_assert!(!usable_above);
            }
        }
    }

    #[test]
    fn prop_cost_ranking_never_contains_unpriced(obs in prop::collection::vec(observation(), 1..30)) {
        let doc = document(&obs);
        let map = SourceMap::empty();
        if let Ok(report) = AnalyticsEngine::new(&doc, &map).cost() {
            for group in &report.results {
                for row in &group.ranking {
                    prop_assert!(row.cost_hour > 0.0);
                    prop_assert!(row.machine != "lab-box");
                }
            }
        }
    }

    #[test]
    fn prop_performance_leader_reads_one(obs in prop::collection::vec(observation(), 1..30)) {
        let doc = document(&obs);
        let map = SourceMap::empty();
        if let Ok(report) = AnalyticsEngine::new(&doc, &map).performance() {
            for group in &report.results {
                prop_assert_eq!(group.ranking[0].rank, Some(1));
                prop_assert_eq!(group.ranking[0].relative_performance, Assessed::Value(1.0));
                for row in &group.ranking {
                    if let Some(r) = row.relative_performance.as_f64() {
                        prop_assert!(r <= 1.0);
                    }
                }
            }
        }
    }
}
