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

//! End-to-end aggregation over on-disk results trees.

use cloudbench_aggregate::{AggregateConfig, Aggregator};
use cloudbench_core::{merge_documents, CanonicalDocument, Csp, MachineLut, Reading};
use cloudbench_test::fixtures::{logs, ResultsTree, StructuredExport};
use std::path::{Path, PathBuf};

// ===== Test Helpers =====

fn aggregate(roots: &[&Path]) -> CanonicalDocument {
    aggregate_with(roots, AggregateConfig::default())
}

fn aggregate_with(roots: &[&Path], config: AggregateConfig) -> CanonicalDocument {
    let lut = MachineLut::builtin();
    let roots: Vec<PathBuf> = roots.iter().map(|p| p.to_path_buf()).collect();
    Aggregator::with_config(&lut, config)
        .aggregate(&roots)
        .expect("aggregation failed")
        .document
}

fn multi_machine_tree() -> ResultsTree {
    let tree = ResultsTree::new();
    for machine in ["m8g.xlarge", "c4-standard-4", "Standard_D4ps_v6"] {
        let coremark = tree.bench(&format!("{machine}/Ubuntu_24_04/Processor/coremark-1.0.1"));
        for thread in [1, 4] {
            coremark
                .log(thread, &logs::single_result("CoreMark 1.0", &[100.0 * thread as f64], 100.0 * thread as f64, "Iterations/Sec"))
                .perf_summary(thread, 30.0 / thread as f64, 1.5);
        }
        tree.bench(&format!("{machine}/Ubuntu_24_04/Memory/stream-1.3.4"))
            .log(4, logs::STREAM);
    }
    tree
}

// ===== Scenarios =====

#[test]
fn test_average_only_log_scenario() {
    let tree = ResultsTree::new();
    tree.bench("m8g.xlarge/Ubuntu_24_04/Processor/coremark-1.0.1")
        .log(4, "Average: 1234.56 Iterations/Sec\n");

    let doc = aggregate(&[tree.root()]);
    let entry = doc
        .thread("m8g.xlarge", "Ubuntu_24_04", "Processor", "coremark-1.0.1", 4)
        .unwrap();
    assert_eq!(entry.test_name.len(), 1);
    let test = entry.test_name.values().next().unwrap();
    assert_eq!(test.values, Reading::Value(1234.56));
    assert_eq!(test.raw_values, Reading::Value(vec![1234.56]));
    assert_eq!(test.unit, "Iterations/Sec");
    assert_eq!(test.time, Reading::NotAvailable);
    assert_eq!(test.test_run_times, Reading::NotAvailable);
    assert_eq!(test.cost, 0.0);

    let json = doc.to_json_pretty().unwrap();
    assert!(json.contains("\"time\": \"N/A\""));
    assert!(json.contains("\"test_run_times\": \"N/A\""));
}

#[test]
fn test_structured_non_time_selects_generic_strategy() {
    let tree = ResultsTree::new();
    let export = StructuredExport::new()
        .result("r", "CoreMark", "", "Iterations/Sec", 500.0, &[490.0, 510.0], &[20.0, 22.0])
        .build();
    tree.bench("m8g.xlarge/Ubuntu_24_04/Processor/coremark-1.0.1")
        .structured(4, &export)
        .log(4, logs::STREAM);

    let doc = aggregate(&[tree.root()]);
    let entry = doc
        .thread("m8g.xlarge", "Ubuntu_24_04", "Processor", "coremark-1.0.1", 4)
        .unwrap();
    assert_eq!(entry.test_name.keys().collect::<Vec<_>>(), vec!["CoreMark"]);
    let test = &entry.test_name["CoreMark"];
    assert_eq!(test.time, Reading::Value(21.0));
    assert_eq!(test.cost, cloudbench_core::cost_usd(0.17952, &Reading::Value(21.0)));
}

#[test]
fn test_nested_machine_resolves_innermost() {
    let tree = ResultsTree::new();
    tree.bench("m7i.xlarge/results/m7i.xlarge/Rocky_9/Processor/coremark-1.0.1")
        .log(2, "Average: 10 Iterations/Sec\n");

    let doc = aggregate(&[tree.root()]);
    assert_eq!(doc.machines.len(), 1);
    assert!(doc
        .thread("m7i.xlarge", "Rocky_9", "Processor", "coremark-1.0.1", 2)
        .is_some());
}

#[test]
fn test_os_rooted_invocation() {
    let tree = ResultsTree::new();
    tree.bench("c4-standard-8/Ubuntu_24_04/Processor/coremark-1.0.1")
        .log(8, "Average: 10 Iterations/Sec\n");

    let doc = aggregate(&[&tree.path("c4-standard-8/Ubuntu_24_04")]);
    let node = &doc.machines["c4-standard-8"];
    assert_eq!(node.csp, Csp::Gcp);
    assert_eq!(node.total_vcpu, 8);
    assert!(node.os.contains_key("Ubuntu_24_04"));
}

#[test]
fn test_multiple_machines_under_one_root() {
    let tree = multi_machine_tree();
    let doc = aggregate(&[tree.root()]);
    assert_eq!(doc.machines.len(), 3);
    assert_eq!(doc.machines["Standard_D4ps_v6"].csp, Csp::Azure);
    // 2 coremark threads + 1 stream thread per machine
    assert_eq!(doc.thread_entry_count(), 9);

    let entry = doc
        .thread("c4-standard-4", "Ubuntu_24_04", "Processor", "coremark-1.0.1", 4)
        .unwrap();
    assert_eq!(entry.perf_stat.elapsed_time_sec, Some(7.5));
    assert_eq!(entry.perf_stat.ipc, Some(1.5));
}

#[test]
fn test_split_then_merge_matches_single_run() {
    let tree = multi_machine_tree();
    let whole = aggregate(&[tree.root()]);

    let parts: Vec<(PathBuf, CanonicalDocument)> = ["m8g.xlarge", "c4-standard-4", "Standard_D4ps_v6"]
        .iter()
        .map(|m| (PathBuf::from(*m), aggregate(&[&tree.path(m)])))
        .collect();
    let (merged, stats) = merge_documents(parts).unwrap();

    assert_eq!(stats.documents, 3);
    assert_eq!(stats.overlapping_tests, 0);
    assert_eq!(merged.machines, whole.machines);
    assert_eq!(
        serde_json::to_value(&merged.machines).unwrap(),
        serde_json::to_value(&whole.machines).unwrap()
    );
}

#[test]
fn test_parallel_and_serial_agree() {
    let tree = multi_machine_tree();
    let serial = aggregate_with(
        &[tree.root()],
        AggregateConfig {
            parallel_threshold: usize::MAX,
            ..Default::default()
        },
    );
    let parallel = aggregate_with(
        &[tree.root()],
        AggregateConfig {
            parallel_threshold: 0,
            ..Default::default()
        },
    );
    assert_eq!(serial.machines, parallel.machines);
}

#[test]
fn test_perf_summary_recovery_carries_cost() {
    let tree = ResultsTree::new();
    tree.bench("c4-standard-4/Ubuntu_24_04/Processor/openssl-3.0.1")
        .log(4, "no recognizable results\n")
        .perf_summary(4, 42.43, 2.0);

    let doc = aggregate(&[tree.root()]);
    let entry = doc
        .thread("c4-standard-4", "Ubuntu_24_04", "Processor", "openssl-3.0.1", 4)
        .unwrap();
    let test = &entry.test_name["openssl-3.0.1"];
    assert_eq!(test.values, Reading::NotAvailable);
    assert_eq!(test.time, Reading::Value(42.43));
    assert_eq!(test.cost, 0.00268);
}

#[test]
fn test_unknown_machine_kept_with_unknown_metadata() {
    let tree = ResultsTree::new();
    tree.bench("lab-box/Debian_12/Processor/coremark-1.0.1")
        .log(4, "Average: 10 Iterations/Sec\n")
        .perf_summary(4, 10.0, 1.0);

    let lut = MachineLut::builtin();
    let result = Aggregator::new(&lut)
        .aggregate(&[tree.root().to_path_buf()])
        .unwrap();
    let node = &result.document.machines["lab-box"];
    assert_eq!(node.csp, Csp::Unknown);
    assert_eq!(node.cost_hour, 0.0);
    assert!(node.os.contains_key("Debian_12"));
    assert!(result.summary.unknown_machines.contains("lab-box"));
}

#[test]
fn test_frequency_samples_attached() {
    let tree = ResultsTree::new();
    tree.bench("m8g.xlarge/Ubuntu_24_04/Processor/coremark-1.0.1")
        .log(2, "Average: 10 Iterations/Sec\n")
        .freq(2, &[2600.0, 2650.0], &[2500.0, 2550.0]);

    let doc = aggregate(&[tree.root()]);
    let perf = &doc
        .thread("m8g.xlarge", "Ubuntu_24_04", "Processor", "coremark-1.0.1", 2)
        .unwrap()
        .perf_stat;
    assert_eq!(perf.start_freq_mhz, Some(vec![2600.0, 2650.0]));
    assert_eq!(perf.end_freq_mhz, Some(vec![2500.0, 2550.0]));
}

#[test]
fn test_coloured_crlf_log() {
    let tree = ResultsTree::new();
    tree.bench("m8g.xlarge/Ubuntu_24_04/Processor/coremark-1.0.1")
        .log(4, logs::COLOURED_CRLF);

    let doc = aggregate(&[tree.root()]);
    let entry = doc
        .thread("m8g.xlarge", "Ubuntu_24_04", "Processor", "coremark-1.0.1", 4)
        .unwrap();
    let test = &entry.test_name["CoreMark 1.0"];
    assert_eq!(test.description, "CoreMark Size 666 - Iterations Per Second");
    assert_eq!(test.values, Reading::Value(1234.56));
    assert_eq!(test.raw_values, Reading::Value(vec![1230.5, 1238.62]));
}

#[test]
fn test_malformed_artifact_skips_thread_only() {
    let tree = ResultsTree::new();
    tree.bench("m8g.xlarge/Ubuntu_24_04/Processor/coremark-1.0.1")
        .write("1-thread.json", "{ not json")
        .log(4, "Average: 10 Iterations/Sec\n");

    let lut = MachineLut::builtin();
    let result = Aggregator::new(&lut)
        .aggregate(&[tree.root().to_path_buf()])
        .unwrap();
    assert_eq!(result.summary.failed_threads, 1);
    assert_eq!(result.summary.thread_entries, 1);
}

#[test]
fn test_non_finite_readings_keep_document_readable() {
    let tree = ResultsTree::new();
    tree.bench("m8g.xlarge/Ubuntu_24_04/Processor/coremark-1.0.1")
        .log(4, "Average: 1e999 Iterations/Sec\n")
        .log(8, "Huge:\n    Average: 1e999 ms\nFine:\n        nan\n        4\n    Average: 4 ms\n");
    tree.bench("m8g.xlarge/Ubuntu_24_04/Memory/stream-1.3.4").write(
        "4-thread.json",
        r#"{"results": {"r": {"title": "Copy", "scale": "MB/s",
            "results": {"s": {"value": "inf", "raw_values": "nan:1e999", "test_run_times": [10, "Infinity", 12]}}}}}"#,
    );

    let doc = aggregate(&[tree.root()]);
    assert!(doc
        .thread("m8g.xlarge", "Ubuntu_24_04", "Processor", "coremark-1.0.1", 4)
        .is_none());

    let log_entry = doc
        .thread("m8g.xlarge", "Ubuntu_24_04", "Processor", "coremark-1.0.1", 8)
        .unwrap();
    assert_eq!(log_entry.test_name.keys().collect::<Vec<_>>(), vec!["Fine"]);
    assert_eq!(log_entry.test_name["Fine"].raw_values, Reading::Value(vec![4.0]));

    let structured = &doc
        .thread("m8g.xlarge", "Ubuntu_24_04", "Memory", "stream-1.3.4", 4)
        .unwrap()
        .test_name["Copy"];
    assert_eq!(structured.values, Reading::NotAvailable);
    assert_eq!(structured.raw_values, Reading::NotAvailable);
    assert_eq!(structured.time, Reading::Value(11.0));

    let json = doc.to_json_pretty().unwrap();
    assert!(!json.contains("null"));
    let reread = CanonicalDocument::from_json_str(&json, Path::new("one_big_json.json")).unwrap();
    assert_eq!(reread.machines, doc.machines);
}
