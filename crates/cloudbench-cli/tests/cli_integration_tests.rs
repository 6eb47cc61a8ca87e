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

//! CLI integration tests

use assert_cmd::Command;
use cloudbench_core::write_json_atomic;
use cloudbench_test::fixtures::{logs, DocumentBuilder, EntryBuilder, ResultsTree};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// Test helper to create a cloudbench command
fn cloudbench_cmd() -> Command {
    Command::cargo_bin("cloudbench").expect("Failed to find cloudbench binary")
}

fn results_tree() -> ResultsTree {
    let tree = ResultsTree::new();
    for (machine, base) in [("m8g.xlarge", 100.0), ("m7i.xlarge", 80.0)] {
        let bench = tree.bench(&format!("{machine}/Ubuntu_24_04/Processor/coremark-1.0.1"));
        for thread in [1, 4] {
            let score = base * thread as f64;
            bench
                .log(thread, &logs::single_result("CoreMark 1.0", &[score], score, "Iterations/Sec"))
                .perf_summary(thread, 10.0, 1.2);
        }
    }
    tree
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn write_document(path: &Path, version: &str, machine: &str) {
    let doc = DocumentBuilder::new()
        .version(version)
        .test(machine, "coremark-1.0.1", 1, "CoreMark", EntryBuilder::value(100.0, "Iterations/Sec"))
        .test(machine, "coremark-1.0.1", 4, "CoreMark", EntryBuilder::value(390.0, "Iterations/Sec"))
        .build();
    write_json_atomic(path, &doc).unwrap();
}

// ===== Help and Version Tests =====

#[test]
fn test_help_output() {
    cloudbench_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cloudbench - cross-cloud benchmark aggregation and analytics"))
        .stdout(predicate::str::contains("aggregate"))
        .stdout(predicate::str::contains("analyze"));
}

#[test]
fn test_version_output() {
    cloudbench_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cloudbench"));
}

#[test]
fn test_no_subcommand_fails() {
    cloudbench_cmd().assert().failure();
}

// ===== Aggregate Command Tests =====

#[test]
fn test_aggregate_writes_document() {
    let tree = results_tree();
    let out = TempDir::new().unwrap();
    let output = out.path().join("one_big_json.json");

    cloudbench_cmd()
        .args(["aggregate", "-D"])
        .arg(tree.root())
        .arg("-O")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("✓"))
        .stdout(predicate::str::contains("Machines: 2"))
        .stdout(predicate::str::contains("Thread entries: 4"));

    let doc = read_json(&output);
    assert!(doc["generation log"]["version info"].as_str().unwrap().starts_with('v'));
    let test = &doc["m8g.xlarge"]["os"]["Ubuntu_24_04"]["Processor"]["coremark-1.0.1"]["4"]["test_name"]["CoreMark 1.0"];
    assert_eq!(test["values"], 400.0);
    assert_eq!(doc["m7i.xlarge"]["CSP"], "aws");
}

#[test]
fn test_aggregate_missing_root_fails() {
    let out = TempDir::new().unwrap();
    cloudbench_cmd()
        .args(["aggregate", "-D", "/nonexistent/cloudbench/results", "-O"])
        .arg(out.path().join("out.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_aggregate_declined_overwrite_keeps_file() {
    let tree = results_tree();
    let out = TempDir::new().unwrap();
    let output = out.path().join("existing.json");
    fs::write(&output, "keep me").unwrap();

    cloudbench_cmd()
        .args(["aggregate", "-D"])
        .arg(tree.root())
        .arg("-O")
        .arg(&output)
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");
}

#[test]
fn test_aggregate_eof_declines_overwrite() {
    let tree = results_tree();
    let out = TempDir::new().unwrap();
    let output = out.path().join("existing.json");
    fs::write(&output, "keep me").unwrap();

    cloudbench_cmd()
        .args(["aggregate", "-D"])
        .arg(tree.root())
        .arg("-O")
        .arg(&output)
        .write_stdin("")
        .assert()
        .failure();
    assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");
}

#[test]
fn test_aggregate_force_overwrites() {
    let tree = results_tree();
    let out = TempDir::new().unwrap();
    let output = out.path().join("existing.json");
    fs::write(&output, "old").unwrap();

    cloudbench_cmd()
        .args(["aggregate", "-F", "-D"])
        .arg(tree.root())
        .arg("-O")
        .arg(&output)
        .assert()
        .success();
    assert!(read_json(&output).get("m8g.xlarge").is_some());
}

#[test]
fn test_aggregate_with_custom_lut() {
    let tree = ResultsTree::new();
    tree.bench("lab-box/Debian_12/Processor/coremark-1.0.1")
        .log(2, "Average: 10 Iterations/Sec\n")
        .perf_summary(2, 36.0, 1.0);
    let out = TempDir::new().unwrap();
    let lut = out.path().join("lut.json");
    fs::write(
        &lut,
        r#"[{"id": "lab-box", "csp": "aws", "vcpu": 2, "cpu_name": "Lab", "cpu_isa": "arm64", "cost_hour": 1.0}]"#,
    )
    .unwrap();
    let output = out.path().join("out.json");

    cloudbench_cmd()
        .args(["aggregate", "-D"])
        .arg(tree.root())
        .arg("--lut")
        .arg(&lut)
        .arg("-O")
        .arg(&output)
        .assert()
        .success();

    let doc = read_json(&output);
    assert_eq!(doc["lab-box"]["CSP"], "aws");
    assert_eq!(doc["lab-box"]["total_vcpu"], 2);
    assert_eq!(doc["lab-box"]["cost_hour[730h-mo]"], 1.0);
    assert!(doc["lab-box"]["os"]["Debian_12"]["Processor"]["coremark-1.0.1"]["2"].is_object());
}

// ===== Merge Tests =====

#[test]
fn test_merge_requires_output() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.json");
    write_document(&a, "v1.0.0-gabc1234", "m8g.xlarge");

    cloudbench_cmd()
        .args(["aggregate", "-M"])
        .arg(&a)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output"));
}

#[test]
fn test_merge_combines_documents() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    write_document(&a, "v1.0.0-gabc1234", "m8g.xlarge");
    write_document(&b, "v1.0.0-gabc1234", "c4a-standard-4");
    let output = dir.path().join("merged.json");

    cloudbench_cmd()
        .args(["aggregate", "-O"])
        .arg(&output)
        .arg("-M")
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged 2 documents"));

    let doc = read_json(&output);
    assert_eq!(doc["generation log"]["version info"], "v1.0.0-gabc1234");
    assert!(doc.get("m8g.xlarge").is_some());
    assert!(doc.get("c4a-standard-4").is_some());
}

#[test]
fn test_merge_version_mismatch_is_fatal() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    write_document(&a, "v1.0.0-gabc1234", "m8g.xlarge");
    write_document(&b, "v1.1.0-gdef5678", "c4a-standard-4");
    let output = dir.path().join("merged.json");

    cloudbench_cmd()
        .args(["aggregate", "-O"])
        .arg(&output)
        .arg("-M")
        .arg(&a)
        .arg(&b)
        .assert()
        .failure()
        .stderr(predicate::str::contains("version mismatch"));
    assert!(!output.exists());
}

// ===== Analyze Command Tests =====

#[test]
fn test_analyze_all_reports_into_directory() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("one_big_json.json");
    write_document(&input, "v1.0.0-gabc1234", "m8g.xlarge");
    let reports = dir.path().join("reports");

    cloudbench_cmd()
        .arg("analyze")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&reports)
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Performance comparison"))
        .stdout(predicate::str::contains("✓ Thread scaling"));

    for name in [
        "perf_comparison.json",
        "cost_comparison.json",
        "thread_scaling.json",
        "csp_instance_comparison.json",
    ] {
        assert!(reports.join(name).is_file(), "{name} missing");
    }
    let scaling = read_json(&reports.join("thread_scaling.json"));
    assert_eq!(scaling["report"], "scaling");
    assert_eq!(scaling["results"][0]["scaling"]["4"], 100.0);
    assert_eq!(scaling["source_version"], "v1.0.0-gabc1234");
}

#[test]
fn test_analyze_single_report_to_file_with_markdown() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("doc.json");
    write_document(&input, "v1.0.0-gabc1234", "m8g.xlarge");
    let output = dir.path().join("cost.json");

    cloudbench_cmd()
        .args(["analyze", "--cost", "--markdown", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(read_json(&output)["report"], "cost");
    let md = fs::read_to_string(dir.path().join("cost.md")).unwrap();
    assert!(md.starts_with("# Cost efficiency"));
}

#[test]
fn test_analyze_succeeds_when_some_reports_fail() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("doc.json");
    let doc = DocumentBuilder::new()
        .test("m8g.xlarge", "coremark", 4, "CoreMark", EntryBuilder::value(10.0, "ops"))
        .build();
    write_json_atomic(&input, &doc).unwrap();

    cloudbench_cmd()
        .args(["analyze", "--perf", "--th", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(dir.path().join("reports"))
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Performance comparison"))
        .stdout(predicate::str::contains("✗ Thread scaling"));
}

#[test]
fn test_analyze_fails_when_every_report_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("doc.json");
    write_json_atomic(&input, &DocumentBuilder::new().build()).unwrap();

    cloudbench_cmd()
        .args(["analyze", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(dir.path().join("reports"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("None of the 4 requested reports"));
}

#[test]
fn test_analyze_invalid_document_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("doc.json");
    fs::write(&input, "{\n  \"m8g.xlarge\": [\n").unwrap();

    cloudbench_cmd()
        .args(["analyze", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid document"));
}
