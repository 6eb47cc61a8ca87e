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

//! Per-thread raw artifacts.
//!
//! For thread count `N` a benchmark directory may hold:
//!
//! | File | Content |
//! |---|---|
//! | `N-thread.log` | free-text execution log |
//! | `N-thread.json` | structured result export |
//! | `N-thread_perf_summary.json` | perf counters |
//! | `N-thread_freq_start.txt` / `N-thread_freq_end.txt` | per-core MHz samples |
//!
//! Every reader treats a missing file as absence, not as an error.

use crate::error::ExtractError;
use cloudbench_core::io::read_bounded;
use cloudbench_core::{finite, parse_finite, PerfStat};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

static ANSI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b[@-Z\\-_]")
        .expect("valid ANSI pattern")
});

/// Strips terminal escape sequences and normalizes line endings.
///
/// Carriage returns (CRLF or bare progress-bar `\r`) become newlines; other
/// control characters except tab are dropped.
pub fn clean_log(text: &str) -> String {
    let stripped = ANSI_RE.replace_all(text, "");
    stripped
        .replace("\r\n", "\n")
        .chars()
        .map(|c| if c == '\r' { '\n' } else { c })
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Paths of the artifacts of one thread count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadArtifacts {
    dir: PathBuf,
    thread: u32,
}

impl ThreadArtifacts {
    /// Artifacts of `thread` in `dir`.
    pub fn new(dir: &Path, thread: u32) -> Self {
        Self {
            dir: dir.to_path_buf(),
            thread,
        }
    }

    /// Thread count.
    pub fn thread(&self) -> u32 {
        self.thread
    }

    /// `N-thread.log`
    pub fn log(&self) -> PathBuf {
        self.file("thread.log")
    }

    /// `N-thread.json`
    pub fn structured(&self) -> PathBuf {
        self.file("thread.json")
    }

    /// `N-thread_perf_summary.json`
    pub fn perf_summary(&self) -> PathBuf {
        self.file("thread_perf_summary.json")
    }

    /// `N-thread_freq_start.txt`
    pub fn freq_start(&self) -> PathBuf {
        self.file("thread_freq_start.txt")
    }

    /// `N-thread_freq_end.txt`
    pub fn freq_end(&self) -> PathBuf {
        self.file("thread_freq_end.txt")
    }

    fn file(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}-{suffix}", self.thread))
    }
}

fn read_optional(path: &Path, limit: u64) -> Result<Option<String>, ExtractError> {
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(read_bounded(path, limit)?))
}

/// Reads and cleans the execution log, if present.
pub fn read_log(artifacts: &ThreadArtifacts, limit: u64) -> Result<Option<String>, ExtractError> {
    Ok(read_optional(&artifacts.log(), limit)?.map(|text| clean_log(&text)))
}

#[derive(Debug, Default, Deserialize)]
struct PerfSummaryFile {
    #[serde(default)]
    elapsed_time_sec: Option<NumberLike>,
    #[serde(default)]
    ipc: Option<NumberLike>,
    #[serde(default)]
    total_cycles: Option<NumberLike>,
    #[serde(default)]
    total_instructions: Option<NumberLike>,
    #[serde(default)]
    cpu_utilization_percent: Option<NumberLike>,
}

/// Reads the perf summary and frequency samples into a [`PerfStat`].
pub fn read_perf_stat(artifacts: &ThreadArtifacts, limit: u64) -> Result<PerfStat, ExtractError> {
    let mut perf = PerfStat::default();

    let summary_path = artifacts.perf_summary();
    if let Some(text) = read_optional(&summary_path, limit)? {
        let summary: PerfSummaryFile = serde_json::from_str(&text)
            .map_err(|e| ExtractError::malformed(&summary_path, e.to_string()))?;
        let num = |v: &Option<NumberLike>| v.as_ref().and_then(NumberLike::as_f64);
        perf.elapsed_time_sec = num(&summary.elapsed_time_sec);
        perf.ipc = num(&summary.ipc);
        perf.total_cycles = num(&summary.total_cycles).map(|v| v as u64);
        perf.total_instructions = num(&summary.total_instructions).map(|v| v as u64);
        perf.cpu_utilization_percent = num(&summary.cpu_utilization_percent);
    }

    perf.start_freq_mhz = read_optional(&artifacts.freq_start(), limit)?
        .map(|t| parse_frequencies(&t))
        .filter(|v| !v.is_empty());
    perf.end_freq_mhz = read_optional(&artifacts.freq_end(), limit)?
        .map(|t| parse_frequencies(&t))
        .filter(|v| !v.is_empty());

    Ok(perf)
}

/// Takes the last numeric token of every line.
pub fn parse_frequencies(text: &str) -> Vec<f64> {
    text.lines()
        .filter_map(|line| {
            line.split(|c: char| c.is_whitespace() || c == ':' || c == '=')
                .filter_map(parse_finite)
                .last()
        })
        .collect()
}

/// A number given as a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NumberLike {
    Number(f64),
    Text(String),
}

impl NumberLike {
    fn as_f64(&self) -> Option<f64> {
        match self {
            NumberLike::Number(n) => finite(*n),
            NumberLike::Text(s) => parse_finite(s),
        }
    }
}

/// A number sequence given as a JSON array or a `:`-joined string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NumberList {
    List(Vec<NumberLike>),
    Joined(String),
}

impl NumberList {
    fn to_vec(&self) -> Vec<f64> {
        match self {
            NumberList::List(items) => items.iter().filter_map(NumberLike::as_f64).collect(),
            NumberList::Joined(s) => s
                .split(':').filter_map(parse_finite).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExportFile {
    #[serde(default)]
    results: BTreeMap<String, ExportResult>,
}

#[derive(Debug, Deserialize)]
struct ExportResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    scale: String,
    #[serde(default)]
    results: BTreeMap<String, SystemResult>,
}

#[derive(Debug, Deserialize)]
struct SystemResult {
    #[serde(default)]
    value: Option<NumberLike>,
    #[serde(default)]
    raw_values: Option<NumberList>,
    #[serde(default)]
    test_run_times: Option<NumberList>,
}

/// One result of a structured export.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredResult {
    /// Test title.
    pub title: String,
    /// Test description.
    pub description: String,
    /// Unit of the value.
    pub unit: String,
    /// Representative value.
    pub value: Option<f64>,
    /// Per-iteration values.
    pub raw_values: Option<Vec<f64>>,
    /// Per-iteration times, seconds.
    pub test_run_times: Option<Vec<f64>>,
}

/// Parses a structured export. Results without any system entry are dropped.
pub fn parse_structured(text: &str, path: &Path) -> Result<Vec<StructuredResult>, ExtractError> {
    let export: ExportFile =
        serde_json::from_str(text).map_err(|e| ExtractError::malformed(path, e.to_string()))?;

    let results = export
        .results
        .into_values()
        .filter_map(|result| {
            let (_, system) = result.results.into_iter().next()?;
            let non_empty = |list: Option<NumberList>| list.map(|l| l.to_vec()).filter(|v| !v.is_empty());
            Some(StructuredResult {
                title: result.title,
                description: result.description,
                unit: result.scale,
                value: system.value.as_ref().and_then(NumberLike::as_f64),
                raw_values: non_empty(system.raw_values),
                test_run_times: non_empty(system.test_run_times),
            })
        })
        .collect();
    Ok(results)
}

/// Reads the structured export, if present.
pub fn read_structured(
    artifacts: &ThreadArtifacts,
    limit: u64,
) -> Result<Option<Vec<StructuredResult>>, ExtractError> {
    let path = artifacts.structured();
    match read_optional(&path, limit)? {
        Some(text) => parse_structured(&text, &path).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_clean_log_strips_ansi_and_crlf() {
        let raw = "\u{1b}[1;32mAverage: 1.5 ms\u{1b}[0m\r\nnext\rline\u{7}";
        assert_eq!(clean_log(raw), "Average: 1.5 ms\nnext\nline");
    }

    #[test]
    fn test_clean_log_osc_sequence() {
        assert_eq!(clean_log("\u{1b}]0;title\u{7}text"), "text");
    }

    #[test]
    fn test_artifact_names() {
        let a = ThreadArtifacts::new(Path::new("/r/bench"), 16);
        assert_eq!(a.log(), PathBuf::from("/r/bench/16-thread.log"));
        assert_eq!(a.structured(), PathBuf::from("/r/bench/16-thread.json"));
        assert_eq!(a.perf_summary(), PathBuf::from("/r/bench/16-thread_perf_summary.json"));
        assert_eq!(a.freq_end(), PathBuf::from("/r/bench/16-thread_freq_end.txt"));
    }

    #[test]
    fn test_non_finite_numbers_dropped() {
        let text = r#"{"results": {"r": {"title": "T", "scale": "ms",
            "results": {"s": {"value": "inf", "raw_values": "nan:4:1e999", "test_run_times": ["NaN", 2]}}}}}"#;
        let results = parse_structured(text, Path::new("4-thread.json")).unwrap();
        assert_eq!(results[0].value, None);
        assert_eq!(results[0].raw_values, Some(vec![4.0]));
        assert_eq!(results[0].test_run_times, Some(vec![2.0]));
        assert_eq!(parse_frequencies("cpu0: nan\ncpu1: 2600 inf\n"), vec![2600.0]);
    }

    #[test]
    fn test_parse_frequencies() {
        let text = "cpu0: 2600.000\ncpu MHz\t\t: 3100.5\nno number\n3000\n";
        assert_eq!(parse_frequencies(text), vec![2600.0, 3100.5, 3000.0]);
    }

    #[test]
    fn test_parse_structured_shapes() {
        let text = r#"{"results": {
            "b": {"title": "T", "description": "D2", "scale": "ms",
                  "results": {"sys": {"value": "2.5", "raw_values": "2:3", "test_run_times": [1, "2"]}}},
            "a": {"title": "T", "description": "D1", "scale": "MB/s",
                  "results": {"z": {"value": 1.0}, "y": {"value": 9.0}}},
            "c": {"title": "Empty", "results": {}}
        }}"#;
        let results = parse_structured(text, Path::new("4-thread.json")).unwrap();
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].description, "D1");
        assert_eq!(results[0].value, Some(9.0));
        assert_eq!(results[0].raw_values, None);

        assert_eq!(results[1].value, Some(2.5));
        assert_eq!(results[1].raw_values, Some(vec![2.0, 3.0]));
        assert_eq!(results[1].test_run_times, Some(vec![1.0, 2.0]));
    }

    #[test]
    fn test_parse_structured_malformed() {
        let err = parse_structured("{", Path::new("4-thread.json")).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedArtifact { .. }));
    }

    #[test]
    fn test_read_perf_stat() {
        let dir = TempDir::new().unwrap();
        let artifacts = ThreadArtifacts::new(dir.path(), 2);
        fs::write(
            artifacts.perf_summary(),
            r#"{"elapsed_time_sec": 12.5, "ipc": "1.8", "total_cycles": 1000, "extra": true}"#,
        )
        .unwrap();
        fs::write(artifacts.freq_start(), "cpu0: 2600\ncpu1: 2700\n").unwrap();

        let perf = read_perf_stat(&artifacts, u64::MAX).unwrap();
        assert_eq!(perf.elapsed_time_sec, Some(12.5));
        assert_eq!(perf.ipc, Some(1.8));
        assert_eq!(perf.total_cycles, Some(1000));
        assert_eq!(perf.total_instructions, None);
        assert_eq!(perf.start_freq_mhz, Some(vec![2600.0, 2700.0]));
        assert_eq!(perf.end_freq_mhz, None);
    }

    #[test]
    fn test_missing_artifacts_are_absent() {
        let dir = TempDir::new().unwrap();
        let artifacts = ThreadArtifacts::new(dir.path(), 1);
        assert!(read_log(&artifacts, u64::MAX).unwrap().is_none());
        assert!(read_structured(&artifacts, u64::MAX).unwrap().is_none());
        assert!(read_perf_stat(&artifacts, u64::MAX).unwrap().is_empty());
    }
}
