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

//! Generic execution-log scanner.
//!
//! Recognized lines (after [`clean_log`](crate::artifacts::clean_log)):
//!
//! ```text
//! CoreMark 1.0:                          title (unindented, ends with ':')
//!     pts/coremark-1.0.1 [Size: 666]     option header, options become the description
//!     CoreMark Size 666 - Iterations:    description (indented, ends with ':')
//!         1234.1                         raw value
//!     Average: 1234.56 Iterations/Sec    result, closes the section
//! ```
//!
//! Everything else is ignored.

use cloudbench_core::parse_finite;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static RESULT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*Average:\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*(.*?)\s*$")
        .expect("valid result pattern")
});

static OPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s+pts/\S+(?:\s+\[(.*)\])?\s*$").expect("valid option pattern"));

static RAW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s+([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*$").expect("valid raw pattern")
});

/// One result found in a log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogResult {
    /// Section title, if a title line preceded the result.
    pub title: Option<String>,
    /// Description (empty when none was given).
    pub description: String,
    /// Value of the `Average:` line.
    pub value: f64,
    /// Unit of the `Average:` line.
    pub unit: String,
    /// Raw lines of the section; `[value]` when there were none.
    pub raw_values: Vec<f64>,
}

/// Scans a cleaned log for results in encounter order.
pub fn scan(text: &str) -> Vec<LogResult> {
    let mut results = Vec::new();
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut raws: Vec<f64> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(caps) = RESULT_RE.captures(line) {
            let Some(value) = parse_finite(&caps[1]) else {
                warn!(line, "ignoring result that is not a finite number");
                raws.clear();
                description = None;
                continue;
            };
            let raw_values = if raws.is_empty() {
                vec![value]
            } else {
                std::mem::take(&mut raws)
            };
            results.push(LogResult {
                title: title.clone(),
                description: description.take().unwrap_or_default(),
                value,
                unit: caps[2].to_string(),
                raw_values,
            });
            continue;
        }

        let indented = line.starts_with(char::is_whitespace);
        let trimmed = line.trim();

        if !indented {
            if let Some(name) = trimmed.strip_suffix(':') {
                title = Some(name.trim().to_string());
                description = None;
                raws.clear();
            }
            continue;
        }

        if let Some(caps) = OPTION_RE.captures(line) {
            description = caps
                .get(1)
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty());
            raws.clear();
        } else if let Some(name) = trimmed.strip_suffix(':') {
            description = Some(name.trim().to_string());
            raws.clear();
        } else if let Some(caps) = RAW_RE.captures(line) {
            raws.extend(parse_finite(&caps[1]));
        }
    }

    results
}
