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

//! Canonical test keys.
//!
//! A title that is unique within a thread entry is its own key. A title that
//! recurs with different descriptions is keyed `"<title> - <description>"`.
//! Re-encountering an identical (title, description) pair replaces the
//! earlier result. Distinct pairs that still produce the same key (a title
//! that already reads `"X - A"` next to the pair `X`/`A`) keep both: the
//! later one is suffixed `" (2)"`, `" (3)"`, ...

use crate::document::TestResultEntry;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::warn;

/// A test result before key assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedResult {
    /// Test title.
    pub title: String,
    /// Test description; also stored in the entry.
    pub description: String,
    /// The result.
    pub entry: TestResultEntry,
}

/// Assigns canonical keys to results in encounter order.
pub fn assign_keys(results: Vec<NamedResult>) -> BTreeMap<String, TestResultEntry> {
    // Last write wins per (title, description).
    let mut order: Vec<(String, String)> = Vec::new();
    let mut latest: HashMap<(String, String), TestResultEntry> = HashMap::new();
    for result in results {
        let pair = (result.title, result.description);
        if !latest.contains_key(&pair) {
            order.push(pair.clone());
        }
        latest.insert(pair, result.entry);
    }

    let mut descriptions: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for (title, description) in &order {
        descriptions
            .entry(title.as_str())
            .or_default()
            .insert(description.as_str());
    }

    let mut keyed = BTreeMap::new();
    for pair in &order {
        let (title, description) = pair;
        let ambiguous = descriptions
            .get(title.as_str())
            .map_or(false, |set| set.len() > 1);
        let base = if ambiguous && !description.is_empty() {
            format!("{title} - {description}")
        } else {
            title.clone()
        };
        let mut key = base.clone();
        let mut n = 2;
        while keyed.contains_key(&key) {
            key = format!("{base} ({n})");
            n += 1;
        }
        if key != base {
            warn!(title = %title, description = %description, key = %key, "test key already taken");
        }
        if let Some(entry) = latest.remove(pair) {
            keyed.insert(key, entry);
        }
    }
    keyed
}
