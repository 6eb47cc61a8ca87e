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

//! Generation-log header carried by every generated document.
//!
//! The version tag doubles as the merge compatibility key: documents with
//! different tags were produced by different extraction logic.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Timestamp format of the `date` field.
pub const DATE_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Hash used when the build carried no git metadata.
const FALLBACK_SHA: &str = "0000000";

static VERSION_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^v\d+\.\d+\.\d+-g[0-9a-f]+$").expect("valid version regex"));

static DATE_STAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{8}-\d{6}$").expect("valid date regex"));

/// The `generation log` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationLog {
    /// `v<major>.<minor>.<patch>-g<hash>`
    #[serde(rename = "version info")]
    pub version_info: String,
    /// `yyyymmdd-hhmmss`
    pub date: String,
}

impl GenerationLog {
    /// Header for a document generated now by this build.
    pub fn current() -> Self {
        Self {
            version_info: version_tag(),
            date: chrono::Local::now().format(DATE_FORMAT).to_string(),
        }
    }

    /// Header with an explicit version tag, stamped now.
    pub fn with_version(version_info: impl Into<String>) -> Self {
        Self {
            version_info: version_info.into(),
            date: chrono::Local::now().format(DATE_FORMAT).to_string(),
        }
    }

    /// Checks both fields against their formats.
    pub fn validate(&self) -> Result<(), String> {
        if !VERSION_TAG.is_match(&self.version_info) {
            return Err(format!(
                "version info '{}' does not match v<major>.<minor>.<patch>-g<hash>",
                self.version_info
            ));
        }
        if !DATE_STAMP.is_match(&self.date) {
            return Err(format!("date '{}' does not match yyyymmdd-hhmmss", self.date));
        }
        Ok(())
    }

    /// Returns whether two headers are merge-compatible.
    pub fn is_compatible(&self, other: &GenerationLog) -> bool {
        self.version_info == other.version_info
    }
}

/// The version tag of this build.
pub fn version_tag() -> String {
    format_version_tag(env!("CARGO_PKG_VERSION"), option_env!("VERGEN_GIT_SHA"))
}

fn format_version_tag(version: &str, sha: Option<&str>) -> String {
    let short: String = sha
        .filter(|s| s.len() >= 7 && s.chars().all(|c| c.is_ascii_hexdigit()))
        .map(|s| s[..7].to_ascii_lowercase())
        .unwrap_or_else(|| FALLBACK_SHA.to_string());
    format!("v{version}-g{short}")
}
