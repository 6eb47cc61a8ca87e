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

//! Location-citing diagnostics.
//!
//! Every warning or per-category error names the JSON pointer of the value
//! it concerns and, when the document was read from disk, its input line.

use cloudbench_core::SourceMap;
use serde::Serialize;
use std::fmt;
use tracing::{error, warn};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A value was recorded as "unknown" or an entry was excluded.
    Warning,
    /// A comparison category failed to establish its reference.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Input line (1-based), when known
    pub line: Option<usize>,
    /// JSON pointer into the input document
    pub pointer: String,
    /// Human-readable message
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "line {}: ", line)?;
        }
        write!(f, "{}: {}", self.severity, self.message)?;
        if !self.pointer.is_empty() {
            write!(f, " ({})", self.pointer)?;
        }
        Ok(())
    }
}

/// Collects diagnostics for one report and mirrors them to the log.
#[derive(Debug)]
pub struct Diagnostics<'a> {
    source_map: &'a SourceMap,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl<'a> Diagnostics<'a> {
    /// Creates an empty collector resolving lines through `source_map`.
    pub fn new(source_map: &'a SourceMap) -> Self {
        Self {
            source_map,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn make(&self, severity: Severity, pointer: String, message: String) -> Diagnostic {
        Diagnostic {
            severity,
            line: self.source_map.nearest_line(&pointer),
            pointer,
            message,
        }
    }

    /// Records a warning.
    pub fn warn(&mut self, pointer: impl Into<String>, message: impl Into<String>) {
        let diagnostic = self.make(Severity::Warning, pointer.into(), message.into());
        warn!("{diagnostic}");
        self.warnings.push(diagnostic);
    }

    /// Records a per-category error.
    pub fn error(&mut self, pointer: impl Into<String>, message: impl Into<String>) {
        let diagnostic = self.make(Severity::Error, pointer.into(), message.into());
        error!("{diagnostic}");
        self.errors.push(diagnostic);
    }

    /// Number of errors so far.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Returns `(errors, warnings)`.
    pub fn into_parts(self) -> (Vec<Diagnostic>, Vec<Diagnostic>) {
        (self.errors, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_display_with_line() {
        let d = Diagnostic {
            severity: Severity::Warning,
            line: Some(42),
            pointer: "/m/os".to_string(),
            message: "missing".to_string(),
        };
        assert_eq!(d.to_string(), "line 42: warning: missing (/m/os)");
    }

    #[test]
    fn test_collector_resolves_lines() {
        let map = SourceMap::index("{\n  \"m\": {\n    \"os\": {}\n  }\n}");
        let mut diags = Diagnostics::new(&map);
        diags.warn("/m/os/Ubuntu", "no data");
        diags.error("", "no reference");
        assert_eq!(diags.error_count(), 1);

        let (errors, warnings) = diags.into_parts();
        assert_eq!(warnings[0].line, Some(3));
        assert_eq!(errors[0].line, None);
    }
}
