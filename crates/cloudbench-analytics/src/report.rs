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

//! Report envelope and export.

use crate::diagnostics::Diagnostic;
use cloudbench_core::{write_atomic, write_json_atomic, GenerationLog, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// The four report types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Absolute performance ranking.
    Performance,
    /// Cost-efficiency ranking.
    Cost,
    /// Thread-scaling curves.
    Scaling,
    /// Cross-provider comparison against each provider's arm64 reference.
    Csp,
}

impl ReportKind {
    /// Every report type, in output order.
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Performance,
        ReportKind::Cost,
        ReportKind::Scaling,
        ReportKind::Csp,
    ];

    /// Default output file name.
    pub fn file_name(&self) -> &'static str {
        match self {
            ReportKind::Performance => "perf_comparison.json",
            ReportKind::Cost => "cost_comparison.json",
            ReportKind::Scaling => "thread_scaling.json",
            ReportKind::Csp => "csp_instance_comparison.json",
        }
    }

    /// Human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Performance => "Performance comparison",
            ReportKind::Cost => "Cost efficiency",
            ReportKind::Scaling => "Thread scaling",
            ReportKind::Csp => "CSP instance comparison",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportKind::Performance => "performance",
            ReportKind::Cost => "cost",
            ReportKind::Scaling => "scaling",
            ReportKind::Csp => "csp",
        };
        f.write_str(name)
    }
}

/// Markdown rendering of a report's results.
pub trait ReportBody {
    /// Appends the results section.
    fn render_markdown(&self, md: &mut String);

    /// Number of top-level result records.
    fn record_count(&self) -> usize;
}

/// A generated report.
#[derive(Debug, Clone, Serialize)]
pub struct Report<T> {
    /// Header of this report.
    #[serde(rename = "generation log")]
    pub generation_log: GenerationLog,
    /// Report type.
    pub report: ReportKind,
    /// Version tag of the document the report was computed from.
    pub source_version: String,
    /// Results.
    pub results: T,
    /// Comparison categories that failed to establish a reference.
    pub errors: Vec<Diagnostic>,
    /// Values recorded as "unknown" and excluded entries.
    pub warnings: Vec<Diagnostic>,
}

impl<T: Serialize + ReportBody> Report<T> {
    /// Writes the report as JSON.
    pub fn export_json(&self, path: &Path) -> Result<()> {
        write_json_atomic(path, self)
    }

    /// Writes the report as Markdown.
    pub fn export_markdown(&self, path: &Path) -> Result<()> {
        write_atomic(path, &self.to_markdown())
    }

    /// Renders the report as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("# {}\n\n", self.report.title()));
        md.push_str(&format!(
            "**Generated:** {} ({})\n\n",
            self.generation_log.date, self.generation_log.version_info
        ));
        md.push_str(&format!("**Source document:** {}\n\n", self.source_version));

        md.push_str("## Results\n\n");
        if self.results.record_count() == 0 {
            md.push_str("_No results._\n");
        } else {
            self.results.render_markdown(&mut md);
        }

        for (heading, diagnostics) in [("Errors", &self.errors), ("Warnings", &self.warnings)] {
            if diagnostics.is_empty() {
                continue;
            }
            md.push_str(&format!("\n## {}\n\n", heading));
            for d in diagnostics {
                md.push_str(&format!("- {}\n", d));
            }
        }

        md
    }
}

/// Escapes a value for a Markdown table cell.
pub(crate) fn cell<D: fmt::Display>(value: D) -> String {
    value.to_string().replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use tempfile::TempDir;

    #[derive(Serialize)]
    struct Rows(Vec<u32>);

    impl ReportBody for Rows {
        fn render_markdown(&self, md: &mut String) {
            for row in &self.0 {
                md.push_str(&format!("- {}\n", row));
            }
        }

        fn record_count(&self) -> usize {
            self.0.len()
        }
    }

    fn report(rows: Vec<u32>) -> Report<Rows> {
        Report {
            generation_log: GenerationLog {
                version_info: "v1.0.0-gabc1234".to_string(),
                date: "20261018-120000".to_string(),
            },
            report: ReportKind::Cost,
            source_version: "v1.0.0-gabc1234".to_string(),
            results: Rows(rows),
            errors: Vec::new(),
            warnings: vec![Diagnostic {
                severity: Severity::Warning,
                line: Some(7),
                pointer: "/m".to_string(),
                message: "excluded".to_string(),
            }],
        }
    }

    #[test]
    fn test_file_names() {
        let names: Vec<_> = ReportKind::ALL.iter().map(|k| k.file_name()).collect();
        assert_eq!(
            names,
            vec![
                "perf_comparison.json",
                "cost_comparison.json",
                "thread_scaling.json",
                "csp_instance_comparison.json"
            ]
        );
    }

    #[test]
    fn test_json_envelope() {
        let value = serde_json::to_value(report(vec![1, 2])).unwrap();
        assert_eq!(value["report"], "cost");
        assert_eq!(value["generation log"]["version info"], "v1.0.0-gabc1234");
        assert_eq!(value["results"], serde_json::json!([1, 2]));
        assert_eq!(value["warnings"][0]["line"], 7);
        assert_eq!(value["warnings"][0]["severity"], "warning");
    }

    #[test]
    fn test_markdown_sections() {
        let md = report(vec![3]).to_markdown();
        assert!(md.starts_with("# Cost efficiency\n"));
        assert!(md.contains("- 3\n"));
        assert!(md.contains("## Warnings"));
        assert!(md.contains("line 7: warning: excluded (/m)"));
        assert!(!md.contains("## Errors"));
        assert!(report(vec![]).to_markdown().contains("_No results._"));
    }

    #[test]
    fn test_export_writes_both_formats() {
        let dir = TempDir::new().unwrap();
        let report = report(vec![1]);
        report.export_json(&dir.path().join("r.json")).unwrap();
        report.export_markdown(&dir.path().join("r.md")).unwrap();

        let json = std::fs::read_to_string(dir.path().join("r.json")).unwrap();
        assert!(json.ends_with('\n'));
        assert!(std::fs::read_to_string(dir.path().join("r.md")).unwrap().contains("# Cost"));
    }
}
