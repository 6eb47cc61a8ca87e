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

//! Runs the report transforms over one document.

use crate::cost::{compare_cost, CostGroup};
use crate::csp::{compare_csp, CspProvider};
use crate::diagnostics::Diagnostics;
use crate::error::{AnalyticsError, Result};
use crate::performance::{compare_performance, PerfGroup};
use crate::report::{Report, ReportBody, ReportKind};
use crate::scaling::{compare_scaling, ScalingCurve};
use cloudbench_core::{CanonicalDocument, GenerationLog, LoadedDocument, SourceMap};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Which reports to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeSelection {
    /// Performance comparison.
    pub performance: bool,
    /// Cost-efficiency ranking.
    pub cost: bool,
    /// Thread scaling.
    pub scaling: bool,
    /// CSP instance comparison.
    pub csp: bool,
}

impl Default for AnalyzeSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl AnalyzeSelection {
    /// Every report.
    pub fn all() -> Self {
        Self {
            performance: true,
            cost: true,
            scaling: true,
            csp: true,
        }
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        !(self.performance || self.cost || self.scaling || self.csp)
    }

    /// The selection itself, or every report when nothing is selected.
    pub fn or_all(self) -> Self {
        if self.is_empty() {
            Self::all()
        } else {
            self
        }
    }

    /// Selected report kinds, in output order.
    pub fn kinds(&self) -> Vec<ReportKind> {
        ReportKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                ReportKind::Performance => self.performance,
                ReportKind::Cost => self.cost,
                ReportKind::Scaling => self.scaling,
                ReportKind::Csp => self.csp,
            })
            .collect()
    }
}

/// A report of any kind.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnyReport {
    /// Performance comparison.
    Performance(Report<Vec<PerfGroup>>),
    /// Cost-efficiency ranking.
    Cost(Report<Vec<CostGroup>>),
    /// Thread scaling.
    Scaling(Report<Vec<ScalingCurve>>),
    /// CSP instance comparison.
    Csp(Report<Vec<CspProvider>>),
}

macro_rules! each_report {
    ($self:expr, $r:ident => $body:expr) => {
        match $self {
            AnyReport::Performance($r) => $body,
            AnyReport::Cost($r) => $body,
            AnyReport::Scaling($r) => $body,
            AnyReport::Csp($r) => $body,
        }
    };
}

impl AnyReport {
    /// Report type.
    pub fn kind(&self) -> ReportKind {
        each_report!(self, r => r.report)
    }

    /// Number of top-level result records.
    pub fn record_count(&self) -> usize {
        each_report!(self, r => r.results.record_count())
    }

    /// Number of failed comparison categories.
    pub fn error_count(&self) -> usize {
        each_report!(self, r => r.errors.len())
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        each_report!(self, r => r.warnings.len())
    }

    /// Writes the report as JSON.
    pub fn export_json(&self, path: &Path) -> Result<()> {
        each_report!(self, r => r.export_json(path))?;
        Ok(())
    }

    /// Writes the report as Markdown.
    pub fn export_markdown(&self, path: &Path) -> Result<()> {
        each_report!(self, r => r.export_markdown(path))?;
        Ok(())
    }

    /// Renders the report as Markdown.
    pub fn to_markdown(&self) -> String {
        each_report!(self, r => r.to_markdown())
    }
}

/// Generates reports from a canonical document.
///
/// Every report runs its comparison categories reference-first: a category
/// whose reference cannot be established is recorded as an error and
/// skipped, and the report fails only when no category succeeds.
///
/// # Examples
///
/// ```
/// use cloudbench_analytics::{AnalyticsEngine, AnalyzeSelection};
/// use cloudbench_core::{CanonicalDocument, SourceMap};
///
/// let document = CanonicalDocument::default();
/// let source_map = SourceMap::empty();
/// let engine = AnalyticsEngine::new(&document, &source_map);
///
/// // An empty document has nothing to compare.
/// for (_, result) in engine.run_selection(AnalyzeSelection::all()) {
///     assert!(result.is_err());
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsEngine<'a> {
    document: &'a CanonicalDocument,
    source_map: &'a SourceMap,
}

impl<'a> AnalyticsEngine<'a> {
    /// Creates an engine. Diagnostics resolve lines through `source_map`.
    pub fn new(document: &'a CanonicalDocument, source_map: &'a SourceMap) -> Self {
        Self {
            document,
            source_map,
        }
    }

    /// Creates an engine over a document read from disk.
    pub fn from_loaded(loaded: &'a LoadedDocument) -> Self {
        Self::new(&loaded.document, &loaded.source_map)
    }

    /// Absolute performance ranking.
    pub fn performance(&self) -> Result<Report<Vec<PerfGroup>>> {
        self.build(ReportKind::Performance, compare_performance)
    }

    /// Cost-efficiency ranking.
    pub fn cost(&self) -> Result<Report<Vec<CostGroup>>> {
        self.build(ReportKind::Cost, compare_cost)
    }

    /// Thread-scaling curves.
    pub fn scaling(&self) -> Result<Report<Vec<ScalingCurve>>> {
        self.build(ReportKind::Scaling, compare_scaling)
    }

    /// Cross-provider comparison.
    pub fn csp(&self) -> Result<Report<Vec<CspProvider>>> {
        self.build(ReportKind::Csp, compare_csp)
    }

    /// Generates one report.
    pub fn run(&self, kind: ReportKind) -> Result<AnyReport> {
        Ok(match kind {
            ReportKind::Performance => AnyReport::Performance(self.performance()?),
            ReportKind::Cost => AnyReport::Cost(self.cost()?),
            ReportKind::Scaling => AnyReport::Scaling(self.scaling()?),
            ReportKind::Csp => AnyReport::Csp(self.csp()?),
        })
    }

    /// Generates every selected report. A failed report does not stop the
    /// others.
    pub fn run_selection(&self, selection: AnalyzeSelection) -> Vec<(ReportKind, Result<AnyReport>)> {
        selection
            .kinds()
            .into_iter()
            .map(|kind| (kind, self.run(kind)))
            .collect()
    }

    fn build<T, F>(&self, kind: ReportKind, transform: F) -> Result<Report<T>>
    where
        T: ReportBody,
        F: FnOnce(&CanonicalDocument, &mut Diagnostics<'_>) -> T,
    {
        let mut diags = Diagnostics::new(self.source_map);
        let results = transform(self.document, &mut diags);
        let (errors, warnings) = diags.into_parts();

        if results.record_count() == 0 {
            let reason = if errors.is_empty() {
                "the document has no comparable results".to_string()
            } else {
                format!(
                    "all {} comparison categories failed; first: {}",
                    errors.len(),
                    errors[0]
                )
            };
            return Err(AnalyticsError::no_reference(kind, reason));
        }

        info!(
            report = %kind,
            records = results.record_count(),
            errors = errors.len(),
            warnings = warnings.len(),
            "report generated"
        );
        Ok(Report {
            generation_log: GenerationLog::current(),
            report: kind,
            source_version: self.document.generation_log.version_info.clone(),
            results,
            errors,
            warnings,
        })
    }
}
