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

//! Analyze command - comparison reports from a canonical document

use crate::cli::AnalyzeArgs;
use crate::error::CliError;
use cloudbench_analytics::{AnalyticsEngine, AnalyzeSelection, AnyReport, ReportKind};
use cloudbench_core::{read_document, CoreError};
use colored::Colorize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::error;

/// Where each selected report is written.
///
/// Without `output`, reports go to their default file names in the current
/// directory. With one report, `output` is the file (or a directory to put
/// it in); with several, it is a directory, created if needed.
pub fn report_paths(
    output: Option<&Path>,
    kinds: &[ReportKind],
) -> Result<BTreeMap<ReportKind, PathBuf>, CliError> {
    let dir = match output {
        None => PathBuf::new(),
        Some(path) if kinds.len() == 1 && !path.is_dir() => {
            return Ok(kinds.iter().map(|&k| (k, path.to_path_buf())).collect());
        }
        Some(path) => {
            if path.exists() && !path.is_dir() {
                return Err(CliError::invalid_output(
                    path,
                    "several reports were requested, so the output must be a directory",
                ));
            }
            fs::create_dir_all(path).map_err(|e| CoreError::io_error(path, e))?;
            path.to_path_buf()
        }
    };
    Ok(kinds.iter().map(|&k| (k, dir.join(k.file_name()))).collect())
}

/// Runs `cloudbench analyze`.
///
/// # Errors
///
/// Returns `Err` if the input cannot be read or validated, the output
/// location is unusable, or no requested report succeeds.
pub fn analyze(args: &AnalyzeArgs) -> Result<(), CliError> {
    let loaded = read_document(&args.input)?;

    let selection = AnalyzeSelection {
        performance: args.perf,
        cost: args.cost,
        scaling: args.th,
        csp: args.csp,
    }
    .or_all();
    let kinds = selection.kinds();
    let paths = report_paths(args.output.as_deref(), &kinds)?;

    let engine = AnalyticsEngine::from_loaded(&loaded);
    let mut succeeded = 0;
    for (kind, result) in engine.run_selection(selection) {
        let Some(path) = paths.get(&kind) else {
            continue;
        };
        match result.map_err(CliError::from).and_then(|report| {
            export(&report, path, args.markdown)?;
            Ok(report)
        }) {
            Ok(report) => {
                succeeded += 1;
                println!("{} {} -> {}", "✓".green().bold(), kind.title(), path.display());
                println!(
                    "  Records: {}  Errors: {}  Warnings: {}",
                    report.record_count(),
                    report.error_count(),
                    report.warning_count()
                );
            }
            Err(e) => {
                println!("{} {}", "✗".red().bold(), kind.title());
                error!(report = %kind, "{e}");
                eprintln!("  {}", e);
            }
        }
    }

    if succeeded == 0 {
        return Err(CliError::NoReports {
            requested: kinds.len(),
        });
    }
    Ok(())
}

fn export(report: &AnyReport, path: &Path, markdown: bool) -> Result<(), CliError> {
    report.export_json(path)?;
    if markdown {
        report.export_markdown(&path.with_extension("md"))?;
    }
    Ok(())
}
