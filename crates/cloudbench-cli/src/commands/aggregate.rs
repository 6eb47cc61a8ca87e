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

//! Aggregate command - results trees or existing documents into one document

use super::{default_output_path, ensure_writable};
use crate::cli::AggregateArgs;
use crate::error::CliError;
use cloudbench_aggregate::{AggregateSummary, Aggregator};
use cloudbench_core::io::read_lut;
use cloudbench_core::{merge_documents, read_document, write_json_atomic, CanonicalDocument, MachineLut};
use colored::Colorize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Runs `cloudbench aggregate`.
///
/// The overwrite check happens before any scanning, so a declined prompt
/// costs nothing.
///
/// # Output
///
/// Prints a summary to stdout including:
/// - Output path (✓)
/// - Machine, thread entry and test counts
/// - For scans: benchmark directories found/skipped and thread outcomes
/// - For merges: documents merged and overlapping results
pub fn aggregate(args: &AggregateArgs) -> Result<(), CliError> {
    let output = args.output.clone().unwrap_or_else(default_output_path);
    ensure_writable(&output, args.force)?;

    let document = match &args.merge {
        Some(inputs) => merge(inputs)?,
        None => scan(args)?,
    };

    write_json_atomic(&output, &document)?;
    info!(output = %output.display(), "document written");

    println!("{} {}", "✓".green().bold(), output.display());
    println!("  Version: {}", document.generation_log.version_info);
    println!("  Machines: {}", document.machines.len());
    println!("  Thread entries: {}", document.thread_entry_count());
    println!("  Tests: {}", document.test_count());
    Ok(())
}

fn scan(args: &AggregateArgs) -> Result<CanonicalDocument, CliError> {
    let lut = match &args.lut {
        Some(path) => read_lut(path)?,
        None => MachineLut::builtin(),
    };
    let aggregation = Aggregator::new(&lut).aggregate(&args.dirs)?;
    print_summary(&aggregation.summary);
    Ok(aggregation.document)
}

fn merge(inputs: &[PathBuf]) -> Result<CanonicalDocument, CliError> {
    let documents = inputs
        .iter()
        .map(|path| read_document(path).map(|loaded| (loaded.path, loaded.document)))
        .collect::<Result<Vec<_>, _>>()?;
    let (document, stats) = merge_documents(documents)?;

    if stats.overlapping_tests > 0 {
        warn!(
            overlapping = stats.overlapping_tests,
            "test results present in more than one input; later inputs win"
        );
    }
    if stats.metadata_conflicts > 0 {
        warn!(conflicts = stats.metadata_conflicts, "machines with conflicting metadata");
    }

    println!("Merged {} documents", stats.documents);
    if stats.overlapping_tests > 0 {
        println!("  Overlapping tests: {}", stats.overlapping_tests);
    }
    Ok(document)
}

fn print_summary(summary: &AggregateSummary) {
    println!("Search roots: {}", summary.roots);
    println!(
        "  Benchmark directories: {} found, {} skipped",
        summary.benchmarks_found, summary.benchmarks_skipped
    );
    if summary.empty_threads + summary.failed_threads + summary.recovered_threads > 0 {
        println!(
            "  Thread counts: {} without results, {} failed, {} recovered from perf summary",
            summary.empty_threads, summary.failed_threads, summary.recovered_threads
        );
    }
    if !summary.unknown_machines.is_empty() {
        let names: Vec<&str> = summary.unknown_machines.iter().map(String::as_str).collect();
        println!("  {} {}", "Unknown machines:".yellow(), names.join(", "));
    }
    if !summary.warnings.is_empty() {
        println!("  {} {}", "Warnings:".yellow(), summary.warnings.len());
    }
}
