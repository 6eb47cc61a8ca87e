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

//! Command-line argument definitions.
//!
//! ```text
//! Commands
//! ├── aggregate  (results trees or existing documents -> one document)
//! └── analyze    (document -> performance / cost / scaling / CSP reports)
//! ```

use crate::commands;
use crate::error::CliError;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate raw benchmark artifacts into one canonical document
    ///
    /// Walks every search root, resolves machine/OS/category from the
    /// directory layout and extracts every per-thread result. With --merge,
    /// combines previously generated documents instead.
    Aggregate(AggregateArgs),

    /// Generate comparison reports from a canonical document
    ///
    /// Without a selector flag all four reports are generated. The command
    /// succeeds when at least one requested report succeeds.
    Analyze(AnalyzeArgs),
}

/// Arguments of `cloudbench aggregate`.
#[derive(Args, Debug, Clone)]
pub struct AggregateArgs {
    /// Search root (repeatable)
    #[arg(short = 'D', long = "dir", value_name = "DIR", default_value = ".")]
    pub dirs: Vec<PathBuf>,

    /// Output document path (defaults to <hostname>.json)
    #[arg(short = 'O', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Overwrite the output without asking
    #[arg(short = 'F', long)]
    pub force: bool,

    /// Merge already generated documents instead of scanning directories
    #[arg(
        short = 'M',
        long,
        value_name = "FILE",
        num_args = 1..,
        requires = "output",
        conflicts_with = "dirs"
    )]
    pub merge: Option<Vec<PathBuf>>,

    /// Machine table (JSON array of machine records) replacing the built-in one
    #[arg(long, value_name = "FILE")]
    pub lut: Option<PathBuf>,
}

/// Arguments of `cloudbench analyze`.
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Canonical document to analyze
    #[arg(short, long, value_name = "FILE", default_value = "./one_big_json.json")]
    pub input: PathBuf,

    /// Performance comparison
    #[arg(long)]
    pub perf: bool,

    /// Cost-efficiency ranking
    #[arg(long)]
    pub cost: bool,

    /// Thread-scaling comparison
    #[arg(long)]
    pub th: bool,

    /// CSP instance comparison
    #[arg(long)]
    pub csp: bool,

    /// Output file (one report) or directory (several reports)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Also write a Markdown rendering next to each JSON report
    #[arg(long)]
    pub markdown: bool,
}

impl Commands {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the command as a whole fails: an inaccessible
    /// search root, an unreadable or invalid document, a merge version
    /// mismatch, a declined overwrite, or every requested report failing.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            Commands::Aggregate(args) => commands::aggregate(&args),
            Commands::Analyze(args) => commands::analyze(&args),
        }
    }
}
