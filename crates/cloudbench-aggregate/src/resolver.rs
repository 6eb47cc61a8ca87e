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

//! Hierarchy resolution.
//!
//! Maps a benchmark directory to its (machine, OS, category, benchmark)
//! location. The machine is the innermost ancestor whose name the LUT
//! recognizes, so a results export wrapped inside another copy of the same
//! machine directory resolves against the inner copy:
//!
//! ```text
//! root/m8g.xlarge/results/m8g.xlarge/Ubuntu/Processor/coremark-1.0.1
//!                         ^^^^^^^^^^ machine  ^^^^^^ OS
//! ```

use crate::error::ResolveError;
use cloudbench_core::{BenchmarkLocation, MachineLut, MachineRecord};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, warn};

/// How a location was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMethod {
    /// An ancestor at or below the search root matched the LUT.
    Ancestor,
    /// The search root's parent matched the LUT; the root is the OS.
    OsRooted,
    /// No LUT match; machine and OS are the first two path components
    /// below the root.
    Fallback,
}

/// A resolved benchmark directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Location in the document hierarchy.
    pub location: BenchmarkLocation,
    /// Machine metadata.
    pub record: MachineRecord,
    /// How the machine was found.
    pub method: ResolveMethod,
}

/// Resolves benchmark directories against a machine table.
#[derive(Debug, Clone, Copy)]
pub struct HierarchyResolver<'a> {
    lut: &'a MachineLut,
}

fn name_of(path: &Path) -> Option<String> {
    path.file_name().and_then(OsStr::to_str).map(str::to_string)
}

fn segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| c.as_os_str().to_str().map(str::to_string))
        .collect()
}

impl<'a> HierarchyResolver<'a> {
    /// Creates a resolver.
    pub fn new(lut: &'a MachineLut) -> Self {
        Self { lut }
    }

    /// Resolves `bench_dir`, found under `root`.
    ///
    /// Both paths should be absolute (canonicalized) so that the root's own
    /// name and its parent can be inspected.
    pub fn resolve(&self, root: &Path, bench_dir: &Path) -> Result<Resolution, ResolveError> {
        let rel = bench_dir
            .strip_prefix(root)
            .map_err(|_| ResolveError::OutsideRoot {
                dir: bench_dir.to_path_buf(),
                root: root.to_path_buf(),
            })?;
        let rel = segments(rel);
        if rel.len() < 2 {
            return self.resolve_os_rooted(root, bench_dir, &rel);
        }
        let benchmark = rel[rel.len() - 1].clone();
        let category = rel[rel.len() - 2].clone();

        // Ancestors of the category directory below the root, innermost
        // first; `rel[depth]` names the ancestor at that depth.
        for depth in (0..rel.len() - 2).rev() {
            if let Some(record) = self.known(&rel[depth]) {
                let between = &rel[depth + 1..rel.len() - 2];
                return self.finish(bench_dir, record, between, category, benchmark, ResolveMethod::Ancestor);
            }
        }

        if let Some(name) = name_of(root) {
            if let Some(record) = self.known(&name) {
                let between = &rel[..rel.len() - 2];
                return self.finish(bench_dir, record, between, category, benchmark, ResolveMethod::Ancestor);
            }
        }

        if rel.len() == 2 {
            return self.resolve_os_rooted(root, bench_dir, &rel);
        }

        self.fallback(bench_dir, &rel)
    }

    /// Root is an OS directory: the machine is the root's parent.
    fn resolve_os_rooted(
        &self,
        root: &Path,
        bench_dir: &Path,
        rel: &[String],
    ) -> Result<Resolution, ResolveError> {
        let unresolvable = || ResolveError::Unresolvable {
            dir: bench_dir.to_path_buf(),
        };
        if rel.len() != 2 {
            return Err(unresolvable());
        }
        let os = name_of(root).ok_or_else(unresolvable)?;
        let parent = root.parent().and_then(name_of).ok_or_else(unresolvable)?;
        let record = self.known(&parent).ok_or_else(unresolvable)?;
        debug!(dir = %bench_dir.display(), machine = %parent, os = %os, "resolved from OS-rooted search");
        Ok(Resolution {
            location: BenchmarkLocation {
                machine: parent,
                os,
                category: rel[0].clone(),
                benchmark: rel[1].clone(),
            },
            record,
            method: ResolveMethod::OsRooted,
        })
    }

    fn fallback(&self, bench_dir: &Path, rel: &[String]) -> Result<Resolution, ResolveError> {
        if rel.len() < 4 {
            return Err(ResolveError::Unresolvable {
                dir: bench_dir.to_path_buf(),
            });
        }
        let machine = rel[0].clone();
        let record = self.lut.lookup(&machine);
        warn!(
            dir = %bench_dir.display(),
            machine = %machine,
            "machine not in the lookup table; using path layout with unknown metadata"
        );
        Ok(Resolution {
            location: BenchmarkLocation {
                machine,
                os: rel[1].clone(),
                category: rel[rel.len() - 2].clone(),
                benchmark: rel[rel.len() - 1].clone(),
            },
            record,
            method: ResolveMethod::Fallback,
        })
    }

    fn finish(
        &self,
        bench_dir: &Path,
        record: MachineRecord,
        between: &[String],
        category: String,
        benchmark: String,
        method: ResolveMethod,
    ) -> Result<Resolution, ResolveError> {
        let Some(os) = between.first() else {
            return Err(ResolveError::MissingOs {
                dir: bench_dir.to_path_buf(),
                machine: record.id,
            });
        };
        if between.len() > 1 {
            warn!(
                dir = %bench_dir.display(),
                machine = %record.id,
                os = %os,
                skipped = %between[1..].join("/"),
                "extra directories between OS and category"
            );
        }
        Ok(Resolution {
            location: BenchmarkLocation {
                machine: record.id.clone(),
                os: os.clone(),
                category,
                benchmark,
            },
            record,
            method,
        })
    }

    fn known(&self, name: &str) -> Option<MachineRecord> {
        let record = self.lut.lookup(name);
        record.is_known().then_some(record)
    }
}
