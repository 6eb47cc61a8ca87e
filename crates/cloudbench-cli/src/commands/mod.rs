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

//! CLI command implementations

mod aggregate;
mod analyze;

pub use aggregate::aggregate;
pub use analyze::{analyze, report_paths};

use crate::error::CliError;
use cloudbench_core::CoreError;
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// File name used when no hostname can be determined.
const FALLBACK_HOSTNAME: &str = "cloudbench";

/// This machine's hostname.
pub fn hostname() -> String {
    env::var("HOSTNAME")
        .ok()
        .or_else(|| fs::read_to_string("/etc/hostname").ok())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_HOSTNAME.to_string())
}

/// Default aggregate output path: `<hostname>.json`.
pub fn default_output_path() -> PathBuf {
    PathBuf::from(format!("{}.json", hostname()))
}

/// Asks whether to overwrite `path`. Anything but `y`/`yes`, including end
/// of input, declines. Failing to show the prompt or read the answer is an
/// error.
pub fn confirm_overwrite<R: BufRead, W: Write>(path: &Path, mut input: R, mut prompt: W) -> io::Result<bool> {
    write!(prompt, "'{}' already exists. Overwrite? [y/N] ", path.display())?;
    prompt.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Fails unless `path` may be written: it does not exist, `force` is set,
/// or the user agrees on stdin.
pub fn ensure_writable(path: &Path, force: bool) -> Result<(), CliError> {
    if path.is_dir() {
        return Err(CliError::invalid_output(path, "is a directory"));
    }
    if force || !path.exists() {
        return Ok(());
    }
    let confirmed = confirm_overwrite(path, io::stdin().lock(), io::stderr())
        .map_err(|e| CoreError::io_error(path, e))?;
    if confirmed {
        Ok(())
    } else {
        Err(CliError::output_exists(path))
    }
}
