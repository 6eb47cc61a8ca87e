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

//! Bounded reads and atomic writes.

use crate::document::CanonicalDocument;
use crate::error::{CoreError, Result};
use crate::lut::MachineLut;
use crate::source_map::SourceMap;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Default read limit: 1 GiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Environment variable overriding [`DEFAULT_MAX_FILE_SIZE`] (bytes).
pub const MAX_FILE_SIZE_ENV: &str = "CLOUDBENCH_MAX_FILE_SIZE";

/// The configured read limit.
pub fn max_file_size() -> u64 {
    std::env::var(MAX_FILE_SIZE_ENV)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
}

/// Reads a UTF-8 file, refusing files above `limit` bytes.
pub fn read_bounded(path: &Path, limit: u64) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|e| CoreError::io_error(path, e))?;
    if metadata.len() > limit {
        return Err(CoreError::file_too_large(path, metadata.len(), limit));
    }
    fs::read_to_string(path).map_err(|e| CoreError::io_error(path, e))
}

/// A parsed document with its source.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Where it was read from.
    pub path: PathBuf,
    /// The document.
    pub document: CanonicalDocument,
    /// Line index over the source text.
    pub source_map: SourceMap,
}

/// Reads, parses and validates a canonical document.
pub fn read_document(path: &Path) -> Result<LoadedDocument> {
    let text = read_bounded(path, max_file_size())?;
    let document = CanonicalDocument::from_json_str(&text, path)?;
    let source_map = SourceMap::index(&text);
    debug!(
        path = %path.display(),
        machines = document.machines.len(),
        locations = source_map.len(),
        "loaded document"
    );
    Ok(LoadedDocument {
        path: path.to_path_buf(),
        document,
        source_map,
    })
}

/// Reads a custom machine table (JSON array of machine records).
pub fn read_lut(path: &Path) -> Result<MachineLut> {
    let text = read_bounded(path, max_file_size())?;
    let lut = MachineLut::from_json_str(&text)
        .map_err(|e| CoreError::InvalidLut(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), entries = lut.len(), "loaded machine table");
    Ok(lut)
}

/// Writes `contents` to `path` through a temporary file in the same
/// directory, so readers never observe a partial file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| CoreError::io_error(&dir, e))?;

    let mut temp = NamedTempFile::new_in(&dir).map_err(|e| CoreError::io_error(&dir, e))?;
    temp.write_all(contents.as_bytes())
        .map_err(|e| CoreError::io_error(temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| CoreError::io_error(temp.path(), e))?;
    temp.persist(path)
        .map_err(|e| CoreError::io_error(path, e.error))?;
    Ok(())
}

/// Serializes `value` as pretty JSON and writes it atomically.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    write_atomic(path, &text)
}
