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

//! Unit classification for benchmark scales.

/// Returns the factor converting a value in `unit` to seconds, or `None`
/// when the unit does not denote elapsed time.
pub fn seconds_per_unit(unit: &str) -> Option<f64> {
    let normalized = unit.trim().trim_end_matches("(s)").trim().to_ascii_lowercase();
    let factor = match normalized.as_str() {
        "s" | "sec" | "secs" | "second" | "seconds" => 1.0,
        "ms" | "msec" | "millisecond" | "milliseconds" => 1e-3,
        "us" | "µs" | "usec" | "microsecond" | "microseconds" => 1e-6,
        "ns" | "nsec" | "nanosecond" | "nanoseconds" => 1e-9,
        "min" | "mins" | "minute" | "minutes" => 60.0,
        _ => return None,
    };
    Some(factor)
}

/// Keeps `value` only when it is finite.
///
/// NaN and infinities cannot be written as JSON numbers, so every reading
/// that ends up in a document passes through here.
pub fn finite(value: f64) -> Option<f64> {
    Some(value).filter(|v| v.is_finite())
}

/// Parses a number, rejecting `nan`, `inf` and literals that overflow.
pub fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().and_then(finite)
}

/// Returns whether `unit` denotes elapsed time.
pub fn is_time_unit(unit: &str) -> bool {
    seconds_per_unit(unit).is_some()
}
