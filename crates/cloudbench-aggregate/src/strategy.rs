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

//! Extraction strategy selection.

use cloudbench_core::is_time_unit;
use std::fmt;

/// How a thread entry's tests were extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// A: one result in the execution log.
    LogSingle,
    /// B: several independent results in the execution log.
    LogMultiple,
    /// C: structured export with a non-time unit.
    StructuredGeneric,
    /// D: structured export whose values are elapsed times.
    StructuredTimeValued,
}

/// What is known about a thread's artifacts before extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactProbe {
    /// Units of the structured export's results, when the export exists
    /// and holds at least one result.
    pub structured_units: Option<Vec<String>>,
    /// Number of results the log scanner found.
    pub log_results: usize,
}

impl Strategy {
    /// Selects the strategy for a probe. `None` means no generic strategy
    /// applies.
    pub fn select(probe: &ArtifactProbe) -> Option<Strategy> {
        match (&probe.structured_units, probe.log_results) {
            (Some(units), _) if !units.is_empty() && units.iter().all(|u| is_time_unit(u)) => {
                Some(Strategy::StructuredTimeValued)
            }
            (Some(units), _) if !units.is_empty() => Some(Strategy::StructuredGeneric),
            (_, 0) => None,
            (_, 1) => Some(Strategy::LogSingle),
            (_, _) => Some(Strategy::LogMultiple),
        }
    }

    /// Short tag (`A` to `D`).
    pub fn tag(&self) -> char {
        match self {
            Strategy::LogSingle => 'A',
            Strategy::LogMultiple => 'B',
            Strategy::StructuredGeneric => 'C',
            Strategy::StructuredTimeValued => 'D',
        }
    }

    /// Returns whether the strategy reads the structured export.
    pub fn is_structured(&self) -> bool {
        matches!(self, Strategy::StructuredGeneric | Strategy::StructuredTimeValued)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::LogSingle => "log-single",
            Strategy::LogMultiple => "log-multiple",
            Strategy::StructuredGeneric => "structured",
            Strategy::StructuredTimeValued => "structured-time",
        };
        write!(f, "{} ({name})", self.tag())
    }
}

/// Where a thread entry's results came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// A generic strategy.
    Strategy(Strategy),
    /// A named benchmark override.
    Override(&'static str),
    /// Elapsed time recovered from the perf summary.
    PerfSummaryOnly,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Strategy(s) => write!(f, "{s}"),
            Provenance::Override(name) => write!(f, "override '{name}'"),
            Provenance::PerfSummaryOnly => f.write_str("perf-summary recovery"),
        }
    }
}
