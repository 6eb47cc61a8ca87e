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

//! Comparable scores.
//!
//! A test result carries either a numeric `values` field, a numeric `time`,
//! or both. The score of a result is its `values` when present, falling
//! back to elapsed time. Time-valued scores rank ascending.

use cloudbench_core::{is_time_unit, TestResultEntry};
use serde::Serialize;
use std::fmt;

/// Which field a score was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    /// The `values` field.
    Values,
    /// The `time` field, in seconds.
    Time,
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::Values => f.write_str("values"),
            Basis::Time => f.write_str("time"),
        }
    }
}

/// Ranking direction of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Larger scores rank first.
    HigherIsBetter,
    /// Smaller scores rank first.
    LowerIsBetter,
}

/// A score taken from one test result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    /// Raw score.
    pub value: f64,
    /// Source field.
    pub basis: Basis,
    /// Ranking direction.
    pub direction: Direction,
}

impl Score {
    /// Scores an entry on its own: `values` if numeric, else `time`.
    pub fn of(entry: &TestResultEntry) -> Option<Self> {
        Self::with_basis(entry, Basis::of(entry)?)
    }

    /// Scores an entry on a fixed basis, so that every member of a
    /// comparison group is measured the same way.
    pub fn with_basis(entry: &TestResultEntry, basis: Basis) -> Option<Self> {
        let (value, direction) = match basis {
            Basis::Values => {
                let direction = if is_time_unit(&entry.unit) {
                    Direction::LowerIsBetter
                } else {
                    Direction::HigherIsBetter
                };
                (entry.values.as_f64()?, direction)
            }
            Basis::Time => (entry.time.as_f64()?, Direction::LowerIsBetter),
        };
        value.is_finite().then_some(Self {
            value,
            basis,
            direction,
        })
    }

    /// Throughput-like performance: the score itself when higher is better,
    /// its reciprocal when lower is better. `None` when the reciprocal is
    /// undefined.
    pub fn performance(&self) -> Option<f64> {
        match self.direction {
            Direction::HigherIsBetter => Some(self.value),
            Direction::LowerIsBetter if self.value > 0.0 => Some(1.0 / self.value),
            Direction::LowerIsBetter => None,
        }
    }

    /// Whether `self` ranks ahead of `other`.
    pub fn beats(&self, other: &Score) -> bool {
        match self.direction {
            Direction::HigherIsBetter => self.value > other.value,
            Direction::LowerIsBetter => self.value < other.value,
        }
    }
}

/// `numerator / denominator`, or `None` when the denominator is zero or
/// the quotient is not finite.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let q = numerator / denominator;
    q.is_finite().then_some(q)
}

impl Basis {
    /// Basis an entry offers on its own.
    pub fn of(entry: &TestResultEntry) -> Option<Self> {
        if entry.values.as_f64().is_some() {
            Some(Basis::Values)
        } else if entry.time.as_f64().is_some() {
            Some(Basis::Time)
        } else {
            None
        }
    }

    /// Common basis of a group: `values` if any member has one.
    pub fn common<'a, I>(entries: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a TestResultEntry>,
    {
        let mut basis = None;
        for entry in entries {
            match Basis::of(entry) {
                Some(Basis::Values) => return Some(Basis::Values),
                Some(Basis::Time) => basis = Some(Basis::Time),
                None => {}
            }
        }
        basis
    }
}
