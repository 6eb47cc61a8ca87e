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

//! Sentinel-bearing values.
//!
//! The canonical document and the reports store "not available" and
//! "unknown" as literal strings next to numbers. These enums keep that wire
//! shape while giving the code an exhaustive match instead of string checks.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire text for a value the extraction could not produce.
pub const NOT_AVAILABLE: &str = "N/A";

/// Wire text for a comparison value that could not be computed.
pub const UNKNOWN: &str = "unknown";

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr<T> {
    Value(T),
    Text(String),
}

/// An extracted measurement, or `"N/A"`.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading<T> {
    /// The measurement was extracted.
    Value(T),
    /// No source artifact carried the measurement.
    NotAvailable,
}

impl<T> Reading<T> {
    /// Returns the value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Reading::Value(v) => Some(v),
            Reading::NotAvailable => None,
        }
    }

    /// Returns whether the value is present.
    pub fn is_available(&self) -> bool {
        matches!(self, Reading::Value(_))
    }
}

impl Reading<f64> {
    /// Returns the numeric value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        self.value().copied()
    }
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Reading::Value(v),
            None => Reading::NotAvailable,
        }
    }
}

impl<T: Serialize> Serialize for Reading<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Value(v) => v.serialize(serializer),
            Reading::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Reading<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Repr::<T>::deserialize(deserializer)? {
            Repr::Value(v) => Ok(Reading::Value(v)),
            Repr::Text(t) if t == NOT_AVAILABLE => Ok(Reading::NotAvailable),
            Repr::Text(t) => Err(de::Error::custom(format!(
                "expected a value or \"{NOT_AVAILABLE}\", found \"{t}\""
            ))),
        }
    }
}

/// A computed comparison value, or `"unknown"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Assessed {
    /// The value was computed.
    Value(f64),
    /// An operand was missing or a denominator was zero.
    Unknown,
}

impl Assessed {
    /// Returns the numeric value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Assessed::Value(v) => Some(*v),
            Assessed::Unknown => None,
        }
    }

    /// Returns whether the value is unknown.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Assessed::Unknown)
    }
}

impl fmt::Display for Assessed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assessed::Value(v) => write!(f, "{v}"),
            Assessed::Unknown => f.write_str(UNKNOWN),
        }
    }
}

impl Serialize for Assessed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Assessed::Value(v) => serializer.serialize_f64(*v),
            Assessed::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

impl<'de> Deserialize<'de> for Assessed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Repr::<f64>::deserialize(deserializer)? {
            Repr::Value(v) => Ok(Assessed::Value(v)),
            Repr::Text(t) if t == UNKNOWN => Ok(Assessed::Unknown),
            Repr::Text(t) => Err(de::Error::custom(format!(
                "expected a number or \"{UNKNOWN}\", found \"{t}\""
            ))),
        }
    }
}

/// Rounds to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_serializes_sentinel() {
        let na: Reading<f64> = Reading::NotAvailable;
        assert_eq!(serde_json::to_string(&na).unwrap(), "\"N/A\"");
        let v = Reading::Value(vec![1.5, 2.0]);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[1.5,2.0]");
    }

    #[test]
    fn test_reading_rejects_other_text() {
        let err = serde_json::from_str::<Reading<f64>>("\"n/a\"").unwrap_err();
        assert!(err.to_string().contains("N/A"));
    }

    #[test]
    fn test_reading_parses_both_shapes() {
        let v: Reading<f64> = serde_json::from_str("42.43").unwrap();
        assert_eq!(v.as_f64(), Some(42.43));
        let na: Reading<Vec<f64>> = serde_json::from_str("\"N/A\"").unwrap();
        assert!(!na.is_available());
    }

    #[test]
    fn test_assessed_unknown() {
        assert_eq!(serde_json::to_string(&Assessed::Unknown).unwrap(), "\"unknown\"");
        let parsed: Assessed = serde_json::from_str("\"unknown\"").unwrap();
        assert!(parsed.is_unknown());
        assert_eq!(Assessed::Value(0.5).to_string(), "0.5");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.002_680_161_6, 6), 0.00268);
        assert_eq!(round_to(1.234_567_89, 2), 1.23);
    }
}
