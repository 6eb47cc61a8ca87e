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

//! Machine lookup table.
//!
//! Maps substrings of a machine identifier (the instance type used as the
//! machine directory name) to cloud provider, vCPU count, CPU model,
//! instruction-set family and on-demand hourly cost.
//!
//! The table is an explicit service object: build it once with
//! [`MachineLut::builtin`] or [`MachineLut::from_json_str`] and pass it by
//! reference to the resolver, aggregator and analytics.
//!
//! Identifiers absent from the table resolve to a record with provider
//! [`Csp::Unknown`] and zero cost. Callers rely on that sentinel to tell
//! machine directories apart from OS or wrapper directories.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hours per month assumed by the hourly prices.
pub const HOURS_PER_MONTH: u32 = 730;

/// Cloud service provider tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Csp {
    /// Amazon Web Services.
    Aws,
    /// Google Cloud Platform.
    Gcp,
    /// Microsoft Azure.
    Azure,
    /// Not a known machine.
    Unknown,
}

impl Csp {
    /// Returns the provider as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Csp::Aws => "aws",
            Csp::Gcp => "gcp",
            Csp::Azure => "azure",
            Csp::Unknown => "unknown",
        }
    }

    /// Substring identifying the provider's arm64 reference instance family.
    pub fn reference_family(&self) -> Option<&'static str> {
        match self {
            Csp::Aws => Some("m8g"),
            Csp::Gcp => Some("c4a"),
            Csp::Azure => Some("ps_v6"),
            Csp::Unknown => None,
        }
    }

    /// Returns whether this is a real provider.
    pub fn is_known(&self) -> bool {
        !matches!(self, Csp::Unknown)
    }
}

impl fmt::Display for Csp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata of one machine type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineRecord {
    /// Machine identifier (LUT key, or the looked-up directory name).
    pub id: String,
    /// Cloud provider.
    pub csp: Csp,
    /// Virtual CPU count.
    pub vcpu: u32,
    /// CPU model name.
    pub cpu_name: String,
    /// Instruction-set family.
    pub cpu_isa: String,
    /// On-demand cost in USD per hour.
    pub cost_hour: f64,
}

impl MachineRecord {
    /// The record returned for identifiers missing from the table.
    pub fn unknown(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            csp: Csp::Unknown,
            vcpu: 0,
            cpu_name: "unknown".to_string(),
            cpu_isa: "unknown".to_string(),
            cost_hour: 0.0,
        }
    }

    /// Returns whether the identifier matched the table.
    pub fn is_known(&self) -> bool {
        self.csp.is_known()
    }
}

/// The machine lookup service.
#[derive(Debug, Clone)]
pub struct MachineLut {
    entries: Vec<MachineRecord>,
}

impl Default for MachineLut {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MachineLut {
    /// Creates a table from explicit records.
    pub fn new(entries: Vec<MachineRecord>) -> Self {
        Self { entries }
    }

    /// The built-in table (on-demand list prices, us-east / us-central).
    pub fn builtin() -> Self {
        #[rustfmt::skip]
        let rows: &[(&str, Csp, u32, &str, &str, f64)] = &[
            // AWS Graviton3
            ("m7g.xlarge", Csp::Aws, 4, "Neoverse-V1", "arm64", 0.1632),
            ("m7g.2xlarge", Csp::Aws, 8, "Neoverse-V1", "arm64", 0.3264),
            ("m7g.4xlarge", Csp::Aws, 16, "Neoverse-V1", "arm64", 0.6528),
            // AWS Graviton4
            ("m8g.xlarge", Csp::Aws, 4, "Neoverse-V2", "arm64", 0.17952),
            ("m8g.2xlarge", Csp::Aws, 8, "Neoverse-V2", "arm64", 0.35904),
            ("m8g.4xlarge", Csp::Aws, 16, "Neoverse-V2", "arm64", 0.71808),
            // AWS Intel Sapphire Rapids
            ("m7i.xlarge", Csp::Aws, 4, "Xeon Platinum 8488C", "x86_64", 0.2016),
            ("m7i.2xlarge", Csp::Aws, 8, "Xeon Platinum 8488C", "x86_64", 0.4032),
            ("m7i.4xlarge", Csp::Aws, 16, "Xeon Platinum 8488C", "x86_64", 0.8064),
            // AWS AMD Genoa
            ("m7a.xlarge", Csp::Aws, 4, "EPYC 9R14", "x86_64", 0.23184),
            ("m7a.2xlarge", Csp::Aws, 8, "EPYC 9R14", "x86_64", 0.46368),
            ("m7a.4xlarge", Csp::Aws, 16, "EPYC 9R14", "x86_64", 0.92736),
            // GCP Axion
            ("c4a-standard-4", Csp::Gcp, 4, "Neoverse-V2", "arm64", 0.17984),
            ("c4a-standard-8", Csp::Gcp, 8, "Neoverse-V2", "arm64", 0.35968),
            ("c4a-standard-16", Csp::Gcp, 16, "Neoverse-V2", "arm64", 0.71936),
            // GCP Intel Emerald Rapids
            ("c4-standard-4", Csp::Gcp, 4, "Xeon Platinum 8581C", "x86_64", 0.2274),
            ("c4-standard-8", Csp::Gcp, 8, "Xeon Platinum 8581C", "x86_64", 0.4548),
            ("c4-standard-16", Csp::Gcp, 16, "Xeon Platinum 8581C", "x86_64", 0.9096),
            // GCP AMD Turin
            ("c4d-standard-4", Csp::Gcp, 4, "EPYC 9B45", "x86_64", 0.20869),
            ("c4d-standard-8", Csp::Gcp, 8, "EPYC 9B45", "x86_64", 0.41738),
            ("c4d-standard-16", Csp::Gcp, 16, "EPYC 9B45", "x86_64", 0.83476),
            // GCP Ampere Altra
            ("t2a-standard-4", Csp::Gcp, 4, "Ampere Altra", "arm64", 0.154),
            ("t2a-standard-8", Csp::Gcp, 8, "Ampere Altra", "arm64", 0.308),
            // Azure Cobalt 100
            ("Standard_D4ps_v6", Csp::Azure, 4, "Cobalt 100", "arm64", 0.1456),
            ("Standard_D8ps_v6", Csp::Azure, 8, "Cobalt 100", "arm64", 0.2912),
            ("Standard_D16ps_v6", Csp::Azure, 16, "Cobalt 100", "arm64", 0.5824),
            // Azure Intel Emerald Rapids
            ("Standard_D4s_v6", Csp::Azure, 4, "Xeon Platinum 8573C", "x86_64", 0.202),
            ("Standard_D8s_v6", Csp::Azure, 8, "Xeon Platinum 8573C", "x86_64", 0.404),
            ("Standard_D16s_v6", Csp::Azure, 16, "Xeon Platinum 8573C", "x86_64", 0.808),
            // Azure AMD Genoa
            ("Standard_D4as_v6", Csp::Azure, 4, "EPYC 9004", "x86_64", 0.182),
            ("Standard_D8as_v6", Csp::Azure, 8, "EPYC 9004", "x86_64", 0.364),
            ("Standard_D16as_v6", Csp::Azure, 16, "EPYC 9004", "x86_64", 0.728),
        ];

        let entries = rows
            .iter()
            .map(|&(id, csp, vcpu, cpu_name, cpu_isa, cost_hour)| MachineRecord {
                id: id.to_string(),
                csp,
                vcpu,
                cpu_name: cpu_name.to_string(),
                cpu_isa: cpu_isa.to_string(),
                cost_hour,
            })
            .collect();

        Self { entries }
    }

    /// Parses a table from a JSON array of machine records.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let entries: Vec<MachineRecord> =
            serde_json::from_str(text).map_err(|e| CoreError::InvalidLut(e.to_string()))?;

        if let Some(bad) = entries.iter().find(|e| e.id.trim().is_empty()) {
            return Err(CoreError::InvalidLut(format!(
                "entry with empty id (cpu_name '{}')",
                bad.cpu_name
            )));
        }

        Ok(Self { entries })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the table entry matching `identifier`.
    ///
    /// Matching is case-insensitive. An exact key match wins; otherwise the
    /// longest key contained in the identifier wins, so `c4-standard-48`
    /// does not resolve to a shorter `c4-standard-4` key when both exist.
    pub fn find(&self, identifier: &str) -> Option<&MachineRecord> {
        let needle = identifier.to_ascii_lowercase();

        if let Some(exact) = self
            .entries
            .iter()
            .find(|e| e.id.to_ascii_lowercase() == needle)
        {
            return Some(exact);
        }

        self.entries
            .iter()
            .filter(|e| needle.contains(&e.id.to_ascii_lowercase()))
            .max_by_key(|e| e.id.len())
    }

    /// Looks up a machine. Never fails: unmatched identifiers yield
    /// [`MachineRecord::unknown`].
    pub fn lookup(&self, identifier: &str) -> MachineRecord {
        match self.find(identifier) {
            Some(entry) => MachineRecord {
                id: identifier.to_string(),
                ..entry.clone()
            },
            None => MachineRecord::unknown(identifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_machine() {
        let lut = MachineLut::builtin();
        let rec = lut.lookup("c4-standard-4");
        assert_eq!(rec.csp, Csp::Gcp);
        assert_eq!(rec.vcpu, 4);
        assert_eq!(rec.cost_hour, 0.2274);
        assert!(rec.is_known());
    }

    #[test]
    fn test_lookup_is_substring_based() {
        let lut = MachineLut::builtin();
        let rec = lut.lookup("bench_m8g.2xlarge_run3");
        assert_eq!(rec.csp, Csp::Aws);
        assert_eq!(rec.id, "bench_m8g.2xlarge_run3");
        assert_eq!(rec.cpu_isa, "arm64");
    }

    #[test]
    fn test_lookup_unknown_is_sentinel() {
        let lut = MachineLut::builtin();
        let rec = lut.lookup("Ubuntu_24_04_LTS");
        assert_eq!(rec.csp, Csp::Unknown);
        assert_eq!(rec.cost_hour, 0.0);
        assert!(!rec.is_known());
    }

    #[test]
    fn test_axion_does_not_match_intel_key() {
        let lut = MachineLut::builtin();
        assert_eq!(lut.lookup("c4a-standard-8").cpu_name, "Neoverse-V2");
        assert_eq!(lut.lookup("c4-standard-8").cpu_name, "Xeon Platinum 8581C");
    }

    #[test]
    fn test_longest_key_wins() {
        let lut = MachineLut::new(vec![
            MachineRecord {
                id: "c4-standard-4".into(),
                csp: Csp::Gcp,
                vcpu: 4,
                cpu_name: "x".into(),
                cpu_isa: "x86_64".into(),
                cost_hour: 0.2,
            },
            MachineRecord {
                id: "c4-standard-48".into(),
                csp: Csp::Gcp,
                vcpu: 48,
                cpu_name: "x".into(),
                cpu_isa: "x86_64".into(),
                cost_hour: 2.4,
            },
        ]);
        assert_eq!(lut.lookup("run-c4-standard-48-a").vcpu, 48);
    }

    #[test]
    fn test_from_json_str() {
        let lut = MachineLut::from_json_str(
            r#"[{"id": "custom.box", "csp": "aws", "vcpu": 2, "cpu_name": "Test",
                 "cpu_isa": "arm64", "cost_hour": 0.05}]"#,
        )
        .unwrap();
        assert_eq!(lut.len(), 1);
        assert_eq!(lut.lookup("custom.box").vcpu, 2);
    }

    #[test]
    fn test_from_json_str_rejects_empty_id() {
        let err = MachineLut::from_json_str(
            r#"[{"id": " ", "csp": "aws", "vcpu": 2, "cpu_name": "Test",
                 "cpu_isa": "arm64", "cost_hour": 0.05}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidLut(_)));
    }

    #[test]
    fn test_reference_families() {
        assert_eq!(Csp::Aws.reference_family(), Some("m8g"));
        assert_eq!(Csp::Unknown.reference_family(), None);
        let lut = MachineLut::builtin();
        for csp in [Csp::Aws, Csp::Gcp, Csp::Azure] {
            let family = csp.reference_family().unwrap();
            assert!(
                lut.entries.iter().any(|e| e.csp == csp && e.id.contains(family)),
                "no reference instance for {csp}"
            );
        }
    }
}
