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

//! Sample execution logs.

/// Renders one log section: option header, description, raw lines and the
/// closing `Average:` line.
pub fn section(option: &str, description: &str, raws: &[f64], value: f64, unit: &str) -> String {
    let mut out = String::new();
    if !option.is_empty() {
        out.push_str(&format!("    pts/bench-1.0.0 [{option}]\n"));
        out.push_str("    Test 1 of 1\n");
        out.push_str("    Estimated Trial Run Count:    3\n");
    }
    if !description.is_empty() {
        out.push_str(&format!("\n    {description}:\n"));
    }
    for raw in raws {
        out.push_str(&format!("        {raw}\n"));
    }
    out.push_str(&format!("\n    Average: {value} {unit}\n    Deviation: 0.05%\n\n"));
    out
}

/// A log holding a single titled result.
pub fn single_result(title: &str, raws: &[f64], value: f64, unit: &str) -> String {
    format!("{title}:\n{}", section("", "", raws, value, unit))
}

/// A single-result log with colour codes and CRLF line endings.
pub const COLOURED_CRLF: &str = "\u{1b}[1;34mCoreMark 1.0:\u{1b}[0m\r\n    pts/coremark-1.0.1\r\n    \u{1b}[32mCoreMark Size 666 - Iterations Per Second:\u{1b}[0m\r\n        1230.5\r\n        1238.62\r\n\r\n    \u{1b}[1mAverage: 1234.56 Iterations/Sec\u{1b}[0m\r\n";

/// Stream with four sub-tests under one title.
pub const STREAM: &str = "\
Stream 2013-01-17:
    pts/stream-1.3.4 [Type: Copy]
    Test 1 of 4
        51234.1
        51300.2

    Average: 51267.15 MB/s
    Deviation: 0.09%

    pts/stream-1.3.4 [Type: Scale]
    Test 2 of 4
        40111.2

    Average: 40111.2 MB/s

    pts/stream-1.3.4 [Type: Add]
    Test 3 of 4
        42000

    Average: 42000 MB/s

    pts/stream-1.3.4 [Type: Triad]
    Test 4 of 4
        42500

    Average: 42500 MB/s
";

/// A native sysbench log holding a CPU run and a memory run.
pub const SYSBENCH: &str = "\
sysbench 1.0.20 (using system LuaJIT 2.1.0-beta3)

Running the test with following options:
Number of threads: 4

CPU speed:
    events per second:  4021.55

General statistics:
    total time:                          10.0004s
    total number of events:              40218

CPU speed:
    events per second:  4019.45

General statistics:
    total time:                          10.0002s
    total number of events:              40197

Running memory speed test with the following options:
  block size: 1KiB
  total size: 102400MiB

Total operations: 104857600 (10482512.11 per second)

102400.00 MiB transferred (10236.83 MiB/sec)

General statistics:
    total time:                          10.0011s
    total number of events:              104857600
";

/// A pgbench log with two client-count configurations.
pub const PGBENCH: &str = "\
transaction type: <builtin: TPC-B (sort of)>
scaling factor: 100
query mode: simple
number of clients: 4
number of threads: 4
duration: 60 s
number of transactions actually processed: 120000
latency average = 2.000 ms
tps = 2000.123456 (without initial connection time)
transaction type: <builtin: TPC-B (sort of)>
scaling factor: 100
query mode: simple
number of clients: 8
number of threads: 4
duration: 60 s
number of transactions actually processed: 180000
latency average = 2.667 ms
tps = 3000.5 (without initial connection time)
";
