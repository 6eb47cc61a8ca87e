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

//! Line index for JSON documents.
//!
//! Aggregate documents run to many megabytes, so diagnostics cite the input
//! line of the value they concern. [`SourceMap::index`] scans the raw text
//! once and records, for every object member and array element, the line on
//! which it starts, keyed by RFC 6901 JSON pointer.

use std::collections::HashMap;

/// Escapes one JSON pointer reference token.
pub fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Builds a JSON pointer from unescaped segments.
pub fn pointer<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    segments
        .into_iter()
        .map(|s| format!("/{}", escape_segment(s.as_ref())))
        .collect()
}

#[derive(Debug)]
enum Frame {
    Object { expect_key: bool },
    Array { index: usize },
}

/// Pointer -> 1-based line.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    lines: HashMap<String, usize>,
}

impl SourceMap {
    /// An empty map (for documents built in memory).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Indexes JSON text. Malformed input yields a partial index.
    pub fn index(text: &str) -> Self {
        let mut lines = HashMap::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut path: Vec<String> = Vec::new();
        let mut pending_key: Option<(String, usize)> = None;
        let mut line = 1usize;
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\n' => line += 1,
                '"' => {
                    let start = line;
                    let value = read_string(&mut chars, &mut line);
                    match stack.last_mut() {
                        Some(Frame::Object { expect_key }) if *expect_key => {
                            *expect_key = false;
                            pending_key = Some((value, start));
                        }
                        _ => {
                            enter_value(&stack, &mut path, &mut lines, start);
                            leave_value(&stack, &mut path);
                        }
                    }
                }
                ':' => {
                    if let Some((key, key_line)) = pending_key.take() {
                        path.push(key);
                        lines.insert(render(&path), key_line);
                    }
                }
                '{' | '[' => {
                    enter_value(&stack, &mut path, &mut lines, line);
                    stack.push(if c == '{' {
                        Frame::Object { expect_key: true }
                    } else {
                        Frame::Array { index: 0 }
                    });
                }
                '}' | ']' => {
                    stack.pop();
                    leave_value(&stack, &mut path);
                }
                ',' => match stack.last_mut() {
                    Some(Frame::Object { expect_key }) => *expect_key = true,
                    Some(Frame::Array { index }) => *index += 1,
                    None => {}
                },
                c if c.is_whitespace() => {}
                _ => {
                    // Bare scalar: number, true, false, null.
                    enter_value(&stack, &mut path, &mut lines, line);
                    while let Some(&next) = chars.peek() {
                        if next == ',' || next == '}' || next == ']' || next.is_whitespace() {
                            break;
                        }
                        chars.next();
                    }
                    leave_value(&stack, &mut path);
                }
            }
        }

        Self { lines }
    }

    /// Line of the value at `pointer`, if indexed.
    pub fn line_of(&self, pointer: &str) -> Option<usize> {
        self.lines.get(pointer).copied()
    }

    /// Line of `pointer` or of its nearest indexed ancestor.
    pub fn nearest_line(&self, pointer: &str) -> Option<usize> {
        let mut current = pointer;
        loop {
            if let Some(line) = self.line_of(current) {
                return Some(line);
            }
            match current.rfind('/') {
                Some(0) | None => return None,
                Some(idx) => current = &current[..idx],
            }
        }
    }

    /// Number of indexed locations.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns whether nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn render(path: &[String]) -> String {
    pointer(path.iter())
}

fn enter_value(stack: &[Frame], path: &mut Vec<String>, lines: &mut HashMap<String, usize>, line: usize) {
    if let Some(Frame::Array { index }) = stack.last() {
        path.push(index.to_string());
        lines.insert(render(path), line);
    }
}

fn leave_value(stack: &[Frame], path: &mut Vec<String>) {
    if !stack.is_empty() {
        path.pop();
    }
}

fn read_string<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>, line: &mut usize) -> String {
    let mut out = String::new();
    while let Some(c) = chars.next() {
        match c {
            '"' => break,
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('b') => out.push('\u{8}'),
                Some('f') => out.push('\u{c}'),
                Some('u') => {
                    let hex: String = chars.by_ref().take(4).collect();
                    if let Some(ch) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                        out.push(ch);
                    }
                }
                Some(other) => out.push(other),
                None => break,
            },
            '\n' => {
                *line += 1;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
  "generation log": {
    "version info": "v1.0.0-gabc1234",
    "date": "20261018-120000"
  },
  "m8g.xlarge": {
    "CSP": "aws",
    "os": {
      "Ubuntu": {
        "Processor": {
          "coremark-1.0.1": {
            "4": {
              "perf_stat": {},
              "test_name": {
                "CoreMark": {
                  "raw_values": [
                    1.0,
                    2.0
                  ],
                  "time": "N/A"
                }
              }
            }
          }
        }
      }
    }
  }
}"#;

    #[test]
    fn test_pointer_escaping() {
        assert_eq!(pointer(["a/b", "c~d"]), "/a~1b/c~0d");
        assert_eq!(pointer(Vec::<String>::new()), "");
    }

    #[test]
    fn test_index_nested_members() {
        let map = SourceMap::index(DOC);
        assert_eq!(map.line_of("/generation log/version info"), Some(3));
        assert_eq!(map.line_of("/m8g.xlarge"), Some(6));
        assert_eq!(
            map.line_of("/m8g.xlarge/os/Ubuntu/Processor/coremark-1.0.1/4/test_name/CoreMark"),
            Some(15)
        );
        assert_eq!(
            map.line_of("/m8g.xlarge/os/Ubuntu/Processor/coremark-1.0.1/4/test_name/CoreMark/time"),
            Some(20)
        );
    }

    #[test]
    fn test_index_array_elements() {
        let map = SourceMap::index(DOC);
        let base = "/m8g.xlarge/os/Ubuntu/Processor/coremark-1.0.1/4/test_name/CoreMark/raw_values";
        assert_eq!(map.line_of(&format!("{base}/0")), Some(17));
        assert_eq!(map.line_of(&format!("{base}/1")), Some(18));
    }

    #[test]
    fn test_nearest_line_walks_up() {
        let map = SourceMap::index(DOC);
        assert_eq!(
            map.nearest_line("/m8g.xlarge/os/Ubuntu/Processor/coremark-1.0.1/8/test_name/X"),
            Some(11)
        );
        assert_eq!(map.nearest_line("/nope"), None);
    }

    #[test]
    fn test_escaped_keys() {
        let map = SourceMap::index("{\n\"a/b\": {\n\"q\\\"x\": 1\n}\n}");
        assert_eq!(map.line_of("/a~1b"), Some(2));
        assert_eq!(map.line_of("/a~1b/q\"x"), Some(3));
    }

    #[test]
    fn test_empty_map() {
        assert!(SourceMap::empty().is_empty());
        assert!(SourceMap::index("{}").is_empty());
    }
}
