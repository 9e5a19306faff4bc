// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Narrow extraction of flat `<Tag>value</Tag>` pairs from response bodies.
//!
//! Aliyun responses used here are flat, so plain substring search is enough.
//! Nested or repeated tags with attributes are not supported.

/// Text between the first `<tag>` and the following `</tag>`.
///
/// Returns an empty string when the tag is absent or unterminated.
pub fn extract(body: &str, tag: &str) -> String {
    extract_all(body, tag)
        .into_iter()
        .next()
        .unwrap_or_default()
}

/// Text of every `<tag>...</tag>` pair, in document order.
pub fn extract_all(body: &str, tag: &str) -> Vec<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");

    let mut values = Vec::new();
    let mut rest = body;
    while let Some(start) = rest.find(&open) {
        rest = &rest[start + open.len()..];
        let Some(end) = rest.find(&close) else {
            break;
        };
        values.push(rest[..end].to_string());
        rest = &rest[end + close.len()..];
    }
    values
}
