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

use crate::constants::LIST_TYPE;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeMap;

/// Query key that groups keys sharing a prefix up to this character.
pub const QUERY_DELIMITER: &str = "delimiter";
/// Query key listing objects after this key.
pub const QUERY_START_AFTER: &str = "start-after";
/// Query key resuming a listing from a previous page.
pub const QUERY_CONTINUATION_TOKEN: &str = "continuation-token";
/// Query key limiting the number of objects per page.
pub const QUERY_MAX_KEYS: &str = "max-keys";
/// Query key filtering objects by prefix.
pub const QUERY_PREFIX: &str = "prefix";
/// Query key asking the service to encode keys in the response.
pub const QUERY_ENCODING_TYPE: &str = "encoding-type";
/// Query key asking for owner information.
pub const QUERY_FETCH_OWNER: &str = "fetch-owner";

/// Characters escaped in query values, following RFC 3986 unreserved set.
const QUERY_VALUE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Filters of an object listing.
///
/// Entries are kept in key order so the serialized query is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectQuery {
    query: BTreeMap<String, String>,
}

impl ObjectQuery {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.insert(key.into(), value.into());
    }

    /// Value of `key`, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Continuation token of this query, empty if unset.
    pub fn next_token(&self) -> &str {
        self.get(QUERY_CONTINUATION_TOKEN).unwrap_or_default()
    }

    /// Set the continuation token, leaving every other filter untouched.
    pub fn insert_next_token(&mut self, token: impl Into<String>) {
        self.insert(QUERY_CONTINUATION_TOKEN, token);
    }

    /// Serialize as the query string of a listing request.
    ///
    /// Always starts with `list-type=2`.
    pub fn to_oss_query(&self) -> String {
        let mut s = LIST_TYPE.to_string();
        for (k, v) in &self.query {
            s.push('&');
            s.push_str(k);
            s.push('=');
            s.push_str(&encode_query_value(v));
        }
        s
    }
}

/// Percent encode a value placed in a request query string.
pub(crate) fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE_SET).to_string()
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ObjectQuery {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            query: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
