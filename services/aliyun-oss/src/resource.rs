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

use crate::query::QUERY_CONTINUATION_TOKEN;
use reqoss_core::CanonicalizedResource;

/// Builds the canonicalized resource of a bucket or object request.
///
/// Query parameters are written in the order they are added. The request
/// url must carry them in the same order.
#[derive(Debug, Clone)]
pub struct ResourceBuilder<'a> {
    bucket: &'a str,
    key: &'a str,
    query: Vec<(&'a str, String)>,
}

impl<'a> ResourceBuilder<'a> {
    /// Start from the bucket root `/<bucket>/`.
    pub fn new(bucket: &'a str) -> Self {
        Self {
            bucket,
            key: "",
            query: Vec::new(),
        }
    }

    /// Address an object inside the bucket.
    pub fn object(mut self, key: &'a str) -> Self {
        self.key = key;
        self
    }

    /// Append `k=v`.
    pub fn query(mut self, key: &'a str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    /// Append a value-less sub resource such as `uploads`.
    pub fn sub_resource(mut self, key: &'a str) -> Self {
        self.query.push((key, String::new()));
        self
    }

    /// Finish as `/<bucket>/<key>[?k=v[&k=v...]]`.
    pub fn build(self) -> CanonicalizedResource {
        let mut s = format!("/{}/{}", self.bucket, self.key);
        for (idx, (k, v)) in self.query.iter().enumerate() {
            s.push(if idx == 0 { '?' } else { '&' });
            s.push_str(k);
            if !v.is_empty() {
                s.push('=');
                s.push_str(v);
            }
        }
        CanonicalizedResource::new(s)
    }
}

/// Resource of an object listing page.
///
/// The continuation token is only part of the resource when non-empty.
pub fn listing(bucket: &str, continuation_token: &str) -> CanonicalizedResource {
    let builder = ResourceBuilder::new(bucket);
    if continuation_token.is_empty() {
        builder.build()
    } else {
        builder
            .query(QUERY_CONTINUATION_TOKEN, continuation_token)
            .build()
    }
}
