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

use crate::endpoint::{parse_domain, EndPoint};
use crate::query::ObjectQuery;
use reqoss_core::{Error, Result};

/// Bucket is a named container bound to an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    name: String,
    endpoint: EndPoint,
    query: ObjectQuery,
    domain: Option<String>,
}

impl Bucket {
    /// Create a bucket, rejecting empty names.
    pub fn new(name: &str, endpoint: EndPoint) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::config_invalid("invalid bucket name"));
        }

        Ok(Self {
            name: name.to_string(),
            endpoint,
            query: ObjectQuery::default(),
            domain: None,
        })
    }

    /// Serve this bucket from a custom domain, e.g. `https://cdn.example.com`.
    pub fn with_domain(mut self, domain: &str) -> Result<Self> {
        self.domain = Some(parse_domain(domain)?);
        Ok(self)
    }

    /// Route requests through a custom endpoint domain.
    pub fn with_endpoint_domain(mut self, domain: &str) -> Result<Self> {
        self.endpoint = self.endpoint.with_domain(domain)?;
        Ok(self)
    }

    /// Add listing filters, keeping the existing ones.
    pub fn with_query<K, V>(mut self, query: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in query {
            self.query.insert(k, v);
        }
        self
    }

    /// Replace the listing filters.
    pub fn with_object_query(mut self, query: ObjectQuery) -> Self {
        self.query = query;
        self
    }

    /// Name of the bucket.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Endpoint the bucket lives in.
    pub fn endpoint(&self) -> &EndPoint {
        &self.endpoint
    }

    /// Listing filters.
    pub fn object_query(&self) -> &ObjectQuery {
        &self.query
    }

    /// Base url of the bucket, without trailing slash.
    pub fn url(&self) -> String {
        match &self.domain {
            Some(domain) => domain.clone(),
            None => format!("https://{}.{}", self.name, self.endpoint.host()),
        }
    }
}
