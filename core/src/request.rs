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

use std::fmt;
use std::mem;

use http::header::HeaderName;
use http::HeaderMap;
use http::Method;

use crate::Result;

/// CanonicalizedResource is the resource path (bucket, object and the query
/// parameters the service signs) used as an opaque signing input.
///
/// It is built fresh for every request and never mutated afterwards. The
/// default value is the account level resource `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalizedResource(String);

impl CanonicalizedResource {
    /// Wrap an already formatted resource string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The resource string, exactly as it enters the string to sign.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CanonicalizedResource {
    fn default() -> Self {
        Self("/".to_string())
    }
}

impl fmt::Display for CanonicalizedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signing context for request.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Self {
        SigningRequest {
            method: parts.method.clone(),
            // Take the headers out of the request to avoid copy.
            // We will return it back when apply the context.
            headers: mem::take(&mut parts.headers),
        }
    }

    /// Apply the signing context back to http::request::Parts.
    pub fn apply(mut self, parts: &mut http::request::Parts) {
        mem::swap(&mut parts.headers, &mut self.headers);
    }

    /// Get header value by name.
    ///
    /// Returns empty string if header not found.
    #[inline]
    pub fn header_get_or_default(&self, key: &HeaderName) -> Result<&str> {
        match self.headers.get(key) {
            Some(v) => Ok(v.to_str()?),
            None => Ok(""),
        }
    }

    /// Get headers whose lowercased name starts with prefix.
    ///
    /// Values are taken as sent, utf-8 values included.
    pub fn header_to_vec_with_prefix(&self, prefix: &str) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|(k, v)| (k.as_str().to_lowercase(), v))
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| {
                (k, String::from_utf8_lossy(v.as_bytes()).into_owned())
            })
            .collect()
    }

    /// Convert sorted headers to string.
    ///
    /// ```shell
    /// [(a, b), (c, d)] => "a:b\nc:d\n"
    /// ```
    ///
    /// Every pair, the last one included, is followed by `join`.
    pub fn header_to_string(mut headers: Vec<(String, String)>, sep: &str, join: &str) -> String {
        let mut s = String::with_capacity(16);

        // Sort via header name.
        headers.sort();

        for (k, v) in headers {
            s.push_str(&k);
            s.push_str(sep);
            s.push_str(&v);
            s.push_str(join);
        }

        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_default_resource_is_root() {
        assert_eq!(CanonicalizedResource::default().as_str(), "/");
        assert_eq!(CanonicalizedResource::new("/b/k").to_string(), "/b/k");
    }

    #[test]
    fn test_header_to_string_sorted() {
        let mut parts = http::Request::new(()).into_parts().0;
        parts
            .headers
            .insert("x-oss-b", HeaderValue::from_static("2"));
        parts
            .headers
            .insert("x-oss-a", HeaderValue::from_static("1"));
        parts
            .headers
            .insert("content-type", HeaderValue::from_static("text/plain"));

        let req = SigningRequest::build(&mut parts);
        assert!(parts.headers.is_empty());

        let headers = req.header_to_vec_with_prefix("x-oss-");
        let s = SigningRequest::header_to_string(headers, ":", "\n");
        assert_eq!(s, "x-oss-a:1\nx-oss-b:2\n");

        req.apply(&mut parts);
        assert_eq!(parts.headers.len(), 3);
    }

    #[test]
    fn test_header_prefix_keeps_utf8_values() -> Result<()> {
        let mut parts = http::Request::new(()).into_parts().0;
        let value = HeaderValue::from_bytes("杭州".as_bytes())?;
        parts.headers.insert("x-oss-meta-city", value);

        let req = SigningRequest::build(&mut parts);
        assert_eq!(
            req.header_to_vec_with_prefix("x-oss-"),
            vec![("x-oss-meta-city".to_string(), "杭州".to_string())]
        );
        Ok(())
    }

    #[test]
    fn test_header_to_string_empty() {
        assert_eq!(SigningRequest::header_to_string(vec![], ":", "\n"), "");
    }
}
