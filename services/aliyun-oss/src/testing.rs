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

//! In-memory transport for unit tests.

use crate::{Client, Config, RequestSigner};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::TimeZone;
use futures::StreamExt;
use http::{HeaderMap, Method, StatusCode};
use reqoss_core::{Context, Error, HttpBody, HttpSend, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Serves canned responses in order and records every request it receives.
#[derive(Debug, Clone, Default)]
pub struct MockHttpSend {
    responses: Arc<Mutex<VecDeque<http::Response<Bytes>>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

/// A request seen by [`MockHttpSend`].
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    /// Header value, empty if absent.
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

impl MockHttpSend {
    /// Queue a response.
    pub fn respond(&self, status: StatusCode, headers: &[(&str, &str)], body: &str) -> &Self {
        let mut resp = http::Response::builder().status(status);
        for (k, v) in headers {
            resp = resp.header(*k, *v);
        }
        let resp = resp
            .body(Bytes::from(body.to_string()))
            .expect("canned response must be valid");
        self.responses.lock().unwrap().push_back(resp);
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        self.requests.lock().unwrap().push(Recorded {
            method: parts.method,
            uri: parts.uri.to_string(),
            headers: parts.headers,
            body,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::transport("no canned response left"))
    }
}

/// Streams a successful body in the given chunks, optionally breaking after them.
#[derive(Debug, Clone, Default)]
pub struct ChunkedHttpSend {
    chunks: Vec<&'static str>,
    broken: bool,
}

impl ChunkedHttpSend {
    pub fn new(chunks: &[&'static str]) -> Self {
        Self {
            chunks: chunks.to_vec(),
            broken: false,
        }
    }

    /// Fail the stream with a transport error after the last chunk.
    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }
}

#[async_trait]
impl HttpSend for ChunkedHttpSend {
    async fn http_send(&self, _req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Err(Error::unexpected("only streamed responses are served"))
    }

    async fn http_send_stream(
        &self,
        _req: http::Request<Bytes>,
    ) -> Result<http::Response<HttpBody>> {
        let mut items: Vec<Result<Bytes>> = self
            .chunks
            .iter()
            .map(|chunk| Ok(Bytes::from_static(chunk.as_bytes())))
            .collect();
        if self.broken {
            items.push(Err(Error::transport("connection reset")));
        }

        let body: HttpBody = futures::stream::iter(items).boxed();
        Ok(http::Response::new(body))
    }
}

/// Client of bucket `bkt` in `cn-hangzhou`, signing at a fixed time.
pub async fn client(send: &(impl HttpSend + Clone)) -> Client {
    let ctx = Context::new().with_http_send(send.clone());
    let config = Config {
        access_key_id: Some("access_key_id".to_string()),
        access_key_secret: Some("access_key_secret".to_string()),
        bucket: Some("bkt".to_string()),
        endpoint: Some("cn-hangzhou".to_string()),
        domain: None,
    };

    let time = chrono::Utc
        .with_ymd_and_hms(2022, 3, 1, 8, 12, 34)
        .single()
        .expect("fixed time must be valid");
    Client::new(ctx, config)
        .await
        .expect("client must be built")
        .with_request_signer(RequestSigner::new().with_time(time))
}
