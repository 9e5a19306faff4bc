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

//! Reqwest-based HTTP transport for reqoss.
//!
//! ```no_run
//! use reqoss_core::{Context, OsEnv};
//! use reqoss_http_send_reqwest::ReqwestHttpSend;
//!
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use http_body_util::BodyExt;
use reqoss_core::{Error, HttpBody, HttpSend, Result};
use reqwest::{Client, Request};

/// Transport backed by a [`reqwest::Client`].
///
/// Network failures are reported as `ErrorKind::Transport`. Non-success
/// statuses are returned as regular responses.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn execute(&self, req: http::Request<Bytes>) -> Result<reqwest::Response> {
        let req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to convert request").with_source(e))?;

        log::debug!("sending {} {}", req.method(), req.url());
        let resp = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::transport("failed to send request").with_source(e))?;
        log::debug!("received {} from {}", resp.status(), resp.url());

        Ok(resp)
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let resp: http::Response<_> = self.execute(req).await?.into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::transport("failed to read response body").with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }

    async fn http_send_stream(
        &self,
        req: http::Request<Bytes>,
    ) -> Result<http::Response<HttpBody>> {
        let resp = self.execute(req).await?;

        let mut builder = http::Response::builder()
            .status(resp.status())
            .version(resp.version());
        if let Some(headers) = builder.headers_mut() {
            *headers = resp.headers().clone();
        }

        let body: HttpBody = resp
            .bytes_stream()
            .map(|chunk| {
                chunk.map_err(|e| Error::transport("failed to read response body").with_source(e))
            })
            .boxed();
        Ok(builder.body(body)?)
    }
}
