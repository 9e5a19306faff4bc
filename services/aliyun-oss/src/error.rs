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

use crate::scrape::extract;
use http::StatusCode;
use std::fmt::{Display, Formatter};

/// Error details returned by the service with a non-success status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceError {
    /// Status the response carried.
    pub status: StatusCode,
    /// Vendor error code, e.g. `NoSuchKey`.
    pub code: String,
    /// Human readable message.
    pub message: String,
    /// Request id, useful when contacting support.
    pub request_id: String,
    /// Link to the vendor documentation for this error.
    pub recommend_doc: String,
}

impl ServiceError {
    /// Parse the error body of a non-success response.
    ///
    /// Missing fields are left empty.
    pub fn parse(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            code: extract(body, "Code"),
            message: extract(body, "Message"),
            request_id: extract(body, "RequestId"),
            recommend_doc: extract(body, "RecommendDoc"),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "oss return: {}", self.message)
    }
}

impl std::error::Error for ServiceError {}

impl From<ServiceError> for reqoss_core::Error {
    fn from(err: ServiceError) -> Self {
        reqoss_core::Error::service(format!(
            "{} {}: {} (request id: {})",
            err.status, err.code, err.message, err.request_id
        ))
        .with_source(err)
    }
}

/// A response that succeeded but lacked something the protocol requires,
/// or a call made in a state the protocol forbids.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// Initiate response has no `UploadId`.
    #[error("upload id is missing from initiate response")]
    MissingUploadId,
    /// Part upload response has no `ETag` header.
    #[error("etag is missing from upload part response")]
    MissingETag,
    /// `next_list` called on the last page.
    #[error("no more objects")]
    NoMoreObjects,
    /// `complete` called before any part was uploaded.
    #[error("no part has been uploaded")]
    EmptyParts,
    /// Complete request answered with a non-success status.
    #[error("complete multipart upload failed with status {0}")]
    CompleteFailed(StatusCode),
}

impl From<ProtocolError> for reqoss_core::Error {
    fn from(err: ProtocolError) -> Self {
        let msg = err.to_string();
        match err {
            ProtocolError::CompleteFailed(_) => reqoss_core::Error::service(msg),
            _ => reqoss_core::Error::protocol(msg),
        }
        .with_source(err)
    }
}
