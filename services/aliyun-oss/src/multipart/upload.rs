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

use crate::constants::*;
use crate::query::encode_query_value;
use crate::resource::ResourceBuilder;
use crate::scrape::extract;
use crate::{Client, Object, ProtocolError};
use bytes::Bytes;
use http::header::ETAG;
use http::{HeaderMap, Method};
use reqoss_core::{Error, Result};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Lifecycle of a multipart upload session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    /// No session has been started.
    Empty,
    /// The service issued an upload id, parts may be uploaded.
    Initiated,
    /// The object has been assembled.
    Completed,
    /// A step failed or the session was aborted.
    Failed,
}

/// A part accepted by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Number of the part, starting at 1.
    pub number: u32,
    /// ETag returned for the part.
    pub etag: String,
}

/// PartsUpload uploads one object through a multipart session.
///
/// ```no_run
/// # async fn example(client: &reqoss_aliyun_oss::Client) -> reqoss_core::Result<()> {
/// use reqoss_aliyun_oss::PartsUpload;
///
/// PartsUpload::new("video/big.mp4")
///     .file_path("./big.mp4")
///     .part_size(5 * 1024 * 1024)
///     .upload(client)
///     .await
/// # }
/// ```
///
/// Parts are sent one after another. A failed upload leaves the remote
/// session in place, call [`PartsUpload::abort`] to discard it.
#[derive(Debug, Clone)]
pub struct PartsUpload {
    object: Object,
    file_path: Option<PathBuf>,
    part_size: usize,
    upload_id: String,
    parts: Vec<Part>,
    state: UploadState,
}

impl PartsUpload {
    /// Upload to the object at `path`.
    pub fn new(path: impl Into<Object>) -> Self {
        Self {
            object: path.into(),
            file_path: None,
            part_size: DEFAULT_PART_SIZE,
            upload_id: String::new(),
            parts: Vec::new(),
            state: UploadState::Empty,
        }
    }

    /// Local file read by [`PartsUpload::upload`].
    pub fn file_path(mut self, path: impl AsRef<Path>) -> Self {
        self.file_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Size of every part but the last, at least 100 KiB.
    pub fn part_size(mut self, size: usize) -> Self {
        self.part_size = size;
        self
    }

    /// Current state of the session.
    pub fn state(&self) -> UploadState {
        self.state
    }

    /// Upload id issued by the service, empty before initiate.
    pub fn upload_id(&self) -> &str {
        &self.upload_id
    }

    /// Parts uploaded so far, in upload order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Upload the configured file: initiate, one part per chunk, complete.
    pub async fn upload(&mut self, client: &Client) -> Result<()> {
        let Some(path) = self.file_path.clone() else {
            return Err(Error::request_invalid(
                "file path of multipart upload is not set",
            ));
        };
        if self.part_size < MIN_PART_SIZE {
            return Err(Error::request_invalid(format!(
                "part size {} is less than {MIN_PART_SIZE}",
                self.part_size
            )));
        }

        let mut file = tokio::fs::File::open(&path).await.map_err(|e| {
            Error::local_io(format!("failed to open {}", path.display())).with_source(e)
        })?;
        let size = file
            .metadata()
            .await
            .map_err(|e| {
                Error::local_io(format!("failed to stat {}", path.display())).with_source(e)
            })?
            .len();
        if size == 0 {
            return Err(Error::request_invalid(format!(
                "{} is empty, nothing to upload",
                path.display()
            )));
        }

        self.initiate(client).await?;
        let result = self.upload_file(client, &mut file).await;
        if let Err(err) = &result {
            self.state = UploadState::Failed;
            log::warn!(
                "multipart upload of {} failed, upload id {} is left dangling: {err}",
                self.object.path(),
                self.upload_id
            );
        }
        result
    }

    async fn upload_file(
        &mut self,
        client: &Client,
        file: &mut (impl AsyncRead + Unpin),
    ) -> Result<()> {
        let mut buf = vec![0; self.part_size];
        let mut index = 1;
        loop {
            let n = read_chunk(&mut *file, &mut buf).await.map_err(|e| {
                Error::local_io(format!("failed to read part {index}")).with_source(e)
            })?;
            if n == 0 {
                break;
            }

            self.upload_part(index, Bytes::copy_from_slice(&buf[..n]), client)
                .await?;
            index += 1;
        }

        self.complete(client).await
    }

    /// Start the session and record the upload id.
    pub async fn initiate(&mut self, client: &Client) -> Result<()> {
        let result = self.try_initiate(client).await;
        self.settle(result)
    }

    async fn try_initiate(&mut self, client: &Client) -> Result<()> {
        let bucket = client.bucket();
        let req = client.request(
            Method::POST,
            &format!("{}?{QUERY_UPLOADS}", self.object.url(bucket)),
            &ResourceBuilder::new(bucket.name())
                .object(self.object.path())
                .sub_resource(QUERY_UPLOADS)
                .build(),
            HeaderMap::new(),
            Bytes::new(),
        )?;
        let resp = client.send(req).await?;

        let upload_id = extract(&String::from_utf8_lossy(resp.body()), TAG_UPLOAD_ID);
        if upload_id.is_empty() {
            return Err(ProtocolError::MissingUploadId.into());
        }
        log::debug!(
            "initiated multipart upload of {} with id {upload_id}",
            self.object.path()
        );

        self.upload_id = upload_id;
        self.parts.clear();
        self.state = UploadState::Initiated;
        Ok(())
    }

    /// Upload part `index` and record its ETag.
    ///
    /// Parts are recorded in call order; indices are neither sorted nor
    /// deduplicated.
    pub async fn upload_part(&mut self, index: u32, content: Bytes, client: &Client) -> Result<()> {
        if index == 0 {
            return Err(Error::request_invalid("part number starts at 1"));
        }
        self.ensure_initiated()?;

        let result = self.try_upload_part(index, content, client).await;
        self.settle(result)
    }

    async fn try_upload_part(&mut self, index: u32, content: Bytes, client: &Client) -> Result<()> {
        let bucket = client.bucket();
        let req = client.request(
            Method::PUT,
            &format!(
                "{}?{QUERY_PART_NUMBER}={index}&{QUERY_UPLOAD_ID}={}",
                self.object.url(bucket),
                encode_query_value(&self.upload_id)
            ),
            &ResourceBuilder::new(bucket.name())
                .object(self.object.path())
                .query(QUERY_PART_NUMBER, index)
                .query(QUERY_UPLOAD_ID, &self.upload_id)
                .build(),
            HeaderMap::new(),
            content,
        )?;
        let resp = client.send(req).await?;

        let etag = resp
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or(ProtocolError::MissingETag)?;
        log::debug!(
            "uploaded part {index} of {} with etag {etag}",
            self.upload_id
        );

        self.parts.push(Part {
            number: index,
            etag: etag.to_string(),
        });
        Ok(())
    }

    /// Assemble the object from the recorded parts.
    ///
    /// Fails with [`ProtocolError::EmptyParts`] without sending anything if
    /// no part has been uploaded.
    pub async fn complete(&mut self, client: &Client) -> Result<()> {
        if self.parts.is_empty() {
            return Err(ProtocolError::EmptyParts.into());
        }
        self.ensure_initiated()?;

        let result = self.try_complete(client).await;
        self.settle(result)?;
        self.state = UploadState::Completed;
        Ok(())
    }

    async fn try_complete(&self, client: &Client) -> Result<()> {
        let bucket = client.bucket();
        let req = client.request(
            Method::POST,
            &format!(
                "{}?{QUERY_UPLOAD_ID}={}",
                self.object.url(bucket),
                encode_query_value(&self.upload_id)
            ),
            &ResourceBuilder::new(bucket.name())
                .object(self.object.path())
                .query(QUERY_UPLOAD_ID, &self.upload_id)
                .build(),
            HeaderMap::new(),
            Bytes::from(self.manifest()?),
        )?;
        let resp = client.execute(req).await?;
        if !resp.status().is_success() {
            return Err(ProtocolError::CompleteFailed(resp.status()).into());
        }

        log::debug!(
            "completed multipart upload {} with {} parts",
            self.upload_id,
            self.parts.len()
        );
        Ok(())
    }

    /// Discard the session and every part uploaded to it.
    pub async fn abort(&mut self, client: &Client) -> Result<()> {
        if self.upload_id.is_empty() {
            return Err(Error::request_invalid("multipart upload is not initiated"));
        }

        let bucket = client.bucket();
        let req = client.request(
            Method::DELETE,
            &format!(
                "{}?{QUERY_UPLOAD_ID}={}",
                self.object.url(bucket),
                encode_query_value(&self.upload_id)
            ),
            &ResourceBuilder::new(bucket.name())
                .object(self.object.path())
                .query(QUERY_UPLOAD_ID, &self.upload_id)
                .build(),
            HeaderMap::new(),
            Bytes::new(),
        )?;
        client.send(req).await?;

        log::debug!("aborted multipart upload {}", self.upload_id);
        self.state = UploadState::Failed;
        Ok(())
    }

    /// Body of the complete request, parts listed in upload order.
    fn manifest(&self) -> Result<String> {
        let mut s = String::from("<CompleteMultipartUpload>");
        for part in &self.parts {
            write!(
                &mut s,
                "<Part><PartNumber>{}</PartNumber><ETag>{}</ETag></Part>",
                part.number, part.etag
            )?;
        }
        s.push_str("</CompleteMultipartUpload>");
        Ok(s)
    }

    fn ensure_initiated(&self) -> Result<()> {
        if self.state != UploadState::Initiated {
            return Err(Error::request_invalid(format!(
                "multipart upload is {:?}, not initiated",
                self.state
            )));
        }
        Ok(())
    }

    fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.state = UploadState::Failed;
        }
        result
    }
}

/// Fill `buf` from `reader`, returning less than its length only at end of input.
async fn read_chunk(
    reader: &mut (impl AsyncRead + Unpin),
    buf: &mut [u8],
) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{client, MockHttpSend};
    use http::StatusCode;
    use pretty_assertions::assert_eq;
    use reqoss_core::ErrorKind;
    use std::io::Write as _;

    const INITIATE: &str = "<InitiateMultipartUploadResult>\
        <Bucket>bkt</Bucket><Key>big.bin</Key>\
        <UploadId>0004B9894A22E5B1888A1E29F823****</UploadId>\
        </InitiateMultipartUploadResult>";
    const UPLOAD_ID: &str = "0004B9894A22E5B1888A1E29F823****";

    fn source_file(size: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file must be created");
        let content: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
        file.write_all(&content).expect("temp file must be written");
        file
    }

    #[tokio::test]
    async fn test_upload_three_parts() -> Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let mock = MockHttpSend::default();
        mock.respond(StatusCode::OK, &[], INITIATE)
            .respond(StatusCode::OK, &[("etag", "\"e1\"")], "")
            .respond(StatusCode::OK, &[("etag", "\"e2\"")], "")
            .respond(StatusCode::OK, &[("etag", "\"e3\"")], "")
            .respond(StatusCode::OK, &[], "<CompleteMultipartUploadResult/>");
        let client = client(&mock).await;

        let file = source_file(MIN_PART_SIZE * 2 + 10);
        let mut upload = PartsUpload::new("big.bin")
            .file_path(file.path())
            .part_size(MIN_PART_SIZE);
        upload.upload(&client).await?;

        assert_eq!(upload.state(), UploadState::Completed);
        assert_eq!(upload.upload_id(), UPLOAD_ID);

        let requests = mock.requests();
        assert_eq!(requests.len(), 5);

        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(
            requests[0].uri,
            "https://bkt.oss-cn-hangzhou.aliyuncs.com/big.bin?uploads"
        );
        assert_eq!(
            requests[0].header("canonicalizedresource"),
            "/bkt/big.bin?uploads"
        );

        for (i, req) in requests[1..4].iter().enumerate() {
            let number = i + 1;
            assert_eq!(req.method, Method::PUT);
            assert_eq!(
                req.uri,
                format!(
                    "https://bkt.oss-cn-hangzhou.aliyuncs.com/big.bin\
                     ?partNumber={number}&uploadId=0004B9894A22E5B1888A1E29F823%2A%2A%2A%2A"
                )
            );
            assert_eq!(
                req.header("canonicalizedresource"),
                format!("/bkt/big.bin?partNumber={number}&uploadId={UPLOAD_ID}")
            );
        }
        assert_eq!(requests[1].body.len(), MIN_PART_SIZE);
        assert_eq!(requests[2].body.len(), MIN_PART_SIZE);
        assert_eq!(requests[3].body.len(), 10);
        assert_eq!(requests[3].header("content-length"), "10");

        assert_eq!(requests[4].method, Method::POST);
        assert_eq!(
            requests[4].header("canonicalizedresource"),
            format!("/bkt/big.bin?uploadId={UPLOAD_ID}")
        );
        assert_eq!(
            requests[4].body,
            Bytes::from(
                "<CompleteMultipartUpload>\
                 <Part><PartNumber>1</PartNumber><ETag>\"e1\"</ETag></Part>\
                 <Part><PartNumber>2</PartNumber><ETag>\"e2\"</ETag></Part>\
                 <Part><PartNumber>3</PartNumber><ETag>\"e3\"</ETag></Part>\
                 </CompleteMultipartUpload>",
            )
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_input_before_any_request() {
        let mock = MockHttpSend::default();
        let client = client(&mock).await;

        let err = PartsUpload::new("a")
            .upload(&client)
            .await
            .expect_err("file path is required");
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);

        let file = source_file(10);
        let err = PartsUpload::new("a")
            .file_path(file.path())
            .part_size(MIN_PART_SIZE - 1)
            .upload(&client)
            .await
            .expect_err("part size below minimum");
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);

        let empty = source_file(0);
        let err = PartsUpload::new("a")
            .file_path(empty.path())
            .upload(&client)
            .await
            .expect_err("empty file");
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);

        let err = PartsUpload::new("a")
            .file_path("/definitely/not/here.bin")
            .upload(&client)
            .await
            .expect_err("missing file");
        assert_eq!(err.kind(), ErrorKind::LocalIo);

        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_initiate_without_upload_id() {
        let mock = MockHttpSend::default();
        mock.respond(
            StatusCode::OK,
            &[],
            "<InitiateMultipartUploadResult><UploadId></UploadId></InitiateMultipartUploadResult>",
        );
        let client = client(&mock).await;

        let mut upload = PartsUpload::new("a");
        let err = upload.initiate(&client).await.expect_err("no upload id");
        assert_eq!(
            err.downcast_source::<ProtocolError>(),
            Some(&ProtocolError::MissingUploadId)
        );
        assert_eq!(upload.state(), UploadState::Failed);
    }

    #[tokio::test]
    async fn test_complete_without_parts_sends_nothing() -> Result<()> {
        let mock = MockHttpSend::default();
        mock.respond(StatusCode::OK, &[], INITIATE);
        let client = client(&mock).await;

        let mut upload = PartsUpload::new("a");
        upload.initiate(&client).await?;

        let err = upload
            .complete(&client)
            .await
            .expect_err("no part uploaded");
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert_eq!(
            err.downcast_source::<ProtocolError>(),
            Some(&ProtocolError::EmptyParts)
        );
        assert_eq!(mock.requests().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_part_checks() -> Result<()> {
        let mock = MockHttpSend::default();
        mock.respond(StatusCode::OK, &[], INITIATE)
            .respond(StatusCode::OK, &[], "");
        let client = client(&mock).await;

        let mut upload = PartsUpload::new("a");
        let err = upload
            .upload_part(1, Bytes::from("x"), &client)
            .await
            .expect_err("session not initiated");
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);

        upload.initiate(&client).await?;
        let err = upload
            .upload_part(0, Bytes::from("x"), &client)
            .await
            .expect_err("part number 0");
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);

        let err = upload
            .upload_part(1, Bytes::from("x"), &client)
            .await
            .expect_err("etag missing");
        assert_eq!(
            err.downcast_source::<ProtocolError>(),
            Some(&ProtocolError::MissingETag)
        );
        assert_eq!(upload.state(), UploadState::Failed);
        assert!(upload.parts().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_parts_are_kept_in_call_order() -> Result<()> {
        let mock = MockHttpSend::default();
        mock.respond(StatusCode::OK, &[], INITIATE)
            .respond(StatusCode::OK, &[("etag", "b")], "")
            .respond(StatusCode::OK, &[("etag", "a")], "")
            .respond(
                StatusCode::BAD_REQUEST,
                &[],
                "<Error><Code>InvalidPartOrder</Code></Error>",
            );
        let client = client(&mock).await;

        let mut upload = PartsUpload::new("a");
        upload.initiate(&client).await?;
        upload.upload_part(2, Bytes::from("b"), &client).await?;
        upload.upload_part(1, Bytes::from("a"), &client).await?;
        assert_eq!(
            upload.parts(),
            &[
                Part {
                    number: 2,
                    etag: "b".to_string(),
                },
                Part {
                    number: 1,
                    etag: "a".to_string(),
                },
            ]
        );

        let err = upload
            .complete(&client)
            .await
            .expect_err("service rejects the order");
        assert_eq!(err.kind(), ErrorKind::Service);
        assert_eq!(
            err.downcast_source::<ProtocolError>(),
            Some(&ProtocolError::CompleteFailed(StatusCode::BAD_REQUEST))
        );
        assert_eq!(upload.state(), UploadState::Failed);

        let manifest = &mock.requests()[3].body;
        assert_eq!(
            manifest,
            &Bytes::from(
                "<CompleteMultipartUpload>\
                 <Part><PartNumber>2</PartNumber><ETag>b</ETag></Part>\
                 <Part><PartNumber>1</PartNumber><ETag>a</ETag></Part>\
                 </CompleteMultipartUpload>",
            )
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_part_leaves_session_for_abort() -> Result<()> {
        let mock = MockHttpSend::default();
        mock.respond(StatusCode::OK, &[], INITIATE)
            .respond(StatusCode::OK, &[("etag", "e1")], "")
            .respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                &[],
                "<Error><Code>InternalError</Code></Error>",
            )
            .respond(StatusCode::NO_CONTENT, &[], "");
        let client = client(&mock).await;

        let file = source_file(MIN_PART_SIZE * 3);
        let mut upload = PartsUpload::new("big.bin")
            .file_path(file.path())
            .part_size(MIN_PART_SIZE);
        let err = upload.upload(&client).await.expect_err("second part fails");
        assert_eq!(err.kind(), ErrorKind::Service);
        assert_eq!(upload.state(), UploadState::Failed);
        assert_eq!(upload.upload_id(), UPLOAD_ID);
        // No complete and no implicit abort.
        assert_eq!(mock.requests().len(), 3);

        upload.abort(&client).await?;
        let requests = mock.requests();
        assert_eq!(requests[3].method, Method::DELETE);
        assert_eq!(
            requests[3].header("canonicalizedresource"),
            format!("/bkt/big.bin?uploadId={UPLOAD_ID}")
        );
        Ok(())
    }
}
