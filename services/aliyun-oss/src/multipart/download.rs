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

use crate::constants::DEFAULT_PART_SIZE;
use crate::{Client, Object, ServiceError};
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;
use http::{HeaderMap, Method};
use reqoss_core::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio_util::io::StreamReader;

/// PartsDownload streams an object into a local file.
///
/// The object is fetched with a single request and written in chunks of
/// `part_size` bytes, so memory use stays bounded whatever the object size.
#[derive(Debug, Clone)]
pub struct PartsDownload {
    object: Object,
    part_size: usize,
    file_path: Option<PathBuf>,
}

impl PartsDownload {
    /// Download the object at `path`.
    pub fn new(path: impl Into<Object>) -> Self {
        Self {
            object: path.into(),
            part_size: DEFAULT_PART_SIZE,
            file_path: None,
        }
    }

    /// Chunk size used to read and buffer the body.
    pub fn part_size(mut self, size: usize) -> Self {
        self.part_size = size;
        self
    }

    /// Destination file, created or truncated once the service answers.
    pub fn file_path(mut self, path: impl AsRef<Path>) -> Self {
        self.file_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Run the download.
    pub async fn download(&self, client: &Client) -> Result<()> {
        let Some(path) = &self.file_path else {
            return Err(Error::request_invalid("file path of download is not set"));
        };
        if self.part_size == 0 {
            return Err(Error::request_invalid("part size must be greater than 0"));
        }

        let bucket = client.bucket();
        let req = client.request(
            Method::GET,
            &self.object.url(bucket),
            &self.object.resource(bucket),
            HeaderMap::new(),
            Bytes::new(),
        )?;
        let resp = client.send_stream(req).await?;

        let status = resp.status();
        if !status.is_success() {
            let body: BytesMut = resp.into_body().try_collect().await?;
            let body = String::from_utf8_lossy(&body);
            return Err(ServiceError::parse(status, &body).into());
        }

        let file = tokio::fs::File::create(path).await.map_err(|e| {
            Error::local_io(format!("failed to create {}", path.display())).with_source(e)
        })?;
        let mut writer = BufWriter::with_capacity(self.part_size, file);
        let mut reader = StreamReader::new(resp.into_body().map_err(std::io::Error::other));

        let mut buf = vec![0; self.part_size];
        let mut written = 0;
        loop {
            let n = reader
                .read(&mut buf)
                .await
                .map_err(|e| Error::transport("failed to read object body").with_source(e))?;
            if n == 0 {
                break;
            }
            writer.write_all(&buf[..n]).await.map_err(|e| {
                Error::local_io(format!("failed to write {}", path.display())).with_source(e)
            })?;
            written += n;
        }
        writer.flush().await.map_err(|e| {
            Error::local_io(format!("failed to flush {}", path.display())).with_source(e)
        })?;

        log::debug!(
            "downloaded {written} bytes of {} into {}",
            self.object.path(),
            path.display()
        );
        Ok(())
    }
}
