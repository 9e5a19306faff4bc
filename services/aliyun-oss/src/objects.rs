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
use crate::{Bucket, Client, Object, ProtocolError};
use reqoss_core::Result;

/// One page of an object listing.
#[derive(Debug, Clone)]
pub struct Objects {
    /// Objects of this page, in response order.
    pub list: Vec<Object>,
    /// Token of the next page, empty on the last page.
    pub next_token: String,
    /// Bucket and filters this page was listed with.
    pub bucket: Bucket,
}

impl Objects {
    /// Whether another page can be fetched.
    pub fn has_next(&self) -> bool {
        !self.next_token.is_empty()
    }

    /// Fetch the next page with the same filters.
    ///
    /// Fails with [`ProtocolError::NoMoreObjects`] on the last page, without
    /// sending any request.
    pub async fn next_list(&self, client: &Client) -> Result<Objects> {
        if !self.has_next() {
            return Err(ProtocolError::NoMoreObjects.into());
        }

        let bucket = self
            .bucket
            .clone()
            .with_query([(QUERY_CONTINUATION_TOKEN, self.next_token.as_str())]);
        client.list_objects(&bucket).await
    }
}
