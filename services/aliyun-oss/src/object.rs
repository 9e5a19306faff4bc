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

use crate::bucket::Bucket;
use crate::resource::ResourceBuilder;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqoss_core::CanonicalizedResource;

/// Characters escaped in object keys; `/` separates path segments and is kept.
const OBJECT_KEY_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Object is a key inside a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Object {
    path: String,
}

impl Object {
    /// Create an object, a leading `/` is ignored.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let path = match path.strip_prefix('/') {
            Some(v) => v.to_string(),
            None => path,
        };
        Self { path }
    }

    /// Key of the object.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Url of the object in `bucket`.
    pub fn url(&self, bucket: &Bucket) -> String {
        format!(
            "{}/{}",
            bucket.url(),
            utf8_percent_encode(&self.path, OBJECT_KEY_SET)
        )
    }

    /// Canonicalized resource `/<bucket>/<key>`.
    pub fn resource(&self, bucket: &Bucket) -> CanonicalizedResource {
        ResourceBuilder::new(bucket.name())
            .object(&self.path)
            .build()
    }
}

impl From<&str> for Object {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for Object {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

/// Content and metadata of a simple upload.
#[derive(Debug, Clone)]
pub struct PutObject {
    pub(crate) object: Object,
    pub(crate) content: Bytes,
    pub(crate) content_type: Option<String>,
}

impl PutObject {
    /// Upload to `object`, with an empty body until [`PutObject::content`] is set.
    pub fn new(object: impl Into<Object>) -> Self {
        Self {
            object: object.into(),
            content: Bytes::new(),
            content_type: None,
        }
    }

    /// Set the body.
    pub fn content(mut self, content: impl Into<Bytes>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the `Content-Type` header.
    pub fn content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }
}

/// Server side copy of an object.
#[derive(Debug, Clone)]
pub struct CopyObject {
    pub(crate) dest: Object,
    pub(crate) source: String,
    pub(crate) content_type: Option<String>,
}

impl CopyObject {
    /// Copy `source`, written as `/<bucket>/<key>`, to `dest`.
    pub fn new(dest: impl Into<Object>, source: &str) -> Self {
        Self {
            dest: dest.into(),
            source: source.to_string(),
            content_type: None,
        }
    }

    /// Set the `Content-Type` header of the request.
    pub fn content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndPoint;
    use reqoss_core::Result;

    #[test]
    fn test_object_url_and_resource() -> Result<()> {
        let bucket = Bucket::new("bkt", EndPoint::new("cn-hangzhou")?)?;
        let object = Object::new("/dir/hello world.txt");

        assert_eq!(object.path(), "dir/hello world.txt");
        assert_eq!(
            object.url(&bucket),
            "https://bkt.oss-cn-hangzhou.aliyuncs.com/dir/hello%20world.txt"
        );
        assert_eq!(
            object.resource(&bucket).as_str(),
            "/bkt/dir/hello world.txt"
        );
        Ok(())
    }
}
