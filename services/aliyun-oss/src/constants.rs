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

// Env values used in aliyun services.
pub const ALIYUN_KEY_ID: &str = "ALIYUN_KEY_ID";
pub const ALIYUN_KEY_SECRET: &str = "ALIYUN_KEY_SECRET";
pub const ALIYUN_BUCKET: &str = "ALIYUN_BUCKET";
pub const ALIYUN_ENDPOINT: &str = "ALIYUN_ENDPOINT";
pub const ALIYUN_CUSTOM_DOMAIN: &str = "ALIYUN_CUSTOM_DOMAIN";

// Headers used in aliyun services.
pub const X_OSS_PREFIX: &str = "x-oss-";
pub const X_OSS_COPY_SOURCE: &str = "x-oss-copy-source";
pub const ACCESS_KEY_ID: &str = "AccessKeyId";
pub const VERB: &str = "VERB";
pub const CANONICALIZED_RESOURCE: &str = "CanonicalizedResource";

// Query keys used in aliyun services.
pub const LIST_TYPE: &str = "list-type=2";
pub const QUERY_UPLOADS: &str = "uploads";
pub const QUERY_PART_NUMBER: &str = "partNumber";
pub const QUERY_UPLOAD_ID: &str = "uploadId";

// Tags scraped from aliyun responses.
pub const TAG_NAME: &str = "Name";
pub const TAG_KEY: &str = "Key";
pub const TAG_NEXT_CONTINUATION_TOKEN: &str = "NextContinuationToken";
pub const TAG_UPLOAD_ID: &str = "UploadId";

/// Part size used when none is configured: 1 MiB.
pub const DEFAULT_PART_SIZE: usize = 1024 * 1024;
/// Smallest part size accepted for multipart upload: 100 KiB.
pub const MIN_PART_SIZE: usize = 1024 * 100;
