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

use super::constants::*;
use reqoss_core::utils::Redact;
use reqoss_core::Context;
use std::fmt::{Debug, Formatter};

/// Config carries all the configuration for an Aliyun OSS client.
///
/// The config is assembled before the client is built and is never read
/// again afterwards.
#[derive(Clone, Default)]
pub struct Config {
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIYUN_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `access_key_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIYUN_KEY_SECRET`]
    pub access_key_secret: Option<String>,
    /// `bucket` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIYUN_BUCKET`]
    pub bucket: Option<String>,
    /// `endpoint` is a region code like `cn-hangzhou` or `cn-hangzhou-internal`.
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIYUN_ENDPOINT`]
    /// - default to `cn-qingdao`
    pub endpoint: Option<String>,
    /// `domain` replaces the bucket url, e.g. a CDN domain bound to the bucket.
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIYUN_CUSTOM_DOMAIN`]
    pub domain: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let secret = self.access_key_secret.as_deref().unwrap_or_default();
        f.debug_struct("Config")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &Redact::from(secret))
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .field("domain", &self.domain)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(ALIYUN_KEY_ID) {
            self.access_key_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIYUN_KEY_SECRET) {
            self.access_key_secret.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIYUN_BUCKET) {
            self.bucket.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIYUN_ENDPOINT) {
            self.endpoint.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIYUN_CUSTOM_DOMAIN) {
            self.domain.get_or_insert(v);
        }

        self
    }
}
