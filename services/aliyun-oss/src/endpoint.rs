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

use http::Uri;
use reqoss_core::{Error, Result};
use std::fmt::{Display, Formatter};

/// Region code of Beijing.
pub const BEIJING: &str = "cn-beijing";
/// Region code of Shanghai.
pub const SHANGHAI: &str = "cn-shanghai";
/// Region code of Qingdao, used when no endpoint is configured.
pub const QINGDAO: &str = "cn-qingdao";
/// Region code of Shenzhen.
pub const SHENZHEN: &str = "cn-shenzhen";
/// Region code of Hangzhou.
pub const HANGZHOU: &str = "cn-hangzhou";
/// Region code of Hong Kong.
pub const HONGKONG: &str = "cn-hongkong";
/// Region code of Guangzhou.
pub const GUANGZHOU: &str = "cn-guangzhou";
/// Region code of Chengdu.
pub const CHENGDU: &str = "cn-chengdu";
/// Region code of Zhangjiakou.
pub const ZHANGJIAKOU: &str = "cn-zhangjiakou";
/// Region code of Hefei.
pub const HEFEI: &str = "cn-hefei";
/// Region code of Wuhan.
pub const WUHAN: &str = "cn-wuhan";
/// Region code of Nanjing.
pub const NANJING: &str = "cn-nanjing";
/// Region code of Silicon Valley.
pub const US_WEST_1: &str = "us-west-1";
/// Region code of Virginia.
pub const US_EAST_1: &str = "us-east-1";

const INTERNAL_SUFFIX: &str = "-internal";

/// EndPoint is the region an OSS request is sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndPoint {
    region: String,
    is_internal: bool,
    domain: Option<String>,
}

impl EndPoint {
    /// Parse a region code such as `cn-hangzhou` or `cn-hangzhou-internal`.
    ///
    /// A trailing `-internal` selects the VPC endpoint of the region.
    pub fn new(value: &str) -> Result<Self> {
        let (region, is_internal) = match value.strip_suffix(INTERNAL_SUFFIX) {
            Some(region) => (region, true),
            None => (value, false),
        };

        if region.is_empty()
            || region.starts_with('-')
            || region.ends_with('-')
            || region.starts_with("oss")
            || !region.chars().all(|c| c.is_alphanumeric() || c == '-')
        {
            return Err(Error::config_invalid(format!(
                "invalid endpoint: {value:?}"
            )));
        }

        Ok(Self {
            region: region.to_string(),
            is_internal,
            domain: None,
        })
    }

    /// Send requests to `domain` instead of the region host.
    ///
    /// `domain` must be an absolute url like `https://oss-accelerate.aliyuncs.com`.
    pub fn with_domain(mut self, domain: &str) -> Result<Self> {
        self.domain = Some(parse_domain(domain)?);
        Ok(self)
    }

    /// Region code, without the `-internal` suffix.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Whether this is the VPC endpoint of the region.
    pub fn is_internal(&self) -> bool {
        self.is_internal
    }

    /// Host of the endpoint, e.g. `oss-cn-hangzhou.aliyuncs.com`.
    pub fn host(&self) -> String {
        if let Some(domain) = self.domain.as_deref().and_then(host_of) {
            return domain;
        }

        let suffix = if self.is_internal { INTERNAL_SUFFIX } else { "" };
        format!("oss-{}{suffix}.aliyuncs.com", self.region)
    }

    /// Base url of the endpoint, without trailing slash.
    pub fn url(&self) -> String {
        match &self.domain {
            Some(domain) => domain.clone(),
            None => format!("https://{}", self.host()),
        }
    }
}

impl Default for EndPoint {
    fn default() -> Self {
        Self {
            region: QINGDAO.to_string(),
            is_internal: false,
            domain: None,
        }
    }
}

impl Display for EndPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.region)?;
        if self.is_internal {
            f.write_str(INTERNAL_SUFFIX)?;
        }
        Ok(())
    }
}

/// Validate an absolute url and strip its trailing slashes.
pub(crate) fn parse_domain(domain: &str) -> Result<String> {
    let uri: Uri = domain
        .parse()
        .map_err(|e| Error::config_invalid(format!("invalid domain: {domain:?}")).with_source(e))?;
    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(Error::config_invalid(format!(
            "domain must be an absolute url: {domain:?}"
        )));
    }

    Ok(domain.trim_end_matches('/').to_string())
}

fn host_of(domain: &str) -> Option<String> {
    let uri: Uri = domain.parse().ok()?;
    uri.host().map(|v| v.to_string())
}
