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
use crate::Credential;
use http::header::{HeaderName, AUTHORIZATION, CONTENT_TYPE, DATE};
use http::HeaderValue;
use reqoss_core::time::{format_http_date, now, DateTime};
use reqoss_core::{CanonicalizedResource, Context, Result, SignRequest, SigningRequest};
use std::fmt::Write;

/// RequestSigner for Aliyun OSS header signature.
#[derive(Debug, Default, Clone)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new builder for Aliyun OSS signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    fn get_time(&self) -> DateTime {
        self.time.unwrap_or_else(now)
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;

    fn sign_request(
        &self,
        _: &Context,
        req: &mut http::request::Parts,
        cred: &Self::Credential,
        resource: &CanonicalizedResource,
    ) -> Result<()> {
        let mut ctx = SigningRequest::build(req);

        let date = format_http_date(self.get_time());
        let string_to_sign = string_to_sign(&ctx, &date, resource)?;
        log::debug!("string to sign: {string_to_sign:?}");
        let signature = cred.secret.encryption(&string_to_sign);

        ctx.headers.insert(
            ACCESS_KEY_ID.parse::<HeaderName>()?,
            cred.access_key_id.parse()?,
        );
        ctx.headers
            .insert(VERB.parse::<HeaderName>()?, ctx.method.as_str().parse()?);
        ctx.headers.insert(DATE, date.parse()?);
        ctx.headers.insert(AUTHORIZATION, {
            let mut value: HeaderValue =
                format!("OSS {}:{}", cred.access_key_id, signature).parse()?;
            value.set_sensitive(true);
            value
        });
        // Object keys may carry non-ascii bytes, which `parse` rejects.
        ctx.headers.insert(
            CANONICALIZED_RESOURCE.parse::<HeaderName>()?,
            HeaderValue::from_bytes(resource.as_str().as_bytes())?,
        );

        ctx.apply(req);
        Ok(())
    }
}

/// Construct string to sign.
///
/// ## Format
///
/// ```text
/// VERB + "\n"
/// + "\n"
/// + Content-Type + "\n"
/// + Date + "\n"
/// + CanonicalizedOSSHeaders
/// + CanonicalizedResource
/// ```
///
/// The Content-MD5 line is always empty.
fn string_to_sign(
    ctx: &SigningRequest,
    date: &str,
    resource: &CanonicalizedResource,
) -> Result<String> {
    let mut s = String::new();
    writeln!(&mut s, "{}", ctx.method.as_str())?;
    writeln!(&mut s)?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&CONTENT_TYPE)?)?;
    writeln!(&mut s, "{date}")?;
    s.write_str(&SigningRequest::header_to_string(
        ctx.header_to_vec_with_prefix(X_OSS_PREFIX),
        ":",
        "\n",
    ))?;
    s.write_str(resource.as_str())?;

    Ok(s)
}
