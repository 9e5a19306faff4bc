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

use reqoss_core::hash::base64_hmac_sha1;
use reqoss_core::utils::Redact;
use reqoss_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Secret holds the access key secret and signs strings with it.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wrap an access key secret.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Base64 encoded HMAC-SHA1 of `data`, keyed by this secret.
    pub fn encryption(&self, data: &str) -> String {
        base64_hmac_sha1(self.0.as_bytes(), data.as_bytes())
    }

    /// Check if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for Secret {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Secret")
            .field(&Redact::from(&self.0))
            .finish()
    }
}

/// Credential that holds the access key id and its secret.
#[derive(Default, Clone)]
pub struct Credential {
    /// Access key id for aliyun services.
    pub access_key_id: String,
    /// Access key secret for aliyun services.
    pub secret: Secret,
}

impl Credential {
    /// Create a new credential.
    pub fn new(access_key_id: &str, access_key_secret: &str) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            secret: Secret::new(access_key_secret),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret", &self.secret)
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_encryption() {
        let secret = Secret::new("secret");
        assert_eq!(secret.encryption("data"), "mBjjMGulrCZ7XyZ5/kq9N+bNe1Q=");
    }

    #[test]
    fn test_debug_never_prints_secret() {
        let cred = Credential::new("LTAI5tAccessKeyId", "a-very-secret-value");
        let printed = format!("{cred:?}");
        assert!(!printed.contains("a-very-secret-value"));
        assert!(printed.contains("LTA***yId"));
    }

    #[test]
    fn test_is_valid() {
        assert!(Credential::new("ak", "sk").is_valid());
        assert!(!Credential::new("", "sk").is_valid());
        assert!(!Credential::new("ak", "").is_valid());
    }
}
