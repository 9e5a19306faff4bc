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

use crate::{constants::*, Credential};
use async_trait::async_trait;
use reqoss_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads Aliyun credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `ALIYUN_KEY_ID`: The Aliyun access key ID
/// - `ALIYUN_KEY_SECRET`: The Aliyun access key secret
///
/// Both must be present and non-empty.
#[derive(Debug, Default)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let access_key_id = ctx.env_var(ALIYUN_KEY_ID).filter(|v| !v.is_empty());
        let access_key_secret = ctx.env_var(ALIYUN_KEY_SECRET).filter(|v| !v.is_empty());

        match (access_key_id, access_key_secret) {
            (Some(ak), Some(sk)) => Ok(Some(Credential::new(&ak, &sk))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqoss_core::StaticEnv;
    use std::collections::HashMap;
    use test_case::test_case;

    fn ctx_with(envs: &[(&str, &str)]) -> Context {
        Context::new().with_env(StaticEnv {
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[tokio::test]
    async fn test_env_credential_provider() -> Result<()> {
        let ctx = ctx_with(&[
            (ALIYUN_KEY_ID, "test_access_key"),
            (ALIYUN_KEY_SECRET, "test_secret_key"),
        ]);

        let cred = EnvCredentialProvider::new()
            .provide_credential(&ctx)
            .await?
            .expect("credential must be loaded");
        assert_eq!(cred.access_key_id, "test_access_key");
        assert_eq!(cred.secret, crate::Secret::new("test_secret_key"));
        Ok(())
    }

    #[test_case(&[] ; "missing both")]
    #[test_case(&[(ALIYUN_KEY_ID, "test_access_key")] ; "missing secret")]
    #[test_case(&[(ALIYUN_KEY_SECRET, "test_secret_key")] ; "missing key id")]
    #[test_case(&[(ALIYUN_KEY_ID, ""), (ALIYUN_KEY_SECRET, "test_secret_key")] ; "empty key id")]
    #[tokio::test]
    async fn test_env_credential_provider_incomplete(envs: &[(&str, &str)]) {
        let cred = EnvCredentialProvider::new()
            .provide_credential(&ctx_with(envs))
            .await
            .expect("env provider never fails");
        assert!(cred.is_none());
    }
}
