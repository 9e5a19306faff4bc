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

use crate::{
    CanonicalizedResource, Context, Error, ProvideCredential, Result, SignRequest,
    SigningCredential,
};
use std::sync::Arc;

/// Signer is the main struct used to sign the request.
///
/// The credential is resolved once, when the signer is built, and never
/// changes afterwards.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    credential: K,
    builder: Arc<dyn SignRequest<Credential = K>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer from an already resolved credential.
    pub fn new(ctx: Context, credential: K, builder: impl SignRequest<Credential = K>) -> Self {
        Self {
            ctx,
            credential,
            builder: Arc::new(builder),
        }
    }

    /// Create a new signer, resolving the credential through `loader`.
    ///
    /// Fails with `ConfigInvalid` if the loader finds nothing or returns an
    /// invalid credential.
    pub async fn load(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Result<Self> {
        let credential = loader.provide_credential(&ctx).await?;
        let Some(credential) = credential.filter(|c| c.is_valid()) else {
            return Err(Error::config_invalid(format!(
                "no valid credential found by {loader:?}"
            )));
        };

        Ok(Self::new(ctx, credential, builder))
    }

    /// The credential this signer signs with.
    pub fn credential(&self) -> &K {
        &self.credential
    }

    /// Replace the request builder, keeping context and credential.
    pub fn with_builder(mut self, builder: impl SignRequest<Credential = K>) -> Self {
        self.builder = Arc::new(builder);
        self
    }

    /// Signing request.
    pub fn sign(
        &self,
        req: &mut http::request::Parts,
        resource: &CanonicalizedResource,
    ) -> Result<()> {
        self.builder
            .sign_request(&self.ctx, req, &self.credential, resource)
    }
}
