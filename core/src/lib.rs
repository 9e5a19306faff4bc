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

//! Core components for talking to object storage services.
//!
//! This crate provides the foundational types and traits for the reqoss ecosystem.
//! Service crates (for example `reqoss-aliyun-oss`) build on them.
//!
//! ## Overview
//!
//! - **Context**: A container that holds the HTTP transport and environment access
//! - **Traits**: Abstract interfaces for credential loading (`ProvideCredential`)
//!   and request signing (`SignRequest`)
//! - **Signer**: Binds a resolved credential to a request builder
//! - **CanonicalizedResource**: The opaque resource string a service signs
//!
//! ## Example
//!
//! ```
//! use reqoss_core::{CanonicalizedResource, Context, Result, SignRequest, Signer, SigningCredential};
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyBuilder;
//!
//! impl SignRequest for MyBuilder {
//!     type Credential = MyCredential;
//!
//!     fn sign_request(
//!         &self,
//!         _ctx: &Context,
//!         req: &mut http::request::Parts,
//!         cred: &Self::Credential,
//!         resource: &CanonicalizedResource,
//!     ) -> Result<()> {
//!         req.headers.insert("x-demo", format!("{}:{}", cred.key, resource).parse()?);
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let signer = Signer::new(Context::new(), MyCredential { key: "ak".into() }, MyBuilder);
//!
//! let mut parts = http::Request::get("https://example.com").body(()).unwrap().into_parts().0;
//! signer.sign(&mut parts, &CanonicalizedResource::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: HMAC and base64 helpers
//! - [`time`]: Time helpers
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod context;
pub use context::{Context, Env, HttpBody, HttpSend, NoopEnv, NoopHttpSend, OsEnv, StaticEnv};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod chain;
pub use chain::ProvideCredentialChain;
mod request;
pub use request::{CanonicalizedResource, SigningRequest};
mod signer;
pub use signer::Signer;
