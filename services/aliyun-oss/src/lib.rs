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

//! Aliyun OSS client for reqoss.
//!
//! This crate signs requests with the OSS header signature and wraps the
//! handful of OSS APIs most applications need: bucket and object listing,
//! simple object operations, multipart upload and streamed download.
//!
//! ## Quick Start
//!
//! ```no_run
//! use reqoss_aliyun_oss::{Client, Config, PutObject};
//! use reqoss_core::{Context, OsEnv, Result};
//! use reqoss_http_send_reqwest::ReqwestHttpSend;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     let config = Config {
//!         bucket: Some("my-bucket".to_string()),
//!         endpoint: Some("cn-hangzhou".to_string()),
//!         ..Default::default()
//!     }
//!     .from_env(&ctx);
//!
//!     let client = Client::new(ctx, config).await?;
//!     client
//!         .put_object(PutObject::new("hello.txt").content("Hello, OSS!"))
//!         .await?;
//!
//!     let objects = client.list_objects(client.bucket()).await?;
//!     for object in &objects.list {
//!         println!("{}", object.path());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Credential Sources
//!
//! [`DefaultCredentialProvider`] tries, in order, the keys set in [`Config`]
//! and the environment:
//!
//! ```bash
//! export ALIYUN_KEY_ID=your-access-key-id
//! export ALIYUN_KEY_SECRET=your-access-key-secret
//! export ALIYUN_BUCKET=your-bucket
//! export ALIYUN_ENDPOINT=cn-hangzhou
//! ```
//!
//! The credential is loaded once when the [`Client`] is built.
//!
//! ## Signing Only
//!
//! [`Client::authorization_header`] returns the signed headers without
//! sending anything, for callers that bring their own transport.

mod constants;
pub use constants::{DEFAULT_PART_SIZE, MIN_PART_SIZE};

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;
pub use credential::Secret;

mod sign_request;
pub use sign_request::RequestSigner;

mod provide_credential;
pub use provide_credential::*;

mod scrape;

mod error;
pub use error::ProtocolError;
pub use error::ServiceError;

pub mod endpoint;
pub use endpoint::EndPoint;

mod query;
pub use query::*;

mod resource;
pub use resource::ResourceBuilder;

mod bucket;
pub use bucket::Bucket;

mod object;
pub use object::{CopyObject, Object, PutObject};

mod objects;
pub use objects::Objects;

mod client;
pub use client::Client;

mod multipart;
pub use multipart::*;

#[cfg(test)]
mod testing;
