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
use crate::scrape::{extract, extract_all};
use crate::{
    resource, Bucket, Config, CopyObject, Credential, DefaultCredentialProvider, EndPoint,
    Object, Objects, PutObject, RequestSigner, ServiceError,
};
use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use reqoss_core::{
    CanonicalizedResource, Context, Error, HttpBody, ProvideCredential, Result, Signer,
};
use std::path::Path;
use std::sync::Arc;

/// Client signs and sends requests to Aliyun OSS.
///
/// Object operations target the default bucket the client was built with.
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    signer: Signer<Credential>,
    bucket: Bucket,
}

impl Client {
    /// Build a client from `config`, loading the credential through
    /// [`DefaultCredentialProvider`].
    ///
    /// A missing endpoint falls back to `cn-qingdao`.
    pub async fn new(ctx: Context, config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let provider = DefaultCredentialProvider::new(config.clone());
        Self::with_credential_provider(ctx, &config, provider).await
    }

    /// Build a client from the env values of `ctx`.
    pub async fn from_env(ctx: Context) -> Result<Self> {
        let config = Config::default().from_env(&ctx);
        Self::new(ctx, config).await
    }

    /// Build a client whose credential comes from `provider`.
    ///
    /// Credential fields of `config` are ignored.
    pub async fn with_credential_provider(
        ctx: Context,
        config: &Config,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Result<Self> {
        let endpoint = match config.endpoint.as_deref() {
            Some(v) => EndPoint::new(v)?,
            None => EndPoint::default(),
        };
        let mut bucket = Bucket::new(config.bucket.as_deref().unwrap_or_default(), endpoint)?;
        if let Some(domain) = config.domain.as_deref() {
            bucket = bucket.with_domain(domain)?;
        }

        let signer = Signer::load(ctx.clone(), provider, RequestSigner::new()).await?;
        Ok(Self {
            ctx,
            signer,
            bucket,
        })
    }

    /// Replace the request signer, mainly to pin the signing time in tests.
    pub fn with_request_signer(mut self, signer: RequestSigner) -> Self {
        self.signer = self.signer.with_builder(signer);
        self
    }

    /// Default bucket of this client.
    pub fn bucket(&self) -> &Bucket {
        &self.bucket
    }

    /// Serve the default bucket from a custom domain.
    pub fn set_bucket_domain(&mut self, domain: &str) -> Result<()> {
        self.bucket = self.bucket.clone().with_domain(domain)?;
        Ok(())
    }

    /// Signing headers for a request without caller supplied headers.
    pub fn authorization(
        &self,
        method: Method,
        resource: &CanonicalizedResource,
    ) -> Result<HeaderMap> {
        self.authorization_header(method, resource, HeaderMap::new())
    }

    /// Merge the signing headers into `headers`.
    ///
    /// `Content-Type` and `x-oss-*` entries of `headers` are signed.
    pub fn authorization_header(
        &self,
        method: Method,
        resource: &CanonicalizedResource,
        headers: HeaderMap,
    ) -> Result<HeaderMap> {
        let (mut parts, _) = http::Request::builder()
            .method(method)
            .body(())?
            .into_parts();
        parts.headers = headers;
        self.signer.sign(&mut parts, resource)?;
        Ok(parts.headers)
    }

    /// Build a signed request.
    ///
    /// Requests other than `GET` always carry `Content-Length`, `0` included.
    pub(crate) fn request(
        &self,
        method: Method,
        url: &str,
        resource: &CanonicalizedResource,
        mut headers: HeaderMap,
        body: Bytes,
    ) -> Result<http::Request<Bytes>> {
        if method != Method::GET {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
        }

        let mut req = http::Request::builder()
            .method(method.clone())
            .uri(url)
            .body(body)?;
        *req.headers_mut() = self.authorization_header(method, resource, headers)?;
        Ok(req)
    }

    /// Send a request and return the response whatever its status.
    pub(crate) async fn execute(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let (method, uri) = (req.method().clone(), req.uri().clone());
        let resp = self.ctx.http_send(req).await?;
        log::debug!("{method} {uri} returned {}", resp.status());
        Ok(resp)
    }

    /// Send a request, turning a non-success status into a [`ServiceError`].
    pub(crate) async fn send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let resp = self.execute(req).await?;
        if resp.status().is_success() {
            return Ok(resp);
        }

        let body = String::from_utf8_lossy(resp.body());
        Err(ServiceError::parse(resp.status(), &body).into())
    }

    /// Send a request and stream the response body.
    pub(crate) async fn send_stream(
        &self,
        req: http::Request<Bytes>,
    ) -> Result<http::Response<HttpBody>> {
        let (method, uri) = (req.method().clone(), req.uri().clone());
        let resp = self.ctx.http_send_stream(req).await?;
        log::debug!("{method} {uri} returned {}", resp.status());
        Ok(resp)
    }

    /// List buckets of the account in `endpoint`, or in the endpoint of the
    /// default bucket.
    pub async fn list_buckets(&self, endpoint: Option<&EndPoint>) -> Result<Vec<Bucket>> {
        let endpoint = endpoint.unwrap_or_else(|| self.bucket.endpoint());
        let req = self.request(
            Method::GET,
            &format!("{}/", endpoint.url()),
            &CanonicalizedResource::default(),
            HeaderMap::new(),
            Bytes::new(),
        )?;
        let resp = self.send(req).await?;

        let body = String::from_utf8(resp.into_body().to_vec())?;
        extract_all(&body, TAG_NAME)
            .iter()
            .map(|name| Bucket::new(name, endpoint.clone()))
            .collect()
    }

    /// List one page of objects in `bucket`, using the bucket's filters.
    pub async fn list_objects(&self, bucket: &Bucket) -> Result<Objects> {
        let query = bucket.object_query();
        let req = self.request(
            Method::GET,
            &format!("{}/?{}", bucket.url(), query.to_oss_query()),
            &resource::listing(bucket.name(), query.next_token()),
            HeaderMap::new(),
            Bytes::new(),
        )?;
        let resp = self.send(req).await?;

        let body = String::from_utf8(resp.into_body().to_vec())?;
        Ok(Objects {
            list: extract_all(&body, TAG_KEY)
                .into_iter()
                .map(Object::new)
                .collect(),
            next_token: extract(&body, TAG_NEXT_CONTINUATION_TOKEN),
            bucket: bucket.clone(),
        })
    }

    /// Upload an object in a single request.
    pub async fn put_object(&self, put: PutObject) -> Result<()> {
        let mut headers = HeaderMap::new();
        if let Some(content_type) = &put.content_type {
            headers.insert(CONTENT_TYPE, content_type.parse()?);
        }

        let req = self.request(
            Method::PUT,
            &put.object.url(&self.bucket),
            &put.object.resource(&self.bucket),
            headers,
            put.content,
        )?;
        self.send(req).await?;
        Ok(())
    }

    /// Upload the content of a local file in a single request.
    pub async fn put_object_from_file(
        &self,
        object: impl Into<Object>,
        path: impl AsRef<Path>,
        content_type: &str,
    ) -> Result<()> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await.map_err(|e| {
            Error::local_io(format!("failed to read {}", path.display())).with_source(e)
        })?;

        self.put_object(
            PutObject::new(object)
                .content(content)
                .content_type(content_type),
        )
        .await
    }

    /// Download the whole object into memory.
    pub async fn get_object(&self, object: &Object) -> Result<Bytes> {
        let req = self.request(
            Method::GET,
            &object.url(&self.bucket),
            &object.resource(&self.bucket),
            HeaderMap::new(),
            Bytes::new(),
        )?;
        Ok(self.send(req).await?.into_body())
    }

    /// Copy an object on the server side.
    pub async fn copy_object(&self, copy: CopyObject) -> Result<()> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(X_OSS_COPY_SOURCE),
            copy.source.parse()?,
        );
        if let Some(content_type) = &copy.content_type {
            headers.insert(CONTENT_TYPE, content_type.parse()?);
        }

        let req = self.request(
            Method::PUT,
            &copy.dest.url(&self.bucket),
            &copy.dest.resource(&self.bucket),
            headers,
            Bytes::new(),
        )?;
        self.send(req).await?;
        Ok(())
    }

    /// Delete an object.
    pub async fn delete_object(&self, object: &Object) -> Result<()> {
        let req = self.request(
            Method::DELETE,
            &object.url(&self.bucket),
            &object.resource(&self.bucket),
            HeaderMap::new(),
            Bytes::new(),
        )?;
        self.send(req).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{client, MockHttpSend};
    use crate::ProtocolError;
    use crate::{StaticCredentialProvider, QUERY_MAX_KEYS, QUERY_PREFIX};
    use http::header::{AUTHORIZATION, DATE};
    use http::StatusCode;
    use pretty_assertions::assert_eq;
    use reqoss_core::ErrorKind;

    const NO_SUCH_KEY: &str = "<Error><Code>NoSuchKey</Code>\
        <Message>The specified key does not exist.</Message>\
        <RequestId>req-1</RequestId></Error>";

    #[tokio::test]
    async fn test_new_without_credential() {
        let config = Config {
            bucket: Some("bkt".to_string()),
            ..Default::default()
        };
        let err = Client::new(Context::new(), config)
            .await
            .expect_err("client without credential must fail");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[tokio::test]
    async fn test_new_rejects_bad_config() {
        let provider = StaticCredentialProvider::new("ak", "sk");
        let config = Config {
            bucket: Some("bkt".to_string()),
            endpoint: Some("oss-cn-hangzhou".to_string()),
            ..Default::default()
        };
        let err = Client::with_credential_provider(Context::new(), &config, provider.clone())
            .await
            .expect_err("bad endpoint must fail");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

        let err = Client::with_credential_provider(Context::new(), &Config::default(), provider)
            .await
            .expect_err("missing bucket must fail");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[tokio::test]
    async fn test_default_endpoint() -> Result<()> {
        let config = Config {
            bucket: Some("bkt".to_string()),
            ..Default::default()
        };
        let client = Client::with_credential_provider(
            Context::new(),
            &config,
            StaticCredentialProvider::new("ak", "sk"),
        )
        .await?;
        assert_eq!(
            client.bucket().url(),
            "https://bkt.oss-cn-qingdao.aliyuncs.com"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_authorization_headers() -> Result<()> {
        let client = client(&MockHttpSend::default()).await;

        let headers = client.authorization(Method::GET, &CanonicalizedResource::default())?;
        assert_eq!(headers["accesskeyid"], "access_key_id");
        assert_eq!(headers["verb"], "GET");
        assert_eq!(headers[DATE], "Tue, 01 Mar 2022 08:12:34 GMT");
        assert_eq!(headers["canonicalizedresource"], "/");

        let expected = Credential::new("access_key_id", "access_key_secret")
            .secret
            .encryption("GET\n\n\nTue, 01 Mar 2022 08:12:34 GMT\n/");
        assert_eq!(
            headers[AUTHORIZATION],
            format!("OSS access_key_id:{expected}").as_str()
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_list_buckets() -> Result<()> {
        let mock = MockHttpSend::default();
        mock.respond(
            StatusCode::OK,
            &[],
            "<ListAllMyBucketsResult><Buckets>\
             <Bucket><Name>bkt1</Name></Bucket>\
             <Bucket><Name>bkt2</Name></Bucket>\
             </Buckets></ListAllMyBucketsResult>",
        );
        let client = client(&mock).await;

        let shanghai = EndPoint::new("cn-shanghai")?;
        let buckets = client.list_buckets(Some(&shanghai)).await?;
        let names: Vec<_> = buckets.iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["bkt1", "bkt2"]);
        assert_eq!(buckets[0].endpoint(), &shanghai);

        let requests = mock.requests();
        assert_eq!(requests[0].uri, "https://oss-cn-shanghai.aliyuncs.com/");
        assert_eq!(requests[0].header("canonicalizedresource"), "/");
        Ok(())
    }

    #[tokio::test]
    async fn test_list_objects_and_next_list() -> Result<()> {
        let mock = MockHttpSend::default();
        mock.respond(
            StatusCode::OK,
            &[],
            "<ListBucketResult>\
             <Contents><Key>a.txt</Key></Contents>\
             <Contents><Key>b.txt</Key></Contents>\
             <NextContinuationToken>tok123</NextContinuationToken>\
             </ListBucketResult>",
        )
        .respond(
            StatusCode::OK,
            &[],
            "<ListBucketResult><Contents><Key>c.txt</Key></Contents></ListBucketResult>",
        );
        let client = client(&mock).await;

        let bucket = client
            .bucket()
            .clone()
            .with_query([(QUERY_PREFIX, "a"), (QUERY_MAX_KEYS, "2")]);
        let first = client.list_objects(&bucket).await?;
        assert_eq!(first.list, vec![Object::new("a.txt"), Object::new("b.txt")]);
        assert_eq!(first.next_token, "tok123");

        let second = first.next_list(&client).await?;
        assert_eq!(second.list, vec![Object::new("c.txt")]);
        assert!(!second.has_next());

        let err = second
            .next_list(&client)
            .await
            .expect_err("last page has no successor");
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert_eq!(
            err.downcast_source::<ProtocolError>(),
            Some(&ProtocolError::NoMoreObjects)
        );

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[0].uri,
            "https://bkt.oss-cn-hangzhou.aliyuncs.com/?list-type=2&max-keys=2&prefix=a"
        );
        assert_eq!(requests[0].header("canonicalizedresource"), "/bkt/");
        assert_eq!(
            requests[1].uri,
            "https://bkt.oss-cn-hangzhou.aliyuncs.com/\
             ?list-type=2&continuation-token=tok123&max-keys=2&prefix=a"
        );
        assert_eq!(
            requests[1].header("canonicalizedresource"),
            "/bkt/?continuation-token=tok123"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_put_object() -> Result<()> {
        let mock = MockHttpSend::default();
        mock.respond(StatusCode::OK, &[], "")
            .respond(StatusCode::OK, &[], "");
        let client = client(&mock).await;

        client
            .put_object(
                PutObject::new("dir/hello.txt")
                    .content("hello")
                    .content_type("text/plain"),
            )
            .await?;
        client.put_object(PutObject::new("empty.txt")).await?;

        let requests = mock.requests();
        assert_eq!(requests[0].method, Method::PUT);
        assert_eq!(
            requests[0].uri,
            "https://bkt.oss-cn-hangzhou.aliyuncs.com/dir/hello.txt"
        );
        assert_eq!(requests[0].header("content-type"), "text/plain");
        assert_eq!(requests[0].header("content-length"), "5");
        assert_eq!(
            requests[0].header("canonicalizedresource"),
            "/bkt/dir/hello.txt"
        );
        assert_eq!(requests[0].body, Bytes::from("hello"));

        assert_eq!(requests[1].header("content-length"), "0");
        Ok(())
    }

    #[tokio::test]
    async fn test_put_object_from_missing_file() {
        let mock = MockHttpSend::default();
        let client = client(&mock).await;

        let err = client
            .put_object_from_file("a.txt", "/definitely/not/here.txt", "text/plain")
            .await
            .expect_err("missing file must fail");
        assert_eq!(err.kind(), ErrorKind::LocalIo);
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_get_object() -> Result<()> {
        let mock = MockHttpSend::default();
        mock.respond(StatusCode::OK, &[], "content")
            .respond(StatusCode::NOT_FOUND, &[], NO_SUCH_KEY);
        let client = client(&mock).await;

        let content = client.get_object(&Object::new("a.txt")).await?;
        assert_eq!(content, Bytes::from("content"));

        let err = client
            .get_object(&Object::new("missing.txt"))
            .await
            .expect_err("missing object must fail");
        assert_eq!(err.kind(), ErrorKind::Service);
        let details = err.downcast_source::<ServiceError>().unwrap();
        assert_eq!(details.code, "NoSuchKey");
        assert_eq!(details.request_id, "req-1");
        assert_eq!(
            details.to_string(),
            "oss return: The specified key does not exist."
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_copy_object() -> Result<()> {
        let mock = MockHttpSend::default();
        mock.respond(StatusCode::OK, &[], "<CopyObjectResult/>");
        let client = client(&mock).await;

        client
            .copy_object(CopyObject::new("b.txt", "/bkt/a.txt"))
            .await?;

        let requests = mock.requests();
        assert_eq!(requests[0].method, Method::PUT);
        assert_eq!(requests[0].header("x-oss-copy-source"), "/bkt/a.txt");
        assert_eq!(requests[0].header("content-length"), "0");

        let expected = Credential::new("access_key_id", "access_key_secret")
            .secret
            .encryption(
                "PUT\n\n\nTue, 01 Mar 2022 08:12:34 GMT\n\
                 x-oss-copy-source:/bkt/a.txt\n/bkt/b.txt",
            );
        assert_eq!(
            requests[0].header("authorization"),
            format!("OSS access_key_id:{expected}")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_object() -> Result<()> {
        let mock = MockHttpSend::default();
        mock.respond(StatusCode::NO_CONTENT, &[], "");
        let client = client(&mock).await;

        client.delete_object(&Object::new("a.txt")).await?;

        let requests = mock.requests();
        assert_eq!(requests[0].method, Method::DELETE);
        assert_eq!(
            requests[0].uri,
            "https://bkt.oss-cn-hangzhou.aliyuncs.com/a.txt"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_transport_error_is_propagated() {
        let mock = MockHttpSend::default();
        let client = client(&mock).await;

        let err = client
            .delete_object(&Object::new("a.txt"))
            .await
            .expect_err("no canned response");
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
