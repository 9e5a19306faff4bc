use bytes::Bytes;
use reqoss_core::{Context, Result};
use reqoss_http_send_reqwest::ReqwestHttpSend;
use reqwest::Client;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // Timeouts belong to the transport: reqoss itself never cancels a request.
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .user_agent("reqoss-example/0.1")
        .build()
        .map_err(|e| reqoss_core::Error::config_invalid("invalid reqwest client").with_source(e))?;

    let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));

    let test_url = "https://oss-cn-hangzhou.aliyuncs.com/";
    println!("GET {test_url}");

    let req = http::Request::builder()
        .method("GET")
        .uri(test_url)
        .body(Bytes::new())?;

    let resp = ctx.http_send_as_string(req).await?;
    println!("Response status: {}", resp.status());
    for (name, value) in resp.headers() {
        println!("  {name}: {value:?}");
    }
    println!("{}", resp.body());

    Ok(())
}
