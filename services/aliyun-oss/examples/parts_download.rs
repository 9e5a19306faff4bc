use anyhow::Result;
use reqoss_aliyun_oss::{Client, PartsDownload};
use reqoss_core::{Context, OsEnv};
use reqoss_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let _ = dotenv::dotenv();

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let client = Client::from_env(ctx).await?;

    PartsDownload::new("reqoss-demo/parts.bin")
        .part_size(1024 * 1024)
        .file_path("./parts.bin")
        .download(&client)
        .await?;

    println!("downloaded into ./parts.bin");
    Ok(())
}
