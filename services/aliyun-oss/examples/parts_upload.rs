use anyhow::Result;
use reqoss_aliyun_oss::{Client, PartsUpload};
use reqoss_core::{Context, OsEnv};
use reqoss_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let _ = dotenv::dotenv();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./demofile.txt".to_string());

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let client = Client::from_env(ctx).await?;

    let mut upload = PartsUpload::new("reqoss-demo/parts.bin")
        .file_path(&path)
        .part_size(200 * 1024);

    if let Err(err) = upload.upload(&client).await {
        // The session stays on the service until aborted.
        if !upload.upload_id().is_empty() {
            upload.abort(&client).await?;
        }
        return Err(err.into());
    }

    println!("uploaded {path} in {} parts", upload.parts().len());
    Ok(())
}
