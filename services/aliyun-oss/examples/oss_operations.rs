use anyhow::Result;
use reqoss_aliyun_oss::{Client, CopyObject, EndPoint, Object, PutObject, QUERY_MAX_KEYS};
use reqoss_core::{Context, OsEnv};
use reqoss_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();
    let _ = dotenv::dotenv();

    // Reads ALIYUN_KEY_ID, ALIYUN_KEY_SECRET, ALIYUN_BUCKET and ALIYUN_ENDPOINT.
    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::new(reqwest::Client::new()))
        .with_env(OsEnv);
    let client = Client::from_env(ctx).await?;

    // Example 1: buckets in the configured endpoint, then in Shanghai
    println!("Example 1: List buckets");
    for bucket in client.list_buckets(None).await? {
        println!("  {}", bucket.name());
    }
    let shanghai = EndPoint::new("cn-shanghai")?;
    let count = client.list_buckets(Some(&shanghai)).await?.len();
    println!("  {count} buckets in {shanghai}");

    // Example 2: two pages of five objects
    println!("\nExample 2: List objects");
    let bucket = client.bucket().clone().with_query([(QUERY_MAX_KEYS, "5")]);
    let objects = client.list_objects(&bucket).await?;
    for object in &objects.list {
        println!("  {}", object.path());
    }
    if objects.has_next() {
        let second = objects.next_list(&client).await?;
        println!("  second page: {} objects", second.list.len());
    }

    // Example 3: upload, download, copy and delete
    println!("\nExample 3: Object operations");
    client
        .put_object(
            PutObject::new("reqoss-demo/hello.txt")
                .content("foo")
                .content_type("text/plain;charset=utf-8"),
        )
        .await?;
    let content = client
        .get_object(&Object::new("reqoss-demo/hello.txt"))
        .await?;
    println!("  content: {}", String::from_utf8_lossy(&content));

    let source = format!("/{}/reqoss-demo/hello.txt", client.bucket().name());
    client
        .copy_object(CopyObject::new("reqoss-demo/copied.txt", &source))
        .await?;

    client
        .delete_object(&Object::new("reqoss-demo/hello.txt"))
        .await?;
    client
        .delete_object(&Object::new("reqoss-demo/copied.txt"))
        .await?;
    println!("  done");

    Ok(())
}
