//! Aliyun OSS client with convenience constructors.

pub use reqoss_aliyun_oss::*;

#[cfg(feature = "default-context")]
use crate::{default_context, Result};

/// Create a client from the process environment.
///
/// This uses:
/// - [`default_context`]: reqwest transport and process environment
/// - [`Config::from_env`]: bucket, endpoint and custom domain
/// - [`DefaultCredentialProvider`]: keys from config, then env
///
/// # Example
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> reqoss::Result<()> {
/// let client = reqoss::aliyun::default_client().await?;
/// for bucket in client.list_buckets(None).await? {
///     println!("{}", bucket.name());
/// }
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub async fn default_client() -> Result<Client> {
    let ctx = default_context();
    let config = Config::default().from_env(&ctx);
    Client::new(ctx, config).await
}
