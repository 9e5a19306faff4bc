use reqoss_core::{Context, OsEnv};
use reqoss_http_send_reqwest::ReqwestHttpSend;

/// Context with a default `reqwest` client and the process environment.
pub fn default_context() -> Context {
    Context::new()
        .with_http_send(ReqwestHttpSend::new(reqwest::Client::new()))
        .with_env(OsEnv)
}
