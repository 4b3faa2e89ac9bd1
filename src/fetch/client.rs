use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes prepared requests. Loaders depend on this rather than on
/// `reqwest::Client` directly.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
