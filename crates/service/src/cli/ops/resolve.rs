use service::http_server::client::ApiError;
use service::http_server::clients::{ResolveRequest, ResolveResponse};

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Resolve operation failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for ResolveRequest {
    type Error = ResolveError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        // Accept either a bare content id or a full client id URL.
        let id = self
            .id
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(&self.id)
            .to_string();

        let response: ResolveResponse = ctx.client.call(ResolveRequest { id }).await?;

        serde_json::to_string_pretty(&response).map_err(|e| ResolveError::Failed(e.to_string()))
    }
}
