use std::path::PathBuf;

use clap::Args;

use service::http_server::client::ApiError;
use service::http_server::clients::{CreateResponse, SubmitRequest};

#[derive(Args, Debug, Clone)]
pub struct Submit {
    /// Path to a JSON client metadata document
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("failed to read document: {0}")]
    Read(#[from] std::io::Error),
    #[error("document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Submit {
    type Error = SubmitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let raw = tokio::fs::read_to_string(&self.file).await?;
        let document: serde_json::Value = serde_json::from_str(&raw)?;

        let response: CreateResponse = ctx.client.call(SubmitRequest { document }).await?;

        Ok(format!(
            "Registered client: {}\nExpires at: {}",
            response.client_id, response.expires_at
        ))
    }
}
