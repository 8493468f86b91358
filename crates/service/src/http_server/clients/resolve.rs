use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::header::EXPIRES;
use http::StatusCode;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{ClientMetadata, RegistryError};

use crate::http_server::client::ApiRequest;
use crate::http_server::clients::http_date;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct ResolveRequest {
    /// Content id of the client to look up
    #[arg(long)]
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    /// Fully qualified client id URL, always equal to the URL this document
    /// is served under.
    pub client_id: String,
    pub client_uri: String,
    #[serde(flatten)]
    pub metadata: ClientMetadata,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(client_id): Path<String>,
) -> Result<Response, ResolveError> {
    let record = state.registry().resolve(&client_id).await?;
    let expires_at = state.registry().expires_at(&record);

    Ok((
        StatusCode::OK,
        [(EXPIRES, http_date(expires_at)?)],
        Json(ResolveResponse {
            client_id: state.client_id_url(&record.id).to_string(),
            client_uri: state.public_url().to_string(),
            metadata: record.document,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("failed to resolve client: {0}")]
    Registry(#[from] RegistryError<sqlx::Error>),
    #[error("failed to render the expiry header: {0}")]
    ExpiresHeader(#[from] time::error::Format),
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        match self {
            // Malformed and unknown ids are indistinguishable to callers,
            // both read as "no such client".
            ResolveError::Registry(RegistryError::InvalidIdentifier(_))
            | ResolveError::Registry(RegistryError::NotFound) => {
                let msg = serde_json::json!({"error": "invalid_client"});
                (StatusCode::NOT_FOUND, Json(msg)).into_response()
            }
            ResolveError::Registry(e) => {
                tracing::error!("client resolution failed: {e}");
                let msg = serde_json::json!({"error": "internal_server_error"});
                (StatusCode::INTERNAL_SERVER_ERROR, Json(msg)).into_response()
            }
            ResolveError::ExpiresHeader(e) => {
                tracing::error!("failed to render expiry header: {e}");
                let msg = serde_json::json!({"error": "internal_server_error"});
                (StatusCode::INTERNAL_SERVER_ERROR, Json(msg)).into_response()
            }
        }
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for ResolveRequest {
    type Response = ResolveResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join(&format!("/clients/{}", self.id)).unwrap();
        client.get(full_url)
    }
}
