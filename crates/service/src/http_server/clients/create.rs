use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::header::EXPIRES;
use http::StatusCode;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use common::prelude::{ClientMetadata, MetadataError, RegistryError};

use crate::http_server::client::ApiRequest;
use crate::http_server::clients::http_date;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// The metadata document exactly as it will be submitted.
    pub document: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    /// Fully qualified client id URL for the registered document.
    pub client_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

pub async fn handler(
    State(state): State<ServiceState>,
    body: String,
) -> Result<Response, CreateError> {
    let document: ClientMetadata =
        serde_json::from_str(&body).map_err(CreateError::MalformedDocument)?;
    document.validate()?;
    let document = document.normalized();

    let (record, is_new) = state.registry().create(&document).await?;
    let expires_at = state.registry().expires_at(&record);

    let status = if is_new {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        [(EXPIRES, http_date(expires_at)?)],
        Json(CreateResponse {
            client_id: state.client_id_url(&record.id).to_string(),
            expires_at,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("request body was not a json document: {0}")]
    MalformedDocument(serde_json::Error),
    #[error("document failed validation: {0}")]
    InvalidDocument(#[from] MetadataError),
    #[error("failed to register document: {0}")]
    Registry(#[from] RegistryError<sqlx::Error>),
    #[error("failed to render the expiry header: {0}")]
    ExpiresHeader(#[from] time::error::Format),
}

impl IntoResponse for CreateError {
    fn into_response(self) -> Response {
        match self {
            CreateError::MalformedDocument(e) => {
                tracing::debug!("rejected unparseable client metadata: {e}");
                let msg = serde_json::json!({
                    "error": "invalid_client_metadata",
                    "message": e.to_string(),
                });
                (StatusCode::BAD_REQUEST, Json(msg)).into_response()
            }
            CreateError::InvalidDocument(e) => {
                tracing::debug!("rejected invalid client metadata: {e}");
                let msg = serde_json::json!({
                    "error": "invalid_client_metadata",
                    "message": e.to_string(),
                });
                (StatusCode::BAD_REQUEST, Json(msg)).into_response()
            }
            CreateError::Registry(e) => {
                tracing::error!("client registration failed: {e}");
                let msg = serde_json::json!({"error": "internal_server_error"});
                (StatusCode::INTERNAL_SERVER_ERROR, Json(msg)).into_response()
            }
            CreateError::ExpiresHeader(e) => {
                tracing::error!("failed to render expiry header: {e}");
                let msg = serde_json::json!({"error": "internal_server_error"});
                (StatusCode::INTERNAL_SERVER_ERROR, Json(msg)).into_response()
            }
        }
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for SubmitRequest {
    type Response = CreateResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/clients").unwrap();
        client.post(full_url).json(&self.document)
    }
}
