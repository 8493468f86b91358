use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

// Liveness only says the process is serving requests. Dependency checks
// belong to readyz.
pub async fn handler() -> Response {
    let msg = serde_json::json!({"status": "ok"});
    (StatusCode::OK, Json(msg)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_handler_direct() {
        let response = handler().await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
