use axum::extract::State;
use axum::response::{IntoResponse, Response};

use common::prelude::build_info;

use crate::ServiceState;

pub async fn handler(State(state): State<ServiceState>) -> Response {
    let info = build_info();
    let body = format!(
        "\
cimd-service @ {}

This is a Client ID Metadata Documents service. Send it your Client ID
Metadata Document and it will return a URL to a publicly available copy.

What are Client ID Metadata Documents? See: https://cimd.dev

Endpoints:

  GET  /_status/livez
  GET  /_status/readyz
  GET  /clients/:id
  POST /clients with your Client ID Metadata Document as the JSON body

This instance mints client ids under: {}
",
        info.version,
        state.public_url(),
    );

    body.into_response()
}
