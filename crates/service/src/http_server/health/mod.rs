mod data_source;
mod livez;
mod readyz;
mod versionz;

use axum::routing::get;
use axum::Router;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/livez", get(livez::handler))
        .route("/readyz", get(readyz::handler))
        .route("/versionz", get(versionz::handler))
        .with_state(state)
}
