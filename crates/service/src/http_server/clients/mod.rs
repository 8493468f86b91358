mod create;
mod resolve;

pub use create::{CreateResponse, SubmitRequest};
pub use resolve::{ResolveRequest, ResolveResponse};

use std::sync::OnceLock;

use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;
use time::format_description::OwnedFormatItem;
use time::OffsetDateTime;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", post(create::handler).get(index_handler))
        .route("/:client_id", get(resolve::handler))
        .with_state(state)
}

// There is nothing to list at the collection root, the home page explains
// the API.
async fn index_handler() -> Redirect {
    Redirect::to("/")
}

static HTTP_DATE_FORMAT: OnceLock<OwnedFormatItem> = OnceLock::new();

/// IMF-fixdate rendering for the Expires header.
pub(crate) fn http_date(instant: OffsetDateTime) -> Result<String, time::error::Format> {
    let format = HTTP_DATE_FORMAT.get_or_init(|| {
        time::format_description::parse_owned::<2>(
            "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT",
        )
        .expect("static format description parses")
    });
    instant.to_offset(time::UtcOffset::UTC).format(format)
}
