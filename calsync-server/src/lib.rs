//! calsync-server - relays newly created calendar events between providers.
//!
//! Google and Outlook push notifications arrive on `/webhook/*`. Each one
//! makes the server fetch the triggering event, skip it if it is a copy
//! calsync made itself, and otherwise copy it to every configured
//! destination calendar.

pub mod routes;
pub mod state;
pub mod sync;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the HTTP application.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::webhook::router())
        .merge(routes::health::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
