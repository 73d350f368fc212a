//! Provider notification endpoints

use axum::{
    Router,
    body::Bytes,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use calsync_provider_outlook::ChangeNotificationCollection;
use serde::Deserialize;

use crate::routes::AppError;
use crate::state::AppState;
use crate::sync::SyncOutcome;
use crate::sync::outlook::OutlookHandlerError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/webhook/google", post(google_notification))
        .route(
            "/webhook/outlook",
            get(outlook_validation).post(outlook_notification),
        )
}

/// Query string Graph sends while verifying a new subscription
#[derive(Deserialize)]
pub struct ValidationQuery {
    #[serde(rename = "validationToken")]
    pub validation_token: Option<String>,
}

/// POST /webhook/google - Sync the most recently updated Google event
///
/// The notification body carries nothing useful, so it is ignored.
async fn google_notification(State(state): State<AppState>) -> Result<&'static str, AppError> {
    let outcome = state.google.handle().await?;
    check_delivered(&outcome)?;
    Ok("OK")
}

/// GET /webhook/outlook - Subscription validation handshake
async fn outlook_validation(
    Query(query): Query<ValidationQuery>,
) -> Result<String, AppError> {
    query
        .validation_token
        .ok_or(AppError::BadRequest("Missing validationToken"))
}

/// POST /webhook/outlook - Sync the event named in a change notification
///
/// Graph also posts the validation handshake here, with the token in the
/// query string and an empty body.
async fn outlook_notification(
    State(state): State<AppState>,
    Query(query): Query<ValidationQuery>,
    body: Bytes,
) -> Result<Response, AppError> {
    if let Some(token) = query.validation_token {
        return Ok(token.into_response());
    }

    let notifications: ChangeNotificationCollection = serde_json::from_slice(&body)
        .map_err(|err| {
            tracing::warn!(error = %err, "unreadable Outlook notification body");
            AppError::BadRequest("No event data")
        })?;

    let outcome = match state.outlook.handle(&notifications).await {
        Ok(outcome) => outcome,
        Err(OutlookHandlerError::MissingEventData) => {
            return Err(AppError::BadRequest("No event data"));
        }
        Err(OutlookHandlerError::Fetch(err)) => return Err(AppError::Internal(err)),
    };
    check_delivered(&outcome)?;

    Ok("OK".into_response())
}

/// Every destination was attempted; report failure if any of them failed.
fn check_delivered(outcome: &SyncOutcome) -> Result<(), AppError> {
    match outcome {
        SyncOutcome::Dispatched(report) if report.has_failures() => {
            Err(AppError::Internal(anyhow::anyhow!(
                "{} of {} destinations failed",
                report.failure_count(),
                report.outcomes.len()
            )))
        }
        _ => Ok(()),
    }
}
