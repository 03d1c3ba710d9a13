//! Webhook endpoint.
//!
//! Deliveries are authenticated against the raw body before anything is
//! parsed. Authenticated deliveries are decoded and applied synchronously;
//! a `200 OK` means local state now reflects the event. Outbound
//! notifications keep running after the response is sent.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, error, warn};

use super::AppState;
use crate::sync::{
    domain::{PayloadError, WebhookEvent},
    services::SyncError,
    signature::{SignatureError, verify_signature},
};

/// Header carrying the event type.
pub const HEADER_EVENT: &str = "x-github-event";
/// Header carrying the body signature.
pub const HEADER_SIGNATURE: &str = "x-hub-signature-256";

/// Failures surfaced to the sender.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The delivery failed authentication.
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] SignatureError),

    /// The event type header is absent.
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    /// The body could not be decoded.
    #[error("bad request: {0}")]
    BadRequest(#[from] PayloadError),

    /// Local state could not be updated; the sender should retry.
    #[error("synchronization failed: {0}")]
    Sync(#[from] SyncError),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::MissingHeader(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Sync(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

/// Handles `POST /webhook/github`.
///
/// # Response
///
/// - 200 OK: the event was applied or deliberately ignored
/// - 400 Bad Request: missing event header or undecodable body
/// - 401 Unauthorized: missing or wrong signature
/// - 500 Internal Server Error: a store failed
///
/// # Errors
///
/// Returns [`WebhookError`], rendered with the status above.
pub async fn webhook_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str), WebhookError> {
    if let Err(err) = verify_signature(
        &body,
        header_value(&headers, HEADER_SIGNATURE),
        app_state.secret(),
    ) {
        warn!(error = %err, "rejected webhook delivery");
        return Err(err.into());
    }

    let event_type = header_value(&headers, HEADER_EVENT)
        .ok_or(WebhookError::MissingHeader(HEADER_EVENT))?;
    let event = WebhookEvent::parse(event_type, &body).inspect_err(|err| {
        debug!(event_type, error = %err, "undecodable webhook body");
    })?;

    let dispatched = app_state
        .dispatcher()
        .dispatch(&event)
        .await
        .inspect_err(|err| error!(event_type, error = %err, "webhook processing failed"))?;
    if !dispatched.notifications.is_empty() {
        debug!(
            event_type,
            pending = dispatched.notifications.len(),
            "outbound notifications detached"
        );
    }
    Ok((StatusCode::OK, "OK"))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
