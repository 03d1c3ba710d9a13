//! HTTP boundary of the synchronization engine.
//!
//! # Endpoints
//!
//! - `POST /webhook/github` - authenticated webhook deliveries
//! - `GET /health` - liveness probe

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use mockable::DefaultClock;

use crate::sync::{services::WebhookDispatcher, signature::WebhookSecret};

pub mod health;
pub mod webhook;

pub use health::health_handler;
pub use webhook::{WebhookError, webhook_handler};

/// Route accepting webhook deliveries.
pub const WEBHOOK_PATH: &str = "/webhook/github";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    dispatcher: WebhookDispatcher<DefaultClock>,
    secret: WebhookSecret,
}

impl AppState {
    /// Bundles the dispatcher with the secret deliveries are signed with.
    #[must_use]
    pub fn new(dispatcher: WebhookDispatcher<DefaultClock>, secret: WebhookSecret) -> Self {
        Self {
            inner: Arc::new(AppStateInner { dispatcher, secret }),
        }
    }

    /// Returns the event dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &WebhookDispatcher<DefaultClock> {
        &self.inner.dispatcher
    }

    /// Returns the webhook secret.
    #[must_use]
    pub fn secret(&self) -> &WebhookSecret {
        &self.inner.secret
    }
}

/// Builds the router with every endpoint.
#[must_use]
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(webhook_handler))
        .route("/health", get(health_handler))
        .with_state(app_state)
}
