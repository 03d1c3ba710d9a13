//! Webhook synchronization between hosting-service entities and tasks.
//!
//! Deliveries are authenticated by [`signature`], decoded into
//! [`domain::WebhookEvent`] values and routed by
//! [`services::WebhookDispatcher`] to the issue, pull request, push and
//! installation handlers. Links between external entities and tasks live in
//! the [`ports::LinkageRepository`].

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
pub mod signature;

#[cfg(test)]
mod tests;
