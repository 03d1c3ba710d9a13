//! Tracksync: two-way synchronization between hosting-service webhooks and
//! internal project tasks.
//!
//! Authenticated deliveries for issues, pull requests, pushes and app
//! installations are decoded, matched against stored integrations and
//! links, and applied to internal tasks. Commit messages such as
//! `close!12` move task 12 into the project's done lane, and affected
//! tasks are pushed back to their linked issues and pull requests.
//!
//! # Architecture
//!
//! Tracksync follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, APIs, etc.)
//!
//! # Modules
//!
//! - [`task`]: Internal task records, project lanes and membership
//! - [`sync`]: Webhook verification, decoding and synchronization handlers
//! - [`server`]: HTTP endpoints
//! - [`config`]: Environment configuration
//! - [`telemetry`]: Tracing setup

pub mod config;
pub mod server;
pub mod sync;
pub mod task;
pub mod telemetry;
