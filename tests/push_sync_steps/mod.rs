//! Step definitions for push synchronization scenarios.

mod given;
mod then;
mod when;
pub mod world;
