//! Unit tests for the sync module.

mod harness;
mod linking_tests;
