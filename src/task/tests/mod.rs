//! Unit tests for the task module.

mod memory_tests;
