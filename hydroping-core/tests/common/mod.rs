//! Shared fixtures for lifecycle integration tests

pub mod harness;
