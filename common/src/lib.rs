pub mod config;
pub mod yaml_include;

/// Common utilities shared across the bakery client workspace
///
/// This crate provides shared functionality used by both the `transport`
/// and `bakery` crates, including:
///
/// - Configuration loading and environment profiles
/// - YAML `!include` merging used by the build script
/// - Shared test errors, assertion macros and unique id generation

// Test helpers module - available for both development and test builds
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// Re-export commonly used test utilities for easier access
#[cfg(any(test, feature = "test-helpers"))]
pub use test_helpers::{TestError, TestResult, generate_unique_id};
