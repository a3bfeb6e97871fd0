//! Headless core of the bakery storefront and admin dashboard.
//!
//! Views (web or terminal) sit on top of this crate: they call store and
//! table-controller actions in response to user input and render the state
//! those actions leave behind.

/// Storefront rails and category menu
pub mod catalog;
/// Unified error type and result alias
pub mod errors;
/// Config loading, tracing setup and wiring for the admin binary
pub mod executable_utils;
/// Form schemas, validation and submit flow
pub mod forms;
/// Client-side projections of server entities
pub mod model;
/// Order number generation
pub mod order_number;
/// Route table and protected-route gate
pub mod routes;
/// Per-resource REST services
pub mod services;
/// Slug derivation
pub mod slug;
/// Per-resource list/filter state
pub mod stores;
/// Table view controllers: sorting, debounced search, selection, CSV export
pub mod views;

pub use errors::{Error, Result};
