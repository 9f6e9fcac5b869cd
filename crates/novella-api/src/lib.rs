//! Novella API library.
//!
//! Exposes the router, state, and error types so integration tests can
//! build the same application `main.rs` serves.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
