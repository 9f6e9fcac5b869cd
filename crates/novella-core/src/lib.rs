//! Novella Core: shared story abstractions.
//!
//! This crate defines the story model, the store traits the playback engine
//! consumes, and the domain error type. It contains no infrastructure code.

pub mod error;
pub mod event;
pub mod ids;
pub mod model;
pub mod store;
