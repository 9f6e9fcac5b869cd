//! Shared test doubles and story fixtures for the Novella engine.

pub mod fixtures;
mod store;

pub use store::{FailingFlagStore, FailingStoryStore, RecordingFlagStore};
