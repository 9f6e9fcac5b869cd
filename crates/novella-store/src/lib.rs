//! Novella Store: story store implementations.
//!
//! [`memory`] serves a [`book::StoryBook`] loaded from YAML, and
//! [`pg_story_store`] reads the same tables from PostgreSQL.

pub mod book;
pub mod memory;
pub mod pg_story_store;
pub mod schema;
