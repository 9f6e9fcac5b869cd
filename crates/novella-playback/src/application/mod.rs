//! Application layer: command and query handlers over playthroughs.

pub mod command_handlers;
pub mod query_handlers;
