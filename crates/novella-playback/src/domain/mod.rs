//! Playback domain: cursor, dispatcher, resolver, and the controller that
//! drives them.

pub mod commands;
pub mod controller;
pub mod cursor;
pub mod dispatcher;
pub mod events;
pub mod resolver;
pub mod view;
