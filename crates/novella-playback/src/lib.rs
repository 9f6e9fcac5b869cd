//! Novella: narrative playback engine.
//!
//! Responsible for walking scene lines, presenting choices, applying choice
//! side effects to event flags, and resolving scene transitions.

pub mod application;
pub mod domain;
