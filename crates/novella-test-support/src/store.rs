//! Test stores: mock `StoryStore` and `EventFlagStore` implementations.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use novella_core::error::DomainError;
use novella_core::ids::{CharacterId, ChoiceGroupId, EventId, SceneId, SpriteId};
use novella_core::model::{Character, ChoiceOption, Line, Scene, Sprite, TransitionRule};
use novella_core::store::{EventFlagStore, StoryStore};

fn connection_refused() -> DomainError {
    DomainError::Infrastructure("connection refused".into())
}

/// A flag store that keeps flags in memory and records every write, in
/// order. Useful for asserting that rejected operations wrote nothing.
#[derive(Debug, Default)]
pub struct RecordingFlagStore {
    flags: Mutex<HashMap<EventId, bool>>,
    writes: Mutex<Vec<(EventId, bool)>>,
}

impl RecordingFlagStore {
    /// Creates a recording store with every flag false.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every `set_event_flag` call.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn writes(&self) -> Vec<(EventId, bool)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventFlagStore for RecordingFlagStore {
    async fn get_event_flag(&self, event_id: EventId) -> Result<bool, DomainError> {
        Ok(self
            .flags
            .lock()
            .unwrap()
            .get(&event_id)
            .copied()
            .unwrap_or(false))
    }

    async fn set_event_flag(&self, event_id: EventId, value: bool) -> Result<(), DomainError> {
        self.writes.lock().unwrap().push((event_id, value));
        self.flags.lock().unwrap().insert(event_id, value);
        Ok(())
    }
}

/// A flag store that always returns an infrastructure error.
#[derive(Debug)]
pub struct FailingFlagStore;

#[async_trait]
impl EventFlagStore for FailingFlagStore {
    async fn get_event_flag(&self, _event_id: EventId) -> Result<bool, DomainError> {
        Err(connection_refused())
    }

    async fn set_event_flag(&self, _event_id: EventId, _value: bool) -> Result<(), DomainError> {
        Err(connection_refused())
    }
}

/// A story store that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingStoryStore;

#[async_trait]
impl StoryStore for FailingStoryStore {
    async fn get_scene_by_id(&self, _scene_id: SceneId) -> Result<Option<Scene>, DomainError> {
        Err(connection_refused())
    }

    async fn get_lines_for_scene(&self, _scene_id: SceneId) -> Result<Vec<Line>, DomainError> {
        Err(connection_refused())
    }

    async fn get_transition_rules(
        &self,
        _from_scene_id: SceneId,
    ) -> Result<Vec<TransitionRule>, DomainError> {
        Err(connection_refused())
    }

    async fn get_choice_options(
        &self,
        _group_id: ChoiceGroupId,
    ) -> Result<Vec<ChoiceOption>, DomainError> {
        Err(connection_refused())
    }

    async fn get_character_by_id(
        &self,
        _character_id: CharacterId,
    ) -> Result<Option<Character>, DomainError> {
        Err(connection_refused())
    }

    async fn get_sprite_by_id(&self, _sprite_id: SpriteId) -> Result<Option<Sprite>, DomainError> {
        Err(connection_refused())
    }
}
