//! Story store abstractions.
//!
//! Story content is read through [`StoryStore`] and shared by every
//! playthrough. Event flags are the only mutable story state; each
//! playthrough gets its own [`EventFlagStore`] from a [`FlagStoreFactory`].

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;
use crate::ids::{CharacterId, ChoiceGroupId, EventId, SceneId, SpriteId};
use crate::model::{Character, ChoiceOption, Line, Scene, Sprite, TransitionRule};

/// Read-only queries over authored story content.
#[async_trait]
pub trait StoryStore: Send + Sync {
    /// Load a scene with its location.
    async fn get_scene_by_id(&self, scene_id: SceneId) -> Result<Option<Scene>, DomainError>;

    /// Load the lines of a scene, ordered by sequence.
    async fn get_lines_for_scene(&self, scene_id: SceneId) -> Result<Vec<Line>, DomainError>;

    /// Load every conditional transition rule leaving `from_scene_id`.
    async fn get_transition_rules(
        &self,
        from_scene_id: SceneId,
    ) -> Result<Vec<TransitionRule>, DomainError>;

    /// Load the options of a choice group, ordered by option id.
    async fn get_choice_options(
        &self,
        group_id: ChoiceGroupId,
    ) -> Result<Vec<ChoiceOption>, DomainError>;

    /// Load a character.
    async fn get_character_by_id(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<Character>, DomainError>;

    /// Load a sprite.
    async fn get_sprite_by_id(&self, sprite_id: SpriteId) -> Result<Option<Sprite>, DomainError>;
}

/// Event flag storage for one playthrough.
///
/// Implementations are the single source of truth for flag values; callers
/// must not cache reads across steps.
#[async_trait]
pub trait EventFlagStore: Send + Sync {
    /// Read a flag. Unknown flags read as `false`.
    async fn get_event_flag(&self, event_id: EventId) -> Result<bool, DomainError>;

    /// Write a flag. Writing the current value is a no-op.
    async fn set_event_flag(&self, event_id: EventId, value: bool) -> Result<(), DomainError>;
}

/// Creates the flag store of a new playthrough.
pub trait FlagStoreFactory: Send + Sync {
    /// Returns the flag store for `playthrough_id`.
    fn flags_for(&self, playthrough_id: Uuid) -> Arc<dyn EventFlagStore>;
}
