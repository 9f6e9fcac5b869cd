//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

use crate::ids::{CharacterId, ChoiceGroupId, ChoiceOptionId, SceneId, SpriteId};

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A resolved scene id has no scene in the store.
    #[error("scene not found: {0}")]
    SceneNotFound(SceneId),

    /// A line's speaker has no character in the store.
    #[error("character not found: {0}")]
    CharacterNotFound(CharacterId),

    /// A line's sprite has no sprite in the store.
    #[error("sprite not found: {0}")]
    SpriteNotFound(SpriteId),

    /// The chosen option is not part of the presented choice group.
    #[error("option {option_id} is not a choice of group {group_id}")]
    InvalidChoice {
        /// The option that was chosen.
        option_id: ChoiceOptionId,
        /// The group currently presented.
        group_id: ChoiceGroupId,
    },

    /// Playback has reached the end of the story.
    #[error("playback has ended")]
    EngineEnded,

    /// Playback was driven before any scene was started.
    #[error("playback has not been started")]
    NotStarted,

    /// Linear advance was attempted while a choice is pending.
    #[error("choice group {0} is awaiting a choice")]
    ChoicePending(ChoiceGroupId),

    /// A choice was submitted while no choice is pending.
    #[error("no choice is pending")]
    NoPendingChoice,

    /// A branch point references a choice group with no options.
    #[error("choice group {0} has no options")]
    EmptyChoiceGroup(ChoiceGroupId),

    /// Scene skipping did not produce output within the hop limit.
    #[error("no displayable scene reached from scene {scene_id} within {limit} hops")]
    SceneHopLimitExceeded {
        /// The scene the traversal started from.
        scene_id: SceneId,
        /// The configured hop limit.
        limit: usize,
    },

    /// A playthrough was not found.
    #[error("playthrough not found: {0}")]
    PlaythroughNotFound(Uuid),

    /// A playthrough is already handling a request.
    #[error("playthrough {0} is busy")]
    PlaythroughBusy(Uuid),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
