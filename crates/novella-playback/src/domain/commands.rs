//! Commands for playback.

use novella_core::ids::{ChoiceOptionId, SceneId};
use uuid::Uuid;

/// Command to begin a new playthrough at a scene.
#[derive(Debug, Clone)]
pub struct CreatePlaythrough {
    /// The scene to start from.
    pub scene_id: SceneId,
}

/// Command to restart an existing playthrough at a scene.
#[derive(Debug, Clone)]
pub struct StartPlayback {
    /// The playthrough to restart.
    pub playthrough_id: Uuid,
    /// The scene to start from.
    pub scene_id: SceneId,
}

/// Command to move past the line on screen.
#[derive(Debug, Clone)]
pub struct AdvancePlayback {
    /// The playthrough to advance.
    pub playthrough_id: Uuid,
}

/// Command to pick an option at the pending branch point.
#[derive(Debug, Clone)]
pub struct MakeChoice {
    /// The playthrough making the choice.
    pub playthrough_id: Uuid,
    /// The option picked.
    pub option_id: ChoiceOptionId,
}
