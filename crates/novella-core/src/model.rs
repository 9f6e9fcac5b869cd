//! Story records as the engine reads them.
//!
//! These are authored elsewhere and are read-only to playback, with the
//! exception of event flags which live behind
//! [`EventFlagStore`](crate::store::EventFlagStore).

use serde::{Deserialize, Serialize};

use crate::ids::{
    CharacterId, ChoiceGroupId, ChoiceOptionId, EventId, LineId, LocationId, SceneId, SpriteId,
};

/// Default speaker name color when none is authored.
pub const DEFAULT_TEXT_COLOR: &str = "FFFFFF";

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_owned()
}

/// A place a scene happens in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Location identifier.
    pub id: LocationId,
    /// Display name.
    pub name: String,
    /// Background asset reference.
    pub background_path: String,
}

/// A node of the narrative graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene identifier.
    pub id: SceneId,
    /// Authoring name.
    pub name: String,
    /// Where the scene takes place, if assigned.
    pub location: Option<Location>,
    /// Fallback target when no transition rule fires. `None` ends the story.
    pub default_next_scene_id: Option<SceneId>,
}

impl Scene {
    /// Returns the background asset of the scene's location, if any.
    #[must_use]
    pub fn background_path(&self) -> Option<&str> {
        self.location.as_ref().map(|l| l.background_path.as_str())
    }
}

/// One displayable unit of dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Line identifier.
    pub id: LineId,
    /// Owning scene.
    pub scene_id: SceneId,
    /// 1-based position within the scene.
    pub sequence: i32,
    /// Speaking character.
    pub speaker_id: CharacterId,
    /// Dialogue text.
    pub text: String,
    /// Expression shown while the line is displayed.
    #[serde(default)]
    pub sprite_id: Option<SpriteId>,
    /// Marks this line as a branch point.
    #[serde(default)]
    pub choice_group_id: Option<ChoiceGroupId>,
}

impl Line {
    /// Returns `true` if the line hands control to a choice group.
    #[must_use]
    pub fn is_branch_point(&self) -> bool {
        self.choice_group_id.is_some()
    }
}

/// A speaking character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Character identifier.
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// Speaker name color, as a hex string without `#`.
    #[serde(default = "default_text_color")]
    pub color: String,
}

/// A character expression asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    /// Sprite identifier.
    pub id: SpriteId,
    /// Owning character.
    pub character_id: CharacterId,
    /// Expression label, e.g. `"smiling"`.
    pub expression: String,
    /// Asset path.
    pub asset_path: String,
}

/// A named boolean story flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event identifier.
    pub id: EventId,
    /// Display name.
    pub name: String,
}

/// A guard redirecting flow out of `from_scene_id` when `event_id` is set.
///
/// Rules sharing a source and a target are ANDed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRule {
    /// Scene the rule applies to.
    pub from_scene_id: SceneId,
    /// Scene taken when every rule of the group holds.
    pub to_scene_id: SceneId,
    /// Flag that must be true.
    pub event_id: EventId,
}

/// One option of a choice group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Option identifier.
    pub id: ChoiceOptionId,
    /// Group the option belongs to.
    pub group_id: ChoiceGroupId,
    /// Display text.
    pub text: String,
    /// Scene entered when chosen. `None` ends the story.
    #[serde(default)]
    pub to_scene_id: Option<SceneId>,
    /// Flag set true when chosen.
    #[serde(default)]
    pub event_id: Option<EventId>,
}
