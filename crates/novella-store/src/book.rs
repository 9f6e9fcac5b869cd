//! Story book: a whole story as one serializable document.
//!
//! The book mirrors the story tables one-to-one, so it can seed either the
//! in-memory store or a database.

use novella_core::error::DomainError;
use novella_core::ids::{LocationId, SceneId};
use novella_core::model::{
    Character, ChoiceOption, Event, Line, Location, Sprite, TransitionRule,
};
use serde::{Deserialize, Serialize};

/// A scene row as authored: the location is referenced, not embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneRecord {
    /// Scene identifier.
    pub id: SceneId,
    /// Authoring name.
    pub name: String,
    /// Location the scene takes place in.
    #[serde(default)]
    pub location_id: Option<LocationId>,
    /// Fallback target when no transition rule fires.
    #[serde(default)]
    pub default_next_scene_id: Option<SceneId>,
}

/// Every record of a story.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryBook {
    /// Locations.
    pub locations: Vec<Location>,
    /// Characters.
    pub characters: Vec<Character>,
    /// Sprites.
    pub sprites: Vec<Sprite>,
    /// Event flag definitions.
    pub events: Vec<Event>,
    /// Scenes.
    pub scenes: Vec<SceneRecord>,
    /// Dialogue lines of all scenes.
    pub lines: Vec<Line>,
    /// Choice options of all groups.
    pub choices: Vec<ChoiceOption>,
    /// Conditional transition rules.
    pub transitions: Vec<TransitionRule>,
}

impl StoryBook {
    /// Parses a story book from YAML.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the document is not a valid book.
    pub fn from_yaml_str(source: &str) -> Result<Self, DomainError> {
        serde_yaml::from_str(source)
            .map_err(|e| DomainError::Validation(format!("invalid story book: {e}")))
    }

    /// Reads and parses a story book from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the file cannot be read and
    /// `DomainError::Validation` if it is not a valid book.
    pub fn from_yaml_file(path: impl AsRef<std::path::Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Infrastructure(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&source)
    }
}
