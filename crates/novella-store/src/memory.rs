//! In-memory story and flag stores.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use novella_core::error::DomainError;
use novella_core::ids::{CharacterId, ChoiceGroupId, EventId, SceneId, SpriteId};
use novella_core::model::{Character, ChoiceOption, Line, Location, Scene, Sprite, TransitionRule};
use novella_core::store::{EventFlagStore, FlagStoreFactory, StoryStore};
use uuid::Uuid;

use crate::book::StoryBook;

/// Story content indexed for playback queries.
///
/// Grouped records (lines per scene, rules per source scene, options per
/// choice group) are collected into explicit ordered collections once, when
/// the store is built.
#[derive(Debug, Default)]
pub struct InMemoryStoryStore {
    scenes: HashMap<SceneId, Scene>,
    lines: HashMap<SceneId, Vec<Line>>,
    rules: HashMap<SceneId, Vec<TransitionRule>>,
    options: HashMap<ChoiceGroupId, Vec<ChoiceOption>>,
    characters: HashMap<CharacterId, Character>,
    sprites: HashMap<SpriteId, Sprite>,
}

impl InMemoryStoryStore {
    /// Indexes every record of `book`.
    #[must_use]
    pub fn from_book(book: StoryBook) -> Self {
        let locations: HashMap<_, Location> =
            book.locations.into_iter().map(|l| (l.id, l)).collect();

        let scenes = book
            .scenes
            .into_iter()
            .map(|record| {
                let location = record.location_id.and_then(|id| {
                    let location = locations.get(&id).cloned();
                    if location.is_none() {
                        tracing::warn!(scene_id = %record.id, location_id = %id, "scene references unknown location");
                    }
                    location
                });
                let scene = Scene {
                    id: record.id,
                    name: record.name,
                    location,
                    default_next_scene_id: record.default_next_scene_id,
                };
                (scene.id, scene)
            })
            .collect();

        let mut lines: HashMap<SceneId, Vec<Line>> = HashMap::new();
        for line in book.lines {
            lines.entry(line.scene_id).or_default().push(line);
        }
        for scene_lines in lines.values_mut() {
            scene_lines.sort_by_key(|l| (l.sequence, l.id));
        }

        let mut rules: HashMap<SceneId, Vec<TransitionRule>> = HashMap::new();
        for rule in book.transitions {
            rules.entry(rule.from_scene_id).or_default().push(rule);
        }

        let mut options: HashMap<ChoiceGroupId, Vec<ChoiceOption>> = HashMap::new();
        for option in book.choices {
            options.entry(option.group_id).or_default().push(option);
        }
        for group in options.values_mut() {
            group.sort_by_key(|o| o.id);
        }

        Self {
            scenes,
            lines,
            rules,
            options,
            characters: book.characters.into_iter().map(|c| (c.id, c)).collect(),
            sprites: book.sprites.into_iter().map(|s| (s.id, s)).collect(),
        }
    }

    /// Parses a YAML story book and indexes it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the document is not a valid book.
    pub fn from_yaml_str(source: &str) -> Result<Self, DomainError> {
        StoryBook::from_yaml_str(source).map(Self::from_book)
    }

    /// Returns the number of scenes in the store.
    #[must_use]
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }
}

#[async_trait]
impl StoryStore for InMemoryStoryStore {
    async fn get_scene_by_id(&self, scene_id: SceneId) -> Result<Option<Scene>, DomainError> {
        Ok(self.scenes.get(&scene_id).cloned())
    }

    async fn get_lines_for_scene(&self, scene_id: SceneId) -> Result<Vec<Line>, DomainError> {
        Ok(self.lines.get(&scene_id).cloned().unwrap_or_default())
    }

    async fn get_transition_rules(
        &self,
        from_scene_id: SceneId,
    ) -> Result<Vec<TransitionRule>, DomainError> {
        Ok(self.rules.get(&from_scene_id).cloned().unwrap_or_default())
    }

    async fn get_choice_options(
        &self,
        group_id: ChoiceGroupId,
    ) -> Result<Vec<ChoiceOption>, DomainError> {
        Ok(self.options.get(&group_id).cloned().unwrap_or_default())
    }

    async fn get_character_by_id(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<Character>, DomainError> {
        Ok(self.characters.get(&character_id).cloned())
    }

    async fn get_sprite_by_id(&self, sprite_id: SpriteId) -> Result<Option<Sprite>, DomainError> {
        Ok(self.sprites.get(&sprite_id).cloned())
    }
}

/// Event flags of one playthrough, held in memory.
#[derive(Debug, Default)]
pub struct InMemoryFlagStore {
    flags: RwLock<HashMap<EventId, bool>>,
}

impl InMemoryFlagStore {
    /// Creates a flag store with every flag false.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the flags that are currently true, ordered by event id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the lock is poisoned.
    pub fn raised_flags(&self) -> Result<Vec<EventId>, DomainError> {
        let flags = self.flags.read().map_err(|_| poisoned())?;
        let mut raised: Vec<EventId> = flags
            .iter()
            .filter(|(_, value)| **value)
            .map(|(id, _)| *id)
            .collect();
        raised.sort_unstable();
        Ok(raised)
    }
}

fn poisoned() -> DomainError {
    DomainError::Infrastructure("flag store lock poisoned".into())
}

#[async_trait]
impl EventFlagStore for InMemoryFlagStore {
    async fn get_event_flag(&self, event_id: EventId) -> Result<bool, DomainError> {
        let flags = self.flags.read().map_err(|_| poisoned())?;
        Ok(flags.get(&event_id).copied().unwrap_or(false))
    }

    async fn set_event_flag(&self, event_id: EventId, value: bool) -> Result<(), DomainError> {
        let mut flags = self.flags.write().map_err(|_| poisoned())?;
        flags.insert(event_id, value);
        Ok(())
    }
}

/// Hands every playthrough a fresh, empty [`InMemoryFlagStore`].
#[derive(Debug, Default, Clone, Copy)]
pub struct InMemoryFlagStoreFactory;

impl FlagStoreFactory for InMemoryFlagStoreFactory {
    fn flags_for(&self, _playthrough_id: Uuid) -> Arc<dyn EventFlagStore> {
        Arc::new(InMemoryFlagStore::new())
    }
}
