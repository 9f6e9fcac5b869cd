//! `PostgreSQL` implementations of the story store traits.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use novella_core::error::DomainError;
use novella_core::ids::{
    CharacterId, ChoiceGroupId, ChoiceOptionId, EventId, LineId, LocationId, SceneId, SpriteId,
};
use novella_core::model::{Character, ChoiceOption, Line, Location, Scene, Sprite, TransitionRule};
use novella_core::store::{EventFlagStore, FlagStoreFactory, StoryStore};

use crate::book::StoryBook;

fn db_error(err: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("database error: {err}"))
}

#[derive(sqlx::FromRow)]
struct SceneRow {
    scene_id: i64,
    name: String,
    next_scene_default: Option<i64>,
    location_id: Option<i64>,
    location_name: Option<String>,
    bg_path: Option<String>,
}

impl From<SceneRow> for Scene {
    fn from(row: SceneRow) -> Self {
        let location = match (row.location_id, row.location_name, row.bg_path) {
            (Some(id), Some(name), Some(background_path)) => Some(Location {
                id: LocationId(id),
                name,
                background_path,
            }),
            _ => None,
        };
        Self {
            id: SceneId(row.scene_id),
            name: row.name,
            location,
            default_next_scene_id: row.next_scene_default.map(SceneId),
        }
    }
}

#[derive(sqlx::FromRow)]
struct LineRow {
    line_id: i64,
    scene_id: i64,
    speaker_id: i64,
    sequence: i32,
    content: String,
    sprite_id: Option<i64>,
    choice_id: Option<i64>,
}

impl From<LineRow> for Line {
    fn from(row: LineRow) -> Self {
        Self {
            id: LineId(row.line_id),
            scene_id: SceneId(row.scene_id),
            sequence: row.sequence,
            speaker_id: CharacterId(row.speaker_id),
            text: row.content,
            sprite_id: row.sprite_id.map(SpriteId),
            choice_group_id: row.choice_id.map(ChoiceGroupId),
        }
    }
}

#[derive(sqlx::FromRow)]
struct ChoiceRow {
    decision_id: i64,
    choice_id: i64,
    decision_text: String,
    next_scene: Option<i64>,
    event_id: Option<i64>,
}

impl From<ChoiceRow> for ChoiceOption {
    fn from(row: ChoiceRow) -> Self {
        Self {
            id: ChoiceOptionId(row.decision_id),
            group_id: ChoiceGroupId(row.choice_id),
            text: row.decision_text,
            to_scene_id: row.next_scene.map(SceneId),
            event_id: row.event_id.map(EventId),
        }
    }
}

/// PostgreSQL-backed story content.
#[derive(Debug, Clone)]
pub struct PgStoryStore {
    pool: PgPool,
}

impl PgStoryStore {
    /// Creates a new `PgStoryStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the number of stored scenes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the query fails.
    pub async fn scene_count(&self) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM scenes")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)
    }

    /// Inserts every record of `book` in one transaction.
    ///
    /// Scenes are inserted before their default targets are linked, so a
    /// book may reference scenes in any order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if any insert fails; nothing is
    /// written in that case.
    pub async fn import_book(&self, book: &StoryBook) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        for location in &book.locations {
            sqlx::query("INSERT INTO locations (location_id, name, bg_path) VALUES ($1, $2, $3)")
                .bind(location.id.get())
                .bind(&location.name)
                .bind(&location.background_path)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        for character in &book.characters {
            sqlx::query("INSERT INTO characters (char_id, char_name, text_color) VALUES ($1, $2, $3)")
                .bind(character.id.get())
                .bind(&character.name)
                .bind(&character.color)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        for sprite in &book.sprites {
            sqlx::query(
                "INSERT INTO sprites (sprite_id, char_id, expression, path) VALUES ($1, $2, $3, $4)",
            )
            .bind(sprite.id.get())
            .bind(sprite.character_id.get())
            .bind(&sprite.expression)
            .bind(&sprite.asset_path)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        for event in &book.events {
            sqlx::query("INSERT INTO events (event_id, name) VALUES ($1, $2)")
                .bind(event.id.get())
                .bind(&event.name)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        for scene in &book.scenes {
            sqlx::query("INSERT INTO scenes (scene_id, name, location_id) VALUES ($1, $2, $3)")
                .bind(scene.id.get())
                .bind(&scene.name)
                .bind(scene.location_id.map(LocationId::get))
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }
        for scene in &book.scenes {
            if let Some(next) = scene.default_next_scene_id {
                sqlx::query("UPDATE scenes SET next_scene_default = $2 WHERE scene_id = $1")
                    .bind(scene.id.get())
                    .bind(next.get())
                    .execute(&mut *tx)
                    .await
                    .map_err(db_error)?;
            }
        }

        for line in &book.lines {
            sqlx::query(
                "INSERT INTO lines \
                    (line_id, scene_id, speaker_id, sequence, content, sprite_id, choice_id) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(line.id.get())
            .bind(line.scene_id.get())
            .bind(line.speaker_id.get())
            .bind(line.sequence)
            .bind(&line.text)
            .bind(line.sprite_id.map(SpriteId::get))
            .bind(line.choice_group_id.map(ChoiceGroupId::get))
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        for option in &book.choices {
            sqlx::query(
                "INSERT INTO choices (decision_id, choice_id, decision_text, next_scene, event_id) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(option.id.get())
            .bind(option.group_id.get())
            .bind(&option.text)
            .bind(option.to_scene_id.map(SceneId::get))
            .bind(option.event_id.map(EventId::get))
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        for rule in &book.transitions {
            sqlx::query(
                "INSERT INTO scene_transitions (from_scene_id, to_scene_id, event_id) \
                 VALUES ($1, $2, $3)",
            )
            .bind(rule.from_scene_id.get())
            .bind(rule.to_scene_id.get())
            .bind(rule.event_id.get())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;
        tracing::info!(
            scenes = book.scenes.len(),
            lines = book.lines.len(),
            "imported story book"
        );
        Ok(())
    }
}

#[async_trait]
impl StoryStore for PgStoryStore {
    async fn get_scene_by_id(&self, scene_id: SceneId) -> Result<Option<Scene>, DomainError> {
        let row = sqlx::query_as::<_, SceneRow>(
            "SELECT s.scene_id, s.name, s.next_scene_default, \
                    l.location_id, l.name AS location_name, l.bg_path \
             FROM scenes s \
             LEFT JOIN locations l ON s.location_id = l.location_id \
             WHERE s.scene_id = $1",
        )
        .bind(scene_id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.map(Scene::from))
    }

    async fn get_lines_for_scene(&self, scene_id: SceneId) -> Result<Vec<Line>, DomainError> {
        let rows = sqlx::query_as::<_, LineRow>(
            "SELECT line_id, scene_id, speaker_id, sequence, content, sprite_id, choice_id \
             FROM lines WHERE scene_id = $1 ORDER BY sequence ASC, line_id ASC",
        )
        .bind(scene_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.into_iter().map(Line::from).collect())
    }

    async fn get_transition_rules(
        &self,
        from_scene_id: SceneId,
    ) -> Result<Vec<TransitionRule>, DomainError> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT to_scene_id, event_id FROM scene_transitions \
             WHERE from_scene_id = $1 ORDER BY transition_id ASC",
        )
        .bind(from_scene_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows
            .into_iter()
            .map(|(to, event)| TransitionRule {
                from_scene_id,
                to_scene_id: SceneId(to),
                event_id: EventId(event),
            })
            .collect())
    }

    async fn get_choice_options(
        &self,
        group_id: ChoiceGroupId,
    ) -> Result<Vec<ChoiceOption>, DomainError> {
        let rows = sqlx::query_as::<_, ChoiceRow>(
            "SELECT decision_id, choice_id, decision_text, next_scene, event_id \
             FROM choices WHERE choice_id = $1 ORDER BY decision_id ASC",
        )
        .bind(group_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.into_iter().map(ChoiceOption::from).collect())
    }

    async fn get_character_by_id(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<Character>, DomainError> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT char_name, text_color FROM characters WHERE char_id = $1")
                .bind(character_id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;
        Ok(row.map(|(name, color)| Character {
            id: character_id,
            name,
            color,
        }))
    }

    async fn get_sprite_by_id(&self, sprite_id: SpriteId) -> Result<Option<Sprite>, DomainError> {
        let row: Option<(i64, String, String)> =
            sqlx::query_as("SELECT char_id, expression, path FROM sprites WHERE sprite_id = $1")
                .bind(sprite_id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;
        Ok(row.map(|(character_id, expression, asset_path)| Sprite {
            id: sprite_id,
            character_id: CharacterId(character_id),
            expression,
            asset_path,
        }))
    }
}

/// PostgreSQL-backed event flags of one playthrough.
#[derive(Debug, Clone)]
pub struct PgFlagStore {
    pool: PgPool,
    playthrough_id: Uuid,
}

impl PgFlagStore {
    /// Creates a flag store scoped to `playthrough_id`.
    #[must_use]
    pub fn new(pool: PgPool, playthrough_id: Uuid) -> Self {
        Self {
            pool,
            playthrough_id,
        }
    }
}

#[async_trait]
impl EventFlagStore for PgFlagStore {
    async fn get_event_flag(&self, event_id: EventId) -> Result<bool, DomainError> {
        let obtained: Option<bool> = sqlx::query_scalar(
            "SELECT obtained FROM playthrough_flags WHERE playthrough_id = $1 AND event_id = $2",
        )
        .bind(self.playthrough_id)
        .bind(event_id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(obtained.unwrap_or(false))
    }

    async fn set_event_flag(&self, event_id: EventId, value: bool) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO playthrough_flags (playthrough_id, event_id, obtained) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (playthrough_id, event_id) DO UPDATE SET obtained = EXCLUDED.obtained",
        )
        .bind(self.playthrough_id)
        .bind(event_id.get())
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }
}

/// Hands every playthrough a [`PgFlagStore`] on a shared pool.
#[derive(Debug, Clone)]
pub struct PgFlagStoreFactory {
    pool: PgPool,
}

impl PgFlagStoreFactory {
    /// Creates a new `PgFlagStoreFactory`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl FlagStoreFactory for PgFlagStoreFactory {
    fn flags_for(&self, playthrough_id: Uuid) -> Arc<dyn EventFlagStore> {
        Arc::new(PgFlagStore::new(self.pool.clone(), playthrough_id))
    }
}
