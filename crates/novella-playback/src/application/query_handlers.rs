//! Query handlers for playback.
//!
//! This module contains query handlers that read a playthrough's controller
//! and journal and return read-only view DTOs.

use novella_core::event::DomainEvent;
use novella_core::ids::{LineId, SceneId};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::controller::{PlaybackController, PlaybackState};
use crate::domain::events::PlaybackEventKind;
use crate::domain::view::OptionView;

/// One journal entry as exposed to readers.
#[derive(Debug, Serialize)]
pub struct JournalEntryView {
    /// Position in the journal, starting at 1.
    pub sequence_number: i64,
    /// Event type name.
    pub event_type: String,
    /// Event payload.
    pub payload: serde_json::Value,
}

/// Read-only view of a playthrough.
#[derive(Debug, Serialize)]
pub struct PlaythroughView {
    /// The playthrough identifier.
    pub playthrough_id: Uuid,
    /// Current phase.
    pub state: PlaybackState,
    /// The scene being played.
    pub scene_id: Option<SceneId>,
    /// Name of the scene being played.
    pub scene_name: Option<String>,
    /// The line under the cursor.
    pub current_line_id: Option<LineId>,
    /// Options waiting for a choice.
    pub pending_options: Vec<OptionView>,
    /// Every scene entered, in order, repeats included.
    pub visited_scene_ids: Vec<SceneId>,
    /// Committed playback events, oldest first.
    pub journal: Vec<JournalEntryView>,
}

/// Builds the read-only view of a playthrough.
#[must_use]
pub fn get_playthrough_view(controller: &PlaybackController) -> PlaythroughView {
    let scene = controller.current_scene();
    let visited_scene_ids = controller
        .journal()
        .iter()
        .filter_map(|event| match &event.kind {
            PlaybackEventKind::SceneEntered(entered) => Some(entered.scene_id),
            _ => None,
        })
        .collect();
    let journal = controller
        .journal()
        .iter()
        .map(|event| JournalEntryView {
            sequence_number: event.metadata().sequence_number,
            event_type: event.event_type().to_owned(),
            payload: event.to_payload(),
        })
        .collect();

    PlaythroughView {
        playthrough_id: controller.playthrough_id(),
        state: controller.state(),
        scene_id: scene.map(|s| s.id),
        scene_name: scene.map(|s| s.name.clone()),
        current_line_id: controller.current_line().map(|l| l.id),
        pending_options: controller
            .pending_choice()
            .map(|p| p.options.iter().map(OptionView::from).collect())
            .unwrap_or_default(),
        visited_scene_ids,
        journal,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use novella_core::ids::{ChoiceOptionId, LineId, SceneId};
    use novella_store::memory::{InMemoryFlagStore, InMemoryStoryStore};
    use novella_test_support::fixtures;
    use uuid::Uuid;

    use crate::application::query_handlers::get_playthrough_view;
    use crate::domain::controller::{PlaybackController, PlaybackState};

    fn controller() -> PlaybackController {
        let story = Arc::new(InMemoryStoryStore::from_yaml_str(fixtures::SCENARIO_BOOK).unwrap());
        PlaybackController::new(Uuid::new_v4(), story, Arc::new(InMemoryFlagStore::new()))
    }

    #[test]
    fn test_get_playthrough_view_of_idle_controller() {
        // Arrange
        let controller = controller();

        // Act
        let view = get_playthrough_view(&controller);

        // Assert
        assert_eq!(view.playthrough_id, controller.playthrough_id());
        assert_eq!(view.state, PlaybackState::Idle);
        assert_eq!(view.scene_id, None);
        assert!(view.pending_options.is_empty());
        assert!(view.journal.is_empty());
    }

    #[tokio::test]
    async fn test_get_playthrough_view_shows_pending_options() {
        // Arrange
        let mut controller = controller();
        controller.start(SceneId(1)).await.unwrap();
        controller.advance().await.unwrap();
        controller.advance().await.unwrap();

        // Act
        let view = get_playthrough_view(&controller);

        // Assert
        assert_eq!(view.state, PlaybackState::AwaitingChoice);
        assert_eq!(view.scene_name.as_deref(), Some("Hallway"));
        assert_eq!(view.current_line_id, Some(LineId(3)));
        let ids: Vec<ChoiceOptionId> = view.pending_options.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![ChoiceOptionId(1), ChoiceOptionId(2)]);
        assert_eq!(view.journal.last().unwrap().event_type, "playback.choices_presented");
    }

    #[tokio::test]
    async fn test_get_playthrough_view_lists_visited_scenes() {
        // Arrange
        let mut controller = controller();
        controller.start(SceneId(1)).await.unwrap();
        controller.advance().await.unwrap();
        controller.advance().await.unwrap();
        controller.choose(ChoiceOptionId(1)).await.unwrap();

        // Act
        let view = get_playthrough_view(&controller);

        // Assert
        assert_eq!(
            view.visited_scene_ids,
            vec![SceneId(1), SceneId(2), SceneId(4)]
        );
        assert_eq!(view.scene_id, Some(SceneId(4)));
        assert!(view.pending_options.is_empty());
        let sequence: Vec<i64> = view.journal.iter().map(|e| e.sequence_number).collect();
        assert_eq!(sequence, (1..=8).collect::<Vec<_>>());
    }
}
