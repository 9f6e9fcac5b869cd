//! Command handlers for playback.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: check the command against the playthrough,
//! drive the controller, and log the outcome.

use std::sync::Arc;

use novella_core::error::DomainError;
use novella_core::store::{FlagStoreFactory, StoryStore};
use uuid::Uuid;

use crate::domain::commands::{AdvancePlayback, CreatePlaythrough, MakeChoice, StartPlayback};
use crate::domain::controller::PlaybackController;
use crate::domain::view::Step;

fn ensure_target(controller: &PlaybackController, playthrough_id: Uuid) -> Result<(), DomainError> {
    if controller.playthrough_id() == playthrough_id {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "command for playthrough {playthrough_id} sent to playthrough {}",
            controller.playthrough_id()
        )))
    }
}

fn step_kind(step: &Step) -> &'static str {
    match step {
        Step::Line { .. } => "line",
        Step::Choices { .. } => "choices",
        Step::Ended => "ended",
    }
}

/// Handles the `CreatePlaythrough` command: creates a controller with its
/// own flag store and starts it.
///
/// The handler generates the `playthrough_id`.
///
/// # Errors
///
/// Returns `DomainError` if the first step cannot be produced.
pub async fn handle_create_playthrough(
    command: &CreatePlaythrough,
    story: Arc<dyn StoryStore>,
    flag_stores: &dyn FlagStoreFactory,
    max_scene_hops: usize,
) -> Result<(PlaybackController, Step), DomainError> {
    let playthrough_id = Uuid::new_v4();
    let flags = flag_stores.flags_for(playthrough_id);
    let mut controller =
        PlaybackController::new(playthrough_id, story, flags).with_max_scene_hops(max_scene_hops);

    let step = controller.start(command.scene_id).await?;
    tracing::info!(
        %playthrough_id,
        scene_id = %command.scene_id,
        step = step_kind(&step),
        "playthrough created"
    );

    Ok((controller, step))
}

/// Handles the `StartPlayback` command: restarts the playthrough at a scene.
///
/// # Errors
///
/// Returns `DomainError` if the command targets another playthrough or the
/// controller rejects the start.
pub async fn handle_start_playback(
    command: &StartPlayback,
    controller: &mut PlaybackController,
) -> Result<Step, DomainError> {
    ensure_target(controller, command.playthrough_id)?;

    let step = controller.start(command.scene_id).await?;
    tracing::info!(
        playthrough_id = %command.playthrough_id,
        scene_id = %command.scene_id,
        step = step_kind(&step),
        "playback started"
    );

    Ok(step)
}

/// Handles the `AdvancePlayback` command.
///
/// # Errors
///
/// Returns `DomainError` if the command targets another playthrough or the
/// controller rejects the advance.
pub async fn handle_advance_playback(
    command: &AdvancePlayback,
    controller: &mut PlaybackController,
) -> Result<Step, DomainError> {
    ensure_target(controller, command.playthrough_id)?;

    let step = controller.advance().await?;
    tracing::info!(
        playthrough_id = %command.playthrough_id,
        step = step_kind(&step),
        "playback advanced"
    );

    Ok(step)
}

/// Handles the `MakeChoice` command.
///
/// # Errors
///
/// Returns `DomainError` if the command targets another playthrough or the
/// controller rejects the choice.
pub async fn handle_make_choice(
    command: &MakeChoice,
    controller: &mut PlaybackController,
) -> Result<Step, DomainError> {
    ensure_target(controller, command.playthrough_id)?;

    let step = controller.choose(command.option_id).await?;
    tracing::info!(
        playthrough_id = %command.playthrough_id,
        option_id = %command.option_id,
        step = step_kind(&step),
        "choice made"
    );

    Ok(step)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use novella_core::error::DomainError;
    use novella_core::ids::{ChoiceOptionId, EventId, SceneId};
    use novella_store::memory::{InMemoryFlagStoreFactory, InMemoryStoryStore};
    use novella_test_support::{FailingStoryStore, fixtures};
    use uuid::Uuid;

    use crate::application::command_handlers::{
        handle_advance_playback, handle_create_playthrough, handle_make_choice,
        handle_start_playback,
    };
    use crate::domain::commands::{AdvancePlayback, CreatePlaythrough, MakeChoice, StartPlayback};
    use crate::domain::controller::{DEFAULT_MAX_SCENE_HOPS, PlaybackState};
    use crate::domain::view::Step;

    fn story() -> Arc<InMemoryStoryStore> {
        Arc::new(InMemoryStoryStore::from_yaml_str(fixtures::SCENARIO_BOOK).unwrap())
    }

    #[tokio::test]
    async fn test_handle_create_playthrough_starts_at_scene() {
        // Arrange
        let command = CreatePlaythrough {
            scene_id: SceneId(1),
        };

        // Act
        let (controller, step) = handle_create_playthrough(
            &command,
            story(),
            &InMemoryFlagStoreFactory,
            DEFAULT_MAX_SCENE_HOPS,
        )
        .await
        .unwrap();

        // Assert
        assert!(matches!(step, Step::Line { .. }));
        assert_eq!(controller.state(), PlaybackState::ShowingLine);
        assert_eq!(controller.current_scene().map(|s| s.id), Some(SceneId(1)));
    }

    #[tokio::test]
    async fn test_handle_create_playthrough_propagates_store_failure() {
        let command = CreatePlaythrough {
            scene_id: SceneId(1),
        };

        let result = handle_create_playthrough(
            &command,
            Arc::new(FailingStoryStore),
            &InMemoryFlagStoreFactory,
            DEFAULT_MAX_SCENE_HOPS,
        )
        .await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[tokio::test]
    async fn test_handlers_drive_a_choice_through() {
        // Arrange
        let (mut controller, _) = handle_create_playthrough(
            &CreatePlaythrough {
                scene_id: SceneId(1),
            },
            story(),
            &InMemoryFlagStoreFactory,
            DEFAULT_MAX_SCENE_HOPS,
        )
        .await
        .unwrap();
        let playthrough_id = controller.playthrough_id();
        let advance = AdvancePlayback { playthrough_id };

        // Act
        handle_advance_playback(&advance, &mut controller).await.unwrap();
        let choices = handle_advance_playback(&advance, &mut controller).await.unwrap();
        let after = handle_make_choice(
            &MakeChoice {
                playthrough_id,
                option_id: ChoiceOptionId(1),
            },
            &mut controller,
        )
        .await
        .unwrap();

        // Assert
        assert!(matches!(choices, Step::Choices { .. }));
        assert!(matches!(after, Step::Line { .. }));
        assert!(controller.flags().get_event_flag(EventId(1)).await.unwrap());
    }

    #[tokio::test]
    async fn test_handle_start_playback_restarts_scene() {
        let (mut controller, _) = handle_create_playthrough(
            &CreatePlaythrough {
                scene_id: SceneId(5),
            },
            story(),
            &InMemoryFlagStoreFactory,
            DEFAULT_MAX_SCENE_HOPS,
        )
        .await
        .unwrap();
        assert_eq!(controller.state(), PlaybackState::Ended);

        let command = StartPlayback {
            playthrough_id: controller.playthrough_id(),
            scene_id: SceneId(4),
        };
        let step = handle_start_playback(&command, &mut controller).await.unwrap();

        assert!(matches!(step, Step::Line { .. }));
    }

    #[tokio::test]
    async fn test_commands_for_another_playthrough_are_rejected() {
        let (mut controller, _) = handle_create_playthrough(
            &CreatePlaythrough {
                scene_id: SceneId(1),
            },
            story(),
            &InMemoryFlagStoreFactory,
            DEFAULT_MAX_SCENE_HOPS,
        )
        .await
        .unwrap();

        let command = AdvancePlayback {
            playthrough_id: Uuid::new_v4(),
        };
        let result = handle_advance_playback(&command, &mut controller).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
