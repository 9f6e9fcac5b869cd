//! The playback state machine of one playthrough.

use std::sync::Arc;

use novella_core::error::DomainError;
use novella_core::event::EventMetadata;
use novella_core::ids::{ChoiceGroupId, ChoiceOptionId, SceneId};
use novella_core::model::{ChoiceOption, Line, Scene};
use novella_core::store::{EventFlagStore, StoryStore};
use serde::Serialize;
use uuid::Uuid;

use super::cursor::{CursorState, PlaybackCursor};
use super::dispatcher::ChoiceDispatcher;
use super::events::{
    ChoiceMade, ChoicesPresented, LineShown, PlaybackEnded, PlaybackEvent, PlaybackEventKind,
    SceneEntered,
};
use super::resolver::TransitionResolver;
use super::view::{LineView, OptionView, Step};

/// Default number of scenes one call may pass through before giving up.
pub const DEFAULT_MAX_SCENE_HOPS: usize = 64;

/// Playback state machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// Nothing has been started.
    Idle,
    /// A line is on screen.
    ShowingLine,
    /// Options are on screen.
    AwaitingChoice,
    /// The story is over.
    Ended,
}

/// A branch point waiting for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChoice {
    /// The choice group presented.
    pub group_id: ChoiceGroupId,
    /// Options offered, in presentation order.
    pub options: Vec<ChoiceOption>,
}

/// Everything a successful call changes, applied at once by `commit`.
struct Outcome {
    state: PlaybackState,
    cursor: PlaybackCursor,
    scene: Option<Scene>,
    pending: Option<PendingChoice>,
    events: Vec<PlaybackEventKind>,
    step: Step,
}

/// Drives one playthrough: cursor, dispatcher, and resolver behind a single
/// start / advance / choose API.
///
/// A failed call leaves the controller exactly as it was, and a failed
/// `choose` leaves the event flags as they were.
pub struct PlaybackController {
    playthrough_id: Uuid,
    story: Arc<dyn StoryStore>,
    flags: Arc<dyn EventFlagStore>,
    max_scene_hops: usize,
    state: PlaybackState,
    cursor: PlaybackCursor,
    scene: Option<Scene>,
    pending: Option<PendingChoice>,
    journal: Vec<PlaybackEvent>,
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("playthrough_id", &self.playthrough_id)
            .field("state", &self.state)
            .field("scene_id", &self.scene.as_ref().map(|s| s.id))
            .field("journal_len", &self.journal.len())
            .finish_non_exhaustive()
    }
}

impl PlaybackController {
    /// Creates an idle controller for `playthrough_id`.
    #[must_use]
    pub fn new(
        playthrough_id: Uuid,
        story: Arc<dyn StoryStore>,
        flags: Arc<dyn EventFlagStore>,
    ) -> Self {
        Self {
            playthrough_id,
            story,
            flags,
            max_scene_hops: DEFAULT_MAX_SCENE_HOPS,
            state: PlaybackState::Idle,
            cursor: PlaybackCursor::new(),
            scene: None,
            pending: None,
            journal: Vec::new(),
        }
    }

    /// Sets how many scenes one call may pass through.
    #[must_use]
    pub fn with_max_scene_hops(mut self, max_scene_hops: usize) -> Self {
        self.max_scene_hops = max_scene_hops.max(1);
        self
    }

    /// Returns the playthrough identifier.
    #[must_use]
    pub fn playthrough_id(&self) -> Uuid {
        self.playthrough_id
    }

    /// Returns the current phase.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Returns the scene being played, if any.
    #[must_use]
    pub fn current_scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Returns the line under the cursor, if any.
    #[must_use]
    pub fn current_line(&self) -> Option<&Line> {
        self.cursor.current()
    }

    /// Returns the branch point waiting for a choice, if any.
    #[must_use]
    pub fn pending_choice(&self) -> Option<&PendingChoice> {
        self.pending.as_ref()
    }

    /// Returns the flag store of this playthrough.
    #[must_use]
    pub fn flags(&self) -> &Arc<dyn EventFlagStore> {
        &self.flags
    }

    /// Returns every committed playback event, oldest first.
    #[must_use]
    pub fn journal(&self) -> &[PlaybackEvent] {
        &self.journal
    }

    /// Starts playback at `scene_id` and returns the first output.
    ///
    /// Allowed in any state; the cursor restarts but event flags are kept.
    /// Scenes with nothing to show are passed through.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SceneNotFound` if a scene on the way is missing,
    /// `DomainError::SceneHopLimitExceeded` on a cycle of empty scenes, or
    /// any store error.
    pub async fn start(&mut self, scene_id: SceneId) -> Result<Step, DomainError> {
        tracing::debug!(playthrough_id = %self.playthrough_id, %scene_id, "starting playback");
        let outcome = self.enter(scene_id, Vec::new()).await?;
        Ok(self.commit(outcome))
    }

    /// Moves past the line on screen and returns the next output.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotStarted` before `start`,
    /// `DomainError::EngineEnded` after the end,
    /// `DomainError::ChoicePending` while options are on screen, or any
    /// error `start` may return when the scene is exhausted.
    pub async fn advance(&mut self) -> Result<Step, DomainError> {
        match self.state {
            PlaybackState::Idle => return Err(DomainError::NotStarted),
            PlaybackState::Ended => return Err(DomainError::EngineEnded),
            PlaybackState::AwaitingChoice => {
                let group_id = self
                    .pending
                    .as_ref()
                    .map(|p| p.group_id)
                    .ok_or(DomainError::NotStarted)?;
                return Err(DomainError::ChoicePending(group_id));
            }
            PlaybackState::ShowingLine => {}
        }

        let scene = self.scene.clone().ok_or(DomainError::NotStarted)?;
        let mut cursor = self.cursor.clone();
        let outcome = match cursor.advance()? {
            CursorState::Showing(line) => {
                self.show_line(scene, cursor, &line, false, Vec::new())
                    .await?
            }
            CursorState::AwaitingChoice(group_id) => {
                self.present_choices(scene, cursor, group_id, false, Vec::new())
                    .await?
            }
            CursorState::SceneExhausted => {
                let resolver = TransitionResolver::new(self.story.as_ref(), self.flags.as_ref());
                match resolver.resolve_scene(&scene).await? {
                    Some(next) => self.enter(next, Vec::new()).await?,
                    None => Self::ended(cursor, Some(scene), Vec::new()),
                }
            }
        };
        Ok(self.commit(outcome))
    }

    /// Picks `option_id` at the pending branch point and returns the next
    /// output.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotStarted` before `start`,
    /// `DomainError::EngineEnded` after the end,
    /// `DomainError::NoPendingChoice` while a line is on screen,
    /// `DomainError::InvalidChoice` for an option not on screen, or any error
    /// `start` may return for the target scene. No flag is left raised on
    /// failure.
    pub async fn choose(&mut self, option_id: ChoiceOptionId) -> Result<Step, DomainError> {
        match self.state {
            PlaybackState::Idle => return Err(DomainError::NotStarted),
            PlaybackState::Ended => return Err(DomainError::EngineEnded),
            PlaybackState::ShowingLine => return Err(DomainError::NoPendingChoice),
            PlaybackState::AwaitingChoice => {}
        }
        let pending = self.pending.as_ref().ok_or(DomainError::NoPendingChoice)?;
        let chosen = pending.options.iter().find(|o| o.id == option_id);
        let event_id = chosen.and_then(|o| o.event_id);

        // The target scene must exist before any flag is written.
        if let Some(scene_id) = chosen.and_then(|o| o.to_scene_id) {
            if self.story.get_scene_by_id(scene_id).await?.is_none() {
                return Err(DomainError::SceneNotFound(scene_id));
            }
        }
        let raised = match event_id {
            Some(event_id) if !self.flags.get_event_flag(event_id).await? => Some(event_id),
            _ => None,
        };

        let dispatcher = ChoiceDispatcher::new(self.story.as_ref(), self.flags.as_ref());
        let target = dispatcher
            .choose(pending.group_id, &pending.options, option_id)
            .await?;

        let events = vec![PlaybackEventKind::ChoiceMade(ChoiceMade {
            group_id: pending.group_id,
            option_id,
            event_id,
        })];

        let entered = match target {
            Some(scene_id) => self.enter(scene_id, events).await,
            None => Ok(Self::ended(self.cursor.clone(), self.scene.clone(), events)),
        };
        let outcome = match entered {
            Ok(outcome) => outcome,
            Err(err) => {
                if let Some(event_id) = raised {
                    self.flags.set_event_flag(event_id, false).await?;
                    tracing::debug!(%option_id, %event_id, "choice failed, event flag cleared");
                }
                return Err(err);
            }
        };
        Ok(self.commit(outcome))
    }

    /// Enters `scene_id`, passing through scenes that are exhausted before
    /// showing anything.
    async fn enter(
        &self,
        scene_id: SceneId,
        mut events: Vec<PlaybackEventKind>,
    ) -> Result<Outcome, DomainError> {
        let resolver = TransitionResolver::new(self.story.as_ref(), self.flags.as_ref());
        let mut next = scene_id;

        for _ in 0..self.max_scene_hops {
            let scene = self
                .story
                .get_scene_by_id(next)
                .await?
                .ok_or(DomainError::SceneNotFound(next))?;
            let mut cursor = PlaybackCursor::new();
            cursor.start(scene.id, self.story.as_ref()).await?;
            events.push(PlaybackEventKind::SceneEntered(SceneEntered {
                scene_id: scene.id,
            }));
            tracing::debug!(scene_id = %scene.id, lines = cursor.len(), "entered scene");

            match cursor.advance()? {
                CursorState::Showing(line) => {
                    return self.show_line(scene, cursor, &line, true, events).await;
                }
                CursorState::AwaitingChoice(group_id) => {
                    return self
                        .present_choices(scene, cursor, group_id, true, events)
                        .await;
                }
                CursorState::SceneExhausted => match resolver.resolve_scene(&scene).await? {
                    Some(target) => next = target,
                    None => return Ok(Self::ended(cursor, Some(scene), events)),
                },
            }
        }

        Err(DomainError::SceneHopLimitExceeded {
            scene_id,
            limit: self.max_scene_hops,
        })
    }

    async fn show_line(
        &self,
        scene: Scene,
        cursor: PlaybackCursor,
        line: &Line,
        scene_changed: bool,
        mut events: Vec<PlaybackEventKind>,
    ) -> Result<Outcome, DomainError> {
        let view = self.render_line(line).await?;
        events.push(PlaybackEventKind::LineShown(LineShown {
            scene_id: scene.id,
            line_id: line.id,
        }));
        let background_path = scene_changed
            .then(|| scene.background_path().map(str::to_owned))
            .flatten();
        Ok(Outcome {
            state: PlaybackState::ShowingLine,
            cursor,
            scene: Some(scene),
            pending: None,
            events,
            step: Step::Line {
                line: view,
                background_path,
            },
        })
    }

    async fn present_choices(
        &self,
        scene: Scene,
        cursor: PlaybackCursor,
        group_id: ChoiceGroupId,
        scene_changed: bool,
        mut events: Vec<PlaybackEventKind>,
    ) -> Result<Outcome, DomainError> {
        let line = cursor.current().cloned().ok_or_else(|| {
            DomainError::Validation(format!(
                "choice group {group_id} presented without a branch-point line"
            ))
        })?;
        let prompt = self.render_line(&line).await?;

        let dispatcher = ChoiceDispatcher::new(self.story.as_ref(), self.flags.as_ref());
        let options = dispatcher.options_for(group_id).await?;

        events.push(PlaybackEventKind::ChoicesPresented(ChoicesPresented {
            line_id: line.id,
            group_id,
            option_ids: options.iter().map(|o| o.id).collect(),
        }));
        let background_path = scene_changed
            .then(|| scene.background_path().map(str::to_owned))
            .flatten();
        let step = Step::Choices {
            prompt,
            options: options.iter().map(OptionView::from).collect(),
            background_path,
        };
        Ok(Outcome {
            state: PlaybackState::AwaitingChoice,
            cursor,
            scene: Some(scene),
            pending: Some(PendingChoice { group_id, options }),
            events,
            step,
        })
    }

    fn ended(
        cursor: PlaybackCursor,
        scene: Option<Scene>,
        mut events: Vec<PlaybackEventKind>,
    ) -> Outcome {
        events.push(PlaybackEventKind::PlaybackEnded(PlaybackEnded {
            last_scene_id: scene.as_ref().map(|s| s.id),
        }));
        Outcome {
            state: PlaybackState::Ended,
            cursor,
            scene,
            pending: None,
            events,
            step: Step::Ended,
        }
    }

    async fn render_line(&self, line: &Line) -> Result<LineView, DomainError> {
        let speaker = self
            .story
            .get_character_by_id(line.speaker_id)
            .await?
            .ok_or(DomainError::CharacterNotFound(line.speaker_id))?;

        let sprite_asset_path = match line.sprite_id {
            Some(sprite_id) => Some(
                self.story
                    .get_sprite_by_id(sprite_id)
                    .await?
                    .ok_or(DomainError::SpriteNotFound(sprite_id))?
                    .asset_path,
            ),
            None => None,
        };

        Ok(LineView {
            speaker_name: speaker.name,
            speaker_color: speaker.color,
            text: line.text.clone(),
            sprite_asset_path,
        })
    }

    #[allow(clippy::cast_possible_wrap)]
    fn commit(&mut self, outcome: Outcome) -> Step {
        for kind in outcome.events {
            let sequence_number = self.journal.len() as i64 + 1;
            self.journal.push(PlaybackEvent {
                metadata: EventMetadata {
                    event_type: kind.event_type().to_owned(),
                    playthrough_id: self.playthrough_id,
                    sequence_number,
                },
                kind,
            });
        }
        self.state = outcome.state;
        self.cursor = outcome.cursor;
        self.scene = outcome.scene;
        self.pending = outcome.pending;
        outcome.step
    }
}
