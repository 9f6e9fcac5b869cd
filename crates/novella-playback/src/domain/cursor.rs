//! Line-by-line walk through one scene.

use novella_core::error::DomainError;
use novella_core::ids::{ChoiceGroupId, SceneId};
use novella_core::model::Line;
use novella_core::store::StoryStore;

/// Outcome of advancing the cursor by one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorState {
    /// A plain line is now under the cursor.
    Showing(Line),
    /// The line now under the cursor is a branch point.
    AwaitingChoice(ChoiceGroupId),
    /// No lines remain in the scene.
    SceneExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    BeforeStart,
    At(usize),
    PastEnd,
}

/// Tracks the position within a scene's ordered lines.
#[derive(Debug, Clone)]
pub struct PlaybackCursor {
    scene_id: Option<SceneId>,
    lines: Vec<Line>,
    position: Position,
}

impl Default for PlaybackCursor {
    fn default() -> Self {
        Self {
            scene_id: None,
            lines: Vec::new(),
            position: Position::BeforeStart,
        }
    }
}

impl PlaybackCursor {
    /// Creates a cursor with no scene loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the lines of `scene_id` and rewinds to before the first line.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the lines cannot be read.
    pub async fn start(
        &mut self,
        scene_id: SceneId,
        story: &dyn StoryStore,
    ) -> Result<(), DomainError> {
        let lines = story.get_lines_for_scene(scene_id).await?;
        self.reset(scene_id, lines);
        Ok(())
    }

    /// Replaces the loaded lines and rewinds to before the first line.
    ///
    /// Lines are ordered by sequence here rather than trusting the store.
    pub fn reset(&mut self, scene_id: SceneId, mut lines: Vec<Line>) {
        lines.sort_by_key(|l| (l.sequence, l.id));
        self.scene_id = Some(scene_id);
        self.lines = lines;
        self.position = Position::BeforeStart;
    }

    /// Returns the loaded scene, if any.
    #[must_use]
    pub fn scene_id(&self) -> Option<SceneId> {
        self.scene_id
    }

    /// Returns the number of lines in the loaded scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if the loaded scene has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the line under the cursor, or `None` before start or past end.
    #[must_use]
    pub fn current(&self) -> Option<&Line> {
        match self.position {
            Position::At(index) => self.lines.get(index),
            Position::BeforeStart | Position::PastEnd => None,
        }
    }

    /// Moves to the next line.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ChoicePending` if the cursor rests on a branch
    /// point; only a choice may leave it.
    pub fn advance(&mut self) -> Result<CursorState, DomainError> {
        if let Some(group_id) = self.current().and_then(|l| l.choice_group_id) {
            return Err(DomainError::ChoicePending(group_id));
        }

        let next = match self.position {
            Position::BeforeStart => 0,
            Position::At(index) => index + 1,
            Position::PastEnd => return Ok(CursorState::SceneExhausted),
        };

        let Some(line) = self.lines.get(next) else {
            self.position = Position::PastEnd;
            return Ok(CursorState::SceneExhausted);
        };

        self.position = Position::At(next);
        tracing::debug!(line_id = %line.id, sequence = line.sequence, "cursor advanced");
        Ok(match line.choice_group_id {
            Some(group_id) => CursorState::AwaitingChoice(group_id),
            None => CursorState::Showing(line.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use novella_core::ids::{CharacterId, LineId};
    use novella_store::memory::InMemoryStoryStore;

    fn line(id: i64, sequence: i32, group: Option<i64>) -> Line {
        Line {
            id: LineId(id),
            scene_id: SceneId(1),
            sequence,
            speaker_id: CharacterId(1),
            text: format!("line {id}"),
            sprite_id: None,
            choice_group_id: group.map(ChoiceGroupId),
        }
    }

    #[test]
    fn test_new_cursor_has_no_current_line() {
        let cursor = PlaybackCursor::new();

        assert!(cursor.current().is_none());
        assert!(cursor.scene_id().is_none());
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_advance_walks_lines_in_sequence_order() {
        // Arrange
        let mut cursor = PlaybackCursor::new();
        cursor.reset(SceneId(1), vec![line(3, 5, None), line(1, 1, None), line(2, 2, None)]);

        // Act
        let mut shown = Vec::new();
        while let CursorState::Showing(l) = cursor.advance().unwrap() {
            shown.push(l.sequence);
        }

        // Assert
        assert_eq!(shown, vec![1, 2, 5]);
        assert!(cursor.current().is_none());
        assert_eq!(cursor.advance().unwrap(), CursorState::SceneExhausted);
    }

    #[test]
    fn test_current_tracks_the_shown_line() {
        let mut cursor = PlaybackCursor::new();
        cursor.reset(SceneId(1), vec![line(1, 1, None), line(2, 2, None)]);

        assert!(cursor.current().is_none());
        cursor.advance().unwrap();
        assert_eq!(cursor.current().map(|l| l.id), Some(LineId(1)));
    }

    #[test]
    fn test_empty_scene_is_immediately_exhausted() {
        let mut cursor = PlaybackCursor::new();
        cursor.reset(SceneId(4), Vec::new());

        assert_eq!(cursor.advance().unwrap(), CursorState::SceneExhausted);
    }

    #[test]
    fn test_branch_point_stops_and_refuses_to_advance() {
        // Arrange
        let mut cursor = PlaybackCursor::new();
        cursor.reset(
            SceneId(1),
            vec![line(1, 1, None), line(2, 2, Some(9)), line(3, 3, None)],
        );
        cursor.advance().unwrap();

        // Act
        let state = cursor.advance().unwrap();
        let again = cursor.advance();

        // Assert
        assert_eq!(state, CursorState::AwaitingChoice(ChoiceGroupId(9)));
        assert_eq!(cursor.current().map(|l| l.id), Some(LineId(2)));
        match again.unwrap_err() {
            DomainError::ChoicePending(group) => assert_eq!(group, ChoiceGroupId(9)),
            other => panic!("expected ChoicePending, got {other:?}"),
        }
    }

    #[test]
    fn test_reset_rewinds_a_used_cursor() {
        let mut cursor = PlaybackCursor::new();
        cursor.reset(SceneId(1), vec![line(1, 1, Some(2))]);
        cursor.advance().unwrap();

        cursor.reset(SceneId(2), vec![line(5, 1, None)]);

        assert_eq!(cursor.scene_id(), Some(SceneId(2)));
        assert!(matches!(cursor.advance().unwrap(), CursorState::Showing(_)));
    }

    #[tokio::test]
    async fn test_start_loads_lines_from_store() {
        // Arrange
        let story = InMemoryStoryStore::from_yaml_str(
            r"
lines:
  - { id: 1, scene_id: 3, sequence: 1, speaker_id: 1, text: hi }
  - { id: 2, scene_id: 3, sequence: 2, speaker_id: 1, text: bye }
",
        )
        .unwrap();
        let mut cursor = PlaybackCursor::new();

        // Act
        cursor.start(SceneId(3), &story).await.unwrap();

        // Assert
        assert_eq!(cursor.len(), 2);
        assert!(cursor.current().is_none());
    }
}
