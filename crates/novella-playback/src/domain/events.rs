//! Playback journal events.

use novella_core::event::{DomainEvent, EventMetadata};
use novella_core::ids::{ChoiceGroupId, ChoiceOptionId, EventId, LineId, SceneId};
use serde::{Deserialize, Serialize};

/// Emitted when playback enters a scene, including scenes skipped because
/// they had nothing to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneEntered {
    /// The scene entered.
    pub scene_id: SceneId,
}

/// Emitted when a dialogue line is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineShown {
    /// The scene the line belongs to.
    pub scene_id: SceneId,
    /// The line shown.
    pub line_id: LineId,
}

/// Emitted when a branch point presents its options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoicesPresented {
    /// The branch-point line.
    pub line_id: LineId,
    /// The choice group presented.
    pub group_id: ChoiceGroupId,
    /// Options offered, in presentation order.
    pub option_ids: Vec<ChoiceOptionId>,
}

/// Emitted when the player picks an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceMade {
    /// The choice group answered.
    pub group_id: ChoiceGroupId,
    /// The option picked.
    pub option_id: ChoiceOptionId,
    /// The event flag the option raised.
    pub event_id: Option<EventId>,
}

/// Emitted when the story ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackEnded {
    /// The last scene entered before the end.
    pub last_scene_id: Option<SceneId>,
}

/// Event payload variants for playback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEventKind {
    /// A scene was entered.
    SceneEntered(SceneEntered),
    /// A line was shown.
    LineShown(LineShown),
    /// A choice was presented.
    ChoicesPresented(ChoicesPresented),
    /// A choice was made.
    ChoiceMade(ChoiceMade),
    /// Playback ended.
    PlaybackEnded(PlaybackEnded),
}

impl PlaybackEventKind {
    /// Returns the event type name of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SceneEntered(_) => "playback.scene_entered",
            Self::LineShown(_) => "playback.line_shown",
            Self::ChoicesPresented(_) => "playback.choices_presented",
            Self::ChoiceMade(_) => "playback.choice_made",
            Self::PlaybackEnded(_) => "playback.ended",
        }
    }
}

/// Domain event envelope for playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: PlaybackEventKind,
}

impl DomainEvent for PlaybackEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("PlaybackEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_playback_event_exposes_type_and_payload() {
        // Arrange
        let event = PlaybackEvent {
            metadata: EventMetadata {
                event_type: "playback.choice_made".to_owned(),
                playthrough_id: Uuid::new_v4(),
                sequence_number: 4,
            },
            kind: PlaybackEventKind::ChoiceMade(ChoiceMade {
                group_id: ChoiceGroupId(1),
                option_id: ChoiceOptionId(2),
                event_id: Some(EventId(3)),
            }),
        };

        // Act
        let payload = event.to_payload();

        // Assert
        assert_eq!(event.event_type(), "playback.choice_made");
        assert_eq!(event.metadata().sequence_number, 4);
        assert_eq!(payload["ChoiceMade"]["option_id"], 2);
        assert_eq!(payload["ChoiceMade"]["event_id"], 3);
    }
}
