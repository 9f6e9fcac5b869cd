//! View models emitted to the presentation layer.

use novella_core::ids::ChoiceOptionId;
use novella_core::model::ChoiceOption;
use serde::Serialize;

/// A rendered dialogue line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineView {
    /// Speaker display name.
    pub speaker_name: String,
    /// Speaker name color.
    pub speaker_color: String,
    /// Dialogue text.
    pub text: String,
    /// Expression asset shown with the line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite_asset_path: Option<String>,
}

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    /// Option identifier, submitted back to choose it.
    pub id: ChoiceOptionId,
    /// Display text.
    pub text: String,
}

impl From<&ChoiceOption> for OptionView {
    fn from(option: &ChoiceOption) -> Self {
        Self {
            id: option.id,
            text: option.text.clone(),
        }
    }
}

/// What to display after one controller call.
///
/// `background_path` is set only on the first output of a newly entered
/// scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// Show a line of dialogue.
    Line {
        /// The line to show.
        #[serde(flatten)]
        line: LineView,
        /// Background of the scene just entered.
        #[serde(skip_serializing_if = "Option::is_none")]
        background_path: Option<String>,
    },
    /// Offer a choice.
    Choices {
        /// The branch-point line asking the question.
        prompt: LineView,
        /// Options in presentation order.
        options: Vec<OptionView>,
        /// Background of the scene just entered.
        #[serde(skip_serializing_if = "Option::is_none")]
        background_path: Option<String>,
    },
    /// The story is over.
    Ended,
}

impl Step {
    /// Returns the background carried by this step, if any.
    #[must_use]
    pub fn background_path(&self) -> Option<&str> {
        match self {
            Self::Line {
                background_path, ..
            }
            | Self::Choices {
                background_path, ..
            } => background_path.as_deref(),
            Self::Ended => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line_view() -> LineView {
        LineView {
            speaker_name: "Mira".to_owned(),
            speaker_color: "88CCFF".to_owned(),
            text: "Hello.".to_owned(),
            sprite_asset_path: None,
        }
    }

    #[test]
    fn test_line_step_serializes_flat_with_kind() {
        let step = Step::Line {
            line: line_view(),
            background_path: Some("bg/library.png".to_owned()),
        };

        let json = serde_json::to_value(&step).unwrap();

        assert_eq!(
            json,
            json!({
                "kind": "line",
                "speaker_name": "Mira",
                "speaker_color": "88CCFF",
                "text": "Hello.",
                "background_path": "bg/library.png",
            })
        );
    }

    #[test]
    fn test_choices_step_lists_options() {
        let step = Step::Choices {
            prompt: line_view(),
            options: vec![OptionView {
                id: ChoiceOptionId(3),
                text: "Leave".to_owned(),
            }],
            background_path: None,
        };

        let json = serde_json::to_value(&step).unwrap();

        assert_eq!(json["kind"], "choices");
        assert_eq!(json["options"], json!([{ "id": 3, "text": "Leave" }]));
        assert_eq!(json["prompt"]["text"], "Hello.");
        assert!(json.get("background_path").is_none());
    }

    #[test]
    fn test_ended_step_is_only_a_kind() {
        assert_eq!(serde_json::to_value(Step::Ended).unwrap(), json!({ "kind": "ended" }));
        assert_eq!(Step::Ended.background_path(), None);
    }
}
