//! Branch points: listing and applying choice options.

use novella_core::error::DomainError;
use novella_core::ids::{ChoiceGroupId, ChoiceOptionId, SceneId};
use novella_core::model::ChoiceOption;
use novella_core::store::{EventFlagStore, StoryStore};

/// Lists the options of a choice group and applies a selected one.
pub struct ChoiceDispatcher<'a> {
    story: &'a dyn StoryStore,
    flags: &'a dyn EventFlagStore,
}

impl<'a> ChoiceDispatcher<'a> {
    /// Creates a dispatcher over the given stores.
    #[must_use]
    pub fn new(story: &'a dyn StoryStore, flags: &'a dyn EventFlagStore) -> Self {
        Self { story, flags }
    }

    /// Returns the options of `group_id`, ordered by option id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyChoiceGroup` if the group has no options,
    /// or any store error.
    pub async fn options_for(
        &self,
        group_id: ChoiceGroupId,
    ) -> Result<Vec<ChoiceOption>, DomainError> {
        let mut options: Vec<ChoiceOption> = self
            .story
            .get_choice_options(group_id)
            .await?
            .into_iter()
            .filter(|o| o.group_id == group_id)
            .collect();
        if options.is_empty() {
            return Err(DomainError::EmptyChoiceGroup(group_id));
        }
        options.sort_by_key(|o| o.id);
        Ok(options)
    }

    /// Applies the option `option_id` out of the presented `options`.
    ///
    /// Sets the option's event flag, then returns its target scene. `None`
    /// means the story ends.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidChoice` without writing anything if the
    /// option was not presented, or any store error.
    pub async fn choose(
        &self,
        group_id: ChoiceGroupId,
        options: &[ChoiceOption],
        option_id: ChoiceOptionId,
    ) -> Result<Option<SceneId>, DomainError> {
        let option = options
            .iter()
            .find(|o| o.id == option_id && o.group_id == group_id)
            .ok_or(DomainError::InvalidChoice {
                option_id,
                group_id,
            })?;

        if let Some(event_id) = option.event_id {
            self.flags.set_event_flag(event_id, true).await?;
            tracing::debug!(%option_id, %event_id, "choice raised event flag");
        }

        Ok(option.to_scene_id)
    }
}
