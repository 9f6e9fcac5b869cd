//! Transition resolution for exhausted scenes.

use std::collections::BTreeMap;

use novella_core::error::DomainError;
use novella_core::ids::{EventId, SceneId};
use novella_core::model::{Scene, TransitionRule};
use novella_core::store::{EventFlagStore, StoryStore};

/// Conditional transition rules of one source scene, grouped by target.
///
/// Each target's required events are ANDed. A well-authored scene has a
/// single target; more than one is ambiguous and resolved by preferring the
/// highest satisfied target id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionRuleSet {
    groups: BTreeMap<SceneId, Vec<EventId>>,
}

impl TransitionRuleSet {
    /// Groups `rules` by target scene.
    #[must_use]
    pub fn from_rules(rules: &[TransitionRule]) -> Self {
        let mut groups: BTreeMap<SceneId, Vec<EventId>> = BTreeMap::new();
        for rule in rules {
            groups.entry(rule.to_scene_id).or_default().push(rule.event_id);
        }
        Self { groups }
    }

    /// Returns `true` if no rules exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns `true` if the rules name more than one target.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.groups.len() > 1
    }

    /// Returns the target scene ids, highest first.
    pub fn targets(&self) -> impl Iterator<Item = SceneId> + '_ {
        self.groups.keys().rev().copied()
    }

    /// Returns the highest target whose required events are all set.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if reading a flag fails.
    pub async fn satisfied_target(
        &self,
        flags: &dyn EventFlagStore,
    ) -> Result<Option<SceneId>, DomainError> {
        for (target, events) in self.groups.iter().rev() {
            let mut satisfied = true;
            for event_id in events {
                if !flags.get_event_flag(*event_id).await? {
                    satisfied = false;
                    break;
                }
            }
            if satisfied {
                return Ok(Some(*target));
            }
        }
        Ok(None)
    }
}

/// Computes the scene that follows an exhausted scene.
pub struct TransitionResolver<'a> {
    story: &'a dyn StoryStore,
    flags: &'a dyn EventFlagStore,
}

impl<'a> TransitionResolver<'a> {
    /// Creates a resolver over the given stores.
    #[must_use]
    pub fn new(story: &'a dyn StoryStore, flags: &'a dyn EventFlagStore) -> Self {
        Self { story, flags }
    }

    /// Resolves the scene following `scene_id`. `None` means the story ends.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SceneNotFound` if the scene does not exist, or
    /// any store error.
    pub async fn resolve(&self, scene_id: SceneId) -> Result<Option<SceneId>, DomainError> {
        let scene = self
            .story
            .get_scene_by_id(scene_id)
            .await?
            .ok_or(DomainError::SceneNotFound(scene_id))?;
        self.resolve_scene(&scene).await
    }

    /// Resolves the scene following an already loaded `scene`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if reading rules or flags fails.
    pub async fn resolve_scene(&self, scene: &Scene) -> Result<Option<SceneId>, DomainError> {
        let rules = self.story.get_transition_rules(scene.id).await?;
        let rule_set = TransitionRuleSet::from_rules(&rules);
        if rule_set.is_empty() {
            return Ok(scene.default_next_scene_id);
        }

        if rule_set.is_ambiguous() {
            let targets: Vec<i64> = rule_set.targets().map(SceneId::get).collect();
            tracing::warn!(
                scene_id = %scene.id,
                ?targets,
                "AmbiguousTransitionRules: preferring the highest satisfied target"
            );
        }

        match rule_set.satisfied_target(self.flags).await? {
            Some(target) => {
                tracing::debug!(scene_id = %scene.id, %target, "transition rule satisfied");
                Ok(Some(target))
            }
            None => Ok(scene.default_next_scene_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use novella_store::memory::{InMemoryFlagStore, InMemoryStoryStore};

    const BOOK: &str = r"
events:
  - { id: 1, name: Met Mira }
  - { id: 2, name: Found Key }
scenes:
  - { id: 1, name: Plain, default_next_scene_id: 2 }
  - { id: 2, name: Guarded, default_next_scene_id: 3 }
  - { id: 3, name: Double Guard, default_next_scene_id: 4 }
  - { id: 4, name: Ambiguous, default_next_scene_id: 5 }
  - { id: 5, name: Last }
  - { id: 10, name: Secret }
  - { id: 20, name: Vault }
transitions:
  - { from_scene_id: 2, to_scene_id: 10, event_id: 1 }
  - { from_scene_id: 3, to_scene_id: 10, event_id: 1 }
  - { from_scene_id: 3, to_scene_id: 10, event_id: 2 }
  - { from_scene_id: 4, to_scene_id: 10, event_id: 1 }
  - { from_scene_id: 4, to_scene_id: 20, event_id: 2 }
";

    fn store() -> InMemoryStoryStore {
        InMemoryStoryStore::from_yaml_str(BOOK).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_without_rules_returns_default() {
        // Arrange
        let story = store();
        let flags = InMemoryFlagStore::new();
        let resolver = TransitionResolver::new(&story, &flags);

        // Act
        let next = resolver.resolve(SceneId(1)).await.unwrap();

        // Assert
        assert_eq!(next, Some(SceneId(2)));
    }

    #[tokio::test]
    async fn test_resolve_without_rules_or_default_ends() {
        let story = store();
        let flags = InMemoryFlagStore::new();
        let resolver = TransitionResolver::new(&story, &flags);

        assert_eq!(resolver.resolve(SceneId(5)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_single_rule_follows_its_flag() {
        // Arrange
        let story = store();
        let flags = InMemoryFlagStore::new();
        let resolver = TransitionResolver::new(&story, &flags);

        // Act
        let unset = resolver.resolve(SceneId(2)).await.unwrap();
        flags.set_event_flag(EventId(1), true).await.unwrap();
        let set = resolver.resolve(SceneId(2)).await.unwrap();

        // Assert
        assert_eq!(unset, Some(SceneId(3)));
        assert_eq!(set, Some(SceneId(10)));
    }

    #[tokio::test]
    async fn test_rules_for_one_target_are_anded() {
        // Arrange
        let story = store();
        let flags = InMemoryFlagStore::new();
        let resolver = TransitionResolver::new(&story, &flags);
        flags.set_event_flag(EventId(1), true).await.unwrap();

        // Act
        let partial = resolver.resolve(SceneId(3)).await.unwrap();
        flags.set_event_flag(EventId(2), true).await.unwrap();
        let full = resolver.resolve(SceneId(3)).await.unwrap();

        // Assert
        assert_eq!(partial, Some(SceneId(4)));
        assert_eq!(full, Some(SceneId(10)));
    }

    #[tokio::test]
    async fn test_ambiguous_targets_prefer_highest_satisfied() {
        // Arrange
        let story = store();
        let flags = InMemoryFlagStore::new();
        let resolver = TransitionResolver::new(&story, &flags);

        // Act / Assert: only the lower target satisfied.
        flags.set_event_flag(EventId(1), true).await.unwrap();
        assert_eq!(resolver.resolve(SceneId(4)).await.unwrap(), Some(SceneId(10)));

        // Both satisfied: the higher target wins.
        flags.set_event_flag(EventId(2), true).await.unwrap();
        assert_eq!(resolver.resolve(SceneId(4)).await.unwrap(), Some(SceneId(20)));

        // Neither satisfied: default.
        flags.set_event_flag(EventId(1), false).await.unwrap();
        flags.set_event_flag(EventId(2), false).await.unwrap();
        assert_eq!(resolver.resolve(SceneId(4)).await.unwrap(), Some(SceneId(5)));
    }

    #[tokio::test]
    async fn test_resolve_unknown_scene_returns_not_found() {
        let story = store();
        let flags = InMemoryFlagStore::new();
        let resolver = TransitionResolver::new(&story, &flags);

        match resolver.resolve(SceneId(99)).await.unwrap_err() {
            DomainError::SceneNotFound(id) => assert_eq!(id, SceneId(99)),
            other => panic!("expected SceneNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_rule_set_groups_by_target() {
        let rules = vec![
            TransitionRule {
                from_scene_id: SceneId(1),
                to_scene_id: SceneId(3),
                event_id: EventId(1),
            },
            TransitionRule {
                from_scene_id: SceneId(1),
                to_scene_id: SceneId(7),
                event_id: EventId(2),
            },
            TransitionRule {
                from_scene_id: SceneId(1),
                to_scene_id: SceneId(3),
                event_id: EventId(4),
            },
        ];

        let rule_set = TransitionRuleSet::from_rules(&rules);

        assert!(rule_set.is_ambiguous());
        assert_eq!(
            rule_set.targets().collect::<Vec<_>>(),
            vec![SceneId(7), SceneId(3)]
        );
        assert!(TransitionRuleSet::from_rules(&[]).is_empty());
    }
}
