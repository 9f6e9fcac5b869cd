//! Shared application state.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use novella_core::error::DomainError;
use novella_core::store::{FlagStoreFactory, StoryStore};
use novella_playback::domain::controller::PlaybackController;
use tokio::sync::Mutex;
use uuid::Uuid;

/// A live playthrough. The mutex admits one request at a time.
pub type SharedPlaythrough = Arc<Mutex<PlaybackController>>;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-only story content.
    pub story: Arc<dyn StoryStore>,
    /// Creates the flag store of each new playthrough.
    pub flag_stores: Arc<dyn FlagStoreFactory>,
    /// Scenes one playback call may pass through.
    pub max_scene_hops: usize,
    playthroughs: Arc<RwLock<HashMap<Uuid, SharedPlaythrough>>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("max_scene_hops", &self.max_scene_hops)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        story: Arc<dyn StoryStore>,
        flag_stores: Arc<dyn FlagStoreFactory>,
        max_scene_hops: usize,
    ) -> Self {
        Self {
            story,
            flag_stores,
            max_scene_hops,
            playthroughs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers a playthrough.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the registry lock is poisoned.
    pub fn insert_playthrough(&self, controller: PlaybackController) -> Result<Uuid, DomainError> {
        let playthrough_id = controller.playthrough_id();
        self.playthroughs
            .write()
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?
            .insert(playthrough_id, Arc::new(Mutex::new(controller)));
        Ok(playthrough_id)
    }

    /// Looks up a playthrough.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PlaythroughNotFound` for an unknown id, or
    /// `DomainError::Infrastructure` if the registry lock is poisoned.
    pub fn playthrough(&self, playthrough_id: Uuid) -> Result<SharedPlaythrough, DomainError> {
        self.playthroughs
            .read()
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?
            .get(&playthrough_id)
            .cloned()
            .ok_or(DomainError::PlaythroughNotFound(playthrough_id))
    }

    /// Returns how many playthroughs are registered.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the registry lock is poisoned.
    pub fn playthrough_count(&self) -> Result<usize, DomainError> {
        Ok(self
            .playthroughs
            .read()
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?
            .len())
    }

    /// Drops a playthrough with its flag store and journal. A request already
    /// holding it finishes on its own handle.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PlaythroughNotFound` for an unknown id, or
    /// `DomainError::Infrastructure` if the registry lock is poisoned.
    pub fn remove_playthrough(&self, playthrough_id: Uuid) -> Result<(), DomainError> {
        self.playthroughs
            .write()
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?
            .remove(&playthrough_id)
            .map(|_| ())
            .ok_or(DomainError::PlaythroughNotFound(playthrough_id))
    }
}
