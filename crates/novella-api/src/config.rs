//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use novella_playback::domain::controller::DEFAULT_MAX_SCENE_HOPS;

use crate::error::AppError;

/// Where story content and flags live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// PostgreSQL at the given URL. `story_file`, if set, is imported at
    /// startup.
    Postgres {
        /// Connection string.
        database_url: String,
        /// Story book to import.
        story_file: Option<PathBuf>,
    },
    /// A story book loaded into memory. Flags do not survive a restart.
    InMemory {
        /// Story book to load.
        story_file: PathBuf,
    },
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Story and flag storage.
    pub backend: Backend,
    /// Address to bind.
    pub addr: SocketAddr,
    /// Scenes one playback call may pass through.
    pub max_scene_hops: usize,
}

impl Config {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is malformed or neither
    /// `DATABASE_URL` nor `STORY_FILE` is set.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let story_file = lookup("STORY_FILE").map(PathBuf::from);
        let backend = match (lookup("DATABASE_URL"), story_file) {
            (Some(database_url), story_file) => Backend::Postgres {
                database_url,
                story_file,
            },
            (None, Some(story_file)) => Backend::InMemory { story_file },
            (None, None) => {
                return Err(AppError::Config(
                    "DATABASE_URL or STORY_FILE environment variable must be set".to_owned(),
                ));
            }
        };

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "3000".to_owned())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;

        let max_scene_hops = match lookup("MAX_SCENE_HOPS") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(hops) if hops > 0 => hops,
                _ => {
                    return Err(AppError::Config(format!(
                        "MAX_SCENE_HOPS must be a positive integer, got {raw:?}"
                    )));
                }
            },
            None => DEFAULT_MAX_SCENE_HOPS,
        };

        Ok(Self {
            backend,
            addr,
            max_scene_hops,
        })
    }
}
