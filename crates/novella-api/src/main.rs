//! Novella API server entry point.

use std::sync::Arc;

use novella_api::config::{Backend, Config};
use novella_api::error::AppError;
use novella_api::routes;
use novella_api::state::AppState;
use novella_core::store::{FlagStoreFactory, StoryStore};
use novella_store::book::StoryBook;
use novella_store::memory::{InMemoryFlagStoreFactory, InMemoryStoryStore};
use novella_store::pg_story_store::{PgFlagStoreFactory, PgStoryStore};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

type Stores = (Arc<dyn StoryStore>, Arc<dyn FlagStoreFactory>);

async fn build_stores(backend: Backend) -> Result<Stores, AppError> {
    match backend {
        Backend::Postgres {
            database_url,
            story_file,
        } => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(&database_url)
                .await?;
            sqlx::migrate!("../../migrations")
                .run(&pool)
                .await
                .map_err(|e| AppError::Database(e.into()))?;

            let story = PgStoryStore::new(pool.clone());
            if let Some(path) = story_file {
                let stored = story.scene_count().await?;
                if stored == 0 {
                    story.import_book(&StoryBook::from_yaml_file(&path)?).await?;
                } else {
                    tracing::info!(
                        path = %path.display(),
                        scenes = stored,
                        "database already holds a story, skipping import"
                    );
                }
            }
            Ok((Arc::new(story), Arc::new(PgFlagStoreFactory::new(pool))))
        }
        Backend::InMemory { story_file } => {
            let book = StoryBook::from_yaml_file(&story_file)?;
            let story = InMemoryStoryStore::from_book(book);
            tracing::info!(
                path = %story_file.display(),
                scenes = story.scene_count(),
                "story loaded into memory"
            );
            Ok((Arc::new(story), Arc::new(InMemoryFlagStoreFactory)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Novella API server");

    let config = Config::from_env()?;
    let (story, flag_stores) = build_stores(config.backend).await?;
    let app_state = AppState::new(story, flag_stores, config.max_scene_hops);

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = routes::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
