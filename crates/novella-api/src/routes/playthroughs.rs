//! Routes for playthroughs.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use novella_core::error::DomainError;
use novella_core::ids::{ChoiceOptionId, SceneId};
use serde::{Deserialize, Serialize};
use tokio::sync::OwnedMutexGuard;
use tracing::{info, instrument};
use uuid::Uuid;

use novella_playback::application::command_handlers;
use novella_playback::application::query_handlers::{self, PlaythroughView};
use novella_playback::domain::commands;
use novella_playback::domain::controller::PlaybackController;
use novella_playback::domain::view::Step;

use crate::error::ApiError;
use crate::state::{AppState, SharedPlaythrough};

/// Request body for POST / and POST /{id}/start.
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    /// The scene to start from.
    pub scene_id: SceneId,
}

/// Request body for POST /{id}/choose.
#[derive(Debug, Deserialize)]
pub struct ChooseRequest {
    /// The option picked.
    pub option_id: ChoiceOptionId,
}

/// Response body returned after a playback command is successfully handled.
#[derive(Debug, Serialize)]
pub struct StepResponse {
    /// The playthrough driven.
    pub playthrough_id: Uuid,
    /// What to display next.
    pub step: Step,
}

/// Looks up a playthrough and locks it, rejecting concurrent use.
fn lock_playthrough(
    state: &AppState,
    playthrough_id: Uuid,
) -> Result<OwnedMutexGuard<PlaybackController>, ApiError> {
    let playthrough: SharedPlaythrough = state.playthrough(playthrough_id)?;
    playthrough
        .try_lock_owned()
        .map_err(|_| ApiError(DomainError::PlaythroughBusy(playthrough_id)))
}

/// POST /
#[instrument(skip(state, request), fields(scene_id = %request.scene_id))]
async fn create_playthrough(
    State(state): State<AppState>,
    Json(request): Json<StartRequest>,
) -> Result<(StatusCode, Json<StepResponse>), ApiError> {
    let command = commands::CreatePlaythrough {
        scene_id: request.scene_id,
    };

    info!("handling create_playthrough command");

    let (controller, step) = command_handlers::handle_create_playthrough(
        &command,
        state.story.clone(),
        state.flag_stores.as_ref(),
        state.max_scene_hops,
    )
    .await?;
    let playthrough_id = state.insert_playthrough(controller)?;

    Ok((
        StatusCode::CREATED,
        Json(StepResponse {
            playthrough_id,
            step,
        }),
    ))
}

/// POST /{id}/start
#[instrument(skip(state, request), fields(scene_id = %request.scene_id))]
async fn start_playback(
    State(state): State<AppState>,
    Path(playthrough_id): Path<Uuid>,
    Json(request): Json<StartRequest>,
) -> Result<Json<StepResponse>, ApiError> {
    let command = commands::StartPlayback {
        playthrough_id,
        scene_id: request.scene_id,
    };

    info!("handling start_playback command");

    let mut controller = lock_playthrough(&state, playthrough_id)?;
    let step = command_handlers::handle_start_playback(&command, &mut controller).await?;

    Ok(Json(StepResponse {
        playthrough_id,
        step,
    }))
}

/// POST /{id}/advance
#[instrument(skip(state))]
async fn advance_playback(
    State(state): State<AppState>,
    Path(playthrough_id): Path<Uuid>,
) -> Result<Json<StepResponse>, ApiError> {
    let command = commands::AdvancePlayback { playthrough_id };

    info!("handling advance_playback command");

    let mut controller = lock_playthrough(&state, playthrough_id)?;
    let step = command_handlers::handle_advance_playback(&command, &mut controller).await?;

    Ok(Json(StepResponse {
        playthrough_id,
        step,
    }))
}

/// POST /{id}/choose
#[instrument(skip(state, request), fields(option_id = %request.option_id))]
async fn make_choice(
    State(state): State<AppState>,
    Path(playthrough_id): Path<Uuid>,
    Json(request): Json<ChooseRequest>,
) -> Result<Json<StepResponse>, ApiError> {
    let command = commands::MakeChoice {
        playthrough_id,
        option_id: request.option_id,
    };

    info!("handling make_choice command");

    let mut controller = lock_playthrough(&state, playthrough_id)?;
    let step = command_handlers::handle_make_choice(&command, &mut controller).await?;

    Ok(Json(StepResponse {
        playthrough_id,
        step,
    }))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_playthrough(
    State(state): State<AppState>,
    Path(playthrough_id): Path<Uuid>,
) -> Result<Json<PlaythroughView>, ApiError> {
    let controller = lock_playthrough(&state, playthrough_id)?;
    let view = query_handlers::get_playthrough_view(&controller);

    Ok(Json(view))
}

/// DELETE /{id}
#[instrument(skip(state))]
async fn delete_playthrough(
    State(state): State<AppState>,
    Path(playthrough_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    info!("removing playthrough");

    state.remove_playthrough(playthrough_id)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for playthroughs.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_playthrough))
        .route("/{id}", get(get_playthrough).delete(delete_playthrough))
        .route("/{id}/start", post(start_playback))
        .route("/{id}/advance", post(advance_playback))
        .route("/{id}/choose", post(make_choice))
}
