//! Route modules.

pub mod health;
pub mod playthroughs;

use axum::Router;

use crate::state::AppState;

/// Builds the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/playthroughs", playthroughs::router())
        .with_state(state)
}
