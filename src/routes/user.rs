use std::sync::Arc;

use crate::{
    app::AppState,
    domain::{
        errors::ApiError,
        fields::{User, UserId},
    },
    repository::get_user_by_id,
};
use axum::{
    extract::{Path, State},
    Json,
};

/// `1`, `1.0` and `1e0` all name user 1. Anything that is not a whole number
/// can never have been issued, so it is reported like an unknown id.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = UserId::parse_loose(&id).ok_or_else(|| {
        tracing::warn!("user lookup with malformed id >>> {}", id);
        ApiError::UserNotFound
    })?;

    get_user_by_id(&state.get_db(), id)?
        .map(Json)
        .ok_or(ApiError::UserNotFound)
}
