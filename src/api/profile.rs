//! Profile API endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::ApiResult;
use crate::errors::AppError;
use crate::models::{store_now, NewProfile, Profile};
use crate::AppState;

/// GET /profile - The profile, or an empty list when none has been created.
pub async fn get_profile(State(state): State<AppState>) -> ApiResult<Response> {
    let response = match state.store.primary_profile().await? {
        Some(profile) => Json(profile).into_response(),
        None => Json(Vec::<Profile>::new()).into_response(),
    };
    Ok(response)
}

/// POST /profile - Create the profile.
pub async fn create_profile(
    State(state): State<AppState>,
    Json(request): Json<NewProfile>,
) -> ApiResult<(StatusCode, Json<Profile>)> {
    let id = state.store.insert_profile(&request, store_now()).await?;

    let Some(profile) = state.store.find_profile(&id).await? else {
        tracing::warn!("Profile {} missing right after insert", id);
        return Err(AppError::BadRequest(None));
    };

    tracing::info!("Created profile {} for '{}'", profile.id, profile.username);
    Ok((StatusCode::CREATED, Json(profile)))
}
