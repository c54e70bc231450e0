//! Tank API endpoints.
//!
//! Every successful tank mutation re-stamps the profile's `last_updated`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{parse_id, ApiResult};
use crate::errors::AppError;
use crate::models::{store_now, NewTank, Tank, TankPatch};
use crate::AppState;

const TANK_NOT_FOUND: &str = "Tank not found";

/// GET /tank - List all tanks.
pub async fn list_tanks(State(state): State<AppState>) -> ApiResult<Json<Vec<Tank>>> {
    let tanks = state.store.list_tanks().await?;
    Ok(Json(tanks))
}

/// POST /tank - Create a new tank.
pub async fn create_tank(
    State(state): State<AppState>,
    Json(request): Json<NewTank>,
) -> ApiResult<(StatusCode, Json<Tank>)> {
    let id = state.store.insert_tank(&request).await?;

    let Some(tank) = state.store.find_tank(&id).await? else {
        tracing::warn!("Tank {} missing right after insert", id);
        return Err(AppError::BadRequest(None));
    };

    touch_profile(&state).await?;

    tracing::info!("Created tank {} at '{}'", tank.id, tank.location);
    Ok((StatusCode::CREATED, Json(tank)))
}

/// PATCH /tank/:id - Merge the supplied fields into a tank.
pub async fn update_tank(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TankPatch>,
) -> ApiResult<Json<Tank>> {
    let id = parse_id(&id, TANK_NOT_FOUND)?;

    let tank = state
        .store
        .update_tank(&id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound(TANK_NOT_FOUND.to_string()))?;

    touch_profile(&state).await?;

    tracing::info!("Updated tank {}", tank.id);
    Ok(Json(tank))
}

/// DELETE /tank/:id - Delete a tank.
pub async fn delete_tank(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, TANK_NOT_FOUND)?;

    if !state.store.delete_tank(&id).await? {
        return Err(AppError::NotFound(TANK_NOT_FOUND.to_string()));
    }

    touch_profile(&state).await?;

    tracing::info!("Deleted tank {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Set the profile's `last_updated` to now. A missing profile is an internal failure.
async fn touch_profile(state: &AppState) -> ApiResult<()> {
    if state.store.touch_profile(store_now()).await? {
        Ok(())
    } else {
        Err(AppError::Internal(
            "No profile exists to record the tank change".to_string(),
        ))
    }
}
