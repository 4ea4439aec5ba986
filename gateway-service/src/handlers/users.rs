use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::error::{AppError, AppResult};
use crate::models::{InsertUserRequest, InsertUserResponse, User};
use crate::AppState;

/// Insert one user record
///
/// POST /insert
pub async fn insert_user(
    State(state): State<AppState>,
    payload: Result<Json<InsertUserRequest>, JsonRejection>,
) -> AppResult<Json<InsertUserResponse>> {
    let Json(request) = payload?;

    let name = request
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or(AppError::MissingField("name"))?;

    let id = state.users.insert_user(&name).await?;
    tracing::info!(user_id = id, "User inserted");

    Ok(Json(InsertUserResponse {
        message: "User inserted successfully!".to_string(),
        id,
    }))
}

/// Every user record, unpaginated
///
/// GET /fetch
pub async fn fetch_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.users.fetch_users().await?;
    tracing::debug!("Returning {} users", users.len());
    Ok(Json(users))
}
