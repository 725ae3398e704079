//! Route handlers for reading badges.

use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    auth::require_same_user,
    badge::{BadgeResponse, BadgeState, get_all_badges, get_badge, get_badges_by_user},
    database_id::BadgeId,
    db::lock_connection,
    extract::PathParam,
    user::UserID,
};

/// List every badge.
pub async fn get_badges_endpoint(
    State(state): State<BadgeState>,
) -> Result<Json<Vec<BadgeResponse>>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let badges = get_all_badges(&connection)?;

    Ok(Json(badges.iter().map(BadgeResponse::from).collect()))
}

/// List the badges of the authenticated user.
///
/// # Errors
/// Responds with 401 if `user_id` is not the authenticated user.
pub async fn get_user_badges_endpoint(
    State(state): State<BadgeState>,
    Extension(auth_user_id): Extension<UserID>,
    PathParam(user_id): PathParam<i64>,
) -> Result<Json<Vec<BadgeResponse>>, Error> {
    require_same_user(UserID::new(user_id), auth_user_id)?;

    let connection = lock_connection(&state.db_connection)?;
    let badges = get_badges_by_user(auth_user_id, &connection)?;

    Ok(Json(badges.iter().map(BadgeResponse::from).collect()))
}

/// Get a single badge.
///
/// # Errors
/// Responds with 404 if the badge does not exist.
pub async fn get_badge_endpoint(
    State(state): State<BadgeState>,
    PathParam(badge_id): PathParam<BadgeId>,
) -> Result<Json<BadgeResponse>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let badge = get_badge(badge_id, &connection)?;

    Ok(Json(BadgeResponse::from(&badge)))
}
