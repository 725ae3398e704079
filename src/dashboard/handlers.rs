//! Dashboard HTTP handlers.

use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    auth::require_same_user,
    dashboard::{DashboardState, DashboardSummary, aggregation::build_summary},
    db::lock_connection,
    extract::PathParam,
    user::UserID,
};

/// Display the dashboard summary of the authenticated user.
///
/// # Errors
/// Responds with 401 if `user_id` is not the authenticated user.
pub async fn get_dashboard_endpoint(
    State(state): State<DashboardState>,
    Extension(auth_user_id): Extension<UserID>,
    PathParam(user_id): PathParam<i64>,
) -> Result<Json<DashboardSummary>, Error> {
    require_same_user(UserID::new(user_id), auth_user_id)?;

    let connection = lock_connection(&state.db_connection)?;
    let summary = build_summary(auth_user_id, &connection)?;

    Ok(Json(summary))
}
