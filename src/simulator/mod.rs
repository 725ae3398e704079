//! The "bet or invest" simulator.

mod calculation;

pub use calculation::{SimulationRequest, SimulationResult, simulate};

use axum::{Extension, Json};

use crate::{
    Error,
    auth::require_same_user,
    extract::{JsonBody, PathParam},
    user::UserID,
};

/// A route handler that compares betting an amount against investing it.
///
/// # Errors
/// Responds with 401 if `user_id` is not the authenticated user, or 400 if the
/// request is invalid.
pub async fn simulate_endpoint(
    Extension(auth_user_id): Extension<UserID>,
    PathParam(user_id): PathParam<i64>,
    JsonBody(request): JsonBody<SimulationRequest>,
) -> Result<Json<SimulationResult>, Error> {
    require_same_user(UserID::new(user_id), auth_user_id)?;

    simulate(&request).map(Json)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{TestApp, auth_header},
    };

    use super::{SimulationRequest, SimulationResult};

    #[tokio::test]
    async fn simulate_succeeds() {
        let app = TestApp::new();
        let user = app.create_user("ana@example.com", 100.0);
        let (name, value) = auth_header(&app.log_in(user.id));

        let response = app
            .server
            .post(&format_endpoint(endpoints::SIMULATOR, user.id.as_i64()))
            .add_header(name, value)
            .json(&serde_json::json!({"valorInicial": 1000.0, "meses": 1, "rendimentoMensal": 0.5}))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<SimulationResult>(),
            SimulationResult {
                betting_result: 100.0,
                investing_result: 1500.0,
            }
        );
    }

    #[tokio::test]
    async fn long_simulation_succeeds() {
        let app = TestApp::new();
        let user = app.create_user("ana@example.com", 100.0);
        let (name, value) = auth_header(&app.log_in(user.id));

        let response = app
            .server
            .post(&format_endpoint(endpoints::SIMULATOR, user.id.as_i64()))
            .add_header(name, value)
            .json(&serde_json::json!({"valorInicial": 10.0, "meses": 5000}))
            .await;

        response.assert_status_ok();
        let result = response.json::<SimulationResult>();
        assert!(result.investing_result.is_finite());
        assert!(result.investing_result > 10.0);
    }

    #[tokio::test]
    async fn invalid_request_is_bad_request() {
        let app = TestApp::new();
        let user = app.create_user("ana@example.com", 100.0);
        let (name, value) = auth_header(&app.log_in(user.id));

        app.server
            .post(&format_endpoint(endpoints::SIMULATOR, user.id.as_i64()))
            .add_header(name, value)
            .json(&SimulationRequest::default())
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn simulation_for_other_user_is_unauthorized() {
        let app = TestApp::new();
        let ana = app.create_user("ana@example.com", 100.0);
        let bruno = app.create_user("bruno@example.com", 100.0);
        let (name, value) = auth_header(&app.log_in(ana.id));

        app.server
            .post(&format_endpoint(endpoints::SIMULATOR, bruno.id.as_i64()))
            .add_header(name, value)
            .json(&SimulationRequest::default())
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
