//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    AppState, Error,
    auth::{auth_guard, post_log_in, post_log_out},
    badge::{get_badge_endpoint, get_badges_endpoint, get_user_badges_endpoint},
    dashboard::get_dashboard_endpoint,
    endpoints,
    simulator::simulate_endpoint,
    transaction::{
        create_transaction_endpoint, get_transaction_endpoint, get_transactions_endpoint,
        get_user_transactions_endpoint,
    },
    user::{get_user_endpoint, register_user_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::REGISTER, post(register_user_endpoint))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::AUTH_LOG_IN, post(post_log_in))
        .route(endpoints::USER, get(get_user_endpoint));

    let protected_routes = Router::new()
        .route(endpoints::LOG_OUT, post(post_log_out))
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::TRANSACTION, get(get_transaction_endpoint))
        .route(
            endpoints::USER_TRANSACTIONS,
            get(get_user_transactions_endpoint),
        )
        .route(endpoints::BADGES, get(get_badges_endpoint))
        .route(endpoints::BADGE, get(get_badge_endpoint))
        .route(endpoints::USER_BADGES, get(get_user_badges_endpoint))
        .route(endpoints::DASHBOARD, get(get_dashboard_endpoint))
        .route(endpoints::SIMULATOR, post(simulate_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}
