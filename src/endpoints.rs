//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/users/{user_id}', use [format_endpoint].

/// The route for registering a new user.
pub const REGISTER: &str = "/api/users/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/users/login";
/// An alternative route for logging in a user.
pub const AUTH_LOG_IN: &str = "/api/auth/login";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/users/logout";
/// The route to access a single user.
pub const USER: &str = "/api/users/{user_id}";
/// The route to access transactions.
pub const TRANSACTIONS: &str = "/api/transacoes";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transacoes/{transaction_id}";
/// The route to access the transactions of one user.
pub const USER_TRANSACTIONS: &str = "/api/transacoes/usuario/{user_id}";
/// The route to access badges.
pub const BADGES: &str = "/api/badges";
/// The route to access a single badge.
pub const BADGE: &str = "/api/badges/{badge_id}";
/// The route to access the badges earned by one user.
pub const USER_BADGES: &str = "/api/badges/usuario/{user_id}";
/// The route for a user's dashboard summary.
pub const DASHBOARD: &str = "/api/dashboard/{user_id}";
/// The route for the betting versus investing simulator.
pub const SIMULATOR: &str = "/api/simulador/usuario/{user_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
