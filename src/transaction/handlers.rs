//! Route handlers for reading transactions.

use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    auth::require_same_user,
    database_id::TransactionId,
    db::lock_connection,
    extract::PathParam,
    transaction::{
        TransactionResponse, TransactionState, get_all_transactions, get_transaction,
        get_transactions_by_user,
    },
    user::UserID,
};

/// List every transaction.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionState>,
) -> Result<Json<Vec<TransactionResponse>>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let transactions = get_all_transactions(&connection)?;

    Ok(Json(
        transactions.iter().map(TransactionResponse::from).collect(),
    ))
}

/// List the transactions of the authenticated user.
///
/// # Errors
/// Responds with 401 if `user_id` is not the authenticated user.
pub async fn get_user_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(auth_user_id): Extension<UserID>,
    PathParam(user_id): PathParam<i64>,
) -> Result<Json<Vec<TransactionResponse>>, Error> {
    require_same_user(UserID::new(user_id), auth_user_id)?;

    let connection = lock_connection(&state.db_connection)?;
    let transactions = get_transactions_by_user(auth_user_id, &connection)?;

    Ok(Json(
        transactions.iter().map(TransactionResponse::from).collect(),
    ))
}

/// Get one of the authenticated user's transactions.
///
/// # Errors
/// Responds with 404 if the transaction does not exist, or 401 if it belongs
/// to another user.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(auth_user_id): Extension<UserID>,
    PathParam(transaction_id): PathParam<TransactionId>,
) -> Result<Json<TransactionResponse>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let transaction = get_transaction(transaction_id, &connection)?;

    require_same_user(transaction.user_id, auth_user_id)?;

    Ok(Json(TransactionResponse::from(&transaction)))
}
