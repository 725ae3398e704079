//! Defines the endpoint for registering a new user.

use std::str::FromStr;

use axum::{Json, extract::State};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{
    Error, PasswordHash, ValidatedPassword,
    db::lock_connection,
    extract::JsonBody,
    user::{NewUser, UserResponse, UserState, create_user, get_user_by_email},
};

/// The data a client sends to register.
///
/// Every field is optional here so that missing fields produce a descriptive
/// error instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterForm {
    /// The user's display name.
    #[serde(rename = "nome")]
    pub name: Option<String>,
    /// The email to log in with.
    pub email: Option<String>,
    /// The plain text password.
    #[serde(rename = "senha")]
    pub password: Option<String>,
    /// The user's monthly income.
    #[serde(rename = "rendaMensal")]
    pub monthly_income: Option<f64>,
}

/// A route handler for registering a new user.
///
/// # Errors
///
/// Responds with 400 if a field is missing or invalid, the password is too
/// weak, or the email is already registered.
pub async fn register_user_endpoint(
    State(state): State<UserState>,
    JsonBody(form): JsonBody<RegisterForm>,
) -> Result<Json<UserResponse>, Error> {
    let new_user = validate_registration(form, PasswordHash::DEFAULT_COST)?;
    let connection = lock_connection(&state.db_connection)?;

    match get_user_by_email(&new_user.email.to_string(), &connection) {
        Ok(_) => return Err(Error::DuplicateEmail),
        Err(Error::NotFound) => {}
        Err(error) => return Err(error),
    }

    let user = create_user(new_user, &connection)?;
    tracing::info!("Registered user {}", user.id);

    Ok(Json(UserResponse::from(&user)))
}

/// Check the registration form and hash the password with `cost`.
fn validate_registration(form: RegisterForm, cost: u32) -> Result<NewUser, Error> {
    let name = form
        .name
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::InvalidField("nome is required".to_owned()))?;

    let raw_email = form
        .email
        .map(|email| email.trim().to_owned())
        .filter(|email| !email.is_empty())
        .ok_or_else(|| Error::InvalidField("email is required".to_owned()))?;
    let email =
        EmailAddress::from_str(&raw_email).map_err(|_| Error::InvalidEmail(raw_email.clone()))?;

    let monthly_income = match form.monthly_income {
        Some(income) if income.is_finite() && income >= 0.0 => income,
        Some(_) => {
            return Err(Error::InvalidField(
                "rendaMensal must be a number that is zero or greater".to_owned(),
            ));
        }
        None => return Err(Error::InvalidField("rendaMensal is required".to_owned())),
    };

    let password = form
        .password
        .ok_or_else(|| Error::InvalidField("senha is required".to_owned()))?;
    let password = ValidatedPassword::new(&password, &[&raw_email, &name])?;
    let password_hash = PasswordHash::new(password, cost)?;

    Ok(NewUser {
        name,
        email,
        password_hash,
        monthly_income,
    })
}
