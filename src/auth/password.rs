//! Password strength checks and bcrypt hashing.
//!
//! Plain text passwords only live long enough to be checked by zxcvbn and
//! hashed. The `user` table stores the [PasswordHash].

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};
use zxcvbn::{Score, zxcvbn};

use crate::Error;

/// A plain text password that passed the strength check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check that `raw_password` is hard to guess.
    ///
    /// `user_inputs` holds the other things the user typed in when registering,
    /// such as their name and email. A password built from them is weak.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] with zxcvbn's advice if the score is below three.
    pub fn new(raw_password: &str, user_inputs: &[&str]) -> Result<Self, Error> {
        let entropy = zxcvbn(raw_password, user_inputs);

        if matches!(entropy.score(), Score::Three | Score::Four) {
            return Ok(Self(raw_password.to_owned()));
        }

        let advice = entropy
            .feedback()
            .map(ToString::to_string)
            .filter(|advice| !advice.trim().is_empty())
            .unwrap_or_else(|| "use a longer, less predictable password".to_owned());

        Err(Error::TooWeak(advice))
    }

    /// Wrap `raw_password` without checking its strength.
    ///
    /// For seeding and tests only.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("********")
    }
}

/// A bcrypt hash, salt included.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// bcrypt's default cost, used for real accounts. Tests use 4.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with `cost` rounds of bcrypt.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt fails, e.g. for a cost outside 4..=31.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        let hashed =
            hash(&password.0, cost).map_err(|error| Error::HashingError(error.to_string()))?;

        Ok(Self(hashed))
    }

    /// Wrap a hash read back from the database.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_owned())
    }

    /// Check the strength of `raw_password` and hash it.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] or [Error::HashingError].
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        Self::new(ValidatedPassword::new(raw_password, &[])?, cost)
    }

    /// Whether `raw_password` is the password this hash was made from.
    ///
    /// # Errors
    ///
    /// Fails if the stored hash is not a valid bcrypt hash.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
