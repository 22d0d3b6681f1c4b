//! Field-level checks run before every account mutation.

use std::str::FromStr;

use bcr_core::{
    MAX_EMAIL_LEN, MAX_PASSWORD_LEN, MAX_USERNAME_LEN, MIN_EMAIL_LEN, MIN_PASSWORD_LEN,
    MIN_USERNAME_LEN,
};
use email_address::EmailAddress;

use crate::error::AuthError;
use crate::record::{Category, NewUser};

/// Whether an empty email is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailPolicy {
    /// Registration: an email must be present.
    Required,
    /// Update: empty means "keep the current one".
    Optional,
}

/// Check username shape: 3-20 characters from `[A-Za-z0-9_-]`.
pub fn validate_username(username: &str) -> Result<(), AuthError> {
    if username.len() < MIN_USERNAME_LEN || username.len() > MAX_USERNAME_LEN {
        return Err(AuthError::validation(format!(
            "username must be {MIN_USERNAME_LEN}-{MAX_USERNAME_LEN} characters"
        )));
    }
    if !username
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    {
        return Err(AuthError::validation(
            "username may only contain letters, digits, '_' and '-'",
        ));
    }
    Ok(())
}

/// Check plaintext password length: 8-128 bytes.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AuthError::validation("password too long"));
    }
    Ok(())
}

/// Check username and plaintext password.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), AuthError> {
    validate_username(username)?;
    validate_password(password)
}

/// Check an email address against the mail address grammar.
pub fn validate_email(email: &str, policy: EmailPolicy) -> Result<(), AuthError> {
    if email.is_empty() {
        return match policy {
            EmailPolicy::Required => Err(AuthError::validation("email is required")),
            EmailPolicy::Optional => Ok(()),
        };
    }
    if email.len() < MIN_EMAIL_LEN {
        return Err(AuthError::validation("invalid email format"));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(AuthError::validation("email too long"));
    }
    EmailAddress::from_str(email).map_err(|_| AuthError::validation("invalid email format"))?;
    Ok(())
}

/// Check a complete record before it is hashed and written.
pub fn validate_record(
    username: &str,
    password: &str,
    email: &str,
    policy: EmailPolicy,
) -> Result<(), AuthError> {
    validate_email(email, policy)?;
    validate_credentials(username, password)
}

/// Check registration input and resolve its category.
///
/// An absent or unset category becomes [`Category::DEFAULT`]; any other
/// out-of-range code is rejected.
pub fn validate_new_user(user: &NewUser) -> Result<Category, AuthError> {
    validate_record(
        &user.username,
        &user.password,
        &user.email,
        EmailPolicy::Required,
    )?;
    match user.category {
        None | Some(Category::UNSET) => Ok(Category::DEFAULT),
        Some(code) => Category::from_code(code)
            .ok_or_else(|| AuthError::validation(format!("category must be between 0 and 3, got {code}"))),
    }
}
